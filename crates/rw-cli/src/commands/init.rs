use std::fs;
use std::path::Path;

use glam::IVec3;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rw_core::copy::counted;
use rw_core::{Angle12, AngleDelta, ControlFlags, Pursuit, SpawnParams, TimerId};
use rw_engine::{EngineConfig, ReferenceFrame, Turret};

use super::{ASSETS_DIR, ActorEntry, Scenario};

const ROUTE_ASSET: &str = "route.bin";

pub fn run(name: &str, entities: usize, seed: u64) -> Result<(), String> {
    let dir = Path::new(name);

    if dir.exists() {
        return Err(format!("directory '{name}' already exists"));
    }

    let mut rng = StdRng::seed_from_u64(seed);
    let scenario = generate(name, entities, &mut rng);
    let waypoints: Vec<u8> = (0..10).map(|_| rng.random()).collect();

    fs::create_dir_all(dir.join(ASSETS_DIR))
        .map_err(|e| format!("cannot create directory: {e}"))?;

    let json = serde_json::to_string_pretty(&scenario)
        .map_err(|e| format!("cannot serialize scenario: {e}"))?;
    fs::write(dir.join("scenario.json"), json)
        .map_err(|e| format!("cannot write scenario.json: {e}"))?;
    fs::write(dir.join(ASSETS_DIR).join(ROUTE_ASSET), counted(&waypoints))
        .map_err(|e| format!("cannot write {ROUTE_ASSET}: {e}"))?;

    println!("Created scenario '{name}' in {name}/");
    println!("  scenario.json       {entities} actors (seed {seed})");
    println!("  {ASSETS_DIR}/{ROUTE_ASSET}    shared waypoint path");
    println!();
    println!("Get started:");
    println!("  cd {name}");
    println!("  rw check       # Validate the scenario");
    println!("  rw run -v      # Run 16 ticks and show every event");

    Ok(())
}

fn generate(name: &str, entities: usize, rng: &mut StdRng) -> Scenario {
    let reference = ReferenceFrame {
        origin: random_point(rng, 512),
        primary_target: random_point(rng, 2048),
        secondary_target: random_point(rng, 2048),
        bearing: Angle12::new(rng.random()),
    };

    let actors = (0..entities)
        .map(|i| {
            let mut spawn = SpawnParams::new(format!("Rotor-{i:02}"))
                .with_mode(rng.random_range(0..=4))
                .with_sub_mode(rng.random_range(0..4))
                .with_timer(TimerId::Fire, rng.random_range(1..=12))
                .with_timer(TimerId::Sweep, rng.random_range(0..=20));
            if rng.random_bool(0.5) {
                spawn = spawn.with_flags(ControlFlags::ATTRACTION_ACTIVE);
            }
            if rng.random_bool(0.5) {
                spawn = spawn.with_flags(ControlFlags::RELOAD_PATH);
                spawn.path_asset = Some(ROUTE_ASSET.into());
            }
            spawn.position = random_point(rng, 1024);
            spawn.yaw = rng.random_range(0..4096);
            spawn.roll = rng.random_range(0..4096);
            spawn.spin = AngleDelta {
                yaw: rng.random_range(-32..=32),
                roll: rng.random_range(64..=256),
            };
            spawn.altitude = Pursuit::new(0, rng.random_range(100..1000));

            let turret = rng.random_bool(0.5).then(|| Turret {
                aim: Angle12::new(rng.random()),
            });
            ActorEntry { spawn, turret }
        })
        .collect();

    Scenario {
        name: name.to_string(),
        config: EngineConfig::default(),
        reference,
        actors,
    }
}

fn random_point(rng: &mut StdRng, extent: i32) -> IVec3 {
    IVec3::new(
        rng.random_range(-extent..=extent),
        rng.random_range(-extent..=extent),
        rng.random_range(-extent..=extent),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generation_is_deterministic() {
        let a = generate("s", 5, &mut StdRng::seed_from_u64(7));
        let b = generate("s", 5, &mut StdRng::seed_from_u64(7));
        assert_eq!(
            serde_json::to_string(&a).unwrap(),
            serde_json::to_string(&b).unwrap()
        );
    }

    #[test]
    fn generated_actors_validate() {
        let scenario = generate("s", 20, &mut StdRng::seed_from_u64(1));
        assert_eq!(scenario.actors.len(), 20);
        for actor in &scenario.actors {
            assert!(actor.spawn.validate().is_ok());
        }
    }
}

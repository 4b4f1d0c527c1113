use std::path::Path;

use colored::Colorize;

pub fn run(scenario_path: &Path) -> Result<(), String> {
    let (scenario, dir) = super::load_scenario(scenario_path)?;
    let (engine, _) = super::build_engine(&scenario, &dir)?;

    let missing: Vec<&str> = scenario
        .actors
        .iter()
        .filter_map(|a| a.spawn.path_asset.as_deref())
        .filter(|key| !dir.join(super::ASSETS_DIR).join(key).is_file())
        .collect();

    println!("  All checks passed for '{}'.", scenario.name);
    println!(
        "  {} actors, {} turrets",
        engine.entities().len(),
        engine.components().len()
    );
    for key in missing {
        println!("  {} path asset '{key}' not found", "warn".yellow().bold());
    }

    Ok(())
}

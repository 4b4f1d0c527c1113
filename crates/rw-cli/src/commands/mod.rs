pub mod check;
pub mod init;
pub mod run;

use std::fs;
use std::path::{Path, PathBuf};

use rw_core::{EntityId, SpawnParams};
use rw_engine::{AssetLoader, Collaborators, Engine, EngineConfig, ReferenceFrame, Turret};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Directory next to the scenario file that path assets are read from.
pub const ASSETS_DIR: &str = "assets";

/// A scenario file: engine settings, the shared frame, and the actors.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Scenario {
    pub name: String,
    pub config: EngineConfig,
    pub reference: ReferenceFrame,
    pub actors: Vec<ActorEntry>,
}

/// One actor: its spawn parameters plus an optional turret.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ActorEntry {
    #[serde(flatten)]
    pub spawn: SpawnParams,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub turret: Option<Turret>,
}

/// Reads path assets from `<scenario dir>/assets/<key>`.
#[derive(Debug)]
pub struct DirLoader {
    root: PathBuf,
}

impl DirLoader {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl AssetLoader for DirLoader {
    fn load(&self, key: &str) -> Option<Vec<u8>> {
        let path = self.root.join(key);
        match fs::read(&path) {
            Ok(bytes) => Some(bytes),
            Err(e) => {
                debug!(path = %path.display(), error = %e, "asset read failed");
                None
            }
        }
    }
}

/// Read and parse a scenario file. Returns it with the directory it lives in.
fn load_scenario(path: &Path) -> Result<(Scenario, PathBuf), String> {
    let content = fs::read_to_string(path)
        .map_err(|e| format!("cannot read {}: {e}", path.display()))?;
    let scenario: Scenario = serde_json::from_str(&content)
        .map_err(|e| format!("invalid scenario {}: {e}", path.display()))?;
    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .map_or_else(|| PathBuf::from("."), Path::to_path_buf);
    Ok((scenario, dir))
}

/// Build an engine from a scenario, spawning every actor in file order.
fn build_engine(scenario: &Scenario, dir: &Path) -> Result<(Engine, Vec<EntityId>), String> {
    let collab = Collaborators::default().with_loader(DirLoader::new(dir.join(ASSETS_DIR)));
    let mut engine = Engine::new(scenario.config.clone())
        .map_err(|e| format!("scenario '{}': {e}", scenario.name))?
        .with_collaborators(collab);
    engine.set_reference(scenario.reference);

    let mut ids = Vec::with_capacity(scenario.actors.len());
    for (index, actor) in scenario.actors.iter().enumerate() {
        let id = engine
            .spawn(&actor.spawn)
            .map_err(|e| format!("actor #{index}: {e}"))?;
        if let Some(turret) = actor.turret {
            engine
                .attach_turret(id, turret)
                .map_err(|e| format!("actor #{index}: {e}"))?;
        }
        ids.push(id);
    }
    Ok((engine, ids))
}

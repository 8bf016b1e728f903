//! Save-file persistence.
//!
//! The save record is the flat player JSON with a version field beside
//! it. Stores are a trait so sessions can run against an in-memory
//! double in tests; the real store writes pretty-printed JSON under a
//! directory, with the boss second-chance checkpoint in a sibling file.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::player::Player;

/// Bumped whenever the save-file shape changes incompatibly.
pub const SAVE_VERSION: u32 = 1;

#[derive(Debug, Error)]
pub enum SaveError {
    #[error("save i/o error: {0}")]
    Io(#[from] std::io::Error),
    #[error("save decode error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("save version {found} is not supported (expected {SAVE_VERSION})")]
    VersionMismatch { found: u32 },
    #[error("no save file found")]
    NotFound,
}

#[derive(Debug, Serialize, Deserialize)]
struct SaveFile {
    version: u32,
    #[serde(flatten)]
    player: Player,
}

/// Where player state goes between (and across) runs.
///
/// Failures are reported, never fatal; callers keep playing with the
/// in-memory state they already have.
pub trait SaveStore {
    fn save(&mut self, player: &Player) -> Result<(), SaveError>;
    fn load(&mut self) -> Result<Player, SaveError>;
    /// The second-chance snapshot written when a boss defeats the player.
    fn save_checkpoint(&mut self, player: &Player) -> Result<(), SaveError>;
    fn load_checkpoint(&mut self) -> Result<Player, SaveError>;
}

/// JSON files under a save directory.
#[derive(Debug, Clone)]
pub struct FileStore {
    save_path: PathBuf,
    checkpoint_path: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        Self {
            save_path: dir.join("save.json"),
            checkpoint_path: dir.join("rebirth.json"),
        }
    }

    fn write(path: &Path, player: &Player) -> Result<(), SaveError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let file = SaveFile {
            version: SAVE_VERSION,
            player: player.clone(),
        };
        let json = serde_json::to_string_pretty(&file)?;
        fs::write(path, json)?;
        tracing::debug!(path = %path.display(), "wrote save");
        Ok(())
    }

    fn read(path: &Path) -> Result<Player, SaveError> {
        if !path.exists() {
            return Err(SaveError::NotFound);
        }
        let json = fs::read_to_string(path)?;
        let file: SaveFile = serde_json::from_str(&json)?;
        if file.version != SAVE_VERSION {
            return Err(SaveError::VersionMismatch {
                found: file.version,
            });
        }
        Ok(file.player)
    }
}

impl SaveStore for FileStore {
    fn save(&mut self, player: &Player) -> Result<(), SaveError> {
        Self::write(&self.save_path, player)
    }

    fn load(&mut self) -> Result<Player, SaveError> {
        Self::read(&self.save_path)
    }

    fn save_checkpoint(&mut self, player: &Player) -> Result<(), SaveError> {
        Self::write(&self.checkpoint_path, player)
    }

    fn load_checkpoint(&mut self) -> Result<Player, SaveError> {
        Self::read(&self.checkpoint_path)
    }
}

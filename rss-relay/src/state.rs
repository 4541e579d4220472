use crate::types::{RelayError, Result, SeenState};
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// JSON file holding what has already been delivered for each feed.
pub struct SeenStateStore {
    path: PathBuf,
}

impl SeenStateStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the state, starting over with an empty mapping when the file is
    /// missing, unreadable or not valid JSON.
    pub fn load(&self) -> SeenState {
        match self.try_load() {
            Ok(state) => state,
            Err(e) => {
                warn!("{}. Starting with an empty state.", e);
                SeenState::new()
            }
        }
    }

    pub fn try_load(&self) -> Result<SeenState> {
        let data = match fs::read(&self.path) {
            Ok(data) => data,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!("State file {} does not exist yet", self.path.display());
                return Ok(SeenState::new());
            }
            Err(e) => return Err(e.into()),
        };

        let state: SeenState =
            serde_json::from_slice(&data).map_err(|source| RelayError::StateCorrupted {
                path: self.path.clone(),
                source,
            })?;

        info!(
            "Loaded state for {} feeds from {}",
            state.len(),
            self.path.display()
        );
        Ok(state)
    }

    /// Write the state next to the target and rename it into place, so a
    /// reader sees either the old file or the new one.
    pub fn save(&self, state: &SeenState) -> Result<()> {
        let data = serde_json::to_vec_pretty(state)?;
        let temp_path = self.temp_path();

        let written = (|| -> io::Result<()> {
            let mut file = fs::File::create(&temp_path)?;
            file.write_all(&data)?;
            file.write_all(b"\n")?;
            file.sync_all()?;
            fs::rename(&temp_path, &self.path)
        })();

        if let Err(e) = written {
            let _ = fs::remove_file(&temp_path);
            return Err(e.into());
        }

        info!(
            "Saved state for {} feeds to {}",
            state.len(),
            self.path.display()
        );
        Ok(())
    }

    fn temp_path(&self) -> PathBuf {
        let file_name = self
            .path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "state.json".to_string());
        self.path.with_file_name(format!(".{}.tmp", file_name))
    }
}

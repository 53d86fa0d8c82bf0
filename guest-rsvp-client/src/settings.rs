use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::ClientError;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
struct StoredSettings {
    experimental: bool,
}

/// Local, per-user settings. Read once at startup; every change is written
/// straight back to the state file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientSettings {
    path: PathBuf,
    stored: StoredSettings,
}

impl ClientSettings {
    /// A missing or unreadable state file yields the defaults.
    #[must_use]
    pub fn load(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let stored = match std::fs::read(&path) {
            Ok(bytes) => serde_json::from_slice(&bytes).unwrap_or_else(|err| {
                warn!("ignoring corrupt state file {}: {err}", path.display());
                StoredSettings::default()
            }),
            Err(err) if err.kind() == ErrorKind::NotFound => StoredSettings::default(),
            Err(err) => {
                warn!("failed to read state file {}: {err}", path.display());
                StoredSettings::default()
            }
        };
        debug!(experimental = stored.experimental, "loaded client settings");
        Self { path, stored }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    #[must_use]
    pub const fn experimental(&self) -> bool {
        self.stored.experimental
    }

    pub fn set_experimental(&mut self, enabled: bool) -> Result<(), ClientError> {
        self.stored.experimental = enabled;
        self.save()
    }

    /// Returns the new value.
    pub fn toggle_experimental(&mut self) -> Result<bool, ClientError> {
        self.set_experimental(!self.experimental())?;
        Ok(self.experimental())
    }

    fn save(&self) -> Result<(), ClientError> {
        let bytes = serde_json::to_vec_pretty(&self.stored)?;
        std::fs::write(&self.path, bytes).map_err(|source| ClientError::Settings {
            path: self.path.display().to_string(),
            source,
        })
    }
}

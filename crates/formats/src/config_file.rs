use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, info};

use crate::scene_config::SceneConfig;

pub const CONFIG_FILE_NAME: &str = "scene-config.json";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("scene config parse error: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("model {model:?} patrols unknown path {path:?}")]
    UnknownPatrolPath { model: String, path: String },
    #[error("patrol path {0:?} is defined more than once")]
    DuplicatePatrolPath(String),
    #[error("frame timestep must be positive and finite, got {0}")]
    InvalidFrameDt(f64),
    #[error("no model named {0:?}")]
    UnknownModel(String),
}

impl SceneConfig {
    /// Reads and validates a scene document.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let payload = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_json_str(&payload)?;
        info!(
            path = %path.display(),
            models = config.model_count(),
            labels = config.labels.len(),
            paths = config.patrol_paths.len(),
            "scene config loaded"
        );
        Ok(config)
    }

    pub fn from_json_str(payload: &str) -> Result<Self, ConfigError> {
        let config: SceneConfig = serde_json::from_str(payload)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json_string(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();
        let payload = self.to_json_string()?;
        fs::write(path, payload).map_err(|source| ConfigError::Write {
            path: path.to_path_buf(),
            source,
        })?;
        debug!(path = %path.display(), "scene config saved");
        Ok(())
    }

    /// Cross-reference checks serde cannot express.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.frame_dt_s.is_finite() && self.frame_dt_s > 0.0) {
            return Err(ConfigError::InvalidFrameDt(self.frame_dt_s));
        }

        for (i, path) in self.patrol_paths.iter().enumerate() {
            if self.patrol_paths[..i].iter().any(|p| p.name == path.name) {
                return Err(ConfigError::DuplicatePatrolPath(path.name.clone()));
            }
        }

        for model in &self.models.patrol {
            let Some(assignment) = &model.spec().patrol else {
                continue;
            };
            if self.patrol_path(&assignment.path).is_none() {
                return Err(ConfigError::UnknownPatrolPath {
                    model: model.name().to_string(),
                    path: assignment.path.clone(),
                });
            }
        }
        Ok(())
    }

    pub fn model_count(&self) -> usize {
        self.models.simple.len() + self.models.detailed.len() + self.models.patrol.len()
    }
}

use crate::{
    command::PulumiCommand,
    error::{Error, Result},
};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

pub const CONFIG_FILE_NAMES: [&str; 2] = [".pulumi-actions.json", "pulumi-actions.json"];

/// What the passthrough action does when the external tool fails
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailurePolicy {
    /// Non-zero exit fails the action, like every other action
    #[default]
    Propagate,
    /// Log stderr and the failure, then report success
    Log,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", default)]
pub struct Settings {
    /// Binary invoked for every external call
    pub pulumi_binary: String,

    /// Extra environment passed to every subprocess
    #[serde(skip_serializing_if = "IndexMap::is_empty")]
    pub env: IndexMap<String, String>,

    /// Reveal secret values in `up` output and output read-back
    pub show_secrets: bool,

    pub passthrough_failures: FailurePolicy,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            pulumi_binary: "pulumi".to_string(),
            env: IndexMap::new(),
            show_secrets: true,
            passthrough_failures: FailurePolicy::default(),
        }
    }
}

impl Settings {
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let settings = serde_json::from_str(&contents).map_err(|e| {
            Error::ConfigError(format!("Failed to parse {}: {e}", path.display()))
        })?;
        Ok(settings)
    }

    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        let contents = serde_json::to_string_pretty(self)
            .map_err(|e| Error::ConfigError(format!("Failed to serialize settings: {e}")))?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    /// Walk up from `start_path` looking for a settings file
    pub fn find_config_file(start_path: &Path) -> Option<PathBuf> {
        let mut current = start_path;

        loop {
            for name in CONFIG_FILE_NAMES {
                let config_path = current.join(name);
                if config_path.is_file() {
                    return Some(config_path);
                }
            }

            current = current.parent()?;
        }
    }

    /// Settings for a workspace: the nearest settings file, or defaults
    pub fn load_for_workspace(workspace: &Path) -> Result<Self> {
        match Self::find_config_file(workspace) {
            Some(path) => {
                debug!("Loading settings from {}", path.display());
                Self::load_from_file(&path)
            }
            None => {
                debug!("No settings file above {}, using defaults", workspace.display());
                Ok(Self::default())
            }
        }
    }

    /// A command for the configured binary, carrying the configured environment
    pub fn command(&self, args: Vec<String>) -> PulumiCommand {
        PulumiCommand::new(self.pulumi_binary.clone(), args).with_envs(&self.env)
    }
}

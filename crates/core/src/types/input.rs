use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Key/value configuration as supplied by the template. Insertion order is
/// kept so config calls are issued in the order the keys were written.
pub type ConfigMap = IndexMap<String, Option<String>>;

/// Flat input record handed to an action by the template engine.
///
/// Every action reads the subset of fields its schema declares; the record is
/// never mutated once deserialized.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ActionInput {
    pub new: bool,
    pub up: bool,
    pub destroy: bool,
    pub deployment: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub template: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stack: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub stacks: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub organization: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub repo_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub repo_branch: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub repo_project_path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub folder: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub command: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub args: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub outputs: Vec<String>,

    #[serde(skip_serializing_if = "IndexMap::is_empty")]
    pub config: ConfigMap,
    #[serde(skip_serializing_if = "IndexMap::is_empty")]
    pub secret_config: ConfigMap,
}

impl ActionInput {
    /// Deserialize an input record from the raw JSON the template produced.
    /// A malformed document is the caller's fault, so it surfaces as an
    /// input error.
    pub fn from_value(value: serde_json::Value) -> Result<Self> {
        serde_json::from_value(value)
            .map_err(|e| Error::InputError(format!("Invalid action input: {e}")))
    }

    /// Returns the field when it is present and non-empty
    pub fn non_empty(field: &Option<String>) -> Option<&str> {
        field.as_deref().filter(|value| !value.is_empty())
    }

    /// Caller-supplied extra arguments with empty entries dropped, order kept
    pub fn extra_args(&self) -> impl Iterator<Item = &str> {
        self.args.iter().map(String::as_str).filter(|arg| !arg.is_empty())
    }

    /// Plain and secret configuration for this input
    pub fn config_set(&self) -> ConfigSet {
        ConfigSet {
            plain: self.config.clone(),
            secret: self.secret_config.clone(),
        }
    }
}

/// A single `config set` call to issue
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigEntry {
    pub key: String,
    pub value: String,
    pub secret: bool,
}

/// Plain and secret configuration maps applied to a stack
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfigSet {
    pub plain: ConfigMap,
    pub secret: ConfigMap,
}

impl ConfigSet {
    /// Entries to apply: all plain keys in insertion order, then all secret
    /// keys in insertion order. Keys with a null value are skipped.
    pub fn entries(&self) -> impl Iterator<Item = ConfigEntry> + '_ {
        let plain = self.plain.iter().map(|(k, v)| (k, v, false));
        let secret = self.secret.iter().map(|(k, v)| (k, v, true));

        plain.chain(secret).filter_map(|(key, value, secret)| {
            value.as_ref().map(|value| ConfigEntry {
                key: key.clone(),
                value: value.clone(),
                secret,
            })
        })
    }
}

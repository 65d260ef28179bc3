use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Summary of one stack update as recorded in the stack's history
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UpdateSummary {
    pub kind: String,
    pub result: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Operation name (`create`, `same`, `update`, `delete`, ...) to count
    pub resource_changes: IndexMap<String, u64>,
}

/// Result of a successful `up`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UpResult {
    pub summary: UpdateSummary,
    pub outputs: IndexMap<String, serde_json::Value>,
}

/// Named string values an action reports back to the template engine
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ActionOutputs(IndexMap<String, String>);

impl ActionOutputs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an output. JSON strings are stored raw, anything else as
    /// compact JSON text.
    pub fn insert(&mut self, name: impl Into<String>, value: &serde_json::Value) {
        let rendered = match value {
            serde_json::Value::String(s) => s.clone(),
            other => other.to_string(),
        };
        self.0.insert(name.into(), rendered);
    }

    /// Record an output that is already rendered text
    pub fn insert_text(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.0.insert(name.into(), value.into());
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn extend(&mut self, other: ActionOutputs) {
        self.0.extend(other.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_summary_from_history_entry() {
        let summary: UpdateSummary = serde_json::from_value(json!({
            "kind": "update",
            "startTime": "2024-01-01T00:00:00Z",
            "message": "",
            "result": "succeeded",
            "resourceChanges": {"create": 3, "same": 1}
        }))
        .unwrap();

        assert_eq!(summary.kind, "update");
        assert_eq!(summary.result, "succeeded");
        assert_eq!(summary.resource_changes.get("create"), Some(&3));
        assert_eq!(summary.resource_changes.get("same"), Some(&1));
    }

    #[test]
    fn test_outputs_render_values() {
        let mut outputs = ActionOutputs::new();
        outputs.insert("url", &json!("https://example.com"));
        outputs.insert("replicas", &json!(3));
        outputs.insert("tags", &json!({"env": "dev"}));

        assert_eq!(outputs.get("url"), Some("https://example.com"));
        assert_eq!(outputs.get("replicas"), Some("3"));
        assert_eq!(outputs.get("tags"), Some(r#"{"env":"dev"}"#));
        assert_eq!(
            serde_json::to_string(&outputs).unwrap(),
            r#"{"url":"https://example.com","replicas":"3","tags":"{\"env\":\"dev\"}"}"#
        );
    }
}

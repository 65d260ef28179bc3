//! JSON schema fragments for action inputs

use serde_json::{json, Map, Value};

pub fn boolean(title: &str, description: &str) -> Value {
    json!({"title": title, "description": description, "type": "boolean"})
}

pub fn string(title: &str, description: &str) -> Value {
    json!({"title": title, "description": description, "type": "string"})
}

pub fn string_array(title: &str, description: &str) -> Value {
    json!({
        "title": title,
        "description": description,
        "type": "array",
        "items": {"type": "string"}
    })
}

pub fn string_map(title: &str, description: &str) -> Value {
    json!({
        "title": title,
        "description": description,
        "type": "object",
        "additionalProperties": {"type": ["string", "null"]}
    })
}

/// Object schema over the named properties
pub fn object(required: &[&str], properties: Vec<(&str, Value)>) -> Value {
    let properties: Map<String, Value> = properties
        .into_iter()
        .map(|(name, schema)| (name.to_string(), schema))
        .collect();

    let mut schema = json!({"type": "object", "properties": properties});
    if !required.is_empty() {
        schema["required"] = json!(required);
    }
    schema
}

pub fn stack() -> Value {
    string("Pulumi stack", "The Pulumi stack to use")
}

pub fn organization() -> Value {
    string(
        "Pulumi organization",
        "The Pulumi organization to use for the Pulumi commands",
    )
}

pub fn project_name() -> Value {
    string("Pulumi project name", "The Pulumi project name to use")
}

pub fn config() -> Value {
    string_map("Pulumi project config", "The Pulumi project config to use")
}

pub fn secret_config() -> Value {
    string_map(
        "Pulumi project secret config",
        "The Pulumi project secret config to use",
    )
}

pub fn args() -> Value {
    string_array("Pulumi command arguments", "The Pulumi command arguments to run")
}

pub fn outputs() -> Value {
    string_array("Pulumi project outputs", "The Pulumi project outputs to return")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_object_lists_required_fields() {
        let schema = object(&["command"], vec![("command", string("Command", "Command"))]);
        assert_eq!(schema["required"], json!(["command"]));
        assert_eq!(schema["properties"]["command"]["type"], "string");

        let open = object(&[], vec![("stack", stack())]);
        assert!(open.get("required").is_none());
    }
}

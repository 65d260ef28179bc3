use anyhow::Result;
use pulumi_actions_core::{Action, ActionOutputs};

/// Print outputs as a JSON object on stdout
pub fn print_outputs(outputs: &ActionOutputs) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(outputs)?);
    Ok(())
}

pub fn print_action(action: &dyn Action, verbose: bool) {
    println!("{:<18} {}", action.id(), action.description());

    if verbose {
        let schema = action.schema();
        for (field, kind) in schema_fields(&schema) {
            println!("   • {field}: {kind}");
        }
        println!();
    }
}

/// `(name, type)` for each property of an object schema, with required
/// fields marked
pub fn schema_fields(schema: &serde_json::Value) -> Vec<(String, String)> {
    let required: Vec<&str> = schema["required"]
        .as_array()
        .map(|items| items.iter().filter_map(|v| v.as_str()).collect())
        .unwrap_or_default();

    schema["properties"]
        .as_object()
        .map(|properties| {
            properties
                .iter()
                .map(|(name, property)| {
                    let mut kind = property["type"].as_str().unwrap_or("any").to_string();
                    if required.contains(&name.as_str()) {
                        kind.push_str(" (required)");
                    }
                    (name.clone(), kind)
                })
                .collect()
        })
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pulumi_actions_core::actions::RunAction;

    #[test]
    fn test_schema_fields_mark_required() {
        let fields = schema_fields(&RunAction.schema());
        assert_eq!(
            fields,
            vec![
                ("command".to_string(), "string (required)".to_string()),
                ("args".to_string(), "array".to_string()),
            ]
        );
    }
}

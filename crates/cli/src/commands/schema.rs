use anyhow::{Result, anyhow};
use pulumi_actions_core::ActionRegistry;

pub fn schema_command(id: &str) -> Result<()> {
    let registry = ActionRegistry::with_builtin();
    let action = registry.get(id).ok_or_else(|| {
        anyhow!(
            "Unknown action: {id} (available: {})",
            registry.ids().join(", ")
        )
    })?;

    println!("{}", serde_json::to_string_pretty(&action.schema())?);
    Ok(())
}

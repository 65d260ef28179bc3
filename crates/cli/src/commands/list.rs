use anyhow::Result;
use pulumi_actions_core::ActionRegistry;

use crate::display::print_action;

pub fn list_command(verbose: bool) -> Result<()> {
    let registry = ActionRegistry::with_builtin();
    for action in registry.iter() {
        print_action(action, verbose);
    }
    Ok(())
}

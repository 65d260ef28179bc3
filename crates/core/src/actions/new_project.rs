use super::{schema, Action, ActionContext};
use crate::{
    command::args,
    error::Result,
    types::{ActionInput, StackIdentifier},
    validation,
};
use std::path::Path;
use tracing::info;

/// `pulumi:new`: scaffold a project from a template and configure its stack
pub struct NewProjectAction;

impl Action for NewProjectAction {
    fn id(&self) -> &'static str {
        "pulumi:new"
    }

    fn description(&self) -> &'static str {
        "Creates a new Pulumi project"
    }

    fn schema(&self) -> serde_json::Value {
        schema::object(
            &[],
            vec![
                (
                    "template",
                    schema::string(
                        "Pulumi template",
                        "The Pulumi template to use, this can be a built-in template or a URL to a template",
                    ),
                ),
                ("stack", schema::stack()),
                ("organization", schema::organization()),
                ("name", schema::project_name()),
                (
                    "description",
                    schema::string(
                        "Pulumi project description",
                        "The Pulumi project description to use",
                    ),
                ),
                ("config", schema::config()),
                ("secretConfig", schema::secret_config()),
                ("args", schema::args()),
                (
                    "folder",
                    schema::string("The folder to run Pulumi in", "The folder to run Pulumi in"),
                ),
            ],
        )
    }

    fn handle(&self, ctx: &mut ActionContext, input: &ActionInput) -> Result<()> {
        validation::new_project_rules().validate(input)?;

        let stack = StackIdentifier::new(
            ActionInput::non_empty(&input.organization).unwrap_or_default(),
            ActionInput::non_empty(&input.stack).unwrap_or_default(),
        );
        info!("Creating stack {}...", stack);

        bootstrap_project(
            ctx,
            input,
            &stack,
            ActionInput::non_empty(&input.folder),
            true,
        )
    }
}

/// Run `pulumi new` from the workspace root into `folder`, then set each
/// config key on the new stack. Plain keys go first, then secret keys; the
/// first failing call aborts the rest and nothing already set is undone.
pub(crate) fn bootstrap_project(
    ctx: &ActionContext,
    input: &ActionInput,
    stack: &StackIdentifier,
    folder: Option<&str>,
    apply_config: bool,
) -> Result<()> {
    let command = ctx.command(args::new_project_args(input, stack, folder));
    ctx.execute_checked(&command)?;

    if !apply_config {
        return Ok(());
    }

    for entry in input.config_set().entries() {
        let (config_args, value_index) =
            args::config_set_args(&entry, stack, folder.map(Path::new));
        let mut command = ctx.command(config_args);
        if entry.secret {
            command = command.with_redacted_arg(value_index);
        }
        ctx.execute_checked(&command)?;
    }

    Ok(())
}

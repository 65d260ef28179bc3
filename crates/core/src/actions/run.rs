use super::{schema, Action, ActionContext};
use crate::{
    config::FailurePolicy,
    error::Result,
    types::ActionInput,
    validation,
};
use tracing::{error, info, warn};

/// `run:pulumi`: pass an arbitrary subcommand straight to the tool.
///
/// The command token is split on whitespace and handed over together with the
/// arguments as an argument vector; nothing is interpreted by a shell.
pub struct RunAction;

impl Action for RunAction {
    fn id(&self) -> &'static str {
        "run:pulumi"
    }

    fn description(&self) -> &'static str {
        "Runs an arbitrary Pulumi CLI command"
    }

    fn schema(&self) -> serde_json::Value {
        schema::object(
            &["command"],
            vec![
                (
                    "command",
                    schema::string("Pulumi command", "The Pulumi command to run"),
                ),
                ("args", schema::args()),
            ],
        )
    }

    fn handle(&self, ctx: &mut ActionContext, input: &ActionInput) -> Result<()> {
        validation::run_rules().validate(input)?;

        let args: Vec<String> = input
            .command
            .as_deref()
            .unwrap_or_default()
            .split_whitespace()
            .chain(input.extra_args())
            .map(str::to_string)
            .collect();
        let command = ctx.command(args);
        info!("Running Pulumi command: {}", command.to_shell_command());

        let policy = ctx.settings().passthrough_failures;
        let output = match ctx.execute(&command) {
            Ok(output) => output,
            Err(e) if policy == FailurePolicy::Log => {
                error!("error: {e}");
                return Ok(());
            }
            Err(e) => return Err(e),
        };

        if !output.stderr.trim().is_empty() {
            error!("stderr: {}", output.stderr.trim_end());
        }
        info!("stdout: {}", output.stdout.trim_end());

        match output.ensure_success(&command) {
            Ok(_) => Ok(()),
            Err(e) if policy == FailurePolicy::Log => {
                error!("error: {e}");
                warn!("Ignoring failure of `{}`", command.to_shell_command());
                Ok(())
            }
            Err(e) => Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::CommandOutput;
    use crate::config::Settings;
    use crate::error::Error;
    use crate::testing::RecordingExecutor;
    use serde_json::json;
    use std::sync::Arc;

    fn failing_executor() -> Arc<RecordingExecutor> {
        let executor = Arc::new(RecordingExecutor::new());
        executor.respond_to("stack rm", CommandOutput {
            code: Some(255),
            stdout: String::new(),
            stderr: "error: stack has resources".into(),
        });
        executor
    }

    fn input() -> ActionInput {
        ActionInput::from_value(json!({"command": "stack rm", "args": ["dev", "", "--yes"]})).unwrap()
    }

    #[test]
    fn test_command_passed_as_argument_vector() {
        let executor = Arc::new(RecordingExecutor::new());
        let mut ctx = ActionContext::new("/work", Settings::default(), executor.clone());
        let input = ActionInput::from_value(json!({
            "command": "stack tag set",
            "args": ["owner", "a; rm -rf /"]
        }))
        .unwrap();

        RunAction.handle(&mut ctx, &input).unwrap();

        let commands = executor.commands();
        assert_eq!(commands[0].program, "pulumi");
        assert_eq!(
            commands[0].args,
            vec!["stack", "tag", "set", "owner", "a; rm -rf /"]
        );
    }

    #[test]
    fn test_failure_propagates_by_default() {
        let executor = failing_executor();
        let mut ctx = ActionContext::new("/work", Settings::default(), executor.clone());

        let err = RunAction.handle(&mut ctx, &input()).unwrap_err();

        assert!(matches!(err, Error::CommandFailed { .. }));
        assert_eq!(executor.commands()[0].args, vec!["stack", "rm", "dev", "--yes"]);
    }

    #[test]
    fn test_failure_logged_only_when_configured() {
        let executor = failing_executor();
        let settings = Settings {
            passthrough_failures: FailurePolicy::Log,
            ..Default::default()
        };
        let mut ctx = ActionContext::new("/work", settings, executor.clone());

        assert!(RunAction.handle(&mut ctx, &input()).is_ok());
        assert_eq!(executor.commands().len(), 1);
    }

    #[test]
    fn test_missing_command_is_input_error() {
        let executor = Arc::new(RecordingExecutor::new());
        let mut ctx = ActionContext::new("/work", Settings::default(), executor.clone());

        let err = RunAction
            .handle(&mut ctx, &ActionInput::default())
            .unwrap_err();

        assert!(err.is_input_error());
        assert!(executor.commands().is_empty());
    }
}

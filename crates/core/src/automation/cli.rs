use super::{AutomationClient, UpOptions};
use crate::{
    command::{args, CommandExecutor, CommandOutput, PulumiCommand},
    config::Settings,
    error::{Error, Result},
    logging::LogSink,
    types::{ConfigEntry, StackHandle, StackIdentifier, StackLocation, UpResult, UpdateSummary},
};
use indexmap::IndexMap;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::debug;

/// Automation client backed by the Pulumi CLI. Every call runs from the
/// workspace root; local stacks are additionally addressed with `--cwd`.
pub struct CliAutomation {
    executor: Arc<dyn CommandExecutor>,
    settings: Settings,
    workspace: PathBuf,
}

impl CliAutomation {
    pub fn new(
        executor: Arc<dyn CommandExecutor>,
        settings: Settings,
        workspace: impl Into<PathBuf>,
    ) -> Self {
        Self {
            executor,
            settings,
            workspace: workspace.into(),
        }
    }

    fn run(&self, command: PulumiCommand, sink: Option<&dyn LogSink>) -> Result<CommandOutput> {
        let command = command.with_working_dir(self.workspace.clone());
        debug!("Running: {}", command.to_shell_command());
        self.executor
            .execute(&command, sink)?
            .ensure_success(&command)
    }

    fn outputs(&self, stack: &StackHandle, show_secrets: bool) -> Result<IndexMap<String, serde_json::Value>> {
        let command = self.settings.command(args::stack_output_args(
            &stack.name,
            &stack.location,
            show_secrets,
        ));
        let output = self.run(command, None)?;
        parse_outputs(&output.stdout)
    }

    fn latest_summary(&self, stack: &StackHandle, show_secrets: bool) -> Result<UpdateSummary> {
        let command = self.settings.command(args::stack_history_args(
            &stack.name,
            &stack.location,
            show_secrets,
        ));
        let output = self.run(command, None)?;
        parse_latest_summary(&output.stdout)
    }
}

impl AutomationClient for CliAutomation {
    fn create_or_select_stack(
        &self,
        name: &StackIdentifier,
        location: &StackLocation,
    ) -> Result<StackHandle> {
        let command = self
            .settings
            .command(args::select_stack_args(name, location));
        self.run(command, None)?;
        Ok(StackHandle::new(name.clone(), location.clone()))
    }

    fn set_config(&self, stack: &StackHandle, entry: &ConfigEntry) -> Result<()> {
        let cwd = match &stack.location {
            StackLocation::Local { work_dir } => Some(work_dir.as_path()),
            StackLocation::Remote { .. } => None,
        };
        let (config_args, value_index) = args::config_set_args(entry, &stack.name, cwd);

        let mut command = self.settings.command(config_args);
        if entry.secret {
            command = command.with_redacted_arg(value_index);
        }
        self.run(command, None)?;
        Ok(())
    }

    fn refresh(&self, stack: &StackHandle, sink: &dyn LogSink) -> Result<()> {
        let command = self
            .settings
            .command(args::refresh_args(&stack.name, &stack.location));
        self.run(command, Some(sink))?;
        Ok(())
    }

    fn destroy(&self, stack: &StackHandle, sink: &dyn LogSink) -> Result<()> {
        let command = self
            .settings
            .command(args::destroy_args(&stack.name, &stack.location));
        self.run(command, Some(sink))?;
        Ok(())
    }

    fn up(&self, stack: &StackHandle, options: &UpOptions, sink: &dyn LogSink) -> Result<UpResult> {
        let command = self.settings.command(args::up_args(
            &stack.name,
            &stack.location,
            options.show_secrets,
        ));
        self.run(command, Some(sink))?;

        let outputs = self.outputs(stack, options.show_secrets)?;
        let summary = self.latest_summary(stack, options.show_secrets)?;

        Ok(UpResult { summary, outputs })
    }
}

/// Parse `stack output --json`. Empty output (a dry run) means no outputs.
fn parse_outputs(stdout: &str) -> Result<IndexMap<String, serde_json::Value>> {
    if stdout.trim().is_empty() {
        return Ok(IndexMap::new());
    }
    serde_json::from_str(stdout)
        .map_err(|e| Error::AutomationError(format!("Unreadable stack outputs: {e}")))
}

/// Parse `stack history --json --page-size 1`, newest entry first
fn parse_latest_summary(stdout: &str) -> Result<UpdateSummary> {
    if stdout.trim().is_empty() {
        return Ok(UpdateSummary::default());
    }
    let history: Vec<UpdateSummary> = serde_json::from_str(stdout)
        .map_err(|e| Error::AutomationError(format!("Unreadable stack history: {e}")))?;
    Ok(history.into_iter().next().unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{RecordingExecutor, RecordingSink};
    use serde_json::json;

    fn handle() -> StackHandle {
        StackHandle::new(
            StackIdentifier::fully_qualified("acme", Some("web"), "dev"),
            StackLocation::local("/work/web"),
        )
    }

    fn client(executor: &Arc<RecordingExecutor>) -> CliAutomation {
        CliAutomation::new(executor.clone(), Settings::default(), "/work")
    }

    #[test]
    fn test_create_or_select_returns_handle() {
        let executor = Arc::new(RecordingExecutor::new());
        let name = StackIdentifier::fully_qualified("acme", Some("web"), "dev");
        let location = StackLocation::local("/work/web");

        let stack = client(&executor)
            .create_or_select_stack(&name, &location)
            .unwrap();

        assert_eq!(stack, StackHandle::new(name, location));
        assert_eq!(
            executor.command_lines(),
            vec!["pulumi stack select --create --stack acme/web/dev --non-interactive --cwd /work/web"]
        );
    }

    #[test]
    fn test_up_reads_outputs_and_summary() {
        let executor = Arc::new(RecordingExecutor::new());
        executor.respond_to("up", CommandOutput {
            code: Some(0),
            stdout: "Updating (acme/web/dev)\nResources:\n    + 2 created\n".into(),
            stderr: String::new(),
        });
        executor.respond_to("stack output", CommandOutput {
            code: Some(0),
            stdout: json!({"url": "https://web.example.com", "port": 443}).to_string(),
            stderr: String::new(),
        });
        executor.respond_to("stack history", CommandOutput {
            code: Some(0),
            stdout: json!([{"kind": "update", "result": "succeeded", "resourceChanges": {"create": 2}}])
                .to_string(),
            stderr: String::new(),
        });
        let sink = RecordingSink::default();

        let result = client(&executor)
            .up(&handle(), &UpOptions::default(), &sink)
            .unwrap();

        assert_eq!(result.outputs.get("url"), Some(&json!("https://web.example.com")));
        assert_eq!(result.outputs.get("port"), Some(&json!(443)));
        assert_eq!(result.summary.resource_changes.get("create"), Some(&2));
        assert_eq!(
            sink.lines(),
            vec!["Updating (acme/web/dev)", "Resources:", "    + 2 created"]
        );
        assert_eq!(executor.command_lines().len(), 3);
    }

    #[test]
    fn test_secret_config_value_is_redacted() {
        let executor = Arc::new(RecordingExecutor::new());
        let entry = ConfigEntry {
            key: "db:password".into(),
            value: "hunter2".into(),
            secret: true,
        };

        client(&executor).set_config(&handle(), &entry).unwrap();

        let commands = executor.commands();
        assert_eq!(commands[0].args[3], "hunter2");
        assert_eq!(
            commands[0].to_shell_command(),
            "pulumi config set db:password [secret] --stack acme/web/dev --secret --non-interactive --cwd /work/web"
        );
    }

    #[test]
    fn test_remote_calls_run_from_workspace() {
        let executor = Arc::new(RecordingExecutor::new());
        let client = client(&executor);
        let name = StackIdentifier::fully_qualified("acme", Some("web"), "dev");
        let location = StackLocation::remote("https://github.com/acme/infra", "main", "web");
        let entry = ConfigEntry {
            key: "aws:region".into(),
            value: "eu-west-1".into(),
            secret: false,
        };

        let stack = client.create_or_select_stack(&name, &location).unwrap();
        client.set_config(&stack, &entry).unwrap();
        client.refresh(&stack, &RecordingSink::default()).unwrap();
        client
            .up(&stack, &UpOptions::default(), &RecordingSink::default())
            .unwrap();

        let commands = executor.commands();
        assert_eq!(commands.len(), 6);
        assert!(
            commands
                .iter()
                .all(|c| c.working_dir() == Some(std::path::Path::new("/work")))
        );
        assert!(!commands[0].args.contains(&"--cwd".to_string()));
    }

    #[test]
    fn test_failed_refresh_is_command_failure() {
        let executor = Arc::new(RecordingExecutor::new());
        executor.respond_to("refresh", CommandOutput {
            code: Some(1),
            stdout: String::new(),
            stderr: "error: no Pulumi.yaml project file found".into(),
        });

        let err = client(&executor)
            .refresh(&handle(), &RecordingSink::default())
            .unwrap_err();

        assert!(matches!(err, Error::CommandFailed { .. }));
        assert!(err.to_string().contains("no Pulumi.yaml"));
    }

    #[test]
    fn test_empty_read_back_yields_defaults() {
        assert!(parse_outputs("").unwrap().is_empty());
        assert_eq!(parse_latest_summary("  \n").unwrap(), UpdateSummary::default());
        assert_eq!(parse_latest_summary("[]").unwrap(), UpdateSummary::default());
        assert!(matches!(
            parse_outputs("not json"),
            Err(Error::AutomationError(_))
        ));
    }
}

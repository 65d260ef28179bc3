use crate::{
    automation::{AutomationClient, CliAutomation, UpOptions},
    command::{CommandExecutor, CommandOutput, PulumiCommand},
    config::Settings,
    error::Result,
    logging::{LogSink, TracingSink},
    types::ActionOutputs,
};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::info;

/// Everything an action may touch during one invocation
pub struct ActionContext {
    workspace_path: PathBuf,
    settings: Settings,
    executor: Arc<dyn CommandExecutor>,
    automation: Arc<dyn AutomationClient>,
    sink: Arc<dyn LogSink>,
    outputs: ActionOutputs,
}

impl ActionContext {
    /// Context whose automation layer drives the CLI through `executor`
    pub fn new(
        workspace_path: impl Into<PathBuf>,
        settings: Settings,
        executor: Arc<dyn CommandExecutor>,
    ) -> Self {
        let workspace_path: PathBuf = workspace_path.into();
        let automation = Arc::new(CliAutomation::new(
            executor.clone(),
            settings.clone(),
            workspace_path.clone(),
        ));
        Self {
            workspace_path,
            settings,
            executor,
            automation,
            sink: Arc::new(TracingSink),
            outputs: ActionOutputs::new(),
        }
    }

    pub fn with_automation(mut self, automation: Arc<dyn AutomationClient>) -> Self {
        self.automation = automation;
        self
    }

    pub fn with_sink(mut self, sink: Arc<dyn LogSink>) -> Self {
        self.sink = sink;
        self
    }

    pub fn workspace_path(&self) -> &Path {
        &self.workspace_path
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn automation(&self) -> &dyn AutomationClient {
        self.automation.as_ref()
    }

    pub fn sink(&self) -> &dyn LogSink {
        self.sink.as_ref()
    }

    pub fn up_options(&self) -> UpOptions {
        UpOptions {
            show_secrets: self.settings.show_secrets,
        }
    }

    /// A command for the configured binary, run from the workspace root
    pub fn command(&self, args: Vec<String>) -> PulumiCommand {
        self.settings
            .command(args)
            .with_working_dir(self.workspace_path.clone())
    }

    /// Run a command, forwarding its stdout to the sink. The exit status is
    /// left for the caller to judge.
    pub fn execute(&self, command: &PulumiCommand) -> Result<CommandOutput> {
        info!(
            "Running \"{}\" in {}",
            command.to_shell_command(),
            self.workspace_path.display()
        );
        self.executor.execute(command, Some(self.sink.as_ref()))
    }

    /// Run a command and fail on a non-zero exit
    pub fn execute_checked(&self, command: &PulumiCommand) -> Result<CommandOutput> {
        self.execute(command)?.ensure_success(command)
    }

    pub fn publish(&mut self, outputs: ActionOutputs) {
        self.outputs.extend(outputs);
    }

    pub fn outputs(&self) -> &ActionOutputs {
        &self.outputs
    }
}

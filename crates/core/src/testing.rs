//! Recording fakes shared by unit tests

use crate::{
    automation::{AutomationClient, UpOptions},
    command::{CommandExecutor, CommandOutput, PulumiCommand},
    error::{Error, Result},
    logging::LogSink,
    types::{
        ConfigEntry, StackHandle, StackIdentifier, StackLocation, UpResult, UpdateSummary,
    },
};
use indexmap::IndexMap;
use std::sync::Mutex;

#[derive(Default)]
pub struct RecordingSink {
    lines: Mutex<Vec<String>>,
}

impl RecordingSink {
    pub fn lines(&self) -> Vec<String> {
        self.lines.lock().unwrap().clone()
    }
}

impl LogSink for RecordingSink {
    fn line(&self, line: &str) {
        self.lines.lock().unwrap().push(line.to_string());
    }
}

/// Records every command and answers with scripted output, matched by the
/// leading arguments. Unmatched commands succeed with empty output.
#[derive(Default)]
pub struct RecordingExecutor {
    commands: Mutex<Vec<PulumiCommand>>,
    responses: Mutex<Vec<(String, CommandOutput)>>,
}

impl RecordingExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond_to(&self, prefix: &str, output: CommandOutput) {
        self.responses
            .lock()
            .unwrap()
            .push((prefix.to_string(), output));
    }

    pub fn commands(&self) -> Vec<PulumiCommand> {
        self.commands.lock().unwrap().clone()
    }

    pub fn command_lines(&self) -> Vec<String> {
        self.commands()
            .iter()
            .map(PulumiCommand::to_shell_command)
            .collect()
    }
}

impl CommandExecutor for RecordingExecutor {
    fn execute(&self, command: &PulumiCommand, sink: Option<&dyn LogSink>) -> Result<CommandOutput> {
        self.commands.lock().unwrap().push(command.clone());

        let joined = command.args.join(" ");
        let output = self
            .responses
            .lock()
            .unwrap()
            .iter()
            .find(|(prefix, _)| joined.starts_with(prefix.as_str()))
            .map(|(_, output)| output.clone())
            .unwrap_or(CommandOutput {
                code: Some(0),
                ..Default::default()
            });

        if let Some(sink) = sink {
            for line in output.stdout.lines() {
                sink.line(line);
            }
        }

        Ok(output)
    }
}

/// Automation client that records calls as `"<op> <stack>[ detail]"`
#[derive(Default)]
pub struct FakeAutomation {
    calls: Mutex<Vec<String>>,
    fail_on: Option<String>,
    outputs: IndexMap<String, serde_json::Value>,
}

impl FakeAutomation {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail the call whose recorded form equals `call`
    pub fn failing_on(mut self, call: &str) -> Self {
        self.fail_on = Some(call.to_string());
        self
    }

    pub fn with_output(mut self, name: &str, value: serde_json::Value) -> Self {
        self.outputs.insert(name.to_string(), value);
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: String) -> Result<()> {
        self.calls.lock().unwrap().push(call.clone());
        if self.fail_on.as_deref() == Some(call.as_str()) {
            return Err(Error::AutomationError(format!("{call} failed")));
        }
        Ok(())
    }
}

impl AutomationClient for FakeAutomation {
    fn create_or_select_stack(
        &self,
        name: &StackIdentifier,
        location: &StackLocation,
    ) -> Result<StackHandle> {
        self.record(format!("select {name}"))?;
        Ok(StackHandle::new(name.clone(), location.clone()))
    }

    fn set_config(&self, stack: &StackHandle, entry: &ConfigEntry) -> Result<()> {
        let kind = if entry.secret { "secret" } else { "plain" };
        self.record(format!(
            "config {} {}={} {kind}",
            stack.name, entry.key, entry.value
        ))
    }

    fn refresh(&self, stack: &StackHandle, sink: &dyn LogSink) -> Result<()> {
        self.record(format!("refresh {}", stack.name))?;
        sink.line(&format!("Refreshing ({})", stack.name));
        Ok(())
    }

    fn destroy(&self, stack: &StackHandle, _sink: &dyn LogSink) -> Result<()> {
        self.record(format!("destroy {}", stack.name))
    }

    fn up(&self, stack: &StackHandle, _options: &UpOptions, _sink: &dyn LogSink) -> Result<UpResult> {
        self.record(format!("up {}", stack.name))?;
        let mut summary = UpdateSummary {
            kind: "update".to_string(),
            result: "succeeded".to_string(),
            ..Default::default()
        };
        summary.resource_changes.insert("create".to_string(), 1);
        Ok(UpResult {
            summary,
            outputs: self.outputs.clone(),
        })
    }
}

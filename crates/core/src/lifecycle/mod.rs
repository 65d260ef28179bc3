//! Stack lifecycle: create/select, configure, refresh, then destroy or update
//!
//! Every lifecycle action funnels into [`run`]. Stacks are processed strictly
//! in order and the first failure aborts the rest of the plan; nothing is
//! rolled back.

use crate::{
    automation::{AutomationClient, UpOptions},
    error::{Error, Result},
    logging::LogSink,
    types::{ActionOutputs, ConfigSet, StackHandle, StackIdentifier, StackLocation, UpdateSummary},
};
use tracing::{debug, info};

/// The mutually exclusive last step of a lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TerminalAction {
    /// Stop after refresh
    None,
    Destroy,
    Up,
}

impl TerminalAction {
    /// Destroy wins when both flags are set
    pub fn from_flags(destroy: bool, up: bool) -> Self {
        if destroy {
            TerminalAction::Destroy
        } else if up {
            TerminalAction::Up
        } else {
            TerminalAction::None
        }
    }
}

#[derive(Debug, Clone)]
pub struct LifecyclePlan {
    pub stacks: Vec<StackIdentifier>,
    pub location: StackLocation,
    /// Applied to each stack after selection and before refresh
    pub config: Option<ConfigSet>,
    pub terminal: TerminalAction,
    /// Output names to extract after an update
    pub outputs: Vec<String>,
    pub up_options: UpOptions,
}

impl LifecyclePlan {
    pub fn new(stacks: Vec<StackIdentifier>, location: StackLocation) -> Self {
        Self {
            stacks,
            location,
            config: None,
            terminal: TerminalAction::None,
            outputs: Vec::new(),
            up_options: UpOptions::default(),
        }
    }

    pub fn with_config(mut self, config: ConfigSet) -> Self {
        self.config = Some(config);
        self
    }

    pub fn with_terminal(mut self, terminal: TerminalAction) -> Self {
        self.terminal = terminal;
        self
    }

    pub fn with_outputs(mut self, outputs: Vec<String>) -> Self {
        self.outputs = outputs;
        self
    }

    pub fn with_up_options(mut self, options: UpOptions) -> Self {
        self.up_options = options;
        self
    }
}

/// What happened to one stack
#[derive(Debug, Clone, PartialEq)]
pub struct StackReport {
    pub stack: StackIdentifier,
    /// Present only when the stack was updated
    pub summary: Option<UpdateSummary>,
    pub outputs: ActionOutputs,
}

/// Run the plan against every stack in order
pub fn run(
    plan: &LifecyclePlan,
    client: &dyn AutomationClient,
    sink: &dyn LogSink,
) -> Result<Vec<StackReport>> {
    let mut reports = Vec::with_capacity(plan.stacks.len());
    for name in &plan.stacks {
        reports.push(run_stack(plan, name, client, sink)?);
    }
    Ok(reports)
}

fn run_stack(
    plan: &LifecyclePlan,
    name: &StackIdentifier,
    client: &dyn AutomationClient,
    sink: &dyn LogSink,
) -> Result<StackReport> {
    let stack = client.create_or_select_stack(name, &plan.location)?;
    info!("Successfully initialized stack {}", stack.name);

    if let Some(config) = &plan.config {
        apply_config(client, &stack, config)?;
    }

    info!("Refreshing stack {}...", stack.name);
    client.refresh(&stack, sink)?;
    info!("Successfully refreshed stack {}", stack.name);

    let mut report = StackReport {
        stack: stack.name.clone(),
        summary: None,
        outputs: ActionOutputs::new(),
    };

    match plan.terminal {
        TerminalAction::Destroy => {
            info!("Destroying stack {}...", stack.name);
            client.destroy(&stack, sink)?;
            info!("Successfully destroyed stack {}", stack.name);
        }
        TerminalAction::Up => {
            info!("Updating stack {}...", stack.name);
            let result = client.up(&stack, &plan.up_options, sink)?;
            info!(
                "update summary: {}",
                serde_json::to_string_pretty(&result.summary.resource_changes)?
            );

            for output in &plan.outputs {
                let value = result
                    .outputs
                    .get(output)
                    .ok_or_else(|| Error::OutputNotFound(output.clone()))?;
                report.outputs.insert(output.as_str(), value);
            }
            report.summary = Some(result.summary);
        }
        TerminalAction::None => {
            debug!("No terminal action requested for {}", stack.name);
        }
    }

    Ok(report)
}

/// Plain keys then secret keys, one call each; the first failure aborts
fn apply_config(client: &dyn AutomationClient, stack: &StackHandle, config: &ConfigSet) -> Result<()> {
    for entry in config.entries() {
        debug!(
            "Setting {} config {} on {}",
            if entry.secret { "secret" } else { "plaintext" },
            entry.key,
            stack.name
        );
        client.set_config(stack, &entry)?;
    }
    Ok(())
}

//! pulumi-actions - template actions that drive the Pulumi CLI
//!
//! This crate provides:
//! - Actions a scaffolding engine invokes by id (`pulumi:new`, `run:pulumi`,
//!   `pulumi:up`, `pulumi:up:stacks`)
//! - Input validation that runs before any external call
//! - Argument-vector assembly and subprocess execution for the Pulumi CLI
//! - A stack lifecycle (create/select, configure, refresh, destroy or update)
//!   shared by every lifecycle action
pub mod actions;
pub mod automation;
pub mod command;
pub mod config;
pub mod error;
pub mod lifecycle;
pub mod logging;
pub mod types;
pub mod validation;

#[cfg(test)]
pub(crate) mod testing;

// Re-export commonly used types and traits
pub use error::{Error, Result};
pub use types::*;

// Re-export main API components
pub use actions::{Action, ActionContext, ActionRegistry};
pub use automation::{AutomationClient, CliAutomation, UpOptions};
pub use command::{CommandExecutor, CommandOutput, DryRunExecutor, PulumiCommand, SystemExecutor};
pub use config::Settings;
pub use lifecycle::{LifecyclePlan, StackReport, TerminalAction};
pub use logging::{LogSink, NullSink, TracingSink};

//! Automation-layer boundary
//!
//! Stack state, plan computation and resource diffing belong to the external
//! tool. This module only names the operations the lifecycle needs; the
//! default implementation drives the Pulumi CLI.

pub mod cli;

pub use cli::CliAutomation;

use crate::{
    error::Result,
    logging::LogSink,
    types::{ConfigEntry, StackHandle, StackIdentifier, StackLocation, UpResult},
};

/// Options for an update
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UpOptions {
    pub show_secrets: bool,
}

impl Default for UpOptions {
    fn default() -> Self {
        Self { show_secrets: true }
    }
}

/// Stack operations supplied by the automation layer
pub trait AutomationClient: Send + Sync {
    /// Select the stack, creating it first when it does not exist
    fn create_or_select_stack(
        &self,
        name: &StackIdentifier,
        location: &StackLocation,
    ) -> Result<StackHandle>;

    /// Set one configuration value on the stack
    fn set_config(&self, stack: &StackHandle, entry: &ConfigEntry) -> Result<()>;

    /// Sync the stack's view of the real resources
    fn refresh(&self, stack: &StackHandle, sink: &dyn LogSink) -> Result<()>;

    /// Delete every resource the stack tracks
    fn destroy(&self, stack: &StackHandle, sink: &dyn LogSink) -> Result<()>;

    /// Apply the stack's desired state
    fn up(&self, stack: &StackHandle, options: &UpOptions, sink: &dyn LogSink) -> Result<UpResult>;
}

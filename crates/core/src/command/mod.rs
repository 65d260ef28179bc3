//! Building and running external tool invocations

pub mod args;
pub mod executor;
pub mod pulumi_command;

pub use executor::{CommandExecutor, CommandOutput, DryRunExecutor, SystemExecutor};
pub use pulumi_command::PulumiCommand;

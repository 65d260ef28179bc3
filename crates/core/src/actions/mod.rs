//! Template actions and the registry the host engine dispatches through

pub mod context;
pub mod new_project;
pub mod registry;
pub mod run;
pub mod schema;
pub mod up;

pub use context::ActionContext;
pub use new_project::NewProjectAction;
pub use registry::ActionRegistry;
pub use run::RunAction;
pub use up::{UpAction, UpStacksAction};

use crate::{error::Result, types::ActionInput};

/// A unit of work the template engine invokes by id
pub trait Action: Send + Sync {
    /// Identifier the action is registered under, e.g. `pulumi:up`
    fn id(&self) -> &'static str;

    fn description(&self) -> &'static str;

    /// JSON schema of the input object
    fn schema(&self) -> serde_json::Value;

    /// Run the action. Validation happens first; no external call is made
    /// when the input is incomplete.
    fn handle(&self, ctx: &mut ActionContext, input: &ActionInput) -> Result<()>;
}

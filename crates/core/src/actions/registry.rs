use super::{Action, ActionContext, NewProjectAction, RunAction, UpAction, UpStacksAction};
use crate::{
    error::{Error, Result},
    types::ActionInput,
};
use tracing::info;

/// Actions addressable by id
#[derive(Default)]
pub struct ActionRegistry {
    actions: Vec<Box<dyn Action>>,
}

impl ActionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding `pulumi:new`, `run:pulumi`, `pulumi:up` and `pulumi:up:stacks`
    pub fn with_builtin() -> Self {
        let mut registry = Self::new();
        registry.register(Box::new(NewProjectAction));
        registry.register(Box::new(RunAction));
        registry.register(Box::new(UpAction));
        registry.register(Box::new(UpStacksAction));
        registry
    }

    /// Add an action. A later registration under the same id replaces the
    /// earlier one.
    pub fn register(&mut self, action: Box<dyn Action>) {
        self.actions.retain(|existing| existing.id() != action.id());
        self.actions.push(action);
    }

    pub fn get(&self, id: &str) -> Option<&dyn Action> {
        self.actions
            .iter()
            .find(|action| action.id() == id)
            .map(|action| action.as_ref())
    }

    pub fn ids(&self) -> Vec<&'static str> {
        self.actions.iter().map(|action| action.id()).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &dyn Action> {
        self.actions.iter().map(|action| action.as_ref())
    }

    /// Deserialize `input` and hand it to the action registered as `id`
    pub fn execute(
        &self,
        id: &str,
        ctx: &mut ActionContext,
        input: serde_json::Value,
    ) -> Result<()> {
        let action = self
            .get(id)
            .ok_or_else(|| Error::UnknownAction(id.to_string()))?;
        let input = ActionInput::from_value(input)?;

        info!("Executing {} action", action.id());
        info!("Working directory: {}", ctx.workspace_path().display());
        action.handle(ctx, &input)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Settings;
    use crate::testing::RecordingExecutor;
    use serde_json::json;
    use std::sync::Arc;

    #[test]
    fn test_builtin_ids() {
        assert_eq!(
            ActionRegistry::with_builtin().ids(),
            vec!["pulumi:new", "run:pulumi", "pulumi:up", "pulumi:up:stacks"]
        );
    }

    #[test]
    fn test_builtin_descriptions_are_distinct() {
        let registry = ActionRegistry::with_builtin();
        let mut descriptions: Vec<&str> = registry.iter().map(|a| a.description()).collect();
        descriptions.sort_unstable();
        descriptions.dedup();
        assert_eq!(descriptions.len(), registry.ids().len());
    }

    #[test]
    fn test_register_replaces_same_id() {
        let mut registry = ActionRegistry::with_builtin();
        registry.register(Box::new(RunAction));
        assert_eq!(registry.ids().len(), 4);
        assert_eq!(registry.ids().last(), Some(&"run:pulumi"));
    }

    #[test]
    fn test_unknown_action() {
        let executor = Arc::new(RecordingExecutor::new());
        let mut ctx = ActionContext::new("/work", Settings::default(), executor);

        let err = ActionRegistry::with_builtin()
            .execute("pulumi:preview", &mut ctx, json!({}))
            .unwrap_err();

        assert!(matches!(err, Error::UnknownAction(ref id) if id == "pulumi:preview"));
    }

    #[test]
    fn test_execute_dispatches_by_id() {
        let executor = Arc::new(RecordingExecutor::new());
        let mut ctx = ActionContext::new("/work", Settings::default(), executor.clone());

        ActionRegistry::with_builtin()
            .execute("run:pulumi", &mut ctx, json!({"command": "whoami"}))
            .unwrap();

        assert_eq!(executor.command_lines(), vec!["pulumi whoami"]);
    }

    #[test]
    fn test_bad_input_shape_is_input_error() {
        let executor = Arc::new(RecordingExecutor::new());
        let mut ctx = ActionContext::new("/work", Settings::default(), executor.clone());

        let err = ActionRegistry::with_builtin()
            .execute("pulumi:up", &mut ctx, json!({"outputs": "url"}))
            .unwrap_err();

        assert!(err.is_input_error());
        assert!(executor.commands().is_empty());
    }
}

//! Validation rules engine for action inputs
//!
//! Rules run in the order they were added and the first failure wins, so the
//! order of a rule set decides which missing field gets reported.

use crate::error::{Error, Result};
use crate::types::ActionInput;
use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ValidationError {
    #[error("{0}")]
    MissingRequired(String),
}

impl From<ValidationError> for Error {
    fn from(err: ValidationError) -> Self {
        Error::InputError(err.to_string())
    }
}

/// Base trait for validation rules
pub trait ValidationRule: Send + Sync {
    /// Validate the given input
    fn validate(&self, input: &ActionInput) -> std::result::Result<(), ValidationError>;

    /// Get a description of this rule
    fn description(&self) -> &str;

    /// Get the name of this rule
    fn name(&self) -> &str;
}

/// Rule for a field that must always be present and non-empty
pub struct RequiredRule {
    pub name: String,
    pub field: String,
    pub message: String,
}

impl ValidationRule for RequiredRule {
    fn validate(&self, input: &ActionInput) -> std::result::Result<(), ValidationError> {
        if !is_field_active(input, &self.field) {
            return Err(ValidationError::MissingRequired(self.message.clone()));
        }
        Ok(())
    }

    fn description(&self) -> &str {
        &self.message
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Rule for required fields when condition is met
pub struct RequiredIfRule {
    pub name: String,
    pub condition_field: String,
    pub required_field: String,
    pub message: String,
}

impl ValidationRule for RequiredIfRule {
    fn validate(&self, input: &ActionInput) -> std::result::Result<(), ValidationError> {
        let condition_met = is_field_active(input, &self.condition_field);
        let required_present = is_field_active(input, &self.required_field);

        if condition_met && !required_present {
            return Err(ValidationError::MissingRequired(self.message.clone()));
        }

        Ok(())
    }

    fn description(&self) -> &str {
        &self.message
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Rule for a list that must be non-empty and hold no empty entries
pub struct NonEmptyListRule {
    pub name: String,
    pub items: fn(&ActionInput) -> &[String],
    pub message: String,
}

impl ValidationRule for NonEmptyListRule {
    fn validate(&self, input: &ActionInput) -> std::result::Result<(), ValidationError> {
        let items = (self.items)(input);
        if items.is_empty() || items.iter().any(|item| item.is_empty()) {
            return Err(ValidationError::MissingRequired(self.message.clone()));
        }

        Ok(())
    }

    fn description(&self) -> &str {
        &self.message
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Collection of validation rules
#[derive(Default)]
pub struct ValidationRuleSet {
    rules: Vec<Box<dyn ValidationRule>>,
}

impl ValidationRuleSet {
    pub fn new() -> Self {
        Self { rules: vec![] }
    }

    pub fn add_rule(&mut self, rule: Box<dyn ValidationRule>) {
        self.rules.push(rule);
    }

    pub fn rule_names(&self) -> Vec<&str> {
        self.rules.iter().map(|rule| rule.name()).collect()
    }

    pub fn validate(&self, input: &ActionInput) -> Result<()> {
        for rule in &self.rules {
            rule.validate(input)?;
        }
        Ok(())
    }
}

pub const MISSING_STACK: &str = "No Pulumi stack specified, please specify a stack";
pub const MISSING_STACKS: &str =
    "No Pulumi stacks specified, please specify at least one stack";
pub const MISSING_ORGANIZATION: &str =
    "No Pulumi organization specified, please specify an organization";
pub const MISSING_REPO_URL: &str =
    "No Pulumi project repo URL specified, please specify a repo URL";
pub const MISSING_REPO_PROJECT_PATH: &str =
    "No Pulumi project repo project path specified, please specify a repo project path";
pub const MISSING_REPO_BRANCH: &str =
    "No Pulumi project repo branch specified, please specify a repo branch";
pub const MISSING_COMMAND: &str = "No Pulumi command specified, please specify a command";

fn required(name: &str, field: &str, message: &str) -> Box<dyn ValidationRule> {
    Box::new(RequiredRule {
        name: name.to_string(),
        field: field.to_string(),
        message: message.to_string(),
    })
}

fn repo_rules(rules: &mut ValidationRuleSet) {
    rules.add_rule(required("repo_url_required", "repo_url", MISSING_REPO_URL));
    rules.add_rule(required(
        "repo_project_path_required",
        "repo_project_path",
        MISSING_REPO_PROJECT_PATH,
    ));
    // Branch is only meaningful once deployment mode is known
    rules.add_rule(Box::new(RequiredIfRule {
        name: "repo_branch_required_for_deployment".to_string(),
        condition_field: "deployment".to_string(),
        required_field: "repo_branch".to_string(),
        message: MISSING_REPO_BRANCH.to_string(),
    }));
}

/// Rules for project bootstrap: stack, then organization
pub fn new_project_rules() -> ValidationRuleSet {
    let mut rules = ValidationRuleSet::new();
    rules.add_rule(required("stack_required", "stack", MISSING_STACK));
    rules.add_rule(required(
        "organization_required",
        "organization",
        MISSING_ORGANIZATION,
    ));
    rules
}

/// Rules for the single-stack lifecycle:
/// stack, organization, repo URL, repo project path, repo branch
pub fn lifecycle_rules() -> ValidationRuleSet {
    let mut rules = new_project_rules();
    repo_rules(&mut rules);
    rules
}

/// Rules for the multi-stack lifecycle; `stacks` replaces `stack`
pub fn multi_stack_rules() -> ValidationRuleSet {
    let mut rules = ValidationRuleSet::new();
    rules.add_rule(Box::new(NonEmptyListRule {
        name: "stacks_required".to_string(),
        items: stacks,
        message: MISSING_STACKS.to_string(),
    }));
    rules.add_rule(required(
        "organization_required",
        "organization",
        MISSING_ORGANIZATION,
    ));
    repo_rules(&mut rules);
    rules
}

fn stacks(input: &ActionInput) -> &[String] {
    &input.stacks
}

/// Rules for the direct passthrough command
pub fn run_rules() -> ValidationRuleSet {
    let mut rules = ValidationRuleSet::new();
    rules.add_rule(required("command_required", "command", MISSING_COMMAND));
    rules
}

/// Helper function to check if a field is set in the input
fn is_field_active(input: &ActionInput, field: &str) -> bool {
    let text = |value: &Option<String>| ActionInput::non_empty(value).is_some();

    match field {
        "stack" => text(&input.stack),
        "organization" => text(&input.organization),
        "repo_url" => text(&input.repo_url),
        "repo_branch" => text(&input.repo_branch),
        "repo_project_path" => text(&input.repo_project_path),
        "command" => input
            .command
            .as_deref()
            .is_some_and(|command| !command.trim().is_empty()),
        "deployment" => input.deployment,
        _ => false,
    }
}

use super::{new_project::bootstrap_project, schema, Action, ActionContext};
use crate::{
    error::Result,
    lifecycle::{self, LifecyclePlan, StackReport, TerminalAction},
    types::{ActionInput, ActionOutputs, StackIdentifier, StackLocation},
    validation,
};
use tracing::{info, warn};

/// `pulumi:up`: refresh one stack, then destroy or update it
pub struct UpAction;

/// `pulumi:up:stacks`: the same lifecycle over a list of stacks, with
/// configuration applied to each before refresh
pub struct UpStacksAction;

impl Action for UpAction {
    fn id(&self) -> &'static str {
        "pulumi:up"
    }

    fn description(&self) -> &'static str {
        "Refreshes a Pulumi stack, then updates or destroys it"
    }

    fn schema(&self) -> serde_json::Value {
        lifecycle_schema(vec![("stack", schema::stack())])
    }

    fn handle(&self, ctx: &mut ActionContext, input: &ActionInput) -> Result<()> {
        info!("Running Pulumi");
        validation::lifecycle_rules().validate(input)?;

        let stack = stack_name(input, ActionInput::non_empty(&input.stack).unwrap_or_default());
        let location = stack_location(ctx, input);
        log_location(&location);

        maybe_bootstrap(ctx, input, &stack, &location, true)?;

        let plan = base_plan(ctx, input, vec![stack], location);
        let reports = lifecycle::run(&plan, ctx.automation(), ctx.sink())?;

        ctx.publish(collect_outputs(reports, |_, name| name.to_string()));
        Ok(())
    }
}

impl Action for UpStacksAction {
    fn id(&self) -> &'static str {
        "pulumi:up:stacks"
    }

    fn description(&self) -> &'static str {
        "Runs Pulumi against several stacks in order"
    }

    fn schema(&self) -> serde_json::Value {
        lifecycle_schema(vec![
            (
                "stacks",
                schema::string_array("Pulumi stacks", "The Pulumi stacks to run, in order"),
            ),
            ("config", schema::config()),
            ("secretConfig", schema::secret_config()),
        ])
    }

    fn handle(&self, ctx: &mut ActionContext, input: &ActionInput) -> Result<()> {
        info!("Running Pulumi on {} stacks", input.stacks.len());
        validation::multi_stack_rules().validate(input)?;

        let stacks: Vec<StackIdentifier> = input
            .stacks
            .iter()
            .map(|stack| stack_name(input, stack))
            .collect();
        let location = stack_location(ctx, input);
        log_location(&location);

        // Config is applied per stack by the lifecycle, not by the bootstrap
        maybe_bootstrap(ctx, input, &stacks[0], &location, false)?;

        let plan = base_plan(ctx, input, stacks, location).with_config(input.config_set());
        let reports = lifecycle::run(&plan, ctx.automation(), ctx.sink())?;

        ctx.publish(collect_outputs(reports, |stack, name| {
            format!("{}.{}", stack.stack, name)
        }));
        Ok(())
    }
}

/// `org/project/stack`, or `org/stack` when no project name was given
fn stack_name(input: &ActionInput, stack: &str) -> StackIdentifier {
    StackIdentifier::fully_qualified(
        ActionInput::non_empty(&input.organization).unwrap_or_default(),
        ActionInput::non_empty(&input.name),
        stack,
    )
}

/// Local stacks live under the workspace at the repo project path; deployment
/// mode runs against the remote repository instead
fn stack_location(ctx: &ActionContext, input: &ActionInput) -> StackLocation {
    let project_path = ActionInput::non_empty(&input.repo_project_path).unwrap_or_default();

    if input.deployment {
        StackLocation::remote(
            ActionInput::non_empty(&input.repo_url).unwrap_or_default(),
            ActionInput::non_empty(&input.repo_branch).unwrap_or_default(),
            project_path,
        )
    } else {
        StackLocation::local(ctx.workspace_path().join(project_path))
    }
}

fn log_location(location: &StackLocation) {
    match location {
        StackLocation::Local { work_dir } => info!("workDir: {}", work_dir.display()),
        StackLocation::Remote {
            repo_url,
            branch_ref,
            project_path,
        } => {
            info!("repoUrl: {}", repo_url);
            info!("repoBranch: {}", branch_ref);
            info!("repoProjectPath: {}", project_path);
        }
    }
}

/// `new: true` scaffolds the project before the lifecycle, locally only
fn maybe_bootstrap(
    ctx: &ActionContext,
    input: &ActionInput,
    stack: &StackIdentifier,
    location: &StackLocation,
    apply_config: bool,
) -> Result<()> {
    if !input.new {
        return Ok(());
    }
    if location.is_remote() {
        warn!("Ignoring `new` in deployment mode; the project must already exist in the repository");
        return Ok(());
    }

    let folder = ActionInput::non_empty(&input.folder)
        .or_else(|| ActionInput::non_empty(&input.repo_project_path));
    info!("Creating project for stack {}...", stack);
    bootstrap_project(ctx, input, stack, folder, apply_config)
}

fn base_plan(
    ctx: &ActionContext,
    input: &ActionInput,
    stacks: Vec<StackIdentifier>,
    location: StackLocation,
) -> LifecyclePlan {
    LifecyclePlan::new(stacks, location)
        .with_terminal(TerminalAction::from_flags(input.destroy, input.up))
        .with_outputs(input.outputs.clone())
        .with_up_options(ctx.up_options())
}

/// Merge every stack's outputs. Only called once the whole plan succeeded,
/// so a failure never leaves partial outputs behind.
fn collect_outputs(
    reports: Vec<StackReport>,
    key: impl Fn(&StackIdentifier, &str) -> String,
) -> ActionOutputs {
    let mut outputs = ActionOutputs::new();
    for report in reports {
        for (name, value) in report.outputs.iter() {
            outputs.insert_text(key(&report.stack, name), value);
        }
    }
    outputs
}

fn lifecycle_schema(stack_properties: Vec<(&str, serde_json::Value)>) -> serde_json::Value {
    let mut properties = vec![
        (
            "new",
            schema::boolean(
                "Run Pulumi New",
                "This flag indicates that the Pulumi command \"new\" will be run",
            ),
        ),
        (
            "up",
            schema::boolean(
                "Run Pulumi Up",
                "This flag indicates that the Pulumi command \"up\" will be run",
            ),
        ),
        (
            "destroy",
            schema::boolean(
                "Run Pulumi Destroy",
                "This flag indicates that the Pulumi command \"destroy\" will be run",
            ),
        ),
        (
            "deployment",
            schema::boolean(
                "Use Pulumi Deployment",
                "This flag indicates that Pulumi Deployment will be used",
            ),
        ),
        (
            "template",
            schema::string(
                "Pulumi template",
                "The Pulumi template to use, this can be a built-in template or a URL to a template",
            ),
        ),
    ];
    properties.extend(stack_properties);
    properties.extend([
        ("organization", schema::organization()),
        ("name", schema::project_name()),
        (
            "description",
            schema::string(
                "Pulumi project description",
                "The Pulumi project description to use",
            ),
        ),
        ("outputs", schema::outputs()),
        (
            "repoUrl",
            schema::string(
                "Pulumi project repo URL",
                "The Pulumi project repo URL to use, when using Pulumi Deployment",
            ),
        ),
        (
            "repoBranch",
            schema::string(
                "Pulumi project repo branch",
                "The Pulumi project repo branch to use, when using Pulumi Deployment",
            ),
        ),
        (
            "repoProjectPath",
            schema::string(
                "Pulumi project repo project path",
                "The Pulumi project repo project path to use, when using Pulumi Deployment",
            ),
        ),
        ("args", schema::args()),
        (
            "folder",
            schema::string("The folder to run Pulumi in", "The folder to run Pulumi in"),
        ),
    ]);

    schema::object(&[], properties)
}

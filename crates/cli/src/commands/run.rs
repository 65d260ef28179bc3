use anyhow::{Context, Result};
use pulumi_actions_core::{
    ActionContext, ActionRegistry, CommandExecutor, DryRunExecutor, Error, NullSink,
    Settings, SystemExecutor,
};
use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info};

use crate::display::print_outputs;

#[derive(Debug, Clone)]
pub struct RunOptions {
    pub action: String,
    pub input: String,
    pub workspace: Option<PathBuf>,
    pub dry_run: bool,
    pub config: Option<PathBuf>,
    pub pulumi: Option<String>,
    pub quiet: bool,
}

pub fn run_command(options: RunOptions) -> Result<()> {
    let workspace = match options.workspace {
        Some(dir) => dir,
        None => std::env::current_dir().context("Failed to determine current directory")?,
    };
    debug!("Workspace: {}", workspace.display());

    let mut settings = load_settings(options.config.as_deref(), &workspace)?;
    if let Some(binary) = options.pulumi {
        settings.pulumi_binary = binary;
    }

    let input = read_input(&options.input)?;

    let executor: Arc<dyn CommandExecutor> = if options.dry_run {
        info!("Dry run: Pulumi commands are logged, not executed");
        Arc::new(DryRunExecutor)
    } else {
        Arc::new(SystemExecutor)
    };

    let mut ctx = ActionContext::new(workspace, settings, executor);
    if options.quiet {
        ctx = ctx.with_sink(Arc::new(NullSink));
    }
    ActionRegistry::with_builtin().execute(&options.action, &mut ctx, input)?;

    print_outputs(ctx.outputs())
}

fn load_settings(explicit: Option<&Path>, workspace: &Path) -> Result<Settings> {
    let settings = match explicit {
        Some(path) => Settings::load_from_file(path)
            .with_context(|| format!("Failed to load settings from {}", path.display()))?,
        None => Settings::load_for_workspace(workspace)?,
    };
    Ok(settings)
}

/// Read the input document from a file, or from stdin when `source` is `-`
fn read_input(source: &str) -> Result<serde_json::Value> {
    let raw = if source == "-" {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("Failed to read input from stdin")?;
        buf
    } else {
        std::fs::read_to_string(source)
            .with_context(|| format!("Failed to read input file {source}"))?
    };

    let input = serde_json::from_str(&raw)
        .map_err(|e| Error::InputError(format!("Input is not valid JSON ({source}): {e}")))?;
    Ok(input)
}

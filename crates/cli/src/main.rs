use clap::Parser;
use pulumi_actions::Cli;
use tracing_subscriber::EnvFilter;

/// Exit status for errors caused by the caller's input
const EXIT_INPUT_ERROR: i32 = 2;

fn main() {
    // Logs go to stderr so stdout carries only the action outputs
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    if let Err(err) = cli.command.execute() {
        let is_input_error = err
            .downcast_ref::<pulumi_actions_core::Error>()
            .is_some_and(|e| e.is_input_error());

        eprintln!("Error: {err:#}");
        std::process::exit(if is_input_error { EXIT_INPUT_ERROR } else { 1 });
    }
}

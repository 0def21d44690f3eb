//! aitmpl - Main entry point

use std::io::{self, Write};
use std::process::ExitCode;

use aitmpl::cli::Cli;
use aitmpl::commands;
use aitmpl::config::Settings;
use aitmpl::output;
use clap::CommandFactory;
use tracing::debug;
use tracing_subscriber::EnvFilter;

/// Initialize logging to stderr; `RUST_LOG` overrides the default level.
fn init_logger() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn main() -> ExitCode {
    init_logger();

    let cli = Cli::parse_args();
    debug!(?cli, "CLI arguments parsed");

    let Some(command) = cli.command else {
        let _ = Cli::command().print_help();
        return ExitCode::SUCCESS;
    };

    let settings = match Settings::resolve(cli.config.as_deref()) {
        Ok(settings) => settings,
        Err(e) => {
            debug!("settings error: {:?}", e);
            eprintln!("✗ Failed to load settings: {:#}", e);
            return ExitCode::FAILURE;
        }
    };

    let stdout = io::stdout();
    let mut out = stdout.lock();
    let result = commands::dispatch(command, &settings, cli.dry_run, &mut out);
    let _ = out.flush();

    match result {
        Ok(code) => code,
        Err(e) => {
            report_error(&e);
            ExitCode::FAILURE
        }
    }
}

fn report_error(err: &anyhow::Error) {
    debug!("command failed: {:?}", err);
    eprint!("{}", output::render_error(err));
}

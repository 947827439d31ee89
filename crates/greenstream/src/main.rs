mod cli;
mod commands;
mod config;
mod error;
mod offline;
mod output;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use greenstream_core::{FileHistory, GreenStream, upstream};

use crate::cli::{Cli, Command};
use crate::error::CliError;
use crate::offline::Offline;

#[tokio::main]
async fn main() {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Setup tracing based on verbosity
    init_tracing(cli.global.verbose);

    // Dispatch and handle errors with proper exit codes
    if let Err(err) = run(cli).await {
        let code = err.exit_code();
        eprintln!("{:?}", miette::Report::new(err));
        std::process::exit(code);
    }
}

fn init_tracing(verbosity: u8) {
    let filter = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

async fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        // Config commands don't need the service
        Command::Config(args) => commands::config_cmd::handle(args, &cli.global),

        // Shell completions generation
        Command::Completions(args) => {
            use clap::CommandFactory;
            use clap_complete::generate;

            let mut cmd = Cli::command();
            generate(args.shell, &mut cmd, "greenstream", &mut std::io::stdout());
            Ok(())
        }

        cmd => {
            let cfg = config::load_config()?;
            let catalog = cfg.catalog()?;
            let service_config = cfg.service_config()?;
            let history = FileHistory::new(cfg.history_path());

            tracing::debug!(command = ?cmd, "dispatching command");

            // Catalog and history commands run without upstream credentials
            if !commands::needs_upstream(&cmd) {
                let svc = GreenStream::new(Offline, Offline, history, catalog, service_config);
                return commands::dispatch(cmd, &svc, &cfg, &cli.global).await;
            }

            let upstream_config = config::resolve_upstream(&cli.global, &cfg)?;
            let (resolver, forecasts) = upstream::connect(&upstream_config)?;
            let svc = GreenStream::new(resolver, forecasts, history, catalog, service_config);
            commands::dispatch(cmd, &svc, &cfg, &cli.global).await
        }
    }
}

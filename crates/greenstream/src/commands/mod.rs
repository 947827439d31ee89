//! Command dispatch: bridges CLI args -> service calls -> output formatting.

pub mod config_cmd;
pub mod footprint;
pub mod history;
pub mod servers;
pub mod status;
pub mod util;

use greenstream_core::{ForecastProvider, GreenStream, HistoryStore, ZoneResolver};

use crate::cli::{Command, GlobalOpts, ServersCommand};
use crate::config::{self, Config};
use crate::error::CliError;

/// Whether `cmd` talks to Nominatim or Electricity Maps.
pub fn needs_upstream(cmd: &Command) -> bool {
    match cmd {
        Command::Footprint(_) | Command::Status => true,
        Command::Servers(args) => !matches!(args.command, ServersCommand::List(_)),
        Command::History(_) | Command::Config(_) | Command::Completions(_) => false,
    }
}

/// Dispatch a service-bound command to the appropriate handler.
pub async fn dispatch<Z, F, H>(
    cmd: Command,
    svc: &GreenStream<Z, F, H>,
    cfg: &Config,
    global: &GlobalOpts,
) -> Result<(), CliError>
where
    Z: ZoneResolver,
    F: ForecastProvider,
    H: HistoryStore,
{
    match cmd {
        Command::Footprint(args) => {
            let caller = config::resolve_caller(global, cfg)?;
            footprint::handle(svc, &caller, args, global).await
        }
        Command::Servers(args) => {
            let caller = config::resolve_caller(global, cfg)?;
            servers::handle(svc, &caller, args, global).await
        }
        Command::History(args) => {
            let caller = config::resolve_caller(global, cfg)?;
            history::handle(svc, &caller, args, global)
        }
        Command::Status => status::handle(svc, global).await,
        // Config and Completions are handled before dispatch
        Command::Config(_) | Command::Completions(_) => unreachable!(),
    }
}

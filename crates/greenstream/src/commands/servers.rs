//! Server command handlers.

use serde::Serialize;
use tabled::Tabled;

use greenstream_core::{
    Caller, CloudServer, ForecastProvider, GreenStream, HistoryStore, RankedServer,
    RankingRequest, ZoneResolver,
};

use crate::cli::{GlobalOpts, ServersArgs, ServersCommand};
use crate::error::CliError;
use crate::output;

use super::util;

// ── Table rows ──────────────────────────────────────────────────────

#[derive(Tabled)]
struct ServerRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Provider")]
    provider: String,
    #[tabled(rename = "Region")]
    region: String,
    #[tabled(rename = "Location")]
    location: String,
    #[tabled(rename = "Zones")]
    zones: String,
}

impl From<&CloudServer> for ServerRow {
    fn from(s: &CloudServer) -> Self {
        Self {
            id: s.id.clone(),
            name: s.name.clone(),
            provider: s.provider.to_string(),
            region: s.region_code.clone(),
            location: s.location.to_string(),
            zones: s
                .availability_zones
                .iter()
                .map(String::as_str)
                .collect::<Vec<_>>()
                .join(", "),
        }
    }
}

#[derive(Tabled)]
struct RankRow {
    #[tabled(rename = "#")]
    rank: usize,
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Provider")]
    provider: String,
    #[tabled(rename = "Zone")]
    zone: String,
    #[tabled(rename = "gCO2eq/kWh")]
    intensity: String,
}

/// A ranked server with its 1-based position.
#[derive(Serialize)]
struct Ranked<'a> {
    rank: usize,
    #[serde(flatten)]
    entry: &'a RankedServer,
}

impl From<&Ranked<'_>> for RankRow {
    fn from(r: &Ranked<'_>) -> Self {
        let server = &r.entry.server;
        Self {
            rank: r.rank,
            id: server.id.clone(),
            name: server.name.clone(),
            provider: server.provider.to_string(),
            zone: r.entry.zone.clone(),
            intensity: format!("{:.1}", r.entry.intensity()),
        }
    }
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle<Z, F, H>(
    svc: &GreenStream<Z, F, H>,
    caller: &Caller,
    args: ServersArgs,
    global: &GlobalOpts,
) -> Result<(), CliError>
where
    Z: ZoneResolver,
    F: ForecastProvider,
    H: HistoryStore,
{
    match args.command {
        ServersCommand::List(filter) => {
            let providers = util::providers(&filter)?;
            let servers = svc.list_servers(caller, &providers)?;
            let out = output::render_list(
                &global.output,
                &servers,
                |s| ServerRow::from(s),
                |s| s.id.clone(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }

        ServersCommand::Eligible { location, filter } => {
            let providers = util::providers(&filter)?;
            let zone = util::zone(location)?;
            let servers = svc.eligible_servers(caller, &zone, &providers).await?;
            if servers.is_empty() && !global.quiet {
                eprintln!("No server serves {zone}");
            }
            let out = output::render_list(
                &global.output,
                &servers,
                |s| ServerRow::from(s),
                |s| s.id.clone(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }

        ServersCommand::Rank {
            location,
            duration,
            start,
            filter,
        } => {
            let providers = util::providers(&filter)?;
            let zone = util::zone(location)?;
            let mut request = RankingRequest::new(zone, duration)?.with_providers(providers);
            if let Some(start) = start {
                request = request.starting_at(start);
            }

            let ranked = svc.rank_servers(caller, &request).await?;
            let numbered: Vec<_> = ranked
                .iter()
                .enumerate()
                .map(|(i, entry)| Ranked { rank: i + 1, entry })
                .collect();
            let out = output::render_list(
                &global.output,
                &numbered,
                |r| RankRow::from(r),
                |r| r.entry.server.id.clone(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }
    }
}

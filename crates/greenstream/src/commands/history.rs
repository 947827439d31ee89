//! History command handlers.

use serde::Serialize;
use tabled::Tabled;

use greenstream_core::{
    Caller, ForecastProvider, GreenStream, HistoryEntry, HistoryStore, ZoneResolver,
};

use crate::cli::{GlobalOpts, HistoryArgs, HistoryCommand};
use crate::error::CliError;
use crate::output;

use super::util;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct EntryRow {
    #[tabled(rename = "Requested")]
    requested: String,
    #[tabled(rename = "Caller")]
    caller: String,
    #[tabled(rename = "Start")]
    start: String,
    #[tabled(rename = "Min")]
    minutes: u32,
    #[tabled(rename = "Res")]
    resolution: String,
    #[tabled(rename = "Device")]
    device: String,
    #[tabled(rename = "Network")]
    connection: String,
    #[tabled(rename = "Location")]
    location: String,
    #[tabled(rename = "gCO2eq")]
    footprint: String,
}

impl From<&HistoryEntry> for EntryRow {
    fn from(e: &HistoryEntry) -> Self {
        Self {
            requested: e.requested_at.format("%Y-%m-%d %H:%M").to_string(),
            caller: e.caller.clone(),
            start: e.start.format("%Y-%m-%d %H:%M").to_string(),
            minutes: e.duration_minutes,
            resolution: e.resolution.to_string(),
            device: e.device.to_string(),
            connection: e.connection.to_string(),
            location: e
                .country
                .as_ref()
                .map_or_else(|| e.city.clone(), |country| format!("{}, {country}", e.city)),
            footprint: output::grams(e.footprint),
        }
    }
}

/// An aggregate over the caller's history.
#[derive(Serialize)]
struct Statistic {
    statistic: &'static str,
    caller: String,
    footprint: f64,
}

fn render_statistic(global: &GlobalOpts, stat: &Statistic) {
    let out = output::render_single(
        &global.output,
        stat,
        |s| format!("{} footprint: {} gCO2eq", s.statistic, output::grams(s.footprint)),
        |s| output::grams(s.footprint),
    );
    output::print_output(&out, global.quiet);
}

// ── Handler ─────────────────────────────────────────────────────────

pub fn handle<Z, F, H>(
    svc: &GreenStream<Z, F, H>,
    caller: &Caller,
    args: HistoryArgs,
    global: &GlobalOpts,
) -> Result<(), CliError>
where
    Z: ZoneResolver,
    F: ForecastProvider,
    H: HistoryStore,
{
    match args.command {
        HistoryCommand::List => {
            let entries = svc.history(caller)?;
            let out = output::render_list(
                &global.output,
                &entries,
                |e| EntryRow::from(e),
                |e| e.id.to_string(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }

        HistoryCommand::Average => {
            let footprint = svc.average_footprint(caller)?;
            render_statistic(
                global,
                &Statistic {
                    statistic: "Average",
                    caller: caller.to_string(),
                    footprint,
                },
            );
            Ok(())
        }

        HistoryCommand::Total => {
            let footprint = svc.total_footprint(caller)?;
            render_statistic(
                global,
                &Statistic {
                    statistic: "Total",
                    caller: caller.to_string(),
                    footprint,
                },
            );
            Ok(())
        }

        HistoryCommand::Clear => {
            let whose = if matches!(caller, Caller::Admin) {
                "every caller's".to_owned()
            } else {
                format!("{}'s", caller.id())
            };
            if !util::confirm(
                &format!("Delete {whose} recorded footprints?"),
                "history clear",
                global.yes,
            )? {
                return Ok(());
            }
            let removed = svc.clear_history(caller)?;
            if !global.quiet {
                eprintln!("Removed {removed} entries");
            }
            Ok(())
        }
    }
}

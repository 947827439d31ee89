//! Status command handler.

use serde::Serialize;

use greenstream_core::{
    Action, ForecastProvider, GreenStream, HealthMode, HistoryStore, UpstreamHealth, ZoneResolver,
};

use crate::cli::GlobalOpts;
use crate::error::CliError;
use crate::output;

#[derive(Serialize)]
struct StatusView {
    mode: HealthMode,
    #[serde(flatten)]
    health: UpstreamHealth,
    available_operations: Vec<Action>,
}

fn detail(s: &StatusView, color: bool) -> String {
    [
        format!("Mode:        {}", s.mode),
        format!("Forecasts:   {}", output::up_down(s.health.forecast, color)),
        format!("Geocoding:   {}", output::up_down(s.health.geocoding, color)),
        format!(
            "Available:   {}",
            s.available_operations
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(", ")
        ),
    ]
    .join("\n")
}

#[allow(clippy::unnecessary_wraps)]
pub async fn handle<Z, F, H>(svc: &GreenStream<Z, F, H>, global: &GlobalOpts) -> Result<(), CliError>
where
    Z: ZoneResolver,
    F: ForecastProvider,
    H: HistoryStore,
{
    let health = svc.health().await;
    let view = StatusView {
        mode: health.mode(),
        health,
        available_operations: health.available_operations(),
    };
    let color = output::should_color(&global.color);
    let out = output::render_single(
        &global.output,
        &view,
        |s| detail(s, color),
        |s| s.mode.to_string(),
    );
    output::print_output(&out, global.quiet);
    Ok(())
}

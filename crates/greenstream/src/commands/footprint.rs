//! Footprint command handler.

use greenstream_core::model::{parse_connection, parse_device};
use greenstream_core::{
    Caller, FootprintReport, ForecastProvider, GreenStream, HistoryStore, Resolution,
    ViewingRequest, ZoneResolver,
};

use crate::cli::{FootprintArgs, GlobalOpts};
use crate::error::CliError;
use crate::output;

use super::util;

fn detail(r: &FootprintReport) -> String {
    let mut lines = vec![
        format!("Footprint:  {} gCO2eq", output::grams(r.footprint)),
        format!("Zone:       {}", r.zone),
        format!("Start:      {}", r.start.format("%Y-%m-%d %H:%M UTC")),
        format!("Duration:   {} min", r.aggregation.duration_minutes),
        format!("Energy:     {:.6} kWh", r.energy.kwh),
        format!("Data:       {:.2} GB", r.energy.bytes / 1e9),
        format!("Intensity:  {:.1} gCO2eq/kWh", r.aggregation.intensity),
    ];
    if r.aggregation.segments.len() > 1 {
        lines.push("Hours:".into());
        for s in &r.aggregation.segments {
            lines.push(format!(
                "  {}  {:>2} min  {:.1}",
                s.hour.format("%H:%M"),
                s.minutes,
                s.intensity
            ));
        }
    }
    lines.join("\n")
}

/// Parse the request up front so a bad parameter never reaches upstream.
fn request(args: FootprintArgs) -> Result<ViewingRequest, CliError> {
    let resolution: Resolution = args.resolution.parse()?;
    let device = parse_device(&args.device)?;
    let connection = parse_connection(&args.connection)?;
    let zone = util::zone(args.location)?;

    let request = ViewingRequest::new(args.duration, resolution, device, connection, zone)?;
    Ok(match args.start {
        Some(start) => request.starting_at(start),
        None => request,
    })
}

pub async fn handle<Z, F, H>(
    svc: &GreenStream<Z, F, H>,
    caller: &Caller,
    args: FootprintArgs,
    global: &GlobalOpts,
) -> Result<(), CliError>
where
    Z: ZoneResolver,
    F: ForecastProvider,
    H: HistoryStore,
{
    let request = request(args)?;
    let report = svc.compute_footprint(caller, &request).await?;
    let out = output::render_single(&global.output, &report, detail, |r| {
        output::grams(r.footprint)
    });
    output::print_output(&out, global.quiet);
    Ok(())
}

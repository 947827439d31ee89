// ── Temporal aggregation ──
//
// Turns an hourly forecast curve and a viewing window into one
// time-weighted average intensity. The window is cut at hour boundaries
// and each piece is weighted by the minutes it overlaps that hour's sample.

use std::num::NonZeroU32;

use chrono::{DateTime, TimeDelta, Timelike, Utc};
use serde::Serialize;
use tracing::trace;

use crate::error::CoreError;
use crate::model::{ForecastCurve, floor_hour, floor_minute};

/// Minutes of the window covered by one forecast sample.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Segment {
    /// Hour the sample is stamped with.
    pub hour: DateTime<Utc>,
    pub minutes: u32,
    pub intensity: f64,
}

/// Time-weighted average intensity for one window.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AggregationResult {
    pub start: DateTime<Utc>,
    pub duration_minutes: u32,
    /// gCO2eq/kWh.
    pub intensity: f64,
    pub segments: Vec<Segment>,
}

/// Reject windows that start before the hour `now` falls in.
pub fn ensure_fresh(start: DateTime<Utc>, now: DateTime<Utc>) -> Result<(), CoreError> {
    let floor = floor_hour(now);
    if start < floor {
        return Err(CoreError::StaleWindow { start, floor });
    }
    Ok(())
}

/// Weighted average intensity of `curve` over `duration` minutes from `start`.
///
/// `start` is truncated to the minute. The curve must carry a sample stamped
/// exactly at every hour the window touches, starting with the hour of
/// `start`; a missing or misaligned sample, or a window ending after the
/// curve's horizon, yields `ForecastUnavailable`.
pub fn aggregate(
    start: DateTime<Utc>,
    duration: NonZeroU32,
    curve: &ForecastCurve,
    now: DateTime<Utc>,
) -> Result<AggregationResult, CoreError> {
    let start = floor_minute(start);
    ensure_fresh(start, now)?;

    let zone = curve.zone();
    let total = duration.get();

    let Some(horizon) = curve.horizon() else {
        return Err(CoreError::forecast_unavailable(zone, "forecast is empty"));
    };
    let end = start + TimeDelta::minutes(i64::from(total));
    if end > horizon {
        return Err(CoreError::forecast_unavailable(
            zone,
            format!("window ends at {end}, after the forecast horizon {horizon}"),
        ));
    }

    let mut hour = floor_hour(start);
    let Some(mut index) = curve.position(hour) else {
        return Err(CoreError::forecast_unavailable(
            zone,
            format!("no hourly sample for {hour}"),
        ));
    };

    let mut segments = Vec::new();
    let mut remaining = total;
    let mut take = (60 - start.minute()).min(total);
    loop {
        let sample = curve
            .samples()
            .get(index)
            .filter(|s| s.at == hour)
            .ok_or_else(|| {
                CoreError::forecast_unavailable(zone, format!("no hourly sample for {hour}"))
            })?;
        segments.push(Segment {
            hour,
            minutes: take,
            intensity: sample.intensity,
        });

        remaining -= take;
        if remaining == 0 {
            break;
        }
        index += 1;
        hour += TimeDelta::hours(1);
        take = remaining.min(60);
    }

    let weighted: f64 = segments
        .iter()
        .map(|s| f64::from(s.minutes) * s.intensity)
        .sum();
    let intensity = weighted / f64::from(total);

    trace!(%zone, %start, total, segments = segments.len(), intensity, "aggregated window");

    Ok(AggregationResult {
        start,
        duration_minutes: total,
        intensity,
        segments,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::TimeZone;

    use super::*;
    use crate::model::ForecastSample;

    fn t(h: u32, m: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 6, 1, h, m, 0).unwrap()
    }

    fn minutes(n: u32) -> NonZeroU32 {
        NonZeroU32::new(n).unwrap()
    }

    fn curve(points: &[(u32, f64)]) -> ForecastCurve {
        ForecastCurve::new(
            "FR",
            points
                .iter()
                .map(|&(h, v)| ForecastSample::new(t(h, 0), v))
                .collect(),
        )
        .unwrap()
    }

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 1e-9,
            "expected {expected}, got {actual}"
        );
    }

    fn minutes_used(result: &AggregationResult) -> u32 {
        result.segments.iter().map(|s| s.minutes).sum()
    }

    #[test]
    fn ninety_minutes_over_two_hours() {
        let c = curve(&[(10, 100.0), (11, 50.0)]);
        let r = aggregate(t(10, 0), minutes(90), &c, t(10, 0)).unwrap();
        assert_close(r.intensity, (60.0 * 100.0 + 30.0 * 50.0) / 90.0);
        assert_eq!(minutes_used(&r), 90);
    }

    #[test]
    fn full_aligned_hour_uses_one_sample() {
        let c = curve(&[(10, 120.0), (11, 10.0)]);
        let r = aggregate(t(10, 0), minutes(60), &c, t(10, 0)).unwrap();
        assert_eq!(r.segments.len(), 1);
        assert_close(r.intensity, 120.0);
    }

    #[test]
    fn short_aligned_window_is_not_padded() {
        let c = curve(&[(10, 80.0)]);
        let r = aggregate(t(10, 0), minutes(20), &c, t(10, 0)).unwrap();
        assert_eq!(r.segments[0].minutes, 20);
        assert_close(r.intensity, 80.0);
    }

    #[test]
    fn window_inside_one_hour() {
        let c = curve(&[(10, 70.0), (11, 5.0)]);
        let r = aggregate(t(10, 15), minutes(30), &c, t(10, 0)).unwrap();
        assert_eq!(r.segments.len(), 1);
        assert_close(r.intensity, 70.0);
    }

    #[test]
    fn offset_window_weights_exact_overlap() {
        // 10:40 -> 12:10: 20 min @ 10h, 60 min @ 11h, 10 min @ 12h.
        let c = curve(&[(10, 90.0), (11, 60.0), (12, 30.0)]);
        let r = aggregate(t(10, 40), minutes(90), &c, t(10, 0)).unwrap();
        let got: Vec<u32> = r.segments.iter().map(|s| s.minutes).collect();
        assert_eq!(got, vec![20, 60, 10]);
        assert_close(r.intensity, (20.0 * 90.0 + 60.0 * 60.0 + 10.0 * 30.0) / 90.0);
    }

    #[test]
    fn end_on_boundary_does_not_touch_next_hour() {
        // 10:30 -> 11:00 must not need the 11h sample.
        let c = curve(&[(10, 40.0)]);
        let r = aggregate(t(10, 30), minutes(30), &c, t(10, 0)).unwrap();
        assert_eq!(r.segments.len(), 1);
        assert_close(r.intensity, 40.0);
    }

    #[test]
    fn seconds_are_truncated() {
        let c = curve(&[(10, 40.0)]);
        let start = t(10, 5) + TimeDelta::seconds(42);
        let r = aggregate(start, minutes(10), &c, t(10, 0)).unwrap();
        assert_eq!(r.start, t(10, 5));
    }

    #[test]
    fn stale_start_is_rejected() {
        let c = curve(&[(9, 10.0), (10, 10.0)]);
        let err = aggregate(t(9, 0), minutes(30), &c, t(10, 20)).unwrap_err();
        assert!(matches!(err, CoreError::StaleWindow { floor, .. } if floor == t(10, 0)));
    }

    #[test]
    fn start_within_current_hour_is_fresh() {
        let c = curve(&[(10, 10.0)]);
        assert!(aggregate(t(10, 5), minutes(10), &c, t(10, 50)).is_ok());
    }

    #[test]
    fn window_past_horizon_is_unavailable() {
        let c = curve(&[(10, 10.0), (11, 10.0)]);
        let err = aggregate(t(10, 30), minutes(150), &c, t(10, 0)).unwrap_err();
        assert!(matches!(err, CoreError::ForecastUnavailable { .. }));
    }

    #[test]
    fn window_ending_at_horizon_is_accepted() {
        let c = curve(&[(10, 10.0), (11, 20.0)]);
        let r = aggregate(t(10, 0), minutes(120), &c, t(10, 0)).unwrap();
        assert_close(r.intensity, 15.0);
    }

    #[test]
    fn empty_curve_is_unavailable() {
        let c = curve(&[]);
        let err = aggregate(t(10, 0), minutes(10), &c, t(10, 0)).unwrap_err();
        assert!(matches!(err, CoreError::ForecastUnavailable { .. }));
    }

    #[test]
    fn missing_start_hour_is_unavailable() {
        let c = curve(&[(11, 10.0), (12, 10.0)]);
        let err = aggregate(t(10, 30), minutes(10), &c, t(10, 0)).unwrap_err();
        assert!(matches!(err, CoreError::ForecastUnavailable { .. }));
    }

    #[test]
    fn gap_in_curve_is_unavailable() {
        let c = curve(&[(10, 10.0), (12, 10.0)]);
        let err = aggregate(t(10, 0), minutes(150), &c, t(10, 0)).unwrap_err();
        assert!(matches!(err, CoreError::ForecastUnavailable { .. }));
    }

    #[test]
    fn misaligned_samples_are_unavailable() {
        let c = ForecastCurve::new(
            "FR",
            vec![
                ForecastSample::new(t(10, 30), 10.0),
                ForecastSample::new(t(11, 30), 10.0),
            ],
        )
        .unwrap();
        let err = aggregate(t(10, 30), minutes(30), &c, t(10, 0)).unwrap_err();
        assert!(matches!(err, CoreError::ForecastUnavailable { .. }));
    }

    #[test]
    fn segment_minutes_always_sum_to_duration() {
        let c = curve(&[(10, 1.0), (11, 2.0), (12, 3.0), (13, 4.0), (14, 5.0)]);
        for offset in [0, 1, 29, 59] {
            for length in [1, 30, 59, 60, 61, 119, 120, 121, 240] {
                let start = t(10, offset);
                let Ok(r) = aggregate(start, minutes(length), &c, t(10, 0)) else {
                    continue;
                };
                assert_eq!(minutes_used(&r), length, "offset {offset}, length {length}");
            }
        }
    }
}

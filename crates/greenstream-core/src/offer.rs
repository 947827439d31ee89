// ── Server eligibility and ranking ──
//
// Eligibility maps the requester's place to a zone code and keeps the
// servers that serve it. Ranking aggregates each eligible server's own
// forecast over the same window and orders them by intensity.

use std::num::NonZeroU32;
use std::time::Duration;

use chrono::{DateTime, Utc};
use futures_util::future::try_join_all;
use serde::Serialize;
use tracing::{debug, info};

use crate::aggregate::{AggregationResult, aggregate, ensure_fresh};
use crate::auth::{Action, Caller, authorize};
use crate::error::CoreError;
use crate::model::{CloudServer, GeographicZone, Provider, floor_minute};
use crate::ports::{ForecastProvider, HistoryStore, ZoneResolver};
use crate::service::GreenStream;

/// Parameters of a ranking request.
#[derive(Debug, Clone, PartialEq)]
pub struct RankingRequest {
    pub zone: GeographicZone,
    pub duration: NonZeroU32,
    /// `None` means "now".
    pub start: Option<DateTime<Utc>>,
    /// Empty selects the configured default providers.
    pub providers: Vec<Provider>,
}

impl RankingRequest {
    pub fn new(zone: GeographicZone, duration_minutes: u32) -> Result<Self, CoreError> {
        let duration = NonZeroU32::new(duration_minutes).ok_or_else(|| {
            CoreError::InvalidRequest {
                message: "duration must be at least one minute".into(),
            }
        })?;
        Ok(Self {
            zone,
            duration,
            start: None,
            providers: Vec::new(),
        })
    }

    pub fn starting_at(mut self, start: DateTime<Utc>) -> Self {
        self.start = Some(start);
        self
    }

    pub fn with_providers(mut self, providers: Vec<Provider>) -> Self {
        self.providers = providers;
        self
    }
}

/// One server and its weighted intensity over the requested window.
#[derive(Debug, Clone, Serialize)]
pub struct RankedServer {
    pub server: CloudServer,
    /// Forecast zone the intensity was computed for.
    pub zone: String,
    pub result: AggregationResult,
}

impl RankedServer {
    pub fn intensity(&self) -> f64 {
        self.result.intensity
    }
}

/// Servers ascending by intensity, ties by id.
pub type RankedServers = Vec<RankedServer>;

/// Candidates run by one of `providers` whose availability zones include
/// the zone `zone` resolves to. Candidate order is preserved.
pub async fn eligible<Z: ZoneResolver>(
    resolver: &Z,
    zone: &GeographicZone,
    providers: &[Provider],
    candidates: &[CloudServer],
) -> Result<Vec<CloudServer>, CoreError> {
    let code = resolver.resolve(zone).await?;
    let servers: Vec<_> = candidates
        .iter()
        .filter(|s| s.serves(providers, &code))
        .cloned()
        .collect();
    debug!(%zone, %code, eligible = servers.len(), "filtered servers");
    Ok(servers)
}

/// Rank the servers eligible for `request.zone`.
///
/// The window is checked for staleness before any lookup. Each server's
/// zone lookup and forecast fetch run concurrently under one `timeout`;
/// the first failure aborts the whole ranking.
pub async fn rank<Z, F>(
    resolver: &Z,
    forecasts: &F,
    request: &RankingRequest,
    candidates: &[CloudServer],
    now: DateTime<Utc>,
    timeout: Duration,
) -> Result<RankedServers, CoreError>
where
    Z: ZoneResolver,
    F: ForecastProvider,
{
    let start = floor_minute(request.start.unwrap_or(now));
    ensure_fresh(start, now)?;

    let servers = eligible(resolver, &request.zone, &request.providers, candidates).await?;
    let duration = request.duration;

    let fetches = servers.into_iter().map(|server| async move {
        let lookup = async {
            let zone = match &server.forecast_zone {
                Some(code) => code.clone(),
                None => resolver
                    .resolve(&server.location)
                    .await
                    .map_err(|e| CoreError::forecast_unavailable(&server.id, e))?,
            };
            let curve = forecasts.forecast(&zone).await?;
            Ok::<_, CoreError>((zone, curve))
        };
        let (zone, curve) = tokio::time::timeout(timeout, lookup).await.map_err(|_| {
            CoreError::forecast_unavailable(
                &server.id,
                format!("no answer within {}s", timeout.as_secs_f32()),
            )
        })??;
        let result = aggregate(start, duration, &curve, now)?;
        debug!(server = %server.id, %zone, intensity = result.intensity, "aggregated server");
        Ok::<_, CoreError>(RankedServer {
            server,
            zone,
            result,
        })
    });

    let mut ranked = try_join_all(fetches).await?;
    ranked.sort_by(|a, b| {
        a.intensity()
            .total_cmp(&b.intensity())
            .then_with(|| a.server.id.cmp(&b.server.id))
    });
    Ok(ranked)
}

impl<Z, F, H> GreenStream<Z, F, H>
where
    Z: ZoneResolver,
    F: ForecastProvider,
    H: HistoryStore,
{
    /// Catalog servers eligible for `zone`.
    pub async fn eligible_servers(
        &self,
        caller: &Caller,
        zone: &GeographicZone,
        providers: &[Provider],
    ) -> Result<Vec<CloudServer>, CoreError> {
        authorize(caller, Action::EligibleServers)?;
        let providers = self.providers_or_default(providers);
        eligible(&self.resolver, zone, &providers, self.catalog.all()).await
    }

    /// Catalog servers eligible for the request, ranked by intensity.
    pub async fn rank_servers(
        &self,
        caller: &Caller,
        request: &RankingRequest,
    ) -> Result<RankedServers, CoreError> {
        authorize(caller, Action::RankServers)?;
        let request = RankingRequest {
            providers: self.providers_or_default(&request.providers),
            ..request.clone()
        };
        let ranked = rank(
            &self.resolver,
            &self.forecasts,
            &request,
            self.catalog.all(),
            self.clock.now(),
            self.config.forecast_timeout,
        )
        .await?;
        info!(
            caller = %caller,
            zone = %request.zone,
            servers = ranked.len(),
            best = ranked.first().map(|r| r.server.id.as_str()),
            "servers ranked"
        );
        Ok(ranked)
    }
}

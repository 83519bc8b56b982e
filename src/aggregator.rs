//! Aggregation and fallback layer
//!
//! Fans out to the three provider adapters concurrently, collects every
//! outcome and assembles one complete [`AggregateResult`]: any category whose
//! adapter failed is substituted with deterministic synthetic data and marked
//! in the per-provider status list. Aggregation itself never fails, a caller
//! always receives a fully populated result.

use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::data::{
    default_http_client, FetchError, FishForecast, ForecastRequest, ProviderState, ProviderStatus,
    TideEvent, TidesClient, WeatherClient, WeatherSnapshot, WindClient, WindSnapshot,
};
use crate::synthetic;

/// Fixed (name, source) pairs for the status list, in reporting order
const STATUS_NAMES: [(&str, &str); 3] = [
    ("Clima", "OpenWeatherMap"),
    ("Marés", "WorldTides"),
    ("Vento", "OpenWeatherMap"),
];

/// Where an aggregate sits in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AggregatePhase {
    /// Not settled yet (only meaningful to incremental consumers)
    Pending,
    /// Every category resolved with live provider data
    SettledOk,
    /// Settled, but at least one category fell back to synthetic data
    SettledDegraded,
}

/// Complete conditions report for one location and day
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregateResult {
    pub weather: WeatherSnapshot,
    pub tides: Vec<TideEvent>,
    pub wind: WindSnapshot,
    /// Always generated locally, never provider-backed
    pub fish_forecast: FishForecast,
    pub loading: bool,
    /// Top-level failure message, only set when every category fell back
    pub error: Option<String>,
    /// True when any category carries synthetic data
    pub using_mock_data: bool,
    /// One entry per provider-backed category, in fixed order
    pub api_statuses: Vec<ProviderStatus>,
}

impl AggregateResult {
    pub fn phase(&self) -> AggregatePhase {
        if self.loading {
            AggregatePhase::Pending
        } else if self.using_mock_data {
            AggregatePhase::SettledDegraded
        } else {
            AggregatePhase::SettledOk
        }
    }

    /// Builds a result backed entirely by the deterministic generators
    ///
    /// Used when aggregation cannot consult any provider at all, e.g. during
    /// offline demos. The given message is surfaced both at the top level and
    /// on every provider status.
    pub fn fully_synthetic(request: &ForecastRequest, message: impl Into<String>) -> Self {
        let message = message.into();
        let statuses = STATUS_NAMES
            .iter()
            .map(|(name, source)| ProviderStatus {
                name: name.to_string(),
                status: ProviderState::Error,
                source: source.to_string(),
                error: Some(message.clone()),
            })
            .collect();

        Self {
            weather: synthetic::generate_weather(request.date, &request.location_name),
            tides: synthetic::generate_tides(request.date),
            wind: synthetic::generate_wind(request.date),
            fish_forecast: synthetic::generate_fish_forecast(request.date, &request.location_name),
            loading: false,
            error: Some(message),
            using_mock_data: true,
            api_statuses: statuses,
        }
    }
}

/// Fans requests out to the provider adapters and assembles the result
#[derive(Debug, Clone)]
pub struct Aggregator {
    weather: WeatherClient,
    tides: TidesClient,
    wind: WindClient,
}

impl Aggregator {
    /// Creates an aggregator whose adapters share one HTTP client
    pub fn new(config: &Config) -> Self {
        let client = default_http_client();
        Self {
            weather: WeatherClient::with_client(client.clone(), config),
            tides: TidesClient::with_client(client.clone(), config),
            wind: WindClient::with_client(client, config),
        }
    }

    /// Fetches all categories concurrently and assembles the aggregate
    ///
    /// This is infallible: a failed category is logged, substituted with
    /// synthetic data and reported in `api_statuses`.
    pub async fn fetch(&self, request: &ForecastRequest) -> AggregateResult {
        tracing::info!(
            location = %request.location_name,
            date = %request.date,
            "aggregating conditions"
        );

        let (weather, tides, wind) = futures::join!(
            self.weather.fetch_weather(request.coordinates),
            self.tides.fetch_tides(request.coordinates, request.date),
            self.wind.fetch_wind(request.coordinates),
        );

        assemble(request, weather, tides, wind)
    }
}

/// Assembles the aggregate from the three adapter outcomes
///
/// Split from the fetch so fallback behavior is testable without a network.
fn assemble(
    request: &ForecastRequest,
    weather: Result<WeatherSnapshot, FetchError>,
    tides: Result<Vec<TideEvent>, FetchError>,
    wind: Result<WindSnapshot, FetchError>,
) -> AggregateResult {
    let (weather, weather_status) = settle("Clima", "OpenWeatherMap", weather, || {
        synthetic::generate_weather(request.date, &request.location_name)
    });
    let (tides, tides_status) = settle("Marés", "WorldTides", tides, || {
        synthetic::generate_tides(request.date)
    });
    let (wind, wind_status) = settle("Vento", "OpenWeatherMap", wind, || {
        synthetic::generate_wind(request.date)
    });

    let api_statuses = vec![weather_status, tides_status, wind_status];
    let using_mock_data = api_statuses
        .iter()
        .any(|status| status.status == ProviderState::Error);

    AggregateResult {
        weather,
        tides,
        wind,
        // The fish forecast has no live provider, it is always generated
        fish_forecast: synthetic::generate_fish_forecast(request.date, &request.location_name),
        loading: false,
        error: None,
        using_mock_data,
        api_statuses,
    }
}

/// Resolves one category: live data on success, synthetic on failure
fn settle<T>(
    name: &str,
    source: &str,
    outcome: Result<T, FetchError>,
    fallback: impl FnOnce() -> T,
) -> (T, ProviderStatus) {
    match outcome {
        Ok(value) => (
            value,
            ProviderStatus {
                name: name.to_string(),
                status: ProviderState::Ok,
                source: source.to_string(),
                error: None,
            },
        ),
        Err(err) => {
            tracing::warn!(category = name, error = %err, "falling back to generated data");
            (
                fallback(),
                ProviderStatus {
                    name: name.to_string(),
                    status: ProviderState::Error,
                    source: source.to_string(),
                    error: Some(err.to_string()),
                },
            )
        }
    }
}

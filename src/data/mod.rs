//! Core data model for Maretempo
//!
//! This module contains the value types shared by the provider adapters, the
//! deterministic generators and the aggregator: weather, tides, wind and fish
//! forecast snapshots plus the combined per-request result. All types are
//! immutable once produced and serialize with the camelCase field names the
//! presentation layer consumes.

pub mod tides;
pub mod weather;
pub mod wind;

pub use tides::TidesClient;
pub use weather::WeatherClient;
pub use wind::{beaufort_from_kmh, WindClient};

use std::time::Duration;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

const USER_AGENT: &str = concat!("maretempo/", env!("CARGO_PKG_VERSION"));
const HTTP_TIMEOUT: Duration = Duration::from_secs(10);

/// Builds the HTTP client shared by the provider adapters
///
/// Client construction only fails on TLS backend misconfiguration, which is
/// unrecoverable, so this panics rather than returning a Result.
pub fn default_http_client() -> reqwest::Client {
    reqwest::Client::builder()
        .user_agent(USER_AGENT)
        .timeout(HTTP_TIMEOUT)
        .build()
        .expect("failed to build HTTP client")
}

/// The 8-point compass rose used for every wind direction label
pub const COMPASS_POINTS: [&str; 8] = ["N", "NE", "E", "SE", "S", "SW", "W", "NW"];

/// Index into [`COMPASS_POINTS`] nearest to the given degrees
///
/// Uses `round(degrees / 45) mod 8`, so 0° → 0 ("N"), 90° → 2 ("E"),
/// 225° → 5 ("SW"), and values close to 360° wrap back to 0.
pub fn compass_index(degrees: f64) -> usize {
    let index = (degrees / 45.0).round() as i64 % 8;
    index.unsigned_abs() as usize % 8
}

/// Maps wind direction degrees to the nearest 8-point compass label
pub fn compass_from_degrees(degrees: f64) -> &'static str {
    COMPASS_POINTS[compass_index(degrees)]
}

/// A validated WGS84 coordinate pair
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

/// Error for coordinates outside the WGS84 range
#[derive(Debug, Error)]
#[error("coordinates out of range: lat {latitude}, lon {longitude}")]
pub struct CoordinatesError {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    /// Creates a coordinate pair, rejecting values outside ±90/±180 degrees
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, CoordinatesError> {
        if !(-90.0..=90.0).contains(&latitude) || !(-180.0..=180.0).contains(&longitude) {
            return Err(CoordinatesError {
                latitude,
                longitude,
            });
        }
        Ok(Self {
            latitude,
            longitude,
        })
    }
}

/// One aggregation request: where, when, and the display name used to seed
/// the deterministic generators
#[derive(Debug, Clone, PartialEq)]
pub struct ForecastRequest {
    pub coordinates: Coordinates,
    pub date: NaiveDate,
    pub location_name: String,
}

impl ForecastRequest {
    pub fn new(
        latitude: f64,
        longitude: f64,
        date: NaiveDate,
        location_name: impl Into<String>,
    ) -> Result<Self, CoordinatesError> {
        Ok(Self {
            coordinates: Coordinates::new(latitude, longitude)?,
            date,
            location_name: location_name.into(),
        })
    }
}

/// Parses an ISO-8601 date string, tolerating a trailing time component
/// (e.g. "2026-08-27" or "2026-08-27T14:00:00.000Z")
pub fn parse_forecast_date(input: &str) -> Option<NaiveDate> {
    let date_part = input.split('T').next().unwrap_or(input).trim();
    NaiveDate::parse_from_str(date_part, "%Y-%m-%d").ok()
}

/// App-level weather conditions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WeatherCondition {
    Sunny,
    Cloudy,
    Rainy,
    PartlyCloudy,
}

/// Weather conditions for one day at one location
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeatherSnapshot {
    pub condition: WeatherCondition,
    /// Temperature in Celsius
    pub temperature: i32,
    /// Feels-like temperature in Celsius
    pub feels_like: i32,
    /// Relative humidity percentage (0-100)
    pub humidity: u8,
    /// Atmospheric pressure in hPa
    pub pressure: u32,
    /// Wind speed in km/h
    pub wind_speed: u32,
    /// 8-point compass label
    pub wind_direction: String,
    /// Visibility in km
    pub visibility: u32,
    pub uv_index: u8,
    /// Free-text description from the provider, if any
    pub description: Option<String>,
    /// Sunrise time as "HH:MM"
    pub sunrise: String,
    /// Sunset time as "HH:MM"
    pub sunset: String,
    /// Day length as display text, e.g. "13h 24min"
    pub day_length: String,
}

/// Whether a tide extreme is a high or a low water
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TideKind {
    High,
    Low,
}

/// A single tide extreme within the forecast day
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TideEvent {
    /// Time of the extreme as "HH:MM"
    pub time: String,
    /// Height of the tide in meters
    pub height: f64,
    #[serde(rename = "type")]
    pub kind: TideKind,
}

/// One hourly wind forecast entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HourlyWind {
    /// Start of the hour as "HH:00"
    pub time: String,
    /// Wind speed in km/h
    pub speed: u32,
    /// 8-point compass label
    pub direction: String,
}

/// Wind conditions including a short hourly outlook
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WindSnapshot {
    /// Sustained wind speed in km/h
    pub speed: u32,
    /// Gust speed in km/h
    pub gust_speed: u32,
    /// 8-point compass label
    pub direction: String,
    /// Direction quantized to the compass rose: 0, 45, ... 315
    pub direction_degrees: u16,
    /// Beaufort scale number (0-12)
    pub beaufort_scale: u8,
    pub beaufort_description: String,
    /// Exactly six hourly entries
    pub hourly_forecast: Vec<HourlyWind>,
}

/// Overall fishing conditions rating
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FishRating {
    Excellent,
    Good,
    Moderate,
    Poor,
}

/// Sun and moon rise/set times for the forecast day
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SunMoon {
    pub sunrise: String,
    pub sunset: String,
    pub moonrise: String,
    pub moonset: String,
    pub day_length: String,
}

/// Fishing forecast, always generated locally (never provider-backed)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FishForecast {
    pub overall_rating: FishRating,
    /// Best fishing windows as "HH:00 - HH:00"
    pub best_times: Vec<String>,
    pub moon_phase: String,
    pub tide_influence: String,
    /// Species in season for the forecast month
    pub recommended_species: Vec<String>,
    /// Exactly three tips drawn from a fixed pool
    pub tips: Vec<String>,
    pub sun_moon: SunMoon,
}

/// Whether a provider category resolved with live data
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderState {
    Ok,
    Error,
    Loading,
}

/// Per-category report of where the data in the aggregate came from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderStatus {
    /// Display name of the data category, e.g. "Marés"
    pub name: String,
    pub status: ProviderState,
    /// Upstream source identifier, e.g. "WorldTides"
    pub source: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Typed failure produced by every provider adapter
///
/// Carries a human-readable message and distinguishes "the provider answered
/// but the answer is unusable" from transport-level failures. A missing API
/// key is reported here rather than at startup so one unconfigured provider
/// never takes the whole aggregate down.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("API key not configured")]
    MissingApiKey,

    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("{provider} API error: {status}")]
    UpstreamStatus { provider: &'static str, status: u16 },

    #[error("{provider} reported an error: {message}")]
    UpstreamError {
        provider: &'static str,
        message: String,
    },

    #[error("no tide extremes available for the requested day")]
    NoData,
}

#[cfg(test)]
pub(crate) mod testing {
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    /// Spawns a local HTTP server answering every request with the given
    /// status line and an empty body; returns its base URL
    pub(crate) async fn spawn_status_server(status_line: &'static str) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            while let Ok((mut stream, _)) = listener.accept().await {
                let mut buf = [0u8; 1024];
                let _ = stream.read(&mut buf).await;
                let response = format!(
                    "HTTP/1.1 {status_line}\r\ncontent-length: 0\r\nconnection: close\r\n\r\n"
                );
                let _ = stream.write_all(response.as_bytes()).await;
            }
        });

        format!("http://{addr}")
    }
}

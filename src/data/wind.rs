//! OpenWeatherMap wind adapter
//!
//! Issues two concurrent calls against OpenWeatherMap, the current conditions
//! endpoint and the 3-hourly forecast, and merges them into one
//! [`WindSnapshot`]: current speed/gust/direction plus the next six forecast
//! entries as an hourly outlook. Also home of the Beaufort scale used across
//! the crate.

use reqwest::Client;
use serde::Deserialize;

use super::{
    compass_index, default_http_client, Coordinates, FetchError, HourlyWind, WindSnapshot,
    COMPASS_POINTS,
};
use crate::config::Config;

const PROVIDER: &str = "OpenWeatherMap";

/// Beaufort scale descriptions, indexed by scale number 0-12
pub const BEAUFORT_DESCRIPTIONS: [&str; 13] = [
    "Calmaria",
    "Aragem",
    "Brisa leve",
    "Brisa fraca",
    "Brisa moderada",
    "Brisa forte",
    "Vento fresco",
    "Vento forte",
    "Ventania",
    "Ventania forte",
    "Tempestade",
    "Tempestade violenta",
    "Furacão",
];

/// Converts a wind speed in m/s to whole km/h
pub fn ms_to_kmh(ms: f64) -> u32 {
    (ms * 3.6).round() as u32
}

/// Classifies a wind speed in km/h on the Beaufort scale (0-12)
pub fn beaufort_from_kmh(kmh: u32) -> u8 {
    match kmh {
        0 => 0,
        1..=5 => 1,
        6..=11 => 2,
        12..=19 => 3,
        20..=28 => 4,
        29..=38 => 5,
        39..=49 => 6,
        50..=61 => 7,
        62..=74 => 8,
        75..=88 => 9,
        89..=102 => 10,
        103..=117 => 11,
        _ => 12,
    }
}

/// Client for fetching wind conditions and outlook from OpenWeatherMap
#[derive(Debug, Clone)]
pub struct WindClient {
    client: Client,
    api_key: Option<String>,
    base_url: String,
}

impl WindClient {
    /// Creates a new WindClient from the app configuration
    pub fn new(config: &Config) -> Self {
        Self::with_client(default_http_client(), config)
    }

    /// Creates a new WindClient reusing an existing HTTP client
    pub fn with_client(client: Client, config: &Config) -> Self {
        Self {
            client,
            api_key: config.openweathermap_api_key.clone(),
            base_url: config.openweathermap_base_url.clone(),
        }
    }

    /// Fetches current wind plus a short hourly outlook
    ///
    /// Both upstream calls run concurrently and both must succeed: a partial
    /// wind snapshot would mix live and missing data, so any failure is
    /// reported whole and the caller substitutes a synthetic snapshot.
    pub async fn fetch_wind(&self, coords: Coordinates) -> Result<WindSnapshot, FetchError> {
        let api_key = self.api_key.as_deref().ok_or(FetchError::MissingApiKey)?;

        tracing::debug!(
            lat = coords.latitude,
            lon = coords.longitude,
            "fetching wind conditions and outlook"
        );

        let (current, forecast) = futures::try_join!(
            self.fetch_current(coords, api_key),
            self.fetch_forecast(coords, api_key),
        )?;

        Ok(normalize_wind(current, forecast))
    }

    async fn fetch_current(
        &self,
        coords: Coordinates,
        api_key: &str,
    ) -> Result<OwmWindCurrent, FetchError> {
        let url = format!("{}/data/2.5/weather", self.base_url);
        let response = self
            .client
            .get(&url)
            .query(&[
                ("lat", coords.latitude.to_string()),
                ("lon", coords.longitude.to_string()),
                ("appid", api_key.to_string()),
                ("units", "metric".to_string()),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(FetchError::UpstreamStatus {
                provider: PROVIDER,
                status: response.status().as_u16(),
            });
        }
        Ok(response.json().await?)
    }

    async fn fetch_forecast(
        &self,
        coords: Coordinates,
        api_key: &str,
    ) -> Result<OwmWindForecast, FetchError> {
        let url = format!("{}/data/2.5/forecast", self.base_url);
        let response = self
            .client
            .get(&url)
            .query(&[
                ("lat", coords.latitude.to_string()),
                ("lon", coords.longitude.to_string()),
                ("appid", api_key.to_string()),
                ("units", "metric".to_string()),
                ("cnt", "8".to_string()),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(FetchError::UpstreamStatus {
                provider: PROVIDER,
                status: response.status().as_u16(),
            });
        }
        Ok(response.json().await?)
    }
}

/// Merges the current conditions and the forecast into a wind snapshot
fn normalize_wind(current: OwmWindCurrent, forecast: OwmWindForecast) -> WindSnapshot {
    let wind = current.wind.unwrap_or_default();
    let speed_ms = wind.speed.unwrap_or(0.0);
    let speed = ms_to_kmh(speed_ms);
    // Providers often omit gust in calm conditions; estimate it as +30%
    let gust_speed = wind
        .gust
        .map(ms_to_kmh)
        .unwrap_or_else(|| (speed_ms * 3.6 * 1.3).round() as u32);

    let index = compass_index(wind.deg.unwrap_or(0.0));

    let hourly_forecast = forecast
        .list
        .iter()
        .take(6)
        .filter_map(|item| {
            let time = chrono::DateTime::from_timestamp(item.dt, 0)?
                .format("%H:00")
                .to_string();
            let wind = item.wind.clone().unwrap_or_default();
            Some(HourlyWind {
                time,
                speed: ms_to_kmh(wind.speed.unwrap_or(0.0)),
                direction: COMPASS_POINTS[compass_index(wind.deg.unwrap_or(0.0))].to_string(),
            })
        })
        .collect();

    WindSnapshot {
        speed,
        gust_speed,
        direction: COMPASS_POINTS[index].to_string(),
        direction_degrees: (index as u16) * 45,
        beaufort_scale: beaufort_from_kmh(speed),
        beaufort_description: BEAUFORT_DESCRIPTIONS[beaufort_from_kmh(speed) as usize].to_string(),
        hourly_forecast,
    }
}

/// Wind block of an OpenWeatherMap current weather response
#[derive(Debug, Deserialize)]
struct OwmWindCurrent {
    wind: Option<OwmWindBlock>,
}

/// Relevant slice of an OpenWeatherMap 3-hourly forecast response
#[derive(Debug, Deserialize)]
struct OwmWindForecast {
    #[serde(default)]
    list: Vec<OwmWindForecastItem>,
}

#[derive(Debug, Deserialize)]
struct OwmWindForecastItem {
    dt: i64,
    wind: Option<OwmWindBlock>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct OwmWindBlock {
    speed: Option<f64>,
    deg: Option<f64>,
    gust: Option<f64>,
}

//! OpenWeatherMap current-weather adapter
//!
//! Wraps the `/data/2.5/weather` endpoint and normalizes its payload into a
//! [`WeatherSnapshot`]: provider condition codes collapse into the four
//! app-level conditions, wind speed converts from m/s to km/h, direction
//! degrees map onto the 8-point compass and visibility meters become km.

use reqwest::Client;
use serde::Deserialize;

use super::wind::ms_to_kmh;
use super::{
    compass_from_degrees, default_http_client, Coordinates, FetchError, WeatherCondition,
    WeatherSnapshot,
};
use crate::config::Config;

const PROVIDER: &str = "OpenWeatherMap";

/// Client for fetching current weather from OpenWeatherMap
#[derive(Debug, Clone)]
pub struct WeatherClient {
    client: Client,
    api_key: Option<String>,
    base_url: String,
}

impl WeatherClient {
    /// Creates a new WeatherClient from the app configuration
    pub fn new(config: &Config) -> Self {
        Self::with_client(default_http_client(), config)
    }

    /// Creates a new WeatherClient reusing an existing HTTP client
    pub fn with_client(client: Client, config: &Config) -> Self {
        Self {
            client,
            api_key: config.openweathermap_api_key.clone(),
            base_url: config.openweathermap_base_url.clone(),
        }
    }

    /// Fetches and normalizes the current weather for the given coordinates
    ///
    /// # Returns
    /// * `Ok(WeatherSnapshot)` - Normalized weather for the location
    /// * `Err(FetchError)` - Missing credentials, transport failure or a
    ///   non-success upstream status
    pub async fn fetch_weather(&self, coords: Coordinates) -> Result<WeatherSnapshot, FetchError> {
        let api_key = self.api_key.as_deref().ok_or(FetchError::MissingApiKey)?;

        tracing::debug!(
            lat = coords.latitude,
            lon = coords.longitude,
            "fetching current weather"
        );

        let url = format!("{}/data/2.5/weather", self.base_url);
        let response = self
            .client
            .get(&url)
            .query(&[
                ("lat", coords.latitude.to_string()),
                ("lon", coords.longitude.to_string()),
                ("appid", api_key.to_string()),
                ("units", "metric".to_string()),
                ("lang", "pt_br".to_string()),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(FetchError::UpstreamStatus {
                provider: PROVIDER,
                status: response.status().as_u16(),
            });
        }

        let payload: OwmCurrentResponse = response.json().await?;
        Ok(normalize_weather(payload))
    }
}

/// Maps an OpenWeatherMap condition group to the app-level condition
///
/// Unmapped groups default to partly-cloudy.
pub fn map_condition(owm_main: &str) -> WeatherCondition {
    match owm_main {
        "Clear" => WeatherCondition::Sunny,
        "Clouds" | "Snow" => WeatherCondition::Cloudy,
        "Rain" | "Drizzle" | "Thunderstorm" => WeatherCondition::Rainy,
        "Mist" | "Fog" | "Haze" => WeatherCondition::PartlyCloudy,
        _ => WeatherCondition::PartlyCloudy,
    }
}

fn normalize_weather(payload: OwmCurrentResponse) -> WeatherSnapshot {
    let entry = payload.weather.first();
    let condition = map_condition(entry.map(|w| w.main.as_str()).unwrap_or("Clear"));
    let description = entry.and_then(|w| w.description.clone());

    let wind = payload.wind.unwrap_or_default();
    let wind_deg = wind.deg.unwrap_or(0.0);

    let sys = payload.sys.unwrap_or_default();
    let (sunrise, sunset, day_length) = sun_times(sys.sunrise, sys.sunset);

    WeatherSnapshot {
        condition,
        temperature: payload.main.temp.round() as i32,
        feels_like: payload.main.feels_like.round() as i32,
        humidity: payload.main.humidity,
        pressure: payload.main.pressure.unwrap_or(0),
        wind_speed: ms_to_kmh(wind.speed.unwrap_or(0.0)),
        wind_direction: compass_from_degrees(wind_deg).to_string(),
        // Meters to km; a missing value means "at least 10 km"
        visibility: ((payload.visibility.unwrap_or(10_000) as f64) / 1000.0).round() as u32,
        // The free tier carries no UV data, so report a mid-scale estimate
        uv_index: 5,
        description,
        sunrise,
        sunset,
        day_length,
    }
}

/// Formats sunrise/sunset epochs as "HH:MM" UTC plus a day-length text
fn sun_times(sunrise: Option<i64>, sunset: Option<i64>) -> (String, String, String) {
    let fmt = |epoch: i64| {
        chrono::DateTime::from_timestamp(epoch, 0)
            .map(|dt| dt.format("%H:%M").to_string())
            .unwrap_or_else(|| "--:--".to_string())
    };

    match (sunrise, sunset) {
        (Some(rise), Some(set)) if set > rise => {
            let span = set - rise;
            let day_length = format!("{}h {}min", span / 3600, (span % 3600) / 60);
            (fmt(rise), fmt(set), day_length)
        }
        _ => ("--:--".to_string(), "--:--".to_string(), "-".to_string()),
    }
}

/// OpenWeatherMap current weather response
#[derive(Debug, Deserialize)]
struct OwmCurrentResponse {
    #[serde(default)]
    weather: Vec<OwmWeatherEntry>,
    main: OwmMain,
    visibility: Option<u32>,
    wind: Option<OwmWind>,
    sys: Option<OwmSys>,
}

#[derive(Debug, Deserialize)]
struct OwmWeatherEntry {
    main: String,
    description: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OwmMain {
    temp: f64,
    feels_like: f64,
    pressure: Option<u32>,
    humidity: u8,
}

#[derive(Debug, Default, Deserialize)]
struct OwmWind {
    speed: Option<f64>,
    deg: Option<f64>,
    #[allow(dead_code)]
    gust: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
struct OwmSys {
    sunrise: Option<i64>,
    sunset: Option<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Sample OpenWeatherMap response for Santos with a 10 m/s south-west wind
    const VALID_RESPONSE: &str = r#"{
        "coord": {"lon": -46.3336, "lat": -23.9608},
        "weather": [
            {"id": 500, "main": "Rain", "description": "chuva leve", "icon": "10d"}
        ],
        "main": {
            "temp": 23.6,
            "feels_like": 24.2,
            "temp_min": 22.0,
            "temp_max": 25.1,
            "pressure": 1016,
            "humidity": 78
        },
        "visibility": 10000,
        "wind": {"speed": 10.0, "deg": 225, "gust": 13.4},
        "sys": {"country": "BR", "sunrise": 1693459440, "sunset": 1693503360},
        "name": "Santos"
    }"#;

    fn parse(json: &str) -> WeatherSnapshot {
        let payload: OwmCurrentResponse = serde_json::from_str(json).unwrap();
        normalize_weather(payload)
    }

    #[test]
    fn test_normalize_valid_response() {
        let weather = parse(VALID_RESPONSE);

        assert_eq!(weather.condition, WeatherCondition::Rainy);
        assert_eq!(weather.temperature, 24);
        assert_eq!(weather.feels_like, 24);
        assert_eq!(weather.humidity, 78);
        assert_eq!(weather.pressure, 1016);
        assert_eq!(weather.description.as_deref(), Some("chuva leve"));
    }

    #[test]
    fn test_wind_speed_converts_ms_to_kmh() {
        // 10 m/s must come out as exactly 36 km/h
        let weather = parse(VALID_RESPONSE);
        assert_eq!(weather.wind_speed, 36);
    }

    #[test]
    fn test_wind_direction_225_degrees_is_sw() {
        let weather = parse(VALID_RESPONSE);
        assert_eq!(weather.wind_direction, "SW");
    }

    #[test]
    fn test_visibility_meters_become_km() {
        let weather = parse(VALID_RESPONSE);
        assert_eq!(weather.visibility, 10);
    }

    #[test]
    fn test_sun_times_from_epochs() {
        let weather = parse(VALID_RESPONSE);
        assert_eq!(weather.sunrise, "05:24");
        assert_eq!(weather.sunset, "17:36");
        assert_eq!(weather.day_length, "12h 12min");
    }

    #[test]
    fn test_missing_optional_fields_use_defaults() {
        let minimal = r#"{
            "weather": [{"id": 800, "main": "Clear", "description": "céu limpo"}],
            "main": {"temp": 28.4, "feels_like": 29.0, "humidity": 55}
        }"#;

        let weather = parse(minimal);
        assert_eq!(weather.condition, WeatherCondition::Sunny);
        assert_eq!(weather.wind_speed, 0);
        assert_eq!(weather.wind_direction, "N");
        assert_eq!(weather.visibility, 10, "missing visibility defaults to 10 km");
        assert_eq!(weather.sunrise, "--:--");
        assert_eq!(weather.day_length, "-");
    }

    #[test]
    fn test_condition_mapping_table() {
        assert_eq!(map_condition("Clear"), WeatherCondition::Sunny);
        assert_eq!(map_condition("Clouds"), WeatherCondition::Cloudy);
        assert_eq!(map_condition("Snow"), WeatherCondition::Cloudy);
        assert_eq!(map_condition("Rain"), WeatherCondition::Rainy);
        assert_eq!(map_condition("Drizzle"), WeatherCondition::Rainy);
        assert_eq!(map_condition("Thunderstorm"), WeatherCondition::Rainy);
        assert_eq!(map_condition("Mist"), WeatherCondition::PartlyCloudy);
        assert_eq!(map_condition("Fog"), WeatherCondition::PartlyCloudy);
        assert_eq!(map_condition("Haze"), WeatherCondition::PartlyCloudy);
    }

    #[test]
    fn test_unknown_condition_defaults_to_partly_cloudy() {
        assert_eq!(map_condition("Tornado"), WeatherCondition::PartlyCloudy);
        assert_eq!(map_condition("Squall"), WeatherCondition::PartlyCloudy);
        assert_eq!(map_condition(""), WeatherCondition::PartlyCloudy);
    }

    #[test]
    fn test_uv_index_is_mid_scale_estimate() {
        let weather = parse(VALID_RESPONSE);
        assert_eq!(weather.uv_index, 5);
    }

    #[tokio::test]
    async fn test_missing_api_key_fails_before_any_request() {
        let config = Config {
            openweathermap_api_key: None,
            ..Config::for_tests()
        };
        let client = WeatherClient::new(&config);
        let coords = Coordinates::new(-23.9608, -46.3336).unwrap();

        let result = client.fetch_weather(coords).await;
        assert!(matches!(result, Err(FetchError::MissingApiKey)));
    }

    #[tokio::test]
    async fn test_upstream_error_status_is_a_typed_failure() {
        let base_url = crate::data::testing::spawn_status_server("503 Service Unavailable").await;
        let config = Config {
            openweathermap_base_url: base_url,
            ..Config::for_tests()
        };
        let client = WeatherClient::new(&config);
        let coords = Coordinates::new(-23.9608, -46.3336).unwrap();

        match client.fetch_weather(coords).await {
            Err(FetchError::UpstreamStatus { provider, status }) => {
                assert_eq!(provider, "OpenWeatherMap");
                assert_eq!(status, 503);
            }
            other => panic!("expected UpstreamStatus, got {:?}", other),
        }
    }
}

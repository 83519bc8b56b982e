//! WorldTides extremes adapter
//!
//! Fetches the high/low water extremes for one calendar day and normalizes
//! them into [`TideEvent`]s. A 200 response that carries an `error` field or
//! an empty extremes list is a typed failure, never an empty success: the
//! aggregator relies on that distinction to substitute synthetic tides.

use chrono::NaiveDate;
use reqwest::Client;
use serde::Deserialize;

use super::{default_http_client, Coordinates, FetchError, TideEvent, TideKind};
use crate::config::Config;

const PROVIDER: &str = "WorldTides";

/// Client for fetching tide extremes from WorldTides
#[derive(Debug, Clone)]
pub struct TidesClient {
    client: Client,
    api_key: Option<String>,
    base_url: String,
}

impl TidesClient {
    /// Creates a new TidesClient from the app configuration
    pub fn new(config: &Config) -> Self {
        Self::with_client(default_http_client(), config)
    }

    /// Creates a new TidesClient reusing an existing HTTP client
    pub fn with_client(client: Client, config: &Config) -> Self {
        Self {
            client,
            api_key: config.worldtides_api_key.clone(),
            base_url: config.worldtides_base_url.clone(),
        }
    }

    /// Fetches the tide extremes for the given coordinates and date
    ///
    /// The request window spans the forecast date from 00:00:00 to 23:59:59
    /// UTC, so a day normally yields 2-4 alternating extremes.
    pub async fn fetch_tides(
        &self,
        coords: Coordinates,
        date: NaiveDate,
    ) -> Result<Vec<TideEvent>, FetchError> {
        let api_key = self.api_key.as_deref().ok_or(FetchError::MissingApiKey)?;

        let start = date.and_hms_opt(0, 0, 0).map(|dt| dt.and_utc().timestamp());
        let end = date
            .and_hms_opt(23, 59, 59)
            .map(|dt| dt.and_utc().timestamp());
        let (Some(start), Some(end)) = (start, end) else {
            return Err(FetchError::NoData);
        };

        tracing::debug!(
            lat = coords.latitude,
            lon = coords.longitude,
            %date,
            "fetching tide extremes"
        );

        let url = format!("{}/api/v3", self.base_url);
        let response = self
            .client
            .get(&url)
            .query(&[
                ("extremes", String::new()),
                ("lat", coords.latitude.to_string()),
                ("lon", coords.longitude.to_string()),
                ("start", start.to_string()),
                ("end", end.to_string()),
                ("key", api_key.to_string()),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(FetchError::UpstreamStatus {
                provider: PROVIDER,
                status: response.status().as_u16(),
            });
        }

        let payload: WorldTidesResponse = response.json().await?;
        if let Some(station) = &payload.station {
            tracing::debug!(%station, "tide extremes resolved against station");
        }
        parse_extremes(payload)
    }
}

/// Normalizes a WorldTides payload into chronological tide events
fn parse_extremes(payload: WorldTidesResponse) -> Result<Vec<TideEvent>, FetchError> {
    if let Some(message) = payload.error {
        return Err(FetchError::UpstreamError {
            provider: PROVIDER,
            message,
        });
    }

    let events: Vec<TideEvent> = payload
        .extremes
        .iter()
        .filter_map(|extreme| {
            let time = chrono::DateTime::from_timestamp(extreme.dt, 0)?
                .format("%H:%M")
                .to_string();
            Some(TideEvent {
                time,
                height: (extreme.height * 100.0).round() / 100.0,
                kind: if extreme.kind == "High" {
                    TideKind::High
                } else {
                    TideKind::Low
                },
            })
        })
        .collect();

    if events.is_empty() {
        return Err(FetchError::NoData);
    }
    Ok(events)
}

/// WorldTides v3 response envelope
#[derive(Debug, Deserialize)]
struct WorldTidesResponse {
    #[serde(default)]
    extremes: Vec<WorldTidesExtreme>,
    station: Option<String>,
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct WorldTidesExtreme {
    /// Unix timestamp of the extreme
    dt: i64,
    /// Height in meters relative to mean sea level
    height: f64,
    #[serde(rename = "type")]
    kind: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Sample WorldTides extremes for one day (epochs are on 1693440000,
    /// a midnight boundary, so the expected HH:MM values are easy to read)
    const VALID_RESPONSE: &str = r#"{
        "status": 200,
        "callCount": 1,
        "requestLat": -23.9608,
        "requestLon": -46.3336,
        "station": "Santos",
        "extremes": [
            {"dt": 1693456200, "date": "2023-08-31T04:30+0000", "height": 1.23456, "type": "High"},
            {"dt": 1693478700, "date": "2023-08-31T10:45+0000", "height": 0.31999, "type": "Low"},
            {"dt": 1693500720, "date": "2023-08-31T16:52+0000", "height": 1.405, "type": "High"},
            {"dt": 1693523100, "date": "2023-08-31T23:05+0000", "height": -0.042, "type": "Low"}
        ]
    }"#;

    fn parse(json: &str) -> Result<Vec<TideEvent>, FetchError> {
        let payload: WorldTidesResponse = serde_json::from_str(json).unwrap();
        parse_extremes(payload)
    }

    #[test]
    fn test_parse_valid_extremes() {
        let tides = parse(VALID_RESPONSE).unwrap();

        assert_eq!(tides.len(), 4);
        assert_eq!(tides[0].time, "04:30");
        assert_eq!(tides[0].kind, TideKind::High);
        assert_eq!(tides[1].time, "10:45");
        assert_eq!(tides[1].kind, TideKind::Low);
        assert_eq!(tides[3].time, "23:05");
    }

    #[test]
    fn test_heights_round_to_two_decimals() {
        let tides = parse(VALID_RESPONSE).unwrap();

        assert_eq!(tides[0].height, 1.23);
        assert_eq!(tides[1].height, 0.32);
        assert_eq!(tides[2].height, 1.41);
        assert_eq!(tides[3].height, -0.04);
    }

    #[test]
    fn test_type_high_maps_to_high_everything_else_to_low() {
        let json = r#"{
            "extremes": [
                {"dt": 1693456200, "height": 1.0, "type": "High"},
                {"dt": 1693478700, "height": 0.3, "type": "Low"},
                {"dt": 1693500720, "height": 0.4, "type": "low"},
                {"dt": 1693523100, "height": 0.5, "type": "Slack"}
            ]
        }"#;

        let tides = parse(json).unwrap();
        assert_eq!(tides[0].kind, TideKind::High);
        assert_eq!(tides[1].kind, TideKind::Low);
        assert_eq!(tides[2].kind, TideKind::Low);
        assert_eq!(tides[3].kind, TideKind::Low);
    }

    #[test]
    fn test_error_payload_is_a_typed_failure() {
        let json = r#"{"status": 400, "error": "No data for this location"}"#;

        let result = parse(json);
        match result {
            Err(FetchError::UpstreamError { provider, message }) => {
                assert_eq!(provider, "WorldTides");
                assert_eq!(message, "No data for this location");
            }
            other => panic!("expected UpstreamError, got {:?}", other),
        }
    }

    #[test]
    fn test_empty_extremes_is_a_failure_not_an_empty_success() {
        let json = r#"{"status": 200, "station": "Santos", "extremes": []}"#;
        assert!(matches!(parse(json), Err(FetchError::NoData)));

        let json = r#"{"status": 200, "station": "Santos"}"#;
        assert!(matches!(parse(json), Err(FetchError::NoData)));
    }

    #[tokio::test]
    async fn test_missing_api_key_fails_before_any_request() {
        let config = Config {
            worldtides_api_key: None,
            ..Config::for_tests()
        };
        let client = TidesClient::new(&config);
        let coords = Coordinates::new(-23.9608, -46.3336).unwrap();
        let date = NaiveDate::from_ymd_opt(2026, 8, 27).unwrap();

        let result = client.fetch_tides(coords, date).await;
        assert!(matches!(result, Err(FetchError::MissingApiKey)));
    }

    #[tokio::test]
    async fn test_upstream_500_is_a_typed_failure() {
        let base_url = crate::data::testing::spawn_status_server("500 Internal Server Error").await;
        let config = Config {
            worldtides_base_url: base_url,
            ..Config::for_tests()
        };
        let client = TidesClient::new(&config);
        let coords = Coordinates::new(-23.9608, -46.3336).unwrap();
        let date = NaiveDate::from_ymd_opt(2026, 8, 27).unwrap();

        match client.fetch_tides(coords, date).await {
            Err(FetchError::UpstreamStatus { provider, status }) => {
                assert_eq!(provider, "WorldTides");
                assert_eq!(status, 500);
            }
            other => panic!("expected UpstreamStatus, got {:?}", other),
        }
    }
}

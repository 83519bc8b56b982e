//! Command-line interface parsing for Maretempo
//!
//! This module handles parsing of CLI arguments using clap and resolves them
//! into one [`ForecastRequest`]: either a catalog location by name, explicit
//! coordinates, or the default location when nothing is specified.

use clap::Parser;
use thiserror::Error;

use crate::data::{parse_forecast_date, CoordinatesError, ForecastRequest};
use crate::locations::{default_location, find_location};

/// Error types for CLI argument resolution
#[derive(Debug, Error)]
pub enum CliError {
    /// The specified location is not in the built-in catalog
    #[error("Unknown location: '{0}'. Use the full catalog name, e.g. \"Santos, SP\"")]
    UnknownLocation(String),

    /// The date argument is not a parseable calendar date
    #[error("Invalid date: '{0}'. Expected YYYY-MM-DD")]
    InvalidDate(String),

    /// Explicit coordinates fall outside the WGS84 range
    #[error(transparent)]
    InvalidCoordinates(#[from] CoordinatesError),
}

/// Maretempo - Brazilian coastal weather, tides, wind and fishing forecasts
#[derive(Parser, Debug)]
#[command(name = "maretempo")]
#[command(about = "Coastal conditions for Brazilian beaches")]
#[command(version)]
pub struct Cli {
    /// Catalog location by full name, e.g. "Santos, SP"
    #[arg(long, conflicts_with_all = ["lat", "lon", "name"])]
    pub location: Option<String>,

    /// Latitude in decimal degrees (requires --lon)
    #[arg(long, requires = "lon", allow_hyphen_values = true)]
    pub lat: Option<f64>,

    /// Longitude in decimal degrees (requires --lat)
    #[arg(long, requires = "lat", allow_hyphen_values = true)]
    pub lon: Option<f64>,

    /// Display name for explicit coordinates
    #[arg(long, requires = "lat")]
    pub name: Option<String>,

    /// Forecast date as YYYY-MM-DD (defaults to today)
    #[arg(long)]
    pub date: Option<String>,

    /// Skip the providers entirely and render generated data only
    #[arg(long)]
    pub offline: bool,
}

/// Resolves parsed arguments into a forecast request
///
/// Precedence: --location wins, then --lat/--lon, then the default catalog
/// location. The date defaults to the current UTC day.
pub fn resolve_request(cli: &Cli) -> Result<ForecastRequest, CliError> {
    let date = match &cli.date {
        Some(raw) => {
            parse_forecast_date(raw).ok_or_else(|| CliError::InvalidDate(raw.clone()))?
        }
        None => chrono::Utc::now().date_naive(),
    };

    let (latitude, longitude, name) = match (&cli.location, cli.lat, cli.lon) {
        (Some(query), _, _) => {
            let location =
                find_location(query).ok_or_else(|| CliError::UnknownLocation(query.clone()))?;
            (location.latitude, location.longitude, location.name.to_string())
        }
        (None, Some(lat), Some(lon)) => {
            let name = cli
                .name
                .clone()
                .unwrap_or_else(|| "Local personalizado".to_string());
            (lat, lon, name)
        }
        _ => {
            let location = default_location();
            (location.latitude, location.longitude, location.name.to_string())
        }
    };

    Ok(ForecastRequest::new(latitude, longitude, date, name)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn parse(args: &[&str]) -> Cli {
        Cli::parse_from(std::iter::once("maretempo").chain(args.iter().copied()))
    }

    #[test]
    fn test_no_args_resolves_to_default_location() {
        let request = resolve_request(&parse(&[])).unwrap();
        assert_eq!(request.location_name, "Santos, SP");
        assert_eq!(request.coordinates.latitude, -23.9608);
    }

    #[test]
    fn test_catalog_location_by_name() {
        let request = resolve_request(&parse(&["--location", "búzios, rj"])).unwrap();
        assert_eq!(request.location_name, "Búzios, RJ");
        assert_eq!(request.coordinates.longitude, -41.8817);
    }

    #[test]
    fn test_unknown_location_is_an_error() {
        let result = resolve_request(&parse(&["--location", "Atlantis"]));
        assert!(matches!(result, Err(CliError::UnknownLocation(_))));
    }

    #[test]
    fn test_explicit_coordinates_with_name() {
        let cli = parse(&["--lat", "-23.5", "--lon", "-45.1", "--name", "Praia Secreta"]);
        let request = resolve_request(&cli).unwrap();
        assert_eq!(request.location_name, "Praia Secreta");
        assert_eq!(request.coordinates.latitude, -23.5);
    }

    #[test]
    fn test_explicit_coordinates_default_name() {
        let cli = parse(&["--lat", "-23.5", "--lon", "-45.1"]);
        let request = resolve_request(&cli).unwrap();
        assert_eq!(request.location_name, "Local personalizado");
    }

    #[test]
    fn test_out_of_range_coordinates_are_an_error() {
        let cli = parse(&["--lat", "95.0", "--lon", "-45.1"]);
        assert!(matches!(
            resolve_request(&cli),
            Err(CliError::InvalidCoordinates(_))
        ));
    }

    #[test]
    fn test_date_argument_parses_plain_and_iso_datetime() {
        let expected = NaiveDate::from_ymd_opt(2026, 8, 15).unwrap();

        let plain = resolve_request(&parse(&["--date", "2026-08-15"])).unwrap();
        assert_eq!(plain.date, expected);

        let iso = resolve_request(&parse(&["--date", "2026-08-15T14:00:00.000Z"])).unwrap();
        assert_eq!(iso.date, expected);
    }

    #[test]
    fn test_invalid_date_is_an_error() {
        let result = resolve_request(&parse(&["--date", "15/08/2026"]));
        assert!(matches!(result, Err(CliError::InvalidDate(_))));
    }

    #[test]
    fn test_offline_flag_defaults_off() {
        assert!(!parse(&[]).offline);
        assert!(parse(&["--offline"]).offline);
        // Offline still resolves a location and date normally
        let cli = parse(&["--offline", "--location", "Santos, SP"]);
        assert_eq!(resolve_request(&cli).unwrap().location_name, "Santos, SP");
    }

    #[test]
    fn test_lat_without_lon_is_rejected_by_clap() {
        let result = Cli::try_parse_from(["maretempo", "--lat", "-23.5"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_location_conflicts_with_coordinates() {
        let result =
            Cli::try_parse_from(["maretempo", "--location", "Santos, SP", "--lat", "-23.5"]);
        assert!(result.is_err());
    }
}

//! Deterministic synthetic forecast generators
//!
//! When a provider is unreachable the aggregator substitutes data produced
//! here. Everything is a pure function of the forecast date (and, where
//! noted, the location name): no I/O, no randomness, so the same day and
//! location always render identically and tests can assert exact values.
//!
//! The fish forecast is special: it has no live provider at all and is
//! always generated by this module.

use chrono::{Datelike, NaiveDate};

use crate::data::{
    wind::BEAUFORT_DESCRIPTIONS, FishForecast, FishRating, HourlyWind, SunMoon, TideEvent,
    TideKind, WeatherCondition, WeatherSnapshot, WindSnapshot, COMPASS_POINTS,
};

const MOON_PHASES: [&str; 4] = ["Lua Nova", "Lua Crescente", "Lua Cheia", "Lua Minguante"];

const TIDE_INFLUENCES: [&str; 4] = ["Favorável", "Muito Favorável", "Neutro", "Desfavorável"];

const TIP_POOL: [&str; 12] = [
    "Aposte em iscas naturais durante a maré enchendo para melhores resultados.",
    "O vento leste favorece a aproximação de cardumes na costa.",
    "Pesque próximo às pedras durante a maré baixa.",
    "Iscas artificiais funcionam melhor nas primeiras horas da manhã.",
    "A lua cheia aumenta a atividade dos peixes durante a noite.",
    "Prefira linhas mais finas em águas claras para não assustar os peixes.",
    "Observe as aves marinhas - onde elas mergulham há cardumes.",
    "O amanhecer e o entardecer são os melhores horários para pescar.",
    "Marés de sizígia (lua nova/cheia) costumam trazer mais peixes.",
    "Use iscas vivas para atrair peixes maiores e mais arredios.",
    "Verifique a temperatura da água - peixes preferem águas entre 20-26°C.",
    "Pescar após chuvas leves pode ser produtivo por causa da água movimentada.",
];

/// Species in season along the Brazilian coast, keyed by month (January = 0)
const SEASONAL_SPECIES: [[&str; 6]; 12] = [
    ["Robalo", "Corvina", "Tainha", "Anchova", "Xaréu", "Olho-de-Boi"],
    ["Robalo", "Corvina", "Tainha", "Anchova", "Xaréu", "Dourado"],
    ["Corvina", "Pescada", "Tainha", "Anchova", "Sargo", "Betara"],
    ["Corvina", "Pescada", "Tainha", "Parati", "Sargo", "Betara"],
    ["Pescada", "Tainha", "Parati", "Corvina", "Bagre", "Linguado"],
    ["Tainha", "Pescada", "Corvina", "Parati", "Bagre", "Linguado"],
    ["Tainha", "Corvina", "Pescada", "Bagre", "Linguado", "Pampo"],
    ["Tainha", "Corvina", "Pescada", "Pampo", "Linguado", "Betara"],
    ["Corvina", "Robalo", "Pescada", "Pampo", "Anchova", "Carapeba"],
    ["Robalo", "Corvina", "Anchova", "Pescada", "Pampo", "Carapeba"],
    ["Robalo", "Anchova", "Corvina", "Xaréu", "Pampo", "Olho-de-Boi"],
    ["Robalo", "Anchova", "Corvina", "Xaréu", "Dourado", "Olho-de-Boi"],
];

fn hhmm(hour: u32, minute: u32) -> String {
    format!("{:02}:{:02}", hour, minute)
}

/// The seed every formula in this module is keyed on
fn day_of_month(date: NaiveDate) -> u32 {
    date.day()
}

/// Length of the location name, the secondary seed for weather and fish data
fn name_seed(location_name: &str) -> u32 {
    location_name.chars().count() as u32
}

/// Generates four tide extremes for the given date
///
/// Events are spaced six hours apart from a date-derived base hour and
/// alternate high/low. The result is sorted chronologically; because of the
/// even spacing the strict alternation survives any midnight wrap-around.
pub fn generate_tides(date: NaiveDate) -> Vec<TideEvent> {
    let d = day_of_month(date);
    let base_hour = d % 12 + 1;

    let mut tides = vec![
        TideEvent {
            time: hhmm(base_hour, (d * 7) % 60),
            height: 1.2 + (d % 5) as f64 * 0.1,
            kind: TideKind::High,
        },
        TideEvent {
            time: hhmm((base_hour + 6) % 24, (d * 3) % 60),
            height: 0.3 + (d % 3) as f64 * 0.1,
            kind: TideKind::Low,
        },
        TideEvent {
            time: hhmm((base_hour + 12) % 24, (d * 11) % 60),
            height: 1.4 + (d % 4) as f64 * 0.1,
            kind: TideKind::High,
        },
        TideEvent {
            time: hhmm((base_hour + 18) % 24, (d * 5) % 60),
            height: 0.2 + (d % 4) as f64 * 0.1,
            kind: TideKind::Low,
        },
    ];

    // "HH:MM" compares lexicographically in time order
    tides.sort_by(|a, b| a.time.cmp(&b.time));
    tides
}

/// Generates a full weather snapshot for the given date and location name
pub fn generate_weather(date: NaiveDate, location_name: &str) -> WeatherSnapshot {
    let d = day_of_month(date);
    let conditions = [
        WeatherCondition::Sunny,
        WeatherCondition::Cloudy,
        WeatherCondition::Rainy,
        WeatherCondition::PartlyCloudy,
    ];
    let condition = conditions[((d + name_seed(location_name)) % 4) as usize];

    let temperature = 22 + (d % 10) as i32;
    let humidity = (50 + d % 40) as u8;
    let feels_like = if humidity > 70 {
        temperature + 3
    } else {
        temperature - 1
    };

    let sunrise_hour = 5 + d % 2;
    let sunset_hour = 17 + d % 3;

    WeatherSnapshot {
        condition,
        temperature,
        feels_like,
        humidity,
        pressure: 1010 + d % 20,
        wind_speed: 10 + d % 20,
        wind_direction: COMPASS_POINTS[(d % 8) as usize].to_string(),
        visibility: 8 + d % 12,
        uv_index: (3 + d % 8).min(11) as u8,
        description: None,
        sunrise: hhmm(sunrise_hour, (d * 2) % 60),
        sunset: hhmm(sunset_hour, (d * 3) % 60),
        day_length: day_length_text(sunrise_hour, sunset_hour, d),
    }
}

fn day_length_text(sunrise_hour: u32, sunset_hour: u32, d: u32) -> String {
    let minutes = ((d * 3) % 60).abs_diff((d * 2) % 60);
    format!("{}h {}min", sunset_hour - sunrise_hour, minutes)
}

/// Generates wind conditions plus a six-entry hourly outlook
///
/// The outlook starts at a date-derived hour rather than the wall clock so
/// the whole snapshot is reproducible. Direction rotates one compass step
/// every two hours.
pub fn generate_wind(date: NaiveDate) -> WindSnapshot {
    let d = day_of_month(date);
    let direction_index = (d % 8) as usize;

    let speed = 8 + d % 25;
    let gust_speed = speed + 5 + d % 10;
    let beaufort_scale = (speed / 5).min(9) as u8;

    let base_hour = d % 24;
    let hourly_forecast = (0..6)
        .map(|i| {
            let jittered = speed as i64 + ((d + i) % 10) as i64 - 5;
            HourlyWind {
                time: format!("{:02}:00", (base_hour + i) % 24),
                speed: jittered.max(0) as u32,
                direction: COMPASS_POINTS[(direction_index + i as usize / 2) % 8].to_string(),
            }
        })
        .collect();

    WindSnapshot {
        speed,
        gust_speed,
        direction: COMPASS_POINTS[direction_index].to_string(),
        direction_degrees: (direction_index * 45) as u16,
        beaufort_scale,
        beaufort_description: BEAUFORT_DESCRIPTIONS[beaufort_scale as usize].to_string(),
        hourly_forecast,
    }
}

/// Generates the fishing forecast for the given date and location name
///
/// Tips are drawn from a fixed pool at offsets 0/+3/+7 from a date-derived
/// start so the same day never repeats a tip. Recommended species come from
/// the seasonal table for the forecast month.
pub fn generate_fish_forecast(date: NaiveDate, location_name: &str) -> FishForecast {
    let d = day_of_month(date);
    let ratings = [
        FishRating::Excellent,
        FishRating::Good,
        FishRating::Moderate,
        FishRating::Poor,
    ];
    let overall_rating = ratings[((d + name_seed(location_name)) % 4) as usize];

    let base_hour = d % 6 + 5;
    let best_times = vec![
        format!("{:02}:00 - {:02}:00", base_hour, base_hour + 2),
        format!(
            "{:02}:00 - {:02}:00",
            (base_hour + 12) % 24,
            (base_hour + 14) % 24
        ),
    ];

    let pool_len = TIP_POOL.len() as u32;
    let tip_start = d % pool_len;
    let tips = [0u32, 3, 7]
        .iter()
        .map(|&offset| TIP_POOL[((tip_start + offset) % pool_len) as usize].to_string())
        .collect();

    let month_species = &SEASONAL_SPECIES[date.month0() as usize];
    let species_start = (d % 6) as usize;
    let recommended_species = (0..4)
        .map(|i| month_species[(species_start + i) % 6].to_string())
        .collect();

    let sunrise_hour = 5 + d % 2;
    let sunset_hour = 17 + d % 3;
    let moonrise_hour = (d + 6) % 24;
    let moonset_hour = (moonrise_hour + 12) % 24;

    FishForecast {
        overall_rating,
        best_times,
        moon_phase: MOON_PHASES[(d % 4) as usize].to_string(),
        tide_influence: TIDE_INFLUENCES[((d + 1) % 4) as usize].to_string(),
        recommended_species,
        tips,
        sun_moon: SunMoon {
            sunrise: hhmm(sunrise_hour, (d * 2) % 60),
            sunset: hhmm(sunset_hour, (d * 3) % 60),
            moonrise: hhmm(moonrise_hour, (d * 5) % 60),
            moonset: hhmm(moonset_hour, (d * 4) % 60),
            day_length: day_length_text(sunrise_hour, sunset_hour, d),
        },
    }
}

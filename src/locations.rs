//! Built-in catalog of popular Brazilian coastal locations
//!
//! Lookup is by full display name, case-insensitive. The index is built once
//! on first use; the catalog itself is a compile-time table.

use std::collections::HashMap;
use std::sync::OnceLock;

/// A named coastal location from the built-in catalog
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Location {
    pub name: &'static str,
    pub latitude: f64,
    pub longitude: f64,
}

/// Popular coastal locations, most-searched first
pub const POPULAR_LOCATIONS: [Location; 18] = [
    Location { name: "Santos, SP", latitude: -23.9608, longitude: -46.3336 },
    Location { name: "Guarujá, SP", latitude: -23.9930, longitude: -46.2564 },
    Location { name: "Ubatuba, SP", latitude: -23.4336, longitude: -45.0838 },
    Location { name: "Florianópolis, SC", latitude: -27.5954, longitude: -48.5480 },
    Location { name: "Criciúma, SC", latitude: -28.6775, longitude: -49.3697 },
    Location { name: "Balneário Camboriú, SC", latitude: -26.9906, longitude: -48.6352 },
    Location { name: "Itajaí, SC", latitude: -26.9078, longitude: -48.6619 },
    Location { name: "Rio de Janeiro, RJ", latitude: -22.9068, longitude: -43.1729 },
    Location { name: "Búzios, RJ", latitude: -22.7469, longitude: -41.8817 },
    Location { name: "Arraial do Cabo, RJ", latitude: -22.9661, longitude: -42.0278 },
    Location { name: "Porto de Galinhas, PE", latitude: -8.5064, longitude: -35.0053 },
    Location { name: "Salvador, BA", latitude: -12.9714, longitude: -38.5014 },
    Location { name: "Maceió, AL", latitude: -9.6498, longitude: -35.7089 },
    Location { name: "Natal, RN", latitude: -5.7945, longitude: -35.2110 },
    Location { name: "Fortaleza, CE", latitude: -3.7172, longitude: -38.5433 },
    Location { name: "Ilhabela, SP", latitude: -23.7786, longitude: -45.3581 },
    Location { name: "Paraty, RJ", latitude: -23.2178, longitude: -44.7131 },
    Location { name: "Angra dos Reis, RJ", latitude: -23.0067, longitude: -44.3181 },
];

fn index() -> &'static HashMap<String, &'static Location> {
    static INDEX: OnceLock<HashMap<String, &'static Location>> = OnceLock::new();
    INDEX.get_or_init(|| {
        POPULAR_LOCATIONS
            .iter()
            .map(|location| (location.name.to_lowercase(), location))
            .collect()
    })
}

/// Finds a catalog location by display name, case-insensitively
pub fn find_location(name: &str) -> Option<&'static Location> {
    index().get(&name.to_lowercase()).copied()
}

/// The location used when none is specified
pub fn default_location() -> &'static Location {
    &POPULAR_LOCATIONS[0]
}

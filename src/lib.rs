//! Maretempo - Brazilian coastal conditions
//!
//! Aggregates weather, tide and wind data from public providers, fills any
//! gap with deterministic generated data, and attaches a locally generated
//! fishing forecast. The library surface exists for the binary and for
//! integration tests.

pub mod aggregator;
pub mod cli;
pub mod config;
pub mod data;
pub mod locations;
pub mod synthetic;

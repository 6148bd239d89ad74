//! Shared types for the Blue Flag beach weather updater.

pub mod conditions;
pub mod config;
pub mod error;
pub mod geo;
pub mod types;

pub use error::Error;
pub use types::{now_iso, BeachLocation, Measurement, WeatherCache, WeatherRecord};

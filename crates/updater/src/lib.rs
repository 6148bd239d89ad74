//! Updater engine crate.
//!
//! Loads the beach registry, decides what is stale, drives the fetch
//! fan-out, and owns the persisted cache plus the fuzzy lookup the
//! display layer reads through.

pub mod batch;
pub mod lookup;
pub mod registry;
pub mod store;

pub use batch::{BatchSlice, BatchUpdateEngine, FetchWeather, RunSummary};
pub use lookup::find;
pub use registry::{load_registry, unique_locations};
pub use store::{merge, CacheStore};

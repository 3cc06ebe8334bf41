//! owmcast library
//!
//! OpenWeatherMap client core: response parsing, unit conversion, a cached
//! weather store with change notification, display formatting and a
//! background refresh loop. The `owmcast` binary is a thin layer over these
//! modules.

pub mod api;
pub mod cache;
pub mod cli;
pub mod data;
pub mod format;
pub mod refresh;
pub mod store;

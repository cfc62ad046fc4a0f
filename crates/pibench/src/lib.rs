//! PiBench library: application logic for the pi benchmark binary.

pub mod app;
pub mod config;
pub mod errors;
pub mod logging;
pub mod version;

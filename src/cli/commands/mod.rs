//! CLI command implementations.

pub mod download;
pub mod scrape;
pub mod serve;

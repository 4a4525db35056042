//! albumfetch - scrape, cache and serve image albums.
//!
//! A headless browser searches the origin site for a term, picks a gallery
//! and extracts its images. Results are cached on disk and served over a
//! small HTTP API that also proxies and downloads the images.

pub mod browser;
pub mod cache;
pub mod cli;
pub mod config;
pub mod models;
pub mod scraper;
pub mod server;
pub mod services;
pub mod utils;

//! Shared utility functions.
//!
//! - `fs`: atomic file writes
//! - `html`: HTML escaping for safe rendering
//! - `mime`: content-type checks and byte sniffing
//! - `paths`: filesystem-safe path segments for search terms

mod fs;
mod html;
mod mime;
mod paths;

pub use fs::write_atomic;
pub use html::html_escape;
pub use mime::{is_image_content_type, sniff_image_mime};
pub use paths::storage_segment;

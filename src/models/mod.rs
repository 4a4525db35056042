//! Data models for albumfetch.

mod album;
mod key;

pub use album::{build_album, image_extension, term_slug, ImageRecord};
pub use key::AlbumKey;

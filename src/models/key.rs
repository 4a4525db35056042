//! Cache keys for albums.

use std::fmt;

/// Identifies one album: a search term, optionally narrowed to a gallery.
///
/// Term-only keys belong to the simple variant, which walks every gallery
/// it finds. Indexed keys pin a single 1-based gallery from the search page.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AlbumKey {
    pub term: String,
    pub index: Option<u32>,
}

impl AlbumKey {
    pub fn term(term: impl Into<String>) -> Self {
        Self {
            term: term.into(),
            index: None,
        }
    }

    pub fn indexed(term: impl Into<String>, index: u32) -> Self {
        Self {
            term: term.into(),
            index: Some(index),
        }
    }
}

impl fmt::Display for AlbumKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.index {
            Some(index) => write!(f, "{}#{}", self.term, index),
            None => f.write_str(&self.term),
        }
    }
}

//! Path segments derived from user-supplied search terms.

/// Encode a search term as a single directory name.
///
/// Percent-encoding keeps distinct terms in distinct directories and leaves
/// no separators behind; dots are encoded as well so `.` and `..` cannot
/// escape the storage root.
pub fn storage_segment(term: &str) -> String {
    urlencoding::encode(term).replace('.', "%2E")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn segments_are_single_components() {
        assert_eq!(storage_segment("Mia Nanasawa"), "Mia%20Nanasawa");
        assert_eq!(storage_segment("a/b"), "a%2Fb");
        assert_eq!(storage_segment(".."), "%2E%2E");
    }

    #[test]
    fn distinct_terms_do_not_collide() {
        assert_ne!(storage_segment("a/b"), storage_segment("a_b"));
        assert_ne!(storage_segment("a b"), storage_segment("a+b"));
    }
}

//! Content-type helpers for fetched images.

/// Whether a Content-Type header value denotes an image.
pub fn is_image_content_type(content_type: &str) -> bool {
    content_type.to_ascii_lowercase().contains("image")
}

/// Detect an image MIME type from the leading bytes, if any.
pub fn sniff_image_mime(bytes: &[u8]) -> Option<&'static str> {
    infer::get(bytes)
        .filter(|kind| kind.matcher_type() == infer::MatcherType::Image)
        .map(|kind| kind.mime_type())
}

#[cfg(test)]
mod tests {
    use super::*;

    const PNG_HEADER: &[u8] = &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, 0, 0, 0, 0];

    #[test]
    fn detects_image_content_types() {
        assert!(is_image_content_type("image/jpeg"));
        assert!(is_image_content_type("IMAGE/PNG; charset=binary"));
        assert!(!is_image_content_type("text/html; charset=utf-8"));
    }

    #[test]
    fn sniffs_png_bytes() {
        assert_eq!(sniff_image_mime(PNG_HEADER), Some("image/png"));
        assert_eq!(sniff_image_mime(b"<html></html>"), None);
    }
}

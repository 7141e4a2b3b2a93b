//! Identifier extraction from URL-like reference strings.

/// Extract the identifier a reference points at: the last non-empty `/`
/// separated segment.
///
/// `".../films/2baf70d1"` and `".../films/2baf70d1/"` both yield
/// `"2baf70d1"`. Returns `None` when the reference has no non-empty segment.
pub fn reference_id(reference: &str) -> Option<&str> {
    reference
        .trim()
        .split('/')
        .rev()
        .find(|segment| !segment.is_empty())
}

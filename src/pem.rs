/// Literal marker closing one PEM-encoded certificate.
pub const PEM_END_MARKER: &str = "-----END CERTIFICATE-----";

/// Segment a blob of concatenated PEM certificates into individual records.
/// Splitting consumes the end marker, so it is re-appended to every kept
/// piece; pieces that are empty after trimming (stray newlines between or
/// after certificates) are dropped. Source order is preserved, so a server
/// chain stays leaf-first. An input with no certificate bodies yields an
/// empty list, which callers treat as "nothing to display".
pub fn split_certificates(blob: &str) -> Vec<String> {
    blob.split(PEM_END_MARKER)
        .filter(|piece| !piece.trim().is_empty())
        .map(|piece| format!("{}{}", piece, PEM_END_MARKER))
        .collect()
}

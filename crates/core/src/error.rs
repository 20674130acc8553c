/// Domain-level error type shared across crates.
///
/// Every variant carries a human-readable message that is safe to show to
/// the caller (HTTP body or bot reply). Storage and transport failures have
/// their own error types in `vitrina-store` and `vitrina-bot`.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// Malformed structured input (not valid JSON, or not a JSON object).
    #[error("Parse error: {0}")]
    Parse(String),

    /// Missing or forbidden fields, or a field of the wrong type.
    #[error("Validation error: {0}")]
    Validation(String),

    /// The candidate record duplicates an existing located product.
    #[error("Conflict: {0}")]
    Conflict(String),
}

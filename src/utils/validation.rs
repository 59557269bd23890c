//! Centralized validation and helper functions.

/// Maximum decklist size accepted in one lookup (DOS protection)
pub const MAX_DECKLIST_BYTES: usize = 256 * 1024;

/// Maximum number of decklist lines accepted in one lookup
pub const MAX_DECKLIST_LINES: usize = 2_000;

/// Maximum decompressed snapshot size, guards against gzip bombs
pub const MAX_SNAPSHOT_BYTES: u64 = 512 * 1024 * 1024;

/// Magic bytes at the start of every gzip stream
pub const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

/// Security validation error types
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Decklist too large: {0} bytes exceeds maximum of {MAX_DECKLIST_BYTES}")]
    DecklistTooLarge(usize),
    #[error("Decklist has too many lines: {0} exceeds maximum of {MAX_DECKLIST_LINES}")]
    TooManyLines(usize),
    #[error("Decklist contains control characters")]
    InvalidContent,
}

/// Check that a decklist is within size limits and is plain text.
///
/// # Examples
///
/// ```
/// use combo_finder::utils::validation::validate_decklist_text;
///
/// assert!(validate_decklist_text("1 Sol Ring\n1 Basalt Monolith").is_ok());
/// assert!(validate_decklist_text("Sol Ring\0").is_err());
/// ```
///
/// # Errors
///
/// Returns `ValidationError::DecklistTooLarge` or `ValidationError::TooManyLines`
/// when a limit is exceeded, or `ValidationError::InvalidContent` when the text
/// contains control characters other than tabs and line breaks.
pub fn validate_decklist_text(text: &str) -> Result<(), ValidationError> {
    if text.len() > MAX_DECKLIST_BYTES {
        return Err(ValidationError::DecklistTooLarge(text.len()));
    }

    let lines = text.lines().count();
    if lines > MAX_DECKLIST_LINES {
        return Err(ValidationError::TooManyLines(lines));
    }

    if text
        .chars()
        .any(|c| c.is_control() && !matches!(c, '\n' | '\r' | '\t'))
    {
        return Err(ValidationError::InvalidContent);
    }

    Ok(())
}

/// Returns true if the bytes start a gzip stream
#[must_use]
pub fn is_gzip(bytes: &[u8]) -> bool {
    bytes.starts_with(&GZIP_MAGIC)
}

/// Prices must be finite and non-negative
#[must_use]
pub fn is_valid_price(price: f64) -> bool {
    price.is_finite() && price >= 0.0
}

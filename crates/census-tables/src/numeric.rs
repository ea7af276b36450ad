//! Lenient numeric coercion for text fields.

/// Parse a field as a number; anything that is not a number becomes `None`.
///
/// Surrounding whitespace is ignored. "nan" and empty fields are missing
/// values, never errors.
pub fn coerce_number(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|v| !v.is_nan())
}

/// Parse a measurement that may use a comma as the decimal separator.
///
/// Returns `None` for empty cells, unparseable text and non-finite values.
///
/// # Examples
/// ```
/// use bikeshare_processor::utils::parse_decimal;
///
/// assert_eq!(parse_decimal("12,5"), Some(12.5));
/// assert_eq!(parse_decimal(" -3.25 "), Some(-3.25));
/// assert_eq!(parse_decimal("n/a"), None);
/// ```
pub fn parse_decimal(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }

    let value = if trimmed.contains(',') {
        trimmed.replace(',', ".").parse::<f64>().ok()?
    } else {
        trimmed.parse::<f64>().ok()?
    };

    value.is_finite().then_some(value)
}

/// Treat empty or whitespace-only cells as missing
pub fn non_empty(raw: &str) -> Option<&str> {
    let trimmed = raw.trim();
    (!trimmed.is_empty()).then_some(trimmed)
}

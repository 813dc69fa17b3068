//! Numeric input sanitization and precision-aware formatting.
//!
//! The swap form accepts keystrokes as free text and only commits a
//! candidate that survives [`sanitize_numeric_input`] and
//! [`fits_precision`]; a rejected candidate leaves the previous value in
//! place. Intermediate states such as `"12."` or a bare `"."` are valid
//! here — final validity is deferred to the submit-eligibility check.

use std::str::FromStr;

use rust_decimal::Decimal;

/// Normalizes raw field text into a positive decimal candidate.
///
/// Strips everything outside digits and a single decimal separator
/// (`,` is accepted as `.`), collapses a run of leading zeros to one,
/// and prefixes a bare leading `.` with `0`. Never fails: hostile input
/// simply shrinks.
pub fn sanitize_numeric_input(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut seen_separator = false;

    for c in raw.chars() {
        match c {
            '0'..='9' => out.push(c),
            '.' | ',' if !seen_separator => {
                out.push('.');
                seen_separator = true;
            }
            _ => {}
        }
    }

    let leading_zeros = out.chars().take_while(|&c| c == '0').count();
    if leading_zeros > 1 {
        out.replace_range(..leading_zeros, "0");
    }

    if out.starts_with('.') {
        out.insert(0, '0');
    }

    out
}

/// Reports whether a sanitized candidate fits the precision bound.
///
/// Accepts `^\d*\.?\d{0,N}$`, plus a single fractional digit regardless
/// of `N` so that incremental entry (`"12."` then `"12.5"`) is never
/// blocked mid-keystroke.
pub fn fits_precision(candidate: &str, max_decimals: u32) -> bool {
    match candidate.split_once('.') {
        None => candidate.chars().all(|c| c.is_ascii_digit()),
        Some((whole, frac)) => {
            whole.chars().all(|c| c.is_ascii_digit())
                && frac.chars().all(|c| c.is_ascii_digit())
                && (frac.len() <= max_decimals as usize || frac.len() == 1)
        }
    }
}

/// Parses field text as a decimal, treating anything unparsable as zero.
///
/// A trailing separator (`"12."`) parses as its whole part.
pub fn parse_or_zero(text: &str) -> Decimal {
    let trimmed = text.strip_suffix('.').unwrap_or(text);
    Decimal::from_str(trimmed).unwrap_or(Decimal::ZERO)
}

/// Formats a value truncated (not rounded) to exactly `precision`
/// fractional digits, zero-padded.
pub fn format_with_precision(value: Decimal, precision: u32) -> String {
    let mut truncated = value.trunc_with_scale(precision);
    truncated.rescale(precision);
    truncated.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn strips_foreign_characters() {
        assert_eq!(sanitize_numeric_input("1a2b3"), "123");
        assert_eq!(sanitize_numeric_input("-12.5"), "12.5");
        assert_eq!(sanitize_numeric_input("$1,5"), "1.5");
    }

    #[test]
    fn keeps_single_separator() {
        assert_eq!(sanitize_numeric_input("1.2.3"), "1.23");
        assert_eq!(sanitize_numeric_input("1,2,3"), "1.23");
    }

    #[test]
    fn prefixes_bare_separator() {
        assert_eq!(sanitize_numeric_input("."), "0.");
        assert_eq!(sanitize_numeric_input(".5"), "0.5");
    }

    #[test]
    fn collapses_leading_zeros() {
        assert_eq!(sanitize_numeric_input("000.5"), "0.5");
        assert_eq!(sanitize_numeric_input("0"), "0");
        assert_eq!(sanitize_numeric_input("0.5"), "0.5");
    }

    #[test]
    fn empty_input_stays_empty() {
        assert_eq!(sanitize_numeric_input(""), "");
        assert_eq!(sanitize_numeric_input("abc"), "");
    }

    #[test]
    fn precision_bound_is_enforced() {
        assert!(fits_precision("12.34", 2));
        assert!(!fits_precision("12.345", 2));
        assert!(fits_precision("12.", 2));
        assert!(fits_precision("12", 0));
        assert!(fits_precision("", 2));
    }

    #[test]
    fn single_fractional_digit_always_accepted() {
        // Incremental-entry branch: one digit after the point passes even
        // when the precision bound is zero.
        assert!(fits_precision("12.5", 0));
        assert!(!fits_precision("12.55", 0));
    }

    #[test]
    fn rejects_non_numeric_candidates() {
        assert!(!fits_precision("12a", 2));
        assert!(!fits_precision("1.2.3", 4));
    }

    #[test]
    fn parse_tolerates_intermediate_states() {
        assert_eq!(parse_or_zero(""), Decimal::ZERO);
        assert_eq!(parse_or_zero("."), Decimal::ZERO);
        assert_eq!(parse_or_zero("12."), dec!(12));
        assert_eq!(parse_or_zero("12.5"), dec!(12.5));
    }

    #[test]
    fn format_truncates_and_pads() {
        assert_eq!(format_with_precision(dec!(123.456), 2), "123.45");
        assert_eq!(format_with_precision(dec!(123.4), 2), "123.40");
        assert_eq!(format_with_precision(dec!(123), 0), "123");
        assert_eq!(format_with_precision(dec!(0.999), 2), "0.99");
    }
}

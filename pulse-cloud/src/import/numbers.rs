//! Locale-tolerant numeric cells
//!
//! Marketplace exports mix `1.234.567`, `1,234,567.89`, `12,5` and
//! `₫ 120.000`. Rules:
//! - currency symbols, letters and spaces are dropped
//! - with both `.` and `,` present, the right-most one is the decimal separator
//! - a lone separator kind followed by groups of exactly three digits is a
//!   thousands separator; otherwise it is the decimal separator
//!
//! Anything still unparseable becomes 0.

/// Parse a money/quantity cell
pub fn parse_number(raw: &str) -> f64 {
    let negative = raw.trim_start().starts_with('-') || (raw.contains('(') && raw.contains(')'));
    let cleaned: String = raw
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.' || *c == ',')
        .collect();
    if cleaned.is_empty() {
        return 0.0;
    }

    let normalized = match (cleaned.rfind('.'), cleaned.rfind(',')) {
        (Some(dot), Some(comma)) => {
            let (decimal, thousands) = if dot > comma { ('.', ',') } else { (',', '.') };
            cleaned.replace(thousands, "").replace(decimal, ".")
        }
        (Some(_), None) => single_separator(&cleaned, '.'),
        (None, Some(_)) => single_separator(&cleaned, ','),
        (None, None) => cleaned,
    };

    match normalized.parse::<f64>() {
        Ok(v) if v.is_finite() => {
            if negative {
                -v
            } else {
                v
            }
        }
        _ => 0.0,
    }
}

/// Whole-unit cell (quantities); fractional input is rounded
pub fn parse_integer(raw: &str) -> i64 {
    parse_number(raw).round() as i64
}

fn single_separator(s: &str, sep: char) -> String {
    let groups: Vec<&str> = s.split(sep).collect();
    let is_thousands = groups.len() > 1
        && !groups[0].is_empty()
        && !groups[0].starts_with('0')
        && groups[0].len() <= 3
        && groups[1..].iter().all(|g| g.len() == 3);
    // "1.5.0" cannot be a decimal number
    if is_thousands || groups.len() > 2 {
        groups.concat()
    } else {
        s.replace(sep, ".")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn thousands_and_decimals() {
        assert_eq!(parse_number("1.234.567"), 1_234_567.0);
        assert_eq!(parse_number("1,234,567"), 1_234_567.0);
        assert_eq!(parse_number("120.000"), 120_000.0);
        assert_eq!(parse_number("1,234,567.89"), 1_234_567.89);
        assert_eq!(parse_number("1.234.567,89"), 1_234_567.89);
        assert_eq!(parse_number("12,5"), 12.5);
        assert_eq!(parse_number("12.50"), 12.5);
        assert_eq!(parse_number("0.125"), 0.125);
    }

    #[test]
    fn currency_and_sign() {
        assert_eq!(parse_number("₫ 120.000"), 120_000.0);
        assert_eq!(parse_number("120.000đ"), 120_000.0);
        assert_eq!(parse_number("-15.000"), -15_000.0);
        assert_eq!(parse_number("(2,50)"), -2.5);
    }

    #[test]
    fn junk_is_zero() {
        assert_eq!(parse_number(""), 0.0);
        assert_eq!(parse_number("n/a"), 0.0);
        assert_eq!(parse_number("."), 0.0);
    }

    #[test]
    fn integers_round() {
        assert_eq!(parse_integer("3"), 3);
        assert_eq!(parse_integer("2,6"), 3);
        assert_eq!(parse_integer("1.000"), 1000);
    }
}

//! Number formatting used by the dashboard tables and cards

/// Group an integer with thousands separators: `3194` → `3,194`
#[must_use]
pub fn format_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Plain number display without a trailing `.0`: `100.0` → `100`, `68.6` → `68.6`
#[must_use]
pub fn format_number(value: f64) -> String {
    format!("{value}")
}

/// One decimal place, as used for derived percentages
#[must_use]
pub fn format_fixed1(value: f64) -> String {
    format!("{value:.1}")
}

/// Dollar amount with grouped whole dollars: `12450.0` → `$12,450`, `99.5` → `$99.50`
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn format_currency(value: f64) -> String {
    let sign = if value < 0.0 { "-" } else { "" };
    let cents = (value.abs() * 100.0).round() as u64;
    let (dollars, cents) = (cents / 100, cents % 100);
    if cents == 0 {
        format!("{sign}${}", format_thousands(dollars))
    } else {
        format!("{sign}${}.{cents:02}", format_thousands(dollars))
    }
}

/// Whether a string is a `#RRGGBB` / `#RGB` color safe to drop into inline CSS
#[must_use]
pub fn is_hex_color(value: &str) -> bool {
    value.strip_prefix('#').is_some_and(|hex| {
        matches!(hex.len(), 3 | 6) && hex.chars().all(|c| c.is_ascii_hexdigit())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_format_thousands() {
        assert_eq!(format_thousands(0), "0");
        assert_eq!(format_thousands(999), "999");
        assert_eq!(format_thousands(1234), "1,234");
        assert_eq!(format_thousands(3194), "3,194");
        assert_eq!(format_thousands(1_000_000), "1,000,000");
    }

    #[test]
    fn test_format_number_drops_trailing_zero() {
        assert_eq!(format_number(100.0), "100");
        assert_eq!(format_number(68.6), "68.6");
        assert_eq!(format_number(94.0), "94");
    }

    #[test]
    fn test_format_fixed1() {
        assert_eq!(format_fixed1(31.355_252_606_255_01), "31.4");
        assert_eq!(format_fixed1(7.0), "7.0");
    }

    #[test]
    fn test_format_currency() {
        assert_eq!(format_currency(12450.0), "$12,450");
        assert_eq!(format_currency(299.0), "$299");
        assert_eq!(format_currency(99.5), "$99.50");
        assert_eq!(format_currency(-5.0), "-$5");
    }

    #[test]
    fn test_is_hex_color() {
        assert!(is_hex_color("#7C3AED"));
        assert!(is_hex_color("#fff"));
        assert!(!is_hex_color("red"));
        assert!(!is_hex_color("#12345"));
        assert!(!is_hex_color("#7C3AED;background:url(x)"));
    }
}

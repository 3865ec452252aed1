//! Unit prefix parsing and value scaling

/// Unit parsing errors; a malformed token aborts the run
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UnitError {
    #[error("Malformed unit token, leading bracket: {unit}")]
    MalformedUnit { unit: String },
}

/// Power-of-ten normalization factor for a unit prefix character
const SCALE_TABLE: &[(char, i32)] = &[
    ('p', 12),
    ('n', 9),
    ('u', 6),
    ('m', 3),
    ('k', -3),
    ('K', -3),
    ('M', -6),
    ('G', -9),
    ('T', -12),
];

/// Inspect the first character of the raw unit string and split it into a
/// scale and the prefix-stripped unit. Unknown leading characters yield
/// scale 0 and the unit unchanged; a leading bracket is an unrecoverable
/// input error.
pub fn get_unit_scale(raw_unit: &str) -> Result<(i32, String), UnitError> {
    let Some(first) = raw_unit.chars().next() else {
        return Ok((0, String::new()));
    };
    if first == '[' || first == ']' {
        return Err(UnitError::MalformedUnit {
            unit: raw_unit.to_string(),
        });
    }
    for &(prefix, scale) in SCALE_TABLE {
        if first == prefix {
            let unit: String = raw_unit.chars().filter(|&c| c != prefix).collect();
            return Ok((scale, unit));
        }
    }
    Ok((0, raw_unit.to_string()))
}

/// Scale a textual value by `10^-scale` and format it with no trailing
/// zeros and no dangling decimal point
pub fn scale_value(scale: i32, value: &str) -> String {
    let parsed: f64 = value.trim().parse().unwrap_or(0.0);
    let scaled = parsed * 10f64.powi(-scale);
    trim_number(&format!("{}", scaled))
}

/// Trim trailing zeros after a decimal point and a dangling decimal point
pub fn trim_number(value: &str) -> String {
    if !value.contains('.') {
        return value.to_string();
    }
    let trimmed = value.trim_end_matches('0');
    trimmed.trim_end_matches('.').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn test_scale_table() {
        let cases = [
            ("pF", 12, "F"),
            ("nA", 9, "A"),
            ("uV", 6, "V"),
            ("mA", 3, "A"),
            ("kOhm", -3, "Ohm"),
            ("KHz", -3, "Hz"),
            ("MHz", -6, "Hz"),
            ("GHz", -9, "Hz"),
            ("THz", -12, "Hz"),
        ];
        for (raw, scale, unit) in cases {
            assert_eq!(get_unit_scale(raw).unwrap(), (scale, unit.to_string()));
        }
    }

    #[test]
    fn test_unknown_prefix_keeps_unit() {
        assert_eq!(get_unit_scale("V").unwrap(), (0, "V".to_string()));
        assert_eq!(get_unit_scale("Ohm").unwrap(), (0, "Ohm".to_string()));
        assert_eq!(get_unit_scale("").unwrap(), (0, String::new()));
    }

    #[test]
    fn test_prefix_removed_everywhere() {
        // the matched character is removed from the whole unit string
        assert_eq!(get_unit_scale("mm").unwrap(), (3, String::new()));
    }

    #[test]
    fn test_leading_bracket_is_fatal() {
        assert_matches!(get_unit_scale("[V]"), Err(UnitError::MalformedUnit { .. }));
        assert_matches!(get_unit_scale("]V"), Err(UnitError::MalformedUnit { .. }));
    }

    #[test]
    fn test_scale_value() {
        assert_eq!(scale_value(3, "12"), "0.012");
        assert_eq!(scale_value(-3, "1.5"), "1500");
        assert_eq!(scale_value(0, "3.30"), "3.3");
        assert_eq!(scale_value(0, "100"), "100");
    }

    #[test]
    fn test_scale_value_round_trip() {
        for (scale, value) in [(3, "12.5"), (6, "7"), (-6, "0.004"), (0, "42")] {
            let scaled: f64 = scale_value(scale, value).parse().unwrap();
            let expected: f64 = value.parse::<f64>().unwrap() * 10f64.powi(-scale);
            assert!((scaled - expected).abs() <= expected.abs() * 1e-12);
        }
    }

    #[test]
    fn test_trim_number() {
        assert_eq!(trim_number("1.000000"), "1");
        assert_eq!(trim_number("3.300"), "3.3");
        assert_eq!(trim_number("100"), "100");
        assert_eq!(trim_number("0.012"), "0.012");
    }
}

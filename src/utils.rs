use chrono::Utc;
use rand::Rng;

/// Longest project name shown untruncated on the portfolio chart.
pub const CHART_LABEL_MAX_CHARS: usize = 15;

/// Builds a fresh identifier such as `item-1721059200000-3f9a1c`.
///
/// The millisecond timestamp keeps ids roughly ordered by creation, the random
/// suffix keeps ids created within the same millisecond apart.
pub fn generate_id(prefix: &str) -> String {
    let suffix: u32 = rand::thread_rng().gen_range(0..0x100_0000);
    format!("{}-{}-{:06x}", prefix, Utc::now().timestamp_millis(), suffix)
}

/// Key used for case-insensitive name matching: trimmed and lowercased.
pub fn match_key(name: &str) -> String {
    name.trim().to_lowercase()
}

pub fn names_match(a: &str, b: &str) -> bool {
    match_key(a) == match_key(b)
}

/// Whole-unit quantity; anything below one, fractional leftovers or non-finite input
/// collapse the same way the budget form does (truncate, then default to 1).
pub fn normalize_quantity(raw: f64) -> u32 {
    if !raw.is_finite() || raw < 1.0 {
        return 1;
    }
    if raw >= f64::from(u32::MAX) {
        return u32::MAX;
    }
    raw.trunc() as u32
}

/// Parses a typed quantity ("3", " 12 ", "abc"), defaulting to 1.
pub fn parse_quantity(raw: &str) -> u32 {
    raw.trim()
        .parse::<f64>()
        .map(normalize_quantity)
        .unwrap_or(1)
}

/// Unit costs are non-negative; invalid input is treated as zero.
pub fn normalize_unit_cost(raw: f64) -> f64 {
    if raw.is_finite() && raw > 0.0 {
        raw
    } else {
        0.0
    }
}

pub fn parse_unit_cost(raw: &str) -> f64 {
    raw.trim()
        .parse::<f64>()
        .map(normalize_unit_cost)
        .unwrap_or(0.0)
}

/// Shortens a label to `max_chars` characters followed by `...`.
pub fn truncate_label(name: &str, max_chars: usize) -> String {
    if name.chars().count() > max_chars {
        let head: String = name.chars().take(max_chars).collect();
        format!("{}...", head)
    } else {
        name.to_string()
    }
}

/// `"Kitchen  Remodel"` -> `"Kitchen_Remodel"`, used in exported file names.
pub fn underscore_whitespace(name: &str) -> String {
    name.split_whitespace().collect::<Vec<_>>().join("_")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_generate_id_is_unique() {
        let ids: HashSet<String> = (0..2000).map(|_| generate_id("item")).collect();
        assert_eq!(ids.len(), 2000);
        assert!(ids.iter().all(|id| id.starts_with("item-")));
    }

    #[test]
    fn test_match_key() {
        assert_eq!(match_key("  Materials "), "materials");
        assert!(names_match("MATERIALS", " materials"));
        assert!(!names_match("Material", "Materials"));
    }

    #[test]
    fn test_normalize_quantity() {
        assert_eq!(normalize_quantity(3.0), 3);
        assert_eq!(normalize_quantity(2.9), 2);
        assert_eq!(normalize_quantity(0.0), 1);
        assert_eq!(normalize_quantity(-4.0), 1);
        assert_eq!(normalize_quantity(0.5), 1);
        assert_eq!(normalize_quantity(f64::NAN), 1);
        assert_eq!(parse_quantity("12"), 12);
        assert_eq!(parse_quantity("abc"), 1);
        assert_eq!(parse_quantity(""), 1);
    }

    #[test]
    fn test_normalize_unit_cost() {
        assert_eq!(normalize_unit_cost(35.5), 35.5);
        assert_eq!(normalize_unit_cost(-1.0), 0.0);
        assert_eq!(normalize_unit_cost(f64::INFINITY), 0.0);
        assert_eq!(parse_unit_cost("80.25"), 80.25);
        assert_eq!(parse_unit_cost("R$"), 0.0);
    }

    #[test]
    fn test_truncate_label() {
        assert_eq!(truncate_label("Short name", 15), "Short name");
        assert_eq!(truncate_label("Exactly fifteen", 15), "Exactly fifteen");
        assert_eq!(
            truncate_label("Commercial Building Downtown", 15),
            "Commercial Buil..."
        );
        assert_eq!(truncate_label("Edifício Comercial", 15), "Edifício Comerc...");
    }

    #[test]
    fn test_underscore_whitespace() {
        assert_eq!(underscore_whitespace("Kitchen  Remodel 2"), "Kitchen_Remodel_2");
    }
}

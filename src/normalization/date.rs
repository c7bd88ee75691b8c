/// Date used when a source provides nothing usable.
pub const FALLBACK_DATE: &str = "2000-01-01";

/// Expand a partial `YYYY[-MM[-DD]]` date into a full `YYYY-MM-DD` string.
///
/// - `"2005"` becomes `"2005-01-01"`
/// - `"2005-03"` becomes `"2005-03-01"`
/// - three or more components pass through unchanged
/// - empty or missing input yields [`FALLBACK_DATE`]
pub fn normalize_partial_date(raw: Option<&str>) -> String {
    let raw = match raw.map(str::trim) {
        Some(s) if !s.is_empty() => s,
        _ => return FALLBACK_DATE.to_string(),
    };

    match raw.split('-').count() {
        1 => format!("{raw}-01-01"),
        2 => format!("{raw}-01"),
        _ => raw.to_string(),
    }
}

/// Normalize a bare publication year (Open Library gives integers).
pub fn normalize_year(year: Option<i64>) -> String {
    match year {
        Some(y) => normalize_partial_date(Some(&y.to_string())),
        None => FALLBACK_DATE.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expands_partial_dates() {
        assert_eq!(normalize_partial_date(Some("2005")), "2005-01-01");
        assert_eq!(normalize_partial_date(Some("2005-03")), "2005-03-01");
        assert_eq!(normalize_partial_date(Some("2005-03-14")), "2005-03-14");
    }

    #[test]
    fn empty_or_missing_falls_back() {
        assert_eq!(normalize_partial_date(Some("")), FALLBACK_DATE);
        assert_eq!(normalize_partial_date(Some("   ")), FALLBACK_DATE);
        assert_eq!(normalize_partial_date(None), FALLBACK_DATE);
    }

    #[test]
    fn year_numbers() {
        assert_eq!(normalize_year(Some(1999)), "1999-01-01");
        assert_eq!(normalize_year(None), FALLBACK_DATE);
    }
}

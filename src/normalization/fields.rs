use chrono::NaiveDate;

/// Zero-pad a single ASCII digit to two ("9" -> "09"). Blank -> `None`; everything else passes through.
pub fn pad_jersey(raw: Option<&str>) -> Option<String> {
    let v = raw?.trim();
    if v.is_empty() {
        return None;
    }
    let mut chars = v.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) if c.is_ascii_digit() => Some(format!("0{c}")),
        _ => Some(v.to_string()),
    }
}

/// Parse a loosely formatted birth date into `YYYY-MM-DD`.
///
/// Accepts `M/D/YYYY` and `MM/DD/YYYY`, plus ISO dates (with or without a trailing time part, as the
/// ESPN API returns them). Invalid calendar dates and anything else yield `None`.
pub fn parse_birth_date(raw: Option<&str>) -> Option<String> {
    let v = raw?.trim();
    if v.is_empty() {
        return None;
    }

    if v.contains('/') {
        let parts: Vec<&str> = v.split('/').map(str::trim).collect();
        if parts.len() != 3 || parts[2].len() != 4 {
            return None;
        }
        let month: u32 = parts[0].parse().ok()?;
        let day: u32 = parts[1].parse().ok()?;
        let year: i32 = parts[2].parse().ok()?;
        return NaiveDate::from_ymd_opt(year, month, day).map(|d| d.format("%Y-%m-%d").to_string());
    }

    let date_part = v.get(0..10)?;
    NaiveDate::parse_from_str(date_part, "%Y-%m-%d")
        .ok()
        .map(|d| d.format("%Y-%m-%d").to_string())
}

/// Trim an optional cell; blank and the usual dash placeholders become `None`.
pub fn clean_optional(raw: Option<&str>) -> Option<String> {
    let v = raw?.trim();
    match v {
        "" | "-" | "--" | "—" | "N/A" => None,
        _ => Some(v.split_whitespace().collect::<Vec<_>>().join(" ")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn jersey_padding() {
        assert_eq!(pad_jersey(Some("7")).as_deref(), Some("07"));
        assert_eq!(pad_jersey(Some("9")).as_deref(), Some("09"));
        assert_eq!(pad_jersey(Some("00")).as_deref(), Some("00"));
        assert_eq!(pad_jersey(Some("84")).as_deref(), Some("84"));
        assert_eq!(pad_jersey(Some(" ")), None);
        assert_eq!(pad_jersey(None), None);
        assert_eq!(pad_jersey(Some("#")).as_deref(), Some("#"));
        assert_eq!(pad_jersey(Some("٣")).as_deref(), Some("٣"));
    }

    #[test]
    fn us_style_dates() {
        assert_eq!(
            parse_birth_date(Some("07/10/1993")).as_deref(),
            Some("1993-07-10")
        );
        assert_eq!(
            parse_birth_date(Some("7/1/1993")).as_deref(),
            Some("1993-07-01")
        );
    }

    #[test]
    fn invalid_dates_are_none() {
        assert_eq!(parse_birth_date(Some("13/45/2020")), None);
        assert_eq!(parse_birth_date(Some("02/30/2020")), None);
        assert_eq!(parse_birth_date(Some("1/2/93")), None);
        assert_eq!(parse_birth_date(Some("yesterday")), None);
        assert_eq!(parse_birth_date(Some("")), None);
        assert_eq!(parse_birth_date(None), None);
    }

    #[test]
    fn iso_dates_pass_through() {
        assert_eq!(
            parse_birth_date(Some("1996-05-12")).as_deref(),
            Some("1996-05-12")
        );
        assert_eq!(
            parse_birth_date(Some("1996-05-12T07:00Z")).as_deref(),
            Some("1996-05-12")
        );
    }

    #[test]
    fn placeholders_become_none() {
        assert_eq!(clean_optional(Some("--")), None);
        assert_eq!(clean_optional(Some("  ")), None);
        assert_eq!(clean_optional(Some(" 6' 4\" ")).as_deref(), Some("6' 4\""));
    }
}

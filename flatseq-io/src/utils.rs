use chrono::NaiveDate;

/// Date notation used on `DT`, `LOCUS`, `RL` and `JOURNAL` lines.
pub const FLAT_FILE_DATE_FORMAT: &str = "%d-%b-%Y";

///
/// Collapse every whitespace run to a single space and trim both ends.
///
pub fn shrink(text: &str) -> String {
    text.split_whitespace().collect::<Vec<&str>>().join(" ")
}

/// Parse `12-SEP-1991` (month name in any case).
pub fn parse_date(text: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(text.trim(), FLAT_FILE_DATE_FORMAT).ok()
}

/// Render a date as `12-SEP-1991`.
pub fn format_date(date: &NaiveDate) -> String {
    date.format(FLAT_FILE_DATE_FORMAT).to_string().to_uppercase()
}

///
/// Remove one pair of surrounding double quotes and undouble embedded
/// quotes: `"a ""b"""` becomes `a "b"`.
///
pub fn unquote(text: &str) -> String {
    let text = text.trim();
    let inner = text
        .strip_prefix('"')
        .map(|t| t.strip_suffix('"').unwrap_or(t))
        .unwrap_or(text);
    inner.replace("\"\"", "\"")
}

/// Inverse of [`unquote`].
pub fn quote(text: &str) -> String {
    format!("\"{}\"", text.replace('"', "\"\""))
}

/// Split a `;`-separated list, dropping empty items and a final period.
pub fn split_list(text: &str, separator: char) -> Vec<String> {
    let text = text.trim();
    let text = text.strip_suffix('.').unwrap_or(text);
    text.split(separator)
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    fn test_shrink() {
        assert_eq!(shrink("  a \t b\n\nc  "), "a b c");
        assert_eq!(shrink("   "), "");
    }

    #[rstest]
    #[case("12-SEP-1991", Some((1991, 9, 12)))]
    #[case("01-jan-2000", Some((2000, 1, 1)))]
    #[case("31-FEB-2000", None)]
    #[case("yesterday", None)]
    fn test_parse_date(#[case] text: &str, #[case] expected: Option<(i32, u32, u32)>) {
        let expected = expected.and_then(|(y, m, d)| NaiveDate::from_ymd_opt(y, m, d));
        assert_eq!(parse_date(text), expected);
    }

    #[rstest]
    fn test_format_date() {
        let date = NaiveDate::from_ymd_opt(2006, 11, 14).unwrap();
        assert_eq!(format_date(&date), "14-NOV-2006");
    }

    #[rstest]
    #[case("\"plain\"", "plain")]
    #[case("\"say \"\"hi\"\"\"", "say \"hi\"")]
    #[case("unquoted", "unquoted")]
    fn test_unquote(#[case] text: &str, #[case] expected: &str) {
        assert_eq!(unquote(text), expected);
        assert_eq!(unquote(&quote(expected)), expected);
    }

    #[rstest]
    fn test_split_list() {
        assert_eq!(split_list("a; b ;c.", ';'), vec!["a", "b", "c"]);
        assert_eq!(split_list(".", ';'), Vec::<String>::new());
    }
}

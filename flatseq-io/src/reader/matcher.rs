use std::str::FromStr;

use chrono::NaiveDate;
use regex::{Captures, Regex};

use crate::utils::parse_date;

///
/// A compiled pattern with typed accessors for its capture groups.
///
/// Matchers are built once inside `Lazy` statics and shared read-only by
/// every reader instance.
///
#[derive(Debug)]
pub struct Matcher {
    regex: Regex,
}

impl Matcher {
    ///
    /// Compile a matcher. Patterns are compile-time constants, so an invalid
    /// one is a programming error.
    ///
    pub fn new(pattern: &str) -> Self {
        Matcher {
            regex: Regex::new(pattern)
                .unwrap_or_else(|e| panic!("Invalid matcher pattern {:?}: {}", pattern, e)),
        }
    }

    pub fn is_match(&self, text: &str) -> bool {
        self.regex.is_match(text)
    }

    /// Match `text`, returning accessors for the capture groups on success.
    pub fn captures<'t>(&self, text: &'t str) -> Option<Matched<'t>> {
        self.regex.captures(text).map(|captures| Matched { captures })
    }
}

pub struct Matched<'t> {
    captures: Captures<'t>,
}

impl<'t> Matched<'t> {
    /// Raw group text, `None` when the group did not participate.
    pub fn raw(&self, group: usize) -> Option<&'t str> {
        self.captures.get(group).map(|m| m.as_str())
    }

    /// Trimmed group text; empty groups count as absent.
    pub fn string(&self, group: usize) -> Option<String> {
        self.raw(group)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
    }

    pub fn upper_string(&self, group: usize) -> Option<String> {
        self.string(group).map(|s| s.to_uppercase())
    }

    pub fn integer<T: FromStr>(&self, group: usize) -> Option<T> {
        self.raw(group).and_then(|s| s.trim().parse().ok())
    }

    ///
    /// Parse a `dd-MMM-yyyy` group. `Ok(None)` when the group is absent,
    /// `Err` with the offending text when it does not parse.
    ///
    pub fn date(&self, group: usize) -> Result<Option<NaiveDate>, String> {
        match self.string(group) {
            None => Ok(None),
            Some(text) => parse_date(&text).map(Some).ok_or(text),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    fn test_accessors() {
        let matcher = Matcher::new(r"^(\w+)\s+(\d+)?\s*(\S+)?$");
        let matched = matcher.captures("abc 42 12-sep-1991").unwrap();
        assert_eq!(matched.string(1), Some("abc".to_string()));
        assert_eq!(matched.upper_string(1), Some("ABC".to_string()));
        assert_eq!(matched.integer::<u32>(2), Some(42));
        assert_eq!(
            matched.date(3),
            Ok(NaiveDate::from_ymd_opt(1991, 9, 12))
        );

        let matched = matcher.captures("abc  bogus").unwrap();
        assert_eq!(matched.integer::<u32>(2), None);
        assert_eq!(matched.date(3), Err("bogus".to_string()));
        assert_eq!(matched.date(4), Ok(None));
        assert_eq!(matcher.is_match("!!"), false);
    }
}

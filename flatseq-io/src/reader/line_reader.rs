use std::io::{self, BufRead};

///
/// Classification of one physical line by its leading tag.
///
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Tag {
    /// Empty or whitespace-only line.
    Blank,
    /// Line without a tag of its own; it continues the active block.
    Untagged,
    /// Line introducing (or repeating) a named tag.
    Named(String),
}

impl Tag {
    pub fn named<S: Into<String>>(name: S) -> Self {
        Tag::Named(name.into())
    }

    pub fn name(&self) -> Option<&str> {
        match self {
            Tag::Named(name) => Some(name),
            _ => None,
        }
    }

    pub fn is(&self, name: &str) -> bool {
        self.name() == Some(name)
    }
}

///
/// Text of `line` from byte `offset` on. An offset inside a multi-byte
/// character moves back to that character's first byte.
///
pub fn line_content(line: &str, offset: usize) -> &str {
    if offset >= line.len() {
        return "";
    }
    let start = (0..=offset).rev().find(|i| line.is_char_boundary(*i)).unwrap_or(0);
    &line[start..]
}

///
/// Format-specific line classification. `active` is the tag of the last
/// line that introduced a block, for formats whose continuation lines are
/// only recognisable in context.
///
pub trait LineTagger {
    fn classify(&self, line: &str, active: Option<&str>) -> Tag;
}

///
/// Pull-based cursor over an input stream with one line of lookahead.
///
/// After each [`LineReader::read_line`] the reader exposes the current line
/// and tag, the next line and tag, and the active tag.
///
pub struct LineReader<R: BufRead, T: LineTagger> {
    reader: R,
    tagger: T,
    primed: bool,
    line_number: usize,
    current_line: Option<String>,
    current_tag: Option<Tag>,
    next_line: Option<String>,
    next_tag: Option<Tag>,
    active_tag: Option<String>,
}

impl<R: BufRead, T: LineTagger> LineReader<R, T> {
    pub fn new(reader: R, tagger: T) -> Self {
        LineReader {
            reader,
            tagger,
            primed: false,
            line_number: 0,
            current_line: None,
            current_tag: None,
            next_line: None,
            next_tag: None,
            active_tag: None,
        }
    }

    fn fetch(&mut self) -> io::Result<Option<String>> {
        let mut line = String::new();
        if self.reader.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        while line.ends_with('\n') || line.ends_with('\r') {
            line.pop();
        }
        Ok(Some(line))
    }

    ///
    /// Advance the window by one physical line. Returns `false` once the
    /// input is exhausted.
    ///
    pub fn read_line(&mut self) -> io::Result<bool> {
        if !self.primed {
            self.next_line = self.fetch()?;
            self.primed = true;
        }

        self.current_line = self.next_line.take();
        let Some(current) = self.current_line.as_deref() else {
            self.current_tag = None;
            self.next_tag = None;
            return Ok(false);
        };
        self.line_number += 1;

        let tag = self.tagger.classify(current, self.active_tag.as_deref());
        if let Tag::Named(name) = &tag {
            self.active_tag = Some(name.clone());
        }
        self.current_tag = Some(tag);

        self.next_line = self.fetch()?;
        self.next_tag = match self.next_line.as_deref() {
            Some(next) => Some(self.tagger.classify(next, self.active_tag.as_deref())),
            None => None,
        };
        Ok(true)
    }

    /// 1-based number of the current line; 0 before the first read.
    pub fn line_number(&self) -> usize {
        self.line_number
    }

    pub fn current_line(&self) -> Option<&str> {
        self.current_line.as_deref()
    }

    pub fn current_tag(&self) -> Option<&Tag> {
        self.current_tag.as_ref()
    }

    pub fn next_line(&self) -> Option<&str> {
        self.next_line.as_deref()
    }

    pub fn next_tag(&self) -> Option<&Tag> {
        self.next_tag.as_ref()
    }

    pub fn active_tag(&self) -> Option<&str> {
        self.active_tag.as_deref()
    }

    pub fn is_primed(&self) -> bool {
        self.primed
    }

    pub fn tagger(&self) -> &T {
        &self.tagger
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use std::io::Cursor;

    /// First whitespace token is the tag; indented lines continue.
    struct TokenTagger;

    impl LineTagger for TokenTagger {
        fn classify(&self, line: &str, _active: Option<&str>) -> Tag {
            if line.trim().is_empty() {
                Tag::Blank
            } else if line.starts_with(' ') {
                Tag::Untagged
            } else {
                Tag::named(line.split_whitespace().next().unwrap_or_default())
            }
        }
    }

    #[rstest]
    #[case("NM name", 3, "name")]
    #[case("NM", 3, "")]
    #[case("NMé name", 3, "é name")]
    #[case("NMMé", 4, "é")]
    fn test_line_content(#[case] line: &str, #[case] offset: usize, #[case] expected: &str) {
        assert_eq!(line_content(line, offset), expected);
    }

    #[rstest]
    fn test_lookahead_window() {
        let input = "AA one\n  two\r\n\nBB three\n";
        let mut reader = LineReader::new(Cursor::new(input), TokenTagger);

        assert_eq!(reader.read_line().unwrap(), true);
        assert_eq!(reader.line_number(), 1);
        assert_eq!(reader.current_line(), Some("AA one"));
        assert_eq!(reader.current_tag(), Some(&Tag::named("AA")));
        assert_eq!(reader.next_line(), Some("  two"));
        assert_eq!(reader.next_tag(), Some(&Tag::Untagged));
        assert_eq!(reader.active_tag(), Some("AA"));

        assert_eq!(reader.read_line().unwrap(), true);
        assert_eq!(reader.current_line(), Some("  two"));
        assert_eq!(reader.next_tag(), Some(&Tag::Blank));
        assert_eq!(reader.active_tag(), Some("AA"));

        assert_eq!(reader.read_line().unwrap(), true);
        assert_eq!(reader.current_tag(), Some(&Tag::Blank));
        assert_eq!(reader.next_tag(), Some(&Tag::named("BB")));

        assert_eq!(reader.read_line().unwrap(), true);
        assert_eq!(reader.line_number(), 4);
        assert_eq!(reader.active_tag(), Some("BB"));
        assert_eq!(reader.next_line(), None);

        assert_eq!(reader.read_line().unwrap(), false);
        assert_eq!(reader.current_line(), None);
        assert_eq!(reader.current_tag(), None);
        assert_eq!(reader.read_line().unwrap(), false);
    }
}

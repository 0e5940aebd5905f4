use std::io::Write;

use crate::error::Result;

/// Maximum line width of EMBL and GenBank text blocks.
pub const LINE_WIDTH: usize = 80;

///
/// Where a block may be broken across lines.
///
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WrapChar {
    /// Between whitespace-separated words; words are re-joined with one space.
    /// A word longer than a line is never split.
    Space,
    /// After each comma, with nothing inserted between the pieces (locations).
    Comma,
    /// Anywhere; the pieces are re-joined with nothing between them.
    None,
}

///
/// Greedy line packer for tagged text blocks.
///
/// The first line starts with `first_padding` (usually the tag), every
/// following line with `padding`. Tokens are packed until the next one would
/// overflow the width. A token longer than the room left on a fresh line is
/// hard-broken, except for [`WrapChar::Space`] where it stays whole.
///
#[derive(Clone, Debug)]
pub struct BlockWriter<'a> {
    first_padding: &'a str,
    padding: &'a str,
    wrap_char: WrapChar,
    width: usize,
}

impl<'a> BlockWriter<'a> {
    pub fn new(first_padding: &'a str, padding: &'a str) -> Self {
        BlockWriter {
            first_padding,
            padding,
            wrap_char: WrapChar::Space,
            width: LINE_WIDTH,
        }
    }

    pub fn wrap_char(mut self, wrap_char: WrapChar) -> Self {
        self.wrap_char = wrap_char;
        self
    }

    pub fn width(mut self, width: usize) -> Self {
        self.width = width;
        self
    }

    fn tokens<'t>(&self, text: &'t str) -> Vec<&'t str> {
        match self.wrap_char {
            WrapChar::Space => text.split_whitespace().collect(),
            WrapChar::Comma => text
                .split_inclusive(',')
                .map(str::trim)
                .filter(|token| !token.is_empty())
                .collect(),
            WrapChar::None => Some(text.trim()).filter(|text| !text.is_empty()).into_iter().collect(),
        }
    }

    fn separator(&self) -> &'static str {
        match self.wrap_char {
            WrapChar::Space => " ",
            WrapChar::Comma | WrapChar::None => "",
        }
    }

    /// The wrapped lines for `text`, padding included; empty for blank text.
    pub fn lines(&self, text: &str) -> Vec<String> {
        let separator = self.separator();
        let mut lines = Vec::new();
        let mut line = self.first_padding.to_string();
        let mut line_len = line.chars().count();
        let mut started = false;

        for token in self.tokens(text) {
            let token_len = token.chars().count();
            if started {
                if line_len + separator.len() + token_len <= self.width {
                    line.push_str(separator);
                    line.push_str(token);
                    line_len += separator.len() + token_len;
                    continue;
                }
                lines.push(std::mem::replace(&mut line, self.padding.to_string()));
                line_len = self.padding.chars().count();
            }

            let mut rest = token;
            loop {
                let room = self.width.saturating_sub(line_len).max(1);
                let rest_len = rest.chars().count();
                if rest_len <= room || self.wrap_char == WrapChar::Space {
                    line.push_str(rest);
                    line_len += rest_len;
                    break;
                }
                let split = rest
                    .char_indices()
                    .nth(room)
                    .map(|(index, _)| index)
                    .unwrap_or(rest.len());
                line.push_str(&rest[..split]);
                lines.push(std::mem::replace(&mut line, self.padding.to_string()));
                line_len = self.padding.chars().count();
                rest = &rest[split..];
            }
            started = true;
        }

        if started {
            lines.push(line);
        }
        lines
    }

    /// Write the wrapped block. Returns whether anything was written.
    pub fn write(&self, out: &mut dyn Write, text: &str) -> Result<bool> {
        let lines = self.lines(text);
        for line in &lines {
            writeln!(out, "{}", line.trim_end())?;
        }
        Ok(!lines.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::utils::shrink;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    const DESCRIPTION: &str = "Trifolium repens mRNA for non-cyanogenic beta-glucosidase, \
        isolated from white clover leaves collected in the  north of England during the \
        summer of 1990 and sequenced at the University of Leeds";

    #[rstest]
    #[case(80)]
    #[case(40)]
    #[case(24)]
    fn test_wrapping_respects_width(#[case] width: usize) {
        let writer = BlockWriter::new("DE   ", "DE   ").width(width);
        let lines = writer.lines(DESCRIPTION);

        assert_eq!(lines.iter().all(|line| line.chars().count() <= width), true);
        assert_eq!(lines.iter().all(|line| line.starts_with("DE   ")), true);

        let joined: Vec<&str> = lines.iter().map(|line| &line[5..]).collect();
        assert_eq!(joined.join(" "), shrink(DESCRIPTION));
    }

    #[rstest]
    fn test_location_wraps_after_commas() {
        let writer = BlockWriter::new("FT   CDS             ", "FT                   ")
            .wrap_char(WrapChar::Comma)
            .width(40);
        let lines = writer.lines("join(100..200,300..400,500..600,700..800)");
        assert_eq!(
            lines,
            vec![
                "FT   CDS             join(100..200,",
                "FT                   300..400,500..600,",
                "FT                   700..800)",
            ]
        );
    }

    #[rstest]
    fn test_long_token_is_hard_broken() {
        let writer = BlockWriter::new("    /", "    ").wrap_char(WrapChar::None).width(10);
        let lines = writer.lines("abcdefghijklmnop");
        assert_eq!(lines, vec!["    /abcde", "    fghijk", "    lmnop"]);
    }

    #[rstest]
    fn test_long_word_stays_whole() {
        let writer = BlockWriter::new("    /", "    ").width(12);
        let lines = writer.lines("see abcdefghijklmnop now");
        assert_eq!(lines, vec!["    /see", "    abcdefghijklmnop", "    now"]);
    }

    #[rstest]
    fn test_blank_text_writes_nothing() {
        let mut out = Vec::new();
        let written = BlockWriter::new("KW   ", "KW   ").write(&mut out, "   ").unwrap();
        assert_eq!(written, false);
        assert_eq!(out.is_empty(), true);
    }
}

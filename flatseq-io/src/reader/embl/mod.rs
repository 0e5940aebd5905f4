//! EMBL flat files: two-letter tags in columns 1-2, content from column 6.
pub(crate) mod header;
pub(crate) mod organism;
mod reference;

use std::collections::HashMap;

use once_cell::sync::Lazy;

use crate::reader::block::{BlockReader, BlockShape, ConcatenateType, FnReader, SkipReader};
use crate::reader::entry_reader::FlatFileFormat;
use crate::reader::feature::FeatureReader;
use crate::reader::line_reader::{LineTagger, Tag};
use crate::reader::sequence::SequenceReader;

pub const EMBL_CONTENT_OFFSET: usize = 5;

const SINGLE: BlockShape = BlockShape::SingleLine;
const SPACE: BlockShape = BlockShape::MultiLine(ConcatenateType::Space);
const NO_SPACE: BlockShape = BlockShape::MultiLine(ConcatenateType::NoSpace);
const BREAK: BlockShape = BlockShape::MultiLine(ConcatenateType::Break);

static READERS: Lazy<HashMap<&'static str, Box<dyn BlockReader>>> = Lazy::new(|| {
    let readers: Vec<Box<dyn BlockReader>> = vec![
        Box::new(FnReader::new("ID", SINGLE, header::read_id)),
        Box::new(FnReader::new("AC", SPACE, header::read_accessions)),
        Box::new(FnReader::new("PR", SPACE, header::read_projects)),
        Box::new(FnReader::new("DT", SINGLE, header::read_date)),
        Box::new(FnReader::new("DE", SPACE, header::read_description)),
        Box::new(FnReader::new("KW", SPACE, header::read_keywords)),
        Box::new(FnReader::new("DR", SINGLE, header::read_xref)),
        Box::new(FnReader::new("CC", BREAK, header::read_comment)),
        Box::new(FnReader::new("CO", NO_SPACE, header::read_contigs)),
        Box::new(FnReader::new("OS", SPACE, organism::read_species)),
        Box::new(FnReader::new("OC", SPACE, organism::read_classification)),
        Box::new(FnReader::new("OG", SINGLE, organism::read_organelle)),
        Box::new(FnReader::new("RN", SINGLE, reference::read_number)),
        Box::new(FnReader::new("RC", SPACE, reference::read_comment)),
        Box::new(FnReader::new("RP", SPACE, reference::read_positions)),
        Box::new(FnReader::new("RX", SINGLE, reference::read_xref)),
        Box::new(FnReader::new("RG", SPACE, reference::read_group)),
        Box::new(FnReader::new("RA", SPACE, reference::read_authors)),
        Box::new(FnReader::new("RT", SPACE, reference::read_title)),
        Box::new(FnReader::new("RL", SPACE, reference::read_location)),
        Box::new(FeatureReader("FT")),
        Box::new(SequenceReader("SQ")),
        Box::new(SkipReader("FH")),
        Box::new(SkipReader("XX")),
    ];
    readers.into_iter().map(|reader| (reader.tag(), reader)).collect()
});

#[derive(Clone, Copy, Debug, Default)]
pub struct EmblFormat;

impl LineTagger for EmblFormat {
    fn classify(&self, line: &str, _active: Option<&str>) -> Tag {
        if line.starts_with("//") {
            return Tag::named("//");
        }
        if line.trim().is_empty() {
            return Tag::Blank;
        }
        let prefix = line.get(..2).unwrap_or(line).trim();
        if prefix.is_empty() {
            Tag::Untagged
        } else {
            Tag::named(prefix)
        }
    }
}

impl FlatFileFormat for EmblFormat {
    fn name(&self) -> &'static str {
        "EMBL"
    }

    fn entry_start_tag(&self) -> &'static str {
        "ID"
    }

    fn content_offset(&self) -> usize {
        EMBL_CONTENT_OFFSET
    }

    fn continues(&self, block_tag: &str, next: &Tag) -> bool {
        next.is(block_tag) || *next == Tag::Untagged
    }

    fn block_reader(&self, tag: &str) -> Option<&'static dyn BlockReader> {
        READERS.get(tag).map(|reader| &**reader)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    #[case("ID   X56734; SV 1;", Tag::named("ID"))]
    #[case("FT                   /gene=\"x\"", Tag::named("FT"))]
    #[case("     gatcctccat atacaacggt", Tag::Untagged)]
    #[case("   ", Tag::Blank)]
    #[case("//", Tag::named("//"))]
    #[case("X", Tag::named("X"))]
    fn test_classify(#[case] line: &str, #[case] expected: Tag) {
        assert_eq!(EmblFormat.classify(line, None), expected);
    }

    #[rstest]
    fn test_registry_covers_tags() {
        for tag in ["ID", "AC", "RL", "FT", "SQ", "XX"] {
            assert_eq!(EmblFormat.block_reader(tag).map(|r| r.tag()), Some(tag));
        }
        assert_eq!(EmblFormat.block_reader("ZZ").is_none(), true);
    }
}

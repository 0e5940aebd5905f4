//! GenBank flat files: keywords in the first 12 columns, sub-keywords
//! indented by up to four spaces, feature keys indented by five.
mod header;
mod reference;

use std::collections::HashMap;

use once_cell::sync::Lazy;

use crate::reader::embl;
use crate::reader::block::{BlockReader, BlockShape, ConcatenateType, FnReader, SkipReader};
use crate::reader::entry_reader::FlatFileFormat;
use crate::reader::feature::{FEATURE_PREFIX_WIDTH, FeatureReader};
use crate::reader::line_reader::{LineTagger, Tag};
use crate::reader::sequence::SequenceReader;

pub const GENBANK_CONTENT_OFFSET: usize = 12;

/// Tag given to every feature-key line of the feature table.
pub const FEATURE_TAG: &str = "FEATURE";

const SEQUENCE_TAG: &str = "ORIGIN";

const SINGLE: BlockShape = BlockShape::SingleLine;
const SPACE: BlockShape = BlockShape::MultiLine(ConcatenateType::Space);
const NO_SPACE: BlockShape = BlockShape::MultiLine(ConcatenateType::NoSpace);
const BREAK: BlockShape = BlockShape::MultiLine(ConcatenateType::Break);

static READERS: Lazy<HashMap<&'static str, Box<dyn BlockReader>>> = Lazy::new(|| {
    let readers: Vec<Box<dyn BlockReader>> = vec![
        Box::new(FnReader::new("LOCUS", SINGLE, header::read_locus)),
        Box::new(FnReader::new("DEFINITION", SPACE, header::read_definition)),
        Box::new(FnReader::new("ACCESSION", SPACE, header::read_accessions)),
        Box::new(FnReader::new("VERSION", SINGLE, header::read_version)),
        Box::new(FnReader::new("DBLINK", BREAK, header::read_dblink)),
        Box::new(FnReader::new("KEYWORDS", SPACE, embl::header::read_keywords)),
        Box::new(FnReader::new("SOURCE", SPACE, header::read_source)),
        Box::new(FnReader::new("ORGANISM", BREAK, header::read_organism)),
        Box::new(FnReader::new("COMMENT", BREAK, header::read_comment)),
        Box::new(FnReader::new("CONTIG", NO_SPACE, embl::header::read_contigs)),
        Box::new(FnReader::new("REFERENCE", SPACE, reference::read_reference)),
        Box::new(FnReader::new("AUTHORS", SPACE, reference::read_authors)),
        Box::new(FnReader::new("CONSRTM", SPACE, reference::read_consortium)),
        Box::new(FnReader::new("TITLE", SPACE, reference::read_title)),
        Box::new(FnReader::new("JOURNAL", SPACE, reference::read_journal)),
        Box::new(FnReader::new("PUBMED", SINGLE, reference::read_pubmed)),
        Box::new(FnReader::new("REMARK", SPACE, reference::read_remark)),
        Box::new(FeatureReader(FEATURE_TAG)),
        Box::new(SequenceReader(SEQUENCE_TAG)),
        Box::new(SkipReader("FEATURES")),
        Box::new(SkipReader("BASE")),
        Box::new(SkipReader("MEDLINE")),
    ];
    readers.into_iter().map(|reader| (reader.tag(), reader)).collect()
});

#[derive(Clone, Copy, Debug, Default)]
pub struct GenBankFormat;

impl LineTagger for GenBankFormat {
    fn classify(&self, line: &str, active: Option<&str>) -> Tag {
        if line.starts_with("//") {
            return Tag::named("//");
        }
        if line.trim().is_empty() {
            return Tag::Blank;
        }
        if active == Some(SEQUENCE_TAG) && line.starts_with(' ') {
            return Tag::Untagged;
        }

        let content = line.trim_start();
        let indent = line.len() - content.len();
        let word = content.split_whitespace().next().unwrap_or_default();
        match indent {
            0 => Tag::named(word),
            1..=4 if word.chars().all(|c| c.is_ascii_uppercase()) => Tag::named(word),
            FEATURE_PREFIX_WIDTH => Tag::named(FEATURE_TAG),
            _ => Tag::Untagged,
        }
    }
}

impl FlatFileFormat for GenBankFormat {
    fn name(&self) -> &'static str {
        "GenBank"
    }

    fn entry_start_tag(&self) -> &'static str {
        "LOCUS"
    }

    fn content_offset(&self) -> usize {
        GENBANK_CONTENT_OFFSET
    }

    fn continues(&self, _block_tag: &str, next: &Tag) -> bool {
        *next == Tag::Untagged
    }

    fn block_reader(&self, tag: &str) -> Option<&'static dyn BlockReader> {
        READERS.get(tag).map(|reader| &**reader)
    }
}

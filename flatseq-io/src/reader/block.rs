use flatseq_core::models::{Entry, Reference};
use flatseq_core::validation::messages;
use flatseq_core::{Origin, ValidationMessage, ValidationResult};

use crate::utils::shrink;

///
/// How the physical lines of a multi-line block are joined before parsing.
///
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConcatenateType {
    /// Join with a single space and collapse whitespace runs.
    Space,
    /// Join without any separator (wrapped locations, translations).
    NoSpace,
    /// Keep line breaks (free-text comments).
    Break,
}

impl ConcatenateType {
    pub fn concatenate<'a, I: IntoIterator<Item = &'a str>>(&self, parts: I) -> String {
        match self {
            ConcatenateType::Space => {
                let joined: Vec<&str> = parts.into_iter().map(str::trim).collect();
                shrink(&joined.join(" "))
            }
            ConcatenateType::NoSpace => parts.into_iter().map(str::trim).collect(),
            ConcatenateType::Break => {
                let lines: Vec<&str> = parts.into_iter().map(str::trim_end).collect();
                lines.join("\n").trim_end().to_string()
            }
        }
    }
}

///
/// How many physical lines make up one block of a given tag.
///
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BlockShape {
    /// `read` is called once per physical line bearing the tag.
    SingleLine,
    /// Lines sharing the tag (or continuing it) are joined into one block.
    MultiLine(ConcatenateType),
    /// One feature: its key line plus location and qualifier continuations.
    Feature,
    /// A sequence header followed by untagged sequence lines.
    Sequence,
}

///
/// The accumulated text of one logical block, with the lines it came from.
///
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Block {
    pub tag: String,
    /// Raw physical lines, tag columns included.
    pub lines: Vec<String>,
    /// Content of the lines with tag columns removed, joined per the shape.
    pub text: String,
    pub origin: Origin,
}

impl Block {
    pub fn first_line(&self) -> usize {
        self.origin.first_line().unwrap_or(0)
    }
}

///
/// The record being built plus the messages reported while building it.
///
#[derive(Debug, Default)]
pub struct EntryState {
    pub entry: Entry,
    pub result: ValidationResult,
}

impl EntryState {
    pub fn new() -> Self {
        EntryState::default()
    }

    pub fn report(&mut self, message: ValidationMessage) {
        self.result.append(message);
    }

    /// The block's text did not match any accepted notation for its tag.
    pub fn invalid_line(&mut self, block: &Block) {
        self.report(
            ValidationMessage::error(messages::INVALID_LINE, block.origin.clone())
                .param(&block.tag)
                .param(&block.text),
        );
    }

    ///
    /// The reference currently being read. Reference lines seen before any
    /// reference number start an unnumbered reference and are reported.
    ///
    pub fn current_reference(&mut self, block: &Block) -> &mut Reference {
        if self.entry.references.is_empty() {
            self.report(
                ValidationMessage::warning(messages::MISSING_REFERENCE_NUMBER, block.origin.clone())
                    .param(&block.tag),
            );
            self.entry.references.push(Reference::default());
        }
        let last = self.entry.references.len() - 1;
        &mut self.entry.references[last]
    }
}

///
/// Parses one kind of logical block into the entry being read.
///
/// Readers never fail: content they cannot parse is reported through the
/// [`EntryState`] against the block's origin and the rest of the record is
/// still read.
///
pub trait BlockReader: Send + Sync {
    fn tag(&self) -> &'static str;

    fn shape(&self) -> BlockShape;

    fn read(&self, block: &Block, state: &mut EntryState);
}

///
/// A block reader backed by a plain function, for tags whose parsing needs
/// no state of its own.
///
pub struct FnReader {
    tag: &'static str,
    shape: BlockShape,
    read: fn(&Block, &mut EntryState),
}

impl FnReader {
    pub const fn new(tag: &'static str, shape: BlockShape, read: fn(&Block, &mut EntryState)) -> Self {
        FnReader { tag, shape, read }
    }
}

impl BlockReader for FnReader {
    fn tag(&self) -> &'static str {
        self.tag
    }

    fn shape(&self) -> BlockShape {
        self.shape
    }

    fn read(&self, block: &Block, state: &mut EntryState) {
        (self.read)(block, state)
    }
}

///
/// Reader for tags whose content is deliberately ignored (separators,
/// headers repeated by the writer).
///
pub struct SkipReader(pub &'static str);

impl BlockReader for SkipReader {
    fn tag(&self) -> &'static str {
        self.0
    }

    fn shape(&self) -> BlockShape {
        BlockShape::SingleLine
    }

    fn read(&self, _block: &Block, _state: &mut EntryState) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    #[case(ConcatenateType::Space, "Trifolium repens mRNA for non-cyanogenic beta-glucosidase")]
    #[case(ConcatenateType::NoSpace, "Trifolium  repensmRNA for non-cyanogenicbeta-glucosidase")]
    #[case(ConcatenateType::Break, "Trifolium  repens\n mRNA for non-cyanogenic\nbeta-glucosidase")]
    fn test_concatenate(#[case] kind: ConcatenateType, #[case] expected: &str) {
        let parts = ["Trifolium  repens ", " mRNA for non-cyanogenic", "beta-glucosidase  "];
        assert_eq!(kind.concatenate(parts), expected);
    }

    #[rstest]
    fn test_current_reference_without_number() {
        let mut state = EntryState::new();
        let block = Block {
            tag: "RA".to_string(),
            lines: vec!["RA   Smith J.;".to_string()],
            text: "Smith J.;".to_string(),
            origin: Origin::line(4),
        };
        state.current_reference(&block).comment = Some("x".to_string());
        state.current_reference(&block);
        assert_eq!(state.entry.references.len(), 1);
        assert_eq!(state.result.len(), 1);
        assert_eq!(state.result.messages()[0].key, messages::MISSING_REFERENCE_NUMBER);
    }
}

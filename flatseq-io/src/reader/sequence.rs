use flatseq_core::validation::messages;
use flatseq_core::{Origin, ValidationMessage};

use crate::reader::block::{Block, BlockReader, BlockShape, EntryState};

///
/// Reader for a sequence block: a header line (`SQ`, `ORIGIN`) followed by
/// untagged lines of bases. Letters are kept (lower-cased), position
/// numbers and spacing are dropped.
///
pub struct SequenceReader(pub &'static str);

impl BlockReader for SequenceReader {
    fn tag(&self) -> &'static str {
        self.0
    }

    fn shape(&self) -> BlockShape {
        BlockShape::Sequence
    }

    fn read(&self, block: &Block, state: &mut EntryState) {
        let first_line = block.first_line();
        for (offset, line) in block.lines.iter().enumerate().skip(1) {
            if line.chars().any(|c| !(c.is_ascii_alphanumeric() || c.is_whitespace())) {
                state.report(
                    ValidationMessage::error(messages::INVALID_SEQUENCE, Origin::line(first_line + offset))
                        .param(line.trim()),
                );
                continue;
            }
            state.entry.sequence.push_bases(line);
        }
    }
}

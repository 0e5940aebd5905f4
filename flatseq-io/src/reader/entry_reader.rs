use std::io::BufRead;

use flatseq_core::models::Entry;
use flatseq_core::validation::messages;
use flatseq_core::{Origin, ValidationMessage, ValidationResult};
use log::{debug, warn};

use crate::error::Result;
use crate::reader::block::{Block, BlockReader, BlockShape, ConcatenateType, EntryState};
use crate::reader::feature::FEATURE_PREFIX_WIDTH;
use crate::reader::line_reader::{LineReader, LineTagger, Tag, line_content};

///
/// A tag-column flat-file dialect: how lines are tagged, which tags open
/// and close a record, and which block reader handles each tag.
///
pub trait FlatFileFormat: LineTagger {
    fn name(&self) -> &'static str;

    /// Tag of the first line of every record (`ID`, `LOCUS`).
    fn entry_start_tag(&self) -> &'static str;

    fn terminator_tag(&self) -> &'static str {
        "//"
    }

    /// Column where the content of a tagged line starts.
    fn content_offset(&self) -> usize;

    /// Whether a line tagged `next` continues a block opened by `block_tag`.
    fn continues(&self, block_tag: &str, next: &Tag) -> bool;

    fn block_reader(&self, tag: &str) -> Option<&'static dyn BlockReader>;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum ReaderState {
    BeforeEntry,
    InEntry,
    EndOfInput,
}

///
/// Streams records out of a flat file, one [`EntryReader::read`] at a time.
///
/// Each call positions on the next record start, dispatches every block to
/// its reader, and stops after the terminator. Content problems become
/// messages in the returned [`ValidationResult`]; only I/O failures are
/// returned as errors.
///
pub struct EntryReader<R: BufRead, F: FlatFileFormat> {
    lines: LineReader<R, F>,
    state: ReaderState,
    entry: Option<Entry>,
    entries_read: usize,
}

impl<R: BufRead, F: FlatFileFormat> EntryReader<R, F> {
    pub fn new(reader: R, format: F) -> Self {
        EntryReader {
            lines: LineReader::new(reader, format),
            state: ReaderState::BeforeEntry,
            entry: None,
            entries_read: 0,
        }
    }

    fn format(&self) -> &F {
        self.lines.tagger()
    }

    /// True when the last `read` produced a record.
    pub fn is_entry(&self) -> bool {
        self.entry.is_some()
    }

    pub fn entry(&self) -> Option<&Entry> {
        self.entry.as_ref()
    }

    pub fn take_entry(&mut self) -> Option<Entry> {
        self.entry.take()
    }

    pub fn entries_read(&self) -> usize {
        self.entries_read
    }

    ///
    /// Read the next record. At end of input the result is empty and
    /// [`EntryReader::is_entry`] is false.
    ///
    pub fn read(&mut self) -> Result<ValidationResult> {
        self.entry = None;
        if self.state == ReaderState::EndOfInput {
            return Ok(ValidationResult::new());
        }
        if !self.lines.is_primed() {
            self.lines.read_line()?;
        }

        if !self.skip_to_entry()? {
            self.state = ReaderState::EndOfInput;
            return Ok(ValidationResult::new());
        }

        self.state = ReaderState::InEntry;
        let mut state = EntryState::new();
        let start_tag = self.format().entry_start_tag();
        let terminator = self.format().terminator_tag();
        let mut blocks_read = 0;

        loop {
            let Some(tag) = self.lines.current_tag().cloned() else {
                self.missing_terminator(&mut state);
                self.state = ReaderState::EndOfInput;
                break;
            };

            match tag {
                Tag::Blank => {}
                Tag::Untagged => {
                    debug!("Orphan line {} ignored", self.lines.line_number());
                    state.report(ValidationMessage::warning(
                        messages::UNEXPECTED_LINE,
                        Origin::line(self.lines.line_number()),
                    ));
                }
                Tag::Named(name) if name == terminator => {
                    self.lines.read_line()?;
                    self.state = ReaderState::BeforeEntry;
                    break;
                }
                Tag::Named(name) if name == start_tag && blocks_read > 0 => {
                    // next record starts here; leave the line for the next read
                    self.missing_terminator(&mut state);
                    self.state = ReaderState::BeforeEntry;
                    break;
                }
                Tag::Named(name) => {
                    let block = self.read_block(&name)?;
                    match self.format().block_reader(&name) {
                        Some(reader) => reader.read(&block, &mut state),
                        None => {
                            debug!("Unknown {} tag {:?} at {}", self.format().name(), name, block.origin);
                            state.report(
                                ValidationMessage::warning(messages::UNKNOWN_TAG, block.origin.clone())
                                    .param(&name),
                            );
                        }
                    }
                    blocks_read += 1;
                }
            }
            self.lines.read_line()?;
        }

        finalize(&mut state);
        self.entries_read += 1;
        self.entry = Some(state.entry);
        Ok(state.result)
    }

    /// Skip blank and stray lines up to the next record start.
    fn skip_to_entry(&mut self) -> Result<bool> {
        let start_tag = self.format().entry_start_tag();
        loop {
            match self.lines.current_tag() {
                None => return Ok(false),
                Some(tag) if tag.is(start_tag) => return Ok(true),
                Some(Tag::Blank) => {}
                Some(_) => debug!("Skipping line {} outside any record", self.lines.line_number()),
            }
            self.lines.read_line()?;
        }
    }

    fn missing_terminator(&self, state: &mut EntryState) {
        warn!(
            "{} record ending at line {} has no terminator",
            self.format().name(),
            self.lines.line_number()
        );
        state.report(ValidationMessage::error(
            messages::MISSING_TERMINATOR,
            Origin::line(self.lines.line_number().max(1)),
        ));
    }

    ///
    /// Gather the lines of the block starting at the current line. The
    /// reader is left on the block's last line.
    ///
    fn read_block(&mut self, tag: &str) -> Result<Block> {
        let shape = self
            .format()
            .block_reader(tag)
            .map(|reader| reader.shape())
            .unwrap_or(BlockShape::MultiLine(ConcatenateType::Space));

        let first_line = self.lines.line_number();
        let mut lines = vec![self.lines.current_line().unwrap_or_default().to_string()];

        if shape != BlockShape::SingleLine {
            while self.block_continues(tag, shape) {
                self.lines.read_line()?;
                lines.push(self.lines.current_line().unwrap_or_default().to_string());
            }
        }

        let offset = self.format().content_offset();
        let content = |line: &String| line_content(line, offset).to_string();
        let text = match shape {
            BlockShape::SingleLine => lines.first().map(content).unwrap_or_default().trim().to_string(),
            BlockShape::MultiLine(concatenate) => {
                let parts: Vec<String> = lines.iter().map(content).collect();
                concatenate.concatenate(parts.iter().map(String::as_str))
            }
            // feature and sequence readers work on the raw lines
            BlockShape::Feature | BlockShape::Sequence => {
                lines.first().map(content).unwrap_or_default().trim().to_string()
            }
        };

        Ok(Block {
            tag: tag.to_string(),
            lines,
            text,
            origin: Origin::lines(first_line, self.lines.line_number()),
        })
    }

    fn block_continues(&self, tag: &str, shape: BlockShape) -> bool {
        let Some(next) = self.lines.next_tag() else {
            return false;
        };
        if !self.format().continues(tag, next) {
            return false;
        }
        match shape {
            // a non-blank key column starts the next feature
            BlockShape::Feature => self
                .lines
                .next_line()
                .and_then(|line| line.as_bytes().get(FEATURE_PREFIX_WIDTH))
                .is_some_and(|c| *c == b' '),
            _ => true,
        }
    }
}

/// Checks that need the whole record.
fn finalize(state: &mut EntryState) {
    let sequence = &state.entry.sequence;
    let has_data = !sequence.bases.is_empty() || !sequence.contigs.is_empty();
    if let Some(declared) = sequence.declared_length {
        let actual = sequence.length();
        if has_data && declared != actual {
            let origin = state.entry.origin("sequence");
            state.report(
                ValidationMessage::warning(messages::SEQUENCE_LENGTH_MISMATCH, origin)
                    .param(declared)
                    .param(actual),
            );
        }
    }
}

impl<R: BufRead, F: FlatFileFormat> Iterator for EntryReader<R, F> {
    type Item = Result<(Entry, ValidationResult)>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.read() {
            Err(e) => {
                self.state = ReaderState::EndOfInput;
                Some(Err(e))
            }
            Ok(result) => self.take_entry().map(|entry| Ok((entry, result))),
        }
    }
}

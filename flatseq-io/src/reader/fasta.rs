use std::io::BufRead;

use flatseq_core::models::Entry;
use flatseq_core::validation::messages;
use flatseq_core::{Origin, ValidationMessage, ValidationResult};
use log::debug;

use crate::error::Result;

///
/// Streams `>id description` records out of a FASTA file.
///
/// Each record becomes an entry whose primary accession is the id and whose
/// bases are the concatenated, lower-cased sequence lines. Sequence lines
/// before the first header are reported once and dropped.
///
pub struct FastaReader<R: BufRead> {
    reader: R,
    line_number: usize,
    /// Header of the next record, kept when the previous record ended on it.
    next_header: Option<(usize, String)>,
    finished: bool,
}

impl<R: BufRead> FastaReader<R> {
    pub fn new(reader: R) -> Self {
        FastaReader {
            reader,
            line_number: 0,
            next_header: None,
            finished: false,
        }
    }

    fn read_line(&mut self) -> Result<Option<String>> {
        let mut line = String::new();
        if self.reader.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        self.line_number += 1;
        Ok(Some(line.trim_end().to_string()))
    }

    /// Read the next record; `Ok(None)` at end of input.
    pub fn read(&mut self) -> Result<Option<(Entry, ValidationResult)>> {
        let mut result = ValidationResult::new();
        let mut orphan = Entry::default();

        let header = match self.next_header.take() {
            Some(header) => header,
            None => loop {
                if self.finished {
                    return Ok(None);
                }
                let Some(line) = self.read_line()? else {
                    self.finished = true;
                    // headerless data is still handed out so the error is seen
                    return Ok((!orphan.sequence.bases.is_empty()).then_some((orphan, result)));
                };
                if let Some(header) = line.strip_prefix('>') {
                    break (self.line_number, header.to_string());
                }
                if !line.trim().is_empty() {
                    debug!("FASTA sequence line {} has no header", self.line_number);
                    if orphan.sequence.bases.is_empty() {
                        result.append(ValidationMessage::error(
                            messages::FASTA_MISSING_HEADER,
                            Origin::line(self.line_number),
                        ));
                    }
                    orphan.sequence.push_bases(&line);
                }
            },
        };

        let (header_line, header) = header;
        let mut entry = Entry::default();
        let mut words = header.trim().splitn(2, char::is_whitespace);
        entry.primary_accession = words.next().filter(|id| !id.is_empty()).map(str::to_string);
        entry.description = words.next().map(str::trim).filter(|d| !d.is_empty()).map(str::to_string);

        while let Some(line) = self.read_line()? {
            if let Some(next) = line.strip_prefix('>') {
                self.next_header = Some((self.line_number, next.to_string()));
                break;
            }
            entry.sequence.push_bases(&line);
        }
        if self.next_header.is_none() {
            self.finished = true;
        }

        if entry.primary_accession.is_none() {
            result.append(
                ValidationMessage::error(messages::INVALID_LINE, Origin::line(header_line))
                    .param(">")
                    .param(&header),
            );
        }
        Ok(Some((entry, result)))
    }
}

impl<R: BufRead> Iterator for FastaReader<R> {
    type Item = Result<(Entry, ValidationResult)>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.read() {
            Ok(record) => record.map(Ok),
            Err(e) => {
                self.finished = true;
                self.next_header = None;
                Some(Err(e))
            }
        }
    }
}

//! AGP v2.0 assembly files.
//!
//! Rows are grouped by object id into one entry per object. Component rows
//! become remote ranges of the object's contig map, gap rows become gap
//! segments plus an `assembly_gap` feature.
use std::io::BufRead;

use flatseq_core::location::{CompoundLocation, Location, Locus};
use flatseq_core::models::{Entry, Feature, Qualifier};
use flatseq_core::validation::messages;
use flatseq_core::{Origin, ValidationMessage, ValidationResult};
use log::debug;

use crate::error::Result;

pub const ASSEMBLY_GAP_FEATURE: &str = "assembly_gap";

const COMPONENT_TYPES: &[&str] = &["W", "A", "D", "F", "G", "O", "P"];
const GAP_TYPES: &[&str] = &["N", "U"];

#[derive(Clone, Debug, PartialEq)]
enum Part {
    Component {
        accession: String,
        version: Option<u32>,
        begin: i64,
        end: i64,
        complement: bool,
    },
    Gap {
        length: u64,
        unknown: bool,
        gap_type: String,
        linkage: bool,
        evidence: Vec<String>,
    },
}

#[derive(Clone, Debug, PartialEq)]
struct Row {
    line_number: usize,
    object: String,
    object_begin: i64,
    object_end: i64,
    part: Part,
}

/// `AC000001.2` -> (`AC000001`, 2); ids without a numeric suffix keep no version.
fn split_version(id: &str) -> (String, Option<u32>) {
    match id.rsplit_once('.') {
        Some((accession, version)) => match version.parse() {
            Ok(version) => (accession.to_string(), Some(version)),
            Err(_) => (id.to_string(), None),
        },
        None => (id.to_string(), None),
    }
}

/// AGP gap type to the `/gap_type` vocabulary of flat files.
fn gap_type(agp: &str, linkage: bool) -> String {
    match agp {
        "scaffold" => "within scaffold",
        "contig" => "between scaffolds",
        "short_arm" => "short arm",
        "repeat" if linkage => "repeat within scaffold",
        "repeat" => "repeat between scaffolds",
        other => other,
    }
    .to_string()
}

fn parse_row(line: &str, line_number: usize) -> std::result::Result<Row, ValidationMessage> {
    let invalid = || {
        ValidationMessage::error(messages::AGP_INVALID_LINE, Origin::line(line_number)).param(line)
    };
    let fields: Vec<&str> = line.split('\t').map(str::trim).collect();
    if fields.len() < 8 {
        return Err(invalid());
    }
    let object_begin: i64 = fields[1].parse().map_err(|_| invalid())?;
    let object_end: i64 = fields[2].parse().map_err(|_| invalid())?;
    if object_begin < 1 || object_end < object_begin {
        return Err(invalid());
    }
    fields[3].parse::<u32>().map_err(|_| invalid())?;
    let column9 = fields.get(8).copied().unwrap_or_default();

    let part = match fields[4] {
        kind if COMPONENT_TYPES.contains(&kind) => {
            let (accession, version) = split_version(fields[5]);
            let complement = match column9 {
                "-" => true,
                "+" | "?" | "0" | "na" | "" => false,
                _ => return Err(invalid()),
            };
            Part::Component {
                accession,
                version,
                begin: fields[6].parse().map_err(|_| invalid())?,
                end: fields[7].parse().map_err(|_| invalid())?,
                complement,
            }
        }
        kind if GAP_TYPES.contains(&kind) => {
            let linkage = match fields[7] {
                "yes" => true,
                "no" => false,
                _ => return Err(invalid()),
            };
            Part::Gap {
                length: fields[5].parse().map_err(|_| invalid())?,
                unknown: kind == "U",
                gap_type: gap_type(fields[6], linkage),
                linkage,
                evidence: column9
                    .split(';')
                    .map(str::trim)
                    .filter(|e| !e.is_empty() && *e != "na")
                    .map(str::to_string)
                    .collect(),
            }
        }
        kind => {
            return Err(ValidationMessage::error(
                messages::AGP_INVALID_COMPONENT_TYPE,
                Origin::line(line_number),
            )
            .param(kind));
        }
    };

    Ok(Row {
        line_number,
        object: fields[0].to_string(),
        object_begin,
        object_end,
        part,
    })
}

/// Entry under construction for one AGP object.
struct ObjectBuilder {
    entry: Entry,
    result: ValidationResult,
    previous_end: i64,
}

impl ObjectBuilder {
    fn new(object: &str) -> Self {
        let mut entry = Entry {
            primary_accession: Some(object.to_string()),
            data_class: Some("CON".to_string()),
            ..Default::default()
        };
        entry.sequence.molecule_type = Some("genomic DNA".to_string());
        ObjectBuilder {
            entry,
            result: ValidationResult::new(),
            previous_end: 0,
        }
    }

    fn add(&mut self, row: Row) {
        let origin = Origin::line(row.line_number);
        if self.previous_end.checked_add(1) != Some(row.object_begin) {
            self.result.append(
                ValidationMessage::error(messages::AGP_NON_CONTIGUOUS_OBJECT, origin.clone())
                    .param(&row.object)
                    .param(row.object_begin)
                    .param(self.previous_end),
            );
        }
        self.previous_end = row.object_end;
        self.entry.sequence.declared_length = u64::try_from(row.object_end).ok();

        let span = row.object_end.abs_diff(row.object_begin).saturating_add(1);
        let (segment, part_span) = match row.part {
            Part::Component {
                accession,
                version,
                begin,
                end,
                complement,
            } => {
                let mut range = Location::range(begin, end).with_locus(Locus::remote(accession, version));
                range.set_complement(complement);
                let part_span = range.length();
                (range, part_span)
            }
            Part::Gap {
                length,
                unknown,
                gap_type,
                linkage,
                evidence,
            } => {
                let mut feature = Feature::new(
                    ASSEMBLY_GAP_FEATURE,
                    CompoundLocation::from(Location::range(row.object_begin, row.object_end)),
                );
                let estimated = if unknown { "unknown".to_string() } else { length.to_string() };
                feature.add_qualifier(Qualifier::new("estimated_length", estimated));
                feature.add_qualifier(Qualifier::new("gap_type", gap_type));
                if linkage {
                    for evidence in evidence {
                        feature.add_qualifier(Qualifier::new("linkage_evidence", evidence));
                    }
                }
                self.entry.add_feature(feature);

                match unknown {
                    true => (Location::unknown_gap(), span),
                    false => (Location::gap(length), length),
                }
            }
        };

        if part_span != span {
            self.result.append(
                ValidationMessage::error(messages::AGP_COMPONENT_LENGTH_MISMATCH, origin)
                    .param(span)
                    .param(part_span),
            );
        }
        self.entry.sequence.contigs.add_location(segment);
    }
}

///
/// Streams one entry per AGP object. Malformed rows are reported against
/// the object being read and skipped.
///
pub struct AgpReader<R: BufRead> {
    reader: R,
    line_number: usize,
    /// First row of the next object, read while closing the previous one.
    pending: Option<Row>,
    finished: bool,
}

impl<R: BufRead> AgpReader<R> {
    pub fn new(reader: R) -> Self {
        AgpReader {
            reader,
            line_number: 0,
            pending: None,
            finished: false,
        }
    }

    /// Next well-formed row; malformed ones are appended to `result`.
    fn next_row(&mut self, result: &mut ValidationResult) -> Result<Option<Row>> {
        loop {
            let mut line = String::new();
            if self.reader.read_line(&mut line)? == 0 {
                return Ok(None);
            }
            self.line_number += 1;
            let line = line.trim_end_matches(['\n', '\r']);
            if line.trim().is_empty() || line.starts_with('#') {
                continue;
            }
            match parse_row(line, self.line_number) {
                Ok(row) => return Ok(Some(row)),
                Err(message) => {
                    debug!("Skipping AGP line {}", self.line_number);
                    result.append(message);
                }
            }
        }
    }

    /// Read the next object; `Ok(None)` at end of input.
    pub fn read(&mut self) -> Result<Option<(Entry, ValidationResult)>> {
        if self.finished {
            return Ok(None);
        }
        let mut skipped = ValidationResult::new();
        let mut builder: Option<ObjectBuilder> = None;

        loop {
            let row = match self.pending.take() {
                Some(row) => row,
                None => {
                    let result = match builder.as_mut() {
                        Some(builder) => &mut builder.result,
                        None => &mut skipped,
                    };
                    match self.next_row(result)? {
                        Some(row) => row,
                        None => {
                            self.finished = true;
                            break;
                        }
                    }
                }
            };

            match builder.as_mut() {
                Some(current) if current.entry.primary_accession.as_deref() != Some(row.object.as_str()) => {
                    self.pending = Some(row);
                    break;
                }
                Some(current) => current.add(row),
                None => {
                    let mut current = ObjectBuilder::new(&row.object);
                    current.result.extend(std::mem::take(&mut skipped));
                    current.add(row);
                    builder = Some(current);
                }
            }
        }

        Ok(match builder {
            Some(builder) => Some((builder.entry, builder.result)),
            // only malformed rows: hand them out so they are not lost
            None if !skipped.is_empty() => Some((Entry::default(), skipped)),
            None => None,
        })
    }
}

impl<R: BufRead> Iterator for AgpReader<R> {
    type Item = Result<(Entry, ValidationResult)>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.read() {
            Ok(record) => record.map(Ok),
            Err(e) => {
                self.finished = true;
                self.pending = None;
                Some(Err(e))
            }
        }
    }
}

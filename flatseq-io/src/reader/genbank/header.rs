use flatseq_core::models::{Topology, XRef};
use flatseq_core::validation::messages;
use flatseq_core::ValidationMessage;
use once_cell::sync::Lazy;

use crate::reader::block::{Block, EntryState};
use crate::reader::embl::header::append_comment;
use crate::reader::embl::organism::{SPECIES, organism};
use crate::reader::matcher::Matcher;
use crate::utils::{parse_date, shrink, split_list};

static LOCUS: Lazy<Matcher> = Lazy::new(|| Matcher::new(r"^(\S+)\s+(\d+)\s+(bp|aa)\b\s*(.*)$"));
static VERSION: Lazy<Matcher> = Lazy::new(|| Matcher::new(r"^(\S+?)\.(\d+)\b"));
static DBLINK: Lazy<Matcher> = Lazy::new(|| Matcher::new(r"^([^:]+):\s*(.*)$"));

///
/// `LOCUS       X56734    1859 bp    mRNA    linear   PLN 12-SEP-1991`
///
/// Everything after the length is optional; the topology is recognised by
/// value, the molecule type precedes it and the division follows it.
///
pub fn read_locus(block: &Block, state: &mut EntryState) {
    let Some(matched) = LOCUS.captures(&block.text) else {
        state.invalid_line(block);
        return;
    };
    state.entry.name = matched.string(1);
    state.entry.sequence.declared_length = matched.integer(2);

    let mut tokens: Vec<&str> = matched.raw(4).unwrap_or_default().split_whitespace().collect();
    if let Some(last) = tokens.last().copied() {
        if last.contains('-') && last.chars().any(|c| c.is_ascii_digit()) {
            tokens.pop();
            match parse_date(last) {
                Some(date) => state.entry.last_updated = Some(date),
                None => state.report(
                    ValidationMessage::error(messages::INVALID_DATE, block.origin.clone()).param(last),
                ),
            }
        }
    }

    let topology = tokens.iter().position(|t| t.parse::<Topology>().is_ok());
    let (molecule_type, division) = match topology {
        Some(index) => {
            state.entry.sequence.topology = tokens[index].parse().ok();
            (tokens[..index].first(), tokens.get(index + 1))
        }
        None if tokens.len() >= 2 => (tokens.first(), tokens.get(1)),
        None => (None, tokens.first()),
    };
    state.entry.sequence.molecule_type = molecule_type.map(|t| t.to_string());
    state.entry.division = division.map(|t| t.to_string());
}

pub fn read_definition(block: &Block, state: &mut EntryState) {
    let text = block.text.strip_suffix('.').unwrap_or(&block.text).trim();
    if !text.is_empty() {
        state.entry.description = Some(text.to_string());
    }
}

pub fn read_accessions(block: &Block, state: &mut EntryState) {
    let entry = &mut state.entry;
    for accession in block.text.split_whitespace() {
        if entry.primary_accession.is_none() {
            entry.primary_accession = Some(accession.to_string());
        } else if entry.primary_accession.as_deref() != Some(accession) {
            entry.secondary_accessions.push(accession.to_string());
        }
    }
}

/// `VERSION     X56734.1`
pub fn read_version(block: &Block, state: &mut EntryState) {
    let Some(matched) = VERSION.captures(&block.text) else {
        state.invalid_line(block);
        return;
    };
    if state.entry.primary_accession.is_none() {
        state.entry.primary_accession = matched.string(1);
    }
    state.entry.sequence.version = matched.integer(2);
}

///
/// `DBLINK      BioProject: PRJNA1` followed by other `Database: id` lines.
/// Projects are kept apart, other links become cross references.
///
pub fn read_dblink(block: &Block, state: &mut EntryState) {
    for line in block.text.lines().map(str::trim).filter(|l| !l.is_empty()) {
        let Some(matched) = DBLINK.captures(line) else {
            state.invalid_line(block);
            continue;
        };
        let database = matched.string(1).unwrap_or_default();
        let ids = split_list(matched.raw(2).unwrap_or_default(), ',');
        if database == "BioProject" {
            state.entry.projects.extend(ids);
        } else {
            state
                .entry
                .xrefs
                .extend(ids.into_iter().map(|id| XRef::new(database.clone(), id)));
        }
    }
}

/// Only the common name in parentheses is taken; `ORGANISM` holds the rest.
pub fn read_source(block: &Block, state: &mut EntryState) {
    if let Some(common) = SPECIES.captures(&block.text).and_then(|m| m.string(2)) {
        organism(state).common_name = Some(common);
    }
}

///
/// First line is the scientific name, following lines the lineage.
///
pub fn read_organism(block: &Block, state: &mut EntryState) {
    let mut lines = block.text.lines();
    let scientific_name = lines.next().map(str::trim).unwrap_or_default().to_string();
    let lineage = shrink(&lines.collect::<Vec<&str>>().join(" "));

    let organism = organism(state);
    organism.scientific_name = scientific_name;
    organism.lineage.extend(split_list(&lineage, ';'));
}

pub fn read_comment(block: &Block, state: &mut EntryState) {
    append_comment(&mut state.entry.comment, &block.text);
}

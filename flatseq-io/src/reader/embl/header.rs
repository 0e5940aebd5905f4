use flatseq_core::models::{Topology, XRef};
use flatseq_core::validation::messages;
use flatseq_core::ValidationMessage;
use once_cell::sync::Lazy;

use crate::reader::block::{Block, EntryState};
use crate::reader::location::parse_location;
use crate::reader::matcher::Matcher;
use crate::utils::split_list;

/// Written in place of an absent `ID` line field.
pub const PLACEHOLDER: &str = "XXX";

static ID: Lazy<Matcher> = Lazy::new(|| {
    Matcher::new(
        r"^([^;\s]+);\s*SV\s+([^;\s]+);\s*([^;\s]+);\s*([^;]+?);\s*([^;\s]+);\s*([^;\s]+);\s*(\d+)\s+BP\.?$",
    )
});
static DT_CREATED: Lazy<Matcher> =
    Lazy::new(|| Matcher::new(r"^(\S+)\s*\((?:Rel\.\s*(\d+),\s*)?Created\)$"));
static DT_UPDATED: Lazy<Matcher> = Lazy::new(|| {
    Matcher::new(r"^(\S+)\s*\((?:Rel\.\s*(\d+),\s*)?Last updated(?:,\s*Version\s*(\d+))?\)$")
});
static DR: Lazy<Matcher> = Lazy::new(|| Matcher::new(r"^([^;]+);\s*([^;]+?)(?:;\s*([^;]+?))?\.?$"));

fn present(value: Option<String>) -> Option<String> {
    value.filter(|v| v != PLACEHOLDER)
}

/// `ID   X56734; SV 1; linear; mRNA; STD; PLN; 1859 BP.`
pub fn read_id(block: &Block, state: &mut EntryState) {
    let Some(matched) = ID.captures(&block.text) else {
        state.invalid_line(block);
        return;
    };
    let entry = &mut state.entry;
    entry.primary_accession = present(matched.string(1));
    entry.sequence.version = matched.integer(2);
    entry.sequence.topology = present(matched.string(3)).and_then(|t| t.parse::<Topology>().ok());
    entry.sequence.molecule_type = present(matched.string(4));
    entry.data_class = present(matched.string(5));
    entry.division = present(matched.string(6));
    entry.sequence.declared_length = matched.integer(7);
}

/// The first accession is primary unless the `ID` line already named one.
pub fn read_accessions(block: &Block, state: &mut EntryState) {
    let entry = &mut state.entry;
    for accession in split_list(&block.text, ';') {
        if entry.primary_accession.is_none() {
            entry.primary_accession = Some(accession);
        } else if entry.primary_accession.as_deref() != Some(accession.as_str()) {
            entry.secondary_accessions.push(accession);
        }
    }
}

/// `PR   Project:PRJNA12345;`
pub fn read_projects(block: &Block, state: &mut EntryState) {
    let projects = split_list(&block.text, ';')
        .into_iter()
        .map(|project| project.trim_start_matches("Project:").trim().to_string())
        .filter(|project| !project.is_empty());
    state.entry.projects.extend(projects);
}

pub fn read_date(block: &Block, state: &mut EntryState) {
    let (matched, created) = match DT_CREATED.captures(&block.text) {
        Some(matched) => (matched, true),
        None => match DT_UPDATED.captures(&block.text) {
            Some(matched) => (matched, false),
            None => {
                state.invalid_line(block);
                return;
            }
        },
    };

    let date = match matched.date(1) {
        Ok(date) => date,
        Err(text) => {
            state.report(ValidationMessage::error(messages::INVALID_DATE, block.origin.clone()).param(text));
            None
        }
    };
    let release = matched.integer(2);
    let entry = &mut state.entry;
    if created {
        entry.first_public = date;
        entry.first_public_release = release;
    } else {
        entry.last_updated = date;
        entry.last_updated_release = release;
        entry.entry_version = matched.integer(3);
    }
}

pub fn read_description(block: &Block, state: &mut EntryState) {
    if !block.text.is_empty() {
        state.entry.description = Some(block.text.clone());
    }
}

/// `KW   a; b; c.` where a lone `.` means no keywords.
pub fn read_keywords(block: &Block, state: &mut EntryState) {
    state.entry.keywords.extend(split_list(&block.text, ';'));
}

/// `DR   MD5; 1e51ca3a5450c43524b9185c236cc5cc.`
pub fn read_xref(block: &Block, state: &mut EntryState) {
    let Some(matched) = DR.captures(&block.text) else {
        state.invalid_line(block);
        return;
    };
    let (Some(database), Some(primary_id)) = (matched.string(1), matched.string(2)) else {
        state.invalid_line(block);
        return;
    };
    let mut xref = XRef::new(database, primary_id);
    xref.secondary_id = matched.string(3);
    state.entry.xrefs.push(xref);
}

///
/// Free-text comment. Separate comment blocks are kept on separate lines.
///
pub fn read_comment(block: &Block, state: &mut EntryState) {
    append_comment(&mut state.entry.comment, &block.text);
}

pub fn append_comment(comment: &mut Option<String>, text: &str) {
    if text.trim().is_empty() {
        return;
    }
    match comment {
        Some(existing) => {
            existing.push('\n');
            existing.push_str(text);
        }
        None => *comment = Some(text.to_string()),
    }
}

/// Contig map of a scaffold or CON record.
pub fn read_contigs(block: &Block, state: &mut EntryState) {
    match parse_location(&block.text) {
        Ok(contigs) => state.entry.sequence.contigs = contigs,
        Err(e) => state.report(
            ValidationMessage::error(messages::INVALID_LOCATION, block.origin.clone())
                .param(&block.text)
                .param(e),
        ),
    }
}

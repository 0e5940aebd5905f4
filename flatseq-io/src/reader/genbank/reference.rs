use chrono::NaiveDate;
use flatseq_core::location::Location;
use flatseq_core::models::{Author, PublicationKind, Reference, XRef};
use flatseq_core::validation::messages;
use flatseq_core::ValidationMessage;
use once_cell::sync::Lazy;

use crate::reader::block::{Block, EntryState};
use crate::reader::matcher::{Matched, Matcher};
use crate::utils::split_list;

static REFERENCE: Lazy<Matcher> =
    Lazy::new(|| Matcher::new(r"^(\d+)(?:\s+\((?:bases|residues)\s+([^)]*)\))?"));
static RANGE: Lazy<Matcher> = Lazy::new(|| Matcher::new(r"^(\d+)\s+to\s+(\d+)$"));

static UNPUBLISHED: Lazy<Matcher> = Lazy::new(|| Matcher::new(r"^Unpublished\.?$"));
static THESIS: Lazy<Matcher> = Lazy::new(|| Matcher::new(r"^Thesis\s*(?:\((\d{4})\))?\s*(.*)$"));
static SUBMISSION: Lazy<Matcher> = Lazy::new(|| Matcher::new(r"^Submitted\s*\(([^)]*)\)\s*(.*)$"));
static PATENT: Lazy<Matcher> = Lazy::new(|| {
    Matcher::new(r"^Patent:\s*([A-Z]{2})\s+([^-\s]+)-(\S+)\s+(\d+)\s+(\S+?);?\s*(?:\s(.*))?$")
});
static BOOK: Lazy<Matcher> = Lazy::new(|| {
    Matcher::new(r"(?i)^\(in\)\s*(.*?)\s*\(eds?\.\);?\s*(.*):\s*([^-\s;]+)-([^;\s]+);\s*(.*?)\s*\((\d{4})\)$")
});
static ARTICLE: Lazy<Matcher> = Lazy::new(|| {
    Matcher::new(r"^(.+?)\s+([^\s(,]+)?\s*(?:\(([^)]*)\))?,\s*([^-\s(]*)(?:-([^\s(]*))?\s*\((\d*)\)$")
});
static ELECTRONIC: Lazy<Matcher> = Lazy::new(|| Matcher::new(r"^\(er\)\s*(.*)$"));

fn date(matched: &Matched, group: usize, block: &Block, state: &mut EntryState) -> Option<NaiveDate> {
    match matched.date(group) {
        Ok(date) => date,
        Err(text) => {
            state.report(ValidationMessage::error(messages::INVALID_DATE, block.origin.clone()).param(text));
            None
        }
    }
}

///
/// `Oxtoby,E., Dunn,M.A. and Hughes,M.A.`
///
fn authors(text: &str) -> Vec<Author> {
    let text = text.trim();
    let (head, last) = match text.rsplit_once(" and ") {
        Some((head, last)) => (head, Some(last)),
        None => (text, None),
    };
    head.split(", ")
        .chain(last)
        .map(str::trim)
        .filter(|author| !author.is_empty())
        .map(Author::from_genbank)
        .collect()
}

///
/// `JOURNAL` notations, tried in priority order; the first match wins.
///
fn parse_publication(block: &Block, state: &mut EntryState) -> Option<PublicationKind> {
    let text = block.text.as_str();
    if UNPUBLISHED.is_match(text) {
        return Some(PublicationKind::Unpublished);
    }
    if let Some(m) = THESIS.captures(text) {
        return Some(PublicationKind::Thesis {
            year: m.integer(1),
            institute: m.string(2).unwrap_or_default(),
        });
    }
    if let Some(m) = SUBMISSION.captures(text) {
        return Some(PublicationKind::Submission {
            date: date(&m, 1, block, state),
            submitter_address: m.string(2),
        });
    }
    if let Some(m) = PATENT.captures(text) {
        return Some(PublicationKind::Patent {
            office: m.string(1).unwrap_or_default(),
            number: m.string(2).unwrap_or_default(),
            patent_kind: m.string(3).unwrap_or_default(),
            sequence_number: m.integer(4),
            date: date(&m, 5, block, state),
            applicants: m.raw(6).map(|a| split_list(a, ';')).unwrap_or_default(),
        });
    }
    if let Some(m) = BOOK.captures(text) {
        return Some(PublicationKind::Book {
            editors: m.raw(1).map(authors).unwrap_or_default(),
            book_title: m.string(2).unwrap_or_default(),
            first_page: m.string(3).unwrap_or_default(),
            last_page: m.string(4).unwrap_or_default(),
            publisher: m.string(5).unwrap_or_default(),
            year: m.integer(6),
        });
    }
    if let Some(m) = ARTICLE.captures(text) {
        return Some(PublicationKind::Article {
            journal: m.string(1).unwrap_or_default(),
            volume: m.string(2),
            issue: m.string(3),
            first_page: m.string(4),
            last_page: m.string(5),
            year: m.integer(6),
        });
    }
    ELECTRONIC.captures(text).map(|m| PublicationKind::ElectronicReference {
        text: m.string(1).unwrap_or_default(),
    })
}

/// `REFERENCE   1  (bases 1 to 1859; 2000 to 2100)`
pub fn read_reference(block: &Block, state: &mut EntryState) {
    let Some(matched) = REFERENCE.captures(&block.text) else {
        state.invalid_line(block);
        state.entry.references.push(Reference::default());
        return;
    };
    let mut reference = Reference::default();
    reference.number = matched.integer(1);

    let ranges = matched.raw(2).unwrap_or_default();
    for part in ranges.split(';').map(str::trim).filter(|p| !p.is_empty()) {
        match RANGE
            .captures(part)
            .and_then(|m| Some(Location::range(m.integer(1)?, m.integer(2)?)))
        {
            Some(range) => reference.location.add_location(range),
            None => {
                state.invalid_line(block);
                break;
            }
        }
    }
    state.entry.references.push(reference);
}

pub fn read_authors(block: &Block, state: &mut EntryState) {
    let authors = authors(&block.text);
    state.current_reference(block).publication.authors.extend(authors);
}

pub fn read_consortium(block: &Block, state: &mut EntryState) {
    let text = block.text.clone();
    state.current_reference(block).publication.consortium = Some(text);
}

pub fn read_title(block: &Block, state: &mut EntryState) {
    let text = block.text.clone();
    state.current_reference(block).publication.title = Some(text);
}

pub fn read_journal(block: &Block, state: &mut EntryState) {
    match parse_publication(block, state) {
        Some(kind) => state.current_reference(block).publication.kind = kind,
        None => state.invalid_line(block),
    }
}

pub fn read_pubmed(block: &Block, state: &mut EntryState) {
    if block.text.is_empty() || !block.text.chars().all(|c| c.is_ascii_digit()) {
        state.invalid_line(block);
        return;
    }
    let xref = XRef::new("PUBMED", block.text.clone());
    state.current_reference(block).xrefs.push(xref);
}

pub fn read_remark(block: &Block, state: &mut EntryState) {
    let text = block.text.clone();
    state.current_reference(block).comment = Some(text);
}

#[cfg(test)]
mod tests {
    use super::*;

    use flatseq_core::Origin;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn block(tag: &str, text: &str) -> Block {
        Block {
            tag: tag.to_string(),
            lines: vec![],
            text: text.to_string(),
            origin: Origin::line(30),
        }
    }

    fn numbered() -> EntryState {
        let mut state = EntryState::new();
        read_reference(&block("REFERENCE", "1"), &mut state);
        state
    }

    #[rstest]
    fn test_reference_ranges() {
        let mut state = EntryState::new();
        read_reference(&block("REFERENCE", "2  (bases 1 to 1859; 2000 to 2100)"), &mut state);
        let reference = &state.entry.references[0];
        assert_eq!(reference.number, Some(2));
        assert_eq!(
            reference.location.locations(),
            &[Location::range(1, 1859), Location::range(2000, 2100)]
        );
    }

    #[rstest]
    #[case("Oxtoby,E., Dunn,M.A. and Hughes,M.A.", 3)]
    #[case("Hughes,M.A.", 1)]
    #[case("Oxtoby,E. and Hughes,M.A.", 2)]
    fn test_authors(#[case] text: &str, #[case] count: usize) {
        let authors = authors(text);
        assert_eq!(authors.len(), count);
        assert_eq!(authors.last(), Some(&Author::new("Hughes", Some("M.A."))));
    }

    #[rstest]
    fn test_reference_lines() {
        let mut state = numbered();
        read_consortium(&block("CONSRTM", "WGS consortium"), &mut state);
        read_title(&block("TITLE", "Nucleotide sequence of beta-glucosidase"), &mut state);
        read_pubmed(&block("PUBMED", "1907511"), &mut state);
        read_remark(&block("REMARK", "revised"), &mut state);

        let reference = &state.entry.references[0];
        assert_eq!(reference.publication.consortium.as_deref(), Some("WGS consortium"));
        assert_eq!(reference.xrefs, vec![XRef::new("PUBMED", "1907511")]);
        assert_eq!(reference.comment.as_deref(), Some("revised"));
        assert_eq!(state.result.is_empty(), true);
    }

    #[rstest]
    fn test_article() {
        let mut state = numbered();
        read_journal(&block("JOURNAL", "Plant Mol. Biol. 17 (2), 209-219 (1991)"), &mut state);
        assert_eq!(
            state.entry.references[0].publication.kind,
            PublicationKind::Article {
                journal: "Plant Mol. Biol.".to_string(),
                volume: Some("17".to_string()),
                issue: Some("2".to_string()),
                first_page: Some("209".to_string()),
                last_page: Some("219".to_string()),
                year: Some(1991),
            }
        );
    }

    #[rstest]
    fn test_patent() {
        let mut state = numbered();
        read_journal(&block("JOURNAL", "Patent: EP 0238993-A 3 30-SEP-1987; BAYER AG"), &mut state);
        assert_eq!(
            state.entry.references[0].publication.kind,
            PublicationKind::Patent {
                office: "EP".to_string(),
                number: "0238993".to_string(),
                patent_kind: "A".to_string(),
                sequence_number: Some(3),
                date: NaiveDate::from_ymd_opt(1987, 9, 30),
                applicants: vec!["BAYER AG".to_string()],
            }
        );
    }

    #[rstest]
    #[case("Unpublished", "unpublished")]
    #[case("Thesis (1999) University of Leeds", "thesis")]
    #[case("Submitted (19-MAR-2018) Plant Sciences, Leeds, UK", "submission")]
    #[case("(in) Magnien,E. (Eds.); BIOMOLECULAR ENGINEERING: 31-40; Nijhoff (1986)", "book")]
    #[case("(er) Online Publication", "electronic")]
    fn test_matcher_priority(#[case] text: &str, #[case] label: &str) {
        let mut state = numbered();
        read_journal(&block("JOURNAL", text), &mut state);
        assert_eq!(state.result.is_empty(), true);
        assert_eq!(state.entry.references[0].publication.kind.label(), label);
    }

    #[rstest]
    fn test_bad_pubmed() {
        let mut state = numbered();
        read_pubmed(&block("PUBMED", "abc"), &mut state);
        assert_eq!(state.result.messages()[0].key, messages::INVALID_LINE);
    }
}

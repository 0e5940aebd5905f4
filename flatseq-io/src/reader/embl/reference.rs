use flatseq_core::location::Location;
use flatseq_core::models::{Author, PublicationKind, Reference, XRef};
use flatseq_core::validation::messages;
use flatseq_core::ValidationMessage;
use once_cell::sync::Lazy;

use crate::reader::block::{Block, EntryState};
use crate::reader::matcher::{Matched, Matcher};
use crate::utils::{split_list, unquote};

static RN: Lazy<Matcher> = Lazy::new(|| Matcher::new(r"^\[\s*(\d+)\s*\]"));
static RP: Lazy<Matcher> = Lazy::new(|| Matcher::new(r"^(\d+)\s*-\s*(\d+)$"));
static RX: Lazy<Matcher> = Lazy::new(|| Matcher::new(r"^([^;]+);\s*(.*?)\.?$"));

static UNPUBLISHED: Lazy<Matcher> = Lazy::new(|| Matcher::new(r"^Unpublished\.?$"));
static THESIS: Lazy<Matcher> = Lazy::new(|| Matcher::new(r"^Thesis\s*(?:\((\d{4})\))?,?\s*(.*?)\.?$"));
static SUBMISSION: Lazy<Matcher> =
    Lazy::new(|| Matcher::new(r"^Submitted\s*\(([^)]*)\)\s*to the INSDC\.?\s*(.*)$"));
static PATENT: Lazy<Matcher> = Lazy::new(|| {
    Matcher::new(r"^Patent number\s+([A-Z]{2})([^-\s]+)-([^/\s]+)/(\d+),\s*(\S+?)\.\s*(.*)$")
});
static BOOK: Lazy<Matcher> = Lazy::new(|| {
    Matcher::new(r"(?i)^\(in\)\s*(.*?)\s*\(eds?\.\);\s*(.*):\s*([^-\s;]+)-([^;\s]+);\s*(.*?)\s*;?\s*\((\d{4})\)\.$")
});
static ARTICLE: Lazy<Matcher> = Lazy::new(|| {
    Matcher::new(r"^(.+?)\s+([^\s(:]+)?(?:\(([^)]*)\))?:([^-(]*)(?:-([^(]*))?\((\d*)\)\.?$")
});
static ELECTRONIC: Lazy<Matcher> = Lazy::new(|| Matcher::new(r"^\(er\)\s*(.*)$"));

fn date(matched: &Matched, group: usize, block: &Block, state: &mut EntryState) -> Option<chrono::NaiveDate> {
    match matched.date(group) {
        Ok(date) => date,
        Err(text) => {
            state.report(ValidationMessage::error(messages::INVALID_DATE, block.origin.clone()).param(text));
            None
        }
    }
}

/// `Oxtoby E., Dunn M.A.;`
fn authors(text: &str) -> Vec<Author> {
    text.trim()
        .trim_end_matches(';')
        .split(',')
        .map(str::trim)
        .filter(|author| !author.is_empty())
        .map(Author::from_embl)
        .collect()
}

///
/// Publication notation of an `RL` block. Several notations overlap (a book
/// also parses as an article), so they are tried in a fixed order and the
/// first match wins.
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

pub fn read_number(block: &Block, state: &mut EntryState) {
    match RN.captures(&block.text).and_then(|m| m.integer(1)) {
        Some(number) => state.entry.references.push(Reference::new(number)),
        None => {
            state.invalid_line(block);
            state.entry.references.push(Reference::default());
        }
    }
}

pub fn read_comment(block: &Block, state: &mut EntryState) {
    let text = block.text.clone();
    state.current_reference(block).comment = Some(text);
}

/// `RP   1-1859, 2000-2100`
pub fn read_positions(block: &Block, state: &mut EntryState) {
    let mut ranges = Vec::new();
    for part in block.text.split(',').map(str::trim).filter(|p| !p.is_empty()) {
        let range = RP
            .captures(part)
            .and_then(|m| Some(Location::range(m.integer(1)?, m.integer(2)?)));
        match range {
            Some(range) => ranges.push(range),
            None => {
                state.invalid_line(block);
                return;
            }
        }
    }
    let reference = state.current_reference(block);
    for range in ranges {
        reference.location.add_location(range);
    }
}

/// `RX   DOI; 10.1007/BF00039495.`
pub fn read_xref(block: &Block, state: &mut EntryState) {
    let xref = RX
        .captures(&block.text)
        .and_then(|m| Some(XRef::new(m.string(1)?, m.string(2)?)));
    match xref {
        Some(xref) => state.current_reference(block).xrefs.push(xref),
        None => state.invalid_line(block),
    }
}

pub fn read_group(block: &Block, state: &mut EntryState) {
    let text = block.text.trim_end_matches(';').trim().to_string();
    if !text.is_empty() {
        state.current_reference(block).publication.consortium = Some(text);
    }
}

pub fn read_authors(block: &Block, state: &mut EntryState) {
    let authors = authors(&block.text);
    state.current_reference(block).publication.authors.extend(authors);
}

/// `RT   "title";` or `RT   ;`
pub fn read_title(block: &Block, state: &mut EntryState) {
    let title = unquote(block.text.trim_end_matches(';'));
    let title = if title.trim().is_empty() { None } else { Some(title) };
    state.current_reference(block).publication.title = title;
}

pub fn read_location(block: &Block, state: &mut EntryState) {
    match parse_publication(block, state) {
        Some(kind) => state.current_reference(block).publication.kind = kind,
        None => state.invalid_line(block),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use chrono::NaiveDate;
    use flatseq_core::Origin;
    use flatseq_core::location::JoinKind;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn block(tag: &str, text: &str) -> Block {
        Block {
            tag: tag.to_string(),
            lines: vec![],
            text: text.to_string(),
            origin: Origin::line(20),
        }
    }

    fn numbered() -> EntryState {
        let mut state = EntryState::new();
        read_number(&block("RN", "[1]"), &mut state);
        state
    }

    #[rstest]
    fn test_reference_lines() {
        let mut state = numbered();
        read_positions(&block("RP", "1-1859, 2000-2100"), &mut state);
        read_xref(&block("RX", "DOI; 10.1007/BF00039495."), &mut state);
        read_group(&block("RG", "WGS consortium;"), &mut state);
        read_authors(&block("RA", "Oxtoby E., Dunn M.A., Hughes M.A.;"), &mut state);
        read_title(
            &block("RT", "\"Nucleotide and derived amino acid sequence of the cyanogenic beta-glucosidase\";"),
            &mut state,
        );
        read_comment(&block("RC", "revised"), &mut state);

        assert_eq!(state.result.is_empty(), true);
        let reference = &state.entry.references[0];
        assert_eq!(reference.number, Some(1));
        assert_eq!(reference.location.join_kind, JoinKind::Order);
        assert_eq!(
            reference.location.locations(),
            &[Location::range(1, 1859), Location::range(2000, 2100)]
        );
        assert_eq!(reference.xrefs, vec![XRef::new("DOI", "10.1007/BF00039495")]);
        assert_eq!(reference.publication.consortium.as_deref(), Some("WGS consortium"));
        assert_eq!(
            reference.publication.authors,
            vec![
                Author::new("Oxtoby", Some("E.")),
                Author::new("Dunn", Some("M.A.")),
                Author::new("Hughes", Some("M.A."))
            ]
        );
        assert_eq!(
            reference.publication.title.as_deref(),
            Some("Nucleotide and derived amino acid sequence of the cyanogenic beta-glucosidase")
        );
        assert_eq!(reference.comment.as_deref(), Some("revised"));
    }

    #[rstest]
    fn test_empty_title() {
        let mut state = numbered();
        read_title(&block("RT", ";"), &mut state);
        assert_eq!(state.entry.references[0].publication.title, None);
    }

    #[rstest]
    fn test_article() {
        let mut state = numbered();
        read_location(&block("RL", "Plant Mol. Biol. 17(2):209-219(1991)."), &mut state);
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
    fn test_submission() {
        let mut state = numbered();
        read_location(
            &block("RL", "Submitted (19-MAR-2018) to the INSDC. Dept of Plant Sciences, Leeds, UK."),
            &mut state,
        );
        assert_eq!(
            state.entry.references[0].publication.kind,
            PublicationKind::Submission {
                date: NaiveDate::from_ymd_opt(2018, 3, 19),
                submitter_address: Some("Dept of Plant Sciences, Leeds, UK.".to_string()),
            }
        );
    }

    #[rstest]
    fn test_patent() {
        let mut state = numbered();
        read_location(
            &block("RL", "Patent number EP0238993-A/3, 30-SEP-1987. BAYER AG; SMITH J."),
            &mut state,
        );
        assert_eq!(
            state.entry.references[0].publication.kind,
            PublicationKind::Patent {
                office: "EP".to_string(),
                number: "0238993".to_string(),
                patent_kind: "A".to_string(),
                sequence_number: Some(3),
                date: NaiveDate::from_ymd_opt(1987, 9, 30),
                applicants: vec!["BAYER AG".to_string(), "SMITH J".to_string()],
            }
        );
    }

    #[rstest]
    #[case("Unpublished.", "unpublished")]
    #[case("Thesis (1999), University of Leeds, UK.", "thesis")]
    #[case("Submitted (01-JAN-2000) to the INSDC. Dept 1:2-3(2000).", "submission")]
    #[case(
        "(in) Magnien E. (eds.); BIOMOLECULAR ENGINEERING IN THE EUROPEAN COMMUNITY:31-40; Martinus Nijhoff Publishers, Dordrecht (1986).",
        "book"
    )]
    #[case("(er) Online Publication", "electronic")]
    #[case("(er) Proc. Online 1:1-2(2001).", "article")]
    fn test_matcher_priority(#[case] text: &str, #[case] label: &str) {
        let mut state = numbered();
        read_location(&block("RL", text), &mut state);
        assert_eq!(state.result.is_empty(), true);
        assert_eq!(state.entry.references[0].publication.kind.label(), label);
    }

    #[rstest]
    fn test_invalid_lines_are_reported() {
        let mut state = EntryState::new();
        read_number(&block("RN", "one"), &mut state);
        read_positions(&block("RP", "1-10, x-20"), &mut state);
        read_location(&block("RL", "not a citation"), &mut state);

        assert_eq!(state.result.count(flatseq_core::Severity::Error), 3);
        assert_eq!(state.entry.references.len(), 1);
        assert_eq!(state.entry.references[0].location.is_empty(), true);
    }
}

use std::io::Write;

use flatseq_core::models::{Author, Entry, PublicationKind, Reference};

use crate::error::Result;
use crate::utils::format_date;
use crate::writer::block::{BlockWriter, WrapChar};
use crate::writer::feature::FeatureWriter;
use crate::writer::location::render_compound_location;
use crate::writer::sequence::write_genbank_sequence;
use crate::writer::{EntryWriter, WriterOptions};

const PADDING: &str = "            ";
const FEATURE_PREFIX: &str = "     ";
const FEATURE_PADDING: &str = "                     ";

/// Keyword in the first twelve columns, continuation lines indented to match.
fn block(out: &mut dyn Write, keyword: &str, text: &str) -> Result<bool> {
    let first = format!("{:<12}", keyword);
    BlockWriter::new(&first, PADDING).write(out, text)
}

/// `Oxtoby,E., Dunn,M.A. and Hughes,M.A.`
fn authors(authors: &[Author]) -> String {
    let names: Vec<String> = authors.iter().map(Author::to_genbank).collect();
    match names.split_last() {
        Some((last, head)) if !head.is_empty() => format!("{} and {}", head.join(", "), last),
        Some((last, _)) => last.clone(),
        None => String::new(),
    }
}

fn date_text(date: &Option<chrono::NaiveDate>) -> String {
    date.as_ref().map(format_date).unwrap_or_default()
}

/// Publication in `JOURNAL` notation.
pub fn journal_text(kind: &PublicationKind) -> String {
    match kind {
        PublicationKind::Unpublished => "Unpublished".to_string(),
        PublicationKind::Thesis { year, institute } => match year {
            Some(year) => format!("Thesis ({}) {}", year, institute),
            None => format!("Thesis {}", institute),
        },
        PublicationKind::Submission {
            date,
            submitter_address,
        } => format!(
            "Submitted ({}) {}",
            date_text(date),
            submitter_address.as_deref().unwrap_or_default()
        )
        .trim_end()
        .to_string(),
        PublicationKind::Patent {
            office,
            number,
            patent_kind,
            sequence_number,
            date,
            applicants,
        } => {
            let mut text = format!(
                "Patent: {} {}-{} {} {};",
                office,
                number,
                patent_kind,
                sequence_number.unwrap_or(0),
                date_text(date)
            );
            if !applicants.is_empty() {
                text.push(' ');
                text.push_str(&applicants.join("; "));
            }
            text
        }
        PublicationKind::Book {
            editors,
            book_title,
            first_page,
            last_page,
            publisher,
            year,
        } => format!(
            "(in) {} (Eds.); {}: {}-{}; {} ({})",
            authors(editors),
            book_title,
            first_page,
            last_page,
            publisher,
            year.map(|y| y.to_string()).unwrap_or_default()
        ),
        PublicationKind::Article {
            journal,
            volume,
            issue,
            first_page,
            last_page,
            year,
        } => {
            let mut text = journal.clone();
            if let Some(volume) = volume {
                text.push(' ');
                text.push_str(volume);
            }
            if let Some(issue) = issue {
                text.push_str(&format!(" ({})", issue));
            }
            text.push_str(", ");
            text.push_str(first_page.as_deref().unwrap_or_default());
            if let Some(last_page) = last_page {
                text.push('-');
                text.push_str(last_page);
            }
            text.push_str(&format!(" ({})", year.map(|y| y.to_string()).unwrap_or_default()));
            text
        }
        PublicationKind::ElectronicReference { text } => format!("(er) {}", text),
    }
}

///
/// GenBank flat-file writer. Keywords occupy the first twelve columns; there
/// are no separator lines between sections.
///
pub struct GenBankWriter {
    options: WriterOptions,
}

impl GenBankWriter {
    pub fn new(options: WriterOptions) -> Self {
        GenBankWriter { options }
    }

    fn write_locus(&self, out: &mut dyn Write, entry: &Entry) -> Result<()> {
        let sequence = &entry.sequence;
        // only the last word fits the column: "genomic DNA" is written as "DNA"
        let molecule_type = sequence
            .molecule_type
            .as_deref()
            .and_then(|m| m.split_whitespace().last())
            .unwrap_or_default();
        let date = entry.last_updated.or(entry.first_public);
        let line = format!(
            "LOCUS       {:<16} {:>11} bp    {:<7} {:<8} {} {}",
            entry.identifier().unwrap_or("unknown"),
            sequence.length(),
            molecule_type,
            sequence.topology.map(|t| t.to_string()).unwrap_or_default(),
            entry.division.as_deref().unwrap_or_default(),
            date_text(&date)
        );
        writeln!(out, "{}", line.trim_end())?;
        Ok(())
    }

    fn write_definition(&self, out: &mut dyn Write, entry: &Entry) -> Result<()> {
        let description = entry.description.as_deref().unwrap_or_default();
        block(out, "DEFINITION", &format!("{}.", description))?;

        let accessions: Vec<&str> = entry
            .primary_accession
            .iter()
            .chain(entry.secondary_accessions.iter())
            .map(String::as_str)
            .collect();
        block(out, "ACCESSION", &accessions.join(" "))?;
        if let Some(version) = entry.accession_version() {
            block(out, "VERSION", &version)?;
        }

        let mut links = Vec::new();
        if !entry.projects.is_empty() {
            links.push(format!("BioProject: {}", entry.projects.join(",")));
        }
        links.extend(
            entry
                .xrefs
                .iter()
                .map(|xref| format!("{}: {}", xref.database, xref.primary_id)),
        );
        for (index, link) in links.iter().enumerate() {
            block(out, if index == 0 { "DBLINK" } else { "" }, link)?;
        }

        block(out, "KEYWORDS", &format!("{}.", entry.keywords.join("; ")))?;
        Ok(())
    }

    fn write_organism(&self, out: &mut dyn Write, entry: &Entry) -> Result<()> {
        let Some(organism) = &entry.organism else {
            return Ok(());
        };
        let species = match &organism.common_name {
            Some(common) => format!("{} ({})", organism.scientific_name, common),
            None => organism.scientific_name.clone(),
        };
        block(out, "SOURCE", &species)?;
        writeln!(out, "  ORGANISM  {}", organism.scientific_name)?;
        if !organism.lineage.is_empty() {
            BlockWriter::new(PADDING, PADDING).write(out, &format!("{}.", organism.lineage.join("; ")))?;
        }
        Ok(())
    }

    fn write_reference(&self, out: &mut dyn Write, number: u32, reference: &Reference) -> Result<()> {
        let ranges: Vec<String> = reference
            .location
            .locations()
            .iter()
            .filter_map(|location| Some(format!("{} to {}", location.begin()?, location.end()?)))
            .collect();
        let number = reference.number.unwrap_or(number);
        if ranges.is_empty() {
            block(out, "REFERENCE", &number.to_string())?;
        } else {
            block(out, "REFERENCE", &format!("{}  (bases {})", number, ranges.join("; ")))?;
        }

        let publication = &reference.publication;
        block(out, "  AUTHORS", &authors(&publication.authors))?;
        if let Some(consortium) = &publication.consortium {
            block(out, "  CONSRTM", consortium)?;
        }
        if let Some(title) = &publication.title {
            block(out, "  TITLE", title)?;
        }
        block(out, "  JOURNAL", &journal_text(&publication.kind))?;
        for xref in reference.xrefs.iter().filter(|xref| xref.database == "PUBMED") {
            block(out, "   PUBMED", &xref.primary_id)?;
        }
        if let Some(comment) = &reference.comment {
            block(out, "  REMARK", comment)?;
        }
        Ok(())
    }

    fn write_comment(&self, out: &mut dyn Write, entry: &Entry) -> Result<()> {
        let Some(comment) = &entry.comment else {
            return Ok(());
        };
        let mut keyword = "COMMENT";
        for line in comment.lines().filter(|line| !line.trim().is_empty()) {
            writeln!(out, "{:<12}{}", keyword, line.trim_end())?;
            keyword = "";
        }
        Ok(())
    }

    fn write_features(&self, out: &mut dyn Write, entry: &Entry) -> Result<()> {
        if entry.features.is_empty() {
            return Ok(());
        }
        writeln!(out, "FEATURES             Location/Qualifiers")?;
        let writer = FeatureWriter::new(FEATURE_PREFIX, FEATURE_PADDING);
        for feature in self.options.features(entry) {
            writer.write(out, feature)?;
        }
        Ok(())
    }

    fn write_sequence(&self, out: &mut dyn Write, entry: &Entry) -> Result<()> {
        let sequence = &entry.sequence;
        if !sequence.contigs.is_empty() {
            BlockWriter::new("CONTIG      ", PADDING)
                .wrap_char(WrapChar::Comma)
                .write(out, &render_compound_location(&sequence.contigs))?;
        } else if self.options.write_sequence && !sequence.bases.is_empty() {
            writeln!(out, "ORIGIN")?;
            write_genbank_sequence(out, &sequence.bases)?;
        }
        Ok(())
    }
}

impl EntryWriter for GenBankWriter {
    fn write(&mut self, out: &mut dyn Write, entry: &Entry) -> Result<()> {
        self.write_locus(out, entry)?;
        self.write_definition(out, entry)?;
        self.write_organism(out, entry)?;
        for (index, reference) in entry.references.iter().enumerate() {
            self.write_reference(out, index as u32 + 1, reference)?;
        }
        self.write_comment(out, entry)?;
        self.write_features(out, entry)?;
        self.write_sequence(out, entry)?;
        writeln!(out, "//")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use chrono::NaiveDate;
    use flatseq_core::location::{CompoundLocation, Location};
    use flatseq_core::models::{Feature, Organism, Qualifier, Topology, XRef};
    use pretty_assertions::assert_eq;
    use rstest::*;

    #[fixture]
    fn entry() -> Entry {
        let mut entry = Entry {
            primary_accession: Some("X56734".to_string()),
            division: Some("PLN".to_string()),
            description: Some("T.repens mRNA for non-cyanogenic beta-glucosidase".to_string()),
            keywords: vec!["beta-glucosidase".to_string()],
            last_updated: NaiveDate::from_ymd_opt(2006, 11, 14),
            projects: vec!["PRJNA1".to_string()],
            organism: Some(Organism {
                scientific_name: "Trifolium repens".to_string(),
                common_name: Some("white clover".to_string()),
                lineage: vec!["Eukaryota".to_string(), "Viridiplantae".to_string()],
                organelle: None,
            }),
            ..Default::default()
        };
        entry.sequence.version = Some(1);
        entry.sequence.topology = Some(Topology::Linear);
        entry.sequence.molecule_type = Some("mRNA".to_string());
        entry.sequence.push_bases("aaacaaacca aatatggatt");

        let mut reference = Reference::new(1);
        reference.location.add_location(Location::range(1, 20));
        reference.publication.authors = vec![
            Author::new("Oxtoby", Some("E.")),
            Author::new("Dunn", Some("M.A.")),
            Author::new("Hughes", Some("M.A.")),
        ];
        reference.publication.title = Some("Nucleotide sequence".to_string());
        reference.publication.kind = PublicationKind::Article {
            journal: "Plant Mol. Biol.".to_string(),
            volume: Some("17".to_string()),
            issue: Some("2".to_string()),
            first_page: Some("209".to_string()),
            last_page: Some("219".to_string()),
            year: Some(1991),
        };
        reference.xrefs.push(XRef::new("PUBMED", "1907511"));
        entry.references.push(reference);

        let mut cds = Feature::new("CDS", CompoundLocation::from(Location::range(1, 20)));
        cds.add_qualifier(Qualifier::new("gene", "lin"));
        entry.add_feature(cds);
        entry
    }

    #[rstest]
    fn test_write_entry(entry: Entry) {
        let mut out = Vec::new();
        GenBankWriter::new(WriterOptions::default()).write(&mut out, &entry).unwrap();
        let text = String::from_utf8(out).unwrap();

        let expected = "\
LOCUS       X56734                    20 bp    mRNA    linear   PLN 14-NOV-2006
DEFINITION  T.repens mRNA for non-cyanogenic beta-glucosidase.
ACCESSION   X56734
VERSION     X56734.1
DBLINK      BioProject: PRJNA1
KEYWORDS    beta-glucosidase.
SOURCE      Trifolium repens (white clover)
  ORGANISM  Trifolium repens
            Eukaryota; Viridiplantae.
REFERENCE   1  (bases 1 to 20)
  AUTHORS   Oxtoby,E., Dunn,M.A. and Hughes,M.A.
  TITLE     Nucleotide sequence
  JOURNAL   Plant Mol. Biol. 17 (2), 209-219 (1991)
   PUBMED   1907511
FEATURES             Location/Qualifiers
     CDS             1..20
                     /gene=\"lin\"
ORIGIN
        1 aaacaaacca aatatggatt
//
";
        assert_eq!(text, expected);
    }

    #[rstest]
    #[case(PublicationKind::Unpublished, "Unpublished")]
    #[case(
        PublicationKind::Thesis { year: Some(1999), institute: "University of Leeds".to_string() },
        "Thesis (1999) University of Leeds"
    )]
    #[case(
        PublicationKind::Submission {
            date: NaiveDate::from_ymd_opt(2018, 3, 19),
            submitter_address: Some("Leeds, UK".to_string()),
        },
        "Submitted (19-MAR-2018) Leeds, UK"
    )]
    #[case(
        PublicationKind::Patent {
            office: "EP".to_string(),
            number: "0238993".to_string(),
            patent_kind: "A".to_string(),
            sequence_number: Some(3),
            date: NaiveDate::from_ymd_opt(1987, 9, 30),
            applicants: vec!["BAYER AG".to_string()],
        },
        "Patent: EP 0238993-A 3 30-SEP-1987; BAYER AG"
    )]
    #[case(
        PublicationKind::Book {
            editors: vec![Author::new("Smith", Some("J."))],
            book_title: "Plant genes".to_string(),
            first_page: "10".to_string(),
            last_page: "20".to_string(),
            publisher: "Academic Press".to_string(),
            year: Some(1990),
        },
        "(in) Smith,J. (Eds.); Plant genes: 10-20; Academic Press (1990)"
    )]
    fn test_journal_text(#[case] kind: PublicationKind, #[case] expected: &str) {
        assert_eq!(journal_text(&kind), expected);
    }

    #[rstest]
    fn test_authors() {
        assert_eq!(authors(&[]), "");
        assert_eq!(authors(&[Author::new("Oxtoby", Some("E."))]), "Oxtoby,E.");
    }

    #[rstest]
    fn test_contig_entry() {
        let mut entry = Entry {
            name: Some("SCAFF1".to_string()),
            ..Default::default()
        };
        entry.sequence.contigs = CompoundLocation::from(vec![Location::gap(5), Location::unknown_gap()]);
        let mut out = Vec::new();
        GenBankWriter::new(WriterOptions::default()).write(&mut out, &entry).unwrap();
        let text = String::from_utf8(out).unwrap();

        assert_eq!(text.starts_with("LOCUS       SCAFF1                   105 bp"), true);
        assert_eq!(text.ends_with("CONTIG      join(gap(5),gap(unk100))\n//\n"), true);
    }

    #[rstest]
    fn test_comment_lines_keep_layout(mut entry: Entry) {
        entry.comment = Some("Table:\n  col1   col2\n\nend".to_string());
        let mut out = Vec::new();
        GenBankWriter::new(WriterOptions::default()).write(&mut out, &entry).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(
            text.contains("COMMENT     Table:\n              col1   col2\n            end\n"),
            true
        );
    }
}

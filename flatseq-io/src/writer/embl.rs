use std::io::Write;

use flatseq_core::location::Location;
use flatseq_core::models::{Author, Entry, PublicationKind, Reference};

use crate::error::Result;
use crate::reader::embl::header::PLACEHOLDER;
use crate::utils::{format_date, quote};
use crate::writer::block::{BlockWriter, WrapChar};
use crate::writer::feature::FeatureWriter;
use crate::writer::location::render_compound_location;
use crate::writer::sequence::write_embl_sequence;
use crate::writer::{EntryWriter, WriterOptions};

const SEPARATOR: &str = "XX";
const FEATURE_PREFIX: &str = "FT   ";
const FEATURE_PADDING: &str = "FT                   ";

type Section = fn(&EmblWriter, &mut dyn Write, &Entry) -> Result<bool>;

/// A tagged block: the tag padded to five columns on every line.
fn block(out: &mut dyn Write, tag: &str, text: &str) -> Result<bool> {
    let padding = format!("{:<5}", tag);
    BlockWriter::new(&padding, &padding).write(out, text)
}

fn authors(authors: &[Author]) -> String {
    authors.iter().map(Author::to_embl).collect::<Vec<String>>().join(", ")
}

fn date_text(date: &Option<chrono::NaiveDate>) -> String {
    date.as_ref().map(format_date).unwrap_or_default()
}

/// Publication in `RL` notation.
pub fn publication_text(kind: &PublicationKind) -> String {
    match kind {
        PublicationKind::Unpublished => "Unpublished.".to_string(),
        PublicationKind::Thesis { year, institute } => match year {
            Some(year) => format!("Thesis ({}), {}.", year, institute),
            None => format!("Thesis, {}.", institute),
        },
        PublicationKind::Submission {
            date,
            submitter_address,
        } => {
            let mut text = format!("Submitted ({}) to the INSDC.", date_text(date));
            if let Some(address) = submitter_address {
                text.push(' ');
                text.push_str(address);
            }
            text
        }
        PublicationKind::Patent {
            office,
            number,
            patent_kind,
            sequence_number,
            date,
            applicants,
        } => {
            let mut text = format!(
                "Patent number {}{}-{}/{}, {}.",
                office,
                number,
                patent_kind,
                sequence_number.unwrap_or(0),
                date_text(date)
            );
            if !applicants.is_empty() {
                text.push(' ');
                text.push_str(&applicants.join("; "));
                text.push('.');
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
            "(in) {} (eds.); {}:{}-{}; {} ({}).",
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
        } => format!(
            "{} {}{}:{}{}({}).",
            journal,
            volume.as_deref().unwrap_or_default(),
            issue.as_ref().map(|i| format!("({})", i)).unwrap_or_default(),
            first_page.as_deref().unwrap_or_default(),
            last_page.as_ref().map(|p| format!("-{}", p)).unwrap_or_default(),
            year.map(|y| y.to_string()).unwrap_or_default()
        ),
        PublicationKind::ElectronicReference { text } => format!("(er) {}", text),
    }
}

///
/// EMBL flat-file writer. Sections are separated by `XX` lines.
///
pub struct EmblWriter {
    options: WriterOptions,
}

impl EmblWriter {
    pub fn new(options: WriterOptions) -> Self {
        EmblWriter { options }
    }

    /// `ID   X56734; SV 1; linear; mRNA; STD; PLN; 1859 BP.`
    fn write_id(&self, out: &mut dyn Write, entry: &Entry) -> Result<bool> {
        let sequence = &entry.sequence;
        writeln!(
            out,
            "ID   {}; SV {}; {}; {}; {}; {}; {} BP.",
            entry.primary_accession.as_deref().unwrap_or(PLACEHOLDER),
            sequence.version.map(|v| v.to_string()).unwrap_or(PLACEHOLDER.to_string()),
            sequence.topology.map(|t| t.to_string()).unwrap_or(PLACEHOLDER.to_string()),
            sequence.molecule_type.as_deref().unwrap_or(PLACEHOLDER),
            entry.data_class.as_deref().unwrap_or(PLACEHOLDER),
            entry.division.as_deref().unwrap_or(PLACEHOLDER),
            sequence.length()
        )?;
        Ok(true)
    }

    fn write_accessions(&self, out: &mut dyn Write, entry: &Entry) -> Result<bool> {
        let accessions: Vec<String> = entry
            .primary_accession
            .iter()
            .chain(entry.secondary_accessions.iter())
            .map(|accession| format!("{};", accession))
            .collect();
        block(out, "AC", &accessions.join(" "))
    }

    fn write_projects(&self, out: &mut dyn Write, entry: &Entry) -> Result<bool> {
        let projects: Vec<String> = entry.projects.iter().map(|p| format!("Project:{};", p)).collect();
        block(out, "PR", &projects.join(" "))
    }

    fn write_dates(&self, out: &mut dyn Write, entry: &Entry) -> Result<bool> {
        if let Some(date) = &entry.first_public {
            match entry.first_public_release {
                Some(release) => writeln!(out, "DT   {} (Rel. {}, Created)", format_date(date), release)?,
                None => writeln!(out, "DT   {} (Created)", format_date(date))?,
            }
        }
        if let Some(date) = &entry.last_updated {
            let mut details = Vec::new();
            if let Some(release) = entry.last_updated_release {
                details.push(format!("Rel. {}", release));
            }
            details.push("Last updated".to_string());
            if let Some(version) = entry.entry_version {
                details.push(format!("Version {}", version));
            }
            writeln!(out, "DT   {} ({})", format_date(date), details.join(", "))?;
        }
        Ok(entry.first_public.is_some() || entry.last_updated.is_some())
    }

    fn write_description(&self, out: &mut dyn Write, entry: &Entry) -> Result<bool> {
        block(out, "DE", entry.description.as_deref().unwrap_or_default())
    }

    fn write_keywords(&self, out: &mut dyn Write, entry: &Entry) -> Result<bool> {
        block(out, "KW", &format!("{}.", entry.keywords.join("; ")))
    }

    fn write_organism(&self, out: &mut dyn Write, entry: &Entry) -> Result<bool> {
        let Some(organism) = &entry.organism else {
            return Ok(false);
        };
        let species = match &organism.common_name {
            Some(common) => format!("{} ({})", organism.scientific_name, common),
            None => organism.scientific_name.clone(),
        };
        let mut written = block(out, "OS", &species)?;
        if !organism.lineage.is_empty() {
            written |= block(out, "OC", &format!("{}.", organism.lineage.join("; ")))?;
        }
        if let Some(organelle) = &organism.organelle {
            written |= block(out, "OG", organelle)?;
        }
        Ok(written)
    }

    fn write_reference(&self, out: &mut dyn Write, number: u32, reference: &Reference) -> Result<()> {
        writeln!(out, "RN   [{}]", reference.number.unwrap_or(number))?;
        if let Some(comment) = &reference.comment {
            block(out, "RC", comment)?;
        }
        let positions: Vec<String> = reference
            .location
            .locations()
            .iter()
            .filter_map(|location: &Location| Some(format!("{}-{}", location.begin()?, location.end()?)))
            .collect();
        block(out, "RP", &positions.join(", "))?;
        for xref in &reference.xrefs {
            writeln!(out, "RX   {}; {}.", xref.database, xref.primary_id)?;
        }

        let publication = &reference.publication;
        if let Some(consortium) = &publication.consortium {
            block(out, "RG", consortium)?;
        }
        if !publication.authors.is_empty() {
            block(out, "RA", &format!("{};", authors(&publication.authors)))?;
        }
        match &publication.title {
            Some(title) => block(out, "RT", &format!("{};", quote(title)))?,
            None => block(out, "RT", ";")?,
        };
        block(out, "RL", &publication_text(&publication.kind))?;
        writeln!(out, "{}", SEPARATOR)?;
        Ok(())
    }

    /// Each reference carries its own separator.
    fn write_references(&self, out: &mut dyn Write, entry: &Entry) -> Result<bool> {
        for (index, reference) in entry.references.iter().enumerate() {
            self.write_reference(out, index as u32 + 1, reference)?;
        }
        Ok(false)
    }

    fn write_xrefs(&self, out: &mut dyn Write, entry: &Entry) -> Result<bool> {
        for xref in &entry.xrefs {
            match &xref.secondary_id {
                Some(secondary) => writeln!(out, "DR   {}; {}; {}.", xref.database, xref.primary_id, secondary)?,
                None => writeln!(out, "DR   {}; {}.", xref.database, xref.primary_id)?,
            }
        }
        Ok(!entry.xrefs.is_empty())
    }

    fn write_comment(&self, out: &mut dyn Write, entry: &Entry) -> Result<bool> {
        let Some(comment) = &entry.comment else {
            return Ok(false);
        };
        // comment lines keep their own layout
        for line in comment.lines() {
            writeln!(out, "{}", format!("CC   {}", line).trim_end())?;
        }
        Ok(true)
    }

    fn write_features(&self, out: &mut dyn Write, entry: &Entry) -> Result<bool> {
        if entry.features.is_empty() {
            return Ok(false);
        }
        writeln!(out, "FH   Key             Location/Qualifiers")?;
        writeln!(out, "FH")?;
        let writer = FeatureWriter::new(FEATURE_PREFIX, FEATURE_PADDING);
        for feature in self.options.features(entry) {
            writer.write(out, feature)?;
        }
        Ok(true)
    }

    /// `CO` for assembled entries, otherwise `SQ` and the bases.
    fn write_sequence(&self, out: &mut dyn Write, entry: &Entry) -> Result<()> {
        let sequence = &entry.sequence;
        if !sequence.contigs.is_empty() {
            BlockWriter::new("CO   ", "CO   ")
                .wrap_char(WrapChar::Comma)
                .write(out, &render_compound_location(&sequence.contigs))?;
            return Ok(());
        }
        if !self.options.write_sequence || sequence.bases.is_empty() {
            return Ok(());
        }

        let counts = sequence.base_counts();
        writeln!(
            out,
            "SQ   Sequence {} BP; {} A; {} C; {} G; {} T; {} other;",
            sequence.bases.len(),
            counts.a,
            counts.c,
            counts.g,
            counts.t,
            counts.other
        )?;
        write_embl_sequence(out, &sequence.bases)
    }
}

impl EntryWriter for EmblWriter {
    fn write(&mut self, out: &mut dyn Write, entry: &Entry) -> Result<()> {
        let sections: [Section; 11] = [
            EmblWriter::write_id,
            EmblWriter::write_accessions,
            EmblWriter::write_projects,
            EmblWriter::write_dates,
            EmblWriter::write_description,
            EmblWriter::write_keywords,
            EmblWriter::write_organism,
            EmblWriter::write_references,
            EmblWriter::write_xrefs,
            EmblWriter::write_comment,
            EmblWriter::write_features,
        ];
        for section in sections {
            if section(self, out, entry)? {
                writeln!(out, "{}", SEPARATOR)?;
            }
        }
        self.write_sequence(out, entry)?;
        writeln!(out, "//")?;
        Ok(())
    }
}

//! XML output. Each entry is mapped onto serde structs and serialised with
//! quick-xml; `@` fields become attributes, everything else child elements.
use std::io::Write;

use quick_xml::se::Serializer;
use serde::Serialize;

use flatseq_core::location::{Location, Locus};
use flatseq_core::models::{Entry, Feature, Organism, PublicationKind, Reference, XRef};

use crate::error::{FlatFileError, Result};
use crate::utils::format_date;
use crate::writer::location::render_compound_location;
use crate::writer::{EntryWriter, WriterOptions};

const ROOT: &str = "ROOT";

#[derive(Serialize)]
#[serde(rename = "entry")]
struct EntryXml<'a> {
    #[serde(rename = "@accession", skip_serializing_if = "Option::is_none")]
    accession: Option<&'a str>,
    #[serde(rename = "@version", skip_serializing_if = "Option::is_none")]
    version: Option<u32>,
    #[serde(rename = "@dataClass", skip_serializing_if = "Option::is_none")]
    data_class: Option<&'a str>,
    #[serde(rename = "@taxonomicDivision", skip_serializing_if = "Option::is_none")]
    division: Option<&'a str>,
    #[serde(rename = "@moleculeType", skip_serializing_if = "Option::is_none")]
    molecule_type: Option<&'a str>,
    #[serde(rename = "@topology", skip_serializing_if = "Option::is_none")]
    topology: Option<String>,
    #[serde(rename = "@sequenceLength")]
    sequence_length: u64,
    #[serde(rename = "@firstPublic", skip_serializing_if = "Option::is_none")]
    first_public: Option<String>,
    #[serde(rename = "@lastUpdated", skip_serializing_if = "Option::is_none")]
    last_updated: Option<String>,
    #[serde(rename = "secondaryAccession")]
    secondary_accessions: &'a [String],
    #[serde(rename = "projectAccession")]
    projects: &'a [String],
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    comment: Option<&'a str>,
    keyword: &'a [String],
    #[serde(skip_serializing_if = "Option::is_none")]
    taxon: Option<TaxonXml<'a>>,
    reference: Vec<ReferenceXml<'a>>,
    xref: Vec<XRefXml<'a>>,
    feature: Vec<FeatureXml<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    contig: Option<ContigXml<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    sequence: Option<String>,
}

#[derive(Serialize)]
struct TaxonXml<'a> {
    #[serde(rename = "@scientificName")]
    scientific_name: &'a str,
    #[serde(rename = "@commonName", skip_serializing_if = "Option::is_none")]
    common_name: Option<&'a str>,
    #[serde(rename = "@organelle", skip_serializing_if = "Option::is_none")]
    organelle: Option<&'a str>,
    lineage: Vec<LineageXml<'a>>,
}

#[derive(Serialize)]
struct LineageXml<'a> {
    #[serde(rename = "@scientificName")]
    scientific_name: &'a str,
}

#[derive(Serialize)]
struct XRefXml<'a> {
    #[serde(rename = "@db")]
    database: &'a str,
    #[serde(rename = "@id")]
    primary_id: &'a str,
    #[serde(rename = "@secondaryId", skip_serializing_if = "Option::is_none")]
    secondary_id: Option<&'a str>,
}

#[derive(Serialize, Default)]
struct ReferenceXml<'a> {
    #[serde(rename = "@type")]
    kind: &'static str,
    #[serde(rename = "@number", skip_serializing_if = "Option::is_none")]
    number: Option<u32>,
    #[serde(rename = "@location", skip_serializing_if = "Option::is_none")]
    location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    title: Option<&'a str>,
    author: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    consortium: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    journal: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    volume: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    issue: Option<&'a str>,
    #[serde(rename = "firstPage", skip_serializing_if = "Option::is_none")]
    first_page: Option<&'a str>,
    #[serde(rename = "lastPage", skip_serializing_if = "Option::is_none")]
    last_page: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    year: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    institute: Option<&'a str>,
    #[serde(rename = "submissionDate", skip_serializing_if = "Option::is_none")]
    submission_date: Option<String>,
    #[serde(rename = "submitterAddress", skip_serializing_if = "Option::is_none")]
    submitter_address: Option<&'a str>,
    #[serde(rename = "patentNumber", skip_serializing_if = "Option::is_none")]
    patent_number: Option<String>,
    applicant: Vec<&'a str>,
    editor: Vec<String>,
    #[serde(rename = "bookTitle", skip_serializing_if = "Option::is_none")]
    book_title: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    publisher: Option<&'a str>,
    #[serde(rename = "referenceComment", skip_serializing_if = "Option::is_none")]
    comment: Option<&'a str>,
    xref: Vec<XRefXml<'a>>,
}

#[derive(Serialize)]
struct FeatureXml<'a> {
    #[serde(rename = "@name")]
    name: &'a str,
    #[serde(rename = "@location")]
    location: String,
    qualifier: Vec<QualifierXml<'a>>,
}

#[derive(Serialize)]
struct QualifierXml<'a> {
    #[serde(rename = "@name")]
    name: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    value: Option<&'a str>,
}

#[derive(Serialize)]
struct ContigXml<'a> {
    #[serde(rename = "$value")]
    parts: Vec<ContigPartXml<'a>>,
}

#[derive(Serialize)]
enum ContigPartXml<'a> {
    #[serde(rename = "range")]
    Range {
        #[serde(rename = "@accession", skip_serializing_if = "Option::is_none")]
        accession: Option<&'a str>,
        #[serde(rename = "@version", skip_serializing_if = "Option::is_none")]
        version: Option<u32>,
        #[serde(rename = "@begin", skip_serializing_if = "Option::is_none")]
        begin: Option<i64>,
        #[serde(rename = "@end", skip_serializing_if = "Option::is_none")]
        end: Option<i64>,
        #[serde(rename = "@complement")]
        complement: bool,
    },
    #[serde(rename = "gap")]
    Gap {
        #[serde(rename = "@length")]
        length: u64,
        #[serde(rename = "@unknownLength")]
        unknown_length: bool,
    },
}

fn date(date: &Option<chrono::NaiveDate>) -> Option<String> {
    date.as_ref().map(format_date)
}

fn xref(xref: &XRef) -> XRefXml<'_> {
    XRefXml {
        database: &xref.database,
        primary_id: &xref.primary_id,
        secondary_id: xref.secondary_id.as_deref(),
    }
}

fn taxon(organism: &Organism) -> TaxonXml<'_> {
    TaxonXml {
        scientific_name: &organism.scientific_name,
        common_name: organism.common_name.as_deref(),
        organelle: organism.organelle.as_deref(),
        lineage: organism
            .lineage
            .iter()
            .map(|name| LineageXml { scientific_name: name })
            .collect(),
    }
}

fn reference(reference: &Reference) -> ReferenceXml<'_> {
    let publication = &reference.publication;
    let positions: Vec<String> = reference
        .location
        .locations()
        .iter()
        .filter_map(|location| Some(format!("{}-{}", location.begin()?, location.end()?)))
        .collect();
    let mut xml = ReferenceXml {
        kind: publication.kind.label(),
        number: reference.number,
        location: (!positions.is_empty()).then(|| positions.join(", ")),
        title: publication.title.as_deref(),
        author: publication.authors.iter().map(|a| a.to_embl()).collect(),
        consortium: publication.consortium.as_deref(),
        comment: reference.comment.as_deref(),
        xref: reference.xrefs.iter().map(xref).collect(),
        ..Default::default()
    };

    match &publication.kind {
        PublicationKind::Unpublished => {}
        PublicationKind::Thesis { year, institute } => {
            xml.year = *year;
            xml.institute = Some(institute.as_str());
        }
        PublicationKind::Submission {
            date: submitted,
            submitter_address,
        } => {
            xml.submission_date = date(submitted);
            xml.submitter_address = submitter_address.as_deref();
        }
        PublicationKind::Patent {
            office,
            number,
            patent_kind,
            sequence_number,
            date: issued,
            applicants,
        } => {
            let mut patent = format!("{}{}-{}", office, number, patent_kind);
            if let Some(sequence_number) = sequence_number {
                patent.push_str(&format!("/{}", sequence_number));
            }
            xml.patent_number = Some(patent);
            xml.submission_date = date(issued);
            xml.applicant = applicants.iter().map(String::as_str).collect();
        }
        PublicationKind::Book {
            editors,
            book_title,
            first_page,
            last_page,
            publisher,
            year,
        } => {
            xml.editor = editors.iter().map(|a| a.to_embl()).collect();
            xml.book_title = Some(book_title.as_str());
            xml.first_page = Some(first_page.as_str());
            xml.last_page = Some(last_page.as_str());
            xml.publisher = Some(publisher.as_str());
            xml.year = *year;
        }
        PublicationKind::Article {
            journal,
            volume,
            issue,
            first_page,
            last_page,
            year,
        } => {
            xml.journal = Some(journal.as_str());
            xml.volume = volume.as_deref();
            xml.issue = issue.as_deref();
            xml.first_page = first_page.as_deref();
            xml.last_page = last_page.as_deref();
            xml.year = *year;
        }
        PublicationKind::ElectronicReference { text } => xml.journal = Some(text.as_str()),
    }
    xml
}

fn feature(feature: &Feature) -> FeatureXml<'_> {
    FeatureXml {
        name: &feature.name,
        location: render_compound_location(&feature.location),
        qualifier: feature
            .qualifiers
            .iter()
            .map(|q| QualifierXml {
                name: &q.name,
                value: q.value.as_deref(),
            })
            .collect(),
    }
}

fn contig_part(location: &Location) -> ContigPartXml<'_> {
    match location {
        // unknown gaps report the same placeholder length as `gap(unk100)`
        Location::Gap { unknown_length, .. } => ContigPartXml::Gap {
            length: location.length(),
            unknown_length: *unknown_length,
        },
        _ => {
            let (accession, version) = match location.locus() {
                Some(Locus::Remote { accession, version }) => (Some(accession.as_str()), *version),
                _ => (None, None),
            };
            ContigPartXml::Range {
                accession,
                version,
                begin: location.begin(),
                end: location.end(),
                complement: location.is_complement(),
            }
        }
    }
}

///
/// XML writer: a declaration and `<ROOT>` around one `<entry>` element per
/// record.
///
pub struct XmlWriter {
    options: WriterOptions,
}

impl XmlWriter {
    pub fn new(options: WriterOptions) -> Self {
        XmlWriter { options }
    }

    fn entry<'a>(&self, entry: &'a Entry) -> EntryXml<'a> {
        let sequence = &entry.sequence;
        EntryXml {
            accession: entry.primary_accession.as_deref(),
            version: sequence.version,
            data_class: entry.data_class.as_deref(),
            division: entry.division.as_deref(),
            molecule_type: sequence.molecule_type.as_deref(),
            topology: sequence.topology.map(|t| t.to_string()),
            sequence_length: sequence.length(),
            first_public: date(&entry.first_public),
            last_updated: date(&entry.last_updated),
            secondary_accessions: &entry.secondary_accessions,
            projects: &entry.projects,
            description: entry.description.as_deref(),
            comment: entry.comment.as_deref(),
            keyword: &entry.keywords,
            taxon: entry.organism.as_ref().map(taxon),
            reference: entry.references.iter().map(reference).collect(),
            xref: entry.xrefs.iter().map(xref).collect(),
            feature: self.options.features(entry).into_iter().map(feature).collect(),
            contig: (!sequence.contigs.is_empty()).then(|| ContigXml {
                parts: sequence.contigs.locations().iter().map(contig_part).collect(),
            }),
            sequence: (self.options.write_sequence && !sequence.bases.is_empty())
                .then(|| String::from_utf8_lossy(&sequence.bases).into_owned()),
        }
    }
}

impl EntryWriter for XmlWriter {
    fn write_header(&mut self, out: &mut dyn Write) -> Result<()> {
        writeln!(out, "<?xml version=\"1.0\" encoding=\"UTF-8\"?>")?;
        writeln!(out, "<{}>", ROOT)?;
        Ok(())
    }

    fn write(&mut self, out: &mut dyn Write, entry: &Entry) -> Result<()> {
        let mut buffer = String::new();
        let mut serializer = Serializer::new(&mut buffer);
        serializer.indent(' ', 2);
        self.entry(entry)
            .serialize(serializer)
            .map_err(|e| FlatFileError::Xml(e.to_string()))?;
        writeln!(out, "{}", buffer)?;
        Ok(())
    }

    fn write_footer(&mut self, out: &mut dyn Write) -> Result<()> {
        writeln!(out, "</{}>", ROOT)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use flatseq_core::location::CompoundLocation;
    use flatseq_core::models::Qualifier;
    use pretty_assertions::assert_eq;
    use rstest::*;
    use serde::Deserialize;

    #[derive(Deserialize)]
    struct RootCheck {
        #[serde(default)]
        entry: Vec<EntryCheck>,
    }

    #[derive(Deserialize)]
    struct EntryCheck {
        #[serde(rename = "@accession")]
        accession: String,
        #[serde(default)]
        feature: Vec<FeatureCheck>,
    }

    #[derive(Deserialize)]
    struct FeatureCheck {
        #[serde(rename = "@name")]
        name: String,
        #[serde(rename = "@location")]
        location: String,
    }

    #[fixture]
    fn entry() -> Entry {
        let mut entry = Entry {
            primary_accession: Some("X56734".to_string()),
            description: Some("beta-glucosidase <lin> & co".to_string()),
            ..Default::default()
        };
        entry.sequence.push_bases("acgt");
        let mut cds = Feature::new(
            "CDS",
            CompoundLocation::from(vec![Location::range(1, 2), Location::range(3, 4)]),
        );
        cds.add_qualifier(Qualifier::new("gene", "lin"));
        entry.add_feature(cds);
        entry
    }

    fn write_all(entries: &[Entry]) -> String {
        let mut writer = XmlWriter::new(WriterOptions::default());
        let mut out = Vec::new();
        writer.write_header(&mut out).unwrap();
        for entry in entries {
            writer.write(&mut out, entry).unwrap();
        }
        writer.write_footer(&mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[rstest]
    fn test_write_entry(entry: Entry) {
        let text = write_all(&[entry]);

        assert_eq!(text.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<ROOT>\n"), true);
        assert_eq!(text.ends_with("</ROOT>\n"), true);
        assert_eq!(text.contains("accession=\"X56734\""), true);
        assert_eq!(text.contains("sequenceLength=\"4\""), true);
        assert_eq!(text.contains("&lt;lin"), true);
        assert_eq!(text.contains("&amp; co"), true);
        assert_eq!(text.contains("<sequence>acgt</sequence>"), true);
    }

    #[rstest]
    fn test_output_is_well_formed(entry: Entry) {
        let mut second = entry.clone();
        second.primary_accession = Some("X56735".to_string());
        let text = write_all(&[entry, second]);
        let body = text.split_once('\n').map(|(_, body)| body).unwrap();

        let root: RootCheck = quick_xml::de::from_str(body).unwrap();
        assert_eq!(root.entry.len(), 2);
        assert_eq!(root.entry[1].accession, "X56735");
        assert_eq!(root.entry[0].feature[0].name, "CDS");
        assert_eq!(root.entry[0].feature[0].location, "join(1..2,3..4)");
    }

    #[rstest]
    fn test_contig_parts() {
        let mut entry = Entry::default();
        entry.sequence.contigs = CompoundLocation::from(vec![
            Location::range(1, 10).with_locus(Locus::remote("AC1", Some(2))).complemented(),
            Location::unknown_gap(),
            Location::Gap {
                length: 7,
                unknown_length: true,
            },
            Location::gap(24),
        ]);
        let text = write_all(&[entry]);
        assert_eq!(
            text.contains("<range accession=\"AC1\" version=\"2\" begin=\"1\" end=\"10\" complement=\"true\"/>"),
            true
        );
        assert_eq!(text.matches("<gap length=\"100\" unknownLength=\"true\"/>").count(), 2);
        assert_eq!(text.contains("<gap length=\"24\" unknownLength=\"false\"/>"), true);
    }
}

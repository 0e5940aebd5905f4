//! GFF3 output: one row per feature spanning its local extent, plus one
//! child row per segment for multi-segment features.
use std::io::Write;

use flatseq_core::models::{Entry, Feature};

use crate::error::Result;
use crate::writer::{EntryWriter, WriterOptions};

const UNKNOWN_SEQID: &str = "unknown";
const ENCODED: [char; 7] = [';', '=', '&', ',', '%', '\t', '\n'];

/// Percent-encode the characters reserved in column 9.
fn encode(value: &str) -> String {
    let mut encoded = String::with_capacity(value.len());
    for c in value.chars() {
        if ENCODED.contains(&c) {
            encoded.push_str(&format!("%{:02X}", c as u32));
        } else {
            encoded.push(c);
        }
    }
    encoded
}

struct Gff3Record<'a> {
    seqid: &'a str,
    source: &'a str,
    feature_type: &'a str,
    start: i64,
    end: i64,
    strand: char,
    phase: Option<u32>,
    attributes: Vec<(String, String)>,
}

impl Gff3Record<'_> {
    fn write(&self, out: &mut dyn Write) -> Result<()> {
        let attributes: Vec<String> = self
            .attributes
            .iter()
            .map(|(name, value)| format!("{}={}", name, value))
            .collect();
        writeln!(
            out,
            "{}\t{}\t{}\t{}\t{}\t.\t{}\t{}\t{}",
            self.seqid,
            self.source,
            self.feature_type,
            self.start,
            self.end,
            self.strand,
            self.phase.map_or(".".to_string(), |p| p.to_string()),
            if attributes.is_empty() {
                ".".to_string()
            } else {
                attributes.join(";")
            }
        )?;
        Ok(())
    }
}

/// Qualifiers grouped by name in first-seen order, values comma-joined.
fn qualifier_attributes(feature: &Feature) -> Vec<(String, String)> {
    let mut grouped: Vec<(String, Vec<String>)> = Vec::new();
    for qualifier in &feature.qualifiers {
        let value = encode(qualifier.value.as_deref().unwrap_or("true"));
        match grouped.iter_mut().find(|(name, _)| *name == qualifier.name) {
            Some((_, values)) => values.push(value),
            None => grouped.push((qualifier.name.clone(), vec![value])),
        }
    }
    grouped
        .into_iter()
        .map(|(name, values)| (encode(&name), values.join(",")))
        .collect()
}

fn strand(feature: &Feature) -> char {
    let local: Vec<_> = feature
        .location
        .locations()
        .iter()
        .filter(|location| !location.is_remote() && !location.is_gap())
        .collect();
    let segments_reversed = !local.is_empty() && local.iter().all(|location| location.is_complement());
    if feature.location.complement != segments_reversed {
        '-'
    } else {
        '+'
    }
}

fn phase(feature: &Feature) -> Option<u32> {
    if feature.name != "CDS" {
        return None;
    }
    let codon_start = feature
        .qualifier("codon_start")
        .and_then(|q| q.value.as_deref())
        .and_then(|v| v.trim().parse::<u32>().ok())
        .unwrap_or(1);
    Some(codon_start.saturating_sub(1).min(2))
}

///
/// Phase of every segment of a CDS, in stored order. Bases of the earlier
/// segments in coding order decide where the first whole codon of a segment
/// starts; a complemented compound is coded from its last segment.
///
fn segment_phases(feature: &Feature) -> Vec<Option<u32>> {
    let locations = feature.location.locations();
    let Some(offset) = phase(feature) else {
        return vec![None; locations.len()];
    };
    let mut order: Vec<usize> = (0..locations.len()).collect();
    if feature.location.complement {
        order.reverse();
    }

    let mut phases = vec![None; locations.len()];
    let mut preceding: u64 = 0;
    for index in order {
        phases[index] = Some(((u64::from(offset) + 3 - preceding % 3) % 3) as u32);
        preceding = preceding.saturating_add(locations[index].length());
    }
    phases
}

///
/// GFF3 writer. Feature IDs are numbered across the whole output stream.
///
pub struct Gff3Writer {
    options: WriterOptions,
    counter: usize,
}

impl Gff3Writer {
    pub fn new(options: WriterOptions) -> Self {
        Gff3Writer { options, counter: 0 }
    }

    fn write_feature(&mut self, out: &mut dyn Write, seqid: &str, feature: &Feature) -> Result<()> {
        let location = &feature.location;
        let (Some(start), Some(end)) = (location.min_position(), location.max_position()) else {
            return Ok(());
        };
        self.counter += 1;
        let id = format!("{}{}", feature.name, self.counter);

        let mut attributes = vec![("ID".to_string(), encode(&id))];
        attributes.extend(qualifier_attributes(feature));
        let record = Gff3Record {
            seqid,
            source: &self.options.gff_source,
            feature_type: &feature.name,
            start,
            end,
            strand: strand(feature),
            phase: phase(feature),
            attributes,
        };
        record.write(out)?;

        let phases = segment_phases(feature);
        let segments: Vec<(i64, i64, Option<u32>)> = location
            .locations()
            .iter()
            .zip(phases)
            .filter(|(segment, _)| !segment.is_remote() && !segment.is_gap())
            .filter_map(|(segment, phase)| Some((segment.begin()?, segment.end()?, phase)))
            .collect();
        if segments.len() > 1 {
            for (begin, end, phase) in segments {
                Gff3Record {
                    start: begin.min(end),
                    end: begin.max(end),
                    phase,
                    attributes: vec![("Parent".to_string(), encode(&id))],
                    ..record
                }
                .write(out)?;
            }
        }
        Ok(())
    }
}

impl EntryWriter for Gff3Writer {
    fn write_header(&mut self, out: &mut dyn Write) -> Result<()> {
        writeln!(out, "##gff-version 3")?;
        Ok(())
    }

    fn write(&mut self, out: &mut dyn Write, entry: &Entry) -> Result<()> {
        let seqid = entry
            .accession_version()
            .or_else(|| entry.identifier().map(str::to_string))
            .unwrap_or(UNKNOWN_SEQID.to_string());
        writeln!(out, "##sequence-region {} 1 {}", seqid, entry.sequence.length())?;

        let options = self.options.clone();
        for feature in options.features(entry) {
            self.write_feature(out, &seqid, feature)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use flatseq_core::location::{CompoundLocation, Location};
    use flatseq_core::models::Qualifier;
    use pretty_assertions::assert_eq;
    use rstest::*;

    #[fixture]
    fn entry() -> Entry {
        let mut entry = Entry {
            primary_accession: Some("X56734".to_string()),
            ..Default::default()
        };
        entry.sequence.version = Some(1);
        entry.sequence.declared_length = Some(1859);

        let mut gene = Feature::new("gene", CompoundLocation::from(Location::range(14, 1495)));
        gene.add_qualifier(Qualifier::new("gene", "lin"));
        gene.add_qualifier(Qualifier::new("note", "a;b"));
        gene.add_qualifier(Qualifier::new("note", "c"));
        gene.add_qualifier(Qualifier::flag("pseudo"));
        entry.add_feature(gene);

        let mut cds = Feature::new(
            "CDS",
            CompoundLocation::from(vec![
                Location::range(14, 500).complemented(),
                Location::range(600, 1495).complemented(),
            ]),
        );
        cds.add_qualifier(Qualifier::new("codon_start", "2"));
        entry.add_feature(cds);
        entry
    }

    #[rstest]
    fn test_write_entry(entry: Entry) {
        let mut writer = Gff3Writer::new(WriterOptions::default());
        let mut out = Vec::new();
        writer.write_header(&mut out).unwrap();
        writer.write(&mut out, &entry).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(
            lines,
            vec![
                "##gff-version 3",
                "##sequence-region X56734.1 1 1859",
                "X56734.1\tEMBL\tgene\t14\t1495\t.\t+\t.\tID=gene1;gene=lin;note=a%3Bb,c;pseudo=true",
                "X56734.1\tEMBL\tCDS\t14\t1495\t.\t-\t1\tID=CDS2;codon_start=2",
                "X56734.1\tEMBL\tCDS\t14\t500\t.\t-\t1\tParent=CDS2",
                "X56734.1\tEMBL\tCDS\t600\t1495\t.\t-\t0\tParent=CDS2",
            ]
        );
    }

    #[rstest]
    #[case(false, "1", vec![Some(0), Some(2)])]
    #[case(false, "2", vec![Some(1), Some(0)])]
    #[case(true, "1", vec![Some(1), Some(0)])]
    fn test_segment_phases(#[case] complement: bool, #[case] codon_start: &str, #[case] expected: Vec<Option<u32>>) {
        let mut location = CompoundLocation::from(vec![Location::range(1, 10), Location::range(20, 30)]);
        location.set_complement(complement);
        let mut cds = Feature::new("CDS", location);
        cds.add_qualifier(Qualifier::new("codon_start", codon_start));
        assert_eq!(segment_phases(&cds), expected);

        cds.name = "exon".to_string();
        assert_eq!(segment_phases(&cds), vec![None, None]);
    }

    #[rstest]
    fn test_counter_spans_entries(entry: Entry) {
        let mut writer = Gff3Writer::new(WriterOptions::default());
        let mut out = Vec::new();
        writer.write(&mut out, &entry).unwrap();
        writer.write(&mut out, &entry).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(text.contains("ID=gene3;"), true);
        assert_eq!(text.contains("ID=CDS4;"), true);
    }

    #[rstest]
    #[case("plain", "plain")]
    #[case("a=b;c", "a%3Db%3Bc")]
    #[case("50%", "50%25")]
    #[case("x\ty", "x%09y")]
    fn test_encode(#[case] value: &str, #[case] expected: &str) {
        assert_eq!(encode(value), expected);
    }

    #[rstest]
    fn test_skips_remote_only_features() {
        let mut entry = Entry::default();
        entry.add_feature(Feature::new(
            "misc_feature",
            CompoundLocation::from(
                Location::range(1, 10).with_locus(flatseq_core::location::Locus::remote("AC1", None)),
            ),
        ));
        let mut out = Vec::new();
        Gff3Writer::new(WriterOptions::default()).write(&mut out, &entry).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "##sequence-region unknown 1 0\n");
    }
}

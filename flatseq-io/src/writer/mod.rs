//! Record writers.
//!
//! Every output format implements [`EntryWriter`]. EMBL and GenBank share
//! the [`BlockWriter`] wrapping primitive, the feature-table writer and the
//! location renderer; only section order, padding and notation differ.
pub mod block;
pub mod embl;
pub mod feature;
pub mod genbank;
pub mod gff3;
pub mod location;
pub mod sequence;
pub mod xml;

use std::fmt::{self, Display};
use std::io::Write;
use std::str::FromStr;

use flatseq_core::models::{Entry, Feature};

use crate::error::Result;

// re-export for cleaner imports
pub use self::block::{BlockWriter, LINE_WIDTH, WrapChar};
pub use self::embl::EmblWriter;
pub use self::genbank::GenBankWriter;
pub use self::gff3::Gff3Writer;
pub use self::location::{render_compound_location, render_location};
pub use self::xml::XmlWriter;

///
/// Serialises entries to one output format.
///
/// `write_header` and `write_footer` are called once per output stream,
/// around any number of `write` calls.
///
pub trait EntryWriter {
    fn write_header(&mut self, _out: &mut dyn Write) -> Result<()> {
        Ok(())
    }

    fn write(&mut self, out: &mut dyn Write, entry: &Entry) -> Result<()>;

    fn write_footer(&mut self, _out: &mut dyn Write) -> Result<()> {
        Ok(())
    }
}

///
/// Resolved writer settings.
///
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WriterOptions {
    /// Write features in output order (`source` first, then by position).
    pub sort_features: bool,
    /// Include the sequence section.
    pub write_sequence: bool,
    /// Column 2 of GFF3 rows.
    pub gff_source: String,
}

impl Default for WriterOptions {
    fn default() -> Self {
        WriterOptions {
            sort_features: false,
            write_sequence: true,
            gff_source: "EMBL".to_string(),
        }
    }
}

impl WriterOptions {
    /// The entry's features, sorted when requested.
    pub fn features<'e>(&self, entry: &'e Entry) -> Vec<&'e Feature> {
        if self.sort_features {
            entry.sorted_features()
        } else {
            entry.features.iter().collect()
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    Embl,
    GenBank,
    Xml,
    Gff3,
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "embl" => Ok(OutputFormat::Embl),
            "genbank" | "gb" => Ok(OutputFormat::GenBank),
            "xml" => Ok(OutputFormat::Xml),
            "gff3" | "gff" => Ok(OutputFormat::Gff3),
            _ => Err(format!("Invalid output format: {}", s)),
        }
    }
}

impl Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Embl => write!(f, "embl"),
            OutputFormat::GenBank => write!(f, "genbank"),
            OutputFormat::Xml => write!(f, "xml"),
            OutputFormat::Gff3 => write!(f, "gff3"),
        }
    }
}

impl OutputFormat {
    /// File extension used for converted files.
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Embl => "embl",
            OutputFormat::GenBank => "gb",
            OutputFormat::Xml => "xml",
            OutputFormat::Gff3 => "gff3",
        }
    }

    pub fn writer(&self, options: WriterOptions) -> Box<dyn EntryWriter> {
        match self {
            OutputFormat::Embl => Box::new(EmblWriter::new(options)),
            OutputFormat::GenBank => Box::new(GenBankWriter::new(options)),
            OutputFormat::Xml => Box::new(XmlWriter::new(options)),
            OutputFormat::Gff3 => Box::new(Gff3Writer::new(options)),
        }
    }
}

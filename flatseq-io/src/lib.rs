//! # Readers and writers for sequence flat files.
//!
//! Records are streamed out of EMBL, GenBank, AGP and FASTA files one at a
//! time, each paired with the validation messages collected while it was
//! read, and written back as EMBL, GenBank, XML or GFF3.
//!
//! ```no_run
//! use std::path::Path;
//!
//! use flatseq_core::utils::FileType;
//! use flatseq_io::writer::{EntryWriter, OutputFormat, WriterOptions};
//!
//! let mut writer = OutputFormat::GenBank.writer(WriterOptions::default());
//! let mut out = std::io::stdout();
//! for record in flatseq_io::open_entries(Path::new("X56734.embl"), FileType::Embl).unwrap() {
//!     let (entry, result) = record.unwrap();
//!     if result.is_valid() {
//!         writer.write(&mut out, &entry).unwrap();
//!     }
//! }
//! ```
pub mod config;
pub mod error;
pub mod reader;
pub mod utils;
pub mod writer;

use std::path::Path;

use flatseq_core::models::Entry;
use flatseq_core::utils::{FileType, get_dynamic_reader};
use flatseq_core::ValidationResult;
use log::debug;

// re-expose core functions
pub use config::*;
pub use error::*;
pub use reader::{AgpReader, EmblFormat, EntryReader, FastaReader, GenBankFormat};
pub use writer::{EntryWriter, OutputFormat, WriterOptions};

/// A stream of records, each with the messages collected while reading it.
pub type Entries = Box<dyn Iterator<Item = Result<(Entry, ValidationResult)>>>;

///
/// Open a plain or gzipped file and stream its records with the reader for
/// `format`.
///
/// # Arguments
///
/// - path: path to the file to read
/// - format: input format, usually from [`flatseq_core::utils::get_file_info`]
///
pub fn open_entries(path: &Path, format: FileType) -> anyhow::Result<Entries> {
    debug!("Opening {:?} as {:?}", path, format);
    let reader = get_dynamic_reader(path)?;
    let entries: Entries = match format {
        FileType::Embl => Box::new(EntryReader::new(reader, EmblFormat)),
        FileType::GenBank => Box::new(EntryReader::new(reader, GenBankFormat)),
        FileType::Agp => Box::new(AgpReader::new(reader)),
        FileType::Fasta => Box::new(FastaReader::new(reader)),
        FileType::Unknown => {
            return Err(FlatFileError::UnsupportedFormat(path.display().to_string()).into());
        }
    };
    Ok(entries)
}

//! Record readers.
//!
//! EMBL and GenBank share one pipeline: a [`LineReader`] tags physical lines,
//! the [`EntryReader`] groups them into blocks and hands each block to the
//! [`BlockReader`] registered for its tag. AGP and FASTA are line based and
//! have readers of their own with the same iterator contract.
pub mod agp;
pub mod block;
pub mod embl;
pub mod entry_reader;
pub mod fasta;
pub mod feature;
pub mod genbank;
pub mod line_reader;
pub mod location;
pub mod matcher;
pub mod sequence;

// re-export for cleaner imports
pub use self::agp::AgpReader;
pub use self::block::{Block, BlockReader, BlockShape, ConcatenateType, EntryState};
pub use self::embl::EmblFormat;
pub use self::entry_reader::{EntryReader, FlatFileFormat};
pub use self::fasta::FastaReader;
pub use self::genbank::GenBankFormat;
pub use self::line_reader::{LineReader, LineTagger, Tag};
pub use self::location::parse_location;

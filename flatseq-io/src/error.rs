use std::io;
use thiserror::Error;

/// Error type for flatseq-io operations.
///
/// Content problems inside a record are not errors: they are reported as
/// validation messages and reading continues. Only failures that stop the
/// stream end up here.
#[derive(Error, Debug)]
pub enum FlatFileError {
    /// IO error occurred while reading or writing a stream.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// Failed to serialise an entry as XML.
    #[error("Failed to write XML: {0}")]
    Xml(String),

    /// No reader is available for the requested input format.
    #[error("Unsupported input format: {0}")]
    UnsupportedFormat(String),
}

/// Result type alias for flatseq-io operations.
pub type Result<T> = std::result::Result<T, FlatFileError>;

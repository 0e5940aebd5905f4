use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum LocationError {
    #[error("Empty location")]
    Empty,

    #[error("Unexpected character '{found}' at offset {offset} in location: {location}")]
    UnexpectedCharacter {
        found: char,
        offset: usize,
        location: String,
    },

    #[error("Unexpected end of location: {0}")]
    UnexpectedEnd(String),

    #[error("Invalid position '{0}'")]
    InvalidPosition(String),

    #[error("Invalid remote accession '{0}'")]
    InvalidAccession(String),

    #[error("Partial marker is only allowed at the outer ends of a location: {0}")]
    MisplacedPartial(String),

    #[error("Nested join/order is not supported: {0}")]
    NestedJoin(String),
}

pub type LocationResult<T> = std::result::Result<T, LocationError>;

use chrono::NaiveDate;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::location::{CompoundLocation, JoinKind};
use crate::models::XRef;

///
/// Author of a publication, split into surname and initials.
///
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Author {
    pub surname: String,
    pub initials: Option<String>,
}

impl Author {
    pub fn new<S: Into<String>>(surname: S, initials: Option<&str>) -> Self {
        Author {
            surname: surname.into(),
            initials: initials.map(str::to_string),
        }
    }

    ///
    /// Parse the EMBL notation `Surname I.J.`: the initials are the last
    /// whitespace-separated word when it ends with a period.
    ///
    pub fn from_embl(text: &str) -> Self {
        let text = text.trim();
        match text.rsplit_once(' ') {
            Some((surname, initials)) if initials.ends_with('.') => {
                Author::new(surname.trim(), Some(initials))
            }
            _ => Author::new(text, None),
        }
    }

    /// Parse the GenBank notation `Surname,I.J.`.
    pub fn from_genbank(text: &str) -> Self {
        let text = text.trim();
        match text.split_once(',') {
            Some((surname, initials)) if !initials.trim().is_empty() => {
                Author::new(surname.trim(), Some(initials.trim()))
            }
            Some((surname, _)) => Author::new(surname.trim(), None),
            None => Author::new(text, None),
        }
    }

    pub fn to_embl(&self) -> String {
        match &self.initials {
            Some(initials) => format!("{} {}", self.surname, initials),
            None => self.surname.clone(),
        }
    }

    pub fn to_genbank(&self) -> String {
        match &self.initials {
            Some(initials) => format!("{},{}", self.surname, initials),
            None => self.surname.clone(),
        }
    }
}

///
/// The citation type of a reference, as recognised on `RL`/`JOURNAL` lines.
///
#[derive(Clone, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum PublicationKind {
    #[default]
    Unpublished,
    Thesis {
        year: Option<i32>,
        institute: String,
    },
    Submission {
        date: Option<NaiveDate>,
        submitter_address: Option<String>,
    },
    Patent {
        office: String,
        number: String,
        patent_kind: String,
        sequence_number: Option<u32>,
        date: Option<NaiveDate>,
        applicants: Vec<String>,
    },
    Book {
        editors: Vec<Author>,
        book_title: String,
        first_page: String,
        last_page: String,
        publisher: String,
        year: Option<i32>,
    },
    Article {
        journal: String,
        volume: Option<String>,
        issue: Option<String>,
        first_page: Option<String>,
        last_page: Option<String>,
        year: Option<i32>,
    },
    ElectronicReference {
        text: String,
    },
}

impl PublicationKind {
    pub fn label(&self) -> &'static str {
        match self {
            PublicationKind::Unpublished => "unpublished",
            PublicationKind::Thesis { .. } => "thesis",
            PublicationKind::Submission { .. } => "submission",
            PublicationKind::Patent { .. } => "patent",
            PublicationKind::Book { .. } => "book",
            PublicationKind::Article { .. } => "article",
            PublicationKind::ElectronicReference { .. } => "electronic",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Publication {
    pub authors: Vec<Author>,
    pub consortium: Option<String>,
    pub title: Option<String>,
    pub kind: PublicationKind,
}

///
/// A citation attached to an entry, with the sequence ranges it covers.
///
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Reference {
    pub number: Option<u32>,
    pub location: CompoundLocation,
    pub comment: Option<String>,
    pub xrefs: Vec<XRef>,
    pub publication: Publication,
}

impl Default for Reference {
    fn default() -> Self {
        Reference {
            number: None,
            location: CompoundLocation::new(JoinKind::Order),
            comment: None,
            xrefs: Vec::new(),
            publication: Publication::default(),
        }
    }
}

impl Reference {
    pub fn new(number: u32) -> Self {
        Reference {
            number: Some(number),
            ..Default::default()
        }
    }
}

use chrono::NaiveDate;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::models::{Feature, Reference, Sequence};
use crate::validation::Origin;

///
/// Cross reference to a record in another database (`DR`, `RX`, `DBLINK`).
///
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct XRef {
    pub database: String,
    pub primary_id: String,
    pub secondary_id: Option<String>,
}

impl XRef {
    pub fn new<D: Into<String>, P: Into<String>>(database: D, primary_id: P) -> Self {
        XRef {
            database: database.into(),
            primary_id: primary_id.into(),
            secondary_id: None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Organism {
    pub scientific_name: String,
    pub common_name: Option<String>,
    pub lineage: Vec<String>,
    pub organelle: Option<String>,
}

///
/// One sequence record and its annotation, as read from or written to a
/// flat file.
///
#[derive(Clone, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Entry {
    pub primary_accession: Option<String>,
    pub secondary_accessions: Vec<String>,
    pub name: Option<String>,
    pub data_class: Option<String>,
    pub division: Option<String>,
    pub description: Option<String>,
    pub keywords: Vec<String>,
    pub comment: Option<String>,
    pub projects: Vec<String>,
    pub first_public: Option<NaiveDate>,
    pub first_public_release: Option<u32>,
    pub last_updated: Option<NaiveDate>,
    pub last_updated_release: Option<u32>,
    pub entry_version: Option<u32>,
    pub xrefs: Vec<XRef>,
    pub organism: Option<Organism>,
    pub references: Vec<Reference>,
    pub features: Vec<Feature>,
    pub sequence: Sequence,
}

impl Entry {
    pub fn add_feature(&mut self, feature: Feature) {
        self.features.push(feature);
    }

    pub fn remove_feature(&mut self, index: usize) -> Option<Feature> {
        if index < self.features.len() {
            Some(self.features.remove(index))
        } else {
            None
        }
    }

    /// Features in output order: `source` first, then by position.
    pub fn sorted_features(&self) -> Vec<&Feature> {
        let mut features: Vec<&Feature> = self.features.iter().collect();
        features.sort_by(|a, b| a.output_order(b));
        features
    }

    /// `ACCESSION.VERSION`, or just the accession when no version is known.
    pub fn accession_version(&self) -> Option<String> {
        let accession = self.primary_accession.as_deref()?;
        Some(match self.sequence.version {
            Some(version) => format!("{}.{}", accession, version),
            None => accession.to_string(),
        })
    }

    /// Best available identifier: accession, then LOCUS name.
    pub fn identifier(&self) -> Option<&str> {
        self.primary_accession.as_deref().or(self.name.as_deref())
    }

    ///
    /// Origin for messages about this entry as a whole, used by the
    /// validation layer when no line number applies.
    ///
    pub fn origin<C: Into<String>>(&self, context: C) -> Origin {
        Origin::Accession {
            accession: self.identifier().unwrap_or("unknown").to_string(),
            context: Some(context.into()),
        }
    }
}

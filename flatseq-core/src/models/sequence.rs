use std::fmt::{self, Display};
use std::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::location::CompoundLocation;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Topology {
    Linear,
    Circular,
}

impl FromStr for Topology {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "linear" => Ok(Topology::Linear),
            "circular" => Ok(Topology::Circular),
            _ => Err(format!("Invalid topology: {}", s)),
        }
    }
}

impl Display for Topology {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Topology::Linear => write!(f, "linear"),
            Topology::Circular => write!(f, "circular"),
        }
    }
}

///
/// Counts of each base, as written on the EMBL `SQ` line.
///
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct BaseCounts {
    pub a: u64,
    pub c: u64,
    pub g: u64,
    pub t: u64,
    pub other: u64,
}

///
/// The sequence part of an entry: either literal bases, or a contig map
/// assembling the sequence from other accessions and gaps.
///
#[derive(Clone, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Sequence {
    pub version: Option<u32>,
    pub molecule_type: Option<String>,
    pub topology: Option<Topology>,
    pub declared_length: Option<u64>,
    pub bases: Vec<u8>,
    pub contigs: CompoundLocation,
}

impl Sequence {
    ///
    /// Length of the sequence: literal bases when present, otherwise the
    /// contig map, otherwise whatever the header declared.
    ///
    pub fn length(&self) -> u64 {
        if !self.bases.is_empty() {
            self.bases.len() as u64
        } else if !self.contigs.is_empty() {
            self.contigs.length()
        } else {
            self.declared_length.unwrap_or(0)
        }
    }

    /// Append bases, keeping letters only and lower-casing them.
    pub fn push_bases(&mut self, text: &str) {
        self.bases.extend(
            text.bytes()
                .filter(u8::is_ascii_alphabetic)
                .map(|b| b.to_ascii_lowercase()),
        );
    }

    pub fn base_counts(&self) -> BaseCounts {
        let mut counts = BaseCounts::default();
        for base in &self.bases {
            match base.to_ascii_lowercase() {
                b'a' => counts.a += 1,
                b'c' => counts.c += 1,
                b'g' => counts.g += 1,
                b't' => counts.t += 1,
                _ => counts.other += 1,
            }
        }
        counts
    }
}

//! Location algebra for feature footprints.
//!
//! A [`Location`] is one segment on a sequence: a single base, a range, a
//! zero-width junction between two bases, or an assembly gap. Base, range and
//! between segments can point at the current sequence ([`Locus::Local`]) or at
//! another accession ([`Locus::Remote`]), which is how contig/assembly maps
//! refer to their components.
//!
//! Segments are combined into a [`CompoundLocation`], which owns the ordering,
//! the global complement flag and the partiality markers of a feature.
pub mod compound;

pub use self::compound::{CompoundLocation, JoinKind};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Length used for gaps of unknown size, rendered as `gap(unk100)`.
pub const DEFAULT_UNKNOWN_GAP_LENGTH: u64 = 100;

///
/// Where the coordinates of a segment live.
///
#[derive(Clone, Debug, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Locus {
    #[default]
    Local,
    Remote {
        accession: String,
        version: Option<u32>,
    },
}

impl Locus {
    pub fn remote<S: Into<String>>(accession: S, version: Option<u32>) -> Self {
        Locus::Remote {
            accession: accession.into(),
            version,
        }
    }

    pub fn is_remote(&self) -> bool {
        matches!(self, Locus::Remote { .. })
    }
}

///
/// A single segment of a feature or contig footprint.
///
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Location {
    Base {
        position: Option<i64>,
        locus: Locus,
        complement: bool,
    },
    Range {
        begin: Option<i64>,
        end: Option<i64>,
        locus: Locus,
        complement: bool,
    },
    Between {
        begin: Option<i64>,
        end: Option<i64>,
        locus: Locus,
        complement: bool,
    },
    Gap {
        length: u64,
        unknown_length: bool,
    },
}

impl Location {
    pub fn base(position: i64) -> Self {
        Location::Base {
            position: Some(position),
            locus: Locus::Local,
            complement: false,
        }
    }

    pub fn range(begin: i64, end: i64) -> Self {
        Location::Range {
            begin: Some(begin),
            end: Some(end),
            locus: Locus::Local,
            complement: false,
        }
    }

    pub fn between(begin: i64, end: i64) -> Self {
        Location::Between {
            begin: Some(begin),
            end: Some(end),
            locus: Locus::Local,
            complement: false,
        }
    }

    pub fn gap(length: u64) -> Self {
        Location::Gap {
            length,
            unknown_length: false,
        }
    }

    pub fn unknown_gap() -> Self {
        Location::Gap {
            length: DEFAULT_UNKNOWN_GAP_LENGTH,
            unknown_length: true,
        }
    }

    ///
    /// Move this segment onto another sequence. Gaps have no coordinates and
    /// are returned unchanged.
    ///
    pub fn with_locus(mut self, new_locus: Locus) -> Self {
        match &mut self {
            Location::Base { locus, .. }
            | Location::Range { locus, .. }
            | Location::Between { locus, .. } => *locus = new_locus,
            Location::Gap { .. } => {}
        }
        self
    }

    pub fn complemented(mut self) -> Self {
        self.set_complement(true);
        self
    }

    pub fn begin(&self) -> Option<i64> {
        match self {
            Location::Base { position, .. } => *position,
            Location::Range { begin, .. } | Location::Between { begin, .. } => *begin,
            Location::Gap { .. } => None,
        }
    }

    pub fn end(&self) -> Option<i64> {
        match self {
            Location::Base { position, .. } => *position,
            Location::Range { end, .. } | Location::Between { end, .. } => *end,
            Location::Gap { .. } => None,
        }
    }

    pub fn locus(&self) -> Option<&Locus> {
        match self {
            Location::Base { locus, .. }
            | Location::Range { locus, .. }
            | Location::Between { locus, .. } => Some(locus),
            Location::Gap { .. } => None,
        }
    }

    pub fn is_remote(&self) -> bool {
        self.locus().is_some_and(Locus::is_remote)
    }

    pub fn is_gap(&self) -> bool {
        matches!(self, Location::Gap { .. })
    }

    pub fn is_complement(&self) -> bool {
        match self {
            Location::Base { complement, .. }
            | Location::Range { complement, .. }
            | Location::Between { complement, .. } => *complement,
            Location::Gap { .. } => false,
        }
    }

    /// Gaps carry no strand; setting their complement is a no-op.
    pub fn set_complement(&mut self, value: bool) {
        match self {
            Location::Base { complement, .. }
            | Location::Range { complement, .. }
            | Location::Between { complement, .. } => *complement = value,
            Location::Gap { .. } => {}
        }
    }

    ///
    /// Number of bases covered by this segment. Always derived, never stored.
    ///
    pub fn length(&self) -> u64 {
        match self {
            Location::Base { position, .. } => u64::from(position.is_some()),
            Location::Range {
                begin: Some(begin),
                end: Some(end),
                ..
            } if end >= begin => end.abs_diff(*begin).saturating_add(1),
            Location::Range { .. } => 0,
            Location::Between { .. } => 0,
            Location::Gap {
                unknown_length: true,
                ..
            } => DEFAULT_UNKNOWN_GAP_LENGTH,
            Location::Gap { length, .. } => *length,
        }
    }

    /// True when `position` lies in `[begin, end]` of a local segment.
    pub fn covers(&self, position: i64) -> bool {
        if self.is_remote() {
            return false;
        }
        match (self.begin(), self.end()) {
            (Some(begin), Some(end)) => position >= begin && position <= end,
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    #[case(Location::range(1, 10), 10)]
    #[case(Location::range(5, 35), 31)]
    #[case(Location::range(7, 7), 1)]
    #[case(Location::range(10, 1), 0)]
    #[case(Location::base(42), 1)]
    #[case(Location::Base { position: None, locus: Locus::Local, complement: false }, 0)]
    #[case(Location::between(10, 11), 0)]
    #[case(Location::between(10, 500), 0)]
    #[case(Location::gap(24), 24)]
    #[case(Location::unknown_gap(), DEFAULT_UNKNOWN_GAP_LENGTH)]
    #[case(Location::range(0, i64::MAX), 1 << 63)]
    #[case(Location::range(i64::MIN, i64::MAX), u64::MAX)]
    fn test_length(#[case] location: Location, #[case] expected: u64) {
        assert_eq!(location.length(), expected);
    }

    #[rstest]
    fn test_unknown_gap_length_constant() {
        assert_eq!(DEFAULT_UNKNOWN_GAP_LENGTH, 100);
        let gap = Location::Gap {
            length: 7,
            unknown_length: true,
        };
        assert_eq!(gap.length(), 100);
    }

    #[rstest]
    fn test_remote_range_keeps_coordinates() {
        let location = Location::range(1, 100).with_locus(Locus::remote("AB000001", Some(2)));
        assert_eq!(location.is_remote(), true);
        assert_eq!(location.begin(), Some(1));
        assert_eq!(location.end(), Some(100));
        assert_eq!(location.length(), 100);
        assert_eq!(location.covers(50), false);
    }

    #[rstest]
    fn test_gap_ignores_complement_and_locus() {
        let mut gap = Location::gap(10).with_locus(Locus::remote("X", None));
        gap.set_complement(true);
        assert_eq!(gap.is_complement(), false);
        assert_eq!(gap.locus(), None);
        assert_eq!(gap.begin(), None);
    }

    #[rstest]
    fn test_reversed_range_is_stored_as_given() {
        let location = Location::range(35, 5);
        assert_eq!(location.begin(), Some(35));
        assert_eq!(location.end(), Some(5));
    }
}

use super::Location;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

///
/// How the segments of a compound location relate to each other.
///
/// `Join` concatenates segments into one continuous coordinate space
/// (spliced exons); `Order` lists segments that keep their own coordinates.
/// The distinction only changes the notation used when writing.
///
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum JoinKind {
    #[default]
    Join,
    Order,
}

///
/// Ordered collection of segments forming the footprint of a feature,
/// reference or contig map.
///
#[derive(Clone, Debug, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CompoundLocation {
    locations: Vec<Location>,
    pub join_kind: JoinKind,
    pub complement: bool,
    pub left_partial: bool,
    pub right_partial: bool,
}

impl From<Vec<Location>> for CompoundLocation {
    fn from(locations: Vec<Location>) -> Self {
        CompoundLocation {
            locations,
            ..Default::default()
        }
    }
}

impl From<Location> for CompoundLocation {
    fn from(location: Location) -> Self {
        CompoundLocation::from(vec![location])
    }
}

impl CompoundLocation {
    pub fn new(join_kind: JoinKind) -> Self {
        CompoundLocation {
            join_kind,
            ..Default::default()
        }
    }

    pub fn locations(&self) -> &[Location] {
        &self.locations
    }

    pub fn locations_mut(&mut self) -> &mut Vec<Location> {
        &mut self.locations
    }

    pub fn add_location(&mut self, location: Location) {
        self.locations.push(location);
    }

    pub fn remove_location(&mut self, index: usize) -> Option<Location> {
        if index < self.locations.len() {
            Some(self.locations.remove(index))
        } else {
            None
        }
    }

    pub fn len(&self) -> usize {
        self.locations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locations.is_empty()
    }

    pub fn has_remote(&self) -> bool {
        self.locations.iter().any(Location::is_remote)
    }

    pub fn set_complement(&mut self, complement: bool) {
        self.complement = complement;
    }

    pub fn set_left_partial(&mut self, partial: bool) {
        self.left_partial = partial;
    }

    pub fn set_right_partial(&mut self, partial: bool) {
        self.right_partial = partial;
    }

    ///
    /// Total number of bases covered, the sum of the segment lengths.
    /// Saturates at `u64::MAX`.
    ///
    pub fn length(&self) -> u64 {
        self.locations
            .iter()
            .map(Location::length)
            .fold(0, u64::saturating_add)
    }

    fn local_positions(&self) -> impl Iterator<Item = i64> + '_ {
        self.locations
            .iter()
            .filter(|location| !location.is_remote())
            .flat_map(|location| [location.begin(), location.end()])
            .flatten()
    }

    ///
    /// Smallest begin/end over the local segments. Remote coordinates belong
    /// to another sequence and are ignored.
    ///
    pub fn min_position(&self) -> Option<i64> {
        self.local_positions().min()
    }

    pub fn max_position(&self) -> Option<i64> {
        self.local_positions().max()
    }

    /// First relative coordinate of every segment, in stored order.
    fn offsets(&self) -> Vec<u64> {
        let mut offset: u64 = 1;
        self.locations
            .iter()
            .map(|location| {
                let current = offset;
                offset = offset.saturating_add(location.length());
                current
            })
            .collect()
    }

    fn project(&self, index: usize, offset: u64, absolute: i64) -> Option<u64> {
        let location = &self.locations[index];
        let (begin, end) = (location.begin()?, location.end()?);
        let within = if location.is_complement() {
            end.checked_sub(absolute)?
        } else {
            absolute.checked_sub(begin)?
        };
        if within < 0 {
            return None;
        }
        let relative = offset.checked_add(within as u64)?;
        if self.complement {
            self.length().checked_add(1)?.checked_sub(relative)
        } else {
            Some(relative)
        }
    }

    ///
    /// Project an absolute sequence coordinate onto the 1-based coordinate
    /// space of this compound.
    ///
    /// Segments are walked in stored order; the first local segment covering
    /// `absolute` wins. Within a segment the walk runs from `begin` unless the
    /// segment is complemented, in which case it runs from `end`. A
    /// complemented compound mirrors the result across its total length.
    ///
    /// Returns `None` when no local segment covers the position.
    ///
    pub fn relative_position(&self, absolute: i64) -> Option<u64> {
        let offsets = self.offsets();
        self.locations
            .iter()
            .enumerate()
            .find(|(_, location)| location.covers(absolute))
            .and_then(|(index, _)| self.project(index, offsets[index], absolute))
    }

    /// Relative coordinate of the begin position of the segment at `index`.
    pub fn relative_begin_position(&self, index: usize) -> Option<u64> {
        let location = self.locations.get(index)?;
        let offsets = self.offsets();
        self.project(index, offsets[index], location.begin()?)
    }

    /// Relative coordinate of the end position of the segment at `index`.
    pub fn relative_end_position(&self, index: usize) -> Option<u64> {
        let location = self.locations.get(index)?;
        let offsets = self.offsets();
        self.project(index, offsets[index], location.end()?)
    }
}

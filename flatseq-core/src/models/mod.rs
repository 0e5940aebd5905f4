pub mod entry;
pub mod feature;
pub mod reference;
pub mod sequence;

// re-export for cleaner imports
pub use self::entry::{Entry, Organism, XRef};
pub use self::feature::{Feature, Qualifier};
pub use self::reference::{Author, Publication, PublicationKind, Reference};
pub use self::sequence::{BaseCounts, Sequence, Topology};

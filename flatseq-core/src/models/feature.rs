use std::cmp::Ordering;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::location::CompoundLocation;

pub const SOURCE_FEATURE: &str = "source";

/// Qualifiers whose values are written without surrounding quotes.
const UNQUOTED_QUALIFIERS: &[&str] = &[
    "anticodon",
    "citation",
    "codon_start",
    "compare",
    "direction",
    "estimated_length",
    "mod_base",
    "number",
    "rpt_type",
    "rpt_unit_range",
    "tag_peptide",
    "transl_except",
    "transl_table",
];

///
/// A `/name=value` annotation attached to a feature.
///
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Qualifier {
    pub name: String,
    pub value: Option<String>,
}

impl Qualifier {
    pub fn new<N: Into<String>, V: Into<String>>(name: N, value: V) -> Self {
        Qualifier {
            name: name.into(),
            value: Some(value.into()),
        }
    }

    /// A qualifier without value, such as `/pseudo`.
    pub fn flag<N: Into<String>>(name: N) -> Self {
        Qualifier {
            name: name.into(),
            value: None,
        }
    }

    pub fn is_quoted(&self) -> bool {
        !UNQUOTED_QUALIFIERS.contains(&self.name.as_str())
    }
}

///
/// An annotated region of a sequence.
///
#[derive(Clone, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Feature {
    pub name: String,
    pub location: CompoundLocation,
    pub qualifiers: Vec<Qualifier>,
}

impl Feature {
    pub fn new<S: Into<String>>(name: S, location: CompoundLocation) -> Self {
        Feature {
            name: name.into(),
            location,
            qualifiers: Vec::new(),
        }
    }

    pub fn is_source(&self) -> bool {
        self.name == SOURCE_FEATURE
    }

    pub fn add_qualifier(&mut self, qualifier: Qualifier) {
        self.qualifiers.push(qualifier);
    }

    /// First qualifier with the given name.
    pub fn qualifier(&self, name: &str) -> Option<&Qualifier> {
        self.qualifiers.iter().find(|q| q.name == name)
    }

    pub fn qualifiers_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Qualifier> {
        self.qualifiers.iter().filter(move |q| q.name == name)
    }

    /// Remove every qualifier with the given name, returning how many went.
    pub fn remove_qualifiers(&mut self, name: &str) -> usize {
        let before = self.qualifiers.len();
        self.qualifiers.retain(|q| q.name != name);
        before - self.qualifiers.len()
    }

    ///
    /// Output order of features: `source` first, then ascending minimum
    /// position, then descending maximum position.
    ///
    pub fn output_order(&self, other: &Feature) -> Ordering {
        other
            .is_source()
            .cmp(&self.is_source())
            .then_with(|| self.location.min_position().cmp(&other.location.min_position()))
            .then_with(|| other.location.max_position().cmp(&self.location.max_position()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::location::Location;

    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn feature(name: &str, begin: i64, end: i64) -> Feature {
        Feature::new(name, CompoundLocation::from(Location::range(begin, end)))
    }

    #[rstest]
    fn test_output_order() {
        let mut features = vec![
            feature("CDS", 10, 50),
            feature("gene", 10, 90),
            feature("misc_feature", 1, 5),
            feature("source", 1, 100),
        ];
        features.sort_by(|a, b| a.output_order(b));
        let names: Vec<&str> = features.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["source", "misc_feature", "gene", "CDS"]);
    }

    #[rstest]
    fn test_qualifier_lookup() {
        let mut cds = feature("CDS", 1, 30);
        cds.add_qualifier(Qualifier::new("gene", "abc"));
        cds.add_qualifier(Qualifier::new("note", "first"));
        cds.add_qualifier(Qualifier::new("note", "second"));
        cds.add_qualifier(Qualifier::flag("pseudo"));

        assert_eq!(cds.qualifier("gene").and_then(|q| q.value.as_deref()), Some("abc"));
        assert_eq!(cds.qualifiers_named("note").count(), 2);
        assert_eq!(cds.remove_qualifiers("note"), 2);
        assert_eq!(cds.qualifiers.len(), 2);
    }

    #[rstest]
    #[case("codon_start", false)]
    #[case("transl_table", false)]
    #[case("gene", true)]
    #[case("translation", true)]
    fn test_quoting(#[case] name: &str, #[case] quoted: bool) {
        assert_eq!(Qualifier::new(name, "1").is_quoted(), quoted);
    }
}

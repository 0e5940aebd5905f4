use flatseq_core::models::Organism;
use once_cell::sync::Lazy;

use crate::reader::block::{Block, EntryState};
use crate::reader::matcher::Matcher;
use crate::utils::split_list;

/// `Scientific name (common name)`, shared with the GenBank `SOURCE` line.
pub(crate) static SPECIES: Lazy<Matcher> = Lazy::new(|| Matcher::new(r"^(.*?)\s*(?:\(([^()]*)\))?$"));

pub(crate) fn organism(state: &mut EntryState) -> &mut Organism {
    state.entry.organism.get_or_insert_with(Organism::default)
}

pub fn read_species(block: &Block, state: &mut EntryState) {
    let Some(matched) = SPECIES.captures(&block.text) else {
        state.invalid_line(block);
        return;
    };
    let organism = organism(state);
    organism.scientific_name = matched.string(1).unwrap_or_default();
    organism.common_name = matched.string(2);
}

pub fn read_classification(block: &Block, state: &mut EntryState) {
    organism(state).lineage.extend(split_list(&block.text, ';'));
}

pub fn read_organelle(block: &Block, state: &mut EntryState) {
    if !block.text.is_empty() {
        organism(state).organelle = Some(block.text.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use flatseq_core::Origin;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn block(text: &str) -> Block {
        Block {
            tag: "OS".to_string(),
            lines: vec![],
            text: text.to_string(),
            origin: Origin::line(7),
        }
    }

    #[rstest]
    #[case("Trifolium repens (white clover)", "Trifolium repens", Some("white clover"))]
    #[case("Homo sapiens", "Homo sapiens", None)]
    fn test_species(#[case] text: &str, #[case] scientific: &str, #[case] common: Option<&str>) {
        let mut state = EntryState::new();
        read_species(&block(text), &mut state);
        let organism = state.entry.organism.unwrap();
        assert_eq!(organism.scientific_name, scientific);
        assert_eq!(organism.common_name.as_deref(), common);
    }

    #[rstest]
    fn test_classification_spans_blocks() {
        let mut state = EntryState::new();
        read_classification(&block("Eukaryota; Viridiplantae; Streptophyta;"), &mut state);
        read_classification(&block("Trifolium."), &mut state);
        read_organelle(&block("plastid:chloroplast"), &mut state);
        let organism = state.entry.organism.unwrap();
        assert_eq!(
            organism.lineage,
            vec!["Eukaryota", "Viridiplantae", "Streptophyta", "Trifolium"]
        );
        assert_eq!(organism.organelle.as_deref(), Some("plastid:chloroplast"));
    }
}

use flatseq_core::location::CompoundLocation;
use flatseq_core::models::{Feature, Qualifier};
use flatseq_core::validation::messages;
use flatseq_core::{Origin, ValidationMessage};
use once_cell::sync::Lazy;

use crate::reader::block::{Block, BlockReader, BlockShape, EntryState};
use crate::reader::line_reader::line_content;
use crate::reader::location::parse_location;
use crate::reader::matcher::Matcher;
use crate::utils::unquote;

/// Columns before the feature key on every feature-table line.
pub const FEATURE_PREFIX_WIDTH: usize = 5;
/// Width of the key column; the location starts right after it.
pub const FEATURE_KEY_WIDTH: usize = 16;

/// Qualifiers whose wrapped values are rejoined without spaces.
pub const NO_SPACE_QUALIFIERS: &[&str] = &["translation"];

static QUALIFIER: Lazy<Matcher> = Lazy::new(|| Matcher::new(r#"^/([A-Za-z0-9_'*-]+)(?:=(.*))?$"#));

///
/// Reader for one feature of a feature table. EMBL (`FT`) and GenBank share
/// the same column layout once the five-column line prefix is removed:
/// the key in 16 columns, then the location, then `/qualifier` lines.
///
pub struct FeatureReader(pub &'static str);

impl BlockReader for FeatureReader {
    fn tag(&self) -> &'static str {
        self.0
    }

    fn shape(&self) -> BlockShape {
        BlockShape::Feature
    }

    fn read(&self, block: &Block, state: &mut EntryState) {
        let first_line = block.first_line();
        let bodies: Vec<&str> = block
            .lines
            .iter()
            .map(|line| line_content(line, FEATURE_PREFIX_WIDTH))
            .collect();
        let Some(head) = bodies.first() else {
            return;
        };

        let location_column = line_content(head, FEATURE_KEY_WIDTH);
        let key = head[..head.len() - location_column.len()].trim();
        if key.is_empty() {
            state.invalid_line(block);
            return;
        }

        let mut location_text = location_column.trim().to_string();
        let mut index = 1;
        while index < bodies.len() {
            let content = value_column(bodies[index]);
            if content.starts_with('/') {
                break;
            }
            location_text.push_str(content);
            index += 1;
        }

        let location = match parse_location(&location_text) {
            Ok(location) => location,
            Err(e) => {
                state.report(
                    ValidationMessage::error(messages::INVALID_LOCATION, block.origin.clone())
                        .param(&location_text)
                        .param(e),
                );
                CompoundLocation::default()
            }
        };
        let mut feature = Feature::new(key, location);

        // (line offset, accumulated text)
        let mut pending: Option<(usize, String)> = None;
        for (offset, body) in bodies.iter().enumerate().skip(index) {
            let content = value_column(body);
            let continues = match &pending {
                Some((_, text)) => !content.starts_with('/') || inside_quotes(text),
                None => false,
            };
            if continues {
                if let Some((_, text)) = pending.as_mut() {
                    let separator = if joins_without_space(text) { "" } else { " " };
                    text.push_str(separator);
                    text.push_str(content);
                }
                continue;
            }
            if let Some((line, text)) = pending.take() {
                read_qualifier(&mut feature, &text, Origin::line(first_line + line), state);
            }
            pending = Some((offset, content.to_string()));
        }
        if let Some((line, text)) = pending {
            read_qualifier(&mut feature, &text, Origin::line(first_line + line), state);
        }

        state.entry.add_feature(feature);
    }
}

fn value_column(body: &str) -> &str {
    line_content(body, FEATURE_KEY_WIDTH).trim()
}

/// An odd number of quotes after `=` means a quoted value is still open.
fn inside_quotes(text: &str) -> bool {
    match text.split_once('=') {
        Some((_, value)) => value.starts_with('"') && value.matches('"').count() % 2 == 1,
        None => false,
    }
}

fn joins_without_space(text: &str) -> bool {
    let name = text.trim_start_matches('/').split('=').next().unwrap_or("");
    NO_SPACE_QUALIFIERS.contains(&name)
}

fn read_qualifier(feature: &mut Feature, text: &str, origin: Origin, state: &mut EntryState) {
    let Some(matched) = QUALIFIER.captures(text) else {
        state.report(ValidationMessage::error(messages::INVALID_QUALIFIER, origin).param(text));
        return;
    };
    let name = matched.raw(1).unwrap_or_default();
    let qualifier = match matched.raw(2) {
        None => Qualifier::flag(name),
        Some(value) => {
            let value = value.trim();
            if value.starts_with('"') && (value.len() < 2 || !value.ends_with('"')) {
                state.report(ValidationMessage::error(messages::INVALID_QUALIFIER, origin).param(text));
                return;
            }
            Qualifier::new(name, unquote(value))
        }
    };
    feature.add_qualifier(qualifier);
}

#[cfg(test)]
mod tests {
    use super::*;

    use flatseq_core::location::Location;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn block(lines: &[&str]) -> Block {
        Block {
            tag: "FT".to_string(),
            lines: lines.iter().map(|l| l.to_string()).collect(),
            text: String::new(),
            origin: Origin::lines(10, 10 + lines.len() - 1),
        }
    }

    #[rstest]
    fn test_embl_feature() {
        let mut state = EntryState::new();
        FeatureReader("FT").read(
            &block(&[
                "FT   CDS             join(14..100,",
                "FT                   200..>300)",
                "FT                   /product=\"beta-glucosidase \"\"A\"\"",
                "FT                   precursor\"",
                "FT                   /codon_start=1",
                "FT                   /pseudo",
                "FT                   /translation=\"MDFLLA",
                "FT                   LLSHG\"",
            ]),
            &mut state,
        );

        assert_eq!(state.result.is_empty(), true);
        let feature = &state.entry.features[0];
        assert_eq!(feature.name, "CDS");
        assert_eq!(
            feature.location.locations(),
            &[Location::range(14, 100), Location::range(200, 300)]
        );
        assert_eq!(feature.location.right_partial, true);
        assert_eq!(
            feature.qualifiers,
            vec![
                Qualifier::new("product", "beta-glucosidase \"A\" precursor"),
                Qualifier::new("codon_start", "1"),
                Qualifier::flag("pseudo"),
                Qualifier::new("translation", "MDFLLALLSHG"),
            ]
        );
    }

    #[rstest]
    fn test_quoted_slash_continuation() {
        let mut state = EntryState::new();
        FeatureReader("FEATURE").read(
            &block(&[
                "     misc_feature    1..10",
                "                     /note=\"see",
                "                     /dev/null for details\"",
            ]),
            &mut state,
        );
        assert_eq!(
            state.entry.features[0].qualifier("note").and_then(|q| q.value.clone()),
            Some("see /dev/null for details".to_string())
        );
    }

    #[rstest]
    fn test_bad_location_and_qualifier_are_reported() {
        let mut state = EntryState::new();
        FeatureReader("FT").read(
            &block(&[
                "FT   gene            join(1..5,",
                "FT                   <9..10)",
                "FT                   /gene=\"abc",
            ]),
            &mut state,
        );
        assert_eq!(state.result.messages_with_key(messages::INVALID_LOCATION).count(), 1);
        let invalid: Vec<_> = state.result.messages_with_key(messages::INVALID_QUALIFIER).collect();
        assert_eq!(invalid.len(), 1);
        assert_eq!(invalid[0].origins, vec![Origin::line(12)]);
        assert_eq!(state.entry.features.len(), 1);
        assert_eq!(state.entry.features[0].location.is_empty(), true);
    }

    #[rstest]
    fn test_multibyte_value_column_keeps_text() {
        let mut state = EntryState::new();
        FeatureReader("FT").read(
            &block(&[
                "FT   CDS             1..10",
                "FT                   /translation=\"MDF",
                "FT                  éLLA\"",
            ]),
            &mut state,
        );
        assert_eq!(
            state.entry.features[0].qualifier("translation").and_then(|q| q.value.clone()),
            Some("MDFéLLA".to_string())
        );
    }
}

use std::io::Write;

use flatseq_core::models::{Feature, Qualifier};

use crate::error::Result;
use crate::reader::feature::{FEATURE_KEY_WIDTH, NO_SPACE_QUALIFIERS};
use crate::utils::quote;
use crate::writer::block::{BlockWriter, WrapChar};
use crate::writer::location::render_compound_location;

/// `/name`, `/name=value` or `/name="value"` depending on the qualifier.
pub fn qualifier_text(qualifier: &Qualifier) -> String {
    match &qualifier.value {
        None => format!("/{}", qualifier.name),
        Some(value) if qualifier.is_quoted() => format!("/{}={}", qualifier.name, quote(value)),
        Some(value) => format!("/{}={}", qualifier.name, value),
    }
}

///
/// Writes feature-table lines: the key after `prefix`, the location from
/// column 22 wrapped after commas, then one block per qualifier.
///
pub struct FeatureWriter<'a> {
    prefix: &'a str,
    padding: &'a str,
}

impl<'a> FeatureWriter<'a> {
    /// `prefix` is the five columns before the key, `padding` the 21 columns
    /// before continued content.
    pub fn new(prefix: &'a str, padding: &'a str) -> Self {
        FeatureWriter { prefix, padding }
    }

    pub fn write(&self, out: &mut dyn Write, feature: &Feature) -> Result<()> {
        let key = format!("{}{:<width$}", self.prefix, feature.name, width = FEATURE_KEY_WIDTH);
        let location = render_compound_location(&feature.location);
        let written = BlockWriter::new(&key, self.padding)
            .wrap_char(WrapChar::Comma)
            .write(out, &location)?;
        if !written {
            writeln!(out, "{}", key.trim_end())?;
        }

        for qualifier in &feature.qualifiers {
            let wrap_char = match NO_SPACE_QUALIFIERS.contains(&qualifier.name.as_str()) {
                true => WrapChar::None,
                false => WrapChar::Space,
            };
            BlockWriter::new(self.padding, self.padding)
                .wrap_char(wrap_char)
                .write(out, &qualifier_text(qualifier))?;
        }
        Ok(())
    }
}

//! Structured messages reported while reading and checking entries.
//!
//! Every message carries a stable key (see [`messages`]), a [`Severity`],
//! positional parameters and the [`Origin`]s it is attributed to, so callers
//! can count and filter messages without parsing free text.
use std::collections::HashMap;
use std::fmt::{self, Display};

use once_cell::sync::Lazy;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Severity {
    Error,
    Warning,
    Fix,
    Info,
}

impl Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Severity::Error => "ERROR",
            Severity::Warning => "WARNING",
            Severity::Fix => "FIX",
            Severity::Info => "INFO",
        };
        write!(f, "{}", label)
    }
}

///
/// Where a message comes from: a span of input lines, or an accession with
/// optional context for messages synthesised after parsing.
///
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Origin {
    FlatFile { first_line: usize, last_line: usize },
    Accession { accession: String, context: Option<String> },
}

impl Origin {
    pub fn line(line: usize) -> Self {
        Origin::FlatFile {
            first_line: line,
            last_line: line,
        }
    }

    pub fn lines(first_line: usize, last_line: usize) -> Self {
        Origin::FlatFile {
            first_line,
            last_line,
        }
    }

    pub fn first_line(&self) -> Option<usize> {
        match self {
            Origin::FlatFile { first_line, .. } => Some(*first_line),
            Origin::Accession { .. } => None,
        }
    }
}

impl Display for Origin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Origin::FlatFile {
                first_line,
                last_line,
            } if first_line == last_line => write!(f, "line {}", first_line),
            Origin::FlatFile {
                first_line,
                last_line,
            } => write!(f, "lines {}-{}", first_line, last_line),
            Origin::Accession {
                accession,
                context: Some(context),
            } => write!(f, "{} ({})", accession, context),
            Origin::Accession { accession, .. } => write!(f, "{}", accession),
        }
    }
}

/// Message keys and their templates. `{0}`, `{1}`... are positional params.
pub mod messages {
    pub const UNKNOWN_TAG: &str = "FlatFile.UnknownTag";
    pub const UNEXPECTED_LINE: &str = "FlatFile.UnexpectedLine";
    pub const MISSING_TERMINATOR: &str = "FlatFile.MissingTerminator";
    pub const INVALID_LINE: &str = "FlatFile.InvalidLine";
    pub const INVALID_DATE: &str = "FlatFile.InvalidDate";
    pub const INVALID_LOCATION: &str = "FlatFile.InvalidLocation";
    pub const INVALID_QUALIFIER: &str = "FlatFile.InvalidQualifier";
    pub const MISSING_REFERENCE_NUMBER: &str = "FlatFile.MissingReferenceNumber";
    pub const SEQUENCE_LENGTH_MISMATCH: &str = "FlatFile.SequenceLengthMismatch";
    pub const INVALID_SEQUENCE: &str = "FlatFile.InvalidSequence";
    pub const AGP_INVALID_LINE: &str = "Agp.InvalidLine";
    pub const AGP_INVALID_COMPONENT_TYPE: &str = "Agp.InvalidComponentType";
    pub const AGP_NON_CONTIGUOUS_OBJECT: &str = "Agp.NonContiguousObject";
    pub const AGP_COMPONENT_LENGTH_MISMATCH: &str = "Agp.ComponentLengthMismatch";
    pub const FASTA_MISSING_HEADER: &str = "Fasta.MissingHeader";

    pub(super) const TEMPLATES: &[(&str, &str)] = &[
        (UNKNOWN_TAG, "Unknown line tag \"{0}\" ignored."),
        (UNEXPECTED_LINE, "Continuation line without a preceding tag ignored."),
        (MISSING_TERMINATOR, "Entry is not terminated by \"//\"."),
        (INVALID_LINE, "Invalid \"{0}\" line: {1}"),
        (INVALID_DATE, "Invalid date \"{0}\"."),
        (INVALID_LOCATION, "Invalid location \"{0}\": {1}"),
        (INVALID_QUALIFIER, "Invalid qualifier \"{0}\"."),
        (MISSING_REFERENCE_NUMBER, "Reference line \"{0}\" appears before any reference number."),
        (SEQUENCE_LENGTH_MISMATCH, "Declared sequence length {0} differs from actual length {1}."),
        (INVALID_SEQUENCE, "Invalid sequence line: {0}"),
        (AGP_INVALID_LINE, "Invalid AGP line: {0}"),
        (AGP_INVALID_COMPONENT_TYPE, "Invalid AGP component type \"{0}\"."),
        (AGP_NON_CONTIGUOUS_OBJECT, "Object \"{0}\" begins at {1} but the previous part ended at {2}."),
        (AGP_COMPONENT_LENGTH_MISMATCH, "Object span {0} differs from component span {1}."),
        (FASTA_MISSING_HEADER, "Sequence data appears before any \">\" header."),
    ];
}

static TEMPLATES: Lazy<HashMap<&'static str, &'static str>> =
    Lazy::new(|| messages::TEMPLATES.iter().copied().collect());

/// Template registered for `key`, if any.
pub fn message_template(key: &str) -> Option<&'static str> {
    TEMPLATES.get(key).copied()
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ValidationMessage {
    pub key: String,
    pub severity: Severity,
    pub params: Vec<String>,
    pub origins: Vec<Origin>,
}

impl ValidationMessage {
    pub fn new<K: Into<String>>(severity: Severity, key: K, origin: Origin) -> Self {
        ValidationMessage {
            key: key.into(),
            severity,
            params: Vec::new(),
            origins: vec![origin],
        }
    }

    pub fn error<K: Into<String>>(key: K, origin: Origin) -> Self {
        ValidationMessage::new(Severity::Error, key, origin)
    }

    pub fn warning<K: Into<String>>(key: K, origin: Origin) -> Self {
        ValidationMessage::new(Severity::Warning, key, origin)
    }

    pub fn param<P: ToString>(mut self, param: P) -> Self {
        self.params.push(param.to_string());
        self
    }

    ///
    /// Render the message text from the registered template. Keys without a
    /// template render as the key followed by the params.
    ///
    pub fn message(&self) -> String {
        match message_template(&self.key) {
            Some(template) => self
                .params
                .iter()
                .enumerate()
                .fold(template.to_string(), |text, (i, param)| {
                    text.replace(&format!("{{{}}}", i), param)
                }),
            None if self.params.is_empty() => self.key.clone(),
            None => format!("{} {}", self.key, self.params.join(" ")),
        }
    }
}

impl Display for ValidationMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let origins: Vec<String> = self.origins.iter().map(ToString::to_string).collect();
        write!(
            f,
            "{} {} [{}] {}",
            self.severity,
            self.key,
            origins.join(", "),
            self.message()
        )
    }
}

///
/// All messages collected for one record.
///
#[derive(Clone, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ValidationResult {
    messages: Vec<ValidationMessage>,
}

impl ValidationResult {
    pub fn new() -> Self {
        ValidationResult::default()
    }

    pub fn append(&mut self, message: ValidationMessage) {
        self.messages.push(message);
    }

    pub fn extend(&mut self, other: ValidationResult) {
        self.messages.extend(other.messages);
    }

    /// True when no message of severity [`Severity::Error`] was recorded.
    pub fn is_valid(&self) -> bool {
        !self.messages.iter().any(|m| m.severity == Severity::Error)
    }

    pub fn count(&self, severity: Severity) -> usize {
        self.messages.iter().filter(|m| m.severity == severity).count()
    }

    pub fn messages(&self) -> &[ValidationMessage] {
        &self.messages
    }

    pub fn messages_with_key<'a>(
        &'a self,
        key: &'a str,
    ) -> impl Iterator<Item = &'a ValidationMessage> {
        self.messages.iter().filter(move |m| m.key == key)
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

impl IntoIterator for ValidationResult {
    type Item = ValidationMessage;
    type IntoIter = std::vec::IntoIter<ValidationMessage>;

    fn into_iter(self) -> Self::IntoIter {
        self.messages.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    fn test_message_rendering() {
        let message = ValidationMessage::error(messages::INVALID_LINE, Origin::line(12))
            .param("DT")
            .param("12-XXX-1999");
        assert_eq!(message.message(), "Invalid \"DT\" line: 12-XXX-1999");
        assert_eq!(
            message.to_string(),
            "ERROR FlatFile.InvalidLine [line 12] Invalid \"DT\" line: 12-XXX-1999"
        );
    }

    #[rstest]
    fn test_unregistered_key_renders_key() {
        let message = ValidationMessage::warning("Custom.Rule", Origin::lines(3, 5)).param("x");
        assert_eq!(message.message(), "Custom.Rule x");
        assert_eq!(message.origins[0].to_string(), "lines 3-5");
    }

    #[rstest]
    fn test_every_key_has_template() {
        for (key, _) in messages::TEMPLATES {
            assert_eq!(message_template(key).is_some(), true);
        }
    }

    #[rstest]
    fn test_result_counts() {
        let mut result = ValidationResult::new();
        assert_eq!(result.is_valid(), true);
        result.append(ValidationMessage::warning(messages::UNKNOWN_TAG, Origin::line(1)));
        assert_eq!(result.is_valid(), true);
        result.append(ValidationMessage::error(messages::INVALID_DATE, Origin::line(2)));
        assert_eq!(result.is_valid(), false);
        assert_eq!(result.count(Severity::Error), 1);
        assert_eq!(result.count(Severity::Warning), 1);
        assert_eq!(result.messages_with_key(messages::INVALID_DATE).count(), 1);
    }
}

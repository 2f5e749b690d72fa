//! Codec for the orchestrator-facing volume identifiers and the labels given
//! to cloned volumes.
//!
//! Linode volume ids are plain integers, while the orchestrator stores a
//! composite `"<id>-<label>"` string in persisted volume records. Labels are
//! capped at 32 characters by Linode, so generated labels reserve a fixed
//! trailing window for their random token and only ever shorten the prefix.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;
use uuid::Uuid;

/// Separator between the provider id and the label segment.
pub const ID_SEPARATOR: char = '-';

/// Maximum label length accepted by Linode for volumes.
pub const MAX_LABEL_LEN: usize = 32;

/// Number of hex characters of the random token kept in every label.
pub const LABEL_TOKEN_LEN: usize = 20;

const MAX_PREFIX_LEN: usize = MAX_LABEL_LEN - LABEL_TOKEN_LEN - 1;

/// Errors raised while decoding identifiers.
#[derive(Clone, Debug, Error, Eq, PartialEq)]
pub enum IdentifierError {
    /// Raised when an identifier cannot be decoded into a provider id.
    #[error("malformed volume identifier '{value}': {reason}")]
    MalformedIdentifier {
        /// Identifier as received from the orchestrator.
        value: String,
        /// Why decoding failed.
        reason: String,
    },
}

impl IdentifierError {
    fn malformed(value: &str, reason: &str) -> Self {
        Self::MalformedIdentifier {
            value: value.to_owned(),
            reason: reason.to_owned(),
        }
    }
}

/// Composite identifier pairing a Linode volume id with an opaque label.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct VolumeIdentifier {
    provider_id: u64,
    label: String,
}

impl VolumeIdentifier {
    /// Creates an identifier from its parts.
    #[must_use]
    pub fn new(provider_id: u64, label: impl Into<String>) -> Self {
        Self {
            provider_id,
            label: label.into(),
        }
    }

    /// Linode volume id carried by the identifier.
    #[must_use]
    pub const fn provider_id(&self) -> u64 {
        self.provider_id
    }

    /// Label segment, passed through unchanged.
    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }
}

impl FromStr for VolumeIdentifier {
    type Err = IdentifierError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        decode(value)
    }
}

impl fmt::Display for VolumeIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{ID_SEPARATOR}{}", self.provider_id, self.label)
    }
}

/// Decodes a composite `"<id>-<label>"` identifier.
///
/// Only the first separator is significant; the label keeps any further
/// separators.
///
/// # Errors
///
/// Returns [`IdentifierError::MalformedIdentifier`] when the separator is
/// missing or the numeric segment is not a non-negative integer.
pub fn decode(value: &str) -> Result<VolumeIdentifier, IdentifierError> {
    let Some((numeric, label)) = value.split_once(ID_SEPARATOR) else {
        return Err(IdentifierError::malformed(value, "missing separator"));
    };
    let provider_id = parse_digits(numeric).ok_or_else(|| {
        IdentifierError::malformed(value, "numeric segment is not a non-negative integer")
    })?;
    Ok(VolumeIdentifier::new(provider_id, label))
}

/// Parses a bare provider volume id with no label segment.
///
/// # Errors
///
/// Returns [`IdentifierError::MalformedIdentifier`] when `value` is not a
/// non-negative integer.
pub fn parse_provider_id(value: &str) -> Result<u64, IdentifierError> {
    parse_digits(value)
        .ok_or_else(|| IdentifierError::malformed(value, "not a non-negative integer"))
}

/// Resolves either a bare provider id or a composite identifier.
///
/// Snapshot ids are handed out bare, while volume handles are composite;
/// deletion accepts both.
///
/// # Errors
///
/// Returns [`IdentifierError::MalformedIdentifier`] when neither form
/// decodes.
pub fn resolve_provider_id(value: &str) -> Result<u64, IdentifierError> {
    if value.contains(ID_SEPARATOR) {
        decode(value).map(|identifier| identifier.provider_id())
    } else {
        parse_provider_id(value)
    }
}

// `u64::from_str` accepts a leading `+`, which is not part of the format.
fn parse_digits(value: &str) -> Option<u64> {
    if value.is_empty() || !value.bytes().all(|byte| byte.is_ascii_digit()) {
        return None;
    }
    value.parse().ok()
}

/// Generates a unique volume label of at most [`MAX_LABEL_LEN`] characters.
///
/// The prefix is reduced to ASCII alphanumerics, `-` and `_`, then
/// shortened until `<prefix>-<token>` fits. The token is never cut.
#[must_use]
pub fn generate_label(prefix: &str) -> String {
    let token = label_token();
    let head: String = prefix
        .chars()
        .filter(|ch| ch.is_ascii_alphanumeric() || matches!(ch, '-' | '_'))
        .take(MAX_PREFIX_LEN)
        .collect();
    if head.is_empty() {
        return token;
    }
    format!("{head}{ID_SEPARATOR}{token}")
}

fn label_token() -> String {
    let encoded = Uuid::new_v4().simple().to_string();
    let skip = encoded.len().saturating_sub(LABEL_TOKEN_LEN);
    encoded.chars().skip(skip).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("42-pvcabc", 42, "pvcabc")]
    #[case("0-x", 0, "x")]
    #[case("7-", 7, "")]
    #[case("123-pvc-1a2b-3c4d", 123, "pvc-1a2b-3c4d")]
    fn decode_splits_on_first_separator(
        #[case] input: &str,
        #[case] provider_id: u64,
        #[case] label: &str,
    ) {
        let decoded = decode(input).expect("identifier should decode");
        assert_eq!(decoded.provider_id(), provider_id);
        assert_eq!(decoded.label(), label);
    }

    #[rstest]
    #[case("42")]
    #[case("")]
    #[case("abc-label")]
    #[case("-label")]
    #[case("+4-label")]
    #[case("-4-label")]
    #[case("4.2-label")]
    #[case("99999999999999999999999-label")]
    fn decode_rejects_malformed_input(#[case] input: &str) {
        let err = decode(input).expect_err("identifier should be rejected");
        assert!(matches!(
            err,
            IdentifierError::MalformedIdentifier { ref value, .. } if value == input
        ));
    }

    #[rstest]
    fn display_reverses_decode() {
        let identifier = VolumeIdentifier::new(7, "pvc-x");
        assert_eq!(identifier.to_string(), "7-pvc-x");
        assert_eq!("7-pvc-x".parse::<VolumeIdentifier>(), Ok(identifier));
    }

    #[rstest]
    #[case("42", Some(42))]
    #[case("42-pvc", None)]
    #[case(" 42", None)]
    #[case("", None)]
    fn parse_provider_id_accepts_bare_digits(#[case] input: &str, #[case] expected: Option<u64>) {
        assert_eq!(parse_provider_id(input).ok(), expected);
    }

    #[rstest]
    #[case("99", Some(99))]
    #[case("42-pvcabc", Some(42))]
    #[case("pvc-42", None)]
    #[case("snap", None)]
    fn resolve_provider_id_accepts_both_forms(
        #[case] input: &str,
        #[case] expected: Option<u64>,
    ) {
        assert_eq!(resolve_provider_id(input).ok(), expected);
    }

    #[rstest]
    #[case("")]
    #[case("vol")]
    #[case("restore-42")]
    #[case("vol42-pvc-0b6f1a8e-1d2c-4c3b-9a8e-7f6d5c4b3a21")]
    fn generated_labels_fit_and_keep_the_full_token(#[case] prefix: &str) {
        let label = generate_label(prefix);
        assert!(label.len() <= MAX_LABEL_LEN, "label too long: {label}");
        let token: String = label
            .chars()
            .rev()
            .take(LABEL_TOKEN_LEN)
            .collect::<Vec<_>>()
            .into_iter()
            .rev()
            .collect();
        assert_eq!(token.len(), LABEL_TOKEN_LEN);
        assert!(token.chars().all(|ch| ch.is_ascii_hexdigit()), "{label}");
    }

    #[rstest]
    fn generated_labels_keep_a_short_prefix_intact() {
        let label = generate_label("restore-42");
        assert!(label.starts_with("restore-42-"), "{label}");
        assert_eq!(label.len(), "restore-42-".len() + LABEL_TOKEN_LEN);
    }

    #[rstest]
    fn generated_labels_drop_disallowed_characters() {
        let label = generate_label("vol 4/2");
        assert!(label.starts_with("vol42-"), "{label}");
    }

    #[rstest]
    fn generated_labels_differ_between_calls() {
        let prefix = "vol42-pvc-0b6f1a8e-1d2c-4c3b-9a8e";
        assert_ne!(generate_label(prefix), generate_label(prefix));
    }
}

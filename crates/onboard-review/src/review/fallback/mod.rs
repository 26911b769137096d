//! Canned demo clients served when the live `next-client` call fails.

use serde_json::{Map, Value};
use std::sync::OnceLock;

use super::record::ClientRecord;

const PRIMARY_JSON: &str = include_str!("benjamin_wagner.json");
const SECONDARY_JSON: &str = include_str!("ophelie_dubois.json");

/// Account form, passport scan and profile form for Benjamin Paul Wagner.
pub fn primary() -> ClientRecord {
    static RECORD: OnceLock<ClientRecord> = OnceLock::new();
    RECORD.get_or_init(|| parse_embedded(PRIMARY_JSON)).clone()
}

/// Client description and profile form for Ophélie Hortense Dubois.
pub fn secondary() -> ClientRecord {
    static RECORD: OnceLock<ClientRecord> = OnceLock::new();
    RECORD.get_or_init(|| parse_embedded(SECONDARY_JSON)).clone()
}

fn parse_embedded(raw: &str) -> ClientRecord {
    let mut record = serde_json::from_str::<Map<String, Value>>(raw)
        .map(ClientRecord::from)
        .unwrap_or_default();
    record.mark_fallback();
    record
}

/// Session state deciding which canned client the next failure gets.
/// Owned by the caller so each review session alternates independently.
#[derive(Debug, Clone, Default)]
pub struct FallbackRotation {
    use_secondary: bool,
}

impl FallbackRotation {
    pub fn new() -> Self {
        Self::default()
    }

    /// Primary on the first call after a fresh state, then alternating.
    pub fn next_fallback(&mut self) -> ClientRecord {
        let record = if self.use_secondary {
            secondary()
        } else {
            primary()
        };
        self.use_secondary = !self.use_secondary;
        record
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::review::attributes::Attribute;

    #[test]
    fn embedded_records_parse_completely() {
        let primary = primary();
        let secondary = secondary();

        assert_eq!(primary.len(), 51);
        assert_eq!(secondary.len(), 21);
        assert!(primary.is_fallback() && secondary.is_fallback());
        assert_eq!(primary.decision(), Some("Accept"));
        assert_eq!(secondary.decision(), Some("Accept"));
        assert_eq!(
            primary.resolve(Attribute::FullName).as_deref(),
            Some("Benjamin Paul Wagner")
        );
        assert_eq!(
            secondary.resolve(Attribute::FullName).as_deref(),
            Some("Ophélie Hortense Dubois")
        );
    }

    #[test]
    fn rotation_alternates_starting_with_primary() {
        let mut rotation = FallbackRotation::new();
        assert_eq!(rotation.next_fallback(), primary());
        assert_eq!(rotation.next_fallback(), secondary());
        assert_eq!(rotation.next_fallback(), primary());
    }

    #[test]
    fn rotations_are_independent() {
        let mut first = FallbackRotation::new();
        let mut second = FallbackRotation::new();
        first.next_fallback();
        assert_eq!(second.next_fallback(), primary());
        assert_eq!(first.next_fallback(), secondary());
    }
}

use serde::Serialize;

use super::record::ClientRecord;
use super::report::{detect_inconsistencies, risk_level, views::RiskLevel, ACCEPT_DECISION};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Decision {
    Accept,
    Reject,
}

impl Decision {
    pub const fn as_str(self) -> &'static str {
        match self {
            Decision::Accept => ACCEPT_DECISION,
            Decision::Reject => "Reject",
        }
    }
}

impl std::str::FromStr for Decision {
    type Err = String;

    /// Parses typed input; case and padding are ignored.
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "accept" => Ok(Decision::Accept),
            "reject" => Ok(Decision::Reject),
            other => Err(format!("unknown decision `{other}`, expected Accept or Reject")),
        }
    }
}

/// Handcrafted onboarding decision attached to archived clients: reject
/// politically exposed persons and any client whose documents disagree.
pub fn decide(record: &ClientRecord) -> Decision {
    if risk_level(record) == RiskLevel::High {
        return Decision::Reject;
    }

    if !detect_inconsistencies(record).is_empty() {
        return Decision::Reject;
    }

    Decision::Accept
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn consistent_client_is_accepted() {
        let record = ClientRecord::new()
            .with_field("passport_number_passport.png", "1G4078236")
            .with_field("passport_no_profile.docx", "1g4078236")
            .with_field("investment risk profile_profile.docx", "aggressive");
        assert_eq!(decide(&record), Decision::Accept);
    }

    #[test]
    fn politically_exposed_client_is_rejected() {
        let record = ClientRecord::new().with_field(
            "is the client or associated person a politically exposed person as defined in the client acceptance policy?_profile.docx",
            "yes",
        );
        assert_eq!(decide(&record), Decision::Reject);
    }

    #[test]
    fn typed_decisions_parse_loosely() {
        assert_eq!(" accept\n".parse::<Decision>(), Ok(Decision::Accept));
        assert_eq!("REJECT".parse::<Decision>(), Ok(Decision::Reject));
        assert!("maybe".parse::<Decision>().is_err());
    }

    #[test]
    fn decisions_serialize_as_wire_names() {
        assert_eq!(
            serde_json::to_value(Decision::Accept).expect("serializes"),
            serde_json::json!("Accept")
        );
    }

    #[test]
    fn mismatched_documents_are_rejected() {
        let record = ClientRecord::new()
            .with_field("email_account.pdf", "a@example.com")
            .with_field("email_profile.docx", "b@example.com");
        assert_eq!(decide(&record), Decision::Reject);
        assert_eq!(decide(&record).as_str(), "Reject");
    }
}

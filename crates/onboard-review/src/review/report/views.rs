use serde::Serialize;

use super::super::profile::{ClientProfile, FinancialDetails};

/// Ordinal compliance risk, lowest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskLevel {
    Low,
    ModerateLow,
    Moderate,
    ModerateHigh,
    High,
}

impl RiskLevel {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::ModerateLow => "Moderate-Low",
            Self::Moderate => "Moderate",
            Self::ModerateHigh => "Moderate-High",
            Self::High => "High",
        }
    }

    /// Contribution to the overall score.
    pub const fn points(self) -> u32 {
        match self {
            Self::Low => 20,
            Self::ModerateLow => 15,
            Self::Moderate => 10,
            Self::ModerateHigh => 5,
            Self::High => 0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReviewStatus {
    Approved,
    FurtherReview,
    Declined,
}

impl ReviewStatus {
    /// Classifies the unrounded weighted sum, given in tenths of a point.
    pub const fn from_score_tenths(tenths: u32) -> Self {
        if tenths >= 800 {
            Self::Approved
        } else if tenths >= 600 {
            Self::FurtherReview
        } else {
            Self::Declined
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Approved => "Approved",
            Self::FurtherReview => "Further Review",
            Self::Declined => "Declined",
        }
    }

    pub const fn indicator(self) -> StatusIndicator {
        match self {
            Self::Approved => StatusIndicator {
                color: "green",
                icon: "check-circle",
                message: "Client meets onboarding requirements",
            },
            Self::FurtherReview => StatusIndicator {
                color: "amber",
                icon: "alert-triangle",
                message: "Client requires further review before onboarding",
            },
            Self::Declined => StatusIndicator {
                color: "red",
                icon: "x-circle",
                message: "Client does not meet onboarding requirements",
            },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StatusIndicator {
    pub color: &'static str,
    pub icon: &'static str,
    pub message: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IdentityCheckKind {
    FullNamePresent,
    NationalityPresent,
    PassportNumberPresent,
    CountryPresent,
    CityPresent,
    BirthDateOrAgePresent,
    EmailPresent,
    PhonePresent,
    PassportMatchesAccountForm,
    EmailMatchesProfileForm,
}

impl IdentityCheckKind {
    pub const fn ordered() -> [Self; 10] {
        [
            Self::FullNamePresent,
            Self::NationalityPresent,
            Self::PassportNumberPresent,
            Self::CountryPresent,
            Self::CityPresent,
            Self::BirthDateOrAgePresent,
            Self::EmailPresent,
            Self::PhonePresent,
            Self::PassportMatchesAccountForm,
            Self::EmailMatchesProfileForm,
        ]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::FullNamePresent => "Full name provided",
            Self::NationalityPresent => "Nationality provided",
            Self::PassportNumberPresent => "Passport number provided",
            Self::CountryPresent => "Country of residence provided",
            Self::CityPresent => "City of residence provided",
            Self::BirthDateOrAgePresent => "Date of birth or age provided",
            Self::EmailPresent => "Email provided",
            Self::PhonePresent => "Phone number provided",
            Self::PassportMatchesAccountForm => "Passport number matches account form",
            Self::EmailMatchesProfileForm => "Account email matches profile form",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct IdentityCheck {
    pub check: IdentityCheckKind,
    pub label: &'static str,
    pub passed: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReviewReport {
    pub profile: ClientProfile,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub financials: Option<FinancialDetails>,
    pub identity_checks: Vec<IdentityCheck>,
    pub identity_score: u8,
    pub risk_level: RiskLevel,
    pub risk_label: &'static str,
    pub inconsistencies: Vec<String>,
    pub consistency_score: u8,
    pub overall_score: u8,
    pub status: ReviewStatus,
    pub status_label: &'static str,
    pub indicator: StatusIndicator,
    pub recommendation: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub decision: Option<String>,
    /// Set when the record is canned demo data rather than a live client.
    pub is_fallback: bool,
}

impl ReviewReport {
    pub fn passed_checks(&self) -> usize {
        self.identity_checks
            .iter()
            .filter(|check| check.passed)
            .count()
    }
}

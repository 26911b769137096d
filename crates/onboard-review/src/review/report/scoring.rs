use super::super::attributes::{Attribute, SourceField};
use super::super::profile::ClientProfile;
use super::super::record::ClientRecord;
use super::views::{IdentityCheck, IdentityCheckKind, RiskLevel};

pub(crate) const ACCEPT_DECISION: &str = "Accept";

const IDENTITY_FLOOR: u32 = 70;
const IDENTITY_CEILING: u32 = 99;
const CONSISTENT_SCORE: u8 = 98;
const CONSISTENCY_BASE: u32 = 95;
const CONSISTENCY_PENALTY: u32 = 5;
const CONSISTENCY_FLOOR: u32 = 75;
const ACCEPT_POINTS: u32 = 20;

pub(crate) fn identity_checks(
    record: &ClientRecord,
    profile: &ClientProfile,
) -> Vec<IdentityCheck> {
    IdentityCheckKind::ordered()
        .into_iter()
        .map(|check| {
            let passed = match check {
                IdentityCheckKind::FullNamePresent => profile.full_name.is_some(),
                IdentityCheckKind::NationalityPresent => profile.nationality.is_some(),
                IdentityCheckKind::PassportNumberPresent => profile.passport_number.is_some(),
                IdentityCheckKind::CountryPresent => profile.country.is_some(),
                IdentityCheckKind::CityPresent => profile.city.is_some(),
                IdentityCheckKind::BirthDateOrAgePresent => profile.birth_date_or_age().is_some(),
                IdentityCheckKind::EmailPresent => profile.email.is_some(),
                IdentityCheckKind::PhonePresent => profile.phone.is_some(),
                IdentityCheckKind::PassportMatchesAccountForm => both_equal(
                    record,
                    SourceField::PassportImagePassportNumber,
                    SourceField::AccountFormPassportNumber,
                ),
                IdentityCheckKind::EmailMatchesProfileForm => both_equal(
                    record,
                    SourceField::AccountFormEmail,
                    SourceField::ProfileFormEmail,
                ),
            };

            IdentityCheck {
                check,
                label: check.label(),
                passed,
            }
        })
        .collect()
}

/// Percentage of passed checks, clamped to `[70, 99]`.
pub(crate) fn identity_score(checks: &[IdentityCheck]) -> u8 {
    if checks.is_empty() {
        return IDENTITY_FLOOR as u8;
    }

    let passed = checks.iter().filter(|check| check.passed).count() as u32;
    let raw = passed * 100 / checks.len() as u32;
    raw.clamp(IDENTITY_FLOOR, IDENTITY_CEILING) as u8
}

/// First matching rule wins; the PEP flag dominates. Flags are compared
/// trimmed and case-folded, so `"Yes"` from a form counts as `"yes"`.
pub(crate) fn risk_level(record: &ClientRecord) -> RiskLevel {
    let normalized = |attribute: Attribute| {
        record
            .resolve(attribute)
            .map(|value| value.trim().to_lowercase())
    };

    if normalized(Attribute::PoliticallyExposed).as_deref() == Some("yes") {
        return RiskLevel::High;
    }

    match normalized(Attribute::RiskProfile).as_deref() {
        Some("high") | Some("aggressive") => return RiskLevel::ModerateHigh,
        Some("moderate") => return RiskLevel::Moderate,
        _ => {}
    }

    if normalized(Attribute::InvestmentExperience).as_deref() == Some("inexperienced") {
        return RiskLevel::ModerateLow;
    }

    RiskLevel::Low
}

/// Cross-document comparisons; a comparison with an unknown side is skipped.
pub(crate) fn detect_inconsistencies(record: &ClientRecord) -> Vec<String> {
    let mut inconsistencies = Vec::new();

    let passport_image = record.source_text(SourceField::PassportImagePassportNumber);
    let passport_account = record.source_text(SourceField::AccountFormPassportNumber);
    let passport_profile = record.source_text(SourceField::ProfileFormPassportNumber);

    if let (Some(image), Some(account)) = (&passport_image, &passport_account) {
        if image != account {
            inconsistencies.push(format!(
                "Passport number mismatch: passport shows {image}, account form shows {account}"
            ));
        }
    }

    if let (Some(image), Some(profile)) = (&passport_image, &passport_profile) {
        if image.to_lowercase() != profile.to_lowercase() {
            inconsistencies.push(format!(
                "Passport number mismatch: passport shows {image}, profile form shows {profile}"
            ));
        }
    }

    let email_account = record.source_text(SourceField::AccountFormEmail);
    let email_profile = record.source_text(SourceField::ProfileFormEmail);
    if let (Some(account), Some(profile)) = (&email_account, &email_profile) {
        if account != profile {
            inconsistencies.push(format!(
                "Email mismatch: account form shows {account}, profile form shows {profile}"
            ));
        }
    }

    let full_name = record.resolve(Attribute::FullName);
    let given_name = record.source_text(SourceField::PassportImageGivenName);
    let surname = record.source_text(SourceField::PassportImageSurname);
    if let (Some(full_name), Some(given_name), Some(surname)) = (full_name, given_name, surname) {
        let passport_name = format!("{given_name} {surname}");
        if !full_name
            .to_lowercase()
            .contains(&passport_name.to_lowercase())
        {
            inconsistencies.push(format!(
                "Name mismatch: {full_name} does not match passport name {passport_name}"
            ));
        }
    }

    inconsistencies
}

pub(crate) fn consistency_score(inconsistencies: &[String]) -> u8 {
    if inconsistencies.is_empty() {
        return CONSISTENT_SCORE;
    }

    let penalty = CONSISTENCY_PENALTY.saturating_mul(inconsistencies.len() as u32);
    CONSISTENCY_BASE
        .saturating_sub(penalty)
        .max(CONSISTENCY_FLOOR) as u8
}

/// Case-sensitive: only `Accept` earns the decision points.
pub(crate) fn is_accepted(decision: Option<&str>) -> bool {
    decision == Some(ACCEPT_DECISION)
}

/// Weighted sum in tenths of a point: 30% identity, 30% consistency, risk
/// points, 20 for an accept. Exact, so status thresholds never see rounding.
pub(crate) fn weighted_score_tenths(
    identity_score: u8,
    consistency_score: u8,
    risk: RiskLevel,
    accepted: bool,
) -> u32 {
    let decision = if accepted { ACCEPT_POINTS } else { 0 };
    3 * u32::from(identity_score)
        + 3 * u32::from(consistency_score)
        + 10 * (risk.points() + decision)
}

/// Displayed score: the weighted sum rounded half up, capped at 100.
pub(crate) fn overall_score(tenths: u32) -> u8 {
    ((tenths + 5) / 10).min(100) as u8
}

pub(crate) fn recommendation(
    accepted: bool,
    inconsistencies: &[String],
    risk: RiskLevel,
) -> &'static str {
    if !accepted {
        "Additional Verification Required"
    } else if !inconsistencies.is_empty() {
        "Conditionally Recommended for Approval"
    } else if risk == RiskLevel::High {
        "Recommended for Approval with Enhanced Due Diligence"
    } else {
        "Recommended for Approval"
    }
}

fn both_equal(record: &ClientRecord, left: SourceField, right: SourceField) -> bool {
    match (record.source_text(left), record.source_text(right)) {
        (Some(left), Some(right)) => left == right,
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pep_record(pep: &str) -> ClientRecord {
        ClientRecord::new().with_field(
            "is the client or associated person a politically exposed person as defined in the client acceptance policy?_profile.docx",
            pep,
        )
    }

    #[test]
    fn identity_score_is_clamped_on_both_ends() {
        let none = vec![
            IdentityCheck {
                check: IdentityCheckKind::FullNamePresent,
                label: "",
                passed: false,
            };
            10
        ];
        assert_eq!(identity_score(&none), 70);

        let all = vec![
            IdentityCheck {
                check: IdentityCheckKind::FullNamePresent,
                label: "",
                passed: true,
            };
            10
        ];
        assert_eq!(identity_score(&all), 99);
    }

    #[test]
    fn identity_score_floors_partial_results() {
        let record = ClientRecord::new()
            .with_field("full_name_description.txt", "Ophélie Hortense Dubois")
            .with_field("nationality_description.txt", "French")
            .with_field("passport_no_profile.docx", "1G4078236")
            .with_field("current_country_description.txt", "France")
            .with_field("current_city_description.txt", "Caen")
            .with_field("age_description.txt", "39")
            .with_field("email_profile.docx", "ophelie.dubois@live.fr")
            .with_field("telephone_profile.docx", "03 30 32 04 67");
        let profile = ClientProfile::from_record(&record);

        let checks = identity_checks(&record, &profile);
        assert_eq!(checks.iter().filter(|check| check.passed).count(), 8);
        assert_eq!(identity_score(&checks), 80);
    }

    #[test]
    fn equality_checks_need_both_sides() {
        let record = ClientRecord::new().with_field("email_profile.docx", "a@example.com");
        let profile = ClientProfile::from_record(&record);
        let checks = identity_checks(&record, &profile);
        let email_match = checks
            .iter()
            .find(|check| check.check == IdentityCheckKind::EmailMatchesProfileForm)
            .expect("check present");
        assert!(!email_match.passed);
    }

    #[test]
    fn pep_dominates_every_other_risk_signal() {
        let record = pep_record(" Yes ")
            .with_field("investment risk profile_profile.docx", "aggressive")
            .with_field("investment experience_profile.docx", "inexperienced");
        assert_eq!(risk_level(&record), RiskLevel::High);
    }

    #[test]
    fn pep_flag_ignores_case_and_padding_only() {
        assert_eq!(risk_level(&pep_record("YES")), RiskLevel::High);
        assert_eq!(risk_level(&pep_record("yes\n")), RiskLevel::High);
        assert_eq!(risk_level(&pep_record("yes, spouse")), RiskLevel::Low);
    }

    #[test]
    fn only_exact_accept_counts_as_accepted() {
        assert!(is_accepted(Some("Accept")));
        assert!(!is_accepted(Some("accept")));
        assert!(!is_accepted(Some("Accepted")));
        assert!(!is_accepted(None));

        let padded = ClientRecord::new().with_decision(" Accept ");
        assert!(is_accepted(padded.decision()));
    }

    #[test]
    fn risk_rules_apply_in_order() {
        let aggressive = pep_record("no").with_field("investment risk profile_profile.docx", "High");
        assert_eq!(risk_level(&aggressive), RiskLevel::ModerateHigh);

        let moderate = ClientRecord::new()
            .with_field("investment risk profile_profile.docx", "moderate")
            .with_field("investment experience_profile.docx", "inexperienced");
        assert_eq!(risk_level(&moderate), RiskLevel::Moderate);

        let novice =
            ClientRecord::new().with_field("investment experience_profile.docx", "inexperienced");
        assert_eq!(risk_level(&novice), RiskLevel::ModerateLow);

        let considerable =
            ClientRecord::new().with_field("investment_risk_profile_profile", "considerable");
        assert_eq!(risk_level(&considerable), RiskLevel::Low);
    }

    #[test]
    fn passport_profile_comparison_ignores_case() {
        let record = ClientRecord::new()
            .with_field("passport_number_passport.png", "ZR9108088")
            .with_field("passport_number_account.pdf", "ZR9108088")
            .with_field("passport_no_profile.docx", "zr9108088");
        assert!(detect_inconsistencies(&record).is_empty());

        let mismatched = record.with_field("passport_number_account.pdf", "zr9108088");
        let found = detect_inconsistencies(&mismatched);
        assert_eq!(found.len(), 1);
        assert!(found[0].contains("account form"));
    }

    #[test]
    fn name_check_uses_passport_given_name_and_surname() {
        let record = ClientRecord::new()
            .with_field("full_name_description.txt", "Dr. Benjamin Paul Wagner")
            .with_field("given_name_passport.png", "BENJAMIN PAUL")
            .with_field("surname_passport.png", "WAGNER");
        assert!(detect_inconsistencies(&record).is_empty());

        let other = record.with_field("surname_passport.png", "MUELLER");
        let found = detect_inconsistencies(&other);
        assert_eq!(found.len(), 1);
        assert!(found[0].starts_with("Name mismatch"));
    }

    #[test]
    fn comparisons_with_unknown_sides_are_skipped() {
        let record = ClientRecord::new()
            .with_field("passport_number_passport.png", "null")
            .with_field("passport_number_account.pdf", "ZR9108088")
            .with_field("email_account.pdf", "");
        assert!(detect_inconsistencies(&record).is_empty());
    }

    #[test]
    fn consistency_score_steps_down_to_floor() {
        let issues = |count: usize| vec!["issue".to_string(); count];
        assert_eq!(consistency_score(&issues(0)), 98);
        assert_eq!(consistency_score(&issues(1)), 90);
        assert_eq!(consistency_score(&issues(2)), 85);
        assert_eq!(consistency_score(&issues(4)), 75);
        assert_eq!(consistency_score(&issues(9)), 75);
    }

    #[test]
    fn overall_score_weights_components() {
        let score = |identity, consistency, risk, accepted| {
            overall_score(weighted_score_tenths(identity, consistency, risk, accepted))
        };
        assert_eq!(score(99, 98, RiskLevel::Low, true), 99);
        assert_eq!(score(90, 85, RiskLevel::Moderate, true), 83);
        assert_eq!(score(70, 75, RiskLevel::High, false), 44);
    }

    #[test]
    fn half_point_sums_are_kept_exact() {
        // 24 + 25.5 + 10 + 20
        let tenths = weighted_score_tenths(80, 85, RiskLevel::Moderate, true);
        assert_eq!(tenths, 795);
        assert_eq!(overall_score(tenths), 80);
    }

    #[test]
    fn recommendation_follows_precedence() {
        let issues = vec!["Email mismatch".to_string()];
        assert_eq!(
            recommendation(false, &[], RiskLevel::Low),
            "Additional Verification Required"
        );
        assert_eq!(
            recommendation(true, &issues, RiskLevel::High),
            "Conditionally Recommended for Approval"
        );
        assert_eq!(
            recommendation(true, &[], RiskLevel::High),
            "Recommended for Approval with Enhanced Due Diligence"
        );
        assert_eq!(
            recommendation(true, &[], RiskLevel::ModerateHigh),
            "Recommended for Approval"
        );
    }
}

mod scoring;
pub mod views;

use chrono::Datelike;
use rand::Rng;

use super::profile::{ClientProfile, FinancialDetails};
use super::record::ClientRecord;
use views::{ReviewReport, ReviewStatus};

pub(crate) use scoring::{detect_inconsistencies, risk_level, ACCEPT_DECISION};

/// Derives the full review for one client record. Pure; never fails.
pub fn derive_report(record: &ClientRecord) -> ReviewReport {
    let profile = ClientProfile::from_record(record);
    let financials = FinancialDetails::from_record(record);

    let identity_checks = scoring::identity_checks(record, &profile);
    let identity_score = scoring::identity_score(&identity_checks);
    let risk_level = scoring::risk_level(record);
    let inconsistencies = scoring::detect_inconsistencies(record);
    let consistency_score = scoring::consistency_score(&inconsistencies);

    let decision = record.decision().map(str::to_string);
    let accepted = scoring::is_accepted(decision.as_deref());
    let tenths =
        scoring::weighted_score_tenths(identity_score, consistency_score, risk_level, accepted);
    let overall_score = scoring::overall_score(tenths);
    let status = ReviewStatus::from_score_tenths(tenths);
    let recommendation = scoring::recommendation(accepted, &inconsistencies, risk_level);

    ReviewReport {
        profile,
        financials,
        identity_checks,
        identity_score,
        risk_level,
        risk_label: risk_level.label(),
        inconsistencies,
        consistency_score,
        overall_score,
        status,
        status_label: status.label(),
        indicator: status.indicator(),
        recommendation,
        decision,
        is_fallback: record.is_fallback(),
    }
}

/// Per-render client label, e.g. `CL-2026-0417`. Not derived from the record.
pub fn display_label<R: Rng>(year: i32, rng: &mut R) -> String {
    let suffix: u16 = rng.gen_range(0..10_000);
    format!("CL-{year}-{suffix:04}")
}

pub fn current_display_label() -> String {
    display_label(chrono::Local::now().year(), &mut rand::thread_rng())
}

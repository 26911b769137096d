use serde::Serialize;
use std::io::Write;

use super::archive::ArchivedClient;
use super::profile::{display, NOT_AVAILABLE};
use super::report::{derive_report, views::ReviewReport};

/// One CSV line of an archive-wide review run.
#[derive(Debug, Serialize)]
struct SummaryRow<'a> {
    file: &'a str,
    client_name: &'a str,
    identity_score: u8,
    consistency_score: u8,
    inconsistencies: usize,
    risk_level: &'static str,
    overall_score: u8,
    status: &'static str,
    recommendation: &'static str,
    decision: &'a str,
}

pub struct ReviewedClient {
    pub file: String,
    pub report: ReviewReport,
}

pub fn review_archive(clients: &[ArchivedClient]) -> Vec<ReviewedClient> {
    clients
        .iter()
        .map(|client| ReviewedClient {
            file: client.file_name(),
            report: derive_report(&client.record),
        })
        .collect()
}

pub fn write_summary_csv<W: Write>(writer: W, reviewed: &[ReviewedClient]) -> Result<(), csv::Error> {
    let mut csv_writer = csv::Writer::from_writer(writer);

    for client in reviewed {
        let report = &client.report;
        csv_writer.serialize(SummaryRow {
            file: &client.file,
            client_name: display(&report.profile.full_name),
            identity_score: report.identity_score,
            consistency_score: report.consistency_score,
            inconsistencies: report.inconsistencies.len(),
            risk_level: report.risk_label,
            overall_score: report.overall_score,
            status: report.status_label,
            recommendation: report.recommendation,
            decision: report.decision.as_deref().unwrap_or(NOT_AVAILABLE),
        })?;
    }

    csv_writer.flush()?;
    Ok(())
}

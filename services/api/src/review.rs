use crate::render::render_review_report;
use clap::{Args, ValueEnum};
use onboard_review::config::AppConfig;
use onboard_review::error::AppError;
use onboard_review::review::{
    current_display_label, derive_report, review_archive, write_summary_csv, ClientFetcher,
    DirectoryArchive, FallbackRotation, RecordOrigin,
};
use onboard_review::telemetry;
use serde::Serialize;
use std::fs::File;
use std::io::{self, Write};
use std::path::PathBuf;
use tracing::info;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub(crate) enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Args, Debug)]
pub(crate) struct ReviewArgs {
    /// Base URL of the review API (the fetcher requests `<base>/next-client`)
    #[arg(long)]
    pub(crate) base_url: Option<String>,
    /// Client-side request timeout in milliseconds
    #[arg(long)]
    pub(crate) timeout_ms: Option<u64>,
    /// Number of clients to review in this session
    #[arg(long, default_value_t = 1)]
    pub(crate) count: usize,
    /// Output format for each report
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub(crate) format: OutputFormat,
}

#[derive(Args, Debug)]
pub(crate) struct ArchiveReviewArgs {
    /// Folder of client records (defaults to REVIEW_ARCHIVE_DIR)
    #[arg(long)]
    pub(crate) archive_dir: Option<PathBuf>,
    /// Write the CSV summary to this file instead of stdout
    #[arg(long)]
    pub(crate) output: Option<PathBuf>,
}

#[derive(Debug, Serialize)]
struct ReviewEnvelope<'a> {
    label: &'a str,
    origin: RecordOrigin,
    report: &'a onboard_review::review::ReviewReport,
}

/// Fetches `count` clients in one session; fallback alternation carries
/// across the loop the way repeated "next client" clicks would.
pub(crate) async fn run_review(args: ReviewArgs) -> Result<(), AppError> {
    let ReviewArgs {
        base_url,
        timeout_ms,
        count,
        format,
    } = args;

    let mut config = AppConfig::load()?;
    if let Some(base_url) = base_url {
        config.review.api_base_url = base_url;
    }
    if let Some(timeout_ms) = timeout_ms.filter(|ms| *ms > 0) {
        config.review.timeout_ms = timeout_ms;
    }

    telemetry::init(&config.telemetry)?;

    let fetcher = ClientFetcher::new(&config.review)?;
    let mut rotation = FallbackRotation::new();

    for index in 0..count.max(1) {
        let fetched = fetcher.fetch_next_client(&mut rotation).await;
        let report = derive_report(&fetched.record);
        let label = current_display_label();
        info!(
            client = index + 1,
            %label,
            origin = ?fetched.origin,
            overall = report.overall_score,
            "client reviewed"
        );

        let mut out = io::stdout().lock();
        match format {
            OutputFormat::Text => {
                if index > 0 {
                    writeln!(out)?;
                }
                render_review_report(&mut out, &label, &report)?;
            }
            OutputFormat::Json => {
                let envelope = ReviewEnvelope {
                    label: &label,
                    origin: fetched.origin,
                    report: &report,
                };
                serde_json::to_writer(&mut out, &envelope)?;
                writeln!(out)?;
            }
        }
    }

    Ok(())
}

pub(crate) fn run_archive_review(args: ArchiveReviewArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;

    let archive_dir = args.archive_dir.unwrap_or(config.review.archive_dir);
    let archive = DirectoryArchive::new(archive_dir);
    let clients = archive.load_all()?;
    let reviewed = review_archive(&clients);

    match args.output {
        Some(path) => {
            let file = File::create(&path)?;
            write_summary_csv(file, &reviewed)?;
            info!(clients = reviewed.len(), output = %path.display(), "archive review written");
        }
        None => write_summary_csv(io::stdout().lock(), &reviewed)?,
    }

    Ok(())
}

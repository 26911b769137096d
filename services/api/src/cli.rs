use crate::game::{run_assemble, run_play, AssembleArgs, PlayArgs};
use crate::review::{run_archive_review, run_review, ArchiveReviewArgs, ReviewArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use onboard_review::error::AppError;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "Client Onboarding Review",
    about = "Serve onboarding clients and review their identity, risk and consistency",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Fetch clients from the next-client API and print their review reports
    Review(ReviewArgs),
    /// Review every record in a client archive and write a CSV summary
    Archive(ArchiveReviewArgs),
    /// Merge per-document feature files into client records for the archive
    Assemble(AssembleArgs),
    /// Play a session against the onboarding game server
    Play(PlayArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
    /// Override the folder of client records served by /api/next-client
    #[arg(long)]
    pub(crate) archive_dir: Option<PathBuf>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Review(args) => run_review(args).await,
        Command::Archive(args) => run_archive_review(args),
        Command::Assemble(args) => run_assemble(args),
        Command::Play(args) => run_play(args).await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_serve_without_subcommand() {
        let cli = Cli::try_parse_from(["onboard-review-api"]).expect("parses");
        assert!(cli.command.is_none());
    }

    #[test]
    fn review_accepts_count_and_format() {
        let cli = Cli::try_parse_from([
            "onboard-review-api",
            "review",
            "--count",
            "3",
            "--format",
            "json",
            "--timeout-ms",
            "250",
        ])
        .expect("parses");

        match cli.command {
            Some(Command::Review(args)) => {
                assert_eq!(args.count, 3);
                assert_eq!(args.timeout_ms, Some(250));
                assert_eq!(args.format, crate::review::OutputFormat::Json);
            }
            other => panic!("expected review command, got {other:?}"),
        }
    }

    #[test]
    fn assemble_requires_an_input_folder() {
        assert!(Cli::try_parse_from(["onboard-review-api", "assemble"]).is_err());

        let cli = Cli::try_parse_from([
            "onboard-review-api",
            "assemble",
            "--input",
            "extracted",
            "--output",
            "out_archive",
        ])
        .expect("parses");
        match cli.command {
            Some(Command::Assemble(args)) => {
                assert_eq!(args.input, PathBuf::from("extracted"));
                assert_eq!(args.output, Some(PathBuf::from("out_archive")));
            }
            other => panic!("expected assemble command, got {other:?}"),
        }
    }

    #[test]
    fn play_accepts_overrides() {
        let cli = Cli::try_parse_from([
            "onboard-review-api",
            "play",
            "--api-url",
            "https://game.example/api",
            "--features-dir",
            "features",
            "--max-rounds",
            "5",
        ])
        .expect("parses");
        match cli.command {
            Some(Command::Play(args)) => {
                assert_eq!(args.api_url.as_deref(), Some("https://game.example/api"));
                assert_eq!(args.features_dir, Some(PathBuf::from("features")));
                assert_eq!(args.max_rounds, Some(5));
                assert!(args.api_key.is_none());
            }
            other => panic!("expected play command, got {other:?}"),
        }
    }
}

use clap::Args;
use onboard_review::config::AppConfig;
use onboard_review::error::AppError;
use onboard_review::review::{
    assemble_archive, judge_extracted_client, save_documents, Decision, GameClient,
};
use onboard_review::telemetry;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use tracing::{info, warn};

#[derive(Args, Debug)]
pub(crate) struct AssembleArgs {
    /// Folder holding one sub-folder of feature files per client
    #[arg(long)]
    pub(crate) input: PathBuf,
    /// Where client_data_<id>.json records are written (defaults to REVIEW_ARCHIVE_DIR)
    #[arg(long)]
    pub(crate) output: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub(crate) struct PlayArgs {
    /// Game server base URL (defaults to GAME_API_URL)
    #[arg(long)]
    pub(crate) api_url: Option<String>,
    /// Game server API key (defaults to GAME_API_KEY)
    #[arg(long)]
    pub(crate) api_key: Option<String>,
    /// Player name sent when the game starts
    #[arg(long)]
    pub(crate) player_name: Option<String>,
    /// Where client documents are saved, one folder per client
    #[arg(long)]
    pub(crate) downloads_dir: Option<PathBuf>,
    /// Folder of extracted feature files, one sub-folder per client id
    #[arg(long)]
    pub(crate) features_dir: Option<PathBuf>,
    /// Stop after this many decisions even if the game continues
    #[arg(long)]
    pub(crate) max_rounds: Option<usize>,
}

pub(crate) fn run_assemble(args: AssembleArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;

    let output = args.output.unwrap_or(config.review.archive_dir);
    let assembled = assemble_archive(&args.input, &output)?;

    let mut out = io::stdout().lock();
    for client in &assembled {
        writeln!(
            out,
            "{}\t{} fields\t{}",
            client.client_id,
            client.fields,
            client.path.display()
        )?;
    }
    info!(clients = assembled.len(), output = %output.display(), "archive assembled");
    Ok(())
}

/// Plays one game session: save each client's documents, decide from its
/// extracted features when they exist, otherwise ask on the terminal.
pub(crate) async fn run_play(args: PlayArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;
    if args.api_url.is_some() {
        config.game.api_url = args.api_url;
    }
    if args.api_key.is_some() {
        config.game.api_key = args.api_key;
    }
    if let Some(player_name) = args.player_name {
        config.game.player_name = player_name;
    }
    if let Some(downloads_dir) = args.downloads_dir {
        config.game.downloads_dir = downloads_dir;
    }

    telemetry::init(&config.telemetry)?;

    let client = GameClient::new(&config.game, config.review.timeout())?;
    let start = client.start(&config.game.player_name).await?;
    let mut session = start.session;
    let mut documents = start.documents;
    let mut rounds = 0usize;

    loop {
        let client_dir = config.game.downloads_dir.join(&session.client_id);
        let saved = save_documents(&client_dir, &documents)?;
        info!(client = %session.client_id, documents = saved.len(), "client documents saved");

        let automatic = match &args.features_dir {
            Some(features_dir) => judge_extracted_client(features_dir, &session.client_id)?,
            None => None,
        };
        let decision = match automatic {
            Some(decision) => decision,
            None => match ask_decision(session.client_id.clone()).await? {
                Some(decision) => decision,
                None => {
                    warn!("no decision entered, leaving the game");
                    return Ok(());
                }
            },
        };

        let outcome = client.send_decision(&session, decision).await?;
        rounds += 1;

        let mut out = io::stdout().lock();
        if outcome.is_game_over() {
            writeln!(out, "Wrong decision. Game over after {rounds} rounds.")?;
            return Ok(());
        }
        writeln!(out, "Good move! Keep going...")?;

        if args.max_rounds.is_some_and(|max| rounds >= max) {
            info!(rounds, "round limit reached");
            return Ok(());
        }

        if let Some(next_client_id) = outcome.next_client_id {
            session.client_id = next_client_id;
        }
        documents = outcome.documents;
    }
}

async fn ask_decision(client_id: String) -> Result<Option<Decision>, AppError> {
    tokio::task::spawn_blocking(move || {
        let stdin = io::stdin();
        let stdout = io::stdout();
        prompt_decision(&client_id, stdin.lock(), stdout.lock())
    })
    .await
    .map_err(|err| AppError::Io(io::Error::other(err)))?
    .map_err(AppError::from)
}

/// Reads until a valid decision is entered; `None` at end of input.
pub(crate) fn prompt_decision<R: BufRead, W: Write>(
    client_id: &str,
    mut input: R,
    mut output: W,
) -> io::Result<Option<Decision>> {
    loop {
        write!(output, "Client {client_id}: choose your action (Accept/Reject): ")?;
        output.flush()?;

        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            return Ok(None);
        }

        match line.parse::<Decision>() {
            Ok(decision) => return Ok(Some(decision)),
            Err(message) => writeln!(output, "{message}")?,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn prompt_retries_until_a_valid_decision() {
        let mut output = Vec::new();
        let decision = prompt_decision("1042", Cursor::new("maybe\n reject \n"), &mut output)
            .expect("prompt reads");

        assert_eq!(decision, Some(Decision::Reject));
        let printed = String::from_utf8(output).expect("utf8 prompt");
        assert_eq!(printed.matches("Client 1042: choose your action").count(), 2);
        assert!(printed.contains("unknown decision `maybe`"));
    }

    #[test]
    fn prompt_gives_up_at_end_of_input() {
        let decision =
            prompt_decision("1042", Cursor::new(""), io::sink()).expect("prompt reads");
        assert_eq!(decision, None);
    }
}

mod cli;
mod game;
mod infra;
mod render;
mod review;
mod routes;
mod server;

use onboard_review::error::AppError;

pub async fn run() -> Result<(), AppError> {
    cli::run().await
}

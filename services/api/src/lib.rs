mod cli;
mod export;
mod infra;
mod routes;
mod seed;
mod server;

use communes::error::AppError;

pub async fn run() -> Result<(), AppError> {
    cli::run().await
}

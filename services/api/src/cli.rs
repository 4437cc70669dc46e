use crate::export::{run_export, CsvExportArgs, PdfExportArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use communes::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "communes",
    about = "Serve and export the French city/department catalog",
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
    /// Write a one-shot export of the demo dataset to a file
    Export {
        #[command(subcommand)]
        command: ExportCommand,
    },
}

#[derive(Subcommand, Debug)]
pub(crate) enum ExportCommand {
    /// CSV of cities at or above a population threshold
    Csv(CsvExportArgs),
    /// PDF fact sheet for one department
    Pdf(PdfExportArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
    /// Preload the demo dataset into the in-memory store
    #[arg(long)]
    pub(crate) seed: bool,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Export { command } => run_export(command),
    }
}

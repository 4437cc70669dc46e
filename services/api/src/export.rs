use std::path::PathBuf;
use std::sync::Arc;

use clap::Args;
use communes::catalog::{Catalog, InMemoryCatalog};
use communes::error::AppError;
use tracing::info;

use crate::cli::ExportCommand;
use crate::seed::seed_catalog;

#[derive(Args, Debug)]
pub(crate) struct CsvExportArgs {
    /// Minimum population for a city to be included
    #[arg(long, default_value_t = 0)]
    pub(crate) min_population: i64,
    /// Destination file
    #[arg(long, default_value = "cities.csv")]
    pub(crate) output: PathBuf,
}

#[derive(Args, Debug)]
pub(crate) struct PdfExportArgs {
    /// Department code to render
    #[arg(long)]
    pub(crate) code: String,
    /// Destination file
    #[arg(long, default_value = "department.pdf")]
    pub(crate) output: PathBuf,
}

/// One-shot export over the seeded demo dataset.
pub(crate) fn run_export(command: ExportCommand) -> Result<(), AppError> {
    let store = Arc::new(InMemoryCatalog::new());
    let catalog = Catalog::new(store.clone(), store);
    seed_catalog(&catalog)?;

    match command {
        ExportCommand::Csv(args) => {
            let bytes = catalog.cities.export_csv(args.min_population)?;
            std::fs::write(&args.output, &bytes)?;
            info!(
                path = %args.output.display(),
                min_population = args.min_population,
                "csv export written"
            );
        }
        ExportCommand::Pdf(args) => {
            let bytes = catalog.departments.export_pdf(&args.code)?;
            std::fs::write(&args.output, &bytes)?;
            info!(path = %args.output.display(), code = %args.code, "pdf export written");
        }
    }

    Ok(())
}

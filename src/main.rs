// src/main.rs
mod dataset;
mod extractors;
mod pdf;
mod storage;
mod utils;

use std::path::PathBuf;

use clap::Parser;

use dataset::Dataset;
use extractors::SchoolExtractor;
use storage::StorageManager;
use utils::AppError;

/// Command Line Interface for the Uganda school listing extractor
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the school listing PDF
    #[arg(short, long, default_value = "Government-Secondary.pdf")]
    input: PathBuf,

    /// Path for the JSON dataset output
    #[arg(short, long, default_value = "uganda_schools_dataset.json")]
    output: PathBuf,
}

fn main() -> Result<(), AppError> {
    // 1. Setup Logging (reads RUST_LOG env var)
    utils::logging::setup_logging();

    // 2. Parse CLI Arguments
    let args = Args::parse();
    tracing::info!("Starting extraction for args: {:?}", args);

    // 3. Read the PDF page by page
    let pages = pdf::read_pages(&args.input)?;
    tracing::info!("Read {} pages from {}", pages.len(), args.input.display());

    // 4. Extract the district -> schools listing
    let extractor = SchoolExtractor::new();
    let source = args.input.display().to_string();
    let extraction = extractor.extract(&pages, &source)?;

    tracing::info!(
        "Extraction complete: {} districts, {} schools, {} skipped lines",
        extraction.districts.len(),
        extraction.total_schools(),
        extraction.skipped_lines
    );

    // 5. Build the dataset and write it out
    let dataset = Dataset::new(extraction.districts);

    let sample: Vec<&str> = dataset.district_names().take(5).collect();
    tracing::info!("Sample districts: {}", sample.join(", "));

    let storage = StorageManager::new(&args.output)?;
    let path = storage.save_dataset(&dataset)?;

    tracing::info!("JSON dataset created successfully: {}", path.display());
    Ok(())
}

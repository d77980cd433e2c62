//! Command-line entry point for entrez-dl
//!
//! Exit behavior: 0 for a successful retrieval or a zero-match search
//! (informational), 2 when the search matched but no records were ultimately
//! retrieved, 1 for any error.

use clap::Parser;
use entrez_dl::utils::artifact_paths;
use entrez_dl::{
    Config, RetrievalOutcome, RetrievalRequest, SequenceRetriever, write_csv, write_length_plot,
};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// Exit code when the search matched records but none were retrieved.
const EXIT_NO_RECORDS: u8 = 2;

/// Retrieve nucleotide records for a taxon from NCBI Entrez and emit a CSV
/// summary plus a descending-length chart.
#[derive(Debug, Parser)]
#[command(name = "entrez-dl", version, about)]
struct Cli {
    /// Contact email, required by the NCBI usage policy
    #[arg(long, env = "ENTREZ_EMAIL")]
    email: String,

    /// NCBI API key; raises the remote rate-limit ceiling
    #[arg(long, env = "ENTREZ_API_KEY")]
    api_key: Option<String>,

    /// NCBI taxonomy identifier of the organism (e.g. 9606)
    #[arg(long)]
    taxid: String,

    /// Minimal sequence length, inclusive
    #[arg(long)]
    min_len: Option<u64>,

    /// Maximal sequence length, inclusive
    #[arg(long)]
    max_len: Option<u64>,

    /// Maximum number of records to download
    #[arg(long)]
    limit: Option<u64>,

    /// Directory for the output artifacts
    #[arg(long, default_value = ".")]
    out_dir: PathBuf,

    /// Entrez database to query
    #[arg(long, default_value = "nucleotide")]
    db: String,
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    match run(cli).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> entrez_dl::Result<ExitCode> {
    let mut config = Config::new(cli.email);
    config.api_key = cli.api_key;
    config.database = cli.db;

    let mut retriever = SequenceRetriever::new(config)?;
    let request = RetrievalRequest {
        taxon_id: cli.taxid.clone(),
        min_length: cli.min_len,
        max_length: cli.max_len,
        record_limit: cli.limit,
    };

    match retriever.run(&request).await? {
        RetrievalOutcome::Empty => {
            println!("No records match taxid {}", cli.taxid);
            Ok(ExitCode::SUCCESS)
        }
        RetrievalOutcome::Completed { total, records } => {
            if records.is_empty() {
                eprintln!("Search matched {total} records but none were retrieved");
                return Ok(ExitCode::from(EXIT_NO_RECORDS));
            }

            println!("Found {total} records, retrieved {}", records.len());
            let (csv_path, png_path) = artifact_paths(&cli.out_dir, &cli.taxid);

            write_csv(&records, &csv_path)?;
            println!("CSV report saved -> {}", csv_path.display());

            write_length_plot(&records, &png_path)?;
            println!("Length plot saved -> {}", png_path.display());

            Ok(ExitCode::SUCCESS)
        }
    }
}

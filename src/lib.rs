//! # entrez-dl
//!
//! Paginated batch retrieval of NCBI Entrez nucleotide records, with CSV and
//! chart reporting.
//!
//! ## Design Philosophy
//!
//! The core of this crate is the stateful batch-retrieval protocol: one
//! esearch call establishes a server-side history session (WebEnv + query
//! key), and the orchestrator then pages through the stored result set in
//! windows of at most 500 records, sleeping a configurable minimum delay
//! between windows to respect the remote rate limit. Everything downstream
//! of that loop — the CSV report and the descending-length chart — is a thin
//! transform over the materialized record list.
//!
//! Batches are strictly sequential: NCBI ties rate-limit and session state
//! to the WebEnv token, so concurrent fetches against one token are
//! disallowed by design. There is no retry logic anywhere; the first failure
//! halts the run and surfaces to the caller.
//!
//! ## Quick Start
//!
//! ```no_run
//! use entrez_dl::{Config, RetrievalOutcome, RetrievalRequest, SequenceRetriever};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::new("you@example.org");
//!     let mut retriever = SequenceRetriever::new(config)?;
//!
//!     let request = RetrievalRequest {
//!         taxon_id: "9606".to_string(),
//!         min_length: Some(1000),
//!         max_length: None,
//!         record_limit: Some(100),
//!     };
//!
//!     match retriever.run(&request).await? {
//!         RetrievalOutcome::Empty => println!("no matches"),
//!         RetrievalOutcome::Completed { total, records } => {
//!             println!("{} of {} records retrieved", records.len(), total);
//!         }
//!     }
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]

/// HTTP client for the Entrez E-utilities endpoints
pub mod client;
/// Configuration types
pub mod config;
/// Error types
pub mod error;
/// Batch fetching and the record-stream boundary
pub mod fetch;
/// Sequential, rate-limited batch orchestration
pub mod orchestrator;
/// Descending-length chart artifact
pub mod plot;
/// CSV report artifact
pub mod report;
/// Top-level retrieval façade
pub mod retriever;
/// Search session state and query construction
pub mod session;
/// Core types
pub mod types;
/// Output path helpers
pub mod utils;

// Re-export commonly used types
pub use client::EntrezClient;
pub use config::{Config, ENTREZ_MAX_BATCH_SIZE, FetchPolicy};
pub use error::{Error, Result};
pub use fetch::{BatchSource, RecordStream};
pub use orchestrator::{RetrievalOrchestrator, plan_windows};
pub use plot::write_length_plot;
pub use report::write_csv;
pub use retriever::SequenceRetriever;
pub use session::{SearchSession, build_search_term};
pub use types::{BatchWindow, RetrievalOutcome, RetrievalRequest, SequenceRecord};

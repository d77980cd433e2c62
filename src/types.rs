//! Core types for entrez-dl

use serde::{Deserialize, Serialize};

/// One retrieved sequence entry, as exposed by the GenBank parser
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SequenceRecord {
    /// Accession identifier, version-qualified when available
    /// (e.g. "NM_000518.5")
    pub accession: String,

    /// Sequence length in base pairs
    pub length: u64,

    /// Free-text definition line
    pub description: String,
}

/// Parameters for one retrieval run
///
/// If both length bounds are present, `min_length <= max_length` is the
/// caller's responsibility. An inverted range is passed through as-is and
/// yields zero matches from the remote service, which is acceptable degraded
/// behavior rather than an error.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct RetrievalRequest {
    /// NCBI taxonomy identifier (e.g. "9606" for Homo sapiens)
    pub taxon_id: String,

    /// Lower bound on sequence length, inclusive
    #[serde(default)]
    pub min_length: Option<u64>,

    /// Upper bound on sequence length, inclusive
    #[serde(default)]
    pub max_length: Option<u64>,

    /// Cap on the number of records retrieved across all batches
    #[serde(default)]
    pub record_limit: Option<u64>,
}

impl RetrievalRequest {
    /// Request every matching record for a taxon, with no length bounds
    pub fn for_taxon(taxon_id: impl Into<String>) -> Self {
        Self {
            taxon_id: taxon_id.into(),
            ..Default::default()
        }
    }
}

/// One page of results requested in a single efetch call
///
/// Transient: recomputed each loop iteration, never persisted.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BatchWindow {
    /// Zero-based offset of the first record in this window
    pub start: u64,

    /// Number of records requested, `1..=max_batch_size`
    pub size: u64,
}

impl BatchWindow {
    /// Offset of the first record past this window
    pub fn end(&self) -> u64 {
        self.start + self.size
    }
}

impl std::fmt::Display for BatchWindow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}..{})", self.start, self.end())
    }
}

/// Terminal state of a retrieval run
#[derive(Clone, Debug)]
pub enum RetrievalOutcome {
    /// The search matched nothing. Informational, not a failure.
    Empty,

    /// The search matched and the paginated fetch ran to completion
    Completed {
        /// Total match count reported by the search
        total: u64,
        /// Every record retrieved, in remote arrival order
        records: Vec<SequenceRecord>,
    },
}

// unwrap/expect are acceptable in tests for concise failure-on-error assertions
#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn batch_window_end_and_display() {
        let window = BatchWindow {
            start: 500,
            size: 200,
        };
        assert_eq!(window.end(), 700);
        assert_eq!(window.to_string(), "[500..700)");
    }

    #[test]
    fn request_defaults_are_unbounded() {
        let request = RetrievalRequest::for_taxon("9606");
        assert_eq!(request.taxon_id, "9606");
        assert!(request.min_length.is_none());
        assert!(request.max_length.is_none());
        assert!(request.record_limit.is_none());
    }
}

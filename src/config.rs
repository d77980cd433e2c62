//! Configuration types for entrez-dl

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Hard per-request record ceiling imposed by the Entrez efetch endpoint.
pub const ENTREZ_MAX_BATCH_SIZE: u64 = 500;

/// Batch sizing and pacing policy for the retrieval loop
///
/// Injected into the orchestrator rather than hard-coded so tests can drive
/// the loop with a fake source and a paused clock.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct FetchPolicy {
    /// Maximum records requested per efetch call (default: 500, the
    /// service-imposed ceiling; values above it are rejected by validation)
    #[serde(default = "default_max_batch_size")]
    pub max_batch_size: u64,

    /// Minimum delay between consecutive efetch calls (default: 340 ms).
    ///
    /// NCBI associates rate-limit state with the session token; issuing
    /// batches faster than this floor risks the whole session being
    /// throttled or rejected.
    #[serde(default = "default_min_request_delay", with = "duration_ms_serde")]
    pub min_request_delay: Duration,
}

impl Default for FetchPolicy {
    fn default() -> Self {
        Self {
            max_batch_size: default_max_batch_size(),
            min_request_delay: default_min_request_delay(),
        }
    }
}

/// Main configuration for the Entrez retrieval pipeline
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Config {
    /// Contact email sent with every request (required by NCBI usage policy)
    pub email: String,

    /// NCBI API key; raises the remote requests-per-second ceiling
    #[serde(default)]
    pub api_key: Option<String>,

    /// Entrez database to query (default: "nucleotide")
    #[serde(default = "default_database")]
    pub database: String,

    /// Tool identifier sent with every request, per NCBI usage policy
    #[serde(default = "default_tool")]
    pub tool: String,

    /// Base URL of the E-utilities service (overridable for testing)
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Batch sizing and pacing policy
    #[serde(default)]
    pub fetch: FetchPolicy,
}

impl Config {
    /// Create a configuration with the given contact email and defaults
    /// everywhere else
    pub fn new(email: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            api_key: None,
            database: default_database(),
            tool: default_tool(),
            base_url: default_base_url(),
            fetch: FetchPolicy::default(),
        }
    }

    /// Validate invariants that serde defaults cannot enforce
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if the email is empty or the batch size is
    /// out of the service-accepted range.
    pub fn validate(&self) -> Result<()> {
        if self.email.trim().is_empty() {
            return Err(Error::config(
                "email",
                "a contact email is required by the NCBI usage policy",
            ));
        }
        if self.fetch.max_batch_size == 0 {
            return Err(Error::config("max_batch_size", "must be at least 1"));
        }
        if self.fetch.max_batch_size > ENTREZ_MAX_BATCH_SIZE {
            return Err(Error::config(
                "max_batch_size",
                format!("must not exceed the efetch ceiling of {ENTREZ_MAX_BATCH_SIZE}"),
            ));
        }
        Ok(())
    }
}

fn default_database() -> String {
    "nucleotide".to_string()
}

fn default_tool() -> String {
    "entrez-dl".to_string()
}

fn default_base_url() -> String {
    "https://eutils.ncbi.nlm.nih.gov/entrez/eutils".to_string()
}

fn default_max_batch_size() -> u64 {
    ENTREZ_MAX_BATCH_SIZE
}

fn default_min_request_delay() -> Duration {
    Duration::from_millis(340)
}

// Duration serialization helper (milliseconds)
mod duration_ms_serde {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u64(duration.as_millis() as u64)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let millis = u64::deserialize(deserializer)?;
        Ok(Duration::from_millis(millis))
    }
}

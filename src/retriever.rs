//! Top-level retrieval façade
//!
//! Ties the search call and the paginated fetch loop together behind one
//! stateful object. The lifecycle per run is: idle → searched (session
//! established) → fetching → done, with a zero-match search short-circuiting
//! to the empty outcome and any failure propagating unchanged.

use crate::client::EntrezClient;
use crate::config::Config;
use crate::error::{Error, Result};
use crate::orchestrator::RetrievalOrchestrator;
use crate::session::SearchSession;
use crate::types::{RetrievalOutcome, RetrievalRequest, SequenceRecord};

/// Stateful retriever for one or more retrieval runs
///
/// Holds the optional [`SearchSession`]; calling [`fetch_all`] before a
/// successful [`search`] is the one representable misuse and fails with
/// [`Error::NotInitialized`].
///
/// [`search`]: SequenceRetriever::search
/// [`fetch_all`]: SequenceRetriever::fetch_all
#[derive(Debug)]
pub struct SequenceRetriever {
    client: EntrezClient,
    config: Config,
    session: Option<SearchSession>,
}

impl SequenceRetriever {
    /// Build a retriever from a validated configuration
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] for invalid configurations.
    pub fn new(config: Config) -> Result<Self> {
        let client = EntrezClient::new(&config)?;
        Ok(Self {
            client,
            config,
            session: None,
        })
    }

    /// Issue the search call and store the resulting session.
    ///
    /// Returns the total match count; zero is a valid, non-error result.
    /// A repeated call replaces the previous session.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Session`] if the remote call fails or the response
    /// is malformed.
    pub async fn search(&mut self, request: &RetrievalRequest) -> Result<u64> {
        let session = self.client.search(request).await?;
        let count = session.count();
        self.session = Some(session);
        Ok(count)
    }

    /// The established session, if any
    pub fn session(&self) -> Option<&SearchSession> {
        self.session.as_ref()
    }

    /// Fetch every matched record, up to `limit`, across paced batches.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotInitialized`] when no search has been issued;
    /// otherwise propagates the first batch failure.
    pub async fn fetch_all(&self, limit: Option<u64>) -> Result<Vec<SequenceRecord>> {
        let session = self.session.as_ref().ok_or(Error::NotInitialized)?;
        let orchestrator =
            RetrievalOrchestrator::new(self.client.clone(), self.config.fetch.clone());
        orchestrator.fetch_all(session, limit).await
    }

    /// Run one complete retrieval: search, then paginated fetch.
    ///
    /// A zero-match search terminates early with
    /// [`RetrievalOutcome::Empty`].
    pub async fn run(&mut self, request: &RetrievalRequest) -> Result<RetrievalOutcome> {
        let total = self.search(request).await?;
        if total == 0 {
            tracing::info!(taxon_id = %request.taxon_id, "search matched no records");
            return Ok(RetrievalOutcome::Empty);
        }

        let records = self.fetch_all(request.record_limit).await?;
        Ok(RetrievalOutcome::Completed { total, records })
    }
}

// unwrap/expect are acceptable in tests for concise failure-on-error assertions
#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn fetch_before_search_is_not_initialized() {
        let retriever = SequenceRetriever::new(Config::new("tester@example.org")).unwrap();
        let err = retriever.fetch_all(None).await.unwrap_err();
        assert!(matches!(err, Error::NotInitialized));
    }

    #[test]
    fn invalid_config_is_rejected_at_construction() {
        let err = SequenceRetriever::new(Config::new("")).unwrap_err();
        assert!(matches!(err, Error::Config { .. }));
    }
}

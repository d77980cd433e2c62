//! HTTP client for the Entrez E-utilities endpoints
//!
//! Wraps exactly two remote calls: `esearch.fcgi` (establishes the
//! server-side session) and `efetch.fcgi` (retrieves one batch window of
//! full-text GenBank records). Identification parameters (`tool`, `email`,
//! optional `api_key`) are attached to every request per NCBI usage policy.

use crate::config::Config;
use crate::error::{Error, Result};
use crate::session::{SearchSession, build_search_term};
use crate::types::{BatchWindow, RetrievalRequest};
use serde::Deserialize;
use std::time::Duration;

/// Timeout for a single E-utilities request. Generous because an efetch of
/// 500 full GenBank records can run to hundreds of megabytes.
const REQUEST_TIMEOUT_SECS: u64 = 300;

/// Client for the Entrez search and fetch endpoints
///
/// Cheap to clone; the underlying `reqwest::Client` is reference-counted.
#[derive(Clone, Debug)]
pub struct EntrezClient {
    http: reqwest::Client,
    base_url: String,
    database: String,
    tool: String,
    email: String,
    api_key: Option<String>,
}

/// Envelope around the esearch JSON payload
#[derive(Debug, Deserialize)]
struct EsearchEnvelope {
    #[serde(rename = "esearchresult")]
    result: Option<EsearchResult>,
}

/// The fields of the esearch result this crate relies on. Entrez returns
/// `count` as a JSON string, not a number.
#[derive(Debug, Deserialize)]
struct EsearchResult {
    count: Option<String>,
    #[serde(rename = "querykey")]
    query_key: Option<String>,
    #[serde(rename = "webenv")]
    web_env: Option<String>,
}

impl EntrezClient {
    /// Build a client from the given configuration
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if the configuration fails validation or
    /// the HTTP client cannot be constructed.
    pub fn new(config: &Config) -> Result<Self> {
        config.validate()?;
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(|e| Error::Config {
                message: format!("could not build HTTP client: {e}"),
                key: None,
            })?;
        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            database: config.database.clone(),
            tool: config.tool.clone(),
            email: config.email.clone(),
            api_key: config.api_key.clone(),
        })
    }

    /// Identification parameters attached to every E-utilities call
    fn ident_params(&self) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("tool", self.tool.clone()),
            ("email", self.email.clone()),
        ];
        if let Some(key) = &self.api_key {
            params.push(("api_key", key.clone()));
        }
        params
    }

    /// Issue the single esearch call that establishes a server-side session.
    ///
    /// Requests zero returned records (`retmax=0`) but server-side history
    /// retention (`usehistory=y`); only the count/WebEnv/query-key triple is
    /// consumed from the response.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Session`] if the call fails, returns a non-success
    /// status, or the response is missing any of the triple. A zero count
    /// with a well-formed triple is not an error.
    pub async fn search(&self, request: &RetrievalRequest) -> Result<SearchSession> {
        let term = build_search_term(request);
        tracing::debug!(term = %term, database = %self.database, "issuing esearch");

        let mut params = self.ident_params();
        params.push(("db", self.database.clone()));
        params.push(("term", term));
        params.push(("usehistory", "y".to_string()));
        params.push(("retmax", "0".to_string()));
        params.push(("retmode", "json".to_string()));

        let response = self
            .http
            .get(format!("{}/esearch.fcgi", self.base_url))
            .query(&params)
            .send()
            .await
            .map_err(|e| Error::Session(format!("esearch request failed: {e}")))?
            .error_for_status()
            .map_err(|e| Error::Session(format!("esearch returned an error status: {e}")))?;

        let envelope: EsearchEnvelope = response
            .json()
            .await
            .map_err(|e| Error::Session(format!("esearch response was not valid JSON: {e}")))?;

        let result = envelope
            .result
            .ok_or_else(|| Error::Session("esearch response missing esearchresult".to_string()))?;

        let count = result
            .count
            .as_deref()
            .ok_or_else(|| Error::Session("esearch response missing count".to_string()))?
            .parse::<u64>()
            .map_err(|e| Error::Session(format!("esearch count was not an integer: {e}")))?;
        let web_env = result
            .web_env
            .ok_or_else(|| Error::Session("esearch response missing WebEnv".to_string()))?;
        let query_key = result
            .query_key
            .ok_or_else(|| Error::Session("esearch response missing query key".to_string()))?;

        tracing::info!(count, "search session established");
        Ok(SearchSession::new(web_env, query_key, count))
    }

    /// Fetch one batch window of full-text GenBank records.
    ///
    /// Returns the raw flat-file body; parsing happens at the
    /// [`BatchSource`](crate::fetch::BatchSource) boundary.
    ///
    /// # Errors
    ///
    /// Returns [`Error::RemoteFetch`] on transport failure or a non-success
    /// status.
    pub(crate) async fn fetch_window_text(
        &self,
        session: &SearchSession,
        window: BatchWindow,
    ) -> Result<String> {
        tracing::debug!(window = %window, "issuing efetch");

        let mut params = self.ident_params();
        params.push(("db", self.database.clone()));
        params.push(("rettype", "gb".to_string()));
        params.push(("retmode", "text".to_string()));
        params.push(("retstart", window.start.to_string()));
        params.push(("retmax", window.size.to_string()));
        params.push(("WebEnv", session.web_env().to_string()));
        params.push(("query_key", session.query_key().to_string()));

        let response = self
            .http
            .get(format!("{}/efetch.fcgi", self.base_url))
            .query(&params)
            .send()
            .await
            .map_err(|e| Error::RemoteFetch(format!("efetch request failed: {e}")))?
            .error_for_status()
            .map_err(|e| Error::RemoteFetch(format!("efetch returned an error status: {e}")))?;

        response
            .text()
            .await
            .map_err(|e| Error::RemoteFetch(format!("efetch body could not be read: {e}")))
    }
}

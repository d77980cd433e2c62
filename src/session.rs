//! Server-side search session state and query construction
//!
//! One esearch call with `usehistory=y` stores the full result set on the
//! NCBI side and hands back a WebEnv token plus a query key. Every later
//! efetch call pages through that stored result set instead of re-running
//! the query. The pair is modeled here as an explicit immutable value object
//! passed by reference into the fetch layer, not as ambient state.

use crate::types::RetrievalRequest;

/// Substituted for an absent lower length bound so a single missing bound
/// still yields a valid bounded SLEN clause.
const DEFAULT_MIN_SLEN: u64 = 1;

/// Substituted for an absent upper length bound.
const DEFAULT_MAX_SLEN: u64 = 1_000_000_000;

/// Remote session state established by one successful search call
///
/// Immutable once created; single-writer-then-many-readers (the writer is
/// the search call, the readers are every subsequent fetch). Lives only in
/// memory for the duration of one retrieval run.
#[derive(Clone, Debug)]
pub struct SearchSession {
    web_env: String,
    query_key: String,
    count: u64,
}

impl SearchSession {
    /// Only the search call constructs sessions.
    pub(crate) fn new(web_env: String, query_key: String, count: u64) -> Self {
        Self {
            web_env,
            query_key,
            count,
        }
    }

    /// History token referencing the stored result set
    pub fn web_env(&self) -> &str {
        &self.web_env
    }

    /// Key identifying which stored query to page through
    pub fn query_key(&self) -> &str {
        &self.query_key
    }

    /// Total number of records matched by the search
    pub fn count(&self) -> u64 {
        self.count
    }
}

/// Build the Entrez search term for a retrieval request.
///
/// Always `txid<ID>[Organism]`; when at least one length bound is given, a
/// `AND <min>:<max>[SLEN]` clause is appended with the absent bound replaced
/// by 1 (lower) or 1,000,000,000 (upper). An inverted range is passed
/// through unvalidated and simply matches nothing remotely.
pub fn build_search_term(request: &RetrievalRequest) -> String {
    let mut term = format!("txid{}[Organism]", request.taxon_id);
    if request.min_length.is_some() || request.max_length.is_some() {
        let min = request.min_length.unwrap_or(DEFAULT_MIN_SLEN);
        let max = request.max_length.unwrap_or(DEFAULT_MAX_SLEN);
        term.push_str(&format!(" AND {min}:{max}[SLEN]"));
    }
    term
}

// unwrap/expect are acceptable in tests for concise failure-on-error assertions
#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;

    fn request(min: Option<u64>, max: Option<u64>) -> RetrievalRequest {
        RetrievalRequest {
            taxon_id: "9606".to_string(),
            min_length: min,
            max_length: max,
            record_limit: None,
        }
    }

    #[test]
    fn no_bounds_omits_slen_clause() {
        assert_eq!(build_search_term(&request(None, None)), "txid9606[Organism]");
    }

    #[test]
    fn both_bounds_present() {
        assert_eq!(
            build_search_term(&request(Some(200), Some(5000))),
            "txid9606[Organism] AND 200:5000[SLEN]"
        );
    }

    #[test]
    fn absent_lower_bound_defaults_to_one() {
        assert_eq!(
            build_search_term(&request(None, Some(5000))),
            "txid9606[Organism] AND 1:5000[SLEN]"
        );
    }

    #[test]
    fn absent_upper_bound_defaults_to_billion() {
        assert_eq!(
            build_search_term(&request(Some(200), None)),
            "txid9606[Organism] AND 200:1000000000[SLEN]"
        );
    }

    #[test]
    fn inverted_range_is_passed_through() {
        // Permissive by design: the remote service returns zero matches.
        assert_eq!(
            build_search_term(&request(Some(5000), Some(200))),
            "txid9606[Organism] AND 5000:200[SLEN]"
        );
    }

    #[test]
    fn session_accessors_expose_state() {
        let session = SearchSession::new("MCID_abc".to_string(), "1".to_string(), 1200);
        assert_eq!(session.web_env(), "MCID_abc");
        assert_eq!(session.query_key(), "1");
        assert_eq!(session.count(), 1200);
    }
}

//! Batch fetching and the record-stream boundary
//!
//! The external GenBank parser ([`gb_io`]) consumes the raw efetch body and
//! yields structured records. One fetched batch is exposed as a
//! [`RecordStream`]: a forward-only, single-pass producer. Nothing here
//! materializes records into a collection; that is the orchestrator's sole
//! responsibility, since the downstream writers need multiple passes.

use crate::client::EntrezClient;
use crate::error::{Error, Result};
use crate::session::SearchSession;
use crate::types::{BatchWindow, SequenceRecord};
use async_trait::async_trait;
use gb_io::seq::Seq;
use std::io::Cursor;

/// Forward-only, single-pass sequence of parsed records from one batch
///
/// Not restartable: once consumed, a new batch fetch is required to see the
/// same records again. May be empty when the server returns fewer records
/// than requested (end of results), which is not an error.
pub struct RecordStream {
    inner: Box<dyn Iterator<Item = Result<SequenceRecord>> + Send>,
}

impl RecordStream {
    /// Stream records out of a raw GenBank flat-file body
    pub fn from_genbank_text(body: String) -> Self {
        let reader = gb_io::reader::SeqReader::new(Cursor::new(body.into_bytes()));
        Self {
            inner: Box::new(reader.map(|parsed| match parsed {
                Ok(seq) => Ok(record_from_seq(seq)),
                Err(e) => Err(Error::Parse(e.to_string())),
            })),
        }
    }

    /// Wrap already-structured records; used by fake sources in tests
    pub fn from_records(records: Vec<SequenceRecord>) -> Self {
        Self {
            inner: Box::new(records.into_iter().map(Ok)),
        }
    }
}

impl Iterator for RecordStream {
    type Item = Result<SequenceRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next()
    }
}

/// Map one parsed GenBank entry to the crate's record type.
///
/// The accession prefers the version-qualified identifier (what Entrez
/// reports as `VERSION`), then the bare `ACCESSION`, then the LOCUS name.
/// The length comes from the sequence residues when present, otherwise from
/// the LOCUS length field.
fn record_from_seq(seq: Seq) -> SequenceRecord {
    let accession = seq
        .version
        .or(seq.accession)
        .or(seq.name)
        .unwrap_or_default();
    let length = if seq.seq.is_empty() {
        seq.len.unwrap_or(0) as u64
    } else {
        seq.seq.len() as u64
    };
    SequenceRecord {
        accession,
        length,
        description: seq.definition.unwrap_or_default(),
    }
}

/// One-batch retrieval seam between the orchestrator and the remote service
///
/// The orchestrator only ever talks to this trait, so its sequencing and
/// pacing behavior can be tested against a fake source without network
/// calls.
#[async_trait]
pub trait BatchSource: Send + Sync {
    /// Fetch one batch window against an established session.
    ///
    /// # Errors
    ///
    /// Returns [`Error::RemoteFetch`] when the remote call fails; the stream
    /// itself may later yield [`Error::Parse`] for malformed records.
    async fn fetch_batch(
        &self,
        session: &SearchSession,
        window: BatchWindow,
    ) -> Result<RecordStream>;
}

#[async_trait]
impl BatchSource for EntrezClient {
    async fn fetch_batch(
        &self,
        session: &SearchSession,
        window: BatchWindow,
    ) -> Result<RecordStream> {
        let body = self.fetch_window_text(session, window).await?;
        Ok(RecordStream::from_genbank_text(body))
    }
}

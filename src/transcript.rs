use crate::services::TranscriptFetcher;
use anyhow::Context;
use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, instrument};

/// The JSON document Amazon Transcribe writes when a job completes. Only the fields we read are
/// modeled, everything else (per-word items, confidence scores) is ignored.
#[derive(Debug, Deserialize)]
pub struct TranscriptDocument {
    results: Results,
}

#[derive(Debug, Deserialize)]
struct Results {
    transcripts: Vec<Transcript>,
}

#[derive(Debug, Deserialize)]
struct Transcript {
    transcript: String,
}

impl TranscriptDocument {
    pub fn parse(json: &str) -> Result<Self, anyhow::Error> {
        serde_json::from_str(json).context("parsing transcript document")
    }

    /// The first transcript, exactly as the service produced it.
    pub fn first_transcript(&self) -> Result<&str, anyhow::Error> {
        self.results
            .transcripts
            .first()
            .map(|t| t.transcript.as_str())
            .context("transcript document has no transcripts")
    }
}

/// Fetches result documents over plain HTTP(S). Transcribe hands out pre-signed URIs so no
/// credentials are needed here.
#[derive(Debug, Clone, Default)]
pub struct HttpTranscriptFetcher {
    client: reqwest::Client,
}

impl HttpTranscriptFetcher {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TranscriptFetcher for HttpTranscriptFetcher {
    #[instrument(skip(self, uri))]
    async fn fetch(&self, uri: &str) -> Result<String, anyhow::Error> {
        debug!("requesting transcript document...");
        let res = self
            .client
            .get(uri)
            .send()
            .await
            .context("sending transcript request")?
            .error_for_status()
            .context("transcript request was rejected")?;

        debug!(response = ?res, "received transcript document");

        res.text().await.context("reading transcript response body")
    }
}

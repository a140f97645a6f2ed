//! The managed services a run talks to. Each one is a plain request/response interface so the
//! runner can be driven by the AWS clients in production and by in-memory fakes in tests.

#[cfg(test)]
pub mod fakes;

use async_trait::async_trait;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobStatus {
    InProgress,
    Completed,
    Failed,
}

impl JobStatus {
    /// A terminal job never changes status again.
    pub fn is_terminal(&self) -> bool {
        matches!(self, JobStatus::Completed | JobStatus::Failed)
    }
}

/// A single observation of a transcription job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobState {
    pub status: JobStatus,
    // Only set once the job has completed
    pub transcript_uri: Option<String>,
    pub failure_reason: Option<String>,
}

impl JobState {
    pub fn in_progress() -> Self {
        Self {
            status: JobStatus::InProgress,
            transcript_uri: None,
            failure_reason: None,
        }
    }

    pub fn completed(transcript_uri: impl Into<String>) -> Self {
        Self {
            status: JobStatus::Completed,
            transcript_uri: Some(transcript_uri.into()),
            failure_reason: None,
        }
    }

    pub fn failed(reason: Option<String>) -> Self {
        Self {
            status: JobStatus::Failed,
            transcript_uri: None,
            failure_reason: reason,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranscriptionRequest {
    pub job_name: String,
    pub media_uri: String,
    pub media_format: String,
    pub language_code: String,
}

#[async_trait]
pub trait BlobStore: Send + Sync {
    async fn put(&self, bucket: &str, key: &str, body: Vec<u8>) -> Result<(), anyhow::Error>;
}

#[async_trait]
pub trait TranscriptionService: Send + Sync {
    async fn submit(&self, request: &TranscriptionRequest) -> Result<(), anyhow::Error>;
    async fn status(&self, job_name: &str) -> Result<JobState, anyhow::Error>;
}

/// Downloads the result document a completed job points at.
#[async_trait]
pub trait TranscriptFetcher: Send + Sync {
    async fn fetch(&self, uri: &str) -> Result<String, anyhow::Error>;
}

#[async_trait]
pub trait Translator: Send + Sync {
    async fn translate(
        &self,
        text: &str,
        source_language: &str,
        target_language: &str,
    ) -> Result<String, anyhow::Error>;
}

#[async_trait]
pub trait SpeechSynthesizer: Send + Sync {
    async fn synthesize(
        &self,
        text: &str,
        voice: &str,
        output_format: &str,
    ) -> Result<Vec<u8>, anyhow::Error>;
}

/// The only place a run suspends. Tests swap this out so they don't actually wait.
#[async_trait]
pub trait Sleeper: Send + Sync {
    async fn sleep(&self, duration: Duration);
}

#[derive(Debug, Clone, Copy, Default)]
pub struct TokioSleeper;

#[async_trait]
impl Sleeper for TokioSleeper {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await
    }
}

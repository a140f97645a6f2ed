use crate::artifact::Artifact;
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Errors coming back from the external services. Adapters speak `anyhow`, the runner stores the
/// boxed form so it can sit behind `#[source]`.
pub type ServiceError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// The five steps of a run, in the order they execute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Upload,
    Transcribe,
    Translate,
    Synthesize,
    UploadResults,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Upload => "upload",
            Stage::Transcribe => "transcribe",
            Stage::Translate => "translate",
            Stage::Synthesize => "synthesize",
            Stage::UploadResults => "upload-results",
        };
        f.write_str(name)
    }
}

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("failed to upload source audio to {key}")]
    UploadSource {
        key: String,
        #[source]
        source: ServiceError,
    },

    #[error("failed to upload {artifact} to {key}")]
    UploadArtifact {
        artifact: Artifact,
        key: String,
        #[source]
        source: ServiceError,
    },

    #[error("failed to start transcription job {job_name}")]
    SubmitJob {
        job_name: String,
        #[source]
        source: ServiceError,
    },

    #[error("failed to check the status of transcription job {job_name}")]
    PollStatus {
        job_name: String,
        #[source]
        source: ServiceError,
    },

    #[error("transcription job {job_name} failed: {}", .reason.as_deref().unwrap_or("no reason given"))]
    JobFailed {
        job_name: String,
        reason: Option<String>,
    },

    #[error("transcription job {job_name} still wasn't finished after {attempts} status checks")]
    PollAttemptsExhausted { job_name: String, attempts: u32 },

    #[error("transcription job {job_name} completed without a transcript URI")]
    MissingTranscriptUri { job_name: String },

    #[error("failed to download the transcript from {uri}")]
    FetchTranscript {
        uri: String,
        #[source]
        source: ServiceError,
    },

    #[error("failed to read a transcript out of the result document")]
    ParseTranscript {
        #[source]
        source: ServiceError,
    },

    #[error("failed to write {}", .path.display())]
    WriteLocal {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to translate the transcript")]
    Translate {
        #[source]
        source: ServiceError,
    },

    #[error("failed to synthesize speech from the translation")]
    Synthesize {
        #[source]
        source: ServiceError,
    },

    #[error("synthesized audio is missing from {}", .path.display())]
    MissingOutput { path: PathBuf },
}

impl PipelineError {
    pub fn stage(&self) -> Stage {
        match self {
            PipelineError::UploadSource { .. } => Stage::Upload,
            PipelineError::SubmitJob { .. }
            | PipelineError::PollStatus { .. }
            | PipelineError::JobFailed { .. }
            | PipelineError::PollAttemptsExhausted { .. }
            | PipelineError::MissingTranscriptUri { .. }
            | PipelineError::FetchTranscript { .. }
            | PipelineError::ParseTranscript { .. } => Stage::Transcribe,
            PipelineError::Translate { .. } => Stage::Translate,
            PipelineError::Synthesize { .. } | PipelineError::MissingOutput { .. } => {
                Stage::Synthesize
            }
            PipelineError::UploadArtifact { .. } => Stage::UploadResults,
            // Scratch files are written by whichever stage produced the artifact, but a failure
            // there always means the results never made it to storage.
            PipelineError::WriteLocal { .. } => Stage::UploadResults,
        }
    }

    // Every failure is fatal and maps to the same status. Nothing is retried.
    pub fn exit_code(&self) -> u8 {
        1
    }
}

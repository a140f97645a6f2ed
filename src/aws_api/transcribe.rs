use crate::services::{JobState, JobStatus, TranscriptionRequest, TranscriptionService};
use anyhow::Context;
use async_trait::async_trait;
use aws_sdk_transcribe::model::{
    LanguageCode, Media, MediaFormat, TranscriptionJob, TranscriptionJobStatus,
};
use tracing::{debug, instrument, trace};

pub struct TranscribeJobs {
    client: aws_sdk_transcribe::Client,
}

impl TranscribeJobs {
    pub fn new(client: aws_sdk_transcribe::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl TranscriptionService for TranscribeJobs {
    #[instrument(skip(self))]
    async fn submit(&self, request: &TranscriptionRequest) -> Result<(), anyhow::Error> {
        let media = Media::builder()
            .media_file_uri(&request.media_uri)
            .build();
        let _ = self
            .client
            .start_transcription_job()
            .transcription_job_name(&request.job_name)
            .media(media)
            .media_format(MediaFormat::from(request.media_format.as_str()))
            .language_code(LanguageCode::from(request.language_code.as_str()))
            .send()
            .await?;
        debug!("started transcription job");

        Ok(())
    }

    #[instrument(skip(self))]
    async fn status(&self, job_name: &str) -> Result<JobState, anyhow::Error> {
        let output = self
            .client
            .get_transcription_job()
            .transcription_job_name(job_name)
            .send()
            .await?;
        let job = output
            .transcription_job()
            .context("response is missing the transcription job")?;

        Ok(job_state(job))
    }
}

fn job_state(job: &TranscriptionJob) -> JobState {
    match job.transcription_job_status() {
        Some(TranscriptionJobStatus::Completed) => JobState {
            status: JobStatus::Completed,
            transcript_uri: job
                .transcript()
                .and_then(|t| t.transcript_file_uri())
                .map(ToOwned::to_owned),
            failure_reason: None,
        },
        Some(TranscriptionJobStatus::Failed) => {
            JobState::failed(job.failure_reason().map(ToOwned::to_owned))
        }
        // Queued and in progress jobs both still need waiting on
        other => {
            trace!(status = ?other, "job isn't finished");
            JobState::in_progress()
        }
    }
}

use crate::artifact::{self, Artifact};
use crate::config::PipelineConfig;
use crate::error::{PipelineError, ServiceError, Stage};
use crate::poll::wait_for_terminal_state;
use crate::services::{
    BlobStore, JobStatus, Sleeper, SpeechSynthesizer, TokioSleeper, TranscriptFetcher,
    TranscriptionRequest, TranscriptionService, Translator,
};
use crate::transcript::TranscriptDocument;
use anyhow::anyhow;
use std::path::{Path, PathBuf};
use tracing::{debug, info, instrument};

/// What a successful run produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineReport {
    pub job_name: String,
    pub transcript: String,
    pub translation: String,
    // In upload order, source audio first
    pub uploaded_keys: Vec<String>,
}

/// Runs upload → transcribe → translate → synthesize → upload-results, in that order, stopping at
/// the first failure. Nothing that was already uploaded is removed when a later stage fails.
pub struct Pipeline {
    config: PipelineConfig,
    media_format: &'static str,
    job_name: Option<String>,
    store: Box<dyn BlobStore>,
    transcriber: Box<dyn TranscriptionService>,
    fetcher: Box<dyn TranscriptFetcher>,
    translator: Box<dyn Translator>,
    synthesizer: Box<dyn SpeechSynthesizer>,
    sleeper: Box<dyn Sleeper>,
}

impl Pipeline {
    pub fn builder() -> Builder {
        Builder::new()
    }

    #[instrument(
        name = "pipeline",
        skip(self),
        fields(bucket = %self.config.bucket, filename = %self.config.filename)
    )]
    pub async fn run(&self) -> Result<PipelineReport, PipelineError> {
        let mut uploaded_keys = Vec::with_capacity(4);

        info!(stage = %Stage::Upload, "uploading audio to S3...");
        let source_key = artifact::source_key(&self.config.filename);
        self.upload_source(&source_key).await?;
        uploaded_keys.push(source_key.clone());

        let job_name = self.job_name();
        info!(stage = %Stage::Transcribe, job_name, "starting transcription...");
        let transcript = self.transcribe(&job_name, &source_key).await?;
        info!(transcript, "transcribed text");
        uploaded_keys.push(
            self.persist_and_upload(Artifact::Transcript, transcript.as_bytes())
                .await?,
        );

        info!(
            stage = %Stage::Translate,
            from = %self.config.source_language,
            to = %self.config.target_language,
            "translating transcript..."
        );
        let translation = self
            .translator
            .translate(
                &transcript,
                &self.config.source_language,
                &self.config.target_language,
            )
            .await
            .map_err(|e| PipelineError::Translate { source: e.into() })?;
        info!(translation, "translated text");
        uploaded_keys.push(
            self.persist_and_upload(Artifact::Translation, translation.as_bytes())
                .await?,
        );

        info!(stage = %Stage::Synthesize, voice = %self.config.voice, "synthesizing speech...");
        let audio = self
            .synthesizer
            .synthesize(&translation, &self.config.voice, &self.config.output_format)
            .await
            .map_err(|e| PipelineError::Synthesize { source: e.into() })?;
        let audio_path = self.persist(Artifact::SynthesizedAudio, &audio).await?;
        if self.config.verify_output {
            ensure_exists(&audio_path).await?;
        }
        uploaded_keys.push(
            self.upload_artifact(Artifact::SynthesizedAudio, &audio_path)
                .await?,
        );

        info!(uploaded = uploaded_keys.len(), "all steps completed");

        Ok(PipelineReport {
            job_name,
            transcript,
            translation,
            uploaded_keys,
        })
    }

    fn job_name(&self) -> String {
        self.job_name.clone().unwrap_or_else(|| {
            format!(
                "{}_{}",
                self.config.job_name_prefix,
                chrono::Utc::now().timestamp()
            )
        })
    }

    async fn upload_source(&self, key: &str) -> Result<(), PipelineError> {
        let upload_error = |source: ServiceError| PipelineError::UploadSource {
            key: key.to_owned(),
            source,
        };
        let path = self.config.source_path();
        let body = tokio::fs::read(&path).await.map_err(|e| {
            upload_error(anyhow!(e).context(format!("reading {}", path.display())).into())
        })?;

        self.store
            .put(&self.config.bucket, key, body)
            .await
            .map_err(|e| upload_error(e.into()))
    }

    async fn transcribe(&self, job_name: &str, source_key: &str) -> Result<String, PipelineError> {
        let request = TranscriptionRequest {
            job_name: job_name.to_owned(),
            media_uri: artifact::s3_uri(&self.config.bucket, source_key),
            media_format: self.media_format.to_owned(),
            language_code: self.config.transcription_language.clone(),
        };
        self.transcriber
            .submit(&request)
            .await
            .map_err(|e| PipelineError::SubmitJob {
                job_name: job_name.to_owned(),
                source: e.into(),
            })?;

        let state = wait_for_terminal_state(
            self.transcriber.as_ref(),
            self.sleeper.as_ref(),
            job_name,
            &self.config.poll_policy(),
        )
        .await?;
        if state.status == JobStatus::Failed {
            return Err(PipelineError::JobFailed {
                job_name: job_name.to_owned(),
                reason: state.failure_reason,
            });
        }

        let uri = state
            .transcript_uri
            .ok_or_else(|| PipelineError::MissingTranscriptUri {
                job_name: job_name.to_owned(),
            })?;
        debug!(uri, "downloading transcript...");
        let document = self
            .fetcher
            .fetch(&uri)
            .await
            .map_err(|e| PipelineError::FetchTranscript {
                uri: uri.clone(),
                source: e.into(),
            })?;

        TranscriptDocument::parse(&document)
            .and_then(|doc| doc.first_transcript().map(ToOwned::to_owned))
            .map_err(|e| PipelineError::ParseTranscript { source: e.into() })
    }

    async fn persist_and_upload(
        &self,
        artifact: Artifact,
        contents: &[u8],
    ) -> Result<String, PipelineError> {
        let path = self.persist(artifact, contents).await?;
        self.upload_artifact(artifact, &path).await
    }

    async fn persist(
        &self,
        artifact: Artifact,
        contents: &[u8],
    ) -> Result<PathBuf, PipelineError> {
        let path = self
            .config
            .scratch_path(&artifact.local_file_name(&self.config.output_format));
        tokio::fs::write(&path, contents)
            .await
            .map_err(|source| PipelineError::WriteLocal {
                path: path.clone(),
                source,
            })?;
        debug!(path = %path.display(), bytes = contents.len(), "saved {artifact} locally");

        Ok(path)
    }

    // Uploads what's on disk rather than what's in memory, so the bucket always matches the
    // scratch files.
    async fn upload_artifact(
        &self,
        artifact: Artifact,
        path: &Path,
    ) -> Result<String, PipelineError> {
        let key = artifact.key(
            &self.config.output_prefix,
            &self.config.filename,
            &self.config.target_language,
            &self.config.output_format,
        );
        let upload_error = |source: ServiceError| PipelineError::UploadArtifact {
            artifact,
            key: key.clone(),
            source,
        };

        let body = tokio::fs::read(path).await.map_err(|e| {
            upload_error(anyhow!(e).context(format!("reading {}", path.display())).into())
        })?;
        info!(stage = %Stage::UploadResults, key, "uploading {artifact} to S3...");
        self.store
            .put(&self.config.bucket, &key, body)
            .await
            .map_err(|e| upload_error(e.into()))?;

        Ok(key)
    }
}

async fn ensure_exists(path: &Path) -> Result<(), PipelineError> {
    match tokio::fs::metadata(path).await {
        Ok(metadata) if metadata.is_file() => Ok(()),
        _ => Err(PipelineError::MissingOutput {
            path: path.to_path_buf(),
        }),
    }
}

pub struct Builder {
    config: Option<PipelineConfig>,
    job_name: Option<String>,
    store: Option<Box<dyn BlobStore>>,
    transcriber: Option<Box<dyn TranscriptionService>>,
    fetcher: Option<Box<dyn TranscriptFetcher>>,
    translator: Option<Box<dyn Translator>>,
    synthesizer: Option<Box<dyn SpeechSynthesizer>>,
    sleeper: Option<Box<dyn Sleeper>>,
}

impl Builder {
    pub fn new() -> Self {
        Self {
            config: None,
            job_name: None,
            store: None,
            transcriber: None,
            fetcher: None,
            translator: None,
            synthesizer: None,
            sleeper: None,
        }
    }

    pub fn config(mut self, config: PipelineConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Use a fixed job name instead of one stamped with the current time.
    pub fn job_name(mut self, job_name: impl Into<String>) -> Self {
        self.job_name = Some(job_name.into());
        self
    }

    pub fn store(mut self, store: impl BlobStore + 'static) -> Self {
        self.store = Some(Box::new(store));
        self
    }

    pub fn transcriber(mut self, transcriber: impl TranscriptionService + 'static) -> Self {
        self.transcriber = Some(Box::new(transcriber));
        self
    }

    pub fn fetcher(mut self, fetcher: impl TranscriptFetcher + 'static) -> Self {
        self.fetcher = Some(Box::new(fetcher));
        self
    }

    pub fn translator(mut self, translator: impl Translator + 'static) -> Self {
        self.translator = Some(Box::new(translator));
        self
    }

    pub fn synthesizer(mut self, synthesizer: impl SpeechSynthesizer + 'static) -> Self {
        self.synthesizer = Some(Box::new(synthesizer));
        self
    }

    // Defaults to really sleeping
    pub fn sleeper(mut self, sleeper: impl Sleeper + 'static) -> Self {
        self.sleeper = Some(Box::new(sleeper));
        self
    }

    pub fn build(self) -> Result<Pipeline, anyhow::Error> {
        let config = self.config.ok_or_else(|| anyhow!("config is required"))?;
        let media_format = config.media_format()?;

        Ok(Pipeline {
            config,
            media_format,
            job_name: self.job_name,
            store: self.store.ok_or_else(|| anyhow!("store is required"))?,
            transcriber: self
                .transcriber
                .ok_or_else(|| anyhow!("transcriber is required"))?,
            fetcher: self.fetcher.ok_or_else(|| anyhow!("fetcher is required"))?,
            translator: self
                .translator
                .ok_or_else(|| anyhow!("translator is required"))?,
            synthesizer: self
                .synthesizer
                .ok_or_else(|| anyhow!("synthesizer is required"))?,
            sleeper: self.sleeper.unwrap_or_else(|| Box::new(TokioSleeper)),
        })
    }
}

impl Default for Builder {
    fn default() -> Self {
        Self::new()
    }
}

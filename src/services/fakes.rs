//! In-memory stand-ins for the managed services. Every fake is cheap to clone and clones share
//! their recorded calls, so a test can hand one copy to the pipeline and inspect the other.

use super::{
    BlobStore, JobState, Sleeper, SpeechSynthesizer, TranscriptFetcher, TranscriptionRequest,
    TranscriptionService, Translator,
};
use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredObject {
    pub bucket: String,
    pub key: String,
    pub body: Vec<u8>,
}

#[derive(Clone, Default)]
pub struct FakeStore {
    objects: Arc<Mutex<Vec<StoredObject>>>,
    failing_key: Option<String>,
}

impl FakeStore {
    pub fn failing_on(key: impl Into<String>) -> Self {
        Self {
            failing_key: Some(key.into()),
            ..Default::default()
        }
    }

    pub fn objects(&self) -> Vec<StoredObject> {
        self.objects.lock().unwrap().clone()
    }

    pub fn keys(&self) -> Vec<String> {
        self.objects().into_iter().map(|o| o.key).collect()
    }

    pub fn body(&self, key: &str) -> Option<Vec<u8>> {
        self.objects()
            .into_iter()
            .find(|o| o.key == key)
            .map(|o| o.body)
    }
}

#[async_trait]
impl BlobStore for FakeStore {
    async fn put(&self, bucket: &str, key: &str, body: Vec<u8>) -> Result<(), anyhow::Error> {
        if self.failing_key.as_deref() == Some(key) {
            anyhow::bail!("access denied for {key}");
        }

        self.objects.lock().unwrap().push(StoredObject {
            bucket: bucket.to_owned(),
            key: key.to_owned(),
            body,
        });

        Ok(())
    }
}

/// Replays a script of job states. The last state repeats forever once the script runs out.
#[derive(Clone, Default)]
pub struct FakeTranscriber {
    script: Arc<Mutex<VecDeque<JobState>>>,
    submitted: Arc<Mutex<Vec<TranscriptionRequest>>>,
    status_queries: Arc<Mutex<Vec<String>>>,
    fail_submit: bool,
    fail_status_on_query: Option<usize>,
}

impl FakeTranscriber {
    pub fn with_script(script: impl IntoIterator<Item = JobState>) -> Self {
        Self {
            script: Arc::new(Mutex::new(script.into_iter().collect())),
            ..Default::default()
        }
    }

    /// `in_progress` non-terminal observations, then `last`.
    pub fn finishing_after(in_progress: usize, last: JobState) -> Self {
        let script = std::iter::repeat(JobState::in_progress())
            .take(in_progress)
            .chain(std::iter::once(last));
        Self::with_script(script)
    }

    pub fn failing_submit(mut self) -> Self {
        self.fail_submit = true;
        self
    }

    /// The status call numbered `query` (starting at 1) errors instead of answering.
    pub fn failing_status_on(mut self, query: usize) -> Self {
        self.fail_status_on_query = Some(query);
        self
    }

    pub fn submitted(&self) -> Vec<TranscriptionRequest> {
        self.submitted.lock().unwrap().clone()
    }

    pub fn status_queries(&self) -> Vec<String> {
        self.status_queries.lock().unwrap().clone()
    }
}

#[async_trait]
impl TranscriptionService for FakeTranscriber {
    async fn submit(&self, request: &TranscriptionRequest) -> Result<(), anyhow::Error> {
        if self.fail_submit {
            anyhow::bail!("limit exceeded");
        }
        self.submitted.lock().unwrap().push(request.clone());

        Ok(())
    }

    async fn status(&self, job_name: &str) -> Result<JobState, anyhow::Error> {
        let query = {
            let mut queries = self.status_queries.lock().unwrap();
            queries.push(job_name.to_owned());
            queries.len()
        };
        if self.fail_status_on_query == Some(query) {
            anyhow::bail!("throttled");
        }

        let mut script = self.script.lock().unwrap();
        let state = if script.len() > 1 {
            script.pop_front()
        } else {
            script.front().cloned()
        };

        state.ok_or_else(|| anyhow::anyhow!("no such job {job_name}"))
    }
}

#[derive(Clone, Default)]
pub struct FakeFetcher {
    documents: Arc<HashMap<String, String>>,
    requested: Arc<Mutex<Vec<String>>>,
}

impl FakeFetcher {
    pub fn serving(uri: impl Into<String>, document: impl Into<String>) -> Self {
        let mut documents = HashMap::new();
        documents.insert(uri.into(), document.into());
        Self {
            documents: Arc::new(documents),
            ..Default::default()
        }
    }

    pub fn requested(&self) -> Vec<String> {
        self.requested.lock().unwrap().clone()
    }
}

#[async_trait]
impl TranscriptFetcher for FakeFetcher {
    async fn fetch(&self, uri: &str) -> Result<String, anyhow::Error> {
        self.requested.lock().unwrap().push(uri.to_owned());
        self.documents
            .get(uri)
            .cloned()
            .ok_or_else(|| anyhow::anyhow!("404 for {uri}"))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslationCall {
    pub text: String,
    pub source_language: String,
    pub target_language: String,
}

#[derive(Clone, Default)]
pub struct FakeTranslator {
    reply: Option<String>,
    calls: Arc<Mutex<Vec<TranslationCall>>>,
}

impl FakeTranslator {
    pub fn replying(reply: impl Into<String>) -> Self {
        Self {
            reply: Some(reply.into()),
            ..Default::default()
        }
    }

    pub fn failing() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> Vec<TranslationCall> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl Translator for FakeTranslator {
    async fn translate(
        &self,
        text: &str,
        source_language: &str,
        target_language: &str,
    ) -> Result<String, anyhow::Error> {
        self.calls.lock().unwrap().push(TranslationCall {
            text: text.to_owned(),
            source_language: source_language.to_owned(),
            target_language: target_language.to_owned(),
        });
        self.reply
            .clone()
            .ok_or_else(|| anyhow::anyhow!("unsupported language pair"))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SynthesisCall {
    pub text: String,
    pub voice: String,
    pub output_format: String,
}

#[derive(Clone, Default)]
pub struct FakeSynthesizer {
    audio: Option<Vec<u8>>,
    calls: Arc<Mutex<Vec<SynthesisCall>>>,
}

impl FakeSynthesizer {
    pub fn returning(audio: impl Into<Vec<u8>>) -> Self {
        Self {
            audio: Some(audio.into()),
            ..Default::default()
        }
    }

    pub fn failing() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> Vec<SynthesisCall> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl SpeechSynthesizer for FakeSynthesizer {
    async fn synthesize(
        &self,
        text: &str,
        voice: &str,
        output_format: &str,
    ) -> Result<Vec<u8>, anyhow::Error> {
        self.calls.lock().unwrap().push(SynthesisCall {
            text: text.to_owned(),
            voice: voice.to_owned(),
            output_format: output_format.to_owned(),
        });
        self.audio
            .clone()
            .ok_or_else(|| anyhow::anyhow!("text length exceeded"))
    }
}

/// Records how long it was asked to wait and returns immediately.
#[derive(Clone, Default)]
pub struct RecordingSleeper {
    sleeps: Arc<Mutex<Vec<Duration>>>,
}

impl RecordingSleeper {
    pub fn sleeps(&self) -> Vec<Duration> {
        self.sleeps.lock().unwrap().clone()
    }
}

#[async_trait]
impl Sleeper for RecordingSleeper {
    async fn sleep(&self, duration: Duration) {
        self.sleeps.lock().unwrap().push(duration);
    }
}

use crate::services::SpeechSynthesizer;
use anyhow::Context;
use async_trait::async_trait;
use aws_sdk_polly::model::{OutputFormat, VoiceId};
use tracing::{debug, instrument};

pub struct PollySynthesizer {
    client: aws_sdk_polly::Client,
}

impl PollySynthesizer {
    pub fn new(client: aws_sdk_polly::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl SpeechSynthesizer for PollySynthesizer {
    #[instrument(skip(self, text))]
    async fn synthesize(
        &self,
        text: &str,
        voice: &str,
        output_format: &str,
    ) -> Result<Vec<u8>, anyhow::Error> {
        let speech = self
            .client
            .synthesize_speech()
            .text(text)
            .voice_id(VoiceId::from(voice))
            .output_format(OutputFormat::from(output_format))
            .send()
            .await?;

        let audio = speech
            .audio_stream
            .collect()
            .await
            .context("reading synthesized audio stream")?
            .into_bytes();
        debug!(bytes = audio.len(), "received synthesized audio");

        Ok(audio.to_vec())
    }
}

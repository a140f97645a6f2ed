use crate::services::Translator;
use anyhow::Context;
use async_trait::async_trait;
use tracing::instrument;

pub struct AwsTranslator {
    client: aws_sdk_translate::Client,
}

impl AwsTranslator {
    pub fn new(client: aws_sdk_translate::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Translator for AwsTranslator {
    #[instrument(skip(self, text), fields(chars = text.chars().count()))]
    async fn translate(
        &self,
        text: &str,
        source_language: &str,
        target_language: &str,
    ) -> Result<String, anyhow::Error> {
        let output = self
            .client
            .translate_text()
            .text(text)
            .source_language_code(source_language)
            .target_language_code(target_language)
            .send()
            .await?;

        output
            .translated_text()
            .map(ToOwned::to_owned)
            .context("translation response had no text")
    }
}

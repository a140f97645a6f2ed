pub mod args;
pub mod artifact;
pub mod aws_api;
pub mod config;
pub mod error;
pub mod pipeline;
pub mod poll;
pub mod services;
pub mod transcript;

use crate::args::Args;
use crate::aws_api::{AwsClients, AwsTranslator, PollySynthesizer, S3Store, TranscribeJobs};
use crate::config::PipelineConfig;
use crate::error::PipelineError;
use crate::pipeline::Pipeline;
use crate::transcript::HttpTranscriptFetcher;
use anyhow::Context;
use std::process::ExitCode;
use tracing::{error, info, trace};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    // A .env file is optional, everything can come from the real environment or flags
    let _ = dotenv::dotenv();
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let args = Args::parse();

    match run(&args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            match err.downcast_ref::<PipelineError>() {
                Some(pipeline_err) => error!(stage = %pipeline_err.stage(), "{err:#}"),
                None => error!("{err:#}"),
            }
            ExitCode::from(exit_code(&err))
        }
    }
}

/// Failed runs exit with the pipeline error's status, anything that went wrong before the
/// pipeline started exits with 1.
fn exit_code(err: &anyhow::Error) -> u8 {
    err.downcast_ref::<PipelineError>()
        .map_or(1, PipelineError::exit_code)
}

async fn run(args: &Args) -> Result<(), anyhow::Error> {
    let config = PipelineConfig::from_env(args).context("loading configuration")?;
    trace!(?config, "resolved configuration");

    let clients = AwsClients::load(config.region.as_deref()).await;
    let pipeline = Pipeline::builder()
        .config(config)
        .store(S3Store::new(clients.s3))
        .transcriber(TranscribeJobs::new(clients.transcribe))
        .fetcher(HttpTranscriptFetcher::new())
        .translator(AwsTranslator::new(clients.translate))
        .synthesizer(PollySynthesizer::new(clients.polly))
        .build()?;

    let report = pipeline.run().await?;
    info!(
        job_name = report.job_name,
        "audio processing complete, uploaded {}",
        report.uploaded_keys.join(", ")
    );

    Ok(())
}

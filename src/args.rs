use clap::Parser;
use std::path::{Path, PathBuf};

/// A clap args struct containing the command line arguments for this program
#[derive(Parser, Debug, Default)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// The S3 bucket that receives the source audio and every artifact.
    /// If not provided, the AWS_S3_BUCKET environment variable will be used.
    #[clap(long)]
    bucket: Option<String>,

    /// The AWS region to send requests to.
    /// If not provided, the AWS_REGION environment variable will be used.
    /// Defaults to whatever the AWS SDK's default region chain resolves.
    #[clap(long)]
    region: Option<String>,

    /// The name of the audio file to process, relative to the working directory.
    /// If not provided, the AUDIO_FILENAME environment variable will be used.
    /// Defaults to "sample.mp3".
    #[clap(long)]
    filename: Option<String>,

    /// The directory holding the source audio and receiving the scratch files.
    /// If not provided, the WORK_DIR environment variable will be used.
    /// Defaults to the current directory.
    #[clap(long)]
    work_dir: Option<PathBuf>,

    /// The key prefix results are uploaded under.
    /// If not provided, the OUTPUT_PREFIX environment variable will be used.
    /// Defaults to "beta".
    #[clap(long)]
    prefix: Option<String>,

    /// The Polly voice used to speak the translation.
    /// If not provided, the POLLY_VOICE environment variable will be used.
    /// Defaults to "Penelope".
    #[clap(long)]
    voice: Option<String>,

    /// How many seconds to wait between transcription status checks.
    /// If not provided, the POLL_INTERVAL_SECS environment variable will be used.
    /// Defaults to 5.
    #[clap(long)]
    poll_interval_secs: Option<u64>,

    /// Give up on the transcription job after this many status checks.
    /// If not provided, the MAX_POLL_ATTEMPTS environment variable will be used.
    /// Defaults to waiting forever.
    #[clap(long)]
    max_poll_attempts: Option<u32>,

    /// When passed, don't check that the synthesized audio was written to disk before uploading it.
    #[clap(long, default_value_t = false)]
    skip_output_check: bool,
}

impl Args {
    pub fn parse() -> Self {
        Parser::parse()
    }

    pub fn bucket(&self) -> Option<&str> {
        self.bucket.as_deref()
    }

    pub fn region(&self) -> Option<&str> {
        self.region.as_deref()
    }

    pub fn filename(&self) -> Option<&str> {
        self.filename.as_deref()
    }

    pub fn work_dir(&self) -> Option<&Path> {
        self.work_dir.as_deref()
    }

    pub fn prefix(&self) -> Option<&str> {
        self.prefix.as_deref()
    }

    pub fn voice(&self) -> Option<&str> {
        self.voice.as_deref()
    }

    pub fn poll_interval_secs(&self) -> Option<u64> {
        self.poll_interval_secs
    }

    pub fn max_poll_attempts(&self) -> Option<u32> {
        self.max_poll_attempts
    }

    pub fn skip_output_check(&self) -> bool {
        self.skip_output_check
    }
}

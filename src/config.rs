use crate::args::Args;
use crate::poll::{PollPolicy, DEFAULT_POLL_INTERVAL};
use std::{
    env,
    num::ParseIntError,
    path::{Path, PathBuf},
    time::Duration,
};
use thiserror::Error;

const DEFAULT_FILENAME: &str = "sample.mp3";
// Promoting a run to production means passing "prod" instead
const DEFAULT_OUTPUT_PREFIX: &str = "beta";
const DEFAULT_TRANSCRIPTION_LANGUAGE: &str = "en-US";
const DEFAULT_SOURCE_LANGUAGE: &str = "en";
const DEFAULT_TARGET_LANGUAGE: &str = "es";
const DEFAULT_VOICE: &str = "Penelope";
const DEFAULT_OUTPUT_FORMAT: &str = "mp3";
const DEFAULT_JOB_NAME_PREFIX: &str = "job";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("no bucket configured, pass --bucket or set AWS_S3_BUCKET")]
    MissingBucket,

    #[error("{var} must be a whole number, got {value:?}")]
    InvalidNumber {
        var: &'static str,
        value: String,
        #[source]
        source: ParseIntError,
    },

    #[error("{setting} must be greater than zero")]
    NotPositive { setting: &'static str },

    #[error("can't tell the media format of {filename:?}, expected one of mp3, mp4, m4a, wav, flac, ogg, amr or webm")]
    UnsupportedMediaFormat { filename: String },
}

/// Everything a run needs to know up front. Fields are public so callers can start from
/// [`PipelineConfig::new`] and change what they need.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineConfig {
    pub bucket: String,
    pub region: Option<String>,
    pub filename: String,
    pub work_dir: PathBuf,
    pub output_prefix: String,
    pub transcription_language: String,
    pub source_language: String,
    pub target_language: String,
    pub voice: String,
    pub output_format: String,
    pub poll_interval: Duration,
    pub max_poll_attempts: Option<u32>,
    pub job_name_prefix: String,
    pub verify_output: bool,
}

impl PipelineConfig {
    pub fn new(bucket: impl Into<String>) -> Self {
        Self {
            bucket: bucket.into(),
            region: None,
            filename: DEFAULT_FILENAME.to_owned(),
            work_dir: PathBuf::from("."),
            output_prefix: DEFAULT_OUTPUT_PREFIX.to_owned(),
            transcription_language: DEFAULT_TRANSCRIPTION_LANGUAGE.to_owned(),
            source_language: DEFAULT_SOURCE_LANGUAGE.to_owned(),
            target_language: DEFAULT_TARGET_LANGUAGE.to_owned(),
            voice: DEFAULT_VOICE.to_owned(),
            output_format: DEFAULT_OUTPUT_FORMAT.to_owned(),
            poll_interval: DEFAULT_POLL_INTERVAL,
            max_poll_attempts: None,
            job_name_prefix: DEFAULT_JOB_NAME_PREFIX.to_owned(),
            verify_output: true,
        }
    }

    /// Command line flags win over environment variables, which win over the defaults.
    pub fn from_env(args: &Args) -> Result<Self, ConfigError> {
        Self::from_lookup(args, |key| env::var(key).ok())
    }

    pub fn from_lookup(
        args: &Args,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        let bucket = args
            .bucket()
            .map(ToOwned::to_owned)
            .or_else(|| lookup("AWS_S3_BUCKET"))
            .filter(|b| !b.is_empty())
            .ok_or(ConfigError::MissingBucket)?;

        let mut config = Self::new(bucket);
        config.region = args
            .region()
            .map(ToOwned::to_owned)
            .or_else(|| lookup("AWS_REGION"));
        if let Some(filename) = args
            .filename()
            .map(ToOwned::to_owned)
            .or_else(|| lookup("AUDIO_FILENAME"))
        {
            config.filename = filename;
        }
        if let Some(work_dir) = args
            .work_dir()
            .map(Path::to_path_buf)
            .or_else(|| lookup("WORK_DIR").map(PathBuf::from))
        {
            config.work_dir = work_dir;
        }
        if let Some(prefix) = args
            .prefix()
            .map(ToOwned::to_owned)
            .or_else(|| lookup("OUTPUT_PREFIX"))
        {
            config.output_prefix = prefix;
        }
        if let Some(voice) = args
            .voice()
            .map(ToOwned::to_owned)
            .or_else(|| lookup("POLLY_VOICE"))
        {
            config.voice = voice;
        }

        let poll_interval_secs = match args.poll_interval_secs() {
            Some(secs) => Some(secs),
            None => parse_var(&lookup, "POLL_INTERVAL_SECS")?,
        };
        if let Some(secs) = poll_interval_secs {
            if secs == 0 {
                return Err(ConfigError::NotPositive {
                    setting: "poll interval",
                });
            }
            config.poll_interval = Duration::from_secs(secs);
        }
        config.max_poll_attempts = match args.max_poll_attempts() {
            Some(attempts) => Some(attempts),
            None => parse_var(&lookup, "MAX_POLL_ATTEMPTS")?,
        };
        if config.max_poll_attempts == Some(0) {
            return Err(ConfigError::NotPositive {
                setting: "max poll attempts",
            });
        }
        config.verify_output = !args.skip_output_check();

        // Fail before touching AWS rather than after uploading the source audio
        config.media_format()?;

        Ok(config)
    }

    /// Transcribe's name for the source audio's format, taken from the filename's extension.
    pub fn media_format(&self) -> Result<&'static str, ConfigError> {
        let extension = Path::new(&self.filename)
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_lowercase);

        let format = match extension.as_deref() {
            Some("mp3") => "mp3",
            Some("mp4") | Some("m4a") => "mp4",
            Some("wav") => "wav",
            Some("flac") => "flac",
            Some("ogg") => "ogg",
            Some("amr") => "amr",
            Some("webm") => "webm",
            _ => {
                return Err(ConfigError::UnsupportedMediaFormat {
                    filename: self.filename.clone(),
                })
            }
        };

        Ok(format)
    }

    pub fn source_path(&self) -> PathBuf {
        self.work_dir.join(&self.filename)
    }

    pub fn scratch_path(&self, file_name: &str) -> PathBuf {
        self.work_dir.join(file_name)
    }

    pub fn poll_policy(&self) -> PollPolicy {
        PollPolicy {
            interval: self.poll_interval,
            max_attempts: self.max_poll_attempts,
        }
    }
}

fn parse_var<T>(
    lookup: &impl Fn(&str) -> Option<String>,
    var: &'static str,
) -> Result<Option<T>, ConfigError>
where
    T: std::str::FromStr<Err = ParseIntError>,
{
    lookup(var)
        .map(|value| {
            value
                .trim()
                .parse()
                .map_err(|source| ConfigError::InvalidNumber { var, value, source })
        })
        .transpose()
}

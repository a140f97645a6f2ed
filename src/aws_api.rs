mod polly;
mod s3;
mod transcribe;
mod translate;

pub use polly::PollySynthesizer;
pub use s3::S3Store;
pub use transcribe::TranscribeJobs;
pub use translate::AwsTranslator;

use tracing::{debug, instrument};

/// One client per service, all sharing a single credentials and region lookup.
pub struct AwsClients {
    pub s3: aws_sdk_s3::Client,
    pub transcribe: aws_sdk_transcribe::Client,
    pub translate: aws_sdk_translate::Client,
    pub polly: aws_sdk_polly::Client,
}

impl AwsClients {
    /// When no region is given, the SDK's default chain (AWS_REGION, profile, IMDS) decides.
    #[instrument]
    pub async fn load(region: Option<&str>) -> Self {
        let loader = aws_config::from_env();
        let loader = match region {
            Some(region) => loader.region(aws_sdk_s3::Region::new(region.to_owned())),
            None => loader,
        };
        let sdk_config = loader.load().await;
        debug!(region = ?sdk_config.region(), "loaded AWS config");

        Self {
            s3: aws_sdk_s3::Client::new(&sdk_config),
            transcribe: aws_sdk_transcribe::Client::new(&sdk_config),
            translate: aws_sdk_translate::Client::new(&sdk_config),
            polly: aws_sdk_polly::Client::new(&sdk_config),
        }
    }
}

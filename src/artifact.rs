use std::fmt;

const SOURCE_DIRECTORY: &str = "audio_inputs";

/// Something a run produces and keeps: once locally in the working directory and once in the
/// bucket under the output prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Artifact {
    Transcript,
    Translation,
    SynthesizedAudio,
}

impl Artifact {
    /// Name of the scratch file written before the artifact is uploaded.
    pub fn local_file_name(&self, output_format: &str) -> String {
        match self {
            Artifact::Transcript => "transcript.txt".to_owned(),
            Artifact::Translation => "translation.txt".to_owned(),
            Artifact::SynthesizedAudio => format!("translated_audio.{output_format}"),
        }
    }

    /// Storage key for this artifact. Keys only depend on their inputs, so reruns overwrite the
    /// previous results.
    pub fn key(
        &self,
        prefix: &str,
        filename: &str,
        target_language: &str,
        output_format: &str,
    ) -> String {
        match self {
            Artifact::Transcript => format!("{prefix}/transcripts/{filename}.txt"),
            Artifact::Translation => {
                format!("{prefix}/translations/{filename}_{target_language}.txt")
            }
            Artifact::SynthesizedAudio => {
                format!("{prefix}/audio_outputs/{filename}_{target_language}.{output_format}")
            }
        }
    }
}

impl fmt::Display for Artifact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Artifact::Transcript => "transcript",
            Artifact::Translation => "translation",
            Artifact::SynthesizedAudio => "synthesized audio",
        };
        f.write_str(name)
    }
}

/// The source audio goes outside of the output prefix, it's shared by every environment.
pub fn source_key(filename: &str) -> String {
    format!("{SOURCE_DIRECTORY}/{filename}")
}

pub fn s3_uri(bucket: &str, key: &str) -> String {
    format!("s3://{bucket}/{key}")
}

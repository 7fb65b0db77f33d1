use thiserror::Error;

/// Spin tracker error types
#[derive(Error, Debug)]
pub enum TrackerError {
    /// Wrong field count or a non-numeric token in an inbound record.
    /// The record is dropped; the stream continues.
    #[error("malformed sample: {0}")]
    MalformedSample(String),

    #[error("no active recording session")]
    NotRecording,

    #[error("a recording session is already active")]
    AlreadyRecording,

    #[error("raw artifact not found: {0}")]
    ArtifactNotFound(String),

    /// Raw artifacts are write-once; reprocessing may only replace the
    /// conditioned and calculated artifacts.
    #[error("raw artifact already exists: {0}")]
    RawArtifactExists(String),

    #[error("failed to read artifact {name}: {source}")]
    ReadFailure {
        name: String,
        source: std::io::Error,
    },

    #[error("failed to write artifact {name}: {source}")]
    WriteFailure {
        name: String,
        source: std::io::Error,
    },
}

pub type Result<T> = std::result::Result<T, TrackerError>;

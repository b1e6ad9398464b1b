use thiserror::Error;

/// The error type returned by the functions and methods of this crate.
#[derive(Error, Debug)]
pub enum Error {
    /// A call into the platform speech API failed.
    #[cfg(windows)]
    #[error("platform call failed: {0}")]
    Platform(#[from] windows::core::Error),
    /// The engine reported that an asynchronous operation was canceled.
    #[error("the asynchronous operation was canceled")]
    Canceled,
    /// The engine completed an asynchronous operation without a result.
    #[error("the asynchronous operation completed without a result")]
    MissingResult,
    /// The speech was dropped before its audio could be delivered.
    #[error("the speech was abandoned before its audio was delivered")]
    Abandoned,
    /// A marker list could not be parsed.
    #[error("malformed marker `{0}`")]
    MalformedMarker(String),
    /// Speech could not be rendered as SSML.
    #[error("could not build SSML: {0}")]
    Ssml(#[from] xml::writer::Error),
    /// No installed voice has the given identifier.
    #[error("no such voice: {0}")]
    NoSuchVoice(String),
    /// The voice index is outside the list of installed voices.
    #[error("voice index {index} is out of range (have {count} voices)")]
    VoiceIndexOutOfRange {
        /// The index that was requested.
        index: usize,
        /// How many voices are installed.
        count: usize,
    },
    /// The engine-specific failure that doesn't map to any of the other variants.
    #[error("{0}")]
    Engine(String),
}

/// The type returned by the functions and methods of this crate.
pub type Result<T> = std::result::Result<T, Error>;

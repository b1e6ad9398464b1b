//! Support for async operations running on Tokio.

#[cfg(all(windows, feature = "tokio-rt"))]
mod rt;
#[cfg(feature = "tokio-tts")]
mod tts;

#[cfg(all(windows, feature = "tokio-rt"))]
pub use rt::BuilderExt;
#[cfg(feature = "tokio-tts")]
pub use tts::{AsyncSynthesizer, Utterance};

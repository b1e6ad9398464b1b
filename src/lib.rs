#![warn(missing_docs)]
#![cfg_attr(docsrs, feature(doc_cfg))]

//! A bridge exposing the Windows OneCore speech synthesizer to host applications.
//!
//! # Features
//!
//! The crate renders SSML with the OneCore voices of `Windows.Media.SpeechSynthesis` and hands the
//! resulting PCM audio, together with the timing markers the engine reported, to a callback. It can
//! be used from Rust, or loaded as a DLL through the flat function table in the `ffi` module.
//!
//! ## Synthesis
//!
//! The [tts] module defines the [`SpeechEngine`](tts::SpeechEngine) abstraction and the
//! asynchronous pipeline behind [`tts::speak`]: submit the SSML, collect the markers once the
//! audio stream is ready, read the whole stream into memory, and deliver it to an
//! [`AudioSink`](tts::AudioSink). The call returns as soon as the request is submitted; delivery
//! happens later, on an engine thread. On Windows, [`OneCoreSynthesizer`](tts::OneCoreSynthesizer)
//! implements the engine.
//!
//! ## Markers
//!
//! Bookmarks embedded in the SSML come back as [markers](markers::Marker): the bookmark name and
//! the time into the audio at which it was reached. Across the flat ABI they travel as a single
//! string of `name:ticks` entries separated by `|`.
//!
//! ## Speech sequences and the driver
//!
//! The [ssml] module turns flat speech sequences (text, bookmarks, prosody and language changes)
//! into balanced SSML. The [driver] module builds on everything above: it queues utterances,
//! plays delivered audio chunk by chunk so that bookmarks are reported as playback reaches them,
//! supports cancelling, and keeps the rate, pitch, and volume settings.
//!
//! # Threading
//!
//! The engine completes its asynchronous operations on the Windows thread pool, so sinks and audio
//! outputs must be `Send`, and may be called from a thread other than the one that submitted the
//! speech.

pub mod audio;
mod com_util;
pub mod driver;
mod error;
#[cfg(windows)]
pub mod ffi;
pub mod markers;
pub mod ssml;
pub mod tts;

#[cfg(feature = "tokio")]
pub mod tokio;

pub use error::{Error, Result};

/// Joins the current thread to the multithreaded apartment, which the Windows Runtime requires.
/// Threads of the engine's own thread pool are already initialized.
#[cfg(windows)]
pub fn initialize() -> Result<()> {
    use windows::Win32::System::WinRT::{RoInitialize, RO_INIT_MULTITHREADED};
    Ok(unsafe { RoInitialize(RO_INIT_MULTITHREADED) }?)
}

/// Leaves the apartment joined by [`initialize`]. Must be called once for every successful call to
/// `initialize` on the same thread.
#[cfg(windows)]
pub fn finalize() {
    unsafe { windows::Win32::System::WinRT::RoUninitialize() }
}

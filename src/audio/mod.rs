//! Description of the PCM audio the engine produces.

mod format;

pub use format::{AudioFormat, BitRate, Channels, SampleRate};

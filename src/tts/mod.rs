//! Speech synthesis: the engine abstraction, the asynchronous delivery pipeline, and the OneCore
//! engine itself.

pub mod engine;
#[cfg(windows)]
mod onecore;
mod pipeline;
mod types;
mod voice;

pub use self::engine::{AsyncResult, AudioData, Continuation, SpeechEngine, SynthesizedStream};
#[cfg(windows)]
pub use self::onecore::OneCoreSynthesizer;
pub use self::pipeline::{speak, AudioSink};
pub use self::types::{Pitch, Rate, VoiceProperty, Volume};
pub use self::voice::{expand_env_vars, is_voice_valid, VoiceInfo};

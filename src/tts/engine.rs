//! The seam between the synthesis pipeline and a concrete speech engine.

use crate::markers::MarkerList;
use crate::Result;

use super::VoiceInfo;

/// A callback that receives the outcome of an asynchronous operation. It is called at most once,
/// on whichever thread the engine completes the operation on.
pub type Continuation<T> = Box<dyn FnOnce(Result<T>) + Send>;

/// An asynchronous operation that has been submitted to the engine.
pub trait AsyncResult<T> {
    /// Arranges for `then` to be called with the outcome of the operation. If the continuation
    /// can't be attached, `then` is called right away with the error.
    fn on_complete(self, then: Continuation<T>);
}

/// A view of the audio bytes the engine has read into memory.
pub trait AudioData {
    /// Returns the audio bytes, including any container header the engine put in front of them.
    fn bytes(&self) -> Result<&[u8]>;
}

/// The result of a synthesis request: rendered audio plus the markers reached while rendering.
pub trait SynthesizedStream {
    /// The in-memory audio buffer produced by [`read_to_end`](SynthesizedStream::read_to_end).
    type Audio: AudioData + 'static;
    /// The pending read.
    type Read: AsyncResult<Self::Audio>;

    /// Returns the markers in the order the engine emitted them.
    fn markers(&self) -> Result<MarkerList>;

    /// Starts reading the whole stream into memory.
    fn read_to_end(&self) -> Result<Self::Read>;
}

/// A speech engine capable of rendering SSML and managing its voices.
pub trait SpeechEngine: Send + Sync + 'static {
    /// The rendered speech, delivered once synthesis completes.
    type Stream: SynthesizedStream + 'static;
    /// The pending synthesis.
    type Synthesis: AsyncResult<Self::Stream>;

    /// Submits the SSML for synthesis. An error means the request was not accepted.
    fn synthesize(&self, ssml: &str) -> Result<Self::Synthesis>;

    /// Lists the installed voices, in the order [`set_voice`](SpeechEngine::set_voice) indexes
    /// them.
    fn voices(&self) -> Result<Vec<VoiceInfo>>;

    /// Returns the voice subsequent speech will be rendered with.
    fn current_voice(&self) -> Result<VoiceInfo>;

    /// Selects the voice at the given position in [`voices`](SpeechEngine::voices).
    fn set_voice(&self, index: usize) -> Result<()>;

    /// Sets a named numeric voice property.
    fn set_property(&self, name: &str, value: i32) -> Result<()>;
}

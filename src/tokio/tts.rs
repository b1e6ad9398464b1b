use std::ops::Deref;

use tokio::sync::oneshot::{channel, Sender};

use crate::markers::MarkerList;
use crate::tts::{speak, AudioSink, SpeechEngine};
use crate::{Error, Result};

/// The rendered audio of one utterance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Utterance {
    /// The audio bytes as the engine produced them, container header included.
    pub audio: Vec<u8>,
    /// The markers reached while rendering.
    pub markers: MarkerList,
}

struct ReplySink(Sender<Result<Utterance>>);

impl AudioSink for ReplySink {
    fn deliver(self, audio: &[u8], markers: &MarkerList) {
        let _ = self.0.send(Ok(Utterance {
            audio: audio.to_vec(),
            markers: markers.clone(),
        }));
    }

    fn failed(self, error: Error) {
        let _ = self.0.send(Err(error));
    }
}

#[cfg_attr(docsrs, doc(cfg(feature = "tokio-tts")))]
/// A speech synthesizer that returns a future for every utterance it renders.
pub struct AsyncSynthesizer<E: SpeechEngine> {
    engine: E,
}

impl<E: SpeechEngine> AsyncSynthesizer<E> {
    /// Wraps the given engine.
    pub fn new(engine: E) -> Self {
        Self {
            engine,
        }
    }

    /// Renders the SSML and completes with its audio and markers.
    pub async fn synthesize<S: AsRef<str>>(&self, ssml: S) -> Result<Utterance> {
        let (tx, rx) = channel();
        speak(&self.engine, ssml.as_ref(), ReplySink(tx))?;
        rx.await.unwrap_or(Err(Error::Abandoned))
    }
}

impl<E: SpeechEngine> Deref for AsyncSynthesizer<E> {
    type Target = E;
    fn deref(&self) -> &Self::Target {
        &self.engine
    }
}

use log::{trace, warn};

use crate::markers::MarkerList;
use crate::{Error, Result};

use super::engine::{AsyncResult, AudioData, SpeechEngine, SynthesizedStream};

/// Receives the audio of one utterance.
pub trait AudioSink: Send + 'static {
    /// Called once the whole audio buffer is in memory and the markers are assembled.
    fn deliver(self, audio: &[u8], markers: &MarkerList);

    /// Called instead of [`deliver`](AudioSink::deliver) when any stage after submission fails.
    fn failed(self, error: Error)
    where
        Self: Sized,
    {
        let _ = error;
    }
}

impl<F: FnOnce(&[u8], &MarkerList) + Send + 'static> AudioSink for F {
    fn deliver(self, audio: &[u8], markers: &MarkerList) {
        self(audio, markers)
    }
}

/// Renders the SSML with the given engine and hands the audio to `sink` on an engine thread.
///
/// Returns as soon as the request is submitted. An error means submission failed and the sink
/// will never be called. Otherwise the sink receives exactly one call: either
/// [`deliver`](AudioSink::deliver) or [`failed`](AudioSink::failed).
pub fn speak<E: SpeechEngine, S: AudioSink>(engine: &E, ssml: &str, sink: S) -> Result<()> {
    let synthesis = engine.synthesize(ssml)?;
    let job = Job {
        sink,
        markers: MarkerList::new(),
    };
    synthesis.on_complete(Box::new(move |stream: Result<E::Stream>| {
        job.on_synthesized(stream)
    }));
    Ok(())
}

/// The state carried from one stage of an utterance to the next. Every stage consumes it, so it
/// is dropped exactly once, by whichever stage ends the chain.
struct Job<S: AudioSink> {
    sink: S,
    markers: MarkerList,
}

impl<S: AudioSink> Job<S> {
    fn on_synthesized<T: SynthesizedStream + 'static>(mut self, stream: Result<T>) {
        let read = stream.and_then(|stream| {
            self.markers = stream.markers()?;
            stream.read_to_end()
        });
        match read {
            Ok(read) => {
                read.on_complete(Box::new(move |audio: Result<T::Audio>| self.on_audio(audio)))
            }
            Err(err) => self.finish(err),
        }
    }

    fn on_audio<A: AudioData>(self, audio: Result<A>) {
        let audio = match audio {
            Ok(audio) => audio,
            Err(err) => return self.finish(err),
        };
        match audio.bytes() {
            Ok(bytes) => {
                let Job { sink, markers } = self;
                trace!("Delivering {} bytes of audio with {} markers", bytes.len(), markers.len());
                sink.deliver(bytes, &markers);
            }
            Err(err) => self.finish(err),
        }
    }

    fn finish(self, error: Error) {
        warn!("Speech synthesis failed: {}", error);
        self.sink.failed(error);
    }
}

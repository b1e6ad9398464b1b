//! A host-side speech driver built on top of the synthesis pipeline.
//!
//! The driver turns speech sequences into SSML, makes sure only one utterance is synthesized at a
//! time, plays the delivered audio through an [`AudioOutput`] while reporting bookmarks, and keeps
//! the rate, pitch and volume settings.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use log::{debug, warn};

use crate::audio::AudioFormat;
use crate::markers::MarkerList;
use crate::ssml::{SpeechItem, SsmlConverter};
use crate::tts::{self, AudioSink, Pitch, Rate, SpeechEngine, VoiceInfo, VoiceProperty, Volume};
use crate::{Error, Result};

mod playback;

pub use playback::AudioOutput;

/// The length of the container header OneCore puts in front of the PCM data.
pub const WAV_HEADER_LEN: usize = 44;

/// Tunables of a [`SpeechDriver`].
#[derive(Debug, Clone)]
pub struct DriverConfig {
    /// Format of the audio the engine delivers.
    pub format: AudioFormat,
    /// Number of bytes to skip at the start of every delivered buffer.
    pub header_len: usize,
    /// Decides whether a listed voice can actually be used.
    pub voice_filter: fn(&str) -> bool,
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            format: AudioFormat::default(),
            header_len: WAV_HEADER_LEN,
            voice_filter: tts::is_voice_valid,
        }
    }
}

struct Settings {
    rate: Rate,
    pitch: Pitch,
    volume: Volume,
}

struct Queue {
    pending: VecDeque<String>,
    processing: bool,
}

struct Shared<E: SpeechEngine, O: AudioOutput> {
    engine: E,
    output: O,
    config: DriverConfig,
    queue: Mutex<Queue>,
    settings: Mutex<Settings>,
    cancelled: AtomicBool,
}

/// Speaks speech sequences with a [`SpeechEngine`], one utterance at a time.
pub struct SpeechDriver<E: SpeechEngine, O: AudioOutput> {
    shared: Arc<Shared<E, O>>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl<E: SpeechEngine, O: AudioOutput> SpeechDriver<E, O> {
    /// Creates a driver with rate and pitch at their midpoints and full volume.
    pub fn new(engine: E, output: O, config: DriverConfig) -> Self {
        let driver = Self {
            shared: Arc::new(Shared {
                engine,
                output,
                config,
                queue: Mutex::new(Queue {
                    pending: VecDeque::new(),
                    processing: false,
                }),
                settings: Mutex::new(Settings {
                    rate: Rate::from_percent(50),
                    pitch: Pitch::from_percent(50),
                    volume: Volume::new(100),
                }),
                cancelled: AtomicBool::new(false),
            }),
        };
        // The engine can't report these, so push the cached values to keep both sides in step.
        if let Err(err) = driver.set_rate(50) {
            warn!("Could not set the initial rate: {}", err);
        }
        if let Err(err) = driver.set_pitch(50) {
            warn!("Could not set the initial pitch: {}", err);
        }
        driver
    }

    /// Returns the underlying engine.
    pub fn engine(&self) -> &E {
        &self.shared.engine
    }

    /// Speaks the sequence. If an utterance is still being synthesized, this one is queued and
    /// spoken once those before it are done.
    pub fn speak<'i, I>(&self, items: I) -> Result<()>
    where
        I: IntoIterator<Item = &'i SpeechItem>,
    {
        let language = self.language()?;
        let volume = lock(&self.shared.settings).volume;
        let ssml = SsmlConverter::onecore(language, volume).convert(items)?;

        let mut queue = lock(&self.shared.queue);
        if queue.processing {
            debug!("Already processing, queuing");
            queue.pending.push_back(ssml);
            return Ok(());
        }
        queue.processing = true;
        drop(queue);

        self.shared.cancelled.store(false, Ordering::SeqCst);
        debug!("Begin processing speech");
        let result = self.shared.submit(ssml);
        if result.is_err() {
            lock(&self.shared.queue).processing = false;
        }
        result
    }

    /// Stops speaking: the utterance in flight is not played any further and queued ones are
    /// discarded.
    pub fn cancel(&self) {
        self.shared.cancelled.store(true, Ordering::SeqCst);
        debug!("Cancelling");
        lock(&self.shared.queue).pending.clear();
        self.shared.output.stop();
    }

    /// Whether an utterance is being synthesized or played.
    pub fn is_speaking(&self) -> bool {
        lock(&self.shared.queue).processing
    }

    /// The speaking rate as a percentage.
    pub fn rate(&self) -> u32 {
        lock(&self.shared.settings).rate.percent()
    }

    /// Sets the speaking rate from a percentage.
    pub fn set_rate(&self, percent: u32) -> Result<()> {
        let rate = Rate::from_percent(percent);
        lock(&self.shared.settings).rate = rate;
        self.shared.engine.set_property(VoiceProperty::SpeakRate.as_ref(), rate.value())
    }

    /// The voice pitch as a percentage.
    pub fn pitch(&self) -> u32 {
        lock(&self.shared.settings).pitch.percent()
    }

    /// Sets the voice pitch from a percentage.
    pub fn set_pitch(&self, percent: u32) -> Result<()> {
        let pitch = Pitch::from_percent(percent);
        lock(&self.shared.settings).pitch = pitch;
        self.shared.engine.set_property(VoiceProperty::Pitch.as_ref(), pitch.value())
    }

    /// The volume as a percentage.
    pub fn volume(&self) -> u32 {
        lock(&self.shared.settings).volume.value()
    }

    /// Sets the volume as a percentage. It applies from the next utterance on.
    pub fn set_volume(&self, percent: u32) {
        lock(&self.shared.settings).volume = Volume::new(percent);
    }

    /// Lists the installed voices in engine order, optionally leaving out the ones that fail the
    /// configured voice filter.
    pub fn voices(&self, only_valid: bool) -> Result<Vec<VoiceInfo>> {
        let filter = self.shared.config.voice_filter;
        let voices = self.shared.engine.voices()?;
        Ok(voices.into_iter().filter(|voice| !only_valid || filter(&voice.id)).collect())
    }

    /// The identifier of the current voice.
    pub fn voice(&self) -> Result<String> {
        Ok(self.shared.engine.current_voice()?.id)
    }

    /// Switches to the voice with the given identifier.
    pub fn set_voice(&self, id: &str) -> Result<()> {
        let index = self
            .shared
            .engine
            .voices()?
            .iter()
            .position(|voice| voice.id == id)
            .ok_or_else(|| Error::NoSuchVoice(id.into()))?;
        self.shared.engine.set_voice(index)
    }

    /// The language of the current voice.
    pub fn language(&self) -> Result<String> {
        Ok(self.shared.engine.current_voice()?.language)
    }
}

impl<E: SpeechEngine, O: AudioOutput> Shared<E, O> {
    fn submit(self: &Arc<Self>, ssml: String) -> Result<()> {
        tts::speak(
            &self.engine,
            &ssml,
            Delivery {
                shared: self.clone(),
            },
        )
    }

    fn play(&self, audio: &[u8], markers: &MarkerList) {
        let audio = if audio.len() > self.config.header_len {
            &audio[self.config.header_len..]
        } else {
            audio
        };
        let format = &self.config.format;
        playback::play_with_markers(&self.output, audio, markers, format, &self.cancelled);
    }

    fn process_next(self: &Arc<Self>) {
        loop {
            let next = {
                let mut queue = lock(&self.queue);
                match queue.pending.pop_front() {
                    Some(ssml) => ssml,
                    None => {
                        queue.processing = false;
                        break;
                    }
                }
            };
            debug!("Queued speech present, begin processing next");
            self.cancelled.store(false, Ordering::SeqCst);
            match self.submit(next) {
                Ok(()) => return,
                Err(err) => warn!("Could not submit queued speech: {}", err),
            }
        }
        debug!("Done processing");
        self.output.idle();
    }
}

/// Receives the audio of one utterance on behalf of the driver.
struct Delivery<E: SpeechEngine, O: AudioOutput> {
    shared: Arc<Shared<E, O>>,
}

impl<E: SpeechEngine, O: AudioOutput> AudioSink for Delivery<E, O> {
    fn deliver(self, audio: &[u8], markers: &MarkerList) {
        self.shared.play(audio, markers);
        self.shared.process_next();
    }

    fn failed(self, _error: Error) {
        self.shared.process_next();
    }
}

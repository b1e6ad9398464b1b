//! A scripted in-process speech engine, so the pipeline and the driver can be exercised without
//! the platform synthesizer.
#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use onecore_speech::markers::MarkerList;
use onecore_speech::tts::{
    AsyncResult, AudioData, Continuation, SpeechEngine, SynthesizedStream, VoiceInfo,
};
use onecore_speech::{Error, Result};

/// What a single `synthesize` call does.
#[derive(Debug, Clone)]
pub enum Outcome {
    /// Everything succeeds with this audio and these markers.
    Audio(Vec<u8>, MarkerList),
    /// The request is refused at submission.
    RejectSubmit,
    /// Synthesis completes with an error.
    FailSynthesis,
    /// The stream can't report its markers.
    FailMarkers,
    /// The read can't be started.
    RejectRead,
    /// The read completes with an error.
    FailRead,
    /// The buffer's bytes can't be accessed.
    FailBytes,
}

impl Outcome {
    pub fn audio(audio: Vec<u8>, markers: &str) -> Self {
        Self::Audio(audio, markers.parse().unwrap())
    }
}

/// How completions are dispatched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Right away, on the thread that attached the continuation.
    Inline,
    /// On a freshly spawned thread.
    Thread,
    /// Only when the test calls [`FakeEngine::complete_next`].
    Manual,
}

type Job = Box<dyn FnOnce() + Send>;

struct State {
    mode: Mode,
    voices: Vec<VoiceInfo>,
    current: Mutex<usize>,
    properties: Mutex<Vec<(String, i32)>>,
    submitted: Mutex<Vec<String>>,
    outcomes: Mutex<VecDeque<Outcome>>,
    parked: Mutex<VecDeque<Job>>,
}

#[derive(Clone)]
pub struct FakeEngine(Arc<State>);

pub fn voice(id: &str, name: &str, language: &str) -> VoiceInfo {
    VoiceInfo {
        id: id.into(),
        display_name: name.into(),
        language: language.into(),
    }
}

impl FakeEngine {
    pub fn new(mode: Mode) -> Self {
        Self::with_voices(
            mode,
            vec![
                voice(r"HKEY_LOCAL_MACHINE\Voices\Tokens\David", "Microsoft David", "en-US"),
                voice(r"HKEY_LOCAL_MACHINE\Voices\Tokens\Hedda", "Microsoft Hedda", "de-DE"),
            ],
        )
    }

    pub fn with_voices(mode: Mode, voices: Vec<VoiceInfo>) -> Self {
        Self(Arc::new(State {
            mode,
            voices,
            current: Mutex::new(0),
            properties: Mutex::new(Vec::new()),
            submitted: Mutex::new(Vec::new()),
            outcomes: Mutex::new(VecDeque::new()),
            parked: Mutex::new(VecDeque::new()),
        }))
    }

    /// Queues the outcome of the next `synthesize` call. Calls without a queued outcome succeed
    /// with empty audio and no markers.
    pub fn script(&self, outcome: Outcome) -> &Self {
        self.0.outcomes.lock().unwrap().push_back(outcome);
        self
    }

    pub fn submitted(&self) -> Vec<String> {
        self.0.submitted.lock().unwrap().clone()
    }

    pub fn properties(&self) -> Vec<(String, i32)> {
        self.0.properties.lock().unwrap().clone()
    }

    pub fn current_index(&self) -> usize {
        *self.0.current.lock().unwrap()
    }

    /// Runs the oldest parked completion. Returns `false` if there was none.
    pub fn complete_next(&self) -> bool {
        let job = self.0.parked.lock().unwrap().pop_front();
        match job {
            Some(job) => {
                job();
                true
            }
            None => false,
        }
    }

    /// Runs parked completions until none are left.
    pub fn complete_all(&self) -> usize {
        let mut count = 0;
        while self.complete_next() {
            count += 1;
        }
        count
    }

    fn dispatch(&self, job: Job) {
        match self.0.mode {
            Mode::Inline => job(),
            Mode::Thread => {
                std::thread::spawn(job);
            }
            Mode::Manual => self.0.parked.lock().unwrap().push_back(job),
        }
    }
}

impl SpeechEngine for FakeEngine {
    type Stream = FakeStream;
    type Synthesis = FakePending<FakeStream>;

    fn synthesize(&self, ssml: &str) -> Result<Self::Synthesis> {
        let outcome = self
            .0
            .outcomes
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Outcome::Audio(Vec::new(), MarkerList::new()));
        if let Outcome::RejectSubmit = outcome {
            return Err(Error::Engine("submission rejected".into()));
        }
        self.0.submitted.lock().unwrap().push(ssml.into());
        let result = match outcome {
            Outcome::FailSynthesis => Err(Error::Engine("synthesis failed".into())),
            outcome => Ok(FakeStream {
                engine: self.clone(),
                outcome,
            }),
        };
        Ok(FakePending {
            engine: self.clone(),
            result,
        })
    }

    fn voices(&self) -> Result<Vec<VoiceInfo>> {
        Ok(self.0.voices.clone())
    }

    fn current_voice(&self) -> Result<VoiceInfo> {
        Ok(self.0.voices[self.current_index()].clone())
    }

    fn set_voice(&self, index: usize) -> Result<()> {
        let count = self.0.voices.len();
        if index >= count {
            return Err(Error::VoiceIndexOutOfRange {
                index,
                count,
            });
        }
        *self.0.current.lock().unwrap() = index;
        Ok(())
    }

    fn set_property(&self, name: &str, value: i32) -> Result<()> {
        self.0.properties.lock().unwrap().push((name.into(), value));
        Ok(())
    }
}

pub struct FakePending<T> {
    engine: FakeEngine,
    result: Result<T>,
}

impl<T: Send + 'static> AsyncResult<T> for FakePending<T> {
    fn on_complete(self, then: Continuation<T>) {
        let result = self.result;
        self.engine.dispatch(Box::new(move || then(result)));
    }
}

pub struct FakeStream {
    engine: FakeEngine,
    outcome: Outcome,
}

impl SynthesizedStream for FakeStream {
    type Audio = FakeAudio;
    type Read = FakePending<FakeAudio>;

    fn markers(&self) -> Result<MarkerList> {
        match &self.outcome {
            Outcome::FailMarkers => Err(Error::Engine("markers unavailable".into())),
            Outcome::Audio(_, markers) => Ok(markers.clone()),
            _ => Ok(MarkerList::new()),
        }
    }

    fn read_to_end(&self) -> Result<Self::Read> {
        let result = match &self.outcome {
            Outcome::RejectRead => return Err(Error::Engine("read rejected".into())),
            Outcome::FailRead => Err(Error::Engine("read failed".into())),
            Outcome::FailBytes => Ok(FakeAudio(None)),
            Outcome::Audio(audio, _) => Ok(FakeAudio(Some(audio.clone()))),
            _ => Ok(FakeAudio(Some(Vec::new()))),
        };
        Ok(FakePending {
            engine: self.engine.clone(),
            result,
        })
    }
}

pub struct FakeAudio(Option<Vec<u8>>);

impl AudioData for FakeAudio {
    fn bytes(&self) -> Result<&[u8]> {
        self.0.as_deref().ok_or_else(|| Error::Engine("buffer inaccessible".into()))
    }
}

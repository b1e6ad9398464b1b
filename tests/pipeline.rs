mod common;

use std::sync::mpsc;
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

use common::{FakeEngine, Mode, Outcome};
use onecore_speech::markers::MarkerList;
use onecore_speech::tts::{speak, AudioSink};
use onecore_speech::Error;

#[derive(Debug, PartialEq, Eq)]
enum Event {
    Delivered(Vec<u8>, String),
    Failed,
    Dropped,
}

struct RecordingSink(Arc<Mutex<Vec<Event>>>);

impl RecordingSink {
    fn new() -> (Self, Arc<Mutex<Vec<Event>>>) {
        let events = Arc::new(Mutex::new(Vec::new()));
        (Self(events.clone()), events)
    }
}

impl AudioSink for RecordingSink {
    fn deliver(self, audio: &[u8], markers: &MarkerList) {
        self.0.lock().unwrap().push(Event::Delivered(audio.to_vec(), markers.to_string()));
    }

    fn failed(self, _error: Error) {
        self.0.lock().unwrap().push(Event::Failed);
    }
}

impl Drop for RecordingSink {
    fn drop(&mut self) {
        self.0.lock().unwrap().push(Event::Dropped);
    }
}

#[test]
fn audio_is_delivered_on_an_engine_thread() {
    let engine = FakeEngine::new(Mode::Thread);
    engine.script(Outcome::audio(vec![1, 2, 3, 4], "1:0|2:5000000"));

    let (tx, rx) = mpsc::channel();
    speak(&engine, "<speak>hi</speak>", move |audio: &[u8], markers: &MarkerList| {
        tx.send((audio.to_vec(), markers.to_string(), thread::current().id())).unwrap();
    })
    .unwrap();

    let (audio, markers, thread) = rx.recv_timeout(Duration::from_secs(5)).unwrap();
    assert_eq!(vec![1, 2, 3, 4], audio);
    assert_eq!("1:0|2:5000000", markers);
    assert_ne!(thread::current().id(), thread);
    assert_eq!(vec!["<speak>hi</speak>".to_string()], engine.submitted());
}

#[test]
fn speak_returns_before_synthesis_completes() {
    let engine = FakeEngine::new(Mode::Manual);
    engine.script(Outcome::audio(vec![9; 16], ""));
    let (sink, events) = RecordingSink::new();

    speak(&engine, "<speak/>", sink).unwrap();
    assert!(events.lock().unwrap().is_empty());

    assert_eq!(2, engine.complete_all());
    assert_eq!(
        vec![Event::Delivered(vec![9; 16], String::new()), Event::Dropped],
        *events.lock().unwrap()
    );
}

#[test]
fn rejected_submission_never_reaches_the_sink() {
    let engine = FakeEngine::new(Mode::Inline);
    engine.script(Outcome::RejectSubmit);
    let (sink, events) = RecordingSink::new();

    let result = speak(&engine, "<speak/>", sink);

    assert!(matches!(result, Err(Error::Engine(_))));
    assert_eq!(vec![Event::Dropped], *events.lock().unwrap());
    assert!(engine.submitted().is_empty());
}

#[test]
fn failures_after_submission_end_the_chain_exactly_once() {
    for outcome in [
        Outcome::FailSynthesis,
        Outcome::FailMarkers,
        Outcome::RejectRead,
        Outcome::FailRead,
        Outcome::FailBytes,
    ] {
        let engine = FakeEngine::new(Mode::Inline);
        engine.script(outcome.clone());
        let (sink, events) = RecordingSink::new();

        speak(&engine, "<speak/>", sink).unwrap();

        assert_eq!(
            vec![Event::Failed, Event::Dropped],
            *events.lock().unwrap(),
            "outcome {:?}",
            outcome
        );
    }
}

#[test]
fn utterances_are_independent() {
    let engine = FakeEngine::new(Mode::Manual);
    engine.script(Outcome::audio(vec![1], "1:0"));
    engine.script(Outcome::FailRead);
    engine.script(Outcome::audio(vec![3], "3:0"));
    let sinks: Vec<_> = (0..3).map(|_| RecordingSink::new()).collect();
    let mut logs = Vec::new();
    for (sink, events) in sinks {
        speak(&engine, "<speak/>", sink).unwrap();
        logs.push(events);
    }

    engine.complete_all();

    assert_eq!(
        vec![Event::Delivered(vec![1], "1:0".into()), Event::Dropped],
        *logs[0].lock().unwrap()
    );
    assert_eq!(vec![Event::Failed, Event::Dropped], *logs[1].lock().unwrap());
    assert_eq!(
        vec![Event::Delivered(vec![3], "3:0".into()), Event::Dropped],
        *logs[2].lock().unwrap()
    );
}

mod common;

use std::time::Duration;

use common::{FakeEngine, Mode, Outcome};
use futures::future::join_all;
use onecore_speech::tokio::AsyncSynthesizer;
use onecore_speech::tts::SpeechEngine;
use onecore_speech::Error;

#[tokio::test]
async fn synthesize_completes_with_audio_and_markers() {
    let engine = FakeEngine::new(Mode::Thread);
    engine.script(Outcome::audio(vec![1, 2, 3], "1:0|2:5000000"));
    let synth = AsyncSynthesizer::new(engine);

    let utterance = tokio::time::timeout(Duration::from_secs(5), synth.synthesize("<speak/>"))
        .await
        .unwrap()
        .unwrap();

    assert_eq!(vec![1, 2, 3], utterance.audio);
    assert_eq!("1:0|2:5000000", utterance.markers.to_string());
}

#[tokio::test]
async fn failures_surface_as_errors() {
    let engine = FakeEngine::new(Mode::Thread);
    engine.script(Outcome::RejectSubmit);
    engine.script(Outcome::FailRead);
    let synth = AsyncSynthesizer::new(engine);

    assert!(matches!(synth.synthesize("<speak/>").await, Err(Error::Engine(_))));
    assert!(matches!(synth.synthesize("<speak/>").await, Err(Error::Engine(_))));
}

#[tokio::test(flavor = "multi_thread")]
async fn concurrent_requests_complete_independently() {
    let engine = FakeEngine::new(Mode::Thread);
    for n in 0..4u8 {
        engine.script(Outcome::audio(vec![n], &format!("{}:0", n)));
    }
    let synth = AsyncSynthesizer::new(engine);

    let results = join_all((0..4).map(|_| synth.synthesize("<speak/>"))).await;

    let mut audio: Vec<_> = results.into_iter().map(|result| result.unwrap().audio[0]).collect();
    audio.sort_unstable();
    assert_eq!(vec![0, 1, 2, 3], audio);
}

#[tokio::test]
async fn synthesizer_exposes_the_engine() {
    let synth = AsyncSynthesizer::new(FakeEngine::new(Mode::Inline));
    assert_eq!("en-US", synth.current_voice().unwrap().language);
}

//! This demo renders a phrase with bookmarks into `speech.wav` and prints the markers the engine
//! reported along the way.

#[cfg(windows)]
fn main() {
    use std::sync::mpsc::channel;

    use onecore_speech::markers::MarkerList;
    use onecore_speech::ssml::{SpeechItem, SsmlConverter};
    use onecore_speech::tts::{self, OneCoreSynthesizer, SpeechEngine, Volume};

    onecore_speech::initialize().unwrap();

    let synth = OneCoreSynthesizer::new().unwrap();
    let language = synth.current_voice().unwrap().language;

    // Build the SSML from a speech sequence with a bookmark before every phrase.
    let items = [
        SpeechItem::Index(1),
        "The pellet with the poison's in the flagon with the dragon.".into(),
        SpeechItem::Index(2),
        SpeechItem::Pitch(1.4),
        "The vessel with the pestle has the brew that is true!".into(),
    ];
    let ssml = SsmlConverter::onecore(language, Volume::new(100)).convert(&items).unwrap();
    println!("{}", ssml);

    // The audio arrives on an engine thread; hand it back to this one.
    let (tx, rx) = channel();
    tts::speak(&synth, &ssml, move |audio: &[u8], markers: &MarkerList| {
        let _ = tx.send((audio.to_vec(), markers.clone()));
    })
    .unwrap();

    let (audio, markers) = rx.recv().unwrap();
    for marker in &markers {
        println!("{} at {:?}", marker.text, marker.offset);
    }
    // The buffer already starts with a WAV header.
    std::fs::write("speech.wav", &audio).unwrap();
    println!("Wrote {} bytes to speech.wav", audio.len());

    onecore_speech::finalize();
}

#[cfg(not(windows))]
fn main() {
    println!("OneCore speech synthesis is only available on Windows.");
}

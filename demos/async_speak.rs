//! This demo renders several phrases concurrently on a Tokio runtime whose threads have joined the
//! Windows Runtime apartment.

#[cfg(windows)]
fn main() {
    use futures::future::join_all;
    use onecore_speech::tokio::{AsyncSynthesizer, BuilderExt};
    use onecore_speech::tts::OneCoreSynthesizer;

    let rt = tokio::runtime::Builder::new_multi_thread()
        .enable_winrt()
        .build()
        .unwrap();

    rt.block_on(async {
        let synth = AsyncSynthesizer::new(OneCoreSynthesizer::new().unwrap());
        let phrases = ["Hello, world!", "Get me a vodka rocks.", "Mmm, it's a bit dry."];
        let ssml = phrases.iter().map(|phrase| {
            format!(
                r#"<speak version="1.0" xmlns="http://www.w3.org/2001/10/synthesis" xml:lang="en-US">{}</speak>"#,
                phrase
            )
        });
        let results = join_all(ssml.map(|ssml| synth.synthesize(ssml))).await;
        for (phrase, result) in phrases.iter().zip(results) {
            match result {
                Ok(utterance) => println!("{:?}: {} bytes", phrase, utterance.audio.len()),
                Err(err) => println!("{:?}: {}", phrase, err),
            }
        }
    });
}

#[cfg(not(windows))]
fn main() {
    println!("OneCore speech synthesis is only available on Windows.");
}

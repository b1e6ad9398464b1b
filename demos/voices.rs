//! This demo lists the installed OneCore voices, marking the ones whose data files are missing,
//! and lets the user switch to one of them.

#[cfg(windows)]
fn main() {
    use std::io::{self, Write};

    use onecore_speech::tts::{is_voice_valid, OneCoreSynthesizer, SpeechEngine};

    // Join the multithreaded apartment.
    onecore_speech::initialize().unwrap();

    let synth = OneCoreSynthesizer::new().unwrap();
    let voices = synth.voices().unwrap();

    // Display the list to the user.
    println!("Available voices:");
    for (idx, voice) in voices.iter().enumerate() {
        let status = if is_voice_valid(&voice.id) { "" } else { " (missing data)" };
        println!("{}) {} [{}]{}", idx + 1, voice.display_name, voice.language, status);
    }

    // Prompt the user to select a voice from the list.
    print!("Choose a voice: ");
    io::stdout().flush().unwrap();
    let mut line = String::new();
    io::stdin().read_line(&mut line).unwrap();

    if let Ok(selected) = line.trim_end().parse::<usize>() {
        if selected > 0 && selected <= voices.len() {
            synth.set_voice(selected - 1).unwrap();
            let current = synth.current_voice().unwrap();
            println!("Now speaking with {} ({})", current.display_name, current.id);
        }
    }

    onecore_speech::finalize();
}

#[cfg(not(windows))]
fn main() {
    println!("OneCore voices are only available on Windows.");
}

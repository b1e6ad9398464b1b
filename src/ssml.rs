//! Conversion of linear speech sequences into SSML.
//!
//! A speech sequence is flat: it might raise the pitch, then lower the volume, then reset the
//! pitch while keeping the volume. SSML is hierarchical, so resetting one setting means closing an
//! element that encloses others. The converter keeps the set of active elements and, whenever that
//! set changes, closes everything it opened and reopens the current set before the next item that
//! produces output.

use xml::writer::XmlEvent;
use xml::{EmitterConfig, EventWriter};

use crate::tts::Volume;
use crate::Result;

const SSML_NAMESPACE: &str = "http://www.w3.org/2001/10/synthesis";

/// One instruction in a speech sequence.
#[derive(Debug, PartialEq, Clone)]
pub enum SpeechItem {
    /// Text to speak.
    Text(String),
    /// A numbered bookmark. The engine reports it as a marker once speech reaches it.
    Index(u32),
    /// Spell out subsequent text character by character (`true`) or stop doing so (`false`).
    CharacterMode(bool),
    /// Switch the language of subsequent speech. `None` returns to the default language.
    LangChange(Option<String>),
    /// Pause for the given number of milliseconds.
    Break(u32),
    /// Scale the pitch by the multiplier; `1.0` restores the normal pitch.
    Pitch(f64),
    /// Scale the rate by the multiplier; `1.0` restores the normal rate.
    Rate(f64),
    /// Scale the volume by the multiplier; `1.0` restores the normal volume.
    Volume(f64),
    /// Speak `text` with the given IPA pronunciation.
    Phoneme {
        /// Pronunciation in the International Phonetic Alphabet.
        ipa: String,
        /// The text the pronunciation stands for.
        text: String,
    },
}

impl From<&str> for SpeechItem {
    fn from(s: &str) -> Self {
        Self::Text(s.into())
    }
}

impl From<String> for SpeechItem {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl SpeechItem {
    /// Settings changes only take effect once something is written under them.
    fn produces_output(&self) -> bool {
        matches!(
            self,
            Self::Text(_) | Self::Index(_) | Self::Break(_) | Self::Phoneme { .. }
        )
    }
}

/// Converts an ISO-style language code like `en_US` to an XML language tag like `en-US`.
pub fn to_xml_lang(lang: &str) -> String {
    lang.replace('_', "-")
}

/// Converts speech sequences to SSML documents.
#[derive(Debug, Clone)]
pub struct SsmlConverter {
    default_language: String,
    base_volume: Option<Volume>,
    character_mode: bool,
}

impl SsmlConverter {
    /// Creates a converter producing standard SSML in the given default language.
    pub fn new<S: AsRef<str>>(default_language: S) -> Self {
        Self {
            default_language: to_xml_lang(default_language.as_ref()),
            base_volume: None,
            character_mode: true,
        }
    }

    /// Creates a converter tuned for OneCore voices. The voice volume can only be set through
    /// SSML, so `volume` is always applied, and volume changes scale it. Character mode is
    /// ignored, as OneCore's spelling sounds odd and ignores pitch changes.
    pub fn onecore<S: AsRef<str>>(default_language: S, volume: Volume) -> Self {
        Self {
            base_volume: Some(volume),
            character_mode: false,
            ..Self::new(default_language)
        }
    }

    /// Converts the sequence to a complete `<speak>` document.
    pub fn convert<'i, I>(&self, items: I) -> Result<String>
    where
        I: IntoIterator<Item = &'i SpeechItem>,
    {
        let mut state = ConversionState::new(self);
        state.open_root()?;
        if let Some(volume) = self.base_volume {
            state.tags.set("prosody", "volume", volume.to_string());
        }
        for item in items {
            if item.produces_output() {
                state.flush_tags()?;
            }
            state.convert_item(item)?;
        }
        state.finish()
    }
}

#[derive(Default)]
struct TagSet {
    tags: Vec<(&'static str, Vec<(&'static str, String)>)>,
    changed: bool,
}

impl TagSet {
    fn set(&mut self, tag: &'static str, attr: &'static str, value: String) {
        let idx = match self.tags.iter().position(|(name, _)| *name == tag) {
            Some(idx) => idx,
            None => {
                self.tags.push((tag, Vec::new()));
                self.tags.len() - 1
            }
        };
        let attrs = &mut self.tags[idx].1;
        match attrs.iter_mut().find(|(name, _)| *name == attr) {
            Some((_, current)) if *current == value => return,
            Some((_, current)) => *current = value,
            None => attrs.push((attr, value)),
        }
        self.changed = true;
    }

    fn remove(&mut self, tag: &'static str, attr: &'static str) {
        let Some(idx) = self.tags.iter().position(|(name, _)| *name == tag) else {
            return;
        };
        let attrs = &mut self.tags[idx].1;
        let Some(attr_idx) = attrs.iter().position(|(name, _)| *name == attr) else {
            return;
        };
        attrs.remove(attr_idx);
        if attrs.is_empty() {
            self.tags.remove(idx);
        }
        self.changed = true;
    }
}

struct ConversionState<'c> {
    converter: &'c SsmlConverter,
    writer: EventWriter<Vec<u8>>,
    tags: TagSet,
    open_tags: Vec<&'static str>,
    spell_text: bool,
}

impl<'c> ConversionState<'c> {
    fn new(converter: &'c SsmlConverter) -> Self {
        Self {
            converter,
            writer: EventWriter::new_with_config(
                Vec::new(),
                EmitterConfig::new()
                    .keep_element_names_stack(false)
                    .write_document_declaration(false),
            ),
            tags: TagSet::default(),
            open_tags: Vec::new(),
            spell_text: false,
        }
    }

    fn open_root(&mut self) -> Result<()> {
        self.writer.write(
            XmlEvent::start_element("speak")
                .attr("version", "1.0")
                .default_ns(SSML_NAMESPACE)
                .attr("xml:lang", &self.converter.default_language),
        )?;
        Ok(())
    }

    fn open(&mut self, tag: &str, attrs: &[(&str, String)]) -> Result<()> {
        let mut event = XmlEvent::start_element(tag);
        for (name, value) in attrs {
            event = event.attr(*name, value);
        }
        self.writer.write(event)?;
        Ok(())
    }

    fn close(&mut self, tag: &str) -> Result<()> {
        self.writer.write(XmlEvent::end_element().name(tag))?;
        Ok(())
    }

    fn text(&mut self, text: &str) -> Result<()> {
        if text.is_empty() {
            return Ok(());
        }
        if self.spell_text {
            self.open("say-as", &[("interpret-as", "characters".into())])?;
            self.writer.write(text)?;
            self.close("say-as")
        } else {
            self.writer.write(text)?;
            Ok(())
        }
    }

    fn flush_tags(&mut self) -> Result<()> {
        if !self.tags.changed {
            return Ok(());
        }
        while let Some(tag) = self.open_tags.pop() {
            self.close(tag)?;
        }
        let tags = std::mem::take(&mut self.tags.tags);
        for (tag, attrs) in &tags {
            self.open(tag, attrs)?;
            self.open_tags.push(*tag);
        }
        self.tags.tags = tags;
        self.tags.changed = false;
        Ok(())
    }

    fn set_prosody(&mut self, attr: &'static str, multiplier: f64) {
        if attr == "volume" {
            if let Some(base) = self.converter.base_volume {
                let volume = (f64::from(base.value()) * multiplier).round().max(0.0);
                self.tags.set("prosody", "volume", format!("{}", volume as u32));
                return;
            }
        }
        if multiplier == 1.0 {
            self.tags.remove("prosody", attr);
        } else {
            self.tags.set("prosody", attr, format!("{}%", (multiplier * 100.0) as i64));
        }
    }

    fn convert_item(&mut self, item: &SpeechItem) -> Result<()> {
        match item {
            SpeechItem::Text(text) => self.text(text)?,
            SpeechItem::Index(index) => {
                self.open("mark", &[("name", index.to_string())])?;
                self.close("mark")?;
            }
            SpeechItem::CharacterMode(state) => {
                if self.converter.character_mode {
                    self.spell_text = *state;
                }
            }
            SpeechItem::LangChange(lang) => {
                let lang = match lang {
                    Some(lang) => to_xml_lang(lang),
                    None => self.converter.default_language.clone(),
                };
                self.tags.set("voice", "xml:lang", lang);
            }
            SpeechItem::Break(millis) => {
                self.open("break", &[("time", format!("{}ms", millis))])?;
                self.close("break")?;
            }
            SpeechItem::Pitch(multiplier) => self.set_prosody("pitch", *multiplier),
            SpeechItem::Rate(multiplier) => self.set_prosody("rate", *multiplier),
            SpeechItem::Volume(multiplier) => self.set_prosody("volume", *multiplier),
            SpeechItem::Phoneme { ipa, text } => {
                self.open("phoneme", &[("alphabet", "ipa".into()), ("ph", ipa.clone())])?;
                self.writer.write(text.as_str())?;
                self.close("phoneme")?;
            }
        }
        Ok(())
    }

    fn finish(mut self) -> Result<String> {
        while let Some(tag) = self.open_tags.pop() {
            self.close(tag)?;
        }
        self.close("speak")?;
        Ok(String::from_utf8_lossy(&self.writer.into_inner()).into_owned())
    }
}

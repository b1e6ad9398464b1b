use windows::core::{Interface, HSTRING};
use windows::Media::SpeechSynthesis::{SpeechSynthesisStream, SpeechSynthesizer, VoiceInformation};
use windows::Storage::Streams::{Buffer, IBuffer, InputStreamOptions};
use windows::Win32::System::WinRT::IBufferByteAccess;

use crate::com_util::{Operation, ProgressOperation};
use crate::markers::{Marker, MarkerList};
use crate::tts::engine::{AudioData, SpeechEngine, SynthesizedStream};
use crate::tts::VoiceInfo;
use crate::{Error, Result};

mod properties;

/// A speech engine backed by the OneCore voices of `Windows.Media.SpeechSynthesis`.
pub struct OneCoreSynthesizer {
    synth: SpeechSynthesizer,
}

impl OneCoreSynthesizer {
    /// Creates a synthesizer set to the system's default voice.
    pub fn new() -> Result<Self> {
        Ok(Self {
            synth: SpeechSynthesizer::new()?,
        })
    }
}

impl SpeechEngine for OneCoreSynthesizer {
    type Stream = SpeechSynthesisStream;
    type Synthesis = Operation<SpeechSynthesisStream>;

    fn synthesize(&self, ssml: &str) -> Result<Self::Synthesis> {
        Ok(Operation(self.synth.SynthesizeSsmlToStreamAsync(&HSTRING::from(ssml))?))
    }

    fn voices(&self) -> Result<Vec<VoiceInfo>> {
        SpeechSynthesizer::AllVoices()?.into_iter().map(voice_info).collect()
    }

    fn current_voice(&self) -> Result<VoiceInfo> {
        voice_info(self.synth.Voice()?)
    }

    fn set_voice(&self, index: usize) -> Result<()> {
        let voices = SpeechSynthesizer::AllVoices()?;
        let count = voices.Size()? as usize;
        if index >= count {
            return Err(Error::VoiceIndexOutOfRange {
                index,
                count,
            });
        }
        Ok(self.synth.SetVoice(&voices.GetAt(index as u32)?)?)
    }

    fn set_property(&self, name: &str, value: i32) -> Result<()> {
        properties::set_voice_property(&self.synth, name, value)
    }
}

fn voice_info(info: VoiceInformation) -> Result<VoiceInfo> {
    Ok(VoiceInfo {
        id: info.Id()?.to_string_lossy(),
        display_name: info.DisplayName()?.to_string_lossy(),
        language: info.Language()?.to_string_lossy(),
    })
}

impl SynthesizedStream for SpeechSynthesisStream {
    type Audio = IBuffer;
    type Read = ProgressOperation<IBuffer, u32>;

    fn markers(&self) -> Result<MarkerList> {
        let mut markers = MarkerList::new();
        for marker in self.Markers()? {
            let text = marker.Text()?.to_string_lossy();
            markers.push(Marker::from_ticks(text, marker.Time()?.Duration));
        }
        Ok(markers)
    }

    fn read_to_end(&self) -> Result<Self::Read> {
        let size = u32::try_from(self.Size()?)
            .map_err(|_| Error::Engine("speech stream exceeds 4 GiB".into()))?;
        let buffer = Buffer::Create(size)?;
        Ok(ProgressOperation(self.ReadAsync(&buffer, size, InputStreamOptions::None)?))
    }
}

impl AudioData for IBuffer {
    fn bytes(&self) -> Result<&[u8]> {
        let len = self.Length()? as usize;
        if len == 0 {
            return Ok(&[]);
        }
        // Borrow the buffer's storage in place instead of copying it out.
        let access = self.cast::<IBufferByteAccess>()?;
        let data = unsafe { access.Buffer() }?;
        Ok(unsafe { std::slice::from_raw_parts(data, len) })
    }
}

//! The flat function table the DLL exports for hosts that can't use the Rust API.
//!
//! Every export takes the opaque [`Instance`] handle returned by `ocSpeech_initialize` and
//! tolerates a null one. Strings cross the boundary as NUL-terminated UTF-16. Audio arrives through
//! the registered [`SpeechCallback`] on an engine thread, some time after `ocSpeech_speak` returns.
#![allow(non_snake_case)]

use std::ptr::{null, null_mut};
use std::sync::{Mutex, MutexGuard, PoisonError};

use log::{error, warn};
use windows::core::BSTR;

use crate::com_util::{from_wide_ptr, to_wide_nul};
use crate::markers::MarkerList;
use crate::tts::{self, AudioSink, OneCoreSynthesizer, SpeechEngine, VoiceInfo};
use crate::Error;

/// Receives the audio of an utterance: a pointer to the bytes, their count, and the markers in
/// `text:ticks|...` form. The pointers are only valid for the duration of the call. The return
/// value is ignored.
pub type SpeechCallback =
    unsafe extern "C" fn(data: *const u8, length: i32, markers: *const u16) -> i32;

/// State behind the handle handed out to the host.
pub struct Instance {
    synth: OneCoreSynthesizer,
    callback: Mutex<Option<SpeechCallback>>,
    voice_id: Mutex<Vec<u16>>,
    language: Mutex<Vec<u16>>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl Instance {
    fn cache_string(&self, slot: &Mutex<Vec<u16>>, value: &str) -> *const u16 {
        let mut slot = lock(slot);
        *slot = to_wide_nul(value);
        slot.as_ptr()
    }
}

struct CallbackSink(SpeechCallback);

impl AudioSink for CallbackSink {
    fn deliver(self, audio: &[u8], markers: &MarkerList) {
        let length = match i32::try_from(audio.len()) {
            Ok(length) => length,
            Err(_) => {
                error!("Dropping {} bytes of audio, too many for the callback", audio.len());
                return;
            }
        };
        let markers = markers.to_wide();
        unsafe { (self.0)(audio.as_ptr(), length, markers.as_ptr()) };
    }
}

/// Creates an instance backed by a new OneCore synthesizer. Returns null on failure.
#[no_mangle]
pub extern "system" fn ocSpeech_initialize() -> *mut Instance {
    match OneCoreSynthesizer::new() {
        Ok(synth) => Box::into_raw(Box::new(Instance {
            synth,
            callback: Mutex::new(None),
            voice_id: Mutex::new(Vec::new()),
            language: Mutex::new(Vec::new()),
        })),
        Err(err) => {
            error!("Could not create the speech synthesizer: {}", err);
            null_mut()
        }
    }
}

/// Destroys an instance. Speech already submitted still completes and reaches the callback.
///
/// # Safety
///
/// `instance` must be null or a handle from `ocSpeech_initialize` that hasn't been terminated.
#[no_mangle]
pub unsafe extern "system" fn ocSpeech_terminate(instance: *mut Instance) {
    if !instance.is_null() {
        drop(Box::from_raw(instance));
    }
}

/// Registers the callback that receives synthesized audio. Null unregisters it.
///
/// # Safety
///
/// `instance` must be null or a live handle.
#[no_mangle]
pub unsafe extern "system" fn ocSpeech_setCallback(
    instance: *mut Instance,
    callback: Option<SpeechCallback>,
) {
    if let Some(instance) = instance.as_ref() {
        *lock(&instance.callback) = callback;
    }
}

/// Submits SSML for synthesis. Returns 0 once submitted and -1 if submission failed, in which case
/// the callback won't be called. Failures after submission are logged and dropped.
///
/// # Safety
///
/// `instance` must be null or a live handle; `text` must be null or a NUL-terminated UTF-16
/// string.
#[no_mangle]
pub unsafe extern "system" fn ocSpeech_speak(instance: *mut Instance, text: *const u16) -> i32 {
    let (Some(instance), Some(text)) = (instance.as_ref(), from_wide_ptr(text)) else {
        return -1;
    };
    let Some(callback) = *lock(&instance.callback) else {
        warn!("Speech submitted before a callback was registered");
        return -1;
    };
    match tts::speak(&instance.synth, &text, CallbackSink(callback)) {
        Ok(()) => 0,
        Err(err) => {
            warn!("Could not submit speech: {}", err);
            -1
        }
    }
}

/// Lists the installed voices as `id:displayName` entries joined with `|`. The caller owns the
/// returned `BSTR` and must free it with `SysFreeString`. Returns null on failure, and also when no
/// voices are installed, since an empty `BSTR` is a null pointer.
///
/// # Safety
///
/// `instance` must be null or a live handle.
#[no_mangle]
pub unsafe extern "system" fn ocSpeech_getVoices(instance: *mut Instance) -> *const u16 {
    let Some(instance) = instance.as_ref() else {
        return null();
    };
    let voices = match instance.synth.voices() {
        Ok(voices) => voices,
        Err(err) => {
            warn!("Could not list voices: {}", err);
            return null();
        }
    };
    if voices.is_empty() {
        warn!("No voices are installed");
        return null();
    }
    let joined = voices.iter().map(VoiceInfo::to_abi_entry).collect::<Vec<_>>().join("|");
    let wide: Vec<u16> = joined.encode_utf16().collect();
    match BSTR::from_wide(&wide) {
        Ok(bstr) => bstr.into_raw(),
        Err(err) => {
            error!("Could not allocate the voice list: {}", err);
            null()
        }
    }
}

/// Returns the identifier of the current voice. The string stays valid until the next call to this
/// function on the same instance. Returns null on failure.
///
/// # Safety
///
/// `instance` must be null or a live handle.
#[no_mangle]
pub unsafe extern "system" fn ocSpeech_getCurrentVoiceId(instance: *mut Instance) -> *const u16 {
    let Some(instance) = instance.as_ref() else {
        return null();
    };
    match instance.synth.current_voice() {
        Ok(voice) => instance.cache_string(&instance.voice_id, &voice.id),
        Err(err) => {
            warn!("Could not query the current voice: {}", err);
            null()
        }
    }
}

/// Selects the voice at the given position in the `ocSpeech_getVoices` list.
///
/// # Safety
///
/// `instance` must be null or a live handle.
#[no_mangle]
pub unsafe extern "system" fn ocSpeech_setVoice(instance: *mut Instance, index: i32) {
    let Some(instance) = instance.as_ref() else {
        return;
    };
    let result = match usize::try_from(index) {
        Ok(index) => instance.synth.set_voice(index),
        Err(_) => Err(Error::Engine(format!("negative voice index {}", index))),
    };
    if let Err(err) = result {
        warn!("Could not select voice {}: {}", index, err);
    }
}

/// Returns the language tag of the current voice, e.g. `en-US`. The string stays valid until the
/// next call to this function on the same instance. Returns null on failure.
///
/// # Safety
///
/// `instance` must be null or a live handle.
#[no_mangle]
pub unsafe extern "system" fn ocSpeech_getCurrentVoiceLanguage(
    instance: *mut Instance,
) -> *const u16 {
    let Some(instance) = instance.as_ref() else {
        return null();
    };
    match instance.synth.current_voice() {
        Ok(voice) => instance.cache_string(&instance.language, &voice.language),
        Err(err) => {
            warn!("Could not query the current voice: {}", err);
            null()
        }
    }
}

/// Sets a named numeric voice property, such as `MSTTS.SpeakRate` or `MSTTS.Pitch`.
///
/// # Safety
///
/// `instance` must be null or a live handle; `name` must be null or a NUL-terminated UTF-16
/// string.
#[no_mangle]
pub unsafe extern "system" fn ocSpeech_setProperty(
    instance: *mut Instance,
    name: *const u16,
    value: i32,
) {
    let (Some(instance), Some(name)) = (instance.as_ref(), from_wide_ptr(name)) else {
        return;
    };
    // Failures are already logged by the engine.
    let _ = instance.synth.set_property(&name, value);
}

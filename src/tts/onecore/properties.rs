use std::ffi::c_void;

use log::error;
use windows::core::HSTRING;
use windows::Media::SpeechSynthesis::SpeechSynthesizer;
use windows_core::{interface, IUnknown, IUnknown_Vtbl, Interface, HRESULT};

use crate::Result;

/// The synthesizer's private property interface. It derives from `IInspectable`, whose slots are
/// declared here only to keep the vtable layout; they are never called through it.
#[interface("36d1caa6-9da3-4827-a6d1-53bdd2115f10")]
unsafe trait IVoiceProperties: IUnknown {
    unsafe fn GetIids(&self) -> HRESULT;
    unsafe fn GetRuntimeClassName(&self) -> HRESULT;
    unsafe fn GetTrustLevel(&self) -> HRESULT;
    unsafe fn ParseSsmlIntoText(&self) -> HRESULT;
    unsafe fn SetVoicePropertyNum(&self, name: *mut c_void, value: i32) -> HRESULT;
}

pub(super) fn set_voice_property(synth: &SpeechSynthesizer, name: &str, value: i32) -> Result<()> {
    let props = synth.cast::<IVoiceProperties>().map_err(|err| {
        error!("Synthesizer doesn't expose the voice property interface: {}", err);
        err
    })?;
    let name = HSTRING::from(name);
    // The callee borrows the string handle; `name` keeps ownership.
    let raw_name: *mut c_void = unsafe { std::mem::transmute_copy(&name) };
    unsafe { props.SetVoicePropertyNum(raw_name, value) }.ok().map_err(|err| {
        error!("Setting voice property {} to {} failed: {}", name, value, err);
        err.into()
    })
}

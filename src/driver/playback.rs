use std::sync::atomic::{AtomicBool, Ordering};

use log::debug;

use crate::audio::AudioFormat;
use crate::markers::MarkerList;

/// Where the driver sends synthesized audio and progress notifications. Methods are called from
/// engine threads.
pub trait AudioOutput: Send + Sync + 'static {
    /// Queues a chunk of PCM audio for playback. May block until the previous chunk has played.
    fn feed(&self, audio: &[u8]);

    /// Stops playback immediately, discarding anything queued.
    fn stop(&self);

    /// Reports that speech has reached the bookmark with the given index.
    fn index_reached(&self, index: u32);

    /// Reports that the driver has no more speech in flight or queued.
    fn idle(&self) {}
}

/// Feeds `audio` to `output` in chunks that end at the bookmarks in `markers`, so that progress
/// can be reported as playback reaches each of them. Stops early once `cancelled` is set.
///
/// `feed` only blocks until the *previous* chunk is done, so each bookmark is reported after the
/// chunk following it has been fed.
pub(crate) fn play_with_markers<O: AudioOutput + ?Sized>(
    output: &O,
    audio: &[u8],
    markers: &MarkerList,
    format: &AudioFormat,
    cancelled: &AtomicBool,
) {
    let mut prev_index = None;
    let mut prev_pos = 0;
    for marker in markers {
        if cancelled.load(Ordering::SeqCst) {
            break;
        }
        let index = match marker.text.parse::<u32>() {
            Ok(index) => index,
            Err(_) => {
                debug!("Ignoring marker {:?}, it's not an index", marker.text);
                continue;
            }
        };
        let pos = marker.byte_offset(format).clamp(prev_pos, audio.len());
        output.feed(&audio[prev_pos..pos]);
        if let Some(prev) = prev_index {
            output.index_reached(prev);
        }
        prev_index = Some(index);
        prev_pos = pos;
    }
    if cancelled.load(Ordering::SeqCst) {
        debug!("Cancelled, stopped pushing audio");
        return;
    }
    output.feed(&audio[prev_pos..]);
    if let Some(prev) = prev_index {
        output.index_reached(prev);
    }
    debug!("Done pushing audio");
}

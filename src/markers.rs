//! Timing markers the engine emits alongside synthesized audio, and their pipe-delimited wire form.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use crate::audio::AudioFormat;
use crate::{Error, Result};

/// The number of 100-nanosecond ticks in one second.
pub const TICKS_PER_SEC: u64 = 10_000_000;

const NANOS_PER_TICK: u64 = 100;

/// A bookmark or word boundary the engine reached at a given offset into the audio.
#[derive(Debug, Hash, PartialEq, Eq, Clone)]
pub struct Marker {
    /// The bookmark name or the word text.
    pub text: String,
    /// Time elapsed from the start of the audio.
    pub offset: Duration,
}

impl Marker {
    /// Constructs a marker from a platform time span expressed in 100-nanosecond ticks. Negative
    /// spans are treated as zero.
    pub fn from_ticks<S: Into<String>>(text: S, ticks: i64) -> Self {
        let ticks = ticks.max(0) as u64;
        let secs = Duration::from_secs(ticks / TICKS_PER_SEC);
        let rest = Duration::from_nanos((ticks % TICKS_PER_SEC) * NANOS_PER_TICK);
        Self {
            text: text.into(),
            offset: secs + rest,
        }
    }

    /// The offset in 100-nanosecond ticks.
    pub fn ticks(&self) -> u64 {
        (self.offset.as_nanos() / NANOS_PER_TICK as u128) as u64
    }

    /// The byte offset into raw PCM audio of the given format that corresponds to this marker.
    pub fn byte_offset(&self, format: &AudioFormat) -> usize {
        // Multiply first to stay in integer math.
        let offset = (self.ticks() as u128) * (format.bytes_per_sec() as u128)
            / (TICKS_PER_SEC as u128);
        usize::try_from(offset).unwrap_or(usize::MAX)
    }
}

impl fmt::Display for Marker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.text, self.ticks())
    }
}

impl FromStr for Marker {
    type Err = Error;
    fn from_str(s: &str) -> Result<Self> {
        let (text, ticks) = s.rsplit_once(':').ok_or_else(|| Error::MalformedMarker(s.into()))?;
        let ticks = ticks.trim().parse::<i64>().map_err(|_| Error::MalformedMarker(s.into()))?;
        Ok(Self::from_ticks(text, ticks))
    }
}

/// An ordered list of markers. Its string form is `text:ticks` entries joined with `|`.
///
/// The string form has no escaping, so it only parses back when no marker text contains `|`.
/// Bookmark names produced by [`ssml`](crate::ssml) are numbers and always qualify.
#[derive(Debug, Default, Hash, PartialEq, Eq, Clone)]
pub struct MarkerList {
    markers: Vec<Marker>,
}

impl MarkerList {
    /// Constructs an empty list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a marker.
    pub fn push(&mut self, marker: Marker) {
        self.markers.push(marker)
    }

    /// Number of markers in the list.
    pub fn len(&self) -> usize {
        self.markers.len()
    }

    /// Whether the list has no markers.
    pub fn is_empty(&self) -> bool {
        self.markers.is_empty()
    }

    /// Iterates over the markers in emission order.
    pub fn iter(&self) -> std::slice::Iter<'_, Marker> {
        self.markers.iter()
    }

    /// Renders the list as a NUL-terminated UTF-16 string, ready to hand to a foreign callback.
    pub fn to_wide(&self) -> Vec<u16> {
        crate::com_util::to_wide_nul(self.to_string())
    }
}

impl fmt::Display for MarkerList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (idx, marker) in self.markers.iter().enumerate() {
            if idx > 0 {
                f.write_str("|")?;
            }
            write!(f, "{}", marker)?;
        }
        Ok(())
    }
}

impl FromStr for MarkerList {
    type Err = Error;
    fn from_str(s: &str) -> Result<Self> {
        if s.is_empty() {
            return Ok(Self::new());
        }
        s.split('|').map(Marker::from_str).collect()
    }
}

impl FromIterator<Marker> for MarkerList {
    fn from_iter<I: IntoIterator<Item = Marker>>(iter: I) -> Self {
        Self {
            markers: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for MarkerList {
    type Item = Marker;
    type IntoIter = std::vec::IntoIter<Marker>;
    fn into_iter(self) -> Self::IntoIter {
        self.markers.into_iter()
    }
}

impl<'m> IntoIterator for &'m MarkerList {
    type Item = &'m Marker;
    type IntoIter = std::slice::Iter<'m, Marker>;
    fn into_iter(self) -> Self::IntoIter {
        self.markers.iter()
    }
}

use std::fmt::Display;

use strum_macros::{AsRefStr, EnumString, IntoStaticStr};

macro_rules! decl_clamped_int {
    {$(#[$meta:meta])* $name:ident($base:ty) in $min:literal..$max:literal} => {
        $(#[$meta])*
        #[derive(Debug, Hash, PartialEq, Eq, PartialOrd, Ord, Clone, Copy)]
        pub struct $name($base);

        impl $name {
            /// The lowest value an instance can hold.
            pub const MIN: $base = $min;
            /// The highest value an instance can hold.
            pub const MAX: $base = $max;

            /// Clamps the given value to the interval
            #[doc = concat!("[", stringify!($min), ", ", stringify!($max), "]")]
            /// and constructs a new instance from it.
            pub fn new(value: $base) -> Self {
                Self(value.clamp($min, $max))
            }

            /// Returns the value encapsulated by this instance.
            pub fn value(&self) -> $base {
                self.0
            }
        }

        impl From<$base> for $name {
            fn from(source: $base) -> Self {
                Self::new(source)
            }
        }

        impl From<$name> for $base {
            fn from(source: $name) -> Self {
                source.0
            }
        }

        impl Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

macro_rules! impl_percent_mapping {
    ($name:ident) => {
        impl $name {
            /// Maps a percentage in [0, 100] onto the engine's parameter range.
            pub fn from_percent(percent: u32) -> Self {
                Self::new(percent_to_param(percent, Self::MIN, Self::MAX))
            }

            /// Maps this parameter back onto a percentage in [0, 100].
            pub fn percent(&self) -> u32 {
                param_to_percent(self.0, Self::MIN, Self::MAX)
            }
        }
    };
}

decl_clamped_int! {
    /// Speech rate as the engine understands it, in the interval [-100, 100], with 0 being normal
    /// speed.
    Rate(i32) in -100..100
}

decl_clamped_int! {
    /// Voice pitch as the engine understands it, in the interval [-100, 100], with 0 being normal
    /// pitch.
    Pitch(i32) in -100..100
}

decl_clamped_int! {
    /// Voice volume, represented as a percentage in the interval [0, 100].
    Volume(u32) in 0..100
}

impl_percent_mapping!(Rate);
impl_percent_mapping!(Pitch);

fn percent_to_param(percent: u32, min: i32, max: i32) -> i32 {
    let percent = percent.min(100) as f64;
    (percent / 100.0 * f64::from(max - min) + f64::from(min)).round() as i32
}

fn param_to_percent(value: i32, min: i32, max: i32) -> u32 {
    let percent = f64::from(value - min) / f64::from(max - min) * 100.0;
    percent.round().clamp(0.0, 100.0) as u32
}

/// Numeric voice properties that can be changed through the engine's private property interface.
#[derive(Debug, Hash, PartialEq, Eq, Clone, Copy, AsRefStr, EnumString, IntoStaticStr)]
pub enum VoiceProperty {
    /// Speaking rate, in the same range as [`Rate`].
    #[strum(serialize = "MSTTS.SpeakRate")]
    SpeakRate,
    /// Baseline pitch, in the same range as [`Pitch`].
    #[strum(serialize = "MSTTS.Pitch")]
    Pitch,
}

//! Tempo classification.
//!
//! The visualization picks its color scheme from how fast a song is,
//! using five coarse tempo categories.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumCount, EnumIter};

/// A color with channels in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rgb(pub f64, pub f64, pub f64);

impl Rgb {
    /// CSS hex notation, e.g. `#08306b`.
    #[must_use]
    #[inline]
    pub fn to_hex(self) -> String {
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let channel = |c: f64| (c.clamp(0., 1.) * 255.).round() as u8;
        format!(
            "#{:02x}{:02x}{:02x}",
            channel(self.0),
            channel(self.1),
            channel(self.2)
        )
    }
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumIter, EnumCount,
)]
pub enum TempoCategory {
    /// Below 70 BPM.
    #[serde(rename = "Very slow")]
    #[strum(to_string = "Very slow")]
    VerySlow,
    /// 70 up to 90 BPM.
    #[serde(rename = "Slow")]
    #[strum(to_string = "Slow")]
    Slow,
    /// 90 up to 120 BPM.
    #[serde(rename = "Moderate")]
    #[strum(to_string = "Moderate")]
    Moderate,
    /// 120 up to 150 BPM.
    #[serde(rename = "Fast")]
    #[strum(to_string = "Fast")]
    Fast,
    /// 150 BPM and above.
    #[serde(rename = "Very fast")]
    #[strum(to_string = "Very fast")]
    VeryFast,
}

impl TempoCategory {
    /// Classify a tempo given in beats per minute.
    ///
    /// Returns `None` if the tempo is NaN, which is what the upstream beat
    /// tracker reports when it couldn't find a beat.
    #[must_use]
    #[inline]
    pub fn from_bpm(bpm: f64) -> Option<Self> {
        if bpm.is_nan() {
            return None;
        }
        Some(if bpm < 70. {
            Self::VerySlow
        } else if bpm < 90. {
            Self::Slow
        } else if bpm < 120. {
            Self::Moderate
        } else if bpm < 150. {
            Self::Fast
        } else {
            Self::VeryFast
        })
    }

    /// The label shown next to the bars.
    #[must_use]
    #[inline]
    pub const fn label(self) -> &'static str {
        match self {
            Self::VerySlow => "Very slow",
            Self::Slow => "Slow",
            Self::Moderate => "Moderate",
            Self::Fast => "Fast",
            Self::VeryFast => "Very fast",
        }
    }

    /// Four color stops, darkest first, for gradients and colormaps.
    #[must_use]
    #[inline]
    pub const fn palette(self) -> [Rgb; 4] {
        match self {
            // blues
            Self::VerySlow => [
                Rgb(0.031, 0.188, 0.419),
                Rgb(0.122, 0.467, 0.706),
                Rgb(0.267, 0.667, 0.871),
                Rgb(0.569, 0.843, 0.941),
            ],
            // blue to green
            Self::Slow => [
                Rgb(0.031, 0.188, 0.419),
                Rgb(0.173, 0.459, 0.675),
                Rgb(0.224, 0.639, 0.706),
                Rgb(0.204, 0.796, 0.667),
            ],
            // green to yellow
            Self::Moderate => [
                Rgb(0.173, 0.459, 0.675),
                Rgb(0.224, 0.639, 0.706),
                Rgb(0.298, 0.784, 0.565),
                Rgb(0.863, 0.902, 0.243),
            ],
            // oranges
            Self::Fast => [
                Rgb(0.298, 0.784, 0.565),
                Rgb(0.769, 0.843, 0.267),
                Rgb(0.992, 0.678, 0.153),
                Rgb(0.957, 0.427, 0.263),
            ],
            // reds
            Self::VeryFast => [
                Rgb(0.863, 0.471, 0.184),
                Rgb(0.957, 0.427, 0.263),
                Rgb(0.890, 0.102, 0.110),
                Rgb(0.698, 0.016, 0.016),
            ],
        }
    }
}

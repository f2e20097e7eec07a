//! The document handed over to the static viewer.

use serde::{Deserialize, Serialize};

use crate::{Feature, errors::DocumentError, tempo::TempoCategory};

/// Name of the global the viewer reads its data from.
pub const JS_GLOBAL: &str = "audioData";

/// Everything the viewer needs to draw one song.
///
/// Serialized with camelCase keys, optional fields are left out when unset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Visualization {
    pub filename: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub artist: Option<String>,
    /// URI of the audio preview, the viewer plays it as the bars pulse.
    #[serde(rename = "audio_uri", default, skip_serializing_if = "Option::is_none")]
    pub audio_uri: Option<String>,
    /// In seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<f64>,
    /// In beats per minute.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tempo: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tempo_category: Option<TempoCategory>,
    pub bar_values: Vec<Feature>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spectrogram_uri: Option<String>,
}

impl Visualization {
    #[must_use]
    #[inline]
    pub fn new(filename: impl Into<String>, bar_values: Vec<Feature>) -> Self {
        Self {
            filename: filename.into(),
            title: None,
            artist: None,
            audio_uri: None,
            duration: None,
            tempo: None,
            tempo_category: None,
            bar_values,
            spectrogram_uri: None,
        }
    }

    /// Set the tempo, and the tempo category that goes with it.
    #[must_use]
    #[inline]
    pub fn with_tempo(mut self, bpm: f64) -> Self {
        self.tempo = Some(bpm);
        self.tempo_category = TempoCategory::from_bpm(bpm);
        self
    }

    #[must_use]
    #[inline]
    pub fn with_duration(mut self, seconds: f64) -> Self {
        self.duration = Some(seconds);
        self
    }

    #[must_use]
    #[inline]
    pub fn with_spectrogram(mut self, uri: impl Into<String>) -> Self {
        self.spectrogram_uri = Some(uri.into());
        self
    }

    #[must_use]
    #[inline]
    pub fn with_track(mut self, title: impl Into<String>, artist: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self.artist = Some(artist.into());
        self
    }

    #[must_use]
    #[inline]
    pub fn with_audio(mut self, uri: impl Into<String>) -> Self {
        self.audio_uri = Some(uri.into());
        self
    }

    /// Pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Fails if the document can't be serialized.
    #[inline]
    pub fn to_json(&self) -> Result<String, DocumentError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// A script defining the [`JS_GLOBAL`] constant, for pages opened from
    /// disk where `fetch`ing a JSON file isn't allowed.
    ///
    /// # Errors
    ///
    /// Fails if the document can't be serialized.
    #[inline]
    pub fn to_js_module(&self) -> Result<String, DocumentError> {
        Ok(format!(
            "const {JS_GLOBAL} = {};\n",
            serde_json::to_string(self)?
        ))
    }
}

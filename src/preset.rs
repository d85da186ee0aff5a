//! Presets suggested by an external text-to-preset service.
//!
//! The service is a black box that answers a free-text prompt with JSON
//! shaped like
//!
//! ```json
//! { "presets": [ { "name": "...", "description": "...",
//!                  "params": { "drive": 80, "resonance": 0.9, "disperser": 0.6,
//!                              "width": 1, "rootNote": "F#", "chordType": "Min7",
//!                              "octave": 4 } } ] }
//! ```
//!
//! Nothing in that answer is trusted. Missing or unreadable fields fall back
//! to a base snapshot, every number is clamped into its domain, and any
//! failure at all becomes an empty list.

use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, warn};

use crate::chord::{ChordQuality, PitchClass};
use crate::params::{Snapshot, OCTAVE_RANGE};

#[derive(Debug, Error)]
pub enum PresetError {
    #[error("preset service unreachable: {0}")]
    Transport(String),

    #[error("preset service timed out")]
    Timeout,

    #[error("preset service quota exhausted")]
    Quota,

    #[error("malformed preset response: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// Anything that can turn a prompt into raw preset JSON.
pub trait PresetService {
    fn generate(&self, prompt: &str) -> Result<String, PresetError>;
}

#[derive(Debug, Clone, PartialEq)]
pub struct Preset {
    pub name: String,
    pub description: String,
    pub snapshot: Snapshot,
}

#[derive(Deserialize)]
struct Response {
    #[serde(default)]
    presets: Vec<serde_json::Value>,
}

#[derive(Deserialize)]
struct RawPreset {
    #[serde(default)]
    name: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    params: RawParams,
}

#[derive(Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct RawParams {
    #[serde(alias = "color")]
    drive: Option<f64>,
    flow: Option<f64>,
    depth: Option<f64>,
    resonance: Option<f64>,
    disperser: Option<f64>,
    width: Option<f64>,
    #[serde(alias = "root")]
    root_note: Option<String>,
    #[serde(alias = "quality")]
    chord_type: Option<String>,
    octave: Option<f64>,
}

impl RawParams {
    fn into_snapshot(self, base: &Snapshot) -> Snapshot {
        let unit = |value: Option<f64>, fallback: f32| value.map_or(fallback, |v| v as f32);

        // the service reports drive as a percentage
        let drive = self.drive.map_or(base.drive, |d| {
            if d > 1.0 {
                (d / 100.0) as f32
            } else {
                d as f32
            }
        });

        let octave = self
            .octave
            .filter(|o| o.is_finite())
            .map_or(base.octave, |o| o.round() as i32)
            .clamp(OCTAVE_RANGE.0, OCTAVE_RANGE.1);

        Snapshot {
            drive,
            flow: unit(self.flow, base.flow),
            depth: unit(self.depth, base.depth),
            resonance: unit(self.resonance, base.resonance),
            disperser: unit(self.disperser, base.disperser),
            width: unit(self.width, base.width),
            root: self
                .root_note
                .as_deref()
                .and_then(PitchClass::from_name)
                .unwrap_or(base.root),
            quality: self
                .chord_type
                .as_deref()
                .and_then(ChordQuality::from_name)
                .unwrap_or(base.quality),
            octave,
        }
        .sanitized()
    }
}

/// Parse a raw service answer. Unreadable presets are skipped.
pub fn parse_presets(raw: &str, base: &Snapshot) -> Result<Vec<Preset>, PresetError> {
    let response: Response = serde_json::from_str(raw)?;

    let presets = response
        .presets
        .into_iter()
        .filter_map(|value| match serde_json::from_value::<RawPreset>(value) {
            Ok(preset) => Some(Preset {
                name: preset.name,
                description: preset.description,
                snapshot: preset.params.into_snapshot(base),
            }),
            Err(err) => {
                debug!(%err, "skipping unreadable preset");
                None
            }
        })
        .collect();

    Ok(presets)
}

/// Ask `service` for presets matching `prompt`.
///
/// Never fails: every error is logged and reported as "no suggestions".
pub fn suggest_presets(service: &dyn PresetService, prompt: &str, base: &Snapshot) -> Vec<Preset> {
    let result = service
        .generate(prompt)
        .and_then(|raw| parse_presets(&raw, base));

    match result {
        Ok(presets) => presets,
        Err(err) => {
            warn!(%err, "preset suggestion failed");
            Vec::new()
        }
    }
}

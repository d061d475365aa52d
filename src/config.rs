//! Runtime tuning for the backdrops, loaded from an optional JSON file.
//!
//! Every key defaults to the values the portfolio page ships with, so a
//! config file only needs the keys it changes:
//!
//! ```json
//! { "field": { "dot_count": 5000 }, "host": { "footer_opacity": 0.8 } }
//! ```

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Disc/dot tunnel tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldConfig {
    /// Depth rings in the tunnel
    pub disc_count: usize,
    /// Stars spread over the rings
    pub dot_count: usize,
    /// Disc progress added per frame (not per second)
    pub speed: f64,
    /// Upper bound of a dot's per-frame radial progress
    pub dot_speed: f32,
    pub stroke_color: (u8, u8, u8),
    pub background: (u8, u8, u8),
}

impl Default for FieldConfig {
    fn default() -> Self {
        Self {
            disc_count: 150,
            dot_count: 20_000,
            speed: 0.0001,
            dot_speed: 0.001,
            // #310
            stroke_color: (0x33, 0x11, 0x00),
            background: (0, 0, 0),
        }
    }
}

/// Footer fireworks tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FireworksConfig {
    /// First automatic spawn interval range, in frames
    pub first_interval: (u32, u32),
    /// Interval range re-rolled after each automatic spawn, in frames
    pub interval: (u32, u32),
    /// Launch velocity range (negative is upward)
    pub launch_dy: (i32, i32),
    /// Horizontal velocity of ambient mortars, scaled by the drift wave
    pub ambient_dx: f32,
    /// Particles per explosion, inclusive
    pub burst: (u32, u32),
    /// Ember color as HSL (degrees, 0-1, 0-1)
    pub hue: f32,
    pub saturation: f32,
    pub lightness: f32,
    /// Trail veil color and opacity applied every frame
    pub veil_color: (u8, u8, u8),
    pub veil_opacity: f32,
}

impl Default for FireworksConfig {
    fn default() -> Self {
        Self {
            first_interval: (80, 170),
            interval: (50, 150),
            launch_dy: (-12, -7),
            ambient_dx: 0.0,
            burst: (20, 40),
            hue: 24.6,
            saturation: 0.95,
            lightness: 0.531,
            veil_color: (10, 10, 10),
            veil_opacity: 0.2,
        }
    }
}

/// Window layout for the desktop host
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HostConfig {
    /// Share of the window height given to the footer band
    pub footer_fraction: f32,
    /// Opacity of the footer layer when screened over the tunnel
    pub footer_opacity: f32,
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            footer_fraction: 0.35,
            footer_opacity: 0.6,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub field: FieldConfig,
    pub fireworks: FireworksConfig,
    pub host: HostConfig,
}

impl Config {
    /// Parse a config from JSON text
    pub fn from_json(json: &str, origin: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(json).map_err(|source| ConfigError::Parse {
            path: origin.to_string(),
            source,
        })
    }

    /// Load config from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json(&json, &path.display().to_string())
    }
}

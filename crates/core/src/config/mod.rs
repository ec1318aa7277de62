use std::{path::Path, time::Duration};

use serde::{Deserialize, Serialize};

use crate::{Result, SortVizError};

/// Smallest sequence the controls allow.
pub const MIN_ARRAY_SIZE: usize = 5;
/// Largest sequence the controls allow.
pub const MAX_ARRAY_SIZE: usize = 200;
/// Upper end of the speed slider.
pub const MAX_SPEED: u8 = 100;

/// Top-level configuration structure for the application.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub array: ArrayConfig,
    pub playback: PlaybackConfig,
    pub audio: AudioConfig,
}

impl AppConfig {
    /// Parses a JSON document. Missing sections fall back to their defaults.
    pub fn from_json_str(raw: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json_str(&raw)
    }

    /// Rejects values a run must never observe.
    pub fn validate(&self) -> Result<()> {
        self.array.validate()?;
        self.playback.validate()
    }

    /// Returns a copy with every bounded value pulled back into range.
    pub fn clamped(&self) -> Self {
        let mut config = self.clone();
        config.array.size = config.array.size.clamp(MIN_ARRAY_SIZE, MAX_ARRAY_SIZE);
        config.array.min_value = config.array.min_value.max(1);
        config.array.max_value = config.array.max_value.max(config.array.min_value);
        config.playback.speed = config.playback.speed.min(MAX_SPEED);
        config
    }
}

/// Shape of the generated sequence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArrayConfig {
    pub size: usize,
    pub min_value: u32,
    pub max_value: u32,
}

impl Default for ArrayConfig {
    fn default() -> Self {
        Self {
            size: 50,
            min_value: 5,
            max_value: 100,
        }
    }
}

impl ArrayConfig {
    fn validate(&self) -> Result<()> {
        if !(MIN_ARRAY_SIZE..=MAX_ARRAY_SIZE).contains(&self.size) {
            return Err(SortVizError::invalid_config(format!(
                "array size {} is outside {MIN_ARRAY_SIZE}..={MAX_ARRAY_SIZE}",
                self.size
            )));
        }
        if self.min_value == 0 || self.min_value > self.max_value {
            return Err(SortVizError::invalid_config(format!(
                "value range {}..={} is empty or starts at zero",
                self.min_value, self.max_value
            )));
        }
        Ok(())
    }
}

/// Animation pacing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaybackConfig {
    /// Slider position, 0 (slowest) to 100 (fastest).
    pub speed: u8,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self { speed: 50 }
    }
}

impl PlaybackConfig {
    /// Pause inserted after every visible step: `101 - speed` milliseconds.
    pub fn pause(&self) -> Duration {
        let speed = self.speed.min(MAX_SPEED);
        Duration::from_millis(101 - u64::from(speed))
    }

    fn validate(&self) -> Result<()> {
        if self.speed > MAX_SPEED {
            return Err(SortVizError::invalid_config(format!(
                "speed {} is above {MAX_SPEED}",
                self.speed
            )));
        }
        Ok(())
    }
}

/// Configuration specific to the audio subsystem.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AudioConfig {
    pub muted: bool,
    pub sample_rate: u32,
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            muted: false,
            sample_rate: 48_000,
        }
    }
}

/// Parses a user-entered array size, clamping numeric input into bounds.
pub fn parse_array_size(raw: &str) -> Result<usize> {
    let size: usize = raw.trim().parse().map_err(|_| {
        SortVizError::invalid_config(format!("array size `{raw}` is not a number"))
    })?;
    Ok(size.clamp(MIN_ARRAY_SIZE, MAX_ARRAY_SIZE))
}

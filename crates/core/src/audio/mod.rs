use std::{
    f32::consts::PI,
    path::Path,
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc, Mutex, MutexGuard,
    },
};

use crate::{AudioConfig, Result, SortVizError};

/// Frequency of the smallest value.
pub const MIN_TONE_HZ: f32 = 220.0;
/// Frequency of a value equal to the ceiling.
pub const MAX_TONE_HZ: f32 = 880.0;

pub const COMPARE_TONE_MS: u32 = 50;
pub const SWAP_TONE_MS: u32 = 100;
pub const OVERWRITE_TONE_MS: u32 = 50;

const START_GAIN: f32 = 0.1;
const END_GAIN: f32 = 0.001;

/// Maps a value linearly onto the tone range, `ceiling` landing on
/// [`MAX_TONE_HZ`].
pub fn tone_frequency(value: u32, ceiling: u32) -> f32 {
    let normalised = value as f32 / ceiling.max(1) as f32;
    MIN_TONE_HZ + normalised * (MAX_TONE_HZ - MIN_TONE_HZ)
}

/// Audio collaborator. Implementations may fail; callers treat sound as
/// best effort.
pub trait ToneEmitter {
    fn play(&mut self, frequency_hz: f32, duration_ms: u32) -> Result<()>;
}

/// Shared mute flag. Clones observe each other's changes immediately.
#[derive(Debug, Clone, Default)]
pub struct MuteSwitch(Arc<AtomicBool>);

impl MuteSwitch {
    pub fn new(muted: bool) -> Self {
        Self(Arc::new(AtomicBool::new(muted)))
    }

    pub fn set(&self, muted: bool) {
        self.0.store(muted, Ordering::Relaxed);
    }

    /// Flips the flag and returns the new state.
    pub fn toggle(&self) -> bool {
        !self.0.fetch_xor(true, Ordering::Relaxed)
    }

    pub fn is_muted(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Step-sink side of the audio path. Never fails: an emitter that errors is
/// logged and dropped, and the run carries on silently.
pub struct ToneOutput {
    emitter: Option<Box<dyn ToneEmitter + Send>>,
    mute: MuteSwitch,
}

impl ToneOutput {
    pub fn new(emitter: Box<dyn ToneEmitter + Send>, mute: MuteSwitch) -> Self {
        Self {
            emitter: Some(emitter),
            mute,
        }
    }

    /// Output with no audio backend at all.
    pub fn silent() -> Self {
        Self {
            emitter: None,
            mute: MuteSwitch::new(true),
        }
    }

    pub fn mute_switch(&self) -> MuteSwitch {
        self.mute.clone()
    }

    pub fn is_available(&self) -> bool {
        self.emitter.is_some()
    }

    pub fn emit(&mut self, frequency_hz: f32, duration_ms: u32) {
        if self.mute.is_muted() {
            return;
        }
        let Some(emitter) = self.emitter.as_mut() else {
            return;
        };
        if let Err(err) = emitter.play(frequency_hz, duration_ms) {
            tracing::warn!(%err, "tone output unavailable, continuing without sound");
            self.emitter = None;
        }
    }
}

impl std::fmt::Debug for ToneOutput {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToneOutput")
            .field("available", &self.is_available())
            .field("muted", &self.mute.is_muted())
            .finish()
    }
}

/// Sine synthesiser that appends every tone to a shared [`ToneTrack`].
#[derive(Debug)]
pub struct SynthEmitter {
    sample_rate: u32,
    track: ToneTrack,
}

impl SynthEmitter {
    pub fn new(config: &AudioConfig) -> Self {
        Self {
            sample_rate: config.sample_rate,
            track: ToneTrack::default(),
        }
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Handle on the rendered samples; stays valid after the emitter moves
    /// into a run.
    pub fn track(&self) -> ToneTrack {
        self.track.clone()
    }
}

impl ToneEmitter for SynthEmitter {
    fn play(&mut self, frequency_hz: f32, duration_ms: u32) -> Result<()> {
        if !frequency_hz.is_finite() || frequency_hz <= 0.0 {
            return Err(SortVizError::msg(format!(
                "cannot synthesise a {frequency_hz} Hz tone"
            )));
        }
        if self.sample_rate == 0 {
            return Err(SortVizError::msg("synthesiser has no sample rate"));
        }

        let rate = self.sample_rate as f32;
        let len = (u64::from(self.sample_rate) * u64::from(duration_ms) / 1000) as usize;
        let decay = END_GAIN / START_GAIN;
        let mut samples = self.track.lock()?;
        samples.reserve(len);
        for n in 0..len {
            let progress = n as f32 / len as f32;
            let gain = START_GAIN * decay.powf(progress);
            let t = n as f32 / rate;
            samples.push(gain * (2.0 * PI * frequency_hz * t).sin());
        }
        Ok(())
    }
}

/// Samples produced by a [`SynthEmitter`].
#[derive(Debug, Clone, Default)]
pub struct ToneTrack {
    samples: Arc<Mutex<Vec<f32>>>,
}

impl ToneTrack {
    pub fn len(&self) -> Result<usize> {
        Ok(self.lock()?.len())
    }

    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.lock()?.is_empty())
    }

    pub fn samples(&self) -> Result<Vec<f32>> {
        Ok(self.lock()?.clone())
    }

    /// Writes the track as raw little-endian 32-bit float PCM.
    pub fn write_pcm(&self, path: impl AsRef<Path>) -> Result<()> {
        let bytes: Vec<u8> = self
            .lock()?
            .iter()
            .flat_map(|sample| sample.to_le_bytes())
            .collect();
        std::fs::write(path, bytes)?;
        Ok(())
    }

    fn lock(&self) -> Result<MutexGuard<'_, Vec<f32>>> {
        self.samples
            .lock()
            .map_err(|_| SortVizError::msg("tone track has been poisoned"))
    }
}

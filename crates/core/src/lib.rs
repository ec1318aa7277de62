//! Core library for the Sort Visualiser application.
//!
//! Five sorting algorithms drive a shared, paced and cancelable step pipeline.
//! The algorithms only ever talk to the [`StepSink`]; the sink applies each
//! step, keeps the statistics and forwards directives to the [`Renderer`] and
//! [`ToneEmitter`] collaborators. The [`RunController`] owns the lifecycle of
//! a run on top of that.

pub mod audio;
pub mod config;
pub mod controller;
pub mod engine;
pub mod error;
pub mod mapping;
pub mod render;
pub mod sequence;
pub mod sink;
pub mod stats;
pub mod timeline;

pub use audio::{MuteSwitch, SynthEmitter, ToneEmitter, ToneOutput, ToneTrack};
pub use config::{AppConfig, ArrayConfig, AudioConfig, PlaybackConfig};
pub use controller::{RunController, RunOutcome, RunState, StartOutcome};
pub use engine::{Algorithm, AlgorithmInfo};
pub use error::{Result, SortVizError};
pub use mapping::{bar_width, HeightMapping};
pub use render::{Bar, BarChart, BarClass, NullRenderer, Renderer};
pub use sequence::SequenceGenerator;
pub use sink::{Cancelled, RunContext, Step, StepEvent, StepSink};
pub use stats::{Instrumentation, Stats};
pub use timeline::{PauseHandle, PauseOutcome, PauseScheduler, RunClock};

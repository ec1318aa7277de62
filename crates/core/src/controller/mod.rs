//! Run lifecycle: start, completion, cancellation and regeneration.
//!
//! The controller owns the [`StepSink`] while idle. Starting a run moves the
//! sink into a task on the current tokio runtime; the task hands it back when
//! the run completes or is cancelled, so the sequence only ever has one owner.
//! A finished task is collected by whichever controller call comes next, so
//! the state moves on without anyone awaiting [`RunController::wait`].

use std::panic::AssertUnwindSafe;

use futures::FutureExt;
use tokio::{
    task::{JoinError, JoinHandle},
    time::Instant,
};
use tokio_util::sync::CancellationToken;

use crate::{
    config::parse_array_size, engine, Algorithm, AppConfig, MuteSwitch, NullRenderer,
    PauseScheduler, Renderer, Result, SequenceGenerator, SortVizError, Stats, StepSink,
    ToneOutput,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Idle,
    Running {
        algorithm: Algorithm,
        started_at: Instant,
    },
    Cancelled,
    Completed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartOutcome {
    Started,
    /// A run was already in progress; nothing changed.
    Ignored,
}

/// How a run ended, with the statistics at that moment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunOutcome {
    pub algorithm: Algorithm,
    pub state: RunState,
    pub stats: Stats,
}

/// What the run task hands back with the sink.
#[derive(Debug)]
enum RunEnd {
    Completed,
    Cancelled,
    Panicked(String),
}

struct ActiveRun {
    algorithm: Algorithm,
    revoker: CancellationToken,
    handle: JoinHandle<(RunEnd, StepSink)>,
}

pub struct RunController {
    config: AppConfig,
    generator: SequenceGenerator,
    state: RunState,
    controls_locked: bool,
    mute: MuteSwitch,
    idle: Option<StepSink>,
    active: Option<ActiveRun>,
    /// Outcome of a run collected before anyone waited for it.
    unreported: Option<Result<RunOutcome>>,
}

impl RunController {
    /// Validates `config`, generates the first sequence and renders it.
    pub fn new(
        config: AppConfig,
        generator: SequenceGenerator,
        renderer: Box<dyn Renderer + Send>,
        tones: ToneOutput,
    ) -> Result<Self> {
        config.validate()?;
        let mute = tones.mute_switch();
        mute.set(config.audio.muted);

        let mut controller = Self {
            config,
            generator,
            state: RunState::Idle,
            controls_locked: false,
            mute,
            idle: None,
            active: None,
            unreported: None,
        };
        controller.idle = Some(controller.fresh_sink(renderer, tones));
        Ok(controller)
    }

    pub fn state(&mut self) -> RunState {
        self.collect_finished();
        self.state
    }

    pub fn is_running(&mut self) -> bool {
        matches!(self.state(), RunState::Running { .. })
    }

    /// Size, generate and speed controls are locked while a run is active.
    pub fn controls_locked(&mut self) -> bool {
        self.collect_finished();
        self.controls_locked
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn current_algorithm(&mut self) -> Option<Algorithm> {
        self.collect_finished();
        self.active.as_ref().map(|run| run.algorithm)
    }

    /// Current sequence, or `None` while a run owns it.
    pub fn sequence(&mut self) -> Option<&[u32]> {
        self.collect_finished();
        self.idle.as_ref().map(StepSink::values)
    }

    /// Statistics of the last run, or `None` while a run owns them.
    pub fn stats(&mut self) -> Option<Stats> {
        self.collect_finished();
        self.idle.as_ref().map(StepSink::stats)
    }

    /// Starts `algorithm` on the current sequence. A no-op while another run
    /// is in progress.
    pub fn start(&mut self, algorithm: Algorithm) -> Result<StartOutcome> {
        if self.is_running() {
            tracing::debug!(%algorithm, "run already in progress, ignoring start");
            return Ok(StartOutcome::Ignored);
        }
        let mut sink = self.take_idle_sink()?;
        self.unreported = None;

        self.state = RunState::Idle;
        let info = algorithm.info();
        let renderer = sink.renderer_mut();
        renderer.clear_marks();
        renderer.show_algorithm(Some(&info));

        let revoker = CancellationToken::new();
        sink.begin_run(
            self.config.playback.pause(),
            PauseScheduler::with_token(revoker.clone()),
        );
        let started_at = sink.context().clock.started_at();

        self.controls_locked = true;
        self.state = RunState::Running {
            algorithm,
            started_at,
        };
        tracing::debug!(%algorithm, len = sink.len(), delay = ?sink.delay(), "run started");

        let handle = tokio::spawn(async move {
            let result = AssertUnwindSafe(engine::run(algorithm, &mut sink))
                .catch_unwind()
                .await;
            sink.finish_run();
            let end = match result {
                Ok(Ok(())) => RunEnd::Completed,
                Ok(Err(_)) => RunEnd::Cancelled,
                Err(payload) => RunEnd::Panicked(panic_message(payload.as_ref())),
            };
            (end, sink)
        });
        self.active = Some(ActiveRun {
            algorithm,
            revoker,
            handle,
        });
        Ok(StartOutcome::Started)
    }

    /// Cancels any in-flight run, keeping its partially sorted sequence, then
    /// starts `algorithm`.
    pub async fn restart(&mut self, algorithm: Algorithm) -> Result<StartOutcome> {
        self.cancel().await?;
        self.start(algorithm)
    }

    /// Waits for the active run to end, or returns the outcome of a run that
    /// ended since the last call. Dropping the returned future leaves the run
    /// untouched, so it can race other events in `select!`.
    pub async fn wait(&mut self) -> Result<Option<RunOutcome>> {
        if let Some(outcome) = self.unreported.take() {
            return outcome.map(Some);
        }
        let Some(active) = self.active.as_mut() else {
            return Ok(None);
        };
        let joined = (&mut active.handle).await;
        let algorithm = active.algorithm;
        self.active = None;
        self.settle(algorithm, joined).map(Some)
    }

    /// Revokes the active run's pauses and takes its context back. A run that
    /// had already finished keeps its `Completed` state.
    pub async fn cancel(&mut self) -> Result<Option<RunOutcome>> {
        if let Some(active) = self.active.as_ref() {
            tracing::debug!(algorithm = %active.algorithm, "cancelling run");
            active.revoker.cancel();
        }
        self.wait().await
    }

    /// Cancels any run, regenerates the sequence and clears every mark.
    pub async fn cancel_and_reset(&mut self) -> Result<()> {
        self.collect_finished();
        if self.active.is_some() {
            // A panicked run has already been recovered; regeneration follows.
            if let Err(err) = self.cancel().await {
                tracing::warn!(%err, "run ended abnormally while cancelling");
            }
        } else {
            self.state = RunState::Idle;
        }
        self.unreported = None;

        let len = self.config.array.size;
        let sequence = self.generator.generate(len);
        let sink = self.idle_sink_mut()?;
        sink.replace_sequence(sequence);
        sink.renderer_mut().show_algorithm(None);
        self.controls_locked = false;
        tracing::debug!(len, "sequence regenerated");
        Ok(())
    }

    /// The "generate new array" control.
    pub async fn generate_new_array(&mut self) -> Result<()> {
        self.cancel_and_reset().await
    }

    /// Applies a user-entered array size and regenerates. Non-numeric input is
    /// rejected before anything changes; numbers are clamped into bounds.
    pub async fn set_array_size(&mut self, raw: &str) -> Result<usize> {
        let size = parse_array_size(raw)?;
        self.config.array.size = size;
        self.cancel_and_reset().await?;
        Ok(size)
    }

    /// Takes effect from the next run; an active run keeps its pace.
    pub fn set_speed(&mut self, speed: u8) {
        self.config.playback.speed = speed.min(crate::config::MAX_SPEED);
    }

    /// Applies immediately, including to an active run.
    pub fn set_muted(&mut self, muted: bool) {
        self.config.audio.muted = muted;
        self.mute.set(muted);
    }

    /// Settles a run whose task has already ended, without blocking.
    fn collect_finished(&mut self) {
        let joined = match self.active.as_mut() {
            Some(active) if active.handle.is_finished() => (&mut active.handle).now_or_never(),
            _ => None,
        };
        let Some(joined) = joined else {
            return;
        };
        if let Some(active) = self.active.take() {
            self.unreported = Some(self.settle(active.algorithm, joined));
        }
    }

    /// Takes the sink back from a finished task and leaves the controller
    /// idle and re-armable whatever the run's fate.
    fn settle(
        &mut self,
        algorithm: Algorithm,
        joined: std::result::Result<(RunEnd, StepSink), JoinError>,
    ) -> Result<RunOutcome> {
        self.controls_locked = false;
        self.state = RunState::Cancelled;

        let (end, mut sink) = match joined {
            Ok(pair) => pair,
            Err(err) => {
                tracing::warn!(%algorithm, %err, "run task lost, rebuilding context headless");
                let sink = self.fresh_sink(Box::new(NullRenderer), ToneOutput::silent());
                self.idle = Some(sink);
                return Err(SortVizError::RunAborted(err.to_string()));
            }
        };

        let state = match end {
            RunEnd::Completed => RunState::Completed,
            RunEnd::Cancelled => RunState::Cancelled,
            RunEnd::Panicked(message) => {
                tracing::warn!(%algorithm, %message, "run panicked, regenerating sequence");
                sink.replace_sequence(self.generator.generate(self.config.array.size));
                sink.renderer_mut().show_algorithm(None);
                self.idle = Some(sink);
                return Err(SortVizError::RunAborted(message));
            }
        };

        let stats = sink.stats();
        self.state = state;
        self.idle = Some(sink);
        tracing::debug!(%algorithm, ?state, ?stats, "run finished");
        Ok(RunOutcome {
            algorithm,
            state,
            stats,
        })
    }

    fn fresh_sink(&mut self, renderer: Box<dyn Renderer + Send>, tones: ToneOutput) -> StepSink {
        let sequence = self.generator.generate(self.config.array.size);
        let mut sink = StepSink::new(Vec::new(), renderer, tones)
            .with_value_ceiling(self.generator.ceiling())
            .with_delay(self.config.playback.pause());
        sink.replace_sequence(sequence);
        sink.renderer_mut().show_algorithm(None);
        sink
    }

    fn take_idle_sink(&mut self) -> Result<StepSink> {
        self.idle
            .take()
            .ok_or_else(|| SortVizError::msg("run context is owned by an active run"))
    }

    fn idle_sink_mut(&mut self) -> Result<&mut StepSink> {
        self.idle
            .as_mut()
            .ok_or_else(|| SortVizError::msg("run context is owned by an active run"))
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    payload
        .downcast_ref::<&str>()
        .map(|message| message.to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "run panicked".to_string())
}

impl Drop for RunController {
    fn drop(&mut self) {
        if let Some(active) = self.active.take() {
            active.revoker.cancel();
            active.handle.abort();
        }
    }
}

impl std::fmt::Debug for RunController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RunController")
            .field("state", &self.state)
            .field("controls_locked", &self.controls_locked)
            .field("config", &self.config)
            .finish()
    }
}

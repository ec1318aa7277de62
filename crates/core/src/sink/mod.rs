//! The single choke point every algorithm reports through.
//!
//! Algorithms never touch rendering, audio, timing or counters directly:
//! each comparison, exchange and write goes through [`StepSink::observe`],
//! which applies the step, updates the statistics, forwards directives to the
//! collaborators and then suspends for the configured pause. A revoked pause
//! surfaces as [`Cancelled`] and the algorithm unwinds with `?`.

use std::{fmt, ops::Range, time::Duration};

use crate::{
    audio::{self, ToneOutput},
    BarClass, Instrumentation, PauseOutcome, PauseScheduler, Renderer, RunClock, Stats,
};

/// Marker returned by a step whose pause was revoked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cancelled;

impl fmt::Display for Cancelled {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("run cancelled")
    }
}

impl std::error::Error for Cancelled {}

/// Result of reporting one step.
pub type Step<T = ()> = Result<T, Cancelled>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepEvent {
    Compare(usize, usize),
    Swap(usize, usize),
    Overwrite { index: usize, value: u32 },
    MarkSorted(Range<usize>),
}

/// State owned by exactly one run at a time.
#[derive(Debug, Default)]
pub struct RunContext {
    pub sequence: Vec<u32>,
    pub instrumentation: Instrumentation,
    pub clock: RunClock,
}

impl RunContext {
    pub fn new(sequence: Vec<u32>) -> Self {
        Self {
            sequence,
            ..Default::default()
        }
    }
}

pub struct StepSink {
    context: RunContext,
    pauses: PauseScheduler,
    delay: Duration,
    value_ceiling: u32,
    renderer: Box<dyn Renderer + Send>,
    tones: ToneOutput,
}

impl StepSink {
    pub fn new(
        sequence: Vec<u32>,
        renderer: Box<dyn Renderer + Send>,
        tones: ToneOutput,
    ) -> Self {
        let value_ceiling = sequence.iter().copied().max().unwrap_or(1);
        Self {
            context: RunContext::new(sequence),
            pauses: PauseScheduler::new(),
            delay: Duration::ZERO,
            value_ceiling,
            renderer,
            tones,
        }
    }

    /// Value that maps onto the highest tone.
    pub fn with_value_ceiling(mut self, ceiling: u32) -> Self {
        self.value_ceiling = ceiling.max(1);
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Arms the sink for a new run: zeroes the statistics, restarts the clock
    /// and ties every future pause to `pauses`.
    pub fn begin_run(&mut self, delay: Duration, pauses: PauseScheduler) {
        self.delay = delay;
        self.pauses = pauses;
        self.context.instrumentation.reset();
        self.context.clock.restart();
        self.publish_stats();
    }

    /// Stops the clock and pushes the final statistics.
    pub fn finish_run(&mut self) -> Stats {
        let elapsed = self.context.clock.freeze();
        let stats = self.context.instrumentation.snapshot(elapsed);
        self.renderer.show_stats(&stats);
        stats
    }

    /// Swaps in a fresh sequence and redraws it without any marks.
    pub fn replace_sequence(&mut self, sequence: Vec<u32>) {
        self.context.sequence = sequence;
        self.context.instrumentation.reset();
        self.context.clock.restart();
        self.renderer.render(&self.context.sequence);
        self.renderer.show_stats(&Stats::default());
    }

    pub fn values(&self) -> &[u32] {
        &self.context.sequence
    }

    pub fn value(&self, index: usize) -> u32 {
        self.context.sequence[index]
    }

    pub fn len(&self) -> usize {
        self.context.sequence.len()
    }

    pub fn is_empty(&self) -> bool {
        self.context.sequence.is_empty()
    }

    pub fn context(&self) -> &RunContext {
        &self.context
    }

    pub fn stats(&self) -> Stats {
        self.context.instrumentation.stats()
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    pub fn renderer_mut(&mut self) -> &mut (dyn Renderer + Send) {
        self.renderer.as_mut()
    }

    pub async fn observe(&mut self, event: StepEvent) -> Step {
        match event {
            StepEvent::Compare(i, j) => {
                self.context.instrumentation.record_comparison();
                self.renderer.highlight(&[i, j], BarClass::Comparing);
                self.publish_stats();
                self.tone_for(self.value(i), audio::COMPARE_TONE_MS);
                self.pause().await?;
                self.renderer.unhighlight(&[i, j]);
                Ok(())
            }
            StepEvent::Swap(i, j) => {
                self.context.sequence.swap(i, j);
                self.renderer.exchange_heights(i, j);
                self.context.instrumentation.record_swap();
                self.publish_stats();
                self.tone_for(self.value(j), audio::SWAP_TONE_MS);
                self.pause().await
            }
            StepEvent::Overwrite { index, value } => {
                self.context.sequence[index] = value;
                self.renderer.set_height(index, value);
                self.renderer.highlight(&[index], BarClass::Comparing);
                self.publish_stats();
                self.tone_for(value, audio::OVERWRITE_TONE_MS);
                self.pause().await?;
                self.renderer.unhighlight(&[index]);
                Ok(())
            }
            StepEvent::MarkSorted(range) => {
                self.mark_sorted(range);
                Ok(())
            }
        }
    }

    pub async fn compare(&mut self, i: usize, j: usize) -> Step {
        self.observe(StepEvent::Compare(i, j)).await
    }

    pub async fn swap(&mut self, i: usize, j: usize) -> Step {
        self.observe(StepEvent::Swap(i, j)).await
    }

    pub async fn overwrite(&mut self, index: usize, value: u32) -> Step {
        self.observe(StepEvent::Overwrite { index, value }).await
    }

    /// Marks `range` as settled. Never suspends.
    pub fn mark_sorted(&mut self, range: Range<usize>) {
        let end = range.end.min(self.len());
        let indices: Vec<usize> = (range.start..end).collect();
        if !indices.is_empty() {
            self.renderer.highlight(&indices, BarClass::Sorted);
        }
    }

    /// Charges one element write to the swap counter. Merge and insertion
    /// sort report their writes this way.
    pub fn tally_write(&mut self) {
        self.context.instrumentation.record_swap();
        self.publish_stats();
    }

    /// Puts a held value back without pacing or counting. Used by
    /// overwrite-based algorithms unwinding after cancellation.
    pub fn restore(&mut self, index: usize, value: u32) {
        self.context.sequence[index] = value;
        self.renderer.set_height(index, value);
    }

    async fn pause(&mut self) -> Step {
        let pause = self.pauses.schedule(self.delay);
        match pause.wait().await {
            PauseOutcome::Elapsed => Ok(()),
            PauseOutcome::Revoked => Err(Cancelled),
        }
    }

    fn tone_for(&mut self, value: u32, duration_ms: u32) {
        let frequency = audio::tone_frequency(value, self.value_ceiling);
        self.tones.emit(frequency, duration_ms);
    }

    fn publish_stats(&mut self) {
        let elapsed = self.context.clock.elapsed();
        let stats = self.context.instrumentation.snapshot(elapsed);
        self.renderer.show_stats(&stats);
    }
}

impl fmt::Debug for StepSink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StepSink")
            .field("context", &self.context)
            .field("delay", &self.delay)
            .field("value_ceiling", &self.value_ceiling)
            .field("tones", &self.tones)
            .finish()
    }
}


#[cfg(test)]
mod tests {
    use super::testing::{recording_sink, Directive};
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn compare_counts_and_clears_highlight() {
        let (mut sink, recorder) = recording_sink(&[3, 1]);
        sink.compare(0, 1).await.unwrap();

        assert_eq!(sink.stats().comparisons, 1);
        assert_eq!(sink.values(), &[3, 1]);
        let directives = recorder.directives();
        assert!(directives.contains(&Directive::Highlight(vec![0, 1], BarClass::Comparing)));
        assert_eq!(directives.last(), Some(&Directive::Unhighlight(vec![0, 1])));
    }

    #[tokio::test(start_paused = true)]
    async fn swap_exchanges_values_and_heights() {
        let (mut sink, recorder) = recording_sink(&[3, 1, 2]);
        sink.swap(0, 2).await.unwrap();

        assert_eq!(sink.values(), &[2, 1, 3]);
        assert_eq!(sink.stats().swaps, 1);
        assert_eq!(recorder.chart().values(), vec![2, 1, 3]);
    }

    #[tokio::test(start_paused = true)]
    async fn overwrite_writes_without_counting() {
        let (mut sink, recorder) = recording_sink(&[3, 1, 2]);
        sink.overwrite(1, 9).await.unwrap();

        assert_eq!(sink.values(), &[3, 9, 2]);
        assert_eq!(sink.stats(), Stats::default());
        assert!(recorder.directives().contains(&Directive::SetHeight(1, 9)));

        sink.tally_write();
        assert_eq!(sink.stats().swaps, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn steps_wait_for_the_configured_pause() {
        let (sink, _recorder) = recording_sink(&[2, 1]);
        let mut sink = sink.with_delay(Duration::from_millis(75));
        let started = tokio::time::Instant::now();

        sink.compare(0, 1).await.unwrap();
        sink.swap(0, 1).await.unwrap();

        let waited = started.elapsed();
        assert!(waited >= Duration::from_millis(150));
        assert!(waited < Duration::from_millis(160));
    }

    #[tokio::test(start_paused = true)]
    async fn mark_sorted_neither_waits_nor_counts() {
        let (mut sink, recorder) = recording_sink(&[1, 2, 3]);
        let started = tokio::time::Instant::now();

        sink.observe(StepEvent::MarkSorted(0..5)).await.unwrap();

        assert_eq!(started.elapsed(), Duration::ZERO);
        assert_eq!(sink.stats(), Stats::default());
        assert_eq!(recorder.chart().sorted_count(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn revoked_pause_applies_step_then_reports_cancellation() {
        let (mut sink, recorder) = recording_sink(&[5, 4]);
        let pauses = PauseScheduler::new();
        sink.begin_run(Duration::from_secs(60), pauses.clone());
        pauses.revoke_all();

        assert_eq!(sink.swap(0, 1).await, Err(Cancelled));
        assert_eq!(sink.values(), &[4, 5]);
        assert_eq!(sink.stats().swaps, 1);

        assert_eq!(sink.compare(0, 1).await, Err(Cancelled));
        assert_ne!(
            recorder.directives().last(),
            Some(&Directive::Unhighlight(vec![0, 1]))
        );
    }

    #[tokio::test(start_paused = true)]
    async fn finishing_freezes_elapsed_time() {
        let (mut sink, recorder) = recording_sink(&[2, 1]);
        sink.begin_run(Duration::from_millis(30), PauseScheduler::new());
        sink.compare(0, 1).await.unwrap();

        let stats = sink.finish_run();
        tokio::time::advance(Duration::from_secs(5)).await;

        assert!((30..32).contains(&stats.elapsed_ms));
        assert_eq!(sink.finish_run(), stats);
        assert_eq!(recorder.chart().stats(), stats);
    }
}

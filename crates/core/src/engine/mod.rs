//! The five animated sorting algorithms.
//!
//! Each algorithm is nothing but a sequence of [`StepSink`] calls over the
//! sink's sequence. They keep no counters of their own and stop at the first
//! step that reports [`crate::Cancelled`].

mod bubble;
mod insertion;
mod merge;
mod quick;
mod selection;

use std::{fmt, str::FromStr};

use serde::Serialize;

use crate::{SortVizError, Step, StepSink};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Algorithm {
    Bubble,
    Selection,
    Insertion,
    Merge,
    Quick,
}

/// Description and complexity shown while an algorithm runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AlgorithmInfo {
    pub name: &'static str,
    pub time: &'static str,
    pub space: &'static str,
    pub description: &'static str,
}

impl Algorithm {
    pub const ALL: [Algorithm; 5] = [
        Algorithm::Bubble,
        Algorithm::Selection,
        Algorithm::Insertion,
        Algorithm::Merge,
        Algorithm::Quick,
    ];

    /// Identifier accepted by [`FromStr`].
    pub fn id(self) -> &'static str {
        match self {
            Algorithm::Bubble => "bubble",
            Algorithm::Selection => "selection",
            Algorithm::Insertion => "insertion",
            Algorithm::Merge => "merge",
            Algorithm::Quick => "quick",
        }
    }

    pub fn info(self) -> AlgorithmInfo {
        match self {
            Algorithm::Bubble => AlgorithmInfo {
                name: "Bubble Sort",
                time: "Best: O(n) | Average: O(n²) | Worst: O(n²)",
                space: "O(1)",
                description: "Repeatedly steps through the list, compares adjacent elements and swaps them if they are in the wrong order.",
            },
            Algorithm::Selection => AlgorithmInfo {
                name: "Selection Sort",
                time: "Best: O(n²) | Average: O(n²) | Worst: O(n²)",
                space: "O(1)",
                description: "Finds the minimum element of the unsorted part and puts it at the beginning.",
            },
            Algorithm::Insertion => AlgorithmInfo {
                name: "Insertion Sort",
                time: "Best: O(n) | Average: O(n²) | Worst: O(n²)",
                space: "O(1)",
                description: "Builds the sorted list one item at a time by comparing each with the items before it.",
            },
            Algorithm::Merge => AlgorithmInfo {
                name: "Merge Sort",
                time: "Best: O(n log n) | Average: O(n log n) | Worst: O(n log n)",
                space: "O(n)",
                description: "Divides the list into two halves, sorts them, and then merges them.",
            },
            Algorithm::Quick => AlgorithmInfo {
                name: "Quick Sort",
                time: "Best: O(n log n) | Average: O(n log n) | Worst: O(n²)",
                space: "O(log n)",
                description: "Picks an element as pivot and partitions the list around the pivot.",
            },
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for Algorithm {
    type Err = SortVizError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        Algorithm::ALL
            .into_iter()
            .find(|algorithm| algorithm.id() == wanted)
            .ok_or_else(|| SortVizError::UnknownAlgorithm(s.to_string()))
    }
}

/// Sorts the sink's sequence ascending with `algorithm`, marking every index
/// sorted on the way. Returns early once a step is cancelled.
pub async fn run(algorithm: Algorithm, sink: &mut StepSink) -> Step {
    match algorithm {
        Algorithm::Bubble => bubble::sort(sink).await,
        Algorithm::Selection => selection::sort(sink).await,
        Algorithm::Insertion => insertion::sort(sink).await,
        Algorithm::Merge => merge::sort(sink).await,
        Algorithm::Quick => quick::sort(sink).await,
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use std::time::Duration;

    use rand::{rngs::StdRng, Rng, SeedableRng};

    use super::*;
    use crate::{sink::testing::recording_sink, Cancelled, PauseScheduler, Stats};

    pub(crate) async fn sorted_with(algorithm: Algorithm, values: &[u32]) -> (Vec<u32>, Stats) {
        let (mut sink, recorder) = recording_sink(values);
        run(algorithm, &mut sink).await.unwrap();
        assert_eq!(
            recorder.chart().sorted_count(),
            values.len(),
            "{algorithm} left indices unmarked"
        );
        assert_eq!(recorder.chart().values(), sink.values());
        (sink.values().to_vec(), sink.stats())
    }

    /// Runs `algorithm` over `values` with 10 ms pauses and revokes every
    /// pause once `after` has passed.
    pub(crate) async fn cancelled_after(
        algorithm: Algorithm,
        values: &[u32],
        after: Duration,
    ) -> (Step, StepSink) {
        let (mut sink, _recorder) = recording_sink(values);
        let pauses = PauseScheduler::new();
        sink.begin_run(Duration::from_millis(10), pauses.clone());
        let revoker = pauses.revoker();

        let task = tokio::spawn(async move {
            let outcome = run(algorithm, &mut sink).await;
            (outcome, sink)
        });
        tokio::time::sleep(after).await;
        revoker.cancel();
        task.await.unwrap()
    }

    fn sample_inputs() -> Vec<Vec<u32>> {
        let mut rng = StdRng::seed_from_u64(42);
        let mut inputs = vec![
            vec![],
            vec![7],
            vec![2, 1],
            vec![2, 2, 2],
            vec![5, 3, 8, 1],
            vec![9, 1, 9, 1],
            (1..=20).collect(),
            (1..=20).rev().collect(),
        ];
        for len in [7, 16, 33] {
            inputs.push((0..len).map(|_| rng.gen_range(5..=100)).collect());
        }
        inputs
    }

    #[tokio::test(start_paused = true)]
    async fn every_algorithm_sorts_every_input() {
        for algorithm in Algorithm::ALL {
            for input in sample_inputs() {
                let mut expected = input.clone();
                expected.sort_unstable();
                let (sorted, _) = sorted_with(algorithm, &input).await;
                assert_eq!(sorted, expected, "{algorithm} on {input:?}");
            }
        }
    }

    #[tokio::test(start_paused = true)]
    async fn trivial_inputs_take_no_steps() {
        for algorithm in Algorithm::ALL {
            for input in [vec![], vec![7]] {
                let (_, stats) = sorted_with(algorithm, &input).await;
                assert_eq!(stats.comparisons, 0, "{algorithm}");
                assert_eq!(stats.swaps, 0, "{algorithm}");
            }
        }
    }

    #[tokio::test(start_paused = true)]
    async fn counts_repeat_for_the_same_input() {
        let input: Vec<u32> = vec![31, 4, 77, 4, 58, 12, 99, 5, 63, 20];
        for algorithm in Algorithm::ALL {
            let (_, first) = sorted_with(algorithm, &input).await;
            let (_, second) = sorted_with(algorithm, &input).await;
            assert_eq!(first.comparisons, second.comparisons, "{algorithm}");
            assert_eq!(first.swaps, second.swaps, "{algorithm}");
        }
    }

    #[tokio::test(start_paused = true)]
    async fn cancellation_preserves_the_multiset() {
        let input: Vec<u32> = vec![42, 7, 93, 7, 18, 64, 5, 77, 31, 50, 12, 88];
        let mut expected = input.clone();
        expected.sort_unstable();
        let delay = Duration::from_millis(10);

        for algorithm in Algorithm::ALL {
            for cancel_after in [0u64, 1, 3, 8, 15, 40] {
                let (mut sink, recorder) = recording_sink(&input);
                let pauses = PauseScheduler::new();
                sink.begin_run(delay, pauses.clone());
                let revoker = pauses.revoker();

                let task = tokio::spawn(async move {
                    let outcome = run(algorithm, &mut sink).await;
                    (outcome, sink)
                });
                tokio::time::sleep(delay * cancel_after as u32 + delay / 2).await;
                revoker.cancel();
                let (outcome, sink) = task.await.unwrap();

                let mut left = sink.values().to_vec();
                left.sort_unstable();
                assert_eq!(left, expected, "{algorithm} cancelled after {cancel_after}");
                assert_eq!(recorder.chart().values(), sink.values());
                if cancel_after < 8 {
                    assert_eq!(outcome, Err(Cancelled), "{algorithm}");
                }
            }
        }
    }

    #[test]
    fn parses_algorithm_ids() {
        assert_eq!("quick".parse::<Algorithm>().unwrap(), Algorithm::Quick);
        assert_eq!(" Merge ".parse::<Algorithm>().unwrap(), Algorithm::Merge);
        let err = "bogo".parse::<Algorithm>().unwrap_err();
        assert!(matches!(err, SortVizError::UnknownAlgorithm(id) if id == "bogo"));
        for algorithm in Algorithm::ALL {
            assert_eq!(algorithm.to_string().parse::<Algorithm>().unwrap(), algorithm);
        }
    }

    #[test]
    fn every_algorithm_has_a_description() {
        for algorithm in Algorithm::ALL {
            let info = algorithm.info();
            assert!(info.name.to_lowercase().starts_with(algorithm.id()));
            assert!(!info.description.is_empty());
        }
    }
}

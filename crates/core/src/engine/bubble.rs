use crate::{Step, StepSink};

/// Adjacent-pair passes with a shrinking bound. The last index of each pass
/// settles; index 0 is marked once all passes are done.
pub(super) async fn sort(sink: &mut StepSink) -> Step {
    let n = sink.len();

    for pass in 0..n.saturating_sub(1) {
        let bound = n - pass - 1;
        for j in 0..bound {
            sink.compare(j, j + 1).await?;
            if sink.value(j) > sink.value(j + 1) {
                sink.swap(j, j + 1).await?;
            }
        }
        sink.mark_sorted(bound..bound + 1);
    }

    if n > 0 {
        sink.mark_sorted(0..1);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use crate::engine::{tests::sorted_with, Algorithm};

    #[tokio::test(start_paused = true)]
    async fn four_elements_take_six_comparisons() {
        let (sorted, stats) = sorted_with(Algorithm::Bubble, &[5, 3, 8, 1]).await;
        assert_eq!(sorted, vec![1, 3, 5, 8]);
        assert_eq!(stats.comparisons, 6);
        assert_eq!(stats.swaps, 4);
    }

    #[tokio::test(start_paused = true)]
    async fn sorted_input_still_runs_every_pass() {
        let (_, stats) = sorted_with(Algorithm::Bubble, &[1, 2, 3, 4, 5]).await;
        assert_eq!(stats.comparisons, 10);
        assert_eq!(stats.swaps, 0);
    }
}

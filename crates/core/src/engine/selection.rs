use crate::{Step, StepSink};

pub(super) async fn sort(sink: &mut StepSink) -> Step {
    let n = sink.len();

    for i in 0..n.saturating_sub(1) {
        let mut min_index = i;
        for j in i + 1..n {
            sink.compare(min_index, j).await?;
            if sink.value(j) < sink.value(min_index) {
                min_index = j;
            }
        }
        if min_index != i {
            sink.swap(i, min_index).await?;
        }
        sink.mark_sorted(i..i + 1);
    }

    if n > 0 {
        sink.mark_sorted(n - 1..n);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use crate::engine::{tests::sorted_with, Algorithm};

    #[tokio::test(start_paused = true)]
    async fn equal_values_are_never_swapped() {
        let (sorted, stats) = sorted_with(Algorithm::Selection, &[2, 2, 2]).await;
        assert_eq!(sorted, vec![2, 2, 2]);
        assert_eq!(stats.comparisons, 3);
        assert_eq!(stats.swaps, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn swaps_at_most_once_per_position() {
        let (sorted, stats) = sorted_with(Algorithm::Selection, &[4, 3, 2, 1]).await;
        assert_eq!(sorted, vec![1, 2, 3, 4]);
        assert_eq!(stats.comparisons, 6);
        assert_eq!(stats.swaps, 2);
    }
}

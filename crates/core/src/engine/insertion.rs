use crate::{Step, StepSink};

/// Shifts larger predecessors right one write at a time, then writes the held
/// key into the gap. Every shift is charged to the swap counter; the final
/// write of the key is not.
pub(super) async fn sort(sink: &mut StepSink) -> Step {
    let n = sink.len();
    if n > 0 {
        sink.mark_sorted(0..1);
    }

    for i in 1..n {
        let key = sink.value(i);
        // Index whose content is a stale copy; `key` belongs there.
        let mut hole = i;

        while hole > 0 {
            let j = hole - 1;
            if let Err(cancelled) = sink.compare(j, i).await {
                sink.restore(hole, key);
                return Err(cancelled);
            }
            if sink.value(j) <= key {
                break;
            }

            let shifted = sink.value(j);
            let step = sink.overwrite(hole, shifted).await;
            hole = j;
            sink.tally_write();
            if let Err(cancelled) = step {
                sink.restore(hole, key);
                return Err(cancelled);
            }
        }

        sink.overwrite(hole, key).await?;
        sink.mark_sorted(0..i + 1);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use crate::{
        engine::{
            tests::{cancelled_after, sorted_with},
            Algorithm,
        },
        sink::testing::{recording_sink, Directive},
        Cancelled,
    };

    #[tokio::test(start_paused = true)]
    async fn shifts_count_as_swaps_but_settling_does_not() {
        let (sorted, stats) = sorted_with(Algorithm::Insertion, &[3, 1, 2]).await;
        assert_eq!(sorted, vec![1, 2, 3]);
        // i=1: one shift; i=2: one shift, then stops at 1.
        assert_eq!(stats.swaps, 2);
        assert_eq!(stats.comparisons, 3);
    }

    #[tokio::test(start_paused = true)]
    async fn writes_instead_of_exchanging() {
        let (mut sink, recorder) = recording_sink(&[2, 1]);
        crate::engine::run(Algorithm::Insertion, &mut sink).await.unwrap();

        let directives = recorder.directives();
        assert!(!directives
            .iter()
            .any(|d| matches!(d, Directive::Exchange(..))));
        let writes: Vec<_> = directives
            .iter()
            .filter(|d| matches!(d, Directive::SetHeight(..)))
            .collect();
        assert_eq!(
            writes,
            vec![&Directive::SetHeight(1, 2), &Directive::SetHeight(0, 1)]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn shift_is_charged_even_when_its_pause_is_revoked() {
        // Compare pauses 0..10 ms, the first shift pauses 10..20 ms.
        let (outcome, sink) =
            cancelled_after(Algorithm::Insertion, &[2, 1], Duration::from_millis(15)).await;
        assert_eq!(outcome, Err(Cancelled));
        assert_eq!(sink.stats().swaps, 1);
        assert_eq!(sink.values(), &[1, 2]);
    }
}

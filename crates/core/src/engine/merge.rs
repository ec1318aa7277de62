use futures::future::{BoxFuture, FutureExt};

use crate::{Step, StepSink};

pub(super) async fn sort(sink: &mut StepSink) -> Step {
    let n = sink.len();
    sort_range(sink, 0, n).await?;
    sink.mark_sorted(0..n);
    Ok(())
}

fn sort_range(sink: &mut StepSink, start: usize, end: usize) -> BoxFuture<'_, Step> {
    async move {
        if end.saturating_sub(start) < 2 {
            return Ok(());
        }
        let mid = (start + end - 1) / 2;
        sort_range(sink, start, mid + 1).await?;
        sort_range(sink, mid + 1, end).await?;
        merge(sink, start, mid, end - 1).await
    }
    .boxed()
}

/// Merges the sorted runs `left..=mid` and `mid + 1..=right` from local
/// copies. Every write back into the sequence is charged to the swap counter.
async fn merge(sink: &mut StepSink, left: usize, mid: usize, right: usize) -> Step {
    let lower = sink.values()[left..=mid].to_vec();
    let upper = sink.values()[mid + 1..=right].to_vec();
    let (mut i, mut j, mut k) = (0, 0, left);

    while i < lower.len() && j < upper.len() {
        if let Err(cancelled) = sink.compare(left + i, mid + 1 + j).await {
            restore_remaining(sink, k, &lower[i..], &upper[j..]);
            return Err(cancelled);
        }

        let value = if lower[i] <= upper[j] {
            i += 1;
            lower[i - 1]
        } else {
            j += 1;
            upper[j - 1]
        };
        let step = sink.overwrite(k, value).await;
        k += 1;
        sink.tally_write();
        if let Err(cancelled) = step {
            restore_remaining(sink, k, &lower[i..], &upper[j..]);
            return Err(cancelled);
        }
    }

    let tail: Vec<u32> = lower[i..].iter().chain(&upper[j..]).copied().collect();
    for (offset, &value) in tail.iter().enumerate() {
        let step = sink.overwrite(k + offset, value).await;
        sink.tally_write();
        if let Err(cancelled) = step {
            restore_remaining(sink, k + offset + 1, &tail[offset + 1..], &[]);
            return Err(cancelled);
        }
    }

    Ok(())
}

/// Writes the values not yet merged back from `start`, so a cancelled merge
/// loses and duplicates nothing.
fn restore_remaining(sink: &mut StepSink, start: usize, lower: &[u32], upper: &[u32]) {
    for (offset, &value) in lower.iter().chain(upper).enumerate() {
        sink.restore(start + offset, value);
    }
}

use futures::future::{BoxFuture, FutureExt};

use crate::{Step, StepSink};

pub(super) async fn sort(sink: &mut StepSink) -> Step {
    let n = sink.len();
    sort_range(sink, 0, n).await?;
    sink.mark_sorted(0..n);
    Ok(())
}

/// Sorts `start..end`. The pivot is marked as soon as it reaches its final
/// index.
fn sort_range(sink: &mut StepSink, start: usize, end: usize) -> BoxFuture<'_, Step> {
    async move {
        if end.saturating_sub(start) < 2 {
            return Ok(());
        }
        let pivot = partition(sink, start, end - 1).await?;
        sink.mark_sorted(pivot..pivot + 1);

        sort_range(sink, start, pivot).await?;
        sort_range(sink, pivot + 1, end).await
    }
    .boxed()
}

/// Lomuto partition of `low..=high` around the value at `high`. Elements equal
/// to the pivot go to the low side. Returns the pivot's resting index.
async fn partition(sink: &mut StepSink, low: usize, high: usize) -> Step<usize> {
    let pivot = sink.value(high);
    let mut boundary = low;

    for j in low..high {
        sink.compare(j, high).await?;
        if sink.value(j) <= pivot {
            sink.swap(boundary, j).await?;
            boundary += 1;
        }
    }

    sink.swap(boundary, high).await?;
    Ok(boundary)
}

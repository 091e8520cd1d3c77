use std::future::Future;
use std::sync::Arc;

use futures::stream::FuturesUnordered;
use futures::StreamExt;
use tokio::sync::Semaphore;

/// Execute one phase's tasks concurrently and wait for every one of them.
///
/// No outcome cancels the others: the returned vector holds one result per
/// input item, in input order, once all futures have settled.
///
/// # Arguments
///
/// * `items` - Tasks of the phase, in declaration order
/// * `max_parallel` - Optional bound on tasks in flight; `None` runs all at once
/// * `executor_fn` - Async function executing a single task
pub async fn execute_phase_parallel<I, R, F, Fut>(
    items: Vec<I>,
    max_parallel: Option<usize>,
    executor_fn: F,
) -> Vec<R>
where
    F: Fn(I) -> Fut,
    Fut: Future<Output = R>,
{
    let sem = max_parallel
        .filter(|n| *n > 0)
        .map(|n| Arc::new(Semaphore::new(n)));
    let total = items.len();
    let mut futs: FuturesUnordered<_> = FuturesUnordered::new();

    for (idx, item) in items.into_iter().enumerate() {
        let sem = sem.clone();
        let fut = executor_fn(item);

        futs.push(async move {
            // The semaphore is never closed, so acquire only fails if it were.
            let _permit = match sem {
                Some(sem) => sem.acquire_owned().await.ok(),
                None => None,
            };
            (idx, fut.await)
        });
    }

    let mut slots: Vec<Option<R>> = std::iter::repeat_with(|| None).take(total).collect();
    while let Some((idx, result)) = futs.next().await {
        slots[idx] = Some(result);
    }

    slots.into_iter().flatten().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    #[tokio::test]
    async fn test_results_keep_input_order() {
        let out = execute_phase_parallel(vec![30u64, 5, 15], None, |ms| async move {
            tokio::time::sleep(Duration::from_millis(ms)).await;
            ms
        })
        .await;
        assert_eq!(out, vec![30, 5, 15]);
    }

    #[tokio::test]
    async fn test_failure_does_not_cancel_siblings() {
        let finished = AtomicUsize::new(0);
        let out = execute_phase_parallel(vec![0u64, 20, 40], None, |ms| {
            let finished = &finished;
            async move {
                tokio::time::sleep(Duration::from_millis(ms)).await;
                finished.fetch_add(1, Ordering::SeqCst);
                if ms == 0 {
                    Err("boom")
                } else {
                    Ok(ms)
                }
            }
        })
        .await;

        assert_eq!(finished.load(Ordering::SeqCst), 3);
        assert_eq!(out, vec![Err("boom"), Ok(20), Ok(40)]);
    }

    #[tokio::test]
    async fn test_all_tasks_run_concurrently_without_bound() {
        let in_flight = AtomicUsize::new(0);
        let peak = AtomicUsize::new(0);
        execute_phase_parallel(vec![(); 4], None, |_| {
            let (in_flight, peak) = (&in_flight, &peak);
            async move {
                let now = in_flight.fetch_add(1, Ordering::SeqCst) + 1;
                peak.fetch_max(now, Ordering::SeqCst);
                tokio::time::sleep(Duration::from_millis(20)).await;
                in_flight.fetch_sub(1, Ordering::SeqCst);
            }
        })
        .await;
        assert_eq!(peak.load(Ordering::SeqCst), 4);
    }

    #[tokio::test]
    async fn test_max_parallel_bounds_in_flight_tasks() {
        let in_flight = AtomicUsize::new(0);
        let peak = AtomicUsize::new(0);
        execute_phase_parallel(vec![(); 5], Some(2), |_| {
            let (in_flight, peak) = (&in_flight, &peak);
            async move {
                let now = in_flight.fetch_add(1, Ordering::SeqCst) + 1;
                peak.fetch_max(now, Ordering::SeqCst);
                tokio::time::sleep(Duration::from_millis(10)).await;
                in_flight.fetch_sub(1, Ordering::SeqCst);
            }
        })
        .await;
        assert_eq!(peak.load(Ordering::SeqCst), 2);
    }
}

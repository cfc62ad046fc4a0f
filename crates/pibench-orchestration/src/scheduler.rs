//! Chunk partitioning and parallel dispatch.
//!
//! The term range is split into one contiguous chunk per worker. Each chunk
//! runs on its own thread of a fixed-size pool and hands its result back over
//! a channel; the caller waits for every chunk, or for the deadline.
//! The first failure aborts the whole call.

use std::any::Any;
use std::ops::Range;
use std::panic::{self, AssertUnwindSafe};
use std::time::Duration;

use crossbeam_channel::{Receiver, RecvTimeoutError};
use rayon::{ThreadPool, ThreadPoolBuilder};
use tracing::debug;

use pibench_core::decimal::Precision;
use pibench_core::error::BenchError;
use pibench_core::observer::ProgressObserver;
use pibench_core::progress::{AbortToken, ProgressUpdate};
use pibench_core::series::{evaluate_range, PartialSum};

/// A contiguous term range assigned to one worker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chunk {
    /// Position of the chunk in the partition.
    pub index: usize,
    /// Half-open term range.
    pub range: Range<u64>,
}

/// Dispatch options.
#[derive(Debug, Clone, Default)]
pub struct SchedulerOptions {
    /// Upper bound on the wait for all chunks.
    pub timeout: Option<Duration>,
    /// Pin worker `i` to core `i`.
    pub pin_workers: bool,
}

/// Split `[0, total_terms)` into `workers` contiguous ranges.
///
/// The last range absorbs the remainder of the integer division, so every
/// index is covered exactly once. When `total_terms < workers` the leading
/// chunks are empty.
///
/// # Example
/// ```
/// use pibench_orchestration::scheduler::partition;
///
/// let chunks = partition(10_000, 3).unwrap();
/// let ranges: Vec<_> = chunks.into_iter().map(|c| c.range).collect();
/// assert_eq!(ranges, vec![0..3333, 3333..6666, 6666..10_000]);
/// ```
pub fn partition(total_terms: u64, workers: usize) -> Result<Vec<Chunk>, BenchError> {
    if workers == 0 {
        return Err(BenchError::Environment(
            "worker count must be positive".into(),
        ));
    }
    let count = u64::try_from(workers)
        .map_err(|_| BenchError::Config(format!("too many workers: {workers}")))?;
    let chunk_size = total_terms / count;

    let mut chunks = Vec::with_capacity(workers);
    let mut start = 0u64;
    for index in 0..workers {
        let end = if index + 1 == workers {
            total_terms
        } else {
            start + chunk_size
        };
        chunks.push(Chunk {
            index,
            range: start..end,
        });
        start = end;
    }
    Ok(chunks)
}

/// Evaluate every chunk of the series in parallel.
///
/// Partial sums are returned ordered by chunk index.
pub fn run_chunks(
    precision: &Precision,
    chunks: &[Chunk],
    opts: &SchedulerOptions,
    observer: &dyn ProgressObserver,
) -> Result<Vec<PartialSum>, BenchError> {
    run_tasks(chunks, opts, observer, |chunk, abort| {
        evaluate_range(precision, chunk.range.clone(), abort)
    })
}

/// Run `task` once per chunk on a pool with one thread per chunk.
///
/// Every chunk must report exactly once. A task error or panic raises the
/// shared abort token and fails the call with [`BenchError::Worker`]; an
/// expired deadline fails it with [`BenchError::Timeout`].
pub fn run_tasks<T, F>(
    chunks: &[Chunk],
    opts: &SchedulerOptions,
    observer: &dyn ProgressObserver,
    task: F,
) -> Result<Vec<T>, BenchError>
where
    T: Send,
    F: Fn(&Chunk, &AbortToken) -> Result<T, BenchError> + Sync,
{
    if chunks.is_empty() {
        return Err(BenchError::Config("no chunks to schedule".into()));
    }

    let pool = build_pool(chunks.len(), opts.pin_workers)?;
    let abort = opts
        .timeout
        .map_or_else(AbortToken::new, AbortToken::with_timeout);
    let (tx, rx) = crossbeam_channel::bounded(chunks.len());
    let task = &task;
    let abort_ref = &abort;

    pool.in_place_scope(|scope| {
        for chunk in chunks {
            let tx = tx.clone();
            scope.spawn(move |_| {
                debug!(
                    chunk = chunk.index,
                    start = chunk.range.start,
                    end = chunk.range.end,
                    "Dispatching chunk"
                );
                observer.on_progress(&ProgressUpdate::started(chunk.index, chunk.range.clone()));
                let outcome = panic::catch_unwind(AssertUnwindSafe(|| task(chunk, abort_ref)))
                    .unwrap_or_else(|payload| {
                        Err(BenchError::Worker {
                            chunk: chunk.index,
                            reason: panic_message(payload.as_ref()),
                        })
                    });
                if outcome.is_ok() {
                    observer.on_progress(&ProgressUpdate::done(chunk.index, chunk.range.clone()));
                }
                // The collector may already have given up; nothing to report then.
                let _ = tx.send((chunk.index, outcome));
            });
        }
        drop(tx);
        collect(&rx, chunks.len(), abort_ref, opts.timeout)
    })
}

fn build_pool(threads: usize, pin_workers: bool) -> Result<ThreadPool, BenchError> {
    let mut builder = ThreadPoolBuilder::new()
        .num_threads(threads)
        .thread_name(|i| format!("pibench-worker-{i}"));

    if pin_workers {
        match core_affinity::get_core_ids() {
            Some(core_ids) if !core_ids.is_empty() => {
                builder = builder.start_handler(move |index| {
                    let core = core_ids[index % core_ids.len()];
                    if !core_affinity::set_for_current(core) {
                        debug!(worker = index, "Could not pin worker to core");
                    }
                });
            }
            _ => debug!("Core ids unavailable, workers stay unpinned"),
        }
    }

    builder
        .build()
        .map_err(|e| BenchError::Environment(format!("failed to create thread pool: {e}")))
}

type Message<T> = (usize, Result<T, BenchError>);

/// Gather one result per chunk, in chunk order.
fn collect<T>(
    rx: &Receiver<Message<T>>,
    expected: usize,
    abort: &AbortToken,
    timeout: Option<Duration>,
) -> Result<Vec<T>, BenchError> {
    let fail = |err: BenchError| {
        abort.abort();
        Err(err)
    };

    let mut slots: Vec<Option<T>> = (0..expected).map(|_| None).collect();
    for _ in 0..expected {
        let received = match abort.deadline() {
            Some(deadline) => rx.recv_deadline(deadline),
            None => rx.recv().map_err(|_| RecvTimeoutError::Disconnected),
        };
        let (index, outcome) = match received {
            Ok(message) => message,
            Err(RecvTimeoutError::Timeout) => {
                return fail(BenchError::Timeout(format_timeout(timeout)));
            }
            Err(RecvTimeoutError::Disconnected) => {
                return fail(BenchError::Worker {
                    chunk: first_missing(&slots),
                    reason: "worker exited without a result".into(),
                });
            }
        };
        let value = match outcome {
            Ok(value) => value,
            Err(err) => return fail(worker_failure(index, err, timeout)),
        };
        let Some(slot) = slots.get_mut(index) else {
            return fail(BenchError::Worker {
                chunk: index,
                reason: "result for unknown chunk".into(),
            });
        };
        if slot.is_some() {
            return fail(BenchError::Worker {
                chunk: index,
                reason: "duplicate result".into(),
            });
        }
        *slot = Some(value);
        debug!(chunk = index, "Chunk collected");
    }

    slots
        .into_iter()
        .enumerate()
        .map(|(index, slot)| {
            slot.ok_or_else(|| BenchError::Worker {
                chunk: index,
                reason: "missing result".into(),
            })
        })
        .collect()
}

/// Wrap a task error; deadline expiry keeps its own kind.
fn worker_failure(chunk: usize, err: BenchError, timeout: Option<Duration>) -> BenchError {
    match err {
        BenchError::Timeout(_) => BenchError::Timeout(format_timeout(timeout)),
        BenchError::Worker { .. } => err,
        other => BenchError::Worker {
            chunk,
            reason: other.to_string(),
        },
    }
}

fn first_missing<T>(slots: &[Option<T>]) -> usize {
    slots.iter().position(Option::is_none).unwrap_or_default()
}

fn format_timeout(timeout: Option<Duration>) -> String {
    timeout.map_or_else(|| "deadline".to_string(), |t| format!("{t:?}"))
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        format!("panicked: {s}")
    } else if let Some(s) = payload.downcast_ref::<String>() {
        format!("panicked: {s}")
    } else {
        "panicked".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use pibench_core::error::ArithmeticError;
    use pibench_core::observer::NoOpObserver;
    use pibench_core::series::{combine, evaluate_range};

    fn ranges(chunks: &[Chunk]) -> Vec<Range<u64>> {
        chunks.iter().map(|c| c.range.clone()).collect()
    }

    #[test]
    fn partition_three_workers() {
        let chunks = partition(10_000, 3).unwrap();
        assert_eq!(ranges(&chunks), vec![0..3333, 3333..6666, 6666..10_000]);
        assert_eq!(chunks[2].index, 2);
    }

    #[test]
    fn partition_single_worker() {
        let chunks = partition(10_000, 1).unwrap();
        assert_eq!(ranges(&chunks), vec![0..10_000]);
    }

    #[test]
    fn partition_more_workers_than_terms() {
        let chunks = partition(2, 4).unwrap();
        assert_eq!(ranges(&chunks), vec![0..0, 0..0, 0..0, 0..2]);
    }

    #[test]
    fn partition_zero_workers_fails() {
        assert!(matches!(partition(100, 0), Err(BenchError::Environment(_))));
    }

    #[test]
    fn run_chunks_matches_single_range() {
        let precision = Precision::new(400);
        let chunks = partition(30, 4).unwrap();
        let partials =
            run_chunks(&precision, &chunks, &SchedulerOptions::default(), &NoOpObserver).unwrap();
        assert_eq!(partials.len(), 4);
        for (partial, chunk) in partials.iter().zip(&chunks) {
            assert_eq!(partial.range, chunk.range);
        }

        let single = evaluate_range(&precision, 0..30, &AbortToken::new()).unwrap();
        let combined = combine(&precision, &partials).unwrap();
        assert!(combined.ulps_from(&single.sum) <= 30);
    }

    #[test]
    fn results_are_ordered_by_chunk() {
        let chunks = partition(40, 4).unwrap();
        let results = run_tasks(&chunks, &SchedulerOptions::default(), &NoOpObserver, |chunk, _| {
            // Later chunks finish first.
            std::thread::sleep(Duration::from_millis(10 * (4 - chunk.index as u64)));
            Ok(chunk.index)
        })
        .unwrap();
        assert_eq!(results, vec![0, 1, 2, 3]);
    }

    #[test]
    fn worker_error_fails_the_call() {
        let chunks = partition(40, 4).unwrap();
        let err = run_tasks(&chunks, &SchedulerOptions::default(), &NoOpObserver, |chunk, _| {
            if chunk.index == 2 {
                Err(ArithmeticError::DivisionByZero.into())
            } else {
                Ok(chunk.index)
            }
        })
        .unwrap_err();
        match err {
            BenchError::Worker { chunk, reason } => {
                assert_eq!(chunk, 2);
                assert!(reason.contains("division by zero"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn worker_panic_fails_the_call() {
        let chunks = partition(20, 2).unwrap();
        let err = run_tasks(&chunks, &SchedulerOptions::default(), &NoOpObserver, |chunk, _| {
            assert!(chunk.index != 1, "boom");
            Ok(chunk.index)
        })
        .unwrap_err();
        match err {
            BenchError::Worker { chunk, reason } => {
                assert_eq!(chunk, 1);
                assert!(reason.contains("boom"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn deadline_fails_with_timeout() {
        let chunks = partition(20, 2).unwrap();
        let opts = SchedulerOptions {
            timeout: Some(Duration::from_millis(20)),
            pin_workers: false,
        };
        let err = run_tasks(&chunks, &opts, &NoOpObserver, |_, abort| -> Result<(), BenchError> {
            loop {
                abort.check()?;
                std::thread::sleep(Duration::from_millis(1));
            }
        })
        .unwrap_err();
        assert!(matches!(err, BenchError::Timeout(_)));
    }

    #[test]
    fn failure_aborts_siblings() {
        let chunks = partition(30, 3).unwrap();
        let stopped = AtomicUsize::new(0);
        let err = run_tasks(&chunks, &SchedulerOptions::default(), &NoOpObserver, |chunk, abort| -> Result<(), BenchError> {
            if chunk.index == 0 {
                return Err(BenchError::Config("bad chunk".into()));
            }
            while !abort.is_aborted() {
                std::thread::sleep(Duration::from_millis(1));
            }
            stopped.fetch_add(1, Ordering::Relaxed);
            Err(BenchError::Cancelled)
        })
        .unwrap_err();
        assert!(matches!(err, BenchError::Worker { chunk: 0, .. }));
        assert_eq!(stopped.load(Ordering::Relaxed), 2);
    }

    #[test]
    fn observer_sees_every_chunk() {
        use pibench_core::observer::LoggingObserver;

        let observer = LoggingObserver::new();
        let chunks = partition(12, 3).unwrap();
        run_tasks(&chunks, &SchedulerOptions::default(), &observer, |chunk, _| Ok(chunk.index)).unwrap();
        assert_eq!(observer.finished(), 3);
    }

    #[test]
    fn pinned_pool_runs() {
        let chunks = partition(8, 2).unwrap();
        let opts = SchedulerOptions {
            timeout: None,
            pin_workers: true,
        };
        let results = run_tasks(&chunks, &opts, &NoOpObserver, |chunk, _| Ok(chunk.range.end)).unwrap();
        assert_eq!(results, vec![4, 8]);
    }

    #[test]
    fn empty_chunk_list_is_rejected() {
        let err = run_tasks(&[], &SchedulerOptions::default(), &NoOpObserver, |_, _| Ok(())).unwrap_err();
        assert!(matches!(err, BenchError::Config(_)));
    }

    fn worker_reason(err: BenchError) -> (usize, String) {
        match err {
            BenchError::Worker { chunk, reason } => (chunk, reason),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn repeated_chunk_index_is_rejected() {
        let chunks = [
            Chunk { index: 0, range: 0..1 },
            Chunk { index: 0, range: 1..2 },
        ];
        let err = run_tasks(&chunks, &SchedulerOptions::default(), &NoOpObserver, |chunk, _| {
            Ok(chunk.range.start)
        })
        .unwrap_err();
        let (chunk, reason) = worker_reason(err);
        assert_eq!(chunk, 0);
        assert_eq!(reason, "duplicate result");
    }

    #[test]
    fn out_of_range_chunk_index_is_rejected() {
        let chunks = [
            Chunk { index: 0, range: 0..1 },
            Chunk { index: 5, range: 1..2 },
        ];
        let err = run_tasks(&chunks, &SchedulerOptions::default(), &NoOpObserver, |chunk, _| {
            Ok(chunk.range.start)
        })
        .unwrap_err();
        let (chunk, reason) = worker_reason(err);
        assert_eq!(chunk, 5);
        assert_eq!(reason, "result for unknown chunk");
    }

    #[test]
    fn unbounded_timeout_runs_to_completion() {
        let chunks = partition(8, 2).unwrap();
        let opts = SchedulerOptions {
            timeout: Some(Duration::from_secs(u64::MAX)),
            pin_workers: false,
        };
        let results = run_tasks(&chunks, &opts, &NoOpObserver, |chunk, _| Ok(chunk.index)).unwrap();
        assert_eq!(results, vec![0, 1]);
    }
}

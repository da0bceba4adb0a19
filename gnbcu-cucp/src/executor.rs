//! Task executors
//!
//! A [`TaskExecutor`] is a single logical thread of execution: a named,
//! bounded FIFO work queue drained by one dedicated tokio task. Work items
//! dispatched onto the same executor never run concurrently and always run
//! in dispatch order.
//!
//! `dispatch()` is strictly non-blocking: when the queue is full or the
//! executor has stopped accepting work it returns `false` immediately.
//! Callers that must not lose work use [`TaskExecutor::dispatch_with_retry`],
//! which retries with bounded exponential backoff and reports an error once
//! the attempt budget is spent.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use gnbcu_common::config::DispatchRetryConfig;
use gnbcu_common::Error;
use tokio::sync::mpsc;
use tracing::{debug, warn};

/// A unit of work dispatched onto an executor.
pub type Job = Box<dyn FnOnce() + Send + 'static>;

/// Work queue envelope, with an explicit shutdown signal.
enum ExecutorMessage {
    /// Regular work item.
    Work(Job),
    /// Drain point - the executor loop exits after seeing this.
    Shutdown,
}

struct ExecutorInner {
    name: String,
    tx: mpsc::Sender<ExecutorMessage>,
    runtime: tokio::runtime::Handle,
    accepting: AtomicBool,
}

/// Named single-consumer FIFO work queue.
///
/// Cheap to clone; all clones refer to the same queue. Must be created from
/// within a tokio runtime context.
#[derive(Clone)]
pub struct TaskExecutor {
    inner: Arc<ExecutorInner>,
}

impl TaskExecutor {
    /// Creates a new executor with the given name and queue capacity and
    /// spawns its drain loop on the current tokio runtime.
    pub fn new(name: impl Into<String>, queue_size: usize) -> Self {
        let name = name.into();
        let (tx, mut rx) = mpsc::channel::<ExecutorMessage>(queue_size);
        let runtime = tokio::runtime::Handle::current();

        let loop_name = name.clone();
        runtime.spawn(async move {
            while let Some(msg) = rx.recv().await {
                match msg {
                    ExecutorMessage::Work(job) => job(),
                    ExecutorMessage::Shutdown => break,
                }
            }
            debug!(executor = %loop_name, "executor loop terminated");
        });

        Self {
            inner: Arc::new(ExecutorInner {
                name,
                tx,
                runtime,
                accepting: AtomicBool::new(true),
            }),
        }
    }

    /// Returns the executor name.
    pub fn name(&self) -> &str {
        &self.inner.name
    }

    /// Returns true if the executor still accepts new work.
    pub fn is_accepting(&self) -> bool {
        self.inner.accepting.load(Ordering::Acquire)
    }

    /// Attempts to enqueue a work item without blocking.
    ///
    /// Returns `false` if the queue is full or the executor has stopped
    /// accepting work. Never blocks the caller.
    pub fn dispatch(&self, job: impl FnOnce() + Send + 'static) -> bool {
        if !self.is_accepting() {
            return false;
        }
        self.inner
            .tx
            .try_send(ExecutorMessage::Work(Box::new(job)))
            .is_ok()
    }

    /// Enqueues a work item, falling back to an asynchronous send when the
    /// queue is momentarily full.
    ///
    /// Used for task resumptions, which must not be dropped and must not
    /// block the waking thread. Work is silently discarded if the executor
    /// has stopped accepting; suspended tasks cannot resume on a stopped
    /// executor anyway.
    ///
    /// A resumption parked on the async fallback may be overtaken by work
    /// dispatched after it. This cannot reorder a single task's steps: a
    /// suspended task has at most one outstanding resumption at a time, and
    /// FIFO order is only guaranteed among directly enqueued items.
    pub(crate) fn dispatch_or_queue(&self, job: Job) {
        if !self.is_accepting() {
            warn!(executor = %self.inner.name, "dropping resumption for stopped executor");
            return;
        }
        match self.inner.tx.try_send(ExecutorMessage::Work(job)) {
            Ok(()) => {}
            Err(mpsc::error::TrySendError::Full(msg)) => {
                let tx = self.inner.tx.clone();
                self.inner.runtime.spawn(async move {
                    let _ = tx.send(msg).await;
                });
            }
            Err(mpsc::error::TrySendError::Closed(_)) => {
                warn!(executor = %self.inner.name, "dropping work for closed executor queue");
            }
        }
    }

    /// Enqueues a work item, retrying with bounded exponential backoff on a
    /// full queue.
    ///
    /// Blocks the calling thread between attempts; intended for callers
    /// outside the executor (e.g. a controller `stop()` running on an outer
    /// thread). Returns an error when the executor is stopped or the retry
    /// budget is exhausted.
    pub fn dispatch_with_retry(
        &self,
        policy: &DispatchRetryConfig,
        job: impl FnOnce() + Send + 'static,
    ) -> Result<(), Error> {
        let mut pending = ExecutorMessage::Work(Box::new(job));
        let mut delay = Duration::from_millis(policy.initial_delay_ms);

        for attempt in 1..=policy.max_attempts {
            if !self.is_accepting() {
                return Err(Error::ExecutorStopped(self.inner.name.clone()));
            }
            match self.inner.tx.try_send(pending) {
                Ok(()) => return Ok(()),
                Err(mpsc::error::TrySendError::Full(msg)) => {
                    pending = msg;
                    if attempt < policy.max_attempts {
                        warn!(
                            executor = %self.inner.name,
                            attempt,
                            "executor queue full, retrying dispatch in {:?}",
                            delay
                        );
                        std::thread::sleep(delay);
                        delay = delay.saturating_mul(2);
                    }
                }
                Err(mpsc::error::TrySendError::Closed(_)) => {
                    return Err(Error::ExecutorStopped(self.inner.name.clone()));
                }
            }
        }

        Err(Error::DispatchExhausted {
            executor: self.inner.name.clone(),
            attempts: policy.max_attempts,
        })
    }

    /// Stops accepting new work and signals the drain loop to exit once all
    /// previously enqueued work has run.
    pub fn stop(&self) {
        if self.inner.accepting.swap(false, Ordering::AcqRel) {
            let tx = self.inner.tx.clone();
            self.inner.runtime.spawn(async move {
                let _ = tx.send(ExecutorMessage::Shutdown).await;
            });
        }
    }
}

impl std::fmt::Debug for TaskExecutor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TaskExecutor")
            .field("name", &self.inner.name)
            .field("accepting", &self.is_accepting())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::async_task::ManualEvent;
    use std::sync::Mutex;

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_fifo_order() {
        let exec = TaskExecutor::new("test-fifo", 16);
        let order = Arc::new(Mutex::new(Vec::new()));
        let done = ManualEvent::<()>::new();

        for i in 0..8 {
            let order = order.clone();
            let done = done.clone();
            assert!(exec.dispatch(move || {
                order.lock().unwrap().push(i);
                if i == 7 {
                    done.set(());
                }
            }));
        }

        done.wait().await;
        assert_eq!(*order.lock().unwrap(), (0..8).collect::<Vec<_>>());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_dispatch_full_queue_returns_false() {
        let exec = TaskExecutor::new("test-full", 1);
        let gate = ManualEvent::<()>::new();

        // Occupy the drain loop so the queue cannot empty.
        let g = gate.clone();
        assert!(exec.dispatch(move || g.wait_blocking()));
        // Give the loop time to pick up the blocking job.
        tokio::time::sleep(Duration::from_millis(20)).await;

        // One slot in the queue, then full.
        assert!(exec.dispatch(|| {}));
        assert!(!exec.dispatch(|| {}));

        gate.set(());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_dispatch_after_stop_returns_false() {
        let exec = TaskExecutor::new("test-stopped", 4);
        exec.stop();
        assert!(!exec.dispatch(|| {}));
        assert!(!exec.is_accepting());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_dispatch_with_retry_exhaustion() {
        let exec = TaskExecutor::new("test-retry", 1);
        let gate = ManualEvent::<()>::new();

        let g = gate.clone();
        assert!(exec.dispatch(move || g.wait_blocking()));
        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(exec.dispatch(|| {}));

        let policy = DispatchRetryConfig {
            max_attempts: 3,
            initial_delay_ms: 1,
        };
        let result = tokio::task::spawn_blocking(move || {
            let r = exec.dispatch_with_retry(&policy, || {});
            gate.set(());
            r
        })
        .await
        .unwrap();

        match result {
            Err(Error::DispatchExhausted { attempts, .. }) => assert_eq!(attempts, 3),
            other => panic!("expected DispatchExhausted, got {other:?}"),
        }
    }
}

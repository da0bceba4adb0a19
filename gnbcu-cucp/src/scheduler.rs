//! Per-key task scheduler
//!
//! Serializes procedures per managed entity: for a given key at most one
//! async task is in flight, and queued tasks start in submission order once
//! the previous task for that key completes. Tasks for distinct keys run
//! with full concurrency.
//!
//! Used to keep, e.g., a UE release procedure from interleaving with a
//! concurrent reconfiguration procedure for the same UE.

use std::collections::{HashMap, VecDeque};
use std::fmt::Display;
use std::future::Future;
use std::hash::Hash;
use std::pin::Pin;
use std::sync::{Arc, Mutex};

use gnbcu_common::UeIndex;
use tracing::{debug, warn};

use crate::async_task::{launch_async_task, ManualEvent};
use crate::executor::TaskExecutor;

type PendingTask = Pin<Box<dyn Future<Output = ()> + Send + 'static>>;

#[derive(Default)]
struct KeyQueue {
    running: bool,
    retired: bool,
    pending: VecDeque<PendingTask>,
}

struct SchedulerState<K> {
    queues: HashMap<K, KeyQueue>,
    drain_waiters: Vec<ManualEvent<()>>,
}

struct SchedulerInner<K> {
    exec: TaskExecutor,
    state: Mutex<SchedulerState<K>>,
}

/// FIFO-per-key scheduler of async tasks.
///
/// Clones share the same queues. The queue map owns every per-key queue, so
/// retiring a key can never race a task that is still in flight for it: the
/// queue entry is only removed under the map lock, after the running task
/// has completed.
pub struct TaskScheduler<K> {
    inner: Arc<SchedulerInner<K>>,
}

impl<K> Clone for TaskScheduler<K> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

/// Scheduler keyed by UE index, the common case in the CU-CP.
pub type UeTaskScheduler = TaskScheduler<UeIndex>;

impl<K> TaskScheduler<K>
where
    K: Eq + Hash + Clone + Display + Send + 'static,
{
    /// Creates a scheduler that launches its tasks on `exec`.
    pub fn new(exec: TaskExecutor) -> Self {
        Self {
            inner: Arc::new(SchedulerInner {
                exec,
                state: Mutex::new(SchedulerState {
                    queues: HashMap::new(),
                    drain_waiters: Vec::new(),
                }),
            }),
        }
    }

    /// Schedules `task` for `key`.
    ///
    /// Starts immediately if nothing is running for `key`, otherwise queues
    /// it behind the in-flight task. Tasks scheduled for a retired key are
    /// discarded.
    pub fn schedule_async_task(&self, key: K, task: impl Future<Output = ()> + Send + 'static) {
        let task: PendingTask = Box::pin(task);
        let start = {
            let mut state = self.inner.state.lock().unwrap();
            let queue = state.queues.entry(key.clone()).or_default();
            if queue.retired {
                warn!(key = %key, "discarding task scheduled for retired key");
                return;
            }
            if queue.running {
                queue.pending.push_back(task);
                None
            } else {
                queue.running = true;
                Some(task)
            }
        };
        if let Some(task) = start {
            Self::start_task(&self.inner, key, task);
        }
    }

    /// Retires `key`: pending (never-started) tasks are discarded, and the
    /// key's queue is removed once its in-flight task, if any, completes.
    ///
    /// Returns the number of discarded pending tasks.
    pub fn retire_key(&self, key: &K) -> usize {
        let (discarded, waiters) = {
            let mut state = self.inner.state.lock().unwrap();
            let Some(queue) = state.queues.get_mut(key) else {
                return 0;
            };
            queue.retired = true;
            let discarded = queue.pending.len();
            queue.pending.clear();
            if !queue.running {
                state.queues.remove(key);
            }
            (discarded, Self::take_waiters_if_idle(&mut state))
        };
        if discarded > 0 {
            debug!(key = %key, discarded, "discarded pending tasks for retired key");
        }
        for waiter in waiters {
            waiter.set(());
        }
        discarded
    }

    /// Returns an event that completes once no task is running or pending
    /// for any key. Completes immediately if the scheduler is already idle.
    pub fn drain_event(&self) -> ManualEvent<()> {
        let mut state = self.inner.state.lock().unwrap();
        if Self::is_idle(&state) {
            ManualEvent::completed(())
        } else {
            let event = ManualEvent::new();
            state.drain_waiters.push(event.clone());
            event
        }
    }

    /// Number of keys with a live queue (running or with pending tasks, or
    /// simply touched and not yet retired).
    pub fn nof_keys(&self) -> usize {
        self.inner.state.lock().unwrap().queues.len()
    }

    /// Number of tasks queued (not yet started) for `key`.
    pub fn nof_pending_tasks(&self, key: &K) -> usize {
        self.inner
            .state
            .lock()
            .unwrap()
            .queues
            .get(key)
            .map_or(0, |q| q.pending.len())
    }

    fn start_task(inner: &Arc<SchedulerInner<K>>, key: K, task: PendingTask) {
        let launched = launch_async_task(&inner.exec, task);
        let inner = inner.clone();
        launched.on_completion(move |()| Self::on_task_complete(&inner, key));
    }

    fn on_task_complete(inner: &Arc<SchedulerInner<K>>, key: K) {
        let (next, waiters) = {
            let mut state = inner.state.lock().unwrap();
            let Some(queue) = state.queues.get_mut(&key) else {
                return;
            };
            match queue.pending.pop_front() {
                Some(task) => (Some(task), Vec::new()),
                None => {
                    queue.running = false;
                    if queue.retired {
                        state.queues.remove(&key);
                    }
                    (None, Self::take_waiters_if_idle(&mut state))
                }
            }
        };
        if let Some(task) = next {
            Self::start_task(inner, key, task);
        }
        for waiter in waiters {
            waiter.set(());
        }
    }

    fn is_idle(state: &SchedulerState<K>) -> bool {
        state
            .queues
            .values()
            .all(|q| !q.running && q.pending.is_empty())
    }

    fn take_waiters_if_idle(state: &mut SchedulerState<K>) -> Vec<ManualEvent<()>> {
        if Self::is_idle(state) {
            std::mem::take(&mut state.drain_waiters)
        } else {
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn record(order: &Arc<Mutex<Vec<u32>>>, id: u32) {
        order.lock().unwrap().push(id);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_same_key_tasks_serialize_in_submission_order() {
        let exec = TaskExecutor::new("sched-fifo", 32);
        let sched: UeTaskScheduler = TaskScheduler::new(exec);
        let key = UeIndex(1);

        let order = Arc::new(Mutex::new(Vec::new()));
        let gate = ManualEvent::<()>::new();
        let all_done = ManualEvent::<()>::new();

        let (o, g) = (order.clone(), gate.clone());
        sched.schedule_async_task(key, async move {
            g.wait().await;
            record(&o, 1);
        });

        for id in 2..=4 {
            let o = order.clone();
            let done = all_done.clone();
            sched.schedule_async_task(key, async move {
                record(&o, id);
                if id == 4 {
                    done.set(());
                }
            });
        }

        // T1 is suspended on the gate; T2..T4 must not have started.
        assert!(order.lock().unwrap().is_empty());
        assert_eq!(sched.nof_pending_tasks(&key), 3);

        gate.set(());
        all_done.wait().await;
        assert_eq!(*order.lock().unwrap(), vec![1, 2, 3, 4]);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_distinct_keys_run_concurrently() {
        let exec = TaskExecutor::new("sched-keys", 32);
        let sched: UeTaskScheduler = TaskScheduler::new(exec);

        let gate = ManualEvent::<()>::new();
        let other_done = ManualEvent::<()>::new();

        let g = gate.clone();
        sched.schedule_async_task(UeIndex(1), async move {
            g.wait().await;
        });

        // A task for a different key is not blocked by ue=1's in-flight task.
        let d = other_done.clone();
        sched.schedule_async_task(UeIndex(2), async move {
            d.set(());
        });

        other_done.wait().await;
        gate.set(());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_retire_discards_pending_and_removes_queue() {
        let exec = TaskExecutor::new("sched-retire", 32);
        let sched: UeTaskScheduler = TaskScheduler::new(exec);
        let key = UeIndex(3);

        let gate = ManualEvent::<()>::new();
        let ran = Arc::new(Mutex::new(Vec::new()));

        let g = gate.clone();
        let r = ran.clone();
        sched.schedule_async_task(key, async move {
            g.wait().await;
            record(&r, 1);
        });
        for id in 2..=3 {
            let r = ran.clone();
            sched.schedule_async_task(key, async move {
                record(&r, id);
            });
        }

        assert_eq!(sched.retire_key(&key), 2);

        // The in-flight task is allowed to finish; pending ones never run.
        let drained = sched.drain_event();
        gate.set(());
        drained.wait().await;

        assert_eq!(*ran.lock().unwrap(), vec![1]);
        assert_eq!(sched.nof_keys(), 0);

        // Scheduling on a retired (now removed) key creates a fresh queue.
        let done = ManualEvent::<()>::new();
        let d = done.clone();
        sched.schedule_async_task(key, async move { d.set(()) });
        done.wait().await;
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_drain_event_when_idle_completes_immediately() {
        let exec = TaskExecutor::new("sched-idle", 8);
        let sched: UeTaskScheduler = TaskScheduler::new(exec);
        assert!(sched.drain_event().is_set());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_drain_event_fires_after_last_task() {
        let exec = TaskExecutor::new("sched-drain", 8);
        let sched: UeTaskScheduler = TaskScheduler::new(exec);

        let gate = ManualEvent::<()>::new();
        let g = gate.clone();
        sched.schedule_async_task(UeIndex(9), async move {
            g.wait().await;
        });

        let drained = sched.drain_event();
        assert!(!drained.is_set());
        gate.set(());
        tokio::time::timeout(Duration::from_secs(1), drained.wait())
            .await
            .unwrap();
    }
}

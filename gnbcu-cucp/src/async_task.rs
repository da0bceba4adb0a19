//! Async task engine
//!
//! Resumable, suspend-capable procedures that never occupy a thread while
//! waiting on a peer. Two pieces:
//!
//! - [`ManualEvent`] - a one-shot completion signal holding a result slot
//!   and an ordered continuation list. Peer notifiers complete procedures by
//!   setting the event; procedures suspend by awaiting it. A blocking
//!   consumer (`wait_blocking`) bridges asynchronous completion back to a
//!   synchronous caller, which is how controller and manager `stop()` wait
//!   for their asynchronous tails.
//! - [`AsyncTask`] / [`launch_async_task`] - runs a future as a procedure
//!   bound to one [`TaskExecutor`]. Launching polls the future synchronously
//!   until its first suspension point; every later resumption is dispatched
//!   back onto the owning executor, so the procedure's state is only ever
//!   touched from that executor.
//!
//! Cancellation is coarse: once launched, a task runs to completion even if
//! the launcher drops its handle. Only tasks still queued in a scheduler
//! (never started) can be discarded.

use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Condvar, Mutex};
use std::task::{Context, Poll, Waker};

use futures::task::ArcWake;

use crate::executor::TaskExecutor;

// ============================================================================
// ManualEvent
// ============================================================================

type Continuation<T> = Box<dyn FnOnce(&T) + Send + 'static>;

struct EventState<T> {
    result: Option<T>,
    continuations: Vec<Continuation<T>>,
    wakers: Vec<Waker>,
}

struct EventInner<T> {
    state: Mutex<EventState<T>>,
    cond: Condvar,
}

/// One-shot completion signal.
///
/// The result is delivered exactly once; continuations registered after
/// completion are invoked immediately and synchronously at registration.
/// Clones share the same underlying slot.
pub struct ManualEvent<T> {
    inner: Arc<EventInner<T>>,
}

impl<T> Clone for ManualEvent<T> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<T: Clone + Send + 'static> Default for ManualEvent<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone + Send + 'static> ManualEvent<T> {
    /// Creates a new, unset event.
    pub fn new() -> Self {
        Self {
            inner: Arc::new(EventInner {
                state: Mutex::new(EventState {
                    result: None,
                    continuations: Vec::new(),
                    wakers: Vec::new(),
                }),
                cond: Condvar::new(),
            }),
        }
    }

    /// Creates an event that is already completed with `value`.
    pub fn completed(value: T) -> Self {
        let ev = Self::new();
        ev.set(value);
        ev
    }

    /// Completes the event, delivering `value` to all registered
    /// continuations and waking all waiters.
    ///
    /// Completing an event twice is a programmer error.
    pub fn set(&self, value: T) {
        let (continuations, wakers) = {
            let mut state = self.inner.state.lock().unwrap();
            assert!(state.result.is_none(), "ManualEvent completed twice");
            state.result = Some(value.clone());
            self.inner.cond.notify_all();
            (
                std::mem::take(&mut state.continuations),
                std::mem::take(&mut state.wakers),
            )
        };
        // Continuations run outside the lock, in registration order.
        for cont in continuations {
            cont(&value);
        }
        for waker in wakers {
            waker.wake();
        }
    }

    /// Completes the event if it is not completed yet.
    ///
    /// Returns `false` without delivering anything when the event was
    /// already completed. For cooperative signals (e.g. a stop flag) where
    /// multiple producers may race.
    pub fn try_set(&self, value: T) -> bool {
        let (continuations, wakers) = {
            let mut state = self.inner.state.lock().unwrap();
            if state.result.is_some() {
                return false;
            }
            state.result = Some(value.clone());
            self.inner.cond.notify_all();
            (
                std::mem::take(&mut state.continuations),
                std::mem::take(&mut state.wakers),
            )
        };
        for cont in continuations {
            cont(&value);
        }
        for waker in wakers {
            waker.wake();
        }
        true
    }

    /// Registers a continuation to run on completion.
    ///
    /// If the event is already completed the continuation runs immediately,
    /// on the calling thread.
    pub fn subscribe(&self, cont: impl FnOnce(&T) + Send + 'static) {
        let value = {
            let mut state = self.inner.state.lock().unwrap();
            match &state.result {
                Some(value) => value.clone(),
                None => {
                    state.continuations.push(Box::new(cont));
                    return;
                }
            }
        };
        // Already completed; run outside the lock.
        cont(&value);
    }

    /// Returns true if the event has completed.
    pub fn is_set(&self) -> bool {
        self.inner.state.lock().unwrap().result.is_some()
    }

    /// Returns the result if the event has completed.
    pub fn try_get(&self) -> Option<T> {
        self.inner.state.lock().unwrap().result.clone()
    }

    /// Suspends the calling task until the event completes.
    pub fn wait(&self) -> EventFuture<T> {
        EventFuture {
            inner: self.inner.clone(),
        }
    }

    /// Blocks the calling thread until the event completes.
    ///
    /// For synchronous callers only (e.g. an outer shutdown thread); never
    /// call this from a job running on a task executor.
    pub fn wait_blocking(&self) -> T {
        let mut state = self.inner.state.lock().unwrap();
        while state.result.is_none() {
            state = self.inner.cond.wait(state).unwrap();
        }
        state.result.clone().unwrap()
    }
}

/// Future returned by [`ManualEvent::wait`].
pub struct EventFuture<T> {
    inner: Arc<EventInner<T>>,
}

impl<T: Clone + Send + 'static> Future for EventFuture<T> {
    type Output = T;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<T> {
        let mut state = self.inner.state.lock().unwrap();
        match &state.result {
            Some(value) => Poll::Ready(value.clone()),
            None => {
                state.wakers.push(cx.waker().clone());
                Poll::Pending
            }
        }
    }
}

// ============================================================================
// AsyncTask
// ============================================================================

type TaskFuture<T> = Pin<Box<dyn Future<Output = T> + Send + 'static>>;

struct TaskCore<T: Clone + Send + 'static> {
    /// The remaining logic of the procedure; `None` once completed.
    future: Mutex<Option<TaskFuture<T>>>,
    result: ManualEvent<T>,
    exec: TaskExecutor,
}

impl<T: Clone + Send + 'static> ArcWake for TaskCore<T> {
    fn wake_by_ref(arc_self: &Arc<Self>) {
        // Resumption must run on the owning executor, never inline on the
        // waking thread.
        let core = arc_self.clone();
        arc_self
            .exec
            .dispatch_or_queue(Box::new(move || poll_task(&core)));
    }
}

fn poll_task<T: Clone + Send + 'static>(core: &Arc<TaskCore<T>>) {
    let waker = futures::task::waker(core.clone());
    let mut cx = Context::from_waker(&waker);

    let mut slot = core.future.lock().unwrap();
    let Some(future) = slot.as_mut() else {
        // Already completed; a late wake is harmless.
        return;
    };
    match future.as_mut().poll(&mut cx) {
        Poll::Ready(value) => {
            *slot = None;
            drop(slot);
            core.result.set(value);
        }
        Poll::Pending => {}
    }
}

/// Handle to a launched procedure.
///
/// Dropping the handle does not stop the procedure; it only discards the
/// launcher's interest in the result.
pub struct AsyncTask<T: Clone + Send + 'static> {
    core: Arc<TaskCore<T>>,
}

impl<T: Clone + Send + 'static> AsyncTask<T> {
    /// Returns the task's completion event.
    pub fn result(&self) -> ManualEvent<T> {
        self.core.result.clone()
    }

    /// Returns true if the task has completed.
    pub fn is_complete(&self) -> bool {
        self.core.result.is_set()
    }

    /// Registers a continuation invoked with the task result on completion.
    pub fn on_completion(&self, cont: impl FnOnce(&T) + Send + 'static) {
        self.core.result.subscribe(cont);
    }
}

/// Launches `future` as an async task owned by `exec`.
///
/// The future is polled synchronously on the calling thread until it
/// completes or reaches its first suspension point; afterwards every
/// resumption is dispatched onto `exec`.
pub fn launch_async_task<T, F>(exec: &TaskExecutor, future: F) -> AsyncTask<T>
where
    T: Clone + Send + 'static,
    F: Future<Output = T> + Send + 'static,
{
    let core = Arc::new(TaskCore {
        future: Mutex::new(Some(Box::pin(future) as TaskFuture<T>)),
        result: ManualEvent::new(),
        exec: exec.clone(),
    });
    poll_task(&core);
    AsyncTask { core }
}

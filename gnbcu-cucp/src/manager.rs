//! Peer connection managers
//!
//! Generic repository of live peer connections (DUs, CU-UPs) with admission
//! control. Every admitted connection owns a dedicated [`TaskExecutor`] and
//! a per-UE [`UeTaskScheduler`], so all work for one peer runs on that
//! peer's own executor.
//!
//! `stop()` is synchronous from the caller's point of view: it drains every
//! connection's scheduler and executor queue before removing the entries,
//! bridging the asynchronous draining back to the blocking caller with
//! [`ManualEvent::wait_blocking`].

use std::collections::HashMap;
use std::sync::Mutex;

use gnbcu_common::config::DispatchRetryConfig;
use gnbcu_common::{ConnectionIndex, CuUpIndex, DuIndex};
use tracing::{debug, error, info};

use crate::async_task::ManualEvent;
use crate::executor::TaskExecutor;
use crate::scheduler::{TaskScheduler, UeTaskScheduler};

/// Request to admit a new peer connection.
#[derive(Debug, Clone)]
pub struct ConnectionRequest {
    /// Peer-provided display name, used in logs and executor names.
    pub name: String,
}

/// Lifecycle state of an admitted connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ConnectionState {
    Active,
    Stopping,
}

struct PeerConnection {
    name: String,
    exec: TaskExecutor,
    sched: UeTaskScheduler,
    state: ConnectionState,
}

struct ManagerState<I> {
    next_raw: u32,
    connections: HashMap<I, PeerConnection>,
    stopped: bool,
}

/// Admission-limited repository of peer connections.
pub struct PeerConnectionManager<I> {
    label: &'static str,
    max_connections: usize,
    queue_size: usize,
    retry: DispatchRetryConfig,
    state: Mutex<ManagerState<I>>,
}

/// Manager for DU peer connections.
pub type DuConnectionManager = PeerConnectionManager<DuIndex>;
/// Manager for CU-UP peer connections.
pub type CuUpConnectionManager = PeerConnectionManager<CuUpIndex>;

impl<I: ConnectionIndex> PeerConnectionManager<I> {
    /// Creates an empty manager.
    ///
    /// `label` names the peer class in logs ("du", "cu-up"); `queue_size`
    /// is the work queue capacity of each connection's executor.
    pub fn new(
        label: &'static str,
        max_connections: usize,
        queue_size: usize,
        retry: DispatchRetryConfig,
    ) -> Self {
        Self {
            label,
            max_connections,
            queue_size,
            retry,
            state: Mutex::new(ManagerState {
                next_raw: 0,
                connections: HashMap::new(),
                stopped: false,
            }),
        }
    }

    /// Admits a new peer connection.
    ///
    /// Returns `None`, with no side effects, when the manager is at capacity
    /// or already stopped. Must be called from within a tokio runtime
    /// context (each connection spawns its own executor).
    pub fn add(&self, request: ConnectionRequest) -> Option<I> {
        let mut state = self.state.lock().unwrap();
        if state.stopped {
            debug!(peer = self.label, "rejecting connection: manager stopped");
            return None;
        }
        if state.connections.len() >= self.max_connections {
            debug!(
                peer = self.label,
                max = self.max_connections,
                "rejecting connection: admission limit reached"
            );
            return None;
        }

        let raw = state.next_raw;
        state.next_raw += 1;
        let index = I::from_raw(raw);

        let exec = TaskExecutor::new(format!("{}-{}", self.label, raw), self.queue_size);
        let sched = TaskScheduler::new(exec.clone());
        state.connections.insert(
            index,
            PeerConnection {
                name: request.name.clone(),
                exec,
                sched,
                state: ConnectionState::Active,
            },
        );
        info!(peer = self.label, %index, name = %request.name, "peer connection admitted");
        Some(index)
    }

    /// Removes a connection. Returns `false` if the index is unknown.
    pub fn remove(&self, index: I) -> bool {
        let removed = self.state.lock().unwrap().connections.remove(&index);
        match removed {
            Some(conn) => {
                conn.exec.stop();
                info!(peer = self.label, %index, name = %conn.name, "peer connection removed");
                true
            }
            None => {
                debug!(peer = self.label, %index, "remove: unknown connection index");
                false
            }
        }
    }

    /// Number of currently admitted connections.
    pub fn count(&self) -> usize {
        self.state.lock().unwrap().connections.len()
    }

    /// Returns the per-UE task scheduler of a connection.
    pub fn scheduler(&self, index: I) -> Option<UeTaskScheduler> {
        self.state
            .lock()
            .unwrap()
            .connections
            .get(&index)
            .map(|c| c.sched.clone())
    }

    /// Returns the executor of a connection.
    pub fn executor(&self, index: I) -> Option<TaskExecutor> {
        self.state
            .lock()
            .unwrap()
            .connections
            .get(&index)
            .map(|c| c.exec.clone())
    }

    /// Stops every connection and empties the repository.
    ///
    /// Blocking and idempotent. In-flight procedures already scheduled for a
    /// connection's UEs are allowed to finish; the call returns only after
    /// every connection's scheduler and executor queue has drained.
    pub fn stop(&self) {
        let draining = {
            let mut state = self.state.lock().unwrap();
            if state.stopped {
                return;
            }
            state.stopped = true;
            state
                .connections
                .iter_mut()
                .map(|(index, conn)| {
                    conn.state = ConnectionState::Stopping;
                    (*index, conn.exec.clone(), conn.sched.clone())
                })
                .collect::<Vec<_>>()
        };

        for (index, exec, sched) in draining {
            // Let in-flight and queued procedures for this peer finish.
            sched.drain_event().wait_blocking();

            // Fence: everything dispatched before this point has run.
            let fence = ManualEvent::<()>::new();
            let f = fence.clone();
            match exec.dispatch_with_retry(&self.retry, move || f.set(())) {
                Ok(()) => fence.wait_blocking(),
                Err(err) => {
                    error!(peer = self.label, %index, %err, "failed to fence executor during stop");
                }
            }
            exec.stop();
            debug!(peer = self.label, %index, "peer connection drained");
        }

        self.state.lock().unwrap().connections.clear();
        info!(peer = self.label, "all peer connections stopped");
    }
}

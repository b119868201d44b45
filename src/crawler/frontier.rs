//! Crawl frontier
//!
//! A FIFO work queue of typed tasks shared by the fetch workers, plus the
//! in-flight accounting that decides when the crawl is over: the crawl
//! terminates exactly when the queue is empty and no task is executing.
//! Rate-limit retries are pushed to the queue front so the offending task is
//! the first dispatched after a pause.

use crate::crawler::gate::DispatchGate;
use crate::crawler::task::QueuedTask;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::Notify;

#[derive(Debug)]
pub struct Frontier {
    queue: Mutex<VecDeque<QueuedTask>>,
    in_flight: AtomicUsize,
    notify: Notify,
    gate: DispatchGate,
    pause_active: AtomicBool,
}

impl Default for Frontier {
    fn default() -> Self {
        Self::new()
    }
}

impl Frontier {
    pub fn new() -> Self {
        Self {
            queue: Mutex::new(VecDeque::new()),
            in_flight: AtomicUsize::new(0),
            notify: Notify::new(),
            gate: DispatchGate::new(),
            pause_active: AtomicBool::new(false),
        }
    }

    /// Enqueues a task at the back of the queue
    pub fn push(&self, task: QueuedTask) {
        self.queue.lock().unwrap().push_back(task);
        self.notify.notify_waiters();
    }

    /// Enqueues a task at the front of the queue
    ///
    /// Used for the rate-limited retry, which must be the first task
    /// dispatched once the pause ends.
    pub fn push_front(&self, task: QueuedTask) {
        self.queue.lock().unwrap().push_front(task);
        self.notify.notify_waiters();
    }

    /// Pulls the next task, waiting for the gate and for work
    ///
    /// Returns `None` when the queue is empty and nothing is in flight —
    /// the crawl is complete. The returned task counts as in flight until
    /// the caller invokes [`complete`](Self::complete).
    pub async fn next(&self) -> Option<QueuedTask> {
        loop {
            self.gate.wait_open().await;

            let notified = self.notify.notified();

            {
                let mut queue = self.queue.lock().unwrap();
                if let Some(task) = queue.pop_front() {
                    self.in_flight.fetch_add(1, Ordering::SeqCst);
                    return Some(task);
                }

                // Checked under the queue lock: a sibling that is about to
                // push children still counts as in flight here, so an empty
                // queue with zero in flight really is the end of the crawl
                if self.in_flight.load(Ordering::SeqCst) == 0 {
                    return None;
                }
            }

            notified.await;
        }
    }

    /// Marks a dispatched task as finished
    ///
    /// Must be called exactly once per task returned by [`next`](Self::next),
    /// after any child tasks have been pushed.
    pub fn complete(&self) {
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        self.notify.notify_waiters();
    }

    /// Pauses dispatch for the given duration
    ///
    /// Scheduler-wide: no worker dispatches new work until the cool-down
    /// elapses. Overlapping pause requests collapse into the active one
    /// rather than stacking.
    pub fn pause_for(self: Arc<Self>, cooldown: Duration) {
        if self.pause_active.swap(true, Ordering::SeqCst) {
            return;
        }

        self.gate.close();
        tracing::warn!("Rate limited; pausing dispatch for {:?}", cooldown);

        tokio::spawn(async move {
            tokio::time::sleep(cooldown).await;
            self.pause_active.store(false, Ordering::SeqCst);
            self.gate.open();
            tracing::info!("Dispatch resumed after rate-limit pause");
        });
    }

    pub fn is_paused(&self) -> bool {
        !self.gate.is_open()
    }

    /// Number of queued (not yet dispatched) tasks
    pub fn len(&self) -> usize {
        self.queue.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.lock().unwrap().is_empty()
    }

    pub fn in_flight(&self) -> usize {
        self.in_flight.load(Ordering::SeqCst)
    }
}

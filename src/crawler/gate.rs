//! Dispatch gate
//!
//! A rate-limit signal pauses the whole scheduler, not just the offending
//! branch. The gate models that as a shared "dispatch allowed" flag that
//! workers check before pulling work: while it is closed no new task is
//! dispatched, but in-flight fetches run to completion, so unrelated
//! branches are not starved by a sleeping worker.

use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::Notify;

#[derive(Debug)]
pub struct DispatchGate {
    open: AtomicBool,
    notify: Notify,
}

impl Default for DispatchGate {
    fn default() -> Self {
        Self::new()
    }
}

impl DispatchGate {
    pub fn new() -> Self {
        Self {
            open: AtomicBool::new(true),
            notify: Notify::new(),
        }
    }

    pub fn is_open(&self) -> bool {
        self.open.load(Ordering::SeqCst)
    }

    /// Stops dispatch of new tasks
    pub fn close(&self) {
        self.open.store(false, Ordering::SeqCst);
    }

    /// Resumes dispatch and wakes all waiting workers
    pub fn open(&self) {
        self.open.store(true, Ordering::SeqCst);
        self.notify.notify_waiters();
    }

    /// Waits until the gate is open
    pub async fn wait_open(&self) {
        loop {
            // Register interest before checking, so an open() between the
            // check and the await cannot be missed
            let notified = self.notify.notified();
            if self.is_open() {
                return;
            }
            notified.await;
        }
    }
}

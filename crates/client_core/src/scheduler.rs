//! Delayed UI callbacks that can be cancelled before they fire.

use std::time::Duration;

use tokio::{runtime::Handle, task::JoinHandle};
use tracing::debug;

/// Handle to a callback scheduled on the tokio runtime. Dropping the handle
/// cancels the callback if it has not run yet.
///
/// Delays run on the current tokio runtime. Without one the
/// callback runs immediately instead of after the delay.
#[derive(Debug)]
pub struct ScheduledTask {
    handle: Option<JoinHandle<()>>,
}

impl ScheduledTask {
    pub fn after<F>(delay: Duration, callback: F) -> Self
    where
        F: FnOnce() + Send + 'static,
    {
        let Ok(runtime) = Handle::try_current() else {
            debug!(?delay, "no tokio runtime; running delayed callback now");
            callback();
            return Self { handle: None };
        };
        let handle = runtime.spawn(async move {
            tokio::time::sleep(delay).await;
            callback();
        });
        Self {
            handle: Some(handle),
        }
    }

    pub fn cancel(self) {
        if let Some(handle) = &self.handle {
            handle.abort();
        }
    }

    pub fn is_finished(&self) -> bool {
        self.handle.as_ref().map_or(true, JoinHandle::is_finished)
    }
}

impl Drop for ScheduledTask {
    fn drop(&mut self) {
        if let Some(handle) = &self.handle {
            handle.abort();
        }
    }
}

/// At most one pending callback; scheduling a new one cancels the previous.
#[derive(Debug, Default)]
pub struct TaskSlot {
    pending: Option<ScheduledTask>,
}

impl TaskSlot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schedule<F>(&mut self, delay: Duration, callback: F)
    where
        F: FnOnce() + Send + 'static,
    {
        self.replace(ScheduledTask::after(delay, callback));
    }

    pub fn replace(&mut self, task: ScheduledTask) {
        if let Some(previous) = self.pending.replace(task) {
            previous.cancel();
        }
    }

    pub fn cancel(&mut self) {
        if let Some(previous) = self.pending.take() {
            previous.cancel();
        }
    }

    pub fn is_pending(&self) -> bool {
        self.pending
            .as_ref()
            .is_some_and(|task| !task.is_finished())
    }
}

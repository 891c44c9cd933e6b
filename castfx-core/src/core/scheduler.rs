use fx_handle::Handle;
use log::{debug, trace};
use std::time::Duration;
use tokio::select;
use tokio::sync::mpsc::UnboundedSender;
use tokio::time;
use tokio_util::sync::CancellationToken;

/// The unique handle of a scheduled timer.
pub type TimerHandle = Handle;

/// A single-slot delayed task which delivers a command to an actor after a delay.
///
/// At most one timer is armed at a time, scheduling a new timer cancels the previous one.
/// The delivered command carries the [TimerHandle] of the timer so the receiving actor can
/// verify that the timer is still the current one through [DelayedTask::expire].
#[derive(Debug)]
pub struct DelayedTask {
    name: &'static str,
    armed: Option<ArmedTimer>,
}

#[derive(Debug)]
struct ArmedTimer {
    handle: TimerHandle,
    cancellation_token: CancellationToken,
}

impl DelayedTask {
    /// Create a new delayed task with the given name.
    /// The name is only used for logging purposes.
    pub fn new(name: &'static str) -> Self {
        Self { name, armed: None }
    }

    /// Schedule a new timer which sends the created command to the given sender once the delay has elapsed.
    /// Any previously armed timer of this task is cancelled.
    ///
    /// # Arguments
    ///
    /// * `delay` - The delay after which the command is delivered.
    /// * `sender` - The sender to deliver the command to.
    /// * `command` - The factory which creates the command for the new timer handle.
    ///
    /// # Returns
    ///
    /// It returns the handle of the new timer.
    pub fn schedule<T, F>(
        &mut self,
        delay: Duration,
        sender: &UnboundedSender<T>,
        command: F,
    ) -> TimerHandle
    where
        T: Send + 'static,
        F: FnOnce(TimerHandle) -> T,
    {
        self.cancel();

        let handle = TimerHandle::new();
        let cancellation_token = CancellationToken::new();
        let message = command(handle);
        let sender = sender.clone();
        let token = cancellation_token.clone();
        let name = self.name;

        trace!("Scheduling {} timer {} in {:?}", name, handle, delay);
        tokio::spawn(async move {
            select! {
                _ = token.cancelled() => trace!("Timer {} {} has been cancelled", name, handle),
                _ = time::sleep(delay) => {
                    if let Err(e) = sender.send(message) {
                        debug!("Timer {} {} failed to deliver command, {}", name, handle, e);
                    }
                }
            }
        });

        self.armed = Some(ArmedTimer {
            handle,
            cancellation_token,
        });
        handle
    }

    /// Cancel the armed timer of this task, if any.
    pub fn cancel(&mut self) {
        if let Some(timer) = self.armed.take() {
            trace!("Cancelling {} timer {}", self.name, timer.handle);
            timer.cancellation_token.cancel();
        }
    }

    /// Check if a timer is currently armed.
    pub fn is_armed(&self) -> bool {
        self.armed.is_some()
    }

    /// Check if the given handle is the currently armed timer.
    pub fn is_current(&self, handle: &TimerHandle) -> bool {
        self.armed
            .as_ref()
            .map(|e| e.handle == *handle)
            .unwrap_or(false)
    }

    /// Mark the timer of the given handle as expired.
    ///
    /// # Returns
    ///
    /// It returns `true` when the handle was the armed timer, else `false` if the timer is stale.
    pub fn expire(&mut self, handle: &TimerHandle) -> bool {
        if self.is_current(handle) {
            self.armed = None;
            true
        } else {
            trace!("Ignoring stale {} timer {}", self.name, handle);
            false
        }
    }
}

impl Drop for DelayedTask {
    fn drop(&mut self) {
        self.cancel();
    }
}

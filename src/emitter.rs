//! Channel handle through which deferred commands report their actions.

use flume::Sender;
use tracing::debug;

/// Sending half of a runtime's deferred-action queue.
///
/// Deferred continuations own a clone and may resolve on any thread. Actions
/// are only dispatched when the host pumps the queue with
/// [`ComponentRuntime::process_events`](crate::ComponentRuntime::process_events)
/// or [`ComponentRuntime::run`](crate::ComponentRuntime::run).
pub struct Emitter<Action: Send>(pub(crate) Sender<Action>);

impl<Action: Send> Clone for Emitter<Action> {
    fn clone(&self) -> Self {
        Self(self.0.clone())
    }
}

impl<Action: Send> Emitter<Action> {
    pub(crate) fn new(sender: Sender<Action>) -> Self {
        Self(sender)
    }

    /// Queue an action for dispatch.
    ///
    /// Returns `false` when the owning runtime has been dropped; the action is
    /// discarded in that case.
    pub fn emit(&self, action: Action) -> bool {
        match self.0.send(action) {
            Ok(()) => true,
            Err(_) => {
                debug!("dropping deferred action: runtime no longer alive");
                false
            }
        }
    }
}

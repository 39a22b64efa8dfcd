//! Transition request channel.
//!
//! Collaborators that want to change area hold a [`TransitionRequester`]
//! handed out by the controller at startup. Requests are queued in arrival
//! order and drained by the controller at the start of its next tick.

use crossbeam_channel::{bounded, Receiver, Sender, TrySendError};
use tracing::debug;

/// Default request channel capacity.
pub const DEFAULT_REQUEST_CAPACITY: usize = 64;

/// Cloneable handle for asking the controller to change area.
#[derive(Debug, Clone)]
pub struct TransitionRequester {
    sender: Sender<String>,
}

impl TransitionRequester {
    /// Queues a transition request.
    ///
    /// Returns `false` if the request could not be queued (channel full or
    /// controller dropped). A queued request may still be discarded later if
    /// a transition is in flight when it is drained.
    pub fn request(&self, area: impl Into<String>) -> bool {
        match self.sender.try_send(area.into()) {
            Ok(()) => true,
            Err(TrySendError::Full(area)) => {
                debug!(area = %area, "Transition request channel full, request dropped");
                false
            },
            Err(TrySendError::Disconnected(area)) => {
                debug!(area = %area, "Controller gone, request dropped");
                false
            },
        }
    }
}

/// Receiving end owned by the controller.
#[derive(Debug)]
pub(crate) struct RequestQueue {
    sender: Sender<String>,
    receiver: Receiver<String>,
}

impl RequestQueue {
    pub(crate) fn new(capacity: usize) -> Self {
        let (sender, receiver) = bounded(capacity.max(1));
        Self { sender, receiver }
    }

    pub(crate) fn requester(&self) -> TransitionRequester {
        TransitionRequester {
            sender: self.sender.clone(),
        }
    }

    /// Drains all pending requests in arrival order.
    pub(crate) fn drain(&self) -> Vec<String> {
        self.receiver.try_iter().collect()
    }

    pub(crate) fn pending_count(&self) -> usize {
        self.receiver.len()
    }
}

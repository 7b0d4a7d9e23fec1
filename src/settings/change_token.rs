//! One-shot change notification
//!
//! A [`ChangeNotifier`] hands out [`ChangeToken`]s. Calling
//! [`ChangeNotifier::notify`] fires every token issued so far; tokens taken
//! afterwards wait for the next notification. Firing is a broadcast: the
//! notifier drops the only sender of the current channel, so every clone of
//! every outstanding token observes the disconnect.

use crossbeam_channel::{unbounded, Receiver, Sender, TryRecvError};
use parking_lot::Mutex;

#[derive(Debug)]
pub struct ChangeNotifier {
    current: Mutex<(Sender<()>, Receiver<()>)>,
}

impl ChangeNotifier {
    pub fn new() -> Self {
        Self {
            current: Mutex::new(unbounded()),
        }
    }

    /// Token that fires on the next [`notify`](Self::notify).
    pub fn token(&self) -> ChangeToken {
        ChangeToken {
            receiver: self.current.lock().1.clone(),
        }
    }

    /// Fire all outstanding tokens.
    pub fn notify(&self) {
        // Replacing the pair drops the old sender
        *self.current.lock() = unbounded();
    }
}

impl Default for ChangeNotifier {
    fn default() -> Self {
        Self::new()
    }
}

/// Handle that becomes signalled once its notifier fires.
///
/// Dropping the notifier also fires its outstanding tokens.
#[derive(Debug, Clone)]
pub struct ChangeToken {
    receiver: Receiver<()>,
}

impl ChangeToken {
    pub fn has_changed(&self) -> bool {
        matches!(self.receiver.try_recv(), Err(TryRecvError::Disconnected))
    }

    /// Block until the token fires.
    pub fn wait(&self) {
        while self.receiver.recv().is_ok() {}
    }

    /// Channel that disconnects when the token fires, for use in `select!`.
    pub fn receiver(&self) -> &Receiver<()> {
        &self.receiver
    }
}

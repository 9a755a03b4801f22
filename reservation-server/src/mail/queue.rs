//! Bounded mail queue
//!
//! Request handlers enqueue and return immediately. A full or closed queue
//! drops the message with a warning.

use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;

use super::messages::MailMessage;

#[derive(Debug, Clone)]
pub struct MailQueue {
    tx: mpsc::Sender<MailMessage>,
}

impl MailQueue {
    /// Create the queue and the receiver the worker drains.
    pub fn channel(capacity: usize) -> (Self, mpsc::Receiver<MailMessage>) {
        let (tx, rx) = mpsc::channel(capacity.max(1));
        (Self { tx }, rx)
    }

    /// Returns whether the message was queued.
    pub fn enqueue(&self, message: MailMessage) -> bool {
        match self.tx.try_send(message) {
            Ok(()) => true,
            Err(TrySendError::Full(message)) => {
                tracing::warn!(to = %message.to, kind = %message.kind, "Mail queue full, message dropped");
                false
            }
            Err(TrySendError::Closed(message)) => {
                tracing::warn!(to = %message.to, kind = %message.kind, "Mail worker stopped, message dropped");
                false
            }
        }
    }
}

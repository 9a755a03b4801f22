//! Mail worker
//!
//! Drains the queue one message at a time. A failed send is logged and the
//! message is dropped; there is no retry.

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use super::mailer::Mailer;
use super::messages::MailMessage;

pub struct MailWorker {
    mailer: Arc<dyn Mailer>,
}

impl MailWorker {
    pub fn new(mailer: Arc<dyn Mailer>) -> Self {
        Self { mailer }
    }

    pub async fn run(self, mut rx: mpsc::Receiver<MailMessage>, shutdown: CancellationToken) {
        tracing::info!("Mail worker started");
        loop {
            tokio::select! {
                _ = shutdown.cancelled() => {
                    tracing::info!("Mail worker received shutdown signal");
                    break;
                }
                message = rx.recv() => {
                    let Some(message) = message else {
                        tracing::info!("Mail queue closed");
                        break;
                    };
                    self.deliver(&message).await;
                }
            }
        }
        tracing::info!("Mail worker stopped");
    }

    /// Send one message. Returns whether it was delivered.
    pub async fn deliver(&self, message: &MailMessage) -> bool {
        match self.mailer.send(message).await {
            Ok(()) => {
                tracing::debug!(to = %message.to, kind = %message.kind, "Mail sent");
                true
            }
            Err(e) => {
                tracing::error!(to = %message.to, kind = %message.kind, error = %e, "Mail delivery failed");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mail::mailer::MailError;
    use crate::mail::messages::MailKind;
    use crate::mail::queue::MailQueue;
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Records recipients, fails for addresses at `fail.example`
    #[derive(Default)]
    struct RecordingMailer {
        sent: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl Mailer for RecordingMailer {
        async fn send(&self, message: &MailMessage) -> Result<(), MailError> {
            if message.to.ends_with("@fail.example") {
                return Err(MailError::Transport("connection refused".into()));
            }
            self.sent.lock().unwrap().push(message.to.clone());
            Ok(())
        }
    }

    fn message(to: &str) -> MailMessage {
        MailMessage {
            to: to.into(),
            subject: "Reservation confirmed".into(),
            body: "See you soon".into(),
            kind: MailKind::BookingConfirmation,
        }
    }

    #[tokio::test]
    async fn test_failure_does_not_stop_the_worker() {
        let mailer = Arc::new(RecordingMailer::default());
        let (queue, rx) = MailQueue::channel(8);
        queue.enqueue(message("a@example.com"));
        queue.enqueue(message("b@fail.example"));
        queue.enqueue(message("c@example.com"));
        drop(queue);

        MailWorker::new(mailer.clone())
            .run(rx, CancellationToken::new())
            .await;

        assert_eq!(
            *mailer.sent.lock().unwrap(),
            vec!["a@example.com".to_string(), "c@example.com".to_string()]
        );
    }

    #[tokio::test]
    async fn test_deliver_reports_outcome() {
        let worker = MailWorker::new(Arc::new(RecordingMailer::default()));
        assert!(worker.deliver(&message("a@example.com")).await);
        assert!(!worker.deliver(&message("x@fail.example")).await);
    }

    #[tokio::test]
    async fn test_stops_on_shutdown() {
        let (_queue, rx) = MailQueue::channel(8);
        let shutdown = CancellationToken::new();
        shutdown.cancel();
        MailWorker::new(Arc::new(RecordingMailer::default()))
            .run(rx, shutdown)
            .await;
    }
}

//! Server state shared by every handler

use std::path::Path;
use std::sync::{Arc, Mutex};

use tokio::sync::mpsc;

use crate::core::tasks::{BackgroundTasks, TaskKind};
use crate::core::{Config, Result};
use crate::db::DbService;
use crate::mail::{LogMailer, MailMessage, MailQueue, MailWorker, Mailer, SmtpMailer};
use crate::services::{BookingExpiryScheduler, BookingService};

/// Server state, cheap to clone
///
/// | Field | Description |
/// |-------|-------------|
/// | config | Server configuration |
/// | db | SQLite pool |
/// | bookings | Booking transaction and mails |
/// | mail | Queue feeding the mail worker |
#[derive(Clone)]
pub struct ServerState {
    pub config: Config,
    pub db: DbService,
    pub bookings: BookingService,
    pub mail: MailQueue,
    mailer: Arc<dyn Mailer>,
    /// Taken once by `start_background_tasks`
    mail_rx: Arc<Mutex<Option<mpsc::Receiver<MailMessage>>>>,
}

impl ServerState {
    /// Assemble the state from already opened parts.
    pub fn new(config: Config, db: DbService, mailer: Arc<dyn Mailer>) -> Self {
        let (mail, mail_rx) = MailQueue::channel(config.mail_queue_capacity);
        let bookings = BookingService::new(db.clone(), mail.clone());
        Self {
            config,
            db,
            bookings,
            mail,
            mailer,
            mail_rx: Arc::new(Mutex::new(Some(mail_rx))),
        }
    }

    /// Create the work directory, open the database and pick a mailer.
    pub async fn initialize(config: &Config) -> Result<Self> {
        std::fs::create_dir_all(&config.work_dir)?;
        if let Some(parent) = Path::new(&config.database_path).parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }

        let db = DbService::new(&config.database_path).await?;

        let mailer: Arc<dyn Mailer> = match &config.smtp {
            Some(smtp) => {
                tracing::info!(host = %smtp.host, port = smtp.port, "Mail via SMTP relay");
                Arc::new(SmtpMailer::new(smtp, &config.mail_from)?)
            }
            None => {
                if config.is_production() {
                    tracing::warn!("SMTP_HOST not set in production, booking mails are only logged");
                }
                Arc::new(LogMailer)
            }
        };

        Ok(Self::new(config.clone(), db, mailer))
    }

    /// Start the mail worker and the expiry scheduler.
    ///
    /// The mail worker can only be started once per state; later calls only
    /// start another expiry scheduler.
    pub fn start_background_tasks(&self) -> BackgroundTasks {
        let mut tasks = BackgroundTasks::new();

        let mail_rx = self.mail_rx.lock().ok().and_then(|mut rx| rx.take());
        match mail_rx {
            Some(rx) => {
                let worker = MailWorker::new(self.mailer.clone());
                let shutdown = tasks.shutdown_token();
                tasks.spawn("mail_worker", TaskKind::Worker, worker.run(rx, shutdown));
            }
            None => tracing::warn!("Mail worker already started"),
        }

        let scheduler = BookingExpiryScheduler::new(
            self.bookings.clone(),
            self.config.booking_expiry_interval(),
            tasks.shutdown_token(),
        );
        tasks.spawn("booking_expiry", TaskKind::Periodic, scheduler.run());

        tasks.log_summary();
        tasks
    }
}

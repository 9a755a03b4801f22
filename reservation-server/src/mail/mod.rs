//! Booking mail
//!
//! Handlers push [`MailMessage`]s onto the [`MailQueue`]; the [`MailWorker`]
//! hands them to a [`Mailer`] in the background.

pub mod mailer;
pub mod messages;
pub mod queue;
pub mod worker;

pub use mailer::{LogMailer, MailError, Mailer, SmtpMailer};
pub use messages::{MailKind, MailMessage};
pub use queue::MailQueue;
pub use worker::MailWorker;

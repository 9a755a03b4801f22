//! Outgoing mail content (plain text)

use serde::Serialize;
use shared::models::{Booking, Schedule};

/// What a message is about, used for logging
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MailKind {
    BookingConfirmation,
    BookingCompletion,
}

impl std::fmt::Display for MailKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MailKind::BookingConfirmation => write!(f, "booking_confirmation"),
            MailKind::BookingCompletion => write!(f, "booking_completion"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct MailMessage {
    pub to: String,
    pub subject: String,
    pub body: String,
    pub kind: MailKind,
}

/// Sent once the booking transaction has committed.
pub fn booking_confirmation(booking: &Booking, schedule: &Schedule, restaurant_name: &str) -> MailMessage {
    let body = format!(
        "Hello {name},\n\n\
         Your table at {restaurant_name} is reserved.\n\n\
         Booking number: {no}\n\
         Date: {date}\n\
         Time: {time}\n\
         Party size: {pax}\n\n\
         Please show your booking number when you arrive.\n",
        name = booking.contact_name,
        no = booking.booking_no,
        date = schedule.date,
        time = schedule.start_time,
        pax = booking.pax,
    );
    MailMessage {
        to: booking.contact_email.clone(),
        subject: format!("Reservation confirmed: {}", booking.booking_no),
        body,
        kind: MailKind::BookingConfirmation,
    }
}

pub fn booking_completion(booking: &Booking) -> MailMessage {
    let body = format!(
        "Hello {name},\n\n\
         Thank you for dining with us. Booking {no} is now complete.\n",
        name = booking.contact_name,
        no = booking.booking_no,
    );
    MailMessage {
        to: booking.contact_email.clone(),
        subject: format!("Thank you for your visit: {}", booking.booking_no),
        body,
        kind: MailKind::BookingCompletion,
    }
}

//! Services
//!
//! - [`BookingService`] - booking transaction plus confirmation mails
//! - [`BookingExpiryScheduler`] - periodic sweep of overdue bookings
//! - [`https`] - router assembly

pub mod booking;
pub mod expiry;
pub mod https;

pub use booking::BookingService;
pub use expiry::BookingExpiryScheduler;

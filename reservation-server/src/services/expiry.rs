//! Booking expiry scheduler
//!
//! Registered as `TaskKind::Periodic`. Sweeps pending bookings whose slot
//! has started and marks them `EXPIRED`.

use std::time::Duration;

use tokio_util::sync::CancellationToken;

use super::booking::BookingService;

pub struct BookingExpiryScheduler {
    bookings: BookingService,
    interval: Duration,
    shutdown: CancellationToken,
}

impl BookingExpiryScheduler {
    pub fn new(bookings: BookingService, interval: Duration, shutdown: CancellationToken) -> Self {
        Self {
            bookings,
            interval,
            shutdown,
        }
    }

    /// Sweep once at startup, then every `interval` until shutdown.
    pub async fn run(self) {
        tracing::info!(interval_secs = self.interval.as_secs(), "Booking expiry scheduler started");
        loop {
            if let Err(e) = self.bookings.expire_overdue().await {
                tracing::error!(error = %e, "Booking expiry sweep failed");
            }

            tokio::select! {
                _ = tokio::time::sleep(self.interval) => {}
                _ = self.shutdown.cancelled() => {
                    tracing::info!("Booking expiry scheduler received shutdown signal");
                    break;
                }
            }
        }
        tracing::info!("Booking expiry scheduler stopped");
    }
}

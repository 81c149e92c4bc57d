use std::sync::Arc;
use std::time::Duration;

use nevado_core::{BookingGateway, CoreResult};
use nevado_shared::BookingStatusReport;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollOutcome {
    Confirmed,
    Failed,
    Pending,
}

impl From<BookingStatusReport> for PollOutcome {
    fn from(report: BookingStatusReport) -> Self {
        if report.is_confirmed() {
            PollOutcome::Confirmed
        } else if report.is_failed() {
            PollOutcome::Failed
        } else {
            PollOutcome::Pending
        }
    }
}

/// Server-side payment confirmation, independent of the provider redirect
#[derive(Clone)]
pub struct StatusPoller {
    gateway: Arc<dyn BookingGateway>,
}

impl StatusPoller {
    pub fn new(gateway: Arc<dyn BookingGateway>) -> Self {
        Self { gateway }
    }

    /// One check, as triggered by the "I already paid" action
    pub async fn check(&self, booking_id: &str) -> CoreResult<PollOutcome> {
        let report = self.gateway.booking_status(booking_id).await?;
        let outcome = PollOutcome::from(report);
        tracing::debug!(
            "Booking {} status {:?}/{:?} -> {:?}",
            booking_id,
            report.status,
            report.payment_status,
            outcome
        );
        Ok(outcome)
    }

    /// Check every `interval` until the booking settles or `max_checks` is spent.
    /// Failed checks are logged and the next tick proceeds.
    pub async fn poll_until_settled(&self, booking_id: &str, interval: Duration, max_checks: u32) -> PollOutcome {
        // interval() panics on zero
        let mut ticker = tokio::time::interval(interval.max(Duration::from_millis(1)));
        for attempt in 1..=max_checks {
            ticker.tick().await;
            match self.check(booking_id).await {
                Ok(PollOutcome::Pending) => {}
                Ok(settled) => {
                    tracing::info!("Booking {} settled as {:?} after {} checks", booking_id, settled, attempt);
                    return settled;
                }
                Err(e) => {
                    tracing::warn!("Status check {}/{} for booking {} failed: {}", attempt, max_checks, booking_id, e);
                }
            }
        }
        PollOutcome::Pending
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nevado_core::{CoreError, MockBookingGateway};
    use nevado_shared::{BookingStatus, PaymentState};

    fn report(status: BookingStatus, payment_status: PaymentState) -> BookingStatusReport {
        BookingStatusReport { status, payment_status }
    }

    #[test]
    fn test_outcome_mapping() {
        assert_eq!(
            PollOutcome::from(report(BookingStatus::Confirmed, PaymentState::Approved)),
            PollOutcome::Confirmed
        );
        // Confirmed booking without an approved payment is still pending
        assert_eq!(
            PollOutcome::from(report(BookingStatus::Confirmed, PaymentState::Pending)),
            PollOutcome::Pending
        );
        assert_eq!(
            PollOutcome::from(report(BookingStatus::Pending, PaymentState::Rejected)),
            PollOutcome::Failed
        );
        assert_eq!(
            PollOutcome::from(report(BookingStatus::Cancelled, PaymentState::Pending)),
            PollOutcome::Failed
        );
    }

    #[tokio::test]
    async fn test_check_surfaces_errors() {
        let gateway = Arc::new(
            MockBookingGateway::new().with_status(Err(CoreError::StatusCheck("Failed to check booking status".to_string()))),
        );
        let poller = StatusPoller::new(gateway);
        assert_eq!(
            poller.check("b1").await,
            Err(CoreError::StatusCheck("Failed to check booking status".to_string()))
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_poll_until_confirmed() {
        let gateway = Arc::new(
            MockBookingGateway::new()
                .with_status(Ok(report(BookingStatus::Pending, PaymentState::Pending)))
                .with_status(Err(CoreError::StatusCheck("Failed to check booking status".to_string())))
                .with_status(Ok(report(BookingStatus::Confirmed, PaymentState::Approved))),
        );
        let poller = StatusPoller::new(gateway.clone());

        let outcome = poller.poll_until_settled("b1", Duration::from_secs(5), 10).await;
        assert_eq!(outcome, PollOutcome::Confirmed);
        assert_eq!(gateway.status_calls(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_poll_gives_up_when_budget_spent() {
        let gateway = Arc::new(
            MockBookingGateway::new().with_status(Ok(report(BookingStatus::Pending, PaymentState::Pending))),
        );
        let poller = StatusPoller::new(gateway.clone());

        let outcome = poller.poll_until_settled("b1", Duration::from_secs(5), 4).await;
        assert_eq!(outcome, PollOutcome::Pending);
        assert_eq!(gateway.status_calls(), 4);
    }
}

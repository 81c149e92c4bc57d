use nevado_core::{
    BookingGateway, CoreError, CoreResult, PaymentWidget, PaymentWidgetConfig, ResumeSlot, WidgetHandle,
};
use nevado_shared::{PaymentSession, ResumeState};

use crate::resolver::safe_return_path;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HandoffState {
    Idle,
    Loading,
    Ready(PaymentSession),
    Error(String),
}

impl HandoffState {
    fn name(&self) -> &'static str {
        match self {
            HandoffState::Idle => "IDLE",
            HandoffState::Loading => "LOADING",
            HandoffState::Ready(_) => "READY",
            HandoffState::Error(_) => "ERROR",
        }
    }
}

/// Turns a created booking into a configured checkout widget.
///
/// Payment initialization runs at most once per explicit call: a failure parks the
/// bridge in `Error` until the user asks again.
pub struct PaymentHandoffBridge {
    resume: ResumeSlot,
    booking_id: Option<String>,
    state: HandoffState,
}

impl PaymentHandoffBridge {
    pub fn new(resume: ResumeSlot) -> Self {
        Self {
            resume,
            booking_id: None,
            state: HandoffState::Idle,
        }
    }

    pub fn state(&self) -> &HandoffState {
        &self.state
    }

    pub fn session(&self) -> Option<&PaymentSession> {
        match &self.state {
            HandoffState::Ready(session) => Some(session),
            _ => None,
        }
    }

    /// Idle/Error -> Loading -> Ready | Error
    pub async fn begin_payment(
        &mut self,
        gateway: &dyn BookingGateway,
        booking_id: &str,
    ) -> CoreResult<PaymentSession> {
        match &self.state {
            HandoffState::Loading => {
                return Err(CoreError::InvalidTransition {
                    from: self.state.name().to_string(),
                    to: "LOADING".to_string(),
                });
            }
            HandoffState::Ready(session) if self.booking_id.as_deref() == Some(booking_id) => {
                return Ok(session.clone());
            }
            _ => {}
        }

        self.booking_id = Some(booking_id.to_string());
        self.state = HandoffState::Loading;
        tracing::info!("Initializing payment for booking {}", booking_id);

        match gateway.init_payment(booking_id).await {
            Ok(session) => {
                tracing::info!(
                    "Payment session {} ready for booking {}",
                    session.payment_reference,
                    booking_id
                );
                self.state = HandoffState::Ready(session.clone());
                Ok(session)
            }
            Err(e) => {
                tracing::warn!("Payment initialization failed for booking {}: {}", booking_id, e);
                self.state = HandoffState::Error(e.to_string());
                Err(e)
            }
        }
    }

    /// Persist where to come back to, then render the checkout widget.
    ///
    /// The resume entry is written before the widget exists so the redirect can never
    /// outrun it.
    pub fn hand_off(&self, widget: &dyn PaymentWidget, return_path: &str) -> CoreResult<WidgetHandle> {
        let HandoffState::Ready(session) = &self.state else {
            return Err(CoreError::InvalidTransition {
                from: self.state.name().to_string(),
                to: "HANDED_OFF".to_string(),
            });
        };

        self.resume.deposit(&ResumeState {
            return_path: safe_return_path(Some(return_path)).to_string(),
        })?;

        let handle = widget.render(&PaymentWidgetConfig::from(session))?;
        tracing::info!("Checkout widget rendered for order {}", handle.order_id);
        Ok(handle)
    }

    pub fn reset(&mut self) {
        self.booking_id = None;
        self.state = HandoffState::Idle;
    }
}

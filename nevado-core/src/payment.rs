use std::sync::{Mutex, PoisonError};

use nevado_shared::PaymentSession;
use serde::{Deserialize, Serialize};

use crate::CoreResult;

/// Everything the external checkout button needs. Values are passed through unmodified.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PaymentWidgetConfig {
    pub api_key: String,
    pub amount: i64,
    pub currency: String,
    pub order_id: String,
    pub integrity_signature: String,
    pub description: String,
    pub redirection_url: String,
}

impl From<&PaymentSession> for PaymentWidgetConfig {
    fn from(session: &PaymentSession) -> Self {
        Self {
            api_key: session.api_key.clone(),
            amount: session.amount,
            currency: session.currency.clone(),
            order_id: session.payment_reference.clone(),
            integrity_signature: session.integrity_signature.clone(),
            description: session.description.clone(),
            redirection_url: session.redirection_url.clone(),
        }
    }
}

/// A rendered checkout widget
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WidgetHandle {
    pub order_id: String,
    pub markup: String,
}

/// Renders the opaque third-party checkout widget
pub trait PaymentWidget: Send + Sync {
    fn render(&self, config: &PaymentWidgetConfig) -> CoreResult<WidgetHandle>;
}

/// Widget that only remembers what it was asked to render
#[derive(Debug, Default)]
pub struct RecordingWidget {
    rendered: Mutex<Vec<PaymentWidgetConfig>>,
}

impl RecordingWidget {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rendered(&self) -> Vec<PaymentWidgetConfig> {
        self.rendered.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }
}

impl PaymentWidget for RecordingWidget {
    fn render(&self, config: &PaymentWidgetConfig) -> CoreResult<WidgetHandle> {
        self.rendered
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(config.clone());
        Ok(WidgetHandle {
            order_id: config.order_id.clone(),
            markup: String::new(),
        })
    }
}

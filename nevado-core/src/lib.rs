pub mod gateway;
pub mod navigation;
pub mod payment;
pub mod storage;

pub use gateway::{BookingGateway, JoinBookingRequest, MockBookingGateway, PrivateBookingRequest};
pub use navigation::{NavigationEvent, Navigator, RecordingNavigator};
pub use payment::{PaymentWidget, PaymentWidgetConfig, RecordingWidget, WidgetHandle};
pub use storage::{KeyValueStore, MemoryStore, ResumeSlot, RESUME_STATE_KEY};

/// Failures surfaced by the booking core. Every variant carries a message meant for the
/// person using the site.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CoreError {
    #[error("Service temporarily unavailable: {0}")]
    TransientNetwork(String),
    #[error("Booking could not be created: {0}")]
    BookingCreation(String),
    #[error("Could not join departure: {0}")]
    Join(String),
    #[error("Payment could not be initialized: {0}")]
    PaymentInit(String),
    #[error("Payment status check failed: {0}")]
    StatusCheck(String),
    #[error("Invalid payment link: {0}")]
    InvalidRedirect(String),
    #[error("Validation failed: {0}")]
    Validation(String),
    #[error("Invalid state transition from {from} to {to}")]
    InvalidTransition { from: String, to: String },
    #[error("Storage error: {0}")]
    Storage(String),
}

pub type CoreResult<T> = Result<T, CoreError>;

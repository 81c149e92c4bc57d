pub mod models;
pub mod pii;

pub use models::{
    BookingPricing, BookingRecord, BookingStatus, BookingStatusReport, CustomerContact,
    Departure, DepartureStatus, Difficulty, Language, LocalizedText, PaymentSession,
    PaymentState, PricingTier, ResumeState, Timestamp, Tour,
};
pub use pii::Masked;

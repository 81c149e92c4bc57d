pub mod booking;
pub mod departure;
pub mod payment;
pub mod tour;

pub use booking::{
    BookingPricing, BookingRecord, BookingStatus, BookingStatusReport, CustomerContact,
    PaymentState,
};
pub use departure::{Departure, DepartureStatus, Timestamp};
pub use payment::{PaymentSession, ResumeState};
pub use tour::{Difficulty, Language, LocalizedText, PricingTier, Tour};

pub mod availability;
pub mod pricing;

pub use availability::{available_slots, upcoming_departures, AvailabilityBadge, DepartureView};
pub use pricing::{
    next_occupant_tier, private_group_tier, tier_for_pax, validate_tiers, PriceQuote, PricingError,
};

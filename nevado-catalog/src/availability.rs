use chrono::{DateTime, Utc};
use nevado_shared::Departure;
use serde::{Deserialize, Serialize};

use crate::pricing::next_occupant_tier;

/// Departures at or below this many free slots are flagged as limited
pub const LIMITED_SLOTS_THRESHOLD: u32 = 4;

/// Remaining capacity according to the (possibly stale) local copy. The server stays
/// authoritative: a booking can still be refused after this reports room.
pub fn available_slots(departure: &Departure) -> u32 {
    departure.available_slots()
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum AvailabilityBadge {
    Open,
    Limited,
}

impl AvailabilityBadge {
    pub fn for_slots(available: u32) -> Self {
        if available <= LIMITED_SLOTS_THRESHOLD {
            AvailabilityBadge::Limited
        } else {
            AvailabilityBadge::Open
        }
    }
}

/// Open departures of `tour_id` scheduled strictly after `now`, earliest first
pub fn upcoming_departures(
    departures: Vec<Departure>,
    tour_id: &str,
    now: DateTime<Utc>,
) -> Vec<Departure> {
    let mut upcoming: Vec<Departure> = departures
        .into_iter()
        .filter(|departure| departure.tour_id == tour_id)
        .filter(|departure| departure.is_open())
        .filter(|departure| departure.starts_at().is_some_and(|date| date > now))
        .collect();

    upcoming.sort_by_key(|departure| departure.date);
    upcoming
}

/// Listing row for a departure
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DepartureView {
    pub departure_id: String,
    pub date: Option<DateTime<Utc>>,
    pub available_slots: u32,
    pub badge: AvailabilityBadge,
    pub next_occupant_price_cop: Option<i64>,
}

impl From<&Departure> for DepartureView {
    fn from(departure: &Departure) -> Self {
        let available = available_slots(departure);
        Self {
            departure_id: departure.departure_id.clone(),
            date: departure.starts_at(),
            available_slots: available,
            badge: AvailabilityBadge::for_slots(available),
            next_occupant_price_cop: next_occupant_tier(&departure.pricing_snapshot, departure.current_pax)
                .map(|tier| tier.price_cop),
        }
    }
}

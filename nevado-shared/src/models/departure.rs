use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::tour::PricingTier;

/// Seconds-since-epoch timestamp with a nanosecond remainder, as the API encodes dates
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
pub struct Timestamp {
    #[serde(rename = "_seconds")]
    pub seconds: i64,
    #[serde(rename = "_nanoseconds", default)]
    pub nanoseconds: u32,
}

impl Timestamp {
    pub fn to_datetime(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.seconds, self.nanoseconds)
    }
}

impl From<DateTime<Utc>> for Timestamp {
    fn from(value: DateTime<Utc>) -> Self {
        Self {
            seconds: value.timestamp(),
            nanoseconds: value.timestamp_subsec_nanos(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum DepartureStatus {
    Open,
    Closed,
    Full,
    Cancelled,
    #[serde(other)]
    Other,
}

/// A scheduled, dated instance of a tour with finite capacity
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Departure {
    pub departure_id: String,
    pub tour_id: String,
    pub date: Timestamp,
    pub max_pax: u32,
    #[serde(default)]
    pub current_pax: u32,
    /// Tiers frozen when the departure was created
    #[serde(default)]
    pub pricing_snapshot: Vec<PricingTier>,
    pub status: DepartureStatus,
}

impl Departure {
    /// Remaining capacity. A stale `current_pax` above `max_pax` reads as zero.
    pub fn available_slots(&self) -> u32 {
        self.max_pax.saturating_sub(self.current_pax)
    }

    pub fn is_open(&self) -> bool {
        self.status == DepartureStatus::Open
    }

    pub fn starts_at(&self) -> Option<DateTime<Utc>> {
        self.date.to_datetime()
    }
}

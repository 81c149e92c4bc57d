use nevado_shared::PricingTier;
use serde::{Deserialize, Serialize};

/// Tier whose `[min_pax, max_pax]` contains `pax`, falling back to the first tier when
/// none does. `None` only for an empty table.
pub fn tier_for_pax(tiers: &[PricingTier], pax: u32) -> Option<&PricingTier> {
    tiers.iter().find(|tier| tier.contains(pax)).or_else(|| tiers.first())
}

/// Private bookings are priced by the size of the requesting group.
pub fn private_group_tier(tiers: &[PricingTier], pax_count: u32) -> Option<&PricingTier> {
    tier_for_pax(tiers, pax_count)
}

/// Joining a public departure is priced one slot ahead of its current occupancy, against
/// the departure's frozen tier snapshot.
///
/// This deliberately differs from [`private_group_tier`]: the group size of the joining
/// party does not enter the lookup. Whether that is intended is an open product question,
/// so the two lookups stay separate.
pub fn next_occupant_tier(snapshot: &[PricingTier], current_pax: u32) -> Option<&PricingTier> {
    tier_for_pax(snapshot, current_pax.saturating_add(1))
}

/// Per-person and total price of a selection
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct PriceQuote {
    pub per_person_cop: i64,
    pub per_person_usd: i64,
    pub pax: u32,
}

impl PriceQuote {
    pub fn new(tier: &PricingTier, pax: u32) -> Self {
        Self {
            per_person_cop: tier.price_cop,
            per_person_usd: tier.price_usd,
            pax,
        }
    }

    pub fn total_cop(&self) -> i64 {
        self.per_person_cop * i64::from(self.pax)
    }

    pub fn total_usd(&self) -> i64 {
        self.per_person_usd * i64::from(self.pax)
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum PricingError {
    #[error("Pricing table is empty")]
    Empty,

    #[error("Tier {index} has min_pax {min} above max_pax {max}")]
    Inverted { index: usize, min: u32, max: u32 },

    #[error("Tier {index} starts at {min} but the previous tier ends at {previous_max}")]
    Overlapping { index: usize, min: u32, previous_max: u32 },
}

/// Tiers must be non-empty, sorted by `min_pax` and non-overlapping.
pub fn validate_tiers(tiers: &[PricingTier]) -> Result<(), PricingError> {
    if tiers.is_empty() {
        return Err(PricingError::Empty);
    }

    let mut previous_max: Option<u32> = None;
    for (index, tier) in tiers.iter().enumerate() {
        if tier.min_pax > tier.max_pax {
            return Err(PricingError::Inverted { index, min: tier.min_pax, max: tier.max_pax });
        }
        if let Some(previous_max) = previous_max {
            if tier.min_pax <= previous_max {
                return Err(PricingError::Overlapping { index, min: tier.min_pax, previous_max });
            }
        }
        previous_max = Some(tier.max_pax);
    }

    Ok(())
}

use chrono::{NaiveDate, Utc};
use nevado_catalog::{next_occupant_tier, private_group_tier, PriceQuote};
use nevado_core::{CoreError, CoreResult, JoinBookingRequest, PrivateBookingRequest};
use nevado_shared::{CustomerContact, Departure, Tour};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BookingMode {
    /// Join an existing group departure
    Public,
    /// Custom date for the requesting party alone
    Private,
}

/// Public and private choices cannot coexist: switching modes drops the other choice.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Target {
    Public { departure_id: Option<String> },
    Private { date: Option<NaiveDate> },
}

/// Request the selection turns into once the traveler details are known
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BookingRequest {
    Private(PrivateBookingRequest),
    Join(JoinBookingRequest),
}

/// In-progress choice of departure or custom date and party size. Pure state, no I/O.
#[derive(Debug, Clone)]
pub struct BookingSelection {
    tour: Tour,
    departures: Vec<Departure>,
    target: Target,
    pax_count: u32,
}

impl BookingSelection {
    pub fn new(tour: Tour, departures: Vec<Departure>) -> Self {
        Self {
            tour,
            departures,
            target: Target::Public { departure_id: None },
            pax_count: 1,
        }
    }

    pub fn tour(&self) -> &Tour {
        &self.tour
    }

    pub fn mode(&self) -> BookingMode {
        match self.target {
            Target::Public { .. } => BookingMode::Public,
            Target::Private { .. } => BookingMode::Private,
        }
    }

    /// Switch tabs without choosing anything yet
    pub fn switch_mode(&mut self, mode: BookingMode) {
        if self.mode() == mode {
            return;
        }
        self.target = match mode {
            BookingMode::Public => Target::Public { departure_id: None },
            BookingMode::Private => Target::Private { date: None },
        };
    }

    /// Departures that still show free slots locally
    pub fn bookable_departures(&self) -> impl Iterator<Item = &Departure> {
        self.departures
            .iter()
            .filter(|departure| departure.is_open() && departure.available_slots() > 0)
    }

    pub fn select_public_departure(&mut self, departure_id: &str) -> CoreResult<()> {
        let departure = self
            .departures
            .iter()
            .find(|departure| departure.departure_id == departure_id)
            .ok_or_else(|| CoreError::Validation(format!("Unknown departure {}", departure_id)))?;

        if !departure.is_open() || departure.available_slots() == 0 {
            return Err(CoreError::Validation(format!(
                "Departure {} has no available slots",
                departure_id
            )));
        }

        self.target = Target::Public { departure_id: Some(departure_id.to_string()) };
        Ok(())
    }

    pub fn select_private_date(&mut self, date: NaiveDate) -> CoreResult<()> {
        let today = Utc::now().date_naive();
        if date <= today {
            return Err(CoreError::Validation(format!("{} is not a future date", date)));
        }
        self.target = Target::Private { date: Some(date) };
        Ok(())
    }

    /// Clamped to at least one traveler
    pub fn set_pax_count(&mut self, pax_count: u32) {
        self.pax_count = pax_count.max(1);
    }

    pub fn pax_count(&self) -> u32 {
        self.pax_count
    }

    pub fn selected_departure(&self) -> Option<&Departure> {
        match &self.target {
            Target::Public { departure_id: Some(id) } => {
                self.departures.iter().find(|departure| &departure.departure_id == id)
            }
            _ => None,
        }
    }

    pub fn custom_date(&self) -> Option<NaiveDate> {
        match self.target {
            Target::Private { date } => date,
            Target::Public { .. } => None,
        }
    }

    /// Per-person price of the current choice.
    ///
    /// Public: the departure's snapshot (or the tour's tiers if the snapshot is empty),
    /// looked up one slot past its current occupancy. Private: the tour's tiers, looked
    /// up by party size. `None` means nothing is chosen or no tier exists at all.
    pub fn current_price(&self) -> Option<PriceQuote> {
        match &self.target {
            Target::Public { departure_id: Some(_) } => {
                let departure = self.selected_departure()?;
                let tiers = if departure.pricing_snapshot.is_empty() {
                    &self.tour.pricing_tiers
                } else {
                    &departure.pricing_snapshot
                };
                next_occupant_tier(tiers, departure.current_pax)
                    .map(|tier| PriceQuote::new(tier, self.pax_count))
            }
            Target::Private { date: Some(_) } => private_group_tier(&self.tour.pricing_tiers, self.pax_count)
                .map(|tier| PriceQuote::new(tier, self.pax_count)),
            _ => None,
        }
    }

    pub fn total_price(&self) -> Option<i64> {
        self.current_price().map(|quote| quote.total_cop())
    }

    /// A target is chosen and it can be priced
    pub fn is_complete(&self) -> bool {
        self.current_price().is_some()
    }

    pub fn to_request(&self, customer: CustomerContact) -> CoreResult<BookingRequest> {
        match &self.target {
            Target::Public { departure_id: Some(departure_id) } => Ok(BookingRequest::Join(JoinBookingRequest {
                departure_id: departure_id.clone(),
                pax: self.pax_count,
                customer,
            })),
            Target::Private { date: Some(date) } => Ok(BookingRequest::Private(PrivateBookingRequest {
                tour_id: self.tour.tour_id.clone(),
                date: *date,
                pax: self.pax_count,
                customer,
            })),
            _ => Err(CoreError::Validation("Select a departure or a date first".to_string())),
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use chrono::{DateTime, Duration};
    use nevado_shared::{DepartureStatus, Difficulty, LocalizedText, Masked, PricingTier, Timestamp};

    pub(crate) fn tiers() -> Vec<PricingTier> {
        vec![
            PricingTier { min_pax: 1, max_pax: 1, price_cop: 1_500_000, price_usd: 375 },
            PricingTier { min_pax: 2, max_pax: 4, price_cop: 1_200_000, price_usd: 300 },
            PricingTier { min_pax: 5, max_pax: 10, price_cop: 1_000_000, price_usd: 250 },
        ]
    }

    pub(crate) fn tour() -> Tour {
        Tour {
            tour_id: "t1".to_string(),
            name: LocalizedText { es: "Nevado del Tolima".to_string(), en: "Tolima".to_string() },
            description: LocalizedText::default(),
            short_description: LocalizedText::default(),
            difficulty: Difficulty::Hard,
            total_days: 4,
            pricing_tiers: tiers(),
            is_active: true,
        }
    }

    pub(crate) fn departure(id: &str, max_pax: u32, current_pax: u32) -> Departure {
        let date: DateTime<Utc> = Utc::now() + Duration::days(20);
        Departure {
            departure_id: id.to_string(),
            tour_id: "t1".to_string(),
            date: Timestamp::from(date),
            max_pax,
            current_pax,
            pricing_snapshot: vec![
                PricingTier { min_pax: 1, max_pax: 3, price_cop: 1_100_000, price_usd: 275 },
                PricingTier { min_pax: 4, max_pax: 10, price_cop: 900_000, price_usd: 225 },
            ],
            status: DepartureStatus::Open,
        }
    }

    pub(crate) fn future_date() -> NaiveDate {
        (Utc::now() + Duration::days(45)).date_naive()
    }

    pub(crate) fn contact() -> CustomerContact {
        CustomerContact {
            name: "Juan".to_string(),
            email: "test@test.com".to_string(),
            phone: Masked("3001234567".to_string()),
            document: Masked("123".to_string()),
        }
    }

    fn selection() -> BookingSelection {
        BookingSelection::new(tour(), vec![departure("d1", 10, 3), departure("full", 6, 6)])
    }

    #[test]
    fn test_public_and_private_choices_are_exclusive() {
        let mut selection = selection();
        selection.select_public_departure("d1").unwrap();
        assert_eq!(selection.mode(), BookingMode::Public);

        selection.select_private_date(future_date()).unwrap();
        assert_eq!(selection.mode(), BookingMode::Private);
        assert!(selection.selected_departure().is_none());
        assert_eq!(selection.custom_date(), Some(future_date()));

        selection.select_public_departure("d1").unwrap();
        assert!(selection.custom_date().is_none());
        assert_eq!(selection.selected_departure().unwrap().departure_id, "d1");
    }

    #[test]
    fn test_switching_mode_clears_choice() {
        let mut selection = selection();
        selection.select_public_departure("d1").unwrap();
        selection.switch_mode(BookingMode::Private);

        assert_eq!(selection.mode(), BookingMode::Private);
        assert!(selection.selected_departure().is_none());
        assert!(!selection.is_complete());

        // Same mode again keeps the choice
        selection.select_private_date(future_date()).unwrap();
        selection.switch_mode(BookingMode::Private);
        assert!(selection.is_complete());
    }

    #[test]
    fn test_sold_out_and_unknown_departures_are_rejected() {
        let mut selection = selection();
        assert!(matches!(selection.select_public_departure("full"), Err(CoreError::Validation(_))));
        assert!(matches!(selection.select_public_departure("nope"), Err(CoreError::Validation(_))));
        assert_eq!(selection.bookable_departures().count(), 1);
    }

    #[test]
    fn test_past_private_date_is_rejected() {
        let mut selection = selection();
        let today = Utc::now().date_naive();
        assert!(selection.select_private_date(today).is_err());
        assert!(selection.custom_date().is_none());
    }

    #[test]
    fn test_pax_count_clamps_to_one() {
        let mut selection = selection();
        selection.set_pax_count(0);
        assert_eq!(selection.pax_count(), 1);
        selection.set_pax_count(3);
        assert_eq!(selection.pax_count(), 3);
    }

    #[test]
    fn test_public_price_uses_snapshot_one_slot_ahead() {
        let mut selection = selection();
        selection.select_public_departure("d1").unwrap();
        selection.set_pax_count(2);

        // 3 travelers already on board, the 4th slot falls in the 4-10 tier
        let quote = selection.current_price().unwrap();
        assert_eq!(quote.per_person_cop, 900_000);
        assert_eq!(selection.total_price(), Some(1_800_000));
    }

    #[test]
    fn test_private_price_uses_tour_tiers_by_party_size() {
        let mut selection = selection();
        selection.select_private_date(future_date()).unwrap();
        assert_eq!(selection.current_price().unwrap().per_person_cop, 1_500_000);

        selection.set_pax_count(3);
        assert_eq!(selection.current_price().unwrap().per_person_cop, 1_200_000);

        // Outside every tier: first tier
        selection.set_pax_count(40);
        assert_eq!(selection.current_price().unwrap().per_person_cop, 1_500_000);
    }

    #[test]
    fn test_unpriced_tour_cannot_complete() {
        let mut bare = tour();
        bare.pricing_tiers.clear();
        let mut selection = BookingSelection::new(bare, vec![]);
        selection.select_private_date(future_date()).unwrap();
        assert!(selection.current_price().is_none());
        assert!(!selection.is_complete());
    }

    #[test]
    fn test_to_request_matches_mode() {
        let mut selection = selection();
        assert!(selection.to_request(contact()).is_err());

        selection.set_pax_count(2);
        selection.select_public_departure("d1").unwrap();
        match selection.to_request(contact()).unwrap() {
            BookingRequest::Join(request) => {
                assert_eq!(request.departure_id, "d1");
                assert_eq!(request.pax, 2);
            }
            other => panic!("expected join, got {:?}", other),
        }

        selection.select_private_date(future_date()).unwrap();
        match selection.to_request(contact()).unwrap() {
            BookingRequest::Private(request) => {
                assert_eq!(request.tour_id, "t1");
                assert_eq!(request.date, future_date());
            }
            other => panic!("expected private, got {:?}", other),
        }
    }
}

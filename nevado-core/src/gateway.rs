use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use chrono::NaiveDate;
use nevado_shared::{BookingRecord, BookingStatusReport, CustomerContact, Departure, PaymentSession, Tour};
use serde::Serialize;

use crate::{CoreError, CoreResult};

/// Body of `POST /bookings/private`
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PrivateBookingRequest {
    pub tour_id: String,
    pub date: NaiveDate,
    pub pax: u32,
    pub customer: CustomerContact,
}

/// Body of `POST /bookings/join`
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct JoinBookingRequest {
    pub departure_id: String,
    pub pax: u32,
    pub customer: CustomerContact,
}

/// Typed access to the external tour/booking/payment API.
///
/// Listing operations fail soft: an empty result means "unknown", never "none". Mutating
/// operations are attempted exactly once per call.
#[async_trait]
pub trait BookingGateway: Send + Sync {
    /// Active tours only
    async fn list_tours(&self) -> Vec<Tour>;

    /// Future, open departures of `tour_id`, earliest first
    async fn departures_for_tour(&self, tour_id: &str) -> Vec<Departure>;

    async fn get_tour(&self, tour_id: &str) -> Option<Tour> {
        self.list_tours().await.into_iter().find(|tour| tour.tour_id == tour_id)
    }

    async fn create_private_booking(&self, request: &PrivateBookingRequest) -> CoreResult<BookingRecord>;

    async fn join_public_departure(&self, request: &JoinBookingRequest) -> CoreResult<BookingRecord>;

    async fn booking_status(&self, booking_id: &str) -> CoreResult<BookingStatusReport>;

    async fn init_payment(&self, booking_id: &str) -> CoreResult<PaymentSession>;
}

#[derive(Debug, Default)]
struct MockState {
    tours: Vec<Tour>,
    departures: Vec<Departure>,
    booking: Option<CoreResult<BookingRecord>>,
    statuses: VecDeque<CoreResult<BookingStatusReport>>,
    payment: Option<CoreResult<PaymentSession>>,
    create_calls: usize,
    join_calls: usize,
    status_calls: usize,
    payment_calls: usize,
    last_private: Option<PrivateBookingRequest>,
    last_join: Option<JoinBookingRequest>,
}

/// Scripted in-memory gateway. Status responses are consumed in order; the last one
/// keeps being returned once the queue is down to a single entry.
#[derive(Debug, Default)]
pub struct MockBookingGateway {
    state: Mutex<MockState>,
}

impl MockBookingGateway {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tours(self, tours: Vec<Tour>) -> Self {
        self.state().tours = tours;
        self
    }

    pub fn with_departures(self, departures: Vec<Departure>) -> Self {
        self.state().departures = departures;
        self
    }

    /// Response for both create and join
    pub fn with_booking(self, result: CoreResult<BookingRecord>) -> Self {
        self.state().booking = Some(result);
        self
    }

    pub fn with_status(self, result: CoreResult<BookingStatusReport>) -> Self {
        self.state().statuses.push_back(result);
        self
    }

    pub fn with_payment(self, result: CoreResult<PaymentSession>) -> Self {
        self.state().payment = Some(result);
        self
    }

    pub fn create_calls(&self) -> usize {
        self.state().create_calls
    }

    pub fn join_calls(&self) -> usize {
        self.state().join_calls
    }

    pub fn status_calls(&self) -> usize {
        self.state().status_calls
    }

    pub fn payment_calls(&self) -> usize {
        self.state().payment_calls
    }

    pub fn last_private_request(&self) -> Option<PrivateBookingRequest> {
        self.state().last_private.clone()
    }

    pub fn last_join_request(&self) -> Option<JoinBookingRequest> {
        self.state().last_join.clone()
    }

    fn state(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl BookingGateway for MockBookingGateway {
    async fn list_tours(&self) -> Vec<Tour> {
        self.state().tours.iter().filter(|tour| tour.is_active).cloned().collect()
    }

    async fn departures_for_tour(&self, tour_id: &str) -> Vec<Departure> {
        self.state()
            .departures
            .iter()
            .filter(|departure| departure.tour_id == tour_id)
            .cloned()
            .collect()
    }

    async fn create_private_booking(&self, request: &PrivateBookingRequest) -> CoreResult<BookingRecord> {
        let mut state = self.state();
        state.create_calls += 1;
        state.last_private = Some(request.clone());
        state
            .booking
            .clone()
            .unwrap_or_else(|| Err(CoreError::BookingCreation("no booking scripted".to_string())))
    }

    async fn join_public_departure(&self, request: &JoinBookingRequest) -> CoreResult<BookingRecord> {
        let mut state = self.state();
        state.join_calls += 1;
        state.last_join = Some(request.clone());
        state
            .booking
            .clone()
            .unwrap_or_else(|| Err(CoreError::Join("no booking scripted".to_string())))
    }

    async fn booking_status(&self, _booking_id: &str) -> CoreResult<BookingStatusReport> {
        let mut state = self.state();
        state.status_calls += 1;
        let next = if state.statuses.len() > 1 {
            state.statuses.pop_front()
        } else {
            state.statuses.front().cloned()
        };
        next.unwrap_or_else(|| Err(CoreError::StatusCheck("no status scripted".to_string())))
    }

    async fn init_payment(&self, _booking_id: &str) -> CoreResult<PaymentSession> {
        let mut state = self.state();
        state.payment_calls += 1;
        state
            .payment
            .clone()
            .unwrap_or_else(|| Err(CoreError::PaymentInit("no payment scripted".to_string())))
    }
}

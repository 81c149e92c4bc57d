use async_trait::async_trait;
use chrono::Utc;
use nevado_catalog::{upcoming_departures, validate_tiers};
use nevado_core::{BookingGateway, CoreError, CoreResult, JoinBookingRequest, PrivateBookingRequest};
use nevado_shared::{BookingRecord, BookingStatusReport, Departure, PaymentSession, PricingTier, Tour};
use reqwest::Url;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tracing::{info, warn};

use crate::app_config::{GatewayConfig, RetryConfig};
use crate::transport::{ApiRequest, RetryingTransport, TransportError};

/// [`BookingGateway`] over the public booking HTTP API
#[derive(Debug, Clone)]
pub struct HttpBookingGateway {
    transport: RetryingTransport,
}

impl HttpBookingGateway {
    pub fn new(gateway: &GatewayConfig, retry: &RetryConfig) -> Result<Self, TransportError> {
        Ok(Self {
            transport: RetryingTransport::new(gateway, retry)?,
        })
    }

    pub fn from_transport(transport: RetryingTransport) -> Self {
        Self { transport }
    }

    /// GET a JSON array. Rows that fail to parse are skipped, not fatal to the list.
    async fn fetch_list<T: DeserializeOwned>(&self, path: &str) -> CoreResult<Vec<T>> {
        let response = self
            .transport
            .send(&ApiRequest::get(path))
            .await
            .map_err(|e| CoreError::TransientNetwork(e.to_string()))?;

        if !response.is_success() {
            return Err(CoreError::TransientNetwork(response.failure_message(path)));
        }

        let rows: Vec<Value> = response
            .json()
            .map_err(|e| CoreError::TransientNetwork(e.to_string()))?;
        let total = rows.len();
        let items: Vec<T> = rows
            .into_iter()
            .enumerate()
            .filter_map(|(index, row)| match serde_json::from_value(row) {
                Ok(item) => Some(item),
                Err(e) => {
                    warn!("Skipping malformed row {} from {}: {}", index, path, e);
                    None
                }
            })
            .collect();
        if items.len() < total {
            warn!("{} of {} rows from {} were skipped", total - items.len(), total, path);
        }
        Ok(items)
    }

    /// Single-shot POST; every failure maps through `to_error`
    async fn submit<B, T>(
        &self,
        path: &str,
        body: &B,
        operation: &str,
        to_error: fn(String) -> CoreError,
    ) -> CoreResult<T>
    where
        B: Serialize + Sync,
        T: DeserializeOwned,
    {
        let request = ApiRequest::post(path, body).map_err(|e| to_error(e.to_string()))?;
        let response = self
            .transport
            .send(&request)
            .await
            .map_err(|e| to_error(e.to_string()))?;

        if !response.is_success() {
            let message = response.failure_message(operation);
            warn!("{} rejected with {}: {}", operation, response.status, message);
            return Err(to_error(message));
        }

        response.json().map_err(|e| to_error(e.to_string()))
    }
}

#[async_trait]
impl BookingGateway for HttpBookingGateway {
    async fn list_tours(&self) -> Vec<Tour> {
        match self.fetch_list::<Tour>("tours").await {
            Ok(tours) => tours
                .into_iter()
                .filter(|tour| tour.is_active)
                .inspect(|tour| {
                    check_tiers("tour", &tour.tour_id, &tour.pricing_tiers);
                })
                .collect(),
            Err(e) => {
                warn!("Error fetching tours, returning empty list: {}", e);
                Vec::new()
            }
        }
    }

    async fn departures_for_tour(&self, tour_id: &str) -> Vec<Departure> {
        match self.fetch_list::<Departure>("departures").await {
            Ok(departures) => {
                let departures = upcoming_departures(departures, tour_id, Utc::now());
                for departure in departures.iter().filter(|d| !d.pricing_snapshot.is_empty()) {
                    check_tiers("departure", &departure.departure_id, &departure.pricing_snapshot);
                }
                departures
            }
            Err(e) => {
                warn!("Error fetching departures for {}, returning empty list: {}", tour_id, e);
                Vec::new()
            }
        }
    }

    async fn create_private_booking(&self, request: &PrivateBookingRequest) -> CoreResult<BookingRecord> {
        let record: BookingRecord = self
            .submit("bookings/private", request, "Private booking", CoreError::BookingCreation)
            .await?;
        info!("Private booking {} created for tour {}", record.booking_id, request.tour_id);
        Ok(record)
    }

    async fn join_public_departure(&self, request: &JoinBookingRequest) -> CoreResult<BookingRecord> {
        let record: BookingRecord = self
            .submit("bookings/join", request, "Join departure", CoreError::Join)
            .await?;
        info!("Booking {} joined departure {}", record.booking_id, request.departure_id);
        Ok(record)
    }

    async fn booking_status(&self, booking_id: &str) -> CoreResult<BookingStatusReport> {
        let path = booking_path(booking_id)?;
        let response = self
            .transport
            .send(&ApiRequest::get(path))
            .await
            .map_err(|e| CoreError::StatusCheck(e.to_string()))?;

        if !response.is_success() {
            return Err(CoreError::StatusCheck(format!(
                "Failed to check booking status ({})",
                response.status.as_u16()
            )));
        }

        response.json().map_err(|e| CoreError::StatusCheck(e.to_string()))
    }

    async fn init_payment(&self, booking_id: &str) -> CoreResult<PaymentSession> {
        #[derive(Serialize)]
        #[serde(rename_all = "camelCase")]
        struct InitPaymentBody<'a> {
            booking_id: &'a str,
        }

        self.submit(
            "payments/init",
            &InitPaymentBody { booking_id },
            "Payment initialization",
            CoreError::PaymentInit,
        )
        .await
    }
}

/// Tier lists are served as-is; lookups stay total, so bad tables are only reported.
fn check_tiers(kind: &str, id: &str, tiers: &[PricingTier]) -> bool {
    match validate_tiers(tiers) {
        Ok(()) => true,
        Err(e) => {
            warn!("Pricing tiers for {} {} are inconsistent: {}", kind, id, e);
            false
        }
    }
}

/// `bookings/{id}` with the id encoded as a single path segment
fn booking_path(booking_id: &str) -> CoreResult<String> {
    if matches!(booking_id.trim(), "" | "." | "..") {
        return Err(CoreError::StatusCheck(format!("Invalid booking id: {:?}", booking_id)));
    }
    let mut url = Url::parse("http://localhost/bookings")
        .map_err(|e| CoreError::StatusCheck(e.to_string()))?;
    url.path_segments_mut()
        .map_err(|_| CoreError::StatusCheck("Cannot build booking status path".to_string()))?
        .push(booking_id);
    Ok(url.path().trim_start_matches('/').to_string())
}

use serde::{Deserialize, Serialize};

use crate::pii::Masked;

/// Contact of the traveler responsible for a booking
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CustomerContact {
    pub name: String,
    pub email: String,
    pub phone: Masked<String>,
    pub document: Masked<String>,
}

/// Booking lifecycle status as reported by the backend
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    #[default]
    Pending,
    Confirmed,
    Cancelled,
    #[serde(other)]
    Other,
}

/// Payment status attached to a booking
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum PaymentState {
    #[default]
    Pending,
    Approved,
    Rejected,
    Declined,
    Failed,
    #[serde(other)]
    Unknown,
}

impl PaymentState {
    pub fn is_unsuccessful(&self) -> bool {
        matches!(self, PaymentState::Rejected | PaymentState::Declined | PaymentState::Failed)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct BookingPricing {
    #[serde(default)]
    pub final_price: i64,
}

/// Server-created booking, read-only on the client
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct BookingRecord {
    pub booking_id: String,
    #[serde(default)]
    pub departure_id: Option<String>,
    #[serde(default)]
    pub status: BookingStatus,
    #[serde(default)]
    pub pricing: BookingPricing,
}

/// Result of `GET /bookings/{id}`
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct BookingStatusReport {
    #[serde(default)]
    pub status: BookingStatus,
    #[serde(default)]
    pub payment_status: PaymentState,
}

impl BookingStatusReport {
    /// Payment recorded server-side
    pub fn is_confirmed(&self) -> bool {
        self.status == BookingStatus::Confirmed && self.payment_status == PaymentState::Approved
    }

    pub fn is_failed(&self) -> bool {
        self.status == BookingStatus::Cancelled || self.payment_status.is_unsuccessful()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_booking_record_minimal_body() {
        let record: BookingRecord =
            serde_json::from_value(serde_json::json!({ "bookingId": "B123" })).unwrap();
        assert_eq!(record.booking_id, "B123");
        assert_eq!(record.status, BookingStatus::Pending);
        assert_eq!(record.pricing.final_price, 0);
        assert!(record.departure_id.is_none());
    }

    #[test]
    fn test_status_report_classification() {
        let confirmed: BookingStatusReport = serde_json::from_value(
            serde_json::json!({ "status": "confirmed", "paymentStatus": "approved" }),
        )
        .unwrap();
        assert!(confirmed.is_confirmed());
        assert!(!confirmed.is_failed());

        let waiting: BookingStatusReport = serde_json::from_value(
            serde_json::json!({ "status": "pending", "paymentStatus": "pending" }),
        )
        .unwrap();
        assert!(!waiting.is_confirmed());
        assert!(!waiting.is_failed());

        let rejected: BookingStatusReport = serde_json::from_value(
            serde_json::json!({ "status": "pending", "paymentStatus": "rejected" }),
        )
        .unwrap();
        assert!(rejected.is_failed());
    }

    #[test]
    fn test_contact_debug_hides_pii() {
        let contact = CustomerContact {
            name: "Ana".to_string(),
            email: "ana@example.com".to_string(),
            phone: Masked("+573001112233".to_string()),
            document: Masked("1020304050".to_string()),
        };
        let debug = format!("{:?}", contact);
        assert!(!debug.contains("1020304050"));
        assert!(!debug.contains("+573001112233"));

        let json = serde_json::to_value(&contact).unwrap();
        assert_eq!(json["document"], "1020304050");
    }
}

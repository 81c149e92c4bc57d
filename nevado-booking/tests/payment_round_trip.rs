use std::sync::Arc;

use chrono::{Duration, Utc};
use nevado_booking::{
    BookingFlow, BookingForm, BookingSelection, FlowStep, PaymentHandoffBridge, PaymentReturnResolver,
    RedirectParams, ResolverDelays, ReturnNotice, ScriptTagWidget, StatusPoller,
};
use nevado_core::{MockBookingGateway, NavigationEvent, RecordingNavigator, ResumeSlot};
use nevado_shared::{
    BookingPricing, BookingRecord, BookingStatus, BookingStatusReport, Departure, DepartureStatus, Difficulty,
    LocalizedText, PaymentSession, PaymentState, PricingTier, Timestamp, Tour,
};
use nevado_store::{FileStore, StorageConfig};

fn tour() -> Tour {
    Tour {
        tour_id: "t1".to_string(),
        name: LocalizedText {
            es: "Nevado del Tolima".to_string(),
            en: "Tolima".to_string(),
        },
        description: LocalizedText::default(),
        short_description: LocalizedText::default(),
        difficulty: Difficulty::Extreme,
        total_days: 4,
        pricing_tiers: vec![
            PricingTier { min_pax: 1, max_pax: 1, price_cop: 1_500_000, price_usd: 375 },
            PricingTier { min_pax: 2, max_pax: 6, price_cop: 1_200_000, price_usd: 300 },
        ],
        is_active: true,
    }
}

fn departure() -> Departure {
    Departure {
        departure_id: "d1".to_string(),
        tour_id: "t1".to_string(),
        date: Timestamp::from(Utc::now() + Duration::days(30)),
        max_pax: 8,
        current_pax: 2,
        pricing_snapshot: Vec::new(),
        status: DepartureStatus::Open,
    }
}

fn gateway() -> Arc<MockBookingGateway> {
    Arc::new(
        MockBookingGateway::new()
            .with_tours(vec![tour()])
            .with_departures(vec![departure()])
            .with_booking(Ok(BookingRecord {
                booking_id: "b1".to_string(),
                departure_id: Some("d1".to_string()),
                status: BookingStatus::Pending,
                pricing: BookingPricing { final_price: 2_400_000 },
            }))
            .with_payment(Ok(PaymentSession {
                payment_reference: "REF123".to_string(),
                api_key: "pk_test".to_string(),
                integrity_signature: "sig".to_string(),
                amount: 2_400_000,
                currency: "COP".to_string(),
                redirection_url: "https://nevado.example/payment-result".to_string(),
                description: "Nevado del Tolima".to_string(),
            })),
    )
}

async fn flow_awaiting_payment(gateway: &MockBookingGateway) -> BookingFlow {
    let mut flow = BookingFlow::open(BookingSelection::new(tour(), vec![departure()]));
    {
        let selection = flow.selection_mut().unwrap();
        selection.select_public_departure("d1").unwrap();
        selection.set_pax_count(2);
    }
    flow.continue_to_form().unwrap();
    *flow.form_mut().unwrap() = BookingForm::new("Juan", "test@test.com", "3001234567", "123");
    flow.submit(gateway).await.unwrap();
    flow
}

#[tokio::test]
async fn test_redirect_path_reaches_confirmed() {
    let dir = tempfile::tempdir().unwrap();
    let storage = StorageConfig { resume_dir: dir.path().join(".nevado") };
    let gateway = gateway();

    // Page 1: booking, payment init, checkout widget
    let flow = flow_awaiting_payment(&gateway).await;
    assert_eq!(flow.step(), FlowStep::AwaitingPayment);
    assert_eq!(gateway.join_calls(), 1);

    let mut bridge = PaymentHandoffBridge::new(ResumeSlot::new(Arc::new(FileStore::from_config(&storage))));
    bridge.begin_payment(gateway.as_ref(), "b1").await.unwrap();
    let widget = ScriptTagWidget::new("https://checkout.bold.co/library/boldPaymentButton.js");
    let handle = bridge.hand_off(&widget, "/tours/t1").unwrap();
    assert!(handle.markup.contains("data-order-id=\"REF123\""));

    // Page 2: provider redirect, fresh store handle over the same directory
    let resume = ResumeSlot::new(Arc::new(FileStore::from_config(&storage)));
    let mut resolver = PaymentReturnResolver::new(resume.clone(), ResolverDelays::default());
    let resolution = resolver
        .resolve(&RedirectParams::from_query("bold-tx-status=approved&bold-order-id=REF123"))
        .unwrap();
    assert_eq!(resolution.return_url, "/tours/t1?payment_status=approved&ref=REF123");
    assert_eq!(resume.peek().unwrap(), None);

    // Page 3: the tour page reopens the modal in its terminal step
    let query = resolution.return_url.split_once('?').unwrap().1;
    let mut reopened = BookingFlow::open(BookingSelection::new(tour(), vec![departure()]));
    reopened.apply_return_notice(&ReturnNotice::from_query(query).unwrap());
    assert_eq!(reopened.step(), FlowStep::Confirmed);
    assert_eq!(reopened.payment_reference(), Some("REF123"));
}

#[tokio::test]
async fn test_poll_path_reaches_confirmed_without_redirect() {
    let gateway = Arc::new(
        MockBookingGateway::new()
            .with_booking(Ok(BookingRecord {
                booking_id: "b1".to_string(),
                departure_id: None,
                status: BookingStatus::Pending,
                pricing: BookingPricing { final_price: 1_500_000 },
            }))
            .with_status(Ok(BookingStatusReport {
                status: BookingStatus::Confirmed,
                payment_status: PaymentState::Approved,
            })),
    );
    let mut flow = flow_awaiting_payment(&gateway).await;

    let step = flow.check_payment(&StatusPoller::new(gateway.clone())).await.unwrap();
    assert_eq!(step, FlowStep::Confirmed);
    assert_eq!(gateway.status_calls(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_declined_payment_offers_retry() {
    let dir = tempfile::tempdir().unwrap();
    let gateway = gateway();
    let mut bridge = PaymentHandoffBridge::new(ResumeSlot::new(Arc::new(FileStore::new(dir.path()))));
    bridge.begin_payment(gateway.as_ref(), "b1").await.unwrap();
    bridge
        .hand_off(&ScriptTagWidget::new("https://checkout.bold.co/library/boldPaymentButton.js"), "/tours/t1")
        .unwrap();

    let mut resolver = PaymentReturnResolver::new(
        ResumeSlot::new(Arc::new(FileStore::new(dir.path()))),
        ResolverDelays::default(),
    );
    let resolution = resolver
        .resolve(&RedirectParams::from_query("bold-tx-status=declined&bold-order-id=REF123"))
        .unwrap();
    assert_eq!(resolution.return_url, "/tours/t1?payment_status=failed&ref=REF123");

    let navigator = RecordingNavigator::new();
    resolver.retry(&resolution, &navigator).unwrap();
    resolver.finish(&resolution, &navigator).await;
    assert_eq!(
        navigator.events(),
        vec![
            NavigationEvent::Back,
            NavigationEvent::Load("/tours/t1?payment_status=failed&ref=REF123".to_string())
        ]
    );
}

#[tokio::test]
async fn test_second_attempt_overwrites_abandoned_resume_state() {
    let dir = tempfile::tempdir().unwrap();
    let gateway = gateway();
    let slot = ResumeSlot::new(Arc::new(FileStore::new(dir.path())));

    let mut first = PaymentHandoffBridge::new(slot.clone());
    first.begin_payment(gateway.as_ref(), "b1").await.unwrap();
    first.hand_off(&ScriptTagWidget::new("x.js"), "/tours/old").unwrap();

    let mut second = PaymentHandoffBridge::new(slot.clone());
    second.begin_payment(gateway.as_ref(), "b2").await.unwrap();
    second.hand_off(&ScriptTagWidget::new("x.js"), "/tours/t1").unwrap();

    assert_eq!(slot.peek().unwrap().unwrap().return_path, "/tours/t1");
}

use std::sync::Arc;

use nevado_booking::ResolverDelays;
use nevado_core::{BookingGateway, PaymentWidget};

#[derive(Clone)]
pub struct AppState {
    pub gateway: Arc<dyn BookingGateway>,
    pub widget: Arc<dyn PaymentWidget>,
    pub delays: ResolverDelays,
    /// Route of the payment bridge page
    pub bridge_path: String,
}

use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};
use nevado_catalog::DepartureView;
use nevado_shared::{Difficulty, LocalizedText, PricingTier, Tour};
use serde::Serialize;

use crate::error::AppError;
use crate::state::AppState;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TourSummary {
    pub tour_id: String,
    pub name: LocalizedText,
    pub short_description: LocalizedText,
    pub difficulty: Difficulty,
    pub total_days: u32,
    pub pricing_tiers: Vec<PricingTier>,
    /// Cheapest per-person price across tiers
    pub from_price_cop: Option<i64>,
}

impl From<Tour> for TourSummary {
    fn from(tour: Tour) -> Self {
        let from_price_cop = tour.pricing_tiers.iter().map(|tier| tier.price_cop).min();
        Self {
            tour_id: tour.tour_id,
            name: tour.name,
            short_description: tour.short_description,
            difficulty: tour.difficulty,
            total_days: tour.total_days,
            pricing_tiers: tour.pricing_tiers,
            from_price_cop,
        }
    }
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/tours", get(list_tours))
        .route("/api/tours/{tour_id}/departures", get(list_departures))
}

/// GET /api/tours
/// Empty when the backend is unreachable
pub async fn list_tours(State(state): State<AppState>) -> Json<Vec<TourSummary>> {
    let tours = state.gateway.list_tours().await;
    Json(tours.into_iter().map(TourSummary::from).collect())
}

/// GET /api/tours/{tour_id}/departures
pub async fn list_departures(
    State(state): State<AppState>,
    Path(tour_id): Path<String>,
) -> Result<Json<Vec<DepartureView>>, AppError> {
    if state.gateway.get_tour(&tour_id).await.is_none() {
        return Err(AppError::NotFound(format!("Tour {} not found", tour_id)));
    }

    let departures = state.gateway.departures_for_tour(&tour_id).await;
    Ok(Json(departures.iter().map(DepartureView::from).collect()))
}

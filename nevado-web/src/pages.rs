use std::sync::Arc;

use axum::{
    extract::{Query, RawQuery, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use axum_extra::extract::cookie::CookieJar;
use nevado_booking::{
    escape_html, PaymentHandoffBridge, PaymentOutcome, PaymentReturnResolver, RedirectParams, Resolution,
};
use nevado_core::{CoreError, KeyValueStore, ResumeSlot};
use serde::Deserialize;

use crate::cookie_store::CookieStore;
use crate::error::AppError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BridgeQuery {
    pub booking_id: Option<String>,
    pub return_path: Option<String>,
}

fn layout(title: &str, head: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html lang=\"es\">\n<head>\n<meta charset=\"utf-8\">\n<title>{}</title>\n{}</head>\n<body>\n{}\n</body>\n</html>\n",
        escape_html(title),
        head,
        body
    )
}

fn invalid_link_page(status: StatusCode, message: &str) -> Response {
    let body = format!(
        "<main class=\"invalid-link\">\n<h1>Enlace inválido</h1>\n<p>{}</p>\n<a href=\"/\">Volver al Inicio</a>\n</main>",
        escape_html(message)
    );
    (status, Html(layout("Enlace inválido", "", &body))).into_response()
}

fn error_page(err: AppError) -> Response {
    let status = err.status();
    let body = format!(
        "<main class=\"payment-error\">\n<h1>No pudimos iniciar el pago</h1>\n<p>{}</p>\n<a href=\"javascript:history.back()\">Intentar de Nuevo</a>\n</main>",
        escape_html(&err.public_message())
    );
    (status, Html(layout("Pago", "", &body))).into_response()
}

/// GET {bridge_path}?bookingId=..&returnPath=..
/// Initializes payment for a created booking and renders the checkout button
pub async fn payment_bridge(
    State(state): State<AppState>,
    jar: CookieJar,
    Query(query): Query<BridgeQuery>,
) -> Response {
    let Some(booking_id) = query.booking_id.filter(|id| !id.trim().is_empty()) else {
        return invalid_link_page(StatusCode::BAD_REQUEST, "Falta el identificador de la reserva.");
    };
    let return_path = query.return_path.unwrap_or_else(|| "/".to_string());

    let store = Arc::new(CookieStore::from_jar(&jar));
    let resume = ResumeSlot::new(store.clone() as Arc<dyn KeyValueStore>);
    let mut bridge = PaymentHandoffBridge::new(resume);

    if let Err(e) = bridge.begin_payment(state.gateway.as_ref(), &booking_id).await {
        return error_page(AppError::from(e));
    }
    let handle = match bridge.hand_off(state.widget.as_ref(), &return_path) {
        Ok(handle) => handle,
        Err(e) => return error_page(AppError::from(e)),
    };

    let body = format!(
        "<main class=\"payment-bridge\">\n<h1>Completa tu pago</h1>\n<p>Referencia: <code>{}</code></p>\n<div id=\"checkout\">{}</div>\n</main>",
        escape_html(&handle.order_id),
        handle.markup
    );
    (store.apply(jar), Html(layout("Pago", "", &body))).into_response()
}

fn result_page(resolution: &Resolution) -> String {
    let refresh = format!(
        "<meta http-equiv=\"refresh\" content=\"{};url={}\">\n",
        resolution.delay.as_secs(),
        escape_html(&resolution.return_url)
    );

    let (title, message) = match resolution.outcome {
        PaymentOutcome::Approved => (
            "¡Reserva Confirmada!",
            "Tu transacción ha sido aprobada exitosamente. Te enviamos un correo con los detalles de tu expedición.",
        ),
        PaymentOutcome::Failed => (
            "El pago no fue exitoso",
            "Hubo un problema procesando tu pago. Por favor intenta nuevamente.",
        ),
    };

    let mut body = format!(
        "<main class=\"payment-result {}\">\n<h1>{}</h1>\n<p>Referencia: <code>{}</code></p>\n<p>{}</p>\n<a href=\"{}\">Continuar</a>\n",
        resolution.outcome.as_str(),
        title,
        escape_html(&resolution.reference),
        message,
        escape_html(&resolution.return_url)
    );
    if resolution.retry_available {
        body.push_str("<a class=\"retry\" href=\"javascript:history.back()\">Intentar de Nuevo</a>\n");
    }
    body.push_str("</main>");

    layout(title, &refresh, &body)
}

/// GET /payment-result?bold-tx-status=..&bold-order-id=..
/// Landing page of the provider redirect
pub async fn payment_result(State(state): State<AppState>, jar: CookieJar, RawQuery(query): RawQuery) -> Response {
    let params = RedirectParams::from_query(query.as_deref().unwrap_or_default());

    let store = Arc::new(CookieStore::from_jar(&jar));
    let resume = ResumeSlot::new(store.clone() as Arc<dyn KeyValueStore>);
    let mut resolver = PaymentReturnResolver::new(resume, state.delays);

    match resolver.resolve(&params) {
        Ok(resolution) => (store.apply(jar), Html(result_page(&resolution))).into_response(),
        Err(CoreError::InvalidRedirect(message)) => invalid_link_page(StatusCode::BAD_REQUEST, &message),
        Err(e) => error_page(AppError::from(e)),
    }
}

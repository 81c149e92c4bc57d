use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use nevado_booking::{ResolverDelays, ScriptTagWidget};
use nevado_store::{Config, HttpBookingGateway};
use nevado_web::{app, AppState};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "nevado_web=debug,nevado_store=debug,nevado_booking=debug,tower_http=debug".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::load().context("Failed to load config")?;
    tracing::info!("Starting Nevado web on port {}", config.server.port);
    tracing::info!("Booking API at {}", config.gateway.base_url);

    let gateway = HttpBookingGateway::new(&config.gateway, &config.retry).context("Failed to build HTTP client")?;

    let app_state = AppState {
        gateway: Arc::new(gateway),
        widget: Arc::new(ScriptTagWidget::new(config.payment.widget_script_url.clone())),
        delays: ResolverDelays {
            success: config.payment.success_delay(),
            failure: config.payment.failure_delay(),
        },
        bridge_path: config.payment.bridge_path.clone(),
    };

    let app = app(app_state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server.port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

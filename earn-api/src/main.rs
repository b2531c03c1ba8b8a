use earn_api::{app, app_config::Config, AppState};
use std::net::SocketAddr;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "earn_api=debug,earn_offer=debug,earn_order=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::load().expect("Failed to load config");
    let experience = config.experience().expect("Invalid experience configuration");
    tracing::info!(
        "Starting earn API on port {} ({} offers, order {})",
        config.server.port,
        experience.catalog.len(),
        experience.order.order_number
    );

    let app_state = AppState::new(experience, &config.server).expect("Invalid server configuration");
    let app = app(app_state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server.port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await.unwrap();
    axum::serve(listener, app).await.unwrap();
}

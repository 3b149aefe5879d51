use axum::routing::{get, post};
use axum::Router;
use registry::Registry;
use tower_http::trace::TraceLayer;

mod config;
mod error;
mod services;

pub use config::ServerConfig;
pub use error::RegistryServerError;
pub use services::FilterRequest;

#[derive(Clone)]
pub struct AppState {
    pub registry: Registry,
}

pub async fn serve(config: ServerConfig) -> anyhow::Result<()> {
    let app = create_router(AppState {
        registry: config.registry,
    });
    let app = if config.cors {
        app.layer(tower_http::cors::CorsLayer::permissive())
    } else {
        app
    };

    let listener = tokio::net::TcpListener::bind(config.bind.as_str()).await?;
    tracing::info!(addr = %listener.local_addr()?, "Listening");
    Ok(axum::serve(listener, app).await?)
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/services", get(services::handle_services_get))
        .route("/services/filter", post(services::handle_services_filter))
        .route("/facets", get(services::handle_facets_get))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

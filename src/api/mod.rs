pub mod error;
pub mod health;
pub mod schedule;

use axum::{routing::get, Router};
use std::time::Duration;
use tower::ServiceBuilder;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

use crate::config::Config;

/// Shared handler state. Every request builds and solves its own model, so
/// configuration is the only thing handlers share.
#[derive(Clone)]
pub struct AppState {
    pub cfg: Config,
}

pub fn router(state: AppState, cfg: &Config) -> Router {
    let v1 = Router::new()
        .route(
            "/schedule",
            get(schedule::flat_tariff_schedule).post(schedule::priced_schedule),
        )
        .route("/healthz", get(health::healthz))
        .with_state(state);

    let mut router = Router::new().nest("/api/v1", v1);

    if cfg.server.enable_cors {
        use tower_http::cors::{Any, CorsLayer};
        let cors = CorsLayer::new()
            .allow_origin(Any)
            .allow_methods([axum::http::Method::GET, axum::http::Method::POST])
            .allow_headers([axum::http::header::CONTENT_TYPE]);
        router = router.layer(cors);
    }

    router
        .layer(
            ServiceBuilder::new()
                .layer(axum::extract::DefaultBodyLimit::max(1024 * 1024))
                .layer(TimeoutLayer::new(Duration::from_secs(
                    cfg.server.request_timeout_secs,
                ))),
        )
        .layer(TraceLayer::new_for_http())
}

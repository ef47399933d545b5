//! Route table and middleware stack.

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers;
use super::state::AppState;

/// Build the application: `/health` at the root, everything else under `/v1`.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health_check))
        .nest("/v1", v1_routes())
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(permissive_cors())
        .with_state(state)
}

fn v1_routes() -> Router<AppState> {
    let observations = Router::new()
        .route("/batch", post(handlers::batch_observations))
        .route("/stream", get(handlers::stream_observations));

    Router::new()
        .nest("/observations", observations)
        .route("/sun-position", post(handlers::sun_position))
        .route("/moon-position", post(handlers::moon_position))
        .route("/moon-phase", post(handlers::moon_phase))
        .route("/day-of-week", post(handlers::day_of_week))
        .route("/rise-set", post(handlers::rise_set))
}

/// The browser client may be served from any origin.
fn permissive_cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any)
}

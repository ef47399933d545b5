//! Axum server exposing the observation pipeline.
//!
//! | Method | Path                      | Handler                          |
//! |--------|---------------------------|----------------------------------|
//! | GET    | `/health`                 | [`handlers::health_check`]       |
//! | POST   | `/v1/observations/batch`  | [`handlers::batch_observations`] |
//! | GET    | `/v1/observations/stream` | [`handlers::stream_observations`]|
//! | POST   | `/v1/sun-position`        | [`handlers::sun_position`]       |
//! | POST   | `/v1/moon-position`       | [`handlers::moon_position`]      |
//! | POST   | `/v1/moon-phase`          | [`handlers::moon_phase`]         |
//! | POST   | `/v1/day-of-week`         | [`handlers::day_of_week`]        |
//! | POST   | `/v1/rise-set`            | [`handlers::rise_set`]           |
//!
//! ```text
//!   request ──► handlers ──► services (BatchPlan, observation_events)
//!                                │
//!                                ▼
//!                  ephemeris (one ObservationContext per frame)
//! ```
//!
//! The stream endpoint answers with `text/event-stream`: `frame` events in
//! timestamp order, then `metadata`, or a single `error` that ends it.

pub mod dto;
pub mod error;
pub mod handlers;
pub mod router;
pub mod state;

pub use router::create_router;
pub use state::AppState;

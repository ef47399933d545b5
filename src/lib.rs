//! # Skyview
//!
//! Sun and moon observation frames for an observer on Earth, computed in
//! batches or streamed frame by frame, plus the client-side session and
//! playback driver that consume them.
//!
//! ## Features
//!
//! - **Observation Engine**: sun and moon altitude/azimuth and lunar phase
//!   from one shared astronomical context per instant
//! - **Batches**: evenly spaced frames over a time range
//! - **Streaming**: frames delivered as Server-Sent Events while they are
//!   computed, with a per-frame timeout
//! - **Data Session**: observable loading/error/progress state for a UI
//! - **Animation**: real-time playback with orbital and sky-dome views
//!
//! ## Architecture
//!
//! - [`models`]: locations, frames, batches and stream events
//! - [`ephemeris`]: solar and lunar theories and coordinate transforms
//! - [`services`]: frame computation, batch plans, streams, rise/set
//! - [`http`]: Axum-based HTTP server (feature `http-server`)
//! - [`client`]: data session and transports
//! - [`animation`]: playback state machine and projections

pub mod animation;
pub mod client;
pub mod config;
pub mod ephemeris;
pub mod error;
pub mod models;
pub mod services;

#[cfg(feature = "http-server")]
pub mod http;

pub use error::{ObservationError, ObservationResult};

//! Application state for the HTTP server.

use std::sync::Arc;
use std::time::Duration;

use crate::config::ServerConfig;
use crate::services::{FrameCache, ObservationEngine, StreamOptions};

/// Shared application state passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<ServerConfig>,
    /// Frame computation, sharing the cache when one is configured
    pub engine: ObservationEngine,
}

impl AppState {
    pub fn new(config: ServerConfig) -> Self {
        let engine = if config.cache_capacity > 0 {
            ObservationEngine::with_cache(Arc::new(FrameCache::new(config.cache_capacity)))
        } else {
            ObservationEngine::new()
        };
        Self {
            config: Arc::new(config),
            engine,
        }
    }

    /// Budget for a one-shot batch: the per-frame budget times the frame
    /// count, since nothing reaches the client until every frame is done.
    pub fn batch_timeout(&self, frame_count: usize) -> Duration {
        let frames = u32::try_from(frame_count).unwrap_or(u32::MAX);
        self.config.frame_timeout().saturating_mul(frames)
    }

    pub fn stream_options(&self) -> StreamOptions {
        StreamOptions {
            frame_timeout: self.config.frame_timeout(),
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(ServerConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_batch_timeout_scales_with_frames() {
        let state = AppState::new(ServerConfig {
            frame_timeout_ms: 50,
            ..ServerConfig::default()
        });
        assert_eq!(state.batch_timeout(48), Duration::from_millis(2400));
        assert_eq!(state.batch_timeout(usize::MAX), Duration::from_millis(50) * u32::MAX);
    }
}

//! In-process transport backed directly by the service layer.

use async_trait::async_trait;
use futures::StreamExt;

use super::error::ClientError;
use super::transport::{EventStream, ObservationTransport};
use crate::models::BatchResult;
use crate::services::{observation_events, BatchPlan, BatchRequest, ObservationEngine, StreamOptions};

#[derive(Clone, Default)]
pub struct LocalTransport {
    engine: ObservationEngine,
    options: StreamOptions,
}

impl LocalTransport {
    pub fn new(engine: ObservationEngine, options: StreamOptions) -> Self {
        Self { engine, options }
    }
}

#[async_trait]
impl ObservationTransport for LocalTransport {
    async fn fetch_batch(&self, request: &BatchRequest) -> Result<BatchResult, ClientError> {
        let plan = BatchPlan::from_request(request)?;
        let engine = self.engine.clone();
        let result = tokio::task::spawn_blocking(move || engine.run_batch(&plan))
            .await
            .map_err(|e| ClientError::Server(format!("worker failed: {}", e)))??;
        Ok(result)
    }

    async fn open_stream(&self, request: &BatchRequest) -> Result<EventStream, ClientError> {
        let plan = BatchPlan::from_request(request)?;
        Ok(observation_events(self.engine.clone(), plan, self.options)
            .map(Ok)
            .boxed())
    }
}

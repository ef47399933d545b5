//! Transport seam between the data session and a batch source.

use async_trait::async_trait;
use futures::stream::BoxStream;

use super::error::ClientError;
use crate::models::{BatchResult, StreamEvent};
use crate::services::BatchRequest;

/// Events of one streaming fetch. Dropping the stream tears down the
/// underlying connection.
pub type EventStream = BoxStream<'static, Result<StreamEvent, ClientError>>;

#[async_trait]
pub trait ObservationTransport: Send + Sync {
    /// One-shot fetch of a complete batch.
    async fn fetch_batch(&self, request: &BatchRequest) -> Result<BatchResult, ClientError>;

    /// Open an event stream for the batch. Request validation failures are
    /// returned here, before any event.
    async fn open_stream(&self, request: &BatchRequest) -> Result<EventStream, ClientError>;
}

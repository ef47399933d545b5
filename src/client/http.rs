//! HTTP transport: JSON batches and Server-Sent Event streams via reqwest.

use async_trait::async_trait;
use futures::StreamExt;
use reqwest::{Response, StatusCode};
use serde::Deserialize;

use super::error::ClientError;
use super::transport::{EventStream, ObservationTransport};
use crate::models::{BatchResult, StreamEvent};
use crate::services::BatchRequest;

const BATCH_PATH: &str = "/v1/observations/batch";
const STREAM_PATH: &str = "/v1/observations/stream";

/// Error body returned by the server.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

#[derive(Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    base_url: String,
}

impl HttpTransport {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    pub fn with_client(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

/// Turn a non-success response into the matching client error.
async fn error_from_response(response: Response) -> ClientError {
    let status = response.status();
    let text = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ErrorBody>(&text)
        .map(|body| body.message)
        .unwrap_or_else(|_| {
            if text.is_empty() {
                status.to_string()
            } else {
                text
            }
        });

    if status == StatusCode::GATEWAY_TIMEOUT {
        ClientError::Transport(message)
    } else if status.is_client_error() {
        ClientError::Validation(message)
    } else {
        ClientError::Server(message)
    }
}

fn network_error(err: reqwest::Error) -> ClientError {
    ClientError::Network(err.to_string())
}

#[async_trait]
impl ObservationTransport for HttpTransport {
    async fn fetch_batch(&self, request: &BatchRequest) -> Result<BatchResult, ClientError> {
        let response = self
            .client
            .post(self.url(BATCH_PATH))
            .json(request)
            .send()
            .await
            .map_err(network_error)?;

        if !response.status().is_success() {
            return Err(error_from_response(response).await);
        }
        response
            .json::<BatchResult>()
            .await
            .map_err(|e| ClientError::Transport(format!("malformed batch response: {}", e)))
    }

    async fn open_stream(&self, request: &BatchRequest) -> Result<EventStream, ClientError> {
        let response = self
            .client
            .get(self.url(STREAM_PATH))
            .query(request)
            .header(reqwest::header::ACCEPT, "text/event-stream")
            .send()
            .await
            .map_err(network_error)?;

        if !response.status().is_success() {
            return Err(error_from_response(response).await);
        }

        let stream = async_stream::stream! {
            let mut bytes = Box::pin(response.bytes_stream());
            let mut decoder = SseDecoder::default();
            while let Some(chunk) = bytes.next().await {
                match chunk {
                    Ok(chunk) => {
                        for message in decoder.push(&chunk) {
                            yield StreamEvent::from_parts(&message.event, &message.data)
                                .map_err(ClientError::Transport);
                        }
                    }
                    Err(e) => {
                        yield Err(ClientError::Network(e.to_string()));
                        return;
                    }
                }
            }
        };
        Ok(stream.boxed())
    }
}

/// One dispatched Server-Sent Event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SseMessage {
    pub event: String,
    pub data: String,
}

/// Incremental `text/event-stream` parser.
///
/// Bytes may be split anywhere, including inside a UTF-8 sequence; lines
/// are only decoded once complete. Comment lines (keep-alives) are skipped.
#[derive(Debug, Default)]
pub struct SseDecoder {
    buffer: Vec<u8>,
    event: Option<String>,
    data: Vec<String>,
}

impl SseDecoder {
    pub fn push(&mut self, chunk: &[u8]) -> Vec<SseMessage> {
        self.buffer.extend_from_slice(chunk);
        let mut messages = Vec::new();
        while let Some(pos) = self.buffer.iter().position(|&b| b == b'\n') {
            let raw: Vec<u8> = self.buffer.drain(..=pos).collect();
            let line = String::from_utf8_lossy(&raw);
            let line = line.trim_end_matches(&['\n', '\r'][..]);
            if let Some(message) = self.process_line(line) {
                messages.push(message);
            }
        }
        messages
    }

    fn process_line(&mut self, line: &str) -> Option<SseMessage> {
        if line.is_empty() {
            return self.dispatch();
        }
        if line.starts_with(':') {
            return None;
        }
        let (field, value) = match line.split_once(':') {
            Some((field, value)) => (field, value.strip_prefix(' ').unwrap_or(value)),
            None => (line, ""),
        };
        match field {
            "event" => self.event = Some(value.to_string()),
            "data" => self.data.push(value.to_string()),
            _ => {}
        }
        None
    }

    fn dispatch(&mut self) -> Option<SseMessage> {
        let event = self.event.take();
        if self.data.is_empty() {
            return None;
        }
        let data = std::mem::take(&mut self.data).join("\n");
        Some(SseMessage {
            event: event.unwrap_or_else(|| "message".to_string()),
            data,
        })
    }
}

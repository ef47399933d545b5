//! Client Data Session and the transports it drives.
//!
//! A [`DataSession`] owns observable loading/error/data/progress state and
//! fetches batches through an [`ObservationTransport`]: over HTTP
//! ([`HttpTransport`], feature `http-client`) or in process
//! ([`LocalTransport`]).

pub mod assembler;
pub mod error;
pub mod local;
pub mod session;
pub mod transport;

#[cfg(feature = "http-client")]
pub mod http;

pub use assembler::BatchAssembler;
pub use error::ClientError;
pub use local::LocalTransport;
pub use session::{DataSession, SessionState};
pub use transport::{EventStream, ObservationTransport};

#[cfg(feature = "http-client")]
pub use http::{HttpTransport, SseDecoder, SseMessage};

//! Generation progress streaming.
//!
//! Raw bytes from the generation endpoint pass through [`SseDecoder`], are
//! surfaced as JSON payloads by a [`ProgressSource`], and are driven to a
//! single resolution by [`consume`].

pub mod consumer;
pub mod error;
pub mod source;
pub mod sse;
pub mod state;

pub use consumer::{consume, consume_with_cancel};
pub use error::{GenerationError, TransportError, GENERIC_FAILURE_REASON};
pub use source::{ByteStream, ProgressSource, SseProgressSource};
pub use sse::{SseDecoder, SseFrame};
pub use state::{ProgressState, Transition};

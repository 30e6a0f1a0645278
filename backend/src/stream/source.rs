//! Event sources feeding the progress consumer.

use async_trait::async_trait;
use futures::stream::BoxStream;
use futures::StreamExt;
use std::collections::VecDeque;

use super::error::TransportError;
use super::sse::{SseDecoder, SseFrame};

/// A push-based sequence of raw event payloads (one JSON document each).
#[async_trait]
pub trait ProgressSource: Send {
    /// Next message payload, or `None` once the transport has ended.
    async fn next_message(&mut self) -> Option<Result<String, TransportError>>;

    /// Close the underlying connection. Calling it more than once is a no-op.
    fn close(&mut self);

    fn is_closed(&self) -> bool;
}

/// Chunked byte stream as produced by an HTTP response body.
pub type ByteStream = BoxStream<'static, Result<Vec<u8>, TransportError>>;

/// [`ProgressSource`] decoding an SSE byte stream.
///
/// Only default-type (`message`) events are delivered, matching what an
/// EventSource `onmessage` handler receives.
pub struct SseProgressSource {
    inner: Option<ByteStream>,
    decoder: SseDecoder,
    pending: VecDeque<SseFrame>,
}

impl SseProgressSource {
    pub fn new(stream: ByteStream) -> Self {
        Self {
            inner: Some(stream),
            decoder: SseDecoder::new(),
            pending: VecDeque::new(),
        }
    }
}

#[async_trait]
impl ProgressSource for SseProgressSource {
    async fn next_message(&mut self) -> Option<Result<String, TransportError>> {
        loop {
            if let Some(frame) = self.pending.pop_front() {
                if frame.is_message() {
                    return Some(Ok(frame.data));
                }
                log::debug!("ignoring SSE event of type {:?}", frame.event);
                continue;
            }

            let next = self.inner.as_mut()?.next().await;
            match next {
                Some(Ok(chunk)) => self.pending.extend(self.decoder.push(&chunk)),
                Some(Err(err)) => {
                    self.close();
                    return Some(Err(err));
                }
                None => {
                    self.close();
                    return None;
                }
            }
        }
    }

    fn close(&mut self) {
        if self.inner.take().is_some() {
            log::debug!("progress stream closed");
        }
        self.pending.clear();
    }

    fn is_closed(&self) -> bool {
        self.inner.is_none()
    }
}

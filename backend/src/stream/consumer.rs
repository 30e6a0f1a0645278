//! Progress stream consumer.
//!
//! Drives one generation stream to its single resolution: the first
//! `completed` or `error` event, a transport fault, or local cancellation.
//! The source is closed as soon as the outcome is known, and no event is
//! delivered to the caller afterwards. Nothing is retried here.

use std::future::Future;

use super::error::{GenerationError, TransportError};
use super::source::ProgressSource;
use super::state::{ProgressState, Transition};
use crate::models::progress::{GenerationOutcome, ProgressEvent, Stage};

/// Consume `source` until it resolves, forwarding each event to `on_progress`.
///
/// The terminal event itself is forwarded before the call resolves.
pub async fn consume<S, F>(
    source: &mut S,
    mut on_progress: F,
) -> Result<GenerationOutcome, GenerationError>
where
    S: ProgressSource + ?Sized,
    F: FnMut(&ProgressEvent),
{
    let mut state = ProgressState::new();

    loop {
        let payload = match source.next_message().await {
            Some(Ok(payload)) => payload,
            Some(Err(err)) => {
                log::warn!("generation stream transport failure: {}", err);
                source.close();
                return Err(err.into());
            }
            None => {
                log::warn!("generation stream ended without a terminal event");
                source.close();
                return Err(TransportError::Closed.into());
            }
        };

        let event: ProgressEvent = match serde_json::from_str(&payload) {
            Ok(event) => event,
            Err(err) => {
                log::warn!("undecodable progress event: {}", err);
                source.close();
                return Err(TransportError::Malformed(err.to_string()).into());
            }
        };

        if state.apply(&event) == Transition::Ignored {
            continue;
        }
        log::debug!(
            "progress: stage={} progress={} message={}",
            event.stage,
            event.progress,
            event.message
        );
        on_progress(&event);

        match event.stage {
            Stage::Completed => {
                source.close();
                return match event.outcome() {
                    Some(outcome) => {
                        log::info!("generation completed: document {}", outcome.document_id);
                        Ok(outcome)
                    }
                    None => Err(TransportError::Malformed(
                        "completed event without document_id".to_string(),
                    )
                    .into()),
                };
            }
            Stage::Error => {
                source.close();
                log::info!("generation failed: {}", event.message);
                return Err(GenerationError::failed(&event.message));
            }
            _ => {}
        }
    }
}

/// Like [`consume`], but resolves as [`GenerationError::Cancelled`] as soon as
/// `cancelled` completes, closing the source.
pub async fn consume_with_cancel<S, F, C>(
    source: &mut S,
    on_progress: F,
    cancelled: C,
) -> Result<GenerationOutcome, GenerationError>
where
    S: ProgressSource + ?Sized,
    F: FnMut(&ProgressEvent),
    C: Future<Output = ()>,
{
    tokio::select! {
        result = consume(&mut *source, on_progress) => return result,
        _ = cancelled => {}
    }
    log::info!("generation cancelled by caller");
    source.close();
    Err(GenerationError::Cancelled)
}

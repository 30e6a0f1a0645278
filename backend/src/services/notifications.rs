//! Typed notifications published after a document is generated.
//!
//! Surfaces listing a course's documents subscribe and refresh when a
//! notification names their course and document type.

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

use crate::api::{CourseId, DocumentId};
use crate::models::course::{DocType, DocumentSlot};

const CHANNEL_CAPACITY: usize = 256;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DocumentNotification {
    /// The documents of `doc_type` for `course_id` changed.
    DocumentsRefreshed {
        course_id: CourseId,
        doc_type: DocType,
        document_id: DocumentId,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        lesson_number: Option<u32>,
    },
}

impl DocumentNotification {
    pub fn refreshed(slot: DocumentSlot, document_id: DocumentId) -> Self {
        DocumentNotification::DocumentsRefreshed {
            course_id: slot.course_id,
            doc_type: slot.doc_type,
            document_id,
            lesson_number: slot.lesson_number,
        }
    }

    pub fn course_id(&self) -> CourseId {
        match self {
            DocumentNotification::DocumentsRefreshed { course_id, .. } => *course_id,
        }
    }
}

/// Fan-out of [`DocumentNotification`]s to every current subscriber.
#[derive(Clone)]
pub struct DocumentNotifier {
    tx: broadcast::Sender<DocumentNotification>,
}

impl DocumentNotifier {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(CHANNEL_CAPACITY);
        Self { tx }
    }

    /// Publish to all subscribers. Returns how many received it.
    pub fn publish(&self, notification: DocumentNotification) -> usize {
        log::debug!("Publishing {:?}", notification);
        self.tx.send(notification).unwrap_or(0)
    }

    pub fn subscribe(&self) -> broadcast::Receiver<DocumentNotification> {
        self.tx.subscribe()
    }

    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl Default for DocumentNotifier {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_subscribers_receive_refresh() {
        let notifier = DocumentNotifier::new();
        let mut a = notifier.subscribe();
        let mut b = notifier.subscribe();

        let slot = DocumentSlot {
            course_id: CourseId::new(2),
            doc_type: DocType::Lesson,
            lesson_number: Some(4),
        };
        assert_eq!(notifier.publish(DocumentNotification::refreshed(slot, DocumentId::new(11))), 2);

        let got = a.recv().await.unwrap();
        assert_eq!(got, b.recv().await.unwrap());
        assert_eq!(got.course_id(), CourseId::new(2));
    }

    #[test]
    fn test_publish_without_subscribers_is_dropped() {
        let notifier = DocumentNotifier::new();
        let slot = DocumentSlot {
            course_id: CourseId::new(1),
            doc_type: DocType::Plan,
            lesson_number: None,
        };
        assert_eq!(notifier.publish(DocumentNotification::refreshed(slot, DocumentId::new(1))), 0);
    }

    #[test]
    fn test_wire_shape() {
        let slot = DocumentSlot {
            course_id: CourseId::new(3),
            doc_type: DocType::Plan,
            lesson_number: None,
        };
        let json = serde_json::to_value(DocumentNotification::refreshed(slot, DocumentId::new(9))).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"type": "documents_refreshed", "course_id": 3, "doc_type": "plan", "document_id": 9})
        );
    }
}

//! Service layer for generation orchestration.
//!
//! Services sit between the HTTP handlers and the course backend client: they
//! track in-flight generations, decide whether a lesson plan may be
//! overwritten and announce newly generated documents.

pub mod generation;
pub mod generation_tracker;
pub mod notifications;
pub mod overwrite;

pub use generation::{run_job, GenerationService};
pub use generation_tracker::{GenerationJob, GenerationTracker, JobStatus, TrackerError};
pub use notifications::{DocumentNotification, DocumentNotifier};
pub use overwrite::OverwriteCheck;

//! Data model shared by the allocator, the generation stream and the HTTP API.

pub mod course;
pub mod macros;
pub mod progress;
pub mod schedule;

pub use course::*;
pub use progress::*;
pub use schedule::*;

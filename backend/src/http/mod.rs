//! HTTP server module for the course generation backend.
//!
//! Exposes the slot allocator and the generation relay as a REST API with
//! Server-Sent Events.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │  HTTP Layer (axum handlers)                               │
//! │  - Request parsing and validation                         │
//! │  - JSON and SSE serialization                             │
//! │  - CORS, compression, error handling                      │
//! └───────────────────┬──────────────────────────────────────┘
//!                     │
//! ┌───────────────────▼──────────────────────────────────────┐
//! │  Allocator + Service Layer                                │
//! │  - Schedule reports and feedback                          │
//! │  - Generation jobs, overwrite checks, notifications       │
//! └───────────────────┬──────────────────────────────────────┘
//!                     │
//! ┌───────────────────▼──────────────────────────────────────┐
//! │  Course backend client (reqwest)                          │
//! │  - Course records and documents                           │
//! │  - Generation progress streams                            │
//! └──────────────────────────────────────────────────────────┘
//! ```

pub mod dto;
pub mod error;
pub mod handlers;
pub mod router;
pub mod state;

pub use error::{ApiError, AppError};
pub use router::create_router;
pub use state::AppState;

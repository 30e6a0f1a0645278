//! # Course Generation Backend
//!
//! Course scheduling and document generation relay.
//!
//! This crate computes whether a teacher's weekly calendar can hold a course's
//! instructional hours, and drives teaching-plan and lesson-plan generation
//! against an external course backend that reports progress as Server-Sent
//! Events. The backend exposes a REST API via Axum for the frontend.
//!
//! ## Features
//!
//! - **Slot Allocation**: session counts, calendar slots, skip slots and the
//!   feasibility tolerance band, recomputed on every edit
//! - **Progress Streams**: SSE decoding and a stage state machine that resolves
//!   each generation exactly once
//! - **Generation Jobs**: one in-flight generation per document slot, with
//!   overwrite confirmation and refresh notifications
//! - **HTTP API**: RESTful endpoints and SSE relays for frontend integration
//!
//! ## Architecture
//!
//! - [`api`]: identifier newtypes and re-exported DTOs
//! - [`models`]: schedule, course and progress data model
//! - [`allocator`]: the slot allocator, editable form state and feedback
//! - [`stream`]: SSE decoding and the progress stream consumer
//! - [`client`]: reqwest client for the course backend
//! - [`services`]: generation jobs, overwrite checks and notifications
//! - [`config`]: TOML and environment configuration
//! - `http`: Axum-based HTTP server and request handlers

pub mod api;

pub mod allocator;
pub mod client;
pub mod config;
pub mod models;

pub mod services;
pub mod stream;

#[cfg(feature = "http-server")]
pub mod http;

//! Todo and user REST service over a document store.
//!
//! Layers, outermost first: `http` (axum routes) → `application` (use cases)
//! → `domain` (models, validation, repository traits) ← `infrastructure`
//! (MongoDB and in-memory stores).

pub mod application;
pub mod config;
pub mod domain;
pub mod http;
pub mod infrastructure;

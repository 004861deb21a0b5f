//! # IO Module
//!
//! The adapter layer between the UI and the domain. It translates HTTP
//! requests into domain commands and domain results into the DTOs of the
//! `shared` crate.
//!
//! ## Current Implementation
//!
//! - **Web Framework**: Axum, one router per resource
//! - **Serialization**: Serde JSON with the `shared` DTOs
//! - **State Management**: services injected through `AppState`
//! - **Error Handling**: domain errors mapped to HTTP status codes in one place

pub mod rest;

pub use rest::*;

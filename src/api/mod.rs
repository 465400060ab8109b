//! API Module - Backend Contract
//!
//! This module handles:
//! - Typed wire data model for the orchestrator's JSON contract
//! - HTTP transport with a total error taxonomy
//! - The `SyncApi` seam the sync engines are generic over

pub mod client;
pub mod types;

pub use client::{ApiClient, ApiError, SyncApi};
pub use types::{StatusSnapshot, Suggestion, SuggestionStatus};

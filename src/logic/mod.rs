//! Logic Module - Sync Engines
//!
//! The engines that keep the console's view of the backend consistent:
//! - `store` - snapshot store, single source of truth for the renderer
//! - `poller` - repeating fetch-and-reconcile cycle with overlap prevention
//! - `demo` - fallback snapshot synthesis for unreachable backends
//! - `suggestions` - optimistic approve/deny with rollback
//! - `analysis` - on-demand Vanguard analyses with stale-reply discard

pub mod analysis;
pub mod config;
pub mod demo;
pub mod notify;
pub mod poller;
pub mod store;
pub mod suggestions;

#[cfg(test)]
pub(crate) mod testutil;

pub use analysis::{AnalysisDesk, AnalysisSlot};
pub use config::SyncConfig;
pub use poller::StatusPoller;
pub use store::StatusStore;
pub use suggestions::{MutateError, SuggestionBoard};

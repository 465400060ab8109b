//! Sentinel Console - Live-State Synchronization Engine
//!
//! Keeps a console's view of the Sentinel traffic-classification backend
//! consistent under intermittent connectivity. Polls `/status` into an
//! observable snapshot store, degrades to synthesized demo data when the
//! backend is unreachable, applies approve/deny commands optimistically
//! with rollback, and coordinates on-demand Vanguard analyses with
//! stale-reply discarding.
//!
//! Rendering, navigation and backend internals are out of scope; this
//! crate ends at the observable state the renderer reads.

pub mod api;
pub mod constants;
pub mod logic;

pub use api::client::{ApiClient, ApiError, SyncApi};
pub use api::types::{StatusSnapshot, Suggestion, SuggestionStatus};
pub use logic::analysis::{AnalysisDesk, AnalysisSlot};
pub use logic::config::SyncConfig;
pub use logic::poller::StatusPoller;
pub use logic::store::StatusStore;
pub use logic::suggestions::{MutateError, SuggestionBoard};

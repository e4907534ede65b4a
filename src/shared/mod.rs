//! Shared state and messaging between the dashboard and background tasks
//!
//! The UI thread owns the studio itself; this module carries the pieces
//! that outlive a single frame: loaded configuration, per-panel runtime
//! status, and the events integration tasks send back.

pub mod state;
pub mod messages;

pub use state::SharedAppState;
pub use messages::{AiRequest, IntegrationCommand, IntegrationEvent};

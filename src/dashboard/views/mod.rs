//! Dashboard views

pub mod assistant;
pub mod branding;
pub mod chat;
pub mod controls;
pub mod preview;
pub mod sources;
pub mod youtube;

pub use assistant::render_assistant_view;
pub use branding::render_branding_view;
pub use chat::render_chat_view;
pub use controls::{render_controls, render_status_cards};
pub use preview::render_preview;
pub use sources::render_sources_view;
pub use youtube::render_youtube_view;

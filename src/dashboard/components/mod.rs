//! Reusable UI components for the dashboard

pub mod status_card;
pub mod tab_bar;

pub use status_card::StatusCard;
pub use tab_bar::render_tab_bar;

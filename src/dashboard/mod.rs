//! Dashboard UI Module
//!
//! The studio window: composited preview with controls on the left, a
//! tabbed panel for sources, chat, branding, YouTube and the assistant on
//! the right.

pub mod app;
pub mod state;
pub mod theme;
pub mod views;
pub mod components;

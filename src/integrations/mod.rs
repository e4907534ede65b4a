//! External Integrations
//!
//! Outbound HTTP collaborators: the generative-text assistant and the
//! YouTube Live broadcast provisioner. Each call is a single request/response
//! with no retry; failures are returned to the caller for display.

pub mod ai;
pub mod oauth;
pub mod youtube;

pub use ai::{AssistantAction, GeminiClient, TextGenerator};
pub use oauth::{AccessToken, OAuthClient};
pub use youtube::{provision, BroadcastSettings, IngestInfo, Privacy, YouTubeClient};

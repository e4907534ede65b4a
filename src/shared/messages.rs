//! Message types sent from integration tasks back to the dashboard

use crate::integrations::{AccessToken, AssistantAction, BroadcastSettings, IngestInfo};

/// What an assistant request was for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AiRequest {
    /// One-click title/description generation
    Action(AssistantAction),
    /// Operator-typed question, result is only displayed
    Freeform,
}

/// Completion of a background integration call.
///
/// Errors are already rendered to strings for display.
#[derive(Debug, Clone)]
pub enum IntegrationEvent {
    AiFinished {
        request: AiRequest,
        result: Result<String, String>,
    },
    AuthFinished(Result<AccessToken, String>),
    ProvisionFinished(Result<IngestInfo, String>),
}

/// Work the dashboard views ask the app to run in the background
#[derive(Debug, Clone)]
pub enum IntegrationCommand {
    /// Ask the assistant; `input` is the topic for actions or the full
    /// question for freeform requests
    Assist { request: AiRequest, input: String },
    /// Trade a pasted authorization code for a token; `state` is the value
    /// sent with the consent URL
    ExchangeCode {
        client_id: String,
        code: String,
        state: Option<String>,
    },
    /// Create and bind a broadcast from the draft
    Provision(BroadcastSettings),
}

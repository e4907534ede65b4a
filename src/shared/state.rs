//! Shared application state between the dashboard and its background tasks

use std::path::PathBuf;

use crate::config::AppConfig;
use crate::shared::IntegrationCommand;

/// Central shared state
#[derive(Debug, Clone, Default)]
pub struct SharedAppState {
    /// Application configuration
    pub config: AppConfig,
    /// Where the configuration was loaded from, if anywhere
    pub config_path: Option<PathBuf>,
    /// Runtime state (not persisted)
    pub runtime: RuntimeState,
}

impl SharedAppState {
    /// Create a new shared state with the given configuration
    pub fn new(config: AppConfig, config_path: Option<PathBuf>) -> Self {
        Self {
            config,
            config_path,
            runtime: RuntimeState::default(),
        }
    }
}

/// Runtime state that is not persisted
#[derive(Debug, Clone, Default)]
pub struct RuntimeState {
    /// An assistant request is in flight
    pub ai_pending: bool,
    /// An authorization code exchange is in flight
    pub auth_pending: bool,
    /// Broadcast provisioning is in flight
    pub provision_pending: bool,
    /// Last assistant error
    pub ai_error: Option<String>,
    /// Last YouTube error
    pub youtube_error: Option<String>,
    /// Last error from anywhere else (config save, logo load)
    pub last_error: Option<String>,
    /// Preview frames drawn since start
    pub frames_rendered: u64,
    /// Pending background work requested by the UI
    pub commands: Vec<IntegrationCommand>,
}

impl RuntimeState {
    /// Clear any error state
    pub fn clear_error(&mut self) {
        self.last_error = None;
    }

    /// Set an error message
    pub fn set_error(&mut self, error: impl Into<String>) {
        self.last_error = Some(error.into());
    }

    /// Queue background work for the app to start next frame
    pub fn request(&mut self, command: IntegrationCommand) {
        self.commands.push(command);
    }

    /// Drain queued work
    pub fn take_commands(&mut self) -> Vec<IntegrationCommand> {
        std::mem::take(&mut self.commands)
    }

    /// Any integration call still running
    pub fn is_busy(&self) -> bool {
        self.ai_pending || self.auth_pending || self.provision_pending
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_set_and_clear() {
        let mut runtime = RuntimeState::default();
        runtime.set_error("could not read logo");
        assert_eq!(runtime.last_error.as_deref(), Some("could not read logo"));
        runtime.clear_error();
        assert!(runtime.last_error.is_none());
    }

    #[test]
    fn test_commands_drain() {
        let mut runtime = RuntimeState::default();
        runtime.request(IntegrationCommand::ExchangeCode {
            client_id: "id".to_string(),
            code: "4/abc".to_string(),
            state: None,
        });
        assert_eq!(runtime.take_commands().len(), 1);
        assert!(runtime.take_commands().is_empty());
    }

    #[test]
    fn test_busy_flags() {
        let mut runtime = RuntimeState::default();
        assert!(!runtime.is_busy());
        runtime.provision_pending = true;
        assert!(runtime.is_busy());
    }
}

use serde::{Deserialize, Serialize};

use crate::draft::GenerationInputs;

pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";
pub const DEFAULT_LEAD_ID: &str = "2094";
pub const DEFAULT_USER_ID: &str = "53";
pub const DEFAULT_NOTIFICATION_TIMEOUT_MS: u64 = 3000;

/// Client configuration read from `config.toml`.
///
/// Every field is optional in the file; missing fields take the defaults.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct ClientConfig {
    /// Base URL of the generation service, without a trailing slash.
    pub base_url: String,
    pub default_lead_id: String,
    pub default_user_id: String,
    pub notification_timeout_ms: u64,
    /// Opt-in transport timeout. `None` waits for the service indefinitely.
    pub request_timeout_secs: Option<u64>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            default_lead_id: DEFAULT_LEAD_ID.to_string(),
            default_user_id: DEFAULT_USER_ID.to_string(),
            notification_timeout_ms: DEFAULT_NOTIFICATION_TIMEOUT_MS,
            request_timeout_secs: None,
        }
    }
}

impl ClientConfig {
    /// Form inputs pre-filled from the configured defaults.
    pub fn default_inputs(&self) -> GenerationInputs {
        GenerationInputs::new(
            self.default_lead_id.clone(),
            self.default_user_id.clone(),
            "",
        )
    }

    pub fn notification_timeout(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.notification_timeout_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config: ClientConfig = toml::from_str("base_url = \"https://agent.example\"").unwrap();
        assert_eq!(config.base_url, "https://agent.example");
        assert_eq!(config.default_lead_id, "2094");
        assert_eq!(config.default_user_id, "53");
        assert_eq!(config.notification_timeout_ms, 3000);
        assert_eq!(config.request_timeout_secs, None);
    }

    #[test]
    fn test_default_inputs() {
        let inputs = ClientConfig::default().default_inputs();
        assert_eq!(inputs.lead_id, "2094");
        assert_eq!(inputs.user_id, "53");
        assert!(inputs.instructions.is_empty());
    }
}

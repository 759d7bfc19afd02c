//! Debate configuration — explicit settings passed into the orchestrator.
//!
//! Settings are constructed once (typically from the environment, the way the
//! original deployment supplies endpoint credentials) and validated before
//! any inference call. There is no ambient global state.

use thiserror::Error;

/// Default number of debate rounds.
pub const DEFAULT_ROUNDS: u32 = 4;

/// Environment variables required for a run, in reporting order.
pub const REQUIRED_ENV_VARS: [&str; 6] = [
    "AGENT_A_BASE_URL",
    "AGENT_A_KEY",
    "AGENT_B_BASE_URL",
    "AGENT_B_KEY",
    "AGENT_MEDIATOR_BASE_URL",
    "AGENT_MEDIATOR_KEY",
];

/// Errors raised before any inference call is made.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("missing required environment variables: {}", .0.join(", "))]
    MissingVars(Vec<String>),

    #[error("configuration value {0} is empty")]
    EmptyValue(&'static str),

    #[error("round count must be positive")]
    ZeroRounds,
}

/// One agent's inference endpoint.
#[derive(Debug, Clone)]
pub struct EndpointConfig {
    pub base_url: String,
    pub api_key: String,
}

/// Everything a debate run needs, resolved up front.
#[derive(Debug, Clone)]
pub struct DebateSettings {
    pub agent_a: EndpointConfig,
    pub agent_b: EndpointConfig,
    pub mediator: EndpointConfig,
    /// Number of rounds to run.
    pub rounds: u32,
    /// Whether streaming mode inserts randomized human-paced delays between
    /// emissions. Disabled in tests.
    pub paced: bool,
}

impl DebateSettings {
    /// Load endpoint credentials from the environment. All missing variables
    /// are reported together, not just the first one.
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut missing = Vec::new();
        let [a_url, a_key, b_url, b_key, m_url, m_key] =
            REQUIRED_ENV_VARS.map(|name| match std::env::var(name) {
                Ok(v) if !v.trim().is_empty() => v,
                _ => {
                    missing.push(name.to_string());
                    String::new()
                }
            });

        let settings = Self {
            agent_a: EndpointConfig {
                base_url: a_url,
                api_key: a_key,
            },
            agent_b: EndpointConfig {
                base_url: b_url,
                api_key: b_key,
            },
            mediator: EndpointConfig {
                base_url: m_url,
                api_key: m_key,
            },
            rounds: DEFAULT_ROUNDS,
            paced: true,
        };

        if missing.is_empty() {
            Ok(settings)
        } else {
            Err(ConfigError::MissingVars(missing))
        }
    }

    /// Fast local precondition check, run by the orchestrator before issuing
    /// any inference call.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let fields: [(&'static str, &str); 6] = [
            ("agent_a.base_url", &self.agent_a.base_url),
            ("agent_a.api_key", &self.agent_a.api_key),
            ("agent_b.base_url", &self.agent_b.base_url),
            ("agent_b.api_key", &self.agent_b.api_key),
            ("mediator.base_url", &self.mediator.base_url),
            ("mediator.api_key", &self.mediator.api_key),
        ];
        for (name, value) in fields {
            if value.trim().is_empty() {
                return Err(ConfigError::EmptyValue(name));
            }
        }
        if self.rounds == 0 {
            return Err(ConfigError::ZeroRounds);
        }
        Ok(())
    }
}

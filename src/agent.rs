//! Debate participants — identities, invocation parameters, and the roster.

use serde::{Deserialize, Serialize};

use crate::config::DebateSettings;
use crate::prompts;

/// Identity of a participant in the debate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AgentName {
    /// General-knowledge debater.
    A,
    /// Knowledge-base-only debater.
    B,
    /// Neutral moderator.
    Mediator,
}

impl std::fmt::Display for AgentName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::A => write!(f, "A"),
            Self::B => write!(f, "B"),
            Self::Mediator => write!(f, "Mediator"),
        }
    }
}

/// Invocation parameters for one agent. Immutable for the lifetime of a run.
#[derive(Debug, Clone)]
pub struct AgentProfile {
    pub name: AgentName,
    pub base_url: String,
    pub api_key: String,
    /// Sampling temperature.
    pub temperature: f64,
    /// Maximum output length in tokens.
    pub max_tokens: u32,
}

/// The three participants of a debate run.
#[derive(Debug, Clone)]
pub struct AgentRoster {
    pub a: AgentProfile,
    pub b: AgentProfile,
    pub mediator: AgentProfile,
}

impl AgentRoster {
    /// Build the roster from validated settings. Sampling parameters are
    /// fixed per role: debaters run slightly warmer than the mediator.
    pub fn from_settings(settings: &DebateSettings) -> Self {
        Self {
            a: AgentProfile {
                name: AgentName::A,
                base_url: settings.agent_a.base_url.clone(),
                api_key: settings.agent_a.api_key.clone(),
                temperature: 0.35,
                max_tokens: 800,
            },
            b: AgentProfile {
                name: AgentName::B,
                base_url: settings.agent_b.base_url.clone(),
                api_key: settings.agent_b.api_key.clone(),
                temperature: 0.35,
                max_tokens: 800,
            },
            mediator: AgentProfile {
                name: AgentName::Mediator,
                base_url: settings.mediator.base_url.clone(),
                api_key: settings.mediator.api_key.clone(),
                temperature: 0.3,
                max_tokens: 700,
            },
        }
    }

    /// Fixed persona (system prompt) for a participant.
    pub fn persona(name: AgentName) -> &'static str {
        match name {
            AgentName::A => prompts::DEBATER_A_PERSONA,
            AgentName::B => prompts::DEBATER_B_PERSONA,
            AgentName::Mediator => prompts::MEDIATOR_PERSONA,
        }
    }
}

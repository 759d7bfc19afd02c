//! Transcript model — the ordered record of one debate run.

use serde::{Deserialize, Serialize};

use crate::agent::AgentName;
use crate::client::Citation;

/// Phase tag on a transcript entry. Serialized names match the wire format
/// consumed by existing clients.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    /// Mediator's opening restatement of the topic (streaming variant).
    Framing,
    /// A debater's answer for a round.
    Answer,
    /// Mediator's per-round summary (streaming variant).
    #[serde(rename = "Round Recap")]
    RoundRecap,
    /// Mediator's handoff into the next round (streaming variant).
    #[serde(rename = "Next Round")]
    NextRound,
    /// Mediator's per-round note (batch variant).
    #[serde(rename = "Moderator Note")]
    ModeratorNote,
    /// Mediator's framing-plus-initial-prompts response (batch variant).
    Prompts,
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Framing => write!(f, "Framing"),
            Self::Answer => write!(f, "Answer"),
            Self::RoundRecap => write!(f, "Round Recap"),
            Self::NextRound => write!(f, "Next Round"),
            Self::ModeratorNote => write!(f, "Moderator Note"),
            Self::Prompts => write!(f, "Prompts"),
        }
    }
}

/// One emitted turn. Created exactly once when its inference call resolves;
/// never modified afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranscriptEntry {
    pub role: AgentName,
    /// 1-indexed round number.
    pub round: u32,
    pub phase: Phase,
    pub text: String,
    pub citations: Vec<Citation>,
}

/// The complete ordered record of one debate run.
pub type Transcript = Vec<TranscriptEntry>;

/// Streaming-mode sink: invoked once per entry, in emission order,
/// fire-and-forget.
pub type EntrySink = dyn Fn(TranscriptEntry) + Send + Sync;

//! rostrum — moderated two-debater LLM debate orchestration.
//!
//! Three agents participate in a run: debater A (general knowledge), debater
//! B (knowledge-base-only with mandatory citations), and a Mediator that
//! frames the topic, recaps each round, and hands the next instructions to
//! both debaters via `[A_PROMPT]`/`[B_PROMPT]` blocks parsed out of its own
//! free-text output.
//!
//! The core is [`orchestrator::DebateOrchestrator`]: a fixed round protocol
//! with exactly one concurrent join point per round (the two debater calls),
//! producing an ordered [`transcript::Transcript`] either as a batch result
//! or streamed entry-by-entry through a sink. [`server`] exposes the
//! streaming mode over HTTP/SSE; the `rostrum` binary exposes the batch mode
//! on the command line.

pub mod agent;
pub mod client;
pub mod config;
pub mod conversation;
pub mod extract;
pub mod orchestrator;
pub mod prompts;
pub mod server;
pub mod transcript;

pub use agent::{AgentName, AgentProfile, AgentRoster};
pub use client::{
    AgentReply, ChatMessage, Citation, ClientError, HttpInferenceClient, InferenceClient, Role,
};
pub use config::{ConfigError, DebateSettings, EndpointConfig, DEFAULT_ROUNDS};
pub use conversation::Conversation;
pub use extract::{extract_prompts, framing_text, ExtractedPrompts};
pub use orchestrator::{DebateError, DebateOrchestrator, DebateOutcome, Variant};
pub use transcript::{EntrySink, Phase, Transcript, TranscriptEntry};

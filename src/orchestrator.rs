//! Round orchestrator — drives the mediator/debater protocol for one run.
//!
//! One parameterized implementation serves both emission modes: `Batch`
//! accumulates the transcript and returns it; `Streaming` additionally pushes
//! every entry through a sink the moment it is produced, splits the
//! mediator's framing into its own entry, emits a `Next Round` entry between
//! rounds, and paces emissions with randomized delays.
//!
//! # Protocol
//!
//! ```text
//! framing (Mediator) ──► extract [A_PROMPT]/[B_PROMPT]
//!   └─► for r in 1..=rounds:
//!         A ──┐
//!             ├── concurrent, join before proceeding
//!         B ──┘
//!         recap (Mediator)
//!         next instructions (Mediator; streaming: separate call)
//! ```
//!
//! Failure semantics are whole-run: the first inference error aborts and no
//! partial transcript is returned.

use std::ops::Range;
use std::time::Duration;

use rand::Rng;
use thiserror::Error;
use tracing::info;

use crate::agent::{AgentName, AgentProfile, AgentRoster};
use crate::client::{AgentReply, ChatMessage, ClientError, InferenceClient};
use crate::config::{ConfigError, DebateSettings};
use crate::conversation::Conversation;
use crate::extract;
use crate::prompts;
use crate::transcript::{EntrySink, Phase, Transcript, TranscriptEntry};

/// Pacing windows for streaming mode, in milliseconds.
const PACE_BEFORE_B: Range<u64> = 500..1500;
const PACE_BEFORE_RECAP: Range<u64> = 800..2000;
const PACE_BEFORE_NEXT_ROUND: Range<u64> = 1000..2000;

/// Emission mode for one run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Variant {
    /// Accumulate entries; framing and next instructions fold into the
    /// mediator's per-round `Moderator Note`.
    Batch,
    /// Emit entries through a sink as produced, with the framing and
    /// next-instructions steps split into their own entries.
    Streaming,
}

/// Error from a debate run.
#[derive(Debug, Error)]
pub enum DebateError {
    /// Required configuration absent or invalid — raised before any
    /// inference call.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Topic was empty.
    #[error("debate topic must not be empty")]
    EmptyTopic,

    /// An inference call failed; propagated as-is, aborting the run.
    #[error("inference call to agent {agent} failed: {source}")]
    Inference {
        agent: AgentName,
        #[source]
        source: ClientError,
    },
}

/// Result of a completed run.
#[derive(Debug, Clone)]
pub struct DebateOutcome {
    pub topic: String,
    pub transcript: Transcript,
}

/// The debate orchestrator.
///
/// Construct once with validated-at-run-time settings and an inference
/// client, then call [`run`](Self::run) or
/// [`run_streaming`](Self::run_streaming) per topic.
pub struct DebateOrchestrator<C> {
    settings: DebateSettings,
    roster: AgentRoster,
    client: C,
}

impl<C: InferenceClient> DebateOrchestrator<C> {
    pub fn new(settings: DebateSettings, client: C) -> Self {
        let roster = AgentRoster::from_settings(&settings);
        Self {
            settings,
            roster,
            client,
        }
    }

    /// The inference client this orchestrator drives.
    pub fn client(&self) -> &C {
        &self.client
    }

    /// Run a batch debate: `1 + 3*rounds` entries, returned all at once.
    pub async fn run(&self, topic: &str) -> Result<DebateOutcome, DebateError> {
        self.run_protocol(topic, Variant::Batch, None).await
    }

    /// Run a streaming debate: `1 + 3*rounds + (rounds - 1)` entries, each
    /// pushed through `sink` in emission order. The returned transcript is
    /// element-wise equal to the sink sequence.
    pub async fn run_streaming(
        &self,
        topic: &str,
        sink: &EntrySink,
    ) -> Result<DebateOutcome, DebateError> {
        self.run_protocol(topic, Variant::Streaming, Some(sink))
            .await
    }

    async fn run_protocol(
        &self,
        topic: &str,
        variant: Variant,
        sink: Option<&EntrySink>,
    ) -> Result<DebateOutcome, DebateError> {
        self.settings.validate()?;
        if topic.trim().is_empty() {
            return Err(DebateError::EmptyTopic);
        }

        let rounds = self.settings.rounds;
        info!(
            topic,
            rounds,
            ?variant,
            prompt_version = prompts::PROMPT_VERSION,
            "starting debate"
        );

        let mut a_conv = Conversation::new(AgentRoster::persona(AgentName::A));
        let mut b_conv = Conversation::new(AgentRoster::persona(AgentName::B));
        let mut m_conv = Conversation::new(AgentRoster::persona(AgentName::Mediator));
        let mut transcript: Transcript = Vec::new();

        // Kickoff: the mediator frames round 1 and proposes the initial
        // instruction blocks. The framing exchange is deliberately not
        // recorded in the mediator's history.
        let framing_request = match variant {
            Variant::Batch => prompts::batch_framing_request(topic),
            Variant::Streaming => prompts::streaming_framing_request(topic),
        };
        let framing = self
            .ask(&self.roster.mediator, m_conv.with_user(&framing_request))
            .await?;

        let framing_entry = match variant {
            Variant::Batch => TranscriptEntry {
                role: AgentName::Mediator,
                round: 1,
                phase: Phase::Prompts,
                text: framing.text.clone(),
                citations: framing.citations.clone(),
            },
            // Only the human-readable framing is emitted; the instruction
            // blocks are parsed out separately below.
            Variant::Streaming => TranscriptEntry {
                role: AgentName::Mediator,
                round: 1,
                phase: Phase::Framing,
                text: extract::framing_text(&framing.text).to_string(),
                citations: framing.citations.clone(),
            },
        };
        emit(&mut transcript, sink, framing_entry);

        let initial = extract::extract_prompts(&framing.text);
        let mut a_prompt = initial.a_or(prompts::OPENING_FALLBACK);
        let mut b_prompt = initial.b_or(prompts::OPENING_FALLBACK);

        for r in 1..=rounds {
            info!(round = r, "debater turns");

            // The one point of true concurrency: both debaters answer in
            // parallel and are joined before the round proceeds. The first
            // failure aborts the round.
            let a_context = a_conv.with_user(&a_prompt);
            let b_context = b_conv.with_user(&b_prompt);
            let (a_reply, b_reply) = tokio::try_join!(
                self.ask(&self.roster.a, a_context),
                self.ask(&self.roster.b, b_context),
            )?;

            emit(
                &mut transcript,
                sink,
                answer_entry(AgentName::A, r, &a_reply),
            );
            if variant == Variant::Streaming {
                self.pace(PACE_BEFORE_B).await;
            }
            emit(
                &mut transcript,
                sink,
                answer_entry(AgentName::B, r, &b_reply),
            );

            a_conv.record_exchange(&a_prompt, &a_reply.text);
            b_conv.record_exchange(&b_prompt, &b_reply.text);

            match variant {
                Variant::Batch => {
                    // One mediator call covers the recap and, on non-final
                    // rounds, the next instruction blocks.
                    let recap_request =
                        prompts::batch_recap_request(r, rounds, &a_reply.text, &b_reply.text);
                    let recap = self
                        .ask(&self.roster.mediator, m_conv.with_user(&recap_request))
                        .await?;
                    emit(
                        &mut transcript,
                        sink,
                        TranscriptEntry {
                            role: AgentName::Mediator,
                            round: r,
                            phase: Phase::ModeratorNote,
                            text: recap.text.clone(),
                            citations: recap.citations.clone(),
                        },
                    );
                    m_conv.record_exchange(&recap_request, &recap.text);

                    if r < rounds {
                        let next = extract::extract_prompts(&recap.text);
                        a_prompt = next.a_or(prompts::REBUTTAL_FALLBACK);
                        b_prompt = next.b_or(prompts::REBUTTAL_FALLBACK);
                    }
                }
                Variant::Streaming => {
                    let recap_request =
                        prompts::streaming_recap_request(r, &a_reply.text, &b_reply.text);
                    let recap = self
                        .ask(&self.roster.mediator, m_conv.with_user(&recap_request))
                        .await?;
                    self.pace(PACE_BEFORE_RECAP).await;
                    emit(
                        &mut transcript,
                        sink,
                        TranscriptEntry {
                            role: AgentName::Mediator,
                            round: r,
                            phase: Phase::RoundRecap,
                            text: recap.text.clone(),
                            citations: recap.citations.clone(),
                        },
                    );
                    m_conv.record_exchange(&recap_request, &recap.text);

                    if r < rounds {
                        self.pace(PACE_BEFORE_NEXT_ROUND).await;
                        let next_request = prompts::next_round_request(r);
                        let next = self
                            .ask(&self.roster.mediator, m_conv.with_user(&next_request))
                            .await?;
                        emit(
                            &mut transcript,
                            sink,
                            TranscriptEntry {
                                role: AgentName::Mediator,
                                round: r,
                                phase: Phase::NextRound,
                                text: next.text.clone(),
                                citations: next.citations.clone(),
                            },
                        );
                        m_conv.record_exchange(&next_request, &next.text);

                        let extracted = extract::extract_prompts(&next.text);
                        a_prompt = extracted.a_or(&prompts::generic_round_instruction(r + 1));
                        b_prompt = extracted.b_or(&prompts::generic_round_instruction(r + 1));
                    }
                }
            }
        }

        info!(entries = transcript.len(), "debate complete");
        Ok(DebateOutcome {
            topic: topic.to_string(),
            transcript,
        })
    }

    async fn ask(
        &self,
        profile: &AgentProfile,
        messages: Vec<ChatMessage>,
    ) -> Result<AgentReply, DebateError> {
        self.client
            .complete(profile, &messages)
            .await
            .map_err(|source| DebateError::Inference {
                agent: profile.name,
                source,
            })
    }

    /// Randomized human-paced delay; no-op unless pacing is enabled.
    async fn pace(&self, window_ms: Range<u64>) {
        if !self.settings.paced {
            return;
        }
        let ms = rand::thread_rng().gen_range(window_ms);
        tokio::time::sleep(Duration::from_millis(ms)).await;
    }
}

fn answer_entry(role: AgentName, round: u32, reply: &AgentReply) -> TranscriptEntry {
    TranscriptEntry {
        role,
        round,
        phase: Phase::Answer,
        text: reply.text.clone(),
        citations: reply.citations.clone(),
    }
}

/// Append the entry to the transcript and, in streaming mode, push a copy
/// through the sink. Sink order therefore always matches transcript order.
fn emit(transcript: &mut Transcript, sink: Option<&EntrySink>, entry: TranscriptEntry) {
    if let Some(sink) = sink {
        sink(entry.clone());
    }
    transcript.push(entry);
}

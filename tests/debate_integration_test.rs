//! Mocked debate integration tests — exercise the full round protocol with a
//! deterministic stub inference client (no LLM calls, no network).
//!
//! Covers: transcript shape and ordering for both variants, sink/transcript
//! equality, prompt extraction handoff and fallbacks, conversation-history
//! growth, fail-fast configuration checks, per-round debater concurrency,
//! and whole-run failure propagation.

use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use async_trait::async_trait;

use rostrum::agent::{AgentName, AgentProfile};
use rostrum::client::{AgentReply, ChatMessage, Citation, ClientError, InferenceClient};
use rostrum::config::{ConfigError, DebateSettings, EndpointConfig};
use rostrum::orchestrator::{DebateError, DebateOrchestrator};
use rostrum::transcript::{Phase, TranscriptEntry};

#[derive(Debug, Clone)]
struct CallRecord {
    agent: AgentName,
    started: Instant,
    /// Number of messages in the context window sent with the call.
    context_len: usize,
    /// Content of the final (user) message of the context window.
    last_user: String,
}

/// Deterministic stand-in for the inference service.
struct StubClient {
    calls: Mutex<Vec<CallRecord>>,
    /// Whether mediator responses carry [A_PROMPT]/[B_PROMPT] blocks.
    with_markers: bool,
    /// Artificial latency per call, for overlap observation.
    delay: Option<Duration>,
    /// Agent whose calls fail.
    fail_agent: Option<AgentName>,
}

impl StubClient {
    fn new(with_markers: bool) -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            with_markers,
            delay: None,
            fail_agent: None,
        }
    }

    fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    fn failing_for(mut self, agent: AgentName) -> Self {
        self.fail_agent = Some(agent);
        self
    }

    fn calls(&self) -> Vec<CallRecord> {
        self.calls.lock().unwrap().clone()
    }

    fn calls_for(&self, agent: AgentName) -> Vec<CallRecord> {
        self.calls()
            .into_iter()
            .filter(|c| c.agent == agent)
            .collect()
    }
}

#[async_trait]
impl InferenceClient for StubClient {
    async fn complete(
        &self,
        profile: &AgentProfile,
        messages: &[ChatMessage],
    ) -> Result<AgentReply, ClientError> {
        self.calls.lock().unwrap().push(CallRecord {
            agent: profile.name,
            started: Instant::now(),
            context_len: messages.len(),
            last_user: messages.last().map(|m| m.content.clone()).unwrap_or_default(),
        });

        if self.fail_agent == Some(profile.name) {
            return Err(ClientError::RequestFailed("stub failure".into()));
        }
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        let (text, citations) = match profile.name {
            AgentName::Mediator if self.with_markers => (
                "Debaters, the user wants to know whether the motion holds. Let's begin!\n\
                 [A_PROMPT]\nArgue in favor, citing sources.\n\
                 [B_PROMPT]\nArgue against, citing the knowledge base."
                    .to_string(),
                vec![],
            ),
            AgentName::Mediator => ("The moderator summarizes the round.".to_string(), vec![]),
            AgentName::A => ("Debater A presents evidence.".to_string(), vec![]),
            AgentName::B => (
                "Debater B counters: 'freedom' [book.txt, chunk 4].".to_string(),
                vec![Citation {
                    filename: "book.txt".into(),
                    chunk: 4,
                    snippet: Some("freedom is a burden".into()),
                }],
            ),
        };
        Ok(AgentReply { text, citations })
    }
}

fn settings(rounds: u32) -> DebateSettings {
    DebateSettings {
        agent_a: EndpointConfig {
            base_url: "http://a.test/v1".into(),
            api_key: "key-a".into(),
        },
        agent_b: EndpointConfig {
            base_url: "http://b.test/v1".into(),
            api_key: "key-b".into(),
        },
        mediator: EndpointConfig {
            base_url: "http://m.test/v1".into(),
            api_key: "key-m".into(),
        },
        rounds,
        paced: false,
    }
}

fn phases(transcript: &[TranscriptEntry]) -> Vec<Phase> {
    transcript.iter().map(|e| e.phase).collect()
}

// ── Batch transcript shape ─────────────────────────────────────────

#[tokio::test]
async fn test_batch_transcript_length_and_order() {
    let orch = DebateOrchestrator::new(settings(3), StubClient::new(true));
    let outcome = orch.run("Is the motion true?").await.unwrap();

    // 1 framing/prompts entry + 3 per round.
    assert_eq!(outcome.transcript.len(), 1 + 3 * 3);
    assert_eq!(outcome.transcript[0].role, AgentName::Mediator);
    assert_eq!(outcome.transcript[0].phase, Phase::Prompts);
    assert_eq!(outcome.transcript[0].round, 1);

    for r in 1..=3u32 {
        let base = 1 + 3 * (r as usize - 1);
        let (a, b, m) = (
            &outcome.transcript[base],
            &outcome.transcript[base + 1],
            &outcome.transcript[base + 2],
        );
        // Within a round: A before B before Mediator, all tagged with r.
        assert_eq!((a.role, a.phase, a.round), (AgentName::A, Phase::Answer, r));
        assert_eq!((b.role, b.phase, b.round), (AgentName::B, Phase::Answer, r));
        assert_eq!(
            (m.role, m.phase, m.round),
            (AgentName::Mediator, Phase::ModeratorNote, r)
        );
    }
}

#[tokio::test]
async fn test_batch_single_round_end_to_end() {
    let client = StubClient::new(true);
    let orch = DebateOrchestrator::new(settings(1), client);
    let outcome = orch.run("Is X true?").await.unwrap();

    // 1 framing + A + B + 1 mediator note; no Next Round entry since r == rounds.
    assert_eq!(outcome.transcript.len(), 4);
    assert!(!phases(&outcome.transcript).contains(&Phase::NextRound));
    assert_eq!(outcome.topic, "Is X true?");

    // Exactly 4 calls: framing, A, B, recap.
    assert_eq!(orch.client().calls().len(), 4);
}

#[tokio::test]
async fn test_citations_propagate_to_entries() {
    let orch = DebateOrchestrator::new(settings(1), StubClient::new(true));
    let outcome = orch.run("Is X true?").await.unwrap();

    let b_entry = outcome
        .transcript
        .iter()
        .find(|e| e.role == AgentName::B)
        .unwrap();
    assert_eq!(b_entry.citations.len(), 1);
    assert_eq!(b_entry.citations[0].filename, "book.txt");
    assert_eq!(b_entry.citations[0].chunk, 4);
}

// ── Streaming: entry set and sink equality ─────────────────────────

#[tokio::test]
async fn test_streaming_sink_matches_transcript() {
    let orch = DebateOrchestrator::new(settings(2), StubClient::new(true));
    let captured: Arc<Mutex<Vec<TranscriptEntry>>> = Arc::new(Mutex::new(Vec::new()));
    let captured_by_sink = Arc::clone(&captured);
    let sink = move |entry: TranscriptEntry| captured_by_sink.lock().unwrap().push(entry);

    let outcome = orch.run_streaming("Is X true?", &sink).await.unwrap();

    // 1 framing + 3 per round + one Next Round for every round but the last.
    assert_eq!(outcome.transcript.len(), 1 + 3 * 2 + 1);
    assert_eq!(*captured.lock().unwrap(), outcome.transcript);

    assert_eq!(
        phases(&outcome.transcript),
        vec![
            Phase::Framing,
            Phase::Answer,
            Phase::Answer,
            Phase::RoundRecap,
            Phase::NextRound,
            Phase::Answer,
            Phase::Answer,
            Phase::RoundRecap,
        ]
    );

    // The Next Round entry belongs to the round it closes.
    let next = outcome
        .transcript
        .iter()
        .find(|e| e.phase == Phase::NextRound)
        .unwrap();
    assert_eq!(next.round, 1);
}

#[tokio::test]
async fn test_streaming_framing_entry_excludes_prompt_blocks() {
    let orch = DebateOrchestrator::new(settings(1), StubClient::new(true));
    let sink = |_: TranscriptEntry| {};
    let outcome = orch.run_streaming("Is X true?", &sink).await.unwrap();

    let framing = &outcome.transcript[0];
    assert_eq!(framing.phase, Phase::Framing);
    assert!(framing.text.contains("Let's begin!"));
    assert!(!framing.text.contains("[A_PROMPT]"));
    assert!(!framing.text.contains("[B_PROMPT]"));
}

// ── Prompt handoff ─────────────────────────────────────────────────

#[tokio::test]
async fn test_extracted_prompts_reach_debaters() {
    let orch = DebateOrchestrator::new(settings(1), StubClient::new(true));
    orch.run("Is X true?").await.unwrap();

    let a_calls = orch.client().calls_for(AgentName::A);
    assert_eq!(a_calls[0].last_user, "Argue in favor, citing sources.");
    let b_calls = orch.client().calls_for(AgentName::B);
    assert_eq!(b_calls[0].last_user, "Argue against, citing the knowledge base.");
}

#[tokio::test]
async fn test_extraction_miss_falls_back_to_defaults() {
    // Mediator never produces marker blocks.
    let orch = DebateOrchestrator::new(settings(2), StubClient::new(false));
    orch.run("Is X true?").await.unwrap();

    let a_calls = orch.client().calls_for(AgentName::A);
    assert_eq!(
        a_calls[0].last_user,
        "Present an opening statement with quotes and citations."
    );
    assert_eq!(a_calls[1].last_user, "Respond briefly with quotes + citations.");
}

#[tokio::test]
async fn test_streaming_extraction_miss_uses_round_instruction() {
    let orch = DebateOrchestrator::new(settings(2), StubClient::new(false));
    let sink = |_: TranscriptEntry| {};
    orch.run_streaming("Is X true?", &sink).await.unwrap();

    let a_calls = orch.client().calls_for(AgentName::A);
    assert_eq!(
        a_calls[1].last_user,
        "Present your argument for round 2 with specific quotes and citations."
    );
}

// ── Conversation-history growth ────────────────────────────────────

#[tokio::test]
async fn test_debater_context_grows_two_messages_per_round() {
    let rounds = 3u32;
    let orch = DebateOrchestrator::new(settings(rounds), StubClient::new(true));
    orch.run("Is X true?").await.unwrap();

    // Round r call context: 1 system + 2 per completed round + this round's
    // user prompt = 2r messages; history after the run is 1 + 2*rounds.
    for agent in [AgentName::A, AgentName::B] {
        let calls = orch.client().calls_for(agent);
        assert_eq!(calls.len(), rounds as usize);
        for (i, call) in calls.iter().enumerate() {
            assert_eq!(call.context_len, 2 * (i + 1), "agent {agent} round {}", i + 1);
        }
    }

    // Mediator: framing (2 messages, never recorded) then one recap per
    // round, each carrying the prior recap exchanges.
    let m_calls = orch.client().calls_for(AgentName::Mediator);
    assert_eq!(m_calls.len(), 1 + rounds as usize);
    assert_eq!(m_calls[0].context_len, 2);
    for (i, call) in m_calls.iter().skip(1).enumerate() {
        assert_eq!(call.context_len, 2 * (i + 1));
    }
}

#[tokio::test]
async fn test_streaming_mediator_history_includes_next_round_exchanges() {
    let rounds = 3u32;
    let orch = DebateOrchestrator::new(settings(rounds), StubClient::new(true));
    let sink = |_: TranscriptEntry| {};
    orch.run_streaming("Is X true?", &sink).await.unwrap();

    // Debaters grow exactly as in batch mode: round r call sees 2r messages.
    for agent in [AgentName::A, AgentName::B] {
        let calls = orch.client().calls_for(agent);
        assert_eq!(calls.len(), rounds as usize);
        for (i, call) in calls.iter().enumerate() {
            assert_eq!(call.context_len, 2 * (i + 1), "agent {agent} round {}", i + 1);
        }
    }

    // Mediator: framing (2 messages, never recorded), then alternating recap
    // and next-round calls, each recorded as an exchange. With 3 rounds that
    // is recap-1, next-1, recap-2, next-2, recap-3: contexts 2, 4, 6, 8, 10.
    let m_calls = orch.client().calls_for(AgentName::Mediator);
    assert_eq!(m_calls.len(), 1 + rounds as usize + (rounds as usize - 1));
    assert_eq!(m_calls[0].context_len, 2);
    for (i, call) in m_calls.iter().skip(1).enumerate() {
        assert_eq!(call.context_len, 2 * (i + 1), "mediator call {}", i + 1);
    }
}

// ── Fail-fast preconditions ────────────────────────────────────────

#[tokio::test]
async fn test_invalid_config_fails_before_any_call() {
    let mut bad = settings(2);
    bad.mediator.api_key = String::new();
    let orch = DebateOrchestrator::new(bad, StubClient::new(true));

    let err = orch.run("Is X true?").await.unwrap_err();
    assert!(matches!(
        err,
        DebateError::Config(ConfigError::EmptyValue("mediator.api_key"))
    ));
    // The precondition check is local: the call counter never moved.
    assert_eq!(orch.client().calls().len(), 0);
}

#[tokio::test]
async fn test_empty_topic_rejected_without_calls() {
    let orch = DebateOrchestrator::new(settings(2), StubClient::new(true));
    let err = orch.run("   ").await.unwrap_err();
    assert!(matches!(err, DebateError::EmptyTopic));
    assert_eq!(orch.client().calls().len(), 0);
}

// ── Concurrency ────────────────────────────────────────────────────

#[tokio::test]
async fn test_debater_calls_overlap_within_a_round() {
    let delay = Duration::from_millis(200);
    let orch = DebateOrchestrator::new(settings(1), StubClient::new(true).with_delay(delay));
    orch.run("Is X true?").await.unwrap();

    let a = &orch.client().calls_for(AgentName::A)[0];
    let b = &orch.client().calls_for(AgentName::B)[0];
    let gap = if a.started > b.started {
        a.started - b.started
    } else {
        b.started - a.started
    };
    // Issued without waiting for one another: both start well inside the
    // other's 200ms call window.
    assert!(gap < delay, "debater calls did not overlap (gap {gap:?})");
}

// ── Failure propagation ────────────────────────────────────────────

#[tokio::test]
async fn test_inference_failure_aborts_run() {
    let orch = DebateOrchestrator::new(
        settings(2),
        StubClient::new(true).failing_for(AgentName::B),
    );
    let err = orch.run("Is X true?").await.unwrap_err();
    match err {
        DebateError::Inference { agent, .. } => assert_eq!(agent, AgentName::B),
        other => panic!("expected inference error, got {other}"),
    }
}

#[tokio::test]
async fn test_streaming_failure_ends_stream_without_terminal_entries() {
    let orch = DebateOrchestrator::new(
        settings(2),
        StubClient::new(true).failing_for(AgentName::Mediator),
    );
    let captured: Arc<Mutex<Vec<TranscriptEntry>>> = Arc::new(Mutex::new(Vec::new()));
    let captured_by_sink = Arc::clone(&captured);
    let sink = move |entry: TranscriptEntry| captured_by_sink.lock().unwrap().push(entry);

    // The very first mediator (framing) call fails: no transcript, no
    // partial emissions.
    let err = orch.run_streaming("Is X true?", &sink).await.unwrap_err();
    assert!(matches!(err, DebateError::Inference { .. }));
    assert!(captured.lock().unwrap().is_empty());
}

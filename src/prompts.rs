//! Prompt constants and builders for each debate role.
//!
//! Prompt versioning: bump `PROMPT_VERSION` whenever persona or protocol
//! prompt content changes, so a logged run can be traced back to the prompt
//! set that produced it.

/// Prompt version. Bump on any persona or protocol prompt change.
pub const PROMPT_VERSION: &str = "1.2.0";

/// Debater A: general-knowledge assistant, brief and factual.
pub const DEBATER_A_PERSONA: &str = "You are a helpful assistant. Provide general \
information about literature and cite sources when possible. Keep responses brief \
and factual.";

/// Debater B: strict knowledge-base-only rules with mandatory citations.
///
/// The explicit "no relevant content" sentence matters downstream: it lets a
/// consumer distinguish an agent that has nothing to say (valid content) from
/// an inference failure (an error).
pub const DEBATER_B_PERSONA: &str = "Use ONLY the KB; quote short phrases and add \
[filename, chunk #] for every claim. If evidence is thin, say so. If you have NO \
relevant content in your knowledge base about the topic, respond with: 'I have no \
relevant content about this topic in my knowledge base.'";

/// Mediator: structured moderator that frames rounds, recaps, and issues the
/// next instruction blocks for both debaters.
pub const MEDIATOR_PERSONA: &str = "You are a neutral debate moderator addressing \
the debaters directly. Structure your responses as follows:\n\
1. Round framing: 'Debaters, the user wants to know [restated topic]. Let's begin round X!'\n\
2. Round recap: summarize what each debater said and note agreements/disagreements\n\
3. Next round prompts: NEW instructions for A and B as [A_PROMPT] ... [B_PROMPT] ...\n\
Enforce brevity (6-10 sentences), short quotes, mandatory [filename, chunk #] for \
claims, and no off-corpus speculation.";

/// Fallback instruction when the mediator's framing yields no prompt block.
pub const OPENING_FALLBACK: &str =
    "Present an opening statement with quotes and citations.";

/// Fallback instruction when a recap yields no next-round prompt block.
pub const REBUTTAL_FALLBACK: &str = "Respond briefly with quotes + citations.";

/// Per-round themes the mediator is nudged toward in streaming mode. Indexed
/// by the round just completed; saturates at the last entry for long debates.
pub const NEXT_ROUND_THEMES: [&str; 3] = [
    "Now it's time for rebuttals! Challenge each other's claims with concrete quotes and citations.",
    "Cross-examine the evidence! Find weaknesses in your opponent's arguments and present counter-evidence.",
    "Final arguments! Make your strongest case and address your opponent's key points.",
];

/// Framing request for the batch variant: restate the topic and emit the
/// initial prompt blocks in the same response.
pub fn batch_framing_request(topic: &str) -> String {
    format!(
        "We will debate: {topic}\nPlease restate the question, then produce initial prompts as:\n[A_PROMPT] ...\n[B_PROMPT] ...\n"
    )
}

/// Framing request for the streaming variant: the human-readable framing is
/// split off before emission, so the prompt blocks ride along after it.
pub fn streaming_framing_request(topic: &str) -> String {
    format!(
        "The user wants to debate: {topic}\nPlease address the debaters directly and say \
         \"Debaters, the user wants to know [restate the topic]. Let's begin round 1!\" \
         Then produce initial prompts as:\n[A_PROMPT] ...\n[B_PROMPT] ...\n"
    )
}

/// Batch recap request: summary plus, on non-final rounds, the next prompt
/// blocks in the same call.
pub fn batch_recap_request(round: u32, rounds: u32, a_text: &str, b_text: &str) -> String {
    let follow = if round < rounds {
        "Summarize agreements/disagreements (with brief citations if needed). Then produce next prompts:\n[A_PROMPT] ...\n[B_PROMPT] ...\nFor this round, demand a specific passage to support or refute a claim."
    } else {
        "Provide a concise closing Moderator Note (no winner)."
    };
    format!("Round {round} answers:\n[AGENT_A]\n{a_text}\n\n[AGENT_B]\n{b_text}\n\n{follow}")
}

/// Streaming recap request: summary only; next instructions come in a
/// separate call.
pub fn streaming_recap_request(round: u32, a_text: &str, b_text: &str) -> String {
    format!(
        "Round {round} is complete. Here's what the debaters said:\n[AGENT_A]\n{a_text}\n\n\
         [AGENT_B]\n{b_text}\n\nPlease provide a brief recap of round {round}. Summarize \
         what each debater said and note any agreements or disagreements."
    )
}

/// Streaming next-round request, themed by the round just completed.
pub fn next_round_request(completed_round: u32) -> String {
    let idx = (completed_round as usize - 1).min(NEXT_ROUND_THEMES.len() - 1);
    format!(
        "Debaters, time for round {}! {}",
        completed_round + 1,
        NEXT_ROUND_THEMES[idx]
    )
}

/// Generic debater instruction for a round, used when extraction misses in
/// streaming mode.
pub fn generic_round_instruction(round: u32) -> String {
    format!("Present your argument for round {round} with specific quotes and citations.")
}

//! Prompt extraction — pulls the per-debater instruction blocks out of the
//! mediator's free-text output.
//!
//! The mediator is asked to delimit instructions with `[A_PROMPT]` and
//! `[B_PROMPT]`, but a language model is not guaranteed to comply. A missing
//! marker is therefore an expected outcome, represented as `None` rather than
//! an error; callers substitute a documented default.

use std::sync::LazyLock;

use regex::Regex;

/// Marker opening debater A's instruction block.
pub const A_MARKER: &str = "[A_PROMPT]";
/// Marker opening debater B's instruction block.
pub const B_MARKER: &str = "[B_PROMPT]";

static A_BLOCK_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)\[A_PROMPT\](.*?)(?:\[B_PROMPT\]|$)").expect("A_BLOCK_RE regex should compile")
});

static B_BLOCK_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)\[B_PROMPT\](.*?)(?:\[A_PROMPT\]|$)").expect("B_BLOCK_RE regex should compile")
});

/// Instruction blocks extracted from one mediator response. `None` means the
/// marker was absent (or its block was blank).
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ExtractedPrompts {
    pub a: Option<String>,
    pub b: Option<String>,
}

impl ExtractedPrompts {
    /// Debater A's instruction, or `default` on an extraction miss.
    pub fn a_or(&self, default: &str) -> String {
        self.a.clone().unwrap_or_else(|| default.to_string())
    }

    /// Debater B's instruction, or `default` on an extraction miss.
    pub fn b_or(&self, default: &str) -> String {
        self.b.clone().unwrap_or_else(|| default.to_string())
    }
}

/// Scan mediator output for the two instruction blocks.
///
/// Each block runs from its marker to the other marker or end of text,
/// trimmed of surrounding whitespace. Blank blocks normalize to `None`.
pub fn extract_prompts(text: &str) -> ExtractedPrompts {
    ExtractedPrompts {
        a: capture_block(&A_BLOCK_RE, text),
        b: capture_block(&B_BLOCK_RE, text),
    }
}

/// The human-readable framing portion of a mediator response: everything
/// before the first instruction marker, trimmed.
pub fn framing_text(text: &str) -> &str {
    let cut = match (text.find(A_MARKER), text.find(B_MARKER)) {
        (Some(a), Some(b)) => a.min(b),
        (Some(a), None) => a,
        (None, Some(b)) => b,
        (None, None) => text.len(),
    };
    text[..cut].trim()
}

fn capture_block(re: &Regex, text: &str) -> Option<String> {
    let block = re.captures(text)?.get(1)?.as_str().trim();
    if block.is_empty() {
        None
    } else {
        Some(block.to_string())
    }
}

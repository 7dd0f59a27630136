//! Resolve a free-text reply to the pending ideas it asks about.
//!
//! Rules, first applicable wins per idea:
//!
//! 1. The whole reply (trimmed, lowercased) is a "send everything" phrase:
//!    every pending idea, no further checks.
//! 2. The idea name appears in the reply.
//! 3. Every significant word of the name appears in the reply. Stop words
//!    and words of two letters or fewer are ignored.
//! 4. The reply contains a standalone digit equal to the idea's 1-based
//!    position in the pending list.
//!
//! Matching is case-insensitive. Each idea appears at most once in the
//! output, in pending order.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;

use ideapost_types::Idea;
use ideapost_types::state::PendingIdeas;

/// Whole-reply phrases that request every pending idea.
pub const SEND_ALL_PHRASES: &[&str] = &["all", "send all", "all ideas", "everything", "yes", "send me all"];

/// Name words too common to identify an idea on their own.
pub const STOP_WORDS: &[&str] = &["nepal", "ai", "the", "for", "and", "pro", "app", "my", "a", "an"];

static SINGLE_DIGIT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(\d)\b").expect("static regex"));

/// Whether the reply as a whole asks for everything.
pub fn is_send_all(reply_body: &str) -> bool {
    let normalized = reply_body.trim().to_lowercase();
    SEND_ALL_PHRASES.contains(&normalized.as_str())
}

fn significant_words(name_lower: &str) -> Vec<&str> {
    name_lower
        .split_whitespace()
        .filter(|w| !STOP_WORDS.contains(w) && w.chars().count() > 2)
        .collect()
}

fn mentions(reply_lower: &str, name: &str) -> bool {
    let name_lower = name.to_lowercase();
    if name_lower.trim().is_empty() {
        return false;
    }
    if reply_lower.contains(&name_lower) {
        return true;
    }
    let words = significant_words(&name_lower);
    !words.is_empty() && words.iter().all(|w| reply_lower.contains(w))
}

/// Return the pending ideas the reply refers to.
pub fn match_ideas<'a>(reply_body: &str, pending: &'a PendingIdeas) -> Vec<&'a Idea> {
    if is_send_all(reply_body) {
        return pending.iter().map(|(_, idea)| idea).collect();
    }

    let reply_lower = reply_body.to_lowercase();
    let numbers: HashSet<usize> = SINGLE_DIGIT
        .captures_iter(&reply_lower)
        .filter_map(|c| c[1].parse().ok())
        .collect();

    pending
        .iter()
        .enumerate()
        .filter(|(index, (name, _))| mentions(&reply_lower, name) || numbers.contains(&(index + 1)))
        .map(|(_, (_, idea))| idea)
        .collect()
}

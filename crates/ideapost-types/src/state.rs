//! Persistent run state: sent history, pending previews, processed replies.
//!
//! Each record maps to one flat JSON file that is read at the start of an
//! invocation and rewritten wholesale at the end.

use std::collections::HashSet;
use std::fmt;

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::idea::{Idea, IdeaId};

/// One line of the per-run log in `sent_history.json`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunLogEntry {
    /// Run date, `YYYY-MM-DD`.
    pub date: String,
    /// Names of the main ideas sent.
    #[serde(default)]
    pub ideas: Vec<String>,
    /// Names offered as previews (tiered runs only).
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub bonus: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub high_risk: Option<String>,
}

/// Contents of `sent_history.json`.
///
/// `sent_ids` only grows between cycles; [`SentHistory::reset_cycle`] is the
/// single place it shrinks.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SentHistory {
    #[serde(default)]
    pub sent_ids: Vec<IdeaId>,
    #[serde(default)]
    pub log: Vec<RunLogEntry>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cycle_count: Option<u32>,
}

impl SentHistory {
    /// Membership view of `sent_ids`.
    pub fn sent_set(&self) -> HashSet<&IdeaId> {
        self.sent_ids.iter().collect()
    }

    pub fn was_sent(&self, id: &IdeaId) -> bool {
        self.sent_ids.contains(id)
    }

    /// Append an id unless it is already recorded.
    pub fn record_sent(&mut self, id: IdeaId) {
        if !self.was_sent(&id) {
            self.sent_ids.push(id);
        }
    }

    /// Forget every sent id and bump the cycle counter.
    pub fn reset_cycle(&mut self) {
        self.sent_ids.clear();
        self.cycle_count = Some(self.cycle_count.unwrap_or(0) + 1);
    }
}

/// Ordered `name -> idea` mapping. Document order is significant: the reply
/// matcher numbers ideas by their position.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PendingIdeas(Vec<(String, Idea)>);

impl PendingIdeas {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace by name, keeping the original position on replace.
    pub fn insert(&mut self, name: impl Into<String>, idea: Idea) {
        let name = name.into();
        match self.0.iter_mut().find(|(n, _)| *n == name) {
            Some(slot) => slot.1 = idea,
            None => self.0.push((name, idea)),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Idea)> {
        self.0.iter().map(|(n, i)| (n.as_str(), i))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|(n, _)| n.as_str())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<Idea> for PendingIdeas {
    fn from_iter<T: IntoIterator<Item = Idea>>(iter: T) -> Self {
        let mut out = Self::new();
        for idea in iter {
            out.insert(idea.business_name.clone(), idea);
        }
        out
    }
}

impl Serialize for PendingIdeas {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (name, idea) in &self.0 {
            map.serialize_entry(name, idea)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for PendingIdeas {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct OrderedVisitor;

        impl<'de> Visitor<'de> for OrderedVisitor {
            type Value = PendingIdeas;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of idea name to idea record")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut out = PendingIdeas::new();
                while let Some((name, idea)) = access.next_entry::<String, Idea>()? {
                    out.insert(name, idea);
                }
                Ok(out)
            }
        }

        deserializer.deserialize_map(OrderedVisitor)
    }
}

/// Contents of `pending_details.json`: the previews offered by the last run
/// that had bonus ideas.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PendingDetails {
    /// `YYYY-MM-DD`.
    #[serde(default)]
    pub date: String,
    /// Human date used in subjects, e.g. `October 18, 2026`.
    #[serde(default)]
    pub date_display: String,
    #[serde(default)]
    pub ideas: PendingIdeas,
}

/// Contents of `processed_replies.json`. Append-only; guarantees at most one
/// follow-up per inbound message.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProcessedReplies {
    #[serde(default)]
    pub processed_ids: Vec<String>,
}

impl ProcessedReplies {
    pub fn contains(&self, message_id: &str) -> bool {
        self.processed_ids.iter().any(|id| id == message_id)
    }

    /// Record a message id; returns `false` if it was already present.
    pub fn mark(&mut self, message_id: impl Into<String>) -> bool {
        let id = message_id.into();
        if self.contains(&id) {
            return false;
        }
        self.processed_ids.push(id);
        true
    }
}

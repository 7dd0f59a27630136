//! Catalog record types.
//!
//! An [`Idea`] is one entry of `ideas_database.json`. Records are appended by
//! `ideapost import` and otherwise never mutated.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Catalog identifier. Catalog files use both integer and string ids, so
/// both are accepted and written back unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum IdeaId {
    Int(i64),
    Text(String),
}

impl fmt::Display for IdeaId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(n) => write!(f, "{n}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

impl From<i64> for IdeaId {
    fn from(n: i64) -> Self {
        Self::Int(n)
    }
}

impl From<i32> for IdeaId {
    fn from(n: i32) -> Self {
        Self::Int(n.into())
    }
}

impl From<String> for IdeaId {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<&str> for IdeaId {
    fn from(s: &str) -> Self {
        Self::Text(s.to_owned())
    }
}

/// Rough startup cost band. Labels outside Low/Medium/High are kept as-is.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum StartupCost {
    Low,
    #[default]
    Medium,
    High,
    Other(String),
}

impl StartupCost {
    pub fn label(&self) -> &str {
        match self {
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
            Self::Other(s) => s,
        }
    }
}

impl From<String> for StartupCost {
    fn from(s: String) -> Self {
        match s.as_str() {
            "Low" => Self::Low,
            "Medium" => Self::Medium,
            "High" => Self::High,
            _ => Self::Other(s),
        }
    }
}

impl From<StartupCost> for String {
    fn from(c: StartupCost) -> Self {
        match c {
            StartupCost::Other(s) => s,
            other => other.label().to_owned(),
        }
    }
}

impl fmt::Display for StartupCost {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A single business idea from the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Idea {
    pub id: IdeaId,
    pub business_name: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub what_it_does: String,
    #[serde(default)]
    pub where_working: String,
    #[serde(default)]
    pub why_growing: String,
    #[serde(default)]
    pub nepal_adaptation: String,
    #[serde(default)]
    pub monetization: String,
    #[serde(default)]
    pub startup_cost: StartupCost,
    #[serde(default)]
    pub cost_estimate: String,
    #[serde(default)]
    pub action_plan: Vec<String>,
    #[serde(default)]
    pub is_high_risk: bool,

    /// Set on records added by `ideapost import`; drawn first by the
    /// priority selector.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub high_risk_reason: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub high_risk_reward: Option<String>,

    /// Fields this version does not model, carried through on rewrite.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl Idea {
    /// Minimal record, used by tests and fixtures.
    pub fn new(id: impl Into<IdeaId>, business_name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            business_name: business_name.into(),
            category: String::new(),
            what_it_does: String::new(),
            where_working: String::new(),
            why_growing: String::new(),
            nepal_adaptation: String::new(),
            monetization: String::new(),
            startup_cost: StartupCost::default(),
            cost_estimate: String::new(),
            action_plan: Vec::new(),
            is_high_risk: false,
            priority: None,
            high_risk_reason: None,
            high_risk_reward: None,
            extra: serde_json::Map::new(),
        }
    }

    pub fn is_priority(&self) -> bool {
        self.priority == Some(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn id_accepts_int_and_string() {
        let ids: Vec<IdeaId> = serde_json::from_str(r#"[7, "fresh-12"]"#).unwrap();
        assert_eq!(ids[0], IdeaId::Int(7));
        assert_eq!(ids[1], IdeaId::Text("fresh-12".into()));
        assert_eq!(serde_json::to_string(&ids).unwrap(), r#"[7,"fresh-12"]"#);
    }

    #[test]
    fn startup_cost_preserves_unknown_label() {
        let c: StartupCost = serde_json::from_str("\"Low-Medium\"").unwrap();
        assert_eq!(c, StartupCost::Other("Low-Medium".into()));
        assert_eq!(serde_json::to_string(&c).unwrap(), "\"Low-Medium\"");

        let c: StartupCost = serde_json::from_str("\"High\"").unwrap();
        assert_eq!(c, StartupCost::High);
    }

    #[test]
    fn full_record_deserializes() {
        let json = r#"{
            "id": 12,
            "business_name": "Acme Laundry App",
            "category": "Consumer",
            "what_it_does": "On-demand laundry pickup.",
            "where_working": "India",
            "why_growing": "Urban density.",
            "nepal_adaptation": "Kathmandu valley first.",
            "monetization": "Per-kg pricing.",
            "startup_cost": "Low",
            "cost_estimate": "NPR 3-5 Lakhs",
            "action_plan": ["Week 1: survey", "Week 2: pilot"],
            "is_high_risk": false,
            "source_url": "https://example.com"
        }"#;
        let idea: Idea = serde_json::from_str(json).unwrap();
        assert_eq!(idea.id, IdeaId::Int(12));
        assert_eq!(idea.startup_cost, StartupCost::Low);
        assert_eq!(idea.action_plan.len(), 2);
        assert!(!idea.is_priority());
        assert_eq!(idea.extra["source_url"], "https://example.com");

        let back = serde_json::to_value(&idea).unwrap();
        assert_eq!(back["source_url"], "https://example.com");
        assert!(back.get("priority").is_none());
    }

    #[test]
    fn missing_business_name_is_an_error() {
        let res = serde_json::from_str::<Idea>(r#"{"id": 1}"#);
        assert!(res.is_err());
    }
}

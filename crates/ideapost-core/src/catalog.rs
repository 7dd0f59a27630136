//! Merging freshly researched ideas into the catalog.

use std::collections::HashSet;

use tracing::{debug, info};

use ideapost_types::{Idea, IdeaId};

/// Outcome of [`merge_fresh`], names in input order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportReport {
    pub added: Vec<String>,
    pub skipped: Vec<String>,
}

/// Append `fresh` to `existing`, flagging each new record as priority.
///
/// Records whose id is already in the catalog (or earlier in `fresh`) are
/// skipped. Existing records are never modified.
pub fn merge_fresh(existing: &mut Vec<Idea>, fresh: Vec<Idea>) -> ImportReport {
    let mut known: HashSet<IdeaId> = existing.iter().map(|i| i.id.clone()).collect();
    let mut report = ImportReport::default();

    for mut idea in fresh {
        if !known.insert(idea.id.clone()) {
            debug!(id = %idea.id, name = %idea.business_name, "skipping duplicate id");
            report.skipped.push(idea.business_name);
            continue;
        }
        idea.priority = Some(true);
        report.added.push(idea.business_name.clone());
        existing.push(idea);
    }

    info!(
        added = report.added.len(),
        skipped = report.skipped.len(),
        total = existing.len(),
        "catalog merge complete"
    );
    report
}

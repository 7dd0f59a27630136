//! Idea selection policy.
//!
//! Two variants share the same exclusion and cycling rules:
//!
//! - [`select_priority`] draws priority (freshly imported) ideas first, fills
//!   from the rest, then shuffles.
//! - [`select_tiered`] draws main + bonus preview ideas in one sample from the
//!   regular pool, plus one independent high-risk pick.
//!
//! Both take the random source as a parameter; tests pass a seeded
//! [`rand::rngs::StdRng`].
//!
//! A cycle reset happens exactly when the unsent pool is smaller than what
//! the run asks for. It clears the history's sent set and selection proceeds
//! against the whole catalog partition.

use rand::Rng;
use rand::seq::{SliceRandom, index};
use tracing::{debug, warn};

use ideapost_types::Idea;
use ideapost_types::state::SentHistory;

/// Result of one selection pass.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Selection {
    /// Ideas rendered in full.
    pub main: Vec<Idea>,
    /// Ideas offered as previews, detail on request.
    pub bonus: Vec<Idea>,
    /// Optional high-risk/high-reward preview.
    pub high_risk: Option<Idea>,
    /// Whether the sent history was reset to satisfy this run.
    pub cycled: bool,
}

impl Selection {
    pub fn is_empty(&self) -> bool {
        self.main.is_empty() && self.bonus.is_empty() && self.high_risk.is_none()
    }

    /// Every selected idea, main first.
    pub fn all(&self) -> impl Iterator<Item = &Idea> {
        self.main
            .iter()
            .chain(self.bonus.iter())
            .chain(self.high_risk.iter())
    }

    /// Ideas offered for follow-up: bonus previews plus the high-risk pick.
    pub fn previews(&self) -> impl Iterator<Item = &Idea> {
        self.bonus.iter().chain(self.high_risk.iter())
    }
}

/// Requested sizes for [`select_tiered`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TierCounts {
    pub main: usize,
    pub bonus: usize,
}

impl TierCounts {
    pub fn total(&self) -> usize {
        self.main + self.bonus
    }
}

fn unsent<'a>(pool: &[&'a Idea], history: &SentHistory) -> Vec<&'a Idea> {
    let sent = history.sent_set();
    pool.iter()
        .copied()
        .filter(|idea| !sent.contains(&idea.id))
        .collect()
}

/// Sample `amount` items without replacement, in random order.
fn sample<R: Rng + ?Sized>(rng: &mut R, pool: &[&Idea], amount: usize) -> Vec<Idea> {
    let amount = amount.min(pool.len());
    index::sample(rng, pool.len(), amount)
        .into_iter()
        .map(|i| pool[i].clone())
        .collect()
}

/// Pick `count` ideas, preferring those flagged `priority`.
///
/// Returns an empty selection for an empty catalog.
pub fn select_priority<R: Rng + ?Sized>(
    catalog: &[Idea],
    history: &mut SentHistory,
    count: usize,
    rng: &mut R,
) -> Selection {
    let everything: Vec<&Idea> = catalog.iter().collect();
    let mut available = unsent(&everything, history);
    let mut cycled = false;

    if available.len() < count {
        warn!(
            available = available.len(),
            requested = count,
            "cycling catalog, running low on fresh ideas"
        );
        history.reset_cycle();
        available = everything;
        cycled = true;
    }

    let (priority, regular): (Vec<&Idea>, Vec<&Idea>) =
        available.into_iter().partition(|idea| idea.is_priority());

    let mut selected = sample(rng, &priority, count);
    let remaining = count - selected.len();
    if remaining > 0 {
        selected.extend(sample(rng, &regular, remaining));
    }
    selected.shuffle(rng);

    debug!(
        selected = selected.len(),
        priority_pool = priority.len(),
        regular_pool = regular.len(),
        "priority selection done"
    );

    Selection {
        main: selected,
        bonus: Vec::new(),
        high_risk: None,
        cycled,
    }
}

/// Pick main + bonus ideas from the regular pool and one high-risk idea.
///
/// Returns an empty selection for an empty catalog.
pub fn select_tiered<R: Rng + ?Sized>(
    catalog: &[Idea],
    history: &mut SentHistory,
    counts: TierCounts,
    rng: &mut R,
) -> Selection {
    let (high_risk_all, regular_all): (Vec<&Idea>, Vec<&Idea>) =
        catalog.iter().partition(|idea| idea.is_high_risk);

    let mut regular = unsent(&regular_all, history);
    let mut high_risk = unsent(&high_risk_all, history);
    let mut cycled = false;

    if regular.len() < counts.total() {
        warn!(
            available = regular.len(),
            requested = counts.total(),
            "cycling catalog, running low on fresh ideas"
        );
        history.reset_cycle();
        regular = regular_all;
        high_risk = high_risk_all;
        cycled = true;
    }

    let mut drawn = sample(rng, &regular, counts.total());
    let bonus = drawn.split_off(counts.main.min(drawn.len()));
    let high_risk_pick = high_risk.choose(rng).map(|idea| (*idea).clone());

    debug!(
        main = drawn.len(),
        bonus = bonus.len(),
        high_risk = high_risk_pick.is_some(),
        "tiered selection done"
    );

    Selection {
        main: drawn,
        bonus,
        high_risk: high_risk_pick,
        cycled,
    }
}

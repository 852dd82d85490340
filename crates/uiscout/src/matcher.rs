//! Ordinal matching over deduplicated element identities.

use std::collections::HashSet;

use crate::element::{ElementId, ElementSnapshot};
use crate::query::{Query, TextPattern};

/// Identities already counted toward ordinal resolution within one call.
///
/// Scrolling typically overlaps previously-seen elements at the window
/// boundary; this set is what keeps them from being counted twice. Scoped to
/// a single resolution call and discarded with it.
#[derive(Debug, Default)]
pub struct DedupSet {
    ids: HashSet<ElementId>,
}

impl DedupSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, id: ElementId) -> bool {
        self.ids.contains(&id)
    }

    /// Returns `false` if the identity was already present.
    pub fn add(&mut self, id: ElementId) -> bool {
        self.ids.insert(id)
    }

    pub fn clear(&mut self) {
        self.ids.clear();
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

/// Outcome of evaluating one element against the query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchOutcome {
    NotMatch,
    /// The anchor was just satisfied; ordinal counting starts after this
    /// element.
    AnchorFound,
    /// This element is the requested ordinal match.
    Matched,
}

/// Evaluates elements in traversal order, carrying ordinal state across
/// snapshot passes.
///
/// The dedup set accumulates for the whole call so that repeated partial
/// scans (each scroll step re-observes the overlap region) do not re-match
/// the same element. It is cleared only when the anchor is discovered, which
/// restarts counting at the anchor's position in traversal order.
pub struct Matcher {
    pattern: Option<TextPattern>,
    anchor: Option<TextPattern>,
    anchor_found: bool,
    required: u32,
    dedup: DedupSet,
}

impl Matcher {
    pub fn for_query(query: &Query, required: u32) -> Self {
        Self {
            pattern: query.pattern.clone(),
            anchor: query.anchor.clone(),
            anchor_found: false,
            required,
            dedup: DedupSet::new(),
        }
    }

    pub fn evaluate(&mut self, el: &ElementSnapshot) -> MatchOutcome {
        let text = el.text_str();

        if self.anchor.is_some() && !self.anchor_found {
            if let (Some(anchor), Some(text)) = (&self.anchor, text) {
                if anchor.matches(text) {
                    self.anchor_found = true;
                    self.dedup.clear();
                    return MatchOutcome::AnchorFound;
                }
            }
            return MatchOutcome::NotMatch;
        }

        let satisfied = match (&self.pattern, text) {
            (Some(pattern), Some(text)) => pattern.matches(text),
            (Some(_), None) => false,
            // Kind-only query: presence is the predicate.
            (None, _) => true,
        };

        if satisfied && self.dedup.add(el.id) && self.dedup.len() as u32 >= self.required {
            return MatchOutcome::Matched;
        }
        MatchOutcome::NotMatch
    }

    /// Distinct matches counted so far.
    pub fn distinct(&self) -> usize {
        self.dedup.len()
    }

    /// True when an anchor was requested but never reached.
    pub fn anchor_pending(&self) -> bool {
        self.anchor.is_some() && !self.anchor_found
    }
}

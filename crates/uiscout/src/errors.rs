//! Typed failure taxonomy for resolution calls.

use std::time::Duration;

use crate::element::ElementKind;
use crate::surface::SurfaceError;

/// Why a resolution call failed.
///
/// The engine never silently substitutes a different element: every failure
/// mode is reported as its own variant so callers can tell "the text was
/// never there" apart from "it was there, but not often enough" and from
/// "the clock ran out while content was still appearing".
#[derive(Debug, thiserror::Error)]
pub enum ResolveError {
    /// Malformed query, rejected before any polling started.
    #[error("invalid query: {0}")]
    InvalidQuery(String),

    /// Zero distinct matches were ever observed for the requested kind.
    /// `seen` lists the texts that were actually on screen, for diagnostics.
    #[error("{kind} matching {pattern:?} not found; saw texts: {seen:?}")]
    NotFound {
        kind: String,
        pattern: String,
        seen: Vec<String>,
    },

    /// Matches were observed, but fewer than the requested ordinal.
    #[error("{found} matches found for {pattern:?}, required ordinal {required}")]
    PartialMatch {
        pattern: String,
        found: usize,
        required: u32,
    },

    /// Deadline expired while scrolling was still revealing new content, so
    /// the search never reached a settled no-match verdict.
    #[error("timed out after {elapsed:?} resolving {pattern:?}")]
    Timeout { pattern: String, elapsed: Duration },

    /// Index-based resolution selected past the end of the corrected live list.
    #[error("{kind} with index {index} is not available")]
    IndexOutOfRange { kind: ElementKind, index: usize },

    /// The surface failed on every attempt up to the deadline. Transient
    /// surface errors inside the polling window are retried, not surfaced.
    #[error(transparent)]
    Surface(#[from] SurfaceError),
}

impl ResolveError {
    pub(crate) fn not_found(
        kind: Option<ElementKind>,
        pattern: &str,
        seen: impl IntoIterator<Item = String>,
    ) -> Self {
        ResolveError::NotFound {
            kind: kind.map(|k| k.name().to_string()).unwrap_or_else(|| "element".to_string()),
            pattern: pattern.to_string(),
            seen: seen.into_iter().collect(),
        }
    }
}

//! Query values: what to look for, and under which constraints.

use std::time::Duration;

use crate::element::ElementKind;
use crate::errors::ResolveError;

/// Text predicate for a query or an anchor.
#[derive(Debug, Clone)]
pub enum TextPattern {
    /// Exact string equality.
    Literal(String),
    /// Full-match regex: the pattern must consume the entire text, not just a
    /// substring of it.
    Regex { re: regex::Regex, source: String },
}

impl TextPattern {
    pub fn literal(text: impl Into<String>) -> Self {
        TextPattern::Literal(text.into())
    }

    /// Compile a regex pattern. The pattern is anchored at both ends so that
    /// `is_match` has full-match semantics regardless of what the caller
    /// wrote. A pattern that does not compile is an invalid query.
    pub fn regex(source: impl Into<String>) -> Result<Self, ResolveError> {
        let source = source.into();
        let re = regex::Regex::new(&format!(r"\A(?:{source})\z"))
            .map_err(|e| ResolveError::InvalidQuery(format!("bad regex {source:?}: {e}")))?;
        Ok(TextPattern::Regex { re, source })
    }

    pub fn matches(&self, text: &str) -> bool {
        match self {
            TextPattern::Literal(expected) => expected == text,
            TextPattern::Regex { re, .. } => re.is_match(text),
        }
    }

    /// Human-readable form for error messages.
    pub fn describe(&self) -> String {
        match self {
            TextPattern::Literal(s) => s.clone(),
            TextPattern::Regex { source, .. } => format!("/{source}/"),
        }
    }
}

/// One resolution request. Immutable for the duration of the call.
///
/// Built with consuming setters:
///
/// ```
/// use uiscout::{ElementKind, Query};
///
/// let q = Query::text("Save").nth(2).visible_only();
/// let any_button = Query::kind(ElementKind::Button);
/// ```
#[derive(Debug, Clone)]
pub struct Query {
    pub(crate) kind: Option<ElementKind>,
    pub(crate) pattern: Option<TextPattern>,
    /// 1-based ordinal; 0 means "first". Negative values are rejected before
    /// polling starts.
    pub(crate) ordinal: i32,
    pub(crate) only_visible: bool,
    pub(crate) anchor: Option<TextPattern>,
    pub(crate) scroll: bool,
    pub(crate) deadline: Option<Duration>,
}

impl Query {
    /// Query for exact text, defaulting to [`ElementKind::Text`] elements.
    pub fn text(text: impl Into<String>) -> Self {
        Self::new(Some(ElementKind::Text), Some(TextPattern::literal(text)))
    }

    /// Query for a full-match regex over [`ElementKind::Text`] elements.
    pub fn regex(source: impl Into<String>) -> Result<Self, ResolveError> {
        Ok(Self::new(
            Some(ElementKind::Text),
            Some(TextPattern::regex(source)?),
        ))
    }

    /// Query for any element of the given kind, regardless of text.
    pub fn kind(kind: ElementKind) -> Self {
        Self::new(Some(kind), None)
    }

    fn new(kind: Option<ElementKind>, pattern: Option<TextPattern>) -> Self {
        Self {
            kind,
            pattern,
            ordinal: 0,
            only_visible: false,
            anchor: None,
            scroll: true,
            deadline: None,
        }
    }

    /// Restrict to a different element kind (or `None` for any kind).
    pub fn of_kind(mut self, kind: impl Into<Option<ElementKind>>) -> Self {
        self.kind = kind.into();
        self
    }

    /// Require the n-th distinct match, 1-based. 0 keeps the default "first".
    pub fn nth(mut self, ordinal: i32) -> Self {
        self.ordinal = ordinal;
        self
    }

    /// Only consider elements inside their scroll container's visible window.
    pub fn visible_only(mut self) -> Self {
        self.only_visible = true;
        self
    }

    /// Do not scroll; resolve against what is currently materialized.
    pub fn no_scroll(mut self) -> Self {
        self.scroll = false;
        self
    }

    /// Start ordinal counting only after an element matching `anchor` has
    /// been passed in traversal order.
    pub fn after(mut self, anchor: TextPattern) -> Self {
        self.anchor = Some(anchor);
        self
    }

    /// Shorthand for [`Query::after`] with a literal anchor.
    pub fn after_text(self, anchor: impl Into<String>) -> Self {
        self.after(TextPattern::literal(anchor))
    }

    /// Per-call deadline override.
    pub fn within(mut self, deadline: Duration) -> Self {
        self.deadline = Some(deadline);
        self
    }

    /// Fail-fast contract check; returns the effective 1-based ordinal.
    pub(crate) fn validate(&self) -> Result<u32, ResolveError> {
        if self.ordinal < 0 {
            return Err(ResolveError::InvalidQuery(format!(
                "ordinal must be positive, got {}",
                self.ordinal
            )));
        }
        Ok((self.ordinal as u32).max(1))
    }

    pub(crate) fn describe_pattern(&self) -> String {
        let base = match &self.pattern {
            Some(p) => p.describe(),
            None => match self.kind {
                Some(k) => format!("any {k}"),
                None => "any element".to_string(),
            },
        };
        match &self.anchor {
            Some(a) => format!("{base} after {}", a.describe()),
            None => base,
        }
    }
}

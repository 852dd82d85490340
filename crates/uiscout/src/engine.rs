//! The resolution engine: deadline-bounded polling over live snapshots.

use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::Duration;

use tokio::time::{sleep, Instant};
use tracing::{debug, instrument};

use crate::element::{ElementId, ElementKind, ElementSnapshot};
use crate::errors::ResolveError;
use crate::matcher::{DedupSet, MatchOutcome, Matcher};
use crate::query::Query;
use crate::scroller::{Direction, Scroller};
use crate::surface::UiSurface;
use crate::visibility::is_sufficiently_visible;

/// Default deadline for text/kind resolution.
pub const DEFAULT_DEADLINE: Duration = Duration::from_secs(20);
/// Deadline for the cheaper waits (index resolution, identity waits).
pub const SHORT_DEADLINE: Duration = Duration::from_secs(10);

const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(500);
const DEFAULT_SETTLE_DELAY: Duration = Duration::from_millis(100);

/// Tunable pacing for a [`Resolver`].
#[derive(Debug, Clone)]
pub struct ResolverOptions {
    /// Deadline used when the query does not carry its own.
    pub deadline: Duration,
    /// Deadline for index resolution and identity waits.
    pub short_deadline: Duration,
    /// Sleep between snapshot passes.
    pub poll_interval: Duration,
    /// Pause after a successful scroll step, letting the UI settle before
    /// the next snapshot. Trades responsiveness against flakiness.
    pub settle_delay: Duration,
    /// Pause between steps of a full-sweep scroll (to top / to bottom).
    pub spin_interval: Duration,
}

impl Default for ResolverOptions {
    fn default() -> Self {
        Self {
            deadline: DEFAULT_DEADLINE,
            short_deadline: SHORT_DEADLINE,
            poll_interval: DEFAULT_POLL_INTERVAL,
            settle_delay: DEFAULT_SETTLE_DELAY,
            spin_interval: DEFAULT_SETTLE_DELAY,
        }
    }
}

/// Resolves queries against a live UI surface.
///
/// One resolution call is one logical thread of control: snapshot, match,
/// maybe scroll, repeat, all under a single deadline that carries across
/// scroll steps. All call state (dedup set, ordinal counter) is local to the
/// call; concurrent resolutions share nothing but the surface itself.
#[derive(Clone)]
pub struct Resolver {
    surface: Arc<dyn UiSurface>,
    opts: ResolverOptions,
}

impl Resolver {
    pub fn new(surface: Arc<dyn UiSurface>) -> Self {
        Self {
            surface,
            opts: ResolverOptions::default(),
        }
    }

    pub fn with_options(surface: Arc<dyn UiSurface>, opts: ResolverOptions) -> Self {
        Self { surface, opts }
    }

    /// Replace the default deadline for queries that do not carry their own.
    pub fn set_default_deadline(mut self, deadline: Duration) -> Self {
        self.opts.deadline = deadline;
        self
    }

    pub fn options(&self) -> &ResolverOptions {
        &self.opts
    }

    /// Resolve a text query: literal or regex pattern, ordinal selection,
    /// optional anchor, optional visibility restriction.
    #[instrument(level = "debug", skip(self, query), fields(pattern = %query.describe_pattern()))]
    pub async fn find_by_text(&self, query: &Query) -> Result<ElementSnapshot, ResolveError> {
        self.resolve(query).await
    }

    /// Resolve the n-th element of a kind, regardless of text.
    pub async fn find_by_type(
        &self,
        kind: ElementKind,
        ordinal: i32,
    ) -> Result<ElementSnapshot, ResolveError> {
        self.resolve(&Query::kind(kind).nth(ordinal)).await
    }

    /// Resolve the first element matching `text` that occurs after the first
    /// occurrence of `after` in traversal order.
    pub async fn find_by_text_after(
        &self,
        text: &str,
        after: &str,
    ) -> Result<ElementSnapshot, ResolveError> {
        self.resolve(&Query::text(text).after_text(after)).await
    }

    async fn resolve(&self, query: &Query) -> Result<ElementSnapshot, ResolveError> {
        let required = query.validate()?;
        let started = Instant::now();
        let deadline = started + query.deadline.unwrap_or(self.opts.deadline);
        let scroller = self.scroller();

        let mut matcher = Matcher::for_query(query, required);
        let mut seen = BTreeSet::new();
        let mut scroll_progressing = false;

        loop {
            if Instant::now() > deadline {
                return Err(self.expiry_error(
                    query,
                    &matcher,
                    required,
                    seen,
                    scroll_progressing,
                    started.elapsed(),
                ));
            }

            sleep(self.opts.poll_interval).await;

            match self.search_pass(query, &mut matcher, &mut seen).await {
                Ok(Some(el)) => {
                    debug!(element = %el.id, distinct = matcher.distinct(), "resolved");
                    return Ok(el);
                }
                Ok(None) => {
                    if query.scroll {
                        match scroller.scroll(Direction::Down).await {
                            Ok(more) => scroll_progressing = more,
                            Err(e) => debug!(error = %e, "scroll failed, retrying next poll"),
                        }
                    }
                }
                // Torn read or similar: the next iteration re-enumerates.
                Err(e) => debug!(error = %e, "snapshot failed, retrying next poll"),
            }
        }
    }

    /// One snapshot pass: enumerate, filter by kind and (if requested)
    /// visibility, feed the matcher in traversal order.
    async fn search_pass(
        &self,
        query: &Query,
        matcher: &mut Matcher,
        seen: &mut BTreeSet<String>,
    ) -> Result<Option<ElementSnapshot>, crate::surface::SurfaceError> {
        let snapshot = self.surface.enumerate(None, true).await?;
        let viewport = if query.only_visible {
            Some(self.surface.viewport().await?)
        } else {
            None
        };

        for el in &snapshot {
            if let Some(kind) = query.kind {
                if el.kind != kind {
                    continue;
                }
            }
            if let Some(viewport) = viewport {
                if !is_sufficiently_visible(el, &snapshot, viewport) {
                    continue;
                }
            }
            if let Some(text) = el.text_str() {
                seen.insert(text.to_string());
            }
            if matcher.evaluate(el) == MatchOutcome::Matched {
                return Ok(Some(el.clone()));
            }
        }
        Ok(None)
    }

    fn expiry_error(
        &self,
        query: &Query,
        matcher: &Matcher,
        required: u32,
        seen: BTreeSet<String>,
        scroll_progressing: bool,
        elapsed: Duration,
    ) -> ResolveError {
        let found = matcher.distinct();
        if found >= 1 && (found as u32) < required {
            return ResolveError::PartialMatch {
                pattern: query.describe_pattern(),
                found,
                required,
            };
        }
        if scroll_progressing {
            // Content was still being revealed when the clock ran out, so
            // "not present" was never established.
            return ResolveError::Timeout {
                pattern: query.describe_pattern(),
                elapsed,
            };
        }
        ResolveError::not_found(query.kind, &query.describe_pattern(), seen)
    }

    /// Resolve an element of `kind` by positional index into the live list,
    /// correcting for content that scrolled out of existence between being
    /// counted and the final snapshot.
    #[instrument(level = "debug", skip(self))]
    pub async fn find_by_index(
        &self,
        kind: ElementKind,
        index: usize,
    ) -> Result<ElementSnapshot, ResolveError> {
        let deadline = Instant::now() + self.opts.short_deadline;
        let scroller = self.scroller();
        let mut dedup = DedupSet::new();
        let threshold = index.max(1);

        // Polling phase: scroll through the content, counting distinct
        // elements of the kind, until enough have been observed to cover the
        // requested index or the deadline elapses.
        'poll: while Instant::now() <= deadline {
            sleep(self.opts.poll_interval).await;

            loop {
                match self.count_pass(kind, &mut dedup).await {
                    Ok(()) => {}
                    Err(e) => {
                        debug!(error = %e, "count pass failed, retrying");
                        break;
                    }
                }
                if dedup.len() >= threshold {
                    break 'poll;
                }
                match scroller.scroll(Direction::Down).await {
                    Ok(true) => {}
                    Ok(false) => break,
                    Err(e) => {
                        debug!(error = %e, "scroll failed during count");
                        break;
                    }
                }
            }
        }

        // Settle phase: one fresh look at what is actually on screen now,
        // outside any scroll-triggered history.
        let (snapshot, viewport) = loop {
            let attempt = async {
                let snapshot = self.surface.enumerate(None, true).await?;
                let viewport = self.surface.viewport().await?;
                Ok::<_, crate::surface::SurfaceError>((snapshot, viewport))
            };
            match attempt.await {
                Ok(pair) => break pair,
                Err(e) if Instant::now() <= deadline => {
                    debug!(error = %e, "settle snapshot failed, retrying");
                    sleep(self.opts.spin_interval).await;
                }
                Err(e) => return Err(e.into()),
            }
        };

        let live: Vec<&ElementSnapshot> = snapshot
            .iter()
            .filter(|el| el.kind == kind && is_sufficiently_visible(el, &snapshot, viewport))
            .collect();

        // Elements counted during scrolling may no longer exist; shift the
        // index down by the net difference, never below zero and never past
        // the original request.
        let counted = dedup.len();
        let mut corrected = index;
        if live.len() < counted {
            let shift = counted - live.len();
            if index >= shift {
                corrected = index - shift;
            }
        }
        debug!(counted, live = live.len(), corrected, "index settled");

        live.get(corrected)
            .map(|el| (*el).clone())
            .ok_or(ResolveError::IndexOutOfRange { kind, index })
    }

    /// One counting pass over the sufficiently-visible elements of a kind.
    async fn count_pass(
        &self,
        kind: ElementKind,
        dedup: &mut DedupSet,
    ) -> Result<(), crate::surface::SurfaceError> {
        let snapshot = self.surface.enumerate(None, true).await?;
        let viewport = self.surface.viewport().await?;
        for el in &snapshot {
            if el.kind == kind && is_sufficiently_visible(el, &snapshot, viewport) {
                dedup.add(el.id);
            }
        }
        Ok(())
    }

    /// Wait for an element with a known identity to (re)appear.
    pub async fn wait_for_element(&self, id: ElementId) -> Result<ElementSnapshot, ResolveError> {
        let deadline = Instant::now() + self.opts.short_deadline;
        let scroller = self.scroller();

        loop {
            if Instant::now() > deadline {
                return Err(ResolveError::not_found(None, &id.to_string(), Vec::new()));
            }
            sleep(self.opts.poll_interval).await;

            match self.surface.enumerate(None, true).await {
                Ok(snapshot) => {
                    if let Some(el) = snapshot.into_iter().find(|el| el.id == id) {
                        return Ok(el);
                    }
                }
                Err(e) => debug!(error = %e, "snapshot failed, retrying next poll"),
            }
            if let Err(e) = scroller.scroll(Direction::Down).await {
                debug!(error = %e, "scroll failed, retrying next poll");
            }
        }
    }

    /// Wait for the first element of any of the given kinds to appear,
    /// scrolling between rounds.
    pub async fn find_any_kind(
        &self,
        kinds: &[ElementKind],
    ) -> Result<ElementSnapshot, ResolveError> {
        let deadline = Instant::now() + self.opts.short_deadline;
        let scroller = self.scroller();
        let mut seen = BTreeSet::new();

        loop {
            if Instant::now() > deadline {
                let names: Vec<_> = kinds.iter().map(|k| k.name()).collect();
                return Err(ResolveError::not_found(None, &names.join("|"), seen));
            }

            for &kind in kinds {
                let query = Query::kind(kind);
                let mut matcher = Matcher::for_query(&query, 1);
                if let Ok(Some(el)) = self.search_pass(&query, &mut matcher, &mut seen).await {
                    return Ok(el);
                }
            }

            if let Err(e) = scroller.scroll(Direction::Down).await {
                debug!(error = %e, "scroll failed, retrying next round");
            }
            sleep(self.opts.poll_interval).await;
        }
    }

    /// Sweep the whole scrollable content from top to bottom, collecting
    /// every distinct element of `kind` in traversal order.
    pub async fn collect_all(&self, kind: ElementKind) -> Result<Vec<ElementSnapshot>, ResolveError> {
        let scroller = self.scroller();
        scroller.scroll_to_top().await?;
        sleep(self.opts.spin_interval).await;

        let mut dedup = DedupSet::new();
        let mut ordered = Vec::new();

        let snapshot = self.surface.enumerate(None, false).await?;
        collect_kind(snapshot, kind, &mut dedup, &mut ordered);

        while scroller.scroll(Direction::Down).await? {
            let snapshot = self.surface.enumerate(None, false).await?;
            collect_kind(snapshot, kind, &mut dedup, &mut ordered);
            sleep(self.opts.spin_interval).await;
        }
        Ok(ordered)
    }

    /// Scroll the topmost container all the way to the top.
    pub async fn scroll_to_top(&self) -> Result<(), ResolveError> {
        Ok(self.scroller().scroll_to_top().await?)
    }

    /// Scroll the topmost container all the way to the bottom.
    pub async fn scroll_to_bottom(&self) -> Result<(), ResolveError> {
        Ok(self.scroller().scroll_to_bottom().await?)
    }

    fn scroller(&self) -> Scroller<'_> {
        Scroller::new(
            self.surface.as_ref(),
            self.opts.settle_delay,
            self.opts.spin_interval,
        )
    }
}

fn collect_kind(
    snapshot: Vec<ElementSnapshot>,
    kind: ElementKind,
    dedup: &mut DedupSet,
    ordered: &mut Vec<ElementSnapshot>,
) {
    for el in snapshot {
        if el.kind == kind && dedup.add(el.id) {
            ordered.push(el);
        }
    }
}

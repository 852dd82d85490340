//! Deadline-bounded element resolution for UI test automation
//!
//! This crate locates elements in a live, mutable, partially-observable UI
//! element tree on behalf of a test script: by kind, literal text, regex,
//! ordinal occurrence, anchor-relative position, or positional index. The
//! tree is only ever observed through snapshots, content may not exist until
//! scrolled into view, and everything runs under one deadline per call.
//!
//! The platform is injected as a [`UiSurface`] capability; the engine owns
//! the polling loop, scroll-driven revelation with termination detection,
//! cross-scroll deduplication, and index drift correction.
//!
//! ```no_run
//! # async fn demo(surface: std::sync::Arc<dyn uiscout::UiSurface>) -> Result<(), uiscout::ResolveError> {
//! use uiscout::{Query, Resolver};
//!
//! let resolver = Resolver::new(surface);
//! let element = resolver.find_by_text(&Query::text("Save").nth(2)).await?;
//! println!("second Save button at {:?}", element.bounds);
//! # Ok(())
//! # }
//! ```

pub mod element;
pub mod engine;
pub mod errors;
pub mod matcher;
pub mod query;
pub mod scroller;
pub mod surface;
#[cfg(test)]
mod tests;
pub mod visibility;

pub use element::{Bounds, ElementId, ElementKind, ElementSnapshot};
pub use engine::{Resolver, ResolverOptions, DEFAULT_DEADLINE, SHORT_DEADLINE};
pub use errors::ResolveError;
pub use matcher::{DedupSet, MatchOutcome, Matcher};
pub use query::{Query, TextPattern};
pub use scroller::{Direction, Scroller};
pub use surface::{ListMetrics, SurfaceError, UiSurface};
pub use visibility::is_sufficiently_visible;

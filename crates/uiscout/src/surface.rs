//! The platform capability consumed by the engine.
//!
//! A [`UiSurface`] is the only door into the live element tree: snapshot
//! enumeration plus the scroll primitives, injected by the embedder rather
//! than looked up through platform internals. The engine holds it behind an
//! `Arc<dyn UiSurface>` and never mutates the tree except through the
//! marshalled scroll calls.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::element::{Bounds, ElementId, ElementSnapshot};

/// Failure reported by the surface itself.
///
/// The engine treats these as transient while a deadline is still running:
/// the next poll iteration re-enumerates and naturally recovers from a torn
/// read. Only a surface that fails on every attempt surfaces to the caller.
#[derive(Debug, thiserror::Error)]
pub enum SurfaceError {
    /// The tree changed mid-enumeration and the snapshot is inconsistent.
    #[error("torn read: {0}")]
    TornRead(String),

    /// The element handle no longer refers to a live element.
    #[error("unknown element {0}")]
    UnknownElement(ElementId),

    /// Anything else the platform layer wants to report.
    #[error("platform error: {0}")]
    Platform(String),
}

/// Visible-window metrics of a list- or grid-like container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListMetrics {
    /// Index of the first item currently laid out in the window.
    pub first_visible: usize,
    /// Index of the last item currently laid out in the window.
    pub last_visible: usize,
    /// Total item count, including items not yet materialized.
    pub item_count: usize,
}

impl ListMetrics {
    /// Number of rows currently on screen.
    pub fn visible_rows(&self) -> usize {
        self.last_visible.saturating_sub(self.first_visible) + 1
    }
}

/// Live element tree access and scroll primitives.
///
/// Contract:
/// - `enumerate` reflects the tree at call time; no caching across calls.
/// - Read methods support concurrent callers.
/// - Mutating methods (`select_index`, `scroll_by`) are marshalled onto the
///   UI-owning execution context and complete before returning, so a
///   snapshot taken afterwards observes the post-scroll layout.
#[async_trait]
pub trait UiSurface: Send + Sync {
    /// Flattened traversal-order snapshot of the tree under `root` (whole
    /// tree when `None`). With `only_shown`, detached/undrawn elements are
    /// omitted.
    async fn enumerate(
        &self,
        root: Option<ElementId>,
        only_shown: bool,
    ) -> Result<Vec<ElementSnapshot>, SurfaceError>;

    /// Bounds of the screen (or hosting window) used when an element has no
    /// scrollable ancestor.
    async fn viewport(&self) -> Result<Bounds, SurfaceError>;

    /// Window metrics for a list- or grid-like container.
    async fn list_metrics(&self, container: ElementId) -> Result<ListMetrics, SurfaceError>;

    /// Scroll a list/grid container so the item at `index` becomes the first
    /// laid-out row.
    async fn select_index(&self, container: ElementId, index: usize) -> Result<(), SurfaceError>;

    /// Current vertical scroll offset of a pane-like container.
    async fn scroll_offset(&self, container: ElementId) -> Result<i32, SurfaceError>;

    /// Scroll a pane-like container by a pixel delta. Clamping at the content
    /// edges is the surface's job; the scroller detects exhaustion by
    /// observing an unchanged offset.
    async fn scroll_by(&self, container: ElementId, dx: i32, dy: i32) -> Result<(), SurfaceError>;
}

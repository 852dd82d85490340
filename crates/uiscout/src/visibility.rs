//! Sufficient-visibility classification.

use crate::element::{Bounds, ElementId, ElementSnapshot};

/// True when the element's vertical center lies inside its scroll
/// container's visible window, `[top, top + height]` inclusive at both ends.
///
/// An element whose center sits exactly on the lower bound is visible; one
/// pixel below is not. When the element has no scrollable ancestor, the
/// viewport bounds apply. The container is resolved against the same
/// snapshot the element came from, so a torn lookup cannot mix observations
/// from different passes.
pub fn is_sufficiently_visible(
    el: &ElementSnapshot,
    snapshot: &[ElementSnapshot],
    viewport: Bounds,
) -> bool {
    if !el.shown {
        return false;
    }

    let (top, bottom) = match el.container.and_then(|id| find(snapshot, id)) {
        Some(container) => (container.bounds.y, container.bounds.bottom()),
        None => (viewport.y, viewport.bottom()),
    };

    let center = el.bounds.center_y();
    center >= top && center <= bottom
}

fn find(snapshot: &[ElementSnapshot], id: ElementId) -> Option<&ElementSnapshot> {
    snapshot.iter().find(|el| el.id == id)
}

//! One-increment scrolling with exhaustion detection.

use std::time::Duration;

use tokio::time::sleep;
use tracing::debug;

use crate::element::{ElementId, ElementKind, ElementSnapshot};
use crate::surface::{SurfaceError, UiSurface};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
}

/// Advances the topmost scrollable container by one increment.
///
/// Containers are tried in fixed priority order: list, then grid, then
/// generic pane; the first kind with an instance on screen wins the attempt.
/// `scroll` returns `true` while more content may exist, `false` once the
/// container is exhausted (or no scrollable container is present), which is
/// the engine's termination signal.
pub struct Scroller<'a> {
    surface: &'a dyn UiSurface,
    settle_delay: Duration,
    spin_interval: Duration,
}

impl<'a> Scroller<'a> {
    pub fn new(surface: &'a dyn UiSurface, settle_delay: Duration, spin_interval: Duration) -> Self {
        Self {
            surface,
            settle_delay,
            spin_interval,
        }
    }

    /// Perform one scroll increment. `Ok(true)` means another increment may
    /// reveal more content.
    pub async fn scroll(&self, direction: Direction) -> Result<bool, SurfaceError> {
        let shown = self.surface.enumerate(None, true).await?;

        if let Some(list) = topmost(&shown, ElementKind::List) {
            return self.scroll_list(list, direction, false).await;
        }
        if let Some(grid) = topmost(&shown, ElementKind::Grid) {
            return self.scroll_list(grid, direction, true).await;
        }
        if let Some(pane) = topmost(&shown, ElementKind::Pane) {
            return self.scroll_pane(pane, direction).await;
        }
        Ok(false)
    }

    /// Scroll until the top is reached.
    pub async fn scroll_to_top(&self) -> Result<(), SurfaceError> {
        while self.scroll(Direction::Up).await? {
            sleep(self.spin_interval).await;
        }
        Ok(())
    }

    /// Scroll until the bottom is reached.
    pub async fn scroll_to_bottom(&self) -> Result<(), SurfaceError> {
        while self.scroll(Direction::Down).await? {
            sleep(self.spin_interval).await;
        }
        Ok(())
    }

    async fn scroll_list(
        &self,
        container: &ElementSnapshot,
        direction: Direction,
        grid: bool,
    ) -> Result<bool, SurfaceError> {
        let metrics = self.surface.list_metrics(container.id).await?;
        debug!(container = %container.id, ?metrics, ?direction, "scrolling list");

        match direction {
            Direction::Down => {
                if metrics.last_visible + 1 >= metrics.item_count {
                    self.select(container.id, metrics.last_visible, grid).await?;
                    return Ok(false);
                }
                if metrics.first_visible != metrics.last_visible {
                    // More than one row fits: jump a whole window forward.
                    self.select(container.id, metrics.last_visible, grid).await?;
                } else {
                    self.select(container.id, metrics.first_visible + 1, grid).await?;
                }
            }
            Direction::Up => {
                if metrics.first_visible < 2 {
                    self.select(container.id, 0, grid).await?;
                    return Ok(false);
                }
                // Look back one window of visible rows, clamped at the top.
                let rows = metrics.last_visible - metrics.first_visible;
                let mut line = metrics.first_visible.saturating_sub(rows);
                if line == metrics.last_visible {
                    line = line.saturating_sub(1);
                }
                self.select(container.id, line, grid).await?;
            }
        }

        sleep(self.settle_delay).await;
        Ok(true)
    }

    async fn select(&self, container: ElementId, line: usize, grid: bool) -> Result<(), SurfaceError> {
        // Grid selection lands one row later than requested.
        let line = if grid { line + 1 } else { line };
        self.surface.select_index(container, line).await
    }

    async fn scroll_pane(
        &self,
        container: &ElementSnapshot,
        direction: Direction,
    ) -> Result<bool, SurfaceError> {
        // One pixel short of a full viewport so consecutive windows overlap
        // and no content is skipped.
        let step = container.bounds.height - 1;
        let dy = match direction {
            Direction::Down => step,
            Direction::Up => -step,
        };

        let before = self.surface.scroll_offset(container.id).await?;
        self.surface.scroll_by(container.id, 0, dy).await?;
        let after = self.surface.scroll_offset(container.id).await?;
        debug!(container = %container.id, before, after, "scrolled pane");

        if before == after {
            return Ok(false);
        }
        sleep(self.settle_delay).await;
        Ok(true)
    }
}

/// Pick the scroll target among containers of one kind: the last candidate
/// in traversal order that is actually laid out (positive height, on-screen).
fn topmost(snapshot: &[ElementSnapshot], kind: ElementKind) -> Option<&ElementSnapshot> {
    snapshot
        .iter()
        .filter(|el| el.kind == kind && el.bounds.height > 0 && el.bounds.x >= 0)
        .next_back()
}

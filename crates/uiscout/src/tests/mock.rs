//! In-memory surface with scripted lists, panes, and failure injection.

use std::sync::Mutex;

use async_trait::async_trait;

use crate::element::{Bounds, ElementId, ElementKind, ElementSnapshot};
use crate::surface::{ListMetrics, SurfaceError, UiSurface};

pub const ROW_HEIGHT: i32 = 40;
pub const LIST_ID: ElementId = ElementId(1000);
pub const PANE_ID: ElementId = ElementId(2000);

/// A windowed item list: only the rows inside the window are materialized,
/// `select_index` moves the window, like a virtualized list view.
pub struct FakeList {
    pub kind: ElementKind,
    pub bounds: Bounds,
    pub items: Vec<(ElementId, ElementKind, Option<String>)>,
    pub window: usize,
    pub first: usize,
}

impl FakeList {
    fn last_visible(&self) -> usize {
        (self.first + self.window - 1).min(self.items.len().saturating_sub(1))
    }
}

/// A pane whose children all exist but scroll with the offset.
pub struct FakePane {
    pub bounds: Bounds,
    pub content_height: i32,
    pub offset: i32,
    /// (id, kind, text, content-space y, height)
    pub children: Vec<(ElementId, ElementKind, Option<String>, i32, i32)>,
}

struct Inner {
    statics: Vec<ElementSnapshot>,
    list: Option<FakeList>,
    pane: Option<FakePane>,
    viewport: Bounds,
    fail_enumerations: usize,
    scroll_steps: usize,
}

pub struct FakeSurface {
    inner: Mutex<Inner>,
}

impl FakeSurface {
    pub fn empty() -> Self {
        Self {
            inner: Mutex::new(Inner {
                statics: Vec::new(),
                list: None,
                pane: None,
                viewport: Bounds::new(0, 0, 800, 600),
                fail_enumerations: 0,
                scroll_steps: 0,
            }),
        }
    }

    /// A flat screen of static `Text` elements, ids starting at 1.
    pub fn screen(texts: &[&str]) -> Self {
        let surface = Self::empty();
        {
            let mut inner = surface.inner.lock().unwrap();
            for (i, text) in texts.iter().enumerate() {
                inner.statics.push(ElementSnapshot {
                    id: ElementId(i as u64 + 1),
                    kind: ElementKind::Text,
                    text: Some(text.to_string()),
                    bounds: Bounds::new(0, 50 * i as i32, 800, ROW_HEIGHT),
                    shown: true,
                    container: None,
                });
            }
        }
        surface
    }

    /// A single windowed list of `Text` items, ids starting at 1.
    pub fn list(texts: &[&str], window: usize) -> Self {
        let surface = Self::empty();
        {
            let mut inner = surface.inner.lock().unwrap();
            inner.list = Some(FakeList {
                kind: ElementKind::List,
                bounds: Bounds::new(0, 100, 800, ROW_HEIGHT * window as i32),
                items: texts
                    .iter()
                    .enumerate()
                    .map(|(i, t)| (ElementId(i as u64 + 1), ElementKind::Text, Some(t.to_string())))
                    .collect(),
                window,
                first: 0,
            });
        }
        surface
    }

    pub fn add_static(&self, id: u64, kind: ElementKind, text: Option<&str>, bounds: Bounds) {
        self.inner.lock().unwrap().statics.push(ElementSnapshot {
            id: ElementId(id),
            kind,
            text: text.map(str::to_string),
            bounds,
            shown: true,
            container: None,
        });
    }

    pub fn set_pane(&self, pane: FakePane) {
        self.inner.lock().unwrap().pane = Some(pane);
    }

    pub fn set_list_kind(&self, kind: ElementKind) {
        if let Some(list) = self.inner.lock().unwrap().list.as_mut() {
            list.kind = kind;
        }
    }

    pub fn set_list_position(&self, first: usize) {
        if let Some(list) = self.inner.lock().unwrap().list.as_mut() {
            list.first = first.min(list.items.len().saturating_sub(1));
        }
    }

    /// Make the next `n` enumerations fail with a torn read.
    pub fn fail_next_enumerations(&self, n: usize) {
        self.inner.lock().unwrap().fail_enumerations = n;
    }

    pub fn scroll_steps(&self) -> usize {
        self.inner.lock().unwrap().scroll_steps
    }

    fn snapshot(inner: &Inner, only_shown: bool) -> Vec<ElementSnapshot> {
        let mut out: Vec<ElementSnapshot> = inner
            .statics
            .iter()
            .filter(|el| !only_shown || el.shown)
            .cloned()
            .collect();

        if let Some(list) = &inner.list {
            out.push(ElementSnapshot {
                id: LIST_ID,
                kind: list.kind,
                text: None,
                bounds: list.bounds,
                shown: true,
                container: None,
            });
            for idx in list.first..=list.last_visible() {
                if list.items.is_empty() {
                    break;
                }
                let (id, kind, text) = &list.items[idx];
                let row = (idx - list.first) as i32;
                out.push(ElementSnapshot {
                    id: *id,
                    kind: *kind,
                    text: text.clone(),
                    bounds: Bounds::new(
                        list.bounds.x,
                        list.bounds.y + row * ROW_HEIGHT,
                        list.bounds.width,
                        ROW_HEIGHT,
                    ),
                    shown: true,
                    container: Some(LIST_ID),
                });
            }
        }

        if let Some(pane) = &inner.pane {
            out.push(ElementSnapshot {
                id: PANE_ID,
                kind: ElementKind::Pane,
                text: None,
                bounds: pane.bounds,
                shown: true,
                container: None,
            });
            for (id, kind, text, content_y, height) in &pane.children {
                out.push(ElementSnapshot {
                    id: *id,
                    kind: *kind,
                    text: text.clone(),
                    bounds: Bounds::new(
                        pane.bounds.x,
                        pane.bounds.y + content_y - pane.offset,
                        pane.bounds.width,
                        *height,
                    ),
                    shown: true,
                    container: Some(PANE_ID),
                });
            }
        }

        out
    }
}

#[async_trait]
impl UiSurface for FakeSurface {
    async fn enumerate(
        &self,
        _root: Option<ElementId>,
        only_shown: bool,
    ) -> Result<Vec<ElementSnapshot>, SurfaceError> {
        let mut inner = self.inner.lock().unwrap();
        if inner.fail_enumerations > 0 {
            inner.fail_enumerations -= 1;
            return Err(SurfaceError::TornRead("scripted".to_string()));
        }
        Ok(Self::snapshot(&inner, only_shown))
    }

    async fn viewport(&self) -> Result<Bounds, SurfaceError> {
        Ok(self.inner.lock().unwrap().viewport)
    }

    async fn list_metrics(&self, container: ElementId) -> Result<ListMetrics, SurfaceError> {
        let inner = self.inner.lock().unwrap();
        match &inner.list {
            Some(list) if container == LIST_ID => Ok(ListMetrics {
                first_visible: list.first,
                last_visible: list.last_visible(),
                item_count: list.items.len(),
            }),
            _ => Err(SurfaceError::UnknownElement(container)),
        }
    }

    async fn select_index(&self, container: ElementId, index: usize) -> Result<(), SurfaceError> {
        let mut inner = self.inner.lock().unwrap();
        inner.scroll_steps += 1;
        match inner.list.as_mut() {
            Some(list) if container == LIST_ID => {
                list.first = index.min(list.items.len().saturating_sub(1));
                Ok(())
            }
            _ => Err(SurfaceError::UnknownElement(container)),
        }
    }

    async fn scroll_offset(&self, container: ElementId) -> Result<i32, SurfaceError> {
        let inner = self.inner.lock().unwrap();
        match &inner.pane {
            Some(pane) if container == PANE_ID => Ok(pane.offset),
            _ => Err(SurfaceError::UnknownElement(container)),
        }
    }

    async fn scroll_by(&self, container: ElementId, _dx: i32, dy: i32) -> Result<(), SurfaceError> {
        let mut inner = self.inner.lock().unwrap();
        inner.scroll_steps += 1;
        match inner.pane.as_mut() {
            Some(pane) if container == PANE_ID => {
                let max = (pane.content_height - pane.bounds.height).max(0);
                pane.offset = (pane.offset + dy).clamp(0, max);
                Ok(())
            }
            _ => Err(SurfaceError::UnknownElement(container)),
        }
    }
}

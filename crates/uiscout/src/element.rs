//! Snapshot value types produced by a [`UiSurface`](crate::surface::UiSurface) enumeration.

use serde::{Deserialize, Serialize};

/// Opaque identity of a physical element instance.
///
/// Stable for the lifetime of the surface process: the same on-screen widget
/// keeps its id across repeated enumerations, which is what makes cross-scroll
/// deduplication possible.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ElementId(pub u64);

impl std::fmt::Display for ElementId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Tagged element kind.
///
/// Replaces runtime type introspection: the surface classifies each element
/// once at enumeration time and the engine only ever looks at the tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ElementKind {
    /// Static or list-item text.
    Text,
    Button,
    Toggle,
    /// Editable text field.
    Input,
    Image,
    /// Vertically scrolling item list.
    List,
    /// Scrolling grid of cells.
    Grid,
    /// Generic scrollable panel.
    Pane,
    Other,
}

impl ElementKind {
    /// Kinds the scroller knows how to advance.
    pub fn is_scrollable(self) -> bool {
        matches!(self, ElementKind::List | ElementKind::Grid | ElementKind::Pane)
    }

    pub fn name(self) -> &'static str {
        match self {
            ElementKind::Text => "Text",
            ElementKind::Button => "Button",
            ElementKind::Toggle => "Toggle",
            ElementKind::Input => "Input",
            ElementKind::Image => "Image",
            ElementKind::List => "List",
            ElementKind::Grid => "Grid",
            ElementKind::Pane => "Pane",
            ElementKind::Other => "Other",
        }
    }
}

impl std::fmt::Display for ElementKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Screen-space rectangle in integer pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bounds {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Bounds {
    pub fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self { x, y, width, height }
    }

    /// Vertical center, the coordinate the visibility filter classifies on.
    pub fn center_y(&self) -> i32 {
        self.y + self.height / 2
    }

    pub fn bottom(&self) -> i32 {
        self.y + self.height
    }
}

/// Immutable observation of one element at one point in time.
///
/// Produced fresh on every enumeration; never mutated by the engine. A
/// returned snapshot is owned by the caller and may be stale the moment the
/// UI changes again.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElementSnapshot {
    pub id: ElementId,
    pub kind: ElementKind,
    /// Display text, if the element renders any.
    pub text: Option<String>,
    pub bounds: Bounds,
    /// Whether the element is attached and drawn at all. Distinct from
    /// "sufficiently visible", which also requires being inside the scroll
    /// window (see [`crate::visibility`]).
    pub shown: bool,
    /// Nearest scrollable ancestor, tagged by the surface during traversal.
    pub container: Option<ElementId>,
}

impl ElementSnapshot {
    pub fn text_str(&self) -> Option<&str> {
        self.text.as_deref()
    }
}

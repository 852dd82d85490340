//! Resolve a few queries against a canned in-memory screen.
//!
//! Run with: cargo run --example screen_dump

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use uiscout::{
    Bounds, ElementId, ElementKind, ElementSnapshot, ListMetrics, Query, Resolver, SurfaceError,
    UiSurface,
};

/// A fixed screen: no scrolling, no mutation. Real embedders back this trait
/// with the platform's accessibility tree.
struct CannedScreen {
    elements: Vec<ElementSnapshot>,
}

#[async_trait]
impl UiSurface for CannedScreen {
    async fn enumerate(
        &self,
        _root: Option<ElementId>,
        only_shown: bool,
    ) -> Result<Vec<ElementSnapshot>, SurfaceError> {
        Ok(self
            .elements
            .iter()
            .filter(|el| !only_shown || el.shown)
            .cloned()
            .collect())
    }

    async fn viewport(&self) -> Result<Bounds, SurfaceError> {
        Ok(Bounds::new(0, 0, 800, 600))
    }

    async fn list_metrics(&self, container: ElementId) -> Result<ListMetrics, SurfaceError> {
        Err(SurfaceError::UnknownElement(container))
    }

    async fn select_index(&self, container: ElementId, _index: usize) -> Result<(), SurfaceError> {
        Err(SurfaceError::UnknownElement(container))
    }

    async fn scroll_offset(&self, container: ElementId) -> Result<i32, SurfaceError> {
        Err(SurfaceError::UnknownElement(container))
    }

    async fn scroll_by(
        &self,
        container: ElementId,
        _dx: i32,
        _dy: i32,
    ) -> Result<(), SurfaceError> {
        Err(SurfaceError::UnknownElement(container))
    }
}

fn element(id: u64, kind: ElementKind, text: &str, y: i32) -> ElementSnapshot {
    ElementSnapshot {
        id: ElementId(id),
        kind,
        text: Some(text.to_string()),
        bounds: Bounds::new(20, y, 300, 40),
        shown: true,
        container: None,
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let screen = Arc::new(CannedScreen {
        elements: vec![
            element(1, ElementKind::Text, "Welcome back", 20),
            element(2, ElementKind::Input, "user@example.com", 80),
            element(3, ElementKind::Button, "Sign in", 140),
            element(4, ElementKind::Button, "Create account", 200),
        ],
    });
    let resolver = Resolver::new(screen);

    let title = resolver.find_by_text(&Query::text("Welcome back")).await?;
    println!("title: {}", serde_json::to_string_pretty(&title)?);

    let second_button = resolver.find_by_type(ElementKind::Button, 2).await?;
    println!(
        "second button {} reads {:?}",
        second_button.id,
        second_button.text_str()
    );

    match resolver
        .find_by_text(&Query::text("Log out").within(Duration::from_secs(1)))
        .await
    {
        Ok(el) => println!("unexpected: {el:?}"),
        Err(e) => println!("as expected: {e}"),
    }

    Ok(())
}

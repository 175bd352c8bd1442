//! JSON page fixtures.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use slactac_protocols::{BoundingBox, ViewportInfo};

use crate::element::Element;
use crate::page::MemoryPage;

/// Errors loading a page fixture.
#[derive(Debug, Error)]
pub enum FixtureError {
    #[error("Failed to read fixture {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid fixture: {0}")]
    Parse(#[from] serde_json::Error),
}

/// A whole page: host, viewport and body tree.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageFixture {
    pub hostname: String,
    #[serde(default)]
    pub viewport: ViewportInfo,
    pub body: NodeFixture,
}

/// One element of a fixture tree.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NodeFixture {
    #[serde(default = "default_tag")]
    pub tag: String,
    #[serde(default)]
    pub classes: Vec<String>,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub rect: Option<BoundingBox>,
    #[serde(default)]
    pub children: Vec<NodeFixture>,
}

fn default_tag() -> String {
    "div".to_string()
}

impl PageFixture {
    pub fn from_json(json: &str) -> Result<Self, FixtureError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, FixtureError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| FixtureError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json(&json)
    }

    /// Build a live page. A body without a rect covers the viewport.
    pub fn into_page(self) -> MemoryPage {
        let mut body = self.body;
        if body.rect.is_none() {
            body.rect = Some(BoundingBox::new(
                0.0,
                0.0,
                self.viewport.width,
                self.viewport.height,
            ));
        }
        MemoryPage::with_body(self.hostname, self.viewport, body.build())
    }
}

impl NodeFixture {
    fn build(self) -> Element {
        let mut element = Element::new(self.tag).with_text(self.text);
        for class in self.classes {
            element = element.with_class(class);
        }
        if let Some(rect) = self.rect {
            element = element.with_rect(rect);
        }
        for child in self.children {
            element = element.with_child(child.build());
        }
        element
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use slactac_protocols::{LabelDom, PointerSurface};

    const FIXTURE: &str = r#"{
        "hostname": "app.slack.com",
        "body": {
            "tag": "body",
            "children": [{
                "classes": ["p-channel_sidebar__list"],
                "rect": {"x": 0, "y": 0, "width": 260, "height": 600},
                "children": [
                    {"tag": "span", "classes": ["p-channel_sidebar__name"], "text": "general",
                     "rect": {"x": 10, "y": 10, "width": 200, "height": 20}},
                    {"tag": "span", "classes": ["p-channel_sidebar__name"], "text": "random",
                     "rect": {"x": 10, "y": 40, "width": 200, "height": 20}}
                ]
            }]
        }
    }"#;

    #[test]
    fn test_fixture_builds_page() {
        let page = PageFixture::from_json(FIXTURE).unwrap().into_page();
        assert_eq!(page.hostname(), "app.slack.com");
        assert_eq!(page.viewport(), ViewportInfo::default());
        assert_eq!(
            page.texts_of("p-channel_sidebar__name"),
            vec!["general".to_string(), "random".to_string()]
        );
        let hit = page.element_at(50.0, 45.0).unwrap();
        assert_eq!(page.text(&hit), "random");
    }

    #[test]
    fn test_body_defaults_to_viewport() {
        let page = PageFixture::from_json(r#"{"hostname": "x", "body": {}}"#)
            .unwrap()
            .into_page();
        assert_eq!(page.body().rect().width, 1280.0);
        assert_eq!(page.body().tag(), "div");
    }

    #[test]
    fn test_invalid_fixture() {
        assert!(matches!(
            PageFixture::from_json("{\"body\": {}}"),
            Err(FixtureError::Parse(_))
        ));
    }

    #[test]
    fn test_missing_file() {
        let err = PageFixture::load("/nonexistent/page.json").unwrap_err();
        assert!(matches!(err, FixtureError::Io { .. }));
    }
}

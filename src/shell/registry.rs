// componentKey -> content mapping. The window manager stores props as an opaque
// JSON value; each content kind decodes the shape it expects here.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use tracing::warn;

use crate::config::DesktopConfig;
use crate::error::ContentError;
use crate::paint::PaintCanvas;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum GalleryType {
    Mspaint,
    Ipad,
    #[default]
    Paintings,
    Gif,
    SelfPortraits,
    /// Anything unrecognised shows the digital works collection
    #[serde(other)]
    Digital,
}

impl GalleryType {
    pub fn heading(self) -> &'static str {
        match self {
            GalleryType::Mspaint => "MS Paint Art",
            GalleryType::Ipad => "iPad Art",
            GalleryType::Paintings => "My Paintings",
            GalleryType::Gif => "GIFs",
            GalleryType::SelfPortraits => "Self Portraits",
            GalleryType::Digital => "Gallery",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GalleryProps {
    #[serde(default)]
    pub gallery_type: GalleryType,
}

/// Artwork metadata passed to the viewer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Artwork {
    pub id: String,
    pub title: String,
    pub year: i32,
    pub medium: String,
    #[serde(default)]
    pub dimensions: Option<String>,
    #[serde(default)]
    pub thumbnail: Option<String>,
    #[serde(default)]
    pub full_image: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub date: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtworkViewerProps {
    pub artwork: Artwork,
}

/// A mounted window body
#[derive(Debug)]
pub enum Content {
    Gallery(GalleryProps),
    About,
    Guestbook,
    Links,
    Contact,
    ArtworkViewer(ArtworkViewerProps),
    SecretVideos,
    Paint(Box<PaintCanvas>),
}

impl Content {
    pub fn paint(&self) -> Option<&PaintCanvas> {
        match self {
            Content::Paint(canvas) => Some(canvas),
            _ => None,
        }
    }

    pub fn paint_mut(&mut self) -> Option<&mut PaintCanvas> {
        match self {
            Content::Paint(canvas) => Some(canvas),
            _ => None,
        }
    }

    /// Text shown in the body of non-paint windows
    pub fn summary(&self) -> Vec<String> {
        match self {
            Content::Gallery(props) => vec![
                props.gallery_type.heading().to_string(),
                String::new(),
                "Thumbnails open in the graphical desktop.".to_string(),
            ],
            Content::About => vec!["About Me".to_string()],
            Content::Guestbook => vec!["Guestbook".to_string()],
            Content::Links => vec!["Links".to_string()],
            Content::Contact => vec!["Contact".to_string()],
            Content::ArtworkViewer(ArtworkViewerProps { artwork }) => {
                let mut lines = vec![
                    artwork.title.clone(),
                    format!("{}, {}", artwork.medium, artwork.year),
                ];
                lines.extend(artwork.dimensions.clone());
                lines.extend(artwork.description.clone());
                lines
            }
            Content::SecretVideos => vec!["Secret Videos".to_string()],
            Content::Paint(_) => Vec::new(),
        }
    }
}

type ContentFactory = fn(Option<&Value>, &DesktopConfig) -> Result<Content, serde_json::Error>;

/// Missing or null props decode like an empty object
fn decode<T: DeserializeOwned>(props: Option<&Value>) -> Result<T, serde_json::Error> {
    match props {
        None | Some(Value::Null) => serde_json::from_value(Value::Object(Default::default())),
        Some(value) => T::deserialize(value),
    }
}

pub struct ContentRegistry {
    factories: HashMap<&'static str, ContentFactory>,
}

impl Default for ContentRegistry {
    fn default() -> Self {
        let mut factories: HashMap<&'static str, ContentFactory> = HashMap::new();
        factories.insert("gallery", |props, _| decode(props).map(Content::Gallery));
        factories.insert("about", |_, _| Ok(Content::About));
        factories.insert("guestbook", |_, _| Ok(Content::Guestbook));
        factories.insert("links", |_, _| Ok(Content::Links));
        factories.insert("contact", |_, _| Ok(Content::Contact));
        factories.insert("artworkViewer", |props, _| {
            decode(props).map(Content::ArtworkViewer)
        });
        factories.insert("secretVideos", |_, _| Ok(Content::SecretVideos));
        factories.insert("mspaintApp", |_, config| {
            Ok(Content::Paint(Box::new(PaintCanvas::new(config.undo_depth))))
        });
        Self { factories }
    }
}

impl ContentRegistry {
    pub fn is_registered(&self, component_key: &str) -> bool {
        self.factories.contains_key(component_key)
    }

    pub fn create(
        &self,
        component_key: &str,
        props: Option<&Value>,
        config: &DesktopConfig,
    ) -> Result<Content, ContentError> {
        let factory = self
            .factories
            .get(component_key)
            .ok_or_else(|| ContentError::Unregistered(component_key.to_string()))?;
        factory(props, config).map_err(|source| ContentError::Props {
            key: component_key.to_string(),
            source,
        })
    }

    /// Soft-failing `create`: problems are logged and the body stays empty
    pub fn mount(
        &self,
        component_key: &str,
        props: Option<&Value>,
        config: &DesktopConfig,
    ) -> Option<Content> {
        match self.create(component_key, props, config) {
            Ok(content) => Some(content),
            Err(e) => {
                warn!("[Shell] Window body left empty: {}", e);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_gallery_props_decode() {
        let registry = ContentRegistry::default();
        let config = DesktopConfig::default();

        let content = registry
            .create("gallery", Some(&json!({ "galleryType": "selfPortraits" })), &config)
            .unwrap();
        assert!(matches!(
            content,
            Content::Gallery(GalleryProps {
                gallery_type: GalleryType::SelfPortraits
            })
        ));

        // No props falls back to the paintings gallery
        let content = registry.create("gallery", None, &config).unwrap();
        assert!(matches!(
            content,
            Content::Gallery(GalleryProps {
                gallery_type: GalleryType::Paintings
            })
        ));

        let content = registry
            .create("gallery", Some(&json!({ "galleryType": "digital" })), &config)
            .unwrap();
        assert!(matches!(
            content,
            Content::Gallery(GalleryProps {
                gallery_type: GalleryType::Digital
            })
        ));
    }

    #[test]
    fn test_artwork_viewer_requires_artwork() {
        let registry = ContentRegistry::default();
        let config = DesktopConfig::default();

        assert!(matches!(
            registry.create("artworkViewer", None, &config),
            Err(ContentError::Props { .. })
        ));

        let props = json!({
            "artwork": {
                "id": "p1",
                "title": "Pink Study",
                "year": 2025,
                "medium": "Acrylic on Canvas",
                "fullImage": "/gallery/p1.jpg"
            }
        });
        let content = registry.create("artworkViewer", Some(&props), &config).unwrap();
        assert_eq!(
            content.summary(),
            vec!["Pink Study".to_string(), "Acrylic on Canvas, 2025".to_string()]
        );
    }

    #[test]
    fn test_unregistered_key_soft_fails() {
        let registry = ContentRegistry::default();
        let config = DesktopConfig::default();

        assert!(!registry.is_registered("minesweeper"));
        assert!(matches!(
            registry.create("minesweeper", None, &config),
            Err(ContentError::Unregistered(_))
        ));
        assert!(registry.mount("minesweeper", None, &config).is_none());
    }

    #[test]
    fn test_paint_content_is_unmounted_canvas() {
        let registry = ContentRegistry::default();
        let content = registry
            .mount("mspaintApp", None, &DesktopConfig::default())
            .unwrap();
        assert!(content.paint().is_some_and(|canvas| !canvas.is_mounted()));
    }
}

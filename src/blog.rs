use serde::{Deserialize, Serialize};

pub type Slug = String;

pub const POST_CONTENT_TYPE: &str = "post";
pub const SLUG_FIELD: &str = "fields.slug";

pub const COVER_IMAGE_HEIGHT: u32 = 400;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlogEntry {
    #[serde(default)]
    pub sys: EntrySys,
    pub slug: Slug,
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub cover_image: Option<Asset>,
    #[serde(default)]
    pub content: RichTextDocument,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EntrySys {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
    #[serde(default)]
    pub updated_at: Option<chrono::DateTime<chrono::Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Asset {
    pub url: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub width: Option<u32>,
    #[serde(default)]
    pub height: Option<u32>,
}

/// A structured rich-text body. The page never looks inside it; only a
/// [`crate::render::rich_text::RichTextRenderer`] does.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RichTextDocument(serde_json::Value);

impl RichTextDocument {
    pub fn new(value: serde_json::Value) -> RichTextDocument {
        RichTextDocument(value)
    }

    pub fn as_value(&self) -> &serde_json::Value {
        &self.0
    }
}

impl BlogEntry {
    pub fn cover_alt_text(&self) -> String {
        format!("Cover Image for {}", self.title)
    }
}

/// Surrounding whitespace is dropped; a slug with nothing left is no slug at all.
pub fn normalize_slug(slug: &str) -> Option<&str> {
    let slug = slug.trim();
    (!slug.is_empty()).then_some(slug)
}

/// Contentful hands out protocol-relative asset urls (`//images.ctfassets.net/...`).
pub fn absolute_url(url: &str) -> String {
    if url.starts_with("//") {
        format!("https:{url}")
    } else {
        url.to_string()
    }
}

use crate::blog::BlogEntry;

pub mod contentful;
pub mod memory;

pub use contentful::ContentfulClient;
pub use memory::MemorySource;

#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("request to content backend failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("content backend answered {status}: {body}")]
    Status { status: u16, body: String },
    #[error("malformed response from content backend: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("fetch was cancelled")]
    Cancelled,
}

/// Where blog entries come from. Shared behind an `Arc` and handed to every page.
#[async_trait::async_trait]
pub trait ContentSource: std::fmt::Debug + Send + Sync {
    async fn get_entries(&self, query: &EntryQuery) -> Result<Vec<BlogEntry>, FetchError>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryQuery {
    pub content_type: String,
    pub field: String,
    pub value: String,
    pub limit: usize,
}

impl EntryQuery {
    pub fn post_by_slug(slug: &str) -> EntryQuery {
        EntryQuery {
            content_type: crate::blog::POST_CONTENT_TYPE.to_string(),
            field: crate::blog::SLUG_FIELD.to_string(),
            value: slug.to_string(),
            limit: 1,
        }
    }

    pub fn to_params(&self) -> Vec<(String, String)> {
        vec![
            ("content_type".to_string(), self.content_type.clone()),
            (self.field.clone(), self.value.clone()),
            ("limit".to_string(), self.limit.to_string()),
        ]
    }
}

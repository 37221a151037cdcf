use super::{ContentSource, EntryQuery, FetchError};
use crate::blog::BlogEntry;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Serves `post` entries from memory, either loaded from a fixtures file for
/// local development or built directly in tests.
#[derive(Debug, Default)]
pub struct MemorySource {
    entries: Vec<BlogEntry>,
    calls: AtomicUsize,
}

impl MemorySource {
    pub fn new(entries: Vec<BlogEntry>) -> MemorySource {
        MemorySource {
            entries,
            calls: AtomicUsize::new(0),
        }
    }

    /// Reads a JSON array of entries.
    pub async fn from_file(path: &std::path::Path) -> std::io::Result<MemorySource> {
        let file = tokio::fs::read(path).await?;
        let entries = serde_json::from_slice::<Vec<BlogEntry>>(&file)?;

        tracing::info!("loaded {} fixture entries from {path:?}", entries.len());
        Ok(MemorySource::new(entries))
    }

    /// How many queries have been answered so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl ContentSource for MemorySource {
    async fn get_entries(&self, query: &EntryQuery) -> Result<Vec<BlogEntry>, FetchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        if query.content_type != crate::blog::POST_CONTENT_TYPE
            || query.field != crate::blog::SLUG_FIELD
        {
            return Ok(Vec::new());
        }

        Ok(self
            .entries
            .iter()
            .filter(|entry| entry.slug == query.value)
            .take(query.limit)
            .cloned()
            .collect())
    }
}

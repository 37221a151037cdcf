use crate::blog::{BlogEntry, Slug};
use crate::content::{ContentSource, EntryQuery, FetchError};
use std::sync::Arc;
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;

#[derive(Debug, Clone, PartialEq)]
pub struct PageState {
    pub is_loading: bool,
    pub blog_entry: Option<BlogEntry>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Loading,
    Loaded,
    Empty,
}

/// What a page shows at one point in time, tagged with the fetch that produced it.
#[derive(Debug, Clone, PartialEq)]
pub struct PageSnapshot {
    pub slug: Option<Slug>,
    pub generation: u64,
    pub state: PageState,
}

impl PageSnapshot {
    fn mounted() -> PageSnapshot {
        PageSnapshot {
            slug: None,
            generation: 0,
            state: PageState {
                is_loading: true,
                blog_entry: None,
            },
        }
    }

    pub fn phase(&self) -> Phase {
        match (self.generation, &self.state) {
            (0, _) => Phase::Idle,
            (_, PageState { is_loading: true, .. }) => Phase::Loading,
            (_, PageState { blog_entry: Some(_), .. }) => Phase::Loaded,
            (_, PageState { blog_entry: None, .. }) => Phase::Empty,
        }
    }
}

/// One blog page bound to a route. Every slug change issues exactly one fetch;
/// a response is only applied while its slug and generation are still current.
/// Dropping the page cancels anything still in flight.
#[derive(Debug)]
pub struct BlogPage {
    source: Arc<dyn ContentSource>,
    state: Arc<watch::Sender<PageSnapshot>>,
    in_flight: Option<CancellationToken>,
    lifetime: CancellationToken,
}

impl BlogPage {
    pub fn new(source: Arc<dyn ContentSource>) -> BlogPage {
        let (state, _) = watch::channel(PageSnapshot::mounted());
        BlogPage {
            source,
            state: Arc::new(state),
            in_flight: None,
            lifetime: CancellationToken::new(),
        }
    }

    pub fn snapshot(&self) -> PageSnapshot {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<PageSnapshot> {
        self.state.subscribe()
    }

    /// Points the page at `slug`. Returns `false` when it already shows that slug.
    pub fn navigate(&mut self, slug: &str) -> bool {
        let generation = {
            let current = self.state.borrow();
            if current.generation > 0 && current.slug.as_deref() == Some(slug) {
                return false;
            }
            current.generation + 1
        };

        if let Some(previous) = self.in_flight.take() {
            previous.cancel();
        }

        self.state.send_replace(PageSnapshot {
            slug: Some(slug.to_string()),
            generation,
            state: PageState {
                is_loading: true,
                blog_entry: None,
            },
        });

        let token = self.lifetime.child_token();
        self.in_flight = Some(token.clone());

        let source = self.source.clone();
        let state = self.state.clone();
        let slug = slug.to_string();
        tokio::spawn(async move {
            tracing::debug!("Fetching blog entry {slug:?} (generation {generation})");
            let outcome = tokio::select! {
                biased;
                _ = token.cancelled() => Err(FetchError::Cancelled),
                outcome = fetch_entry(source.as_ref(), &slug) => outcome,
            };
            settle(&state, &slug, generation, outcome);
        });

        true
    }

    /// Waits until the current fetch has settled. Returns immediately on an idle page.
    pub async fn settled(&self) -> PageSnapshot {
        let mut updates = self.state.subscribe();
        if updates.borrow().generation == 0 {
            return updates.borrow().clone();
        }

        let settled = match updates.wait_for(|snapshot| !snapshot.state.is_loading).await {
            Ok(snapshot) => snapshot.clone(),
            Err(_) => self.snapshot(),
        };
        settled
    }
}

impl Drop for BlogPage {
    fn drop(&mut self) {
        self.lifetime.cancel();
    }
}

async fn fetch_entry(source: &dyn ContentSource, slug: &str) -> Result<Option<BlogEntry>, FetchError> {
    let entries = source.get_entries(&EntryQuery::post_by_slug(slug)).await?;
    tracing::debug!("Content backend returned {} entries for {slug:?}", entries.len());

    Ok(entries.into_iter().next())
}

fn settle(
    state: &watch::Sender<PageSnapshot>,
    slug: &str,
    generation: u64,
    outcome: Result<Option<BlogEntry>, FetchError>,
) {
    let blog_entry = match outcome {
        Ok(entry) => entry,
        Err(FetchError::Cancelled) => {
            tracing::debug!("Fetch for {slug:?} (generation {generation}) was cancelled");
            return;
        }
        Err(err) => {
            tracing::error!("Error fetching blog entry {slug:?}: {err}");
            None
        }
    };

    state.send_if_modified(|snapshot| {
        if snapshot.generation != generation || snapshot.slug.as_deref() != Some(slug) {
            tracing::debug!(
                "Discarding response for {slug:?} (generation {generation}), page moved on to generation {}",
                snapshot.generation
            );
            return false;
        }

        snapshot.state = PageState {
            is_loading: false,
            blog_entry,
        };
        true
    });
}

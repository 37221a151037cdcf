use crate::config::EmptyPolicy;
use crate::content::ContentSource;
use crate::page::BlogPage;
use crate::render::rich_text::{ContentfulRichText, RichTextRenderer};
use crate::render::PageView;
use std::sync::Arc;

pub type SharedState = axum::extract::State<Arc<State>>;
pub type NestedRouter = axum::Router<Arc<State>>;

#[derive(Debug)]
pub struct State {
    pub content: Arc<dyn ContentSource>,
    pub rich_text: Arc<dyn RichTextRenderer>,
    pub empty_policy: EmptyPolicy,
    pub stylesheet: String,
}

impl State {
    pub fn new(content: Arc<dyn ContentSource>) -> State {
        State {
            content,
            rich_text: Arc::new(ContentfulRichText),
            empty_policy: EmptyPolicy::default(),
            stylesheet: "/static/blog.css".to_string(),
        }
    }

    pub fn with_empty_policy(mut self, empty_policy: EmptyPolicy) -> State {
        self.empty_policy = empty_policy;
        self
    }

    pub fn with_stylesheet(mut self, stylesheet: impl Into<String>) -> State {
        self.stylesheet = stylesheet.into();
        self
    }

    pub fn open_page(&self) -> BlogPage {
        BlogPage::new(self.content.clone())
    }

    pub fn view(&self) -> PageView<'_> {
        PageView {
            stylesheet: &self.stylesheet,
            empty_policy: self.empty_policy,
            rich_text: self.rich_text.as_ref(),
        }
    }
}

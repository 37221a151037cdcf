use crate::blog::{BlogEntry, COVER_IMAGE_HEIGHT};
use crate::config::EmptyPolicy;
use crate::page::PageSnapshot;
use maud::{html, Markup, DOCTYPE};

pub mod image;
pub mod rich_text;

use rich_text::RichTextRenderer;

const DEFAULT_TITLE: &str = "Blog";

#[derive(Debug, Clone, Copy)]
pub struct PageView<'a> {
    pub stylesheet: &'a str,
    pub empty_policy: EmptyPolicy,
    pub rich_text: &'a dyn RichTextRenderer,
}

impl PageView<'_> {
    pub fn document(&self, snapshot: &PageSnapshot) -> Markup {
        let title = snapshot
            .state
            .blog_entry
            .as_ref()
            .map_or(DEFAULT_TITLE, |entry| entry.title.as_str());
        let live_url = snapshot
            .slug
            .as_deref()
            .map(|slug| format!("/blogs/{}/live", urlencoding::encode(slug)));

        html! {
            (DOCTYPE)
            html lang="en" {
                head {
                    meta charset="utf-8";
                    meta name="viewport" content="width=device-width, initial-scale=1";
                    title { (title) }
                    link rel="stylesheet" href=(self.stylesheet);
                }
                body {
                    main #blog-page data-live-url=[live_url] {
                        (self.fragment(snapshot))
                    }
                }
            }
        }
    }

    /// The part of the page that changes as the page moves between states.
    pub fn fragment(&self, snapshot: &PageSnapshot) -> Markup {
        html! {
            div.blog-page {
                @if snapshot.state.is_loading {
                    (loading_indicator())
                } @else {
                    @match &snapshot.state.blog_entry {
                        Some(entry) => {
                            (self.content_card(entry))
                        }
                        None => {
                            (self.empty_card())
                        }
                    }
                }
            }
        }
    }

    fn content_card(&self, entry: &BlogEntry) -> Markup {
        html! {
            article.blog-card {
                header.blog-header {
                    @if let Some(cover) = &entry.cover_image {
                        div.blog-cover {
                            (image::responsive_image(
                                &cover.url,
                                &entry.cover_alt_text(),
                                &image::COVER_TIERS,
                                COVER_IMAGE_HEIGHT,
                            ))
                        }
                    }
                    div.blog-heading {
                        h1.blog-title { (entry.title) }
                        p.blog-description { (entry.description) }
                    }
                }
                section.blog-content {
                    (self.rich_text.render(&entry.content))
                }
            }
        }
    }

    fn empty_card(&self) -> Markup {
        match self.empty_policy {
            EmptyPolicy::Blank => html! { article.blog-card {} },
            EmptyPolicy::NotFound => html! {
                article.blog-card.not-found {
                    p { "This post could not be found." }
                }
            },
        }
    }
}

pub fn loading_indicator() -> Markup {
    html! {
        div.loading role="status" aria-label="Loading" {
            span.pulse {}
            span.pulse {}
            span.pulse {}
        }
    }
}

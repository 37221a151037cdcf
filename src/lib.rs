pub mod blog;
pub mod config;
pub mod content;
pub mod page;
pub mod render;
pub mod routes;
pub mod state;

pub use crate::blog::{BlogEntry, Slug};
pub use crate::content::{ContentSource, EntryQuery, FetchError};
pub use crate::page::{BlogPage, PageSnapshot, PageState, Phase};

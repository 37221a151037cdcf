use crate::content::{ContentSource, ContentfulClient, FetchError, MemorySource};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tower_http::cors::CorsLayer;

#[derive(Debug, Clone, clap::Parser)]
#[command(name = "blog-page", version, about = "Serves blog posts from a headless CMS")]
pub struct Config {
    /// Address to listen on
    #[arg(long, env = "BLOG_PAGE_BIND", default_value = "0.0.0.0:8010")]
    pub bind: SocketAddr,

    #[command(flatten)]
    pub contentful: ContentfulSettings,

    /// Serve entries from a JSON file instead of Contentful
    #[arg(long, env = "BLOG_PAGE_FIXTURES")]
    pub fixtures: Option<PathBuf>,

    /// The only cross-origin caller allowed
    #[arg(long, env = "BLOG_PAGE_ALLOW_ORIGIN")]
    pub allow_origin: Option<String>,

    /// What to show when no entry matches the slug
    #[arg(long, env = "BLOG_PAGE_EMPTY_POLICY", value_enum, default_value_t = EmptyPolicy::Blank)]
    pub empty_policy: EmptyPolicy,

    #[arg(long, env = "BLOG_PAGE_STYLESHEET", default_value = "/static/blog.css")]
    pub stylesheet: String,
}

#[derive(Debug, Clone, clap::Args)]
pub struct ContentfulSettings {
    #[arg(long, env = "CONTENTFUL_SPACE_ID", required_unless_present = "fixtures")]
    pub space_id: Option<String>,

    /// Content Delivery (or Preview) API token
    #[arg(
        long,
        env = "CONTENTFUL_ACCESS_TOKEN",
        hide_env_values = true,
        required_unless_present = "fixtures"
    )]
    pub access_token: Option<String>,

    #[arg(long, env = "CONTENTFUL_ENVIRONMENT", default_value = "master")]
    pub environment: String,

    #[arg(long, env = "CONTENTFUL_API_BASE", default_value = "https://cdn.contentful.com")]
    pub api_base: String,

    #[arg(long, env = "CONTENTFUL_CONNECT_TIMEOUT_SECS", default_value_t = 10)]
    pub connect_timeout_secs: u64,
}

/// Whether a slug with no entry gets a blank card or an explicit message and a 404.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum EmptyPolicy {
    #[default]
    Blank,
    NotFound,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("missing setting {0}")]
    Missing(&'static str),
    #[error("couldn't load fixtures from {path:?}: {source}")]
    Fixtures {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("couldn't build Contentful client: {0}")]
    Client(#[from] FetchError),
    #[error("invalid allowed origin {0:?}")]
    InvalidOrigin(String),
}

impl Config {
    pub async fn content_source(&self) -> Result<Arc<dyn ContentSource>, ConfigError> {
        if let Some(path) = &self.fixtures {
            let source = MemorySource::from_file(path)
                .await
                .map_err(|source| ConfigError::Fixtures {
                    path: path.clone(),
                    source,
                })?;
            return Ok(Arc::new(source));
        }

        Ok(Arc::new(self.contentful.client()?))
    }

    pub fn cors_layer(&self) -> Result<CorsLayer, ConfigError> {
        let Some(origin) = self.allow_origin.as_deref() else {
            return Ok(CorsLayer::new());
        };
        let origin = axum::http::HeaderValue::from_str(origin)
            .map_err(|_| ConfigError::InvalidOrigin(origin.to_string()))?;

        Ok(CorsLayer::new()
            .allow_origin(tower_http::cors::AllowOrigin::exact(origin))
            .allow_headers(tower_http::cors::Any))
    }
}

impl ContentfulSettings {
    pub fn client(&self) -> Result<ContentfulClient, ConfigError> {
        let space_id = self
            .space_id
            .as_deref()
            .ok_or(ConfigError::Missing("CONTENTFUL_SPACE_ID"))?;
        let access_token = self
            .access_token
            .clone()
            .ok_or(ConfigError::Missing("CONTENTFUL_ACCESS_TOKEN"))?;

        Ok(ContentfulClient::new(
            &self.api_base,
            space_id,
            &self.environment,
            access_token,
            std::time::Duration::from_secs(self.connect_timeout_secs),
        )?)
    }
}

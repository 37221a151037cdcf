use anyhow::Context;
use axum::ServiceExt;
use blog_page::config::Config;
use blog_page::state::State;
use clap::Parser;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("blog_page=info,tower_http=info")),
        )
        .with_target(false)
        .init();

    let config = Config::parse();

    if let Err(err) = serve(config).await {
        tracing::error!("Error: {err}");
        for cause in err.chain().skip(1) {
            tracing::error!("Caused by: {cause}");
        }
        std::process::exit(1);
    }
}

async fn serve(config: Config) -> anyhow::Result<()> {
    let content = config
        .content_source()
        .await
        .context("couldn't set up content source")?;
    let cors = config.cors_layer()?;

    let state = std::sync::Arc::new(
        State::new(content)
            .with_empty_policy(config.empty_policy)
            .with_stylesheet(config.stylesheet.clone()),
    );
    let app = blog_page::routes::app(state, cors);

    let listener = tokio::net::TcpListener::bind(config.bind)
        .await
        .with_context(|| format!("couldn't bind {}", config.bind))?;
    tracing::info!("Serving blog pages on http://{}", config.bind);

    axum::serve(
        listener,
        ServiceExt::<axum::extract::Request>::into_make_service(app),
    )
    .await
    .context("error serving app")
}

use crate::blog::{normalize_slug, Slug};
use crate::config::EmptyPolicy;
use crate::page::Phase;
use crate::state::SharedState;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use maud::Markup;

pub(super) async fn get(
    State(state): SharedState,
    Path(slug): Path<Slug>,
) -> Result<(StatusCode, Markup), StatusCode> {
    let Some(slug) = normalize_slug(&slug) else {
        return Err(StatusCode::NOT_FOUND);
    };

    let mut page = state.open_page();
    page.navigate(slug);
    let snapshot = page.settled().await;

    let status = match (snapshot.phase(), state.empty_policy) {
        (Phase::Empty, EmptyPolicy::NotFound) => StatusCode::NOT_FOUND,
        _ => StatusCode::OK,
    };

    Ok((status, state.view().document(&snapshot)))
}

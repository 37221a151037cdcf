use crate::blog::{normalize_slug, Slug};
use crate::state::{SharedState, State};
use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::Path;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use std::sync::Arc;

/// Streams the page as HTML fragments. Every text message from the client is
/// taken as a new slug to navigate to.
pub(super) async fn get(
    axum::extract::State(state): SharedState,
    Path(slug): Path<Slug>,
    ws: WebSocketUpgrade,
) -> Response {
    let Some(slug) = normalize_slug(&slug).map(str::to_string) else {
        return StatusCode::NOT_FOUND.into_response();
    };

    ws.on_upgrade(move |socket| serve_live_page(socket, state, slug))
}

async fn serve_live_page(mut socket: WebSocket, state: Arc<State>, slug: Slug) {
    let mut page = state.open_page();
    let mut updates = page.subscribe();
    page.navigate(&slug);

    loop {
        let snapshot = updates.borrow_and_update().clone();
        let fragment = state.view().fragment(&snapshot).into_string();
        let current_slug = snapshot.slug.unwrap_or_default();

        if let Err(err) = socket.send(Message::Text(fragment)).await {
            tracing::debug!("Live page for {current_slug:?} closed while sending: {err}");
            return;
        }

        loop {
            tokio::select! {
                changed = updates.changed() => {
                    if changed.is_err() {
                        return;
                    }
                    break;
                }
                message = socket.recv() => match message {
                    Some(Ok(Message::Text(next_slug))) => {
                        let Some(next_slug) = normalize_slug(&next_slug) else {
                            continue;
                        };
                        if page.navigate(next_slug) {
                            tracing::debug!(
                                "Live page navigated from {current_slug:?} to {next_slug:?}"
                            );
                        }
                    }
                    Some(Ok(Message::Close(_))) | None => {
                        tracing::debug!("Live page for {current_slug:?} closed");
                        return;
                    }
                    Some(Ok(_)) => (),
                    Some(Err(err)) => {
                        tracing::debug!("Live page socket for {current_slug:?} failed: {err}");
                        return;
                    }
                },
            }
        }
    }
}

//! HTTP front end.
//!
//! Every request under the mount path goes through one handler: the path is
//! split into segments, resolved, and answered from a single store snapshot.

use std::borrow::Cow;
use std::sync::Arc;

use axum::extract::State;
use axum::http::{header, HeaderMap, Method, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::{Json, Router};
use tokio::sync::watch;

use crate::config::ServerSettings;
use crate::resolver::query::{self, Reply};
use crate::resolver::{self, NotFound};
use crate::{Error, MembershipStore, Result};

#[derive(Clone)]
struct AppState {
    store: Arc<MembershipStore>,
    /// Mount path without a trailing slash; empty when mounted at `/`.
    mount_path: Arc<str>,
}

/// Build the router serving `store` under `mount_path`.
pub fn router(store: Arc<MembershipStore>, mount_path: &str) -> Router {
    let state = AppState {
        store,
        mount_path: Arc::from(mount_path.trim_end_matches('/')),
    };

    Router::new().fallback(dispatch).with_state(state)
}

/// Serve until `shutdown_rx` fires.
pub async fn serve(
    settings: &ServerSettings,
    store: Arc<MembershipStore>,
    mut shutdown_rx: watch::Receiver<()>,
) -> Result<()> {
    let listen_addr = settings.listen_addr()?;
    let router = router(store, &settings.mount_path);

    let listener = tokio::net::TcpListener::bind(listen_addr).await?;
    log::info!(
        "Serving {} on http://{}",
        settings.mount_path,
        listen_addr
    );

    axum::serve(listener, router)
        .with_graceful_shutdown(async move {
            let _ = shutdown_rx.changed().await;
        })
        .await
        .map_err(|e| Error::Server(e.to_string()))
}

async fn dispatch(
    State(state): State<AppState>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
) -> Response {
    let response = if method == Method::GET || method == Method::HEAD {
        match answer(&state, uri.path()) {
            Ok(Reply::Listing(listing)) => (StatusCode::OK, Json(listing)).into_response(),
            Ok(Reply::Found) => StatusCode::OK.into_response(),
            Err(not_found) => not_found_response(&headers, not_found),
        }
    } else {
        (
            StatusCode::METHOD_NOT_ALLOWED,
            [(header::ALLOW, "GET, HEAD")],
        )
            .into_response()
    };

    log::debug!("{} {} -> {}", method, uri.path(), response.status());
    response
}

fn answer(state: &AppState, path: &str) -> std::result::Result<Reply, NotFound> {
    let segments = split_path(&state.mount_path, path).ok_or(NotFound::Resource)?;
    let route = resolver::resolve(&segments)?;
    query::execute(&state.store.snapshot(), &route)
}

/// Strip `mount_path` from `path` and percent-decode the remaining segments.
///
/// Empty segments are dropped, so `/users/` and `/users` are the same.
/// Returns `None` if `path` is outside the mount path or not valid UTF-8.
fn split_path(mount_path: &str, path: &str) -> Option<Vec<String>> {
    let rest = path.strip_prefix(mount_path)?;
    if !rest.is_empty() && !rest.starts_with('/') {
        return None;
    }

    rest.split('/')
        .filter(|segment| !segment.is_empty())
        .map(|segment| urlencoding::decode(segment).ok().map(Cow::into_owned))
        .collect()
}

fn not_found_response(headers: &HeaderMap, not_found: NotFound) -> Response {
    let accept = headers
        .get(header::ACCEPT)
        .and_then(|v| v.to_str().ok());

    match accept {
        Some(accept_str) if accept_str.contains("application/json") => {
            let err_msg = serde_json::json!({ "msg": not_found.to_string() });
            (StatusCode::NOT_FOUND, Json(err_msg)).into_response()
        }
        _ => (
            StatusCode::NOT_FOUND,
            [(header::CONTENT_TYPE, "text/plain")],
            not_found.to_string(),
        )
            .into_response(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(list: &[&str]) -> Option<Vec<String>> {
        Some(list.iter().map(|s| s.to_string()).collect())
    }

    #[test]
    fn test_split_path_under_mount() {
        assert_eq!(split_path("/slugs", "/slugs"), strings(&[]));
        assert_eq!(split_path("/slugs", "/slugs/"), strings(&[]));
        assert_eq!(
            split_path("/slugs", "/slugs/users/John/"),
            strings(&["users", "John"])
        );
    }

    #[test]
    fn test_split_path_outside_mount() {
        assert_eq!(split_path("/slugs", "/"), None);
        assert_eq!(split_path("/slugs", "/slugsx/users"), None);
        assert_eq!(split_path("/slugs", "/other/users"), None);
    }

    #[test]
    fn test_split_path_root_mount() {
        assert_eq!(split_path("", "/"), strings(&[]));
        assert_eq!(split_path("", "/groups//Human"), strings(&["groups", "Human"]));
    }

    #[test]
    fn test_split_path_decodes_segments() {
        assert_eq!(
            split_path("", "/users/John%20Smith"),
            strings(&["users", "John Smith"])
        );
        assert_eq!(split_path("", "/users/%FF"), None);
    }
}

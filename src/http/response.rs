//! Outcome to HTTP response mapping.
//!
//! # Responsibilities
//! - Map each resolution outcome to a status code and body
//! - Detect the content type of resolved files
//! - Validate cached copies with `ETag` / `If-None-Match`
//!
//! # Design Decisions
//! - Not-found (404) and unreadable content (503) stay distinguishable
//! - ETag is the content hash of the exact bytes being served. This is the
//!   value `ContentProvider::hash` yields for those bytes, computed from the
//!   copy already read so the provider is not read a second time and the tag
//!   cannot describe a newer version than the body

use axum::{
    body::Body,
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};

use crate::content::provider::content_hash;
use crate::http::mime;
use crate::render::ItemRenderer;
use crate::resolve::{Outcome, ResolveError, ResolvedFile};
use crate::route::Route;

/// Build the response for a resolution outcome.
pub fn outcome_response(
    outcome: Outcome,
    renderer: &dyn ItemRenderer,
    theme_route: &Route,
    if_none_match: Option<&str>,
) -> Response {
    match outcome {
        Outcome::ResolvedFile(resolved) => file_response(resolved, if_none_match),
        Outcome::ResolvedItem(item) => match renderer.render(&item, theme_route) {
            Ok(body) => (
                StatusCode::OK,
                [(header::CONTENT_TYPE, renderer.content_type())],
                body,
            )
                .into_response(),
            Err(e) => {
                tracing::error!(route = %item.route(), error = %e, "Failed to render item");
                (StatusCode::INTERNAL_SERVER_ERROR, "Failed to render item").into_response()
            }
        },
        Outcome::NotFound { route } => {
            (StatusCode::NOT_FOUND, format!("item {:?} not found.", route.as_str())).into_response()
        }
        Outcome::Error(ResolveError::MalformedRoute(e)) => {
            (StatusCode::BAD_REQUEST, e.to_string()).into_response()
        }
        Outcome::Error(ResolveError::ContentUnavailable { route, .. }) => (
            StatusCode::SERVICE_UNAVAILABLE,
            format!("content for {:?} is unavailable.", route.as_str()),
        )
            .into_response(),
        Outcome::Error(ResolveError::Cancelled) => {
            (StatusCode::REQUEST_TIMEOUT, "Request cancelled").into_response()
        }
    }
}

fn file_response(resolved: ResolvedFile, if_none_match: Option<&str>) -> Response {
    // Same digest as `File::hash`, taken over the bytes in hand.
    let etag = format!("\"{}\"", content_hash(&resolved.data));
    let etag_value = HeaderValue::from_str(&etag).ok();

    if if_none_match.is_some_and(|tags| etag_matches(tags, &etag)) {
        let mut response = StatusCode::NOT_MODIFIED.into_response();
        if let Some(value) = etag_value {
            response.headers_mut().insert(header::ETAG, value);
        }
        return response;
    }

    let name = resolved.file.route().last_segment().unwrap_or_default();
    let content_type = mime::detect(&resolved.data, name);

    let mut response = Response::new(Body::from(resolved.data));
    response
        .headers_mut()
        .insert(header::CONTENT_TYPE, HeaderValue::from_static(content_type));
    if let Some(value) = etag_value {
        response.headers_mut().insert(header::ETAG, value);
    }
    response
}

fn etag_matches(header_value: &str, etag: &str) -> bool {
    header_value
        .split(',')
        .map(str::trim)
        .any(|tag| tag == "*" || tag.trim_start_matches("W/") == etag)
}

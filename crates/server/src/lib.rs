//! Ledgerdesk server library.
//!
//! Session-authenticated JSON backend for a small business: customers,
//! catalogue items, invoices, quotations, users, company settings, an
//! activity log, and backup/restore of the single-file SQLite store.
//!
//! The binary in `main.rs` wires configuration, tracing, and Sentry around
//! [`app`]; integration tests drive [`app`] directly.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;

use axum::{Router, extract::DefaultBodyLimit};
use tower_http::services::ServeDir;
use tower_http::trace::{DefaultOnResponse, OnResponse, TraceLayer};
use tracing::Span;

use middleware::create_session_layer;
use state::AppState;

/// Build the full application router.
///
/// JSON routes live under `/api`; any other path is served from the
/// configured public directory.
pub fn app(state: AppState) -> Router {
    let session_layer = create_session_layer(state.config());
    let public_dir = ServeDir::new(&state.config().public_dir);
    let body_limit = DefaultBodyLimit::max(state.config().max_upload_bytes);

    Router::new()
        .merge(routes::routes())
        .fallback_service(public_dir)
        .layer(body_limit)
        .layer(session_layer)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &axum::http::Request<_>| {
                    tracing::info_span!(
                        "http_request",
                        method = %request.method(),
                        uri = %request.uri(),
                        status = tracing::field::Empty,
                        latency_ms = tracing::field::Empty,
                    )
                })
                .on_response(
                    |response: &axum::http::Response<_>,
                     latency: std::time::Duration,
                     span: &Span| {
                        span.record("status", response.status().as_u16());
                        span.record(
                            "latency_ms",
                            u64::try_from(latency.as_millis()).unwrap_or(u64::MAX),
                        );
                        DefaultOnResponse::default().on_response(response, latency, span);
                    },
                ),
        )
        .with_state(state)
        // Sentry layers (outermost for full request coverage)
        .layer(sentry_tower::NewSentryLayer::new_from_top())
        .layer(sentry_tower::SentryHttpLayer::new().enable_transaction())
}

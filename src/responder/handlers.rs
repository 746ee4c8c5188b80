//! Responder Handlers
//!
//! HTTP request handlers for each responder endpoint.

use std::sync::Arc;

use axum::{
    extract::State,
    http::{header, Method, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use tracing::{debug, Span};

use crate::codec;
use crate::error::ResponderError;
use crate::models::{CachedResource, ErrorResponse, HealthResponse};

/// State shared across handlers: the resource being served and the span
/// that parents every request.
#[derive(Debug, Clone)]
pub struct ResponderState {
    pub resource: Arc<CachedResource>,
    pub span: Span,
}

impl ResponderState {
    pub fn new(resource: CachedResource) -> Self {
        Self {
            resource: Arc::new(resource),
            span: Span::none(),
        }
    }

    /// Scopes the responder's request and lifecycle events under `span`.
    pub fn with_span(mut self, span: Span) -> Self {
        self.span = span;
        self
    }
}

impl Default for ResponderState {
    fn default() -> Self {
        Self::new(CachedResource::test_resource())
    }
}

/// Handler for GET /test
pub async fn test_handler(
    State(state): State<ResponderState>,
) -> Result<Response, ResponderError> {
    let body = codec::encode(&state.resource)?;
    debug!(bytes = body.len(), "serving test resource");

    Ok(([(header::CONTENT_TYPE, codec::CONTENT_TYPE)], body).into_response())
}

/// Fallback for non-GET methods on resource routes.
pub async fn method_not_allowed(method: Method) -> (StatusCode, Json<ErrorResponse>) {
    debug!(%method, "rejecting unsupported method");
    (
        StatusCode::METHOD_NOT_ALLOWED,
        Json(ErrorResponse::new("method not supported")),
    )
}

/// Handler for GET /health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}

//! Responder Routes
//!
//! Configures the Axum router for the static responder.

use axum::{extract::Request, routing::get, Router};
use tower_http::trace::TraceLayer;
use tracing::info_span;

use super::handlers::{health_handler, method_not_allowed, test_handler, ResponderState};

/// Builds the responder router.
///
/// # Middleware
/// - Tracing: one `request` span per request, parented by the state's span
pub fn create_router(state: ResponderState) -> Router {
    let parent = state.span.clone();
    let trace = TraceLayer::new_for_http().make_span_with(move |request: &Request| {
        info_span!(
            parent: &parent,
            "request",
            method = %request.method(),
            uri = %request.uri(),
        )
    });

    Router::new()
        .route("/test", get(test_handler).fallback(method_not_allowed))
        .route("/health", get(health_handler))
        .layer(trace)
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec;
    use crate::models::CachedResource;
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use std::sync::{Arc, Mutex};
    use tower::util::ServiceExt;
    use tracing::span::{Attributes, Id};
    use tracing::Subscriber;
    use tracing_subscriber::layer::{Context, Layer, SubscriberExt};
    use tracing_subscriber::registry::LookupSpan;

    fn create_test_app() -> Router {
        create_router(ResponderState::default())
    }

    #[tokio::test]
    async fn test_get_test_resource() {
        let response = create_test_app()
            .oneshot(Request::builder().uri("/test").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert_eq!(
            codec::decode(&bytes).unwrap(),
            CachedResource::test_resource()
        );
    }

    #[tokio::test]
    async fn test_non_get_methods_rejected() {
        for method in ["POST", "PUT", "DELETE", "PATCH"] {
            let response = create_test_app()
                .oneshot(
                    Request::builder()
                        .method(method)
                        .uri("/test")
                        .body(Body::empty())
                        .unwrap(),
                )
                .await
                .unwrap();

            assert_eq!(
                response.status(),
                StatusCode::METHOD_NOT_ALLOWED,
                "{} should be rejected",
                method
            );
        }
    }

    #[tokio::test]
    async fn test_health_endpoint() {
        let response = create_test_app()
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    // Records each new span's name with its parent's name.
    #[derive(Clone, Default)]
    struct SpanTree(Arc<Mutex<Vec<(String, Option<String>)>>>);

    impl<S> Layer<S> for SpanTree
    where
        S: Subscriber + for<'a> LookupSpan<'a>,
    {
        fn on_new_span(&self, _attrs: &Attributes<'_>, id: &Id, ctx: Context<'_, S>) {
            if let Some(span) = ctx.span(id) {
                let parent = span.parent().map(|parent| parent.name().to_string());
                self.0.lock().unwrap().push((span.name().to_string(), parent));
            }
        }
    }

    #[tokio::test]
    async fn test_requests_are_scoped_under_injected_span() {
        let tree = SpanTree::default();
        let _guard = tracing::subscriber::set_default(tracing_subscriber::registry().with(tree.clone()));

        let state = ResponderState::default().with_span(tracing::info_span!("responder"));
        let response = create_router(state)
            .oneshot(Request::builder().uri("/test").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let spans = tree.0.lock().unwrap().clone();
        assert!(spans.contains(&("request".to_string(), Some("responder".to_string()))));
    }

    #[tokio::test]
    async fn test_unknown_path_not_found() {
        let response = create_test_app()
            .oneshot(Request::builder().uri("/other").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}

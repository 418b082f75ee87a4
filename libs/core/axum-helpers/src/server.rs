//! Router layering and graceful serving for the HTTP gateway.

use crate::errors::handlers::not_found;
use crate::shutdown::ShutdownCoordinator;
use axum::Router;
use std::future::IntoFuture;
use std::io;
use std::time::Duration;
use tokio::net::TcpListener;
use tower_http::compression::CompressionLayer;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::{info, warn, Level};

/// Wrap domain routes with the gateway's cross-cutting layers:
/// - JSON 404 fallback
/// - request tracing
/// - response compression negotiated via `Accept-Encoding`
pub fn create_router(routes: Router) -> Router {
    routes
        .fallback(not_found)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(CompressionLayer::new())
}

/// Serve `router` on an already-bound listener until shutdown, then drain.
///
/// Once `shutdown` is cancelled the listener stops accepting and in-flight
/// requests get `grace` to finish. Whatever is still running after that is
/// dropped, which closes those connections.
///
/// Binding happens before this is called, so an unavailable port fails at
/// startup rather than here.
pub async fn serve_with_shutdown(
    listener: TcpListener,
    router: Router,
    shutdown: ShutdownCoordinator,
    grace: Duration,
) -> io::Result<()> {
    let addr = listener.local_addr()?;
    info!(%addr, "HTTP gateway listening");

    let drain = shutdown.clone();
    let server = axum::serve(listener, router.into_make_service())
        .with_graceful_shutdown(async move { drain.cancelled().await })
        .into_future();

    match shutdown.bounded(grace, server).await {
        Some(result) => {
            let result = result.inspect_err(|e| {
                tracing::error!(error = %e, "HTTP gateway encountered an error");
            });
            info!(%addr, "HTTP gateway stopped");
            result
        }
        None => {
            warn!(
                %addr,
                grace = ?grace,
                "HTTP gateway did not drain within the grace period, forcing close"
            );
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use axum::routing::get;
    use tower::ServiceExt;

    #[tokio::test]
    async fn test_unknown_route_is_json_404() {
        let router = create_router(Router::new().route("/ping", get(|| async { "pong" })));

        let response = router
            .oneshot(Request::builder().uri("/nope").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(
            response.headers()["content-type"].to_str().unwrap(),
            "application/json"
        );
    }

    #[tokio::test]
    async fn test_serve_stops_on_shutdown() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let shutdown = ShutdownCoordinator::new();
        let handle = tokio::spawn(serve_with_shutdown(
            listener,
            Router::new(),
            shutdown.clone(),
            Duration::from_secs(5),
        ));

        shutdown.shutdown();
        let result = tokio::time::timeout(Duration::from_secs(5), handle)
            .await
            .expect("server should stop")
            .unwrap();
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_serve_forces_close_after_grace() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let router = Router::new().route(
            "/slow",
            get(|| async {
                tokio::time::sleep(Duration::from_secs(60)).await;
                "late"
            }),
        );
        let shutdown = ShutdownCoordinator::new();
        let handle = tokio::spawn(serve_with_shutdown(
            listener,
            router,
            shutdown.clone(),
            Duration::from_millis(100),
        ));

        // Hold a request open so the graceful drain cannot finish
        let mut stream = tokio::net::TcpStream::connect(addr).await.unwrap();
        tokio::io::AsyncWriteExt::write_all(
            &mut stream,
            b"GET /slow HTTP/1.1\r\nHost: localhost\r\n\r\n",
        )
        .await
        .unwrap();
        tokio::time::sleep(Duration::from_millis(50)).await;

        shutdown.shutdown();
        let result = tokio::time::timeout(Duration::from_secs(5), handle)
            .await
            .expect("grace period should bound shutdown")
            .unwrap();
        assert!(result.is_ok());
    }
}

use std::time::Instant;

use axum::{
    body::Body,
    http::{HeaderName, HeaderValue, Request},
    middleware::Next,
    response::Response,
};
use tracing::Instrument;

use crate::context::RequestContext;

pub const REQUEST_ID_HEADER: HeaderName = HeaderName::from_static("x-request-id");

/// Tags every request with an id and logs its receipt and completion.
///
/// Handler events are emitted inside the request span, so they carry the
/// request id, method and URI.
pub async fn request_logging(mut req: Request<Body>, next: Next) -> Response {
    let ctx = RequestContext::new();
    let span = tracing::info_span!(
        "request",
        request_id = %ctx.request_id(),
        method = %req.method(),
        uri = %req.uri(),
    );
    req.extensions_mut().insert(ctx);

    async move {
        tracing::info!("received request");
        let started = Instant::now();

        let mut response = next.run(req).await;

        let latency_ms = crate::server::millis(started.elapsed());
        tracing::info!(status = response.status().as_u16(), latency_ms, "request completed");

        if let Ok(value) = HeaderValue::from_str(&ctx.request_id().to_string()) {
            response.headers_mut().insert(REQUEST_ID_HEADER, value);
        }
        response
    }
    .instrument(span)
    .await
}

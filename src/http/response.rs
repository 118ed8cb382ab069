//! HTTP response building module
//!
//! Provides builders for the status codes the wiki answers with, decoupled from page logic.

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::http::response::Builder;
use hyper::Response;

/// Build 304 Not Modified response
pub fn build_304_response(etag: &str) -> Response<Full<Bytes>> {
    let builder = Response::builder()
        .status(304)
        .header("ETag", etag)
        .header("Cache-Control", "public, max-age=3600");
    finish(builder, Bytes::new(), "304")
}

/// Build 400 Bad Request response
pub fn build_400_response() -> Response<Full<Bytes>> {
    build_text_response(400, "400 Bad Request")
}

/// Build 404 Not Found response
pub fn build_404_response() -> Response<Full<Bytes>> {
    build_text_response(404, "404 page not found")
}

/// Build 413 Payload Too Large response
pub fn build_413_response() -> Response<Full<Bytes>> {
    build_text_response(413, "413 Payload Too Large")
}

/// Build 415 Unsupported Media Type response
pub fn build_415_response() -> Response<Full<Bytes>> {
    build_text_response(415, "415 Unsupported Media Type")
}

/// Build 500 Internal Server Error response
///
/// The body is generic; callers log the underlying cause.
pub fn build_500_response() -> Response<Full<Bytes>> {
    build_text_response(500, "500 Internal Server Error")
}

/// Build 302 Found redirect response
pub fn build_redirect_response(target: &str) -> Response<Full<Bytes>> {
    let builder = Response::builder()
        .status(302)
        .header("Location", target)
        .header("Content-Type", "text/plain");
    finish(builder, Bytes::from_static(b"Redirecting..."), "302")
}

/// Build rendered page response
///
/// Pages change on every save, so they are never cached.
pub fn build_html_response(content: String, is_head: bool) -> Response<Full<Bytes>> {
    let builder = Response::builder()
        .status(200)
        .header("Content-Type", "text/html; charset=utf-8")
        .header("Content-Length", content.len())
        .header("Cache-Control", "no-store");
    let body = if is_head { Bytes::new() } else { Bytes::from(content) };
    finish(builder, body, "HTML")
}

/// Build static asset response with cache control
pub fn build_cached_response(
    data: Bytes,
    content_type: &str,
    etag: &str,
    is_head: bool,
) -> Response<Full<Bytes>> {
    let builder = Response::builder()
        .status(200)
        .header("Content-Type", content_type)
        .header("Content-Length", data.len())
        .header("ETag", etag)
        .header("Cache-Control", "public, max-age=3600");
    let body = if is_head { Bytes::new() } else { data };
    finish(builder, body, "200")
}

fn build_text_response(status: u16, text: &'static str) -> Response<Full<Bytes>> {
    let builder = Response::builder()
        .status(status)
        .header("Content-Type", "text/plain; charset=utf-8");
    finish(builder, Bytes::from_static(text.as_bytes()), text)
}

/// Attach the body; a builder error (bad header value) degrades to a bare 200
fn finish(builder: Builder, body: Bytes, label: &str) -> Response<Full<Bytes>> {
    builder.body(Full::new(body.clone())).unwrap_or_else(|e| {
        crate::logger::log_error(&format!("Failed to build {label} response: {e}"));
        Response::new(Full::new(body))
    })
}

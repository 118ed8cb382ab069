//! Request routing dispatch module
//!
//! Entry point for HTTP request processing: body size checks, path
//! classification, form extraction and dispatch. The request method is not
//! enforced; it only matters for HEAD responses and the access log.

use crate::config::AppState;
use crate::handler::Outcome;
use crate::handler::static_files;
use crate::http::{self, form};
use crate::logger::{self, AccessLogEntry};
use crate::routing::Route;
use http_body_util::{BodyExt, Full, LengthLimitError, Limited};
use hyper::body::{Body, Bytes, Incoming};
use hyper::{Method, Request, Response};
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

/// Request context encapsulating information needed for request processing
pub struct RequestContext<'a> {
    pub path: &'a str,
    pub is_head: bool,
    pub if_none_match: Option<String>,
}

/// Main entry point for HTTP request handling
pub async fn handle_request(
    req: Request<Incoming>,
    state: Arc<AppState>,
    peer_addr: SocketAddr,
) -> Result<Response<Full<Bytes>>, Infallible> {
    let started = Instant::now();
    let (parts, body) = req.into_parts();
    let path = parts.uri.path();
    let route = Route::parse(path);

    let mut entry = AccessLogEntry::new(
        peer_addr.ip().to_string(),
        parts.method.to_string(),
        path.to_string(),
    );
    entry.query = parts.uri.query().map(ToString::to_string);
    entry.http_version = format!("{:?}", parts.version).trim_start_matches("HTTP/").to_string();
    entry.referer = header_value(&parts.headers, "referer");
    entry.user_agent = header_value(&parts.headers, "user-agent");
    entry.operation = route.name();

    let ctx = RequestContext {
        path,
        is_head: parts.method == Method::HEAD,
        if_none_match: header_value(&parts.headers, "if-none-match"),
    };

    let response = match check_body_size(&parts.headers, state.config.http.max_body_size) {
        Some(resp) => resp,
        None => route_request(&ctx, route, &parts, body, &state).await,
    };

    if state.access_log() {
        entry.status = response.status().as_u16();
        entry.body_bytes = usize::try_from(response.body().size_hint().lower()).unwrap_or(0);
        entry.request_time_us = u64::try_from(started.elapsed().as_micros()).unwrap_or(u64::MAX);
        logger::log_access(&entry, &state.config.logging.access_log_format);
    }

    Ok(response)
}

/// Validate Content-Length header and return 413 if exceeded
fn check_body_size(
    headers: &hyper::HeaderMap,
    max_body_size: u64,
) -> Option<Response<Full<Bytes>>> {
    let size_str = headers.get("content-length")?.to_str().ok()?;
    match size_str.parse::<u64>() {
        Ok(size) if size > max_body_size => {
            logger::log_warning(&format!(
                "Request body too large: {size} bytes (max: {max_body_size})"
            ));
            Some(http::build_413_response())
        }
        Err(_) => {
            logger::log_warning(&format!(
                "Invalid Content-Length value: '{size_str}', skipping size check"
            ));
            None
        }
        _ => None,
    }
}

/// Serve static assets directly, run page operations on a blocking thread
async fn route_request(
    ctx: &RequestContext<'_>,
    route: Route,
    parts: &hyper::http::request::Parts,
    body: Incoming,
    state: &Arc<AppState>,
) -> Response<Full<Bytes>> {
    if let Route::Static(ref asset) = route {
        return static_files::serve_asset(ctx, &state.public_dir, asset).await;
    }

    let form_body = if is_form_request(&parts.headers) {
        match read_body(body, state.config.http.max_body_size).await {
            Ok(bytes) => Some(bytes),
            Err(resp) => return resp,
        }
    } else if route.writes_page() && !body.is_end_stream() {
        // Saving would replace the page with an empty body
        logger::log_warning(&format!(
            "Refusing {} body for {}",
            header_value(&parts.headers, "content-type").unwrap_or_else(|| "untyped".to_string()),
            ctx.path
        ));
        return http::build_415_response();
    } else {
        None
    };
    let form = form::Form::parse(parts.uri.query(), form_body.as_deref());

    let worker_state = Arc::clone(state);
    let outcome =
        tokio::task::spawn_blocking(move || worker_state.dispatcher.dispatch(&route, &form)).await;

    match outcome {
        Ok(outcome) => build_outcome_response(outcome, ctx.path, ctx.is_head),
        Err(e) => {
            logger::log_error(&format!("Handler for {} failed: {e}", ctx.path));
            http::build_500_response()
        }
    }
}

/// Collect the request body, bounded by `max_body_size`
async fn read_body(body: Incoming, max_body_size: u64) -> Result<Bytes, Response<Full<Bytes>>> {
    let limit = usize::try_from(max_body_size).unwrap_or(usize::MAX);
    match Limited::new(body, limit).collect().await {
        Ok(collected) => Ok(collected.to_bytes()),
        Err(e) if e.is::<LengthLimitError>() => {
            logger::log_warning(&format!("Request body exceeded {max_body_size} bytes"));
            Err(http::build_413_response())
        }
        Err(e) => {
            logger::log_warning(&format!("Failed to read request body: {e}"));
            Err(http::build_400_response())
        }
    }
}

/// Map a dispatch outcome onto an HTTP response
pub fn build_outcome_response(
    outcome: Outcome,
    path: &str,
    is_head: bool,
) -> Response<Full<Bytes>> {
    match outcome {
        Outcome::Render { html, .. } => http::build_html_response(html, is_head),
        Outcome::Redirect(location) => http::build_redirect_response(&location),
        Outcome::NotFound => http::build_404_response(),
        Outcome::InternalError(message) => {
            logger::log_error(&format!("{path}: {message}"));
            http::build_500_response()
        }
    }
}

fn is_form_request(headers: &hyper::HeaderMap) -> bool {
    headers
        .get("content-type")
        .and_then(|v| v.to_str().ok())
        .is_some_and(form::is_form_content_type)
}

fn header_value(headers: &hyper::HeaderMap, name: &str) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(ToString::to_string)
}

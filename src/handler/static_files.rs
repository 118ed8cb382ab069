//! Static file serving module
//!
//! Serves stylesheets, scripts and images from the public directory under
//! `/public/`, with MIME detection and `ETag` revalidation.

use crate::handler::router::RequestContext;
use crate::http::{self, cache, mime};
use crate::logger;
use http_body_util::Full;
use hyper::body::Bytes;
use hyper::Response;
use std::path::Path;
use tokio::fs;

/// Serve `relative` (the part after `/public/`) from `public_dir`
pub async fn serve_asset(
    ctx: &RequestContext<'_>,
    public_dir: &Path,
    relative: &str,
) -> Response<Full<Bytes>> {
    match load_asset(public_dir, relative).await {
        Some((content, content_type)) => build_asset_response(
            content,
            content_type,
            ctx.if_none_match.as_deref(),
            ctx.is_head,
        ),
        None => http::build_404_response(),
    }
}

/// Load a file below `public_dir`
///
/// Returns `None` for missing files, directories and anything that resolves
/// outside the public directory.
pub async fn load_asset(public_dir: &Path, relative: &str) -> Option<(Vec<u8>, &'static str)> {
    let decoded = urlencoding::decode(relative).ok()?;
    if decoded.is_empty() || decoded.starts_with('/') {
        return None;
    }

    let public_canonical = match fs::canonicalize(public_dir).await {
        Ok(p) => p,
        Err(e) => {
            logger::log_warning(&format!(
                "Public directory not found or inaccessible '{}': {e}",
                public_dir.display()
            ));
            return None;
        }
    };

    // Missing assets are an ordinary 404, not worth a warning
    let file_canonical = fs::canonicalize(public_dir.join(&*decoded)).await.ok()?;
    if !file_canonical.starts_with(&public_canonical) {
        logger::log_warning(&format!(
            "Path traversal attempt blocked: {relative} -> {}",
            file_canonical.display()
        ));
        return None;
    }
    if !fs::metadata(&file_canonical).await.ok()?.is_file() {
        return None;
    }

    let content = match fs::read(&file_canonical).await {
        Ok(c) => c,
        Err(e) => {
            logger::log_error(&format!(
                "Failed to read file '{}': {e}",
                file_canonical.display()
            ));
            return None;
        }
    };

    let content_type = mime::get_content_type(file_canonical.extension().and_then(|e| e.to_str()));
    Some((content, content_type))
}

/// Build asset response, or 304 when the client copy is current
fn build_asset_response(
    data: Vec<u8>,
    content_type: &str,
    if_none_match: Option<&str>,
    is_head: bool,
) -> Response<Full<Bytes>> {
    let etag = cache::generate_etag(&data);

    if cache::check_etag_match(if_none_match, &etag) {
        return http::build_304_response(&etag);
    }

    http::response::build_cached_response(Bytes::from(data), content_type, &etag, is_head)
}

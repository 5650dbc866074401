use crate::chain::{RequestContext, ResolveError, ResolvedAsset, resolve_in_locations};
use crate::registry::ResourceHandlerRegistration;
use crate::serve::etag::{etag_matches, generate_etag, modified_since};
use crate::serve::headers::HeaderBuilder;
use crate::serve::response::{AssetBody, AssetResponse, ConditionalHeaders};
use bytes::Bytes;
use http::{HeaderMap, HeaderValue, StatusCode};
use httpdate::fmt_http_date;
use std::path::PathBuf;
use tokio::fs;
use tracing::warn;

/// Resolves the request through the registration's chain and renders the
/// asset with conditional-request handling. The caller is responsible for
/// routing the request to the right registration (see
/// `HandlerRegistry::match_request`).
pub async fn handle_asset_request(
    registration: &ResourceHandlerRegistration,
    request_path: &str,
    conditional: &ConditionalHeaders,
) -> AssetResponse {
    let Some(rel_path) = registration.relative_request_path(request_path) else {
        return error_response(StatusCode::NOT_FOUND);
    };

    let ctx = RequestContext {
        accept_encoding: conditional.accept_encoding.clone(),
    };

    let resolved = match resolve(registration, &ctx, rel_path) {
        Ok(asset) => asset,
        Err(e) => return error_response(map_resolve_error(e)),
    };

    match render(registration, request_path, &resolved, conditional).await {
        Ok(response) => response,
        Err(status) => error_response(status),
    }
}

fn resolve(
    registration: &ResourceHandlerRegistration,
    ctx: &RequestContext,
    rel_path: &str,
) -> Result<ResolvedAsset, ResolveError> {
    match registration.chain() {
        Some(chain) => chain.resolve(ctx, rel_path, registration.locations()),
        None => resolve_in_locations(rel_path, registration.locations()).map(ResolvedAsset::plain),
    }
}

async fn render(
    registration: &ResourceHandlerRegistration,
    request_path: &str,
    resolved: &ResolvedAsset,
    conditional: &ConditionalHeaders,
) -> Result<AssetResponse, StatusCode> {
    let metadata = fs::metadata(&resolved.path)
        .await
        .map_err(|_| StatusCode::NOT_FOUND)?;
    if !metadata.is_file() {
        return Err(StatusCode::NOT_FOUND);
    }

    let modified = metadata.modified().ok();

    let mut body = fs::read(&resolved.path).await.map_err(map_io_error)?;

    // Transformers rewrite plain content only; precompressed variants are
    // served byte-for-byte.
    if let Some(chain) = registration.chain() {
        if resolved.encoding.is_none() {
            body = chain
                .transform(request_path, registration.locations(), body)
                .map_err(|e| {
                    warn!(request_path, error = %e, "asset transformation failed");
                    StatusCode::INTERNAL_SERVER_ERROR
                })?;
        }
    }

    // ETag covers the bytes actually sent, so transformed content gets its
    // own validator.
    let etag = generate_etag(body.len() as u64, modified);
    let last_modified = modified.map(fmt_http_date);

    let not_modified = match (
        conditional.if_none_match.as_deref(),
        conditional.if_modified_since.as_deref(),
    ) {
        (Some(inm), _) => etag_matches(&etag, inm),
        (None, Some(ims)) => !modified_since(modified, ims),
        _ => false,
    };

    let mime = content_type_for(resolved);

    // Build common headers (sent for both 200 and 304)
    let mut headers = HeaderBuilder::default();
    headers.content_type(mime.as_ref());
    headers.etag(&etag);
    if let Some(ref lm) = last_modified {
        headers.last_modified(lm);
    }
    if registration
        .chain()
        .is_some_and(|chain| chain.has_gzip_resolver())
    {
        headers.vary();
    }
    if let Some(policy) = registration.cache_policy() {
        headers.cache_control(policy);
    }
    if let Some(encoding) = resolved.encoding {
        headers.content_encoding(encoding);
    }

    if not_modified {
        headers.content_length("0");
        return Ok(AssetResponse {
            status: StatusCode::NOT_MODIFIED,
            headers: headers.build(),
            body: AssetBody::Empty,
        });
    }

    headers.content_length(&body.len().to_string());
    Ok(AssetResponse {
        status: StatusCode::OK,
        headers: headers.build(),
        body: AssetBody::Bytes(Bytes::from(body)),
    })
}

/// Content type of the asset as the client sees it: a precompressed variant
/// keeps the type of the file it stands in for.
fn content_type_for(resolved: &ResolvedAsset) -> mime_guess::Mime {
    let path: PathBuf = if resolved.encoding.is_some() {
        resolved.path.with_extension("")
    } else {
        resolved.path.clone()
    };
    mime_guess::from_path(&path).first_or_octet_stream()
}

fn map_resolve_error(err: ResolveError) -> StatusCode {
    match err {
        ResolveError::NotFound => StatusCode::NOT_FOUND,
        ResolveError::Forbidden => StatusCode::FORBIDDEN,
        ResolveError::BadPath => StatusCode::BAD_REQUEST,
    }
}

fn map_io_error(err: std::io::Error) -> StatusCode {
    match err.kind() {
        std::io::ErrorKind::NotFound => StatusCode::NOT_FOUND,
        std::io::ErrorKind::PermissionDenied => StatusCode::FORBIDDEN,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn error_response(status: StatusCode) -> AssetResponse {
    let mut headers = HeaderMap::new();
    headers.insert(http::header::CONTENT_LENGTH, HeaderValue::from_static("0"));

    AssetResponse {
        status,
        headers,
        body: AssetBody::Empty,
    }
}

use std::sync::Arc;

use axum::{
    extract::{Extension, Query},
    http::{header, HeaderMap, StatusCode},
    response::IntoResponse,
    routing::get,
    Json, Router,
};

use crate::app::{dto, errors};
use crate::app::services::AppServices;

pub fn router() -> Router {
    Router::new().route("/resolve", get(resolve_site))
}

/// Host header without its port. Bracketed IPv6 literals lose their brackets.
fn host_domain(headers: &HeaderMap) -> Option<String> {
    let host = headers.get(header::HOST)?.to_str().ok()?.trim();
    let domain = strip_port(host).trim();
    (!domain.is_empty()).then(|| domain.to_string())
}

fn strip_port(host: &str) -> &str {
    if let Some(rest) = host.strip_prefix('[') {
        return rest.split_once(']').map_or(rest, |(addr, _)| addr);
    }
    match host.rsplit_once(':') {
        // A bare IPv6 literal has more than one colon and no port to strip.
        Some((name, port)) if !name.contains(':') && port.bytes().all(|b| b.is_ascii_digit()) => name,
        _ => host,
    }
}

/// Site and channel serving `domain` (defaults to the request's Host).
///
/// The storefront token itself is never returned.
pub async fn resolve_site(
    Extension(services): Extension<Arc<AppServices>>,
    headers: HeaderMap,
    Query(query): Query<dto::SiteResolveQuery>,
) -> axum::response::Response {
    let domain = query
        .domain
        .map(|d| d.trim().to_string())
        .filter(|d| !d.is_empty())
        .or_else(|| host_domain(&headers));
    let Some(domain) = domain else {
        return errors::json_error(StatusCode::BAD_REQUEST, "missing_domain", "domain is required");
    };

    match services.sites.resolve(&domain, query.locale.as_deref()).await {
        Ok(resolved) => (StatusCode::OK, Json(resolved)).into_response(),
        Err(e) => errors::site_error_to_response(e),
    }
}

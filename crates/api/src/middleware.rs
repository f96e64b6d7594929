use axum::{
    extract::Query,
    http::{header, HeaderMap, HeaderValue, Request},
    middleware::Next,
    response::Response,
};
use serde::Deserialize;
use tracing::Instrument;
use uuid::Uuid;

use storefront_pricing::{ActivationCode, ACTIVATION_COOKIE};

use crate::context::ActivationContext;

pub const REQUEST_ID_HEADER: &str = "x-request-id";

#[derive(Debug, Deserialize)]
struct ActivationQuery {
    activation_code: Option<String>,
}

/// Resolve the activation code for a request.
///
/// A code in the query string wins and is remembered in a cookie on the
/// response; otherwise the cookie from a previous visit is used.
pub async fn activation_middleware(mut req: Request<axum::body::Body>, next: Next) -> Response {
    let from_query = Query::<ActivationQuery>::try_from_uri(req.uri())
        .ok()
        .and_then(|Query(q)| q.activation_code)
        .and_then(|raw| ActivationCode::parse(&raw));

    let code = from_query
        .clone()
        .or_else(|| cookie_value(req.headers(), ACTIVATION_COOKIE).and_then(ActivationCode::parse));

    req.extensions_mut().insert(ActivationContext::new(code));
    let mut res = next.run(req).await;

    if let Some(code) = from_query {
        match activation_cookie(&code) {
            Some(value) => {
                res.headers_mut().append(header::SET_COOKIE, value);
            }
            None => tracing::warn!("activation code not representable as a cookie; not persisted"),
        }
    }

    res
}

/// Attach a request id (incoming `x-request-id` or a fresh UUIDv7) and run the
/// request inside a span carrying it.
pub async fn request_id_middleware(req: Request<axum::body::Body>, next: Next) -> Response {
    let request_id = req
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| Uuid::now_v7().to_string());

    let span = tracing::info_span!(
        "request",
        request_id = %request_id,
        method = %req.method(),
        path = %req.uri().path(),
    );

    let mut res = next.run(req).instrument(span).await;
    if let Ok(value) = HeaderValue::from_str(&request_id) {
        res.headers_mut().insert(REQUEST_ID_HEADER, value);
    }
    res
}

/// Value of cookie `name` from the request's `Cookie` headers.
pub fn cookie_value<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(k, _)| *k == name)
        .map(|(_, v)| v.trim())
}

fn is_cookie_octet(c: char) -> bool {
    c.is_ascii_graphic() && !matches!(c, '"' | ',' | ';' | '\\')
}

/// `Set-Cookie` value persisting `code`, or `None` if the code cannot be a cookie value.
pub fn activation_cookie(code: &ActivationCode) -> Option<HeaderValue> {
    if !code.as_str().chars().all(is_cookie_octet) {
        return None;
    }
    HeaderValue::from_str(&format!(
        "{ACTIVATION_COOKIE}={}; HttpOnly; SameSite=Lax; Secure; Path=/",
        code.as_str()
    ))
    .ok()
}

use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;

use storefront_pricing::AdjustmentError;

use crate::sites::SiteError;

pub fn adjustment_error_to_response(err: AdjustmentError) -> axum::response::Response {
    match &err {
        AdjustmentError::Empty => json_error(StatusCode::BAD_REQUEST, "empty_price", err.to_string()),
        AdjustmentError::Malformed(_) => {
            json_error(StatusCode::BAD_REQUEST, "malformed_price", err.to_string())
        }
        AdjustmentError::BelowFloor { floor } => (
            StatusCode::UNPROCESSABLE_ENTITY,
            axum::Json(json!({
                "error": "below_floor_price",
                "message": err.to_string(),
                "floor_price": floor,
            })),
        )
            .into_response(),
    }
}

pub fn site_error_to_response(err: SiteError) -> axum::response::Response {
    tracing::error!(error = %err, "site lookup failed");
    match err {
        SiteError::Store(msg) => json_error(StatusCode::BAD_GATEWAY, "site_store_error", msg),
    }
}

pub fn json_error(
    status: StatusCode,
    code: &'static str,
    message: impl Into<String>,
) -> axum::response::Response {
    (
        status,
        axum::Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}

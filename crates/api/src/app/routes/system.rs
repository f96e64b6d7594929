use axum::{extract::Extension, http::StatusCode, Json};

use crate::app::dto;
use crate::context::ActivationContext;

pub async fn health() -> StatusCode {
    StatusCode::OK
}

/// The activation code in effect for this visitor, if any.
pub async fn activation(
    Extension(activation): Extension<ActivationContext>,
) -> Json<dto::ActivationResponse> {
    Json(dto::ActivationResponse {
        activation_code: activation.code().map(|c| c.as_str().to_string()),
    })
}

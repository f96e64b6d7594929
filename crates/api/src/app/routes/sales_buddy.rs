use axum::{
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    routing::post,
    Json, Router,
};

use storefront_pricing::{validate_adjustment, AdjusterSummary};

use crate::app::{dto, errors};
use crate::context::agent_role;

pub fn router() -> Router {
    Router::new().route("/price-adjustments/validate", post(validate_price_adjustment))
}

/// Check an agent's price override against the floor price.
pub async fn validate_price_adjustment(
    headers: HeaderMap,
    Json(body): Json<dto::PriceAdjustmentRequest>,
) -> axum::response::Response {
    let role = agent_role(&headers);
    let cost = body.cost.unwrap_or(0.0);
    let floor_multiplier = body.floor_multiplier.unwrap_or(0.0);

    let price = match validate_adjustment(&body.price, cost, floor_multiplier, role) {
        Ok(price) => price,
        Err(e) => return errors::adjustment_error_to_response(e),
    };

    let summary = AdjusterSummary::new(cost, floor_multiplier, role);
    (
        StatusCode::OK,
        Json(dto::PriceAdjustmentResponse {
            price,
            floor_price: summary.floor_price,
            role: summary.role.as_str(),
            floor_restricted: summary.floor_restricted,
        }),
    )
        .into_response()
}

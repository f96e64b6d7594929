use axum::{routing::post, Json, Router};

use crate::app::dto;

pub fn router() -> Router {
    Router::new().route("/line-pricing", post(line_pricing))
}

/// "% Off" labels and strikethrough totals for cart lines.
pub async fn line_pricing(
    Json(body): Json<dto::CartLinePricingRequest>,
) -> Json<dto::CartLinePricingResponse> {
    let lines = body.lines.iter().map(|line| line.pricing()).collect();
    Json(dto::CartLinePricingResponse { lines })
}

use axum::{routing::post, Json, Router};

use storefront_pricing::zero_tax;

use crate::app::dto;

pub fn router() -> Router {
    Router::new().route("/zero-tax", post(zero_tax_apportionment))
}

pub async fn zero_tax_apportionment(Json(body): Json<dto::ZeroTaxRequest>) -> Json<dto::ZeroTaxResponse> {
    let applies = zero_tax::has_zero_tax_coupon(&body.checkout.coupons);
    let lines = zero_tax::apportion(&body.checkout, &body.lines);
    let exempt_tax_total = zero_tax::exempt_tax_total(&lines);
    Json(dto::ZeroTaxResponse {
        applies,
        lines,
        exempt_tax_total,
    })
}

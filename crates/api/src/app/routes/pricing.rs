use std::sync::Arc;

use axum::{extract::Extension, routing::post, Json, Router};

use storefront_pricing::{annotate_listing, customer_group, deepest_category_path, quote_for_product, HitPricing};

use crate::app::dto;
use crate::app::services::AppServices;
use crate::context::ActivationContext;

pub fn router() -> Router {
    Router::new()
        .route("/activation-quote", post(activation_quote))
        .route("/listing", post(listing))
        .route("/customer-group-quote", post(customer_group_quote))
        .route("/hits", post(hits))
}

/// Product-detail price under the visitor's activation code.
pub async fn activation_quote(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(activation): Extension<ActivationContext>,
    Json(body): Json<dto::ActivationQuoteRequest>,
) -> Json<dto::ActivationQuoteResponse> {
    let quote = match (activation.code(), body.brand_id.or_else(|| body.product.brand_id())) {
        (Some(code), Some(brand_id)) => {
            let rules = services.rules.rules_for_code(code);
            quote_for_product(&body.product, Some(code), brand_id, &rules)
        }
        _ => None,
    };
    Json(dto::ActivationQuoteResponse { quote })
}

/// Listing, search or cart tiles with `activation_sale_price` attached.
pub async fn listing(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(activation): Extension<ActivationContext>,
    Json(body): Json<dto::ListingRequest>,
) -> Json<dto::ListingResponse> {
    let items = match activation.code() {
        Some(code) => {
            let rules = services.rules.rules_for_code(code);
            annotate_listing(body.items, Some(code), &rules)
        }
        None => body.items,
    };
    Json(dto::ListingResponse { items })
}

pub async fn customer_group_quote(
    Json(body): Json<dto::CustomerGroupQuoteRequest>,
) -> Json<dto::CustomerGroupQuoteResponse> {
    let path = deepest_category_path(&body.categories);
    let quote = customer_group::quote(&body.product, &path, &body.rules);
    tracing::debug!(
        customer_group_id = ?body.customer_group_id,
        rules = body.rules.len(),
        has_discount = quote.has_discount,
        "customer group quote"
    );
    Json(dto::CustomerGroupQuoteResponse { quote })
}

pub async fn hits(Json(body): Json<dto::HitsRequest>) -> Json<dto::HitsResponse> {
    let hits = body
        .hits
        .into_iter()
        .map(|h| HitPricing::new(h.price, h.sale_price))
        .collect();
    Json(dto::HitsResponse { hits })
}

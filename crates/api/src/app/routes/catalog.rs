use axum::{routing::post, Json, Router};

use storefront_catalog::metafield;
use storefront_catalog::variant::resolve_mpn;

use crate::app::dto;

pub fn router() -> Router {
    Router::new().route("/variant-details", post(variant_details))
}

/// Variant, MPN and specification table for a product page.
pub async fn variant_details(
    Json(body): Json<dto::VariantDetailsRequest>,
) -> Json<dto::VariantDetailsResponse> {
    let product = &body.product;
    let variant = product.current_variant().cloned();
    let has_variant_options = product.has_variant_options();

    let mpn_variant = body.variant_id.or(variant.as_ref().map(|v| v.entity_id));
    let mpn = resolve_mpn(&product.sku, &product.variants, mpn_variant);

    let use_variant_fields =
        variant.is_some() && has_variant_options && !body.variant_meta_fields.is_empty();
    let details = if use_variant_fields {
        metafield::group_details(&body.variant_meta_fields)
    } else {
        metafield::group_details(&body.product_meta_fields)
    };

    let included = metafield::included_items(product, &body.product_meta_fields, &body.variant_meta_fields);

    let fields = body
        .keys
        .iter()
        .map(|key| {
            let resolution =
                metafield::resolve(key, product, &body.product_meta_fields, &body.variant_meta_fields);
            dto::ResolvedField {
                key: key.clone(),
                value: resolution.effective().map(|f| metafield::format_value(&f.value)),
                message: resolution.source.message(),
                resolution,
            }
        })
        .collect();

    Json(dto::VariantDetailsResponse {
        variant,
        mpn,
        has_variant_options,
        details,
        included,
        fields,
    })
}

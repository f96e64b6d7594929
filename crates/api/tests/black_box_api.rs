use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use reqwest::StatusCode;
use serde_json::json;

use storefront_api::app::{build_app, services::AppServices};
use storefront_api::sites::{ChannelDefaults, InMemorySiteStore, SiteCacheSettings, SiteDirectory, SiteRecord};
use storefront_pricing::RuleBook;

struct TestServer {
    base_url: String,
    handle: tokio::task::JoinHandle<()>,
}

impl TestServer {
    async fn spawn() -> Self {
        // Same router as prod, with in-memory rules and sites, on an ephemeral port.
        let app = build_app(Arc::new(test_services()));
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind ephemeral port");
        let addr = listener.local_addr().unwrap();
        let base_url = format!("http://{}", addr);

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self { base_url, handle }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

fn test_services() -> AppServices {
    let rules = RuleBook::from_json(
        r#"[
            {"activation_code": "SPRING", "bc_brand_ids": [12], "discount": 50},
            {"activation_code": "SPRING", "bc_brand_ids": [47, 48], "discount": "20"},
            {"activation_code": "FALL", "bc_brand_ids": [47], "discount": 5}
        ]"#,
    )
    .unwrap();

    let store = InMemorySiteStore::new(vec![SiteRecord {
        id: "site-lamps".to_string(),
        name: Some("Lamps".to_string()),
        subdomain: Some("lamps".to_string()),
        custom_domain: None,
        channel_id: Some("77".to_string()),
        storefront_token: Some("secret-token".to_string()),
    }]);
    let defaults = ChannelDefaults {
        locale_channels: HashMap::from([("es".to_string(), "222".to_string())]),
        default_channel_id: Some("1".to_string()),
        default_storefront_token: None,
    };
    let sites = SiteDirectory::new(
        Arc::new(store),
        Some("shops.test".to_string()),
        SiteCacheSettings {
            ttl: Duration::from_secs(900),
            max_entries: 100,
        },
        defaults,
    );

    AppServices::new(Arc::new(rules), sites)
}

fn product(brand: u64, price: f64) -> serde_json::Value {
    json!({
        "entityId": 1,
        "sku": "LMP-1",
        "brand": {"entityId": brand},
        "prices": {"price": {"value": price, "currencyCode": "USD"}}
    })
}

#[tokio::test]
async fn health_returns_ok_with_request_id() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let res = client.get(srv.url("/health")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert!(res.headers().get("x-request-id").is_some());

    let res = client
        .get(srv.url("/health"))
        .header("x-request-id", "req-123")
        .send()
        .await
        .unwrap();
    assert_eq!(res.headers()["x-request-id"], "req-123");
}

#[tokio::test]
async fn activation_code_query_sets_cookie() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let res = client
        .get(srv.url("/v1/activation?activation_code=SPRING"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let cookie = res.headers()["set-cookie"].to_str().unwrap().to_string();
    assert!(cookie.starts_with("activation_code=SPRING"));
    assert!(cookie.contains("HttpOnly"));
    assert!(cookie.contains("SameSite=Lax"));
    assert!(cookie.contains("Secure"));
    assert!(cookie.contains("Path=/"));

    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["activation_code"], "SPRING");
}

#[tokio::test]
async fn activation_code_is_read_back_from_cookie() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let res = client
        .get(srv.url("/v1/activation"))
        .header("cookie", "activation_code=FALL")
        .send()
        .await
        .unwrap();
    assert!(res.headers().get("set-cookie").is_none());
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["activation_code"], "FALL");

    let res = client.get(srv.url("/v1/activation")).send().await.unwrap();
    let body: serde_json::Value = res.json().await.unwrap();
    assert!(body["activation_code"].is_null());
}

#[tokio::test]
async fn query_code_overrides_cookie_and_is_persisted() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let res = client
        .post(srv.url("/v1/pricing/activation-quote?activation_code=SPRING"))
        .header("cookie", "activation_code=FALL")
        .json(&json!({"product": product(47, 200.0)}))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let cookie = res.headers()["set-cookie"].to_str().unwrap().to_string();
    assert!(cookie.starts_with("activation_code=SPRING"));
    let body: serde_json::Value = res.json().await.unwrap();
    // SPRING prices brand 47 at 20% off; FALL would give 5%.
    assert_eq!(body["quote"]["discountPercent"], 20.0);
    assert_eq!(body["quote"]["value"], 160.0);

    let res = client
        .get(srv.url("/v1/activation?activation_code=SPRING"))
        .header("cookie", "activation_code=FALL")
        .send()
        .await
        .unwrap();
    assert!(res.headers()["set-cookie"].to_str().unwrap().starts_with("activation_code=SPRING"));
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["activation_code"], "SPRING");
}

#[tokio::test]
async fn malformed_price_metadata_still_quotes() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let res = client
        .post(srv.url("/v1/pricing/activation-quote"))
        .header("cookie", "activation_code=SPRING")
        .json(&json!({"product": {
            "entityId": 1,
            "brand": {"entityId": 47},
            "prices": {"price": {"value": 100, "currencyCode": ""}}
        }}))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["quote"]["currencyCode"], "USD");
    assert_eq!(body["quote"]["value"], 80.0);

    let res = client
        .post(srv.url("/v1/pricing/activation-quote"))
        .header("cookie", "activation_code=SPRING")
        .json(&json!({"product": {
            "entityId": 1,
            "brand": {"entityId": null},
            "prices": {"price": {"value": 100, "currencyCode": "DOLLARS"}}
        }}))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: serde_json::Value = res.json().await.unwrap();
    assert!(body["quote"].is_null());
}

#[tokio::test]
async fn activation_quote_uses_first_rule_covering_brand() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let res = client
        .post(srv.url("/v1/pricing/activation-quote"))
        .header("cookie", "activation_code=SPRING")
        .json(&json!({"product": product(47, 200.0)}))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["quote"]["originalPrice"], 200.0);
    assert_eq!(body["quote"]["value"], 160.0);
    assert_eq!(body["quote"]["discountPercent"], 20.0);
    assert_eq!(body["quote"]["currencyCode"], "USD");
}

#[tokio::test]
async fn activation_quote_is_null_without_code_or_match() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let res = client
        .post(srv.url("/v1/pricing/activation-quote"))
        .json(&json!({"product": product(47, 200.0)}))
        .send()
        .await
        .unwrap();
    let body: serde_json::Value = res.json().await.unwrap();
    assert!(body["quote"].is_null());

    let res = client
        .post(srv.url("/v1/pricing/activation-quote"))
        .header("cookie", "activation_code=SPRING")
        .json(&json!({"product": product(999, 200.0)}))
        .send()
        .await
        .unwrap();
    let body: serde_json::Value = res.json().await.unwrap();
    assert!(body["quote"].is_null());
}

#[tokio::test]
async fn listing_annotates_covered_items_only() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let res = client
        .post(srv.url("/v1/pricing/listing?activation_code=SPRING"))
        .json(&json!({"items": [
            {"entityId": 1, "brand": {"entityId": 48}, "originalPrice": {"value": 80}, "name": "Sconce"},
            {"entityId": 2, "brand": {"entityId": 5}, "originalPrice": {"value": 80}}
        ]}))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: serde_json::Value = res.json().await.unwrap();
    let items = body["items"].as_array().unwrap();
    assert_eq!(items[0]["activation_sale_price"]["value"], 64.0);
    assert_eq!(items[0]["name"], "Sconce");
    assert!(items[1].get("activation_sale_price").is_none());
}

#[tokio::test]
async fn customer_group_quote_prefers_deepest_category() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let res = client
        .post(srv.url("/v1/pricing/customer-group-quote"))
        .json(&json!({
            "customer_group_id": "4",
            "product": product(47, 100.0),
            "categories": [
                {"entityId": 3, "breadcrumbs": [1, 3]},
                {"entityId": 9, "breadcrumbs": [1, 4, 9]}
            ],
            "rules": [
                {"type": "category", "category_id": 1, "method": "percent", "amount": "10"},
                {"type": "category", "category_id": 4, "method": "fixed", "amount": "25"},
                {"type": "all", "method": "percent", "amount": "50"}
            ]
        }))
        .send()
        .await
        .unwrap();
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["quote"]["updatedPrice"], 75.0);
    assert_eq!(body["quote"]["hasDiscount"], true);
}

#[tokio::test]
async fn hits_and_cart_lines_are_decorated() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let res = client
        .post(srv.url("/v1/pricing/hits"))
        .json(&json!({"hits": [{"price": 100, "salePrice": "75"}, {"price": 40}]}))
        .send()
        .await
        .unwrap();
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["hits"][0]["savingsPercent"], 25);
    assert_eq!(body["hits"][0]["showStrikethrough"], true);
    assert_eq!(body["hits"][1]["displayPrice"], 40.0);

    let res = client
        .post(srv.url("/v1/cart/line-pricing"))
        .json(&json!({"lines": [
            {"lineId": "a", "quantity": 2, "originalPrice": 50, "listPrice": 40, "extendedSalePrice": 80}
        ]}))
        .send()
        .await
        .unwrap();
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["lines"][0]["percentOffLabel"], "20% Off");
    assert_eq!(body["lines"][0]["strikethroughTotal"], 100.0);
}

#[tokio::test]
async fn zero_tax_apportions_marked_lines() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let res = client
        .post(srv.url("/v1/checkout/zero-tax"))
        .json(&json!({
            "checkout": {"coupons": [{"code": "PRO-ZEROTAX"}], "subtotal": 200, "taxTotal": 20},
            "lines": [
                {"lineId": "a", "quantity": 2, "couponAmount": 0.2, "extendedSalePrice": 50},
                {"lineId": "b", "quantity": 1, "couponAmount": 0, "extendedSalePrice": 150}
            ]
        }))
        .send()
        .await
        .unwrap();
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["applies"], true);
    let lines = body["lines"].as_array().unwrap();
    assert_eq!(lines.len(), 1);
    assert_eq!(lines[0]["lineId"], "a");
    assert_eq!(body["exempt_tax_total"], 5.0);
}

#[tokio::test]
async fn agents_cannot_price_below_floor() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();
    let body = json!({"price": "90", "cost": 100, "floor_multiplier": 1.1});

    let res = client
        .post(srv.url("/v1/sales-buddy/price-adjustments/validate"))
        .header("x-agent-role", "agent")
        .json(&body)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let err: serde_json::Value = res.json().await.unwrap();
    assert_eq!(err["error"], "below_floor_price");

    let res = client
        .post(srv.url("/v1/sales-buddy/price-adjustments/validate"))
        .header("x-agent-role", "manager")
        .json(&body)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let ok: serde_json::Value = res.json().await.unwrap();
    assert_eq!(ok["price"], 90.0);
    assert_eq!(ok["role"], "manager");

    let res = client
        .post(srv.url("/v1/sales-buddy/price-adjustments/validate"))
        .json(&json!({"price": "12abc", "cost": 1, "floor_multiplier": 1}))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn variant_details_resolve_mpn_and_groups() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let res = client
        .post(srv.url("/v1/catalog/variant-details"))
        .json(&json!({
            "product": {
                "entityId": 5,
                "sku": "X-2",
                "variants": [
                    {"entityId": 11, "sku": "X-1", "mpn": "M-11"},
                    {"entityId": 12, "sku": "X-2", "mpn": "M-12"}
                ],
                "productOptions": [{"entityId": 3, "displayName": "Finish", "isVariantOption": true}]
            },
            "product_meta_fields": [
                {"key": "finish", "value": "Brass", "description": "1|Finish|Finish|1"}
            ],
            "variant_meta_fields": [
                {"key": "finish", "value": "Nickel", "description": "1|Finish|Finish|1"}
            ],
            "keys": ["finish"]
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["variant"]["entityId"], 12);
    assert_eq!(body["mpn"], "M-12");
    assert_eq!(body["has_variant_options"], true);
    assert_eq!(body["fields"][0]["value"], "Nickel");
    assert_eq!(body["fields"][0]["source"], "variant");
}

#[tokio::test]
async fn site_resolution_never_exposes_token() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let res = client
        .get(srv.url("/v1/sites/resolve?domain=lamps.shops.test"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let text = res.text().await.unwrap();
    assert!(!text.contains("secret-token"));
    let body: serde_json::Value = serde_json::from_str(&text).unwrap();
    assert_eq!(body["site_id"], "site-lamps");
    assert_eq!(body["channel_id"], "77");
    assert_eq!(body["has_storefront_token"], true);

    let res = client
        .get(srv.url("/v1/sites/resolve?domain=other.example.com&locale=es"))
        .send()
        .await
        .unwrap();
    let body: serde_json::Value = res.json().await.unwrap();
    assert!(body["site_id"].is_null());
    assert_eq!(body["channel_id"], "222");
    assert_eq!(body["has_storefront_token"], false);
}

use axum::{routing::get, Router};

pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod pricing;
pub mod sales_buddy;
pub mod sites;
pub mod system;

/// Router for every `/v1` endpoint.
pub fn router() -> Router {
    Router::new()
        .route("/activation", get(system::activation))
        .nest("/pricing", pricing::router())
        .nest("/cart", cart::router())
        .nest("/checkout", checkout::router())
        .nest("/sales-buddy", sales_buddy::router())
        .nest("/catalog", catalog::router())
        .nest("/sites", sites::router())
}

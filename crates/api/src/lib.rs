//! HTTP API: storefront pricing, catalog and site resolution endpoints.

pub mod app;
pub mod config;
pub mod context;
pub mod middleware;
pub mod sites;

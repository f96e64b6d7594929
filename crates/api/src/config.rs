//! Process configuration from environment variables.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;

/// Default lifetime of a cached site lookup.
pub const DEFAULT_SITE_CACHE_TTL: Duration = Duration::from_secs(900);

/// Default number of domains the site cache holds.
pub const DEFAULT_SITE_CACHE_CAPACITY: u64 = 10_000;

#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub bind_addr: SocketAddr,
    /// Multi-tenant root domain; `shop.{root_domain}` resolves by subdomain.
    pub root_domain: Option<String>,
    pub default_channel_id: Option<String>,
    pub default_storefront_token: Option<String>,
    /// Per-locale channel overrides (`LOCALE_CHANNELS=es=12345,fr=678`).
    pub locale_channels: HashMap<String, String>,
    pub pricing_rules_path: Option<PathBuf>,
    pub sites_path: Option<PathBuf>,
    pub site_cache_ttl: Duration,
    pub site_cache_capacity: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 8080)),
            root_domain: None,
            default_channel_id: None,
            default_storefront_token: None,
            locale_channels: HashMap::new(),
            pricing_rules_path: None,
            sites_path: None,
            site_cache_ttl: DEFAULT_SITE_CACHE_TTL,
            site_cache_capacity: DEFAULT_SITE_CACHE_CAPACITY,
        }
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    std::env::var(name).ok().map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

/// Parse `es=12345,fr=678`. Malformed pairs are skipped.
pub fn parse_locale_channels(raw: &str) -> HashMap<String, String> {
    raw.split(',')
        .filter_map(|pair| {
            let (locale, channel) = pair.split_once('=')?;
            let (locale, channel) = (locale.trim(), channel.trim());
            if locale.is_empty() || channel.is_empty() {
                tracing::warn!(pair, "ignoring malformed LOCALE_CHANNELS entry");
                return None;
            }
            Some((locale.to_string(), channel.to_string()))
        })
        .collect()
}

impl ApiConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let mut config = Self::default();

        match non_empty_var("BIND_ADDR") {
            Some(addr) => {
                config.bind_addr = addr
                    .parse()
                    .with_context(|| format!("BIND_ADDR is not a socket address: {addr:?}"))?;
            }
            None => tracing::info!(addr = %config.bind_addr, "BIND_ADDR not set; using default"),
        }

        config.root_domain = non_empty_var("ROOT_DOMAIN");
        if config.root_domain.is_none() {
            tracing::warn!("ROOT_DOMAIN not set; sites resolve by custom domain only");
        }

        config.default_channel_id = non_empty_var("DEFAULT_CHANNEL_ID");
        config.default_storefront_token = non_empty_var("DEFAULT_STOREFRONT_TOKEN");
        config.locale_channels = non_empty_var("LOCALE_CHANNELS")
            .map(|raw| parse_locale_channels(&raw))
            .unwrap_or_default();
        config.pricing_rules_path = non_empty_var("PRICING_RULES_PATH").map(PathBuf::from);
        config.sites_path = non_empty_var("SITES_PATH").map(PathBuf::from);

        if let Some(ttl) = non_empty_var("SITE_CACHE_TTL_SECS") {
            let secs: u64 = ttl
                .parse()
                .with_context(|| format!("SITE_CACHE_TTL_SECS must be whole seconds: {ttl:?}"))?;
            config.site_cache_ttl = Duration::from_secs(secs);
        }

        if let Some(capacity) = non_empty_var("SITE_CACHE_CAPACITY") {
            config.site_cache_capacity = capacity
                .parse()
                .with_context(|| format!("SITE_CACHE_CAPACITY must be a whole number: {capacity:?}"))?;
        }

        Ok(config)
    }
}

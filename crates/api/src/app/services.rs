//! Service wiring: discount rules and the site directory.

use std::path::Path;
use std::sync::Arc;

use anyhow::Context;

use storefront_pricing::{DiscountRuleSource, RuleBook};

use crate::config::ApiConfig;
use crate::sites::{ChannelDefaults, InMemorySiteStore, SiteCacheSettings, SiteDirectory, SiteStore};

pub struct AppServices {
    pub rules: Arc<dyn DiscountRuleSource>,
    pub sites: SiteDirectory,
}

impl AppServices {
    pub fn new(rules: Arc<dyn DiscountRuleSource>, sites: SiteDirectory) -> Self {
        Self { rules, sites }
    }

    /// Load rules and sites from the files named in `config`.
    ///
    /// A missing path yields an empty rule book or site list; a path that
    /// cannot be read or decoded is an error.
    pub fn from_config(config: &ApiConfig) -> anyhow::Result<Self> {
        let rules = match &config.pricing_rules_path {
            Some(path) => {
                let raw = read(path)?;
                RuleBook::from_json(&raw)
                    .with_context(|| format!("invalid pricing rules in {}", path.display()))?
            }
            None => {
                tracing::warn!("PRICING_RULES_PATH not set; no activation-code discounts configured");
                RuleBook::default()
            }
        };
        tracing::info!(rules = rules.len(), "activation-code rules loaded");

        let store = match &config.sites_path {
            Some(path) => {
                let raw = read(path)?;
                InMemorySiteStore::from_json(&raw)
                    .with_context(|| format!("invalid site list in {}", path.display()))?
            }
            None => InMemorySiteStore::default(),
        };

        let defaults = ChannelDefaults {
            locale_channels: config.locale_channels.clone(),
            default_channel_id: config.default_channel_id.clone(),
            default_storefront_token: config.default_storefront_token.clone(),
        };
        let store: Arc<dyn SiteStore> = Arc::new(store);
        let sites = SiteDirectory::new(
            store,
            config.root_domain.clone(),
            SiteCacheSettings {
                ttl: config.site_cache_ttl,
                max_entries: config.site_cache_capacity,
            },
            defaults,
        );

        Ok(Self::new(Arc::new(rules), sites))
    }
}

fn read(path: &Path) -> anyhow::Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
}

//! Site directory: which storefront (channel, storefront token) serves a domain.
//!
//! A domain under the root domain (`shop.example.com`) resolves by subdomain;
//! anything else resolves by custom domain. Lookups, misses included, are
//! cached per domain for a fixed TTL in a cache bounded by entry count.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use moka::future::Cache;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SiteError {
    #[error("site store unavailable: {0}")]
    Store(String),
}

/// One configured storefront site.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SiteRecord {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub subdomain: Option<String>,
    #[serde(default)]
    pub custom_domain: Option<String>,
    #[serde(default)]
    pub channel_id: Option<String>,
    #[serde(default)]
    pub storefront_token: Option<String>,
}

/// Backing store for site records.
#[async_trait]
pub trait SiteStore: Send + Sync {
    async fn find_by_subdomain(&self, subdomain: &str) -> Result<Option<SiteRecord>, SiteError>;

    async fn find_by_custom_domain(&self, domain: &str) -> Result<Option<SiteRecord>, SiteError>;
}

/// Site records held in memory (loaded from `SITES_PATH`, or built in tests).
#[derive(Debug, Clone, Default)]
pub struct InMemorySiteStore {
    sites: Vec<SiteRecord>,
}

impl InMemorySiteStore {
    pub fn new(sites: Vec<SiteRecord>) -> Self {
        Self { sites }
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        Ok(Self::new(serde_json::from_str(json)?))
    }
}

#[async_trait]
impl SiteStore for InMemorySiteStore {
    async fn find_by_subdomain(&self, subdomain: &str) -> Result<Option<SiteRecord>, SiteError> {
        Ok(self
            .sites
            .iter()
            .find(|s| s.subdomain.as_deref() == Some(subdomain))
            .cloned())
    }

    async fn find_by_custom_domain(&self, domain: &str) -> Result<Option<SiteRecord>, SiteError> {
        Ok(self
            .sites
            .iter()
            .find(|s| s.custom_domain.as_deref() == Some(domain))
            .cloned())
    }
}

/// Fallbacks used when a site does not configure its own channel or token.
#[derive(Debug, Clone, Default)]
pub struct ChannelDefaults {
    pub locale_channels: HashMap<String, String>,
    pub default_channel_id: Option<String>,
    pub default_storefront_token: Option<String>,
}

/// Result of resolving a domain for a request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedSite {
    pub domain: String,
    pub site_id: Option<String>,
    pub channel_id: Option<String>,
    pub has_storefront_token: bool,
}

/// How long and how many domain lookups are kept.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SiteCacheSettings {
    /// Zero disables caching.
    pub ttl: Duration,
    /// Most domains held at once; the least valuable are evicted past it.
    pub max_entries: u64,
}

pub struct SiteDirectory {
    store: Arc<dyn SiteStore>,
    root_domain: Option<String>,
    defaults: ChannelDefaults,
    /// `None` when caching is disabled.
    cache: Option<Cache<String, Option<SiteRecord>>>,
}

impl SiteDirectory {
    pub fn new(
        store: Arc<dyn SiteStore>,
        root_domain: Option<String>,
        cache: SiteCacheSettings,
        defaults: ChannelDefaults,
    ) -> Self {
        let cache = (!cache.ttl.is_zero() && cache.max_entries > 0).then(|| {
            Cache::builder()
                .max_capacity(cache.max_entries)
                .time_to_live(cache.ttl)
                .build()
        });
        Self {
            store,
            root_domain,
            defaults,
            cache,
        }
    }

    /// Subdomain of `domain` under the root domain, if it is one.
    pub fn subdomain_of<'a>(&self, domain: &'a str) -> Option<&'a str> {
        let root = self.root_domain.as_deref()?;
        domain
            .strip_suffix(root)
            .and_then(|rest| rest.strip_suffix('.'))
            .filter(|sub| !sub.is_empty())
    }

    /// Look a domain up in the store, bypassing the cache.
    pub async fn lookup_uncached(&self, domain: &str) -> Result<Option<SiteRecord>, SiteError> {
        match self.subdomain_of(domain) {
            Some(sub) => self.store.find_by_subdomain(sub).await,
            None => self.store.find_by_custom_domain(domain).await,
        }
    }

    /// Look a domain up, serving from cache while the entry is fresh.
    pub async fn lookup(&self, domain: &str) -> Result<Option<SiteRecord>, SiteError> {
        let domain = domain.trim().to_ascii_lowercase();

        if let Some(cache) = &self.cache {
            if let Some(site) = cache.get(domain.as_str()).await {
                return Ok(site);
            }
        }

        let site = self.lookup_uncached(&domain).await?;
        tracing::debug!(domain = %domain, found = site.is_some(), "site lookup refreshed");
        if let Some(cache) = &self.cache {
            cache.insert(domain, site.clone()).await;
        }
        Ok(site)
    }

    /// Drop a cached entry so the next lookup hits the store.
    pub async fn invalidate(&self, domain: &str) {
        if let Some(cache) = &self.cache {
            cache.invalidate(domain.trim().to_ascii_lowercase().as_str()).await;
        }
    }

    /// Number of cached domains once pending evictions have run.
    pub async fn cached_entries(&self) -> u64 {
        match &self.cache {
            Some(cache) => {
                cache.run_pending_tasks().await;
                cache.entry_count()
            }
            None => 0,
        }
    }

    /// Channel for a request: site channel, then locale override, then default.
    pub fn channel_for(&self, site: Option<&SiteRecord>, locale: Option<&str>) -> Option<String> {
        site.and_then(|s| s.channel_id.clone())
            .or_else(|| locale.and_then(|l| self.defaults.locale_channels.get(l).cloned()))
            .or_else(|| self.defaults.default_channel_id.clone())
    }

    /// Storefront API token: the site's own, else the default.
    pub fn storefront_token_for(&self, site: Option<&SiteRecord>) -> Option<String> {
        site.and_then(|s| s.storefront_token.clone())
            .or_else(|| self.defaults.default_storefront_token.clone())
    }

    pub async fn resolve(&self, domain: &str, locale: Option<&str>) -> Result<ResolvedSite, SiteError> {
        let site = self.lookup(domain).await?;
        Ok(ResolvedSite {
            domain: domain.trim().to_ascii_lowercase(),
            site_id: site.as_ref().map(|s| s.id.clone()),
            channel_id: self.channel_for(site.as_ref(), locale),
            has_storefront_token: self.storefront_token_for(site.as_ref()).is_some(),
        })
    }
}

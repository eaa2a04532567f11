//! Identity provider signing keys (JWK set): fetching and caching.

use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use jsonwebtoken::jwk::JwkSet;
use reqwest::Client;
use thiserror::Error;
use tokio::sync::RwLock;
use tracing::{debug, info};

/// Google's published ID-token signing keys.
pub const GOOGLE_CERTS_URL: &str = "https://www.googleapis.com/oauth2/v3/certs";
/// Google rotates keys on the order of days; an hour keeps rotation pickup cheap.
const KEY_SET_TTL: Duration = Duration::from_secs(3600);
const FETCH_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Error)]
pub enum KeySourceError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Key set endpoint returned status {0}")]
    Status(u16),
}

/// Supplies the provider's current public key set.
///
/// `force_refresh` bypasses any cache; verifiers use it once when a token
/// names a key id they have not seen (key rotation).
#[async_trait]
pub trait KeySource: Send + Sync {
    async fn key_set(&self, force_refresh: bool) -> Result<Arc<JwkSet>, KeySourceError>;
}

struct CachedKeySet {
    keys: Arc<JwkSet>,
    fetched_at: Instant,
}

impl CachedKeySet {
    fn is_fresh(&self, now: Instant, ttl: Duration) -> bool {
        now.duration_since(self.fetched_at) < ttl
    }
}

/// Fetches the JWK set over HTTPS and caches it for `KEY_SET_TTL`.
pub struct HttpKeySource {
    client: Client,
    url: String,
    ttl: Duration,
    cache: RwLock<Option<CachedKeySet>>,
}

impl HttpKeySource {
    pub fn new(url: impl Into<String>) -> Result<Self, KeySourceError> {
        Ok(Self {
            client: Client::builder().timeout(FETCH_TIMEOUT).build()?,
            url: url.into(),
            ttl: KEY_SET_TTL,
            cache: RwLock::new(None),
        })
    }

    async fn fetch(&self) -> Result<JwkSet, KeySourceError> {
        let response = self.client.get(&self.url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(KeySourceError::Status(status.as_u16()));
        }
        Ok(response.json::<JwkSet>().await?)
    }
}

#[async_trait]
impl KeySource for HttpKeySource {
    async fn key_set(&self, force_refresh: bool) -> Result<Arc<JwkSet>, KeySourceError> {
        if !force_refresh {
            let cache = self.cache.read().await;
            if let Some(entry) = cache.as_ref() {
                if entry.is_fresh(Instant::now(), self.ttl) {
                    return Ok(entry.keys.clone());
                }
            }
        }

        debug!("Fetching signing keys from {}", self.url);
        let keys = Arc::new(self.fetch().await?);
        info!("Loaded {} signing keys from {}", keys.keys.len(), self.url);

        let mut cache = self.cache.write().await;
        *cache = Some(CachedKeySet {
            keys: keys.clone(),
            fetched_at: Instant::now(),
        });

        Ok(keys)
    }
}

use base64::{Engine, prelude::BASE64_STANDARD};
use std::{fmt, sync::Arc, time::Duration};
use tokio::{sync::Mutex, time::Instant};

/// Refresh a cached token this long before upstream says it expires.
const EXPIRY_MARGIN: Duration = Duration::from_secs(60);

#[derive(Clone)]
pub struct Credentials {
    pub client_id: String,
    pub client_secret: String,
}

impl Credentials {
    pub fn new(client_id: impl Into<String>, client_secret: impl Into<String>) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
        }
    }

    /// Value for the `Authorization` header of the client credentials flow.
    pub(crate) fn basic_header(&self) -> String {
        let raw = format!("{}:{}", self.client_id, self.client_secret);
        format!("Basic {}", BASE64_STANDARD.encode(raw))
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("client_id", &self.client_id)
            .field("client_secret", &"[REDACTED]")
            .finish()
    }
}

/// Bearer token for the catalog endpoints.
#[derive(Clone, PartialEq, Eq)]
pub struct AccessToken(String);

impl AccessToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AccessToken([REDACTED])")
    }
}

#[derive(Debug, Clone)]
struct CachedToken {
    token: AccessToken,
    expires_at: Instant,
}

/// Process-wide slot for a reusable token. Clones share the slot.
#[derive(Debug, Clone, Default)]
pub(crate) struct TokenCache {
    slot: Arc<Mutex<Option<CachedToken>>>,
}

impl TokenCache {
    pub(crate) async fn get(&self) -> Option<AccessToken> {
        let slot = self.slot.lock().await;
        slot.as_ref()
            .filter(|cached| Instant::now() + EXPIRY_MARGIN < cached.expires_at)
            .map(|cached| cached.token.clone())
    }

    pub(crate) async fn store(&self, token: AccessToken, expires_in: Duration) {
        let mut slot = self.slot.lock().await;
        *slot = Some(CachedToken {
            token,
            expires_at: Instant::now() + expires_in,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn basic_header_is_base64_of_id_and_secret() {
        let creds = Credentials::new("id", "secret");
        // base64("id:secret")
        assert_eq!(creds.basic_header(), "Basic aWQ6c2VjcmV0");
    }

    #[test]
    fn debug_output_hides_secrets() {
        let creds = Credentials::new("visible-id", "hunter2");
        let token = AccessToken::new("BQDx-token");

        let creds_dbg = format!("{creds:?}");
        assert!(creds_dbg.contains("visible-id"));
        assert!(!creds_dbg.contains("hunter2"));
        assert!(!format!("{token:?}").contains("BQDx"));
    }

    #[tokio::test(start_paused = true)]
    async fn cache_expires_before_upstream_deadline() {
        let cache = TokenCache::default();
        assert!(cache.get().await.is_none());

        cache
            .store(AccessToken::new("tok"), Duration::from_secs(3600))
            .await;
        assert_eq!(cache.get().await, Some(AccessToken::new("tok")));

        tokio::time::advance(Duration::from_secs(3600 - 30)).await;
        assert!(cache.get().await.is_none());
    }
}

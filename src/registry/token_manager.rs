//! Cached access tokens with refresh ahead of expiry
//!
//! A token is refreshed once less than a fifth of its lifetime (and never
//! less than a minute) remains. If the refresh itself fails while the old
//! token has not yet expired, the old token keeps being used.

use crate::error::Result;
use async_trait::async_trait;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tracing::{debug, warn};

const MIN_REFRESH_WINDOW: Duration = Duration::from_secs(60);

#[derive(Debug, Clone)]
pub struct TokenInfo {
    pub access_token: String,
    expires_at: Instant,
    refresh_at: Instant,
}

impl TokenInfo {
    /// A token issued now that lives for `lifetime`.
    pub fn new(access_token: impl Into<String>, lifetime: Duration) -> Self {
        let issued_at = Instant::now();
        let window = (lifetime / 5).max(MIN_REFRESH_WINDOW);
        Self {
            access_token: access_token.into(),
            expires_at: issued_at + lifetime,
            refresh_at: issued_at + lifetime.saturating_sub(window),
        }
    }

    pub fn needs_refresh(&self, now: Instant) -> bool {
        now >= self.refresh_at
    }

    pub fn is_expired(&self, now: Instant) -> bool {
        now >= self.expires_at
    }
}

/// Where fresh tokens come from.
#[async_trait]
pub trait TokenSource: Send + Sync {
    async fn request_token(&self) -> Result<TokenInfo>;
}

/// Thread-safe token cache. Concurrent callers wait on the same refresh
/// rather than each requesting a token.
#[derive(Debug)]
pub struct TokenManager<S> {
    source: S,
    cached: Mutex<Option<TokenInfo>>,
}

impl<S: TokenSource> TokenManager<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            cached: Mutex::new(None),
        }
    }

    /// Current token, requesting a new one when the cached one is due.
    pub async fn get_token(&self) -> Result<String> {
        let mut cached = self.cached.lock().await;
        let now = Instant::now();

        if let Some(info) = cached.as_ref().filter(|info| !info.needs_refresh(now)) {
            return Ok(info.access_token.clone());
        }

        debug!("Requesting a new access token");
        match self.source.request_token().await {
            Ok(info) => {
                let token = info.access_token.clone();
                *cached = Some(info);
                Ok(token)
            }
            Err(err) => match cached.as_ref().filter(|info| !info.is_expired(now)) {
                Some(info) => {
                    warn!("Token refresh failed, using the current token until it expires: {}", err);
                    Ok(info.access_token.clone())
                }
                None => Err(err),
            },
        }
    }

    /// Drop the cached token so the next call fetches a new one.
    pub async fn invalidate(&self) {
        *self.cached.lock().await = None;
    }

    pub fn source(&self) -> &S {
        &self.source
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RegistryError;
    use std::sync::Mutex as StdMutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct ScriptedSource {
        calls: AtomicUsize,
        script: StdMutex<Vec<Result<TokenInfo>>>,
    }

    impl ScriptedSource {
        fn new(script: Vec<Result<TokenInfo>>) -> Self {
            Self {
                calls: AtomicUsize::new(0),
                script: StdMutex::new(script),
            }
        }
    }

    #[async_trait]
    impl TokenSource for ScriptedSource {
        async fn request_token(&self) -> Result<TokenInfo> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.script.lock().unwrap().remove(0)
        }
    }

    #[test]
    fn test_refresh_window() {
        let now = Instant::now();
        let hour = TokenInfo::new("t", Duration::from_secs(3600));
        assert!(!hour.needs_refresh(now));
        assert!(hour.needs_refresh(now + Duration::from_secs(2880)));
        assert!(!hour.is_expired(now + Duration::from_secs(2880)));

        // lifetimes under a minute are always due
        let short = TokenInfo::new("t", Duration::from_secs(30));
        assert!(short.needs_refresh(Instant::now()));
    }

    #[tokio::test]
    async fn test_token_is_cached() {
        let manager = TokenManager::new(ScriptedSource::new(vec![Ok(TokenInfo::new(
            "first",
            Duration::from_secs(3600),
        ))]));

        assert_eq!(manager.get_token().await.unwrap(), "first");
        assert_eq!(manager.get_token().await.unwrap(), "first");
        assert_eq!(manager.source().calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_invalidate_forces_new_token() {
        let manager = TokenManager::new(ScriptedSource::new(vec![
            Ok(TokenInfo::new("first", Duration::from_secs(3600))),
            Ok(TokenInfo::new("second", Duration::from_secs(3600))),
        ]));

        assert_eq!(manager.get_token().await.unwrap(), "first");
        manager.invalidate().await;
        assert_eq!(manager.get_token().await.unwrap(), "second");
    }

    #[tokio::test]
    async fn test_failed_refresh_falls_back_to_unexpired_token() {
        // a 50s token is inside the refresh window from the start but
        // does not expire during the test
        let manager = TokenManager::new(ScriptedSource::new(vec![
            Ok(TokenInfo::new("old", Duration::from_secs(50))),
            Err(RegistryError::Auth("iam unavailable".to_string())),
        ]));

        assert_eq!(manager.get_token().await.unwrap(), "old");
        assert_eq!(manager.get_token().await.unwrap(), "old");
        assert_eq!(manager.source().calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_failure_without_token_is_returned() {
        let manager = TokenManager::new(ScriptedSource::new(vec![Err(RegistryError::Auth(
            "bad apikey".to_string(),
        ))]));
        assert!(matches!(manager.get_token().await, Err(RegistryError::Auth(_))));
    }
}

pub mod album;
pub mod artist;
mod auth;
mod error;
pub mod id;
mod response;

use std::{sync::Arc, time::Duration};

use crate::{
    album::Album,
    artist::Artist,
    auth::TokenCache,
    id::ArtistId,
    response::{SearchResponse, TokenResponse},
};
pub use auth::{AccessToken, Credentials};
pub use error::SpotifyError;
use reqwest::{StatusCode, Url, header::AUTHORIZATION};

pub const ACCOUNTS_URL: &'static str = "https://accounts.spotify.com";
pub const API_URL: &'static str = "https://api.spotify.com";

const DEFAULT_MARKET: &'static str = "NL";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);
const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// Full URLs of the three upstream resources this client touches.
#[derive(Debug, Clone)]
pub struct Endpoints {
    pub token: String,
    pub search: String,
    pub artists: String,
}

impl Endpoints {
    /// Builds the endpoint set from an accounts host and an api host, e.g. a
    /// local stub server standing in for both.
    pub fn with_bases(accounts: &str, api: &str) -> Self {
        let accounts = accounts.trim_end_matches('/');
        let api = api.trim_end_matches('/');
        Self {
            token: format!("{accounts}/api/token"),
            search: format!("{api}/v1/search"),
            artists: format!("{api}/v1/artists"),
        }
    }
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            token: const_format::formatcp!("{ACCOUNTS_URL}/api/token").to_owned(),
            search: const_format::formatcp!("{API_URL}/v1/search").to_owned(),
            artists: const_format::formatcp!("{API_URL}/v1/artists").to_owned(),
        }
    }
}

#[derive(Debug)]
pub struct SpotifyBuilder {
    credentials: Credentials,
    endpoints: Endpoints,
    market: String,
    timeout: Duration,
    connect_timeout: Duration,
    reuse_token: bool,
}

impl SpotifyBuilder {
    pub fn endpoints(mut self, endpoints: Endpoints) -> Self {
        self.endpoints = endpoints;
        self
    }

    /// Market code sent with every search.
    pub fn market(mut self, market: impl Into<String>) -> Self {
        self.market = market.into();
        self
    }

    /// Total per-request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Timeout for establishing the TCP/TLS connection alone.
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Keep the last access token and hand it out again until it is close to
    /// expiry, instead of requesting a new one on every call.
    pub fn reuse_token(mut self, reuse: bool) -> Self {
        self.reuse_token = reuse;
        self
    }

    pub fn build(self) -> Result<Spotify, SpotifyError> {
        let client = reqwest::Client::builder()
            .timeout(self.timeout)
            .connect_timeout(self.connect_timeout)
            .build()?;

        Ok(Spotify {
            client,
            credentials: Arc::new(self.credentials),
            endpoints: Arc::new(self.endpoints),
            market: self.market.into(),
            token_cache: self.reuse_token.then(TokenCache::default),
        })
    }
}

#[derive(Debug, Clone)]
pub struct Spotify {
    client: reqwest::Client,
    credentials: Arc<Credentials>,
    endpoints: Arc<Endpoints>,
    market: Arc<str>,
    token_cache: Option<TokenCache>,
}

impl Spotify {
    pub fn new(credentials: Credentials) -> Result<Self, SpotifyError> {
        Self::builder(credentials).build()
    }

    pub fn builder(credentials: Credentials) -> SpotifyBuilder {
        SpotifyBuilder {
            credentials,
            endpoints: Endpoints::default(),
            market: DEFAULT_MARKET.to_owned(),
            timeout: DEFAULT_TIMEOUT,
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            reuse_token: false,
        }
    }

    pub fn market(&self) -> &str {
        &self.market
    }

    /// Client credentials flow. Any status other than 200 is returned as
    /// [`SpotifyError::Auth`] with the upstream status and body.
    pub async fn access_token(&self) -> Result<AccessToken, SpotifyError> {
        if let Some(cache) = &self.token_cache
            && let Some(token) = cache.get().await
        {
            tracing::debug!("reusing cached access token");
            return Ok(token);
        }

        let response = self
            .client
            .post(&self.endpoints.token)
            .header(AUTHORIZATION, self.credentials.basic_header())
            .form(&[("grant_type", "client_credentials")])
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if status != StatusCode::OK {
            tracing::warn!(%status, "token request rejected");
            return Err(SpotifyError::Auth { status, body });
        }

        let res: TokenResponse = serde_json::from_str(&body)?;
        if res.access_token.is_empty() {
            return Err(SpotifyError::EmptyToken);
        }

        let token = AccessToken::new(res.access_token);
        if let Some(cache) = &self.token_cache {
            let expires_in = Duration::from_secs(res.expires_in.unwrap_or_default());
            cache.store(token.clone(), expires_in).await;
        }

        tracing::debug!(expires_in = ?res.expires_in, "acquired access token");
        Ok(token)
    }

    /// Album search. Null entries in the upstream item list are dropped.
    pub async fn search_albums(
        &self,
        token: &AccessToken,
        query: impl AsRef<str>,
        limit: u32,
    ) -> Result<Vec<Album>, SpotifyError> {
        let query = query.as_ref();
        let limit = limit.to_string();

        let res: SearchResponse<Album> = self
            .fetch(
                &self.endpoints.search,
                token,
                &[
                    ("q", query),
                    ("type", "album"),
                    ("limit", limit.as_str()),
                    ("market", &*self.market),
                ],
            )
            .await?;

        Ok(res.albums.items.into_iter().flatten().collect())
    }

    pub async fn artist(
        &self,
        token: &AccessToken,
        id: &ArtistId,
    ) -> Result<Artist, SpotifyError> {
        let mut url = Url::parse(&self.endpoints.artists)?;
        url.path_segments_mut()
            .map_err(|_| url::ParseError::RelativeUrlWithCannotBeABaseBase)?
            .pop_if_empty()
            .push(id.as_str());

        self.fetch(url.as_str(), token, &[]).await
    }

    async fn fetch<T>(
        &self,
        url: &str,
        token: &AccessToken,
        query: &[(&str, &str)],
    ) -> Result<T, SpotifyError>
    where
        T: serde::de::DeserializeOwned,
    {
        let response = self
            .client
            .get(url)
            .bearer_auth(token.as_str())
            .query(query)
            .send()
            .await?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(SpotifyError::Status {
                status,
                body: response.text().await?,
            });
        }

        Ok(response.json::<T>().await?)
    }
}

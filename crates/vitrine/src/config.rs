use figment::{
    Figment,
    providers::{Env, Format, Toml},
};
use serde::Deserialize;
use spotify::{ACCOUNTS_URL, API_URL, Credentials, Endpoints, Spotify, SpotifyError};
use std::{
    fmt,
    net::{Ipv4Addr, SocketAddr},
    path::PathBuf,
    time::Duration,
};

#[derive(Debug, Deserialize)]
pub struct Config {
    pub spotify: SpotifyConfig,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub search: SearchConfig,
}

#[derive(Deserialize)]
pub struct SpotifyConfig {
    pub client_id: String,
    pub client_secret: String,
    #[serde(default = "default_market")]
    pub market: String,
    #[serde(default)]
    pub reuse_token: bool,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,
    /// overrides for the accounts and api hosts, e.g. an egress proxy
    pub accounts_url: Option<String>,
    pub api_url: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind: SocketAddr,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// upper bound on in-flight upstream calls per search request
    pub concurrency: usize,
    /// fixes the discovery letters, mostly useful when debugging
    pub seed: Option<u64>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: SocketAddr::from((Ipv4Addr::UNSPECIFIED, 8000)),
        }
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            concurrency: 10,
            seed: None,
        }
    }
}

fn default_market() -> String {
    "NL".into()
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_connect_timeout_secs() -> u64 {
    5
}

impl SpotifyConfig {
    pub fn credentials(&self) -> Credentials {
        Credentials::new(&self.client_id, &self.client_secret)
    }

    pub fn endpoints(&self) -> Endpoints {
        Endpoints::with_bases(
            self.accounts_url.as_deref().unwrap_or(ACCOUNTS_URL),
            self.api_url.as_deref().unwrap_or(API_URL),
        )
    }

    pub fn client(&self) -> Result<Spotify, SpotifyError> {
        Spotify::builder(self.credentials())
            .endpoints(self.endpoints())
            .market(&self.market)
            .timeout(Duration::from_secs(self.timeout_secs))
            .connect_timeout(Duration::from_secs(self.connect_timeout_secs))
            .reuse_token(self.reuse_token)
            .build()
    }
}

impl fmt::Debug for SpotifyConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SpotifyConfig")
            .field("client_id", &self.client_id)
            .field("client_secret", &"[REDACTED]")
            .field("market", &self.market)
            .field("reuse_token", &self.reuse_token)
            .field("timeout_secs", &self.timeout_secs)
            .field("connect_timeout_secs", &self.connect_timeout_secs)
            .field("accounts_url", &self.accounts_url)
            .field("api_url", &self.api_url)
            .finish()
    }
}

pub fn load() -> anyhow::Result<Config> {
    let config_dir = dirs::config_dir()
        .ok_or_else(|| anyhow::anyhow!("failed to get config directory"))?
        .join("vitrine")
        .join("config.toml");

    from_figment(figment(config_dir))
}

fn figment(user_file: PathBuf) -> Figment {
    Figment::new()
        .merge(Toml::file("config.toml"))
        .merge(Toml::file(user_file))
        // SPOTIFY_CLIENT_ID -> spotify.client_id
        .merge(Env::prefixed("SPOTIFY_").map(|key| format!("spotify.{key}").into()))
        .merge(Env::prefixed("VITRINE_").split("__"))
}

fn from_figment(figment: Figment) -> anyhow::Result<Config> {
    let config: Config = figment.extract()?;

    if config.spotify.client_id.trim().is_empty() {
        anyhow::bail!("spotify.client_id must not be empty");
    }
    if config.spotify.client_secret.trim().is_empty() {
        anyhow::bail!("spotify.client_secret must not be empty");
    }
    if config.search.concurrency == 0 {
        anyhow::bail!("search.concurrency must be at least 1");
    }

    Ok(config)
}

mod config;
mod search;
mod server;
#[cfg(test)]
mod testing;

use search::{Orchestrator, SeededLetters};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // a local .env may carry SPOTIFY_CLIENT_ID / SPOTIFY_CLIENT_SECRET
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or("spotify=debug,vitrine=debug,tower_http=debug".into()),
        )
        .init();

    let config = config::load()?;
    tracing::debug!(?config, "loaded config");

    let client = config.spotify.client()?;
    tracing::info!(market = client.market(), "spotify client ready");

    let mut orchestrator = Orchestrator::new(client, config.search.concurrency);
    if let Some(seed) = config.search.seed {
        tracing::info!(seed, "discovery letters are seeded");
        orchestrator = orchestrator.with_letters(SeededLetters::new(seed));
    }

    server::start(&config.server, orchestrator).await?;

    Ok(())
}

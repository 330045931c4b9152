use std::net::SocketAddr;

use anyhow::Context;

use project_tracker::{
    config::AppConfig, db::connection, logging::init_tracing, routes::app, state::AppState,
};

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        tracing::error!("server failed: {err:?}");
        std::process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    let cfg = AppConfig::from_env().expect("failed to load config");
    init_tracing(&cfg.logging);

    let db = connection::connect(&cfg.database).await?;
    let addr: SocketAddr = format!("{}:{}", cfg.general.host, cfg.general.port)
        .parse()
        .context("invalid general.host/general.port")?;

    let state = AppState::new(cfg, db);
    let app = app(state)?;

    tracing::info!("listening on http://{}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

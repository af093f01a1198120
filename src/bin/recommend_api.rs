use std::net::SocketAddr;

use anyhow::{Context, Result};
use clap::Parser;
use jobmatch::{init_tracing, router, AppState, ServeCli};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = ServeCli::parse();
    init_tracing();

    let state = AppState::load(&cli.model_dir, cli.top_k);
    let app = router(state);

    let addr: SocketAddr = cli
        .bind
        .parse()
        .with_context(|| format!("invalid bind address {}", cli.bind))?;
    println!("jobmatch recommend api listening on http://{addr}");
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    axum::serve(listener, app)
        .await
        .context("server shutdown")?;
    Ok(())
}

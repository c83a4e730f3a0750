use clap::Parser;
use std::sync::Arc;

use mpd_relay::cli::Cli;
use mpd_relay::config::{AppState, RelayConfig};
use mpd_relay::{logger, server};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let cfg = RelayConfig::load_from(cli.config.as_deref(), &cli.overrides())?;
    logger::init(&cfg.logging).map_err(|e| e as Box<dyn std::error::Error>)?;

    // Worker threads default to the number of CPU cores
    let mut runtime_builder = tokio::runtime::Builder::new_multi_thread();
    runtime_builder.enable_all();
    if let Some(workers) = cfg.server.workers {
        runtime_builder.worker_threads(workers);
    }
    let runtime = runtime_builder.build()?;

    if let Err(e) = runtime.block_on(async_main(cfg)) {
        tracing::error!(error = %e, "relay stopped");
        return Err(e);
    }
    Ok(())
}

async fn async_main(cfg: RelayConfig) -> Result<(), Box<dyn std::error::Error>> {
    let addr = cfg.get_socket_addr()?;
    let listener = server::create_reusable_listener(addr)?;
    logger::log_server_start(&listener.local_addr()?, &cfg);

    let state = Arc::new(AppState::new(cfg)?);
    server::serve(listener, state, server::shutdown_signal()).await?;
    Ok(())
}

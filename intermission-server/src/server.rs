// File: intermission-server/src/server.rs

use tokio::sync::watch;
use tracing::{error, info};

use intermission_core::Error;

use crate::config::BotConfig;
use crate::context::BotContext;

/// Builds the context and runs one EventSub session until it ends or a signal arrives.
pub async fn run_bot(config: BotConfig) -> Result<(), Error> {
    let ctx = BotContext::new(config).await?;
    info!(
        "Starting as bot_user_id={} for channels {:?}",
        ctx.config.bot_user_id, ctx.config.channels
    );
    info!(
        "Commands: {} (prefixes {:?})",
        ctx.registry.list_commands().join(", "),
        ctx.registry.prefixes()
    );

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    tokio::spawn(async move {
        wait_for_signal().await;
        info!("Shutdown signal received");
        let _ = shutdown_tx.send(true);
    });

    let mut session = ctx.eventsub_session();
    let result = session.start(&ctx.config.channels, shutdown_rx).await;
    match &result {
        Ok(()) => info!("EventSub session finished ({:?})", session.state()),
        Err(e) => error!("EventSub session ended with error ({:?}): {}", session.state(), e),
    }
    result
}

#[cfg(unix)]
async fn wait_for_signal() {
    use tokio::signal::unix::{signal, SignalKind};

    let mut term = match signal(SignalKind::terminate()) {
        Ok(s) => s,
        Err(e) => {
            error!("Could not install SIGTERM handler: {}", e);
            let _ = tokio::signal::ctrl_c().await;
            return;
        }
    };
    tokio::select! {
        res = tokio::signal::ctrl_c() => {
            if let Err(e) = res {
                error!("Ctrl-C handler error: {:?}", e);
            }
        }
        _ = term.recv() => {}
    }
}

#[cfg(not(unix))]
async fn wait_for_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Ctrl-C handler error: {:?}", e);
    }
}

mod cli;
mod server;

use std::sync::Arc;

use clap::Parser;
use eyre::{eyre, WrapErr};

use obol_core::keypair::Keypair;
use obol_core::rpc::{HttpRpcClient, SolanaRpc};

#[tokio::main]
async fn main() -> eyre::Result<()> {
    let args = cli::Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_file(true)
        .with_line_number(true)
        .with_level(true)
        .init();

    let signer = Keypair::from_base58(&args.signer_key).wrap_err("load signing key")?;
    tracing::info!(address = %signer.pubkey(), "signing key loaded");

    // Connect to the Solana RPC endpoint and verify it responds before
    // accepting requests.
    let rpc: Arc<dyn SolanaRpc> =
        Arc::new(HttpRpcClient::new(&args.rpc_url).wrap_err("configure RPC client")?);
    let node_version = rpc.get_version().await.map_err(|err| {
        let message = format_rpc_connect_error(&args.rpc_url, &err.to_string());
        eyre!(message).wrap_err("while attempting to connect to Solana RPC")
    })?;
    tracing::info!(rpc_url = %args.rpc_url, %node_version, "connected to Solana RPC");

    let state = server::AppState {
        rpc,
        signer: Arc::new(signer),
    };
    let router = server::build_router(state);

    let bind_addr = format!("{}:{}", args.bind, args.port);
    if args.bind == "0.0.0.0" {
        tracing::warn!("server is bound to 0.0.0.0 — it is accessible from the network");
    }

    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .wrap_err("bind TCP listener")?;
    tracing::info!("listening on {bind_addr}");

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .wrap_err("run HTTP server")?;

    Ok(())
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => tracing::info!("shutdown signal received"),
        Err(e) => {
            tracing::error!(error = %e, "failed to install shutdown signal handler");
            // Without a handler we cannot observe Ctrl-C; keep serving.
            std::future::pending::<()>().await;
        }
    }
}

fn format_rpc_connect_error(rpc_url: &str, source_error: &str) -> String {
    let mut lines = vec![
        format!("could not connect to RPC endpoint `{rpc_url}`"),
        format!("RPC error: {source_error}"),
    ];

    if source_error.contains("dns error") || source_error.contains("Could not resolve host") {
        lines.push(
            "hint: hostname resolution failed; verify the endpoint hostname and your DNS/network"
                .into(),
        );
    } else if source_error.contains("certificate") || source_error.contains("tls") {
        lines.push(
            "hint: TLS handshake failed; verify certificate trust and that the endpoint uses HTTPS"
                .into(),
        );
    } else if source_error.contains("429") {
        lines.push(
            "hint: the endpoint is rate limiting; public RPC URLs throttle aggressively, consider a dedicated provider"
                .into(),
        );
    } else if source_error.contains("error sending request") {
        lines.push(
            "hint: request could not be sent; verify URL format, network access, and endpoint reachability"
                .into(),
        );
    }

    lines.join("\n")
}

use clap::Parser;

/// Obol — Solana payment signing and facilitation service.
#[derive(Parser)]
#[command(version, about)]
pub struct Cli {
    /// Solana JSON-RPC URL.
    #[arg(long, default_value = "https://api.devnet.solana.com", env = "OBOL_RPC_URL")]
    pub rpc_url: String,

    /// Address to bind the HTTP server to.
    #[arg(long, default_value = "127.0.0.1")]
    pub bind: String,

    /// Port to listen on.
    #[arg(long, default_value = "3000")]
    pub port: u16,

    /// Base58-encoded 64-byte signing key (seed followed by public key).
    /// Keep it in the environment or a secret store, never in source or
    /// shell history.
    #[arg(long, env = "OBOL_SIGNER_KEY", hide_env_values = true)]
    pub signer_key: String,
}

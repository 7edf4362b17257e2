#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("RPC communication failure: {0}")]
    Rpc(#[from] RpcError),

    #[error("invalid address: {0}")]
    InvalidAddress(String),

    #[error("invalid blockhash: {0}")]
    InvalidBlockhash(String),

    #[error("invalid signing key: {0}")]
    InvalidKey(String),

    #[error("invalid configuration: {0}")]
    Config(String),

    // The next two Display strings are part of the facilitator's response
    // contract; handlers surface them verbatim.
    #[error("Could not parse transaction")]
    UnparsedTransaction,

    #[error("Transfer mismatch or invalid format")]
    TransferMismatch,

    #[error("transaction {signature} failed on chain: {reason}")]
    TransactionFailed { signature: String, reason: String },

    #[error("transaction {signature} was not confirmed before block height {last_valid_block_height}")]
    ConfirmationExpired {
        signature: String,
        last_valid_block_height: u64,
    },
}

#[derive(Debug, thiserror::Error)]
pub enum RpcError {
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("RPC server error {code}: {message}")]
    ServerError { code: i64, message: String },

    #[error("invalid RPC response: {0}")]
    InvalidResponse(String),
}

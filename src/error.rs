use thiserror::Error;

#[derive(Debug, Error)]
pub enum BotError {
    #[error("PRIVATE_KEY is not set, add it to your .env file")]
    MissingPrivateKey,

    #[error("PRIVATE_KEY is not a valid secp256k1 private key")]
    InvalidPrivateKey,

    #[error("address list unavailable: {0}")]
    SourceUnavailable(String),

    #[error("no valid recipient addresses found")]
    EmptyRecipientPool,

    #[error("rpc error: {0}")]
    Rpc(String),

    #[error("invalid transfer amount `{0}`, must be a positive decimal")]
    InvalidAmount(String),

    #[error("invalid timing: {0}")]
    InvalidTiming(String),
}

use thiserror::Error;

/// Failures talking to the upstream query service. These never escape the
/// holder fetch loop; they end pagination and mark the snapshot incomplete.
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Upstream returned HTTP {0}")]
    Status(u16),

    #[error("RPC error: {message}")]
    Rpc { message: String },

    #[error("Failed to decode page: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Computation failures surfaced to the caller.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum HhiError {
    #[error("Invalid token amount {amount:?} for owner {owner}")]
    InvalidAmount { owner: String, amount: String },

    #[error("Value out of range: {what}")]
    ValueOutOfRange { what: &'static str },
}

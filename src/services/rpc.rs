use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use governor::{RateLimiter, state::{NotKeyed, InMemoryState}, clock::DefaultClock};
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde_json::{json, Value};
use solana_account_decoder::{parse_token::UiTokenAmount, UiAccountEncoding};
use spl_token::solana_program::program_pack::Pack;
use spl_token::state::Account as TokenAccount;

use crate::types::error::FetchError;

pub type RpcRateLimiter = RateLimiter<NotKeyed, InMemoryState, DefaultClock>;

/// Byte offset of the mint inside an SPL token account.
pub const MINT_OFFSET: usize = 0;

// ============================================================================
// Wire schema
// ============================================================================

/// One entry of a `getProgramAccounts` page with `jsonParsed` encoding.
#[derive(Debug, Clone, Deserialize)]
pub struct ProgramAccount {
    /// Address of the token account itself.
    pub pubkey: String,
    pub account: AccountEnvelope,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AccountEnvelope {
    pub data: ParsedAccountData,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ParsedAccountData {
    pub parsed: ParsedTokenAccount,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ParsedTokenAccount {
    pub info: TokenAccountInfo,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenAccountInfo {
    pub owner: String,
    pub token_amount: UiTokenAmount,
}

impl ProgramAccount {
    pub fn owner(&self) -> &str {
        &self.account.data.parsed.info.owner
    }

    /// Raw amount in the token's smallest unit.
    pub fn amount(&self) -> &str {
        &self.account.data.parsed.info.token_amount.amount
    }
}

#[derive(Debug, Deserialize)]
struct RpcResponse {
    result: Option<Vec<ProgramAccount>>,
    error: Option<RpcErrorBody>,
}

#[derive(Debug, Deserialize)]
struct RpcErrorBody {
    message: String,
}

// ============================================================================
// Page source
// ============================================================================

/// A paginated account-lookup service.
#[async_trait]
pub trait AccountPageSource: Send + Sync {
    /// Fetches one page (1-based) of token accounts for `token_id`.
    async fn fetch_page(
        &self,
        token_id: &str,
        page: u32,
        limit: u32,
    ) -> Result<Vec<ProgramAccount>, FetchError>;
}

/// JSON-RPC client for a Helius style paginated `getProgramAccounts`.
pub struct HeliusClient {
    http: Client,
    rpc_url: String,
    rate_limiter: Arc<RpcRateLimiter>,
}

impl HeliusClient {
    pub fn new(
        rpc_url: impl Into<String>,
        timeout: Duration,
        rate_limiter: Arc<RpcRateLimiter>,
    ) -> Result<Self, reqwest::Error> {
        let http = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            rpc_url: rpc_url.into(),
            rate_limiter,
        })
    }
}

#[async_trait]
impl AccountPageSource for HeliusClient {
    async fn fetch_page(
        &self,
        token_id: &str,
        page: u32,
        limit: u32,
    ) -> Result<Vec<ProgramAccount>, FetchError> {
        self.rate_limiter.until_ready().await;

        let response = self
            .http
            .post(&self.rpc_url)
            .json(&page_request(token_id, page, limit))
            .send()
            .await?;

        check_status(response.status())?;
        let body = response.bytes().await?;
        decode_page(&body)
    }
}

/// Builds the JSON-RPC body for one page of token accounts of `token_id`.
pub fn page_request(token_id: &str, page: u32, limit: u32) -> Value {
    json!({
        "jsonrpc": "2.0",
        "id": format!("holders-{}", page),
        "method": "getProgramAccounts",
        "params": [
            spl_token::ID.to_string(),
            {
                "encoding": UiAccountEncoding::JsonParsed,
                "filters": [
                    { "dataSize": TokenAccount::LEN },
                    { "memcmp": { "offset": MINT_OFFSET, "bytes": token_id } }
                ],
                "page": page,
                "limit": limit
            }
        ]
    })
}

fn check_status(status: StatusCode) -> Result<(), FetchError> {
    if status.is_success() {
        Ok(())
    } else {
        Err(FetchError::Status(status.as_u16()))
    }
}

/// Decodes a response body, turning an `{error: {message}}` envelope into a failure.
pub fn decode_page(body: &[u8]) -> Result<Vec<ProgramAccount>, FetchError> {
    let response: RpcResponse = serde_json::from_slice(body)?;
    if let Some(error) = response.error {
        return Err(FetchError::Rpc { message: error.message });
    }
    response.result.ok_or_else(|| FetchError::Rpc {
        message: "response carried neither result nor error".to_string(),
    })
}

#[cfg(test)]
pub(crate) fn test_account(owner: &str, amount: &str) -> ProgramAccount {
    let pubkey = format!("ata-{}", owner);
    serde_json::from_value(tests::account_json(&pubkey, owner, amount)).unwrap()
}

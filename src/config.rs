use std::env;
use std::net::SocketAddr;
use std::num::NonZeroU32;
use std::str::FromStr;
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use nonzero_ext::nonzero;

use crate::services::excluded_accounts::ExcludedAddresses;
use crate::services::holders::{FetchOptions, PageTermination, DEFAULT_PAGE_SIZE};

const HELIUS_RPC_URL: &str = "https://mainnet.helius-rpc.com/?api-key=";

#[derive(Debug, Clone)]
pub struct Config {
    pub rpc_url: String,
    pub request_timeout: Duration,
    pub requests_per_second: NonZeroU32,
    pub fetch: FetchOptions,
    pub excluded: ExcludedAddresses,
    pub bind_addr: SocketAddr,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let rpc_url = match lookup("RPC_URL") {
            Some(url) => url,
            None => {
                let api_key = lookup("HELIUS_API_KEY")
                    .ok_or_else(|| anyhow!("HELIUS_API_KEY or RPC_URL must be set"))?;
                format!("{}{}", HELIUS_RPC_URL, api_key)
            }
        };

        let page_size: u32 = parse_or(&lookup, "PAGE_SIZE", DEFAULT_PAGE_SIZE)?;
        if page_size == 0 {
            return Err(anyhow!("PAGE_SIZE must be greater than zero"));
        }

        let termination = match lookup("PAGE_TERMINATION") {
            Some(value) => value.parse::<PageTermination>().map_err(|e| anyhow!(e))?,
            None => PageTermination::default(),
        };

        let max_pages = lookup("MAX_PAGES")
            .map(|value| value.parse::<u32>().context("Invalid MAX_PAGES"))
            .transpose()?;
        if max_pages == Some(0) {
            return Err(anyhow!("MAX_PAGES must be greater than zero"));
        }

        let mut excluded = match lookup("EXCLUDED_ADDRESSES") {
            Some(list) => ExcludedAddresses::from_csv(&list),
            None => ExcludedAddresses::default(),
        };
        if let Some(extra) = lookup("EXTRA_EXCLUDED_ADDRESSES") {
            excluded.extend_csv(&extra);
        }

        Ok(Self {
            rpc_url,
            request_timeout: Duration::from_secs(parse_or(&lookup, "REQUEST_TIMEOUT_SECS", 30)?),
            requests_per_second: parse_or(&lookup, "RPC_REQUESTS_PER_SECOND", nonzero!(5u32))?,
            fetch: FetchOptions {
                page_size,
                termination,
                max_pages,
            },
            excluded,
            bind_addr: parse_or(&lookup, "BIND_ADDR", SocketAddr::from(([0, 0, 0, 0], 8000)))?,
        })
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(key) {
        Some(value) => value
            .trim()
            .parse()
            .with_context(|| format!("Invalid {}: {}", key, value)),
        None => Ok(default),
    }
}

use super::excluded_accounts::ExcludedAddresses;
use super::rpc::{AccountPageSource, ProgramAccount};
use crate::types::models::{HolderFetch, HolderRecord};

pub const DEFAULT_PAGE_SIZE: u32 = 1000;

/// When a page is considered the last one.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PageTermination {
    /// Stop once a page returns fewer raw accounts than requested.
    #[default]
    Raw,
    /// Stop once a page yields fewer holders after filtering than requested.
    /// Can under-fetch when a full page is filtered away.
    Filtered,
}

impl std::str::FromStr for PageTermination {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "raw" => Ok(PageTermination::Raw),
            "filtered" => Ok(PageTermination::Filtered),
            other => Err(format!("unknown page termination policy: {}", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchOptions {
    pub page_size: u32,
    pub termination: PageTermination,
    pub max_pages: Option<u32>,
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            termination: PageTermination::default(),
            max_pages: None,
        }
    }
}

/// Pages through every token account of `token_id`.
///
/// Pages are requested one after another. The first failing page ends the
/// loop; whatever was collected before it is returned with `complete = false`.
pub async fn fetch_all_holders<S>(
    source: &S,
    excluded: &ExcludedAddresses,
    token_id: &str,
    options: &FetchOptions,
) -> HolderFetch
where
    S: AccountPageSource + ?Sized,
{
    let mut records = Vec::new();
    let mut page: u32 = 1;
    let mut pages_fetched: u32 = 0;

    let complete = loop {
        if let Some(max_pages) = options.max_pages {
            if pages_fetched >= max_pages {
                tracing::warn!(
                    "Stopping {} after {} pages (page cap reached), holder set may be incomplete",
                    token_id,
                    pages_fetched
                );
                break false;
            }
        }

        let accounts = match source.fetch_page(token_id, page, options.page_size).await {
            Ok(accounts) => accounts,
            Err(e) => {
                tracing::warn!(
                    "Page {} for {} failed, returning {} holders collected so far: {}",
                    page,
                    token_id,
                    records.len(),
                    e
                );
                break false;
            }
        };

        let raw_count = accounts.len();
        if raw_count > options.page_size as usize {
            tracing::warn!(
                "Page {} for {} has {} accounts over a limit of {}, keeping {} holders",
                page,
                token_id,
                raw_count,
                options.page_size,
                records.len()
            );
            break false;
        }
        pages_fetched += 1;

        if raw_count == 0 {
            tracing::debug!("Page {} for {} is empty", page, token_id);
            break true;
        }

        let before = records.len();
        records.extend(
            accounts
                .iter()
                .filter_map(|account| to_holder_record(account, excluded)),
        );
        let kept = records.len() - before;
        tracing::debug!(
            "Page {} for {}: {} accounts, {} holders kept",
            page,
            token_id,
            raw_count,
            kept
        );

        let page_size = options.page_size as usize;
        let last_page = match options.termination {
            PageTermination::Raw => raw_count < page_size,
            PageTermination::Filtered => kept < page_size,
        };
        if last_page {
            break true;
        }
        page += 1;
    };

    tracing::info!(
        "Fetched {} holders for {} across {} pages (complete: {})",
        records.len(),
        token_id,
        pages_fetched,
        complete
    );

    HolderFetch {
        records,
        pages_fetched,
        complete,
    }
}

fn to_holder_record(
    account: &ProgramAccount,
    excluded: &ExcludedAddresses,
) -> Option<HolderRecord> {
    let owner = account.owner();
    let amount = account.amount();
    if excluded.contains(owner) || is_zero_amount(amount) {
        return None;
    }
    Some(HolderRecord::new(account.pubkey.as_str(), owner, amount))
}

/// True for a non-empty run of ASCII zeros. Anything else, including malformed
/// input, is passed on so the aggregator can reject it.
fn is_zero_amount(amount: &str) -> bool {
    let amount = amount.trim();
    !amount.is_empty() && amount.bytes().all(|b| b == b'0')
}

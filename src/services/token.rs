use super::aggregator::aggregate;
use super::excluded_accounts::ExcludedAddresses;
use super::hhi::compute;
use super::holders::{fetch_all_holders, FetchOptions};
use super::rpc::AccountPageSource;
use crate::types::error::HhiError;
use crate::types::models::HhiResult;

/// Fetches every holder of `mint_address` and computes its concentration.
///
/// Upstream failures only truncate the snapshot (see `HhiResult::complete`);
/// a malformed amount fails the whole computation.
pub async fn get_token_hhi<S>(
    source: &S,
    excluded: &ExcludedAddresses,
    options: &FetchOptions,
    mint_address: &str,
) -> Result<HhiResult, HhiError>
where
    S: AccountPageSource + ?Sized,
{
    let operation_start = std::time::Instant::now();

    let fetch = fetch_all_holders(source, excluded, mint_address, options).await;
    tracing::info!(
        "Fetching holders for {} took: {:?}",
        mint_address,
        operation_start.elapsed()
    );

    let aggregated = aggregate(&fetch.records, excluded)?;
    if aggregated.is_empty() {
        tracing::info!("No active holders for {}", mint_address);
    }

    let result = compute(&aggregated, fetch.complete, fetch.pages_fetched)?;
    tracing::info!(
        "HHI calculation for {} took: {:?}",
        mint_address,
        operation_start.elapsed()
    );
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::rpc::{test_account, ProgramAccount};
    use crate::types::error::FetchError;
    use crate::types::models::ConcentrationLevel;
    use async_trait::async_trait;

    /// Serves fixed pages by index, failing past the end when `fail_after` is set.
    struct FixedPages {
        pages: Vec<Vec<(&'static str, &'static str)>>,
        fail_after: bool,
    }

    #[async_trait]
    impl AccountPageSource for FixedPages {
        async fn fetch_page(
            &self,
            _token_id: &str,
            page: u32,
            _limit: u32,
        ) -> Result<Vec<ProgramAccount>, FetchError> {
            match self.pages.get(page as usize - 1) {
                Some(accounts) => Ok(accounts
                    .iter()
                    .map(|(owner, amount)| test_account(owner, amount))
                    .collect()),
                None if self.fail_after => Err(FetchError::Status(503)),
                None => Ok(Vec::new()),
            }
        }
    }

    fn options(page_size: u32) -> FetchOptions {
        FetchOptions {
            page_size,
            ..FetchOptions::default()
        }
    }

    #[tokio::test]
    async fn test_end_to_end_four_equal_holders() {
        let source = FixedPages {
            pages: vec![vec![("X", "25"), ("Y", "25"), ("Z", "25"), ("W", "25")]],
            fail_after: false,
        };
        let result = get_token_hhi(&source, &ExcludedAddresses::default(), &options(1000), "mint")
            .await
            .unwrap();
        assert_eq!(result.hhi, 2500);
        assert_eq!(result.holder_count, 4);
        assert_eq!(result.concentration_level, ConcentrationLevel::High);
        assert!(result.complete);
        assert_eq!(result.pages_fetched, 1);
    }

    #[tokio::test]
    async fn test_all_zero_balances_yield_sentinel() {
        let source = FixedPages {
            pages: vec![vec![("X", "0"), ("Y", "0")]],
            fail_after: false,
        };
        let result = get_token_hhi(&source, &ExcludedAddresses::default(), &options(1000), "mint")
            .await
            .unwrap();
        assert_eq!(result, HhiResult::empty(true, 1));
    }

    #[tokio::test]
    async fn test_partial_snapshot_is_flagged() {
        let source = FixedPages {
            pages: vec![vec![("X", "60"), ("Y", "40")]],
            fail_after: true,
        };
        let result = get_token_hhi(&source, &ExcludedAddresses::default(), &options(2), "mint")
            .await
            .unwrap();
        assert_eq!(result.holder_count, 2);
        assert_eq!(result.total_supply, "100");
        // 3600 + 1600
        assert_eq!(result.hhi, 5200);
        assert!(!result.complete);
    }

    #[tokio::test]
    async fn test_excluded_owner_never_reaches_result() {
        let source = FixedPages {
            pages: vec![vec![
                ("1nc1nerator11111111111111111111111111111111", "900"),
                ("X", "100"),
            ]],
            fail_after: false,
        };
        let result = get_token_hhi(&source, &ExcludedAddresses::default(), &options(1000), "mint")
            .await
            .unwrap();
        assert_eq!(result.holder_count, 1);
        assert_eq!(result.hhi, 10_000);
        assert!(result
            .top_holders
            .iter()
            .all(|h| h.account != "1nc1nerator11111111111111111111111111111111"));
    }

    #[tokio::test]
    async fn test_account_repeated_across_pages_counted_once() {
        let source = FixedPages {
            pages: vec![vec![("X", "50"), ("Y", "50")], vec![("Y", "50")]],
            fail_after: false,
        };
        let result = get_token_hhi(&source, &ExcludedAddresses::default(), &options(2), "mint")
            .await
            .unwrap();
        assert_eq!(result.pages_fetched, 2);
        assert_eq!(result.holder_count, 2);
        assert_eq!(result.total_supply, "100");
        assert_eq!(result.hhi, 5000);
        assert!(result.complete);
    }

    #[tokio::test]
    async fn test_malformed_amount_is_a_failure() {
        let source = FixedPages {
            pages: vec![vec![("X", "100"), ("Y", "1e9")]],
            fail_after: false,
        };
        let err = get_token_hhi(&source, &ExcludedAddresses::default(), &options(1000), "mint")
            .await
            .unwrap_err();
        assert!(matches!(err, HhiError::InvalidAmount { .. }));
    }
}

use std::collections::HashSet;
use std::str::FromStr;

use num_bigint::BigUint;
use num_traits::Zero;

use super::excluded_accounts::ExcludedAddresses;
use crate::types::error::HhiError;
use crate::types::models::{AggregatedHolders, Holder, HolderRecord};

/// Parses and sums holder amounts exactly, keeping fetch order.
///
/// A token account seen more than once (e.g. shifted across pages) is
/// counted on its first sighting only. Excluded owners and zero balances are
/// dropped here as well, so the result holds the invariants whatever produced
/// `records`. An empty result (no holders, zero total) is a valid outcome; a
/// malformed amount is not.
pub fn aggregate(
    records: &[HolderRecord],
    excluded: &ExcludedAddresses,
) -> Result<AggregatedHolders, HhiError> {
    let mut holders = Vec::with_capacity(records.len());
    let mut total_supply = BigUint::zero();
    let mut seen: HashSet<&str> = HashSet::with_capacity(records.len());
    let mut duplicates = 0usize;

    for record in records {
        if !seen.insert(record.account.as_str()) {
            duplicates += 1;
            continue;
        }
        if excluded.contains(&record.owner) {
            continue;
        }
        let amount = parse_amount(record)?;
        if amount.is_zero() {
            continue;
        }
        total_supply += &amount;
        holders.push(Holder {
            owner: record.owner.clone(),
            amount,
        });
    }

    if duplicates > 0 {
        tracing::warn!("Dropped {} repeated token accounts", duplicates);
    }
    tracing::debug!(
        "Aggregated {} of {} records, total supply {}",
        holders.len(),
        records.len(),
        total_supply
    );

    Ok(AggregatedHolders {
        holders,
        total_supply,
    })
}

fn parse_amount(record: &HolderRecord) -> Result<BigUint, HhiError> {
    let invalid = || HhiError::InvalidAmount {
        owner: record.owner.clone(),
        amount: record.amount.clone(),
    };
    let digits = record.amount.trim();
    // BigUint accepts a leading '+', token amounts never carry one
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid());
    }
    BigUint::from_str(digits).map_err(|_| invalid())
}

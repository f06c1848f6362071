use num_bigint::BigUint;
use num_traits::{ToPrimitive, Zero};

use crate::types::error::HhiError;
use crate::types::models::{AggregatedHolders, ConcentrationLevel, HhiResult, Holder, TopHolder};

pub const TOP_HOLDERS: usize = 10;

/// Shares are computed in millionths before converting to a percentage.
const SHARE_SCALE: u32 = 1_000_000;
/// Millionths per percent.
const PERCENT_SCALE: f64 = 10_000.0;
/// HHI is reported on a 0..=10_000 scale.
const HHI_SCALE: u32 = 10_000;

/// Computes the concentration index and top holders for an aggregated snapshot.
///
/// All arithmetic on amounts is exact; floating point only appears in the
/// per-holder display percentage.
pub fn compute(
    aggregated: &AggregatedHolders,
    complete: bool,
    pages_fetched: u32,
) -> Result<HhiResult, HhiError> {
    if aggregated.is_empty() {
        return Ok(HhiResult::empty(complete, pages_fetched));
    }

    let total = &aggregated.total_supply;
    let total_squared = total * total;

    let mut hhi_sum = BigUint::zero();
    let mut ranked: Vec<(f64, &Holder)> = Vec::with_capacity(aggregated.holders.len());
    for holder in &aggregated.holders {
        hhi_sum += squared_term(&holder.amount, &total_squared);
        ranked.push((percentage(&holder.amount, total)?, holder));
    }

    let hhi = hhi_sum
        .to_u64()
        .filter(|hhi| *hhi <= HHI_SCALE as u64)
        .ok_or(HhiError::ValueOutOfRange { what: "hhi" })?;

    // Stable sort: equal percentages keep fetch order
    ranked.sort_by(|a, b| b.0.total_cmp(&a.0));
    let top_holders = ranked
        .into_iter()
        .take(TOP_HOLDERS)
        .map(|(percentage, holder)| TopHolder {
            account: holder.owner.clone(),
            amount: holder.amount.to_string(),
            percentage,
        })
        .collect();

    let concentration_level = concentration_level(hhi);
    tracing::info!(
        "HHI {} ({}) across {} holders, total supply {}",
        hhi,
        concentration_level,
        aggregated.holders.len(),
        total
    );

    Ok(HhiResult {
        hhi,
        total_supply: total.to_string(),
        holder_count: aggregated.holders.len(),
        top_holders,
        concentration_level,
        complete,
        pages_fetched,
    })
}

/// Share of `total` held by `amount` as a percentage with 4 decimal places.
///
/// Multiplies before dividing so small shares keep their precision.
pub fn percentage(amount: &BigUint, total: &BigUint) -> Result<f64, HhiError> {
    if total.is_zero() {
        return Err(HhiError::ValueOutOfRange { what: "total supply" });
    }
    let millionths = (amount * SHARE_SCALE) / total;
    let millionths = millionths
        .to_u64()
        .ok_or(HhiError::ValueOutOfRange { what: "holder share" })?;
    Ok(round4(millionths as f64 / PERCENT_SCALE))
}

/// `amount² · 10000 / total²`, the holder's contribution to HHI.
fn squared_term(amount: &BigUint, total_squared: &BigUint) -> BigUint {
    (amount * amount * HHI_SCALE) / total_squared
}

fn round4(value: f64) -> f64 {
    (value * PERCENT_SCALE).round() / PERCENT_SCALE
}

pub fn concentration_level(hhi: u64) -> ConcentrationLevel {
    match hhi {
        h if h >= 5000 => ConcentrationLevel::Extreme,
        h if h >= 2500 => ConcentrationLevel::High,
        h if h >= 1500 => ConcentrationLevel::Moderate,
        _ => ConcentrationLevel::Decentralized,
    }
}

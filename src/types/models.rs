use num_bigint::BigUint;
use serde::{Deserialize, Serialize};

/// One token account as returned by the upstream service: its address, the
/// owning wallet and the raw amount in the token's smallest unit, kept as a
/// decimal string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HolderRecord {
    pub account: String,
    pub owner: String,
    pub amount: String,
}

impl HolderRecord {
    pub fn new(
        account: impl Into<String>,
        owner: impl Into<String>,
        amount: impl Into<String>,
    ) -> Self {
        Self {
            account: account.into(),
            owner: owner.into(),
            amount: amount.into(),
        }
    }
}

/// Output of the paginated fetch loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HolderFetch {
    pub records: Vec<HolderRecord>,
    pub pages_fetched: u32,
    /// False when pagination stopped early (upstream failure, page cap or an
    /// unpaginated upstream).
    pub complete: bool,
}

/// A holder whose amount has been parsed and validated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Holder {
    pub owner: String,
    pub amount: BigUint,
}

/// Holders in fetch order with their exact total.
///
/// `total_supply` always equals the sum of `holders[i].amount`, every amount
/// is non-zero and no owner belongs to the excluded set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AggregatedHolders {
    pub holders: Vec<Holder>,
    pub total_supply: BigUint,
}

impl AggregatedHolders {
    pub fn is_empty(&self) -> bool {
        self.holders.is_empty() || self.total_supply == BigUint::default()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConcentrationLevel {
    #[serde(rename = "No active holders")]
    NoActiveHolders,
    #[serde(rename = "Decentralized")]
    Decentralized,
    #[serde(rename = "Moderate concentration")]
    Moderate,
    #[serde(rename = "High concentration")]
    High,
    #[serde(rename = "Extreme concentration (risk of manipulation)")]
    Extreme,
}

impl ConcentrationLevel {
    pub fn label(&self) -> &'static str {
        match self {
            ConcentrationLevel::NoActiveHolders => "No active holders",
            ConcentrationLevel::Decentralized => "Decentralized",
            ConcentrationLevel::Moderate => "Moderate concentration",
            ConcentrationLevel::High => "High concentration",
            ConcentrationLevel::Extreme => "Extreme concentration (risk of manipulation)",
        }
    }
}

impl std::fmt::Display for ConcentrationLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopHolder {
    pub account: String,
    pub amount: String,
    pub percentage: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HhiResult {
    pub hhi: u64,
    pub total_supply: String,
    pub holder_count: usize,
    pub top_holders: Vec<TopHolder>,
    pub concentration_level: ConcentrationLevel,
    pub complete: bool,
    pub pages_fetched: u32,
}

impl HhiResult {
    /// Result for a token with no eligible holders or a zero total.
    pub fn empty(complete: bool, pages_fetched: u32) -> Self {
        Self {
            hhi: 0,
            total_supply: "0".to_string(),
            holder_count: 0,
            top_holders: Vec::new(),
            concentration_level: ConcentrationLevel::NoActiveHolders,
            complete,
            pages_fetched,
        }
    }
}

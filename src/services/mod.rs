pub mod aggregator;
pub mod excluded_accounts;
pub mod hhi;
pub mod holders;
pub mod rpc;
pub mod token;

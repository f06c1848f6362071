use std::sync::Arc;

use crate::services::excluded_accounts::ExcludedAddresses;
use crate::services::holders::FetchOptions;
use crate::services::rpc::AccountPageSource;

/// Read-only state shared by every request.
#[derive(Clone)]
pub struct AppState {
    pub source: Arc<dyn AccountPageSource>,
    pub excluded: Arc<ExcludedAddresses>,
    pub fetch: FetchOptions,
}

use axum::{
    extract::{Path, State},
    Json,
};
use solana_sdk::pubkey::Pubkey;
use std::str::FromStr;

use super::error::ApiError;
use super::state::AppState;
use crate::services::token::get_token_hhi;
use crate::types::models::HhiResult;

pub async fn get_token_concentration(
    State(state): State<AppState>,
    Path(mint_address): Path<String>,
) -> Result<Json<HhiResult>, ApiError> {
    if Pubkey::from_str(&mint_address).is_err() {
        return Err(ApiError::InvalidMint(mint_address));
    }

    tracing::info!("Computing HHI for {}", mint_address);
    let result = get_token_hhi(
        state.source.as_ref(),
        &state.excluded,
        &state.fetch,
        &mint_address,
    )
    .await?;

    Ok(Json(result))
}

pub async fn health() -> &'static str {
    "ok"
}

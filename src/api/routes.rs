use axum::{
    routing::get,
    Router,
};
use tower_http::cors::CorsLayer;

use super::handlers::{get_token_concentration, health};
use super::state::AppState;

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/tokens/:mint_address/hhi", get(get_token_concentration))
        .route("/health", get(health))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::excluded_accounts::ExcludedAddresses;
    use crate::services::holders::FetchOptions;
    use crate::services::rpc::{test_account, AccountPageSource, ProgramAccount};
    use crate::types::error::FetchError;
    use async_trait::async_trait;
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use serde_json::Value;
    use std::sync::Arc;
    use tower::ServiceExt;

    const MINT: &str = "DezXAZ8z7PnrnRJjz3wXBoRgixCa6xjnB7YaB1pPB263";

    struct OnePage(Vec<(&'static str, &'static str)>);

    #[async_trait]
    impl AccountPageSource for OnePage {
        async fn fetch_page(
            &self,
            _token_id: &str,
            page: u32,
            _limit: u32,
        ) -> Result<Vec<ProgramAccount>, FetchError> {
            if page > 1 {
                return Ok(Vec::new());
            }
            Ok(self.0.iter().map(|(o, a)| test_account(o, a)).collect())
        }
    }

    fn router(accounts: Vec<(&'static str, &'static str)>) -> Router {
        create_router(AppState {
            source: Arc::new(OnePage(accounts)),
            excluded: Arc::new(ExcludedAddresses::default()),
            fetch: FetchOptions::default(),
        })
    }

    async fn get_json(router: Router, uri: &str) -> (StatusCode, Value) {
        let response = router
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&body).unwrap())
    }

    #[tokio::test]
    async fn test_hhi_endpoint() {
        let (status, body) = get_json(
            router(vec![("X", "25"), ("Y", "25"), ("Z", "25"), ("W", "25")]),
            &format!("/tokens/{}/hhi", MINT),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["hhi"], 2500);
        assert_eq!(body["totalSupply"], "100");
        assert_eq!(body["holderCount"], 4);
        assert_eq!(body["concentrationLevel"], "High concentration");
        assert_eq!(body["topHolders"][0]["account"], "X");
        assert_eq!(body["topHolders"][0]["percentage"], 25.0);
        assert_eq!(body["complete"], true);
    }

    #[tokio::test]
    async fn test_no_holders_is_ok() {
        let (status, body) = get_json(router(Vec::new()), &format!("/tokens/{}/hhi", MINT)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["concentrationLevel"], "No active holders");
        assert_eq!(body["hhi"], 0);
    }

    #[tokio::test]
    async fn test_invalid_mint_is_bad_request() {
        let (status, body) = get_json(router(Vec::new()), "/tokens/not-a-key/hhi").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], 400);
    }

    #[tokio::test]
    async fn test_computation_failure_is_distinct_from_empty() {
        let (status, body) = get_json(
            router(vec![("X", "12.5")]),
            &format!("/tokens/{}/hhi", MINT),
        )
        .await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["code"], 500);
        assert!(body["error"].as_str().unwrap().contains("Invalid token amount"));
    }

    #[tokio::test]
    async fn test_health() {
        let response = router(Vec::new())
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }
}

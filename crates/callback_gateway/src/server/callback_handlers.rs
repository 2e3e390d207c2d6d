//! Callback route handlers
//!
//! The HTTP seam between the host framework and the reconciler. Handlers
//! only extract parameters and encode the result; every outcome renders as
//! 200 with the tagged result body, never as an HTTP error.

use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;
use std::sync::Arc;

use crate::reconcile::{CallbackParams, CallbackResult};

use super::AppState;

/// Redirect query parameters from the OAuth provider
#[derive(Debug, Deserialize)]
pub struct CallbackQuery {
    pub code: Option<String>,
    pub state: Option<String>,
    pub error: Option<String>,
}

/// OAuth redirect callback - reconciles the redirect into a single result
pub async fn oauth_callback(
    State(state): State<Arc<AppState>>,
    Query(query): Query<CallbackQuery>,
) -> Json<CallbackResult> {
    let params = CallbackParams {
        code: query.code,
        state: query.state,
        error: query.error,
    };

    Json(state.reconciler.handle_callback(params).await)
}

/// Liveness probe
pub async fn healthz() -> &'static str {
    "ok"
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;
    use crate::server::build_router;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use http_body_util::BodyExt;
    use mockito::Server;
    use tower::ServiceExt;

    fn test_config(api_base_url: &str) -> AppConfig {
        AppConfig::new(api_base_url.to_string(), None, true).unwrap()
    }

    #[tokio::test]
    async fn callback_route_renders_provider_error_as_ok() {
        let app = build_router(&test_config("http://127.0.0.1:9"));

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/callback?error=access_denied")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = response.into_body().collect().await.unwrap().to_bytes();
        let value: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(value["success"], serde_json::json!(false));
        assert_eq!(value["message"], serde_json::json!("Authorization failed"));
        assert_eq!(
            value["errors"][0]["description"],
            serde_json::json!("access_denied")
        );
    }

    #[tokio::test]
    async fn callback_route_forwards_code_and_state_upstream() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/spotify/callback")
            .match_query(mockito::Matcher::AllOf(vec![
                mockito::Matcher::UrlEncoded("code".to_string(), "abc123".to_string()),
                mockito::Matcher::UrlEncoded("state".to_string(), "xyz".to_string()),
            ]))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{"success":true,"message":"ok","data":{"message":"ok","spotifyUser":"u1","discordGuildId":42}}"#,
            )
            .create_async()
            .await;

        let app = build_router(&test_config(&server.url()));
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/callback?code=abc123&state=xyz")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = response.into_body().collect().await.unwrap().to_bytes();
        let value: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(value["success"], serde_json::json!(true));
        assert_eq!(value["data"]["spotifyUser"], serde_json::json!("u1"));
        assert_eq!(value["data"]["discordGuildId"], serde_json::json!(42));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn healthz_responds_ok() {
        let app = build_router(&test_config("http://127.0.0.1:9"));

        let response = app
            .oneshot(Request::builder().uri("/healthz").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }
}

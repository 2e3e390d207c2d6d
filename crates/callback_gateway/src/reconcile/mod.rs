//! Callback reconciliation
//!
//! Turns an incoming OAuth redirect into exactly one [`CallbackResult`],
//! making at most one outbound call to the backend API. Every failure path
//! is folded into the failure variant; [`Reconciler::handle_callback`]
//! never returns an error to its caller.

use anyhow::{Context, Result};
use serde::ser::SerializeStruct;
use serde::{Deserialize, Serialize, Serializer};
use tracing::{info, warn};

/// Query parameters carried by the provider redirect
#[derive(Debug, Clone, Default)]
pub struct CallbackParams {
    pub code: Option<String>,
    pub state: Option<String>,
    pub error: Option<String>,
}

/// Weakly-structured error descriptor forwarded from the backend
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiError {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl ApiError {
    fn from_description(description: impl Into<String>) -> Self {
        Self {
            code: None,
            description: Some(description.into()),
        }
    }
}

/// Normalized success payload forwarded from the backend
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OAuthPayload {
    pub message: String,
    pub spotify_user: String,
    pub discord_guild_id: i64,
}

/// Success envelope returned by the backend on 2xx responses.
/// Transient: discarded after mapping into a [`CallbackResult`].
#[derive(Debug, Deserialize)]
pub struct SuccessEnvelope {
    // Part of the backend contract, but the HTTP status code is
    // authoritative for success/failure discrimination.
    #[serde(default)]
    pub success: bool,
    pub message: String,
    #[serde(default)]
    pub note: Option<String>,
    pub data: OAuthPayload,
}

/// Error envelope returned by the backend on non-2xx responses
#[derive(Debug, Deserialize)]
pub struct ErrorEnvelope {
    #[serde(default)]
    pub success: bool,
    pub message: String,
    #[serde(default)]
    pub errors: Option<Vec<ApiError>>,
}

/// The single result shape consumed by the presentation layer.
///
/// Serializes under the canonical field names: `success` (bool), `data`
/// and `message` on success; `success`, `message` and optional `errors`
/// on failure.
#[derive(Debug, Clone, PartialEq)]
pub enum CallbackResult {
    Success {
        data: OAuthPayload,
        message: String,
    },
    Failure {
        message: String,
        errors: Option<Vec<ApiError>>,
    },
}

impl CallbackResult {
    fn failure(message: &str, errors: Vec<ApiError>) -> Self {
        Self::Failure {
            message: message.to_string(),
            errors: Some(errors),
        }
    }
}

impl Serialize for CallbackResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            CallbackResult::Success { data, message } => {
                let mut s = serializer.serialize_struct("CallbackResult", 3)?;
                s.serialize_field("success", &true)?;
                s.serialize_field("data", data)?;
                s.serialize_field("message", message)?;
                s.end()
            }
            CallbackResult::Failure { message, errors } => {
                let fields = if errors.is_some() { 3 } else { 2 };
                let mut s = serializer.serialize_struct("CallbackResult", fields)?;
                s.serialize_field("success", &false)?;
                s.serialize_field("message", message)?;
                if let Some(errors) = errors {
                    s.serialize_field("errors", errors)?;
                }
                s.end()
            }
        }
    }
}

/// Reconciles provider redirects against the backend API
#[derive(Clone)]
pub struct Reconciler {
    http_client: reqwest::Client,
    api_base_url: String,
}

impl Reconciler {
    pub fn new(api_base_url: impl Into<String>) -> Self {
        Self {
            http_client: reqwest::Client::new(),
            api_base_url: api_base_url.into(),
        }
    }

    /// Transform redirect parameters into exactly one [`CallbackResult`].
    ///
    /// Terminal outcomes, first match wins:
    /// provider error, missing parameters, upstream success, upstream
    /// rejection, transport failure. Only the upstream paths touch the
    /// network, and at most once.
    pub async fn handle_callback(&self, params: CallbackParams) -> CallbackResult {
        // The original front-end treated empty strings as absent
        let code = params.code.filter(|v| !v.is_empty());
        let state = params.state.filter(|v| !v.is_empty());
        let error = params.error.filter(|v| !v.is_empty());

        if let Some(error) = error {
            info!("provider returned an error, skipping backend exchange: {error}");
            return CallbackResult::failure(
                "Authorization failed",
                vec![ApiError::from_description(error)],
            );
        }

        let (code, state) = match (code, state) {
            (Some(code), Some(state)) => (code, state),
            _ => {
                info!("redirect is missing code or state");
                return CallbackResult::failure(
                    "Missing required parameters",
                    vec![ApiError::from_description(
                        "Authorization code or state is missing",
                    )],
                );
            }
        };

        info!(
            "exchanging authorization code with backend: code={}... state={}",
            code_prefix(&code),
            state
        );

        match self.exchange(&code, &state).await {
            Ok(result) => result,
            Err(err) => {
                warn!("backend exchange failed: {err:#}");
                let description = err.root_cause().to_string();
                let description = if description.is_empty() {
                    "Unknown error occurred".to_string()
                } else {
                    description
                };
                CallbackResult::failure(
                    "Failed to connect to server",
                    vec![ApiError::from_description(description)],
                )
            }
        }
    }

    /// Single outbound exchange. Success/failure is discriminated by the
    /// HTTP status code; the body-level `success` flag is never consulted.
    async fn exchange(&self, code: &str, state: &str) -> Result<CallbackResult> {
        let response = self
            .http_client
            .get(format!("{}/spotify/callback", self.api_base_url))
            .query(&[("code", code), ("state", state)])
            .send()
            .await
            .context("Failed to reach backend")?;

        let status = response.status();
        if status.is_success() {
            let envelope: SuccessEnvelope = response
                .json()
                .await
                .context("Failed to parse success envelope")?;
            info!("backend accepted the exchange: {}", envelope.message);
            Ok(CallbackResult::Success {
                data: envelope.data,
                message: envelope.message,
            })
        } else {
            let envelope: ErrorEnvelope = response
                .json()
                .await
                .with_context(|| format!("Failed to parse error envelope (status {status})"))?;
            info!("backend rejected the exchange: {}", envelope.message);
            Ok(CallbackResult::Failure {
                message: envelope.message,
                errors: envelope.errors,
            })
        }
    }
}

fn code_prefix(code: &str) -> String {
    code.chars().take(10).collect()
}

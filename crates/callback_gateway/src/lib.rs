//! Spotify/Discord OAuth Callback Gateway
//!
//! Terminates the browser redirect leg of the Spotify-to-Discord linking
//! flow: parses the provider redirect, forwards the authorization code and
//! state to the backend API, and normalizes the outcome into a single
//! tagged result shape for the presentation layer.
//!
//! # Features
//! - Provider error and missing-parameter short circuits (no backend call)
//! - Single upstream exchange against `{API_BASE_URL}/spotify/callback`
//! - Uniform success/failure result; the handler never surfaces an error
//! - Guarded one-time analytics bootstrap

pub mod analytics;
pub mod config;
pub mod reconcile;
pub mod server;

pub use config::AppConfig;
pub use reconcile::{ApiError, CallbackParams, CallbackResult, OAuthPayload, Reconciler};
pub use server::{start_server, AppState};

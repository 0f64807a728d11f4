//! REST API helpers for communicating with the DevHive backend.
//!
//! Client-side (hydrate): real HTTP calls via `gloo-net`.
//! Server-side (SSR) and native tests: every call returns
//! [`ApiError::Unavailable`], since these endpoints are only meaningful in
//! the browser.
//!
//! ERROR HANDLING
//! ==============
//! Failures come back as [`ApiError`]; pages show
//! [`ApiError::user_message`] inline. Nothing here retries.

#![allow(clippy::unused_async)]

#[cfg(test)]
#[path = "api_test.rs"]
mod api_test;

use crate::config::ClientConfig;
use crate::net::types::{ChatMessage, ErrorBody, Project, TokenBundle, User};
#[cfg(feature = "hydrate")]
use crate::net::types::{CreateProjectRequest, LoginRequest, RegisterRequest};

/// Shown when the backend gives no usable message.
pub const GENERIC_ERROR_MESSAGE: &str = "Something went wrong. Please try again.";

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ApiError {
    #[error("network error: {0}")]
    Network(String),
    #[error("request failed with status {status}")]
    Status { status: u16, message: Option<String> },
    #[error("invalid response body: {0}")]
    Decode(String),
    #[error("not available outside the browser")]
    Unavailable,
}

impl ApiError {
    /// Build a status error, keeping the backend's `message` when the body
    /// carries one.
    pub fn from_status(status: u16, body: &str) -> Self {
        let message = serde_json::from_str::<ErrorBody>(body)
            .ok()
            .and_then(|b| b.message)
            .map(|m| m.trim().to_owned())
            .filter(|m| !m.is_empty());
        Self::Status { status, message }
    }

    /// Text suitable for an inline error message.
    pub fn user_message(&self) -> String {
        match self {
            Self::Status { message: Some(message), .. } => message.clone(),
            _ => GENERIC_ERROR_MESSAGE.to_owned(),
        }
    }

    /// True when the backend rejected the credentials themselves.
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Status { status: 401 | 403, .. })
    }
}

fn project_endpoint(project_id: &str) -> String {
    format!("/api/projects/{}", urlencoding::encode(project_id))
}

fn project_messages_endpoint(project_id: &str) -> String {
    format!("{}/messages", project_endpoint(project_id))
}

#[cfg(any(test, feature = "hydrate"))]
fn bearer(token: &str) -> String {
    format!("Bearer {token}")
}

#[cfg(feature = "hydrate")]
fn with_token(builder: gloo_net::http::RequestBuilder, token: Option<&str>) -> gloo_net::http::RequestBuilder {
    match token {
        Some(token) => builder.header("Authorization", &bearer(token)),
        None => builder,
    }
}

#[cfg(feature = "hydrate")]
async fn read_json<T: serde::de::DeserializeOwned>(resp: gloo_net::http::Response) -> Result<T, ApiError> {
    if !resp.ok() {
        let status = resp.status();
        let body = resp.text().await.unwrap_or_default();
        return Err(ApiError::from_status(status, &body));
    }
    resp.json::<T>().await.map_err(|e| ApiError::Decode(e.to_string()))
}

#[cfg(feature = "hydrate")]
async fn get_json<T: serde::de::DeserializeOwned>(config: &ClientConfig, path: &str, token: &str) -> Result<T, ApiError> {
    let builder = gloo_net::http::Request::get(&config.api_url(path));
    let resp = with_token(builder, Some(token))
        .send()
        .await
        .map_err(|e| ApiError::Network(e.to_string()))?;
    read_json(resp).await
}

#[cfg(feature = "hydrate")]
async fn post_json<B: serde::Serialize, T: serde::de::DeserializeOwned>(
    config: &ClientConfig,
    path: &str,
    token: Option<&str>,
    body: &B,
) -> Result<T, ApiError> {
    let builder = gloo_net::http::Request::post(&config.api_url(path));
    let resp = with_token(builder, token)
        .json(body)
        .map_err(|e| ApiError::Decode(e.to_string()))?
        .send()
        .await
        .map_err(|e| ApiError::Network(e.to_string()))?;
    read_json(resp).await
}

/// Sign in with email and password via `POST /api/auth/login`.
///
/// # Errors
///
/// Returns an [`ApiError`] if the request fails or credentials are rejected.
pub async fn login(config: &ClientConfig, email: &str, password: &str) -> Result<TokenBundle, ApiError> {
    #[cfg(feature = "hydrate")]
    {
        post_json(config, "/api/auth/login", None, &LoginRequest { email, password }).await
    }
    #[cfg(not(feature = "hydrate"))]
    {
        let _ = (config, email, password);
        Err(ApiError::Unavailable)
    }
}

/// Create an account via `POST /api/auth/register`.
///
/// # Errors
///
/// Returns an [`ApiError`] if the request fails or the backend refuses it.
pub async fn register(config: &ClientConfig, username: &str, email: &str, password: &str) -> Result<TokenBundle, ApiError> {
    #[cfg(feature = "hydrate")]
    {
        let body = RegisterRequest { username, email, password };
        post_json(config, "/api/auth/register", None, &body).await
    }
    #[cfg(not(feature = "hydrate"))]
    {
        let _ = (config, username, email, password);
        Err(ApiError::Unavailable)
    }
}

/// Validate `token` and fetch its user from `GET /api/auth/me`.
///
/// # Errors
///
/// Returns an [`ApiError`] if the token is invalid or the request fails.
pub async fn fetch_current_user(config: &ClientConfig, token: &str) -> Result<User, ApiError> {
    #[cfg(feature = "hydrate")]
    {
        get_json(config, "/api/auth/me", token).await
    }
    #[cfg(not(feature = "hydrate"))]
    {
        let _ = (config, token);
        Err(ApiError::Unavailable)
    }
}

/// Tell the backend the session is over via `POST /api/auth/logout`.
/// Best-effort: local sign-out proceeds regardless.
pub async fn logout(config: &ClientConfig, token: &str) {
    #[cfg(feature = "hydrate")]
    {
        let builder = gloo_net::http::Request::post(&config.api_url("/api/auth/logout"));
        let _ = with_token(builder, Some(token)).send().await;
    }
    #[cfg(not(feature = "hydrate"))]
    {
        let _ = (config, token);
    }
}

/// List the caller's projects via `GET /api/projects`.
///
/// # Errors
///
/// Returns an [`ApiError`] if the request fails.
pub async fn list_projects(config: &ClientConfig, token: &str) -> Result<Vec<Project>, ApiError> {
    #[cfg(feature = "hydrate")]
    {
        get_json(config, "/api/projects", token).await
    }
    #[cfg(not(feature = "hydrate"))]
    {
        let _ = (config, token);
        Err(ApiError::Unavailable)
    }
}

/// Create a project via `POST /api/projects`.
///
/// # Errors
///
/// Returns an [`ApiError`] if the request fails or the backend refuses it.
pub async fn create_project(config: &ClientConfig, token: &str, name: &str, description: &str) -> Result<Project, ApiError> {
    #[cfg(feature = "hydrate")]
    {
        let body = CreateProjectRequest { name, description };
        post_json(config, "/api/projects", Some(token), &body).await
    }
    #[cfg(not(feature = "hydrate"))]
    {
        let _ = (config, token, name, description);
        Err(ApiError::Unavailable)
    }
}

/// Fetch one project via `GET /api/projects/{id}`.
///
/// # Errors
///
/// Returns an [`ApiError`] if the request fails or the project is missing.
pub async fn fetch_project(config: &ClientConfig, token: &str, project_id: &str) -> Result<Project, ApiError> {
    #[cfg(feature = "hydrate")]
    {
        get_json(config, &project_endpoint(project_id), token).await
    }
    #[cfg(not(feature = "hydrate"))]
    {
        let _ = (config, token, project_endpoint(project_id));
        Err(ApiError::Unavailable)
    }
}

/// Fetch a project's message history via `GET /api/projects/{id}/messages`.
///
/// # Errors
///
/// Returns an [`ApiError`] if the request fails.
pub async fn list_messages(config: &ClientConfig, token: &str, project_id: &str) -> Result<Vec<ChatMessage>, ApiError> {
    #[cfg(feature = "hydrate")]
    {
        get_json(config, &project_messages_endpoint(project_id), token).await
    }
    #[cfg(not(feature = "hydrate"))]
    {
        let _ = (config, token, project_messages_endpoint(project_id));
        Err(ApiError::Unavailable)
    }
}

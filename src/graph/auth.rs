//! OAuth2 client-credentials token acquisition

use log::debug;
use reqwest::Client;
use serde::Deserialize;

use crate::config::api;
use crate::error::{AgentError, Phase, Result};

/// Tenant and application identity used for the token exchange
#[derive(Debug, Clone)]
pub struct AppCredentials {
    pub tenant_id: String,
    pub app_id: String,
    pub app_secret: String,
}

/// Token endpoint response; only the access token is consumed
#[derive(Deserialize, Debug)]
struct TokenResponse {
    access_token: String,
}

/// Exchange the application credentials for a bearer token.
///
/// Single attempt, no retry: a failure here is fatal to the whole run.
pub async fn acquire_token(
    http: &Client,
    login_url: &str,
    creds: &AppCredentials,
) -> Result<String> {
    let url = format!(
        "{}/{}/oauth2/v2.0/token",
        login_url.trim_end_matches('/'),
        creds.tenant_id
    );
    debug!("Requesting bearer token from {}", url);

    let form = [
        ("client_id", creds.app_id.as_str()),
        ("client_secret", creds.app_secret.as_str()),
        ("grant_type", "client_credentials"),
        ("scope", api::TOKEN_SCOPE),
    ];

    let response = http
        .post(&url)
        .form(&form)
        .send()
        .await
        .map_err(|e| AgentError::from_reqwest(e, Phase::Token))?;

    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(AgentError::Request {
            phase: Phase::Token,
            status: Some(status.as_u16()),
            message: token_error_message(status.as_u16(), &body),
        });
    }

    let body = response
        .text()
        .await
        .map_err(|e| AgentError::from_reqwest(e, Phase::Token))?;
    let token: TokenResponse = serde_json::from_str(&body).map_err(|e| AgentError::Shape {
        phase: Phase::Token,
        message: format!("token response lacks access_token: {}", e),
    })?;

    debug!("Bearer token acquired");
    Ok(token.access_token)
}

/// Token endpoint failures get status-specific wording so an operator can
/// tell a wrong tenant/app id from a wrong secret without reading API docs.
/// The exit code stays the token-phase code regardless of status.
fn token_error_message(status: u16, body: &str) -> String {
    let hint = match status {
        400 => "Bad request, check the tenant ID and app ID",
        401 => "Unauthorized, check the client secret",
        429 => "Too many requests, the token endpoint throttled the agent",
        _ => "Token request failed",
    };
    if body.is_empty() {
        hint.to_string()
    } else {
        format!("{}: {}", hint, body)
    }
}

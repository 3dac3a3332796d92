//! One-shot installed-app OAuth consent flow with token caching.
//!
//! `credentials.json` holds the client id/secret downloaded from the
//! Cloud Console. The first authorization prints a consent URL, waits
//! for the pasted code, exchanges it, and caches the token in
//! `token.json` for reuse. Expired access tokens are refreshed with the
//! cached refresh token when one is present.

use std::fs;

use chrono::{DateTime, Duration, Utc};
use reqwest::{Client, Url};
use serde::{Deserialize, Serialize};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, info};

use crate::config::CalendarConfig;
use crate::error::{CalendarError, CalendarResult};

const CALENDAR_SCOPE: &str = "https://www.googleapis.com/auth/calendar";

/// Expiry slack so a token is never used in its final seconds.
const EXPIRY_SLACK_SECS: i64 = 60;

/// OAuth client credentials (the `installed` section of credentials.json)
#[derive(Debug, Clone, Deserialize)]
pub struct InstalledCredentials {
    pub client_id: String,
    pub client_secret: String,
    pub redirect_uris: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct CredentialsFile {
    installed: InstalledCredentials,
}

/// Cached token persisted to token.json
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredToken {
    pub access_token: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    refresh_token: Option<String>,
    #[serde(default)]
    expires_in: Option<i64>,
}

impl StoredToken {
    fn from_response(response: TokenResponse, previous_refresh: Option<String>) -> Self {
        Self {
            access_token: response.access_token,
            refresh_token: response.refresh_token.or(previous_refresh),
            expires_at: response
                .expires_in
                .map(|secs| Utc::now() + Duration::seconds(secs)),
        }
    }

    fn is_fresh(&self) -> bool {
        match self.expires_at {
            Some(expires_at) => expires_at - Duration::seconds(EXPIRY_SLACK_SECS) > Utc::now(),
            // No recorded expiry: trust the cached token, matching the
            // original token.json reuse behavior.
            None => true,
        }
    }
}

/// Obtain an authorized access token, reusing or refreshing the cache.
pub async fn authorize(http: &Client, config: &CalendarConfig) -> CalendarResult<String> {
    let credentials = read_credentials(config)?;

    if let Some(cached) = read_cached_token(config) {
        if cached.is_fresh() {
            debug!("Reusing cached calendar token");
            return Ok(cached.access_token);
        }
        if let Some(refresh_token) = cached.refresh_token.clone() {
            debug!("Cached calendar token expired, refreshing");
            let token = refresh(http, config, &credentials, &refresh_token).await?;
            write_cached_token(config, &token)?;
            return Ok(token.access_token);
        }
    }

    let token = consent_flow(http, config, &credentials).await?;
    write_cached_token(config, &token)?;
    Ok(token.access_token)
}

fn read_credentials(config: &CalendarConfig) -> CalendarResult<InstalledCredentials> {
    let raw = fs::read_to_string(&config.credentials_path).map_err(|e| {
        CalendarError::Credentials {
            message: format!(
                "cannot read {}: {}",
                config.credentials_path.display(),
                e
            ),
        }
    })?;
    let file: CredentialsFile =
        serde_json::from_str(&raw).map_err(|e| CalendarError::Credentials {
            message: format!("malformed credentials file: {}", e),
        })?;
    if file.installed.redirect_uris.is_empty() {
        return Err(CalendarError::Credentials {
            message: "credentials file declares no redirect URIs".to_string(),
        });
    }
    Ok(file.installed)
}

fn read_cached_token(config: &CalendarConfig) -> Option<StoredToken> {
    let raw = fs::read_to_string(&config.token_path).ok()?;
    serde_json::from_str(&raw).ok()
}

fn write_cached_token(config: &CalendarConfig, token: &StoredToken) -> CalendarResult<()> {
    let json = serde_json::to_string(token).map_err(|e| CalendarError::TokenExchange {
        message: format!("cannot serialize token: {}", e),
    })?;
    fs::write(&config.token_path, json).map_err(|e| CalendarError::TokenExchange {
        message: format!("cannot persist token to {}: {}", config.token_path.display(), e),
    })?;
    info!(path = %config.token_path.display(), "Calendar token saved");
    Ok(())
}

/// Build the browser consent URL for the calendar scope.
pub fn consent_url(
    config: &CalendarConfig,
    credentials: &InstalledCredentials,
) -> CalendarResult<Url> {
    let base = format!("{}/o/oauth2/v2/auth", config.auth_base_url.trim_end_matches('/'));
    Url::parse_with_params(
        &base,
        &[
            ("client_id", credentials.client_id.as_str()),
            ("redirect_uri", credentials.redirect_uris[0].as_str()),
            ("response_type", "code"),
            ("scope", CALENDAR_SCOPE),
            ("access_type", "offline"),
        ],
    )
    .map_err(|e| CalendarError::Credentials {
        message: format!("cannot build consent URL: {}", e),
    })
}

async fn consent_flow(
    http: &Client,
    config: &CalendarConfig,
    credentials: &InstalledCredentials,
) -> CalendarResult<StoredToken> {
    let url = consent_url(config, credentials)?;
    println!("このURLを開いて認証してください: {}", url);
    print!("認証コードを貼り付けてください: ");
    use std::io::Write;
    let _ = std::io::stdout().flush();

    let mut code = String::new();
    let mut reader = BufReader::new(tokio::io::stdin());
    reader
        .read_line(&mut code)
        .await
        .map_err(|e| CalendarError::TokenExchange {
            message: format!("cannot read authorization code: {}", e),
        })?;
    let code = code.trim();
    if code.is_empty() {
        return Err(CalendarError::TokenExchange {
            message: "empty authorization code".to_string(),
        });
    }

    exchange_code(http, config, credentials, code).await
}

async fn exchange_code(
    http: &Client,
    config: &CalendarConfig,
    credentials: &InstalledCredentials,
    code: &str,
) -> CalendarResult<StoredToken> {
    let response = http
        .post(&config.token_url)
        .form(&[
            ("code", code),
            ("client_id", credentials.client_id.as_str()),
            ("client_secret", credentials.client_secret.as_str()),
            ("redirect_uri", credentials.redirect_uris[0].as_str()),
            ("grant_type", "authorization_code"),
        ])
        .send()
        .await
        .map_err(CalendarError::Http)?;

    parse_token_response(response, None).await
}

async fn refresh(
    http: &Client,
    config: &CalendarConfig,
    credentials: &InstalledCredentials,
    refresh_token: &str,
) -> CalendarResult<StoredToken> {
    let response = http
        .post(&config.token_url)
        .form(&[
            ("refresh_token", refresh_token),
            ("client_id", credentials.client_id.as_str()),
            ("client_secret", credentials.client_secret.as_str()),
            ("grant_type", "refresh_token"),
        ])
        .send()
        .await
        .map_err(CalendarError::Http)?;

    parse_token_response(response, Some(refresh_token.to_string())).await
}

async fn parse_token_response(
    response: reqwest::Response,
    previous_refresh: Option<String>,
) -> CalendarResult<StoredToken> {
    let status = response.status();
    if !status.is_success() {
        let error_body = response.text().await.unwrap_or_default();
        return Err(CalendarError::TokenExchange {
            message: format!("{} - {}", status.as_u16(), error_body),
        });
    }

    let token: TokenResponse =
        response
            .json()
            .await
            .map_err(|e| CalendarError::InvalidResponse {
                message: format!("malformed token response: {}", e),
            })?;

    Ok(StoredToken::from_response(token, previous_refresh))
}

//! Calendar credentials.
//!
//! The scheduler asks a [`CredentialProvider`] for a [`CalendarSession`] and
//! treats any failure as [`AgendaError::CalendarAuthFailure`]. Running the
//! interactive consent flow is left to other tooling; [`TokenFileProvider`]
//! reads a token.json in the format written by google-auth, refreshes it when
//! expired and persists the refreshed token.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use crate::{AgendaError, Result};

/// OAuth scope needed to create events.
pub const CALENDAR_SCOPE: &str = "https://www.googleapis.com/auth/calendar.events";

/// Full calendar access, which also covers event creation.
const CALENDAR_FULL_SCOPE: &str = "https://www.googleapis.com/auth/calendar";

/// A valid calendar access token.
#[derive(Clone)]
pub struct CalendarSession {
    access_token: String,
}

impl CalendarSession {
    pub fn new(access_token: impl Into<String>) -> Self {
        Self { access_token: access_token.into() }
    }

    pub fn access_token(&self) -> &str {
        &self.access_token
    }
}

impl std::fmt::Debug for CalendarSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CalendarSession").field("access_token", &"<redacted>").finish()
    }
}

/// Capability: get a valid calendar session or fail with an auth error.
#[async_trait]
pub trait CredentialProvider: Send + Sync {
    async fn session(&self) -> Result<CalendarSession>;
}

/// Provider handing out a fixed access token.
#[derive(Debug, Clone)]
pub struct StaticToken(pub String);

#[async_trait]
impl CredentialProvider for StaticToken {
    async fn session(&self) -> Result<CalendarSession> {
        if self.0.is_empty() {
            return Err(AgendaError::CalendarAuthFailure("empty access token".to_string()));
        }
        Ok(CalendarSession::new(self.0.clone()))
    }
}

/// OAuth token as persisted in token.json.
///
/// Field names match google-auth's `Credentials.to_json()`; `access_token`
/// is accepted as an alias of `token`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredToken {
    #[serde(alias = "access_token")]
    pub token: String,
    pub refresh_token: Option<String>,
    #[serde(default = "default_token_uri")]
    pub token_uri: String,
    pub client_id: String,
    #[serde(default)]
    pub client_secret: Option<String>,
    #[serde(default)]
    pub scopes: Vec<String>,
    #[serde(default)]
    pub expiry: Option<String>,
}

fn default_token_uri() -> String {
    "https://oauth2.googleapis.com/token".to_string()
}

impl StoredToken {
    /// True when the token was granted a scope that allows creating events.
    ///
    /// Tokens written without a scope list are trusted.
    pub fn grants_calendar(&self) -> bool {
        self.scopes.is_empty() || self.scopes.iter().any(|s| s == CALENDAR_SCOPE || s == CALENDAR_FULL_SCOPE)
    }

    /// True when the token expires within a minute of `now` or has no parsable expiry.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        let Some(expiry) = self.expiry.as_deref() else {
            return true;
        };
        match parse_expiry(expiry) {
            Some(expiry) => expiry <= now + Duration::seconds(60),
            None => true,
        }
    }
}

/// google-auth writes expiry without an offset ("2026-02-08T12:00:00.000000").
fn parse_expiry(expiry: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(expiry)
        .map(|dt| dt.with_timezone(&Utc))
        .or_else(|_| chrono::NaiveDateTime::parse_from_str(expiry, "%Y-%m-%dT%H:%M:%S%.f").map(|dt| dt.and_utc()))
        .ok()
}

/// Default token location: `<data dir>/agenda/token.json`.
pub fn default_token_path() -> PathBuf {
    dirs::data_dir().unwrap_or_default().join("agenda").join("token.json")
}

/// [`CredentialProvider`] backed by a token.json file.
pub struct TokenFileProvider {
    path: PathBuf,
    http: reqwest::Client,
    refresh_lock: Mutex<()>,
}

impl TokenFileProvider {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into(), http: reqwest::Client::new(), refresh_lock: Mutex::new(()) }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads the token file.
    ///
    /// A file that exists but cannot be parsed is deleted so the next
    /// authorization starts clean.
    pub fn load(&self) -> Result<StoredToken> {
        if !self.path.exists() {
            return Err(AgendaError::TokenNotFound(self.path.clone()));
        }
        tracing::debug!(path = %self.path.display(), "loading existing token");
        let content = std::fs::read_to_string(&self.path)?;
        match serde_json::from_str::<StoredToken>(&content) {
            Ok(token) => Ok(token),
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "invalid token file, deleting it");
                std::fs::remove_file(&self.path)?;
                Err(AgendaError::Json(e))
            }
        }
    }

    /// Writes the token file, creating parent directories.
    pub fn save(&self, token: &StoredToken) -> Result<()> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.path, serde_json::to_string_pretty(token)?)?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(&self.path, std::fs::Permissions::from_mode(0o600))?;
        }
        Ok(())
    }

    async fn refresh(&self, token: &StoredToken) -> Result<StoredToken> {
        let refresh_token = token
            .refresh_token
            .as_deref()
            .ok_or_else(|| AgendaError::CalendarAuthFailure("token expired and has no refresh_token".to_string()))?;

        let mut form = vec![
            ("client_id", token.client_id.as_str()),
            ("refresh_token", refresh_token),
            ("grant_type", "refresh_token"),
        ];
        if let Some(secret) = token.client_secret.as_deref() {
            form.push(("client_secret", secret));
        }

        let resp = self.http.post(&token.token_uri).form(&form).send().await?;
        let status = resp.status();
        let body = resp.text().await.unwrap_or_default();
        if !status.is_success() {
            return Err(AgendaError::CalendarAuthFailure(format!("token refresh failed ({status}): {body}")));
        }

        let body: serde_json::Value = serde_json::from_str(&body)?;
        let access_token = body["access_token"]
            .as_str()
            .ok_or_else(|| AgendaError::CalendarAuthFailure("no access_token in refresh response".to_string()))?;
        let expires_in = body["expires_in"].as_i64().unwrap_or(3600);

        let mut refreshed = token.clone();
        refreshed.token = access_token.to_string();
        refreshed.expiry = Some((Utc::now() + Duration::seconds(expires_in)).to_rfc3339());
        Ok(refreshed)
    }

    async fn valid_token(&self) -> Result<StoredToken> {
        let _guard = self.refresh_lock.lock().await;

        let token = self.load()?;
        if !token.grants_calendar() {
            return Err(AgendaError::CalendarAuthFailure(format!(
                "token at {} lacks the {CALENDAR_SCOPE} scope (granted: {})",
                self.path.display(),
                token.scopes.join(", ")
            )));
        }
        if !token.is_expired_at(Utc::now()) {
            return Ok(token);
        }

        tracing::info!("refreshing expired token");
        let refreshed = self.refresh(&token).await?;
        self.save(&refreshed)?;
        tracing::info!("token refreshed successfully");
        Ok(refreshed)
    }
}

#[async_trait]
impl CredentialProvider for TokenFileProvider {
    async fn session(&self) -> Result<CalendarSession> {
        match self.valid_token().await {
            Ok(token) => Ok(CalendarSession::new(token.token)),
            Err(err @ AgendaError::CalendarAuthFailure(_)) => Err(err),
            Err(AgendaError::TokenNotFound(path)) => Err(AgendaError::CalendarAuthFailure(format!(
                "no token at {}; authorize calendar access first",
                path.display()
            ))),
            Err(other) => Err(AgendaError::CalendarAuthFailure(other.to_string())),
        }
    }
}

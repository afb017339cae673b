//! Credential resolution and token selection.
//!
//! # Security
//! - Credentials are fetched and decrypted on every call, never cached
//! - Tokens are never logged; `Debug` output redacts them
//! - A corrupt record is treated exactly like a missing one

use std::fmt;
use std::sync::Arc;

use serde::Deserialize;

use crate::credentials::store::{CredentialError, CredentialStore, Decryptor};
use crate::error::OperationError;
use crate::observability::metrics;

/// Organisation identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct OrgId(pub String);

impl From<&str> for OrgId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for OrgId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl fmt::Display for OrgId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Which stored token authenticated a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    UserLogin,
    PageLevel,
}

/// Decrypted payload as written by the OAuth flow.
#[derive(Deserialize)]
struct StoredCredentials {
    #[serde(alias = "access_token", alias = "accessToken")]
    user_access_token: Option<String>,
    #[serde(alias = "pageAccessToken")]
    page_access_token: Option<String>,
    #[serde(
        alias = "instagram_account_id",
        alias = "instagramAccountId",
        alias = "ig_user_id"
    )]
    account_id: Option<String>,
}

/// A usable credential record: an account id and at least one token.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    user_token: Option<String>,
    page_token: Option<String>,
    account_id: String,
}

impl Credentials {
    /// Build a record, returning `None` unless it is usable.
    pub fn new(
        user_token: Option<String>,
        page_token: Option<String>,
        account_id: Option<String>,
    ) -> Option<Self> {
        let non_empty = |v: Option<String>| v.filter(|s| !s.trim().is_empty());
        let user_token = non_empty(user_token);
        let page_token = non_empty(page_token);
        let account_id = non_empty(account_id)?;
        if user_token.is_none() && page_token.is_none() {
            return None;
        }
        Some(Self {
            user_token,
            page_token,
            account_id,
        })
    }

    /// Decode a decrypted JSON payload.
    pub fn from_plaintext(plaintext: &str) -> Result<Option<Self>, CredentialError> {
        let stored: StoredCredentials = serde_json::from_str(plaintext)?;
        Ok(Self::new(
            stored.user_access_token,
            stored.page_access_token,
            stored.account_id,
        ))
    }

    pub fn account_id(&self) -> &str {
        &self.account_id
    }

    /// The user-login token wins over the page-level token.
    pub fn select_token(&self) -> Option<(&str, TokenKind)> {
        self.user_token
            .as_deref()
            .map(|t| (t, TokenKind::UserLogin))
            .or_else(|| self.page_token.as_deref().map(|t| (t, TokenKind::PageLevel)))
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("user_token", &self.user_token.as_ref().map(|_| "<redacted>"))
            .field("page_token", &self.page_token.as_ref().map(|_| "<redacted>"))
            .field("account_id", &self.account_id)
            .finish()
    }
}

/// What an operation needs to authenticate one upstream call.
#[derive(Clone)]
pub struct AuthContext {
    pub token: String,
    pub token_kind: TokenKind,
    pub account_id: String,
}

impl fmt::Debug for AuthContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthContext")
            .field("token", &"<redacted>")
            .field("token_kind", &self.token_kind)
            .field("account_id", &self.account_id)
            .finish()
    }
}

/// Loads and decrypts an organisation's platform credentials.
#[derive(Clone)]
pub struct CredentialResolver {
    store: Arc<dyn CredentialStore>,
    decryptor: Arc<dyn Decryptor>,
    provider: String,
}

impl CredentialResolver {
    pub fn new(
        store: Arc<dyn CredentialStore>,
        decryptor: Arc<dyn Decryptor>,
        provider: impl Into<String>,
    ) -> Self {
        Self {
            store,
            decryptor,
            provider: provider.into(),
        }
    }

    pub fn provider(&self) -> &str {
        &self.provider
    }

    /// Return the decrypted credential record, or `None` if absent or unusable.
    pub async fn resolve(&self, org_id: &OrgId) -> Option<Credentials> {
        let blob = match self.store.get(&org_id.0, &self.provider).await {
            Ok(Some(blob)) => blob,
            Ok(None) => {
                tracing::debug!(org_id = %org_id, provider = %self.provider, "No stored credentials");
                metrics::record_credentials_unavailable("missing");
                return None;
            }
            Err(e) => {
                tracing::warn!(org_id = %org_id, provider = %self.provider, error = %e, "Credential store lookup failed");
                metrics::record_credentials_unavailable("store_error");
                return None;
            }
        };

        let plaintext = match self.decryptor.decrypt(&blob) {
            Ok(plaintext) => plaintext,
            Err(e) => {
                tracing::error!(org_id = %org_id, error = %e, "Failed to decrypt stored credentials");
                metrics::record_credentials_unavailable("decrypt_error");
                return None;
            }
        };

        match Credentials::from_plaintext(&plaintext) {
            Ok(Some(credentials)) => Some(credentials),
            Ok(None) => {
                tracing::warn!(org_id = %org_id, "Stored credentials lack a token or account id");
                metrics::record_credentials_unavailable("incomplete");
                None
            }
            Err(e) => {
                tracing::error!(org_id = %org_id, error = %e, "Failed to parse stored credentials");
                metrics::record_credentials_unavailable("parse_error");
                None
            }
        }
    }

    /// Resolve and select a token, failing with `NoCredentials` if either step comes up empty.
    pub async fn require(&self, org_id: &OrgId) -> Result<AuthContext, OperationError> {
        let credentials = self
            .resolve(org_id)
            .await
            .ok_or(OperationError::NoCredentials)?;
        let (token, token_kind) = credentials
            .select_token()
            .ok_or(OperationError::NoCredentials)?;

        tracing::debug!(org_id = %org_id, token_kind = ?token_kind, "Resolved credentials");

        Ok(AuthContext {
            token: token.to_string(),
            token_kind,
            account_id: credentials.account_id().to_string(),
        })
    }
}

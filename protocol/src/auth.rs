//! Firebase anonymous authentication over REST.

use serde::{Deserialize, Serialize};

use crate::DecodeError;

pub const IDENTITY_TOOLKIT_BASE: &str = "https://identitytoolkit.googleapis.com/v1";
pub const SECURE_TOKEN_BASE: &str = "https://securetoken.googleapis.com/v1";

/// Tokens are treated as expired this long before the server says so.
pub const EXPIRY_MARGIN_MS: i64 = 60_000;

pub fn sign_up_url(api_key: &str) -> String {
    format!("{IDENTITY_TOOLKIT_BASE}/accounts:signUp?key={api_key}")
}

pub fn refresh_url(api_key: &str) -> String {
    format!("{SECURE_TOKEN_BASE}/token?key={api_key}")
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SignUpRequest {
    pub return_secure_token: bool,
}

impl Default for SignUpRequest {
    fn default() -> Self {
        Self {
            return_secure_token: true,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignUpResponse {
    pub id_token: String,
    pub refresh_token: String,
    pub expires_in: String,
    pub local_id: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct RefreshResponse {
    pub id_token: String,
    pub refresh_token: String,
    pub expires_in: String,
    pub user_id: String,
}

/// Anonymous player identity. `uid` is stable across token refreshes and keys the leaderboard entry.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub uid: String,
    pub id_token: String,
    pub refresh_token: String,
    /// Unix time in milliseconds.
    pub expires_at_ms: i64,
}

impl Identity {
    pub fn from_sign_up(response: SignUpResponse, now_ms: i64) -> Result<Self, DecodeError> {
        Ok(Self {
            expires_at_ms: expires_at(&response.expires_in, now_ms)?,
            uid: response.local_id,
            id_token: response.id_token,
            refresh_token: response.refresh_token,
        })
    }

    pub fn from_refresh(response: RefreshResponse, now_ms: i64) -> Result<Self, DecodeError> {
        Ok(Self {
            expires_at_ms: expires_at(&response.expires_in, now_ms)?,
            uid: response.user_id,
            id_token: response.id_token,
            refresh_token: response.refresh_token,
        })
    }

    /// Whether the id token can still be used at `now_ms`.
    pub fn is_fresh(&self, now_ms: i64) -> bool {
        now_ms + EXPIRY_MARGIN_MS < self.expires_at_ms
    }
}

fn expires_at(expires_in: &str, now_ms: i64) -> Result<i64, DecodeError> {
    let secs: i64 = expires_in
        .trim()
        .parse()
        .map_err(|_| DecodeError::WrongType("expiresIn"))?;
    Ok(now_ms.saturating_add(secs.saturating_mul(1000)))
}

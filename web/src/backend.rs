use gloo::net::http::{Request, RequestBuilder, Response};
use thiserror::Error;
use web_sys::UrlSearchParams;
use whacabol_protocol::auth::{self, Identity, RefreshResponse, SignUpRequest, SignUpResponse};
use whacabol_protocol::firestore::{self, DatabasePaths, Document, ErrorResponse, RunQueryItem, RunQueryRequest};
use whacabol_protocol::{DecodeError, LeaderboardEntry, ScoreStore};

use crate::utils::*;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub(crate) enum ConfigError {
    #[error("{0} was not set at build time")]
    Missing(&'static str),
}

#[derive(Error, Debug)]
pub(crate) enum BackendError {
    #[error("backend unavailable: {0}")]
    Config(#[from] ConfigError),
    #[error("request failed: {0}")]
    Http(#[from] gloo::net::Error),
    #[error("server answered {status}: {message}")]
    Status { status: u16, message: String },
    #[error("unexpected response: {0}")]
    Decode(#[from] DecodeError),
    #[error("not signed in")]
    NotSignedIn,
    #[error("browser error: {0}")]
    Browser(String),
}

impl BackendError {
    /// Whether the token endpoint refused the refresh token itself, as opposed to the request failing.
    ///
    /// Only then is the stored identity unusable; anything else keeps it for a later attempt.
    fn rejects_refresh(&self) -> bool {
        const REJECTIONS: [&str; 4] = [
            "INVALID_REFRESH_TOKEN",
            "TOKEN_EXPIRED",
            "USER_NOT_FOUND",
            "USER_DISABLED",
        ];
        match self {
            Self::Status { status: 400, message } => {
                let code = message.split([' ', ':']).next().unwrap_or_default();
                REJECTIONS.contains(&code)
            }
            _ => false,
        }
    }
}

/// Firebase project credentials, baked in at build time like any other static asset.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct BackendConfig {
    pub api_key: String,
    pub project_id: String,
}

impl BackendConfig {
    pub(crate) fn from_build_env() -> Result<Self, ConfigError> {
        Self::from_values(
            option_env!("WHACABOL_FIREBASE_API_KEY"),
            option_env!("WHACABOL_FIREBASE_PROJECT_ID"),
        )
    }

    fn from_values(api_key: Option<&str>, project_id: Option<&str>) -> Result<Self, ConfigError> {
        let required = |value: Option<&str>, name| match value.map(str::trim) {
            Some(value) if !value.is_empty() => Ok(value.to_string()),
            _ => Err(ConfigError::Missing(name)),
        };
        Ok(Self {
            api_key: required(api_key, "WHACABOL_FIREBASE_API_KEY")?,
            project_id: required(project_id, "WHACABOL_FIREBASE_PROJECT_ID")?,
        })
    }
}

impl StorageKey for Identity {
    const KEY: &'static str = "whacabol:identity:v1";
}

/// What to do with the identity found in storage at startup.
#[derive(Clone, Debug, PartialEq, Eq)]
enum IdentityPlan {
    Reuse(Identity),
    Refresh(Identity),
    SignIn,
}

fn plan_identity(stored: Option<Identity>, now_ms: i64) -> IdentityPlan {
    match stored {
        Some(identity) if identity.is_fresh(now_ms) => IdentityPlan::Reuse(identity),
        Some(identity) => IdentityPlan::Refresh(identity),
        None => IdentityPlan::SignIn,
    }
}

/// Stateless REST client for the Firebase project.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct Backend {
    config: BackendConfig,
    paths: DatabasePaths,
}

impl Backend {
    pub(crate) fn new(config: BackendConfig) -> Self {
        let paths = DatabasePaths::new(&config.project_id);
        Self { config, paths }
    }

    /// Reuses `stored` while its token is valid and refreshes it when expired. Signs in anonymously only when
    /// there is no stored identity or the server rejected its refresh token; other failures are returned and
    /// the stored identity is kept.
    pub(crate) async fn acquire_identity(
        &self,
        stored: Option<Identity>,
    ) -> Result<Identity, BackendError> {
        match plan_identity(stored, utc_now().timestamp_millis()) {
            IdentityPlan::Reuse(identity) => Ok(identity),
            IdentityPlan::Refresh(identity) => match self.refresh(&identity).await {
                Err(err) if err.rejects_refresh() => {
                    log::warn!("refresh token for {} rejected: {}", identity.uid, err);
                    local_delete::<Identity>();
                    self.sign_in_anonymously().await
                }
                result => result,
            },
            IdentityPlan::SignIn => self.sign_in_anonymously().await,
        }
    }

    /// Same identity with a usable token, refreshing it if needed. Never switches to a new uid.
    pub(crate) async fn ensure_fresh(&self, identity: Identity) -> Result<Identity, BackendError> {
        if identity.is_fresh(utc_now().timestamp_millis()) {
            return Ok(identity);
        }
        self.refresh(&identity).await
    }

    async fn sign_in_anonymously(&self) -> Result<Identity, BackendError> {
        log::debug!("signing in anonymously");
        let response = Request::post(&auth::sign_up_url(&self.config.api_key))
            .json(&SignUpRequest::default())?
            .send()
            .await?;
        let body: SignUpResponse = check(response).await?.json().await?;
        Ok(Identity::from_sign_up(body, utc_now().timestamp_millis())?)
    }

    async fn refresh(&self, identity: &Identity) -> Result<Identity, BackendError> {
        log::debug!("refreshing token for {}", identity.uid);
        let form = refresh_form(&identity.refresh_token)?;
        let response = Request::post(&auth::refresh_url(&self.config.api_key))
            .body(form)?
            .send()
            .await?;
        let body: RefreshResponse = check(response).await?.json().await?;
        Ok(Identity::from_refresh(body, utc_now().timestamp_millis())?)
    }

    /// Store view acting as `identity`, or unauthenticated reads when there is none.
    pub(crate) fn store(&self, identity: Option<&Identity>) -> FirestoreStore {
        FirestoreStore {
            backend: self.clone(),
            id_token: identity.map(|identity| identity.id_token.clone()),
        }
    }
}

/// `grant_type=refresh_token` form body; the browser sets the urlencoded content type.
fn refresh_form(refresh_token: &str) -> Result<UrlSearchParams, BackendError> {
    let form = UrlSearchParams::new().map_err(|err| BackendError::Browser(format!("{err:?}")))?;
    form.append("grant_type", "refresh_token");
    form.append("refresh_token", refresh_token);
    Ok(form)
}

/// Turns a non-2xx response into [`BackendError::Status`], preferring the server's own message.
async fn check(response: Response) -> Result<Response, BackendError> {
    if response.ok() {
        return Ok(response);
    }

    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ErrorResponse>(&body)
        .map(|body| body.error.message)
        .unwrap_or(body);
    Err(BackendError::Status { status, message })
}

pub(crate) struct FirestoreStore {
    backend: Backend,
    id_token: Option<String>,
}

impl FirestoreStore {
    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.id_token {
            Some(token) => request.header("Authorization", &format!("Bearer {token}")),
            None => request,
        }
    }
}

impl ScoreStore for FirestoreStore {
    type Error = BackendError;

    async fn fetch(&self, uid: &str) -> Result<Option<LeaderboardEntry>, Self::Error> {
        let url = self.backend.paths.leaderboard_entry(uid);
        let response = self.authorize(Request::get(&url)).send().await?;
        if response.status() == 404 {
            return Ok(None);
        }
        let document: Document = check(response).await?.json().await?;
        Ok(Some(LeaderboardEntry::try_from(&document)?))
    }

    async fn store(&self, entry: &LeaderboardEntry) -> Result<(), Self::Error> {
        if self.id_token.is_none() {
            return Err(BackendError::NotSignedIn);
        }
        let url = self.backend.paths.leaderboard_entry(&entry.uid);
        let response = self
            .authorize(Request::patch(&url))
            .json(&Document::from(entry))?
            .send()
            .await?;
        check(response).await?;
        Ok(())
    }

    async fn top(&self, limit: u32) -> Result<Vec<LeaderboardEntry>, Self::Error> {
        let url = self.backend.paths.run_query();
        let response = self
            .authorize(Request::post(&url))
            .json(&RunQueryRequest::top_scores(limit))?
            .send()
            .await?;
        let items: Vec<RunQueryItem> = check(response).await?.json().await?;
        let mut entries = firestore::decode_query(&items)?;
        whacabol_protocol::rank(&mut entries);
        Ok(entries)
    }
}


#[cfg(all(test, target_arch = "wasm32"))]
mod browser_tests {
    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    fn refresh_form_encodes_token() {
        let form = refresh_form("a+b/c==é").unwrap();
        assert_eq!(
            String::from(form.to_string()),
            "grant_type=refresh_token&refresh_token=a%2Bb%2Fc%3D%3D%C3%A9"
        );
    }
}

// src/auth.rs
use chrono::{DateTime, Utc};
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::Deserialize;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use crate::app_log;
use crate::core::RemoteStore;
use crate::error::{SyncError, SyncResult};
use crate::types::User;

/// Bearer token proving the recruiter's identity.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

#[derive(Debug, Deserialize)]
struct TokenClaims {
    exp: Option<i64>,
}

impl Credential {
    pub fn new(token: &str) -> SyncResult<Self> {
        let token = token.trim();
        let token = token.strip_prefix("Bearer ").unwrap_or(token).trim();
        if token.is_empty() {
            return Err(SyncError::InvalidRequest("empty session token".to_string()));
        }
        Ok(Self(token.to_string()))
    }

    pub fn token(&self) -> &str {
        &self.0
    }

    /// Expiry from the JWT `exp` claim. The signature is not checked here;
    /// the store remains the authority. Opaque tokens yield `None`.
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        let mut validation = Validation::new(Algorithm::HS256);
        #[allow(deprecated)]
        validation.insecure_disable_signature_validation();
        validation.validate_exp = false;
        validation.validate_aud = false;
        validation.required_spec_claims.clear();

        let data = decode::<TokenClaims>(&self.0, &DecodingKey::from_secret(b""), &validation).ok()?;
        data.claims
            .exp
            .and_then(|exp| DateTime::<Utc>::from_timestamp(exp, 0))
    }

    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at().is_some_and(|expiry| expiry <= now)
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(***)")
    }
}

/// Explicit per-call context carrying the credential into every remote call.
#[derive(Debug, Clone)]
pub struct RequestContext {
    credential: Credential,
}

impl RequestContext {
    pub fn new(credential: Credential) -> Self {
        Self { credential }
    }

    pub fn bearer_token(&self) -> &str {
        self.credential.token()
    }
}

/// Local cache of the session token.
pub trait TokenStore: Send + Sync {
    /// `Ok(None)` when nothing is cached.
    fn load(&self) -> SyncResult<Option<Credential>>;

    fn save(&self, credential: &Credential) -> SyncResult<()>;

    fn clear(&self) -> SyncResult<()>;
}

/// Token cached in a single file, readable only by the owner on Unix.
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl TokenStore for FileTokenStore {
    fn load(&self) -> SyncResult<Option<Credential>> {
        if !self.path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(&self.path).map_err(|e| {
            SyncError::TokenStore(format!("Failed to read {}: {}", self.path.display(), e))
        })?;

        if content.trim().is_empty() {
            return Ok(None);
        }
        Credential::new(&content).map(Some)
    }

    fn save(&self, credential: &Credential) -> SyncResult<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                SyncError::TokenStore(format!("Failed to create {}: {}", parent.display(), e))
            })?;
        }

        std::fs::write(&self.path, credential.token()).map_err(|e| {
            SyncError::TokenStore(format!("Failed to write {}: {}", self.path.display(), e))
        })?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(&self.path, std::fs::Permissions::from_mode(0o600))?;
        }

        Ok(())
    }

    fn clear(&self) -> SyncResult<()> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(SyncError::TokenStore(format!(
                "Failed to remove {}: {}",
                self.path.display(),
                e
            ))),
        }
    }
}

#[derive(Default)]
pub struct MemoryTokenStore {
    token: Mutex<Option<Credential>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_credential(credential: Credential) -> Self {
        Self {
            token: Mutex::new(Some(credential)),
        }
    }

    fn slot(&self) -> SyncResult<std::sync::MutexGuard<'_, Option<Credential>>> {
        self.token
            .lock()
            .map_err(|_| SyncError::TokenStore("token lock poisoned".to_string()))
    }
}

impl TokenStore for MemoryTokenStore {
    fn load(&self) -> SyncResult<Option<Credential>> {
        Ok(self.slot()?.clone())
    }

    fn save(&self, credential: &Credential) -> SyncResult<()> {
        *self.slot()? = Some(credential.clone());
        Ok(())
    }

    fn clear(&self) -> SyncResult<()> {
        *self.slot()? = None;
        Ok(())
    }
}

/// A validated session: the context to thread into repository calls and the
/// recruiter it belongs to.
#[derive(Debug, Clone)]
pub struct Session {
    pub context: RequestContext,
    pub user: User,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UnauthenticatedReason {
    MissingToken,
    Expired,
    Rejected(String),
}

impl UnauthenticatedReason {
    pub fn message(&self) -> &str {
        match self {
            UnauthenticatedReason::MissingToken => "No session token found",
            UnauthenticatedReason::Expired => "Session token has expired",
            UnauthenticatedReason::Rejected(detail) => detail,
        }
    }
}

#[derive(Debug)]
pub enum SessionOutcome {
    Authenticated(Session),
    Unauthenticated(UnauthenticatedReason),
}

/// Gate in front of every data operation.
pub struct SessionGuard {
    store: Arc<dyn RemoteStore>,
    tokens: Arc<dyn TokenStore>,
}

impl SessionGuard {
    pub fn new(store: Arc<dyn RemoteStore>, tokens: Arc<dyn TokenStore>) -> Self {
        Self { store, tokens }
    }

    /// Validate the cached token against the store.
    ///
    /// A missing token short-circuits without any remote call. An expired or
    /// rejected token is cleared. Transport failures are returned as errors and
    /// leave the token in place.
    pub async fn establish(&self) -> SyncResult<SessionOutcome> {
        let credential = match self.tokens.load()? {
            Some(credential) => credential,
            None => {
                app_log!(warn, "Missing session token");
                return Ok(SessionOutcome::Unauthenticated(
                    UnauthenticatedReason::MissingToken,
                ));
            }
        };

        if credential.is_expired_at(Utc::now()) {
            app_log!(warn, "Session token expired locally");
            self.invalidate()?;
            return Ok(SessionOutcome::Unauthenticated(UnauthenticatedReason::Expired));
        }

        let context = RequestContext::new(credential);
        match self.store.current_user(&context).await {
            Ok(user) => {
                app_log!(info, "User {} authenticated", user.email);
                Ok(SessionOutcome::Authenticated(Session { context, user }))
            }
            Err(e) if e.is_unauthenticated() => {
                app_log!(warn, "Session validation rejected: {}", e);
                self.invalidate()?;
                Ok(SessionOutcome::Unauthenticated(UnauthenticatedReason::Rejected(
                    e.to_string(),
                )))
            }
            Err(e) => {
                app_log!(error, "Session validation failed: {}", e);
                Err(e)
            }
        }
    }

    /// Discard the cached token.
    pub fn invalidate(&self) -> SyncResult<()> {
        self.tokens.clear()?;
        app_log!(info, "Session token cleared");
        Ok(())
    }

    /// Cache a token issued elsewhere.
    pub fn login(&self, token: &str) -> SyncResult<Credential> {
        let credential = Credential::new(token)?;
        self.tokens.save(&credential)?;
        app_log!(info, "Session token stored");
        Ok(credential)
    }

    pub fn logout(&self) -> SyncResult<()> {
        self.invalidate()
    }
}

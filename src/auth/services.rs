use std::sync::Arc;

use time::OffsetDateTime;
use tracing::{info, warn};

use crate::auth::claims::ClaimSet;
use crate::auth::dto::AuthResponse;
use crate::auth::error::{AuthError, LOGIN_FAILED, USER_NOT_FOUND};
use crate::auth::jwt::{SigningContext, SCHEME};
use crate::auth::refresh;
use crate::auth::repo::CredentialStore;

/// The two entry points of the auth subsystem: login and refresh-token
/// rotation. Stateless apart from the shared store and signing context.
#[derive(Clone)]
pub struct AuthService {
    store: Arc<dyn CredentialStore>,
    signing: Arc<SigningContext>,
}

impl AuthService {
    pub fn new(store: Arc<dyn CredentialStore>, signing: Arc<SigningContext>) -> Self {
        Self { store, signing }
    }

    /// Validates the submitted credentials, mints and persists a fresh
    /// refresh token, then issues an access token. Exactly one store
    /// mutation on success, none on failure.
    pub async fn login(&self, username: &str, password: &str) -> Result<AuthResponse, AuthError> {
        let user = self
            .store
            .find_active_by_credentials(username, password)
            .await?
            .ok_or_else(|| {
                warn!(username, "login rejected");
                AuthError::AuthenticationFailed(LOGIN_FAILED)
            })?;

        let refresh_token = refresh::generate();
        self.store
            .update_refresh_token(user.id, &refresh_token, self.signing.refresh_expiration())
            .await?;

        let identity = ClaimSet::for_credential(&user);
        let token = self
            .signing
            .issue(&identity, self.signing.access_expiration())?;

        info!(user_id = user.id, username = %user.username, "user logged in");
        Ok(AuthResponse {
            token: format!("{SCHEME} {token}"),
            refresh_token,
            user_id: user.id,
        })
    }

    /// Exchanges a still-valid refresh token for a new access/refresh pair.
    /// The access token is decoded without expiry validation; the security
    /// check is the stored refresh token comparison, not token freshness.
    /// The stored token is overwritten on success, so a stolen refresh
    /// token is good for at most one extra exchange.
    pub async fn refresh(&self, token: &str, refresh_token: &str) -> Result<AuthResponse, AuthError> {
        let claims = self.signing.decode(token, false)?;
        let user_id: i32 = claims
            .identity
            .id
            .parse()
            .map_err(|_| AuthError::InvalidToken)?;

        let now = OffsetDateTime::now_utc();
        let user = self
            .store
            .find_by_id(user_id)
            .await?
            .ok_or(AuthError::AuthenticationFailed(USER_NOT_FOUND))?;
        // Wrong token and expired token are indistinguishable to the caller.
        let expiration = user
            .refresh_token_expiration
            .filter(|exp| *exp >= now)
            .ok_or_else(|| {
                warn!(user_id, "refresh rejected");
                AuthError::AuthenticationFailed(USER_NOT_FOUND)
            })?;
        if user.refresh_token.as_deref() != Some(refresh_token) {
            warn!(user_id, "refresh rejected");
            return Err(AuthError::AuthenticationFailed(USER_NOT_FOUND));
        }

        let identity = ClaimSet::for_credential(&user);
        let token = self
            .signing
            .issue(&identity, self.signing.access_expiration())?;

        // Rotation overwrites the stored token but keeps the expiration
        // assigned at login: the refresh window does not slide.
        let new_refresh_token = refresh::generate();
        self.store
            .update_refresh_token(user.id, &new_refresh_token, expiration)
            .await?;

        info!(user_id = user.id, "refresh token rotated");
        Ok(AuthResponse {
            token: format!("{SCHEME} {token}"),
            refresh_token: new_refresh_token,
            user_id: user.id,
        })
    }
}

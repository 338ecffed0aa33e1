use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use tracing::instrument;

use crate::{
    auth::{
        claims::ClaimSet,
        dto::{AuthResponse, LoginRequest, RefreshRequest},
        error::AuthError,
        extractors::AuthUser,
    },
    state::AppState,
};

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/token", post(token))
        .route("/auth/refresh", post(refresh))
        .route("/auth/me", get(me))
}

#[instrument(skip(state, payload))]
pub async fn token(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, AuthError> {
    let response = state.auth.login(&payload.username, &payload.password).await?;
    Ok(Json(response))
}

#[instrument(skip(state, payload))]
pub async fn refresh(
    State(state): State<AppState>,
    Json(payload): Json<RefreshRequest>,
) -> Result<Json<AuthResponse>, AuthError> {
    let response = state
        .auth
        .refresh(&payload.token, &payload.refresh_token)
        .await?;
    Ok(Json(response))
}

/// Echoes the caller's validated claims; the useful part is the extractor,
/// which runs the full verified decode the way any protected route would.
pub async fn me(AuthUser(identity): AuthUser) -> Json<ClaimSet> {
    Json(identity)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::jwt::SigningContext;
    use crate::auth::repo::memory::MemoryCredentialStore;
    use crate::auth::repo_types::Credential;
    use crate::config::JwtConfig;
    use std::sync::Arc;

    async fn test_state() -> AppState {
        let store = Arc::new(MemoryCredentialStore::default());
        store
            .insert(Credential {
                id: 7,
                username: "alice".into(),
                password: "secret12".into(),
                role_name: "Admin".into(),
                is_active: true,
                refresh_token: None,
                refresh_token_expiration: None,
            })
            .await;
        let signing = Arc::new(
            SigningContext::from_config(&JwtConfig {
                secret: "unit-test-secret-0123456789".into(),
                issuer: "test-issuer".into(),
                audience: "test-aud".into(),
                ttl_minutes: 5,
                refresh_ttl_days: 7,
            })
            .expect("signing context"),
        );
        AppState::from_parts(store, signing)
    }

    #[tokio::test]
    async fn token_then_refresh_through_the_handlers() {
        let state = test_state().await;

        let Json(login) = token(
            State(state.clone()),
            Json(LoginRequest {
                username: "alice".into(),
                password: "secret12".into(),
            }),
        )
        .await
        .expect("login handler");
        assert_eq!(login.user_id, 7);
        assert!(login.token.starts_with("Bearer "));

        let Json(rotated) = refresh(
            State(state),
            Json(RefreshRequest {
                token: login.token.clone(),
                refresh_token: login.refresh_token.clone(),
            }),
        )
        .await
        .expect("refresh handler");
        assert_eq!(rotated.user_id, 7);
        assert_ne!(rotated.refresh_token, login.refresh_token);
    }

    #[tokio::test]
    async fn bad_credentials_map_to_an_auth_error() {
        let state = test_state().await;
        let err = token(
            State(state),
            Json(LoginRequest {
                username: "alice".into(),
                password: "wrong".into(),
            }),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, AuthError::AuthenticationFailed(_)));
    }
}

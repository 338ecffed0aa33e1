use serde::{Deserialize, Serialize};

/// Request body for the login endpoint.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Request body for the refresh endpoint: the (possibly expired) access
/// token plus the refresh token it was issued alongside.
#[derive(Debug, Deserialize)]
pub struct RefreshRequest {
    pub token: String,
    pub refresh_token: String,
}

/// Response returned after login or refresh. `token` carries the scheme
/// prefix so it drops straight into an Authorization header.
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub token: String,
    pub refresh_token: String,
    pub user_id: i32,
}

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::OffsetDateTime;

/// User row as the auth subsystem sees it. Every store query joins the role,
/// so `role_name` is always populated. The password is stored and compared
/// in clear text for parity with the system this service fronts; the
/// comparison lives entirely inside the store implementations so a hash
/// check can replace it without touching the flows.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Credential {
    pub id: i32,
    pub username: String,
    #[serde(skip_serializing)]
    pub password: String,
    pub role_name: String,
    pub is_active: bool,
    pub refresh_token: Option<String>,
    pub refresh_token_expiration: Option<OffsetDateTime>,
}

use std::sync::Arc;

use crate::auth::jwt::SigningContext;
use crate::auth::repo::{CredentialStore, PgCredentialStore};
use crate::auth::services::AuthService;
use crate::config::AppConfig;

#[derive(Clone)]
pub struct AppState {
    pub signing: Arc<SigningContext>,
    pub auth: AuthService,
}

impl AppState {
    pub async fn init(config: &AppConfig) -> anyhow::Result<Self> {
        let signing = Arc::new(SigningContext::from_config(&config.jwt)?);

        let db = sqlx::postgres::PgPoolOptions::new()
            .max_connections(10)
            .connect(&config.database_url)
            .await?;
        sqlx::migrate!("./migrations").run(&db).await?;

        let store = Arc::new(PgCredentialStore::new(db)) as Arc<dyn CredentialStore>;
        let auth = AuthService::new(store, signing.clone());
        Ok(Self { signing, auth })
    }

    pub fn from_parts(store: Arc<dyn CredentialStore>, signing: Arc<SigningContext>) -> Self {
        let auth = AuthService::new(store, signing.clone());
        Self { signing, auth }
    }
}

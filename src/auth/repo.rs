use async_trait::async_trait;
use sqlx::PgPool;
use time::OffsetDateTime;

use crate::auth::repo_types::Credential;

/// The external user-record store as the auth flows see it: two lookups and
/// one refresh-token commit. Credential matching (including the clear-text
/// password comparison) is the implementation's concern.
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Exact, case-sensitive username/password match against active users.
    async fn find_active_by_credentials(
        &self,
        username: &str,
        password: &str,
    ) -> anyhow::Result<Option<Credential>>;

    async fn find_by_id(&self, id: i32) -> anyhow::Result<Option<Credential>>;

    /// Persists the refresh token and its absolute expiration in one commit.
    async fn update_refresh_token(
        &self,
        id: i32,
        token: &str,
        expiration: OffsetDateTime,
    ) -> anyhow::Result<()>;
}

pub struct PgCredentialStore {
    db: PgPool,
}

impl PgCredentialStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl CredentialStore for PgCredentialStore {
    async fn find_active_by_credentials(
        &self,
        username: &str,
        password: &str,
    ) -> anyhow::Result<Option<Credential>> {
        let credential = sqlx::query_as::<_, Credential>(
            r#"
            SELECT u.id, u.username, u.password, r.name AS role_name,
                   u.is_active, u.refresh_token, u.refresh_token_expiration
            FROM users u
            JOIN roles r ON r.id = u.role_id
            WHERE u.username = $1 AND u.password = $2 AND u.is_active
            "#,
        )
        .bind(username)
        .bind(password)
        .fetch_optional(&self.db)
        .await?;
        Ok(credential)
    }

    async fn find_by_id(&self, id: i32) -> anyhow::Result<Option<Credential>> {
        let credential = sqlx::query_as::<_, Credential>(
            r#"
            SELECT u.id, u.username, u.password, r.name AS role_name,
                   u.is_active, u.refresh_token, u.refresh_token_expiration
            FROM users u
            JOIN roles r ON r.id = u.role_id
            WHERE u.id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.db)
        .await?;
        Ok(credential)
    }

    async fn update_refresh_token(
        &self,
        id: i32,
        token: &str,
        expiration: OffsetDateTime,
    ) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            UPDATE users
            SET refresh_token = $2, refresh_token_expiration = $3
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(token)
        .bind(expiration)
        .execute(&self.db)
        .await?;
        Ok(())
    }
}

#[cfg(test)]
pub(crate) mod memory {
    use super::*;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tokio::sync::Mutex;

    /// In-memory store for flow tests. Counts commits so tests can assert on
    /// the exactly-one-mutation contract of the flows.
    #[derive(Default)]
    pub struct MemoryCredentialStore {
        users: Mutex<HashMap<i32, Credential>>,
        writes: AtomicUsize,
    }

    impl MemoryCredentialStore {
        pub async fn insert(&self, credential: Credential) {
            self.users.lock().await.insert(credential.id, credential);
        }

        pub async fn get(&self, id: i32) -> Option<Credential> {
            self.users.lock().await.get(&id).cloned()
        }

        pub fn write_count(&self) -> usize {
            self.writes.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl CredentialStore for MemoryCredentialStore {
        async fn find_active_by_credentials(
            &self,
            username: &str,
            password: &str,
        ) -> anyhow::Result<Option<Credential>> {
            Ok(self
                .users
                .lock()
                .await
                .values()
                .find(|u| u.username == username && u.password == password && u.is_active)
                .cloned())
        }

        async fn find_by_id(&self, id: i32) -> anyhow::Result<Option<Credential>> {
            Ok(self.users.lock().await.get(&id).cloned())
        }

        async fn update_refresh_token(
            &self,
            id: i32,
            token: &str,
            expiration: OffsetDateTime,
        ) -> anyhow::Result<()> {
            let mut users = self.users.lock().await;
            let user = users
                .get_mut(&id)
                .ok_or_else(|| anyhow::anyhow!("no user {id}"))?;
            user.refresh_token = Some(token.to_string());
            user.refresh_token_expiration = Some(expiration);
            self.writes.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }
}

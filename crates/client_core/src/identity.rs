//! Persisted identity: a byte store keyed by [`IDENTITY_KEY`].

use anyhow::{Context, Result};
use async_trait::async_trait;
use storage::Storage;
use tokio::sync::Mutex;

pub const IDENTITY_KEY: &str = "user";

#[async_trait]
pub trait IdentityStore: Send + Sync {
    async fn load(&self) -> Result<Option<String>>;
    async fn save(&self, username: &str) -> Result<()>;
    async fn clear(&self) -> Result<()>;
}

#[async_trait]
impl IdentityStore for Storage {
    async fn load(&self) -> Result<Option<String>> {
        let Some(bytes) = self.get(IDENTITY_KEY).await? else {
            return Ok(None);
        };
        let username = String::from_utf8(bytes).context("persisted identity is not utf-8")?;
        Ok(Some(username))
    }

    async fn save(&self, username: &str) -> Result<()> {
        self.put(IDENTITY_KEY, username.as_bytes()).await
    }

    async fn clear(&self) -> Result<()> {
        self.delete(IDENTITY_KEY).await
    }
}

#[derive(Default)]
pub struct InMemoryIdentityStore {
    value: Mutex<Option<String>>,
}

impl InMemoryIdentityStore {
    pub fn with_identity(username: impl Into<String>) -> Self {
        Self {
            value: Mutex::new(Some(username.into())),
        }
    }
}

#[async_trait]
impl IdentityStore for InMemoryIdentityStore {
    async fn load(&self) -> Result<Option<String>> {
        Ok(self.value.lock().await.clone())
    }

    async fn save(&self, username: &str) -> Result<()> {
        *self.value.lock().await = Some(username.to_string());
        Ok(())
    }

    async fn clear(&self) -> Result<()> {
        *self.value.lock().await = None;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn sqlite_identity_round_trips_and_clears() {
        let dir = tempfile::tempdir().expect("tempdir");
        let url = format!("sqlite://{}", dir.path().join("client.db").display());
        let storage = Storage::new(&url).await.expect("storage");

        assert_eq!(storage.load().await.expect("load"), None);
        IdentityStore::save(&storage, "alice").await.expect("save");
        assert_eq!(storage.load().await.expect("load").as_deref(), Some("alice"));

        let reopened = Storage::new(&url).await.expect("reopen");
        assert_eq!(reopened.load().await.expect("load").as_deref(), Some("alice"));

        reopened.clear().await.expect("clear");
        assert_eq!(storage.load().await.expect("load"), None);
    }
}

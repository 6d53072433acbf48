//! In-memory credential store
//!
//! Keeps registered accounts in a `HashMap` keyed by username behind an
//! async `RwLock`. Reads run concurrently; inserts take the write lock for
//! the whole check-and-insert step.

use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;
use warden_core::{CredentialStore, Result, UserRecord, WardenError};

/// Map-backed store implementing [`CredentialStore`]
///
/// Contents live for the lifetime of the process.
#[derive(Default)]
pub struct MemoryCredentialStore {
    users: RwLock<HashMap<String, UserRecord>>,
}

impl MemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CredentialStore for MemoryCredentialStore {
    async fn insert(&self, record: UserRecord) -> Result<UserRecord> {
        // The write guard spans the check and the insert, so two concurrent
        // registrations for one username cannot both pass.
        let mut users = self.users.write().await;

        if users.contains_key(&record.username) {
            return Err(WardenError::DuplicateUsername(record.username));
        }

        users.insert(record.username.clone(), record.clone());
        Ok(record)
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<UserRecord>> {
        let users = self.users.read().await;
        Ok(users.get(username).cloned())
    }

    async fn count(&self) -> Result<u64> {
        let users = self.users.read().await;
        Ok(users.len() as u64)
    }
}

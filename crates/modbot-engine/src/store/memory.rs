//! In-memory user store
//!
//! Reference implementation of the persistence collaborator. Users are
//! created on first load and kept for the lifetime of the store; real
//! deployments substitute a database-backed implementation behind the same
//! trait.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use parking_lot::RwLock;

use modbot_core::{Snowflake, StoreError, User, UserStore};

/// In-memory, thread-safe user store
#[derive(Default)]
pub struct MemoryUserStore {
    users: RwLock<HashMap<Snowflake, User>>,
    closed: AtomicBool,
}

impl MemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of users currently held
    pub fn len(&self) -> usize {
        self.users.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.read().is_empty()
    }

    fn ensure_open(&self) -> Result<(), StoreError> {
        if self.closed.load(Ordering::Acquire) {
            return Err(StoreError::Closed);
        }
        Ok(())
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn load_user(&self, id: Snowflake) -> Result<User, StoreError> {
        self.ensure_open()?;
        let mut users = self.users.write();
        Ok(users.entry(id).or_insert_with(|| User::new(id)).clone())
    }

    async fn save_user(&self, user: &User) -> Result<(), StoreError> {
        self.ensure_open()?;
        self.users.write().insert(user.id, user.clone());
        Ok(())
    }

    async fn flush_and_close(&self) -> Result<(), StoreError> {
        if self.closed.swap(true, Ordering::AcqRel) {
            return Err(StoreError::Closed);
        }
        Ok(())
    }
}

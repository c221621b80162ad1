use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use uuid::Uuid;

use super::UserStore;
use crate::error::StoreError;
use crate::models::{NewUser, Principal};

/// In-memory UserStore for testing and local development.
#[derive(Clone, Debug, Default)]
pub struct MemoryUserStore {
    users: Arc<Mutex<HashMap<String, Principal>>>,
}

impl MemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a fully formed principal, replacing any with the same email.
    pub fn insert(&self, principal: Principal) -> Result<(), StoreError> {
        self.lock()?.insert(principal.email.clone(), principal);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.lock().map(|users| users.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> Result<MutexGuard<'_, HashMap<String, Principal>>, StoreError> {
        self.users
            .lock()
            .map_err(|_| StoreError::Database("user store lock poisoned".to_string()))
    }
}

impl UserStore for MemoryUserStore {
    async fn find_unique(&self, email: &str) -> Result<Option<Principal>, StoreError> {
        Ok(self.lock()?.get(email).cloned())
    }

    async fn create_user(&self, user: NewUser) -> Result<Principal, StoreError> {
        let mut users = self.lock()?;
        if users.contains_key(&user.email) {
            return Err(StoreError::Conflict(user.email));
        }
        if let Some(username) = &user.username {
            if users.values().any(|p| p.username.as_ref() == Some(username)) {
                return Err(StoreError::Conflict(username.clone()));
            }
        }

        let principal = Principal {
            id: Uuid::new_v4().to_string(),
            username: user.username,
            email: user.email,
            name: user.name,
            image: user.image,
            account: user.account,
        };
        users.insert(principal.email.clone(), principal.clone());
        Ok(principal)
    }
}

//! In-memory user repository.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::production::{
    domain::{User, UserId},
    ports::{ProductionRepositoryError, ProductionRepositoryResult, UserRepository},
};

/// Thread-safe in-memory user repository.
#[derive(Debug, Clone, Default)]
pub struct InMemoryUserRepository {
    state: Arc<RwLock<InMemoryUserState>>,
}

#[derive(Debug, Default)]
struct InMemoryUserState {
    users: HashMap<UserId, User>,
    order: Vec<UserId>,
    name_index: HashMap<String, UserId>,
}

impl InMemoryUserRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn store(&self, user: &User) -> ProductionRepositoryResult<()> {
        let mut state = self.state.write().map_err(|err| {
            ProductionRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })?;

        if state.name_index.contains_key(user.name()) {
            return Err(ProductionRepositoryError::DuplicateUserName(
                user.name().to_owned(),
            ));
        }

        state.name_index.insert(user.name().to_owned(), user.id());
        state.order.push(user.id());
        state.users.insert(user.id(), user.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: UserId) -> ProductionRepositoryResult<Option<User>> {
        let state = self.state.read().map_err(|err| {
            ProductionRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })?;
        Ok(state.users.get(&id).cloned())
    }

    async fn find_by_name(&self, name: &str) -> ProductionRepositoryResult<Option<User>> {
        let state = self.state.read().map_err(|err| {
            ProductionRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })?;
        Ok(state
            .name_index
            .get(name)
            .and_then(|id| state.users.get(id))
            .cloned())
    }

    async fn list_all(&self) -> ProductionRepositoryResult<Vec<User>> {
        let state = self.state.read().map_err(|err| {
            ProductionRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })?;
        Ok(state
            .order
            .iter()
            .filter_map(|id| state.users.get(id))
            .cloned()
            .collect())
    }
}

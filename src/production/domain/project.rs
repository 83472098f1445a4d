//! Project and user entities.

use super::{ProductionDomainError, ProjectId, UserId, error::validated_name};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

/// Maximum project name length.
const MAX_PROJECT_NAME_LENGTH: usize = 50;

/// Maximum user name length.
const MAX_USER_NAME_LENGTH: usize = 20;

/// A production that owns assets and shots.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    id: ProjectId,
    name: String,
    created_at: DateTime<Utc>,
}

impl Project {
    /// Creates a new project.
    ///
    /// # Errors
    ///
    /// Returns [`ProductionDomainError`] when the name is empty or longer
    /// than 50 characters.
    pub fn new(name: impl Into<String>, clock: &impl Clock) -> Result<Self, ProductionDomainError> {
        Ok(Self {
            id: ProjectId::new(),
            name: validated_name("project", name, MAX_PROJECT_NAME_LENGTH)?,
            created_at: clock.utc(),
        })
    }

    /// Returns the project identifier.
    #[must_use]
    pub const fn id(&self) -> ProjectId {
        self.id
    }

    /// Returns the project name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

/// A person that tasks can be assigned to.
///
/// Users do not own the lifecycle of their tasks; assignment is a reference
/// held by the task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    id: UserId,
    name: String,
    created_at: DateTime<Utc>,
}

impl User {
    /// Creates a new user.
    ///
    /// # Errors
    ///
    /// Returns [`ProductionDomainError`] when the name is empty or longer
    /// than 20 characters.
    pub fn new(name: impl Into<String>, clock: &impl Clock) -> Result<Self, ProductionDomainError> {
        Ok(Self {
            id: UserId::new(),
            name: validated_name("user", name, MAX_USER_NAME_LENGTH)?,
            created_at: clock.utc(),
        })
    }

    /// Returns the user identifier.
    #[must_use]
    pub const fn id(&self) -> UserId {
        self.id
    }

    /// Returns the user name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

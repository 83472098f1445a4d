//! Asset and shot task holders.

use super::{HolderKind, HolderRef, ProductionDomainError, ProjectId, error::validated_name};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

/// Maximum holder name length.
const MAX_HOLDER_NAME_LENGTH: usize = 150;

/// An asset or shot owning a flat set of top-level tasks.
///
/// The holder itself does not store its tasks; tasks point back at the holder
/// through their [`HolderRef`] and are queried through the task repository.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Holder {
    id: HolderRef,
    project_id: ProjectId,
    name: String,
    template_name: String,
    created_at: DateTime<Utc>,
}

impl Holder {
    /// Creates a new holder of the given kind inside a project.
    ///
    /// # Errors
    ///
    /// Returns [`ProductionDomainError`] when the name is empty or longer
    /// than 150 characters.
    pub fn new(
        kind: HolderKind,
        project_id: ProjectId,
        name: impl Into<String>,
        template_name: impl Into<String>,
        clock: &impl Clock,
    ) -> Result<Self, ProductionDomainError> {
        Ok(Self {
            id: HolderRef::new(kind),
            project_id,
            name: validated_name(kind.as_str(), name, MAX_HOLDER_NAME_LENGTH)?,
            template_name: template_name.into(),
            created_at: clock.utc(),
        })
    }

    /// Returns the holder reference.
    #[must_use]
    pub const fn id(&self) -> HolderRef {
        self.id
    }

    /// Returns whether this holder is an asset or a shot.
    #[must_use]
    pub const fn kind(&self) -> HolderKind {
        self.id.kind()
    }

    /// Returns the owning project.
    #[must_use]
    pub const fn project_id(&self) -> ProjectId {
        self.project_id
    }

    /// Returns the holder name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the name of the template the task tree was built from.
    #[must_use]
    pub fn template_name(&self) -> &str {
        &self.template_name
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

//! Error types for production entity validation.

use thiserror::Error;

/// Errors returned while constructing projects, users, and holders.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ProductionDomainError {
    /// A name was empty after trimming.
    #[error("{entity} name must not be empty")]
    EmptyName {
        /// Kind of entity being named.
        entity: &'static str,
    },

    /// A name exceeded the maximum length for its entity.
    #[error("{entity} name '{name}' exceeds {max} characters")]
    NameTooLong {
        /// Kind of entity being named.
        entity: &'static str,
        /// The rejected name.
        name: String,
        /// Maximum accepted length.
        max: usize,
    },
}

/// Trims and validates an entity name against a length bound.
pub(crate) fn validated_name(
    entity: &'static str,
    value: impl Into<String>,
    max: usize,
) -> Result<String, ProductionDomainError> {
    let raw = value.into();
    let normalized = raw.trim();
    if normalized.is_empty() {
        return Err(ProductionDomainError::EmptyName { entity });
    }
    if normalized.chars().count() > max {
        return Err(ProductionDomainError::NameTooLong {
            entity,
            name: raw,
            max,
        });
    }
    Ok(normalized.to_owned())
}

//! Configuration errors for task templates.

use crate::task::domain::TaskDomainError;
use std::path::PathBuf;
use std::sync::Arc;
use thiserror::Error;

/// Errors raised while loading, validating, or instantiating templates.
///
/// A template that fails validation is never instantiated, so a malformed
/// template cannot leave a partial task tree behind.
#[derive(Debug, Clone, Error)]
pub enum TemplateError {
    /// The template declares no tasks.
    #[error("template '{0}' declares no tasks")]
    EmptyTemplate(String),

    /// A task name is blank or too long.
    #[error("template '{template}' has an invalid task name: {source}")]
    InvalidTaskName {
        /// Template name.
        template: String,
        /// Name rule that failed.
        source: TaskDomainError,
    },

    /// Two tasks share a name.
    #[error("template '{template}' declares task '{task}' more than once")]
    DuplicateTask {
        /// Template name.
        template: String,
        /// Repeated task name.
        task: String,
    },

    /// Dependencies or subtasks were declared for a task that is not listed.
    #[error("template '{template}' configures unknown task '{task}'")]
    UnknownTask {
        /// Template name.
        template: String,
        /// Unlisted task name.
        task: String,
    },

    /// A task depends on a name that is not part of the template.
    #[error("task '{task}' in template '{template}' has unknown dependency '{dependency}'")]
    UnknownDependency {
        /// Template name.
        template: String,
        /// Task declaring the dependency.
        task: String,
        /// Name that could not be resolved.
        dependency: String,
    },

    /// A task lists itself as a dependency.
    #[error("task '{task}' in template '{template}' cannot depend on itself")]
    SelfDependency {
        /// Template name.
        template: String,
        /// Offending task name.
        task: String,
    },

    /// The dependency graph contains a cycle.
    #[error("cycle detected in template '{template}' involving task '{task}'")]
    DependencyCycle {
        /// Template name.
        template: String,
        /// A task on the cycle.
        task: String,
    },

    /// A subtask was given more than one parent.
    #[error("subtask '{task}' in template '{template}' has more than one parent")]
    MultipleParents {
        /// Template name.
        template: String,
        /// Offending subtask name.
        task: String,
    },

    /// Subtask parent links form a cycle.
    #[error("subtask nesting in template '{template}' loops through task '{task}'")]
    ParentCycle {
        /// Template name.
        template: String,
        /// A task on the loop.
        task: String,
    },

    /// A category name is neither `asset` nor `shot`.
    #[error("'{0}' is not a template category, expected asset or shot")]
    UnknownCategory(String),

    /// No template with the given name exists in the category.
    #[error("no {category} template named '{name}'")]
    UnknownTemplate {
        /// Category searched.
        category: String,
        /// Requested template name.
        name: String,
    },

    /// A template task could not be created.
    #[error(transparent)]
    Task(#[from] TaskDomainError),

    /// A template file could not be parsed.
    #[error("cannot parse template file {path:?}: {message}")]
    Parse {
        /// File path, or `None` for in-memory sources.
        path: Option<PathBuf>,
        /// Parser diagnostic.
        message: String,
    },

    /// A template file could not be read.
    #[error("cannot read template file {path:?}: {source}")]
    Io {
        /// File path.
        path: PathBuf,
        /// Underlying error.
        source: Arc<std::io::Error>,
    },
}

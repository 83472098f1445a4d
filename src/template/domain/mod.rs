//! Template model, validation, catalog, and instantiation.

mod catalog;
mod error;
mod instantiate;
mod template;

pub use catalog::{
    DEFAULT_ASSET_TEMPLATE, DEFAULT_SHOT_TEMPLATE, TemplateCatalog, parse_category,
};
pub(crate) use catalog::builtin_specs;
pub use error::TemplateError;
pub use instantiate::instantiate;
pub use template::{TaskSpec, TaskTemplate, TemplateDocument};

//! Named templates grouped by holder category.

use super::{TaskSpec, TaskTemplate, TemplateDocument, TemplateError};
use crate::production::domain::HolderKind;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use std::sync::Arc;
use tracing::warn;

/// Template used for assets created without an explicit template.
pub const DEFAULT_ASSET_TEMPLATE: &str = "feature_animation_prop_asset";

/// Template used for shots created without an explicit template.
pub const DEFAULT_SHOT_TEMPLATE: &str = "shortfilm_shot";

/// File form of a catalog: category name -> template name -> document.
type CatalogDocument = BTreeMap<String, BTreeMap<String, TemplateDocument>>;

/// Templates available for new assets and shots.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TemplateCatalog {
    templates: BTreeMap<HolderKind, BTreeMap<String, TaskTemplate>>,
}

/// Parses a category name (`asset` or `shot`).
///
/// # Errors
///
/// Returns [`TemplateError::UnknownCategory`] for any other name.
pub fn parse_category(value: &str) -> Result<HolderKind, TemplateError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "asset" => Ok(HolderKind::Asset),
        "shot" => Ok(HolderKind::Shot),
        _ => Err(TemplateError::UnknownCategory(value.to_owned())),
    }
}

impl TemplateCatalog {
    /// Creates an empty catalog.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the catalog of built-in asset and shot templates.
    #[must_use]
    pub fn builtin() -> Self {
        let mut catalog = Self::new();
        for (category, name, tasks) in builtin_specs() {
            match TaskTemplate::new(name, tasks) {
                Ok(template) => catalog.insert(category, template),
                Err(err) => warn!(template = name, error = %err, "skipping invalid built-in template"),
            }
        }
        catalog
    }

    /// Parses a catalog from TOML.
    ///
    /// # Errors
    ///
    /// Returns [`TemplateError::Parse`] for malformed TOML,
    /// [`TemplateError::UnknownCategory`] for a table that is neither
    /// `asset` nor `shot`, or any validation error of the contained
    /// templates.
    pub fn from_toml_str(contents: &str) -> Result<Self, TemplateError> {
        let document: CatalogDocument =
            toml::from_str(contents).map_err(|err| TemplateError::Parse {
                path: None,
                message: err.to_string(),
            })?;
        Self::from_catalog_document(document)
    }

    /// Parses a catalog from JSON.
    ///
    /// # Errors
    ///
    /// Returns the same errors as [`Self::from_toml_str`].
    pub fn from_json_str(contents: &str) -> Result<Self, TemplateError> {
        let document: CatalogDocument =
            serde_json::from_str(contents).map_err(|err| TemplateError::Parse {
                path: None,
                message: err.to_string(),
            })?;
        Self::from_catalog_document(document)
    }

    /// Loads a catalog file; `.json` files are read as JSON, anything else
    /// as TOML.
    ///
    /// # Errors
    ///
    /// Returns [`TemplateError::Io`] when the file cannot be read, or the
    /// parse and validation errors of [`Self::from_toml_str`] with the path
    /// attached.
    pub fn load_from_path(file: &Path) -> Result<Self, TemplateError> {
        let contents = fs::read_to_string(file).map_err(|err| TemplateError::Io {
            path: file.to_path_buf(),
            source: Arc::new(err),
        })?;
        let is_json = file
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        let parsed = if is_json {
            Self::from_json_str(&contents)
        } else {
            Self::from_toml_str(&contents)
        };
        parsed.map_err(|err| match err {
            TemplateError::Parse { message, .. } => TemplateError::Parse {
                path: Some(file.to_path_buf()),
                message,
            },
            other => other,
        })
    }

    /// Adds a template, replacing any template of the same category and
    /// name.
    pub fn insert(&mut self, category: HolderKind, template: TaskTemplate) {
        self.templates
            .entry(category)
            .or_default()
            .insert(template.name().to_owned(), template);
    }

    /// Adds every template of `other`, replacing same-named templates.
    pub fn merge(&mut self, other: Self) {
        for (category, templates) in other.templates {
            for template in templates.into_values() {
                self.insert(category, template);
            }
        }
    }

    /// Looks up a template by category and name.
    ///
    /// # Errors
    ///
    /// Returns [`TemplateError::UnknownTemplate`] when no template matches.
    pub fn get(&self, category: HolderKind, name: &str) -> Result<&TaskTemplate, TemplateError> {
        self.templates
            .get(&category)
            .and_then(|templates| templates.get(name))
            .ok_or_else(|| TemplateError::UnknownTemplate {
                category: category.as_str().to_owned(),
                name: name.to_owned(),
            })
    }

    /// Returns the templates of a category ordered by name.
    #[must_use]
    pub fn templates_for(&self, category: HolderKind) -> Vec<&TaskTemplate> {
        self.templates
            .get(&category)
            .map(|templates| templates.values().collect())
            .unwrap_or_default()
    }

    /// Returns the templates of a category given by name.
    ///
    /// # Errors
    ///
    /// Returns [`TemplateError::UnknownCategory`] when `category` is not
    /// `asset` or `shot`.
    pub fn templates_for_category(&self, category: &str) -> Result<Vec<&TaskTemplate>, TemplateError> {
        Ok(self.templates_for(parse_category(category)?))
    }

    /// Returns the catalog in its file form.
    #[must_use]
    pub fn to_document(&self) -> BTreeMap<String, BTreeMap<String, TemplateDocument>> {
        self.templates
            .iter()
            .map(|(category, templates)| {
                let documents = templates
                    .iter()
                    .map(|(name, template)| (name.clone(), template.to_document()))
                    .collect();
                (category.as_str().to_owned(), documents)
            })
            .collect()
    }

    fn from_catalog_document(document: CatalogDocument) -> Result<Self, TemplateError> {
        let mut catalog = Self::new();
        for (category_name, templates) in document {
            let category = parse_category(&category_name)?;
            for (name, template) in templates {
                catalog.insert(category, TaskTemplate::from_document(name, template)?);
            }
        }
        Ok(catalog)
    }
}

impl Serialize for TemplateCatalog {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_document().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for TemplateCatalog {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let document = CatalogDocument::deserialize(deserializer)?;
        Self::from_catalog_document(document).map_err(serde::de::Error::custom)
    }
}

/// Category, name, and task list of one built-in template.
pub(crate) type BuiltinSpec = (HolderKind, &'static str, Vec<TaskSpec>);

/// Task lists of the built-in templates.
pub(crate) fn builtin_specs() -> Vec<BuiltinSpec> {
    let mut specs = builtin_asset_specs();
    specs.extend(builtin_shot_specs());
    specs
}

fn builtin_asset_specs() -> Vec<BuiltinSpec> {
    vec![
        (
            HolderKind::Asset,
            "feature_animation_character_asset",
            vec![
                TaskSpec::new("concept"),
                TaskSpec::new("modeling").depends_on(["concept"]),
                TaskSpec::new("tailoring").depends_on(["concept", "modeling"]),
                TaskSpec::new("texturing").depends_on(["concept", "modeling", "tailoring"]),
                TaskSpec::new("grooming").depends_on([
                    "concept",
                    "modeling",
                    "texturing",
                    "tailoring",
                ]),
                TaskSpec::new("rigging").depends_on(["concept", "modeling"]),
                TaskSpec::new("muscle").depends_on(["modeling", "rigging"]),
                TaskSpec::new("asset_vfx").depends_on(["concept", "modeling", "rigging"]),
            ],
        ),
        (
            HolderKind::Asset,
            DEFAULT_ASSET_TEMPLATE,
            vec![
                TaskSpec::new("concept"),
                TaskSpec::new("modeling").depends_on(["concept"]),
                TaskSpec::new("texturing").depends_on(["concept", "modeling"]),
            ],
        ),
        (
            HolderKind::Asset,
            "feature_animation_anim_prop_asset",
            vec![
                TaskSpec::new("concept"),
                TaskSpec::new("modeling").depends_on(["concept"]),
                TaskSpec::new("texturing").depends_on(["concept", "modeling"]),
                TaskSpec::new("rigging").depends_on(["modeling", "texturing"]),
            ],
        ),
    ]
}

fn builtin_shot_specs() -> Vec<BuiltinSpec> {
    vec![
        (
            HolderKind::Shot,
            "feature_animation_shot",
            vec![
                TaskSpec::new("storyboard"),
                TaskSpec::new("mood").depends_on(["storyboard"]),
                TaskSpec::new("blockin").depends_on(["storyboard"]),
                TaskSpec::new("animation").depends_on(["blockin"]),
                TaskSpec::new("tech_check").depends_on(["animation", "shot_set"]),
                TaskSpec::new("shot_set").depends_on(["animation"]),
                TaskSpec::new("matte_painting").depends_on(["animation", "shot_set", "tech_check"]),
                TaskSpec::new("cloth_sim").depends_on(["animation", "muscle_sim"]),
                TaskSpec::new("hair_sim").depends_on(["animation", "cloth_sim", "muscle_sim"]),
                TaskSpec::new("muscle_sim").depends_on(["animation", "tech_check"]),
                TaskSpec::new("vfx").depends_on(["animation", "shot_set"]),
                TaskSpec::new("camera_check").depends_on([
                    "animation",
                    "shot_set",
                    "cloth_sim",
                    "hair_sim",
                    "muscle_sim",
                    "vfx",
                ]),
                TaskSpec::new("lighting").depends_on([
                    "shot_set",
                    "cloth_sim",
                    "muscle_sim",
                    "vfx",
                    "camera_check",
                    "animation",
                ]),
                TaskSpec::new("rendering").depends_on(["lighting"]),
                TaskSpec::new("compositing").depends_on(["rendering"]),
            ],
        ),
        (
            HolderKind::Shot,
            DEFAULT_SHOT_TEMPLATE,
            vec![
                TaskSpec::new("storyboard"),
                TaskSpec::new("animation").depends_on(["storyboard"]),
                TaskSpec::new("lighting").depends_on(["animation"]),
                TaskSpec::new("rendering").depends_on(["lighting"]),
                TaskSpec::new("compositing").depends_on(["rendering"]),
            ],
        ),
    ]
}

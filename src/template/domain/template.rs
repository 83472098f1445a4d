//! Declarative task templates and their load-time validation.

use super::TemplateError;
use crate::task::domain::normalize_task_name;
use petgraph::algo::toposort;
use petgraph::graphmap::DiGraphMap;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap, HashSet};

/// The data format a template is written in.
///
/// ```toml
/// tasks = ["concept", "modeling", "texturing"]
///
/// [dependencies]
/// modeling = ["concept"]
/// texturing = ["concept", "modeling"]
///
/// [subtasks]
/// texturing = ["uv_layout"]
/// ```
///
/// Tasks without an entry in `dependencies` have no prerequisites.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TemplateDocument {
    /// Task names in display order.
    pub tasks: Vec<String>,
    /// Prerequisite names per task name.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub dependencies: BTreeMap<String, Vec<String>>,
    /// Subtask names per parent task name.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub subtasks: BTreeMap<String, Vec<String>>,
}

/// One task of a template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskSpec {
    name: String,
    dependencies: Vec<String>,
    parent: Option<String>,
}

impl TaskSpec {
    /// Creates a task spec without prerequisites.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            dependencies: Vec::new(),
            parent: None,
        }
    }

    /// Sets the prerequisite task names.
    #[must_use]
    pub fn depends_on<I, S>(mut self, dependencies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.dependencies = dependencies.into_iter().map(Into::into).collect();
        self
    }

    /// Makes this task a subtask of the named task.
    #[must_use]
    pub fn child_of(mut self, parent: impl Into<String>) -> Self {
        self.parent = Some(parent.into());
        self
    }

    /// Returns the task name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the prerequisite task names.
    #[must_use]
    pub fn dependencies(&self) -> &[String] {
        &self.dependencies
    }

    /// Returns the parent task name for subtasks.
    #[must_use]
    pub fn parent(&self) -> Option<&str> {
        self.parent.as_deref()
    }

    /// Returns a copy with every name trimmed, rejecting task names that
    /// could not name a task.
    fn normalized(&self, template: &str) -> Result<Self, TemplateError> {
        let name = normalize_task_name(&self.name).map_err(|source| {
            TemplateError::InvalidTaskName {
                template: template.to_owned(),
                source,
            }
        })?;
        Ok(Self {
            name: name.to_owned(),
            dependencies: self
                .dependencies
                .iter()
                .map(|dependency| dependency.trim().to_owned())
                .collect(),
            parent: self.parent.as_deref().map(|parent| parent.trim().to_owned()),
        })
    }
}

/// A validated template: an ordered list of task specs whose dependency
/// names resolve within the template and form an acyclic graph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskTemplate {
    name: String,
    tasks: Vec<TaskSpec>,
}

impl TaskTemplate {
    /// Creates a validated template.
    ///
    /// # Errors
    ///
    /// Returns [`TemplateError`] when the template is empty, has a blank or
    /// overlong task name, repeats a task name after trimming, references
    /// an unknown or own name as a dependency or parent, or contains a
    /// dependency or nesting cycle.
    pub fn new(
        name: impl Into<String>,
        tasks: impl IntoIterator<Item = TaskSpec>,
    ) -> Result<Self, TemplateError> {
        let template_name = name.into();
        let specs = tasks
            .into_iter()
            .map(|spec| spec.normalized(&template_name))
            .collect::<Result<Vec<_>, _>>()?;
        let template = Self {
            name: template_name,
            tasks: specs,
        };
        template.validate()?;
        Ok(template)
    }

    /// Creates a validated template from its document form.
    ///
    /// # Errors
    ///
    /// Returns [`TemplateError`] under the same conditions as
    /// [`Self::new`], and [`TemplateError::UnknownTask`] when
    /// `dependencies` or `subtasks` configure a task that is not listed.
    pub fn from_document(
        name: impl Into<String>,
        document: TemplateDocument,
    ) -> Result<Self, TemplateError> {
        let template_name = name.into();
        let TemplateDocument {
            tasks: listed_tasks,
            dependencies: raw_dependencies,
            subtasks: raw_subtasks,
        } = document;

        let tasks: Vec<String> = listed_tasks
            .iter()
            .map(|task| task.trim().to_owned())
            .collect();
        let mut dependencies: BTreeMap<String, Vec<String>> = BTreeMap::new();
        for (task, prerequisites) in raw_dependencies {
            dependencies
                .entry(task.trim().to_owned())
                .or_default()
                .extend(prerequisites);
        }
        let mut subtasks: BTreeMap<String, Vec<String>> = BTreeMap::new();
        for (parent, children) in raw_subtasks {
            subtasks
                .entry(parent.trim().to_owned())
                .or_default()
                .extend(children.iter().map(|child| child.trim().to_owned()));
        }

        let listed: HashSet<&str> = tasks.iter().map(String::as_str).collect();
        let unlisted = dependencies
            .keys()
            .chain(subtasks.keys())
            .chain(subtasks.values().flatten())
            .find(|task| !listed.contains(task.as_str()));
        if let Some(task) = unlisted {
            return Err(TemplateError::UnknownTask {
                template: template_name,
                task: task.clone(),
            });
        }

        let mut parents: HashMap<&str, &str> = HashMap::new();
        for (parent, children) in &subtasks {
            for child in children {
                if parents.insert(child.as_str(), parent.as_str()).is_some() {
                    return Err(TemplateError::MultipleParents {
                        template: template_name,
                        task: child.clone(),
                    });
                }
            }
        }

        let specs: Vec<TaskSpec> = tasks
            .iter()
            .map(|task| {
                let mut spec = TaskSpec::new(task.as_str())
                    .depends_on(dependencies.remove(task).unwrap_or_default());
                if let Some(parent) = parents.get(task.as_str()) {
                    spec = spec.child_of(*parent);
                }
                spec
            })
            .collect();
        Self::new(template_name, specs)
    }

    /// Returns the document form of this template.
    #[must_use]
    pub fn to_document(&self) -> TemplateDocument {
        let mut document = TemplateDocument::default();
        for spec in &self.tasks {
            document.tasks.push(spec.name.clone());
            if !spec.dependencies.is_empty() {
                document
                    .dependencies
                    .insert(spec.name.clone(), spec.dependencies.clone());
            }
            if let Some(parent) = &spec.parent {
                document
                    .subtasks
                    .entry(parent.clone())
                    .or_default()
                    .push(spec.name.clone());
            }
        }
        document
    }

    /// Returns the template name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the task specs in display order.
    #[must_use]
    pub fn tasks(&self) -> &[TaskSpec] {
        &self.tasks
    }

    /// Looks up a task spec by name.
    #[must_use]
    pub fn task(&self, name: &str) -> Option<&TaskSpec> {
        self.tasks.iter().find(|spec| spec.name == name)
    }

    fn validate(&self) -> Result<(), TemplateError> {
        if self.tasks.is_empty() {
            return Err(TemplateError::EmptyTemplate(self.name.clone()));
        }

        let mut seen: HashSet<&str> = HashSet::new();
        for spec in &self.tasks {
            if !seen.insert(spec.name.as_str()) {
                return Err(TemplateError::DuplicateTask {
                    template: self.name.clone(),
                    task: spec.name.clone(),
                });
            }
        }

        for spec in &self.tasks {
            for dependency in &spec.dependencies {
                if dependency == &spec.name {
                    return Err(TemplateError::SelfDependency {
                        template: self.name.clone(),
                        task: spec.name.clone(),
                    });
                }
                if !seen.contains(dependency.as_str()) {
                    return Err(TemplateError::UnknownDependency {
                        template: self.name.clone(),
                        task: spec.name.clone(),
                        dependency: dependency.clone(),
                    });
                }
            }
            if let Some(parent) = &spec.parent {
                if parent == &spec.name {
                    return Err(TemplateError::ParentCycle {
                        template: self.name.clone(),
                        task: spec.name.clone(),
                    });
                }
                if !seen.contains(parent.as_str()) {
                    return Err(TemplateError::UnknownTask {
                        template: self.name.clone(),
                        task: parent.clone(),
                    });
                }
            }
        }

        self.validate_acyclic()
    }

    fn validate_acyclic(&self) -> Result<(), TemplateError> {
        // Edge direction: prerequisite -> dependent.
        let mut dependencies: DiGraphMap<&str, ()> = DiGraphMap::new();
        // Edge direction: parent -> subtask.
        let mut nesting: DiGraphMap<&str, ()> = DiGraphMap::new();

        for spec in &self.tasks {
            dependencies.add_node(spec.name.as_str());
            nesting.add_node(spec.name.as_str());
        }
        for spec in &self.tasks {
            for dependency in &spec.dependencies {
                dependencies.add_edge(dependency.as_str(), spec.name.as_str(), ());
            }
            if let Some(parent) = &spec.parent {
                nesting.add_edge(parent.as_str(), spec.name.as_str(), ());
            }
        }

        toposort(&dependencies, None).map_err(|cycle| TemplateError::DependencyCycle {
            template: self.name.clone(),
            task: cycle.node_id().to_owned(),
        })?;
        toposort(&nesting, None).map_err(|cycle| TemplateError::ParentCycle {
            template: self.name.clone(),
            task: cycle.node_id().to_owned(),
        })?;
        Ok(())
    }
}

//! Rebuilds projects from their JSON form.
//!
//! Reviving happens in two passes. The first walks the JSON tree, creates
//! every reflection through the variant builder table and reads its fields.
//! Anything that names a reflection by its serialized id (reference targets,
//! group members, the symbol map, file owners) is recorded as deferred work,
//! which runs once the whole tree exists and every old id has a new one.

mod builders;
mod comments;
mod reflections;
mod types;

pub use builders::{ReflectionBuilder, TypeBuilder};

use crate::error::{DeserializeError, DeserializeIssue, DeserializeResult};
use crate::json::{self, JsonObject};
use rustc_hash::FxHashMap;
use serde_json::Value;
use std::cell::RefCell;
use tracing::{debug, warn};
use tsz_docs_models::reflection::VariantTag;
use tsz_docs_models::{
    FileId, ProjectReflection, Reflection, ReflectionId, ReflectionKind, ReflectionSymbolId,
    TraverseProperty, Type, TypeKind,
};

// =============================================================================
// Components
// =============================================================================

/// Value being revived when a component runs.
pub enum Revived<'a> {
    /// A registered reflection; read and write it through the context's project.
    Reflection(ReflectionId),
    Type(&'a mut Type),
}

/// Reads extra keys from serialized objects after the built-in fields.
pub trait DeserializerComponent: 'static {
    /// Higher priorities run first.
    fn priority(&self) -> i32;

    fn supports(&self, revived: &Revived<'_>, obj: &JsonObject) -> bool;

    fn from_object(&self, revived: &mut Revived<'_>, obj: &JsonObject, ctx: &mut DeserializeContext<'_>);
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct DeserializerComponentId(u32);

struct Registered {
    id: DeserializerComponentId,
    component: Box<dyn DeserializerComponent>,
}

// =============================================================================
// Context
// =============================================================================

type Deferred = Box<dyn FnOnce(&mut DeserializeContext<'_>)>;

/// State for reviving one serialized project.
pub struct DeserializeContext<'p> {
    pub project: &'p mut ProjectReflection,
    pub project_root: String,
    active: Vec<ReflectionId>,
    deferred: Vec<Deferred>,
    draining: bool,
    reflection_ids: FxHashMap<u32, ReflectionId>,
    file_ids: FxHashMap<u32, FileId>,
    /// Count of targets stored as serialized ids so far.
    pending_targets: u32,
    issues: Vec<DeserializeIssue>,
}

impl<'p> DeserializeContext<'p> {
    fn new(project: &'p mut ProjectReflection, project_root: &str) -> Self {
        Self {
            project,
            project_root: project_root.to_string(),
            active: Vec::new(),
            deferred: Vec::new(),
            draining: false,
            reflection_ids: FxHashMap::default(),
            file_ids: FxHashMap::default(),
            pending_targets: 0,
            issues: Vec::new(),
        }
    }

    /// Reflection whose fields are currently being read.
    pub fn active_reflection(&self) -> ReflectionId {
        self.active.last().copied().unwrap_or(ReflectionId::PROJECT)
    }

    /// Run `work` after the whole tree has been revived.
    ///
    /// # Panics
    ///
    /// When called from deferred work.
    pub fn defer(&mut self, work: impl FnOnce(&mut DeserializeContext<'_>) + 'static) {
        assert!(!self.draining, "cannot defer work while deferred work is running");
        self.deferred.push(Box::new(work));
    }

    /// New id of the reflection serialized as `old`.
    pub fn reflection_id(&self, old: u32) -> Option<ReflectionId> {
        self.reflection_ids.get(&old).copied()
    }

    /// New id of the file serialized as `old`.
    pub fn file_id(&self, old: u32) -> Option<FileId> {
        self.file_ids.get(&old).copied()
    }

    /// [`Self::reflection_id`], recording an issue when `old` is unknown.
    pub fn expect_reflection(&mut self, old: u32, context: &'static str) -> Option<ReflectionId> {
        let found = self.reflection_id(old);
        if found.is_none() {
            self.report(DeserializeIssue::MissingReflection { old_id: old, context });
        }
        found
    }

    /// Symbol id serialized as `{ sourceFileName, qualifiedName }`.
    pub fn symbol_id(&self, obj: &JsonObject) -> Option<ReflectionSymbolId> {
        Some(ReflectionSymbolId::from_serialized(
            &self.project_root,
            json::str_field(obj, "sourceFileName")?,
            json::str_field(obj, "qualifiedName")?,
        ))
    }

    pub fn report(&mut self, issue: DeserializeIssue) {
        warn!(%issue, "deserialize issue");
        self.issues.push(issue);
    }

    fn record_reflection(&mut self, old: u32, new: ReflectionId) {
        self.reflection_ids.insert(old, new);
    }

    fn drain_deferred(&mut self) {
        self.draining = true;
        let work = std::mem::take(&mut self.deferred);
        for job in work {
            job(self);
        }
        self.draining = false;
    }
}

// =============================================================================
// Deserializer
// =============================================================================

pub struct Deserializer {
    components: Vec<Registered>,
    next_component: u32,
    reflection_builders: FxHashMap<VariantTag, ReflectionBuilder>,
    type_builders: FxHashMap<TypeKind, TypeBuilder>,
    issues: RefCell<Vec<DeserializeIssue>>,
}

impl Default for Deserializer {
    fn default() -> Self {
        Self::new()
    }
}

impl Deserializer {
    pub fn new() -> Self {
        Self {
            components: Vec::new(),
            next_component: 0,
            reflection_builders: builders::reflection_builders(),
            type_builders: builders::type_builders(),
            issues: RefCell::new(Vec::new()),
        }
    }

    pub fn add_deserializer<C: DeserializerComponent>(&mut self, component: C) -> DeserializerComponentId {
        let id = DeserializerComponentId(self.next_component);
        self.next_component += 1;
        self.components.push(Registered {
            id,
            component: Box::new(component),
        });
        self.components
            .sort_by_key(|r| std::cmp::Reverse(r.component.priority()));
        id
    }

    pub fn remove_deserializer(&mut self, id: DeserializerComponentId) -> bool {
        let before = self.components.len();
        self.components.retain(|r| r.id != id);
        self.components.len() != before
    }

    /// Replace how reflections of one variant are constructed.
    pub fn set_reflection_builder(&mut self, tag: VariantTag, builder: ReflectionBuilder) {
        self.reflection_builders.insert(tag, builder);
    }

    /// Replace how types of one kind are constructed.
    pub fn set_type_builder(&mut self, kind: TypeKind, builder: TypeBuilder) {
        self.type_builders.insert(kind, builder);
    }

    /// Issues recorded since the last [`Self::take_issues`].
    pub fn issues(&self) -> Vec<DeserializeIssue> {
        self.issues.borrow().clone()
    }

    pub fn take_issues(&self) -> Vec<DeserializeIssue> {
        std::mem::take(&mut *self.issues.borrow_mut())
    }

    // -------------------------------------------------------------------------
    // Entry points
    // -------------------------------------------------------------------------

    /// Revive a single serialized project. `name` overrides the serialized
    /// project name.
    pub fn revive_project(
        &self,
        value: &Value,
        name: Option<&str>,
        project_root: &str,
    ) -> DeserializeResult<ProjectReflection> {
        self.revive_project_with_id_map(value, name, project_root)
            .map(|(project, _)| project)
    }

    /// Like [`Self::revive_project`], also returning the mapping from
    /// serialized reflection ids to the new ones.
    pub fn revive_project_with_id_map(
        &self,
        value: &Value,
        name: Option<&str>,
        project_root: &str,
    ) -> DeserializeResult<(ProjectReflection, FxHashMap<u32, ReflectionId>)> {
        let obj = project_object(value)?;
        let name = name
            .or_else(|| json::str_field(obj, "name"))
            .unwrap_or_default();
        let mut project = ProjectReflection::new(name);
        let ids = self.revive_into(&mut project, ReflectionId::PROJECT, obj, project_root);
        debug!(
            project = project.name(),
            reflections = project.reflection_count(),
            "project revived"
        );
        Ok((project, ids))
    }

    /// Revive a project from JSON text.
    pub fn revive_project_str(
        &self,
        text: &str,
        name: Option<&str>,
        project_root: &str,
    ) -> DeserializeResult<ProjectReflection> {
        let value: Value = serde_json::from_str(text)?;
        self.revive_project(&value, name, project_root)
    }

    /// Merge several serialized projects into one. Each becomes a module
    /// child of the new project, in input order.
    pub fn revive_projects(
        &self,
        name: &str,
        values: &[Value],
        project_root: &str,
    ) -> DeserializeResult<ProjectReflection> {
        let objects = values
            .iter()
            .map(project_object)
            .collect::<DeserializeResult<Vec<_>>>()?;

        let mut project = ProjectReflection::new(name);
        for obj in objects {
            let module_name = json::str_field(obj, "name").unwrap_or_default();
            let module = project.add_reflection(
                ReflectionId::PROJECT,
                TraverseProperty::Children,
                Reflection::declaration(module_name, ReflectionKind::MODULE),
            );
            self.revive_into(&mut project, module, obj, project_root);
        }
        debug!(
            project = project.name(),
            merged = values.len(),
            reflections = project.reflection_count(),
            "projects merged"
        );
        Ok(project)
    }

    /// Read the serialized project `obj` into `target`, which is either the
    /// project root or a module standing in for it.
    fn revive_into(
        &self,
        project: &mut ProjectReflection,
        target: ReflectionId,
        obj: &JsonObject,
        project_root: &str,
    ) -> FxHashMap<u32, ReflectionId> {
        let mut ctx = DeserializeContext::new(project, project_root);
        if let Some(old) = json::u32_field(obj, "id") {
            ctx.record_reflection(old, target);
        }
        // File ids appear in comments throughout the tree, so the registry
        // entries are read first.
        reflections::read_file_entries(obj, &mut ctx);
        self.from_object(Revived::Reflection(target), obj, &mut ctx);
        reflections::read_project_maps(obj, &mut ctx);
        ctx.drain_deferred();

        self.issues.borrow_mut().append(&mut ctx.issues);
        ctx.reflection_ids
    }

    // -------------------------------------------------------------------------
    // Tree pass
    // -------------------------------------------------------------------------

    /// Read `obj` into an existing value: built-in fields first, then every
    /// supporting component.
    pub fn from_object(&self, mut revived: Revived<'_>, obj: &JsonObject, ctx: &mut DeserializeContext<'_>) {
        let reflection = match revived {
            Revived::Reflection(id) => Some(id),
            Revived::Type(_) => None,
        };
        if let Some(id) = reflection {
            ctx.active.push(id);
            reflections::read_reflection(self, id, obj, ctx);
        }

        for registered in &self.components {
            if registered.component.supports(&revived, obj) {
                registered.component.from_object(&mut revived, obj, ctx);
            }
        }

        if reflection.is_some() {
            ctx.active.pop();
        }
    }

    /// Create, register and read the reflection serialized as `obj` under the
    /// active reflection.
    pub fn construct_reflection(
        &self,
        obj: &JsonObject,
        role: TraverseProperty,
        ctx: &mut DeserializeContext<'_>,
    ) -> Option<ReflectionId> {
        let variant = json::str_field(obj, "variant").unwrap_or_default();
        let Some(tag) = VariantTag::parse(variant) else {
            ctx.report(DeserializeIssue::UnknownVariant {
                variant: variant.to_string(),
            });
            return None;
        };
        let Some(builder) = self.reflection_builders.get(&tag) else {
            ctx.report(DeserializeIssue::MisplacedVariant {
                variant: variant.to_string(),
            });
            return None;
        };
        let reflection = builder(obj, ctx);

        let parent = ctx.active_reflection();
        let id = ctx.project.add_reflection(parent, role, reflection);
        if let Some(old) = json::u32_field(obj, "id") {
            ctx.record_reflection(old, id);
        }
        self.from_object(Revived::Reflection(id), obj, ctx);
        Some(id)
    }

    /// Create and read the type serialized as `obj`.
    pub fn construct_type(&self, obj: &JsonObject, ctx: &mut DeserializeContext<'_>) -> Option<Type> {
        let tag = json::str_field(obj, "type").unwrap_or_default();
        let Some(builder) = TypeKind::from_tag(tag).and_then(|kind| self.type_builders.get(&kind)) else {
            ctx.report(DeserializeIssue::UnknownTypeKind {
                kind: tag.to_string(),
            });
            return None;
        };
        let mut ty = builder(self, obj, ctx)?;
        self.from_object(Revived::Type(&mut ty), obj, ctx);
        Some(ty)
    }

    /// [`Self::construct_type`] for the object stored at `key`, if any.
    pub fn type_field(&self, obj: &JsonObject, key: &str, ctx: &mut DeserializeContext<'_>) -> Option<Type> {
        json::object_field(obj, key).and_then(|value| self.construct_type(value, ctx))
    }

    /// Every type in the array stored at `key`.
    pub fn type_list(&self, obj: &JsonObject, key: &str, ctx: &mut DeserializeContext<'_>) -> Vec<Type> {
        json::objects(obj, key)
            .filter_map(|value| self.construct_type(value, ctx))
            .collect()
    }
}

fn project_object(value: &Value) -> DeserializeResult<&JsonObject> {
    match value.as_object() {
        Some(obj) if json::str_field(obj, "variant") == Some(VariantTag::Project.as_str()) => Ok(obj),
        Some(_) => Err(DeserializeError::NotAProject {
            found: format!(
                "variant {}",
                value.get("variant").map_or("(none)".to_string(), ToString::to_string)
            ),
        }),
        None => Err(DeserializeError::NotAProject {
            found: json::describe(value).to_string(),
        }),
    }
}

#[cfg(test)]
#[path = "../../tests/deserializer_tests.rs"]
mod tests;

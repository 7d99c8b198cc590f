//! Component-based JSON serializer.
//!
//! Output is built by folding an object through every component registered
//! for the value's Rust type. Components run in descending priority order and
//! each receives the object produced by the ones before it, so a low-priority
//! component can rely on (and overwrite) keys written by the built-ins.
//!
//! ```
//! use tsz_docs_models::ProjectReflection;
//! use tsz_docs_serialization::Serializer;
//!
//! let project = ProjectReflection::new("demo");
//! let json = Serializer::new().project_to_object(&project, "/repo");
//! assert_eq!(json["name"], "demo");
//! assert_eq!(json["variant"], "project");
//! ```

mod comments;
mod components;
mod events;
mod types;

pub use comments::SourceReferenceWrapper;
pub use components::{BUILTIN_PRIORITY, CONTAINER_PRIORITY, REFLECTION_PRIORITY, VARIANT_PRIORITY};
pub use events::{ListenerId, SerializeEvent};

use crate::json::JsonObject;
use events::Listeners;
use rustc_hash::FxHashMap;
use serde_json::Value;
use std::any::{Any, TypeId};
use tracing::{debug, trace};
use tsz_docs_models::{ProjectReflection, Reflection, ReflectionId};

// =============================================================================
// Components
// =============================================================================

/// Contributes keys to the serialized form of one kind of value.
pub trait SerializerComponent: 'static {
    type Item: 'static;

    /// Higher priorities run first.
    fn priority(&self) -> i32;

    fn supports(&self, _item: &Self::Item) -> bool {
        true
    }

    fn to_object(&self, item: &Self::Item, obj: JsonObject, ctx: &SerializeContext<'_>) -> JsonObject;
}

/// Handle returned by [`Serializer::add_serializer`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct ComponentId(u32);

trait ErasedComponent {
    fn priority(&self) -> i32;
    fn supports(&self, item: &dyn Any) -> bool;
    fn to_object(&self, item: &dyn Any, obj: JsonObject, ctx: &SerializeContext<'_>) -> JsonObject;
}

impl<C: SerializerComponent> ErasedComponent for C {
    fn priority(&self) -> i32 {
        SerializerComponent::priority(self)
    }

    fn supports(&self, item: &dyn Any) -> bool {
        item.downcast_ref::<C::Item>()
            .is_some_and(|item| SerializerComponent::supports(self, item))
    }

    fn to_object(&self, item: &dyn Any, obj: JsonObject, ctx: &SerializeContext<'_>) -> JsonObject {
        match item.downcast_ref::<C::Item>() {
            Some(item) => SerializerComponent::to_object(self, item, obj, ctx),
            None => obj,
        }
    }
}

struct Registered {
    id: ComponentId,
    component: Box<dyn ErasedComponent>,
}

// =============================================================================
// Serializer
// =============================================================================

pub struct Serializer {
    /// Components grouped by the type they serialize, highest priority first.
    groups: FxHashMap<TypeId, Vec<Registered>>,
    next_component: u32,
    listeners: Listeners,
}

impl Default for Serializer {
    fn default() -> Self {
        Self::new()
    }
}

impl Serializer {
    /// Serializer with the built-in components for every model type.
    pub fn new() -> Self {
        let mut serializer = Self::empty();
        components::register_builtins(&mut serializer);
        types::register_builtins(&mut serializer);
        comments::register_builtins(&mut serializer);
        serializer
    }

    /// Serializer without any components.
    pub fn empty() -> Self {
        Self {
            groups: FxHashMap::default(),
            next_component: 0,
            listeners: Listeners::default(),
        }
    }

    /// Register `component`. Components of equal priority run in
    /// registration order.
    pub fn add_serializer<C: SerializerComponent>(&mut self, component: C) -> ComponentId {
        let id = ComponentId(self.next_component);
        self.next_component += 1;
        let group = self.groups.entry(TypeId::of::<C::Item>()).or_default();
        group.push(Registered {
            id,
            component: Box::new(component),
        });
        // Stable sort keeps registration order among equal priorities.
        group.sort_by_key(|r| std::cmp::Reverse(r.component.priority()));
        trace!(component = id.0, item = std::any::type_name::<C::Item>(), "serializer component added");
        id
    }

    /// Unregister a component. Returns false if `id` is unknown.
    pub fn remove_serializer(&mut self, id: ComponentId) -> bool {
        for group in self.groups.values_mut() {
            if let Some(index) = group.iter().position(|r| r.id == id) {
                group.remove(index);
                return true;
            }
        }
        false
    }

    /// Serialize any value with a registered component group.
    ///
    /// Values without a group serialize to an empty object.
    pub fn to_object<T: 'static>(&self, item: &T, ctx: &SerializeContext<'_>) -> JsonObject {
        let Some(group) = self.groups.get(&TypeId::of::<T>()) else {
            return JsonObject::new();
        };
        let item: &dyn Any = item;
        let matching: Vec<&Registered> = group.iter().filter(|r| r.component.supports(item)).collect();
        matching
            .into_iter()
            .fold(JsonObject::new(), |obj, r| r.component.to_object(item, obj, ctx))
    }

    /// Serialize a whole project, firing begin and end events around it.
    pub fn project_to_object(&self, project: &ProjectReflection, project_root: &str) -> JsonObject {
        let event = SerializeEvent {
            project,
            project_root,
        };
        self.listeners.fire_begin(&event);

        let ctx = SerializeContext {
            serializer: self,
            project,
            project_root,
        };
        let mut output = self.to_object(project.root(), &ctx);

        self.listeners.fire_end(&event, &mut output);
        debug!(
            project = project.name(),
            reflections = project.reflection_count(),
            "project serialized"
        );
        output
    }

    /// [`Self::project_to_object`] rendered as JSON text.
    pub fn project_to_string(
        &self,
        project: &ProjectReflection,
        project_root: &str,
        pretty: bool,
    ) -> serde_json::Result<String> {
        let value = Value::Object(self.project_to_object(project, project_root));
        if pretty {
            serde_json::to_string_pretty(&value)
        } else {
            serde_json::to_string(&value)
        }
    }

    /// Listen for the start of [`Self::project_to_object`].
    pub fn on_begin(
        &mut self,
        priority: i32,
        listener: impl Fn(&SerializeEvent<'_>) + 'static,
    ) -> ListenerId {
        self.listeners.add_begin(priority, Box::new(listener))
    }

    /// Listen for the end of [`Self::project_to_object`]; the listener may
    /// edit the finished output.
    pub fn on_end(
        &mut self,
        priority: i32,
        listener: impl Fn(&SerializeEvent<'_>, &mut JsonObject) + 'static,
    ) -> ListenerId {
        self.listeners.add_end(priority, Box::new(listener))
    }

    pub fn off(&mut self, id: ListenerId) -> bool {
        self.listeners.remove(id)
    }
}

// =============================================================================
// SerializeContext
// =============================================================================

/// State shared by every component during one serialization pass.
#[derive(Clone, Copy)]
pub struct SerializeContext<'a> {
    pub serializer: &'a Serializer,
    pub project: &'a ProjectReflection,
    /// Paths are written relative to this directory.
    pub project_root: &'a str,
}

impl SerializeContext<'_> {
    pub fn to_object<T: 'static>(&self, item: &T) -> JsonObject {
        self.serializer.to_object(item, self)
    }

    pub fn to_value<T: 'static>(&self, item: &T) -> Value {
        Value::Object(self.to_object(item))
    }

    pub fn to_array<'i, T: 'static>(&self, items: impl IntoIterator<Item = &'i T>) -> Vec<Value> {
        items.into_iter().map(|item| self.to_value(item)).collect()
    }

    /// Serialized form of the reflection `id`, if it is still registered.
    pub fn reflection(&self, id: ReflectionId) -> Option<Value> {
        self.project
            .get_reflection_by_id(id)
            .map(|reflection: &Reflection| self.to_value(reflection))
    }

    /// Serialized reflections for `ids`, skipping any that were removed.
    pub fn reflections(&self, ids: &[ReflectionId]) -> Vec<Value> {
        ids.iter().filter_map(|id| self.reflection(*id)).collect()
    }

    /// `ids` that still name registered reflections, as JSON numbers.
    pub fn live_ids(&self, ids: &[ReflectionId]) -> Vec<Value> {
        ids.iter()
            .filter(|id| self.project.get_reflection_by_id(**id).is_some())
            .map(|id| Value::from(id.0))
            .collect()
    }
}

#[cfg(test)]
#[path = "../../tests/serializer_tests.rs"]
mod tests;

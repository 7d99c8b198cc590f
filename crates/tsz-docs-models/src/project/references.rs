//! Reference resolution and the reference graph.

use super::ProjectReflection;
use crate::reflection::ReferenceTarget;
use crate::types::{ReferenceType, ReferenceTypeTarget};
use rustc_hash::FxHashMap;
use tracing::trace;
use tsz_docs_common::ReflectionId;
use tsz_docs_common::limits::MAX_REFERENCE_CHAIN_DEPTH;

impl ProjectReflection {
    /// Target of the reference reflection `id`.
    ///
    /// Targets given by name are resolved on first access and the outcome is
    /// kept, successful or not.
    pub fn reference_target(&self, id: ReflectionId) -> Option<ReflectionId> {
        let target = self.reflections.get(&id)?.as_reference()?.target();
        target
            .resolve_with(|name| self.find_by_full_name(name, id))
            .filter(|target| self.reflections.contains_key(target))
    }

    /// Follow reference reflections until a non-reference is reached.
    pub fn reference_target_deep(&self, id: ReflectionId) -> Option<ReflectionId> {
        let mut current = self.reference_target(id)?;
        for _ in 0..MAX_REFERENCE_CHAIN_DEPTH {
            if !self.reflections.get(&current)?.is_reference() {
                return Some(current);
            }
            current = self.reference_target(current)?;
        }
        trace!(id = id.0, "reference chain too deep");
        None
    }

    /// Replace the target of the reference reflection `id`.
    pub fn mark_reference_target(&mut self, id: ReflectionId, target: ReferenceTarget) {
        if let Some(slot) = self
            .reflections
            .get_mut(&id)
            .and_then(|r| r.reference_target_mut())
        {
            *slot = target;
            self.reference_graph = None;
        }
    }

    /// Reflection a [`ReferenceType`] points at.
    ///
    /// A symbol target that resolves is replaced by the reflection id, so
    /// resolving again returns the same reflection without a lookup.
    pub fn resolve_reference_type(&self, reference: &ReferenceType) -> Option<ReflectionId> {
        match reference.target() {
            ReferenceTypeTarget::Reflection(id) => self.reflections.contains_key(&id).then_some(id),
            ReferenceTypeTarget::Symbol(symbol_id) => {
                let resolved = self.get_reflection_from_symbol_id(&symbol_id)?.id();
                reference.memoize_resolved(resolved);
                Some(resolved)
            }
            ReferenceTypeTarget::Pending(_) | ReferenceTypeTarget::Broken => None,
        }
    }

    /// Reference reflections whose target is `target`, in id order.
    pub fn referencing(&mut self, target: ReflectionId) -> Vec<ReflectionId> {
        if self.reference_graph.is_none() {
            self.reference_graph = Some(self.build_reference_graph());
        }
        self.reference_graph
            .as_ref()
            .and_then(|graph| graph.get(&target))
            .cloned()
            .unwrap_or_default()
    }

    fn build_reference_graph(&self) -> FxHashMap<ReflectionId, Vec<ReflectionId>> {
        let mut graph: FxHashMap<ReflectionId, Vec<ReflectionId>> = FxHashMap::default();
        for reflection in self.reflections() {
            if reflection.is_reference()
                && let Some(target) = self.reference_target(reflection.id())
            {
                graph.entry(target).or_default().push(reflection.id());
            }
        }
        graph
    }

    /// Non-reference reflection whose dotted full name is `name`.
    fn find_by_full_name(&self, name: &str, exclude: ReflectionId) -> Option<ReflectionId> {
        self.reflections()
            .into_iter()
            .filter(|r| r.id() != exclude && !r.is_reference() && !r.is_project())
            .find(|r| self.full_name(r.id(), ".").as_deref() == Some(name))
            .map(|r| r.id())
    }
}

//! The project registry.
//!
//! [`ProjectReflection`] is the root of a documentation tree and the arena that
//! owns every reflection in it. It also maintains the indexes derived from the
//! tree:
//!
//! - symbol id to reflection ids (one symbol may document several reflections)
//!   and the inverse map,
//! - parent id to child ids, used by cascading removal,
//! - the lazily built reference graph (target id to reference reflections),
//! - the [`FileRegistry`].
//!
//! All structural mutation goes through this type so that every index stays in
//! step with the tree.

mod names;
mod references;

use crate::reflection::{Reflection, TraverseProperty};
use crate::types::Type;
use rustc_hash::{FxHashMap, FxHashSet};
use smallvec::SmallVec;
use std::ops::ControlFlow;
use tracing::{debug, trace};
use tsz_docs_common::{
    CompilerSymbol, FileRegistry, ReflectionId, ReflectionIdAllocator, ReflectionKind,
    ReflectionSymbolId,
};

type ReflectionIds = SmallVec<[ReflectionId; 1]>;

#[derive(Debug)]
pub struct ProjectReflection {
    reflections: FxHashMap<ReflectionId, Reflection>,
    ids: ReflectionIdAllocator,
    symbol_to_reflection_ids: FxHashMap<ReflectionSymbolId, ReflectionIds>,
    reflection_id_to_symbol_id: FxHashMap<ReflectionId, ReflectionSymbolId>,
    reflection_children: FxHashMap<ReflectionId, Vec<ReflectionId>>,
    reference_graph: Option<FxHashMap<ReflectionId, Vec<ReflectionId>>>,
    pub files: FileRegistry,
}

impl ProjectReflection {
    pub fn new(name: impl Into<String>) -> Self {
        let mut ids = ReflectionIdAllocator::new();
        let root_id = ids.alloc();
        debug_assert!(root_id.is_project());

        let mut reflections = FxHashMap::default();
        reflections.insert(root_id, Reflection::project(name));
        Self {
            reflections,
            ids,
            symbol_to_reflection_ids: FxHashMap::default(),
            reflection_id_to_symbol_id: FxHashMap::default(),
            reflection_children: FxHashMap::default(),
            reference_graph: None,
            files: FileRegistry::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.root().name
    }

    pub fn root(&self) -> &Reflection {
        &self.reflections[&ReflectionId::PROJECT]
    }

    pub fn root_mut(&mut self) -> &mut Reflection {
        self.reflections
            .get_mut(&ReflectionId::PROJECT)
            .expect("project root is always registered")
    }

    /// Number of registered reflections, including the root.
    pub fn reflection_count(&self) -> usize {
        self.reflections.len()
    }

    /// Id the next registered reflection will receive.
    pub fn next_id(&self) -> ReflectionId {
        self.ids.peek()
    }

    pub fn get_reflection_by_id(&self, id: ReflectionId) -> Option<&Reflection> {
        self.reflections.get(&id)
    }

    /// Mutable access to non-structural fields of a reflection.
    pub fn reflection_mut(&mut self, id: ReflectionId) -> Option<&mut Reflection> {
        self.reference_graph = None;
        self.reflections.get_mut(&id)
    }

    /// All reflections in id order.
    pub fn reflections(&self) -> Vec<&Reflection> {
        let mut out: Vec<&Reflection> = self.reflections.values().collect();
        out.sort_unstable_by_key(|r| r.id());
        out
    }

    pub fn get_reflections_by_kind(&self, kind: ReflectionKind) -> Vec<&Reflection> {
        let mut out: Vec<&Reflection> = self
            .reflections
            .values()
            .filter(|r| r.kind_of(kind))
            .collect();
        out.sort_unstable_by_key(|r| r.id());
        out
    }

    /// Children of `parent` as recorded by the registry, in registration order.
    pub fn registered_children(&self, parent: ReflectionId) -> &[ReflectionId] {
        self.reflection_children
            .get(&parent)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Find a descendant of `from` by following container children by name.
    pub fn get_child_by_name(&self, from: ReflectionId, path: &[&str]) -> Option<ReflectionId> {
        let mut current = from;
        for name in path {
            let container = self.reflections.get(&current)?.container()?;
            current = container
                .children()
                .iter()
                .copied()
                .find(|id| self.reflections.get(id).is_some_and(|r| r.name == *name))?;
        }
        Some(current)
    }

    // =========================================================================
    // Registration
    // =========================================================================

    /// Register `reflection` as a child of `parent` in the slot for `role`.
    ///
    /// For [`TraverseProperty::TypeLiteral`] the parent is left untouched; the
    /// caller points the parent's type at the new id with [`Self::set_type`].
    ///
    /// # Panics
    ///
    /// When `parent` is not registered or has no slot for `role`.
    pub fn add_reflection(
        &mut self,
        parent: ReflectionId,
        role: TraverseProperty,
        mut reflection: Reflection,
    ) -> ReflectionId {
        assert!(
            !reflection.is_project(),
            "a project reflection cannot be nested"
        );
        let id = self.ids.peek();
        let Some(parent_reflection) = self.reflections.get_mut(&parent) else {
            panic!("parent reflection {parent} is not registered");
        };
        parent_reflection.attach(id, role);
        let allocated = self.ids.alloc();
        debug_assert_eq!(allocated, id);

        reflection.set_registered(id, Some(parent));
        trace!(
            id = id.0,
            parent = parent.0,
            name = %reflection.name,
            role = ?role,
            "reflection registered"
        );
        self.reflection_children.entry(parent).or_default().push(id);
        self.reflections.insert(id, reflection);
        self.reference_graph = None;
        id
    }

    /// Register a reflection created for a compiler symbol and, optionally, a
    /// file it owns.
    pub fn register_reflection(
        &mut self,
        parent: ReflectionId,
        role: TraverseProperty,
        reflection: Reflection,
        symbol: Option<&dyn CompilerSymbol>,
        file_path: Option<&str>,
    ) -> ReflectionId {
        let id = self.add_reflection(parent, role, reflection);
        if let Some(symbol) = symbol {
            self.register_symbol(id, symbol);
        }
        if let Some(path) = file_path {
            self.files.register_reflection(path, id);
        }
        id
    }

    /// Index `id` under the identity of `symbol`.
    ///
    /// Inherited class and interface members share their symbol with the
    /// declaring member. When such a member is registered under a parent other
    /// than the ones already indexed, the entry list is narrowed to the
    /// members that live directly in a reflection of the declaring symbol
    /// before the new id is appended.
    pub fn register_symbol(&mut self, id: ReflectionId, symbol: &dyn CompilerSymbol) {
        let symbol_id = symbol.symbol_id();
        let Some(reflection) = self.reflections.get(&id) else {
            return;
        };
        let parent = reflection.parent();

        if reflection.kind_of(ReflectionKind::CLASS_MEMBER)
            && let Some(existing) = self.symbol_to_reflection_ids.get(&symbol_id)
            && existing
                .iter()
                .any(|other| self.parent_of(*other) != parent)
            && let Some(declaring) = symbol
                .parent_symbol_id()
                .and_then(|p| self.symbol_to_reflection_ids.get(&p))
        {
            let narrowed: ReflectionIds = existing
                .iter()
                .copied()
                .filter(|other| {
                    self.parent_of(*other)
                        .is_some_and(|p| declaring.contains(&p))
                })
                .collect();
            debug!(
                symbol = ?symbol_id,
                before = existing.len(),
                after = narrowed.len(),
                "narrowed inherited member symbol entries"
            );
            self.symbol_to_reflection_ids
                .insert(symbol_id.clone(), narrowed);
        }

        self.register_symbol_id(id, symbol_id);
    }

    /// Plain index insertion without inherited-member narrowing.
    pub fn register_symbol_id(&mut self, id: ReflectionId, symbol_id: ReflectionSymbolId) {
        let ids = self
            .symbol_to_reflection_ids
            .entry(symbol_id.clone())
            .or_default();
        if !ids.contains(&id) {
            ids.push(id);
        }
        self.reflection_id_to_symbol_id.insert(id, symbol_id);
        self.reference_graph = None;
    }

    /// Replace the `type` of a declaration, signature or parameter (the
    /// constraint of a type parameter).
    ///
    /// Type-literal declarations owned by the old type and not by the new one
    /// are removed.
    ///
    /// # Panics
    ///
    /// When `id` is not registered or its variant carries no type.
    pub fn set_type(&mut self, id: ReflectionId, ty: Option<Type>) {
        let Some(reflection) = self.reflections.get_mut(&id) else {
            panic!("reflection {id} is not registered");
        };
        let tag = reflection.variant_tag();
        let Some(slot) = reflection.type_slot_mut() else {
            panic!("{} reflection {id} has no type", tag.as_str());
        };
        let old = std::mem::replace(slot, ty);
        let kept = slot
            .as_ref()
            .map(Type::reflection_declarations)
            .unwrap_or_default();
        debug_assert!(
            kept.iter().all(|d| self.parent_of(*d) == Some(id)),
            "type literal declarations must be registered under {id}"
        );

        for declaration in old
            .as_ref()
            .map(Type::reflection_declarations)
            .unwrap_or_default()
        {
            if !kept.contains(&declaration) && self.parent_of(declaration) == Some(id) {
                self.remove_reflection(declaration);
            }
        }
        self.reference_graph = None;
    }

    /// Move `id` under `new_parent`.
    pub fn reparent(&mut self, id: ReflectionId, new_parent: ReflectionId, role: TraverseProperty) {
        assert!(!id.is_project(), "the project root cannot be moved");
        let Some(old_parent) = self.parent_of(id) else {
            return;
        };
        let old_role = self.role_in_parent(id);
        if let Some(parent) = self.reflections.get_mut(&old_parent)
            && let Some(old_role) = old_role
        {
            parent.detach(id, old_role);
        }
        if let Some(children) = self.reflection_children.get_mut(&old_parent) {
            children.retain(|c| *c != id);
        }

        let Some(parent) = self.reflections.get_mut(&new_parent) else {
            panic!("parent reflection {new_parent} is not registered");
        };
        parent.attach(id, role);
        if let Some(reflection) = self.reflections.get_mut(&id) {
            reflection.set_parent(new_parent);
        }
        self.reflection_children.entry(new_parent).or_default().push(id);
        self.reference_graph = None;
    }

    // =========================================================================
    // Removal
    // =========================================================================

    /// Remove `id` and everything that only exists because of it.
    ///
    /// Cascades into registered children that are still parented here and into
    /// reference reflections that target `id`, drops every index entry, and
    /// unlinks `id` from its parent's structural slot, groups and categories.
    pub fn remove_reflection(&mut self, id: ReflectionId) {
        assert!(!id.is_project(), "the project root cannot be removed");
        let mut removing = FxHashSet::default();
        self.remove_tracked(id, &mut removing);
    }

    /// `removing` holds every id whose removal has started, so reference
    /// cycles terminate.
    fn remove_tracked(&mut self, id: ReflectionId, removing: &mut FxHashSet<ReflectionId>) {
        if !self.reflections.contains_key(&id) || !removing.insert(id) {
            return;
        }
        debug!(id = id.0, "removing reflection");

        let children = self.reflection_children.remove(&id).unwrap_or_default();
        for child in children {
            if self.parent_of(child) == Some(id) {
                self.remove_tracked(child, removing);
            }
        }

        for reference in self.referencing(id) {
            trace!(id = reference.0, target = id.0, "removing dangling reference");
            self.remove_tracked(reference, removing);
        }

        if let Some(symbol_id) = self.reflection_id_to_symbol_id.remove(&id)
            && let Some(ids) = self.symbol_to_reflection_ids.get_mut(&symbol_id)
        {
            ids.retain(|other| *other != id);
            if ids.is_empty() {
                self.symbol_to_reflection_ids.remove(&symbol_id);
            }
        }
        self.files.remove_reflection(id);

        // Type literals that shared a replaced type with `id`.
        let mut orphans = Vec::new();
        if let Some(parent) = self.parent_of(id) {
            let role = self.role_in_parent(id);
            if let Some(parent_reflection) = self.reflections.get_mut(&parent) {
                match role {
                    Some(TraverseProperty::TypeLiteral) => {
                        let before = type_literals(parent_reflection);
                        parent_reflection.detach(id, TraverseProperty::TypeLiteral);
                        let after = type_literals(parent_reflection);
                        orphans.extend(before.into_iter().filter(|d| *d != id && !after.contains(d)));
                    }
                    Some(role) => parent_reflection.detach(id, role),
                    // Not in a slot any more; still drop group memberships.
                    None => parent_reflection.detach(id, TraverseProperty::Children),
                }
            }
            if let Some(siblings) = self.reflection_children.get_mut(&parent) {
                siblings.retain(|c| *c != id);
            }
            orphans.retain(|d| self.parent_of(*d) == Some(parent));
        }

        self.reflections.remove(&id);
        self.reference_graph = None;

        for orphan in orphans {
            trace!(id = orphan.0, "removing type literal with no remaining type");
            self.remove_tracked(orphan, removing);
        }
    }

    // =========================================================================
    // Symbol lookups
    // =========================================================================

    pub fn get_reflections_from_symbol_id(&self, symbol_id: &ReflectionSymbolId) -> Vec<&Reflection> {
        self.symbol_to_reflection_ids
            .get(symbol_id)
            .into_iter()
            .flatten()
            .filter_map(|id| self.reflections.get(id))
            .collect()
    }

    /// First reflection documenting `symbol_id`, preferring anything over a
    /// reference reflection.
    pub fn get_reflection_from_symbol_id(&self, symbol_id: &ReflectionSymbolId) -> Option<&Reflection> {
        let candidates = self.get_reflections_from_symbol_id(symbol_id);
        candidates
            .iter()
            .find(|r| !r.is_reference())
            .or_else(|| candidates.first())
            .copied()
    }

    pub fn get_reflection_from_symbol(&self, symbol: &dyn CompilerSymbol) -> Option<&Reflection> {
        self.get_reflection_from_symbol_id(&symbol.symbol_id())
    }

    /// Reflection for `symbol_id` whose parent is `parent`.
    ///
    /// Falls back to scanning `parent`'s registered children, so members whose
    /// entry was narrowed out of the symbol index are still found.
    pub fn get_reflection_from_symbol_in_parent(
        &self,
        symbol_id: &ReflectionSymbolId,
        parent: ReflectionId,
    ) -> Option<ReflectionId> {
        let indexed = self
            .symbol_to_reflection_ids
            .get(symbol_id)
            .and_then(|ids| {
                ids.iter()
                    .copied()
                    .find(|id| self.parent_of(*id) == Some(parent))
            });
        indexed.or_else(|| {
            self.registered_children(parent)
                .iter()
                .copied()
                .find(|child| self.reflection_id_to_symbol_id.get(child) == Some(symbol_id))
        })
    }

    pub fn get_symbol_id_from_reflection(&self, id: ReflectionId) -> Option<&ReflectionSymbolId> {
        self.reflection_id_to_symbol_id.get(&id)
    }

    /// Every `(reflection, symbol id)` mapping in reflection id order.
    pub fn symbol_id_map(&self) -> Vec<(ReflectionId, &ReflectionSymbolId)> {
        let mut out: Vec<_> = self
            .reflection_id_to_symbol_id
            .iter()
            .map(|(id, symbol)| (*id, symbol))
            .collect();
        out.sort_unstable_by_key(|(id, _)| *id);
        out
    }

    // =========================================================================
    // Helpers
    // =========================================================================

    fn parent_of(&self, id: ReflectionId) -> Option<ReflectionId> {
        self.reflections.get(&id).and_then(Reflection::parent)
    }

    /// Structural role `id` plays in its parent, if it still occupies a slot.
    fn role_in_parent(&self, id: ReflectionId) -> Option<TraverseProperty> {
        let parent = self.reflections.get(&self.parent_of(id)?)?;
        let mut found = None;
        let _ = parent.traverse(|child, role| {
            if child == id {
                found = Some(role);
                ControlFlow::Break(())
            } else {
                ControlFlow::Continue(())
            }
        });
        found
    }
}

fn type_literals(reflection: &Reflection) -> Vec<ReflectionId> {
    reflection
        .types()
        .into_iter()
        .flat_map(Type::reflection_declarations)
        .collect()
}

#[cfg(test)]
#[path = "../../tests/project_tests.rs"]
mod tests;

//! Full names, friendly names and URL aliases.

use super::ProjectReflection;
use crate::reflection::Reflection;
use tsz_docs_common::limits::MAX_PARENT_DEPTH;
use tsz_docs_common::{ReflectionId, ReflectionKind};

impl ProjectReflection {
    /// Ancestor chain of `id`, nearest first, excluding `id` itself.
    fn ancestors(&self, id: ReflectionId) -> impl Iterator<Item = &Reflection> {
        let mut next = self.reflections.get(&id).and_then(Reflection::parent);
        std::iter::from_fn(move || {
            let reflection = self.reflections.get(&next?)?;
            next = reflection.parent();
            Some(reflection)
        })
        .take(MAX_PARENT_DEPTH as usize)
    }

    /// Names from the outermost non-project ancestor down to `id`.
    fn name_path(&self, id: ReflectionId, skip: ReflectionKind) -> Option<Vec<&str>> {
        let reflection = self.reflections.get(&id)?;
        if reflection.is_project() {
            return Some(vec![reflection.name.as_str()]);
        }
        let mut names: Vec<&str> = std::iter::once(reflection)
            .chain(self.ancestors(id))
            .take_while(|r| !r.is_project())
            .filter(|r| !r.kind.intersects(skip))
            .map(|r| r.name.as_str())
            .collect();
        if names.is_empty() {
            names.push(&reflection.name);
        }
        names.reverse();
        Some(names)
    }

    /// Dotted path of `id` from the project, e.g. `Mod.Class.method`.
    ///
    /// The project itself is never part of the path.
    pub fn full_name(&self, id: ReflectionId, separator: &str) -> Option<String> {
        self.name_path(id, ReflectionKind::empty())
            .map(|names| names.join(separator))
    }

    /// Like [`Self::full_name`] but signatures are skipped, so a constructor
    /// signature reads as its class's name.
    pub fn friendly_full_name(&self, id: ReflectionId) -> Option<String> {
        self.name_path(id, ReflectionKind::FRIENDLY_NAME_SKIPPED)
            .map(|names| names.join("."))
    }

    /// URL-safe slug for `id`, unique among reflections rendered on the same
    /// page.
    ///
    /// Computed once per reflection; later renames do not change it.
    pub fn alias(&self, id: ReflectionId) -> Option<String> {
        let reflection = self.reflections.get(&id)?;
        let alias = reflection.alias_cell().get_or_init(|| {
            let mut alias: String = reflection
                .name
                .chars()
                .filter(|c| c.is_ascii_alphanumeric() || *c == '_')
                .collect();
            if alias.is_empty() {
                alias = format!("reflection-{}", id.0);
            }

            let scope = std::iter::once(reflection)
                .chain(self.ancestors(id))
                .find(|r| r.has_own_document || r.parent().is_none())
                .unwrap_or(reflection);
            let mut counters = scope.alias_counters().borrow_mut();
            let key = alias.to_lowercase();
            match counters.get_mut(&key) {
                Some(count) => {
                    alias = format!("{alias}-{count}");
                    *count += 1;
                }
                None => {
                    counters.insert(key, 1);
                }
            }
            alias
        });
        Some(alias.clone())
    }
}

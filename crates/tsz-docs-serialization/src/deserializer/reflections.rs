//! Built-in field reading for reflections and the project-level maps.

use super::{DeserializeContext, Deserializer, comments};
use crate::error::DeserializeIssue;
use crate::json::{self, JsonObject};
use serde::Deserialize;
use tsz_docs_common::NormalizedPath;
use tsz_docs_models::reflection::{VarianceModifier, VariantTag};
use tsz_docs_models::types::ReferenceTypeTarget;
use tsz_docs_models::{
    CommentDisplayPart, Reflection, ReflectionCategory, ReflectionFlags, ReflectionGroup,
    ReflectionId, ReferenceTarget, SourceReference, TraverseProperty, Type,
};

pub(super) fn read_reflection(
    de: &Deserializer,
    id: ReflectionId,
    obj: &JsonObject,
    ctx: &mut DeserializeContext<'_>,
) {
    let Some(tag) = ctx.project.get_reflection_by_id(id).map(Reflection::variant_tag) else {
        return;
    };
    let pending_before = ctx.pending_targets;

    let flags = obj
        .get("flags")
        .and_then(|flags| ReflectionFlags::deserialize(flags).ok());
    let comment = json::object_field(obj, "comment").map(|c| comments::comment(c, ctx));
    if let Some(reflection) = ctx.project.reflection_mut(id) {
        if let Some(flags) = flags {
            reflection.flags = flags;
        }
        if comment.is_some() {
            reflection.comment = comment;
        }
    }

    match tag {
        VariantTag::Project => {
            read_container(de, id, obj, ctx);
            read_project(id, obj, ctx);
        }
        VariantTag::Declaration => {
            read_container(de, id, obj, ctx);
            read_declaration(de, id, obj, ctx);
        }
        VariantTag::Signature => read_signature(de, id, obj, ctx),
        VariantTag::Param => read_parameter(de, id, obj, ctx),
        VariantTag::TypeParam => read_type_parameter(de, id, obj, ctx),
        VariantTag::Reference => read_reference(id, obj, ctx),
        VariantTag::Document => read_document(id, obj, ctx),
    }

    if ctx.pending_targets != pending_before {
        ctx.defer(move |ctx| resolve_pending_targets(ctx, id));
    }
}

fn construct_all(
    de: &Deserializer,
    obj: &JsonObject,
    key: &str,
    role: TraverseProperty,
    ctx: &mut DeserializeContext<'_>,
) {
    for child in json::objects(obj, key) {
        de.construct_reflection(child, role, ctx);
    }
}

fn construct_one(
    de: &Deserializer,
    obj: &JsonObject,
    key: &str,
    role: TraverseProperty,
    ctx: &mut DeserializeContext<'_>,
) {
    if let Some(child) = json::object_field(obj, key) {
        de.construct_reflection(child, role, ctx);
    }
}

fn read_type(de: &Deserializer, id: ReflectionId, obj: &JsonObject, ctx: &mut DeserializeContext<'_>) {
    if let Some(ty) = de.type_field(obj, "type", ctx) {
        ctx.project.set_type(id, Some(ty));
    }
}

fn read_sources(obj: &JsonObject, ctx: &DeserializeContext<'_>) -> Vec<SourceReference> {
    json::objects(obj, "sources")
        .map(|source| {
            let file_name = json::string_field(source, "fileName").unwrap_or_default();
            SourceReference {
                full_file_name: NormalizedPath::resolve(&ctx.project_root, &file_name),
                file_name,
                line: json::u32_field(source, "line").unwrap_or_default(),
                character: json::u32_field(source, "character").unwrap_or_default(),
                url: json::string_field(source, "url"),
            }
        })
        .collect()
}

fn readme(obj: &JsonObject, ctx: &mut DeserializeContext<'_>) -> Option<Vec<CommentDisplayPart>> {
    obj.get("readme")
        .map(|parts| comments::display_parts(Some(parts), ctx))
}

// =============================================================================
// Variants
// =============================================================================

fn read_container(de: &Deserializer, id: ReflectionId, obj: &JsonObject, ctx: &mut DeserializeContext<'_>) {
    construct_all(de, obj, "children", TraverseProperty::Children, ctx);
    construct_all(de, obj, "documents", TraverseProperty::Documents, ctx);

    // Group members are serialized ids, so they are mapped after the tree is
    // complete.
    let groups: Option<Vec<ReflectionGroup>> = obj.contains_key("groups").then(|| {
        json::objects(obj, "groups")
            .map(|group| {
                let mut revived = ReflectionGroup::new(json::str_field(group, "title").unwrap_or_default());
                revived.description = group
                    .get("description")
                    .map(|parts| comments::display_parts(Some(parts), ctx));
                revived.children = json::ids(group, "children").map(ReflectionId).collect();
                if group.contains_key("categories") {
                    revived.categories = Some(
                        json::objects(group, "categories")
                            .map(|category| read_category(category, ctx))
                            .collect(),
                    );
                }
                revived
            })
            .collect()
    });
    let categories: Option<Vec<ReflectionCategory>> = obj.contains_key("categories").then(|| {
        json::objects(obj, "categories")
            .map(|category| read_category(category, ctx))
            .collect()
    });
    if groups.is_none() && categories.is_none() {
        return;
    }

    ctx.defer(move |ctx| {
        let mut groups = groups;
        let mut categories = categories;
        for group in groups.iter_mut().flatten() {
            remap_members(&mut group.children, ctx);
            resolve_description(group.description.as_mut(), ctx);
            for category in group.categories.iter_mut().flatten() {
                remap_members(&mut category.children, ctx);
                resolve_description(category.description.as_mut(), ctx);
            }
        }
        for category in categories.iter_mut().flatten() {
            remap_members(&mut category.children, ctx);
            resolve_description(category.description.as_mut(), ctx);
        }
        if let Some(container) = ctx.project.reflection_mut(id).and_then(Reflection::container_mut) {
            container.groups = groups;
            container.categories = categories;
        }
    });
}

fn read_category(obj: &JsonObject, ctx: &mut DeserializeContext<'_>) -> ReflectionCategory {
    let mut category = ReflectionCategory::new(json::str_field(obj, "title").unwrap_or_default());
    category.description = obj
        .get("description")
        .map(|parts| comments::display_parts(Some(parts), ctx));
    category.children = json::ids(obj, "children").map(ReflectionId).collect();
    category
}

/// Replace serialized ids with revived ones, dropping ids that were never
/// revived.
fn remap_members(members: &mut Vec<ReflectionId>, ctx: &mut DeserializeContext<'_>) {
    members.retain_mut(|member| match ctx.expect_reflection(member.0, "group") {
        Some(new) => {
            *member = new;
            true
        }
        None => false,
    });
}

fn resolve_description(
    description: Option<&mut Vec<CommentDisplayPart>>,
    ctx: &mut DeserializeContext<'_>,
) {
    let Some(parts) = description else {
        return;
    };
    for old in comments::resolve_pending_parts(parts.iter_mut(), &ctx.reflection_ids) {
        ctx.report(DeserializeIssue::MissingReflection {
            old_id: old,
            context: "inline tag",
        });
    }
}

fn read_project(id: ReflectionId, obj: &JsonObject, ctx: &mut DeserializeContext<'_>) {
    let readme = readme(obj, ctx);
    if let Some(data) = ctx.project.reflection_mut(id).and_then(Reflection::as_project_mut) {
        data.package_name = json::string_field(obj, "packageName");
        data.package_version = json::string_field(obj, "packageVersion");
        data.readme = readme;
    }
}

fn read_declaration(de: &Deserializer, id: ReflectionId, obj: &JsonObject, ctx: &mut DeserializeContext<'_>) {
    let sources = read_sources(obj, ctx);
    construct_all(de, obj, "typeParameters", TraverseProperty::TypeParameter, ctx);
    read_type(de, id, obj, ctx);
    construct_all(de, obj, "signatures", TraverseProperty::Signatures, ctx);
    construct_all(de, obj, "indexSignatures", TraverseProperty::IndexSignature, ctx);
    construct_one(de, obj, "getSignature", TraverseProperty::GetSignature, ctx);
    construct_one(de, obj, "setSignature", TraverseProperty::SetSignature, ctx);

    let overwrites = de.type_field(obj, "overwrites", ctx);
    let inherited_from = de.type_field(obj, "inheritedFrom", ctx);
    let implementation_of = de.type_field(obj, "implementationOf", ctx);
    let extended_types = de.type_list(obj, "extendedTypes", ctx);
    let extended_by = de.type_list(obj, "extendedBy", ctx);
    let implemented_types = de.type_list(obj, "implementedTypes", ctx);
    let implemented_by = de.type_list(obj, "implementedBy", ctx);
    let readme = readme(obj, ctx);

    if let Some(data) = ctx.project.reflection_mut(id).and_then(Reflection::as_declaration_mut) {
        data.sources = sources;
        data.default_value = json::string_field(obj, "defaultValue");
        data.overwrites = overwrites;
        data.inherited_from = inherited_from;
        data.implementation_of = implementation_of;
        data.extended_types = extended_types;
        data.extended_by = extended_by;
        data.implemented_types = implemented_types;
        data.implemented_by = implemented_by;
        data.package_version = json::string_field(obj, "packageVersion");
        data.readme = readme;
    }
}

fn read_signature(de: &Deserializer, id: ReflectionId, obj: &JsonObject, ctx: &mut DeserializeContext<'_>) {
    let sources = read_sources(obj, ctx);
    construct_all(de, obj, "typeParameters", TraverseProperty::TypeParameter, ctx);
    construct_all(de, obj, "parameters", TraverseProperty::Parameters, ctx);
    read_type(de, id, obj, ctx);

    let overwrites = de.type_field(obj, "overwrites", ctx);
    let inherited_from = de.type_field(obj, "inheritedFrom", ctx);
    let implementation_of = de.type_field(obj, "implementationOf", ctx);
    if let Some(data) = ctx.project.reflection_mut(id).and_then(Reflection::as_signature_mut) {
        data.sources = sources;
        data.overwrites = overwrites;
        data.inherited_from = inherited_from;
        data.implementation_of = implementation_of;
    }
}

fn read_parameter(de: &Deserializer, id: ReflectionId, obj: &JsonObject, ctx: &mut DeserializeContext<'_>) {
    read_type(de, id, obj, ctx);
    if let Some(data) = ctx.project.reflection_mut(id).and_then(Reflection::as_parameter_mut) {
        data.default_value = json::string_field(obj, "defaultValue");
    }
}

fn read_type_parameter(de: &Deserializer, id: ReflectionId, obj: &JsonObject, ctx: &mut DeserializeContext<'_>) {
    read_type(de, id, obj, ctx);
    let default = de.type_field(obj, "default", ctx);
    if let Some(data) = ctx.project.reflection_mut(id).and_then(Reflection::as_type_parameter_mut) {
        data.default = default;
        data.variance_modifier = json::str_field(obj, "varianceModifier").and_then(VarianceModifier::parse);
    }
}

fn read_reference(id: ReflectionId, obj: &JsonObject, ctx: &mut DeserializeContext<'_>) {
    // -1 marks a target that was already broken when serialized.
    let Some(old) = json::u32_field(obj, "target") else {
        return;
    };
    ctx.defer(move |ctx| {
        let target = match ctx.expect_reflection(old, "reference reflection") {
            Some(new) => ReferenceTarget::id(new),
            None => ReferenceTarget::broken(),
        };
        ctx.project.mark_reference_target(id, target);
    });
}

fn read_document(id: ReflectionId, obj: &JsonObject, ctx: &mut DeserializeContext<'_>) {
    let content = comments::display_parts(obj.get("content"), ctx);
    if let Some(data) = ctx.project.reflection_mut(id).and_then(Reflection::as_document_mut) {
        data.content = content;
        data.frontmatter = json::object_field(obj, "frontmatter").cloned().unwrap_or_default();
    }
}

// =============================================================================
// Deferred fix-ups
// =============================================================================

/// Map reference types and inline tags of `id` that still hold serialized ids.
fn resolve_pending_targets(ctx: &mut DeserializeContext<'_>, id: ReflectionId) {
    let DeserializeContext {
        project,
        reflection_ids,
        ..
    } = ctx;
    let Some(reflection) = project.reflection_mut(id) else {
        return;
    };

    let mut missing_types = Vec::new();
    let mut missing_tags = Vec::new();
    for ty in reflection.types_mut() {
        ty.walk_references_mut(&mut |reference| {
            if let ReferenceTypeTarget::Pending(old) = reference.target() {
                match reflection_ids.get(&old) {
                    Some(new) => reference.set_target(ReferenceTypeTarget::Reflection(*new)),
                    None => {
                        reference.set_target(ReferenceTypeTarget::Broken);
                        missing_types.push(old);
                    }
                }
            }
        });
        // Union element summaries carry their own inline tags.
        ty.walk_mut(&mut |nested| {
            if let Type::Union(union) = nested
                && let Some(summaries) = &mut union.element_summaries
            {
                missing_tags.extend(comments::resolve_pending_parts(summaries.iter_mut().flatten(), reflection_ids));
            }
        });
    }
    missing_tags.extend(comments::resolve_pending_parts(reflection.display_parts_mut(), reflection_ids));

    for old in missing_types {
        ctx.report(DeserializeIssue::MissingReflection {
            old_id: old,
            context: "reference type",
        });
    }
    for old in missing_tags {
        ctx.report(DeserializeIssue::MissingReflection {
            old_id: old,
            context: "inline tag",
        });
    }
}

// =============================================================================
// Project maps
// =============================================================================

/// Register the file paths of `files.entries`, recording their new ids.
pub(super) fn read_file_entries(obj: &JsonObject, ctx: &mut DeserializeContext<'_>) {
    let Some(entries) = json::object_field(obj, "files").and_then(|files| json::object_field(files, "entries")) else {
        return;
    };
    for (old, path) in entries {
        let (Ok(old), Some(path)) = (old.parse::<u32>(), path.as_str()) else {
            continue;
        };
        let absolute = NormalizedPath::resolve(&ctx.project_root, path);
        let new = ctx.project.files.register_absolute(absolute.as_str()).target;
        ctx.file_ids.insert(old, new);
    }
}

/// Defer the symbol id map and file ownership, both keyed by serialized ids.
pub(super) fn read_project_maps(obj: &JsonObject, ctx: &mut DeserializeContext<'_>) {
    let symbol_ids: Vec<_> = json::object_field(obj, "symbolIdMap")
        .into_iter()
        .flatten()
        .filter_map(|(old, symbol)| {
            let old = old.parse::<u32>().ok()?;
            Some((old, ctx.symbol_id(symbol.as_object()?)?))
        })
        .collect();
    let owners: Vec<(u32, u32)> = json::object_field(obj, "files")
        .and_then(|files| json::object_field(files, "reflections"))
        .into_iter()
        .flatten()
        .filter_map(|(file, reflection)| {
            let reflection = reflection.as_u64().and_then(|n| u32::try_from(n).ok())?;
            Some((file.parse::<u32>().ok()?, reflection))
        })
        .collect();

    ctx.defer(move |ctx| {
        for (old, symbol_id) in symbol_ids {
            if let Some(id) = ctx.expect_reflection(old, "symbol id map") {
                ctx.project.register_symbol_id(id, symbol_id);
            }
        }
        for (old_file, old_reflection) in owners {
            let Some(file) = ctx.file_id(old_file) else {
                ctx.report(DeserializeIssue::MissingFile { old_id: old_file });
                continue;
            };
            if let Some(reflection) = ctx.expect_reflection(old_reflection, "file registry") {
                ctx.project.files.set_reflection(file, reflection);
            }
        }
    });
}

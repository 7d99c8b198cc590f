//! Built-in components for reflections.

use super::{SerializeContext, Serializer, SerializerComponent, SourceReferenceWrapper};
use crate::json::{JsonObject, SCHEMA_VERSION, insert_array, insert_str};
use serde_json::{Map, Value};
use tsz_docs_models::reflection::{
    DeclarationData, DocumentData, ParameterData, ProjectData, ReferenceData, SignatureData,
    TypeParameterData,
};
use tsz_docs_models::{CommentDisplayPart, Reflection, ReflectionId, SourceReference, Type};

/// Fields shared by every reflection.
pub const REFLECTION_PRIORITY: i32 = 1000;
/// Children, documents, groups and categories.
pub const CONTAINER_PRIORITY: i32 = 900;
/// Fields specific to one reflection variant.
pub const VARIANT_PRIORITY: i32 = 800;
/// Types, comments and the other non-reflection values.
pub const BUILTIN_PRIORITY: i32 = 1000;

pub(super) fn register_builtins(serializer: &mut Serializer) {
    serializer.add_serializer(ReflectionSerializer);
    serializer.add_serializer(ContainerSerializer);
    serializer.add_serializer(ProjectSerializer);
    serializer.add_serializer(DeclarationSerializer);
    serializer.add_serializer(SignatureSerializer);
    serializer.add_serializer(ParameterSerializer);
    serializer.add_serializer(TypeParameterSerializer);
    serializer.add_serializer(ReferenceSerializer);
    serializer.add_serializer(DocumentSerializer);
}

fn insert_type(obj: &mut JsonObject, key: &str, ty: Option<&Type>, ctx: &SerializeContext<'_>) {
    if let Some(ty) = ty {
        obj.insert(key.to_string(), ctx.to_value(ty));
    }
}

fn insert_parts(
    obj: &mut JsonObject,
    key: &str,
    parts: Option<&Vec<CommentDisplayPart>>,
    ctx: &SerializeContext<'_>,
) {
    if let Some(parts) = parts {
        obj.insert(key.to_string(), Value::Array(ctx.to_array(parts)));
    }
}

fn insert_sources(obj: &mut JsonObject, sources: &[SourceReference], ctx: &SerializeContext<'_>) {
    let wrapped: Vec<SourceReferenceWrapper> =
        sources.iter().cloned().map(SourceReferenceWrapper).collect();
    insert_array(obj, "sources", ctx.to_array(&wrapped));
}

fn insert_reflection(
    obj: &mut JsonObject,
    key: &str,
    id: Option<ReflectionId>,
    ctx: &SerializeContext<'_>,
) {
    if let Some(value) = id.and_then(|id| ctx.reflection(id)) {
        obj.insert(key.to_string(), value);
    }
}

// =============================================================================
// Shared
// =============================================================================

struct ReflectionSerializer;

impl SerializerComponent for ReflectionSerializer {
    type Item = Reflection;

    fn priority(&self) -> i32 {
        REFLECTION_PRIORITY
    }

    fn to_object(&self, item: &Reflection, mut obj: JsonObject, ctx: &SerializeContext<'_>) -> JsonObject {
        obj.insert("id".into(), item.id().0.into());
        obj.insert("name".into(), item.name.clone().into());
        obj.insert("variant".into(), item.variant_tag().as_str().into());
        obj.insert("kind".into(), item.kind.bits().into());
        let flags: Map<String, Value> = item
            .flags
            .iter_keys()
            .map(|(_, key)| (key.to_string(), Value::Bool(true)))
            .collect();
        obj.insert("flags".into(), Value::Object(flags));
        if let Some(comment) = &item.comment
            && !comment.is_empty()
        {
            obj.insert("comment".into(), ctx.to_value(comment));
        }
        obj
    }
}

struct ContainerSerializer;

impl SerializerComponent for ContainerSerializer {
    type Item = Reflection;

    fn priority(&self) -> i32 {
        CONTAINER_PRIORITY
    }

    fn supports(&self, item: &Reflection) -> bool {
        item.container().is_some()
    }

    fn to_object(&self, item: &Reflection, mut obj: JsonObject, ctx: &SerializeContext<'_>) -> JsonObject {
        let Some(container) = item.container() else {
            return obj;
        };
        insert_array(&mut obj, "children", ctx.reflections(container.children()));
        insert_array(&mut obj, "documents", ctx.reflections(container.documents()));
        if let Some(groups) = &container.groups {
            insert_array(&mut obj, "groups", ctx.to_array(groups));
        }
        if let Some(categories) = &container.categories {
            insert_array(&mut obj, "categories", ctx.to_array(categories));
        }
        obj
    }
}

// =============================================================================
// Variants
// =============================================================================

/// Implements [`SerializerComponent`] for a component that only handles one
/// reflection variant.
macro_rules! variant_component {
    ($name:ident, $accessor:ident, $data:ty, $body:expr) => {
        struct $name;

        impl SerializerComponent for $name {
            type Item = Reflection;

            fn priority(&self) -> i32 {
                VARIANT_PRIORITY
            }

            fn supports(&self, item: &Reflection) -> bool {
                item.$accessor().is_some()
            }

            fn to_object(
                &self,
                item: &Reflection,
                obj: JsonObject,
                ctx: &SerializeContext<'_>,
            ) -> JsonObject {
                let write: fn(&Reflection, &$data, JsonObject, &SerializeContext<'_>) -> JsonObject = $body;
                match item.$accessor() {
                    Some(data) => write(item, data, obj, ctx),
                    None => obj,
                }
            }
        }
    };
}

variant_component!(ProjectSerializer, as_project, ProjectData, |_, data, mut obj, ctx| {
    obj.insert("schemaVersion".into(), SCHEMA_VERSION.into());
    insert_str(&mut obj, "packageName", data.package_name.as_deref());
    insert_str(&mut obj, "packageVersion", data.package_version.as_deref());
    insert_parts(&mut obj, "readme", data.readme.as_ref(), ctx);

    let symbol_ids: Map<String, Value> = ctx
        .project
        .symbol_id_map()
        .into_iter()
        .map(|(id, symbol_id)| (id.0.to_string(), ctx.to_value(symbol_id)))
        .collect();
    obj.insert("symbolIdMap".into(), Value::Object(symbol_ids));
    obj.insert("files".into(), ctx.to_value(&ctx.project.files));
    obj
});

variant_component!(DeclarationSerializer, as_declaration, DeclarationData, |item, data, mut obj, ctx| {
    insert_str(&mut obj, "packageVersion", data.package_version.as_deref());
    insert_sources(&mut obj, &data.sources, ctx);
    insert_array(&mut obj, "typeParameters", ctx.reflections(data.type_parameters()));
    insert_type(&mut obj, "type", item.type_(), ctx);
    insert_array(&mut obj, "signatures", ctx.reflections(data.signatures()));
    insert_array(&mut obj, "indexSignatures", ctx.reflections(data.index_signatures()));
    insert_reflection(&mut obj, "getSignature", data.get_signature(), ctx);
    insert_reflection(&mut obj, "setSignature", data.set_signature(), ctx);
    insert_str(&mut obj, "defaultValue", data.default_value.as_deref());
    insert_type(&mut obj, "overwrites", data.overwrites.as_ref(), ctx);
    insert_type(&mut obj, "inheritedFrom", data.inherited_from.as_ref(), ctx);
    insert_type(&mut obj, "implementationOf", data.implementation_of.as_ref(), ctx);
    insert_array(&mut obj, "extendedTypes", ctx.to_array(&data.extended_types));
    insert_array(&mut obj, "extendedBy", ctx.to_array(&data.extended_by));
    insert_array(&mut obj, "implementedTypes", ctx.to_array(&data.implemented_types));
    insert_array(&mut obj, "implementedBy", ctx.to_array(&data.implemented_by));
    insert_parts(&mut obj, "readme", data.readme.as_ref(), ctx);
    obj
});

variant_component!(SignatureSerializer, as_signature, SignatureData, |item, data, mut obj, ctx| {
    insert_sources(&mut obj, &data.sources, ctx);
    insert_array(&mut obj, "typeParameters", ctx.reflections(data.type_parameters()));
    insert_array(&mut obj, "parameters", ctx.reflections(data.parameters()));
    insert_type(&mut obj, "type", item.type_(), ctx);
    insert_type(&mut obj, "overwrites", data.overwrites.as_ref(), ctx);
    insert_type(&mut obj, "inheritedFrom", data.inherited_from.as_ref(), ctx);
    insert_type(&mut obj, "implementationOf", data.implementation_of.as_ref(), ctx);
    obj
});

variant_component!(ParameterSerializer, as_parameter, ParameterData, |item, data, mut obj, ctx| {
    insert_type(&mut obj, "type", item.type_(), ctx);
    insert_str(&mut obj, "defaultValue", data.default_value.as_deref());
    obj
});

variant_component!(TypeParameterSerializer, as_type_parameter, TypeParameterData, |item, data, mut obj, ctx| {
    insert_type(&mut obj, "type", item.type_(), ctx);
    insert_type(&mut obj, "default", data.default.as_ref(), ctx);
    insert_str(
        &mut obj,
        "varianceModifier",
        data.variance_modifier.map(|v| v.as_str()),
    );
    obj
});

variant_component!(ReferenceSerializer, as_reference, ReferenceData, |item, _, mut obj, ctx| {
    let target = ctx
        .project
        .reference_target(item.id())
        .map_or(Value::from(ReflectionId::BROKEN_JSON), |id| Value::from(id.0));
    obj.insert("target".into(), target);
    obj
});

variant_component!(DocumentSerializer, as_document, DocumentData, |_, data, mut obj, ctx| {
    obj.insert("content".into(), Value::Array(ctx.to_array(&data.content)));
    if !data.frontmatter.is_empty() {
        obj.insert("frontmatter".into(), Value::Object(data.frontmatter.clone()));
    }
    obj
});

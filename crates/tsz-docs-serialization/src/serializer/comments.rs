//! Built-in components for comments, groupings, sources and project-level
//! registries.

use super::{BUILTIN_PRIORITY, SerializeContext, Serializer, SerializerComponent};
use crate::json::{JsonObject, insert_array, insert_str};
use serde_json::{Map, Value};
use tsz_docs_common::FileRegistry;
use tsz_docs_models::comment::InlineTagTarget;
use tsz_docs_models::{
    Comment, CommentDisplayPart, CommentTag, ReflectionCategory, ReflectionGroup, ReflectionSymbolId,
    SourceReference,
};

/// Serialization handle for a [`SourceReference`].
///
/// Components registered for this type control how `sources` entries are
/// written without affecting other uses of source references.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SourceReferenceWrapper(pub SourceReference);

pub(super) fn register_builtins(serializer: &mut Serializer) {
    serializer.add_serializer(CommentSerializer);
    serializer.add_serializer(CommentTagSerializer);
    serializer.add_serializer(DisplayPartSerializer);
    serializer.add_serializer(GroupSerializer);
    serializer.add_serializer(CategorySerializer);
    serializer.add_serializer(SourceSerializer);
    serializer.add_serializer(FileRegistrySerializer);
    serializer.add_serializer(SymbolIdSerializer);
}

fn parts_value(parts: &[CommentDisplayPart], ctx: &SerializeContext<'_>) -> Value {
    Value::Array(ctx.to_array(parts))
}

struct CommentSerializer;

impl SerializerComponent for CommentSerializer {
    type Item = Comment;

    fn priority(&self) -> i32 {
        BUILTIN_PRIORITY
    }

    fn to_object(&self, item: &Comment, mut obj: JsonObject, ctx: &SerializeContext<'_>) -> JsonObject {
        obj.insert("summary".into(), parts_value(&item.summary, ctx));
        insert_array(&mut obj, "blockTags", ctx.to_array(&item.block_tags));
        let modifiers: Vec<Value> = item.modifier_tags.iter().map(|t| Value::from(t.as_str())).collect();
        insert_array(&mut obj, "modifierTags", modifiers);
        insert_str(&mut obj, "label", item.label.as_deref());
        obj
    }
}

struct CommentTagSerializer;

impl SerializerComponent for CommentTagSerializer {
    type Item = CommentTag;

    fn priority(&self) -> i32 {
        BUILTIN_PRIORITY
    }

    fn to_object(&self, item: &CommentTag, mut obj: JsonObject, ctx: &SerializeContext<'_>) -> JsonObject {
        obj.insert("tag".into(), item.tag.clone().into());
        insert_str(&mut obj, "name", item.name.as_deref());
        obj.insert("content".into(), parts_value(&item.content, ctx));
        obj
    }
}

struct DisplayPartSerializer;

impl SerializerComponent for DisplayPartSerializer {
    type Item = CommentDisplayPart;

    fn priority(&self) -> i32 {
        BUILTIN_PRIORITY
    }

    fn to_object(
        &self,
        item: &CommentDisplayPart,
        mut obj: JsonObject,
        ctx: &SerializeContext<'_>,
    ) -> JsonObject {
        obj.insert("kind".into(), item.kind().into());
        match item {
            CommentDisplayPart::Text(text) | CommentDisplayPart::Code(text) => {
                obj.insert("text".into(), text.clone().into());
            }
            CommentDisplayPart::InlineTag(part) => {
                obj.insert("tag".into(), part.tag.clone().into());
                obj.insert("text".into(), part.text.clone().into());
                let target = match &part.target {
                    Some(InlineTagTarget::Reflection(id))
                        if ctx.project.get_reflection_by_id(*id).is_some() =>
                    {
                        Some(Value::from(id.0))
                    }
                    Some(InlineTagTarget::Symbol(symbol_id)) => Some(ctx.to_value(symbol_id)),
                    Some(InlineTagTarget::Url(url)) => Some(Value::from(url.as_str())),
                    _ => None,
                };
                if let Some(target) = target {
                    obj.insert("target".into(), target);
                }
                insert_str(&mut obj, "tsLinkText", part.ts_link_text.as_deref());
            }
            CommentDisplayPart::RelativeLink(part) => {
                obj.insert("text".into(), part.text.clone().into());
                if let Some(target) = part.target {
                    obj.insert("target".into(), target.0.into());
                }
                insert_str(&mut obj, "targetAnchor", part.target_anchor.as_deref());
            }
        }
        obj
    }
}

struct GroupSerializer;

impl SerializerComponent for GroupSerializer {
    type Item = ReflectionGroup;

    fn priority(&self) -> i32 {
        BUILTIN_PRIORITY
    }

    fn to_object(&self, item: &ReflectionGroup, mut obj: JsonObject, ctx: &SerializeContext<'_>) -> JsonObject {
        obj.insert("title".into(), item.title.clone().into());
        if let Some(description) = &item.description {
            obj.insert("description".into(), parts_value(description, ctx));
        }
        insert_array(&mut obj, "children", ctx.live_ids(&item.children));
        if let Some(categories) = &item.categories {
            insert_array(&mut obj, "categories", ctx.to_array(categories));
        }
        obj
    }
}

struct CategorySerializer;

impl SerializerComponent for CategorySerializer {
    type Item = ReflectionCategory;

    fn priority(&self) -> i32 {
        BUILTIN_PRIORITY
    }

    fn to_object(
        &self,
        item: &ReflectionCategory,
        mut obj: JsonObject,
        ctx: &SerializeContext<'_>,
    ) -> JsonObject {
        obj.insert("title".into(), item.title.clone().into());
        if let Some(description) = &item.description {
            obj.insert("description".into(), parts_value(description, ctx));
        }
        insert_array(&mut obj, "children", ctx.live_ids(&item.children));
        obj
    }
}

struct SourceSerializer;

impl SerializerComponent for SourceSerializer {
    type Item = SourceReferenceWrapper;

    fn priority(&self) -> i32 {
        BUILTIN_PRIORITY
    }

    fn to_object(
        &self,
        item: &SourceReferenceWrapper,
        mut obj: JsonObject,
        _ctx: &SerializeContext<'_>,
    ) -> JsonObject {
        let source = &item.0;
        obj.insert("fileName".into(), source.file_name.clone().into());
        obj.insert("line".into(), source.line.into());
        obj.insert("character".into(), source.character.into());
        insert_str(&mut obj, "url", source.url.as_deref());
        obj
    }
}

/// `{ entries: { id: path }, reflections: { id: reflectionId } }`
struct FileRegistrySerializer;

impl SerializerComponent for FileRegistrySerializer {
    type Item = FileRegistry;

    fn priority(&self) -> i32 {
        BUILTIN_PRIORITY
    }

    fn to_object(&self, item: &FileRegistry, mut obj: JsonObject, ctx: &SerializeContext<'_>) -> JsonObject {
        let entries: Map<String, Value> = item
            .entries()
            .map(|(id, path)| {
                let path = if path.is_absolute() {
                    path.relative_to(ctx.project_root)
                } else {
                    path.as_str().to_string()
                };
                (id.0.to_string(), Value::from(path))
            })
            .collect();
        let reflections: Map<String, Value> = item
            .reflections()
            .filter(|(_, reflection)| ctx.project.get_reflection_by_id(*reflection).is_some())
            .map(|(id, reflection)| (id.0.to_string(), Value::from(reflection.0)))
            .collect();
        obj.insert("entries".into(), Value::Object(entries));
        obj.insert("reflections".into(), Value::Object(reflections));
        obj
    }
}

struct SymbolIdSerializer;

impl SerializerComponent for SymbolIdSerializer {
    type Item = ReflectionSymbolId;

    fn priority(&self) -> i32 {
        BUILTIN_PRIORITY
    }

    fn to_object(
        &self,
        item: &ReflectionSymbolId,
        mut obj: JsonObject,
        ctx: &SerializeContext<'_>,
    ) -> JsonObject {
        obj.insert(
            "sourceFileName".into(),
            item.serialized_file_name(ctx.project_root).into(),
        );
        obj.insert("qualifiedName".into(), item.qualified_name.clone().into());
        obj
    }
}

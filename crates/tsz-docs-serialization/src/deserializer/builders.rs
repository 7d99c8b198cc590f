//! Construction tables for reflections and types.
//!
//! A builder only creates the bare value from the fields needed to construct
//! it; everything else is read afterwards by `Deserializer::from_object`.

use super::{DeserializeContext, Deserializer, types};
use crate::json::{self, JsonObject};
use rustc_hash::FxHashMap;
use tsz_docs_models::reflection::VariantTag;
use tsz_docs_models::{Reflection, ReflectionKind, ReferenceTarget, Type, TypeKind};

/// Creates an unregistered reflection of one variant.
pub type ReflectionBuilder = fn(&JsonObject, &mut DeserializeContext<'_>) -> Reflection;

/// Creates a type of one kind. `None` drops the type.
pub type TypeBuilder = fn(&Deserializer, &JsonObject, &mut DeserializeContext<'_>) -> Option<Type>;

fn name(obj: &JsonObject) -> &str {
    json::str_field(obj, "name").unwrap_or_default()
}

fn kind(obj: &JsonObject) -> ReflectionKind {
    json::u32_field(obj, "kind").map_or(ReflectionKind::empty(), ReflectionKind::from_bits_retain)
}

/// Builders for every variant that may appear below the project root.
pub(super) fn reflection_builders() -> FxHashMap<VariantTag, ReflectionBuilder> {
    let mut table: FxHashMap<VariantTag, ReflectionBuilder> = FxHashMap::default();
    table.insert(VariantTag::Declaration, |obj, _| {
        Reflection::declaration(name(obj), kind(obj))
    });
    table.insert(VariantTag::Signature, |obj, _| {
        Reflection::signature(name(obj), kind(obj))
    });
    table.insert(VariantTag::Param, |obj, _| {
        let mut reflection = Reflection::parameter(name(obj));
        reflection.kind = kind(obj);
        reflection
    });
    table.insert(VariantTag::TypeParam, |obj, _| {
        let mut reflection = Reflection::type_parameter(name(obj));
        reflection.kind = kind(obj);
        reflection
    });
    // The target is filled in once every reflection has its new id.
    table.insert(VariantTag::Reference, |obj, _| {
        let mut reflection = Reflection::reference(name(obj), ReferenceTarget::broken());
        reflection.kind = kind(obj);
        reflection
    });
    table.insert(VariantTag::Document, |obj, _| {
        Reflection::document(name(obj), Vec::new())
    });
    table
}

pub(super) fn type_builders() -> FxHashMap<TypeKind, TypeBuilder> {
    let entries: [(TypeKind, TypeBuilder); 20] = [
        (TypeKind::Array, types::array),
        (TypeKind::Conditional, types::conditional),
        (TypeKind::IndexedAccess, types::indexed_access),
        (TypeKind::Inferred, types::inferred),
        (TypeKind::Intersection, types::intersection),
        (TypeKind::Intrinsic, types::intrinsic),
        (TypeKind::Literal, types::literal),
        (TypeKind::Mapped, types::mapped),
        (TypeKind::NamedTupleMember, types::named_tuple_member),
        (TypeKind::Optional, types::optional),
        (TypeKind::Predicate, types::predicate),
        (TypeKind::Query, types::query),
        (TypeKind::Reference, types::reference),
        (TypeKind::Reflection, types::reflection),
        (TypeKind::Rest, types::rest),
        (TypeKind::TemplateLiteral, types::template_literal),
        (TypeKind::Tuple, types::tuple),
        (TypeKind::TypeOperator, types::type_operator),
        (TypeKind::Union, types::union),
        (TypeKind::Unknown, types::unknown),
    ];
    entries.into_iter().collect()
}

//! Type builders.

use super::{DeserializeContext, Deserializer, comments};
use crate::json::{self, JsonObject};
use serde_json::Value;
use tsz_docs_models::types::{
    ArrayType, ConditionalType, IndexedAccessType, InferredType, IntersectionType, LiteralValue,
    MappedType, MappingModifier, NamedTupleMemberType, OptionalType, PredicateType, QueryType,
    ReferenceType, ReferenceTypeTarget, RestType, TemplateLiteralType, TupleType, TypeOperatorKind,
    TypeOperatorType, UnionType,
};
use tsz_docs_models::{TraverseProperty, Type};

type Ctx<'a, 'p> = &'a mut DeserializeContext<'p>;

fn boxed(de: &Deserializer, obj: &JsonObject, key: &str, ctx: Ctx<'_, '_>) -> Option<Box<Type>> {
    de.type_field(obj, key, ctx).map(Box::new)
}

fn name(obj: &JsonObject) -> String {
    json::string_field(obj, "name").unwrap_or_default()
}

pub(super) fn array(de: &Deserializer, obj: &JsonObject, ctx: Ctx<'_, '_>) -> Option<Type> {
    Some(Type::Array(ArrayType {
        element_type: boxed(de, obj, "elementType", ctx)?,
    }))
}

pub(super) fn conditional(de: &Deserializer, obj: &JsonObject, ctx: Ctx<'_, '_>) -> Option<Type> {
    Some(Type::Conditional(ConditionalType {
        check_type: boxed(de, obj, "checkType", ctx)?,
        extends_type: boxed(de, obj, "extendsType", ctx)?,
        true_type: boxed(de, obj, "trueType", ctx)?,
        false_type: boxed(de, obj, "falseType", ctx)?,
    }))
}

pub(super) fn indexed_access(de: &Deserializer, obj: &JsonObject, ctx: Ctx<'_, '_>) -> Option<Type> {
    Some(Type::IndexedAccess(IndexedAccessType {
        object_type: boxed(de, obj, "objectType", ctx)?,
        index_type: boxed(de, obj, "indexType", ctx)?,
    }))
}

pub(super) fn inferred(de: &Deserializer, obj: &JsonObject, ctx: Ctx<'_, '_>) -> Option<Type> {
    Some(Type::Inferred(InferredType {
        name: name(obj),
        constraint: boxed(de, obj, "constraint", ctx),
    }))
}

pub(super) fn intersection(de: &Deserializer, obj: &JsonObject, ctx: Ctx<'_, '_>) -> Option<Type> {
    Some(Type::Intersection(IntersectionType {
        types: de.type_list(obj, "types", ctx),
    }))
}

pub(super) fn intrinsic(_: &Deserializer, obj: &JsonObject, _: Ctx<'_, '_>) -> Option<Type> {
    Some(Type::intrinsic(name(obj)))
}

pub(super) fn literal(_: &Deserializer, obj: &JsonObject, _: Ctx<'_, '_>) -> Option<Type> {
    let value = match obj.get("value") {
        Some(Value::String(s)) => LiteralValue::String(s.clone()),
        Some(Value::Number(n)) => LiteralValue::Number(n.as_f64()?),
        Some(Value::Bool(b)) => LiteralValue::Boolean(*b),
        Some(Value::Object(big)) => LiteralValue::BigInt {
            negative: json::bool_field(big, "negative"),
            value: json::string_field(big, "value")?,
        },
        Some(Value::Null) | None => LiteralValue::Null,
        Some(Value::Array(_)) => return None,
    };
    Some(Type::literal(value))
}

pub(super) fn mapped(de: &Deserializer, obj: &JsonObject, ctx: Ctx<'_, '_>) -> Option<Type> {
    let modifier = |key| json::str_field(obj, key).and_then(MappingModifier::parse);
    Some(Type::Mapped(MappedType {
        parameter: json::string_field(obj, "parameter").unwrap_or_default(),
        parameter_type: boxed(de, obj, "parameterType", ctx)?,
        template_type: boxed(de, obj, "templateType", ctx)?,
        readonly_modifier: modifier("readonlyModifier"),
        optional_modifier: modifier("optionalModifier"),
        name_type: boxed(de, obj, "nameType", ctx),
    }))
}

pub(super) fn named_tuple_member(de: &Deserializer, obj: &JsonObject, ctx: Ctx<'_, '_>) -> Option<Type> {
    Some(Type::NamedTupleMember(NamedTupleMemberType {
        name: name(obj),
        is_optional: json::bool_field(obj, "isOptional"),
        element: boxed(de, obj, "element", ctx)?,
    }))
}

pub(super) fn optional(de: &Deserializer, obj: &JsonObject, ctx: Ctx<'_, '_>) -> Option<Type> {
    Some(Type::Optional(OptionalType {
        element_type: boxed(de, obj, "elementType", ctx)?,
    }))
}

pub(super) fn predicate(de: &Deserializer, obj: &JsonObject, ctx: Ctx<'_, '_>) -> Option<Type> {
    Some(Type::Predicate(PredicateType {
        name: name(obj),
        asserts: json::bool_field(obj, "asserts"),
        target_type: boxed(de, obj, "targetType", ctx),
    }))
}

pub(super) fn query(de: &Deserializer, obj: &JsonObject, ctx: Ctx<'_, '_>) -> Option<Type> {
    match de.type_field(obj, "queryType", ctx)? {
        Type::Reference(query_type) => Some(Type::Query(QueryType { query_type })),
        _ => None,
    }
}

pub(super) fn reference(de: &Deserializer, obj: &JsonObject, ctx: Ctx<'_, '_>) -> Option<Type> {
    let target = match obj.get("target") {
        Some(Value::Number(n)) => match n.as_u64().and_then(|n| u32::try_from(n).ok()) {
            Some(old) => {
                ctx.pending_targets += 1;
                ReferenceTypeTarget::Pending(old)
            }
            None => ReferenceTypeTarget::Broken,
        },
        Some(Value::Object(symbol)) => ctx
            .symbol_id(symbol)
            .map_or(ReferenceTypeTarget::Broken, ReferenceTypeTarget::Symbol),
        _ => ReferenceTypeTarget::Broken,
    };

    let mut reference = ReferenceType::new(name(obj), target);
    if obj.contains_key("typeArguments") {
        reference.type_arguments = Some(de.type_list(obj, "typeArguments", ctx));
    }
    reference.qualified_name = json::string_field(obj, "qualifiedName");
    reference.package = json::string_field(obj, "package");
    reference.external_url = json::string_field(obj, "externalUrl");
    reference.refers_to_type_parameter = json::bool_field(obj, "refersToTypeParameter");
    reference.prefer_values = json::bool_field(obj, "preferValues");
    Some(Type::reference(reference))
}

/// The declaration is registered as a type literal of the reflection being
/// read.
pub(super) fn reflection(de: &Deserializer, obj: &JsonObject, ctx: Ctx<'_, '_>) -> Option<Type> {
    let declaration = json::object_field(obj, "declaration")?;
    de.construct_reflection(declaration, TraverseProperty::TypeLiteral, ctx)
        .map(Type::reflection)
}

pub(super) fn rest(de: &Deserializer, obj: &JsonObject, ctx: Ctx<'_, '_>) -> Option<Type> {
    Some(Type::Rest(RestType {
        element_type: boxed(de, obj, "elementType", ctx)?,
    }))
}

pub(super) fn template_literal(de: &Deserializer, obj: &JsonObject, ctx: Ctx<'_, '_>) -> Option<Type> {
    let mut tail = Vec::new();
    for span in obj.get("tail").and_then(Value::as_array).into_iter().flatten() {
        let Some([ty, text]) = span.as_array().map(Vec::as_slice) else {
            continue;
        };
        let Some(ty) = ty.as_object().and_then(|ty| de.construct_type(ty, ctx)) else {
            continue;
        };
        tail.push((ty, text.as_str().unwrap_or_default().to_string()));
    }
    Some(Type::TemplateLiteral(TemplateLiteralType {
        head: json::string_field(obj, "head").unwrap_or_default(),
        tail,
    }))
}

pub(super) fn tuple(de: &Deserializer, obj: &JsonObject, ctx: Ctx<'_, '_>) -> Option<Type> {
    Some(Type::Tuple(TupleType {
        elements: de.type_list(obj, "elements", ctx),
    }))
}

pub(super) fn type_operator(de: &Deserializer, obj: &JsonObject, ctx: Ctx<'_, '_>) -> Option<Type> {
    Some(Type::TypeOperator(TypeOperatorType {
        operator: json::str_field(obj, "operator").and_then(TypeOperatorKind::parse)?,
        target: boxed(de, obj, "target", ctx)?,
    }))
}

/// Members are kept as written; a serialized `true | false` is not folded.
pub(super) fn union(de: &Deserializer, obj: &JsonObject, ctx: Ctx<'_, '_>) -> Option<Type> {
    let types = de.type_list(obj, "types", ctx);
    let element_summaries = obj.get("elementSummaries").and_then(Value::as_array).map(|summaries| {
        summaries
            .iter()
            .map(|parts| comments::display_parts(Some(parts), ctx))
            .collect()
    });
    Some(Type::Union(UnionType {
        types,
        element_summaries,
    }))
}

pub(super) fn unknown(_: &Deserializer, obj: &JsonObject, _: Ctx<'_, '_>) -> Option<Type> {
    Some(Type::unknown(name(obj)))
}

//! Built-in component for [`Type`] values.

use super::{BUILTIN_PRIORITY, SerializeContext, Serializer, SerializerComponent};
use crate::json::{JsonObject, insert_array, insert_str, insert_true};
use serde_json::Value;
use tsz_docs_models::types::{LiteralValue, ReferenceType, ReferenceTypeTarget};
use tsz_docs_models::{ReflectionId, Type};

pub(super) fn register_builtins(serializer: &mut Serializer) {
    serializer.add_serializer(TypeSerializer);
}

struct TypeSerializer;

impl SerializerComponent for TypeSerializer {
    type Item = Type;

    fn priority(&self) -> i32 {
        BUILTIN_PRIORITY
    }

    fn to_object(&self, item: &Type, mut obj: JsonObject, ctx: &SerializeContext<'_>) -> JsonObject {
        obj.insert("type".into(), item.kind().as_str().into());
        match item {
            Type::Array(t) => {
                obj.insert("elementType".into(), ctx.to_value(&*t.element_type));
            }
            Type::Conditional(t) => {
                obj.insert("checkType".into(), ctx.to_value(&*t.check_type));
                obj.insert("extendsType".into(), ctx.to_value(&*t.extends_type));
                obj.insert("trueType".into(), ctx.to_value(&*t.true_type));
                obj.insert("falseType".into(), ctx.to_value(&*t.false_type));
            }
            Type::IndexedAccess(t) => {
                obj.insert("indexType".into(), ctx.to_value(&*t.index_type));
                obj.insert("objectType".into(), ctx.to_value(&*t.object_type));
            }
            Type::Inferred(t) => {
                obj.insert("name".into(), t.name.clone().into());
                if let Some(constraint) = &t.constraint {
                    obj.insert("constraint".into(), ctx.to_value(&**constraint));
                }
            }
            Type::Intersection(t) => {
                obj.insert("types".into(), Value::Array(ctx.to_array(&t.types)));
            }
            Type::Intrinsic(t) => {
                obj.insert("name".into(), t.name.clone().into());
            }
            Type::Literal(t) => {
                obj.insert("value".into(), literal_value(&t.value));
            }
            Type::Mapped(t) => {
                obj.insert("parameter".into(), t.parameter.clone().into());
                obj.insert("parameterType".into(), ctx.to_value(&*t.parameter_type));
                obj.insert("templateType".into(), ctx.to_value(&*t.template_type));
                insert_str(&mut obj, "readonlyModifier", t.readonly_modifier.map(|m| m.as_str()));
                insert_str(&mut obj, "optionalModifier", t.optional_modifier.map(|m| m.as_str()));
                if let Some(name_type) = &t.name_type {
                    obj.insert("nameType".into(), ctx.to_value(&**name_type));
                }
            }
            Type::NamedTupleMember(t) => {
                obj.insert("name".into(), t.name.clone().into());
                obj.insert("isOptional".into(), t.is_optional.into());
                obj.insert("element".into(), ctx.to_value(&*t.element));
            }
            Type::Optional(t) => {
                obj.insert("elementType".into(), ctx.to_value(&*t.element_type));
            }
            Type::Predicate(t) => {
                obj.insert("name".into(), t.name.clone().into());
                obj.insert("asserts".into(), t.asserts.into());
                if let Some(target) = &t.target_type {
                    obj.insert("targetType".into(), ctx.to_value(&**target));
                }
            }
            Type::Query(t) => {
                let query = Type::Reference(t.query_type.clone());
                obj.insert("queryType".into(), ctx.to_value(&query));
            }
            Type::Reference(t) => write_reference(t, &mut obj, ctx),
            Type::Reflection(t) => {
                if let Some(declaration) = ctx.reflection(t.declaration) {
                    obj.insert("declaration".into(), declaration);
                }
            }
            Type::Rest(t) => {
                obj.insert("elementType".into(), ctx.to_value(&*t.element_type));
            }
            Type::TemplateLiteral(t) => {
                obj.insert("head".into(), t.head.clone().into());
                let tail = t
                    .tail
                    .iter()
                    .map(|(ty, text)| Value::Array(vec![ctx.to_value(ty), text.clone().into()]))
                    .collect();
                obj.insert("tail".into(), Value::Array(tail));
            }
            Type::Tuple(t) => {
                insert_array(&mut obj, "elements", ctx.to_array(&t.elements));
            }
            Type::TypeOperator(t) => {
                obj.insert("operator".into(), t.operator.as_str().into());
                obj.insert("target".into(), ctx.to_value(&*t.target));
            }
            Type::Union(t) => {
                obj.insert("types".into(), Value::Array(ctx.to_array(&t.types)));
                if let Some(summaries) = &t.element_summaries {
                    let summaries = summaries
                        .iter()
                        .map(|parts| Value::Array(ctx.to_array(parts)))
                        .collect();
                    obj.insert("elementSummaries".into(), Value::Array(summaries));
                }
            }
            Type::Unknown(t) => {
                obj.insert("name".into(), t.name.clone().into());
            }
        }
        obj
    }
}

fn write_reference(reference: &ReferenceType, obj: &mut JsonObject, ctx: &SerializeContext<'_>) {
    obj.insert("target".into(), reference_target(reference, ctx));
    if let Some(arguments) = &reference.type_arguments {
        insert_array(obj, "typeArguments", ctx.to_array(arguments));
    }
    obj.insert("name".into(), reference.name.clone().into());
    insert_str(obj, "package", reference.package.as_deref());
    insert_str(obj, "externalUrl", reference.external_url.as_deref());
    insert_true(obj, "refersToTypeParameter", reference.refers_to_type_parameter);
    insert_true(obj, "preferValues", reference.prefer_values);
    insert_str(obj, "qualifiedName", reference.qualified_name.as_deref());
}

/// Reflection id when the target is in the project, otherwise the symbol id
/// object, otherwise -1.
fn reference_target(reference: &ReferenceType, ctx: &SerializeContext<'_>) -> Value {
    if let Some(id) = ctx.project.resolve_reference_type(reference) {
        return id.0.into();
    }
    match reference.target() {
        ReferenceTypeTarget::Symbol(symbol_id) => ctx.to_value(&symbol_id),
        _ => ReflectionId::BROKEN_JSON.into(),
    }
}

fn literal_value(value: &LiteralValue) -> Value {
    match value {
        LiteralValue::String(s) => s.clone().into(),
        LiteralValue::Number(n) => number_value(*n),
        LiteralValue::BigInt { negative, value } => {
            serde_json::json!({ "negative": negative, "value": value })
        }
        LiteralValue::Boolean(b) => (*b).into(),
        LiteralValue::Null => Value::Null,
    }
}

/// Integral values are written without a fractional part. Non-finite values
/// have no JSON form and are written as `null`.
fn number_value(n: f64) -> Value {
    const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_991.0;
    if n.fract() == 0.0 && n.abs() <= MAX_SAFE_INTEGER {
        Value::from(n as i64)
    } else {
        serde_json::Number::from_f64(n).map_or(Value::Null, Value::Number)
    }
}

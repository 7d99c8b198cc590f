//! Display of type expressions with minimal parentheses.
//!
//! Every type has a binding power; every position a nested type can appear in
//! requires one. A nested type is parenthesized when its power is below the
//! requirement, so `(A | B)[]` keeps its parentheses while `A | B & C` needs
//! none.

use super::{LiteralValue, MappingModifier, ReferenceType, Type};
use std::fmt::{self, Write};

mod power {
    pub(super) const TOP_LEVEL: i32 = i32::MIN;
    pub(super) const UNKNOWN: i32 = -1;
    pub(super) const CONDITIONAL: i32 = 50;
    pub(super) const UNION: i32 = 100;
    pub(super) const INTERSECTION: i32 = 120;
    pub(super) const TYPE_OPERATOR: i32 = 900;
    pub(super) const PRIMARY: i32 = 999;
}

fn binding_power(ty: &Type) -> i32 {
    match ty {
        Type::Unknown(_) => power::UNKNOWN,
        Type::Conditional(_) | Type::Predicate(_) => power::CONDITIONAL,
        Type::Union(_) => power::UNION,
        Type::Intersection(_) => power::INTERSECTION,
        Type::TypeOperator(_) | Type::Query(_) | Type::Inferred(_) => power::TYPE_OPERATOR,
        Type::Array(_)
        | Type::IndexedAccess(_)
        | Type::Intrinsic(_)
        | Type::Literal(_)
        | Type::Mapped(_)
        | Type::NamedTupleMember(_)
        | Type::Optional(_)
        | Type::Reference(_)
        | Type::Reflection(_)
        | Type::Rest(_)
        | Type::TemplateLiteral(_)
        | Type::Tuple(_) => power::PRIMARY,
    }
}

fn write_at(f: &mut fmt::Formatter<'_>, ty: &Type, required: i32) -> fmt::Result {
    if binding_power(ty) < required {
        f.write_char('(')?;
        write_type(f, ty)?;
        f.write_char(')')
    } else {
        write_type(f, ty)
    }
}

fn write_list(f: &mut fmt::Formatter<'_>, types: &[Type], separator: &str, required: i32) -> fmt::Result {
    for (i, ty) in types.iter().enumerate() {
        if i > 0 {
            f.write_str(separator)?;
        }
        write_at(f, ty, required)?;
    }
    Ok(())
}

fn write_reference(f: &mut fmt::Formatter<'_>, reference: &ReferenceType) -> fmt::Result {
    f.write_str(&reference.name)?;
    if let Some(args) = &reference.type_arguments
        && !args.is_empty()
    {
        f.write_char('<')?;
        write_list(f, args, ", ", power::TOP_LEVEL)?;
        f.write_char('>')?;
    }
    Ok(())
}

/// JavaScript-style number text: integral values have no fractional part.
fn format_number(value: f64) -> String {
    if value.is_nan() {
        "NaN".to_string()
    } else if value.is_infinite() {
        if value > 0.0 { "Infinity" } else { "-Infinity" }.to_string()
    } else if value == 0.0 {
        "0".to_string()
    } else {
        value.to_string()
    }
}

fn write_literal(f: &mut fmt::Formatter<'_>, value: &LiteralValue) -> fmt::Result {
    match value {
        LiteralValue::String(s) => write!(f, "{}", serde_json::Value::String(s.clone())),
        LiteralValue::Number(n) => f.write_str(&format_number(*n)),
        LiteralValue::BigInt { negative, value } => {
            write!(f, "{}{value}n", if *negative { "-" } else { "" })
        }
        LiteralValue::Boolean(b) => write!(f, "{b}"),
        LiteralValue::Null => f.write_str("null"),
    }
}

fn write_type(f: &mut fmt::Formatter<'_>, ty: &Type) -> fmt::Result {
    match ty {
        Type::Array(t) => {
            write_at(f, &t.element_type, power::PRIMARY)?;
            f.write_str("[]")
        }
        Type::Conditional(t) => {
            write_at(f, &t.check_type, power::CONDITIONAL + 1)?;
            f.write_str(" extends ")?;
            write_at(f, &t.extends_type, power::CONDITIONAL + 1)?;
            f.write_str(" ? ")?;
            write_at(f, &t.true_type, power::TOP_LEVEL)?;
            f.write_str(" : ")?;
            write_at(f, &t.false_type, power::TOP_LEVEL)
        }
        Type::IndexedAccess(t) => {
            write_at(f, &t.object_type, power::PRIMARY)?;
            f.write_char('[')?;
            write_at(f, &t.index_type, power::TOP_LEVEL)?;
            f.write_char(']')
        }
        Type::Inferred(t) => {
            write!(f, "infer {}", t.name)?;
            if let Some(constraint) = &t.constraint {
                f.write_str(" extends ")?;
                write_at(f, constraint, power::TYPE_OPERATOR)?;
            }
            Ok(())
        }
        Type::Intersection(t) => write_list(f, &t.types, " & ", power::INTERSECTION),
        Type::Intrinsic(t) => f.write_str(&t.name),
        Type::Literal(t) => write_literal(f, &t.value),
        Type::Mapped(t) => {
            f.write_str("{ ")?;
            match t.readonly_modifier {
                Some(MappingModifier::Add) => f.write_str("readonly ")?,
                Some(MappingModifier::Remove) => f.write_str("-readonly ")?,
                None => {}
            }
            write!(f, "[{} in ", t.parameter)?;
            write_at(f, &t.parameter_type, power::TOP_LEVEL)?;
            if let Some(name_type) = &t.name_type {
                f.write_str(" as ")?;
                write_at(f, name_type, power::TOP_LEVEL)?;
            }
            f.write_char(']')?;
            match t.optional_modifier {
                Some(MappingModifier::Add) => f.write_char('?')?,
                Some(MappingModifier::Remove) => f.write_str("-?")?,
                None => {}
            }
            f.write_str(": ")?;
            write_at(f, &t.template_type, power::TOP_LEVEL)?;
            f.write_str(" }")
        }
        Type::NamedTupleMember(t) => {
            write!(f, "{}{}: ", t.name, if t.is_optional { "?" } else { "" })?;
            write_at(f, &t.element, power::TOP_LEVEL)
        }
        Type::Optional(t) => {
            write_at(f, &t.element_type, power::PRIMARY)?;
            f.write_char('?')
        }
        Type::Predicate(t) => {
            if t.asserts {
                f.write_str("asserts ")?;
            }
            f.write_str(&t.name)?;
            if let Some(target) = &t.target_type {
                f.write_str(" is ")?;
                write_at(f, target, power::TOP_LEVEL)?;
            }
            Ok(())
        }
        Type::Query(t) => {
            f.write_str("typeof ")?;
            write_reference(f, &t.query_type)
        }
        Type::Reference(t) => write_reference(f, t),
        Type::Reflection(_) => f.write_str("Object"),
        Type::Rest(t) => {
            f.write_str("...")?;
            write_at(f, &t.element_type, power::PRIMARY)
        }
        Type::TemplateLiteral(t) => {
            f.write_char('`')?;
            f.write_str(&t.head)?;
            for (ty, text) in &t.tail {
                f.write_str("${")?;
                write_at(f, ty, power::TOP_LEVEL)?;
                f.write_char('}')?;
                f.write_str(text)?;
            }
            f.write_char('`')
        }
        Type::Tuple(t) => {
            f.write_char('[')?;
            write_list(f, &t.elements, ", ", power::TOP_LEVEL)?;
            f.write_char(']')
        }
        Type::TypeOperator(t) => {
            write!(f, "{} ", t.operator.as_str())?;
            write_at(f, &t.target, power::TYPE_OPERATOR)
        }
        Type::Union(t) => write_list(f, &t.types, " | ", power::UNION),
        Type::Unknown(t) => f.write_str(&t.name),
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_at(f, self, power::TOP_LEVEL)
    }
}

impl fmt::Display for ReferenceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_reference(f, self)
    }
}

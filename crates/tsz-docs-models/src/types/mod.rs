//! Type expressions attached to reflections.
//!
//! A [`Type`] is an immutable value tree. The only edge that leaves the tree is
//! [`Type::Reflection`], which owns a type-literal declaration registered in the
//! project; [`ReferenceType`] points at a reflection without owning it.

mod format;
pub mod visitor;

pub use visitor::TypeVisitor;

use crate::comment::CommentDisplayPart;
use std::cell::RefCell;
use tsz_docs_common::{ReflectionId, ReflectionSymbolId};

// =============================================================================
// Type kinds
// =============================================================================

/// Serialized discriminator of a [`Type`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TypeKind {
    Array,
    Conditional,
    IndexedAccess,
    Inferred,
    Intersection,
    Intrinsic,
    Literal,
    Mapped,
    NamedTupleMember,
    Optional,
    Predicate,
    Query,
    Reference,
    Reflection,
    Rest,
    TemplateLiteral,
    Tuple,
    TypeOperator,
    Union,
    Unknown,
}

impl TypeKind {
    pub const ALL: [Self; 20] = [
        Self::Array,
        Self::Conditional,
        Self::IndexedAccess,
        Self::Inferred,
        Self::Intersection,
        Self::Intrinsic,
        Self::Literal,
        Self::Mapped,
        Self::NamedTupleMember,
        Self::Optional,
        Self::Predicate,
        Self::Query,
        Self::Reference,
        Self::Reflection,
        Self::Rest,
        Self::TemplateLiteral,
        Self::Tuple,
        Self::TypeOperator,
        Self::Union,
        Self::Unknown,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Array => "array",
            Self::Conditional => "conditional",
            Self::IndexedAccess => "indexedAccess",
            Self::Inferred => "inferred",
            Self::Intersection => "intersection",
            Self::Intrinsic => "intrinsic",
            Self::Literal => "literal",
            Self::Mapped => "mapped",
            Self::NamedTupleMember => "namedTupleMember",
            Self::Optional => "optional",
            Self::Predicate => "predicate",
            Self::Query => "query",
            Self::Reference => "reference",
            Self::Reflection => "reflection",
            Self::Rest => "rest",
            Self::TemplateLiteral => "templateLiteral",
            Self::Tuple => "tuple",
            Self::TypeOperator => "typeOperator",
            Self::Union => "union",
            Self::Unknown => "unknown",
        }
    }

    pub fn from_tag(tag: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.as_str() == tag)
    }
}

// =============================================================================
// Variant payloads
// =============================================================================

#[derive(Clone, Debug, PartialEq)]
pub struct ArrayType {
    pub element_type: Box<Type>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ConditionalType {
    pub check_type: Box<Type>,
    pub extends_type: Box<Type>,
    pub true_type: Box<Type>,
    pub false_type: Box<Type>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct IndexedAccessType {
    pub object_type: Box<Type>,
    pub index_type: Box<Type>,
}

/// `infer T` inside a conditional's extends clause.
#[derive(Clone, Debug, PartialEq)]
pub struct InferredType {
    pub name: String,
    pub constraint: Option<Box<Type>>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct IntersectionType {
    pub types: Vec<Type>,
}

/// `string`, `number`, `any`, `this`, ...
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IntrinsicType {
    pub name: String,
}

#[derive(Clone, Debug, PartialEq)]
pub enum LiteralValue {
    String(String),
    Number(f64),
    BigInt { negative: bool, value: String },
    Boolean(bool),
    Null,
}

#[derive(Clone, Debug, PartialEq)]
pub struct LiteralType {
    pub value: LiteralValue,
}

/// `+` / `-` prefix on a mapped type modifier.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum MappingModifier {
    Add,
    Remove,
}

impl MappingModifier {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Add => "+",
            Self::Remove => "-",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "+" => Some(Self::Add),
            "-" => Some(Self::Remove),
            _ => None,
        }
    }
}

/// `{ readonly [K in T as N]?: V }`
#[derive(Clone, Debug, PartialEq)]
pub struct MappedType {
    pub parameter: String,
    pub parameter_type: Box<Type>,
    pub template_type: Box<Type>,
    pub readonly_modifier: Option<MappingModifier>,
    pub optional_modifier: Option<MappingModifier>,
    pub name_type: Option<Box<Type>>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct NamedTupleMemberType {
    pub name: String,
    pub is_optional: bool,
    pub element: Box<Type>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct OptionalType {
    pub element_type: Box<Type>,
}

/// `x is T`, `asserts x is T` or `asserts x`.
#[derive(Clone, Debug, PartialEq)]
pub struct PredicateType {
    pub name: String,
    pub asserts: bool,
    pub target_type: Option<Box<Type>>,
}

/// `typeof X`
#[derive(Clone, Debug, PartialEq)]
pub struct QueryType {
    pub query_type: Box<ReferenceType>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReflectionType {
    pub declaration: ReflectionId,
}

#[derive(Clone, Debug, PartialEq)]
pub struct RestType {
    pub element_type: Box<Type>,
}

/// `` `head${T}text${U}text` ``
#[derive(Clone, Debug, PartialEq)]
pub struct TemplateLiteralType {
    pub head: String,
    pub tail: Vec<(Type, String)>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct TupleType {
    pub elements: Vec<Type>,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum TypeOperatorKind {
    KeyOf,
    Unique,
    Readonly,
}

impl TypeOperatorKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::KeyOf => "keyof",
            Self::Unique => "unique",
            Self::Readonly => "readonly",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "keyof" => Some(Self::KeyOf),
            "unique" => Some(Self::Unique),
            "readonly" => Some(Self::Readonly),
            _ => None,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct TypeOperatorType {
    pub operator: TypeOperatorKind,
    pub target: Box<Type>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct UnionType {
    pub types: Vec<Type>,
    /// Per-member documentation, parallel to `types`.
    pub element_summaries: Option<Vec<Vec<CommentDisplayPart>>>,
}

impl UnionType {
    /// Build a union, folding a `true | false` pair into `boolean`.
    ///
    /// The fold only happens here; later edits to `types` are kept verbatim.
    pub fn new(mut types: Vec<Type>) -> Self {
        let true_at = types.iter().position(|t| t.is_boolean_literal(true));
        let false_at = types.iter().position(|t| t.is_boolean_literal(false));
        if let (Some(t), Some(f)) = (true_at, false_at) {
            let first = t.min(f);
            let second = t.max(f);
            types.remove(second);
            types[first] = Type::intrinsic("boolean");
        }
        Self {
            types,
            element_summaries: None,
        }
    }
}

/// Type that could not be converted, kept as its source text.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UnknownType {
    pub name: String,
}

// =============================================================================
// ReferenceType
// =============================================================================

/// What a [`ReferenceType`] points at.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ReferenceTypeTarget {
    /// Resolved to a reflection in the owning project.
    Reflection(ReflectionId),
    /// Not resolved yet; looked up through the project's symbol index.
    Symbol(ReflectionSymbolId),
    /// Reflection id from a serialized project, translated once the whole
    /// project has been revived.
    Pending(u32),
    /// Target is outside the documentation (or was lost).
    Broken,
}

/// Named reference to a declaration, possibly with type arguments.
#[derive(Debug)]
pub struct ReferenceType {
    pub name: String,
    pub type_arguments: Option<Vec<Type>>,
    pub qualified_name: Option<String>,
    /// npm package declaring the target, if external.
    pub package: Option<String>,
    pub external_url: Option<String>,
    pub refers_to_type_parameter: bool,
    /// Prefer value declarations over type declarations when linking.
    pub prefer_values: bool,
    target: RefCell<ReferenceTypeTarget>,
}

impl ReferenceType {
    pub fn new(name: impl Into<String>, target: ReferenceTypeTarget) -> Self {
        Self {
            name: name.into(),
            type_arguments: None,
            qualified_name: None,
            package: None,
            external_url: None,
            refers_to_type_parameter: false,
            prefer_values: false,
            target: RefCell::new(target),
        }
    }

    pub fn to_reflection(name: impl Into<String>, id: ReflectionId) -> Self {
        Self::new(name, ReferenceTypeTarget::Reflection(id))
    }

    pub fn from_symbol(name: impl Into<String>, symbol: ReflectionSymbolId) -> Self {
        let qualified_name = symbol.qualified_name.clone();
        let mut ty = Self::new(name, ReferenceTypeTarget::Symbol(symbol));
        ty.qualified_name = Some(qualified_name);
        ty
    }

    /// Reference to something that will never be documented, e.g. a type
    /// parameter or a global from the standard library.
    pub fn broken(name: impl Into<String>) -> Self {
        Self::new(name, ReferenceTypeTarget::Broken)
    }

    #[must_use]
    pub fn with_type_arguments(mut self, type_arguments: Vec<Type>) -> Self {
        self.type_arguments = Some(type_arguments);
        self
    }

    pub fn target(&self) -> ReferenceTypeTarget {
        self.target.borrow().clone()
    }

    pub fn set_target(&mut self, target: ReferenceTypeTarget) {
        *self.target.get_mut() = target;
    }

    /// Replace a resolved symbol target with the reflection it resolved to.
    pub(crate) fn memoize_resolved(&self, id: ReflectionId) {
        *self.target.borrow_mut() = ReferenceTypeTarget::Reflection(id);
    }

    pub fn is_intentionally_broken(&self) -> bool {
        matches!(*self.target.borrow(), ReferenceTypeTarget::Broken) && self.external_url.is_none()
    }
}

impl Clone for ReferenceType {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            type_arguments: self.type_arguments.clone(),
            qualified_name: self.qualified_name.clone(),
            package: self.package.clone(),
            external_url: self.external_url.clone(),
            refers_to_type_parameter: self.refers_to_type_parameter,
            prefer_values: self.prefer_values,
            target: RefCell::new(self.target()),
        }
    }
}

impl PartialEq for ReferenceType {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
            && self.type_arguments == other.type_arguments
            && self.qualified_name == other.qualified_name
            && self.package == other.package
            && self.external_url == other.external_url
            && self.refers_to_type_parameter == other.refers_to_type_parameter
            && self.prefer_values == other.prefer_values
            && *self.target.borrow() == *other.target.borrow()
    }
}

// =============================================================================
// Type
// =============================================================================

#[derive(Clone, Debug, PartialEq)]
pub enum Type {
    Array(ArrayType),
    Conditional(ConditionalType),
    IndexedAccess(IndexedAccessType),
    Inferred(InferredType),
    Intersection(IntersectionType),
    Intrinsic(IntrinsicType),
    Literal(LiteralType),
    Mapped(MappedType),
    NamedTupleMember(NamedTupleMemberType),
    Optional(OptionalType),
    Predicate(PredicateType),
    Query(QueryType),
    Reference(Box<ReferenceType>),
    Reflection(ReflectionType),
    Rest(RestType),
    TemplateLiteral(TemplateLiteralType),
    Tuple(TupleType),
    TypeOperator(TypeOperatorType),
    Union(UnionType),
    Unknown(UnknownType),
}

impl Type {
    pub fn intrinsic(name: impl Into<String>) -> Self {
        Self::Intrinsic(IntrinsicType { name: name.into() })
    }

    pub fn unknown(name: impl Into<String>) -> Self {
        Self::Unknown(UnknownType { name: name.into() })
    }

    pub fn literal(value: LiteralValue) -> Self {
        Self::Literal(LiteralType { value })
    }

    pub fn string_literal(value: impl Into<String>) -> Self {
        Self::literal(LiteralValue::String(value.into()))
    }

    pub fn number_literal(value: f64) -> Self {
        Self::literal(LiteralValue::Number(value))
    }

    pub fn boolean_literal(value: bool) -> Self {
        Self::literal(LiteralValue::Boolean(value))
    }

    pub fn array(element_type: Self) -> Self {
        Self::Array(ArrayType {
            element_type: Box::new(element_type),
        })
    }

    pub fn union(types: Vec<Self>) -> Self {
        Self::Union(UnionType::new(types))
    }

    pub fn intersection(types: Vec<Self>) -> Self {
        Self::Intersection(IntersectionType { types })
    }

    pub fn tuple(elements: Vec<Self>) -> Self {
        Self::Tuple(TupleType { elements })
    }

    pub fn reference(reference: ReferenceType) -> Self {
        Self::Reference(Box::new(reference))
    }

    pub fn reflection(declaration: ReflectionId) -> Self {
        Self::Reflection(ReflectionType { declaration })
    }

    pub fn type_operator(operator: TypeOperatorKind, target: Self) -> Self {
        Self::TypeOperator(TypeOperatorType {
            operator,
            target: Box::new(target),
        })
    }

    pub fn conditional(check: Self, extends: Self, true_type: Self, false_type: Self) -> Self {
        Self::Conditional(ConditionalType {
            check_type: Box::new(check),
            extends_type: Box::new(extends),
            true_type: Box::new(true_type),
            false_type: Box::new(false_type),
        })
    }

    pub const fn kind(&self) -> TypeKind {
        match self {
            Self::Array(_) => TypeKind::Array,
            Self::Conditional(_) => TypeKind::Conditional,
            Self::IndexedAccess(_) => TypeKind::IndexedAccess,
            Self::Inferred(_) => TypeKind::Inferred,
            Self::Intersection(_) => TypeKind::Intersection,
            Self::Intrinsic(_) => TypeKind::Intrinsic,
            Self::Literal(_) => TypeKind::Literal,
            Self::Mapped(_) => TypeKind::Mapped,
            Self::NamedTupleMember(_) => TypeKind::NamedTupleMember,
            Self::Optional(_) => TypeKind::Optional,
            Self::Predicate(_) => TypeKind::Predicate,
            Self::Query(_) => TypeKind::Query,
            Self::Reference(_) => TypeKind::Reference,
            Self::Reflection(_) => TypeKind::Reflection,
            Self::Rest(_) => TypeKind::Rest,
            Self::TemplateLiteral(_) => TypeKind::TemplateLiteral,
            Self::Tuple(_) => TypeKind::Tuple,
            Self::TypeOperator(_) => TypeKind::TypeOperator,
            Self::Union(_) => TypeKind::Union,
            Self::Unknown(_) => TypeKind::Unknown,
        }
    }

    fn is_boolean_literal(&self, value: bool) -> bool {
        matches!(self, Self::Literal(LiteralType { value: LiteralValue::Boolean(b) }) if *b == value)
    }

    pub fn is_intrinsic(&self, name: &str) -> bool {
        matches!(self, Self::Intrinsic(t) if t.name == name)
    }

    /// Call `f` on each directly nested type, in field order.
    pub fn for_each_child(&self, mut f: impl FnMut(&Self)) {
        match self {
            Self::Array(t) => f(&t.element_type),
            Self::Optional(t) => f(&t.element_type),
            Self::Rest(t) => f(&t.element_type),
            Self::Conditional(t) => {
                f(&t.check_type);
                f(&t.extends_type);
                f(&t.true_type);
                f(&t.false_type);
            }
            Self::IndexedAccess(t) => {
                f(&t.object_type);
                f(&t.index_type);
            }
            Self::Inferred(t) => {
                if let Some(c) = &t.constraint {
                    f(c);
                }
            }
            Self::Intersection(t) => t.types.iter().for_each(f),
            Self::Union(t) => t.types.iter().for_each(f),
            Self::Tuple(t) => t.elements.iter().for_each(f),
            Self::Mapped(t) => {
                f(&t.parameter_type);
                f(&t.template_type);
                if let Some(n) = &t.name_type {
                    f(n);
                }
            }
            Self::NamedTupleMember(t) => f(&t.element),
            Self::Predicate(t) => {
                if let Some(target) = &t.target_type {
                    f(target);
                }
            }
            Self::Query(t) => {
                if let Some(args) = &t.query_type.type_arguments {
                    args.iter().for_each(f);
                }
            }
            Self::Reference(t) => {
                if let Some(args) = &t.type_arguments {
                    args.iter().for_each(f);
                }
            }
            Self::TemplateLiteral(t) => t.tail.iter().for_each(|(ty, _)| f(ty)),
            Self::TypeOperator(t) => f(&t.target),
            Self::Intrinsic(_) | Self::Literal(_) | Self::Reflection(_) | Self::Unknown(_) => {}
        }
    }

    pub fn for_each_child_mut(&mut self, mut f: impl FnMut(&mut Self)) {
        match self {
            Self::Array(t) => f(&mut t.element_type),
            Self::Optional(t) => f(&mut t.element_type),
            Self::Rest(t) => f(&mut t.element_type),
            Self::Conditional(t) => {
                f(&mut t.check_type);
                f(&mut t.extends_type);
                f(&mut t.true_type);
                f(&mut t.false_type);
            }
            Self::IndexedAccess(t) => {
                f(&mut t.object_type);
                f(&mut t.index_type);
            }
            Self::Inferred(t) => {
                if let Some(c) = &mut t.constraint {
                    f(c);
                }
            }
            Self::Intersection(t) => t.types.iter_mut().for_each(f),
            Self::Union(t) => t.types.iter_mut().for_each(f),
            Self::Tuple(t) => t.elements.iter_mut().for_each(f),
            Self::Mapped(t) => {
                f(&mut t.parameter_type);
                f(&mut t.template_type);
                if let Some(n) = &mut t.name_type {
                    f(n);
                }
            }
            Self::NamedTupleMember(t) => f(&mut t.element),
            Self::Predicate(t) => {
                if let Some(target) = &mut t.target_type {
                    f(target);
                }
            }
            Self::Query(t) => {
                if let Some(args) = &mut t.query_type.type_arguments {
                    args.iter_mut().for_each(f);
                }
            }
            Self::Reference(t) => {
                if let Some(args) = &mut t.type_arguments {
                    args.iter_mut().for_each(f);
                }
            }
            Self::TemplateLiteral(t) => t.tail.iter_mut().for_each(|(ty, _)| f(ty)),
            Self::TypeOperator(t) => f(&mut t.target),
            Self::Intrinsic(_) | Self::Literal(_) | Self::Reflection(_) | Self::Unknown(_) => {}
        }
    }

    /// Pre-order walk over this type and every nested type.
    pub fn walk(&self, f: &mut impl FnMut(&Self)) {
        f(self);
        self.for_each_child(|child| child.walk(f));
    }

    /// Pre-order walk with mutable access.
    pub fn walk_mut(&mut self, f: &mut impl FnMut(&mut Self)) {
        f(self);
        self.for_each_child_mut(|child| child.walk_mut(f));
    }

    /// Reference types nested anywhere in this type, including the query
    /// target of `typeof` types.
    pub fn walk_references(&self, f: &mut impl FnMut(&ReferenceType)) {
        self.walk(&mut |ty| match ty {
            Self::Reference(r) => f(r),
            Self::Query(q) => f(&q.query_type),
            _ => {}
        });
    }

    pub fn walk_references_mut(&mut self, f: &mut impl FnMut(&mut ReferenceType)) {
        self.walk_mut(&mut |ty| match ty {
            Self::Reference(r) => f(r),
            Self::Query(q) => f(&mut q.query_type),
            _ => {}
        });
    }

    /// Declarations owned through nested [`Type::Reflection`] nodes.
    pub fn reflection_declarations(&self) -> Vec<ReflectionId> {
        let mut out = Vec::new();
        self.walk(&mut |ty| {
            if let Self::Reflection(r) = ty {
                out.push(r.declaration);
            }
        });
        out
    }
}

#[cfg(test)]
#[path = "../../tests/types_tests.rs"]
mod tests;

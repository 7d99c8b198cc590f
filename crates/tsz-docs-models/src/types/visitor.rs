//! Type Visitor Pattern
//!
//! Dispatches on the [`Type`] variant so callers can implement one method per
//! kind of type expression they care about and fall back to a default for
//! the rest.
//!
//! ```rust
//! use tsz_docs_models::types::{IntrinsicType, Type, TypeVisitor, UnionType};
//!
//! struct CountIntrinsics;
//!
//! impl TypeVisitor for CountIntrinsics {
//!     type Output = usize;
//!
//!     fn visit_intrinsic(&mut self, _ty: &IntrinsicType) -> usize {
//!         1
//!     }
//!
//!     fn visit_union(&mut self, ty: &UnionType) -> usize {
//!         ty.types.iter().map(|t| t.visit(self)).sum()
//!     }
//!
//!     fn default_output() -> usize {
//!         0
//!     }
//! }
//!
//! let ty = Type::union(vec![Type::intrinsic("string"), Type::intrinsic("number")]);
//! assert_eq!(ty.visit(&mut CountIntrinsics), 2);
//! ```

use super::{
    ArrayType, ConditionalType, IndexedAccessType, InferredType, IntersectionType, IntrinsicType,
    LiteralType, MappedType, NamedTupleMemberType, OptionalType, PredicateType, QueryType,
    ReferenceType, ReflectionType, RestType, TemplateLiteralType, TupleType, Type,
    TypeOperatorType, UnionType, UnknownType,
};

// =============================================================================
// Type Visitor Trait
// =============================================================================

/// Visitor over [`Type`] variants.
///
/// Every method defaults to [`TypeVisitor::default_output`].
pub trait TypeVisitor: Sized {
    /// The output type produced by visiting.
    type Output;

    /// Output for variants the visitor does not handle.
    fn default_output() -> Self::Output;

    // =========================================================================
    // Leaf types
    // =========================================================================

    fn visit_intrinsic(&mut self, _ty: &IntrinsicType) -> Self::Output {
        Self::default_output()
    }

    fn visit_literal(&mut self, _ty: &LiteralType) -> Self::Output {
        Self::default_output()
    }

    fn visit_unknown(&mut self, _ty: &UnknownType) -> Self::Output {
        Self::default_output()
    }

    /// Visit an inline object type whose members live on a declaration.
    fn visit_reflection(&mut self, _ty: &ReflectionType) -> Self::Output {
        Self::default_output()
    }

    // =========================================================================
    // Composite types
    // =========================================================================

    fn visit_array(&mut self, _ty: &ArrayType) -> Self::Output {
        Self::default_output()
    }

    fn visit_conditional(&mut self, _ty: &ConditionalType) -> Self::Output {
        Self::default_output()
    }

    fn visit_indexed_access(&mut self, _ty: &IndexedAccessType) -> Self::Output {
        Self::default_output()
    }

    fn visit_inferred(&mut self, _ty: &InferredType) -> Self::Output {
        Self::default_output()
    }

    fn visit_intersection(&mut self, _ty: &IntersectionType) -> Self::Output {
        Self::default_output()
    }

    fn visit_mapped(&mut self, _ty: &MappedType) -> Self::Output {
        Self::default_output()
    }

    fn visit_named_tuple_member(&mut self, _ty: &NamedTupleMemberType) -> Self::Output {
        Self::default_output()
    }

    fn visit_optional(&mut self, _ty: &OptionalType) -> Self::Output {
        Self::default_output()
    }

    fn visit_predicate(&mut self, _ty: &PredicateType) -> Self::Output {
        Self::default_output()
    }

    fn visit_query(&mut self, _ty: &QueryType) -> Self::Output {
        Self::default_output()
    }

    fn visit_reference(&mut self, _ty: &ReferenceType) -> Self::Output {
        Self::default_output()
    }

    fn visit_rest(&mut self, _ty: &RestType) -> Self::Output {
        Self::default_output()
    }

    fn visit_template_literal(&mut self, _ty: &TemplateLiteralType) -> Self::Output {
        Self::default_output()
    }

    fn visit_tuple(&mut self, _ty: &TupleType) -> Self::Output {
        Self::default_output()
    }

    fn visit_type_operator(&mut self, _ty: &TypeOperatorType) -> Self::Output {
        Self::default_output()
    }

    fn visit_union(&mut self, _ty: &UnionType) -> Self::Output {
        Self::default_output()
    }
}

impl Type {
    /// Dispatch to the visitor method for this variant.
    pub fn visit<V: TypeVisitor>(&self, visitor: &mut V) -> V::Output {
        match self {
            Self::Array(t) => visitor.visit_array(t),
            Self::Conditional(t) => visitor.visit_conditional(t),
            Self::IndexedAccess(t) => visitor.visit_indexed_access(t),
            Self::Inferred(t) => visitor.visit_inferred(t),
            Self::Intersection(t) => visitor.visit_intersection(t),
            Self::Intrinsic(t) => visitor.visit_intrinsic(t),
            Self::Literal(t) => visitor.visit_literal(t),
            Self::Mapped(t) => visitor.visit_mapped(t),
            Self::NamedTupleMember(t) => visitor.visit_named_tuple_member(t),
            Self::Optional(t) => visitor.visit_optional(t),
            Self::Predicate(t) => visitor.visit_predicate(t),
            Self::Query(t) => visitor.visit_query(t),
            Self::Reference(t) => visitor.visit_reference(t),
            Self::Reflection(t) => visitor.visit_reflection(t),
            Self::Rest(t) => visitor.visit_rest(t),
            Self::TemplateLiteral(t) => visitor.visit_template_literal(t),
            Self::Tuple(t) => visitor.visit_tuple(t),
            Self::TypeOperator(t) => visitor.visit_type_operator(t),
            Self::Union(t) => visitor.visit_union(t),
            Self::Unknown(t) => visitor.visit_unknown(t),
        }
    }
}

/// Does `ty`, or any type nested in it, satisfy `predicate`?
pub fn contains_type(ty: &Type, predicate: &impl Fn(&Type) -> bool) -> bool {
    let mut found = false;
    ty.walk(&mut |t| found |= predicate(t));
    found
}

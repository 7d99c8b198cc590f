use super::visitor::contains_type;
use super::*;

fn lit(n: f64) -> Type {
    Type::number_literal(n)
}

fn named(name: &str) -> Type {
    Type::reference(ReferenceType::broken(name))
}

#[test]
fn test_intersection_inside_union_is_not_wrapped() {
    let ty = Type::union(vec![lit(1.0), Type::intersection(vec![lit(2.0), lit(3.0)])]);
    assert_eq!(ty.to_string(), "1 | 2 & 3");
}

#[test]
fn test_union_inside_intersection_is_wrapped() {
    let ty = Type::intersection(vec![Type::union(vec![lit(1.0), lit(2.0)]), lit(3.0)]);
    assert_eq!(ty.to_string(), "(1 | 2) & 3");
}

#[test]
fn test_array_of_union_is_wrapped() {
    let ty = Type::array(Type::union(vec![named("A"), named("B")]));
    assert_eq!(ty.to_string(), "(A | B)[]");
}

#[test]
fn test_keyof_array_element() {
    let ty = Type::array(Type::type_operator(TypeOperatorKind::KeyOf, named("T")));
    assert_eq!(ty.to_string(), "(keyof T)[]");
    let ty = Type::type_operator(TypeOperatorKind::KeyOf, Type::array(named("T")));
    assert_eq!(ty.to_string(), "keyof T[]");
}

#[test]
fn test_conditional_binds_loosest() {
    let cond = Type::conditional(named("T"), Type::intrinsic("string"), lit(1.0), lit(2.0));
    assert_eq!(cond.to_string(), "T extends string ? 1 : 2");
    let in_union = Type::union(vec![cond.clone(), Type::intrinsic("undefined")]);
    assert_eq!(in_union.to_string(), "(T extends string ? 1 : 2) | undefined");
    let nested_check = Type::conditional(cond, named("U"), lit(3.0), lit(4.0));
    assert_eq!(
        nested_check.to_string(),
        "(T extends string ? 1 : 2) extends U ? 3 : 4"
    );
}

#[test]
fn test_true_false_union_becomes_boolean() {
    let ty = Type::union(vec![
        Type::boolean_literal(true),
        Type::string_literal("x"),
        Type::boolean_literal(false),
    ]);
    let Type::Union(union) = &ty else {
        panic!("expected union");
    };
    assert_eq!(union.types.len(), 2);
    assert!(union.types[0].is_intrinsic("boolean"));
    assert_eq!(ty.to_string(), "boolean | \"x\"");
}

#[test]
fn test_boolean_fold_not_reapplied_on_mutation() {
    let mut union = UnionType::new(vec![Type::boolean_literal(true)]);
    union.types.push(Type::boolean_literal(false));
    assert_eq!(Type::Union(union).to_string(), "true | false");
}

#[test]
fn test_literal_display() {
    assert_eq!(lit(1.5).to_string(), "1.5");
    assert_eq!(lit(-0.0).to_string(), "0");
    assert_eq!(
        Type::literal(LiteralValue::BigInt {
            negative: true,
            value: "12".into()
        })
        .to_string(),
        "-12n"
    );
    assert_eq!(Type::string_literal("a\"b").to_string(), "\"a\\\"b\"");
    assert_eq!(Type::literal(LiteralValue::Null).to_string(), "null");
}

#[test]
fn test_reference_with_type_arguments() {
    let ty = Type::reference(
        ReferenceType::broken("Map").with_type_arguments(vec![Type::intrinsic("string"), named("V")]),
    );
    assert_eq!(ty.to_string(), "Map<string, V>");
}

#[test]
fn test_reflection_displays_as_object() {
    assert_eq!(Type::reflection(ReflectionId(7)).to_string(), "Object");
}

#[test]
fn test_mapped_and_template_literal_display() {
    let mapped = Type::Mapped(MappedType {
        parameter: "K".into(),
        parameter_type: Box::new(Type::type_operator(TypeOperatorKind::KeyOf, named("T"))),
        template_type: Box::new(Type::IndexedAccess(IndexedAccessType {
            object_type: Box::new(named("T")),
            index_type: Box::new(named("K")),
        })),
        readonly_modifier: Some(MappingModifier::Remove),
        optional_modifier: Some(MappingModifier::Add),
        name_type: None,
    });
    assert_eq!(mapped.to_string(), "{ -readonly [K in keyof T]?: T[K] }");

    let template = Type::TemplateLiteral(TemplateLiteralType {
        head: "on".into(),
        tail: vec![(named("E"), "Changed".into())],
    });
    assert_eq!(template.to_string(), "`on${E}Changed`");
}

#[test]
fn test_tuple_members() {
    let ty = Type::tuple(vec![
        Type::NamedTupleMember(NamedTupleMemberType {
            name: "x".into(),
            is_optional: true,
            element: Box::new(Type::intrinsic("number")),
        }),
        Type::Rest(RestType {
            element_type: Box::new(Type::array(Type::intrinsic("string"))),
        }),
    ]);
    assert_eq!(ty.to_string(), "[x?: number, ...string[]]");
}

#[test]
fn test_unknown_is_not_wrapped_at_top_level() {
    assert_eq!(Type::unknown("weird").to_string(), "weird");
    assert_eq!(Type::array(Type::unknown("weird")).to_string(), "(weird)[]");
}

#[test]
fn test_kind_tags_round_trip() {
    for kind in TypeKind::ALL {
        assert_eq!(TypeKind::from_tag(kind.as_str()), Some(kind));
    }
    assert_eq!(TypeKind::from_tag("nope"), None);
}

#[test]
fn test_reflection_declarations_are_collected() {
    let ty = Type::union(vec![
        Type::reflection(ReflectionId(3)),
        Type::array(Type::reflection(ReflectionId(5))),
    ]);
    assert_eq!(ty.reflection_declarations(), vec![ReflectionId(3), ReflectionId(5)]);
}

#[test]
fn test_walk_references_mut_reaches_query_targets() {
    let mut ty = Type::union(vec![
        named("A"),
        Type::Query(QueryType {
            query_type: Box::new(ReferenceType::broken("b")),
        }),
    ]);
    let mut seen = Vec::new();
    ty.walk_references_mut(&mut |r| {
        seen.push(r.name.clone());
        r.set_target(ReferenceTypeTarget::Reflection(ReflectionId(1)));
    });
    assert_eq!(seen, vec!["A", "b"]);
    ty.walk_references(&mut |r| assert_eq!(r.target(), ReferenceTypeTarget::Reflection(ReflectionId(1))));
}

#[test]
fn test_visitor_dispatch_and_default() {
    struct IsArray;
    impl TypeVisitor for IsArray {
        type Output = bool;
        fn default_output() -> bool {
            false
        }
        fn visit_array(&mut self, _ty: &ArrayType) -> bool {
            true
        }
    }
    assert!(Type::array(Type::intrinsic("x")).visit(&mut IsArray));
    assert!(!Type::intrinsic("x").visit(&mut IsArray));
}

#[test]
fn test_contains_type() {
    let ty = Type::array(Type::union(vec![Type::intrinsic("a"), Type::reflection(ReflectionId(2))]));
    assert!(contains_type(&ty, &|t| matches!(t, Type::Reflection(_))));
    assert!(!contains_type(&ty, &|t| matches!(t, Type::Tuple(_))));
}

#[test]
fn test_reference_clone_keeps_target() {
    let reference = ReferenceType::from_symbol("X", ReflectionSymbolId::new("/p/a.ts", "X"));
    let copy = reference.clone();
    assert_eq!(copy, reference);
    assert_eq!(copy.qualified_name.as_deref(), Some("X"));
    assert!(!ReferenceType::broken("Y").to_string().is_empty());
    assert!(ReferenceType::broken("Y").is_intentionally_broken());
}

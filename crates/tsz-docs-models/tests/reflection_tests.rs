use super::*;
use std::cell::Cell;

fn roles(reflection: &Reflection) -> Vec<(u32, TraverseProperty)> {
    reflection
        .structural_children()
        .into_iter()
        .map(|(id, role)| (id.0, role))
        .collect()
}

#[test]
fn test_declaration_traverse_order() {
    let mut decl = Reflection::declaration("Foo", ReflectionKind::CLASS);
    decl.attach(ReflectionId(1), TraverseProperty::Children);
    decl.attach(ReflectionId(2), TraverseProperty::Signatures);
    decl.attach(ReflectionId(3), TraverseProperty::TypeParameter);
    decl.attach(ReflectionId(4), TraverseProperty::SetSignature);
    decl.attach(ReflectionId(5), TraverseProperty::GetSignature);
    decl.attach(ReflectionId(6), TraverseProperty::IndexSignature);
    decl.attach(ReflectionId(7), TraverseProperty::Documents);
    decl.as_declaration_mut().unwrap().type_ = Some(Type::reflection(ReflectionId(8)));

    assert_eq!(
        roles(&decl),
        vec![
            (3, TraverseProperty::TypeParameter),
            (8, TraverseProperty::TypeLiteral),
            (2, TraverseProperty::Signatures),
            (6, TraverseProperty::IndexSignature),
            (5, TraverseProperty::GetSignature),
            (4, TraverseProperty::SetSignature),
            (1, TraverseProperty::Children),
            (7, TraverseProperty::Documents),
        ]
    );
}

#[test]
fn test_signature_traverse_order() {
    let mut sig = Reflection::signature("f", ReflectionKind::CALL_SIGNATURE);
    sig.attach(ReflectionId(1), TraverseProperty::Parameters);
    sig.attach(ReflectionId(2), TraverseProperty::TypeParameter);
    sig.as_signature_mut().unwrap().type_ = Some(Type::array(Type::reflection(ReflectionId(3))));
    assert_eq!(
        roles(&sig),
        vec![
            (3, TraverseProperty::TypeLiteral),
            (2, TraverseProperty::TypeParameter),
            (1, TraverseProperty::Parameters),
        ]
    );
}

#[test]
fn test_traverse_stops_on_break() {
    let mut decl = Reflection::declaration("M", ReflectionKind::MODULE);
    for i in 1..=5 {
        decl.attach(ReflectionId(i), TraverseProperty::Children);
    }
    let visited = Cell::new(0);
    let result = decl.traverse(|id, _| {
        visited.set(visited.get() + 1);
        if id == ReflectionId(2) {
            ControlFlow::Break(())
        } else {
            ControlFlow::Continue(())
        }
    });
    assert_eq!(result, ControlFlow::Break(()));
    assert_eq!(visited.get(), 2);
}

#[test]
#[should_panic(expected = "has no Parameters slot")]
fn test_attach_to_missing_slot_panics() {
    let mut decl = Reflection::declaration("x", ReflectionKind::VARIABLE);
    decl.attach(ReflectionId(1), TraverseProperty::Parameters);
}

#[test]
fn test_detach_type_literal_replaces_with_object() {
    let mut param = Reflection::parameter("options");
    param.as_parameter_mut().unwrap().type_ = Some(Type::union(vec![
        Type::reflection(ReflectionId(9)),
        Type::intrinsic("undefined"),
    ]));
    param.detach(ReflectionId(9), TraverseProperty::TypeLiteral);
    assert_eq!(param.type_().unwrap().to_string(), "Object");
    assert!(param.structural_children().is_empty());
}

#[test]
fn test_type_literal_in_default_is_a_structural_child() {
    let mut type_param = Reflection::type_parameter("T");
    type_param.as_type_parameter_mut().unwrap().default = Some(Type::reflection(ReflectionId(4)));
    assert_eq!(
        type_param.structural_children(),
        vec![(ReflectionId(4), TraverseProperty::TypeLiteral)]
    );

    type_param.detach(ReflectionId(4), TraverseProperty::TypeLiteral);
    let default = type_param.as_type_parameter().unwrap().default.as_ref();
    assert_eq!(default.map(ToString::to_string).as_deref(), Some("Object"));
    assert!(type_param.structural_children().is_empty());
}

#[test]
fn test_detach_clears_accessor_and_groups() {
    let mut decl = Reflection::declaration("value", ReflectionKind::ACCESSOR);
    decl.attach(ReflectionId(1), TraverseProperty::GetSignature);
    decl.detach(ReflectionId(2), TraverseProperty::GetSignature);
    assert_eq!(decl.as_declaration().unwrap().get_signature(), Some(ReflectionId(1)));
    decl.detach(ReflectionId(1), TraverseProperty::GetSignature);
    assert_eq!(decl.as_declaration().unwrap().get_signature(), None);

    let mut module = Reflection::declaration("m", ReflectionKind::MODULE);
    module.attach(ReflectionId(3), TraverseProperty::Children);
    module.attach(ReflectionId(4), TraverseProperty::Children);
    let container = module.container_mut().unwrap();
    let mut functions = ReflectionGroup::new("Functions");
    functions.children = vec![ReflectionId(3)];
    let mut variables = ReflectionGroup::new("Variables");
    variables.children = vec![ReflectionId(3), ReflectionId(4)];
    container.groups = Some(vec![functions, variables]);
    let mut category = ReflectionCategory::new("Other");
    category.children = vec![ReflectionId(3)];
    container.categories = Some(vec![category]);

    module.detach(ReflectionId(3), TraverseProperty::Children);
    let container = module.container().unwrap();
    assert_eq!(container.children(), &[ReflectionId(4)]);
    let groups = container.groups.as_ref().unwrap();
    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].title, "Variables");
    assert_eq!(groups[0].children, vec![ReflectionId(4)]);
    assert!(container.categories.is_none());
}

#[test]
fn test_variant_tags() {
    for tag in VariantTag::ALL {
        assert_eq!(VariantTag::parse(tag.as_str()), Some(tag));
    }
    assert_eq!(Reflection::type_parameter("T").variant_tag(), VariantTag::TypeParam);
    assert_eq!(Reflection::project("p").variant_tag(), VariantTag::Project);
    assert_eq!(VarianceModifier::parse("in out"), Some(VarianceModifier::InOut));
}

#[test]
fn test_reference_target_resolves_once() {
    let target = ReferenceTarget::by_name("a.b");
    assert_eq!(target.state(), None);
    let calls = Cell::new(0);
    let lookup = |name: &str| {
        calls.set(calls.get() + 1);
        assert_eq!(name, "a.b");
        None
    };
    assert_eq!(target.resolve_with(lookup), None);
    assert_eq!(target.resolve_with(|_| Some(ReflectionId(5))), None);
    assert_eq!(calls.get(), 1);
    assert_eq!(target.state(), Some(None));

    let known = ReferenceTarget::id(ReflectionId(2));
    assert_eq!(known.resolve_with(|_| unreachable!()), Some(ReflectionId(2)));
}

#[test]
fn test_types_and_display_parts_accessors() {
    let mut decl = Reflection::declaration("C", ReflectionKind::CLASS)
        .with_type(Type::intrinsic("string"))
        .with_comment(Comment::new(vec![CommentDisplayPart::text("doc")]));
    let data = decl.as_declaration_mut().unwrap();
    data.extended_types.push(Type::intrinsic("Base"));
    data.readme = Some(vec![CommentDisplayPart::text("readme")]);
    assert_eq!(decl.types().len(), 2);
    assert_eq!(decl.types_mut().len(), 2);
    assert_eq!(decl.display_parts_mut().len(), 2);
}

//! End-to-end: build a project, serialize it, revive it, and check that the
//! revived project serializes identically and still links correctly.

use serde_json::Value;
use tsz_docs::models::types::ReferenceType;
use tsz_docs::models::{ReferenceTarget, ReflectionGroup};
use tsz_docs::{
    Comment, CommentDisplayPart, Deserializer, ProjectReflection, Reflection, ReflectionId, ReflectionKind,
    ReflectionSymbolId, Serializer, TraverseProperty, Type,
};

const ROOT: &str = "/work/pkg";

fn library() -> ProjectReflection {
    let mut project = ProjectReflection::new("pkg");
    let options = project.add_reflection(
        ReflectionId::PROJECT,
        TraverseProperty::Children,
        Reflection::declaration("Options", ReflectionKind::INTERFACE)
            .with_comment(Comment::new(vec![CommentDisplayPart::text("Settings.")])),
    );
    project.add_reflection(
        options,
        TraverseProperty::Children,
        Reflection::declaration("verbose", ReflectionKind::PROPERTY).with_type(Type::intrinsic("boolean")),
    );
    let run = project.add_reflection(
        ReflectionId::PROJECT,
        TraverseProperty::Children,
        Reflection::declaration("run", ReflectionKind::FUNCTION),
    );
    let signature = project.add_reflection(
        run,
        TraverseProperty::Signatures,
        Reflection::signature("run", ReflectionKind::CALL_SIGNATURE).with_type(Type::intrinsic("void")),
    );
    project.add_reflection(
        signature,
        TraverseProperty::Parameters,
        Reflection::parameter("options").with_type(Type::reference(ReferenceType::from_symbol(
            "Options",
            ReflectionSymbolId::new("/work/pkg/src/options.ts", "Options"),
        ))),
    );
    project.add_reflection(
        ReflectionId::PROJECT,
        TraverseProperty::Children,
        Reflection::reference("Settings", ReferenceTarget::id(options)),
    );
    project.register_symbol_id(options, ReflectionSymbolId::new("/work/pkg/src/options.ts", "Options"));

    let mut interfaces = ReflectionGroup::new("Interfaces");
    interfaces.children = vec![options];
    let mut functions = ReflectionGroup::new("Functions");
    functions.children = vec![run];
    project
        .root_mut()
        .container_mut()
        .expect("project is a container")
        .groups = Some(vec![interfaces, functions]);
    project
}

fn to_json(project: &ProjectReflection) -> Value {
    Value::Object(Serializer::new().project_to_object(project, ROOT))
}

#[test]
fn revived_project_serializes_identically() {
    let original = library();
    let json = to_json(&original);

    let deserializer = Deserializer::new();
    let revived = deserializer.revive_project(&json, None, ROOT).expect("revive");
    assert!(deserializer.issues().is_empty(), "{:?}", deserializer.issues());
    assert_eq!(revived.reflection_count(), original.reflection_count());

    // Ids were allocated in tree order, so revived ids match the originals.
    assert_eq!(to_json(&revived), json);
}

#[test]
fn revived_references_point_at_revived_reflections() {
    let json = to_json(&library());
    let revived = Deserializer::new().revive_project(&json, None, ROOT).expect("revive");

    let options = revived
        .get_child_by_name(ReflectionId::PROJECT, &["Options"])
        .expect("Options");
    let settings = revived
        .get_child_by_name(ReflectionId::PROJECT, &["Settings"])
        .expect("Settings");
    assert_eq!(revived.reference_target(settings), Some(options));

    let run = revived
        .get_child_by_name(ReflectionId::PROJECT, &["run"])
        .and_then(|id| revived.get_reflection_by_id(id))
        .expect("run");
    let signature = revived
        .get_reflection_by_id(run.as_declaration().expect("declaration").signatures()[0])
        .expect("signature");
    let parameter = revived.get_reflection_by_id(signature.as_signature().expect("signature").parameters()[0]);
    let Some(Type::Reference(reference)) = parameter.and_then(Reflection::type_) else {
        panic!("expected the parameter to keep its reference type");
    };
    assert_eq!(revived.resolve_reference_type(reference), Some(options));
}

#[test]
fn merged_projects_round_trip() {
    let a = to_json(&library());
    let b = to_json(&library());
    let merged = Deserializer::new()
        .revive_projects("all", &[a, b], ROOT)
        .expect("merge");

    let again = Deserializer::new()
        .revive_project(&to_json(&merged), None, ROOT)
        .expect("revive merged");
    assert_eq!(to_json(&again), to_json(&merged));
}

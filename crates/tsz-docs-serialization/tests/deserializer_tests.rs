use super::*;
use crate::serializer::Serializer;
use serde_json::json;
use tsz_docs_models::comment::InlineTagTarget;
use tsz_docs_models::types::{ReferenceType, ReferenceTypeTarget, UnionType};
use tsz_docs_models::{
    Comment, CommentDisplayPart, ReferenceTarget, ReflectionCategory, ReflectionFlags, ReflectionGroup,
};

const ROOT: &str = "/repo";

/// Project touching every serialized feature: nested containers, a type
/// literal, references by id and by symbol, groups, comments with links,
/// the symbol map and the file registry.
fn sample(name: &str) -> ProjectReflection {
    let mut project = ProjectReflection::new(name);
    let module = project.add_reflection(
        ReflectionId::PROJECT,
        TraverseProperty::Children,
        Reflection::declaration("lib", ReflectionKind::MODULE),
    );
    let widget = project.add_reflection(
        module,
        TraverseProperty::Children,
        Reflection::declaration("Widget", ReflectionKind::CLASS)
            .with_flags(ReflectionFlags::ABSTRACT)
            .with_comment(Comment::new(vec![CommentDisplayPart::text("A widget.")])),
    );
    let type_param = project.add_reflection(
        widget,
        TraverseProperty::TypeParameter,
        Reflection::type_parameter("T").with_type(Type::intrinsic("object")),
    );
    let render = project.add_reflection(
        widget,
        TraverseProperty::Children,
        Reflection::declaration("render", ReflectionKind::METHOD).with_comment(Comment::new(vec![
            CommentDisplayPart::text("Draws a "),
            CommentDisplayPart::inline_tag("@link", "Widget", Some(InlineTagTarget::Reflection(widget))),
        ])),
    );
    let signature = project.add_reflection(
        render,
        TraverseProperty::Signatures,
        Reflection::signature("render", ReflectionKind::CALL_SIGNATURE),
    );
    let param = project.add_reflection(signature, TraverseProperty::Parameters, Reflection::parameter("options"));
    let literal = project.add_reflection(
        param,
        TraverseProperty::TypeLiteral,
        Reflection::declaration("__type", ReflectionKind::TYPE_LITERAL),
    );
    project.add_reflection(
        literal,
        TraverseProperty::Children,
        Reflection::declaration("width", ReflectionKind::PROPERTY).with_type(Type::intrinsic("number")),
    );
    project.set_type(
        param,
        Some(Type::union(vec![Type::reflection(literal), Type::intrinsic("undefined")])),
    );
    project.set_type(signature, Some(Type::reference(ReferenceType::to_reflection("T", type_param))));
    let gadget = project.add_reflection(
        module,
        TraverseProperty::Children,
        Reflection::reference("Gadget", ReferenceTarget::id(widget)),
    );
    let mut group = ReflectionGroup::new("Classes");
    group.children = vec![widget];
    let mut references = ReflectionGroup::new("References");
    references.children = vec![gadget];
    let mut category = ReflectionCategory::new("Core");
    category.children = vec![widget, gadget];
    {
        let container = project
            .reflection_mut(module)
            .and_then(Reflection::container_mut)
            .unwrap();
        container.groups = Some(vec![group, references]);
        container.categories = Some(vec![category]);
    }
    project.register_symbol_id(widget, ReflectionSymbolId::new("/repo/src/widget.ts", "Widget"));
    project.files.register_reflection("/repo/docs/widget.md", widget);
    project
}

fn serialize(project: &ProjectReflection) -> serde_json::Value {
    serde_json::Value::Object(Serializer::new().project_to_object(project, ROOT))
}

fn find<'a>(project: &'a ProjectReflection, path: &[&str]) -> &'a Reflection {
    let id = project
        .get_child_by_name(ReflectionId::PROJECT, path)
        .unwrap_or_else(|| panic!("no reflection at {path:?}"));
    project.get_reflection_by_id(id).unwrap()
}

// =============================================================================
// Round trip
// =============================================================================

#[test]
fn test_round_trip_reaches_a_fixpoint() {
    let original = sample("sample");
    let first = serialize(&original);

    let deserializer = Deserializer::new();
    let revived = deserializer.revive_project(&first, None, ROOT).unwrap();
    assert!(deserializer.issues().is_empty(), "{:?}", deserializer.issues());
    assert_eq!(revived.reflection_count(), original.reflection_count());
    assert_eq!(revived.name(), "sample");

    let second = serialize(&revived);
    let again = deserializer.revive_project(&second, None, ROOT).unwrap();
    assert_eq!(serialize(&again), second);
}

#[test]
fn test_round_trip_preserves_links() {
    let revived = Deserializer::new()
        .revive_project(&serialize(&sample("sample")), None, ROOT)
        .unwrap();
    let widget = find(&revived, &["lib", "Widget"]);
    assert!(widget.flags.has_flag(ReflectionFlags::ABSTRACT));
    assert_eq!(
        widget.comment.as_ref().map(|c| c.summary.clone()),
        Some(vec![CommentDisplayPart::text("A widget.")])
    );

    let gadget = find(&revived, &["lib", "Gadget"]);
    assert_eq!(revived.reference_target(gadget.id()), Some(widget.id()));

    let render = find(&revived, &["lib", "Widget", "render"]);
    let link = render.comment.as_ref().unwrap().summary[1].clone();
    assert_eq!(
        link,
        CommentDisplayPart::inline_tag("@link", "Widget", Some(InlineTagTarget::Reflection(widget.id())))
    );

    let signature = revived
        .get_reflection_by_id(render.as_declaration().unwrap().signatures()[0])
        .unwrap();
    let type_param = widget.as_declaration().unwrap().type_parameters()[0];
    let Some(Type::Reference(reference)) = signature.type_() else {
        panic!("expected a reference type, got {:?}", signature.type_());
    };
    assert_eq!(reference.target(), ReferenceTypeTarget::Reflection(type_param));

    let param = revived
        .get_reflection_by_id(signature.as_signature().unwrap().parameters()[0])
        .unwrap();
    assert_eq!(param.type_().map(ToString::to_string).as_deref(), Some("Object | undefined"));
    let literal = param.type_().unwrap().reflection_declarations()[0];
    assert_eq!(revived.get_reflection_by_id(literal).unwrap().parent(), Some(param.id()));

    let module = find(&revived, &["lib"]).container().unwrap();
    let groups = module.groups.as_ref().unwrap();
    assert_eq!(groups[0].children, vec![widget.id()]);
    assert_eq!(groups[1].children, vec![gadget.id()]);
    assert_eq!(
        module.categories.as_ref().unwrap()[0].children,
        vec![widget.id(), gadget.id()]
    );

    assert_eq!(
        revived
            .get_reflection_from_symbol_id(&ReflectionSymbolId::new("/repo/src/widget.ts", "Widget"))
            .map(Reflection::id),
        Some(widget.id())
    );
    assert_eq!(
        revived.files.get_reflection_path(widget.id()).map(|p| p.as_str()),
        Some("/repo/docs/widget.md")
    );
}

#[test]
fn test_revive_with_id_map() {
    let original = sample("sample");
    let json = serialize(&original);
    let (revived, ids) = Deserializer::new()
        .revive_project_with_id_map(&json, Some("renamed"), ROOT)
        .unwrap();

    assert_eq!(revived.name(), "renamed");
    assert_eq!(ids.len(), original.reflection_count());
    assert_eq!(ids.get(&0), Some(&ReflectionId::PROJECT));
    let widget = find(&original, &["lib", "Widget"]).id();
    assert_eq!(ids.get(&widget.0), Some(&find(&revived, &["lib", "Widget"]).id()));
}

#[test]
fn test_revive_project_str() {
    let deserializer = Deserializer::new();
    let text = serde_json::to_string(&serialize(&sample("sample"))).unwrap();
    let revived = deserializer.revive_project_str(&text, None, ROOT).unwrap();
    assert_eq!(revived.name(), "sample");

    let err = deserializer.revive_project_str("{", None, ROOT).unwrap_err();
    assert!(matches!(err, DeserializeError::Json(_)));
}

// =============================================================================
// Merging
// =============================================================================

#[test]
fn test_revive_projects_merges_as_modules() {
    let a = serialize(&sample("a"));
    let b = serialize(&sample("b"));
    let merged = Deserializer::new().revive_projects("all", &[a, b], ROOT).unwrap();

    assert_eq!(merged.name(), "all");
    let modules: Vec<&str> = merged
        .root()
        .container()
        .unwrap()
        .children()
        .iter()
        .map(|id| merged.get_reflection_by_id(*id).unwrap().name.as_str())
        .collect();
    assert_eq!(modules, ["a", "b"]);
    assert!(find(&merged, &["a"]).kind_of(ReflectionKind::MODULE));

    // Serialized ids collide between the inputs; each reference must land in
    // its own project.
    let widget_a = find(&merged, &["a", "lib", "Widget"]).id();
    let widget_b = find(&merged, &["b", "lib", "Widget"]).id();
    assert_ne!(widget_a, widget_b);
    assert_eq!(merged.reference_target(find(&merged, &["a", "lib", "Gadget"]).id()), Some(widget_a));
    assert_eq!(merged.reference_target(find(&merged, &["b", "lib", "Gadget"]).id()), Some(widget_b));

    // Both inputs name the same symbol.
    let symbol = ReflectionSymbolId::new("/repo/src/widget.ts", "Widget");
    let ids: Vec<ReflectionId> = merged
        .get_reflections_from_symbol_id(&symbol)
        .into_iter()
        .map(Reflection::id)
        .collect();
    assert_eq!(ids, [widget_a, widget_b]);
    assert_eq!(merged.reflection_count(), 1 + 2 * (sample("x").reflection_count()));
}

#[test]
fn test_revive_projects_rejects_any_non_project() {
    let result = Deserializer::new().revive_projects("all", &[serialize(&sample("a")), json!([])], ROOT);
    assert!(matches!(result, Err(DeserializeError::NotAProject { .. })));
}

// =============================================================================
// Lenient input
// =============================================================================

#[test]
fn test_non_project_root_is_an_error() {
    let deserializer = Deserializer::new();
    let err = deserializer
        .revive_project(&json!({ "variant": "declaration", "name": "x" }), None, ROOT)
        .unwrap_err();
    assert_eq!(
        err.to_string(),
        "expected a serialized project object, found variant \"declaration\""
    );
    let err = deserializer.revive_project(&json!(3), None, ROOT).unwrap_err();
    assert_eq!(err.to_string(), "expected a serialized project object, found a number");
}

#[test]
fn test_unknown_keys_are_ignored() {
    let input = json!({
        "id": 0,
        "name": "p",
        "variant": "project",
        "kind": 1,
        "flags": { "isSomethingNew": true },
        "futureField": [1, 2, 3],
        "children": [{
            "id": 1,
            "name": "a",
            "variant": "declaration",
            "kind": 32,
            "flags": { "isConst": true },
            "whatever": { "nested": true },
            "type": { "type": "intrinsic", "name": "string", "extra": 1 }
        }]
    });
    let deserializer = Deserializer::new();
    let project = deserializer.revive_project(&input, None, ROOT).unwrap();
    assert!(deserializer.issues().is_empty());

    let a = find(&project, &["a"]);
    assert_eq!(a.flags, ReflectionFlags::CONST);
    assert_eq!(a.type_(), Some(&Type::intrinsic("string")));
    assert_eq!(project.root().flags, ReflectionFlags::empty());
}

#[test]
fn test_missing_ids_become_issues() {
    let input = json!({
        "id": 0,
        "name": "p",
        "variant": "project",
        "kind": 1,
        "flags": {},
        "children": [
            {
                "id": 1, "name": "a", "variant": "declaration", "kind": 32, "flags": {},
                "type": { "type": "reference", "target": 99, "name": "Missing" },
                "comment": { "summary": [{ "kind": "inline-tag", "tag": "@link", "text": "x", "target": 98 }] }
            },
            { "id": 2, "name": "r", "variant": "reference", "kind": 4194304, "flags": {}, "target": 97 }
        ],
        "groups": [{ "title": "Variables", "children": [1, 96] }],
        "symbolIdMap": { "95": { "sourceFileName": "src/a.ts", "qualifiedName": "a" } }
    });
    let deserializer = Deserializer::new();
    let project = deserializer.revive_project(&input, None, ROOT).unwrap();

    let mut issues = deserializer.take_issues();
    issues.sort_by_key(|issue| match issue {
        DeserializeIssue::MissingReflection { old_id, .. } => *old_id,
        _ => 0,
    });
    assert_eq!(
        issues,
        vec![
            DeserializeIssue::MissingReflection { old_id: 95, context: "symbol id map" },
            DeserializeIssue::MissingReflection { old_id: 96, context: "group" },
            DeserializeIssue::MissingReflection { old_id: 97, context: "reference reflection" },
            DeserializeIssue::MissingReflection { old_id: 98, context: "inline tag" },
            DeserializeIssue::MissingReflection { old_id: 99, context: "reference type" },
        ]
    );
    assert!(deserializer.issues().is_empty());

    let a = find(&project, &["a"]);
    let Some(Type::Reference(reference)) = a.type_() else {
        panic!("expected a reference type");
    };
    assert_eq!(reference.target(), ReferenceTypeTarget::Broken);
    let CommentDisplayPart::InlineTag(tag) = &a.comment.as_ref().unwrap().summary[0] else {
        panic!("expected an inline tag");
    };
    assert_eq!(tag.target, None);
    assert_eq!(project.reference_target(find(&project, &["r"]).id()), None);
    assert_eq!(
        project.root().container().unwrap().groups.as_ref().unwrap()[0].children,
        vec![a.id()]
    );
}

#[test]
fn test_unknown_variants_and_types_are_skipped() {
    let input = json!({
        "id": 0, "name": "p", "variant": "project", "kind": 1, "flags": {},
        "children": [
            { "id": 1, "name": "x", "variant": "mystery", "kind": 32, "flags": {} },
            { "id": 2, "name": "nested", "variant": "project", "kind": 1, "flags": {} },
            { "id": 3, "name": "y", "variant": "declaration", "kind": 32, "flags": {},
              "type": { "type": "hologram" } }
        ]
    });
    let deserializer = Deserializer::new();
    let project = deserializer.revive_project(&input, None, ROOT).unwrap();

    assert_eq!(project.reflection_count(), 2);
    assert_eq!(find(&project, &["y"]).type_(), None);
    assert_eq!(
        deserializer.issues(),
        vec![
            DeserializeIssue::UnknownVariant { variant: "mystery".into() },
            DeserializeIssue::MisplacedVariant { variant: "project".into() },
            DeserializeIssue::UnknownTypeKind { kind: "hologram".into() },
        ]
    );
}

#[test]
fn test_serialized_union_is_not_folded() {
    let input = json!({
        "id": 0, "name": "p", "variant": "project", "kind": 1, "flags": {},
        "children": [{
            "id": 1, "name": "flag", "variant": "declaration", "kind": 32, "flags": {},
            "type": { "type": "union", "types": [
                { "type": "literal", "value": true },
                { "type": "literal", "value": false }
            ]}
        }]
    });
    let project = Deserializer::new().revive_project(&input, None, ROOT).unwrap();
    let ty = find(&project, &["flag"]).type_().unwrap();
    assert_eq!(ty.to_string(), "true | false");
}

#[test]
fn test_union_element_summary_links_round_trip() {
    let mut project = ProjectReflection::new("p");
    let options = project.add_reflection(
        ReflectionId::PROJECT,
        TraverseProperty::Children,
        Reflection::declaration("Options", ReflectionKind::INTERFACE),
    );
    let mut union = UnionType::new(vec![Type::intrinsic("string"), Type::intrinsic("number")]);
    union.element_summaries = Some(vec![
        vec![
            CommentDisplayPart::text("A name, see "),
            CommentDisplayPart::inline_tag("@link", "Options", Some(InlineTagTarget::Reflection(options))),
        ],
        vec![CommentDisplayPart::text("An index.")],
    ]);
    project.add_reflection(
        ReflectionId::PROJECT,
        TraverseProperty::Children,
        Reflection::declaration("key", ReflectionKind::VARIABLE).with_type(Type::Union(union)),
    );
    let json = serialize(&project);

    let deserializer = Deserializer::new();
    let revived = deserializer.revive_project(&json, None, ROOT).unwrap();
    assert!(deserializer.issues().is_empty(), "{:?}", deserializer.issues());
    assert_eq!(serialize(&revived), json);

    let Some(Type::Union(union)) = find(&revived, &["key"]).type_() else {
        panic!("expected a union");
    };
    let summaries = union.element_summaries.as_ref().unwrap();
    let CommentDisplayPart::InlineTag(tag) = &summaries[0][1] else {
        panic!("expected an inline tag");
    };
    assert_eq!(tag.target, Some(InlineTagTarget::Reflection(find(&revived, &["Options"]).id())));
}

#[test]
fn test_relative_links_use_revived_file_ids() {
    let input = json!({
        "id": 0, "name": "p", "variant": "project", "kind": 1, "flags": {},
        "readme": [
            { "kind": "relative-link", "text": "guide", "target": 7, "targetAnchor": "intro" },
            { "kind": "relative-link", "text": "lost", "target": 8 }
        ],
        "files": { "entries": { "7": "docs/guide.md" }, "reflections": {} }
    });
    let deserializer = Deserializer::new();
    let project = deserializer.revive_project(&input, None, ROOT).unwrap();

    let readme = project.root().as_project().unwrap().readme.clone().unwrap();
    let CommentDisplayPart::RelativeLink(guide) = &readme[0] else {
        panic!("expected a relative link");
    };
    let file = guide.target.unwrap();
    assert_eq!(project.files.path(file).map(|p| p.as_str()), Some("/repo/docs/guide.md"));
    assert_eq!(guide.target_anchor.as_deref(), Some("intro"));
    let CommentDisplayPart::RelativeLink(lost) = &readme[1] else {
        panic!("expected a relative link");
    };
    assert_eq!(lost.target, None);
    assert_eq!(deserializer.issues(), vec![DeserializeIssue::MissingFile { old_id: 8 }]);
}

// =============================================================================
// Components and builders
// =============================================================================

/// Copies `customField` into plugin data.
struct CustomField;

impl DeserializerComponent for CustomField {
    fn priority(&self) -> i32 {
        0
    }

    fn supports(&self, revived: &Revived<'_>, obj: &JsonObject) -> bool {
        matches!(revived, Revived::Reflection(_)) && obj.contains_key("customField")
    }

    fn from_object(&self, revived: &mut Revived<'_>, obj: &JsonObject, ctx: &mut DeserializeContext<'_>) {
        if let Revived::Reflection(id) = revived
            && let Some(reflection) = ctx.project.reflection_mut(*id)
        {
            reflection
                .plugin_data
                .insert("custom".into(), obj["customField"].clone());
        }
    }
}

/// Renames every intrinsic type after the built-in fields were read.
struct Shout;

impl DeserializerComponent for Shout {
    fn priority(&self) -> i32 {
        10
    }

    fn supports(&self, revived: &Revived<'_>, _: &JsonObject) -> bool {
        matches!(revived, Revived::Type(Type::Intrinsic(_)))
    }

    fn from_object(&self, revived: &mut Revived<'_>, _: &JsonObject, _: &mut DeserializeContext<'_>) {
        if let Revived::Type(Type::Intrinsic(intrinsic)) = revived {
            intrinsic.name = intrinsic.name.to_uppercase();
        }
    }
}

fn one_child(extra: serde_json::Value) -> serde_json::Value {
    let mut child = json!({
        "id": 1, "name": "a", "variant": "declaration", "kind": 32, "flags": {},
        "type": { "type": "intrinsic", "name": "string" }
    });
    if let (Some(child), Some(extra)) = (child.as_object_mut(), extra.as_object()) {
        child.extend(extra.clone());
    }
    json!({ "id": 0, "name": "p", "variant": "project", "kind": 1, "flags": {}, "children": [child] })
}

#[test]
fn test_components_see_revived_values() {
    let mut deserializer = Deserializer::new();
    deserializer.add_deserializer(CustomField);
    let shout = deserializer.add_deserializer(Shout);

    let input = one_child(json!({ "customField": { "x": 1 } }));
    let project = deserializer.revive_project(&input, None, ROOT).unwrap();
    let a = find(&project, &["a"]);
    assert_eq!(a.plugin_data.get("custom"), Some(&json!({ "x": 1 })));
    assert_eq!(a.type_(), Some(&Type::intrinsic("STRING")));

    assert!(deserializer.remove_deserializer(shout));
    assert!(!deserializer.remove_deserializer(shout));
    let project = deserializer.revive_project(&input, None, ROOT).unwrap();
    assert_eq!(find(&project, &["a"]).type_(), Some(&Type::intrinsic("string")));
}

#[test]
fn test_builders_can_be_replaced() {
    let mut deserializer = Deserializer::new();
    deserializer.set_type_builder(TypeKind::Intrinsic, |_, _, _| Some(Type::unknown("replaced")));
    deserializer.set_reflection_builder(VariantTag::Declaration, |obj, _| {
        let name = json::str_field(obj, "name").unwrap_or_default();
        Reflection::declaration(format!("{name}!"), ReflectionKind::VARIABLE)
    });

    let project = deserializer.revive_project(&one_child(json!({})), None, ROOT).unwrap();
    let a = find(&project, &["a!"]);
    assert_eq!(a.type_(), Some(&Type::unknown("replaced")));
}

/// Tries to defer more work from inside deferred work.
struct DeferTwice;

impl DeserializerComponent for DeferTwice {
    fn priority(&self) -> i32 {
        0
    }

    fn supports(&self, revived: &Revived<'_>, _: &JsonObject) -> bool {
        matches!(revived, Revived::Reflection(id) if id.is_project())
    }

    fn from_object(&self, _: &mut Revived<'_>, _: &JsonObject, ctx: &mut DeserializeContext<'_>) {
        ctx.defer(|ctx| ctx.defer(|_| {}));
    }
}

#[test]
#[should_panic(expected = "cannot defer work while deferred work is running")]
fn test_defer_while_draining_panics() {
    let mut deserializer = Deserializer::new();
    deserializer.add_deserializer(DeferTwice);
    let _ = deserializer.revive_project(&one_child(json!({})), None, ROOT);
}

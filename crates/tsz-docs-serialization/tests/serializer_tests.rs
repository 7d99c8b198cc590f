use super::*;
use serde_json::json;
use std::cell::Cell;
use std::rc::Rc;
use tsz_docs_models::comment::InlineTagTarget;
use tsz_docs_models::types::ReferenceType;
use tsz_docs_models::{
    Comment, CommentDisplayPart, CommentTag, ReferenceTarget, ReflectionFlags, ReflectionGroup,
    ReflectionKind, ReflectionSymbolId, SourceReference, TraverseProperty, Type,
};

const ROOT: &str = "/repo";

struct Writes {
    key: &'static str,
    value: i64,
    priority: i32,
}

impl SerializerComponent for Writes {
    type Item = Reflection;

    fn priority(&self) -> i32 {
        self.priority
    }

    fn to_object(&self, _: &Reflection, mut obj: JsonObject, _: &SerializeContext<'_>) -> JsonObject {
        obj.insert(self.key.into(), self.value.into());
        obj
    }
}

/// Records whether key `a` was already written when it ran.
struct SeesA;

impl SerializerComponent for SeesA {
    type Item = Reflection;

    fn priority(&self) -> i32 {
        1
    }

    fn to_object(&self, _: &Reflection, mut obj: JsonObject, _: &SerializeContext<'_>) -> JsonObject {
        let saw = obj.contains_key("a");
        obj.insert("b".into(), 2.into());
        obj.insert("sawA".into(), saw.into());
        obj
    }
}

struct DeclarationsOnly;

impl SerializerComponent for DeclarationsOnly {
    type Item = Reflection;

    fn priority(&self) -> i32 {
        0
    }

    fn supports(&self, item: &Reflection) -> bool {
        item.is_declaration()
    }

    fn to_object(&self, _: &Reflection, mut obj: JsonObject, _: &SerializeContext<'_>) -> JsonObject {
        obj.insert("declaration".into(), true.into());
        obj
    }
}

fn context<'a>(serializer: &'a Serializer, project: &'a ProjectReflection) -> SerializeContext<'a> {
    SerializeContext {
        serializer,
        project,
        project_root: ROOT,
    }
}

/// `lib` module with a `Widget` class whose `render` method takes an
/// `options` parameter typed as an object literal.
fn sample() -> (ProjectReflection, ReflectionId) {
    let mut project = ProjectReflection::new("sample");
    let module = project.add_reflection(
        ReflectionId::PROJECT,
        TraverseProperty::Children,
        Reflection::declaration("lib", ReflectionKind::MODULE),
    );
    let mut widget = Reflection::declaration("Widget", ReflectionKind::CLASS)
        .with_comment(Comment::new(vec![CommentDisplayPart::text("A widget.")]));
    widget.flags.set_flag(ReflectionFlags::ABSTRACT, true);
    let widget = project.add_reflection(module, TraverseProperty::Children, widget);
    if let Some(data) = project.reflection_mut(widget).and_then(Reflection::as_declaration_mut) {
        data.sources
            .push(SourceReference::new("/repo/src/widget.ts", 3, 0).relative_to(ROOT));
    }
    let render = project.add_reflection(
        widget,
        TraverseProperty::Children,
        Reflection::declaration("render", ReflectionKind::METHOD),
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
    project.set_type(param, Some(Type::reflection(literal)));
    project.set_type(
        signature,
        Some(Type::reference(ReferenceType::to_reflection("Widget", widget))),
    );
    project.register_symbol_id(widget, ReflectionSymbolId::new("/repo/src/widget.ts", "Widget"));
    (project, widget)
}

// =============================================================================
// Component composition
// =============================================================================

#[test]
fn test_components_fold_in_descending_priority() {
    let mut serializer = Serializer::empty();
    serializer.add_serializer(SeesA);
    serializer.add_serializer(Writes {
        key: "a",
        value: 1,
        priority: 1000,
    });
    let project = ProjectReflection::new("p");
    let obj = serializer.to_object(project.root(), &context(&serializer, &project));

    assert_eq!(obj.get("a"), Some(&json!(1)));
    assert_eq!(obj.get("b"), Some(&json!(2)));
    assert_eq!(obj.get("sawA"), Some(&json!(true)));
    let keys: Vec<&str> = obj.keys().map(String::as_str).collect();
    assert_eq!(keys, ["a", "b", "sawA"]);
}

#[test]
fn test_equal_priorities_run_in_registration_order() {
    let mut serializer = Serializer::empty();
    serializer.add_serializer(Writes {
        key: "x",
        value: 1,
        priority: 5,
    });
    serializer.add_serializer(Writes {
        key: "x",
        value: 2,
        priority: 5,
    });
    let project = ProjectReflection::new("p");
    let obj = serializer.to_object(project.root(), &context(&serializer, &project));
    assert_eq!(obj.get("x"), Some(&json!(2)));
}

#[test]
fn test_supports_filters_components() {
    let mut serializer = Serializer::empty();
    serializer.add_serializer(DeclarationsOnly);
    let (project, widget) = sample();
    let ctx = context(&serializer, &project);

    assert!(serializer.to_object(project.root(), &ctx).is_empty());
    let widget = project.get_reflection_by_id(widget).unwrap();
    assert_eq!(serializer.to_object(widget, &ctx).get("declaration"), Some(&json!(true)));
}

#[test]
fn test_remove_serializer() {
    let mut serializer = Serializer::new();
    let id = serializer.add_serializer(Writes {
        key: "extra",
        value: 7,
        priority: 1,
    });
    let project = ProjectReflection::new("p");
    assert_eq!(serializer.project_to_object(&project, ROOT).get("extra"), Some(&json!(7)));

    assert!(serializer.remove_serializer(id));
    assert!(!serializer.remove_serializer(id));
    assert!(!serializer.project_to_object(&project, ROOT).contains_key("extra"));
}

#[test]
fn test_values_without_components_serialize_empty() {
    let serializer = Serializer::empty();
    let project = ProjectReflection::new("p");
    let ctx = context(&serializer, &project);
    assert!(serializer.to_object(&Type::intrinsic("string"), &ctx).is_empty());
}

// =============================================================================
// Events
// =============================================================================

#[test]
fn test_begin_and_end_events() {
    let mut serializer = Serializer::new();
    let began = Rc::new(Cell::new(0));
    let seen = Rc::clone(&began);
    serializer.on_begin(0, move |event| {
        assert_eq!(event.project_root, ROOT);
        seen.set(seen.get() + 1);
    });
    // Lower priority runs later and sees the earlier edit.
    serializer.on_end(5, |_, output| {
        let x = output.get("x").and_then(serde_json::Value::as_i64).unwrap_or(0);
        output.insert("y".into(), (x + 1).into());
    });
    serializer.on_end(10, |event, output| {
        output.insert("x".into(), 1.into());
        output.insert("count".into(), event.project.reflection_count().into());
    });

    let project = ProjectReflection::new("p");
    let output = serializer.project_to_object(&project, ROOT);
    assert_eq!(began.get(), 1);
    assert_eq!(output.get("y"), Some(&json!(2)));
    assert_eq!(output.get("count"), Some(&json!(1)));
}

#[test]
fn test_removed_listener_is_not_called() {
    let mut serializer = Serializer::new();
    let calls = Rc::new(Cell::new(0));
    let seen = Rc::clone(&calls);
    let id = serializer.on_begin(0, move |_| seen.set(seen.get() + 1));
    assert!(serializer.off(id));
    assert!(!serializer.off(id));

    serializer.project_to_object(&ProjectReflection::new("p"), ROOT);
    assert_eq!(calls.get(), 0);
}

// =============================================================================
// Output shape
// =============================================================================

#[test]
fn test_project_output_shape() {
    let (project, widget) = sample();
    let output = Serializer::new().project_to_object(&project, ROOT);

    assert_eq!(output["id"], json!(0));
    assert_eq!(output["variant"], json!("project"));
    assert_eq!(output["kind"], json!(1));
    assert_eq!(output["schemaVersion"], json!("2.0"));
    assert_eq!(output["flags"], json!({}));

    let class = &output["children"][0]["children"][0];
    assert_eq!(class["id"], json!(widget.0));
    assert_eq!(class["name"], json!("Widget"));
    assert_eq!(class["variant"], json!("declaration"));
    assert_eq!(class["kind"], json!(ReflectionKind::CLASS.bits()));
    assert_eq!(class["flags"], json!({ "isAbstract": true }));
    assert_eq!(
        class["comment"],
        json!({ "summary": [{ "kind": "text", "text": "A widget." }] })
    );
    assert_eq!(
        class["sources"],
        json!([{ "fileName": "src/widget.ts", "line": 3, "character": 0 }])
    );

    let signature = &class["children"][0]["signatures"][0];
    assert_eq!(signature["variant"], json!("signature"));
    assert_eq!(
        signature["type"],
        json!({ "type": "reference", "target": widget.0, "name": "Widget" })
    );
    let parameter = &signature["parameters"][0];
    assert_eq!(parameter["type"]["type"], json!("reflection"));
    assert_eq!(parameter["type"]["declaration"]["name"], json!("__type"));
    assert_eq!(parameter["type"]["declaration"]["variant"], json!("declaration"));

    assert_eq!(
        output["symbolIdMap"],
        json!({ widget.0.to_string(): { "sourceFileName": "src/widget.ts", "qualifiedName": "Widget" } })
    );
    assert_eq!(output["files"], json!({ "entries": {}, "reflections": {} }));
}

#[test]
fn test_absent_values_are_omitted() {
    let (project, _) = sample();
    let output = Serializer::new().project_to_object(&project, ROOT);
    let module = output["children"][0].as_object().unwrap();

    for key in ["comment", "groups", "categories", "documents", "type", "signatures", "sources", "readme"] {
        assert!(!module.contains_key(key), "unexpected key {key}");
    }
}

#[test]
fn test_broken_reference_reflection_target() {
    let mut project = ProjectReflection::new("p");
    let target = project.add_reflection(
        ReflectionId::PROJECT,
        TraverseProperty::Children,
        Reflection::declaration("Real", ReflectionKind::CLASS),
    );
    project.add_reflection(
        ReflectionId::PROJECT,
        TraverseProperty::Children,
        Reflection::reference("Alias", ReferenceTarget::id(target)),
    );
    project.add_reflection(
        ReflectionId::PROJECT,
        TraverseProperty::Children,
        Reflection::reference("Dangling", ReferenceTarget::broken()),
    );

    let output = Serializer::new().project_to_object(&project, ROOT);
    assert_eq!(output["children"][1]["target"], json!(target.0));
    assert_eq!(output["children"][2]["target"], json!(-1));
}

#[test]
fn test_groups_and_categories_list_ids() {
    let (mut project, widget) = sample();
    let module = project.get_reflection_by_id(widget).unwrap().parent().unwrap();
    let mut group = ReflectionGroup::new("Classes");
    group.children = vec![widget, ReflectionId(999)];
    project
        .reflection_mut(module)
        .and_then(Reflection::container_mut)
        .unwrap()
        .groups = Some(vec![group]);

    let output = Serializer::new().project_to_object(&project, ROOT);
    assert_eq!(
        output["children"][0]["groups"],
        json!([{ "title": "Classes", "children": [widget.0] }])
    );
}

// =============================================================================
// Types and comments
// =============================================================================

#[test]
fn test_literal_values() {
    let serializer = Serializer::new();
    let project = ProjectReflection::new("p");
    let ctx = context(&serializer, &project);

    let value = |ty: Type| serializer.to_object(&ty, &ctx)["value"].clone();
    assert_eq!(value(Type::number_literal(1.0)), json!(1));
    assert_eq!(value(Type::number_literal(1.5)), json!(1.5));
    assert_eq!(value(Type::number_literal(f64::NAN)), json!(null));
    assert_eq!(value(Type::string_literal("a")), json!("a"));
    assert_eq!(value(Type::boolean_literal(false)), json!(false));
    assert_eq!(
        value(Type::literal(tsz_docs_models::types::LiteralValue::BigInt {
            negative: true,
            value: "12".into(),
        })),
        json!({ "negative": true, "value": "12" })
    );
}

#[test]
fn test_reference_targets() {
    let (project, widget) = sample();
    let serializer = Serializer::new();
    let ctx = context(&serializer, &project);

    let by_symbol = Type::reference(ReferenceType::from_symbol(
        "Widget",
        ReflectionSymbolId::new("/repo/src/widget.ts", "Widget"),
    ));
    assert_eq!(serializer.to_object(&by_symbol, &ctx)["target"], json!(widget.0));

    let external = ReflectionSymbolId::new("/repo/node_modules/x/index.d.ts", "Thing");
    let mut reference = ReferenceType::from_symbol("Thing", external);
    reference.package = Some("x".into());
    let obj = serializer.to_object(&Type::reference(reference), &ctx);
    assert_eq!(
        obj["target"],
        json!({ "sourceFileName": "node_modules/x/index.d.ts", "qualifiedName": "Thing" })
    );
    assert_eq!(obj["package"], json!("x"));
    assert_eq!(obj["qualifiedName"], json!("Thing"));

    let broken = Type::reference(ReferenceType::broken("Gone"));
    assert_eq!(serializer.to_object(&broken, &ctx)["target"], json!(-1));
}

#[test]
fn test_comment_output() {
    let (project, widget) = sample();
    let serializer = Serializer::new();
    let ctx = context(&serializer, &project);

    let mut comment = Comment::new(vec![
        CommentDisplayPart::text("See "),
        CommentDisplayPart::inline_tag("@link", "Widget", Some(InlineTagTarget::Reflection(widget))),
        CommentDisplayPart::inline_tag("@link", "docs", Some(InlineTagTarget::Url("https://x.dev".into()))),
        CommentDisplayPart::inline_tag("@link", "gone", Some(InlineTagTarget::Reflection(ReflectionId(999)))),
    ]);
    comment.block_tags.push(CommentTag::new("@param", vec![CommentDisplayPart::code("`x`")]).with_name("x"));
    comment.modifier_tags.insert("@beta".into());

    let obj = serializer.to_object(&comment, &ctx);
    assert_eq!(obj["summary"][1]["target"], json!(widget.0));
    assert_eq!(obj["summary"][1]["kind"], json!("inline-tag"));
    assert_eq!(obj["summary"][2]["target"], json!("https://x.dev"));
    assert!(obj["summary"][3].get("target").is_none());
    assert_eq!(
        obj["blockTags"],
        json!([{ "tag": "@param", "name": "x", "content": [{ "kind": "code", "text": "`x`" }] }])
    );
    assert_eq!(obj["modifierTags"], json!(["@beta"]));
}

#[test]
fn test_file_registry_output() {
    let (mut project, widget) = sample();
    project.files.register_reflection("/repo/docs/guide.md", widget);
    project.files.register_absolute("/repo/assets/logo.png");

    let output = Serializer::new().project_to_object(&project, ROOT);
    assert_eq!(
        output["files"],
        json!({
            "entries": { "1": "docs/guide.md", "2": "assets/logo.png" },
            "reflections": { "1": widget.0 },
        })
    );
}

#[test]
fn test_project_to_string_pretty() {
    let project = ProjectReflection::new("p");
    let serializer = Serializer::new();
    let compact = serializer.project_to_string(&project, ROOT, false).unwrap();
    let pretty = serializer.project_to_string(&project, ROOT, true).unwrap();
    assert!(!compact.contains('\n'));
    assert!(pretty.contains('\n'));
    assert_eq!(
        serde_json::from_str::<serde_json::Value>(&compact).unwrap(),
        serde_json::from_str::<serde_json::Value>(&pretty).unwrap()
    );
}

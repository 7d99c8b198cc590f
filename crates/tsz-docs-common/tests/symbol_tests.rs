use super::*;

#[test]
fn test_identity_includes_position() {
    let a = ReflectionSymbolId::new("/p/src/a.ts", "Foo.bar").with_pos(10);
    let b = ReflectionSymbolId::new("/p/src/a.ts", "Foo.bar").with_pos(20);
    let c = ReflectionSymbolId::new("/p/src/a.ts", "Foo.bar").with_pos(10);
    assert_ne!(a, b);
    assert_eq!(a, c);
    assert_ne!(a.stable_key(), b.stable_key());
}

#[test]
fn test_serialized_round_trip_drops_position() {
    let id = ReflectionSymbolId::new("/p/src/a.ts", "Foo").with_pos(3);
    let file = id.serialized_file_name("/p");
    assert_eq!(file, "src/a.ts");
    let back = ReflectionSymbolId::from_serialized("/p", &file, "Foo");
    assert_eq!(back.file_name, id.file_name);
    assert_eq!(back.qualified_name, "Foo");
    assert_eq!(back.pos, None);
}

#[test]
fn test_stable_key_without_position() {
    let id = ReflectionSymbolId::new("/p/a.ts", "x");
    assert_eq!(id.stable_key(), "/p/a.ts\0x");
}

#[test]
fn test_symbol_id_is_its_own_compiler_symbol() {
    let id = ReflectionSymbolId::new("/p/a.ts", "x");
    assert_eq!(id.symbol_id(), id);
    assert_eq!(id.parent_symbol_id(), None);
    assert_eq!(id.declaration_files(), vec![NormalizedPath::new("/p/a.ts")]);
}

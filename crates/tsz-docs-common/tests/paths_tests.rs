use super::*;

#[test]
fn test_normalize_collapses_dot_segments() {
    assert_eq!(NormalizedPath::new("/a/./b/../c//d.ts").as_str(), "/a/c/d.ts");
    assert_eq!(NormalizedPath::new("/../x").as_str(), "/x");
    assert_eq!(NormalizedPath::new("a/../../b").as_str(), "../b");
}

#[test]
fn test_normalize_windows_paths() {
    assert_eq!(NormalizedPath::new(r"c:\src\lib\..\index.ts").as_str(), "C:/src/index.ts");
}

#[test]
fn test_resolve_relative_against_base() {
    assert_eq!(
        NormalizedPath::resolve("/project/src", "../README.md").as_str(),
        "/project/README.md"
    );
    assert_eq!(
        NormalizedPath::resolve("/project/src", "/other/file.ts").as_str(),
        "/other/file.ts"
    );
}

#[test]
fn test_relative_to() {
    let path = NormalizedPath::new("/project/src/index.ts");
    assert_eq!(path.relative_to("/project"), "src/index.ts");
    assert_eq!(path.relative_to("/project/test"), "../src/index.ts");
    assert_eq!(path.relative_to("/project/src/index.ts"), ".");
}

#[test]
fn test_relative_to_different_roots_returns_absolute() {
    let path = NormalizedPath::new("D:/lib/a.ts");
    assert_eq!(path.relative_to("C:/project"), "D:/lib/a.ts");
}

#[test]
fn test_dirname_and_basename() {
    let path = NormalizedPath::new("/project/docs/guide.md");
    assert_eq!(path.dirname(), "/project/docs");
    assert_eq!(path.basename(), "guide.md");
    assert_eq!(NormalizedPath::new("/top.md").dirname(), "/");
}

#[test]
fn test_split_extension() {
    assert_eq!(split_extension("readme.md"), ("readme", ".md"));
    assert_eq!(split_extension(".gitignore"), (".gitignore", ""));
    assert_eq!(split_extension("LICENSE"), ("LICENSE", ""));
}

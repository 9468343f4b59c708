use std::fs;

use codegraph_common::language::LanguageTag;
use codegraph_engine::analyze_project;

fn write_source(dir: &std::path::Path, relative: &str, contents: &str) {
    let path = dir.join(relative);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, contents).unwrap();
}

#[test]
fn merges_java_and_go_ir_preserving_each_entity_language_tag() {
    let dir = tempfile::tempdir().unwrap();
    write_source(dir.path(), "go.mod", "module example.com/app\n\ngo 1.21\n");
    write_source(
        dir.path(),
        "Greeter.java",
        "package hello;\n\nclass Greeter {\n  String greet() { return \"hi\"; }\n}\n",
    );
    write_source(
        dir.path(),
        "main.go",
        "package main\n\nfunc greet() string { return \"hi\" }\n",
    );

    let result = analyze_project("proj", dir.path()).unwrap();

    assert_eq!(result.languages_scanned, vec![LanguageTag::Java, LanguageTag::Go]);
    assert!(result.errors.is_empty());

    let java_type = result.ir.types.iter().find(|t| t.qualified_name == "hello.Greeter").expect("Greeter type");
    assert_eq!(java_type.language, LanguageTag::Java);

    let go_callable =
        result.ir.callables.iter().find(|c| c.qualified_name == "example.com/app.greet").expect("greet callable");
    assert_eq!(go_callable.language, LanguageTag::Go);

    assert_eq!(result.types_count, result.ir.types.len());
    assert_eq!(result.callables_count, result.ir.callables.len());
}

#[test]
fn calls_to_methods_absent_from_the_scanned_tree_are_not_recorded_as_unresolved() {
    let dir = tempfile::tempdir().unwrap();
    write_source(
        dir.path(),
        "App.java",
        "package hello;\n\n\
         class Box {}\n\n\
         class App {\n\
         \tvoid run() {\n\
         \t\tBox b = new Box();\n\
         \t\tb.doSomethingExternal();\n\
         \t}\n\
         }\n",
    );

    let result = analyze_project("proj", dir.path()).unwrap();

    let run = result.ir.callables.iter().find(|c| c.qualified_name == "hello.App.run").expect("run callable");
    assert!(run.calls.is_empty());
    assert!(
        result.ir.unresolved_references.iter().all(|u| u.target_name != "doSomethingExternal"),
        "a method name absent from the whole scanned tree must be tolerated as an external call, not recorded"
    );
}

#[test]
fn spring_and_gin_enrichers_both_run_on_a_polyglot_tree() {
    let dir = tempfile::tempdir().unwrap();
    write_source(dir.path(), "go.mod", "module example.com/app\n\ngo 1.21\n");
    write_source(
        dir.path(),
        "UsersCtrl.java",
        "package api;\n\n@RestController\nclass UsersCtrl {\n  @GetMapping(\"/users\")\n  void list() {}\n}\n",
    );
    write_source(
        dir.path(),
        "main.go",
        "package main\n\nimport \"github.com/gin-gonic/gin\"\n\nfunc ping(c *gin.Context) {}\n\nfunc setup(r *gin.Engine) {\n  r.GET(\"/ping\", ping)\n}\n",
    );

    let result = analyze_project("proj", dir.path()).unwrap();

    let list = result.ir.callables.iter().find(|c| c.qualified_name == "api.UsersCtrl.list").expect("list callable");
    assert_eq!(list.routes, vec!["GET /users".to_string()]);

    let ping = result
        .ir
        .callables
        .iter()
        .find(|c| c.qualified_name == "example.com/app.ping")
        .expect("ping callable");
    assert_eq!(ping.routes, vec!["GET /ping".to_string()]);
}

#[test]
fn missing_source_root_is_a_real_error() {
    let result = analyze_project("proj", std::path::Path::new("/does/not/exist/anywhere"));
    assert!(result.is_err());
}

use std::fs;

use codegraph_adapter::LanguageAdapter;
use codegraph_lang_php::PhpAdapter;

fn write_source(dir: &std::path::Path, relative: &str, contents: &str) {
    let path = dir.join(relative);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, contents).unwrap();
}

#[test]
fn namespace_and_method_registration() {
    let dir = tempfile::tempdir().unwrap();
    write_source(
        dir.path(),
        "app/Http/Controllers/UserController.php",
        "<?php\n\
         namespace App\\Http\\Controllers;\n\n\
         class UserController\n\
         {\n\
         \tpublic function index() {}\n\n\
         \tpublic function show($id) {}\n\
         }\n",
    );

    let adapter = PhpAdapter::new("proj");
    let symbols = adapter.build_symbol_table(dir.path()).unwrap();
    assert!(symbols.overloads_of("App.Http.Controllers.UserController.index").len() == 1);

    let ir = adapter.analyze(dir.path()).unwrap();

    let module = ir
        .modules
        .iter()
        .find(|m| m.qualified_name == "App.Http.Controllers")
        .expect("namespace module");
    assert_eq!(module.qualified_name, "App.Http.Controllers");

    let controller = ir
        .types
        .iter()
        .find(|t| t.qualified_name == "App.Http.Controllers.UserController")
        .expect("UserController type");
    assert!(module.declared_types.contains(&controller.id));

    let qnames: Vec<&str> = ir.callables.iter().map(|c| c.qualified_name.as_str()).collect();
    assert!(qnames.contains(&"App.Http.Controllers.UserController.index"));
    assert!(qnames.contains(&"App.Http.Controllers.UserController.show"));
}

#[test]
fn extends_and_implements_resolve_cross_file() {
    let dir = tempfile::tempdir().unwrap();
    write_source(
        dir.path(),
        "Model.php",
        "<?php\nnamespace App;\n\nabstract class Model {}\n",
    );
    write_source(
        dir.path(),
        "Contracts/Arrayable.php",
        "<?php\nnamespace App\\Contracts;\n\ninterface Arrayable {}\n",
    );
    write_source(
        dir.path(),
        "User.php",
        "<?php\nnamespace App;\n\nuse App\\Contracts\\Arrayable;\n\nclass User extends Model implements Arrayable {}\n",
    );

    let adapter = PhpAdapter::new("proj");
    let ir = adapter.analyze(dir.path()).unwrap();

    let model = ir.types.iter().find(|t| t.qualified_name == "App.Model").expect("Model");
    let arrayable = ir
        .types
        .iter()
        .find(|t| t.qualified_name == "App.Contracts.Arrayable")
        .expect("Arrayable");
    let user = ir.types.iter().find(|t| t.qualified_name == "App.User").expect("User");

    assert_eq!(user.extends, vec![model.id.clone()]);
    assert_eq!(user.implements, vec![arrayable.id.clone()]);
}

#[test]
fn magic_call_records_dynamic_dispatch_reference() {
    let dir = tempfile::tempdir().unwrap();
    write_source(
        dir.path(),
        "Proxy.php",
        "<?php\nnamespace App;\n\nclass Proxy\n{\n\tpublic function __call($name, $args) {}\n}\n",
    );

    let adapter = PhpAdapter::new("proj");
    let ir = adapter.analyze(dir.path()).unwrap();

    let unresolved = ir
        .unresolved_references
        .iter()
        .find(|u| u.reason == "Dynamic method dispatch in PHP")
        .expect("__call unresolved reference");
    assert_eq!(unresolved.target_name, "*");
}

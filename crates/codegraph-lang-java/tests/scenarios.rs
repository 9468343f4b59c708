use std::fs;

use codegraph_adapter::LanguageAdapter;
use codegraph_lang_java::JavaAdapter;

fn write_source(dir: &std::path::Path, relative: &str, contents: &str) {
    let path = dir.join(relative);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, contents).unwrap();
}

#[test]
fn inheritance_and_override_resolution() {
    let dir = tempfile::tempdir().unwrap();
    write_source(
        dir.path(),
        "Animal.java",
        "package zoo;\nabstract class Animal { void speak() {} }\n",
    );
    write_source(
        dir.path(),
        "Dog.java",
        "package zoo;\nclass Dog extends Animal {\n  @Override void speak() {}\n  void bark() { this.speak(); }\n}\n",
    );

    let adapter = JavaAdapter::new("proj");
    let ir = adapter.analyze(dir.path()).unwrap();

    let dog = ir
        .types
        .iter()
        .find(|t| t.qualified_name == "zoo.Dog")
        .expect("Dog type");
    let animal = ir
        .types
        .iter()
        .find(|t| t.qualified_name == "zoo.Animal")
        .expect("Animal type");
    assert_eq!(dog.extends, vec![animal.id.clone()]);

    let bark = ir
        .callables
        .iter()
        .find(|c| c.qualified_name == "zoo.Dog.bark")
        .expect("bark callable");
    let dog_speak = ir
        .callables
        .iter()
        .find(|c| c.qualified_name == "zoo.Dog.speak")
        .expect("Dog.speak callable");
    assert!(bark.calls.contains(&dog_speak.id));

    assert!(dog_speak.overrides.is_some());
}

#[test]
fn overload_disambiguation_by_argument_type() {
    let dir = tempfile::tempdir().unwrap();
    write_source(
        dir.path(),
        "C.java",
        "package app;\nclass C {\n  void f(int x) {}\n  void f(String s) {}\n}\n",
    );
    write_source(
        dir.path(),
        "D.java",
        "package app;\nclass D {\n  void use() { new C().f(\"hi\"); }\n}\n",
    );

    let adapter = JavaAdapter::new("proj");
    let ir = adapter.analyze(dir.path()).unwrap();

    let use_method = ir
        .callables
        .iter()
        .find(|c| c.qualified_name == "app.D.use")
        .expect("D.use callable");
    let f_string = ir
        .callables
        .iter()
        .find(|c| c.qualified_name == "app.C.f" && c.signature == "(String)")
        .expect("C.f(String) callable");
    let f_int = ir
        .callables
        .iter()
        .find(|c| c.qualified_name == "app.C.f" && c.signature == "(int)")
        .expect("C.f(int) callable");

    assert!(use_method.calls.contains(&f_string.id));
    assert!(!use_method.calls.contains(&f_int.id));
}

use crate::model::{
    Callable, CallableKind, IrRoot, Module, Type, TypeKind, UnresolvedReference, Visibility,
};
use crate::validator::Validator;
use codegraph_common::LanguageTag;

fn sample_callable(id: &str, qualified_name: &str) -> Callable {
    Callable {
        id: id.to_string(),
        simple_name: qualified_name.rsplit('.').next().unwrap().to_string(),
        qualified_name: qualified_name.to_string(),
        kind: CallableKind::Method,
        language: LanguageTag::Java,
        signature: "()".to_string(),
        is_static: false,
        visibility: Visibility::Public,
        return_type: None,
        annotations: Vec::new(),
        stereotypes: Vec::new(),
        routes: Vec::new(),
        calls: Vec::new(),
        overrides: None,
    }
}

fn sample_type(id: &str, qualified_name: &str, callables: Vec<String>) -> Type {
    Type {
        id: id.to_string(),
        simple_name: qualified_name.to_string(),
        qualified_name: qualified_name.to_string(),
        kind: TypeKind::Class,
        language: LanguageTag::Java,
        modifiers: Vec::new(),
        annotations: Vec::new(),
        stereotypes: Vec::new(),
        extends: Vec::new(),
        implements: Vec::new(),
        embeds: Vec::new(),
        callables,
    }
}

#[test]
fn validator_is_clean_when_every_reference_exists() {
    let mut ir = IrRoot::new("1", LanguageTag::Java);
    ir.callables.push(sample_callable("c1", "Foo.bar"));
    ir.types.push(sample_type("t1", "Foo", vec!["c1".to_string()]));

    let errors = Validator.validate(&ir);
    assert!(errors.is_empty(), "{errors:?}");
}

#[test]
fn validator_reports_dangling_callable_reference() {
    let mut ir = IrRoot::new("1", LanguageTag::Java);
    ir.types.push(sample_type("t1", "Foo", vec!["missing".to_string()]));

    let errors = Validator.validate(&ir);
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].owner_id, "t1");
    assert_eq!(errors[0].field, "callables");
    assert_eq!(errors[0].target_id, "missing");
}

#[test]
fn validator_reports_module_self_reference() {
    let mut ir = IrRoot::new("1", LanguageTag::Java);
    ir.modules.push(Module {
        id: "m1".to_string(),
        simple_name: "pkg".to_string(),
        qualified_name: "pkg".to_string(),
        path: "pkg".to_string(),
        language: LanguageTag::Java,
        declared_types: Vec::new(),
        sub_modules: vec!["m1".to_string()],
    });

    let errors = Validator.validate(&ir);
    assert!(errors.iter().any(|e| e.field == "sub_modules" && e.target_id == "m1"));
}

#[test]
fn merge_preserves_each_entitys_own_language_tag() {
    let mut java_ir = IrRoot::new("1", LanguageTag::Java);
    java_ir.callables.push(sample_callable("c1", "Foo.bar"));

    let mut go_ir = IrRoot::new("1", LanguageTag::Go);
    let mut go_callable = sample_callable("c2", "pkg.Baz");
    go_callable.language = LanguageTag::Go;
    go_ir.callables.push(go_callable);

    let merged = java_ir.merge(go_ir);

    assert_eq!(merged.callables.len(), 2);
    let java_entity = merged.callables.iter().find(|c| c.id == "c1").unwrap();
    let go_entity = merged.callables.iter().find(|c| c.id == "c2").unwrap();
    assert_eq!(java_entity.language, LanguageTag::Java);
    assert_eq!(go_entity.language, LanguageTag::Go);
}

#[test]
fn merge_lets_the_later_ir_win_on_a_colliding_id() {
    let mut first = IrRoot::new("1", LanguageTag::Java);
    first.callables.push(sample_callable("c1", "Foo.bar"));
    first.types.push(sample_type("t1", "Foo", Vec::new()));

    let mut second = IrRoot::new("1", LanguageTag::Java);
    let mut updated = sample_callable("c1", "Foo.bar");
    updated.visibility = Visibility::Private;
    second.callables.push(updated);
    second.types.push(sample_type("t1", "Foo", vec!["c1".to_string()]));

    let merged = first.merge(second);

    assert_eq!(merged.callables.len(), 1);
    assert_eq!(merged.callables[0].visibility, Visibility::Private);
    assert_eq!(merged.types.len(), 1);
    assert_eq!(merged.types[0].callables, vec!["c1".to_string()]);
}

#[test]
fn ir_serialization_round_trips() {
    let mut ir = IrRoot::new("1", LanguageTag::Php);
    ir.callables.push(sample_callable("c1", "Foo.bar"));
    ir.types.push(sample_type("t1", "Foo", vec!["c1".to_string()]));
    ir.unresolved_references.push(UnresolvedReference {
        source_callable: "c1".to_string(),
        target_name: "mystery".to_string(),
        context: None,
        reason: "Unknown receiver type".to_string(),
    });

    let json = ir.to_json().expect("serialize");
    let round_tripped = IrRoot::from_json(&json).expect("deserialize");
    assert_eq!(ir, round_tripped);
}

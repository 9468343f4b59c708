use crate::table::{FileContext, SymbolTable};

fn ctx(package: &str) -> FileContext {
    FileContext::new(package)
}

#[test]
fn resolve_type_prefers_same_package() {
    let mut table = SymbolTable::new();
    table.register_type("User", "com.example.api.User");
    table.register_type("User", "com.example.model.User");

    let resolved = table.resolve_type("User", &ctx("com.example.model")).unwrap();
    assert_eq!(resolved, "com.example.model.User");
}

#[test]
fn resolve_type_uses_explicit_import() {
    let mut table = SymbolTable::new();
    table.register_type("User", "com.example.api.User");
    table.register_type("User", "com.example.model.User");

    let mut context = ctx("com.other");
    context.imports.push("com.example.api.User".to_string());

    let resolved = table.resolve_type("User", &context).unwrap();
    assert_eq!(resolved, "com.example.api.User");
}

#[test]
fn resolve_type_uses_wildcard_import_sorted() {
    let mut table = SymbolTable::new();
    table.register_type("Map", "java.util.zzz.Map");
    table.register_type("Map", "java.util.Map");

    let mut context = ctx("com.other");
    context.wildcard_imports.push("java.util".to_string());

    // Sorted candidates: "java.util.Map" < "java.util.zzz.Map"
    let resolved = table.resolve_type("Map", &context).unwrap();
    assert_eq!(resolved, "java.util.Map");
}

#[test]
fn resolve_type_is_ambiguous_without_disambiguator() {
    let mut table = SymbolTable::new();
    table.register_type("User", "com.example.api.User");
    table.register_type("User", "com.example.model.User");

    assert!(table.resolve_type("User", &ctx("com.other")).is_none());
}

#[test]
fn resolve_type_single_candidate_always_resolves() {
    let mut table = SymbolTable::new();
    table.register_type("Widget", "com.example.Widget");

    assert_eq!(
        table.resolve_type("Widget", &ctx("com.other")).unwrap(),
        "com.example.Widget"
    );
}

#[test]
fn local_alias_wins_over_everything_else() {
    let mut table = SymbolTable::new();
    table.register_type("T", "pkg.T");

    let mut context = ctx("pkg");
    context.local_aliases.insert("T".to_string(), "pkg.Aliased".to_string());

    assert_eq!(table.resolve_type("T", &context).unwrap(), "pkg.Aliased");
}

#[test]
fn resolve_type_is_insertion_order_independent() {
    let mut a = SymbolTable::new();
    a.register_type("User", "com.example.api.User");
    a.register_type("User", "com.example.model.User");

    let mut b = SymbolTable::new();
    b.register_type("User", "com.example.model.User");
    b.register_type("User", "com.example.api.User");

    let context = ctx("com.example.model");
    assert_eq!(
        a.resolve_type("User", &context),
        b.resolve_type("User", &context)
    );
}

#[test]
fn resolve_callable_requires_receiver_type() {
    let table = SymbolTable::new();
    let err = table
        .resolve_callable_with_receiver("speak", None, None)
        .unwrap_err();
    assert_eq!(err, "Unknown receiver type");
}

#[test]
fn resolve_callable_not_found() {
    let table = SymbolTable::new();
    let err = table
        .resolve_callable_with_receiver("speak", Some("Animal"), None)
        .unwrap_err();
    assert_eq!(err, "Method not found: speak");
}

#[test]
fn resolve_callable_same_type_wins_over_inherited() {
    let mut table = SymbolTable::new();
    table.register_callable("speak", "Animal.speak", "()", None);
    table.register_callable("speak", "Dog.speak", "()", None);
    table.register_supertypes("Dog", vec!["Animal".to_string()]);

    let hit = table
        .resolve_callable_with_receiver("speak", Some("Dog"), None)
        .unwrap();
    assert_eq!(hit, "Dog.speak");
}

#[test]
fn resolve_callable_disambiguates_by_signature() {
    let mut table = SymbolTable::new();
    table.register_callable("f", "C.f", "(int)", None);
    table.register_callable("f", "C.f", "(String)", None);

    let hit = table
        .resolve_callable_with_receiver("f", Some("C"), Some("(String)"))
        .unwrap();
    assert_eq!(hit, "C.f");
}

#[test]
fn resolve_callable_ambiguous_without_signature() {
    let mut table = SymbolTable::new();
    table.register_callable("f", "C.f", "(int)", None);
    table.register_callable("f", "D.f", "()", None);
    table.register_supertypes("E", vec!["C".to_string(), "D".to_string()]);

    let err = table
        .resolve_callable_with_receiver("f", Some("E"), None)
        .unwrap_err();
    assert_eq!(err, "Ambiguous: 2 candidates");
}

#[test]
fn resolve_callable_not_found_on_type() {
    let mut table = SymbolTable::new();
    table.register_callable("f", "Other.f", "()", None);

    let err = table
        .resolve_callable_with_receiver("f", Some("C"), None)
        .unwrap_err();
    assert_eq!(err, "Method not found on type C");
}

#[test]
fn overload_storage_keeps_qualified_name_once_in_callables_map() {
    let mut table = SymbolTable::new();
    table.register_callable("f", "C.f", "(int)", None);
    table.register_callable("f", "C.f", "(String)", None);

    assert_eq!(table.overloads_of("C.f"), ["(int)", "(String)"]);
}

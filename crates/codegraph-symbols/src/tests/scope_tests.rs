use crate::scope::LocalScope;

#[test]
fn copy_is_an_independent_snapshot() {
    let mut parent = LocalScope::new();
    parent.bind("x", "int");

    let mut child = parent.copy();
    child.bind("y", "String");
    child.bind("x", "long");

    assert_eq!(parent.type_of("x"), Some("int"));
    assert_eq!(parent.type_of("y"), None);
    assert_eq!(child.type_of("x"), Some("long"));
    assert_eq!(child.type_of("y"), Some("String"));
}

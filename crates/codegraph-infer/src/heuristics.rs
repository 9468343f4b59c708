//! Last-resort heuristic tables for Java method-return inference.
//!
//! These are only ever consulted when the symbol table has no knowledge of
//! the method being called (i.e. it is a standard-library call the scanner
//! never saw declared). A known symbol-table return type always wins; the
//! test suite exercises both a heuristic hit and a symbol-table override, so
//! a heuristic must never be allowed to shadow a real declaration.

use once_cell::sync::Lazy;
use rustc_hash::FxHashMap;

static STRING_RETURNING: Lazy<FxHashMap<&'static str, ()>> = Lazy::new(|| {
    [
        "toString",
        "substring",
        "toLowerCase",
        "toUpperCase",
        "trim",
        "strip",
        "concat",
        "replace",
        "replaceAll",
        "replaceFirst",
        "valueOf",
        "format",
        "join",
    ]
    .into_iter()
    .map(|s| (s, ()))
    .collect()
});

static BOOLEAN_RETURNING: Lazy<FxHashMap<&'static str, ()>> = Lazy::new(|| {
    [
        "equals",
        "isEmpty",
        "contains",
        "startsWith",
        "endsWith",
        "hasNext",
        "isPresent",
        "containsKey",
    ]
    .into_iter()
    .map(|s| (s, ()))
    .collect()
});

static INT_RETURNING: Lazy<FxHashMap<&'static str, ()>> = Lazy::new(|| {
    [
        "length",
        "size",
        "indexOf",
        "lastIndexOf",
        "compareTo",
        "hashCode",
        "intValue",
    ]
    .into_iter()
    .map(|s| (s, ()))
    .collect()
});

/// Heuristic method-return table, in priority order (first match wins —
/// entries are mutually exclusive by name in practice, but order still
/// matters if that ever changes).
pub fn heuristic_method_return(method_name: &str) -> Option<&'static str> {
    match method_name {
        _ if STRING_RETURNING.contains_key(method_name) => Some("String"),
        _ if BOOLEAN_RETURNING.contains_key(method_name) => Some("boolean"),
        _ if INT_RETURNING.contains_key(method_name) => Some("int"),
        "longValue" | "currentTimeMillis" | "nanoTime" => Some("long"),
        "doubleValue" | "parseDouble" => Some("double"),
        "charAt" => Some("char"),
        "getBytes" => Some("byte[]"),
        "toCharArray" => Some("char[]"),
        "split" => Some("String[]"),
        _ => None,
    }
}

/// Heuristic field-access return table (`length`, `class`, `out`/`err`, `in`).
pub fn heuristic_field_type(field_name: &str) -> Option<&'static str> {
    match field_name {
        "length" => Some("int"),
        "class" => Some("Class"),
        "out" | "err" => Some("PrintStream"),
        "in" => Some("InputStream"),
        _ => None,
    }
}

/// Java numeric promotion over two operand types: any `double` -> `double`;
/// else any `float` -> `float`; else any `long` -> `long`; else `int`
/// (byte/short/char all widen to `int`).
#[must_use]
pub fn numeric_promotion(lhs: &str, rhs: &str) -> &'static str {
    if lhs == "double" || rhs == "double" {
        "double"
    } else if lhs == "float" || rhs == "float" {
        "float"
    } else if lhs == "long" || rhs == "long" {
        "long"
    } else {
        "int"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn string_and_boolean_and_int_tables_are_disjoint_samples() {
        assert_eq!(heuristic_method_return("toString"), Some("String"));
        assert_eq!(heuristic_method_return("isEmpty"), Some("boolean"));
        assert_eq!(heuristic_method_return("indexOf"), Some("int"));
        assert_eq!(heuristic_method_return("currentTimeMillis"), Some("long"));
        assert_eq!(heuristic_method_return("unknownMethod"), None);
    }

    #[test]
    fn promotion_prefers_double_over_everything() {
        assert_eq!(numeric_promotion("int", "double"), "double");
        assert_eq!(numeric_promotion("long", "float"), "float");
        assert_eq!(numeric_promotion("int", "long"), "long");
        assert_eq!(numeric_promotion("int", "int"), "int");
    }
}

//! Common utilities for TypeScript code generation.
//!
//! This module provides shared helper functions for identifier handling and
//! naming conventions used across IR construction and printing.

use std::collections::HashSet;
use std::sync::LazyLock;

use inflector::Inflector;

use super::model::RawValue;
use super::types::TsLiteral;

/// TypeScript reserved words that cannot be used as identifiers.
pub static TS_RESERVED_WORDS: LazyLock<HashSet<&'static str>> = LazyLock::new(|| {
    [
        "break",
        "case",
        "catch",
        "class",
        "const",
        "continue",
        "debugger",
        "default",
        "delete",
        "do",
        "else",
        "enum",
        "export",
        "extends",
        "false",
        "finally",
        "for",
        "function",
        "if",
        "import",
        "in",
        "instanceof",
        "new",
        "null",
        "return",
        "super",
        "switch",
        "this",
        "throw",
        "true",
        "try",
        "typeof",
        "var",
        "void",
        "while",
        "with",
        "yield",
        "let",
        "static",
        "implements",
        "interface",
        "package",
        "private",
        "protected",
        "public",
        "await",
        "async",
    ]
    .into_iter()
    .collect()
});

/// Check if an identifier needs bracket notation (or quoting) for property/key access.
///
/// Returns true if the name:
/// - Is empty
/// - Doesn't start with a letter, underscore, or dollar sign
/// - Contains characters other than alphanumeric, underscore, or dollar sign
pub fn needs_bracket_notation(name: &str) -> bool {
    name.is_empty()
        || !name
            .chars()
            .next()
            .is_some_and(|c| c.is_ascii_alphabetic() || c == '_' || c == '$')
        || !name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
}

/// Escape a string for use in JavaScript/TypeScript string literals.
pub fn escape_js_string(s: &str) -> String {
    s.replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace('\n', "\\n")
        .replace('\r', "\\r")
}

/// Quote a string if needed for use as a property key or enum key.
pub fn quote_if_needed(name: &str) -> String {
    if needs_bracket_notation(name) {
        format!("\"{}\"", escape_js_string(name))
    } else {
        name.to_string()
    }
}

/// Sanitize an identifier to be a valid TypeScript binding name.
/// - Converts separators to camelCase
/// - Prepends `_` if it starts with a digit
/// - Escapes reserved words with `_` prefix
pub fn sanitize_ts_identifier(name: &str) -> String {
    let mut result = name.to_camel_case();
    if result.is_empty() {
        return "_empty".to_string();
    }
    if result.chars().next().is_some_and(|c| c.is_ascii_digit()) {
        result = format!("_{result}");
    }
    if TS_RESERVED_WORDS.contains(result.as_str()) {
        result = format!("_{result}");
    }
    result
}

/// Strip the first matching suffix, keeping the name intact when stripping
/// would leave nothing behind.
pub fn strip_known_suffix<'a>(name: &'a str, suffixes: &[String]) -> &'a str {
    suffixes
        .iter()
        .filter(|suffix| !suffix.is_empty())
        .find_map(|suffix| name.strip_suffix(suffix.as_str()))
        .filter(|stripped| !stripped.is_empty())
        .unwrap_or(name)
}

/// `RecipeIngredient` -> `RECIPE_INGREDIENT`
pub fn to_screaming_snake(name: &str) -> String {
    name.to_screaming_snake_case()
}

/// `RecipeIngredient` -> `recipeIngredients`
pub fn plural_camel(name: &str) -> String {
    name.to_snake_case().to_plural().to_camel_case()
}

/// `RecipeIngredient` -> `RecipeIngredients`
pub fn plural_pascal(name: &str) -> String {
    name.to_snake_case().to_plural().to_pascal_case()
}

/// `cook_time` -> `getCookTimeDisplay`
pub fn display_accessor_name(field: &str) -> String {
    format!("get{}Display", field.to_pascal_case())
}

/// Convert a raw value to a TypeScript literal.
pub fn raw_value_to_literal(v: &RawValue) -> TsLiteral {
    match v {
        RawValue::String(s) => TsLiteral::String(s.clone()),
        RawValue::Integer(n) => TsLiteral::Int(*n),
        RawValue::Float(f) => TsLiteral::Number(*f),
        RawValue::Bool(b) => TsLiteral::Bool(*b),
        RawValue::Null => TsLiteral::Null,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_needs_bracket_notation() {
        assert!(!needs_bracket_notation("foo"));
        assert!(!needs_bracket_notation("_foo"));
        assert!(!needs_bracket_notation("$foo"));
        assert!(!needs_bracket_notation("cook_time"));

        assert!(needs_bracket_notation(""));
        assert!(needs_bracket_notation("123foo"));
        assert!(needs_bracket_notation("foo-bar"));
        assert!(needs_bracket_notation("foo bar"));
    }

    #[test]
    fn test_escape_js_string() {
        assert_eq!(escape_js_string("hello"), "hello");
        assert_eq!(escape_js_string("hel\"lo"), "hel\\\"lo");
        assert_eq!(escape_js_string("hel\\lo"), "hel\\\\lo");
        assert_eq!(escape_js_string("two\nlines"), "two\\nlines");
    }

    #[test]
    fn test_quote_if_needed() {
        assert_eq!(quote_if_needed("foo"), "foo");
        assert_eq!(quote_if_needed("foo-bar"), "\"foo-bar\"");
        assert_eq!(quote_if_needed("123"), "\"123\"");
    }

    #[test]
    fn test_sanitize_ts_identifier() {
        assert_eq!(sanitize_ts_identifier("id"), "id");
        assert_eq!(sanitize_ts_identifier("recipe_pk"), "recipePk");
        assert_eq!(sanitize_ts_identifier("delete"), "_delete");
    }

    #[test]
    fn test_strip_known_suffix() {
        let suffixes = vec!["Serializer".to_string()];
        assert_eq!(strip_known_suffix("RecipeSerializer", &suffixes), "Recipe");
        assert_eq!(strip_known_suffix("Recipe", &suffixes), "Recipe");
        assert_eq!(strip_known_suffix("Serializer", &suffixes), "Serializer");
    }

    #[test]
    fn test_naming_helpers() {
        assert_eq!(to_screaming_snake("RecipeIngredient"), "RECIPE_INGREDIENT");
        assert_eq!(plural_camel("Recipe"), "recipes");
        assert_eq!(plural_camel("Category"), "categories");
        assert_eq!(plural_camel("RecipeIngredient"), "recipeIngredients");
        assert_eq!(plural_pascal("Recipe"), "Recipes");
        assert_eq!(display_accessor_name("category"), "getCategoryDisplay");
        assert_eq!(display_accessor_name("cook_time"), "getCookTimeDisplay");
    }
}

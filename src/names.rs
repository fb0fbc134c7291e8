//! Identifier Engine
//!
//! Pure string transformations shared by the validator and every emitter:
//! - identifier and dotted-name validity checks
//! - dot flattening (`a.b.c` -> `a_b_c`, `a::b::c`, `a/b/c`)
//! - case conversion used to derive constant, function and enum names
//!
//! Nothing here can fail; every function returns a bool or a new string.

use std::collections::HashSet;
use std::sync::OnceLock;

use regex::Regex;

fn identifier_regex() -> &'static Regex {
    static IDENTIFIER: OnceLock<Regex> = OnceLock::new();
    IDENTIFIER.get_or_init(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").unwrap())
}

// =============================================================================
// Validity
// =============================================================================

/// A bare identifier: a letter or `_`, then letters, digits or `_`.
pub fn is_valid_identifier(name: &str) -> bool {
    identifier_regex().is_match(name)
}

/// A dotted name whose every segment is a valid identifier.
pub fn is_valid_dotted_name(name: &str) -> bool {
    !name.is_empty() && name.split('.').all(is_valid_identifier)
}

// =============================================================================
// Flattening
// =============================================================================

/// Replace every `.` with `sep`
pub fn dotted_to_flat(name: &str, sep: &str) -> String {
    name.replace('.', sep)
}

/// Canonical identifier of a property name (`a.b` -> `a_b`)
pub fn prop_identifier(name: &str) -> String {
    dotted_to_flat(name, "_")
}

/// First name, in iteration order, whose flattened identifier was already taken.
pub fn find_duplicate<'a, I>(names: I) -> Option<&'a str>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut seen = HashSet::new();
    names
        .into_iter()
        .find(|name| !seen.insert(prop_identifier(name)))
}

// =============================================================================
// Case Conversion
// =============================================================================

/// `snake_case` -> `CamelCase`.
///
/// Underscores are dropped and every word is lower-cased except for its first
/// letter, so `API_NAME` becomes `ApiName`.
pub fn snake_to_camel(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut word_start = true;

    for c in s.chars() {
        if c == '_' {
            word_start = true;
            continue;
        }
        if word_start {
            result.push(c.to_ascii_uppercase());
            word_start = false;
        } else {
            result.push(c.to_ascii_lowercase());
        }
    }

    result
}

/// `CamelCase` -> `snake_case`.
///
/// A word boundary is an upper-case letter following a lower-case letter or
/// digit, or the last letter of an upper-case run followed by a lower-case
/// letter: `test_BOOLeaN` -> `test_boo_lea_n`, `HTTPServer` -> `http_server`.
pub fn camel_to_snake(s: &str) -> String {
    let chars: Vec<char> = s.chars().collect();
    let mut result = String::with_capacity(s.len() + 4);

    for (i, &c) in chars.iter().enumerate() {
        if c.is_ascii_uppercase() && i > 0 {
            let prev = chars[i - 1];
            let next_is_lower = chars.get(i + 1).is_some_and(|n| n.is_ascii_lowercase());
            let boundary = prev.is_ascii_lowercase() || prev.is_ascii_digit() || next_is_lower;
            if prev != '_' && boundary {
                result.push('_');
            }
        }
        result.push(c.to_ascii_lowercase());
    }

    result
}

/// `snake_case` -> `SNAKE_CASE`
pub fn to_upper(s: &str) -> String {
    s.to_ascii_uppercase()
}

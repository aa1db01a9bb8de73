//! String transformation utilities for code generation
//!
//! These utilities belong in the generation domain as they are used
//! for turning OpenAPI names into Go identifiers, package names and paths.
//! Every function here is total: any input, including the empty string,
//! produces a value.

use std::collections::HashSet;

/// Converts a string to snake_case.
///
/// This function handles various input formats including camelCase, PascalCase,
/// kebab-case, and space-separated strings, converting them all to snake_case.
/// Any character that is not alphanumeric acts as a word separator.
///
/// # Arguments
/// * `s` - The input string to convert
///
/// # Returns
/// A new String in snake_case format
///
/// # Examples
/// ```
/// use apigen::generation::utils::to_snake_case;
///
/// assert_eq!(to_snake_case("findPetsByStatus"), "find_pets_by_status");
/// assert_eq!(to_snake_case("FindPetsByStatus"), "find_pets_by_status");
/// assert_eq!(to_snake_case("find-pets-by-status"), "find_pets_by_status");
/// assert_eq!(to_snake_case("get HTTP Response"), "get_http_response");
/// ```
pub fn to_snake_case(s: &str) -> String {
    let mut result = String::new();
    let mut prev_is_lowercase = false;

    for ch in s.chars() {
        if ch.is_uppercase() {
            if prev_is_lowercase {
                result.push('_');
            }
            result.extend(ch.to_lowercase());
            prev_is_lowercase = false;
        } else if ch.is_alphanumeric() {
            result.push(ch);
            prev_is_lowercase = ch.is_lowercase() || ch.is_ascii_digit();
        } else {
            // any other character separates words
            if !result.is_empty() && !result.ends_with('_') {
                result.push('_');
            }
            prev_is_lowercase = false;
        }
    }

    result.trim_matches('_').to_string()
}

/// Converts a string to PascalCase for Go exported type and method names.
///
/// The input is normalized through [`to_snake_case`] first, so
/// `listPets`, `list_pets` and `list-pets` all become `ListPets`.
///
/// # Examples
/// ```
/// use apigen::generation::utils::to_pascal_case;
///
/// assert_eq!(to_pascal_case("find_pets_by_status"), "FindPetsByStatus");
/// assert_eq!(to_pascal_case("listPets"), "ListPets");
/// assert_eq!(to_pascal_case("find-pets-by-status"), "FindPetsByStatus");
/// ```
pub fn to_pascal_case(s: &str) -> String {
    to_snake_case(s)
        .split('_')
        .filter(|word| !word.is_empty())
        .map(capitalize)
        .collect()
}

/// Converts a string to camelCase for Go local variables.
///
/// # Examples
/// ```
/// use apigen::generation::utils::to_camel_case;
///
/// assert_eq!(to_camel_case("find_pets_by_status"), "findPetsByStatus");
/// assert_eq!(to_camel_case("PetId"), "petId");
/// ```
pub fn to_camel_case(s: &str) -> String {
    let pascal = to_pascal_case(s);
    let mut chars = pascal.chars();
    match chars.next() {
        None => String::new(),
        Some(first) => first.to_lowercase().collect::<String>() + chars.as_str(),
    }
}

/// Splits a property name into words.
///
/// Names containing `_` or `-` are split on those delimiters only; otherwise
/// the name is split in front of every uppercase letter.
pub fn split_words(s: &str) -> Vec<String> {
    if s.contains(['_', '-']) {
        return s
            .split(['_', '-'])
            .filter(|part| !part.is_empty())
            .map(str::to_string)
            .collect();
    }

    let mut words = Vec::new();
    let mut current = String::new();
    for ch in s.chars() {
        if ch.is_uppercase() && !current.is_empty() {
            words.push(std::mem::take(&mut current));
        }
        current.push(ch);
    }
    if !current.is_empty() {
        words.push(current);
    }
    words
}

/// Converts a schema property name into an exported Go struct field name.
///
/// The literal name `id` becomes `ID`; everything else is split with
/// [`split_words`] and each word gets an uppercase first letter, leaving the
/// rest of the word untouched (`URL_path` -> `URLPath`). Characters that
/// cannot appear in a Go identifier are dropped and a leading digit gets an
/// `F` prefix. The empty string maps to the empty string.
///
/// # Examples
/// ```
/// use apigen::generation::utils::to_field_identifier;
///
/// assert_eq!(to_field_identifier("id"), "ID");
/// assert_eq!(to_field_identifier("created_at"), "CreatedAt");
/// assert_eq!(to_field_identifier("firstName"), "FirstName");
/// ```
pub fn to_field_identifier(name: &str) -> String {
    if name == "id" {
        return "ID".to_string();
    }

    let joined: String = split_words(name)
        .iter()
        .map(|word| capitalize(word))
        .collect::<String>()
        .chars()
        .filter(|ch| ch.is_alphanumeric())
        .collect();

    match joined.chars().next() {
        Some(first) if first.is_ascii_digit() => format!("F{joined}"),
        _ => joined,
    }
}

/// Converts a component schema name into an exported Go type name.
///
/// Names that already are exported identifiers (`Pet`, `PetV2`) are kept
/// verbatim; anything else goes through [`to_pascal_case`].
pub fn to_type_name(name: &str) -> String {
    let is_exported_identifier = name.starts_with(|c: char| c.is_ascii_uppercase())
        && name.chars().all(|c| c.is_ascii_alphanumeric());
    if is_exported_identifier {
        return name.to_string();
    }

    let pascal: String = to_pascal_case(name)
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .collect();
    match pascal.chars().next() {
        None => "Type".to_string(),
        Some(first) if first.is_ascii_digit() => format!("T{pascal}"),
        Some(_) => pascal,
    }
}

/// Converts a resource or tag name into a Go package name.
///
/// Go package names are lowercase and carry no separators: `Pet-Store` and
/// `pet_store` both become `petstore`. Names without any usable character
/// fall back to `resource`.
pub fn to_package_name(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .filter(|ch| ch.is_ascii_alphanumeric())
        .map(|ch| ch.to_ascii_lowercase())
        .collect();

    match cleaned.chars().next() {
        None => "resource".to_string(),
        Some(first) if first.is_ascii_digit() => format!("r{cleaned}"),
        Some(_) => sanitize_go_identifier(&cleaned),
    }
}

/// Appends an underscore to names that collide with Go keywords or with
/// the locals every generated handler declares.
///
/// # Examples
/// ```
/// use apigen::generation::utils::sanitize_go_identifier;
///
/// assert_eq!(sanitize_go_identifier("type"), "type_");
/// assert_eq!(sanitize_go_identifier("r"), "r_");
/// assert_eq!(sanitize_go_identifier("petId"), "petId");
/// ```
pub fn sanitize_go_identifier(s: &str) -> String {
    match s {
        "break" | "case" | "chan" | "const" | "continue" | "default" | "defer" | "else"
        | "fallthrough" | "for" | "func" | "go" | "goto" | "if" | "import" | "interface"
        | "map" | "package" | "range" | "return" | "select" | "struct" | "switch" | "type"
        | "var" => format!("{s}_"),
        // handler locals
        "w" | "r" | "h" | "req" | "result" | "err" | "raw" | "parsed" | "ctx" => format!("{s}_"),
        _ => s.to_string(),
    }
}

/// Reserve an identifier in `taken`, appending `marker` (then a counter)
/// while `base` is already in use.
///
/// # Examples
/// ```
/// use std::collections::HashSet;
/// use apigen::generation::utils::unique_identifier;
///
/// let mut taken = HashSet::new();
/// assert_eq!(unique_identifier("Name", "Param", &mut taken), "Name");
/// assert_eq!(unique_identifier("Name", "Param", &mut taken), "NameParam");
/// assert_eq!(unique_identifier("Name", "Param", &mut taken), "NameParam2");
/// ```
pub fn unique_identifier(base: &str, marker: &str, taken: &mut HashSet<String>) -> String {
    let mut candidate = base.to_string();
    let mut suffix = 1;
    while taken.contains(&candidate) {
        candidate = if suffix == 1 {
            format!("{base}{marker}")
        } else {
            format!("{base}{marker}{suffix}")
        };
        suffix += 1;
    }
    taken.insert(candidate.clone());
    candidate
}

/// Naive English pluralization: appends `s`.
///
/// Irregular plurals (`person`, `category`) are not handled.
pub fn pluralize(name: &str) -> String {
    format!("{name}s")
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        None => String::new(),
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
    }
}

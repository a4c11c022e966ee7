//! Accessor naming conventions.
//!
//! Maps method names like `getUserName`, `isActive` or `setURL` to the property they
//! access. These are pure string functions used by the member enumerator when classifying
//! candidates.

/// True for names shaped like a getter: `getX...` or `isX...`
#[must_use]
pub fn is_getter(name: &str) -> bool {
    (name.starts_with("get") && name.len() > 3) || (name.starts_with("is") && name.len() > 2)
}

/// True for names shaped like a setter: `setX...`
#[must_use]
pub fn is_setter(name: &str) -> bool {
    name.starts_with("set") && name.len() > 3
}

/// True for names shaped like either accessor
#[must_use]
pub fn is_property(name: &str) -> bool {
    is_getter(name) || is_setter(name)
}

/// Derive the property name from an accessor name
///
/// The accessor prefix is stripped; the first character is lowercased unless the name
/// continues with another uppercase character (`getURL` keeps `URL`).
///
/// Returns `None` if `name` does not start with `is`, `get` or `set`.
///
/// ## Arguments
/// * 'name' - The accessor method name
#[must_use]
pub fn method_to_property(name: &str) -> Option<String> {
    let stripped = name
        .strip_prefix("is")
        .or_else(|| name.strip_prefix("get"))
        .or_else(|| name.strip_prefix("set"))?;

    let mut chars = stripped.chars();
    let Some(first) = chars.next() else {
        return Some(String::new());
    };

    match chars.next() {
        Some(second) if second.is_uppercase() => Some(stripped.to_string()),
        _ => {
            let mut property: String = first.to_lowercase().collect();
            property.push_str(&stripped[first.len_utf8()..]);
            Some(property)
        }
    }
}

/// False for names that are never exposed as properties
///
/// ## Arguments
/// * 'name' - The candidate property name
#[must_use]
pub fn is_valid_property_name(name: &str) -> bool {
    !(name.starts_with('$') || name == "serialVersionUID" || name == "class")
}

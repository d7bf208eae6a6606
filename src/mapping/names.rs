//! Element-name to attribute-name resolution.
//!
//! A schema declares scalar attributes by snake_case name only. Plural
//! candidates are tried first, so `<tag>` fills a declared `tags`. Whether
//! that slot keeps one value or collects many is up to the record.

use heck::ToSnakeCase;

use super::schema::Schema;

/// English pluralization, enough for feed element names.
pub fn pluralize(word: &str) -> String {
    let lower = word.to_ascii_lowercase();
    if lower.ends_with("ss")
        || lower.ends_with('x')
        || lower.ends_with("ch")
        || lower.ends_with("sh")
    {
        return format!("{word}es");
    }
    if lower.ends_with('s') {
        return word.to_owned();
    }
    if let Some(stem) = word.strip_suffix('y') {
        let consonant = stem
            .chars()
            .last()
            .is_some_and(|c| !matches!(c.to_ascii_lowercase(), 'a' | 'e' | 'i' | 'o' | 'u'));
        if consonant {
            return format!("{stem}ies");
        }
    }
    format!("{word}s")
}

/// Ordered lookup candidates for an element:
/// `{ns}_{plural}`, `{plural}`, `{ns}_{name}`, `{name}`.
///
/// Plural candidates are left out when pluralizing does not change the
/// name, so already-plural element names stay scalar.
pub fn candidates(namespace: Option<&str>, local_name: &str) -> Vec<String> {
    let name = local_name.to_snake_case();
    let plural = pluralize(&name);
    let namespace = namespace.filter(|ns| !ns.is_empty()).map(|ns| ns.to_snake_case());

    let mut out = Vec::with_capacity(4);
    if plural != name {
        if let Some(ns) = &namespace {
            out.push(format!("{ns}_{plural}"));
        }
        out.push(plural);
    }
    if let Some(ns) = &namespace {
        out.push(format!("{ns}_{name}"));
    }
    out.push(name);
    out
}

/// Picks the first candidate declared as a scalar attribute on `schema`.
pub fn resolve(schema: &Schema, namespace: Option<&str>, local_name: &str) -> Option<&'static str> {
    candidates(namespace, local_name)
        .iter()
        .find_map(|candidate| schema.declared_attribute(candidate))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pluralize() {
        assert_eq!(pluralize("thumbnail"), "thumbnails");
        assert_eq!(pluralize("entry"), "entries");
        assert_eq!(pluralize("day"), "days");
        assert_eq!(pluralize("access"), "accesses");
        assert_eq!(pluralize("box"), "boxes");
        assert_eq!(pluralize("keywords"), "keywords");
        assert_eq!(pluralize("total_results"), "total_results");
    }

    #[test]
    fn test_candidate_order() {
        assert_eq!(
            candidates(Some("gphoto"), "thumbnail"),
            vec![
                "gphoto_thumbnails",
                "thumbnails",
                "gphoto_thumbnail",
                "thumbnail"
            ]
        );
    }

    #[test]
    fn test_camel_case_is_snake_cased() {
        // "total_results" is already plural, so only singular candidates remain
        assert_eq!(
            candidates(Some("openSearch"), "totalResults"),
            vec!["open_search_total_results", "total_results"]
        );
    }

    #[test]
    fn test_no_namespace() {
        assert_eq!(candidates(None, "id"), vec!["ids", "id"]);
    }

    #[test]
    fn test_resolve_prefers_namespaced_plural() {
        let schema = Schema::elements()
            .namespaces(&["gphoto"])
            .attributes(&["id", "gphoto_id", "tags"]);

        assert_eq!(resolve(&schema, Some("gphoto"), "id"), Some("gphoto_id"));
        assert_eq!(resolve(&schema, None, "id"), Some("id"));
        assert_eq!(resolve(&schema, None, "tag"), Some("tags"));
        assert_eq!(resolve(&schema, None, "summary"), None);
    }
}

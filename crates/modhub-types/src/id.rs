//! Identifier format rules shared by every ModHub component.
//!
//! Three identifier families exist:
//!
//! - **module id** – `mod-<class>-<slug>`: the fixed `mod` prefix, one of the
//!   five [`ModuleClass`] segments, and a lowercase alphanumeric/hyphen slug
//!   that neither starts nor ends with a hyphen (e.g. `mod-core-hello`).
//! - **capability id** – two lowercase alphanumeric segments joined by a
//!   single hyphen (e.g. `hello-greet`).
//! - **tenant id** – non-empty lowercase alphanumeric, hyphen or underscore
//!   (e.g. `acme-prod`, `demo`).
//!
//! All checks are pure character-level predicates; no identifier is ever
//! looked up here.

use crate::ModuleClass;

/// Fixed leading segment of every module id.
pub const MODULE_ID_PREFIX: &str = "mod";

/// Split a module id into its class and slug segments.
///
/// Returns `None` when the id does not match `mod-<class>-<slug>`.
///
/// # Example
///
/// ```
/// use modhub_types::{id, ModuleClass};
///
/// let (class, slug) = id::split_module_id("mod-core-hello").unwrap();
/// assert_eq!(class, ModuleClass::Core);
/// assert_eq!(slug, "hello");
///
/// assert!(id::split_module_id("core-hello").is_none());
/// assert!(id::split_module_id("mod-bogus-hello").is_none());
/// ```
pub fn split_module_id(id: &str) -> Option<(ModuleClass, &str)> {
    let rest = id.strip_prefix(MODULE_ID_PREFIX)?.strip_prefix('-')?;
    let (class_segment, slug) = rest.split_once('-')?;
    let class = ModuleClass::parse(class_segment)?;
    if slug.is_empty() || slug.starts_with('-') || slug.ends_with('-') {
        return None;
    }
    if !slug.chars().all(is_slug_char) {
        return None;
    }
    Some((class, slug))
}

/// `true` when `id` matches the `mod-<class>-<slug>` module id pattern.
pub fn is_valid_module_id(id: &str) -> bool {
    split_module_id(id).is_some()
}

/// `true` when `id` is two lowercase alphanumeric segments joined by a
/// single hyphen, e.g. `hello-greet`.
pub fn is_valid_capability_id(id: &str) -> bool {
    match id.split_once('-') {
        Some((provider, feature)) => {
            !provider.is_empty()
                && !feature.is_empty()
                && provider.chars().all(is_segment_char)
                && feature.chars().all(is_segment_char)
        }
        None => false,
    }
}

/// `true` when `id` is a well-formed tenant identifier: non-empty lowercase
/// alphanumeric, hyphen or underscore.
pub fn is_valid_tenant_id(id: &str) -> bool {
    !id.is_empty() && id.chars().all(|c| is_segment_char(c) || c == '-' || c == '_')
}

fn is_segment_char(c: char) -> bool {
    c.is_ascii_lowercase() || c.is_ascii_digit()
}

fn is_slug_char(c: char) -> bool {
    is_segment_char(c) || c == '-'
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn well_formed_module_ids_pass() {
        for id in [
            "mod-core-hello",
            "mod-suite-crm",
            "mod-industry-retail-pos",
            "mod-ext-a1",
            "mod-infra-queue",
        ] {
            assert!(is_valid_module_id(id), "{id} should be valid");
        }
    }

    #[test]
    fn module_id_without_prefix_is_rejected() {
        assert!(!is_valid_module_id("core-hello"));
    }

    #[test]
    fn module_id_with_unknown_class_is_rejected() {
        assert!(!is_valid_module_id("mod-plugin-hello"));
    }

    #[test]
    fn module_id_slug_rules_enforced() {
        assert!(!is_valid_module_id("mod-core-"));
        assert!(!is_valid_module_id("mod-core--x"));
        assert!(!is_valid_module_id("mod-core-x-"));
        assert!(!is_valid_module_id("mod-core-Hello"));
        assert!(!is_valid_module_id("mod-core-hello_world"));
        // Hyphens inside the slug are allowed.
        assert!(is_valid_module_id("mod-core-hello-world"));
    }

    #[test]
    fn split_module_id_returns_class_and_slug() {
        let (class, slug) = split_module_id("mod-industry-retail-pos").unwrap();
        assert_eq!(class, ModuleClass::Industry);
        assert_eq!(slug, "retail-pos");
    }

    #[test]
    fn capability_id_requires_two_segments() {
        assert!(is_valid_capability_id("hello-greet"));
        assert!(is_valid_capability_id("crm2-export"));
        assert!(!is_valid_capability_id("hello"));
        assert!(!is_valid_capability_id("hello-"));
        assert!(!is_valid_capability_id("-greet"));
        assert!(!is_valid_capability_id("hello-greet-now"));
        assert!(!is_valid_capability_id("Hello-greet"));
        assert!(!is_valid_capability_id("hello_greet"));
        assert!(!is_valid_capability_id(""));
    }

    #[test]
    fn tenant_id_rules() {
        assert!(is_valid_tenant_id("demo"));
        assert!(is_valid_tenant_id("acme-prod"));
        assert!(is_valid_tenant_id("tenant_42"));
        assert!(!is_valid_tenant_id(""));
        assert!(!is_valid_tenant_id("Acme"));
        assert!(!is_valid_tenant_id("acme prod"));
    }
}

//! Manifest validator – pure structural and business-rule checks.
//!
//! [`validate`] never fails and never stops early: it evaluates every rule
//! and returns the *complete* list of violations as a [`ValidationReport`],
//! so a caller can present all problems at once. Field presence, typing and
//! unknown-field rejection already happen at the serde boundary
//! (`ModuleManifest` denies unknown fields); everything serde cannot express
//! is covered here:
//!
//! - module id pattern (`mod-<class>-<slug>`) and, separately coded, the
//!   class segment matching the declared `class` field;
//! - semantic version format for the module, its capabilities, and
//!   dependency version constraints (no leading `v`);
//! - capability id format and intra-manifest uniqueness, non-empty names;
//! - dependency target format, no self-dependency, no duplicate targets,
//!   well-formed required-capability ids.

use std::collections::HashSet;

use modhub_types::{ModuleManifest, ValidationCode, ValidationError, id};
use serde::{Deserialize, Serialize};

/// Outcome of validating one candidate manifest.
///
/// # Example
///
/// ```
/// use modhub_registry::validator::validate;
/// use modhub_types::{ModuleClass, ModuleManifest};
///
/// let manifest = ModuleManifest {
///     module_id: "mod-core-hello".to_string(),
///     class: ModuleClass::Core,
///     version: "1.0.0".to_string(),
///     capabilities: vec![],
///     dependencies: vec![],
///     metadata: serde_json::Map::new(),
/// };
/// assert!(validate(&manifest).is_valid());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationReport {
    pub errors: Vec<ValidationError>,
}

impl ValidationReport {
    /// `true` when no rule was violated.
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// `true` when the report contains at least one error with `code`.
    pub fn has_code(&self, code: ValidationCode) -> bool {
        self.errors.iter().any(|e| e.code == code)
    }
}

/// Validate `manifest` against every structural and business rule,
/// collecting all violations.
pub fn validate(manifest: &ModuleManifest) -> ValidationReport {
    let mut errors = Vec::new();

    check_module_id(manifest, &mut errors);
    check_version(&manifest.version, "version", &mut errors);
    check_capabilities(manifest, &mut errors);
    check_dependencies(manifest, &mut errors);

    ValidationReport { errors }
}

fn check_module_id(manifest: &ModuleManifest, errors: &mut Vec<ValidationError>) {
    match id::split_module_id(&manifest.module_id) {
        None => errors.push(ValidationError::new(
            ValidationCode::InvalidModuleId,
            "moduleId",
            format!(
                "'{}' does not match {}-<class>-<slug>",
                manifest.module_id,
                id::MODULE_ID_PREFIX
            ),
        )),
        Some((id_class, _)) if id_class != manifest.class => {
            // Distinct code: the id itself is well-formed.
            errors.push(ValidationError::new(
                ValidationCode::ClassMismatch,
                "class",
                format!(
                    "declared class '{}' does not match the '{}' segment of '{}'",
                    manifest.class,
                    id_class,
                    manifest.module_id
                ),
            ));
        }
        Some(_) => {}
    }
}

fn check_version(version: &str, field: &str, errors: &mut Vec<ValidationError>) {
    if semver::Version::parse(version).is_err() {
        errors.push(ValidationError::new(
            ValidationCode::InvalidVersion,
            field,
            format!("'{version}' is not a valid semantic version"),
        ));
    }
}

fn check_capabilities(manifest: &ModuleManifest, errors: &mut Vec<ValidationError>) {
    let mut seen: HashSet<&str> = HashSet::new();
    for (i, cap) in manifest.capabilities.iter().enumerate() {
        if !id::is_valid_capability_id(&cap.id) {
            errors.push(ValidationError::new(
                ValidationCode::InvalidCapabilityId,
                format!("capabilities[{i}].id"),
                format!("'{}' does not match <segment>-<segment>", cap.id),
            ));
        }
        if cap.name.trim().is_empty() {
            errors.push(ValidationError::new(
                ValidationCode::MissingField,
                format!("capabilities[{i}].name"),
                "capability name must not be empty",
            ));
        }
        if let Some(version) = &cap.version {
            check_version(version, &format!("capabilities[{i}].version"), errors);
        }
        if !seen.insert(cap.id.as_str()) {
            errors.push(ValidationError::new(
                ValidationCode::DuplicateCapability,
                format!("capabilities[{i}].id"),
                format!("capability '{}' is declared more than once", cap.id),
            ));
        }
    }
}

fn check_dependencies(manifest: &ModuleManifest, errors: &mut Vec<ValidationError>) {
    let mut seen: HashSet<&str> = HashSet::new();
    for (i, dep) in manifest.dependencies.iter().enumerate() {
        if dep.module_id == manifest.module_id {
            errors.push(ValidationError::new(
                ValidationCode::SelfDependency,
                format!("dependencies[{i}].moduleId"),
                "a module must not declare itself as a dependency",
            ));
        } else if !id::is_valid_module_id(&dep.module_id) {
            errors.push(ValidationError::new(
                ValidationCode::InvalidDependencyId,
                format!("dependencies[{i}].moduleId"),
                format!("'{}' is not a well-formed module id", dep.module_id),
            ));
        }
        if !seen.insert(dep.module_id.as_str()) {
            errors.push(ValidationError::new(
                ValidationCode::DuplicateDependency,
                format!("dependencies[{i}].moduleId"),
                format!("dependency '{}' is declared more than once", dep.module_id),
            ));
        }
        if let Some(req) = &dep.version {
            if semver::VersionReq::parse(req).is_err() {
                errors.push(ValidationError::new(
                    ValidationCode::InvalidDependencyVersion,
                    format!("dependencies[{i}].version"),
                    format!("'{req}' is not a valid version requirement"),
                ));
            }
        }
        if let Some(caps) = &dep.capabilities {
            for (j, cap_id) in caps.iter().enumerate() {
                if !id::is_valid_capability_id(cap_id) {
                    errors.push(ValidationError::new(
                        ValidationCode::InvalidDependencyCapability,
                        format!("dependencies[{i}].capabilities[{j}]"),
                        format!("'{cap_id}' does not match <segment>-<segment>"),
                    ));
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use modhub_types::{CapabilityDescriptor, DependencyDeclaration, ModuleClass};

    fn capability(id: &str) -> CapabilityDescriptor {
        CapabilityDescriptor {
            id: id.to_string(),
            name: format!("Capability {id}"),
            description: String::new(),
            version: None,
        }
    }

    fn dependency(target: &str) -> DependencyDeclaration {
        DependencyDeclaration {
            module_id: target.to_string(),
            version: None,
            optional: false,
            capabilities: None,
        }
    }

    fn manifest(module_id: &str, class: ModuleClass) -> ModuleManifest {
        ModuleManifest {
            module_id: module_id.to_string(),
            class,
            version: "1.0.0".to_string(),
            capabilities: vec![],
            dependencies: vec![],
            metadata: serde_json::Map::new(),
        }
    }

    #[test]
    fn well_formed_manifest_is_valid() {
        let mut m = manifest("mod-core-hello", ModuleClass::Core);
        m.capabilities.push(capability("hello-greet"));
        m.dependencies.push(dependency("mod-infra-queue"));
        let report = validate(&m);
        assert!(report.is_valid(), "unexpected errors: {:?}", report.errors);
    }

    #[test]
    fn malformed_module_id_is_reported() {
        let m = manifest("core-hello", ModuleClass::Core);
        let report = validate(&m);
        assert!(report.has_code(ValidationCode::InvalidModuleId));
        assert_eq!(report.errors[0].field, "moduleId");
    }

    #[test]
    fn class_mismatch_is_a_distinct_code() {
        // Well-formed id, but declared class disagrees with the id segment.
        let m = manifest("mod-core-hello", ModuleClass::Suite);
        let report = validate(&m);
        assert!(report.has_code(ValidationCode::ClassMismatch));
        assert!(!report.has_code(ValidationCode::InvalidModuleId));
    }

    #[test]
    fn leading_v_version_is_rejected() {
        let mut m = manifest("mod-core-hello", ModuleClass::Core);
        m.version = "v1.0.0".to_string();
        assert!(validate(&m).has_code(ValidationCode::InvalidVersion));
    }

    #[test]
    fn prerelease_and_build_metadata_versions_pass() {
        for version in ["1.0.0-alpha.1", "2.3.4+build.7", "0.1.0-rc.1+sha.abc"] {
            let mut m = manifest("mod-core-hello", ModuleClass::Core);
            m.version = version.to_string();
            assert!(validate(&m).is_valid(), "{version} should be accepted");
        }
    }

    #[test]
    fn short_version_is_rejected() {
        let mut m = manifest("mod-core-hello", ModuleClass::Core);
        m.version = "1.0".to_string();
        assert!(validate(&m).has_code(ValidationCode::InvalidVersion));
    }

    #[test]
    fn malformed_capability_id_is_reported_with_path() {
        let mut m = manifest("mod-core-hello", ModuleClass::Core);
        m.capabilities.push(capability("hello-greet"));
        m.capabilities.push(capability("justoneword"));
        let report = validate(&m);
        assert!(report.has_code(ValidationCode::InvalidCapabilityId));
        let err = report
            .errors
            .iter()
            .find(|e| e.code == ValidationCode::InvalidCapabilityId)
            .unwrap();
        assert_eq!(err.field, "capabilities[1].id");
    }

    #[test]
    fn duplicate_capability_within_manifest_is_reported() {
        let mut m = manifest("mod-core-hello", ModuleClass::Core);
        m.capabilities.push(capability("hello-greet"));
        m.capabilities.push(capability("hello-greet"));
        assert!(validate(&m).has_code(ValidationCode::DuplicateCapability));
    }

    #[test]
    fn empty_capability_name_is_reported() {
        let mut m = manifest("mod-core-hello", ModuleClass::Core);
        let mut cap = capability("hello-greet");
        cap.name = "  ".to_string();
        m.capabilities.push(cap);
        assert!(validate(&m).has_code(ValidationCode::MissingField));
    }

    #[test]
    fn self_dependency_is_reported() {
        let mut m = manifest("mod-core-hello", ModuleClass::Core);
        m.dependencies.push(dependency("mod-core-hello"));
        assert!(validate(&m).has_code(ValidationCode::SelfDependency));
    }

    #[test]
    fn duplicate_dependency_target_is_reported() {
        let mut m = manifest("mod-core-hello", ModuleClass::Core);
        m.dependencies.push(dependency("mod-infra-queue"));
        m.dependencies.push(dependency("mod-infra-queue"));
        let report = validate(&m);
        assert!(report.has_code(ValidationCode::DuplicateDependency));
    }

    #[test]
    fn malformed_dependency_target_is_reported() {
        let mut m = manifest("mod-core-hello", ModuleClass::Core);
        m.dependencies.push(dependency("not-a-module"));
        assert!(validate(&m).has_code(ValidationCode::InvalidDependencyId));
    }

    #[test]
    fn bad_dependency_version_requirement_is_reported() {
        let mut m = manifest("mod-core-hello", ModuleClass::Core);
        let mut dep = dependency("mod-infra-queue");
        dep.version = Some("not a requirement".to_string());
        m.dependencies.push(dep);
        assert!(validate(&m).has_code(ValidationCode::InvalidDependencyVersion));
    }

    #[test]
    fn range_style_dependency_requirement_passes() {
        let mut m = manifest("mod-core-hello", ModuleClass::Core);
        let mut dep = dependency("mod-infra-queue");
        dep.version = Some("^1.2".to_string());
        m.dependencies.push(dep);
        assert!(validate(&m).is_valid());
    }

    #[test]
    fn malformed_dependency_capability_is_reported() {
        let mut m = manifest("mod-core-hello", ModuleClass::Core);
        let mut dep = dependency("mod-infra-queue");
        dep.capabilities = Some(vec!["queue-push".to_string(), "bogus".to_string()]);
        m.dependencies.push(dep);
        let report = validate(&m);
        let err = report
            .errors
            .iter()
            .find(|e| e.code == ValidationCode::InvalidDependencyCapability)
            .unwrap();
        assert_eq!(err.field, "dependencies[0].capabilities[1]");
    }

    #[test]
    fn all_violations_are_collected_in_one_pass() {
        // One manifest breaking many rules at once must report all of them.
        let mut m = manifest("mod-core-hello", ModuleClass::Suite);
        m.version = "one.two".to_string();
        m.capabilities.push(capability("nodash"));
        m.capabilities.push(capability("hello-greet"));
        m.capabilities.push(capability("hello-greet"));
        m.dependencies.push(dependency("mod-core-hello"));
        m.dependencies.push(dependency("bad id"));

        let report = validate(&m);
        for code in [
            ValidationCode::ClassMismatch,
            ValidationCode::InvalidVersion,
            ValidationCode::InvalidCapabilityId,
            ValidationCode::DuplicateCapability,
            ValidationCode::SelfDependency,
            ValidationCode::InvalidDependencyId,
        ] {
            assert!(report.has_code(code), "missing {code:?}: {:?}", report.errors);
        }
    }
}

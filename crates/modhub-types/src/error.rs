//! Error taxonomy for the registry and the tenant enablement engine.
//!
//! Every rule violation in ModHub is recoverable and inspectable: validation
//! problems come back as a *complete list* of [`ValidationError`] records,
//! while registration, capability resolution and tenant transitions surface
//! one typed failure per call. Nothing here is fatal and nothing is silently
//! swallowed; the variants carry the offending identifiers so a caller can
//! act on them (e.g. enable the missing dependencies first).

use serde::{Deserialize, Serialize};
use thiserror::Error;

// ─────────────────────────────────────────────────────────────────────────────
// Validation
// ─────────────────────────────────────────────────────────────────────────────

/// Machine-readable code identifying a single manifest rule violation.
///
/// Downstream tooling branches on the code; the serialized form is
/// `SCREAMING_SNAKE_CASE` (e.g. `CLASS_MISMATCH`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ValidationCode {
    /// `moduleId` does not match `mod-<class>-<slug>`.
    InvalidModuleId,
    /// The class segment inside `moduleId` differs from the declared `class`.
    ClassMismatch,
    /// A version string is not a valid semantic version.
    InvalidVersion,
    /// A capability id does not match the `<segment>-<segment>` format.
    InvalidCapabilityId,
    /// The same capability id appears twice in one manifest.
    DuplicateCapability,
    /// A required field is present but empty.
    MissingField,
    /// A module declares itself as a dependency.
    SelfDependency,
    /// The same dependency target appears twice in one manifest.
    DuplicateDependency,
    /// A dependency target id does not match the module id format.
    InvalidDependencyId,
    /// A dependency's required capability id is malformed.
    InvalidDependencyCapability,
    /// A dependency version constraint is not a valid semver requirement.
    InvalidDependencyVersion,
}

/// One manifest rule violation: a machine-readable [`ValidationCode`], a
/// human message, and the path of the offending field (e.g.
/// `dependencies[1].moduleId`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationError {
    pub code: ValidationCode,
    pub message: String,
    pub field: String,
}

impl ValidationError {
    pub fn new(code: ValidationCode, field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            field: field.into(),
        }
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {} ({:?})", self.field, self.message, self.code)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Registration
// ─────────────────────────────────────────────────────────────────────────────

/// Failures raised by module registration and catalog lookups.
/// Registration is all-or-nothing: any of these leaves the registry
/// untouched.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum RegistryError {
    /// The manifest broke one or more validation rules; the complete list is
    /// carried so the caller can present every problem at once.
    #[error("manifest failed validation with {} error(s)", .0.len())]
    Invalid(Vec<ValidationError>),

    #[error("module '{0}' is already registered")]
    AlreadyRegistered(String),

    #[error("capability '{capability_id}' is already provided by module '{owner}'")]
    CapabilityConflict { capability_id: String, owner: String },

    /// The candidate would close a dependency cycle; `path` is the walk in
    /// traversal order, ending back at the repeated id.
    #[error("circular dependency: {}", .path.join(" -> "))]
    CircularDependency { path: Vec<String> },

    #[error("dependency walk exceeded the configured depth limit of {limit}")]
    DependencyDepthExceeded { limit: usize },

    #[error("module '{0}' is not registered")]
    NotFound(String),
}

// ─────────────────────────────────────────────────────────────────────────────
// Capability resolution
// ─────────────────────────────────────────────────────────────────────────────

/// Failures raised by capability lookup. The format check always precedes
/// the existence check, so a malformed id is never reported as merely
/// unbound.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResolveError {
    #[error("capability id '{0}' is malformed")]
    InvalidFormat(String),

    #[error("capability '{0}' is not bound to any module")]
    NotFound(String),
}

// ─────────────────────────────────────────────────────────────────────────────
// Tenant control
// ─────────────────────────────────────────────────────────────────────────────

/// Failures raised by per-tenant enable/disable transitions and reads.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TenantError {
    #[error("tenant id '{0}' is malformed")]
    InvalidTenantId(String),

    #[error("module id '{0}' is malformed")]
    InvalidModuleId(String),

    #[error("module '{0}' is not registered")]
    ModuleNotFound(String),

    #[error("module '{module_id}' is already enabled for tenant '{tenant_id}'")]
    AlreadyEnabled { tenant_id: String, module_id: String },

    #[error("module '{module_id}' is already disabled for tenant '{tenant_id}'")]
    AlreadyDisabled { tenant_id: String, module_id: String },

    /// Non-optional dependencies of the module that are not enabled for the
    /// tenant, in declaration order.
    #[error("dependencies not enabled for tenant '{tenant_id}': {}", .missing.join(", "))]
    DependencyNotEnabled {
        tenant_id: String,
        missing: Vec<String>,
    },

    /// Modules enabled for the tenant that non-optionally depend on the
    /// module being disabled, sorted by id.
    #[error("modules still enabled that depend on '{module_id}': {}", .dependents.join(", "))]
    DependentEnabled {
        module_id: String,
        dependents: Vec<String>,
    },
}

//! `modhub-types` – shared data model for the ModHub capability registry.
//!
//! Everything that crosses a component boundary lives here:
//!
//! - [`ModuleManifest`] – the closed-schema document a caller submits to
//!   register a module, together with [`CapabilityDescriptor`] and
//!   [`DependencyDeclaration`].
//! - [`ModuleRecord`] – an accepted manifest plus its registration
//!   timestamp. Immutable once committed.
//! - [`TenantModuleState`] / [`EnablementStatus`] – per-(tenant, module)
//!   enablement state owned by the enablement engine.
//! - [`id`] – identifier format rules (module, capability, tenant).
//! - [`error`] – the full error taxonomy ([`ValidationError`],
//!   [`RegistryError`], [`ResolveError`], [`TenantError`]).
//!
//! Manifests use the external camelCase document shape and reject unknown
//! fields, so schema violations are caught at the serde boundary.

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

pub mod error;
pub mod id;

pub use error::{RegistryError, ResolveError, TenantError, ValidationCode, ValidationError};

/// The closed set of module classes a platform distinguishes.
///
/// The class also appears as the middle segment of the module id
/// (`mod-<class>-<slug>`); [`ValidationCode::ClassMismatch`] is raised when
/// the two disagree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum ModuleClass {
    /// Platform-core functionality every tenant relies on.
    Core,
    /// A bundled application suite.
    Suite,
    /// Industry-specific verticals.
    Industry,
    /// Third-party extensions.
    Ext,
    /// Infrastructure plumbing (queues, storage bridges, …).
    Infra,
}

impl ModuleClass {
    /// All classes, in declaration order.
    pub const ALL: [ModuleClass; 5] = [
        ModuleClass::Core,
        ModuleClass::Suite,
        ModuleClass::Industry,
        ModuleClass::Ext,
        ModuleClass::Infra,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ModuleClass::Core => "core",
            ModuleClass::Suite => "suite",
            ModuleClass::Industry => "industry",
            ModuleClass::Ext => "ext",
            ModuleClass::Infra => "infra",
        }
    }

    /// Parse the lowercase class segment; `None` for anything outside the
    /// closed set.
    pub fn parse(segment: &str) -> Option<Self> {
        match segment {
            "core" => Some(ModuleClass::Core),
            "suite" => Some(ModuleClass::Suite),
            "industry" => Some(ModuleClass::Industry),
            "ext" => Some(ModuleClass::Ext),
            "infra" => Some(ModuleClass::Infra),
            _ => None,
        }
    }
}

impl std::fmt::Display for ModuleClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A named feature a module claims to provide.
///
/// Capability ids are unique within a manifest and globally unique across
/// all registered modules; the latter is enforced by the capability index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct CapabilityDescriptor {
    /// Two lowercase alphanumeric segments joined by a hyphen,
    /// e.g. `hello-greet`.
    pub id: String,
    /// Short human-readable name. Must be non-empty.
    pub name: String,
    /// Free-form description.
    #[serde(default)]
    pub description: String,
    /// Optional semantic version of the capability itself.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

/// A declared requirement on another module.
///
/// Only the *format* of `version` is checked by this core; range resolution
/// is an external concern. Self-dependencies and duplicate targets are
/// always invalid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct DependencyDeclaration {
    /// Target module id (`mod-<class>-<slug>`). The target need not be
    /// registered yet; existence is enforced at enable time.
    pub module_id: String,
    /// Optional semver requirement on the target (format-checked only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    /// Optional dependencies do not gate enablement and are ignored by the
    /// cycle walk.
    #[serde(default)]
    pub optional: bool,
    /// Capability ids the target is expected to provide.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub capabilities: Option<Vec<String>>,
}

/// The document a caller submits to register a module.
///
/// The schema is closed: unknown fields fail deserialization
/// (`deny_unknown_fields`), so the validator only has to cover the rules
/// serde cannot express.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ModuleManifest {
    /// Globally unique, immutable module identity (`mod-<class>-<slug>`).
    pub module_id: String,
    /// Declared class; must match the class segment of `module_id`.
    pub class: ModuleClass,
    /// Semantic version of the module (no leading `v`).
    pub version: String,
    /// Capabilities the module provides, in declaration order.
    #[serde(default)]
    pub capabilities: Vec<CapabilityDescriptor>,
    /// Modules this module depends on, in declaration order.
    #[serde(default)]
    pub dependencies: Vec<DependencyDeclaration>,
    /// Free-form metadata carried verbatim.
    #[serde(default)]
    pub metadata: serde_json::Map<String, serde_json::Value>,
}

impl ModuleManifest {
    /// The targets of the non-optional dependency declarations, in
    /// declaration order.
    pub fn required_dependencies(&self) -> impl Iterator<Item = &str> {
        self.dependencies
            .iter()
            .filter(|d| !d.optional)
            .map(|d| d.module_id.as_str())
    }
}

/// An accepted manifest plus its registration timestamp.
///
/// Records are created once at successful registration, never mutated, and
/// destroyed only by explicit unregistration (which also removes all of the
/// module's capability bindings).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModuleRecord {
    pub manifest: ModuleManifest,
    pub registered_at: DateTime<Utc>,
}

impl ModuleRecord {
    pub fn module_id(&self) -> &str {
        &self.manifest.module_id
    }
}

/// Per-(tenant, module) enablement record.
///
/// Created lazily on the first enable, mutated only through the enablement
/// engine's transitions, and never visible across tenants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TenantModuleState {
    pub tenant_id: String,
    pub module_id: String,
    pub enabled: bool,
    pub last_enabled_at: Option<DateTime<Utc>>,
    pub last_disabled_at: Option<DateTime<Utc>>,
}

/// Query view of a (tenant, module) pair. `Absent` is equivalent to
/// disabled for all gating purposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EnablementStatus {
    /// No record exists for the pair.
    Absent,
    Enabled,
    Disabled,
}

impl EnablementStatus {
    pub fn is_enabled(&self) -> bool {
        matches!(self, EnablementStatus::Enabled)
    }
}

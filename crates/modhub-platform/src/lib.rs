//! `modhub-platform` – the single in-process API surface of ModHub.
//!
//! [`Platform`] owns one [`ModuleRegistry`] and one [`EnablementEngine`]
//! and exposes the whole operation set behind one object: manifest
//! validation, atomic registration/unregistration, capability resolution,
//! dependency ordering, and per-tenant enable/disable. Hosts that only need
//! one half can depend on `modhub-registry` or `modhub-tenancy` directly;
//! this crate is the convenient front door.
//!
//! # Modules
//!
//! - [`telemetry`] – [`init_tracing`][telemetry::init_tracing]: wires the
//!   global `tracing` subscriber (env-filtered, optional JSON output).
//!
//! # Example
//!
//! ```
//! use modhub_platform::Platform;
//! use modhub_types::{ModuleClass, ModuleManifest, CapabilityDescriptor};
//!
//! let mut platform = Platform::new();
//! platform.register(ModuleManifest {
//!     module_id: "mod-core-hello".to_string(),
//!     class: ModuleClass::Core,
//!     version: "1.0.0".to_string(),
//!     capabilities: vec![CapabilityDescriptor {
//!         id: "hello-greet".to_string(),
//!         name: "Greeting".to_string(),
//!         description: "Says hello.".to_string(),
//!         version: None,
//!     }],
//!     dependencies: vec![],
//!     metadata: serde_json::Map::new(),
//! }).unwrap();
//!
//! platform.enable("demo", "mod-core-hello").unwrap();
//! assert!(platform.is_enabled("demo", "mod-core-hello").unwrap());
//! ```

pub mod telemetry;

use modhub_registry::registry::CapabilityResolution;
use modhub_registry::{ModuleRegistry, RegistryConfig, ModuleStore, ValidationReport};
use modhub_tenancy::EnablementEngine;
use modhub_types::{
    EnablementStatus, ModuleManifest, ModuleRecord, RegistryError, ResolveError, TenantError,
    TenantModuleState,
};

pub use modhub_registry;
pub use modhub_tenancy;
pub use modhub_types;

/// Single owner of the module store, the capability index, and the
/// tenant-state table.
///
/// Every public operation is atomic from the caller's perspective: it
/// either fully applies or fully fails with no partial effect. The platform
/// is an explicit, instantiable context; independent instances share
/// nothing.
#[derive(Default)]
pub struct Platform {
    registry: ModuleRegistry,
    engine: EnablementEngine,
}

impl Platform {
    /// A platform over an in-memory module store with default config.
    pub fn new() -> Self {
        Self::default()
    }

    /// A platform over a caller-supplied store backend.
    pub fn with_store(store: Box<dyn ModuleStore>, config: RegistryConfig) -> Self {
        Self {
            registry: ModuleRegistry::with_store(store, config),
            engine: EnablementEngine::new(),
        }
    }

    /// Borrow the underlying registry (read-only catalog access).
    pub fn registry(&self) -> &ModuleRegistry {
        &self.registry
    }

    // ── Registry surface ────────────────────────────────────────────────────

    /// Validate a manifest without touching any state.
    pub fn validate(&self, manifest: &ModuleManifest) -> ValidationReport {
        self.registry.validate(manifest)
    }

    /// Register a module atomically (record + capability bindings).
    pub fn register(&mut self, manifest: ModuleManifest) -> Result<ModuleRecord, RegistryError> {
        self.registry.register(manifest)
    }

    /// Unregister a module, removing its capability bindings and every
    /// tenant's state for it.
    pub fn unregister(&mut self, module_id: &str) -> Result<(), RegistryError> {
        self.registry.unregister(module_id)?;
        self.engine.forget_module(module_id);
        Ok(())
    }

    pub fn list_modules(&self) -> Vec<&ModuleRecord> {
        self.registry.list_modules()
    }

    pub fn get_module(&self, module_id: &str) -> Option<&ModuleRecord> {
        self.registry.get_module(module_id)
    }

    pub fn resolve_capability(
        &self,
        capability_id: &str,
    ) -> Result<CapabilityResolution, ResolveError> {
        self.registry.resolve_capability(capability_id)
    }

    pub fn has_capability(&self, capability_id: &str) -> bool {
        self.registry.has_capability(capability_id)
    }

    pub fn dependency_order(&self, module_id: &str) -> Result<Vec<String>, RegistryError> {
        self.registry.dependency_order(module_id)
    }

    pub fn dependents(&self, module_id: &str) -> Vec<String> {
        self.registry.dependents(module_id)
    }

    // ── Tenant surface ──────────────────────────────────────────────────────

    pub fn enable(
        &mut self,
        tenant_id: &str,
        module_id: &str,
    ) -> Result<TenantModuleState, TenantError> {
        self.engine.enable(&self.registry, tenant_id, module_id)
    }

    pub fn disable(
        &mut self,
        tenant_id: &str,
        module_id: &str,
    ) -> Result<TenantModuleState, TenantError> {
        self.engine.disable(&self.registry, tenant_id, module_id)
    }

    pub fn is_enabled(&self, tenant_id: &str, module_id: &str) -> Result<bool, TenantError> {
        self.engine.is_enabled(tenant_id, module_id)
    }

    pub fn enabled_modules(&self, tenant_id: &str) -> Result<Vec<String>, TenantError> {
        self.engine.enabled_modules(tenant_id)
    }

    pub fn status(&self, tenant_id: &str, module_id: &str) -> Result<EnablementStatus, TenantError> {
        self.engine.status(tenant_id, module_id)
    }

    /// Tear down all state: modules, bindings, and every tenant's records.
    pub fn reset(&mut self) {
        self.registry.reset();
        self.engine.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use modhub_types::{CapabilityDescriptor, DependencyDeclaration, ModuleClass};

    fn manifest(module_id: &str, cap_ids: &[&str], deps: &[&str]) -> ModuleManifest {
        ModuleManifest {
            module_id: module_id.to_string(),
            class: modhub_types::id::split_module_id(module_id)
                .map(|(class, _)| class)
                .unwrap_or(ModuleClass::Core),
            version: "1.0.0".to_string(),
            capabilities: cap_ids
                .iter()
                .map(|id| CapabilityDescriptor {
                    id: id.to_string(),
                    name: format!("Capability {id}"),
                    description: String::new(),
                    version: None,
                })
                .collect(),
            dependencies: deps
                .iter()
                .map(|target| DependencyDeclaration {
                    module_id: target.to_string(),
                    version: None,
                    optional: false,
                    capabilities: None,
                })
                .collect(),
            metadata: serde_json::Map::new(),
        }
    }

    /// End-to-end walkthrough: register, enable, resolve, disable.
    #[test]
    fn hello_module_lifecycle() {
        let mut platform = Platform::new();
        let hello = manifest("mod-core-hello", &["hello-greet"], &[]);

        assert!(platform.validate(&hello).is_valid());
        platform.register(hello).unwrap();

        let state = platform.enable("demo", "mod-core-hello").unwrap();
        assert!(state.enabled);

        let hit = platform.resolve_capability("hello-greet").unwrap();
        assert_eq!(hit.module_id, "mod-core-hello");

        let state = platform.disable("demo", "mod-core-hello").unwrap();
        assert!(!state.enabled);
        assert!(!platform.is_enabled("demo", "mod-core-hello").unwrap());
    }

    #[test]
    fn enable_order_follows_dependency_order() {
        let mut platform = Platform::new();
        platform
            .register(manifest("mod-core-base", &["base-cap"], &[]))
            .unwrap();
        platform
            .register(manifest("mod-suite-crm", &["crm-cap"], &["mod-core-base"]))
            .unwrap();
        platform
            .register(manifest("mod-ext-report", &["report-cap"], &["mod-suite-crm"]))
            .unwrap();

        // Enabling the tip first fails; walking the topological order works.
        assert!(matches!(
            platform.enable("demo", "mod-ext-report"),
            Err(TenantError::DependencyNotEnabled { .. })
        ));
        let order = platform.dependency_order("mod-ext-report").unwrap();
        assert_eq!(
            order,
            vec!["mod-core-base", "mod-suite-crm", "mod-ext-report"]
        );
        for module_id in &order {
            platform.enable("demo", module_id).unwrap();
        }
        assert_eq!(platform.enabled_modules("demo").unwrap(), order_sorted(&order));
    }

    fn order_sorted(order: &[String]) -> Vec<String> {
        let mut sorted = order.to_vec();
        sorted.sort();
        sorted
    }

    #[test]
    fn unregister_clears_tenant_state() {
        let mut platform = Platform::new();
        platform
            .register(manifest("mod-core-hello", &["hello-greet"], &[]))
            .unwrap();
        platform.enable("demo", "mod-core-hello").unwrap();

        platform.unregister("mod-core-hello").unwrap();
        assert!(platform.get_module("mod-core-hello").is_none());
        assert!(!platform.has_capability("hello-greet"));

        // Re-registration starts from a clean absent state.
        platform
            .register(manifest("mod-core-hello", &["hello-greet"], &[]))
            .unwrap();
        assert_eq!(
            platform.status("demo", "mod-core-hello").unwrap(),
            EnablementStatus::Absent
        );
        platform.enable("demo", "mod-core-hello").unwrap();
    }

    #[test]
    fn tenant_views_are_independent_through_the_facade() {
        let mut platform = Platform::new();
        platform
            .register(manifest("mod-core-hello", &["hello-greet"], &[]))
            .unwrap();
        platform.enable("acme", "mod-core-hello").unwrap();

        assert!(platform.is_enabled("acme", "mod-core-hello").unwrap());
        assert!(!platform.is_enabled("demo", "mod-core-hello").unwrap());
    }

    #[test]
    fn reset_returns_platform_to_pristine_state() {
        let mut platform = Platform::new();
        platform
            .register(manifest("mod-core-hello", &["hello-greet"], &[]))
            .unwrap();
        platform.enable("demo", "mod-core-hello").unwrap();

        platform.reset();
        assert!(platform.list_modules().is_empty());
        assert!(!platform.has_capability("hello-greet"));
        assert_eq!(
            platform.status("demo", "mod-core-hello").unwrap(),
            EnablementStatus::Absent
        );
    }

    #[test]
    fn dependents_visible_through_the_facade() {
        let mut platform = Platform::new();
        platform
            .register(manifest("mod-core-base", &["base-cap"], &[]))
            .unwrap();
        platform
            .register(manifest("mod-suite-crm", &["crm-cap"], &["mod-core-base"]))
            .unwrap();
        assert_eq!(platform.dependents("mod-core-base"), vec!["mod-suite-crm"]);
    }
}

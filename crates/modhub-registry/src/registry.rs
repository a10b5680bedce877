//! [`ModuleRegistry`] – the single gateway for module registration and
//! catalog reads.
//!
//! Registration is "validate all, then apply all": the manifest rules, the
//! already-registered check, the capability conflict scan, and the cycle
//! walk all run before anything is written, so a violation discovered
//! partway never leaves partial bindings behind. The registry is an
//! explicit, instantiable context object (never a process-wide singleton);
//! independent registries can coexist, which the tests rely on.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use modhub_types::{
    CapabilityDescriptor, ModuleManifest, ModuleRecord, RegistryError, ResolveError,
};

use crate::capability_index::CapabilityIndex;
use crate::dep_graph;
use crate::store::{MemoryModuleStore, ModuleStore};
use crate::validator::{self, ValidationReport};

/// Tunables for a [`ModuleRegistry`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistryConfig {
    /// Maximum depth of the dependency walk at registration time. The walk
    /// uses an explicit stack, so this bounds memory, not the call stack.
    pub max_dependency_depth: usize,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            max_dependency_depth: 64,
        }
    }
}

/// A resolved capability: the descriptor as declared, plus the owning
/// module id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CapabilityResolution {
    pub capability: CapabilityDescriptor,
    pub module_id: String,
}

/// Owner of the module store and the capability index.
///
/// # Example
///
/// ```
/// use modhub_registry::registry::ModuleRegistry;
/// use modhub_types::{ModuleClass, ModuleManifest, CapabilityDescriptor};
///
/// let manifest = ModuleManifest {
///     module_id: "mod-core-hello".to_string(),
///     class: ModuleClass::Core,
///     version: "1.0.0".to_string(),
///     capabilities: vec![CapabilityDescriptor {
///         id: "hello-greet".to_string(),
///         name: "Greeting".to_string(),
///         description: String::new(),
///         version: None,
///     }],
///     dependencies: vec![],
///     metadata: serde_json::Map::new(),
/// };
///
/// let mut registry = ModuleRegistry::new();
/// registry.register(manifest).unwrap();
///
/// let hit = registry.resolve_capability("hello-greet").unwrap();
/// assert_eq!(hit.module_id, "mod-core-hello");
/// ```
pub struct ModuleRegistry {
    store: Box<dyn ModuleStore>,
    index: CapabilityIndex,
    config: RegistryConfig,
}

impl Default for ModuleRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl ModuleRegistry {
    /// Create a registry over an in-memory store with default config.
    pub fn new() -> Self {
        Self::with_store(Box::new(MemoryModuleStore::new()), RegistryConfig::default())
    }

    /// Create a registry over a caller-supplied store backend.
    pub fn with_store(store: Box<dyn ModuleStore>, config: RegistryConfig) -> Self {
        Self {
            store,
            index: CapabilityIndex::new(),
            config,
        }
    }

    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    /// Validate `manifest` without touching registry state.
    pub fn validate(&self, manifest: &ModuleManifest) -> ValidationReport {
        validator::validate(manifest)
    }

    /// Register a module: validation, uniqueness, capability conflicts and
    /// cycle rejection all pass before the record and its bindings are
    /// committed together.
    pub fn register(&mut self, manifest: ModuleManifest) -> Result<ModuleRecord, RegistryError> {
        let report = validator::validate(&manifest);
        if !report.is_valid() {
            debug!(
                module_id = %manifest.module_id,
                errors = report.errors.len(),
                "manifest rejected by validator"
            );
            return Err(RegistryError::Invalid(report.errors));
        }
        if self.store.get(&manifest.module_id).is_some() {
            return Err(RegistryError::AlreadyRegistered(manifest.module_id));
        }
        self.index.check_conflicts(&manifest)?;
        dep_graph::check_no_cycles(&manifest, self.store.as_ref(), self.config.max_dependency_depth)?;

        // All checks passed; commit record and bindings together.
        self.index.bind_module(&manifest)?;
        let record = ModuleRecord {
            manifest,
            registered_at: Utc::now(),
        };
        self.store.save(record.clone());
        info!(
            module_id = %record.module_id(),
            capabilities = record.manifest.capabilities.len(),
            "module registered"
        );
        Ok(record)
    }

    /// Remove a module record together with every capability binding it
    /// owns.
    pub fn unregister(&mut self, module_id: &str) -> Result<(), RegistryError> {
        if self.store.get(module_id).is_none() {
            return Err(RegistryError::NotFound(module_id.to_string()));
        }
        self.index.unbind_module(module_id);
        self.store.delete(module_id);
        info!(module_id, "module unregistered");
        Ok(())
    }

    /// All registered records, sorted by module id.
    pub fn list_modules(&self) -> Vec<&ModuleRecord> {
        self.store.list()
    }

    pub fn get_module(&self, module_id: &str) -> Option<&ModuleRecord> {
        self.store.get(module_id)
    }

    /// Resolve `capability_id` to its descriptor and owning module. The
    /// format check precedes the existence check.
    pub fn resolve_capability(
        &self,
        capability_id: &str,
    ) -> Result<CapabilityResolution, ResolveError> {
        let owner = self.index.owner_of(capability_id)?.to_string();
        let capability = self
            .store
            .get(&owner)
            .and_then(|record| {
                record
                    .manifest
                    .capabilities
                    .iter()
                    .find(|cap| cap.id == capability_id)
            })
            .cloned()
            .ok_or_else(|| ResolveError::NotFound(capability_id.to_string()))?;
        Ok(CapabilityResolution {
            capability,
            module_id: owner,
        })
    }

    /// `true` when `capability_id` is well-formed and bound to a module.
    pub fn has_capability(&self, capability_id: &str) -> bool {
        self.index.owner_of(capability_id).is_ok()
    }

    /// Topological order of the transitive non-optional dependency closure
    /// of `module_id`, the module itself last.
    pub fn dependency_order(&self, module_id: &str) -> Result<Vec<String>, RegistryError> {
        dep_graph::dependency_order(module_id, self.store.as_ref())
    }

    /// Direct reverse-dependency lookup, sorted by id.
    pub fn dependents(&self, module_id: &str) -> Vec<String> {
        dep_graph::dependents_of(module_id, self.store.as_ref())
    }

    /// Drop every record and binding. Meant for teardown; tests lean on it
    /// to reuse one registry across scenarios.
    pub fn reset(&mut self) {
        self.store.clear();
        self.index.clear();
        info!("registry reset");
    }
}

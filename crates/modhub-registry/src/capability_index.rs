//! [`CapabilityIndex`] – global capability-uniqueness enforcement.
//!
//! The index maps every capability id to the single module that owns it.
//! Binding is a two-phase commit: phase one scans every capability the
//! candidate declares and fails the whole registration on the first id
//! already bound to a different module; phase two, reached only with zero
//! conflicts, binds every id. A per-module ownership list is kept so that
//! unbinding a module never has to re-scan the whole index.

use std::collections::HashMap;

use modhub_types::{ModuleManifest, RegistryError, ResolveError, id};

/// Capability id → owning module id bindings.
///
/// # Example
///
/// ```
/// use modhub_registry::capability_index::CapabilityIndex;
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
/// let mut index = CapabilityIndex::new();
/// index.bind_module(&manifest).unwrap();
/// assert_eq!(index.owner_of("hello-greet").unwrap(), "mod-core-hello");
/// ```
#[derive(Default)]
pub struct CapabilityIndex {
    /// capability id → owning module id.
    bindings: HashMap<String, String>,
    /// module id → capability ids it owns, in declaration order.
    owned: HashMap<String, Vec<String>>,
}

impl CapabilityIndex {
    /// Create an empty index.
    pub fn new() -> Self {
        Self::default()
    }

    /// Phase one only: report the first capability of `manifest` already
    /// bound to a *different* module, without writing anything.
    pub fn check_conflicts(&self, manifest: &ModuleManifest) -> Result<(), RegistryError> {
        for cap in &manifest.capabilities {
            if let Some(owner) = self.bindings.get(&cap.id) {
                if owner != &manifest.module_id {
                    return Err(RegistryError::CapabilityConflict {
                        capability_id: cap.id.clone(),
                        owner: owner.clone(),
                    });
                }
            }
        }
        Ok(())
    }

    /// Bind every capability of `manifest` to its module id.
    ///
    /// Runs [`CapabilityIndex::check_conflicts`] first; on any conflict the
    /// index is left untouched (no partial bindings).
    pub fn bind_module(&mut self, manifest: &ModuleManifest) -> Result<(), RegistryError> {
        self.check_conflicts(manifest)?;
        let owned = self.owned.entry(manifest.module_id.clone()).or_default();
        for cap in &manifest.capabilities {
            self.bindings
                .insert(cap.id.clone(), manifest.module_id.clone());
            owned.push(cap.id.clone());
        }
        Ok(())
    }

    /// Resolve the owning module of `capability_id`.
    ///
    /// The format check precedes the existence check: a malformed id is
    /// [`ResolveError::InvalidFormat`] even when nothing is bound at all.
    pub fn owner_of(&self, capability_id: &str) -> Result<&str, ResolveError> {
        if !id::is_valid_capability_id(capability_id) {
            return Err(ResolveError::InvalidFormat(capability_id.to_string()));
        }
        self.bindings
            .get(capability_id)
            .map(String::as_str)
            .ok_or_else(|| ResolveError::NotFound(capability_id.to_string()))
    }

    /// Remove every binding owned by `module_id`. No-ops for unknown
    /// modules.
    pub fn unbind_module(&mut self, module_id: &str) {
        if let Some(ids) = self.owned.remove(module_id) {
            for capability_id in ids {
                self.bindings.remove(&capability_id);
            }
        }
    }

    /// Number of bound capability ids.
    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    /// Drop all bindings.
    pub fn clear(&mut self) {
        self.bindings.clear();
        self.owned.clear();
    }
}

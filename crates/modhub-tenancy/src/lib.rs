//! `modhub-tenancy` – Tenant Enablement Engine
//!
//! A per-tenant boolean state machine over registered modules. Each
//! (tenant, module) pair is **absent** (no record; equivalent to disabled),
//! **enabled**, or **disabled**, and only the transitions here may change
//! it:
//!
//! - [`EnablementEngine::enable`] refuses to enable a module while any of
//!   its non-optional dependencies is not enabled for that tenant, so the
//!   invariant *enabled ⇒ all required dependencies enabled* always holds.
//! - [`EnablementEngine::disable`] refuses to disable a module while any
//!   other module enabled for the same tenant still requires it.
//! - Repeat transitions are caller errors
//!   ([`TenantError::AlreadyEnabled`] / [`TenantError::AlreadyDisabled`]),
//!   not silent no-ops.
//!
//! Tenants share no state: nothing a tenant does is visible to, or mutable
//! from, another tenant's operations. The engine owns only tenant-scoped
//! state; the module catalog is read through a borrowed
//! [`ModuleRegistry`].
//!
//! # Example
//!
//! ```
//! use modhub_registry::ModuleRegistry;
//! use modhub_tenancy::EnablementEngine;
//! use modhub_types::{ModuleClass, ModuleManifest};
//!
//! let mut registry = ModuleRegistry::new();
//! registry.register(ModuleManifest {
//!     module_id: "mod-core-hello".to_string(),
//!     class: ModuleClass::Core,
//!     version: "1.0.0".to_string(),
//!     capabilities: vec![],
//!     dependencies: vec![],
//!     metadata: serde_json::Map::new(),
//! }).unwrap();
//!
//! let mut engine = EnablementEngine::new();
//! engine.enable(&registry, "demo", "mod-core-hello").unwrap();
//! assert!(engine.is_enabled("demo", "mod-core-hello").unwrap());
//! ```

use std::collections::HashMap;

use chrono::Utc;
use tracing::info;

use modhub_registry::ModuleRegistry;
use modhub_types::{EnablementStatus, TenantError, TenantModuleState, id};

/// Owner of the tenant-state table and the enable/disable state machine.
#[derive(Default)]
pub struct EnablementEngine {
    /// tenant id → module id → state record.
    tenants: HashMap<String, HashMap<String, TenantModuleState>>,
}

impl EnablementEngine {
    /// Create an engine with no tenant state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable `module_id` for `tenant_id`.
    ///
    /// # Errors
    ///
    /// - [`TenantError::InvalidTenantId`] / [`TenantError::InvalidModuleId`]
    ///   on malformed identifiers;
    /// - [`TenantError::ModuleNotFound`] when the module was never
    ///   registered;
    /// - [`TenantError::AlreadyEnabled`] when the pair is already enabled
    ///   (a second enable is a caller error, not an idempotent success);
    /// - [`TenantError::DependencyNotEnabled`] carrying the exact set of
    ///   non-optional dependencies not enabled for this tenant, in
    ///   declaration order. Unregistered targets belong to that set, which
    ///   is how dependency existence is ultimately enforced.
    pub fn enable(
        &mut self,
        registry: &ModuleRegistry,
        tenant_id: &str,
        module_id: &str,
    ) -> Result<TenantModuleState, TenantError> {
        check_ids(tenant_id, module_id)?;
        let record = registry
            .get_module(module_id)
            .ok_or_else(|| TenantError::ModuleNotFound(module_id.to_string()))?;

        if self.enabled_for(tenant_id, module_id) {
            return Err(TenantError::AlreadyEnabled {
                tenant_id: tenant_id.to_string(),
                module_id: module_id.to_string(),
            });
        }

        let missing: Vec<String> = record
            .manifest
            .required_dependencies()
            .filter(|dep| !self.enabled_for(tenant_id, dep))
            .map(String::from)
            .collect();
        if !missing.is_empty() {
            return Err(TenantError::DependencyNotEnabled {
                tenant_id: tenant_id.to_string(),
                missing,
            });
        }

        let state = self
            .tenants
            .entry(tenant_id.to_string())
            .or_default()
            .entry(module_id.to_string())
            .or_insert_with(|| TenantModuleState {
                tenant_id: tenant_id.to_string(),
                module_id: module_id.to_string(),
                enabled: false,
                last_enabled_at: None,
                last_disabled_at: None,
            });
        state.enabled = true;
        state.last_enabled_at = Some(Utc::now());
        info!(tenant_id, module_id, "module enabled for tenant");
        Ok(state.clone())
    }

    /// Disable `module_id` for `tenant_id`.
    ///
    /// # Errors
    ///
    /// - identifier and [`TenantError::ModuleNotFound`] checks as for
    ///   [`EnablementEngine::enable`];
    /// - [`TenantError::AlreadyDisabled`] when the pair is absent or
    ///   already disabled;
    /// - [`TenantError::DependentEnabled`] carrying every registered module
    ///   that non-optionally depends on this one and is currently enabled
    ///   for the same tenant, sorted by id.
    pub fn disable(
        &mut self,
        registry: &ModuleRegistry,
        tenant_id: &str,
        module_id: &str,
    ) -> Result<TenantModuleState, TenantError> {
        check_ids(tenant_id, module_id)?;
        if registry.get_module(module_id).is_none() {
            return Err(TenantError::ModuleNotFound(module_id.to_string()));
        }

        if !self.enabled_for(tenant_id, module_id) {
            return Err(TenantError::AlreadyDisabled {
                tenant_id: tenant_id.to_string(),
                module_id: module_id.to_string(),
            });
        }

        // list_modules is sorted by id, so the dependent set is too.
        let dependents: Vec<String> = registry
            .list_modules()
            .iter()
            .filter(|record| {
                record
                    .manifest
                    .required_dependencies()
                    .any(|dep| dep == module_id)
            })
            .filter(|record| self.enabled_for(tenant_id, record.module_id()))
            .map(|record| record.module_id().to_string())
            .collect();
        if !dependents.is_empty() {
            return Err(TenantError::DependentEnabled {
                module_id: module_id.to_string(),
                dependents,
            });
        }

        // enabled_for returned true, so the record exists.
        let state = self
            .tenants
            .get_mut(tenant_id)
            .and_then(|modules| modules.get_mut(module_id))
            .ok_or_else(|| TenantError::AlreadyDisabled {
                tenant_id: tenant_id.to_string(),
                module_id: module_id.to_string(),
            })?;
        state.enabled = false;
        state.last_disabled_at = Some(Utc::now());
        info!(tenant_id, module_id, "module disabled for tenant");
        Ok(state.clone())
    }

    /// `true` when the pair is currently enabled. Absent counts as
    /// disabled. Never mutates; fails only on malformed identifiers.
    pub fn is_enabled(&self, tenant_id: &str, module_id: &str) -> Result<bool, TenantError> {
        check_ids(tenant_id, module_id)?;
        Ok(self.enabled_for(tenant_id, module_id))
    }

    /// Module ids currently enabled for `tenant_id`, sorted.
    pub fn enabled_modules(&self, tenant_id: &str) -> Result<Vec<String>, TenantError> {
        if !id::is_valid_tenant_id(tenant_id) {
            return Err(TenantError::InvalidTenantId(tenant_id.to_string()));
        }
        let mut enabled: Vec<String> = self
            .tenants
            .get(tenant_id)
            .map(|modules| {
                modules
                    .values()
                    .filter(|state| state.enabled)
                    .map(|state| state.module_id.clone())
                    .collect()
            })
            .unwrap_or_default();
        enabled.sort();
        Ok(enabled)
    }

    /// Query view of the pair: absent, enabled, or disabled.
    pub fn status(&self, tenant_id: &str, module_id: &str) -> Result<EnablementStatus, TenantError> {
        check_ids(tenant_id, module_id)?;
        let status = match self
            .tenants
            .get(tenant_id)
            .and_then(|modules| modules.get(module_id))
        {
            None => EnablementStatus::Absent,
            Some(state) if state.enabled => EnablementStatus::Enabled,
            Some(_) => EnablementStatus::Disabled,
        };
        Ok(status)
    }

    /// The full state record for the pair, if one exists.
    pub fn state(&self, tenant_id: &str, module_id: &str) -> Option<&TenantModuleState> {
        self.tenants
            .get(tenant_id)
            .and_then(|modules| modules.get(module_id))
    }

    /// Drop every tenant's state for `module_id`. Called after the module
    /// is unregistered so a later re-registration starts from absent.
    pub fn forget_module(&mut self, module_id: &str) {
        for modules in self.tenants.values_mut() {
            modules.remove(module_id);
        }
    }

    /// Drop all state of a single tenant.
    pub fn reset_tenant(&mut self, tenant_id: &str) {
        self.tenants.remove(tenant_id);
    }

    /// Drop all tenant state.
    pub fn reset(&mut self) {
        self.tenants.clear();
    }

    fn enabled_for(&self, tenant_id: &str, module_id: &str) -> bool {
        self.tenants
            .get(tenant_id)
            .and_then(|modules| modules.get(module_id))
            .map(|state| state.enabled)
            .unwrap_or(false)
    }
}

fn check_ids(tenant_id: &str, module_id: &str) -> Result<(), TenantError> {
    if !id::is_valid_tenant_id(tenant_id) {
        return Err(TenantError::InvalidTenantId(tenant_id.to_string()));
    }
    if !id::is_valid_module_id(module_id) {
        return Err(TenantError::InvalidModuleId(module_id.to_string()));
    }
    Ok(())
}

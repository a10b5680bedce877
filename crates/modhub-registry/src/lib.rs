//! `modhub-registry` – Capability Registry Core
//!
//! The consistency-enforcing heart of ModHub: it records declared facts
//! about modules and guarantees they stay coherent (global capability
//! uniqueness, dependency acyclicity, all-or-nothing registration).
//!
//! # Modules
//!
//! - [`validator`] – [`validate`][validator::validate]: pure manifest
//!   validation returning the complete list of
//!   [`ValidationError`][modhub_types::ValidationError]s, never a partial
//!   one.
//! - [`capability_index`] – [`CapabilityIndex`][capability_index::CapabilityIndex]:
//!   capability id → owning module bindings with two-phase, conflict-checked
//!   registration and scan-free unbinding.
//! - [`dep_graph`] – [`check_no_cycles`][dep_graph::check_no_cycles],
//!   [`dependency_order`][dep_graph::dependency_order],
//!   [`dependents_of`][dep_graph::dependents_of]: explicit-stack walks over
//!   the non-optional dependency graph.
//! - [`store`] – [`ModuleStore`][store::ModuleStore]: the narrow persistence
//!   seam, with [`MemoryModuleStore`][store::MemoryModuleStore] as the
//!   default backend.
//! - [`registry`] – [`ModuleRegistry`][registry::ModuleRegistry]: the
//!   context object tying the above together behind a
//!   validate-all-then-apply-all registration path.

pub mod capability_index;
pub mod dep_graph;
pub mod registry;
pub mod store;
pub mod validator;

pub use capability_index::CapabilityIndex;
pub use registry::{CapabilityResolution, ModuleRegistry, RegistryConfig};
pub use store::{MemoryModuleStore, ModuleStore};
pub use validator::{ValidationReport, validate};

//! Module store – the narrow persistence seam.
//!
//! The registry never specifies how records are persisted; it talks to a
//! [`ModuleStore`] trait object. [`MemoryModuleStore`] is the default
//! backend and the one used throughout the tests; a host embedding the
//! registry can substitute its own implementation behind the same seam.

use std::collections::HashMap;

use modhub_types::ModuleRecord;

/// Storage seam for [`ModuleRecord`]s.
///
/// Implementations hold exclusive ownership of the records; callers obtain
/// references only. `list` returns records sorted by module id so that
/// catalog listings are deterministic.
pub trait ModuleStore: Send {
    /// Insert or replace the record under its module id.
    fn save(&mut self, record: ModuleRecord);

    /// Fetch the record for `module_id`, if registered.
    fn get(&self, module_id: &str) -> Option<&ModuleRecord>;

    /// All records, sorted by module id.
    fn list(&self) -> Vec<&ModuleRecord>;

    /// Remove the record for `module_id`; `true` when something was removed.
    fn delete(&mut self, module_id: &str) -> bool;

    /// Remove every record.
    fn clear(&mut self);
}

/// In-memory [`ModuleStore`] backed by a `HashMap`.
#[derive(Default)]
pub struct MemoryModuleStore {
    modules: HashMap<String, ModuleRecord>,
}

impl MemoryModuleStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ModuleStore for MemoryModuleStore {
    fn save(&mut self, record: ModuleRecord) {
        self.modules
            .insert(record.module_id().to_string(), record);
    }

    fn get(&self, module_id: &str) -> Option<&ModuleRecord> {
        self.modules.get(module_id)
    }

    fn list(&self) -> Vec<&ModuleRecord> {
        let mut records: Vec<&ModuleRecord> = self.modules.values().collect();
        records.sort_by(|a, b| a.module_id().cmp(b.module_id()));
        records
    }

    fn delete(&mut self, module_id: &str) -> bool {
        self.modules.remove(module_id).is_some()
    }

    fn clear(&mut self) {
        self.modules.clear();
    }
}

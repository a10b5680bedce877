//! Dependency graph checks – cycle rejection, topological ordering,
//! reverse lookup.
//!
//! All walks follow **non-optional** dependency edges, and only through
//! targets that are already registered: an edge to a not-yet-registered
//! module cannot participate in a cycle until that target itself registers
//! (registration does not require dependency targets to exist; existence is
//! enforced at enable time).
//!
//! Every traversal uses an explicit path stack rather than native
//! recursion, so depth is bounded by configuration instead of the call
//! stack.

use std::collections::HashSet;

use modhub_types::{ModuleManifest, RegistryError};

use crate::store::ModuleStore;

/// One level of the explicit DFS stack: the remaining targets of a node.
struct Frame {
    targets: Vec<String>,
    next: usize,
}

impl Frame {
    fn new(targets: Vec<String>) -> Self {
        Self { targets, next: 0 }
    }

    fn advance(&mut self) -> Option<String> {
        let target = self.targets.get(self.next).cloned();
        if target.is_some() {
            self.next += 1;
        }
        target
    }
}

fn required_targets(manifest: &ModuleManifest) -> Vec<String> {
    manifest.required_dependencies().map(String::from).collect()
}

/// Reject `candidate` if registering it would close a dependency cycle.
///
/// A path-tracked depth-first walk starts at the candidate and follows each
/// non-optional edge into the declared dependencies of already-registered
/// records. Revisiting an id on the current path fails with
/// [`RegistryError::CircularDependency`] carrying the path in traversal
/// order, ending back at the repeated id. A walk deeper than `max_depth`
/// modules fails with [`RegistryError::DependencyDepthExceeded`].
pub fn check_no_cycles(
    candidate: &ModuleManifest,
    store: &dyn ModuleStore,
    max_depth: usize,
) -> Result<(), RegistryError> {
    let mut path: Vec<String> = vec![candidate.module_id.clone()];
    let mut frames: Vec<Frame> = vec![Frame::new(required_targets(candidate))];
    // Nodes whose entire subtree is already known cycle-free.
    let mut done: HashSet<String> = HashSet::new();

    loop {
        let step = {
            let Some(frame) = frames.last_mut() else { break };
            frame.advance()
        };
        match step {
            Some(target) => {
                if done.contains(&target) {
                    continue;
                }
                if let Some(pos) = path.iter().position(|id| *id == target) {
                    let mut cycle = path[pos..].to_vec();
                    cycle.push(target);
                    return Err(RegistryError::CircularDependency { path: cycle });
                }
                // Edges to unregistered modules are deferred, not followed.
                if let Some(record) = store.get(&target) {
                    if path.len() >= max_depth {
                        return Err(RegistryError::DependencyDepthExceeded { limit: max_depth });
                    }
                    path.push(target);
                    frames.push(Frame::new(required_targets(&record.manifest)));
                }
            }
            None => {
                frames.pop();
                if let Some(finished) = path.pop() {
                    done.insert(finished);
                }
            }
        }
    }
    Ok(())
}

/// Topological order of the transitive non-optional dependency closure of
/// `module_id`: every required module exactly once, each dependency before
/// its dependents, the module itself last. Declared targets that are not
/// (yet) registered appear as leaves.
///
/// Fails with [`RegistryError::NotFound`] when `module_id` itself is not
/// registered.
pub fn dependency_order(
    module_id: &str,
    store: &dyn ModuleStore,
) -> Result<Vec<String>, RegistryError> {
    let root = store
        .get(module_id)
        .ok_or_else(|| RegistryError::NotFound(module_id.to_string()))?;

    let mut order: Vec<String> = Vec::new();
    let mut emitted: HashSet<String> = HashSet::new();
    let mut stack: Vec<(String, Frame)> = vec![(
        module_id.to_string(),
        Frame::new(required_targets(&root.manifest)),
    )];

    loop {
        let step = {
            let Some((_, frame)) = stack.last_mut() else { break };
            frame.advance()
        };
        match step {
            Some(target) => {
                if emitted.contains(&target) || stack.iter().any(|(id, _)| *id == target) {
                    continue;
                }
                match store.get(&target) {
                    Some(record) => {
                        stack.push((target, Frame::new(required_targets(&record.manifest))));
                    }
                    None => {
                        // Unregistered target: a leaf until it registers.
                        emitted.insert(target.clone());
                        order.push(target);
                    }
                }
            }
            None => {
                if let Some((finished, _)) = stack.pop() {
                    if emitted.insert(finished.clone()) {
                        order.push(finished);
                    }
                }
            }
        }
    }
    Ok(order)
}

/// Direct reverse-dependency lookup: every registered module that declares
/// `module_id` as a dependency (optional or not), sorted by id.
pub fn dependents_of(module_id: &str, store: &dyn ModuleStore) -> Vec<String> {
    store
        .list()
        .iter()
        .filter(|record| {
            record
                .manifest
                .dependencies
                .iter()
                .any(|dep| dep.module_id == module_id)
        })
        .map(|record| record.module_id().to_string())
        .collect()
}

// Id-keyed host map with change-aware merging.
// Unchanged hosts keep their Arc across polls; the merge also reports which ids changed.

use crate::models::CanonicalHost;
use std::collections::HashMap;
use std::sync::Arc;

/// What one merge did to the keyset and values.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MergeOutcome {
    /// Ids that are new or whose value differs from the previous poll, in published order.
    pub changed: Vec<String>,
    /// Ids from the previous poll that are missing from this one.
    pub removed: Vec<String>,
}

impl MergeOutcome {
    pub fn is_unchanged(&self) -> bool {
        self.changed.is_empty() && self.removed.is_empty()
    }
}

#[derive(Debug, Default, Clone)]
pub struct HostStore {
    order: Vec<String>,
    by_id: HashMap<String, Arc<CanonicalHost>>,
}

impl HostStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the keyset with `incoming`.
    ///
    /// A host structurally equal to the stored one keeps the stored `Arc`. Ids not in
    /// `incoming` are evicted. Surviving ids keep their position; new ids are appended
    /// in payload order. If an id repeats within `incoming`, the last value wins.
    pub fn merge(&mut self, incoming: Vec<CanonicalHost>) -> MergeOutcome {
        let mut next: HashMap<String, Arc<CanonicalHost>> = HashMap::with_capacity(incoming.len());
        let mut arrivals: Vec<String> = Vec::new();

        for host in incoming {
            let entry = match self.by_id.get(&host.id) {
                Some(existing) if **existing == host => existing.clone(),
                _ => Arc::new(host),
            };
            let id = entry.id.clone();
            let is_new = !self.by_id.contains_key(&id);
            if next.insert(id.clone(), entry).is_none() && is_new {
                arrivals.push(id);
            }
        }

        let removed: Vec<String> = self
            .order
            .iter()
            .filter(|id| !next.contains_key(*id))
            .cloned()
            .collect();
        let order: Vec<String> = self
            .order
            .iter()
            .filter(|id| next.contains_key(*id))
            .cloned()
            .chain(arrivals)
            .collect();
        let changed: Vec<String> = order
            .iter()
            .filter(|id| match (self.by_id.get(*id), next.get(*id)) {
                (Some(prev), Some(cur)) => !Arc::ptr_eq(prev, cur),
                _ => true,
            })
            .cloned()
            .collect();

        self.order = order;
        self.by_id = next;
        MergeOutcome { changed, removed }
    }

    /// Hosts in published order.
    pub fn hosts(&self) -> Vec<Arc<CanonicalHost>> {
        self.order
            .iter()
            .filter_map(|id| self.by_id.get(id).cloned())
            .collect()
    }

    pub fn get(&self, id: &str) -> Option<&Arc<CanonicalHost>> {
        self.by_id.get(id)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

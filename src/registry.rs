use eframe::egui::Vec2;

pub type NodeId = u64;

/// Live state for one mounted node: its planar position and the ids of the
/// nodes it points at. Connections are ids, never owning references; an id
/// whose node is not currently registered is simply skipped at resolve time.
#[derive(Clone, Debug)]
pub struct NodeRecord {
    pub id: NodeId,
    pub position: Vec2,
    pub connected_to: Vec<NodeId>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct NodeHandle {
    id: NodeId,
}

/// Explicitly passed set of mounted node records. Insertion appends;
/// removal keeps the relative order of the remaining records. All access is
/// single-threaded per-frame, so there is no locking.
#[derive(Default)]
pub struct NodeRegistry {
    records: Vec<NodeRecord>,
}

impl NodeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, record: NodeRecord) -> NodeHandle {
        let handle = NodeHandle { id: record.id };
        self.records.push(record);
        handle
    }

    pub fn unregister(&mut self, handle: NodeHandle) -> Option<NodeRecord> {
        let index = self
            .records
            .iter()
            .position(|record| record.id == handle.id)?;
        Some(self.records.remove(index))
    }

    pub fn snapshot(&self) -> &[NodeRecord] {
        &self.records
    }

    pub fn records_mut(&mut self) -> &mut [NodeRecord] {
        &mut self.records
    }

    pub fn resolve(&self, id: NodeId) -> Option<&NodeRecord> {
        self.records.iter().find(|record| record.id == id)
    }

    pub fn position_mut(&mut self, id: NodeId) -> Option<&mut Vec2> {
        self.records
            .iter_mut()
            .find(|record| record.id == id)
            .map(|record| &mut record.position)
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.records.iter().any(|record| record.id == id)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn clear(&mut self) {
        self.records.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use eframe::egui::vec2;

    fn record(id: NodeId, connected_to: Vec<NodeId>) -> NodeRecord {
        NodeRecord {
            id,
            position: vec2(id as f32, 0.0),
            connected_to,
        }
    }

    fn ids(registry: &NodeRegistry) -> Vec<NodeId> {
        registry.snapshot().iter().map(|r| r.id).collect()
    }

    #[test]
    fn starts_empty() {
        let registry = NodeRegistry::new();
        assert!(registry.is_empty());
        assert!(registry.snapshot().is_empty());
    }

    #[test]
    fn register_then_unregister_restores_prior_snapshot() {
        let mut registry = NodeRegistry::new();
        registry.register(record(1, vec![2]));
        registry.register(record(2, vec![]));
        let before = ids(&registry);

        let handle = registry.register(record(3, vec![1]));
        assert_eq!(registry.len(), 3);

        let removed = registry.unregister(handle).expect("record was registered");
        assert_eq!(removed.id, 3);
        assert_eq!(ids(&registry), before);
    }

    #[test]
    fn removal_preserves_order_of_remaining_records() {
        let mut registry = NodeRegistry::new();
        registry.register(record(1, vec![]));
        let middle = registry.register(record(2, vec![]));
        registry.register(record(3, vec![]));
        registry.register(record(4, vec![]));

        registry.unregister(middle);
        assert_eq!(ids(&registry), vec![1, 3, 4]);
    }

    #[test]
    fn unregistering_twice_is_a_no_op() {
        let mut registry = NodeRegistry::new();
        let handle = registry.register(record(1, vec![]));
        assert!(registry.unregister(handle).is_some());
        assert!(registry.unregister(handle).is_none());
        assert!(registry.is_empty());
    }

    #[test]
    fn resolving_an_absent_id_yields_none() {
        let mut registry = NodeRegistry::new();
        registry.register(record(1, vec![7]));
        assert!(registry.resolve(7).is_none());
        assert!(registry.resolve(1).is_some());
    }

    #[test]
    fn position_mut_writes_through() {
        let mut registry = NodeRegistry::new();
        registry.register(record(1, vec![]));
        *registry.position_mut(1).expect("registered") = vec2(-4.5, 2.0);
        assert_eq!(registry.resolve(1).expect("registered").position, vec2(-4.5, 2.0));
    }
}

use eframe::egui::{Vec2, vec2};

use crate::registry::NodeRegistry;

use super::ENDPOINT_INSET;
use super::super::{ConnectionLine, ViewModel};

/// Derive the connection-line set from the registry: one line per resolvable
/// `connected_to` entry, in registry order. Entries whose target is not
/// registered produce nothing. Dash offsets carry over for (source, target)
/// pairs that survive the rebuild.
fn derive_lines(registry: &NodeRegistry, previous: &[ConnectionLine]) -> Vec<ConnectionLine> {
    let mut lines = Vec::new();

    for record in registry.snapshot() {
        for &target in &record.connected_to {
            if !registry.contains(target) {
                continue;
            }

            let dash_offset = previous
                .iter()
                .find(|line| line.source == record.id && line.target == target)
                .map(|line| line.dash_offset)
                .unwrap_or(0.0);

            lines.push(ConnectionLine {
                source: record.id,
                target,
                dash_offset,
            });
        }
    }

    lines
}

fn advance_dash_offsets(lines: &mut [ConnectionLine], elapsed_seconds: f32, dash_speed: f32) {
    for line in lines {
        line.dash_offset -= elapsed_seconds * dash_speed;
    }
}

/// Live endpoints in world space, inset along +x on the source side and -x on
/// the target side. `None` when either node has unmounted since the last
/// rebuild; the line is skipped for that frame.
fn line_endpoints(registry: &NodeRegistry, line: &ConnectionLine) -> Option<(Vec2, Vec2)> {
    let source = registry.resolve(line.source)?;
    let target = registry.resolve(line.target)?;
    Some((
        source.position + vec2(ENDPOINT_INSET, 0.0),
        target.position - vec2(ENDPOINT_INSET, 0.0),
    ))
}

impl ViewModel {
    // Lines are rebuilt only when the mounted node count changes; in between,
    // endpoint values track the live registry positions on their own.
    pub(in crate::app) fn sync_lines(&mut self) {
        if self.lines_built_for == self.registry.len() && !self.lines_dirty {
            return;
        }

        self.lines = derive_lines(&self.registry, &self.lines);
        self.lines_built_for = self.registry.len();
        self.lines_dirty = false;
    }

    pub(in crate::app) fn advance_dashes(&mut self, elapsed_seconds: f32) {
        advance_dash_offsets(&mut self.lines, elapsed_seconds, self.dash_speed);
    }

    pub(in crate::app) fn line_endpoints(&self, line: &ConnectionLine) -> Option<(Vec2, Vec2)> {
        line_endpoints(&self.registry, line)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;
    use crate::registry::{NodeHandle, NodeId, NodeRecord};

    fn registry_from(
        entries: &[(NodeId, &[NodeId])],
    ) -> (NodeRegistry, HashMap<NodeId, NodeHandle>) {
        let mut registry = NodeRegistry::new();
        let mut handles = HashMap::new();
        for (index, (id, connections)) in entries.iter().enumerate() {
            let handle = registry.register(NodeRecord {
                id: *id,
                position: vec2(index as f32, 0.0),
                connected_to: connections.to_vec(),
            });
            handles.insert(*id, handle);
        }
        (registry, handles)
    }

    fn sample_registry() -> (NodeRegistry, HashMap<NodeId, NodeHandle>) {
        registry_from(&[
            (1, &[2, 3, 5]),
            (2, &[1, 4]),
            (3, &[]),
            (4, &[2]),
            (5, &[1]),
        ])
    }

    #[test]
    fn sample_dataset_derives_seven_lines() {
        let (registry, _handles) = sample_registry();
        let lines = derive_lines(&registry, &[]);
        assert_eq!(lines.len(), 7);

        let pairs = lines
            .iter()
            .map(|line| (line.source, line.target))
            .collect::<Vec<_>>();
        assert_eq!(
            pairs,
            vec![(1, 2), (1, 3), (1, 5), (2, 1), (2, 4), (4, 2), (5, 1)]
        );
    }

    #[test]
    fn lines_to_an_unmounted_node_are_silently_dropped() {
        let (mut registry, handles) = sample_registry();
        let lines_before = derive_lines(&registry, &[]);
        assert_eq!(lines_before.len(), 7);

        // node 4 unmounts: 2->4 and 4->2 disappear, nothing errors
        registry.unregister(handles[&4]);

        let lines = derive_lines(&registry, &lines_before);
        assert_eq!(lines.len(), 5);
        assert!(
            lines
                .iter()
                .all(|line| line.source != 4 && line.target != 4)
        );
    }

    #[test]
    fn dash_offsets_strictly_decrease_over_time() {
        let (registry, _handles) = sample_registry();
        let mut lines = derive_lines(&registry, &[]);

        advance_dash_offsets(&mut lines, 1.0 / 60.0, 10.0);
        let first = lines.iter().map(|line| line.dash_offset).collect::<Vec<_>>();
        assert!(first.iter().all(|offset| *offset < 0.0));

        advance_dash_offsets(&mut lines, 1.0 / 60.0, 10.0);
        for (before, line) in first.iter().zip(&lines) {
            assert!(line.dash_offset < *before);
        }
    }

    #[test]
    fn dash_offsets_carry_over_for_surviving_pairs() {
        let (mut registry, handles) = sample_registry();
        let mut lines = derive_lines(&registry, &[]);
        advance_dash_offsets(&mut lines, 2.0, 10.0);

        // unmount node 3: only 1->3 disappears
        registry.unregister(handles[&3]);

        let rebuilt = derive_lines(&registry, &lines);
        assert_eq!(rebuilt.len(), 6);
        for line in &rebuilt {
            assert!((line.dash_offset - (-20.0)).abs() < 1e-5);
        }
    }

    #[test]
    fn endpoints_are_inset_along_x() {
        let (registry, _handles) = registry_from(&[(1, &[2]), (2, &[])]);
        let lines = derive_lines(&registry, &[]);
        assert_eq!(lines.len(), 1);

        let (start, end) = line_endpoints(&registry, &lines[0]).expect("both mounted");
        assert_eq!(start, vec2(0.0 + ENDPOINT_INSET, 0.0));
        assert_eq!(end, vec2(1.0 - ENDPOINT_INSET, 0.0));
    }
}

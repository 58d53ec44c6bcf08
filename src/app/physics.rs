use eframe::egui::vec2;

use crate::registry::{NodeId, NodeRecord, NodeRegistry};

use super::RepulsionParams;

const MIN_SEPARATION: f32 = 0.0001;
const MAX_COORDINATE: f32 = 10_000.0;

/// Push one node away from every other node closer than the threshold.
/// The position is updated inside the inner loop, so later neighbors see the
/// partially nudged position. Coincident nodes push along +x instead of
/// normalizing a zero vector, and a non-finite result restores the position
/// the pass started from.
pub(super) fn repel_node(records: &mut [NodeRecord], current: usize, params: RepulsionParams) {
    let before = records[current].position;

    for other in 0..records.len() {
        if other == current {
            continue;
        }

        let delta = records[current].position - records[other].position;
        let distance = delta.length();
        if distance >= params.threshold {
            continue;
        }

        let direction = if distance > MIN_SEPARATION {
            delta / distance
        } else {
            vec2(1.0, 0.0)
        };
        records[current].position += direction * params.strength;
    }

    let position = &mut records[current].position;
    if position.x.is_finite() && position.y.is_finite() {
        position.x = position.x.clamp(-MAX_COORDINATE, MAX_COORDINATE);
        position.y = position.y.clamp(-MAX_COORDINATE, MAX_COORDINATE);
    } else {
        *position = before;
    }
}

/// One frame of repulsion: a full pairwise scan per node, in registry order.
/// Each node nudges only itself, so the result depends on evaluation order
/// within the frame; that asymmetry is intended. A node being dragged skips
/// its own update but still repels the others.
pub(super) fn repulsion_pass(
    registry: &mut NodeRegistry,
    dragged: Option<NodeId>,
    params: RepulsionParams,
) {
    let records = registry.records_mut();
    for current in 0..records.len() {
        if dragged == Some(records[current].id) {
            continue;
        }
        repel_node(records, current, params);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use eframe::egui::{Vec2, vec2};

    fn record(id: NodeId, position: Vec2) -> NodeRecord {
        NodeRecord {
            id,
            position,
            connected_to: Vec::new(),
        }
    }

    fn registry_with(positions: &[Vec2]) -> NodeRegistry {
        let mut registry = NodeRegistry::new();
        for (index, position) in positions.iter().enumerate() {
            registry.register(record(index as NodeId + 1, *position));
        }
        registry
    }

    #[test]
    fn single_pass_on_node_matches_the_reference_scenario() {
        // A@(0,0,0), B@(0.5,0,0), threshold 0.9, strength 0.05
        // => A moves to (-0.05, 0, 0)
        let mut registry = registry_with(&[vec2(0.0, 0.0), vec2(0.5, 0.0)]);
        repel_node(registry.records_mut(), 0, RepulsionParams::default());

        let a = registry.snapshot()[0].position;
        assert!((a - vec2(-0.05, 0.0)).length() < 1e-6);
        // only the current node moved
        assert_eq!(registry.snapshot()[1].position, vec2(0.5, 0.0));
    }

    #[test]
    fn nodes_at_or_beyond_threshold_are_left_alone() {
        let mut registry = registry_with(&[vec2(0.0, 0.0), vec2(0.9, 0.0), vec2(0.0, 2.0)]);
        repulsion_pass(&mut registry, None, RepulsionParams::default());

        assert_eq!(registry.snapshot()[0].position, vec2(0.0, 0.0));
        assert_eq!(registry.snapshot()[1].position, vec2(0.9, 0.0));
        assert_eq!(registry.snapshot()[2].position, vec2(0.0, 2.0));
    }

    #[test]
    fn overlapping_nodes_strictly_separate() {
        let mut registry = registry_with(&[vec2(0.0, 0.0), vec2(0.3, 0.2)]);
        let before = (registry.snapshot()[0].position - registry.snapshot()[1].position).length();

        repulsion_pass(&mut registry, None, RepulsionParams::default());

        let after = (registry.snapshot()[0].position - registry.snapshot()[1].position).length();
        assert!(after > before);
    }

    #[test]
    fn coincident_nodes_stay_finite_and_separate() {
        let mut registry = registry_with(&[vec2(1.0, 1.0), vec2(1.0, 1.0)]);
        repulsion_pass(&mut registry, None, RepulsionParams::default());

        let a = registry.snapshot()[0].position;
        let b = registry.snapshot()[1].position;
        assert!(a.x.is_finite() && a.y.is_finite());
        assert!(b.x.is_finite() && b.y.is_finite());
        assert!((a - b).length() > 0.0);
    }

    #[test]
    fn dragged_node_is_skipped_but_still_repels_others() {
        let mut registry = registry_with(&[vec2(0.0, 0.0), vec2(0.5, 0.0)]);
        repulsion_pass(&mut registry, Some(1), RepulsionParams::default());

        // node 1 held in place by the drag, node 2 pushed away from it
        assert_eq!(registry.snapshot()[0].position, vec2(0.0, 0.0));
        assert!((registry.snapshot()[1].position - vec2(0.55, 0.0)).length() < 1e-6);
    }

    #[test]
    fn pass_order_is_registry_order() {
        // after node 1 moves away, node 2 reads the updated position
        let mut registry = registry_with(&[vec2(0.0, 0.0), vec2(0.5, 0.0)]);
        repulsion_pass(&mut registry, None, RepulsionParams::default());

        assert!((registry.snapshot()[0].position - vec2(-0.05, 0.0)).length() < 1e-6);
        assert!((registry.snapshot()[1].position - vec2(0.55, 0.0)).length() < 1e-6);
    }
}

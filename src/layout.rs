use std::f32::consts::TAU;

use eframe::egui::{Vec2, vec2};
use rand::Rng;

/// Even circular placement with a bounded random angular jitter so the ring
/// never looks machine-perfect. The jitter is re-rolled on every call: the
/// same `count` and `radius` give the same pattern, not the same output.
/// Jitter is angular only, so every position lies exactly on the circle.
pub fn circular_layout(count: usize, radius: f32) -> Vec<Vec2> {
    if count == 0 {
        return Vec::new();
    }

    let angle_step = TAU / count as f32;
    let mut rng = rand::thread_rng();

    (0..count)
        .map(|index| {
            let jitter = rng.gen_range(0.0..angle_step * 0.5);
            let angle = angle_step * index as f32 + jitter;
            vec2(angle.cos(), angle.sin()) * radius
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_nodes_yield_empty_layout() {
        assert!(circular_layout(0, 3.0).is_empty());
    }

    #[test]
    fn single_node_sits_on_the_circle_near_angle_zero() {
        let positions = circular_layout(1, 2.0);
        assert_eq!(positions.len(), 1);

        let position = positions[0];
        assert!((position.length() - 2.0).abs() < 1e-4);

        // jitter is bounded to [0, 0.5 * angle_step) = [0, pi)
        let angle = position.y.atan2(position.x);
        assert!((0.0..TAU * 0.5).contains(&angle));
    }

    #[test]
    fn every_position_lies_at_the_requested_radius() {
        for count in [1usize, 2, 5, 12, 40] {
            let positions = circular_layout(count, 3.0);
            assert_eq!(positions.len(), count);
            for position in positions {
                assert!((position.length() - 3.0).abs() < 1e-3);
            }
        }
    }

    #[test]
    fn jitter_stays_within_its_angular_slot() {
        let count = 8usize;
        let angle_step = TAU / count as f32;
        let positions = circular_layout(count, 1.0);

        for (index, position) in positions.iter().enumerate() {
            let angle = position.y.atan2(position.x).rem_euclid(TAU);
            let base = angle_step * index as f32;
            let offset = (angle - base).rem_euclid(TAU);
            assert!(offset < angle_step * 0.5 + 1e-4);
        }
    }
}

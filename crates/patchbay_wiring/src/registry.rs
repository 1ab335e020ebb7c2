// SPDX-License-Identifier: MIT OR Apache-2.0
//! Port hit-testing against published geometry.

use crate::geometry::GeometryProvider;
use crate::port::PortAnchor;
use egui::Pos2;
use serde::{Deserialize, Serialize};

/// How to choose between several ports inside the hit radius
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum HitPolicy {
    /// Closest port wins; ties keep publication order
    #[default]
    Nearest,
    /// First port in publication order wins
    FirstInRange,
}

/// Resolves screen points to ports.
pub struct PortRegistry<'a, G: ?Sized> {
    geometry: &'a G,
    policy: HitPolicy,
}

impl<'a, G: GeometryProvider + ?Sized> PortRegistry<'a, G> {
    /// Create a registry over one frame of geometry
    pub fn new(geometry: &'a G) -> Self {
        Self {
            geometry,
            policy: HitPolicy::default(),
        }
    }

    /// Set the tie-break policy
    pub fn with_policy(mut self, policy: HitPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Find the port strictly within `radius` of `point`.
    ///
    /// Returns `None` when no published port qualifies.
    pub fn find_nearest_port(&self, point: Pos2, radius: f32) -> Option<PortAnchor> {
        let mut best: Option<(f32, PortAnchor)> = None;
        let policy = self.policy;

        self.geometry.visit_ports(&mut |anchor| {
            let distance = anchor.position.distance(point);
            if distance >= radius {
                return;
            }
            let better = match (&best, policy) {
                (None, _) => true,
                (Some(_), HitPolicy::FirstInRange) => false,
                (Some((best_distance, _)), HitPolicy::Nearest) => distance < *best_distance,
            };
            if better {
                best = Some((distance, *anchor));
            }
        });

        best.map(|(_, anchor)| anchor)
    }

    /// Find the nearest port within `radius` that also satisfies `filter`
    pub fn find_port_where(
        &self,
        point: Pos2,
        radius: f32,
        filter: impl Fn(&PortAnchor) -> bool,
    ) -> Option<PortAnchor> {
        let mut best: Option<(f32, PortAnchor)> = None;

        self.geometry.visit_ports(&mut |anchor| {
            let distance = anchor.position.distance(point);
            if distance >= radius || !filter(anchor) {
                return;
            }
            if best.as_ref().map_or(true, |(d, _)| distance < *d) {
                best = Some((distance, *anchor));
            }
        });

        best.map(|(_, anchor)| anchor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::GeometrySnapshot;
    use crate::node::NodeId;
    use crate::port::{PortDirection, PortId, PortRef};

    fn port() -> PortRef {
        PortRef::new(NodeId::new(), PortId::new())
    }

    #[test]
    fn test_returns_none_outside_radius() {
        let geometry = GeometrySnapshot::new().with_port(port(), PortDirection::Input, Pos2::new(500.0, 100.0));
        let registry = PortRegistry::new(&geometry);

        assert!(registry.find_nearest_port(Pos2::new(560.0, 105.0), 25.0).is_none());
        // Exactly on the radius does not count
        assert!(registry.find_nearest_port(Pos2::new(525.0, 100.0), 25.0).is_none());
        assert!(registry.find_nearest_port(Pos2::new(510.0, 105.0), 25.0).is_some());
    }

    #[test]
    fn test_nearest_beats_first_in_range() {
        let far = port();
        let near = port();
        let geometry = GeometrySnapshot::new()
            .with_port(far, PortDirection::Input, Pos2::new(0.0, 0.0))
            .with_port(near, PortDirection::Input, Pos2::new(20.0, 0.0));
        let point = Pos2::new(15.0, 0.0);

        let nearest = PortRegistry::new(&geometry).find_nearest_port(point, 25.0);
        let first = PortRegistry::new(&geometry)
            .with_policy(HitPolicy::FirstInRange)
            .find_nearest_port(point, 25.0);

        assert_eq!(nearest.map(|a| a.port), Some(near));
        assert_eq!(first.map(|a| a.port), Some(far));
    }

    #[test]
    fn test_filtered_lookup_skips_rejected_ports() {
        let output = port();
        let input = port();
        let geometry = GeometrySnapshot::new()
            .with_port(output, PortDirection::Output, Pos2::new(10.0, 0.0))
            .with_port(input, PortDirection::Input, Pos2::new(18.0, 0.0));

        let hit = PortRegistry::new(&geometry).find_port_where(Pos2::new(10.0, 0.0), 25.0, PortAnchor::is_input);

        assert_eq!(hit.map(|a| a.port), Some(input));
    }
}

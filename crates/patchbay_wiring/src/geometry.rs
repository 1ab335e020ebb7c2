// SPDX-License-Identifier: MIT OR Apache-2.0
//! Port geometry published by the host once per frame.

use crate::node::NodeId;
use crate::port::{PortAnchor, PortDirection, PortRef};
use egui::Pos2;
use indexmap::IndexMap;

/// Source of screen-space port positions.
///
/// The engine has no idea how the host lays out nodes. It only asks where a
/// port is this frame, and `None` means "not laid out yet" (or unknown id).
pub trait GeometryProvider {
    /// Current position of `port`, if published
    fn port_position(&self, port: PortRef) -> Option<Pos2>;

    /// Visit every published port in publication order
    fn visit_ports(&self, visitor: &mut dyn FnMut(&PortAnchor));
}

/// One frame of published port positions.
#[derive(Debug, Clone, Default)]
pub struct GeometrySnapshot {
    anchors: IndexMap<PortRef, PortAnchor>,
}

impl GeometrySnapshot {
    /// Create an empty snapshot
    pub fn new() -> Self {
        Self::default()
    }

    /// Publish (or move) a port
    pub fn publish(&mut self, port: PortRef, direction: PortDirection, position: Pos2) {
        self.anchors.insert(port, PortAnchor::new(port, direction, position));
    }

    /// Builder form of [`Self::publish`]
    pub fn with_port(mut self, port: PortRef, direction: PortDirection, position: Pos2) -> Self {
        self.publish(port, direction, position);
        self
    }

    /// Withdraw a port
    pub fn unpublish(&mut self, port: PortRef) -> Option<PortAnchor> {
        self.anchors.shift_remove(&port)
    }

    /// Withdraw every port of a node
    pub fn unpublish_node(&mut self, node_id: NodeId) {
        self.anchors.retain(|port, _| port.node != node_id);
    }

    /// Look up a published anchor
    pub fn anchor(&self, port: PortRef) -> Option<&PortAnchor> {
        self.anchors.get(&port)
    }

    /// All anchors in publication order
    pub fn anchors(&self) -> impl Iterator<Item = &PortAnchor> {
        self.anchors.values()
    }

    /// Number of published ports
    pub fn len(&self) -> usize {
        self.anchors.len()
    }

    /// Whether nothing is published
    pub fn is_empty(&self) -> bool {
        self.anchors.is_empty()
    }

    /// Drop everything
    pub fn clear(&mut self) {
        self.anchors.clear();
    }
}

impl GeometryProvider for GeometrySnapshot {
    fn port_position(&self, port: PortRef) -> Option<Pos2> {
        self.anchors.get(&port).map(|a| a.position)
    }

    fn visit_ports(&self, visitor: &mut dyn FnMut(&PortAnchor)) {
        for anchor in self.anchors.values() {
            visitor(anchor);
        }
    }
}

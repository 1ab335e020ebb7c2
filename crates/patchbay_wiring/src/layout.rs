// SPDX-License-Identifier: MIT OR Apache-2.0
//! Board layout: node boxes, port fan-out and the board-to-screen transform.

use crate::geometry::GeometrySnapshot;
use crate::node::{Node, NodeId};
use crate::port::{PortDirection, PortRef};
use egui::{Pos2, Rect, Vec2};

/// Node visual dimensions (board space)
const NODE_WIDTH: f32 = 160.0;
const NODE_HEADER_HEIGHT: f32 = 24.0;
const PORT_SPACING: f32 = 26.0;
const MIN_BODY_HEIGHT: f32 = 36.0;

/// Converts node records into port geometry.
///
/// Inputs sit on the left edge and outputs on the right edge; ports of one
/// side fan out vertically, centered on the node body.
#[derive(Debug, Clone)]
pub struct NodeLayout {
    /// Node box width
    pub node_width: f32,
    /// Header strip height
    pub header_height: f32,
    /// Vertical distance between neighbouring ports
    pub port_spacing: f32,
    /// Minimum body height below the header
    pub min_body_height: f32,
    /// Pan offset (board space)
    pub pan: Vec2,
    /// Zoom factor
    pub zoom: f32,
    /// Screen position of the board origin
    pub origin: Pos2,
}

impl Default for NodeLayout {
    fn default() -> Self {
        Self {
            node_width: NODE_WIDTH,
            header_height: NODE_HEADER_HEIGHT,
            port_spacing: PORT_SPACING,
            min_body_height: MIN_BODY_HEIGHT,
            pan: Vec2::ZERO,
            zoom: 1.0,
            origin: Pos2::ZERO,
        }
    }
}

impl NodeLayout {
    /// Create a layout with default dimensions
    pub fn new() -> Self {
        Self::default()
    }

    /// Convert board position to screen position
    pub fn board_to_screen(&self, board_pos: Pos2) -> Pos2 {
        Pos2::new(
            (board_pos.x + self.pan.x) * self.zoom + self.origin.x,
            (board_pos.y + self.pan.y) * self.zoom + self.origin.y,
        )
    }

    /// Convert screen position to board position
    pub fn screen_to_board(&self, screen_pos: Pos2) -> Pos2 {
        Pos2::new(
            (screen_pos.x - self.origin.x) / self.zoom - self.pan.x,
            (screen_pos.y - self.origin.y) / self.zoom - self.pan.y,
        )
    }

    fn body_height(&self, node: &Node) -> f32 {
        let port_count = node.inputs.len().max(node.outputs.len());
        (port_count as f32 * self.port_spacing).max(self.min_body_height)
    }

    /// Node box in board space
    pub fn node_rect(&self, node: &Node) -> Rect {
        Rect::from_min_size(
            Pos2::new(node.position[0], node.position[1]),
            Vec2::new(self.node_width, self.header_height + self.body_height(node)),
        )
    }

    /// Node box in screen space
    pub fn node_screen_rect(&self, node: &Node) -> Rect {
        let rect = self.node_rect(node);
        Rect::from_min_size(self.board_to_screen(rect.min), rect.size() * self.zoom)
    }

    /// Header strip in screen space
    pub fn header_screen_rect(&self, node: &Node) -> Rect {
        let rect = self.node_screen_rect(node);
        Rect::from_min_size(rect.min, Vec2::new(rect.width(), self.header_height * self.zoom))
    }

    /// Board-space position of the `index`-th port on one side of `node`
    pub fn port_board_position(&self, node: &Node, direction: PortDirection, index: usize) -> Pos2 {
        let count = match direction {
            PortDirection::Input => node.inputs.len(),
            PortDirection::Output => node.outputs.len(),
        };
        let body_top = node.position[1] + self.header_height;
        let center_y = body_top + self.body_height(node) / 2.0;
        let fan = index as f32 - count.saturating_sub(1) as f32 / 2.0;
        let x = match direction {
            PortDirection::Input => node.position[0],
            PortDirection::Output => node.position[0] + self.node_width,
        };
        Pos2::new(x, center_y + fan * self.port_spacing)
    }

    /// Topmost node whose box contains the screen point
    pub fn node_at(&self, nodes: &[Node], screen_pos: Pos2) -> Option<NodeId> {
        let board_pos = self.screen_to_board(screen_pos);
        nodes
            .iter()
            .rev()
            .find(|n| self.node_rect(n).contains(board_pos))
            .map(|n| n.id)
    }

    /// Publish every port of every node into `snapshot`, replacing its contents
    pub fn publish(&self, nodes: &[Node], snapshot: &mut GeometrySnapshot) {
        snapshot.clear();
        for node in nodes {
            for port in node.ports() {
                let board = self.port_board_position(node, port.direction, port.index);
                snapshot.publish(
                    PortRef::new(node.id, port.id),
                    port.direction,
                    self.board_to_screen(board),
                );
            }
        }
    }

    /// Build a fresh snapshot for `nodes`
    pub fn snapshot(&self, nodes: &[Node]) -> GeometrySnapshot {
        let mut snapshot = GeometrySnapshot::new();
        self.publish(nodes, &mut snapshot);
        snapshot
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::GeometryProvider;
    use crate::node::NodeColor;

    #[test]
    fn test_ports_fan_out_centered() {
        let layout = NodeLayout::new();
        let node = Node::new("Splitter", NodeColor::Lime)
            .with_position(0.0, 0.0)
            .with_input("in")
            .with_output("a")
            .with_output("b")
            .with_output("c");

        let single = layout.port_board_position(&node, PortDirection::Input, 0);
        let top = layout.port_board_position(&node, PortDirection::Output, 0);
        let middle = layout.port_board_position(&node, PortDirection::Output, 1);
        let bottom = layout.port_board_position(&node, PortDirection::Output, 2);

        assert_eq!(single.x, 0.0);
        assert_eq!(top.x, NODE_WIDTH);
        assert_eq!(middle.y, single.y);
        assert!((middle.y - top.y - PORT_SPACING).abs() < 1e-4);
        assert!((bottom.y - middle.y - PORT_SPACING).abs() < 1e-4);
    }

    #[test]
    fn test_screen_transform_round_trip() {
        let layout = NodeLayout {
            pan: Vec2::new(30.0, -12.0),
            zoom: 1.5,
            origin: Pos2::new(200.0, 100.0),
            ..NodeLayout::default()
        };
        let p = Pos2::new(42.0, 17.0);
        let back = layout.screen_to_board(layout.board_to_screen(p));

        assert!((back - p).length() < 1e-4);
    }

    #[test]
    fn test_snapshot_tracks_node_movement() {
        let layout = NodeLayout::new();
        let mut node = Node::new("Battery", NodeColor::Cyan).with_output("+");
        let port = node.output_ref(0).unwrap();

        let before = layout.snapshot(std::slice::from_ref(&node)).port_position(port).unwrap();
        node.position = [50.0, 20.0];
        let after = layout.snapshot(std::slice::from_ref(&node)).port_position(port).unwrap();

        assert_eq!(after - before, Vec2::new(50.0, 20.0));
    }
}

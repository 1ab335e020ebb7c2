// SPDX-License-Identifier: MIT OR Apache-2.0
//! egui front end for the wiring engine.
//!
//! Features:
//! - Node panels with input and output jacks
//! - Cable drag-to-connect with the primary button
//! - Disconnect with a secondary click on a jack
//! - Node dragging by the header strip
//! - Escape or focus loss cancels a cable drag

use crate::connection::{ConnectionSet, WiringEvent};
use crate::engine::WiringEngine;
use crate::geometry::GeometrySnapshot;
use crate::layout::NodeLayout;
use crate::node::{Node, NodeId};
use crate::port::{Port, PortDirection};
use crate::render::Surface;
use egui::{Color32, Pos2, Rect, Stroke, Vec2};

/// Panel visual parameters
const NODE_ROUNDING: f32 = 6.0;
const NODE_SHADOW_OFFSET: f32 = 3.0;
const JACK_RADIUS: f32 = 6.0;
const LABEL_PADDING: f32 = 12.0;

/// Discs used to approximate a radial gradient
const RADIAL_RINGS: usize = 6;

const BOARD_COLOR: Color32 = Color32::from_rgb(14, 14, 22);
const PANEL_COLOR: Color32 = Color32::from_rgb(32, 32, 40);

impl Surface for egui::Painter {
    fn stroke_polyline(&mut self, points: &[Pos2], stroke: Stroke) {
        self.add(egui::Shape::line(points.to_vec(), stroke));
    }

    fn fill_radial(&mut self, center: Pos2, radius: f32, inner: Color32, outer: Color32) {
        for ring in 0..RADIAL_RINGS {
            let t = ring as f32 / RADIAL_RINGS as f32;
            self.circle_filled(center, radius * (1.0 - t), lerp_color(outer, inner, t));
        }
    }

    fn stroke_circle(&mut self, center: Pos2, radius: f32, stroke: Stroke) {
        self.circle_stroke(center, radius, stroke);
    }
}

/// Linear blend of premultiplied colors
fn lerp_color(from: Color32, to: Color32, t: f32) -> Color32 {
    let mix = |a: u8, b: u8| (a as f32 + (b as f32 - a as f32) * t).round() as u8;
    Color32::from_rgba_premultiplied(
        mix(from.r(), to.r()),
        mix(from.g(), to.g()),
        mix(from.b(), to.b()),
        mix(from.a(), to.a()),
    )
}

/// What the host should apply after a frame
#[derive(Debug, Clone, Default)]
pub struct ViewResponse {
    /// Connection changes, in order
    pub events: Vec<WiringEvent>,
    /// Node moves in board units
    pub moved_nodes: Vec<(NodeId, Vec2)>,
}

/// Interactive wiring board drawn into an egui `Ui`
pub struct WiringView {
    /// Cable engine
    pub engine: WiringEngine,
    /// Node placement and board transform
    pub layout: NodeLayout,
    geometry: GeometrySnapshot,
    dragging_node: Option<NodeId>,
}

impl WiringView {
    /// Create a view around an engine
    pub fn new(engine: WiringEngine) -> Self {
        Self {
            engine,
            layout: NodeLayout::new(),
            geometry: GeometrySnapshot::new(),
            dragging_node: None,
        }
    }

    /// Port geometry published last frame
    pub fn geometry(&self) -> &GeometrySnapshot {
        &self.geometry
    }

    /// Draw the board and handle pointer input
    pub fn show(&mut self, ui: &mut egui::Ui, nodes: &[Node], connections: &ConnectionSet) -> ViewResponse {
        let rect = ui.available_rect_before_wrap();
        let response = ui.allocate_rect(rect, egui::Sense::click_and_drag());
        let mut painter = ui.painter_at(rect);

        self.layout.origin = rect.min;
        self.layout.publish(nodes, &mut self.geometry);

        let mut moved_nodes = Vec::new();
        self.handle_input(ui, &response, nodes, connections, &mut moved_nodes);

        let dt = ui.input(|i| i.stable_dt);
        self.engine.update(dt, nodes, connections, &self.geometry);

        painter.rect_filled(rect, 0.0, BOARD_COLOR);
        for node in nodes {
            self.draw_node(&painter, rect, node);
        }
        self.engine.render(&mut painter);

        // Cables keep swinging after input stops
        ui.ctx().request_repaint();

        ViewResponse {
            events: self.engine.drain_events(),
            moved_nodes,
        }
    }

    fn handle_input(
        &mut self,
        ui: &egui::Ui,
        response: &egui::Response,
        nodes: &[Node],
        connections: &ConnectionSet,
        moved_nodes: &mut Vec<(NodeId, Vec2)>,
    ) {
        let pointer = response.interact_pointer_pos().or_else(|| ui.input(|i| i.pointer.hover_pos()));

        if response.drag_started_by(egui::PointerButton::Primary) {
            let origin = ui.input(|i| i.pointer.press_origin()).or(pointer);
            if let Some(origin) = origin {
                if !self.engine.pointer_down(origin, &self.geometry) {
                    self.dragging_node = self.header_at(nodes, origin);
                }
            }
        }

        if let Some(pos) = pointer {
            if self.engine.is_dragging() {
                self.engine.pointer_move(pos);
            }
        }

        if response.dragged_by(egui::PointerButton::Primary) {
            if let Some(node_id) = self.dragging_node {
                moved_nodes.push((node_id, response.drag_delta() / self.layout.zoom));
            }
        }

        if response.drag_stopped() {
            match pointer {
                Some(pos) if self.engine.is_dragging() => {
                    self.engine.pointer_up(pos, connections, &self.geometry);
                }
                _ => {
                    self.engine.cancel_drag();
                }
            }
            self.dragging_node = None;
        }

        if response.secondary_clicked() {
            if let Some(pos) = pointer {
                self.engine.disconnect_at(pos, connections, &self.geometry);
            }
        }

        if ui.input(|i| i.key_pressed(egui::Key::Escape) || !i.focused) {
            self.engine.cancel_drag();
        }
    }

    fn header_at(&self, nodes: &[Node], screen_pos: Pos2) -> Option<NodeId> {
        nodes
            .iter()
            .rev()
            .find(|n| self.layout.header_screen_rect(n).contains(screen_pos))
            .map(|n| n.id)
    }

    fn draw_node(&self, painter: &egui::Painter, clip: Rect, node: &Node) {
        let zoom = self.layout.zoom;
        let screen_rect = self.layout.node_screen_rect(node);
        if !screen_rect.intersects(clip) {
            return;
        }

        let shadow_rect = screen_rect.translate(Vec2::splat(NODE_SHADOW_OFFSET));
        painter.rect_filled(
            shadow_rect,
            NODE_ROUNDING * zoom,
            Color32::from_rgba_unmultiplied(0, 0, 0, 90),
        );
        painter.rect_filled(screen_rect, NODE_ROUNDING * zoom, PANEL_COLOR);

        let color = node.color.color32();
        let header_rect = self.layout.header_screen_rect(node);
        painter.rect_filled(
            header_rect,
            egui::Rounding {
                nw: NODE_ROUNDING * zoom,
                ne: NODE_ROUNDING * zoom,
                sw: 0.0,
                se: 0.0,
            },
            lerp_color(PANEL_COLOR, color, 0.35),
        );
        painter.text(
            header_rect.center(),
            egui::Align2::CENTER_CENTER,
            &node.label,
            egui::FontId::proportional(12.0 * zoom),
            Color32::WHITE,
        );
        painter.rect_stroke(screen_rect, NODE_ROUNDING * zoom, Stroke::new(1.0, color.gamma_multiply(0.6)));

        for port in node.ports() {
            self.draw_jack(painter, node, port, color);
        }
    }

    fn draw_jack(&self, painter: &egui::Painter, node: &Node, port: &Port, color: Color32) {
        let zoom = self.layout.zoom;
        let board = self.layout.port_board_position(node, port.direction, port.index);
        let pos = self.layout.board_to_screen(board);
        let radius = JACK_RADIUS * zoom;

        painter.circle_filled(pos, radius, Color32::from_gray(12));
        painter.circle_stroke(pos, radius, Stroke::new(1.5, color));

        let (offset, align) = match port.direction {
            PortDirection::Input => (LABEL_PADDING * zoom, egui::Align2::LEFT_CENTER),
            PortDirection::Output => (-LABEL_PADDING * zoom, egui::Align2::RIGHT_CENTER),
        };
        painter.text(
            Pos2::new(pos.x + offset, pos.y),
            align,
            &port.name,
            egui::FontId::proportional(10.0 * zoom),
            Color32::from_gray(200),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::NodeColor;
    use crate::geometry::GeometryProvider;

    #[test]
    fn test_lerp_color_endpoints() {
        let a = Color32::from_rgb(0, 0, 0);
        let b = Color32::from_rgb(200, 100, 50);

        assert_eq!(lerp_color(a, b, 0.0), a);
        assert_eq!(lerp_color(a, b, 1.0), b);
        assert_eq!(lerp_color(a, b, 0.5), Color32::from_rgb(100, 50, 25));
    }

    #[test]
    fn test_show_publishes_geometry_without_events() {
        let ctx = egui::Context::default();
        let nodes = vec![
            Node::new("Osc", NodeColor::Cyan).with_position(40.0, 40.0).with_output("out"),
            Node::new("Amp", NodeColor::Amber).with_position(300.0, 40.0).with_input("in"),
        ];
        let out = nodes[0].output_ref(0).unwrap();
        let mut view = WiringView::new(WiringEngine::default());
        let mut response = ViewResponse::default();

        let _ = ctx.run(egui::RawInput::default(), |ctx| {
            egui::CentralPanel::default().show(ctx, |ui| {
                response = view.show(ui, &nodes, &ConnectionSet::new());
            });
        });

        assert!(response.events.is_empty());
        assert!(response.moved_nodes.is_empty());
        assert_eq!(view.geometry().len(), 2);
        assert!(view.geometry().port_position(out).is_some());
        assert!(!view.engine.is_dragging());
    }
}

// SPDX-License-Identifier: MIT OR Apache-2.0
//! Layered "neon" cable drawing.
//!
//! Back to front, every cable is drawn as:
//! 1. a wide, faint glow
//! 2. two jittered fray strands (deterministic per cable)
//! 3. a narrow bright core
//! 4. a thin near-white highlight
//! 5. radial-gradient connectors at both ends

use crate::connection::Connection;
use crate::port::PortRef;
use egui::{Color32, Pos2, Stroke, Vec2};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

/// Anything cables can be drawn onto
pub trait Surface {
    /// Stroke an open polyline
    fn stroke_polyline(&mut self, points: &[Pos2], stroke: Stroke);

    /// Fill a disc fading from `inner` at the center to `outer` at the rim
    fn fill_radial(&mut self, center: Pos2, radius: f32, inner: Color32, outer: Color32);

    /// Stroke a circle outline
    fn stroke_circle(&mut self, center: Pos2, radius: f32, stroke: Stroke);
}

/// Stroke widths and opacities for the neon look
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NeonStyle {
    /// Glow stroke width
    pub glow_width: f32,
    /// Glow opacity
    pub glow_alpha: f32,
    /// Fray strand width
    pub fray_width: f32,
    /// Fray strand opacity
    pub fray_alpha: f32,
    /// Maximum sideways offset of fray strands
    pub fray_jitter: f32,
    /// Core stroke width
    pub core_width: f32,
    /// Highlight stroke width
    pub highlight_width: f32,
    /// Highlight color
    pub highlight_color: [u8; 3],
    /// Connector disc radius
    pub connector_radius: f32,
    /// Radius of the ring drawn around a valid drop target
    pub drop_ring_radius: f32,
}

impl Default for NeonStyle {
    fn default() -> Self {
        Self {
            glow_width: 14.0,
            glow_alpha: 0.18,
            fray_width: 1.6,
            fray_alpha: 0.45,
            fray_jitter: 2.5,
            core_width: 3.5,
            highlight_width: 1.2,
            highlight_color: [235, 255, 255],
            connector_radius: 7.0,
            drop_ring_radius: 14.0,
        }
    }
}

/// Same color with a new opacity
pub fn with_alpha(color: Color32, alpha: f32) -> Color32 {
    let a = (alpha.clamp(0.0, 1.0) * 255.0).round() as u8;
    Color32::from_rgba_unmultiplied(color.r(), color.g(), color.b(), a)
}

fn fold_seed(bits: u128) -> u64 {
    (bits as u64) ^ ((bits >> 64) as u64)
}

/// Stable seed for a committed cable
pub fn connection_seed(connection: &Connection) -> u64 {
    fold_seed(connection.from.port.0.as_u128() ^ connection.to.port.0.as_u128().rotate_left(17))
}

/// Stable seed for the cable hanging off a port while it is dragged
pub fn port_seed(port: PortRef) -> u64 {
    fold_seed(port.port.0.as_u128())
}

fn fray_strand(points: &[Pos2], seed: u64, strand: u32, amplitude: f32) -> Vec<Pos2> {
    let amplitude = amplitude.abs();
    if !amplitude.is_finite() {
        return points.to_vec();
    }
    let mut rng = StdRng::seed_from_u64(seed ^ u64::from(strand));
    let last = points.len() - 1;
    points
        .iter()
        .enumerate()
        .map(|(i, p)| {
            if i == 0 || i == last {
                return *p;
            }
            let tangent = points[i + 1] - points[i - 1];
            let normal = if tangent.length_sq() > 0.0 {
                tangent.normalized().rot90()
            } else {
                Vec2::Y
            };
            *p + normal * rng.gen_range(-amplitude..=amplitude)
        })
        .collect()
}

/// Draw one cable with all neon layers
pub fn draw_cable<S: Surface + ?Sized>(
    surface: &mut S,
    points: &[Pos2],
    color: Color32,
    seed: u64,
    style: &NeonStyle,
) {
    if points.len() < 2 {
        return;
    }

    surface.stroke_polyline(points, Stroke::new(style.glow_width, with_alpha(color, style.glow_alpha)));

    let fray_color = with_alpha(color, style.fray_alpha);
    for strand in 0..2 {
        let frayed = fray_strand(points, seed, strand, style.fray_jitter);
        surface.stroke_polyline(&frayed, Stroke::new(style.fray_width, fray_color));
    }

    surface.stroke_polyline(points, Stroke::new(style.core_width, color));

    let [r, g, b] = style.highlight_color;
    surface.stroke_polyline(
        points,
        Stroke::new(style.highlight_width, Color32::from_rgb(r, g, b)),
    );

    for end in [points[0], points[points.len() - 1]] {
        draw_connector(surface, end, color, style);
    }
}

/// Draw an endpoint connector
pub fn draw_connector<S: Surface + ?Sized>(surface: &mut S, center: Pos2, color: Color32, style: &NeonStyle) {
    let [r, g, b] = style.highlight_color;
    surface.fill_radial(
        center,
        style.connector_radius,
        Color32::from_rgb(r, g, b),
        with_alpha(color, 0.0),
    );
    surface.fill_radial(center, style.connector_radius * 0.6, color, with_alpha(color, 0.4));
}

/// Ring around the input port a drag would connect to
pub fn draw_drop_ring<S: Surface + ?Sized>(surface: &mut S, center: Pos2, color: Color32, style: &NeonStyle) {
    surface.stroke_circle(center, style.drop_ring_radius, Stroke::new(2.0, color));
    surface.stroke_circle(
        center,
        style.drop_ring_radius + 3.0,
        Stroke::new(4.0, with_alpha(color, style.glow_alpha)),
    );
}

/// A recorded drawing call
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    /// [`Surface::stroke_polyline`]
    Polyline {
        /// Points
        points: Vec<Pos2>,
        /// Stroke
        stroke: Stroke,
    },
    /// [`Surface::fill_radial`]
    Radial {
        /// Center
        center: Pos2,
        /// Radius
        radius: f32,
        /// Center color
        inner: Color32,
        /// Rim color
        outer: Color32,
    },
    /// [`Surface::stroke_circle`]
    Circle {
        /// Center
        center: Pos2,
        /// Radius
        radius: f32,
        /// Stroke
        stroke: Stroke,
    },
}

/// Surface that records calls instead of rasterizing them
#[derive(Debug, Clone, Default)]
pub struct DrawList {
    /// Calls in submission order
    pub commands: Vec<DrawCommand>,
}

impl DrawList {
    /// Create an empty list
    pub fn new() -> Self {
        Self::default()
    }

    /// Recorded polylines, in order
    pub fn polylines(&self) -> impl Iterator<Item = (&[Pos2], Stroke)> {
        self.commands.iter().filter_map(|c| match c {
            DrawCommand::Polyline { points, stroke } => Some((points.as_slice(), *stroke)),
            _ => None,
        })
    }

    /// Recorded connector discs, in order
    pub fn radials(&self) -> impl Iterator<Item = Pos2> + '_ {
        self.commands.iter().filter_map(|c| match c {
            DrawCommand::Radial { center, .. } => Some(*center),
            _ => None,
        })
    }

    /// Forget everything
    pub fn clear(&mut self) {
        self.commands.clear();
    }
}

impl Surface for DrawList {
    fn stroke_polyline(&mut self, points: &[Pos2], stroke: Stroke) {
        self.commands.push(DrawCommand::Polyline {
            points: points.to_vec(),
            stroke,
        });
    }

    fn fill_radial(&mut self, center: Pos2, radius: f32, inner: Color32, outer: Color32) {
        self.commands.push(DrawCommand::Radial {
            center,
            radius,
            inner,
            outer,
        });
    }

    fn stroke_circle(&mut self, center: Pos2, radius: f32, stroke: Stroke) {
        self.commands.push(DrawCommand::Circle { center, radius, stroke });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cable() -> Vec<Pos2> {
        (0..=8).map(|i| Pos2::new(i as f32 * 10.0, (i as f32).sin() * 4.0)).collect()
    }

    #[test]
    fn test_layers_drawn_back_to_front() {
        let style = NeonStyle::default();
        let color = Color32::from_rgb(0, 229, 255);
        let mut list = DrawList::new();

        draw_cable(&mut list, &cable(), color, 7, &style);

        let widths: Vec<f32> = list.polylines().map(|(_, s)| s.width).collect();
        assert_eq!(
            widths,
            vec![style.glow_width, style.fray_width, style.fray_width, style.core_width, style.highlight_width]
        );
        let (_, glow) = list.polylines().next().unwrap();
        assert!(glow.color.a() < 255);
        let (_, core) = list.polylines().nth(3).unwrap();
        assert_eq!(core.color, color);
        // Two discs per connector, one connector per end
        assert_eq!(list.radials().count(), 4);
    }

    #[test]
    fn test_fray_is_deterministic_and_keeps_ends() {
        let points = cable();
        let a = fray_strand(&points, 42, 0, 2.5);
        let b = fray_strand(&points, 42, 0, 2.5);
        let other_strand = fray_strand(&points, 42, 1, 2.5);

        assert_eq!(a, b);
        assert_ne!(a, other_strand);
        assert_eq!(a[0], points[0]);
        assert_eq!(a[a.len() - 1], points[points.len() - 1]);
        for (frayed, original) in a.iter().zip(&points) {
            assert!(frayed.distance(*original) <= 2.5 + 1e-4);
        }
    }

    #[test]
    fn test_fray_tolerates_odd_amplitudes() {
        let points = cable();

        assert_eq!(fray_strand(&points, 7, 0, 0.0), points);
        assert_eq!(fray_strand(&points, 7, 0, f32::NAN), points);
        for (frayed, original) in fray_strand(&points, 7, 1, -2.0).iter().zip(&points) {
            assert!(frayed.distance(*original) <= 2.0 + 1e-4);
        }
    }

    #[test]
    fn test_port_seed_uses_whole_id() {
        use crate::node::NodeId;
        use crate::port::PortId;
        use uuid::Uuid;

        let node = NodeId::new();
        // Ids that differ only in their high 64 bits
        let a = PortRef::new(node, PortId(Uuid::from_u128(1 << 64 | 7)));
        let b = PortRef::new(node, PortId(Uuid::from_u128(2 << 64 | 7)));

        assert_ne!(port_seed(a), port_seed(b));
        assert_eq!(port_seed(a), port_seed(a));
    }

    #[test]
    fn test_degenerate_cable_draws_nothing() {
        let mut list = DrawList::new();
        draw_cable(&mut list, &[Pos2::ZERO], Color32::WHITE, 0, &NeonStyle::default());

        assert!(list.commands.is_empty());
    }
}

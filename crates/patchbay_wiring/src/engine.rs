// SPDX-License-Identifier: MIT OR Apache-2.0
//! The wiring engine: per-frame update and render over an arena of cables.

use crate::config::WiringConfig;
use crate::connection::{Connection, ConnectionSet, WiringEvent};
use crate::geometry::GeometryProvider;
use crate::interaction::{HitTest, InteractionState};
use crate::node::{Node, NodeId};
use crate::physics::{FixedTimestep, Wire};
use crate::port::{PortAnchor, PortDirection, PortRef};
use crate::registry::PortRegistry;
use crate::render::{self, Surface};
use egui::{Color32, Pos2};
use indexmap::IndexMap;
use std::collections::HashMap;

/// Color used when a cable's source node is unknown
const FALLBACK_COLOR: Color32 = Color32::from_rgb(150, 150, 150);

/// One committed cable in the arena
#[derive(Debug, Clone)]
struct WireRecord {
    connection: Connection,
    seed: u64,
    /// Built lazily, once both endpoints have geometry
    wire: Option<Wire>,
    /// Whether both endpoints resolved this frame
    visible: bool,
}

/// Drives cable physics, interaction and drawing.
///
/// The host calls, once per frame:
/// 1. pointer handlers as input arrives
/// 2. [`Self::update`] with elapsed time, nodes, committed set and geometry
/// 3. [`Self::render`] with a drawing surface
/// 4. [`Self::drain_events`] and applies the notifications to its own set
pub struct WiringEngine {
    config: WiringConfig,
    interactive: bool,
    state: InteractionState,
    /// Committed cables keyed by source port
    wires: IndexMap<PortRef, WireRecord>,
    /// Connection set the arena was last built from
    snapshot: Option<Vec<Connection>>,
    palette: HashMap<NodeId, Color32>,
    timestep: FixedTimestep,
    events: Vec<WiringEvent>,
    drop_target: Option<PortAnchor>,
}

impl WiringEngine {
    /// Create an engine with the given configuration
    pub fn new(config: WiringConfig) -> Self {
        let timestep = FixedTimestep::new(config.timestep, config.max_steps_per_frame);
        Self {
            config,
            interactive: true,
            state: InteractionState::Idle,
            wires: IndexMap::new(),
            snapshot: None,
            palette: HashMap::new(),
            timestep,
            events: Vec::new(),
            drop_target: None,
        }
    }

    /// Current configuration
    pub fn config(&self) -> &WiringConfig {
        &self.config
    }

    /// Replace the configuration. Cables are rebuilt on the next update.
    pub fn set_config(&mut self, config: WiringConfig) {
        self.timestep = FixedTimestep::new(config.timestep, config.max_steps_per_frame);
        self.config = config;
        self.snapshot = None;
    }

    /// Whether pointer input may start drags
    pub fn is_interactive(&self) -> bool {
        self.interactive
    }

    /// Gate drag initiation. Turning it off also drops any drag in progress.
    pub fn set_interactive(&mut self, interactive: bool) {
        self.interactive = interactive;
        if !interactive {
            self.cancel_drag();
        }
    }

    fn hit_test(&self) -> HitTest {
        HitTest {
            radius: self.config.hit_radius,
            policy: self.config.hit_policy,
        }
    }

    /// Pointer pressed. Returns whether a drag started.
    pub fn pointer_down<G: GeometryProvider + ?Sized>(&mut self, point: Pos2, geometry: &G) -> bool {
        if !self.interactive {
            return false;
        }
        self.state.begin(point, geometry, self.hit_test(), self.config.drag_cable)
    }

    /// Pointer moved
    pub fn pointer_move(&mut self, point: Pos2) {
        self.state.move_pointer(point);
    }

    /// Pointer released. Returns whether a connection was committed.
    pub fn pointer_up<G: GeometryProvider + ?Sized>(
        &mut self,
        point: Pos2,
        connections: &ConnectionSet,
        geometry: &G,
    ) -> bool {
        self.drop_target = None;
        let events = self.state.release(point, connections, geometry, self.hit_test());
        let committed = events.iter().any(|e| matches!(e, WiringEvent::Connected(_)));
        self.events.extend(events);
        committed
    }

    /// Drop the drag in progress without committing. Returns whether one existed.
    pub fn cancel_drag(&mut self) -> bool {
        self.drop_target = None;
        self.state.cancel()
    }

    /// Explicit disconnect gesture on a port.
    ///
    /// Emits `Disconnected` for the edge leaving (output) or entering (input)
    /// the nearest wired port under `point`, if any.
    pub fn disconnect_at<G: GeometryProvider + ?Sized>(
        &mut self,
        point: Pos2,
        connections: &ConnectionSet,
        geometry: &G,
    ) -> Option<Connection> {
        if !self.interactive || self.state.is_dragging() {
            return None;
        }

        let wired = |anchor: &PortAnchor| match anchor.direction {
            PortDirection::Output => connections.from_source(anchor.port),
            PortDirection::Input => connections.to_target(anchor.port).next(),
        };
        let anchor =
            PortRegistry::new(geometry).find_port_where(point, self.config.hit_radius, |a| wired(a).is_some())?;
        let connection = *wired(&anchor)?;

        tracing::debug!("Cable disconnected: {:?} -> {:?}", connection.from, connection.to);
        self.events.push(WiringEvent::Disconnected(connection));
        Some(connection)
    }

    /// Take the notifications produced since the last call
    pub fn drain_events(&mut self) -> Vec<WiringEvent> {
        std::mem::take(&mut self.events)
    }

    /// Whether a drag is in progress
    pub fn is_dragging(&self) -> bool {
        self.state.is_dragging()
    }

    /// Interaction state
    pub fn state(&self) -> &InteractionState {
        &self.state
    }

    /// The cable following the pointer
    pub fn drag_wire(&self) -> Option<&Wire> {
        self.state.session().map(|s| &s.wire)
    }

    /// Input port the current drag would connect to if released now
    pub fn drop_target(&self) -> Option<&PortAnchor> {
        self.drop_target.as_ref()
    }

    /// The committed cable leaving `source`, if it has been built
    pub fn wire_for(&self, source: PortRef) -> Option<&Wire> {
        self.wires.get(&source).and_then(|r| r.wire.as_ref())
    }

    /// Number of committed cables drawn last frame
    pub fn visible_wire_count(&self) -> usize {
        self.wires.values().filter(|r| r.visible).count()
    }

    /// Advance one display frame.
    pub fn update<G: GeometryProvider + ?Sized>(
        &mut self,
        dt: f32,
        nodes: &[Node],
        connections: &ConnectionSet,
        geometry: &G,
    ) {
        self.palette.clear();
        self.palette.extend(nodes.iter().map(|n| (n.id, n.color.color32())));

        let changed = self
            .snapshot
            .as_ref()
            .map_or(true, |previous| !previous.iter().eq(connections.iter()));
        if changed {
            self.rebuild(connections);
        }

        let steps = self.timestep.advance(dt);
        let params = self.config.panel_cable;

        for record in self.wires.values_mut() {
            let endpoints = geometry
                .port_position(record.connection.from)
                .zip(geometry.port_position(record.connection.to));
            let Some((start, end)) = endpoints else {
                if record.visible || record.wire.is_none() {
                    tracing::trace!(
                        "Skipping cable {:?} -> {:?}: geometry not published",
                        record.connection.from,
                        record.connection.to
                    );
                }
                record.visible = false;
                continue;
            };

            let wire = record.wire.get_or_insert_with(|| Wire::new(start, end, params));
            wire.pin(start, end);
            for _ in 0..steps {
                wire.step(start, end);
            }
            record.visible = true;
        }

        self.update_drag(steps, connections, geometry);
    }

    fn update_drag<G: GeometryProvider + ?Sized>(&mut self, steps: u32, connections: &ConnectionSet, geometry: &G) {
        let Some(session) = self.state.session_mut() else {
            self.drop_target = None;
            return;
        };

        let Some(origin) = geometry.port_position(session.origin.port) else {
            tracing::debug!("Drag origin {:?} lost its geometry", session.origin.port);
            self.cancel_drag();
            return;
        };

        session.origin.position = origin;
        let pointer = session.pointer;
        session.wire.pin(origin, pointer);
        for _ in 0..steps {
            session.wire.step(origin, pointer);
        }

        self.drop_target = self.state.drop_target(pointer, connections, geometry, self.hit_test());
    }

    fn rebuild(&mut self, connections: &ConnectionSet) {
        self.wires = connections
            .iter()
            .map(|c| {
                let record = WireRecord {
                    connection: *c,
                    seed: render::connection_seed(c),
                    wire: None,
                    visible: false,
                };
                (c.from, record)
            })
            .collect();
        self.snapshot = Some(connections.iter().copied().collect());
        tracing::debug!("Rebuilt cable list: {} connections", self.wires.len());
    }

    fn color_of(&self, node: NodeId) -> Color32 {
        self.palette.get(&node).copied().unwrap_or(FALLBACK_COLOR)
    }

    /// Draw every visible cable, then the drop highlight and the drag cable on top
    pub fn render<S: Surface + ?Sized>(&self, surface: &mut S) {
        let style = &self.config.style;

        for record in self.wires.values().filter(|r| r.visible) {
            if let Some(wire) = &record.wire {
                let color = self.color_of(record.connection.from.node);
                render::draw_cable(surface, wire.points(), color, record.seed, style);
            }
        }

        if let Some(session) = self.state.session() {
            let color = self.color_of(session.origin.node());
            if let Some(target) = &self.drop_target {
                render::draw_drop_ring(surface, target.position, color, style);
            }
            let seed = render::port_seed(session.origin.port);
            render::draw_cable(surface, session.wire.points(), color, seed, style);
        }
    }
}

impl Default for WiringEngine {
    fn default() -> Self {
        Self::new(WiringConfig::default())
    }
}

// SPDX-License-Identifier: MIT OR Apache-2.0
//! Drag-to-connect state machine.
//!
//! Two states only. Committed cables are data, not states: once a drag ends
//! the machine is back to [`InteractionState::Idle`] whatever the outcome.

use crate::connection::{Connection, ConnectionSet, WiringEvent};
use crate::geometry::GeometryProvider;
use crate::physics::{CableParams, Wire};
use crate::port::PortAnchor;
use crate::registry::{HitPolicy, PortRegistry};
use crate::validation::validate;
use egui::Pos2;

/// Hit-test settings shared by every pointer query
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HitTest {
    /// Hit radius in screen units
    pub radius: f32,
    /// Tie-break policy
    pub policy: HitPolicy,
}

impl HitTest {
    fn find<G: GeometryProvider + ?Sized>(&self, geometry: &G, point: Pos2) -> Option<PortAnchor> {
        PortRegistry::new(geometry)
            .with_policy(self.policy)
            .find_nearest_port(point, self.radius)
    }
}

/// An in-progress drag from an output port
#[derive(Debug, Clone)]
pub struct DragSession {
    /// Port the drag started from
    pub origin: PortAnchor,
    /// Cable following the pointer
    pub wire: Wire,
    /// Last pointer position
    pub pointer: Pos2,
}

/// Pointer interaction state
#[derive(Debug, Clone, Default)]
pub enum InteractionState {
    /// Waiting for a pointer-down on an output port
    #[default]
    Idle,
    /// Dragging a cable
    Dragging(DragSession),
}

impl InteractionState {
    /// Whether a drag is in progress
    pub fn is_dragging(&self) -> bool {
        matches!(self, Self::Dragging(_))
    }

    /// The current drag, if any
    pub fn session(&self) -> Option<&DragSession> {
        match self {
            Self::Dragging(session) => Some(session),
            Self::Idle => None,
        }
    }

    /// Mutable access to the current drag
    pub fn session_mut(&mut self) -> Option<&mut DragSession> {
        match self {
            Self::Dragging(session) => Some(session),
            Self::Idle => None,
        }
    }

    /// Pointer-down. Starts a drag when `point` hits an output port.
    ///
    /// Returns whether a drag started.
    pub fn begin<G: GeometryProvider + ?Sized>(
        &mut self,
        point: Pos2,
        geometry: &G,
        hit: HitTest,
        params: CableParams,
    ) -> bool {
        if self.is_dragging() {
            return false;
        }

        let Some(origin) = hit.find(geometry, point) else {
            return false;
        };
        if !origin.is_output() {
            return false;
        }

        tracing::debug!("Cable drag started from {:?}", origin.port);
        *self = Self::Dragging(DragSession {
            origin,
            wire: Wire::new(origin.position, point, params),
            pointer: point,
        });
        true
    }

    /// Pointer-move. The free end is re-pinned on the next physics step.
    pub fn move_pointer(&mut self, point: Pos2) {
        if let Self::Dragging(session) = self {
            session.pointer = point;
        }
    }

    /// Input port under `point` that would accept the current drag
    pub fn drop_target<G: GeometryProvider + ?Sized>(
        &self,
        point: Pos2,
        connections: &ConnectionSet,
        geometry: &G,
        hit: HitTest,
    ) -> Option<PortAnchor> {
        let session = self.session()?;
        resolve_target(&session.origin, point, connections, geometry, hit)
    }

    /// Pointer-up. Ends the drag and returns the notifications to emit.
    ///
    /// A successful drop yields `Connected`, preceded by `Disconnected` when
    /// the source port already fed another input. Anything else yields no
    /// events at all.
    pub fn release<G: GeometryProvider + ?Sized>(
        &mut self,
        point: Pos2,
        connections: &ConnectionSet,
        geometry: &G,
        hit: HitTest,
    ) -> Vec<WiringEvent> {
        let Self::Dragging(session) = std::mem::take(self) else {
            return Vec::new();
        };

        let Some(target) = resolve_target(&session.origin, point, connections, geometry, hit) else {
            tracing::debug!("Cable drag from {:?} dropped without a target", session.origin.port);
            return Vec::new();
        };

        let connection = Connection::new(session.origin.port, target.port);
        let mut events = Vec::with_capacity(2);
        if let Some(previous) = connections.from_source(session.origin.port) {
            events.push(WiringEvent::Disconnected(*previous));
        }
        events.push(WiringEvent::Connected(connection));

        tracing::debug!("Cable committed: {:?} -> {:?}", connection.from, connection.to);
        events
    }

    /// Abort any drag. Returns whether one was in progress.
    pub fn cancel(&mut self) -> bool {
        let was_dragging = self.is_dragging();
        if was_dragging {
            tracing::debug!("Cable drag cancelled");
        }
        *self = Self::Idle;
        was_dragging
    }
}

fn resolve_target<G: GeometryProvider + ?Sized>(
    origin: &PortAnchor,
    point: Pos2,
    connections: &ConnectionSet,
    geometry: &G,
    hit: HitTest,
) -> Option<PortAnchor> {
    let target = hit.find(geometry, point)?;
    if !target.is_input() {
        return None;
    }
    match validate(origin, &target, connections) {
        Ok(()) => Some(target),
        Err(reason) => {
            tracing::trace!("Drop target rejected: {reason}");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::GeometrySnapshot;
    use crate::node::NodeId;
    use crate::port::{PortDirection, PortId, PortRef};

    const HIT: HitTest = HitTest {
        radius: 25.0,
        policy: HitPolicy::Nearest,
    };

    fn port() -> PortRef {
        PortRef::new(NodeId::new(), PortId::new())
    }

    #[test]
    fn test_pointer_down_on_input_does_not_drag() {
        let geometry = GeometrySnapshot::new().with_port(port(), PortDirection::Input, Pos2::new(0.0, 0.0));
        let mut state = InteractionState::default();

        assert!(!state.begin(Pos2::new(3.0, 3.0), &geometry, HIT, CableParams::drag_preview()));
        assert!(!state.is_dragging());
    }

    #[test]
    fn test_drag_wire_spans_port_to_pointer() {
        let source = port();
        let geometry = GeometrySnapshot::new().with_port(source, PortDirection::Output, Pos2::new(100.0, 100.0));
        let mut state = InteractionState::default();

        assert!(state.begin(Pos2::new(104.0, 98.0), &geometry, HIT, CableParams::drag_preview()));
        state.move_pointer(Pos2::new(300.0, 160.0));

        let session = state.session().unwrap();
        assert_eq!(session.origin.port, source);
        assert_eq!(session.wire.start(), Pos2::new(100.0, 100.0));
        assert_eq!(session.pointer, Pos2::new(300.0, 160.0));
    }

    #[test]
    fn test_release_on_output_port_is_silent() {
        let a = port();
        let b = port();
        let geometry = GeometrySnapshot::new()
            .with_port(a, PortDirection::Output, Pos2::new(0.0, 0.0))
            .with_port(b, PortDirection::Output, Pos2::new(300.0, 0.0));
        let mut state = InteractionState::default();

        state.begin(Pos2::ZERO, &geometry, HIT, CableParams::drag_preview());
        let events = state.release(Pos2::new(300.0, 0.0), &ConnectionSet::new(), &geometry, HIT);

        assert!(events.is_empty());
        assert!(!state.is_dragging());
    }

    #[test]
    fn test_release_without_drag_is_noop() {
        let mut state = InteractionState::default();
        let events = state.release(Pos2::ZERO, &ConnectionSet::new(), &GeometrySnapshot::new(), HIT);

        assert!(events.is_empty());
        assert!(!state.cancel());
    }
}

// SPDX-License-Identifier: MIT OR Apache-2.0
//! Rules deciding which cables may be committed.

use crate::connection::ConnectionSet;
use crate::port::{PortAnchor, PortDirection, PortRef};

/// Reason a candidate connection was rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ConnectionError {
    /// Source is not an output or target is not an input
    #[error("Cable must run from an output to an input")]
    WrongDirection,

    /// Both ends on the same node
    #[error("Self-loop not allowed")]
    SelfLoop,

    /// Exact pair already committed
    #[error("Already connected: {0:?} -> {1:?}")]
    Duplicate(PortRef, PortRef),
}

/// Check a candidate `source -> target` edge against the committed set
pub fn validate(
    source: &PortAnchor,
    target: &PortAnchor,
    existing: &ConnectionSet,
) -> Result<(), ConnectionError> {
    if source.direction != PortDirection::Output || target.direction != PortDirection::Input {
        return Err(ConnectionError::WrongDirection);
    }

    if source.node() == target.node() {
        return Err(ConnectionError::SelfLoop);
    }

    if existing.contains_pair(source.port, target.port) {
        return Err(ConnectionError::Duplicate(source.port, target.port));
    }

    Ok(())
}

/// Boolean form of [`validate`]
pub fn can_connect(source: &PortAnchor, target: &PortAnchor, existing: &ConnectionSet) -> bool {
    validate(source, target, existing).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::connection::Connection;
    use crate::node::NodeId;
    use crate::port::PortId;
    use egui::Pos2;

    fn anchor(node: NodeId, direction: PortDirection) -> PortAnchor {
        PortAnchor::new(PortRef::new(node, PortId::new()), direction, Pos2::ZERO)
    }

    #[test]
    fn test_output_to_input_on_other_node() {
        let out = anchor(NodeId::new(), PortDirection::Output);
        let inp = anchor(NodeId::new(), PortDirection::Input);

        assert!(can_connect(&out, &inp, &ConnectionSet::new()));
    }

    #[test]
    fn test_reversed_direction_always_fails() {
        let out = anchor(NodeId::new(), PortDirection::Output);
        let inp = anchor(NodeId::new(), PortDirection::Input);
        let other_out = anchor(NodeId::new(), PortDirection::Output);
        let other_in = anchor(NodeId::new(), PortDirection::Input);
        let empty = ConnectionSet::new();

        assert_eq!(validate(&inp, &out, &empty), Err(ConnectionError::WrongDirection));
        assert_eq!(validate(&out, &other_out, &empty), Err(ConnectionError::WrongDirection));
        assert_eq!(validate(&inp, &other_in, &empty), Err(ConnectionError::WrongDirection));
    }

    #[test]
    fn test_same_node_always_fails() {
        let node = NodeId::new();
        let out = anchor(node, PortDirection::Output);
        let inp = anchor(node, PortDirection::Input);
        let empty = ConnectionSet::new();

        assert_eq!(validate(&out, &inp, &empty), Err(ConnectionError::SelfLoop));
        assert!(!can_connect(&out, &out, &empty));
    }

    #[test]
    fn test_duplicate_pair_fails_but_rewire_passes() {
        let out = anchor(NodeId::new(), PortDirection::Output);
        let first = anchor(NodeId::new(), PortDirection::Input);
        let second = anchor(NodeId::new(), PortDirection::Input);
        let existing: ConnectionSet = [Connection::new(out.port, first.port)].into_iter().collect();

        assert!(matches!(validate(&out, &first, &existing), Err(ConnectionError::Duplicate(..))));
        assert!(can_connect(&out, &second, &existing));
    }
}

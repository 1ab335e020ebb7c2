// SPDX-License-Identifier: MIT OR Apache-2.0
//! Port definitions for node inputs/outputs.

use crate::node::NodeId;
use egui::Pos2;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a port
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PortId(pub Uuid);

impl PortId {
    /// Create a new random port ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for PortId {
    fn default() -> Self {
        Self::new()
    }
}

/// Port direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PortDirection {
    /// Input port (cable target)
    Input,
    /// Output port (cable source)
    Output,
}

/// A port on a node
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Port {
    /// Unique port ID
    pub id: PortId,
    /// Port name
    pub name: String,
    /// Port direction
    pub direction: PortDirection,
    /// Position among the node's ports of the same direction
    pub index: usize,
}

impl Port {
    /// Create a new port
    pub fn new(name: impl Into<String>, direction: PortDirection, index: usize) -> Self {
        Self {
            id: PortId::new(),
            name: name.into(),
            direction,
            index,
        }
    }
}

/// Fully qualified port address: owning node plus port.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PortRef {
    /// Owning node
    pub node: NodeId,
    /// Port on that node
    pub port: PortId,
}

impl PortRef {
    /// Create a port reference
    pub fn new(node: NodeId, port: PortId) -> Self {
        Self { node, port }
    }
}

/// A port as published by the geometry provider for one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PortAnchor {
    /// Which port
    pub port: PortRef,
    /// Its direction
    pub direction: PortDirection,
    /// Screen-space position this frame
    pub position: Pos2,
}

impl PortAnchor {
    /// Create an anchor
    pub fn new(port: PortRef, direction: PortDirection, position: Pos2) -> Self {
        Self { port, direction, position }
    }

    /// Owning node
    pub fn node(&self) -> NodeId {
        self.port.node
    }

    /// Whether this is an output port
    pub fn is_output(&self) -> bool {
        self.direction == PortDirection::Output
    }

    /// Whether this is an input port
    pub fn is_input(&self) -> bool {
        self.direction == PortDirection::Input
    }
}

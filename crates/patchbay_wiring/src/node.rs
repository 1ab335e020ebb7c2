// SPDX-License-Identifier: MIT OR Apache-2.0
//! Node definitions for the wiring board.

use crate::port::{Port, PortDirection, PortId, PortRef};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(pub Uuid);

impl NodeId {
    /// Create a new random node ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for NodeId {
    fn default() -> Self {
        Self::new()
    }
}

/// Semantic color of a node. Cables inherit the color of their source node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum NodeColor {
    /// Power rails
    #[default]
    Cyan,
    /// Signal sources
    Magenta,
    /// Warnings and timers
    Amber,
    /// Data lines
    Lime,
    /// Logic gates
    Violet,
    /// Alarms
    Crimson,
}

impl NodeColor {
    /// Get the RGB triple for this color
    pub fn rgb(&self) -> [u8; 3] {
        match self {
            Self::Cyan => [0, 229, 255],
            Self::Magenta => [255, 46, 200],
            Self::Amber => [255, 183, 0],
            Self::Lime => [120, 255, 80],
            Self::Violet => [160, 110, 255],
            Self::Crimson => [255, 60, 80],
        }
    }

    /// Get the color as an egui color
    pub fn color32(&self) -> egui::Color32 {
        let [r, g, b] = self.rgb();
        egui::Color32::from_rgb(r, g, b)
    }
}

/// A node on the wiring board
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Node {
    /// Unique node ID
    pub id: NodeId,
    /// Display label
    pub label: String,
    /// Semantic color
    pub color: NodeColor,
    /// Top-left position in board space
    pub position: [f32; 2],
    /// Input ports, top to bottom
    pub inputs: Vec<Port>,
    /// Output ports, top to bottom
    pub outputs: Vec<Port>,
}

impl Node {
    /// Create a new node with no ports
    pub fn new(label: impl Into<String>, color: NodeColor) -> Self {
        Self {
            id: NodeId::new(),
            label: label.into(),
            color,
            position: [0.0, 0.0],
            inputs: Vec::new(),
            outputs: Vec::new(),
        }
    }

    /// Set the position
    pub fn with_position(mut self, x: f32, y: f32) -> Self {
        self.position = [x, y];
        self
    }

    /// Append an input port
    pub fn with_input(mut self, name: impl Into<String>) -> Self {
        let index = self.inputs.len();
        self.inputs.push(Port::new(name, PortDirection::Input, index));
        self
    }

    /// Append an output port
    pub fn with_output(mut self, name: impl Into<String>) -> Self {
        let index = self.outputs.len();
        self.outputs.push(Port::new(name, PortDirection::Output, index));
        self
    }

    /// Get an input port by index
    pub fn input(&self, index: usize) -> Option<&Port> {
        self.inputs.get(index)
    }

    /// Get an output port by index
    pub fn output(&self, index: usize) -> Option<&Port> {
        self.outputs.get(index)
    }

    /// Get a port by ID
    pub fn port(&self, port_id: PortId) -> Option<&Port> {
        self.inputs
            .iter()
            .find(|p| p.id == port_id)
            .or_else(|| self.outputs.iter().find(|p| p.id == port_id))
    }

    /// Reference to the input port at `index`
    pub fn input_ref(&self, index: usize) -> Option<PortRef> {
        self.input(index).map(|p| PortRef::new(self.id, p.id))
    }

    /// Reference to the output port at `index`
    pub fn output_ref(&self, index: usize) -> Option<PortRef> {
        self.output(index).map(|p| PortRef::new(self.id, p.id))
    }

    /// Get all ports, inputs first
    pub fn ports(&self) -> impl Iterator<Item = &Port> {
        self.inputs.iter().chain(self.outputs.iter())
    }
}

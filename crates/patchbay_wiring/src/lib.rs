// SPDX-License-Identifier: MIT OR Apache-2.0
//! Cable wiring engine for the Patchbay puzzle board.
//!
//! Users drag flexible cables from output ports to input ports. This crate
//! owns everything between the pointer and the pixels:
//! - Port hit-testing against host-published geometry
//! - Connection rules (direction, self-loops, duplicates)
//! - Rope physics (Verlet integration with distance-constraint relaxation)
//! - The drag-to-connect state machine
//! - Layered "neon" cable rendering
//!
//! ## Architecture
//!
//! The host owns the nodes and the committed [`ConnectionSet`]. Each frame it
//! hands both to [`WiringEngine::update`] together with a [`GeometryProvider`],
//! then calls [`WiringEngine::render`] on a drawing [`Surface`]. The engine
//! never writes the committed set; it reports [`WiringEvent`]s that the host
//! applies (see [`ConnectionSet::apply`]).

pub mod node;
pub mod port;
pub mod connection;
pub mod geometry;
pub mod layout;
pub mod registry;
pub mod validation;
pub mod physics;
pub mod interaction;
pub mod render;
pub mod engine;
pub mod config;
pub mod solution;
pub mod ui;

pub use node::{Node, NodeColor, NodeId};
pub use port::{Port, PortAnchor, PortDirection, PortId, PortRef};
pub use connection::{Connection, ConnectionSet, WiringEvent};
pub use geometry::{GeometryProvider, GeometrySnapshot};
pub use layout::NodeLayout;
pub use registry::{HitPolicy, PortRegistry};
pub use validation::{can_connect, validate, ConnectionError};
pub use physics::{CableParams, FixedTimestep, Wire};
pub use interaction::{DragSession, HitTest, InteractionState};
pub use render::{DrawCommand, DrawList, NeonStyle, Surface};
pub use engine::WiringEngine;
pub use config::{ConfigError, WiringConfig};
pub use solution::{SolutionProgress, WiringSolution};
pub use ui::{ViewResponse, WiringView};

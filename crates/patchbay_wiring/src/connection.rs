// SPDX-License-Identifier: MIT OR Apache-2.0
//! Connection (edge) definitions and the committed connection set.

use crate::node::NodeId;
use crate::port::PortRef;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// A committed connection from an output port to an input port
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Connection {
    /// Source (output) port
    pub from: PortRef,
    /// Target (input) port
    pub to: PortRef,
}

impl Connection {
    /// Create a new connection
    pub fn new(from: PortRef, to: PortRef) -> Self {
        Self { from, to }
    }

    /// Check if this connection involves a specific node
    pub fn involves_node(&self, node_id: NodeId) -> bool {
        self.from.node == node_id || self.to.node == node_id
    }

    /// Check if this connection involves a specific port
    pub fn involves_port(&self, port: PortRef) -> bool {
        self.from == port || self.to == port
    }
}

/// Notification emitted by the engine for the host to apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WiringEvent {
    /// A new edge was committed
    Connected(Connection),
    /// An existing edge was invalidated
    Disconnected(Connection),
}

impl WiringEvent {
    /// The connection this event is about
    pub fn connection(&self) -> Connection {
        match self {
            Self::Connected(c) | Self::Disconnected(c) => *c,
        }
    }
}

/// Ordered set of committed connections, at most one per source port.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionSet {
    by_source: IndexMap<PortRef, Connection>,
}

impl ConnectionSet {
    /// Create an empty set
    pub fn new() -> Self {
        Self::default()
    }

    /// Commit a connection, replacing any edge from the same source port.
    ///
    /// Returns the replaced connection when it pointed somewhere else.
    pub fn commit(&mut self, connection: Connection) -> Option<Connection> {
        self.by_source
            .insert(connection.from, connection)
            .filter(|previous| *previous != connection)
    }

    /// Remove the edge leaving `source`
    pub fn remove(&mut self, source: PortRef) -> Option<Connection> {
        self.by_source.shift_remove(&source)
    }

    /// Remove `connection` if it is committed exactly as given
    pub fn remove_connection(&mut self, connection: &Connection) -> bool {
        if self.by_source.get(&connection.from) == Some(connection) {
            self.by_source.shift_remove(&connection.from);
            true
        } else {
            false
        }
    }

    /// Drop every edge touching `node_id`, returning what was removed
    pub fn remove_node(&mut self, node_id: NodeId) -> Vec<Connection> {
        let removed: Vec<_> = self
            .by_source
            .values()
            .filter(|c| c.involves_node(node_id))
            .copied()
            .collect();
        self.by_source.retain(|_, c| !c.involves_node(node_id));
        removed
    }

    /// Apply an engine notification. Returns whether the set changed.
    pub fn apply(&mut self, event: &WiringEvent) -> bool {
        match event {
            WiringEvent::Connected(c) => {
                let changed = self.by_source.get(&c.from) != Some(c);
                self.commit(*c);
                changed
            }
            WiringEvent::Disconnected(c) => self.remove_connection(c),
        }
    }

    /// The edge leaving `source`, if any
    pub fn from_source(&self, source: PortRef) -> Option<&Connection> {
        self.by_source.get(&source)
    }

    /// Edges arriving at `target`
    pub fn to_target(&self, target: PortRef) -> impl Iterator<Item = &Connection> {
        self.by_source.values().filter(move |c| c.to == target)
    }

    /// Whether this exact pair is committed
    pub fn contains_pair(&self, from: PortRef, to: PortRef) -> bool {
        self.by_source.get(&from).is_some_and(|c| c.to == to)
    }

    /// Iterate in commit order
    pub fn iter(&self) -> impl Iterator<Item = &Connection> {
        self.by_source.values()
    }

    /// Number of committed edges
    pub fn len(&self) -> usize {
        self.by_source.len()
    }

    /// Whether no edge is committed
    pub fn is_empty(&self) -> bool {
        self.by_source.is_empty()
    }
}

impl FromIterator<Connection> for ConnectionSet {
    fn from_iter<I: IntoIterator<Item = Connection>>(iter: I) -> Self {
        let mut set = Self::new();
        for connection in iter {
            set.commit(connection);
        }
        set
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::port::PortId;

    fn port() -> PortRef {
        PortRef::new(NodeId::new(), PortId::new())
    }

    #[test]
    fn test_commit_replaces_same_source() {
        let (src, a, b) = (port(), port(), port());
        let mut set = ConnectionSet::new();

        assert_eq!(set.commit(Connection::new(src, a)), None);
        let replaced = set.commit(Connection::new(src, b));

        assert_eq!(replaced, Some(Connection::new(src, a)));
        assert_eq!(set.len(), 1);
        assert!(set.contains_pair(src, b));
        assert!(!set.contains_pair(src, a));
    }

    #[test]
    fn test_recommit_identical_reports_nothing_replaced() {
        let (src, dst) = (port(), port());
        let mut set = ConnectionSet::new();
        set.commit(Connection::new(src, dst));

        assert_eq!(set.commit(Connection::new(src, dst)), None);
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_cardinality_over_many_commits() {
        let sources = [port(), port(), port()];
        let targets: Vec<_> = (0..5).map(|_| port()).collect();
        let mut set = ConnectionSet::new();

        for (i, target) in targets.iter().enumerate() {
            for source in &sources[..=(i % sources.len())] {
                set.commit(Connection::new(*source, *target));
            }
        }

        assert_eq!(set.len(), sources.len());
        for source in &sources {
            assert_eq!(set.iter().filter(|c| c.from == *source).count(), 1);
        }
    }

    #[test]
    fn test_apply_events() {
        let (src, a, b) = (port(), port(), port());
        let mut set = ConnectionSet::new();

        assert!(set.apply(&WiringEvent::Connected(Connection::new(src, a))));
        assert!(!set.apply(&WiringEvent::Connected(Connection::new(src, a))));
        // Disconnecting a stale pair leaves the live edge alone
        assert!(!set.apply(&WiringEvent::Disconnected(Connection::new(src, b))));
        assert!(set.apply(&WiringEvent::Disconnected(Connection::new(src, a))));
        assert!(set.is_empty());
    }

    #[test]
    fn test_remove_node_drops_touching_edges() {
        let (a, b, c) = (port(), port(), port());
        let mut set: ConnectionSet = [Connection::new(a, b), Connection::new(c, b)].into_iter().collect();

        let removed = set.remove_node(a.node);

        assert_eq!(removed, vec![Connection::new(a, b)]);
        assert_eq!(set.len(), 1);
        assert_eq!(set.to_target(b).count(), 1);
    }
}

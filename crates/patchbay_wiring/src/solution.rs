// SPDX-License-Identifier: MIT OR Apache-2.0
//! Puzzle solutions and progress against them.

use crate::connection::{Connection, ConnectionSet};
use crate::port::PortRef;
use serde::{Deserialize, Serialize};

/// The set of cables that solves a board
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WiringSolution {
    /// Connections that must all be present
    pub required: Vec<Connection>,
}

/// How far a connection set is from a solution
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SolutionProgress {
    /// Required connections that are present
    pub correct: usize,
    /// Required connections that are absent
    pub missing: usize,
    /// Present connections that are not required
    pub wrong: usize,
}

impl SolutionProgress {
    /// Every required cable is in place and nothing else is
    pub fn is_solved(&self) -> bool {
        self.missing == 0 && self.wrong == 0
    }

    /// Share of required cables in place, in [0, 1]
    pub fn fraction(&self) -> f32 {
        let total = self.correct + self.missing;
        if total == 0 {
            return 1.0;
        }
        self.correct as f32 / total as f32
    }
}

impl WiringSolution {
    /// Create an empty solution
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a required connection
    pub fn with(mut self, from: PortRef, to: PortRef) -> Self {
        let connection = Connection::new(from, to);
        if !self.required.contains(&connection) {
            self.required.push(connection);
        }
        self
    }

    /// Compare a connection set against this solution
    pub fn evaluate(&self, connections: &ConnectionSet) -> SolutionProgress {
        let correct = self
            .required
            .iter()
            .filter(|c| connections.contains_pair(c.from, c.to))
            .count();
        let wrong = connections.iter().filter(|c| !self.required.contains(c)).count();

        SolutionProgress {
            correct,
            missing: self.required.len() - correct,
            wrong,
        }
    }

    /// Shorthand for `evaluate(connections).is_solved()`
    pub fn is_solved(&self, connections: &ConnectionSet) -> bool {
        self.evaluate(connections).is_solved()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::NodeId;
    use crate::port::PortId;

    fn port() -> PortRef {
        PortRef::new(NodeId::new(), PortId::new())
    }

    #[test]
    fn test_progress_counts() {
        let (a, b, c, d) = (port(), port(), port(), port());
        let solution = WiringSolution::new().with(a, b).with(c, d);

        let mut connections = ConnectionSet::new();
        assert_eq!(
            solution.evaluate(&connections),
            SolutionProgress { correct: 0, missing: 2, wrong: 0 }
        );

        connections.commit(Connection::new(a, b));
        connections.commit(Connection::new(c, b));
        let progress = solution.evaluate(&connections);
        assert_eq!(progress, SolutionProgress { correct: 1, missing: 1, wrong: 1 });
        assert!(!progress.is_solved());
        assert_eq!(progress.fraction(), 0.5);

        connections.commit(Connection::new(c, d));
        assert!(solution.is_solved(&connections));
    }

    #[test]
    fn test_extra_cable_blocks_solution() {
        let (a, b, c) = (port(), port(), port());
        let solution = WiringSolution::new().with(a, b);
        let connections: ConnectionSet = [Connection::new(a, b), Connection::new(c, b)].into_iter().collect();

        let progress = solution.evaluate(&connections);
        assert_eq!(progress.correct, 1);
        assert!(!progress.is_solved());
    }

    #[test]
    fn test_duplicate_requirement_ignored() {
        let (a, b) = (port(), port());
        let solution = WiringSolution::new().with(a, b).with(a, b);

        assert_eq!(solution.required.len(), 1);
    }
}

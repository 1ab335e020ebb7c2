// SPDX-License-Identifier: MIT OR Apache-2.0
//! The sample board: modules, the wiring that solves it, and the status bar.

use patchbay_wiring::{
    ConnectionSet, Node, NodeColor, PortRef, ViewResponse, WiringConfig, WiringEngine, WiringEvent,
    WiringSolution, WiringView,
};

/// A wiring board the player solves by patching cables
pub struct Puzzle {
    nodes: Vec<Node>,
    connections: ConnectionSet,
    solution: WiringSolution,
    view: WiringView,
    solved: bool,
}

/// Output `output` of `from` into input `input` of `to`
fn patch(from: &Node, output: usize, to: &Node, input: usize) -> Option<(PortRef, PortRef)> {
    Some((from.output_ref(output)?, to.input_ref(input)?))
}

impl Puzzle {
    /// Board with an empty connection set
    pub fn new(nodes: Vec<Node>, solution: WiringSolution, config: WiringConfig) -> Self {
        Self {
            nodes,
            connections: ConnectionSet::new(),
            solution,
            view: WiringView::new(WiringEngine::new(config)),
            solved: false,
        }
    }

    /// A small synth voice to patch together
    pub fn sample(config: WiringConfig) -> Self {
        let osc = Node::new("Oscillator", NodeColor::Cyan)
            .with_position(40.0, 80.0)
            .with_output("wave")
            .with_output("sync");
        let lfo = Node::new("LFO", NodeColor::Lime)
            .with_position(40.0, 300.0)
            .with_output("mod");
        let filter = Node::new("Filter", NodeColor::Magenta)
            .with_position(340.0, 60.0)
            .with_input("in")
            .with_input("cutoff")
            .with_output("out");
        let mixer = Node::new("Mixer", NodeColor::Amber)
            .with_position(640.0, 160.0)
            .with_input("a")
            .with_input("b")
            .with_output("mix");
        let speaker = Node::new("Speaker", NodeColor::Violet)
            .with_position(920.0, 200.0)
            .with_input("in");

        let solution = [
            patch(&osc, 0, &filter, 0),
            patch(&lfo, 0, &filter, 1),
            patch(&filter, 0, &mixer, 0),
            patch(&osc, 1, &mixer, 1),
            patch(&mixer, 0, &speaker, 0),
        ]
        .into_iter()
        .flatten()
        .fold(WiringSolution::new(), |solution, (from, to)| solution.with(from, to));

        Self::new(vec![osc, lfo, filter, mixer, speaker], solution, config)
    }

    /// Whether the board is currently solved
    pub fn is_solved(&self) -> bool {
        self.solved
    }

    /// Apply what the view reported this frame
    fn apply(&mut self, response: ViewResponse) {
        for (node_id, delta) in response.moved_nodes {
            if let Some(node) = self.nodes.iter_mut().find(|n| n.id == node_id) {
                node.position[0] += delta.x;
                node.position[1] += delta.y;
            }
        }

        for event in &response.events {
            if self.connections.apply(event) {
                match event {
                    WiringEvent::Connected(c) => tracing::info!("Patched {:?} -> {:?}", c.from.port, c.to.port),
                    WiringEvent::Disconnected(c) => tracing::info!("Unpatched {:?} -> {:?}", c.from.port, c.to.port),
                }
            }
        }

        let solved = self.solution.is_solved(&self.connections);
        if solved != self.solved {
            self.solved = solved;
            self.view.engine.set_interactive(!solved);
            if solved {
                tracing::info!("Board solved with {} cables", self.connections.len());
            }
        }
    }

    /// Pull every cable and unlock the board
    pub fn reset(&mut self) {
        tracing::info!("Board reset");
        self.connections = ConnectionSet::new();
        self.solved = false;
        self.view.engine.set_interactive(true);
    }

    /// Draw the status bar and the board
    pub fn ui(&mut self, ctx: &egui::Context) {
        let progress = self.solution.evaluate(&self.connections);

        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                if self.solved {
                    ui.colored_label(egui::Color32::from_rgb(120, 255, 140), "Solved!");
                } else {
                    ui.label(format!(
                        "Cables: {}/{} correct, {} wrong",
                        progress.correct,
                        progress.correct + progress.missing,
                        progress.wrong
                    ));
                }
                ui.separator();
                if ui.button("Reset").clicked() {
                    self.reset();
                }
            });
        });

        let response = egui::CentralPanel::default()
            .frame(egui::Frame::none())
            .show(ctx, |ui| self.view.show(ui, &self.nodes, &self.connections))
            .inner;
        self.apply(response);
    }
}

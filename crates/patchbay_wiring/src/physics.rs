// SPDX-License-Identifier: MIT OR Apache-2.0
//! Rope physics for cables.
//!
//! Each cable is a chain of mass points:
//! - Endpoints are pinned to their ports (or the pointer) every step
//! - Interior points move with Verlet integration (current and previous
//!   position, no explicit velocity) under damping and gravity
//! - Neighbouring points are pulled back toward a rest distance over a few
//!   relaxation passes, alternating sweep direction each pass
//! - The rest distance sits slightly below the straight span, so a cable with
//!   no gravity pulls itself straight
//!
//! Time advances in fixed steps through [`FixedTimestep`], so cable motion
//! does not depend on the display refresh rate.

use egui::{Pos2, Vec2};
use serde::{Deserialize, Serialize};
use std::f32::consts::PI;

/// Peak of the initial sine sag, as a fraction of the endpoint distance
const SAG_RATIO: f32 = 0.05;

/// Points closer than this are treated as coincident during relaxation
const MIN_SEPARATION: f32 = 1e-4;

/// Tunables for one kind of cable
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CableParams {
    /// Number of segments (points = segments + 1)
    pub segments: usize,
    /// Relaxation passes per step
    pub iterations: usize,
    /// Downward acceleration added per step
    pub gravity: f32,
    /// Fraction of velocity kept per step
    pub damping: f32,
    /// Fraction of the constraint error corrected per pass, in (0, 1]
    pub stiffness: f32,
    /// How far the rest length is shortened below the straight span, in [0, 1)
    pub tension: f32,
}

impl CableParams {
    /// Soft, slack cables for committed connections on the puzzle board
    pub fn panel() -> Self {
        Self {
            segments: 16,
            iterations: 4,
            gravity: 0.25,
            damping: 0.8,
            stiffness: 0.9,
            tension: 0.15,
        }
    }

    /// Tighter cable that follows the pointer while dragging
    pub fn drag_preview() -> Self {
        Self {
            segments: 12,
            iterations: 4,
            gravity: 0.4,
            damping: 0.7,
            stiffness: 1.0,
            tension: 0.15,
        }
    }

    /// Copy with a different gravity
    pub fn with_gravity(mut self, gravity: f32) -> Self {
        self.gravity = gravity;
        self
    }

    /// Copy with a different pass count
    pub fn with_iterations(mut self, iterations: usize) -> Self {
        self.iterations = iterations;
        self
    }
}

impl Default for CableParams {
    fn default() -> Self {
        Self::panel()
    }
}

/// A simulated cable: `segments + 1` points with pinned endpoints.
#[derive(Debug, Clone)]
pub struct Wire {
    points: Vec<Pos2>,
    previous: Vec<Pos2>,
    rest_length: f32,
    params: CableParams,
}

impl Wire {
    /// Lay out a fresh cable between two endpoints with a slight sag
    pub fn new(start: Pos2, end: Pos2, params: CableParams) -> Self {
        let segments = params.segments.max(1);
        let distance = start.distance(end);
        let sag = distance * SAG_RATIO;

        let points: Vec<Pos2> = (0..=segments)
            .map(|i| {
                let t = i as f32 / segments as f32;
                start.lerp(end, t) + Vec2::new(0.0, (t * PI).sin() * sag)
            })
            .collect();

        Self {
            previous: points.clone(),
            points,
            rest_length: distance / segments as f32 * (1.0 - params.tension.clamp(0.0, 0.99)),
            params: CableParams { segments, ..params },
        }
    }

    /// Force both endpoints onto the given coordinates
    pub fn pin(&mut self, start: Pos2, end: Pos2) {
        let last = self.points.len() - 1;
        self.points[0] = start;
        self.previous[0] = start;
        self.points[last] = end;
        self.previous[last] = end;
    }

    /// Verlet step for interior points
    fn integrate(&mut self) {
        let last = self.points.len() - 1;
        let gravity = Vec2::new(0.0, self.params.gravity);

        for i in 1..last {
            let velocity = (self.points[i] - self.previous[i]) * self.params.damping;
            self.previous[i] = self.points[i];
            self.points[i] += velocity + gravity;
        }
    }

    /// Pull neighbouring points toward the rest length
    fn relax(&mut self) {
        let last = self.points.len() - 1;
        let stiffness = self.params.stiffness;

        for pass in 0..self.params.iterations {
            for k in 0..last {
                let i = if pass % 2 == 0 { k } else { last - 1 - k };
                let delta = self.points[i + 1] - self.points[i];
                let distance = delta.length();
                if distance < MIN_SEPARATION {
                    continue;
                }

                let error = distance - self.rest_length;
                let correction = delta * (error / distance * 0.5 * stiffness);

                if i != 0 {
                    self.points[i] += correction;
                }
                if i + 1 != last {
                    self.points[i + 1] -= correction;
                }
            }
        }
    }

    /// One fixed physics step: pin, integrate, relax
    pub fn step(&mut self, start: Pos2, end: Pos2) {
        self.pin(start, end);
        self.integrate();
        self.relax();
    }

    /// All points, endpoint to endpoint
    pub fn points(&self) -> &[Pos2] {
        &self.points
    }

    /// First point (source end)
    pub fn start(&self) -> Pos2 {
        self.points[0]
    }

    /// Last point (target or pointer end)
    pub fn end(&self) -> Pos2 {
        self.points[self.points.len() - 1]
    }

    /// Number of segments
    pub fn segments(&self) -> usize {
        self.points.len() - 1
    }

    /// Rest length of one segment
    pub fn rest_length(&self) -> f32 {
        self.rest_length
    }

    /// Parameters this wire simulates with
    pub fn params(&self) -> &CableParams {
        &self.params
    }

    /// Largest distance of an interior point from the endpoint chord
    pub fn max_deviation(&self) -> f32 {
        let (a, b) = (self.start(), self.end());
        let chord = b - a;
        let length = chord.length();
        let last = self.points.len() - 1;

        self.points[1..last]
            .iter()
            .map(|p| {
                if length < MIN_SEPARATION {
                    p.distance(a)
                } else {
                    let rel = *p - a;
                    (chord.x * rel.y - chord.y * rel.x).abs() / length
                }
            })
            .fold(0.0, f32::max)
    }
}

/// Fixed-timestep accumulator.
///
/// Real frame time goes in; a bounded number of fixed steps comes out.
#[derive(Debug, Clone)]
pub struct FixedTimestep {
    step: f32,
    max_steps: u32,
    accumulator: f32,
}

impl FixedTimestep {
    /// Create an accumulator stepping every `step` seconds, at most `max_steps` per frame
    pub fn new(step: f32, max_steps: u32) -> Self {
        Self {
            step: step.max(f32::EPSILON),
            max_steps: max_steps.max(1),
            accumulator: 0.0,
        }
    }

    /// Feed `dt` seconds and return how many fixed steps to run.
    ///
    /// Time beyond `max_steps` is dropped so a long stall cannot trigger a
    /// burst of catch-up steps.
    pub fn advance(&mut self, dt: f32) -> u32 {
        if dt.is_finite() && dt > 0.0 {
            self.accumulator += dt;
        }

        let mut steps = 0;
        while self.accumulator >= self.step && steps < self.max_steps {
            self.accumulator -= self.step;
            steps += 1;
        }
        if steps == self.max_steps {
            self.accumulator = self.accumulator.min(self.step);
        }
        steps
    }

    /// Step length in seconds
    pub fn step(&self) -> f32 {
        self.step
    }

    /// Unconsumed time
    pub fn remainder(&self) -> f32 {
        self.accumulator
    }

    /// Discard accumulated time
    pub fn reset(&mut self) {
        self.accumulator = 0.0;
    }
}

impl Default for FixedTimestep {
    fn default() -> Self {
        Self::new(1.0 / 60.0, 5)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fresh_wire_is_slack() {
        let start = Pos2::new(100.0, 100.0);
        let end = Pos2::new(400.0, 100.0);
        let wire = Wire::new(start, end, CableParams::panel());

        assert_eq!(wire.points().len(), 17);
        assert_eq!(wire.start(), start);
        assert_eq!(wire.end(), end);
        // 300 / 16, shortened by the 15% tension
        assert!((wire.rest_length() - 15.9375).abs() < 1e-4);
        // Peak sag sits in the middle, 5% of the span
        assert!((wire.points()[8].y - 115.0).abs() < 1e-3);
        assert!(wire.points()[4].y > 100.0);
    }

    #[test]
    fn test_straight_span_converges_for_each_preset() {
        let start = Pos2::new(100.0, 100.0);
        let end = Pos2::new(400.0, 100.0);

        for preset in [CableParams::panel(), CableParams::drag_preview()] {
            for iterations in [4, 8] {
                let params = preset.with_gravity(0.0).with_iterations(iterations);
                let mut wire = Wire::new(start, end, params);
                assert!(wire.max_deviation() > 10.0);

                for _ in 0..30 {
                    wire.step(start, end);
                }
                assert!(
                    wire.max_deviation() < 1.0,
                    "{params:?}: deviation {} after 30 steps",
                    wire.max_deviation()
                );

                for _ in 0..270 {
                    wire.step(start, end);
                }
                assert!(
                    wire.max_deviation() < 1.0,
                    "{params:?}: deviation {} after 300 steps",
                    wire.max_deviation()
                );
            }
        }
    }

    #[test]
    fn test_zero_tension_keeps_straight_span() {
        let params = CableParams { tension: 0.0, ..CableParams::panel() };
        let wire = Wire::new(Pos2::ZERO, Pos2::new(160.0, 0.0), params);

        assert!((wire.rest_length() - 10.0).abs() < 1e-4);
    }

    #[test]
    fn test_endpoints_pinned_after_every_step() {
        let mut wire = Wire::new(Pos2::new(0.0, 0.0), Pos2::new(200.0, 0.0), CableParams::panel());
        let mut start = Pos2::new(0.0, 0.0);
        let mut end = Pos2::new(200.0, 0.0);

        for frame in 0..120 {
            start += Vec2::new(1.5, -0.5);
            end += Vec2::new(-0.75, if frame % 2 == 0 { 3.0 } else { -2.0 });
            wire.step(start, end);

            assert_eq!(wire.start(), start);
            assert_eq!(wire.end(), end);
        }
    }

    #[test]
    fn test_drawn_out_cable_straightens_without_gravity() {
        let params = CableParams::drag_preview().with_gravity(0.0).with_iterations(4);
        let start = Pos2::new(100.0, 100.0);
        let mut wire = Wire::new(start, Pos2::new(110.0, 100.0), params);
        let end = Pos2::new(400.0, 100.0);

        for _ in 0..30 {
            wire.step(start, end);
        }
        assert!(wire.max_deviation() < 1.0, "deviation {}", wire.max_deviation());

        for _ in 0..30 {
            wire.step(start, end);
        }
        assert!(wire.max_deviation() < 1.0, "deviation {}", wire.max_deviation());
    }

    #[test]
    fn test_gravity_pulls_interior_down() {
        let start = Pos2::new(0.0, 0.0);
        let end = Pos2::new(300.0, 0.0);
        let mut wire = Wire::new(start, end, CableParams::panel());

        for _ in 0..240 {
            wire.step(start, end);
        }

        let middle = wire.points()[wire.segments() / 2];
        assert!(middle.y > 0.0);
        assert!(wire.points().iter().all(|p| p.x.is_finite() && p.y.is_finite()));
    }

    #[test]
    fn test_zero_length_wire_stays_finite() {
        let at = Pos2::new(50.0, 50.0);
        let mut wire = Wire::new(at, at, CableParams::drag_preview());

        for _ in 0..10 {
            wire.step(at, at + Vec2::new(40.0, 0.0));
        }

        assert!(wire.points().iter().all(|p| p.x.is_finite() && p.y.is_finite()));
    }

    #[test]
    fn test_zero_segments_clamped_to_one() {
        let params = CableParams { segments: 0, ..CableParams::panel() };
        let wire = Wire::new(Pos2::ZERO, Pos2::new(10.0, 0.0), params);

        assert_eq!(wire.segments(), 1);
        assert_eq!(wire.points().len(), 2);
    }

    #[test]
    fn test_fixed_timestep_is_refresh_rate_independent() {
        let mut at_60 = FixedTimestep::new(1.0 / 60.0, 5);
        let mut at_120 = FixedTimestep::new(1.0 / 60.0, 5);

        let steps_60: u32 = (0..60).map(|_| at_60.advance(1.0 / 60.0)).sum();
        let steps_120: u32 = (0..120).map(|_| at_120.advance(1.0 / 120.0)).sum();

        assert!((59..=60).contains(&steps_60));
        assert!((59..=60).contains(&steps_120));
    }

    #[test]
    fn test_fixed_timestep_caps_catch_up() {
        let mut timestep = FixedTimestep::new(1.0 / 60.0, 5);

        assert_eq!(timestep.advance(2.0), 5);
        assert!(timestep.remainder() <= timestep.step());

        timestep.reset();
        assert_eq!(timestep.advance(f32::NAN), 0);
        assert_eq!(timestep.advance(-1.0), 0);
        assert_eq!(timestep.remainder(), 0.0);
    }
}

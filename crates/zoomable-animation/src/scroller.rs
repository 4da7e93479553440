//! Bounded fling scroller.
//!
//! Simulates a decaying fling per axis inside `[min, max]` containment
//! bounds with an overshoot slack. While the trajectory stays inside the
//! bounds it follows the fling spline; on crossing a bound the remaining
//! motion becomes a critically damped spring that overshoots by at most
//! `slack` and converges back onto the bound. Starting out of bounds with
//! zero velocity yields a pure spring-back.

use crate::{FlingCalculator, FlingInfo};

/// Default spring time constant, in milliseconds.
const SPRING_TIME_CONSTANT_MS: f32 = 60.0;

/// Displacement below which a spring is considered settled.
const SETTLE_EPSILON: f32 = 0.5;

#[derive(Debug, Clone, Copy)]
enum Phase {
    Settled {
        position: f32,
    },
    Decay {
        start: f32,
        info: FlingInfo,
    },
    Spring {
        anchor: f32,
        displacement: f32,
        /// Velocity at spring start, in units per millisecond.
        velocity_ms: f32,
        tau_ms: f32,
        started_ms: i64,
    },
}

/// One axis of a bounded fling.
#[derive(Debug, Clone, Copy)]
pub struct AxisScroller {
    min: f32,
    max: f32,
    slack: f32,
    phase: Phase,
}

impl AxisScroller {
    pub fn new(
        start: f32,
        velocity: f32,
        min: f32,
        max: f32,
        slack: f32,
        calculator: &FlingCalculator,
    ) -> Self {
        let phase = if start < min {
            Self::spring_phase(min, start - min, velocity / 1000.0, slack, 0)
        } else if start > max {
            Self::spring_phase(max, start - max, velocity / 1000.0, slack, 0)
        } else if velocity == 0.0 {
            Phase::Settled { position: start }
        } else {
            Phase::Decay {
                start,
                info: calculator.fling_info(velocity),
            }
        };
        Self {
            min,
            max,
            slack,
            phase,
        }
    }

    fn spring_phase(
        anchor: f32,
        displacement: f32,
        velocity_ms: f32,
        slack: f32,
        started_ms: i64,
    ) -> Phase {
        // The time constant bounds the overshoot: a critically damped spring
        // released at the anchor peaks at |v| * tau / e.
        let tau_ms = if displacement == 0.0 && slack == 0.0 {
            0.0
        } else if velocity_ms.abs() > f32::EPSILON && slack > 0.0 {
            SPRING_TIME_CONSTANT_MS.min(slack * std::f32::consts::E / velocity_ms.abs())
        } else {
            SPRING_TIME_CONSTANT_MS
        };
        if tau_ms <= 0.0 {
            return Phase::Settled { position: anchor };
        }
        Phase::Spring {
            anchor,
            displacement,
            velocity_ms,
            tau_ms,
            started_ms,
        }
    }

    /// Whether no motion is pending.
    pub fn is_settled(&self) -> bool {
        matches!(self.phase, Phase::Settled { .. })
    }

    /// Position at `elapsed_ms` since the scroller started. Advances the
    /// internal phase, so calls must use non-decreasing times.
    pub fn position_at(&mut self, elapsed_ms: i64) -> f32 {
        match self.phase {
            Phase::Settled { position } => position,
            Phase::Decay { start, info } => {
                let raw = start + info.position(elapsed_ms);
                if raw < self.min || raw > self.max {
                    let anchor = raw.clamp(self.min, self.max);
                    let velocity_ms = info.velocity(elapsed_ms) / 1000.0;
                    self.phase =
                        Self::spring_phase(anchor, 0.0, velocity_ms, self.slack, elapsed_ms);
                    self.position_at(elapsed_ms)
                } else if info.is_finished(elapsed_ms) {
                    self.phase = Phase::Settled { position: raw };
                    raw
                } else {
                    raw
                }
            }
            Phase::Spring {
                anchor,
                displacement,
                velocity_ms,
                tau_ms,
                started_ms,
            } => {
                let s = (elapsed_ms - started_ms).max(0) as f32;
                let x = (displacement + (velocity_ms + displacement / tau_ms) * s)
                    * (-s / tau_ms).exp();
                if s >= tau_ms && x.abs() < SETTLE_EPSILON {
                    self.phase = Phase::Settled { position: anchor };
                    anchor
                } else {
                    anchor + x
                }
            }
        }
    }
}

/// Offsets produced by one scroller step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollerOffset {
    pub x: f32,
    pub y: f32,
    pub finished: bool,
}

/// Two-axis bounded fling, stepped once per frame by the caller.
#[derive(Debug, Clone, Copy)]
pub struct Scroller {
    x: AxisScroller,
    y: AxisScroller,
}

impl Scroller {
    pub fn new(x: AxisScroller, y: AxisScroller) -> Self {
        Self { x, y }
    }

    /// Whether both axes had nothing to do from the start.
    pub fn is_settled(&self) -> bool {
        self.x.is_settled() && self.y.is_settled()
    }

    /// Computes positions at `elapsed_ms` since the fling began.
    pub fn compute(&mut self, elapsed_ms: i64) -> ScrollerOffset {
        let x = self.x.position_at(elapsed_ms);
        let y = self.y.position_at(elapsed_ms);
        ScrollerOffset {
            x,
            y,
            finished: self.x.is_settled() && self.y.is_settled(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn calc() -> FlingCalculator {
        FlingCalculator::with_density(1.0)
    }

    fn run_to_rest(axis: &mut AxisScroller) -> f32 {
        let mut elapsed = 0;
        let mut position = axis.position_at(0);
        while !axis.is_settled() {
            elapsed += 16;
            position = axis.position_at(elapsed);
            assert!(elapsed < 60_000, "axis never settled");
        }
        position
    }

    #[test]
    fn at_rest_within_bounds_is_settled() {
        let axis = AxisScroller::new(-100.0, 0.0, -500.0, 0.0, 40.0, &calc());
        assert!(axis.is_settled());
    }

    #[test]
    fn free_fling_travels_the_spline_distance() {
        let calculator = calc();
        let info = calculator.fling_info(2000.0);
        let mut axis =
            AxisScroller::new(0.0, 2000.0, -1.0e9, 1.0e9, 0.0, &calculator);
        let end = run_to_rest(&mut axis);
        assert!((end - info.distance).abs() < info.distance * 0.05);
    }

    #[test]
    fn fling_into_edge_respects_slack_and_lands_on_edge() {
        let slack = 30.0;
        let mut axis = AxisScroller::new(-10.0, 8000.0, -200.0, 0.0, slack, &calc());
        let mut peak = -10.0f32;
        let mut elapsed = 0;
        axis.position_at(0);
        while !axis.is_settled() {
            elapsed += 16;
            peak = peak.max(axis.position_at(elapsed));
            assert!(elapsed < 60_000);
        }
        assert!(peak <= slack + 1.0, "overshoot {peak} exceeded slack");
        let end = axis.position_at(elapsed);
        assert!((end - 0.0).abs() < 1e-3, "should settle on the edge, got {end}");
    }

    #[test]
    fn out_of_bounds_release_springs_back() {
        let mut axis = AxisScroller::new(35.0, 0.0, -400.0, 0.0, 40.0, &calc());
        assert!(!axis.is_settled());
        let end = run_to_rest(&mut axis);
        assert!((end - 0.0).abs() < 1e-3);
    }

    #[test]
    fn edge_hit_without_slack_pins_immediately() {
        let mut axis = AxisScroller::new(0.0, 5000.0, -200.0, 0.0, 0.0, &calc());
        // First step crosses the max bound; with no slack the axis pins there.
        let mut elapsed = 0;
        while !axis.is_settled() {
            elapsed += 16;
            let position = axis.position_at(elapsed);
            assert!(position <= 0.0 + 1e-3);
            assert!(elapsed < 60_000);
        }
        assert_eq!(axis.position_at(elapsed), 0.0);
    }

    #[test]
    fn scroller_finishes_when_both_axes_finish() {
        let calculator = calc();
        let x = AxisScroller::new(0.0, 1500.0, -1000.0, 1000.0, 0.0, &calculator);
        let y = AxisScroller::new(0.0, 0.0, -1000.0, 1000.0, 0.0, &calculator);
        let mut scroller = Scroller::new(x, y);
        assert!(!scroller.is_settled());
        let mut elapsed = 0;
        loop {
            let offset = scroller.compute(elapsed);
            assert_eq!(offset.y, 0.0);
            if offset.finished {
                break;
            }
            elapsed += 16;
            assert!(elapsed < 60_000);
        }
    }

    #[test]
    fn zero_velocity_in_bounds_finishes_first_step() {
        let calculator = calc();
        let x = AxisScroller::new(-5.0, 0.0, -10.0, 0.0, 20.0, &calculator);
        let y = AxisScroller::new(-5.0, 0.0, -10.0, 0.0, 20.0, &calculator);
        let mut scroller = Scroller::new(x, y);
        assert!(scroller.is_settled());
        let offset = scroller.compute(0);
        assert!(offset.finished);
        assert_eq!(offset.x, -5.0);
    }
}

//! Velocity-decay physics for fling trajectories.
//!
//! The deceleration curve is the classic scroller spline: a cubic bezier
//! tension curve sampled into lookup tables, paired with a calculator that
//! turns a release velocity into a total travel distance and duration.

use std::sync::LazyLock;

/// Tension curve inflection point.
const INFLECTION: f32 = 0.35;
const START_TENSION: f32 = 0.5;
const END_TENSION: f32 = 1.0;
const P1: f32 = START_TENSION * INFLECTION;
const P2: f32 = 1.0 - END_TENSION * (1.0 - INFLECTION);

/// Number of samples in the spline lookup tables.
const NB_SAMPLES: usize = 100;

struct SplineData {
    positions: [f32; NB_SAMPLES + 1],
    times: [f32; NB_SAMPLES + 1],
}

/// Lazily computed spline tables.
static SPLINE_DATA: LazyLock<SplineData> = LazyLock::new(|| {
    let mut positions = [0.0f32; NB_SAMPLES + 1];
    let mut times = [0.0f32; NB_SAMPLES + 1];

    let mut x_min = 0.0f32;
    let mut y_min = 0.0f32;

    for i in 0..NB_SAMPLES {
        let alpha = i as f32 / NB_SAMPLES as f32;

        // Find x such that bezier(x) = alpha.
        let mut x_max = 1.0f32;
        let x;
        let coef;
        loop {
            let x_mid = x_min + (x_max - x_min) / 2.0;
            let c = 3.0 * x_mid * (1.0 - x_mid);
            let tx = c * ((1.0 - x_mid) * P1 + x_mid * P2) + x_mid * x_mid * x_mid;
            if (tx - alpha).abs() < 1e-5 {
                x = x_mid;
                coef = c;
                break;
            }
            if tx > alpha {
                x_max = x_mid;
            } else {
                x_min = x_mid;
            }
        }
        positions[i] = coef * ((1.0 - x) * START_TENSION + x) + x * x * x;

        // Find y for the time lookup.
        let mut y_max = 1.0f32;
        let y;
        let coef_y;
        loop {
            let y_mid = y_min + (y_max - y_min) / 2.0;
            let c = 3.0 * y_mid * (1.0 - y_mid);
            let dy = c * ((1.0 - y_mid) * START_TENSION + y_mid) + y_mid * y_mid * y_mid;
            if (dy - alpha).abs() < 1e-5 {
                y = y_mid;
                coef_y = c;
                break;
            }
            if dy > alpha {
                y_max = y_mid;
            } else {
                y_min = y_mid;
            }
        }
        times[i] = coef_y * ((1.0 - y) * P1 + y * P2) + y * y * y;
    }

    positions[NB_SAMPLES] = 1.0;
    times[NB_SAMPLES] = 1.0;

    SplineData { positions, times }
});

/// Result of sampling the fling spline.
#[derive(Debug, Clone, Copy)]
pub struct SplineSample {
    /// Fraction of the total distance traveled at this point (0.0 to 1.0).
    pub distance_coefficient: f32,
    /// Instantaneous velocity coefficient at this point.
    pub velocity_coefficient: f32,
}

/// Spline describing how a fling decelerates over its normalized lifetime.
pub struct FlingSpline;

impl FlingSpline {
    /// Sample the spline at a normalized time (0.0 to 1.0).
    pub fn sample(time: f32) -> SplineSample {
        let clamped_time = time.clamp(0.0, 1.0);
        let index = (NB_SAMPLES as f32 * clamped_time) as usize;

        let (distance_coef, velocity_coef) = if index < NB_SAMPLES {
            let t_inf = index as f32 / NB_SAMPLES as f32;
            let t_sup = (index + 1) as f32 / NB_SAMPLES as f32;
            let d_inf = SPLINE_DATA.positions[index];
            let d_sup = SPLINE_DATA.positions[index + 1];
            let vel = (d_sup - d_inf) / (t_sup - t_inf);
            let dist = d_inf + (clamped_time - t_inf) * vel;
            (dist, vel)
        } else {
            (1.0, 0.0)
        };

        SplineSample {
            distance_coefficient: distance_coef,
            velocity_coefficient: velocity_coef,
        }
    }

    /// Deceleration exponent for a given velocity and friction product.
    pub fn deceleration(velocity: f32, friction: f32) -> f64 {
        (INFLECTION as f64 * velocity.abs() as f64 / friction as f64).ln()
    }
}

/// Standard gravity in SI units (m/s²).
const GRAVITY_EARTH: f32 = 9.80665;
/// Inches per meter, for density conversion.
const INCHES_PER_METER: f32 = 39.37;
/// Deceleration rate constant, `(ln(0.78) / ln(0.9)).abs()`.
const DECELERATION_RATE: f32 = 2.358_201_6;

/// Physical deceleration for a friction coefficient at a given density.
fn compute_deceleration(friction: f32, density: f32) -> f32 {
    GRAVITY_EARTH * INCHES_PER_METER * density * 160.0 * friction
}

/// Precomputed trajectory of a single fling release.
#[derive(Debug, Clone, Copy)]
pub struct FlingInfo {
    /// Release velocity in units/sec.
    pub initial_velocity: f32,
    /// Total unsigned distance that will be traveled.
    pub distance: f32,
    /// Total duration in milliseconds.
    pub duration_ms: i64,
}

impl FlingInfo {
    /// Signed offset from the release position at `time_ms`.
    pub fn position(&self, time_ms: i64) -> f32 {
        let spline_pos = if self.duration_ms > 0 {
            time_ms as f32 / self.duration_ms as f32
        } else {
            1.0
        };
        self.distance
            * self.initial_velocity.signum()
            * FlingSpline::sample(spline_pos).distance_coefficient
    }

    /// Signed velocity at `time_ms`, in units/sec.
    pub fn velocity(&self, time_ms: i64) -> f32 {
        if self.duration_ms <= 0 {
            return 0.0;
        }
        let spline_pos = time_ms as f32 / self.duration_ms as f32;
        FlingSpline::sample(spline_pos).velocity_coefficient
            * self.initial_velocity.signum()
            * self.distance
            / self.duration_ms as f32
            * 1000.0
    }

    /// Whether the trajectory has run its course at `time_ms`.
    pub fn is_finished(&self, time_ms: i64) -> bool {
        time_ms >= self.duration_ms
    }
}

/// Calculator turning release velocities into decaying trajectories.
#[derive(Debug, Clone, Copy)]
pub struct FlingCalculator {
    friction: f32,
    physical_coefficient: f32,
}

impl FlingCalculator {
    /// Default scroll friction value.
    pub const DEFAULT_FRICTION: f32 = 0.015;

    /// Creates a calculator with an explicit friction coefficient.
    /// Higher friction means faster deceleration.
    pub fn new(friction: f32, density: f32) -> Self {
        Self {
            friction,
            physical_coefficient: compute_deceleration(0.84, density),
        }
    }

    /// Creates a calculator with default friction for the given density.
    pub fn with_density(density: f32) -> Self {
        Self::new(Self::DEFAULT_FRICTION, density)
    }

    fn spline_deceleration(&self, velocity: f32) -> f64 {
        FlingSpline::deceleration(velocity, self.friction * self.physical_coefficient)
    }

    /// Duration of a fling in milliseconds.
    pub fn fling_duration(&self, velocity: f32) -> i64 {
        let l = self.spline_deceleration(velocity);
        let decel_minus_one = DECELERATION_RATE as f64 - 1.0;
        (1000.0 * (l / decel_minus_one).exp()) as i64
    }

    /// Total unsigned distance a fling will travel.
    pub fn fling_distance(&self, velocity: f32) -> f32 {
        let l = self.spline_deceleration(velocity);
        let decel_minus_one = DECELERATION_RATE as f64 - 1.0;
        self.friction
            * self.physical_coefficient
            * (DECELERATION_RATE as f64 / decel_minus_one * l).exp() as f32
    }

    /// Complete trajectory information for a release velocity.
    pub fn fling_info(&self, velocity: f32) -> FlingInfo {
        if velocity == 0.0 {
            return FlingInfo {
                initial_velocity: 0.0,
                distance: 0.0,
                duration_ms: 0,
            };
        }
        FlingInfo {
            initial_velocity: velocity,
            distance: self.fling_distance(velocity),
            duration_ms: self.fling_duration(velocity),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spline_endpoints() {
        let start = FlingSpline::sample(0.0);
        assert!((start.distance_coefficient - 0.0).abs() < 0.01);

        let end = FlingSpline::sample(1.0);
        assert!((end.distance_coefficient - 1.0).abs() < 0.01);
    }

    #[test]
    fn spline_is_monotonic() {
        let mut prev = 0.0;
        for i in 0..=100 {
            let t = i as f32 / 100.0;
            let sample = FlingSpline::sample(t);
            assert!(
                sample.distance_coefficient >= prev,
                "spline should be monotonically increasing"
            );
            prev = sample.distance_coefficient;
        }
    }

    #[test]
    fn faster_release_travels_further_and_longer() {
        let calc = FlingCalculator::with_density(1.0);

        let velocity = 5000.0;
        let duration = calc.fling_duration(velocity);
        let distance = calc.fling_distance(velocity);

        assert!(duration > 0);
        assert!(distance > 0.0);

        let high_velocity = 10000.0;
        assert!(calc.fling_duration(high_velocity) > duration);
        assert!(calc.fling_distance(high_velocity) > distance);
    }

    #[test]
    fn trajectory_ends_at_total_distance() {
        let calc = FlingCalculator::with_density(1.0);
        let info = calc.fling_info(5000.0);

        assert!((info.position(0)).abs() < 1.0);
        let end = info.position(info.duration_ms);
        assert!(
            (end - info.distance).abs() < info.distance * 0.02,
            "end offset {end} should be near total distance {}",
            info.distance
        );
        assert!(info.is_finished(info.duration_ms));
    }

    #[test]
    fn negative_velocity_moves_backwards() {
        let calc = FlingCalculator::with_density(1.0);
        let info = calc.fling_info(-5000.0);
        assert!(info.position(info.duration_ms / 2) < 0.0);
    }

    #[test]
    fn zero_velocity_is_an_empty_trajectory() {
        let calc = FlingCalculator::with_density(1.0);
        let info = calc.fling_info(0.0);
        assert_eq!(info.distance, 0.0);
        assert!(info.is_finished(0));
    }
}

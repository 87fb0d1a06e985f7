#![cfg_attr(not(any(test, feature = "std")), no_std)]
#![warn(missing_docs)]
#![doc = "A `no_std` library for open-loop velocity profiles for differential-drive robots."]
#![doc = ""]
#![doc = "This crate provides structures and functions for planning constant and trapezoidal"]
#![doc = "velocity profiles over a fixed travel distance, and for stepping the commanded"]
#![doc = "velocity against elapsed time until the goal time is reached."]

use core::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

pub mod error;
pub use error::ProfileError;

/// Cruise velocity (m/s) of the constant profile.
pub const CONSTANT_CRUISE_VELOCITY: f64 = 0.1;

/// Peak velocity (m/s) of the trapezoidal profile.
pub const TRAPEZOIDAL_MAX_VELOCITY: f64 = 0.22;

/// Fraction of the peak velocity covered on average by the trapezoidal
/// profile: quarter ramp-up, half cruise, quarter ramp-down gives
/// `distance = (3/4) * total_time * max_velocity`.
pub const TRAPEZOIDAL_AVERAGE_FACTOR: f64 = 0.75;

/// Nominal control tick period (s) the acceleration increment is derived
/// from. The scheduler is expected to run at this rate (100 Hz).
pub const NOMINAL_TICK_INTERVAL: f64 = 0.01;

/// The shape of the velocity profile over a run.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProfileKind {
    /// Fixed velocity applied instantaneously from the first tick.
    Constant,
    /// Uniform acceleration, cruise at peak velocity, uniform deceleration.
    Trapezoidal,
}

impl ProfileKind {
    /// Map an operator-facing selection integer to a profile kind.
    ///
    /// `1` selects the constant profile, `2` the trapezoidal profile.
    ///
    /// # Errors
    ///
    /// Returns `Err(ProfileError::InvalidProfileSelection)` for any other value.
    pub const fn from_selection(selection: u8) -> Result<Self, ProfileError> {
        match selection {
            1 => Ok(ProfileKind::Constant),
            2 => Ok(ProfileKind::Trapezoidal),
            _ => Err(ProfileError::InvalidProfileSelection(
                "must be 1 (constant) or 2 (trapezoidal)",
            )),
        }
    }

    /// Peak velocity (m/s) commanded by this profile kind.
    pub const fn max_velocity(&self) -> f64 {
        match self {
            ProfileKind::Constant => CONSTANT_CRUISE_VELOCITY,
            ProfileKind::Trapezoidal => TRAPEZOIDAL_MAX_VELOCITY,
        }
    }

    /// Average velocity (m/s) over a whole run of this profile kind.
    pub const fn average_velocity(&self) -> f64 {
        match self {
            ProfileKind::Constant => CONSTANT_CRUISE_VELOCITY,
            ProfileKind::Trapezoidal => TRAPEZOIDAL_AVERAGE_FACTOR * TRAPEZOIDAL_MAX_VELOCITY,
        }
    }
}

impl fmt::Display for ProfileKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProfileKind::Constant => write!(f, "constant"),
            ProfileKind::Trapezoidal => write!(f, "trapezoidal"),
        }
    }
}

/// Mutable per-run state owned by the scheduler loop.
///
/// `current_velocity` is the only field mutated per tick; `finished`
/// transitions false to true exactly once and is terminal.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RunState {
    /// Velocity (m/s) commanded on the most recent tick.
    pub current_velocity: f64,
    /// Whether the goal time has been reached.
    pub finished: bool,
}

impl RunState {
    /// A fresh run state, at rest and not finished.
    pub const fn new() -> Self {
        RunState {
            current_velocity: 0.0,
            finished: false,
        }
    }
}

impl fmt::Display for RunState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "(v: {:.3} m/s, finished: {})",
            self.current_velocity, self.finished
        )
    }
}

/// The stepper's output for one tick.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct StepCommand {
    /// Linear velocity (m/s) to forward to the command sink.
    pub velocity: f64,
    /// True once the goal time has been reached; the velocity is then zero
    /// and no further ticks need to be scheduled.
    pub done: bool,
}

impl fmt::Display for StepCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(v: {:.3} m/s, done: {})", self.velocity, self.done)
    }
}

/// An immutable open-loop motion plan over a fixed distance.
///
/// Computed once at the start of a run; holds the profile kind, the peak
/// velocity, and the closed-form total travel time. Read-only after creation.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MotionPlan {
    /// Target travel distance (m).
    distance: f64,
    /// Selected profile shape.
    kind: ProfileKind,
    /// Peak commanded velocity (m/s).
    max_velocity: f64,
    /// Total travel time (s), `distance / average_velocity(kind)`.
    total_time: f64,
}

impl MotionPlan {
    /// Plan an open-loop move over `distance` meters with the given profile.
    ///
    /// The total travel time follows from the profile's average velocity:
    /// `distance / 0.1` for the constant profile, `distance / 0.165` for the
    /// trapezoidal profile.
    ///
    /// # Arguments
    ///
    /// * `distance`: Target travel distance in meters.
    /// * `kind`: The velocity profile to follow.
    ///
    /// # Errors
    ///
    /// Returns `Err(ProfileError::InvalidDistance)` if `distance` is not
    /// positive or not finite.
    pub fn new(distance: f64, kind: ProfileKind) -> Result<Self, ProfileError> {
        if !distance.is_finite() {
            return Err(ProfileError::InvalidDistance("must be finite"));
        }
        if distance <= 0.0 {
            return Err(ProfileError::InvalidDistance("must be positive"));
        }
        Ok(MotionPlan {
            distance,
            kind,
            max_velocity: kind.max_velocity(),
            total_time: distance / kind.average_velocity(),
        })
    }

    /// Returns the target travel distance (m).
    pub fn distance(&self) -> f64 {
        self.distance
    }

    /// Returns the profile kind.
    pub fn kind(&self) -> ProfileKind {
        self.kind
    }

    /// Returns the peak commanded velocity (m/s).
    pub fn max_velocity(&self) -> f64 {
        self.max_velocity
    }

    /// Returns the total travel time (s).
    pub fn total_time(&self) -> f64 {
        self.total_time
    }

    /// Per-tick velocity increment (m/s) during the trapezoidal ramps.
    ///
    /// Uniform acceleration over the first quarter of the run gives
    /// `a = max_velocity / (total_time / 4)`; sampled at the nominal 0.01 s
    /// tick this is `0.0088 / total_time` for the 0.22 m/s peak.
    pub fn tick_increment(&self) -> f64 {
        4.0 * self.max_velocity * NOMINAL_TICK_INTERVAL / self.total_time
    }

    /// Compute the velocity command for the tick at `elapsed` seconds since
    /// the run started.
    ///
    /// Phase selection is purely time-based:
    ///
    /// * At or past `total_time` the run is terminal: the velocity is forced
    ///   to zero, `state.finished` is set, and every subsequent call returns
    ///   `(0, true)` without recomputation.
    /// * The constant profile commands `max_velocity` on every running tick.
    /// * The trapezoidal profile ramps up over the first quarter of the run
    ///   (clamped to `max_velocity`), cruises over the central half, and ramps
    ///   down over the last quarter (floored at zero).
    ///
    /// # Arguments
    ///
    /// * `state`: The run state; `current_velocity` is updated in place.
    /// * `elapsed`: Seconds since the run started.
    ///
    /// # Errors
    ///
    /// Returns `Err(ProfileError::UnsupportedProfile)` if `elapsed` is not
    /// finite, since no phase can be selected. Callers must treat this as
    /// fatal and command zero velocity before aborting the run.
    pub fn step(&self, state: &mut RunState, elapsed: f64) -> Result<StepCommand, ProfileError> {
        if !elapsed.is_finite() {
            return Err(ProfileError::UnsupportedProfile(
                "elapsed time is not finite, no phase applies",
            ));
        }

        if state.finished || elapsed >= self.total_time {
            state.current_velocity = 0.0;
            state.finished = true;
            return Ok(StepCommand {
                velocity: 0.0,
                done: true,
            });
        }

        let next_velocity = match self.kind {
            ProfileKind::Constant => self.max_velocity,
            ProfileKind::Trapezoidal => {
                if elapsed < self.total_time / 4.0 {
                    // Ramp up, clamped so tick-timing drift cannot overshoot
                    // the cruise setpoint.
                    (state.current_velocity + self.tick_increment()).min(self.max_velocity)
                } else if elapsed < self.total_time * 3.0 / 4.0 {
                    self.max_velocity
                } else {
                    (state.current_velocity - self.tick_increment()).max(0.0)
                }
            }
        };

        state.current_velocity = next_velocity;
        Ok(StepCommand {
            velocity: next_velocity,
            done: false,
        })
    }
}

impl fmt::Display for MotionPlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "MotionPlan ({} profile, d: {:.2} m, v_max: {:.2} m/s, T: {:.2} s)",
            self.kind, self.distance, self.max_velocity, self.total_time
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    const EPSILON: f64 = 1e-9;

    #[test]
    fn test_selection_mapping() {
        assert_eq!(ProfileKind::from_selection(1), Ok(ProfileKind::Constant));
        assert_eq!(ProfileKind::from_selection(2), Ok(ProfileKind::Trapezoidal));
        for bad in [0u8, 3, 255] {
            assert!(matches!(
                ProfileKind::from_selection(bad),
                Err(ProfileError::InvalidProfileSelection(
                    "must be 1 (constant) or 2 (trapezoidal)"
                ))
            ));
        }
    }

    #[test]
    fn test_plan_constant_total_time() {
        // T = d / 0.1 for any positive distance
        for distance in [0.25, 1.0, 2.5, 10.0] {
            let plan = MotionPlan::new(distance, ProfileKind::Constant).unwrap();
            assert!((plan.total_time() - distance / 0.1).abs() < EPSILON);
            assert!((plan.max_velocity() - 0.1).abs() < EPSILON);
        }
    }

    #[test]
    fn test_plan_trapezoidal_total_time() {
        // Average velocity = 0.75 * 0.22 = 0.165 m/s, so T = d / 0.165
        for distance in [0.25, 1.0, 2.5, 10.0] {
            let plan = MotionPlan::new(distance, ProfileKind::Trapezoidal).unwrap();
            assert!((plan.total_time() - distance / 0.165).abs() < EPSILON);
            assert!((plan.max_velocity() - 0.22).abs() < EPSILON);
        }
    }

    #[test]
    fn test_plan_invalid_distance() {
        for bad in [0.0, -1.0] {
            let result = MotionPlan::new(bad, ProfileKind::Constant);
            assert!(matches!(
                result,
                Err(ProfileError::InvalidDistance("must be positive"))
            ));
        }
        for bad in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            let result = MotionPlan::new(bad, ProfileKind::Trapezoidal);
            assert!(matches!(
                result,
                Err(ProfileError::InvalidDistance("must be finite"))
            ));
        }
    }

    #[test]
    fn test_constant_scenario_one_meter() {
        // d = 1.0 m at 0.1 m/s => T = 10.0 s
        let plan = MotionPlan::new(1.0, ProfileKind::Constant).unwrap();
        assert!((plan.total_time() - 10.0).abs() < EPSILON);

        let mut state = RunState::new();
        // Mid-run: full cruise velocity
        let cmd = plan.step(&mut state, 5.0).unwrap();
        assert!((cmd.velocity - 0.1).abs() < EPSILON);
        assert!(!cmd.done);
        // At the goal time: halted
        let cmd = plan.step(&mut state, 10.0).unwrap();
        assert!((cmd.velocity - 0.0).abs() < EPSILON);
        assert!(cmd.done);
        assert!(state.finished);
    }

    #[test]
    fn test_constant_velocity_every_tick() {
        let plan = MotionPlan::new(0.5, ProfileKind::Constant).unwrap(); // T = 5.0 s
        let mut state = RunState::new();
        let mut elapsed = 0.0;
        while elapsed < plan.total_time() {
            let cmd = plan.step(&mut state, elapsed).unwrap();
            assert!((cmd.velocity - 0.1).abs() < EPSILON);
            assert!(!cmd.done);
            elapsed += 0.01;
        }
        let cmd = plan.step(&mut state, plan.total_time()).unwrap();
        assert!(cmd.done);
        assert!((cmd.velocity - 0.0).abs() < EPSILON);
    }

    #[test]
    fn test_trapezoidal_scenario_one_meter() {
        // d = 1.0 m => T = 1.0 / 0.165 ~= 6.06 s, T/4 ~= 1.515 s
        let plan = MotionPlan::new(1.0, ProfileKind::Trapezoidal).unwrap();
        assert!((plan.total_time() - 6.0606060606060606).abs() < 1e-9);

        // Simulate 100 Hz ticks up to elapsed = 1.0 s (inside the ramp)
        let mut state = RunState::new();
        let mut elapsed = 0.0;
        let mut previous = 0.0;
        while elapsed <= 1.0 {
            let cmd = plan.step(&mut state, elapsed).unwrap();
            assert!(cmd.velocity > 0.0);
            assert!(cmd.velocity < 0.22);
            assert!(cmd.velocity > previous); // strictly increasing tick-over-tick
            previous = cmd.velocity;
            elapsed += 0.01;
        }

        // elapsed = 3.0 s is in the cruise window [T/4, 3T/4)
        let cmd = plan.step(&mut state, 3.0).unwrap();
        assert!((cmd.velocity - 0.22).abs() < EPSILON);
        assert!(!cmd.done);
    }

    #[test]
    fn test_trapezoidal_full_run_phases() {
        let plan = MotionPlan::new(2.0, ProfileKind::Trapezoidal).unwrap();
        let total = plan.total_time();
        let mut state = RunState::new();
        let mut elapsed = 0.0;
        let mut previous = 0.0;

        while elapsed < total {
            let cmd = plan.step(&mut state, elapsed).unwrap();
            assert!(!cmd.done);
            assert!(cmd.velocity >= 0.0);
            assert!(cmd.velocity <= 0.22 + EPSILON);
            if elapsed < total / 4.0 {
                // Ramp up: monotonically non-decreasing
                assert!(cmd.velocity >= previous - EPSILON);
            } else if elapsed < total * 3.0 / 4.0 {
                assert!((cmd.velocity - 0.22).abs() < EPSILON);
            } else {
                // Ramp down: monotonically non-increasing
                assert!(cmd.velocity <= previous + EPSILON);
            }
            previous = cmd.velocity;
            elapsed += 0.01;
        }

        let cmd = plan.step(&mut state, total).unwrap();
        assert!(cmd.done);
        assert!((cmd.velocity - 0.0).abs() < EPSILON);
    }

    #[test]
    fn test_trapezoidal_ramp_clamps_at_max() {
        let plan = MotionPlan::new(1.0, ProfileKind::Trapezoidal).unwrap();
        let mut state = RunState::new();
        state.current_velocity = 0.2199; // one increment would overshoot
        let cmd = plan.step(&mut state, 0.5).unwrap(); // inside the ramp window
        assert!((cmd.velocity - 0.22).abs() < EPSILON);
    }

    #[test]
    fn test_trapezoidal_ramp_down_floors_at_zero() {
        let plan = MotionPlan::new(1.0, ProfileKind::Trapezoidal).unwrap();
        let total = plan.total_time();
        let mut state = RunState::new();
        state.current_velocity = plan.tick_increment() / 2.0; // below one decrement
        let cmd = plan.step(&mut state, total * 0.9).unwrap();
        assert!((cmd.velocity - 0.0).abs() < EPSILON);
        assert!(!cmd.done); // still inside the run, just at rest
    }

    #[test]
    fn test_terminal_state_is_idempotent() {
        let plan = MotionPlan::new(1.0, ProfileKind::Trapezoidal).unwrap();
        let total = plan.total_time();
        let mut state = RunState::new();

        let cmd = plan.step(&mut state, total).unwrap();
        assert!(cmd.done);
        for elapsed in [total, total + 0.01, total + 100.0] {
            let cmd = plan.step(&mut state, elapsed).unwrap();
            assert!(cmd.done);
            assert!((cmd.velocity - 0.0).abs() < EPSILON);
            assert!(state.finished);
        }
    }

    #[test]
    fn test_tick_increment_matches_derivation() {
        // a = 0.22 / (T/4) = 0.88 / T; increment = a * 0.01 = 0.0088 / T
        let plan = MotionPlan::new(1.0, ProfileKind::Trapezoidal).unwrap();
        let expected = 0.0088 / plan.total_time();
        assert!((plan.tick_increment() - expected).abs() < EPSILON);
    }

    #[test]
    fn test_non_finite_elapsed_is_unsupported() {
        let plan = MotionPlan::new(1.0, ProfileKind::Constant).unwrap();
        let mut state = RunState::new();
        for bad in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            let result = plan.step(&mut state, bad);
            assert!(matches!(result, Err(ProfileError::UnsupportedProfile(_))));
        }
        // The failed calls must not have flipped the state to finished
        assert!(!state.finished);
    }
}

//! Damped spring interpolation
//!
//! A [`Spring`] moves a value toward a target under a mass/tension/friction
//! model. Each call to [`Spring::sample`] advances the simulation by the
//! elapsed frame time using fixed 1 ms sub-steps, so the result does not
//! depend on how a frame interval happens to be sliced.
//!
//! Retargeting keeps both the current value and the velocity, so a spring
//! that is redirected mid-flight bends smoothly toward the new target.

use serde::{Deserialize, Serialize};

use crate::error::{ConfigurationError, SceneResult};
use crate::math::{self, Vec3};

/// Integration sub-step in seconds
pub const STEP: f32 = 0.001;

/// Maximum number of sub-steps per sample (one second of simulated time)
pub const MAX_SUBSTEPS: u32 = 1000;

/// Default distance from the target under which a spring may come to rest
pub const DEFAULT_PRECISION: f32 = 0.001;

/// Default speed under which a spring may come to rest
pub const DEFAULT_REST_VELOCITY: f32 = 0.001;

/// A value that can be driven by a [`Spring`].
pub trait Animatable: Copy + PartialEq + std::fmt::Debug {
    fn zero() -> Self;
    fn add(self, other: Self) -> Self;
    fn sub(self, other: Self) -> Self;
    fn scale(self, s: f32) -> Self;
    /// Largest absolute component, used for rest detection
    fn max_abs(self) -> f32;
}

impl Animatable for f32 {
    fn zero() -> Self {
        0.0
    }

    fn add(self, other: Self) -> Self {
        self + other
    }

    fn sub(self, other: Self) -> Self {
        self - other
    }

    fn scale(self, s: f32) -> Self {
        self * s
    }

    fn max_abs(self) -> f32 {
        self.abs()
    }
}

impl Animatable for Vec3 {
    fn zero() -> Self {
        [0.0; 3]
    }

    fn add(self, other: Self) -> Self {
        math::add(self, other)
    }

    fn sub(self, other: Self) -> Self {
        math::sub(self, other)
    }

    fn scale(self, s: f32) -> Self {
        math::scale(self, s)
    }

    fn max_abs(self) -> f32 {
        math::max_abs(self)
    }
}

/// Physical parameters of a spring
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpringConfig {
    /// Inertia of the animated value
    pub mass: f32,
    /// Stiffness pulling the value toward its target
    pub tension: f32,
    /// Velocity damping
    pub friction: f32,
    /// Distance to target under which the spring may rest
    #[serde(default = "default_precision")]
    pub precision: f32,
    /// Speed under which the spring may rest
    #[serde(default = "default_rest_velocity")]
    pub rest_velocity: f32,
}

fn default_precision() -> f32 {
    DEFAULT_PRECISION
}

fn default_rest_velocity() -> f32 {
    DEFAULT_REST_VELOCITY
}

impl Default for SpringConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl SpringConfig {
    /// Slightly heavy, lightly underdamped motion used for node layout changes
    pub const DEFAULT: SpringConfig = SpringConfig::preset(1.3, 180.0, 20.0);

    /// Softer, slower settling
    pub const GENTLE: SpringConfig = SpringConfig::preset(1.0, 120.0, 14.0);

    /// Close to critically damped: fast, no visible overshoot
    pub const STIFF: SpringConfig = SpringConfig::preset(1.0, 170.0, 26.0);

    const fn preset(mass: f32, tension: f32, friction: f32) -> Self {
        Self {
            mass,
            tension,
            friction,
            precision: DEFAULT_PRECISION,
            rest_velocity: DEFAULT_REST_VELOCITY,
        }
    }

    /// Create a validated configuration with default rest thresholds
    pub fn new(mass: f32, tension: f32, friction: f32) -> SceneResult<Self> {
        let config = Self::preset(mass, tension, friction);
        config.validate()?;
        Ok(config)
    }

    /// Check that every parameter is positive and finite
    pub fn validate(&self) -> SceneResult<()> {
        let params = [
            ("mass", self.mass),
            ("tension", self.tension),
            ("friction", self.friction),
            ("precision", self.precision),
            ("rest_velocity", self.rest_velocity),
        ];
        for (parameter, value) in params {
            if !(value.is_finite() && value > 0.0) {
                return Err(ConfigurationError::InvalidSpring { parameter, value });
            }
        }
        Ok(())
    }

    /// Damping ratio; 1.0 is critical damping
    pub fn damping_ratio(&self) -> f32 {
        self.friction / (2.0 * (self.tension * self.mass).sqrt())
    }
}

/// A spring-driven value converging toward a target
#[derive(Debug, Clone)]
pub struct Spring<T: Animatable> {
    value: T,
    velocity: T,
    target: T,
    config: SpringConfig,
    at_rest: bool,
}

impl<T: Animatable> Spring<T> {
    /// Create a spring resting at `initial`
    pub fn new(initial: T, config: SpringConfig) -> SceneResult<Self> {
        config.validate()?;
        Ok(Self {
            value: initial,
            velocity: T::zero(),
            target: initial,
            config,
            at_rest: true,
        })
    }

    /// Change the target. Value and velocity are kept.
    pub fn retarget(&mut self, target: T) {
        if target != self.target {
            self.target = target;
            self.at_rest = false;
        }
    }

    /// Jump straight to `value` and rest there
    pub fn set_immediate(&mut self, value: T) {
        self.value = value;
        self.target = value;
        self.velocity = T::zero();
        self.at_rest = true;
    }

    /// Advance by `dt` seconds and return the new value.
    ///
    /// Non-positive or non-finite `dt` leaves the spring untouched.
    pub fn sample(&mut self, dt: f32) -> T {
        if self.at_rest || !(dt.is_finite() && dt > 0.0) {
            return self.value;
        }

        let full_steps = (dt / STEP).floor() as u32;
        let remainder = dt - full_steps as f32 * STEP;
        let full_steps = full_steps.min(MAX_SUBSTEPS);

        for _ in 0..full_steps {
            self.step(STEP);
        }
        if remainder > 0.0 && full_steps < MAX_SUBSTEPS {
            self.step(remainder);
        }

        self.settle();
        self.value
    }

    fn step(&mut self, h: f32) {
        let SpringConfig {
            mass,
            tension,
            friction,
            ..
        } = self.config;
        let displacement = self.value.sub(self.target);
        let force = displacement
            .scale(-tension)
            .add(self.velocity.scale(-friction));
        let acceleration = force.scale(1.0 / mass);

        // Semi-implicit Euler: velocity first, then position
        self.velocity = self.velocity.add(acceleration.scale(h));
        self.value = self.value.add(self.velocity.scale(h));
    }

    fn settle(&mut self) {
        let near = self.value.sub(self.target).max_abs() < self.config.precision;
        let slow = self.velocity.max_abs() < self.config.rest_velocity;
        if near && slow {
            self.value = self.target;
            self.velocity = T::zero();
            self.at_rest = true;
        }
    }

    pub fn value(&self) -> T {
        self.value
    }

    pub fn target(&self) -> T {
        self.target
    }

    pub fn velocity(&self) -> T {
        self.velocity
    }

    pub fn config(&self) -> &SpringConfig {
        &self.config
    }

    /// True once the value has settled exactly on the target
    pub fn is_at_rest(&self) -> bool {
        self.at_rest
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FRAME: f32 = 1.0 / 60.0;

    #[test]
    fn rejects_non_positive_parameters() {
        assert_eq!(
            SpringConfig::new(0.0, 180.0, 20.0),
            Err(ConfigurationError::InvalidSpring {
                parameter: "mass",
                value: 0.0
            })
        );
        assert!(matches!(
            SpringConfig::new(1.0, -1.0, 20.0),
            Err(ConfigurationError::InvalidSpring {
                parameter: "tension",
                ..
            })
        ));
        assert!(matches!(
            SpringConfig::new(1.0, 180.0, f32::NAN),
            Err(ConfigurationError::InvalidSpring {
                parameter: "friction",
                ..
            })
        ));
    }

    #[test]
    fn spring_new_validates_config() {
        let config = SpringConfig {
            friction: 0.0,
            ..SpringConfig::DEFAULT
        };
        assert!(Spring::new(0.0_f32, config).is_err());
    }

    #[test]
    fn presets_are_valid() {
        for config in [SpringConfig::DEFAULT, SpringConfig::GENTLE, SpringConfig::STIFF] {
            assert!(config.validate().is_ok());
            assert!(config.damping_ratio() > 0.6);
        }
    }

    #[test]
    fn new_spring_is_at_rest() {
        let mut spring = Spring::new([1.0, 2.0, 3.0], SpringConfig::DEFAULT).unwrap();
        assert!(spring.is_at_rest());
        assert_eq!(spring.sample(FRAME), [1.0, 2.0, 3.0]);
    }

    #[test]
    fn converges_exactly_to_target() {
        let mut spring = Spring::new([-2.0, 1.0, 3.0], SpringConfig::DEFAULT).unwrap();
        spring.retarget([3.0, 4.0, -4.0]);

        for _ in 0..600 {
            spring.sample(FRAME);
        }

        assert!(spring.is_at_rest());
        assert_eq!(spring.value(), [3.0, 4.0, -4.0]);
        assert_eq!(spring.velocity(), [0.0, 0.0, 0.0]);
    }

    #[test]
    fn overshoot_stays_bounded() {
        let mut spring = Spring::new(0.0_f32, SpringConfig::DEFAULT).unwrap();
        spring.retarget(10.0);

        let mut peak = 0.0_f32;
        for _ in 0..600 {
            peak = peak.max(spring.sample(FRAME));
        }

        assert!(peak < 11.0, "overshoot too large: {peak}");
        assert_eq!(spring.value(), 10.0);
    }

    #[test]
    fn stiff_preset_approaches_monotonically() {
        let mut spring = Spring::new(0.0_f32, SpringConfig::STIFF).unwrap();
        spring.retarget(5.0);

        let mut previous = 5.0_f32;
        for _ in 0..300 {
            let distance = (5.0 - spring.sample(FRAME)).abs();
            assert!(distance <= previous + 1e-6);
            previous = distance;
        }
        assert_eq!(spring.value(), 5.0);
    }

    #[test]
    fn retarget_mid_flight_keeps_value_and_velocity() {
        let mut spring = Spring::new(0.0_f32, SpringConfig::DEFAULT).unwrap();
        spring.retarget(10.0);
        for _ in 0..10 {
            spring.sample(FRAME);
        }

        let value = spring.value();
        let velocity = spring.velocity();
        assert!(velocity > 0.0);

        spring.retarget(-10.0);
        assert_eq!(spring.value(), value);
        assert_eq!(spring.velocity(), velocity);

        // Momentum carries it a little further before turning around
        let next = spring.sample(0.001);
        assert!(next > value);
        assert!((next - value).abs() < 0.1);
    }

    #[test]
    fn zero_and_invalid_dt_do_nothing() {
        let mut spring = Spring::new(0.0_f32, SpringConfig::DEFAULT).unwrap();
        spring.retarget(1.0);
        assert_eq!(spring.sample(0.0), 0.0);
        assert_eq!(spring.sample(-0.5), 0.0);
        assert_eq!(spring.sample(f32::NAN), 0.0);
        assert!(!spring.is_at_rest());
    }

    #[test]
    fn result_does_not_depend_on_frame_slicing() {
        let mut coarse = Spring::new(0.0_f32, SpringConfig::DEFAULT).unwrap();
        let mut fine = coarse.clone();
        coarse.retarget(4.0);
        fine.retarget(4.0);

        coarse.sample(0.032);
        fine.sample(0.016);
        fine.sample(0.016);

        assert!((coarse.value() - fine.value()).abs() < 1e-4);
    }

    #[test]
    fn set_immediate_rests_at_value() {
        let mut spring = Spring::new(0.0_f32, SpringConfig::DEFAULT).unwrap();
        spring.retarget(3.0);
        spring.sample(FRAME);
        spring.set_immediate(7.0);
        assert!(spring.is_at_rest());
        assert_eq!(spring.sample(FRAME), 7.0);
        assert_eq!(spring.target(), 7.0);
    }
}

//! Camera that eases toward the active view's camera position
//!
//! Only the position is animated. Orientation belongs to the external
//! viewport controls, which orbit around a fixed `look_at` pivot.

use crate::error::{ConfigurationError, SceneResult};
use crate::frame::CameraSnapshot;
use crate::math::{self, Vec3};

/// Fraction of the remaining distance covered per 60 Hz frame
pub const DEFAULT_FOLLOW_RATE: f32 = 0.02;

/// Frame rate at which `follow_rate` applies unscaled
pub const REFERENCE_FPS: f32 = 60.0;

/// Per-axis distance under which the camera snaps onto its target
const EPSILON: f32 = 0.001;

/// Default orbit pivot
pub const DEFAULT_LOOK_AT: Vec3 = [0.0, 3.0, 0.0];

#[derive(Debug, Clone)]
pub struct CameraFollower {
    position: Vec3,
    target: Vec3,
    look_at: Vec3,
    follow_rate: f32,
    is_animating: bool,
}

impl CameraFollower {
    /// Create a camera at rest at `position`
    pub fn new(position: Vec3, follow_rate: f32) -> SceneResult<Self> {
        if !(follow_rate > 0.0 && follow_rate < 1.0) {
            return Err(ConfigurationError::InvalidFollowRate(follow_rate));
        }
        Ok(Self {
            position,
            target: position,
            look_at: DEFAULT_LOOK_AT,
            follow_rate,
            is_animating: false,
        })
    }

    pub fn with_look_at(mut self, look_at: Vec3) -> Self {
        self.look_at = look_at;
        self
    }

    pub fn set_target(&mut self, target: Vec3) {
        self.target = target;
        self.is_animating = self.position != target;
    }

    /// Move toward the target; returns true while still moving
    pub fn tick(&mut self, dt: f32) -> bool {
        if !self.is_animating || !(dt.is_finite() && dt > 0.0) {
            return self.is_animating;
        }

        // Same easing per unit time whatever the frame rate
        let t = 1.0 - (1.0 - self.follow_rate).powf(dt * REFERENCE_FPS);
        let mut still_animating = false;
        for i in 0..3 {
            if (self.position[i] - self.target[i]).abs() > EPSILON {
                self.position[i] = math::lerp(self.position[i], self.target[i], t);
                still_animating = true;
            } else {
                self.position[i] = self.target[i];
            }
        }

        self.is_animating = still_animating;
        still_animating
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn target(&self) -> Vec3 {
        self.target
    }

    pub fn look_at(&self) -> Vec3 {
        self.look_at
    }

    pub fn is_animating(&self) -> bool {
        self.is_animating
    }

    pub fn snapshot(&self) -> CameraSnapshot {
        CameraSnapshot {
            position: self.position,
            target: self.target,
            look_at: self.look_at,
        }
    }
}

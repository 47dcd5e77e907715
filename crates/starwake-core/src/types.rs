//! Fundamental geometric and simulation types.
//!
//! World space is right-handed with +Y up. A ship's nose points along its
//! local -Z axis, matching the convention of the external scene graph.

use glam::{DQuat, DVec3};
use serde::{Deserialize, Serialize};

/// 3D position in world units.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

/// 3D velocity in world units per second.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Velocity {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

/// Rotation of an entity in world space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Orientation(pub DQuat);

/// Simulation time tracking.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct SimTime {
    /// Current tick number (increments by 1 each frame).
    pub tick: u64,
    /// Elapsed simulation time in seconds.
    pub elapsed_secs: f64,
}

impl Position {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Straight-line distance to another position.
    pub fn range_to(&self, other: &Position) -> f64 {
        self.to_dvec3().distance(other.to_dvec3())
    }

    pub fn to_dvec3(self) -> DVec3 {
        DVec3::new(self.x, self.y, self.z)
    }

    pub fn from_dvec3(v: DVec3) -> Self {
        Self::new(v.x, v.y, v.z)
    }

    /// Position offset by `delta`.
    pub fn offset(&self, delta: DVec3) -> Self {
        Self::from_dvec3(self.to_dvec3() + delta)
    }
}

impl Velocity {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Speed magnitude.
    pub fn speed(&self) -> f64 {
        self.to_dvec3().length()
    }

    pub fn to_dvec3(self) -> DVec3 {
        DVec3::new(self.x, self.y, self.z)
    }

    pub fn from_dvec3(v: DVec3) -> Self {
        Self::new(v.x, v.y, v.z)
    }
}

impl Default for Orientation {
    fn default() -> Self {
        Self(DQuat::IDENTITY)
    }
}

impl Orientation {
    /// Orientation whose forward axis points along `direction`.
    /// Falls back to identity for a zero-length direction.
    pub fn looking_along(direction: DVec3) -> Self {
        let dir = direction.normalize_or_zero();
        if dir == DVec3::ZERO {
            return Self::default();
        }
        Self(DQuat::from_rotation_arc(DVec3::NEG_Z, dir))
    }

    pub fn forward(&self) -> DVec3 {
        self.0 * DVec3::NEG_Z
    }

    pub fn up(&self) -> DVec3 {
        self.0 * DVec3::Y
    }

    pub fn right(&self) -> DVec3 {
        self.0 * DVec3::X
    }

    /// Apply yaw/pitch/roll (radians) about the entity's local axes.
    pub fn rotate_local(&mut self, yaw: f64, pitch: f64, roll: f64) {
        let local = DQuat::from_rotation_y(yaw)
            * DQuat::from_rotation_x(pitch)
            * DQuat::from_rotation_z(roll);
        self.0 = (self.0 * local).normalize();
    }
}

impl SimTime {
    /// Seconds per tick at the fixed frame rate.
    pub fn dt(&self) -> f64 {
        crate::constants::DT
    }

    /// Advance by one tick.
    pub fn advance(&mut self) {
        self.tick += 1;
        self.elapsed_secs += self.dt();
    }
}

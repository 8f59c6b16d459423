//! # Components
//!
//! The fixed component set of the archetype: position, velocity and health.
//! Components are plain data; chunks split them field-by-field into columns.

use bytemuck::{Pod, Zeroable};

/// Position component, in world units.
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
#[repr(C)]
pub struct Position {
    /// X coordinate.
    pub x: f32,
    /// Y coordinate.
    pub y: f32,
}

impl Position {
    /// Creates a new position.
    #[inline]
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Returns this position advanced by `velocity * dt`.
    ///
    /// Single precision, multiply then add, no fused multiply-add. This is
    /// the per-row arithmetic every move kernel reproduces.
    #[inline]
    #[must_use]
    pub fn integrate(self, velocity: Velocity, dt: f32) -> Self {
        Self {
            x: self.x + velocity.x * dt,
            y: self.y + velocity.y * dt,
        }
    }
}

/// Velocity component, in world units per time unit.
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
#[repr(C)]
pub struct Velocity {
    /// X velocity.
    pub x: f32,
    /// Y velocity.
    pub y: f32,
}

impl Velocity {
    /// Creates a new velocity.
    #[inline]
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Health component. Decays by one per damage pass, floored at zero.
pub type Health = i32;

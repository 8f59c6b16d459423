//! # System Kernels
//!
//! Per-chunk row loops for the move and damage systems, one implementation
//! per [`SimdBackend`]. A [`Kernels`] table binds one backend behind plain
//! function pointers so the executor never branches on the backend per chunk.
//!
//! All backends share the same arithmetic:
//!
//! ```text
//! move:   pos[i] = pos[i] + (vel[i] * dt)        f32, multiply then add
//! damage: health[i] = max(health[i] - 1, 0)      i32, wrapping subtract
//! ```

mod lanes;
mod scalar;

#[cfg(target_arch = "x86_64")]
mod avx2;

use std::fmt;

use super::backend::SimdBackend;
use crate::ecs::{Chunk, Health, MotionColumns};
use crate::error::{SwarmError, SwarmResult};

/// Signature of a move kernel: integrate every row of `cols` over `dt`.
pub type MoveKernel = fn(MotionColumns<'_>, f32);

/// Signature of a damage kernel: decay every health value by one.
pub type DamageKernel = fn(&mut [Health]);

/// A backend's kernels, bound once.
#[derive(Clone, Copy)]
pub struct Kernels {
    /// Backend the pointers belong to.
    backend: SimdBackend,
    /// Move kernel.
    move_rows: MoveKernel,
    /// Damage kernel.
    damage_rows: DamageKernel,
}

impl Kernels {
    /// Binds the kernels of `backend`.
    ///
    /// # Errors
    ///
    /// Returns [`SwarmError::UnsupportedBackend`] if this CPU cannot run it.
    pub fn new(backend: SimdBackend) -> SwarmResult<Self> {
        let (move_rows, damage_rows): (MoveKernel, DamageKernel) = match backend {
            SimdBackend::Scalar => (scalar::move_rows, scalar::damage_rows),
            SimdBackend::Lanes4 => (lanes::move_rows::<4>, lanes::damage_rows::<4>),
            SimdBackend::Lanes8 => (lanes::move_rows::<8>, lanes::damage_rows::<8>),
            SimdBackend::Lanes16 => (lanes::move_rows::<16>, lanes::damage_rows::<16>),
            SimdBackend::Avx2 => avx2_kernels()?,
        };

        Ok(Self {
            backend,
            move_rows,
            damage_rows,
        })
    }

    /// The scalar kernels. Always available.
    #[must_use]
    pub fn scalar() -> Self {
        Self {
            backend: SimdBackend::Scalar,
            move_rows: scalar::move_rows,
            damage_rows: scalar::damage_rows,
        }
    }

    /// The fastest kernels this CPU can run.
    #[must_use]
    pub fn detect() -> Self {
        Self::new(SimdBackend::detect()).unwrap_or_else(|_| Self::scalar())
    }

    /// Returns the bound backend.
    #[inline]
    #[must_use]
    pub const fn backend(&self) -> SimdBackend {
        self.backend
    }

    /// Integrates every row of `cols` over `dt`.
    #[inline]
    pub fn move_rows(&self, cols: MotionColumns<'_>, dt: f32) {
        (self.move_rows)(cols, dt);
    }

    /// Decays every value of `health` by one, floored at zero.
    #[inline]
    pub fn damage_rows(&self, health: &mut [Health]) {
        (self.damage_rows)(health);
    }

    /// Runs the move kernel over the occupied rows of `chunk`.
    #[inline]
    pub fn move_chunk(&self, chunk: &mut Chunk, dt: f32) {
        self.move_rows(chunk.motion_columns(), dt);
    }

    /// Runs the damage kernel over the occupied rows of `chunk`.
    #[inline]
    pub fn damage_chunk(&self, chunk: &mut Chunk) {
        self.damage_rows(chunk.health_mut());
    }
}

impl Default for Kernels {
    fn default() -> Self {
        Self::detect()
    }
}

impl fmt::Debug for Kernels {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Kernels")
            .field("backend", &self.backend)
            .finish_non_exhaustive()
    }
}

#[cfg(target_arch = "x86_64")]
fn avx2_kernels() -> SwarmResult<(MoveKernel, DamageKernel)> {
    if !is_x86_feature_detected!("avx2") {
        return Err(SwarmError::UnsupportedBackend(SimdBackend::Avx2));
    }
    Ok((avx2::move_rows, avx2::damage_rows))
}

#[cfg(not(target_arch = "x86_64"))]
fn avx2_kernels() -> SwarmResult<(MoveKernel, DamageKernel)> {
    Err(SwarmError::UnsupportedBackend(SimdBackend::Avx2))
}

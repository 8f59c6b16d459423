//! One row at a time. Also the remainder loop of every vector backend.

use crate::ecs::{Health, MotionColumns};

/// `pos[i] += vel[i] * dt` for every row both slices cover.
#[inline]
pub(super) fn integrate(pos: &mut [f32], vel: &[f32], dt: f32) {
    for (p, &v) in pos.iter_mut().zip(vel) {
        *p += v * dt;
    }
}

/// `health[i] = max(health[i] - 1, 0)` with a wrapping subtract, matching
/// the lane-wise integer subtract of the vector backends.
#[inline]
pub(super) fn decay(health: &mut [Health]) {
    for h in health {
        *h = h.wrapping_sub(1).max(0);
    }
}

pub(super) fn move_rows(cols: MotionColumns<'_>, dt: f32) {
    let n = cols.rows();
    let MotionColumns {
        pos_x,
        pos_y,
        vel_x,
        vel_y,
    } = cols;

    integrate(&mut pos_x[..n], &vel_x[..n], dt);
    integrate(&mut pos_y[..n], &vel_y[..n], dt);
}

pub(super) fn damage_rows(health: &mut [Health]) {
    decay(health);
}

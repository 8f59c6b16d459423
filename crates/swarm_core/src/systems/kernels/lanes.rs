//! Portable fixed-width kernels.
//!
//! Rows are walked in groups of `W` with a lane loop the compiler lowers to
//! vector instructions on any target, then the remainder goes through the
//! scalar kernel. The per-lane arithmetic is exactly the scalar arithmetic.

use super::scalar;
use crate::ecs::{Health, MotionColumns};

fn integrate<const W: usize>(pos: &mut [f32], vel: &[f32], dt: f32) {
    let n = pos.len().min(vel.len());
    let vec_end = n - n % W;

    let (pos_body, pos_tail) = pos[..n].split_at_mut(vec_end);
    let (vel_body, vel_tail) = vel[..n].split_at(vec_end);

    for (pos_group, vel_group) in pos_body.chunks_exact_mut(W).zip(vel_body.chunks_exact(W)) {
        for (p, &v) in pos_group.iter_mut().zip(vel_group) {
            *p += v * dt;
        }
    }

    scalar::integrate(pos_tail, vel_tail, dt);
}

pub(super) fn move_rows<const W: usize>(cols: MotionColumns<'_>, dt: f32) {
    let n = cols.rows();
    let MotionColumns {
        pos_x,
        pos_y,
        vel_x,
        vel_y,
    } = cols;

    integrate::<W>(&mut pos_x[..n], &vel_x[..n], dt);
    integrate::<W>(&mut pos_y[..n], &vel_y[..n], dt);
}

pub(super) fn damage_rows<const W: usize>(health: &mut [Health]) {
    let vec_end = health.len() - health.len() % W;
    let (body, tail) = health.split_at_mut(vec_end);

    for group in body.chunks_exact_mut(W) {
        for h in group {
            *h = h.wrapping_sub(1).max(0);
        }
    }

    scalar::decay(tail);
}

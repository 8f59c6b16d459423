//! AVX2 kernels: 8 single-precision or 32-bit integer lanes per register.
//!
//! Uses UNALIGNED loads/stores, so the kernels accept any slice, not only
//! chunk columns. Chunk columns are 64-byte aligned, which keeps every
//! 32-byte load inside a single cache line anyway.

// SAFETY: This module calls `std::arch` intrinsics and raw pointer offsets.
// The safe entry points are only handed out after runtime AVX2 detection.
#![allow(unsafe_code)]

use std::arch::x86_64::{
    __m256i, _mm256_add_ps, _mm256_loadu_ps, _mm256_loadu_si256, _mm256_max_epi32,
    _mm256_mul_ps, _mm256_set1_epi32, _mm256_set1_ps, _mm256_setzero_si256, _mm256_storeu_ps,
    _mm256_storeu_si256, _mm256_sub_epi32,
};

use super::scalar;
use crate::ecs::{Health, MotionColumns};

/// Rows per register.
const LANES: usize = 8;

pub(super) fn move_rows(cols: MotionColumns<'_>, dt: f32) {
    debug_assert!(is_x86_feature_detected!("avx2"));
    // SAFETY: `Kernels::new` only selects this function after confirming AVX2.
    unsafe { move_rows_avx2(cols, dt) }
}

pub(super) fn damage_rows(health: &mut [Health]) {
    debug_assert!(is_x86_feature_detected!("avx2"));
    // SAFETY: `Kernels::new` only selects this function after confirming AVX2.
    unsafe { damage_rows_avx2(health) }
}

#[target_feature(enable = "avx2")]
unsafe fn move_rows_avx2(cols: MotionColumns<'_>, dt: f32) {
    let n = cols.rows();
    let MotionColumns {
        pos_x,
        pos_y,
        vel_x,
        vel_y,
    } = cols;

    integrate_avx2(&mut pos_x[..n], &vel_x[..n], dt);
    integrate_avx2(&mut pos_y[..n], &vel_y[..n], dt);
}

/// `pos += vel * dt` as a separate multiply and add, never fused.
#[target_feature(enable = "avx2")]
unsafe fn integrate_avx2(pos: &mut [f32], vel: &[f32], dt: f32) {
    let n = pos.len().min(vel.len());
    let vec_end = n - n % LANES;

    let dtv = _mm256_set1_ps(dt);
    let p = pos.as_mut_ptr();
    let v = vel.as_ptr();

    let mut i = 0;
    while i < vec_end {
        // i + LANES <= vec_end <= n, so all 8 lanes are in bounds of both slices.
        let pv = _mm256_loadu_ps(p.add(i));
        let vv = _mm256_loadu_ps(v.add(i));
        _mm256_storeu_ps(p.add(i), _mm256_add_ps(pv, _mm256_mul_ps(vv, dtv)));
        i += LANES;
    }

    scalar::integrate(&mut pos[vec_end..n], &vel[vec_end..n], dt);
}

/// Wrapping subtract then lane-wise max with zero.
#[target_feature(enable = "avx2")]
unsafe fn damage_rows_avx2(health: &mut [Health]) {
    let n = health.len();
    let vec_end = n - n % LANES;

    let one = _mm256_set1_epi32(1);
    let zero = _mm256_setzero_si256();
    let h = health.as_mut_ptr();

    let mut i = 0;
    while i < vec_end {
        let lanes = h.add(i).cast::<__m256i>();
        let hv = _mm256_loadu_si256(lanes);
        let clamped = _mm256_max_epi32(_mm256_sub_epi32(hv, one), zero);
        _mm256_storeu_si256(lanes, clamped);
        i += LANES;
    }

    scalar::decay(&mut health[vec_end..]);
}

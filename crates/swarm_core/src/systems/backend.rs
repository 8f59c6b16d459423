//! # Kernel Backend Selection
//!
//! Which instruction strategy the system kernels use. Chosen once, at
//! executor construction, from the configured vector width and the CPU's
//! runtime-detected features.

use std::fmt;

use tracing::warn;

use crate::error::{SwarmError, SwarmResult};

/// Vector widths accepted by [`SimdBackend::select`]. Width 1 is scalar.
pub const SUPPORTED_VECTOR_WIDTHS: [usize; 4] = [1, 4, 8, 16];

/// A kernel implementation strategy.
///
/// Every backend produces bit-identical results; they differ only in speed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SimdBackend {
    /// One row at a time.
    Scalar,
    /// Portable groups of 4 lanes plus a scalar remainder.
    Lanes4,
    /// Portable groups of 8 lanes plus a scalar remainder.
    Lanes8,
    /// Portable groups of 16 lanes plus a scalar remainder.
    Lanes16,
    /// x86-64 AVX2 intrinsics, 8 lanes, plus a scalar remainder.
    Avx2,
}

impl SimdBackend {
    /// Every backend, in increasing order of preference.
    pub const ALL: [Self; 5] = [
        Self::Scalar,
        Self::Lanes4,
        Self::Lanes8,
        Self::Lanes16,
        Self::Avx2,
    ];

    /// Returns the number of rows processed per vector group.
    #[must_use]
    pub const fn vector_width(self) -> usize {
        match self {
            Self::Scalar => 1,
            Self::Lanes4 => 4,
            Self::Lanes8 | Self::Avx2 => 8,
            Self::Lanes16 => 16,
        }
    }

    /// Checks whether this CPU can run the backend.
    #[must_use]
    pub fn is_supported(self) -> bool {
        match self {
            Self::Avx2 => avx2_detected(),
            Self::Scalar | Self::Lanes4 | Self::Lanes8 | Self::Lanes16 => true,
        }
    }

    /// Returns every backend this CPU can run.
    pub fn available() -> impl Iterator<Item = Self> {
        Self::ALL.into_iter().filter(|backend| backend.is_supported())
    }

    /// Returns the fastest backend this CPU can run.
    #[must_use]
    pub fn detect() -> Self {
        if avx2_detected() {
            Self::Avx2
        } else {
            Self::Lanes8
        }
    }

    /// Resolves the configured vector width to a backend.
    ///
    /// Width 8 uses AVX2 when `allow_intrinsics` is set and the CPU has it,
    /// and the portable 8-lane kernels otherwise.
    ///
    /// # Errors
    ///
    /// Returns [`SwarmError::InvalidConfig`] for a width outside
    /// [`SUPPORTED_VECTOR_WIDTHS`].
    pub fn select(vector_width: usize, allow_intrinsics: bool) -> SwarmResult<Self> {
        let backend = match vector_width {
            1 => Self::Scalar,
            4 => Self::Lanes4,
            8 if allow_intrinsics && avx2_detected() => Self::Avx2,
            8 => {
                if allow_intrinsics {
                    warn!("AVX2 not detected, using portable 8-lane kernels");
                }
                Self::Lanes8
            }
            16 => Self::Lanes16,
            other => {
                return Err(SwarmError::InvalidConfig(format!(
                    "unsupported vector width {other}, expected one of {SUPPORTED_VECTOR_WIDTHS:?}"
                )))
            }
        };
        Ok(backend)
    }
}

impl fmt::Display for SimdBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Scalar => "scalar",
            Self::Lanes4 => "lanes4",
            Self::Lanes8 => "lanes8",
            Self::Lanes16 => "lanes16",
            Self::Avx2 => "avx2",
        };
        f.write_str(name)
    }
}

/// Runtime AVX2 detection. The standard library caches the CPUID result.
#[cfg(target_arch = "x86_64")]
fn avx2_detected() -> bool {
    is_x86_feature_detected!("avx2")
}

#[cfg(not(target_arch = "x86_64"))]
fn avx2_detected() -> bool {
    false
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_select_by_width() {
        assert_eq!(SimdBackend::select(1, true).unwrap(), SimdBackend::Scalar);
        assert_eq!(SimdBackend::select(4, true).unwrap(), SimdBackend::Lanes4);
        assert_eq!(SimdBackend::select(16, true).unwrap(), SimdBackend::Lanes16);
        assert_eq!(SimdBackend::select(8, false).unwrap(), SimdBackend::Lanes8);
    }

    #[test]
    fn test_select_width_eight_prefers_intrinsics() {
        let backend = SimdBackend::select(8, true).unwrap();
        if SimdBackend::Avx2.is_supported() {
            assert_eq!(backend, SimdBackend::Avx2);
        } else {
            assert_eq!(backend, SimdBackend::Lanes8);
        }
        assert_eq!(backend.vector_width(), 8);
    }

    #[test]
    fn test_select_rejects_odd_width() {
        assert!(matches!(
            SimdBackend::select(3, true),
            Err(SwarmError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_detect_is_supported() {
        assert!(SimdBackend::detect().is_supported());
        assert!(SimdBackend::available().any(|b| b == SimdBackend::Scalar));
    }

    #[test]
    fn test_display() {
        assert_eq!(SimdBackend::Avx2.to_string(), "avx2");
        assert_eq!(SimdBackend::Lanes16.to_string(), "lanes16");
    }
}

//! Sampling detection and validation
//!
//! The acquisition mask is implicit in the k-space data: a sample is
//! acquired iff it is nonzero. Projecting the mask onto each axis gives the
//! acquired lines; the axis with the smallest acquired fraction is the
//! partial-Fourier axis.

use std::fmt;
use std::ops::Range;

use num_complex::Complex64;

use crate::error::{HomodyneError, Result};
use crate::fft::idx3d;

/// Above this fraction on every axis there is no partial-Fourier gap
pub const FULLY_SAMPLED_THRESHOLD: f64 = 0.98;

/// Spatial axis of a (nx, ny, nz) volume
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    pub const ALL: [Axis; 3] = [Axis::X, Axis::Y, Axis::Z];

    /// Position of the axis in (nx, ny, nz)
    pub fn index(self) -> usize {
        match self {
            Axis::X => 0,
            Axis::Y => 1,
            Axis::Z => 2,
        }
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Axis::X => "x",
            Axis::Y => "y",
            Axis::Z => "z",
        };
        f.write_str(name)
    }
}

/// Result of sampling detection
#[derive(Clone, Debug, PartialEq)]
pub struct SamplingInfo {
    /// Sampled fraction per spatial axis (2 entries for 2D data, 3 for 3D)
    pub fractions: Vec<f64>,
    /// Contiguous range of acquired indices along x, y, z
    pub ranges: [Range<usize>; 3],
    /// Partial-Fourier (least sampled) axis
    pub dim: Axis,
}

impl SamplingInfo {
    /// Acquired range along the partial-Fourier axis
    pub fn partial_range(&self) -> Range<usize> {
        self.ranges[self.dim.index()].clone()
    }
}

/// Check the k-space buffer describes a single-channel 2D or 3D volume
pub fn validate_shape(len: usize, nx: usize, ny: usize, nz: usize, nc: usize) -> Result<()> {
    if nc != 1 {
        return Err(HomodyneError::InputShape(format!(
            "expected a single receive channel, got nc = {}", nc
        )));
    }
    if nx == 1 || ny == 1 {
        return Err(HomodyneError::InputShape(format!(
            "expected 2D or 3D data, got {}x{}x{}", nx, ny, nz
        )));
    }
    if nx == 0 || ny == 0 || nz == 0 {
        return Err(HomodyneError::InputShape(format!(
            "empty volume {}x{}x{}", nx, ny, nz
        )));
    }
    if len != nx * ny * nz * nc {
        return Err(HomodyneError::InputShape(format!(
            "buffer holds {} samples but {}x{}x{}x{} = {} were expected",
            len, nx, ny, nz, nc, nx * ny * nz * nc
        )));
    }
    Ok(())
}

/// Acquisition mask: true wherever the k-space sample is nonzero
pub fn sampling_mask(kspace: &[Complex64]) -> Vec<bool> {
    kspace.iter().map(|v| v.re != 0.0 || v.im != 0.0).collect()
}

/// Detect per-axis sampling and select the partial-Fourier axis
///
/// # Arguments
/// * `mask` - Acquisition mask (nx * ny * nz), Fortran order
/// * `nx`, `ny`, `nz` - Volume dimensions (nz = 1 for 2D data)
///
/// # Errors
/// * `InputShape` if the mask length does not match the dimensions
/// * `Sampling` if nothing is sampled or the acquired lines along some axis
///   have a gap
/// * `FullySampled` if every axis is sampled above
///   [`FULLY_SAMPLED_THRESHOLD`]
pub fn detect_sampling(mask: &[bool], nx: usize, ny: usize, nz: usize) -> Result<SamplingInfo> {
    if mask.len() != nx * ny * nz {
        return Err(HomodyneError::InputShape(format!(
            "mask has {} entries, expected {}x{}x{} = {}",
            mask.len(), nx, ny, nz, nx * ny * nz
        )));
    }

    let dims = [nx, ny, nz];
    let mut occupancy = [vec![false; nx], vec![false; ny], vec![false; nz]];

    for k in 0..nz {
        for j in 0..ny {
            for i in 0..nx {
                if mask[idx3d(i, j, k, nx, ny)] {
                    occupancy[0][i] = true;
                    occupancy[1][j] = true;
                    occupancy[2][k] = true;
                }
            }
        }
    }

    let mut ranges = [0..0, 0..0, 0..0];
    for axis in Axis::ALL {
        let a = axis.index();
        let sampled: Vec<usize> = occupancy[a].iter()
            .enumerate()
            .filter(|(_, o)| **o)
            .map(|(idx, _)| idx)
            .collect();

        let (first, last) = match (sampled.first(), sampled.last()) {
            (Some(&first), Some(&last)) => (first, last),
            _ => return Err(HomodyneError::Sampling("no sampled points".to_string())),
        };
        if let Some(gap) = sampled.windows(2).find(|w| w[1] - w[0] != 1) {
            return Err(HomodyneError::Sampling(format!(
                "gap along {} between lines {} and {}", axis, gap[0], gap[1]
            )));
        }
        ranges[a] = first..last + 1;
    }

    // nz = 1 is 2D data: the z axis takes no part in the selection
    let n_axes = if nz == 1 { 2 } else { 3 };
    let fractions: Vec<f64> = (0..n_axes)
        .map(|a| ranges[a].len() as f64 / dims[a] as f64)
        .collect();

    // first minimum wins
    let mut dim = 0;
    for (a, &f) in fractions.iter().enumerate() {
        if f < fractions[dim] {
            dim = a;
        }
    }

    if fractions.iter().all(|&f| f > FULLY_SAMPLED_THRESHOLD) {
        return Err(HomodyneError::FullySampled { fractions });
    }

    let dim = Axis::ALL[dim];
    log::info!(
        "partial-Fourier sampling fractions {:?}, undersampled axis {}",
        fractions.iter().map(|f| (f * 1000.0).round() / 1000.0).collect::<Vec<_>>(),
        dim
    );

    Ok(SamplingInfo { fractions, ranges, dim })
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Mask sampled on `ranges` along each axis
    fn box_mask(nx: usize, ny: usize, nz: usize, ranges: [Range<usize>; 3]) -> Vec<bool> {
        let mut mask = vec![false; nx * ny * nz];
        for k in ranges[2].clone() {
            for j in ranges[1].clone() {
                for i in ranges[0].clone() {
                    mask[idx3d(i, j, k, nx, ny)] = true;
                }
            }
        }
        mask
    }

    #[test]
    fn test_validate_shape() {
        assert!(validate_shape(16 * 8, 16, 8, 1, 1).is_ok());
        assert!(validate_shape(4 * 4 * 4, 4, 4, 4, 1).is_ok());
        assert!(matches!(validate_shape(8, 1, 8, 1, 1), Err(HomodyneError::InputShape(_))));
        assert!(matches!(validate_shape(8, 8, 1, 1, 1), Err(HomodyneError::InputShape(_))));
        assert!(matches!(validate_shape(128, 8, 8, 1, 2), Err(HomodyneError::InputShape(_))));
        assert!(matches!(validate_shape(63, 8, 8, 1, 1), Err(HomodyneError::InputShape(_))));
    }

    #[test]
    fn test_mask_from_exact_zeros() {
        let kspace = vec![
            Complex64::new(0.0, 0.0),
            Complex64::new(0.0, 1e-300),
            Complex64::new(-2.0, 0.0),
            Complex64::new(-0.0, 0.0),
        ];
        assert_eq!(sampling_mask(&kspace), vec![false, true, true, false]);
    }

    #[test]
    fn test_detects_partial_axis_2d() {
        let (nx, ny, nz) = (16, 20, 1);
        let mask = box_mask(nx, ny, nz, [0..16, 0..12, 0..1]);

        let info = detect_sampling(&mask, nx, ny, nz).unwrap();
        assert_eq!(info.dim, Axis::Y);
        assert_eq!(info.fractions.len(), 2);
        assert!((info.fractions[0] - 1.0).abs() < 1e-12);
        assert!((info.fractions[1] - 0.6).abs() < 1e-12);
        assert_eq!(info.partial_range(), 0..12);
    }

    #[test]
    fn test_detects_partial_axis_3d() {
        let (nx, ny, nz) = (8, 8, 10);
        let mask = box_mask(nx, ny, nz, [0..8, 0..8, 4..10]);

        let info = detect_sampling(&mask, nx, ny, nz).unwrap();
        assert_eq!(info.dim, Axis::Z);
        assert_eq!(info.fractions.len(), 3);
        assert_eq!(info.ranges[2], 4..10);
    }

    #[test]
    fn test_tie_selects_first_axis() {
        let (nx, ny, nz) = (10, 10, 1);
        let mask = box_mask(nx, ny, nz, [0..6, 4..10, 0..1]);

        let info = detect_sampling(&mask, nx, ny, nz).unwrap();
        assert_eq!(info.dim, Axis::X);
    }

    #[test]
    fn test_gap_is_rejected() {
        let (nx, ny, nz) = (8, 8, 1);
        let mut mask = box_mask(nx, ny, nz, [0..8, 0..6, 0..1]);
        // Remove line y = 2 entirely
        for i in 0..nx {
            mask[idx3d(i, 2, 0, nx, ny)] = false;
        }

        let result = detect_sampling(&mask, nx, ny, nz);
        assert!(matches!(result, Err(HomodyneError::Sampling(_))));
    }

    #[test]
    fn test_fully_sampled_is_rejected() {
        let (nx, ny, nz) = (8, 8, 4);
        let mask = vec![true; nx * ny * nz];

        match detect_sampling(&mask, nx, ny, nz) {
            Err(HomodyneError::FullySampled { fractions }) => assert_eq!(fractions, vec![1.0; 3]),
            other => panic!("expected FullySampled, got {:?}", other),
        }
    }

    #[test]
    fn test_empty_mask_is_rejected() {
        let mask = vec![false; 16];
        assert!(matches!(detect_sampling(&mask, 4, 4, 1), Err(HomodyneError::Sampling(_))));
    }

    #[test]
    fn test_mask_length_mismatch_is_shape_error() {
        let mask = box_mask(4, 4, 1, [0..4, 0..3, 0..1]);
        let result = detect_sampling(&mask[1..], 4, 4, 1);
        assert!(matches!(result, Err(HomodyneError::InputShape(_))));
    }
}

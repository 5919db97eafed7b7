//! Low-resolution phase estimation
//!
//! The phase of the symmetric k-space center (low-pass filtered by L) is a
//! smooth estimate of the object phase, shared by all three methods.

use num_complex::Complex64;

use super::filter::apply_along_axis;
use super::sampling::Axis;
use crate::fft::{ifftshift, Fft3dWorkspace};
use crate::utils::gaussian_smooth_complex;

/// Optional image-space smoothing of the low-resolution phase
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum PhaseSmoothing {
    /// Use the low-pass filtered phase as is
    #[default]
    Off,
    /// Smooth the low-resolution complex image before taking its angle
    Gaussian {
        /// Sigma per axis in voxels (0 disables an axis)
        sigma: [f64; 3],
    },
}

/// Inverse transform of frequency-centered k-space: ifft(ifftshift(k))
pub(crate) fn centered_ifft(
    kspace: &[Complex64],
    workspace: &mut Fft3dWorkspace,
) -> Vec<Complex64> {
    let (nx, ny, nz) = workspace.dims();
    let mut image = ifftshift(kspace, nx, ny, nz);
    workspace.ifft3d(&mut image);
    image
}

/// Estimate the low-resolution phase map
///
/// # Arguments
/// * `kspace` - Frequency-centered k-space (nx * ny * nz)
/// * `low` - Low-pass profile along `dim`
/// * `dim` - Partial-Fourier axis
/// * `smoothing` - Optional extra smoothing
/// * `workspace` - FFT workspace planned for the volume
///
/// # Returns
/// Phase in radians, (-π, π], in unshifted image layout
pub fn estimate_phase(
    kspace: &[Complex64],
    low: &[f64],
    dim: Axis,
    smoothing: PhaseSmoothing,
    workspace: &mut Fft3dWorkspace,
) -> Vec<f64> {
    let (nx, ny, nz) = workspace.dims();

    let mut filtered = kspace.to_vec();
    apply_along_axis(&mut filtered, low, dim, nx, ny, nz);

    let mut image = centered_ifft(&filtered, workspace);

    if let PhaseSmoothing::Gaussian { sigma } = smoothing {
        image = gaussian_smooth_complex(&image, sigma, nx, ny, nz);
    }

    image.iter().map(|v| v.arg()).collect()
}

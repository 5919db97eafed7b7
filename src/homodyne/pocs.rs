//! Projection onto convex sets (POCS)
//!
//! Alternates between two constraint sets:
//! 1. Phase consistency: the image equals its magnitude times the
//!    low-resolution phase estimate
//! 2. Data consistency: acquired k-space samples equal the measurement
//!
//! Runs a fixed number of iterations; there is no convergence test.

use num_complex::Complex64;

use crate::fft::{ifftshift, Fft3dWorkspace};

/// POCS partial-Fourier reconstruction
///
/// # Arguments
/// * `kspace` - Frequency-centered, zero-filled k-space (nx * ny * nz)
/// * `mask` - Acquisition mask in the same layout as `kspace`
/// * `phase` - Low-resolution phase, unshifted image layout
/// * `max_iter` - Number of iterations
/// * `workspace` - FFT workspace planned for the volume
///
/// # Returns
/// Magnitude of the phase-constrained image of the last iteration, in
/// unshifted image layout
pub fn pocs(
    kspace: &[Complex64],
    mask: &[bool],
    phase: &[f64],
    max_iter: usize,
    workspace: &mut Fft3dWorkspace,
) -> Vec<f64> {
    let (nx, ny, nz) = workspace.dims();

    let measured = ifftshift(kspace, nx, ny, nz);
    let acquired = ifftshift(mask, nx, ny, nz);

    let mut x = measured.clone();
    let mut image = x.clone();
    workspace.ifft3d(&mut image);

    for iter in 0..max_iter {
        if iter > 0 {
            image.copy_from_slice(&x);
            workspace.ifft3d(&mut image);
        }

        // phase constraint
        for (v, &p) in image.iter_mut().zip(phase.iter()) {
            *v = Complex64::from_polar(v.norm(), p);
        }

        x.copy_from_slice(&image);
        workspace.fft3d(&mut x);

        // data consistency
        let mut change = 0.0;
        for ((xi, &mi), &acq) in x.iter_mut().zip(measured.iter()).zip(acquired.iter()) {
            if acq {
                change += (*xi - mi).norm_sqr();
                *xi = mi;
            }
        }
        log::debug!("pocs iteration {}: data consistency change {:.3e}", iter + 1, change.sqrt());
    }

    image.iter().map(|v| v.norm()).collect()
}

//! Phase-constrained least squares
//!
//! Solves
//!
//! x = argmin ||M F P x - k||₂² + λ||Im(x)||₂² + damp·||x||₂²
//!
//! through its normal equations A(x) = b with
//!
//! A(x) = Pᴴ Fᴴ M F P x + i·λ·Im(x) + damp·x,  b = Pᴴ Fᴴ k
//!
//! where P multiplies by exp(i·phase), F is the FFT and M the acquisition
//! mask. The imaginary penalty is the soft version of the POCS phase
//! constraint. A is only real-linear, so it is solved with the real-inner-
//! product conjugate gradient.

use num_complex::Complex64;

use super::phase::centered_ifft;
use crate::fft::{ifftshift, Fft3dWorkspace};
use crate::solvers::cg_solve;

/// Penalty on the imaginary part of the solution
pub const DEFAULT_LAMBDA: f64 = 1e-2;
/// Tikhonov damping
pub const DEFAULT_DAMP: f64 = 1e-4;

/// Normal-equation operator of the phase-constrained least-squares problem
pub struct PhaseConstrainedOperator<'a> {
    /// exp(i·phase), unshifted image layout
    phase_factor: Vec<Complex64>,
    /// acquisition mask, unshifted k-space layout
    mask: Vec<bool>,
    lambda: f64,
    damp: f64,
    workspace: &'a mut Fft3dWorkspace,
    buffer: Vec<Complex64>,
}

impl<'a> PhaseConstrainedOperator<'a> {
    /// # Arguments
    /// * `phase` - Low-resolution phase, unshifted image layout
    /// * `mask` - Acquisition mask, frequency-centered layout
    /// * `lambda` - Imaginary-part penalty
    /// * `damp` - Tikhonov damping
    /// * `workspace` - FFT workspace planned for the volume
    pub fn new(
        phase: &[f64],
        mask: &[bool],
        lambda: f64,
        damp: f64,
        workspace: &'a mut Fft3dWorkspace,
    ) -> Self {
        let (nx, ny, nz) = workspace.dims();
        Self {
            phase_factor: phase.iter().map(|&p| Complex64::from_polar(1.0, p)).collect(),
            mask: ifftshift(mask, nx, ny, nz),
            lambda,
            damp,
            workspace,
            buffer: vec![Complex64::new(0.0, 0.0); phase.len()],
        }
    }

    /// Compute A(x)
    pub fn apply(&mut self, x: &[Complex64]) -> Vec<Complex64> {
        // F P x
        for ((bi, &xi), &pf) in self.buffer.iter_mut().zip(x.iter()).zip(self.phase_factor.iter()) {
            *bi = xi * pf;
        }
        self.workspace.fft3d(&mut self.buffer);

        // M
        for (bi, &m) in self.buffer.iter_mut().zip(self.mask.iter()) {
            if !m {
                *bi = Complex64::new(0.0, 0.0);
            }
        }

        // Pᴴ Fᴴ
        self.workspace.ifft3d(&mut self.buffer);

        self.buffer.iter()
            .zip(self.phase_factor.iter())
            .zip(x.iter())
            .map(|((&bi, &pf), &xi)| {
                bi * pf.conj() + Complex64::new(0.0, self.lambda * xi.im) + xi * self.damp
            })
            .collect()
    }
}

/// Least-squares partial-Fourier reconstruction
///
/// # Arguments
/// * `kspace` - Frequency-centered, zero-filled k-space (nx * ny * nz)
/// * `mask` - Acquisition mask in the same layout as `kspace`
/// * `phase` - Low-resolution phase, unshifted image layout
/// * `lambda` - Imaginary-part penalty (default [`DEFAULT_LAMBDA`])
/// * `damp` - Tikhonov damping (default [`DEFAULT_DAMP`])
/// * `max_iter` - Conjugate-gradient iterations
/// * `workspace` - FFT workspace planned for the volume
///
/// # Returns
/// Real part of the solution, unshifted image layout
pub fn least_squares(
    kspace: &[Complex64],
    mask: &[bool],
    phase: &[f64],
    lambda: f64,
    damp: f64,
    max_iter: usize,
    workspace: &mut Fft3dWorkspace,
) -> Vec<f64> {
    let mut b = centered_ifft(kspace, workspace);
    for (bi, &p) in b.iter_mut().zip(phase.iter()) {
        *bi *= Complex64::from_polar(1.0, -p);
    }

    let mut op = PhaseConstrainedOperator::new(phase, mask, lambda, damp, workspace);
    let x0 = vec![Complex64::new(0.0, 0.0); b.len()];
    let x = cg_solve(|v| op.apply(v), &b, &x0, 0.0, max_iter);

    x.iter().map(|v| v.re).collect()
}

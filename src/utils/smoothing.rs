//! Separable Gaussian smoothing
//!
//! Used to regularise the low-resolution phase estimate: the real and
//! imaginary parts of a complex image are smoothed independently and the
//! angle is taken afterwards, so phase wraps are averaged correctly.

use num_complex::Complex64;
use crate::fft::idx3d;

/// Create normalized 1D Gaussian kernel with radius ceil(3σ)
pub fn make_gaussian_kernel(sigma: f64) -> Vec<f64> {
    let radius = (3.0 * sigma).ceil() as usize;
    let size = 2 * radius + 1;
    let two_sigma_sq = 2.0 * sigma * sigma;

    let mut kernel: Vec<f64> = (0..size)
        .map(|i| {
            let x = i as f64 - radius as f64;
            (-x * x / two_sigma_sq).exp()
        })
        .collect();

    let sum: f64 = kernel.iter().sum();
    for k in kernel.iter_mut() {
        *k /= sum;
    }

    kernel
}

/// Smooth a complex volume with a separable Gaussian
///
/// Kernel taps falling outside the volume are dropped and the remaining
/// weights renormalized, so edges are not darkened.
///
/// # Arguments
/// * `data` - Complex volume (nx * ny * nz), Fortran order
/// * `sigma` - Gaussian sigma per axis in voxels (0 disables that axis)
/// * `nx`, `ny`, `nz` - Volume dimensions
pub fn gaussian_smooth_complex(
    data: &[Complex64],
    sigma: [f64; 3],
    nx: usize, ny: usize, nz: usize,
) -> Vec<Complex64> {
    let dims = [nx, ny, nz];
    let mut result = data.to_vec();
    let mut temp = vec![Complex64::new(0.0, 0.0); data.len()];

    for axis in 0..3 {
        if sigma[axis] <= 0.0 || dims[axis] < 2 {
            continue;
        }
        let kernel = make_gaussian_kernel(sigma[axis]);
        let half = kernel.len() / 2;
        let len = dims[axis] as isize;

        for k in 0..nz {
            for j in 0..ny {
                for i in 0..nx {
                    let pos = [i, j, k];
                    let mut sum = Complex64::new(0.0, 0.0);
                    let mut weight_sum = 0.0;

                    for (ki, &kv) in kernel.iter().enumerate() {
                        let p = pos[axis] as isize + ki as isize - half as isize;
                        if p < 0 || p >= len {
                            continue;
                        }
                        let mut q = pos;
                        q[axis] = p as usize;
                        sum += result[idx3d(q[0], q[1], q[2], nx, ny)] * kv;
                        weight_sum += kv;
                    }

                    temp[idx3d(i, j, k, nx, ny)] = if weight_sum > 0.0 {
                        sum / weight_sum
                    } else {
                        Complex64::new(0.0, 0.0)
                    };
                }
            }
        }
        std::mem::swap(&mut result, &mut temp);
    }

    result
}

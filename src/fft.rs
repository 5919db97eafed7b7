//! FFT wrapper for 3D transforms using rustfft
//!
//! Provides 3D FFT/IFFT operations compatible with NumPy's FFT conventions
//! (unnormalized forward, 1/N inverse). Uses Fortran (column-major) order
//! indexing to match NIfTI convention. 2D volumes are handled as nz = 1.

use num_complex::Complex64;
use rustfft::{Fft, FftDirection, FftPlanner};
use std::sync::Arc;

/// Planned transforms for one volume shape, with shared scratch
///
/// The iterative reconstructions transform the same volume shape many times,
/// so plans are built once per call and shared by every iteration.
pub struct Fft3dWorkspace {
    dims: [usize; 3],
    /// Per-axis plans, indexed x, y, z
    forward: [Arc<dyn Fft<f64>>; 3],
    inverse: [Arc<dyn Fft<f64>>; 3],
    scratch: Vec<Complex64>,
    line: Vec<Complex64>,
}

impl Fft3dWorkspace {
    pub fn new(nx: usize, ny: usize, nz: usize) -> Self {
        let mut planner = FftPlanner::new();
        let dims = [nx, ny, nz];

        let forward = dims.map(|n| planner.plan_fft(n, FftDirection::Forward));
        let inverse = dims.map(|n| planner.plan_fft(n, FftDirection::Inverse));

        let scratch_len = forward.iter()
            .chain(inverse.iter())
            .map(|p| p.get_inplace_scratch_len())
            .max()
            .unwrap_or(0);

        Self {
            dims,
            forward,
            inverse,
            scratch: vec![Complex64::new(0.0, 0.0); scratch_len],
            line: vec![Complex64::new(0.0, 0.0); ny.max(nz)],
        }
    }

    /// Volume dimensions this workspace was planned for
    pub fn dims(&self) -> (usize, usize, usize) {
        (self.dims[0], self.dims[1], self.dims[2])
    }

    /// In-place forward 3D FFT, unnormalized
    pub fn fft3d(&mut self, data: &mut [Complex64]) {
        let plans = self.forward.clone();
        self.transform(data, &plans);
    }

    /// In-place inverse 3D FFT, scaled by 1/N
    pub fn ifft3d(&mut self, data: &mut [Complex64]) {
        let plans = self.inverse.clone();
        self.transform(data, &plans);

        let scale = 1.0 / data.len() as f64;
        for v in data.iter_mut() {
            *v *= scale;
        }
    }

    fn transform(&mut self, data: &mut [Complex64], plans: &[Arc<dyn Fft<f64>>; 3]) {
        let [nx, ny, nz] = self.dims;
        debug_assert_eq!(data.len(), nx * ny * nz);

        // x lines are contiguous in Fortran order
        if nx > 1 {
            for chunk in data.chunks_exact_mut(nx) {
                plans[0].process_with_scratch(chunk, &mut self.scratch);
            }
        }

        // y and z lines are strided: gather, transform, scatter
        for axis in [1, 2] {
            let n = self.dims[axis];
            if n < 2 {
                continue;
            }
            let stride = if axis == 1 { nx } else { nx * ny };
            let outer = if axis == 1 { nz } else { 1 };
            let inner = if axis == 1 { nx } else { nx * ny };
            let line = &mut self.line[..n];

            for o in 0..outer {
                for base in (0..inner).map(|t| t + o * nx * ny) {
                    for (m, v) in line.iter_mut().enumerate() {
                        *v = data[base + m * stride];
                    }
                    plans[axis].process_with_scratch(line, &mut self.scratch);
                    for (m, v) in line.iter().enumerate() {
                        data[base + m * stride] = *v;
                    }
                }
            }
        }
    }
}

/// Index into a 3D array stored in Fortran order (column-major)
/// index = x + y*nx + z*nx*ny
#[inline(always)]
pub fn idx3d(i: usize, j: usize, k: usize, nx: usize, ny: usize) -> usize {
    i + j * nx + k * nx * ny
}

/// 3D FFT (in-place, complex-to-complex)
///
/// Matches numpy.fft.fftn behavior. Plans a fresh workspace; use
/// [`Fft3dWorkspace`] when transforming repeatedly.
pub fn fft3d(data: &mut [Complex64], nx: usize, ny: usize, nz: usize) {
    Fft3dWorkspace::new(nx, ny, nz).fft3d(data);
}

/// 3D IFFT (in-place, complex-to-complex)
///
/// Matches numpy.fft.ifftn behavior (includes 1/N normalization).
pub fn ifft3d(data: &mut [Complex64], nx: usize, ny: usize, nz: usize) {
    Fft3dWorkspace::new(nx, ny, nz).ifft3d(data);
}

fn circular_shift<T: Copy>(
    data: &[T],
    nx: usize, ny: usize, nz: usize,
    (hx, hy, hz): (usize, usize, usize),
) -> Vec<T> {
    let mut out = data.to_vec();

    for k in 0..nz {
        let sk = (k + hz) % nz;
        for j in 0..ny {
            let sj = (j + hy) % ny;
            for i in 0..nx {
                let si = (i + hx) % nx;
                out[idx3d(si, sj, sk, nx, ny)] = data[idx3d(i, j, k, nx, ny)];
            }
        }
    }

    out
}

/// 3D FFT shift: swap halves along every axis so zero-frequency is at center
///
/// Matches numpy.fft.fftshift for 3D data in Fortran order, including odd
/// dimensions. Works for any element type (complex k-space, real images,
/// boolean masks).
pub fn fftshift<T: Copy>(data: &[T], nx: usize, ny: usize, nz: usize) -> Vec<T> {
    circular_shift(data, nx, ny, nz, (nx / 2, ny / 2, nz / 2))
}

/// 3D inverse FFT shift: undo [`fftshift`]
///
/// Matches numpy.fft.ifftshift for 3D data in Fortran order.
pub fn ifftshift<T: Copy>(data: &[T], nx: usize, ny: usize, nz: usize) -> Vec<T> {
    circular_shift(data, nx, ny, nz, (nx.div_ceil(2), ny.div_ceil(2), nz.div_ceil(2)))
}

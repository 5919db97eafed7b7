//! Common test utilities for homodyne-core integration tests

use std::ops::Range;

use homodyne_core::fft::{fft3d, fftshift, idx3d, ifftshift};
use homodyne_core::homodyne::Axis;
use num_complex::Complex64;

/// Route `log` output through the test harness (RUST_LOG=debug to see it)
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Synthetic object: a Gaussian blob with a smooth linear phase
pub struct Phantom {
    pub nx: usize,
    pub ny: usize,
    pub nz: usize,
    /// Ground-truth magnitude, centered layout
    pub magnitude: Vec<f64>,
    /// Ground-truth phase in radians, centered layout
    pub phase: Vec<f64>,
}

impl Phantom {
    /// Blob of width `sigma` at `center`, phase `Σ slope[a] · (p - n/2) / (n/2)`
    pub fn blob(
        nx: usize, ny: usize, nz: usize,
        center: (f64, f64, f64),
        sigma: f64,
        slopes: [f64; 3],
    ) -> Self {
        let n = nx * ny * nz;
        let mut magnitude = vec![0.0; n];
        let mut phase = vec![0.0; n];
        let dims = [nx, ny, nz];

        for k in 0..nz {
            for j in 0..ny {
                for i in 0..nx {
                    let pos = [i as f64, j as f64, k as f64];
                    let c = [center.0, center.1, center.2];
                    let r2: f64 = (0..3).map(|a| (pos[a] - c[a]).powi(2)).sum();

                    let idx = idx3d(i, j, k, nx, ny);
                    magnitude[idx] = (-r2 / (2.0 * sigma * sigma)).exp();
                    phase[idx] = (0..3)
                        .map(|a| {
                            let half = (dims[a] / 2) as f64;
                            slopes[a] * (pos[a] - half) / (dims[a] as f64 / 2.0)
                        })
                        .sum();
                }
            }
        }

        Self { nx, ny, nz, magnitude, phase }
    }

    /// Fully sampled, frequency-centered k-space: fftshift(fft(ifftshift(m·e^{iφ})))
    pub fn kspace(&self) -> Vec<Complex64> {
        let (nx, ny, nz) = (self.nx, self.ny, self.nz);
        let image: Vec<Complex64> = self.magnitude.iter()
            .zip(self.phase.iter())
            .map(|(&m, &p)| Complex64::from_polar(m, p))
            .collect();

        let mut data = ifftshift(&image, nx, ny, nz);
        fft3d(&mut data, nx, ny, nz);
        fftshift(&data, nx, ny, nz)
    }

    /// k-space with every line along `axis` outside `keep` zeroed
    pub fn partial_kspace(&self, axis: Axis, keep: Range<usize>) -> Vec<Complex64> {
        let mut kspace = self.kspace();
        truncate(&mut kspace, axis, keep, self.nx, self.ny, self.nz);
        kspace
    }
}

/// Zero every sample whose index along `axis` falls outside `keep`
pub fn truncate(
    kspace: &mut [Complex64],
    axis: Axis,
    keep: Range<usize>,
    nx: usize, ny: usize, nz: usize,
) {
    for k in 0..nz {
        for j in 0..ny {
            for i in 0..nx {
                if !keep.contains(&[i, j, k][axis.index()]) {
                    kspace[idx3d(i, j, k, nx, ny)] = Complex64::new(0.0, 0.0);
                }
            }
        }
    }
}

/// (i, j, k) of the largest value
pub fn argmax(data: &[f64], nx: usize, ny: usize) -> (usize, usize, usize) {
    let mut best = 0;
    for (idx, &v) in data.iter().enumerate() {
        if v > data[best] {
            best = idx;
        }
    }
    (best % nx, (best / nx) % ny, best / (nx * ny))
}

/// Largest absolute difference between `a` and `b` over the box `region`
pub fn max_abs_diff_in(
    a: &[f64], b: &[f64],
    region: [Range<usize>; 3],
    nx: usize, ny: usize,
) -> f64 {
    let mut worst = 0.0f64;
    for k in region[2].clone() {
        for j in region[1].clone() {
            for i in region[0].clone() {
                let idx = idx3d(i, j, k, nx, ny);
                worst = worst.max((a[idx] - b[idx]).abs());
            }
        }
    }
    worst
}

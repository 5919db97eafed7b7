//! Homodyne weighting filters
//!
//! The high-pass filter H weights the acquired k-space so that every
//! conjugate-symmetric pair sums to 2: singly-sampled lines get weight 2,
//! unsampled lines 0, and the symmetric center a smooth ramp between them.
//! The low-pass filter L = sqrt(max(0, 1 - (H-1)²)) keeps only the
//! symmetric center and is used to estimate the low-resolution phase.

use std::fmt;
use std::ops::Range;
use std::str::FromStr;

use num_complex::Complex64;

use super::sampling::Axis;
use crate::error::HomodyneError;
use crate::fft::idx3d;

/// Shape of the transition ramp across the symmetric center
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Window {
    /// Constant 1 (plain zero-filling across the center)
    Step,
    /// r
    Linear,
    /// (r-1)²·sign(r-1) + 1
    Quadratic,
    /// (r-1)³ + 1
    #[default]
    Cubic,
    /// (r-1)⁴·sign(r-1) + 1
    Quartic,
}

impl Window {
    pub const ALL: [Window; 5] = [
        Window::Step,
        Window::Linear,
        Window::Quadratic,
        Window::Cubic,
        Window::Quartic,
    ];

    /// Evaluate the window on a ramp value r ∈ [0, 2]
    ///
    /// Every window is odd about r = 1, so w(r) + w(2 - r) = 2.
    #[inline]
    pub fn apply(self, r: f64) -> f64 {
        let d = r - 1.0;
        match self {
            Window::Step => 1.0,
            Window::Linear => r,
            Window::Quadratic => d * d.abs() + 1.0,
            Window::Cubic => d * d * d + 1.0,
            Window::Quartic => d * d * d * d.abs() + 1.0,
        }
    }
}

impl FromStr for Window {
    type Err = HomodyneError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "step" => Ok(Window::Step),
            "linear" | "ramp" => Ok(Window::Linear),
            "quadratic" | "quad" => Ok(Window::Quadratic),
            "cubic" | "cube" => Ok(Window::Cubic),
            "quartic" => Ok(Window::Quartic),
            _ => Err(HomodyneError::Config(format!("unknown window '{}'", s))),
        }
    }
}

impl fmt::Display for Window {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Window::Step => "step",
            Window::Linear => "linear",
            Window::Quadratic => "quadratic",
            Window::Cubic => "cubic",
            Window::Quartic => "quartic",
        };
        f.write_str(name)
    }
}

/// High-pass and low-pass profiles along the partial-Fourier axis
#[derive(Clone, Debug, PartialEq)]
pub struct Filters {
    /// Data weighting filter H, values in [0, 2]
    pub high: Vec<f64>,
    /// Phase extraction filter L, values in [0, 1]
    pub low: Vec<f64>,
    /// Positions rewritten by the window ramp (None when sampling is
    /// exactly half and there is no symmetric center)
    pub center: Option<Range<usize>>,
}

/// Build H and L for an axis of length `n` acquired on `sampled`
///
/// # Arguments
/// * `n` - Length of the partial-Fourier axis
/// * `sampled` - Contiguous acquired index range along that axis
/// * `window` - Ramp shape across the symmetric center
pub fn build_filters(n: usize, sampled: Range<usize>, window: Window) -> Filters {
    let mut acquired = vec![0.0; n];
    for v in &mut acquired[sampled.start.min(n)..sampled.end.min(n)] {
        *v = 1.0;
    }

    // H + flip(1 - H): 2 where only this side was acquired, 1 where both
    // sides were, 0 where neither
    let mut high: Vec<f64> = (0..n)
        .map(|i| acquired[i] + 1.0 - acquired[n - 1 - i])
        .collect();

    let first = high.iter().position(|&h| h == 1.0);
    let last = high.iter().rposition(|&h| h == 1.0);

    let center = match (first, last) {
        (Some(first), Some(last)) => {
            // widen by one so the ramp starts and ends on weighted samples
            let lo = first.saturating_sub(1);
            let hi = (last + 1).min(n - 1);
            let start = high[lo];
            let end = high[hi];
            let m = hi - lo + 1;

            for (step, h) in high[lo..=hi].iter_mut().enumerate() {
                let r = if m > 1 {
                    start + (end - start) * step as f64 / (m - 1) as f64
                } else {
                    start
                };
                *h = window.apply(r);
            }
            Some(lo..hi + 1)
        }
        _ => None,
    };

    let low = high.iter()
        .map(|&h| (1.0 - (h - 1.0) * (h - 1.0)).max(0.0).sqrt())
        .collect();

    Filters { high, low, center }
}

/// Multiply a volume by a 1D profile broadcast along `axis`
pub fn apply_along_axis(
    data: &mut [Complex64],
    profile: &[f64],
    axis: Axis,
    nx: usize, ny: usize, nz: usize,
) {
    debug_assert_eq!(data.len(), nx * ny * nz);
    debug_assert_eq!(profile.len(), [nx, ny, nz][axis.index()]);

    for k in 0..nz {
        for j in 0..ny {
            for i in 0..nx {
                let w = profile[[i, j, k][axis.index()]];
                data[idx3d(i, j, k, nx, ny)] *= w;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reflection_60_percent() {
        let filters = build_filters(10, 0..6, Window::Linear);

        // symmetric center at 4..=5, widened to 3..=6
        assert_eq!(filters.center, Some(3..7));
        assert_eq!(&filters.high[..3], &[2.0, 2.0, 2.0]);
        assert_eq!(&filters.high[7..], &[0.0, 0.0, 0.0]);

        // linear ramp from 2 to 0 over four samples
        let expected = [2.0, 4.0 / 3.0, 2.0 / 3.0, 0.0];
        for (h, e) in filters.high[3..7].iter().zip(expected.iter()) {
            assert!((h - e).abs() < 1e-12, "expected {}, got {}", e, h);
        }
    }

    #[test]
    fn test_reflection_other_side() {
        let filters = build_filters(10, 4..10, Window::Cubic);

        assert_eq!(filters.center, Some(3..7));
        assert_eq!(&filters.high[..3], &[0.0, 0.0, 0.0]);
        assert_eq!(&filters.high[7..], &[2.0, 2.0, 2.0]);
        assert!(filters.high[3..7].windows(2).all(|w| w[0] < w[1]), "ramp should rise");
    }

    #[test]
    fn test_conjugate_pairs_sum_to_two() {
        for window in Window::ALL {
            let n = 32;
            let filters = build_filters(n, 0..20, window);
            for i in 0..n {
                let sum = filters.high[i] + filters.high[n - 1 - i];
                assert!((sum - 2.0).abs() < 1e-12,
                    "{}: H[{}] + H[{}] = {}", window, i, n - 1 - i, sum);
            }
        }
    }

    #[test]
    fn test_low_pass_identity() {
        for window in Window::ALL {
            for sampled in [0..20, 9..32, 0..17, 3..30] {
                let filters = build_filters(32, sampled, window);
                for (&h, &l) in filters.high.iter().zip(filters.low.iter()) {
                    let expected = (1.0 - (h - 1.0) * (h - 1.0)).max(0.0).sqrt();
                    assert_eq!(l, expected);
                    assert!((0.0..=1.0).contains(&l));
                }
            }
        }
    }

    #[test]
    fn test_low_pass_keeps_symmetric_center() {
        let filters = build_filters(32, 0..20, Window::Cubic);
        // outside the ramp H is 2 or 0, so L vanishes
        assert_eq!(filters.low[0], 0.0);
        assert_eq!(filters.low[31], 0.0);
        // near the middle H is close to 1
        assert!(filters.low[15] > 0.99 && filters.low[16] > 0.99);
    }

    #[test]
    fn test_step_window_is_binary() {
        let filters = build_filters(32, 0..20, Window::Step);
        let center = filters.center.clone().unwrap();

        for i in center {
            assert_eq!(filters.high[i], 1.0);
            assert_eq!(filters.low[i], 1.0);
        }
        assert!(filters.high.iter().all(|&h| h == 0.0 || h == 1.0 || h == 2.0));
    }

    #[test]
    fn test_half_sampling_has_no_center() {
        let filters = build_filters(10, 0..5, Window::Cubic);
        assert_eq!(filters.center, None);
        assert_eq!(filters.high, vec![2.0, 2.0, 2.0, 2.0, 2.0, 0.0, 0.0, 0.0, 0.0, 0.0]);
        assert!(filters.low.iter().all(|&l| l == 0.0));
    }

    #[test]
    fn test_symmetric_block_is_unweighted() {
        // symmetric acquisition: H is 1 everywhere, ramp clamps at both ends
        let filters = build_filters(10, 2..8, Window::Quartic);
        assert_eq!(filters.center, Some(0..10));
        assert!(filters.high.iter().all(|&h| h == 1.0));
    }

    #[test]
    fn test_window_formulas() {
        assert_eq!(Window::Step.apply(0.3), 1.0);
        assert_eq!(Window::Linear.apply(0.3), 0.3);
        assert!((Window::Quadratic.apply(0.5) - 0.75).abs() < 1e-12);
        assert!((Window::Quadratic.apply(1.5) - 1.25).abs() < 1e-12);
        assert!((Window::Cubic.apply(0.0) - 0.0).abs() < 1e-12);
        assert!((Window::Cubic.apply(2.0) - 2.0).abs() < 1e-12);
        assert!((Window::Quartic.apply(0.5) - 0.9375).abs() < 1e-12);
        assert!((Window::Quartic.apply(1.5) - 1.0625).abs() < 1e-12);
        for window in Window::ALL {
            assert_eq!(window.apply(1.0), 1.0);
        }
    }

    #[test]
    fn test_window_names() {
        assert_eq!("cube".parse::<Window>().unwrap(), Window::Cubic);
        assert_eq!("Ramp".parse::<Window>().unwrap(), Window::Linear);
        assert_eq!("quad".parse::<Window>().unwrap(), Window::Quadratic);
        assert_eq!(Window::default(), Window::Cubic);
        for window in Window::ALL {
            assert_eq!(window.to_string().parse::<Window>().unwrap(), window);
        }
        assert!(matches!("hann".parse::<Window>(), Err(HomodyneError::Config(_))));
    }

    #[test]
    #[should_panic]
    fn test_apply_along_axis_rejects_wrong_profile_length() {
        let mut data = vec![Complex64::new(1.0, 0.0); 2 * 3];
        apply_along_axis(&mut data, &[1.0, 1.0], Axis::Y, 2, 3, 1);
    }

    #[test]
    fn test_apply_along_axis() {
        let (nx, ny, nz) = (2, 3, 1);
        let mut data = vec![Complex64::new(1.0, 1.0); nx * ny * nz];
        apply_along_axis(&mut data, &[0.0, 1.0, 2.0], Axis::Y, nx, ny, nz);

        for i in 0..nx {
            for j in 0..ny {
                assert_eq!(data[idx3d(i, j, 0, nx, ny)], Complex64::new(j as f64, j as f64));
            }
        }
    }
}

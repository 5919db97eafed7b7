//! Conjugate Gradient solver
//!
//! Solves Ax = b for an operator A on complex vectors that is symmetric
//! positive definite with respect to the real inner product
//! ⟨u, v⟩ = Re(Σ conj(uᵢ)·vᵢ).
//!
//! Treating ℂⁿ as ℝ²ⁿ this way admits operators that are only real-linear,
//! such as x ↦ i·Im(x), which a Hermitian CG cannot handle.

use num_complex::Complex64;

/// Real part of the Hermitian inner product
#[inline]
pub fn real_dot(u: &[Complex64], v: &[Complex64]) -> f64 {
    u.iter().zip(v.iter())
        .map(|(a, b)| a.re * b.re + a.im * b.im)
        .sum()
}

/// Conjugate gradient solver
///
/// Solves Ax = b where A is a linear operator represented by a closure.
/// No preconditioner is applied.
///
/// # Arguments
/// * `a_op` - Closure that computes A*x
/// * `b` - Right-hand side vector
/// * `x0` - Initial guess
/// * `tol` - Relative residual tolerance (0 runs all `max_iter` iterations)
/// * `max_iter` - Maximum iterations
///
/// # Returns
/// Solution vector x
pub fn cg_solve<F>(
    mut a_op: F,
    b: &[Complex64],
    x0: &[Complex64],
    tol: f64,
    max_iter: usize,
) -> Vec<Complex64>
where
    F: FnMut(&[Complex64]) -> Vec<Complex64>,
{
    let mut x = x0.to_vec();

    // r = b - A*x
    let ax = a_op(&x);
    let mut r: Vec<Complex64> = b.iter().zip(ax.iter())
        .map(|(&bi, &axi)| bi - axi)
        .collect();

    let mut p = r.clone();

    let mut rsold = real_dot(&r, &r);
    let b_norm = real_dot(b, b).sqrt();

    for iter in 0..max_iter {
        let ap = a_op(&p);

        let pap = real_dot(&p, &ap);
        if pap.abs() < 1e-30 {
            break;
        }

        let alpha = rsold / pap;

        // x = x + alpha * p, r = r - alpha * A*p
        for ((xi, ri), (&pi, &api)) in x.iter_mut().zip(r.iter_mut()).zip(p.iter().zip(ap.iter())) {
            *xi += pi * alpha;
            *ri -= api * alpha;
        }

        let rsnew = real_dot(&r, &r);
        log::debug!("cg iteration {}: residual {:.3e}", iter + 1, rsnew.sqrt());

        if rsnew.sqrt() <= tol * b_norm {
            break;
        }

        let beta = rsnew / rsold;

        // p = r + beta * p
        for (pi, &ri) in p.iter_mut().zip(r.iter()) {
            *pi = ri + *pi * beta;
        }

        rsold = rsnew;
    }

    x
}

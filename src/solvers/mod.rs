//! Iterative solvers
//!
//! - CG: Conjugate gradient over complex vectors for operators that are
//!   self-adjoint and positive definite under the real inner product

pub mod cg;

pub use cg::*;

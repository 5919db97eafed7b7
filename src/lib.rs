//! Homodyne-Core: partial-Fourier MRI reconstruction
//!
//! This crate reconstructs real-valued images from k-space that was
//! acquired on only part of one spatial frequency axis.
//!
//! # Modules
//! - `fft`: 3D FFT operations using rustfft, fftshift/ifftshift
//! - `homodyne`: Sampling detection, filters, phase estimation and the
//!   homodyne, POCS and least-squares reconstructions
//! - `solvers`: Iterative solvers (CG)
//! - `utils`: Gaussian smoothing, comparison metrics
//! - `nifti_io`: NIfTI output
//!
//! # Example
//! ```no_run
//! use homodyne_core::homodyne::{homodyne, HomodyneOptions, Method};
//! # let (nx, ny, nz) = (64, 64, 1);
//! # let kspace = vec![num_complex::Complex64::new(0.0, 0.0); nx * ny * nz];
//! let options = HomodyneOptions { method: Method::Pocs, ..Default::default() };
//! let recon = homodyne(&kspace, nx, ny, nz, 1, &options)?;
//! println!("partial-Fourier axis: {}", recon.sampling.dim);
//! # Ok::<(), homodyne_core::HomodyneError>(())
//! ```

// Core modules
pub mod error;
pub mod fft;

// Algorithm modules
pub mod homodyne;
pub mod solvers;
pub mod utils;

// I/O modules
pub mod nifti_io;

pub use error::{HomodyneError, Result};
pub use homodyne::{homodyne, homodyne_default, HomodyneOptions, Method, Reconstruction, Window};

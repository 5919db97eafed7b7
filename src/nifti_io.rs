//! NIfTI-1 output for reconstructed volumes
//!
//! Writes real-valued volumes (reconstructed images, phase maps) as
//! single-file float32 NIfTI-1, optionally gzip compressed.

use std::io::Write;
use std::path::Path;

use flate2::write::GzEncoder;
use flate2::Compression;

use crate::error::{HomodyneError, Result};

const HEADER_SIZE: usize = 348;
/// Header plus the 4-byte extension flag
const VOX_OFFSET: usize = 352;
const DT_FLOAT32: i16 = 16;

/// Scaling affine (4x4, row-major) for the given voxel sizes
pub fn identity_affine(voxel_size: (f64, f64, f64)) -> [f64; 16] {
    let (vsx, vsy, vsz) = voxel_size;
    [
        vsx, 0.0, 0.0, 0.0,
        0.0, vsy, 0.0, 0.0,
        0.0, 0.0, vsz, 0.0,
        0.0, 0.0, 0.0, 1.0,
    ]
}

fn put(header: &mut [u8], offset: usize, bytes: &[u8]) {
    header[offset..offset + bytes.len()].copy_from_slice(bytes);
}

fn build_header(
    dims: (usize, usize, usize),
    voxel_size: (f64, f64, f64),
    affine: &[f64; 16],
    description: &str,
) -> Result<[u8; HEADER_SIZE]> {
    let (nx, ny, nz) = dims;
    let (vsx, vsy, vsz) = voxel_size;
    let mut header = [0u8; HEADER_SIZE];

    put(&mut header, 0, &(HEADER_SIZE as i32).to_le_bytes());

    // dim[0..8]
    let ndim: i16 = if nz > 1 { 3 } else { 2 };
    let [dx, dy, dz] = [nx, ny, nz].map(i16::try_from);
    let (dx, dy, dz) = match (dx, dy, dz) {
        (Ok(dx), Ok(dy), Ok(dz)) => (dx, dy, dz),
        _ => {
            return Err(HomodyneError::InputShape(format!(
                "{}x{}x{} does not fit a NIfTI-1 header (max {} per axis)",
                nx, ny, nz, i16::MAX
            )))
        }
    };
    let dim: [i16; 8] = [ndim, dx, dy, dz, 1, 1, 1, 1];
    for (i, d) in dim.iter().enumerate() {
        put(&mut header, 40 + 2 * i, &d.to_le_bytes());
    }

    put(&mut header, 70, &DT_FLOAT32.to_le_bytes());
    put(&mut header, 72, &32i16.to_le_bytes()); // bitpix

    let pixdim: [f32; 8] = [1.0, vsx as f32, vsy as f32, vsz as f32, 1.0, 1.0, 1.0, 1.0];
    for (i, p) in pixdim.iter().enumerate() {
        put(&mut header, 76 + 4 * i, &p.to_le_bytes());
    }

    put(&mut header, 108, &(VOX_OFFSET as f32).to_le_bytes());
    put(&mut header, 112, &1.0f32.to_le_bytes()); // scl_slope

    // descrip, 80 bytes, NUL terminated
    let descrip = description.as_bytes();
    let len = descrip.len().min(79);
    put(&mut header, 148, &descrip[..len]);

    put(&mut header, 254, &1i16.to_le_bytes()); // sform_code: scanner anat

    // srow_x, srow_y, srow_z
    for (row, offset) in [280usize, 296, 312].iter().enumerate() {
        for col in 0..4 {
            put(&mut header, offset + 4 * col, &(affine[4 * row + col] as f32).to_le_bytes());
        }
    }

    put(&mut header, 344, b"n+1\0");
    Ok(header)
}

/// Encode a volume as uncompressed NIfTI-1 bytes
///
/// # Arguments
/// * `data` - Volume (nx * ny * nz), Fortran order
/// * `dims` - (nx, ny, nz)
/// * `voxel_size` - Voxel sizes in mm
/// * `affine` - 4x4 row-major voxel-to-world transform
pub fn save_nifti(
    data: &[f64],
    dims: (usize, usize, usize),
    voxel_size: (f64, f64, f64),
    affine: &[f64; 16],
) -> Result<Vec<u8>> {
    let header = build_header(dims, voxel_size, affine, "partial-Fourier reconstruction")?;

    let mut buffer = Vec::with_capacity(VOX_OFFSET + data.len() * 4);
    buffer.write_all(&header)?;
    buffer.write_all(&[0u8; VOX_OFFSET - HEADER_SIZE])?;
    for &val in data {
        buffer.write_all(&(val as f32).to_le_bytes())?;
    }

    Ok(buffer)
}

/// Encode a volume as gzipped NIfTI-1 bytes (.nii.gz)
pub fn save_nifti_gz(
    data: &[f64],
    dims: (usize, usize, usize),
    voxel_size: (f64, f64, f64),
    affine: &[f64; 16],
) -> Result<Vec<u8>> {
    let uncompressed = save_nifti(data, dims, voxel_size, affine)?;

    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(&uncompressed)?;
    Ok(encoder.finish()?)
}

/// Save a volume to a file
///
/// Paths ending in .nii.gz are gzip compressed, anything else is written
/// as uncompressed .nii.
pub fn save_nifti_to_file(
    path: &Path,
    data: &[f64],
    dims: (usize, usize, usize),
    voxel_size: (f64, f64, f64),
    affine: &[f64; 16],
) -> Result<()> {
    let bytes = if path.to_string_lossy().ends_with(".nii.gz") {
        save_nifti_gz(data, dims, voxel_size, affine)?
    } else {
        save_nifti(data, dims, voxel_size, affine)?
    };

    std::fs::write(path, bytes)?;
    log::debug!("wrote {}", path.display());
    Ok(())
}

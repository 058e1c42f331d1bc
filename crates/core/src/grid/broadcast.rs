//! Shape broadcasting rules
//!
//! Follows the NumPy convention: shapes are aligned on their trailing axes,
//! and along each axis the sizes must be equal or one of them must be 1.

use crate::error::{ThermoError, ThermoResult};

/// Compute the shape every input broadcasts to
///
/// # Errors
///
/// Returns [`ThermoError::ShapeMismatch`] naming the accumulated shape and
/// the first shape that cannot be stretched to it.
pub fn broadcast_shape(shapes: &[&[usize]]) -> ThermoResult<Vec<usize>> {
    let ndim = shapes.iter().map(|s| s.len()).max().unwrap_or(0);
    let mut out = vec![1usize; ndim];

    for shape in shapes {
        let offset = ndim - shape.len();
        for (axis, &size) in shape.iter().enumerate() {
            let slot = &mut out[offset + axis];
            if *slot == size || size == 1 {
                continue;
            }
            if *slot == 1 {
                *slot = size;
            } else {
                return Err(ThermoError::ShapeMismatch {
                    left: out.clone(),
                    right: shape.to_vec(),
                });
            }
        }
    }

    Ok(out)
}

/// Common length of flat buffers, where a length-1 buffer broadcasts
///
/// # Errors
///
/// Returns [`ThermoError::ShapeMismatch`] when two buffers longer than one
/// element differ in length.
pub fn broadcast_len(lens: &[usize]) -> ThermoResult<usize> {
    let target = lens.iter().copied().find(|&len| len != 1).unwrap_or(1);
    match lens.iter().find(|&&len| len != 1 && len != target) {
        Some(&bad) => Err(ThermoError::ShapeMismatch {
            left: vec![target],
            right: vec![bad],
        }),
        None => Ok(target),
    }
}

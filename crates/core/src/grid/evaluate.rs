//! Element-wise evaluation of stage plans over arrays and flat buffers
//!
//! Every cell is independent, so cells are split across the rayon pool
//! when [`ComputeConfig::use_parallel`] allows it. Non-finite results are
//! kept as they are; a debug log reports how many cells produced them.

use super::broadcast::{broadcast_len, broadcast_shape};
use crate::config::ComputeConfig;
use crate::core_types::Real;
use crate::error::{ThermoError, ThermoResult};
use crate::pipeline::{StagePlan, MAX_PLAN_INPUTS};
use ndarray::{ArrayD, ArrayViewD, IxDyn, Zip};
use rayon::prelude::*;
use tracing::{debug, trace};

/// Cells handed to one rayon task when filling flat buffers
const SLICE_CHUNK_SIZE: usize = 1024;

fn log_non_finite<'a, T: Real>(plan: &StagePlan, values: impl Iterator<Item = &'a T>) {
    if tracing::enabled!(tracing::Level::DEBUG) {
        let non_finite = values.filter(|v| !v.to_f64().is_finite()).count();
        if non_finite > 0 {
            debug!(
                "Plan '{}' produced {} non-finite cells",
                plan.name(),
                non_finite
            );
        }
    }
}

/// Evaluate a plan cell by cell over broadcast-compatible arrays
///
/// `inputs` supplies one array per [`StagePlan::inputs`] entry, in the same
/// order. Arrays are broadcast together with NumPy rules and the result has
/// the broadcast shape and the inputs' element type.
///
/// # Errors
///
/// - [`ThermoError::InputCount`] if the number of arrays is wrong
/// - [`ThermoError::ShapeMismatch`] if the shapes cannot be broadcast
pub fn evaluate_plan<T: Real>(
    plan: &StagePlan,
    inputs: &[ArrayViewD<'_, T>],
    config: &ComputeConfig,
) -> ThermoResult<ArrayD<T>> {
    plan.check_input_count(inputs.len())?;

    let shapes: Vec<&[usize]> = inputs.iter().map(|a| a.shape()).collect();
    let shape = broadcast_shape(&shapes)?;
    let cells: usize = shape.iter().product();

    // Unused producer slots read a NaN scalar stretched to the output shape
    let filler = ArrayD::from_elem(IxDyn(&[]), T::nan());
    let mut views = Vec::with_capacity(MAX_PLAN_INPUTS);
    for input in inputs {
        let view = input
            .broadcast(IxDyn(&shape))
            .ok_or_else(|| ThermoError::ShapeMismatch {
                left: shape.clone(),
                right: input.shape().to_vec(),
            })?;
        views.push(view);
    }
    while views.len() < MAX_PLAN_INPUTS {
        let view = filler
            .broadcast(IxDyn(&shape))
            .ok_or_else(|| ThermoError::ShapeMismatch {
                left: shape.clone(),
                right: Vec::new(),
            })?;
        views.push(view);
    }

    let arity = inputs.len();
    let cell = move |&a: &T, &b: &T, &c: &T, &d: &T| {
        let values = [a, b, c, d];
        plan.evaluate_unchecked(&values[..arity])
    };

    let zip = Zip::from(&views[0])
        .and(&views[1])
        .and(&views[2])
        .and(&views[3]);

    let parallel = config.use_parallel(cells);
    trace!(
        "Evaluating plan '{}' over {:?} ({} cells, parallel={})",
        plan.name(),
        shape,
        cells,
        parallel
    );

    let out = if parallel {
        zip.par_map_collect(cell)
    } else {
        zip.map_collect(cell)
    };

    log_non_finite(plan, out.iter());
    Ok(out)
}

/// Evaluate a plan over flat, equal-length buffers
///
/// Each entry of `inputs` is either as long as `out` or holds a single
/// value that is applied to every cell.
///
/// # Errors
///
/// - [`ThermoError::InputCount`] if the number of buffers is wrong
/// - [`ThermoError::ShapeMismatch`] if two buffers differ in length
/// - [`ThermoError::OutputLength`] if `out` does not match the inputs
pub fn evaluate_plan_slices<T: Real>(
    plan: &StagePlan,
    inputs: &[&[T]],
    out: &mut [T],
    config: &ComputeConfig,
) -> ThermoResult<()> {
    plan.check_input_count(inputs.len())?;

    let lens: Vec<usize> = inputs.iter().map(|s| s.len()).collect();
    let expected = broadcast_len(&lens)?;
    if out.len() != expected {
        return Err(ThermoError::OutputLength {
            expected,
            got: out.len(),
        });
    }

    let fill = |offset: usize, chunk: &mut [T]| {
        let mut values = [T::nan(); MAX_PLAN_INPUTS];
        for (j, slot) in chunk.iter_mut().enumerate() {
            let i = offset + j;
            for (k, input) in inputs.iter().enumerate() {
                values[k] = if input.len() == 1 { input[0] } else { input[i] };
            }
            *slot = plan.evaluate_unchecked(&values[..inputs.len()]);
        }
    };

    let parallel = config.use_parallel(out.len());
    trace!(
        "Evaluating plan '{}' over {} buffer cells (parallel={})",
        plan.name(),
        out.len(),
        parallel
    );

    if parallel {
        out.par_chunks_mut(SLICE_CHUNK_SIZE)
            .enumerate()
            .for_each(|(chunk_idx, chunk)| fill(chunk_idx * SLICE_CHUNK_SIZE, chunk));
    } else {
        fill(0, out);
    }

    log_non_finite(plan, out.iter());
    Ok(())
}

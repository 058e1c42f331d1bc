//! Arrays with named dimensions and optional coordinates
//!
//! Labeled inputs are aligned by dimension *name*, not position: a field on
//! `(time, lat, lon)` combines with a field on `(lat, lon)` or `(lon, lat)`
//! without any manual transposition. Dimensions missing from an input are
//! broadcast. Shared dimensions must agree in length and, when both inputs
//! carry coordinates for them, in coordinate values.

use super::evaluate::evaluate_plan;
use crate::config::ComputeConfig;
use crate::core_types::Real;
use crate::error::{ThermoError, ThermoResult};
use crate::pipeline::StagePlan;
use ndarray::{ArrayD, ArrayViewD, Axis, IxDyn};
use rustc_hash::FxHashMap;

/// N-dimensional array with dimension names, coordinates and metadata
#[derive(Debug, Clone, PartialEq)]
pub struct LabeledField<T> {
    data: ArrayD<T>,
    dims: Vec<String>,
    coords: FxHashMap<String, Vec<f64>>,
    name: Option<String>,
    units: Option<String>,
}

impl<T: Real> LabeledField<T> {
    /// Wrap an array, naming each of its axes
    ///
    /// # Errors
    ///
    /// Returns [`ThermoError::Dimension`] if the number of names differs
    /// from the array's rank or a name repeats.
    pub fn new<S: Into<String>>(
        data: ArrayD<T>,
        dims: impl IntoIterator<Item = S>,
    ) -> ThermoResult<Self> {
        let dims: Vec<String> = dims.into_iter().map(Into::into).collect();
        if dims.len() != data.ndim() {
            return Err(ThermoError::Dimension(format!(
                "{} dimension names for an array of rank {}",
                dims.len(),
                data.ndim()
            )));
        }
        for (i, dim) in dims.iter().enumerate() {
            if dims[..i].contains(dim) {
                return Err(ThermoError::Dimension(format!(
                    "dimension '{dim}' named twice"
                )));
            }
        }

        Ok(Self {
            data,
            dims,
            coords: FxHashMap::default(),
            name: None,
            units: None,
        })
    }

    /// Zero-dimensional field holding a single value
    pub fn scalar(value: T) -> Self {
        Self {
            data: ArrayD::from_elem(IxDyn(&[]), value),
            dims: Vec::new(),
            coords: FxHashMap::default(),
            name: None,
            units: None,
        }
    }

    /// Attach coordinate values to a dimension
    ///
    /// # Errors
    ///
    /// Returns [`ThermoError::Dimension`] if the dimension does not exist
    /// or the coordinate length differs from the dimension length.
    pub fn with_coord(mut self, dim: &str, values: Vec<f64>) -> ThermoResult<Self> {
        let len = self.dim_len(dim).ok_or_else(|| {
            ThermoError::Dimension(format!("no dimension '{dim}' to attach coordinates to"))
        })?;
        if values.len() != len {
            return Err(ThermoError::Dimension(format!(
                "{} coordinates for dimension '{dim}' of length {len}",
                values.len()
            )));
        }
        self.coords.insert(dim.to_string(), values);
        Ok(self)
    }

    /// Set the variable name
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Set the unit string
    pub fn with_units(mut self, units: impl Into<String>) -> Self {
        self.units = Some(units.into());
        self
    }

    pub fn data(&self) -> &ArrayD<T> {
        &self.data
    }

    pub fn into_data(self) -> ArrayD<T> {
        self.data
    }

    pub fn dims(&self) -> &[String] {
        &self.dims
    }

    pub fn shape(&self) -> &[usize] {
        self.data.shape()
    }

    pub fn coord(&self, dim: &str) -> Option<&[f64]> {
        self.coords.get(dim).map(Vec::as_slice)
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn units(&self) -> Option<&str> {
        self.units.as_deref()
    }

    /// Length of a named dimension
    pub fn dim_len(&self, dim: &str) -> Option<usize> {
        self.dims
            .iter()
            .position(|d| d == dim)
            .map(|axis| self.data.len_of(Axis(axis)))
    }

    /// View with axes reordered to `dims`, inserting length-1 axes for
    /// dimensions this field lacks
    ///
    /// Every dimension of `self` must appear in `dims`.
    fn aligned_view(&self, dims: &[String]) -> ArrayViewD<'_, T> {
        let mut view = self.data.view();
        let mut order = Vec::with_capacity(dims.len());
        let mut next_axis = self.dims.len();

        for dim in dims {
            if let Some(axis) = self.dims.iter().position(|d| d == dim) {
                order.push(axis);
            } else {
                view = view.insert_axis(Axis(next_axis));
                order.push(next_axis);
                next_axis += 1;
            }
        }

        view.permuted_axes(IxDyn(&order))
    }
}

/// Union of dimensions in order of first appearance, with merged coordinates
struct Alignment {
    dims: Vec<String>,
    coords: FxHashMap<String, Vec<f64>>,
}

fn align<T: Real>(inputs: &[&LabeledField<T>]) -> ThermoResult<Alignment> {
    let mut dims: Vec<String> = Vec::new();
    // Length of each dimension and the shape of the input that introduced it
    let mut lens: Vec<(usize, &[usize])> = Vec::new();
    let mut coords: FxHashMap<String, Vec<f64>> = FxHashMap::default();

    for field in inputs {
        for (axis, dim) in field.dims.iter().enumerate() {
            let len = field.data.len_of(Axis(axis));
            match dims.iter().position(|d| d == dim) {
                Some(i) if lens[i].0 != len => {
                    return Err(ThermoError::ShapeMismatch {
                        left: lens[i].1.to_vec(),
                        right: field.data.shape().to_vec(),
                    });
                }
                Some(_) => {}
                None => {
                    dims.push(dim.clone());
                    lens.push((len, field.data.shape()));
                }
            }

            if let Some(values) = field.coords.get(dim) {
                match coords.get(dim) {
                    Some(existing) if existing != values => {
                        return Err(ThermoError::CoordinateMismatch { dim: dim.clone() });
                    }
                    Some(_) => {}
                    None => {
                        coords.insert(dim.clone(), values.clone());
                    }
                }
            }
        }
    }

    Ok(Alignment { dims, coords })
}

/// Evaluate a plan cell by cell over labeled fields aligned by dimension name
///
/// The output's dimensions are the union of the input dimensions in order
/// of first appearance, its coordinates are the merged input coordinates,
/// and its name and units come from the plan's output quantity.
///
/// # Errors
///
/// - [`ThermoError::InputCount`] if the number of fields is wrong
/// - [`ThermoError::ShapeMismatch`] if a shared dimension differs in length
/// - [`ThermoError::CoordinateMismatch`] if shared coordinates differ
pub fn evaluate_plan_labeled<T: Real>(
    plan: &StagePlan,
    inputs: &[&LabeledField<T>],
    config: &ComputeConfig,
) -> ThermoResult<LabeledField<T>> {
    let Alignment { dims, coords } = align(inputs)?;
    let views: Vec<ArrayViewD<'_, T>> = inputs.iter().map(|f| f.aligned_view(&dims)).collect();
    let data = evaluate_plan(plan, &views, config)?;

    let output = plan.output();
    Ok(LabeledField {
        data,
        dims,
        coords,
        name: Some(output.short_name().to_string()),
        units: Some(output.units().to_string()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::{derive_rh, RELATIVE_HUMIDITY_PLAN};
    use ndarray::{arr1, arr2, Array};

    #[test]
    fn test_new_validates_rank() {
        let data = arr2(&[[1.0_f64, 2.0]]).into_dyn();
        assert!(LabeledField::new(data.clone(), ["lat"]).is_err());
        assert!(LabeledField::new(data.clone(), ["lat", "lat"]).is_err());
        assert!(LabeledField::new(data, ["lat", "lon"]).is_ok());
    }

    #[test]
    fn test_coord_length_checked() {
        let field = LabeledField::new(arr1(&[1.0_f64, 2.0]).into_dyn(), ["lon"]).unwrap();
        assert!(field.clone().with_coord("lon", vec![0.0]).is_err());
        assert!(field.clone().with_coord("lat", vec![0.0, 1.0]).is_err());
        let field = field.with_coord("lon", vec![0.0, 1.0]).unwrap();
        assert_eq!(field.coord("lon"), Some(&[0.0, 1.0][..]));
    }

    #[test]
    fn test_alignment_by_name_transposes() {
        // tref on (lat, lon), sh on (lon, lat): same cells, different axis order
        let tref = Array::from_shape_vec((2, 3), vec![290.0_f64, 291.0, 292.0, 293.0, 294.0, 295.0])
            .unwrap()
            .into_dyn();
        let sh = tref.t().mapv(|t| (t - 280.0) / 1000.0);

        let tref = LabeledField::new(tref, ["lat", "lon"]).unwrap();
        let sh = LabeledField::new(sh, ["lon", "lat"]).unwrap();
        let p = LabeledField::scalar(1000.0_f64);

        let out = evaluate_plan_labeled(
            &RELATIVE_HUMIDITY_PLAN,
            &[&tref, &sh, &p],
            &ComputeConfig::sequential(),
        )
        .unwrap();

        assert_eq!(out.dims(), &["lat".to_string(), "lon".to_string()]);
        assert_eq!(out.shape(), &[2, 3]);
        assert_eq!(out.name(), Some("rh"));
        assert_eq!(out.units(), Some("%"));
        for lat in 0..2 {
            for lon in 0..3 {
                let t = tref.data()[[lat, lon]];
                let expected = derive_rh(t, (t - 280.0) / 1000.0, 1000.0);
                assert_eq!(out.data()[[lat, lon]], expected);
            }
        }
    }

    #[test]
    fn test_missing_dimension_broadcasts() {
        let tref = LabeledField::new(arr2(&[[290.0_f64, 300.0], [295.0, 305.0]]).into_dyn(), ["time", "lon"])
            .unwrap()
            .with_coord("lon", vec![10.0, 20.0])
            .unwrap();
        let p = LabeledField::new(arr1(&[1000.0_f64, 900.0]).into_dyn(), ["lon"])
            .unwrap()
            .with_coord("lon", vec![10.0, 20.0])
            .unwrap();
        let sh = LabeledField::scalar(0.01_f64);

        let out = evaluate_plan_labeled(
            &RELATIVE_HUMIDITY_PLAN,
            &[&tref, &sh, &p],
            &ComputeConfig::sequential(),
        )
        .unwrap();

        assert_eq!(out.shape(), &[2, 2]);
        assert_eq!(out.coord("lon"), Some(&[10.0, 20.0][..]));
        assert_eq!(out.data()[[1, 1]], derive_rh(305.0, 0.01, 900.0));
    }

    #[test]
    fn test_new_dimension_appended() {
        let tref = LabeledField::new(arr1(&[290.0_f64, 300.0]).into_dyn(), ["lat"]).unwrap();
        let p = LabeledField::new(arr1(&[1000.0_f64, 950.0, 900.0]).into_dyn(), ["level"]).unwrap();
        let sh = LabeledField::scalar(0.005_f64);

        let out = evaluate_plan_labeled(
            &RELATIVE_HUMIDITY_PLAN,
            &[&tref, &sh, &p],
            &ComputeConfig::sequential(),
        )
        .unwrap();

        assert_eq!(out.dims(), &["lat".to_string(), "level".to_string()]);
        assert_eq!(out.shape(), &[2, 3]);
        assert_eq!(out.data()[[0, 2]], derive_rh(290.0, 0.005, 900.0));
    }

    #[test]
    fn test_length_mismatch_rejected() {
        let a = LabeledField::new(arr1(&[290.0_f64, 300.0]).into_dyn(), ["lat"]).unwrap();
        let b = LabeledField::new(arr1(&[0.01_f64, 0.01, 0.01]).into_dyn(), ["lat"]).unwrap();
        let p = LabeledField::scalar(1000.0_f64);
        let err = evaluate_plan_labeled(&RELATIVE_HUMIDITY_PLAN, &[&a, &b, &p], &ComputeConfig::default())
            .unwrap_err();
        assert_eq!(
            err,
            ThermoError::ShapeMismatch {
                left: vec![2],
                right: vec![3],
            }
        );
    }

    #[test]
    fn test_coordinate_mismatch_rejected() {
        let a = LabeledField::new(arr1(&[290.0_f64, 300.0]).into_dyn(), ["lat"])
            .unwrap()
            .with_coord("lat", vec![-10.0, 10.0])
            .unwrap();
        let b = LabeledField::new(arr1(&[0.01_f64, 0.02]).into_dyn(), ["lat"])
            .unwrap()
            .with_coord("lat", vec![-5.0, 5.0])
            .unwrap();
        let p = LabeledField::scalar(1000.0_f64);
        let err = evaluate_plan_labeled(&RELATIVE_HUMIDITY_PLAN, &[&a, &b, &p], &ComputeConfig::default())
            .unwrap_err();
        assert_eq!(
            err,
            ThermoError::CoordinateMismatch {
                dim: "lat".to_string()
            }
        );
    }
}

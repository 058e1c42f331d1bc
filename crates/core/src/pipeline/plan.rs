//! Ordered stage sequences with validated data dependencies
//!
//! A [`StagePlan`] names the quantities supplied per grid point, the stages
//! to run in order, and the quantity it returns. Plans are checked once when
//! built, so per-point evaluation is a straight run through the stage list
//! with no branching on missing data.

use super::stage::Stage;
use crate::core_types::{Quantity, Real};
use crate::error::{ThermoError, ThermoResult};
use std::borrow::Cow;
use std::fmt;

/// Upper bound on the number of per-point inputs a plan may declare
pub const MAX_PLAN_INPUTS: usize = 4;

/// Shared prefix of every specific-humidity plan: `esat → wsat → rh`
pub const RELATIVE_HUMIDITY_STAGES: [Stage; 3] = [
    Stage::SaturationVaporPressure,
    Stage::SaturationMixingRatio,
    Stage::RelativeHumidity,
];

const SH_INPUTS: [Quantity; 3] = [
    Quantity::Temperature,
    Quantity::SpecificHumidity,
    Quantity::Pressure,
];

const RH_INPUTS: [Quantity; 3] = [
    Quantity::Temperature,
    Quantity::RelativeHumidity,
    Quantity::Pressure,
];

/// `(tref, sh, p) → rh`
pub static RELATIVE_HUMIDITY_PLAN: StagePlan =
    StagePlan::from_static("relative_humidity", &SH_INPUTS, &RELATIVE_HUMIDITY_STAGES);

/// `(tref, sh, p) → wbt` via `esat → wsat → rh → w → tl → theta → wbt`
pub static DAVIES_JONES_PLAN: StagePlan = StagePlan::from_static(
    "wbt_davies_jones",
    &SH_INPUTS,
    &[
        Stage::SaturationVaporPressure,
        Stage::SaturationMixingRatio,
        Stage::RelativeHumidity,
        Stage::MixingRatio,
        Stage::LiftingCondensationTemperature,
        Stage::EquivalentPotentialTemperature,
        Stage::WetBulbFromTheta,
    ],
);

/// `(tref, sh, p) → wbt` via `esat → wsat → rh → wbt_stull`
pub static STULL_PLAN: StagePlan = StagePlan::from_static(
    "wbt_stull",
    &SH_INPUTS,
    &[
        Stage::SaturationVaporPressure,
        Stage::SaturationMixingRatio,
        Stage::RelativeHumidity,
        Stage::WetBulbStull,
    ],
);

/// `(tref, rh, p) → wbt` via `esat → wsat → w → tl → theta → wbt`
pub static DAVIES_JONES_FROM_RH_PLAN: StagePlan = StagePlan::from_static(
    "wbt_davies_jones_from_rh",
    &RH_INPUTS,
    &[
        Stage::SaturationVaporPressure,
        Stage::SaturationMixingRatio,
        Stage::MixingRatio,
        Stage::LiftingCondensationTemperature,
        Stage::EquivalentPotentialTemperature,
        Stage::WetBulbFromTheta,
    ],
);

/// `(tref, rh, p) → wbt` via the Stull regression; pressure is accepted but unused
pub static STULL_FROM_RH_PLAN: StagePlan =
    StagePlan::from_static("wbt_stull_from_rh", &RH_INPUTS, &[Stage::WetBulbStull]);

/// An ordered, dependency-checked sequence of derivation stages
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StagePlan {
    name: Cow<'static, str>,
    inputs: Cow<'static, [Quantity]>,
    stages: Cow<'static, [Stage]>,
    output: Quantity,
}

impl StagePlan {
    /// Build a plan from caller-supplied inputs and stages
    ///
    /// # Errors
    ///
    /// Returns [`ThermoError::InvalidPlan`] if the plan has no stages, no
    /// inputs, more than [`MAX_PLAN_INPUTS`] inputs, duplicate inputs, a
    /// stage reading a quantity that is neither an input nor produced by an
    /// earlier stage, or a stage recomputing a quantity already available.
    pub fn new(
        name: impl Into<String>,
        inputs: Vec<Quantity>,
        stages: Vec<Stage>,
    ) -> ThermoResult<Self> {
        let name = name.into();
        let output = match stages.last() {
            Some(stage) => stage.output(),
            None => {
                return Err(ThermoError::InvalidPlan {
                    plan: name,
                    reason: "plan has no stages".to_string(),
                })
            }
        };

        let plan = Self {
            name: Cow::Owned(name),
            inputs: Cow::Owned(inputs),
            stages: Cow::Owned(stages),
            output,
        };
        plan.validate()?;

        tracing::debug!(
            "Built stage plan '{}': {} stages, output {}",
            plan.name,
            plan.stages.len(),
            plan.output
        );
        Ok(plan)
    }

    /// Plan running a single stage on its own declared inputs
    pub fn single(stage: Stage) -> Self {
        Self {
            name: Cow::Borrowed(stage.name()),
            inputs: Cow::Borrowed(stage.inputs()),
            stages: Cow::Owned(vec![stage]),
            output: stage.output(),
        }
    }

    /// Built-in plans; checked by the unit tests below rather than at runtime
    pub(crate) const fn from_static(
        name: &'static str,
        inputs: &'static [Quantity],
        stages: &'static [Stage],
    ) -> Self {
        Self {
            name: Cow::Borrowed(name),
            inputs: Cow::Borrowed(inputs),
            stages: Cow::Borrowed(stages),
            output: stages[stages.len() - 1].output(),
        }
    }

    /// Check the plan's data dependencies
    ///
    /// # Errors
    ///
    /// See [`StagePlan::new`].
    pub fn validate(&self) -> ThermoResult<()> {
        let invalid = |reason: String| ThermoError::InvalidPlan {
            plan: self.name.to_string(),
            reason,
        };

        if self.stages.is_empty() {
            return Err(invalid("plan has no stages".to_string()));
        }
        if self.inputs.is_empty() {
            return Err(invalid("plan declares no inputs".to_string()));
        }
        if self.inputs.len() > MAX_PLAN_INPUTS {
            return Err(invalid(format!(
                "{} inputs exceeds the maximum of {MAX_PLAN_INPUTS}",
                self.inputs.len()
            )));
        }

        let mut available = [false; Quantity::COUNT];
        for q in self.inputs.iter() {
            if available[q.index()] {
                return Err(invalid(format!("input {q} declared twice")));
            }
            available[q.index()] = true;
        }

        for stage in self.stages.iter() {
            if let Some(missing) = stage.inputs().iter().find(|q| !available[q.index()]) {
                return Err(invalid(format!(
                    "stage {stage} needs {missing}, which is not available"
                )));
            }
            let out = stage.output();
            if available[out.index()] {
                return Err(invalid(format!("stage {stage} recomputes {out}")));
            }
            available[out.index()] = true;
        }

        Ok(())
    }

    /// Plan identifier
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Per-point inputs, in the order `evaluate` expects them
    pub fn inputs(&self) -> &[Quantity] {
        &self.inputs
    }

    /// Stages in execution order
    pub fn stages(&self) -> &[Stage] {
        &self.stages
    }

    /// Quantity returned by `evaluate`
    pub fn output(&self) -> Quantity {
        self.output
    }

    /// Fail unless `got` values match the plan's declared inputs
    ///
    /// # Errors
    ///
    /// Returns [`ThermoError::InputCount`] on a count mismatch.
    pub fn check_input_count(&self, got: usize) -> ThermoResult<()> {
        let expected = self.inputs.len();
        if got == expected {
            Ok(())
        } else {
            Err(ThermoError::InputCount {
                plan: self.name.to_string(),
                expected,
                got,
            })
        }
    }

    /// Run every stage for one grid point and return the full state
    ///
    /// `values` holds one value per declared input, in [`inputs`](Self::inputs)
    /// order. Slots no stage touched stay NaN.
    ///
    /// # Errors
    ///
    /// Returns [`ThermoError::InputCount`] if `values` has the wrong length.
    pub fn evaluate_state<T: Real>(&self, values: &[T]) -> ThermoResult<[T; Quantity::COUNT]> {
        self.check_input_count(values.len())?;
        Ok(self.state_unchecked(values))
    }

    /// Run every stage for one grid point and return the plan's output
    ///
    /// # Errors
    ///
    /// Returns [`ThermoError::InputCount`] if `values` has the wrong length.
    pub fn evaluate<T: Real>(&self, values: &[T]) -> ThermoResult<T> {
        self.check_input_count(values.len())?;
        Ok(self.evaluate_unchecked(values))
    }

    /// Per-cell path; callers have already checked the input count
    #[inline]
    pub(crate) fn state_unchecked<T: Real>(&self, values: &[T]) -> [T; Quantity::COUNT] {
        debug_assert_eq!(values.len(), self.inputs.len());

        let mut state = [T::nan(); Quantity::COUNT];
        for (q, value) in self.inputs.iter().zip(values) {
            state[q.index()] = *value;
        }
        for stage in self.stages.iter() {
            state[stage.output().index()] = stage.compute(&state);
        }
        state
    }

    #[inline]
    pub(crate) fn evaluate_unchecked<T: Real>(&self, values: &[T]) -> T {
        self.state_unchecked(values)[self.output.index()]
    }
}

impl fmt::Display for StagePlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: ", self.name)?;
        for (i, stage) in self.stages.iter().enumerate() {
            if i > 0 {
                f.write_str(" → ")?;
            }
            write!(f, "{stage}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::physics;

    fn builtin_plans() -> [&'static StagePlan; 5] {
        [
            &RELATIVE_HUMIDITY_PLAN,
            &DAVIES_JONES_PLAN,
            &STULL_PLAN,
            &DAVIES_JONES_FROM_RH_PLAN,
            &STULL_FROM_RH_PLAN,
        ]
    }

    #[test]
    fn test_builtin_plans_validate() {
        for plan in builtin_plans() {
            plan.validate()
                .unwrap_or_else(|e| panic!("built-in plan {plan} invalid: {e}"));
        }
    }

    #[test]
    fn test_specific_humidity_plans_share_prefix() {
        for plan in [&DAVIES_JONES_PLAN, &STULL_PLAN, &RELATIVE_HUMIDITY_PLAN] {
            assert_eq!(&plan.stages()[..3], &RELATIVE_HUMIDITY_STAGES, "{plan}");
        }
    }

    #[test]
    fn test_outputs() {
        assert_eq!(RELATIVE_HUMIDITY_PLAN.output(), Quantity::RelativeHumidity);
        for plan in &builtin_plans()[1..] {
            assert_eq!(plan.output(), Quantity::WetBulbTemperature);
        }
    }

    #[test]
    fn test_single_stage_plan_matches_formula() {
        let plan = StagePlan::single(Stage::SaturationMixingRatio);
        plan.validate().unwrap();
        assert_eq!(
            plan.evaluate(&[30.0_f64, 1000.0]).unwrap(),
            physics::saturation_mixing_ratio(30.0, 1000.0)
        );
    }

    #[test]
    fn test_missing_dependency_rejected() {
        let err = StagePlan::new(
            "broken",
            vec![Quantity::Temperature, Quantity::Pressure],
            vec![Stage::SaturationVaporPressure, Stage::RelativeHumidity],
        )
        .unwrap_err();
        assert!(
            matches!(&err, ThermoError::InvalidPlan { reason, .. } if reason.contains("needs sh")),
            "unexpected error: {err}"
        );
    }

    #[test]
    fn test_empty_and_duplicate_rejected() {
        assert!(StagePlan::new("empty", vec![Quantity::Temperature], vec![]).is_err());
        assert!(StagePlan::new(
            "dup",
            vec![Quantity::Temperature, Quantity::Temperature],
            vec![Stage::SaturationVaporPressure],
        )
        .is_err());
        assert!(StagePlan::new("no_inputs", vec![], vec![Stage::SaturationVaporPressure]).is_err());
    }

    #[test]
    fn test_recomputation_rejected() {
        let err = StagePlan::new(
            "twice",
            vec![Quantity::Temperature],
            vec![Stage::SaturationVaporPressure, Stage::SaturationVaporPressure],
        )
        .unwrap_err();
        assert!(err.to_string().contains("recomputes esat"));
    }

    #[test]
    fn test_custom_plan_mixing_ratio_from_sh() {
        let plan = StagePlan::new(
            "w_direct",
            vec![Quantity::SpecificHumidity],
            vec![Stage::MixingRatioFromSpecificHumidity],
        )
        .unwrap();
        assert_eq!(plan.output(), Quantity::MixingRatio);
        assert_eq!(
            plan.evaluate(&[0.01_f64]).unwrap(),
            physics::mixing_ratio_from_specific_humidity(0.01)
        );
    }

    #[test]
    fn test_unused_slots_stay_nan() {
        let state = STULL_PLAN.evaluate_state(&[300.0_f64, 0.01, 1013.0]).unwrap();
        assert!(state[Quantity::LiftingCondensationTemperature.index()].is_nan());
        assert!(state[Quantity::WetBulbTemperature.index()].is_finite());
    }

    #[test]
    fn test_too_few_values_rejected() {
        let err = RELATIVE_HUMIDITY_PLAN.evaluate(&[300.0_f64, 0.01]).unwrap_err();
        assert_eq!(
            err,
            ThermoError::InputCount {
                plan: "relative_humidity".to_string(),
                expected: 3,
                got: 2,
            }
        );
        assert!(DAVIES_JONES_PLAN.evaluate_state::<f64>(&[]).is_err());
    }

    #[test]
    fn test_too_many_values_rejected() {
        let err = RELATIVE_HUMIDITY_PLAN
            .evaluate(&[300.0_f64, 0.01, 1013.0, 5.0])
            .unwrap_err();
        assert!(
            matches!(err, ThermoError::InputCount { expected: 3, got: 4, .. }),
            "{err}"
        );
        assert!(STULL_PLAN
            .evaluate_state(&[300.0_f64, 0.01, 1013.0, 5.0])
            .is_err());
    }

    #[test]
    fn test_display_lists_stages() {
        assert_eq!(STULL_FROM_RH_PLAN.to_string(), "wbt_stull_from_rh: wbt_stull");
        assert_eq!(
            RELATIVE_HUMIDITY_PLAN.to_string(),
            "relative_humidity: esat → wsat → rh"
        );
    }
}

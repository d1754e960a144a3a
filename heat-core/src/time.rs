use crate::error::BmiError;

pub const START_TIME: f64 = 0.0;

/// The model runs without a predefined end.
pub const END_TIME: f64 = f64::INFINITY;

/// How `update_until` reaches its target: `whole` nominal steps followed by
/// one pass at `fraction` of the nominal step.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StepPlan {
    pub whole: u64,
    pub fraction: f64,
}

impl StepPlan {
    pub const NONE: StepPlan = StepPlan {
        whole: 0,
        fraction: 0.0,
    };

    pub fn is_empty(&self) -> bool {
        self.whole == 0 && self.fraction == 0.0
    }
}

/// Simulation clock with a nominal fixed step.
#[derive(Clone, Debug, PartialEq)]
pub struct TimeController {
    time: f64,
    time_step: f64,
}

impl TimeController {
    pub fn new(time_step: f64) -> Self {
        TimeController {
            time: START_TIME,
            time_step,
        }
    }

    pub fn start_time(&self) -> f64 {
        START_TIME
    }

    pub fn end_time(&self) -> f64 {
        END_TIME
    }

    pub fn current_time(&self) -> f64 {
        self.time
    }

    pub fn time_step(&self) -> f64 {
        self.time_step
    }

    /// Time units are not defined for this model.
    pub fn time_units(&self) -> Option<&'static str> {
        None
    }

    /// Move the clock forward. Negative increments are ignored.
    pub(crate) fn advance(&mut self, dt: f64) {
        if dt > 0.0 {
            self.time += dt;
        }
    }

    /// Run `f` with the active step temporarily set to `dt`, restoring the
    /// nominal step afterwards.
    pub(crate) fn with_step<R>(&mut self, dt: f64, f: impl FnOnce(&mut Self) -> R) -> R {
        let nominal = std::mem::replace(&mut self.time_step, dt);
        let out = f(self);
        self.time_step = nominal;
        out
    }

    /// Split the distance to `target` into whole and fractional steps.
    ///
    /// Targets at or before the current time yield [`StepPlan::NONE`]; the
    /// fraction always lies in `[0, 1)`.
    pub fn plan_until(&self, target: f64) -> Result<StepPlan, BmiError> {
        if !target.is_finite() {
            return Err(BmiError::InvalidTime(target));
        }
        if target <= self.time {
            return Ok(StepPlan::NONE);
        }
        let n_steps = (target - self.time) / self.time_step;
        if !n_steps.is_finite() {
            return Err(BmiError::InvalidTime(target));
        }
        let whole = n_steps.floor();
        Ok(StepPlan {
            whole: whole as u64,
            fraction: n_steps - whole,
        })
    }
}

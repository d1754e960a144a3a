use std::path::Path;

use tracing::{info, trace};

use crate::config::HeatParams;
use crate::error::{BmiError, ConfigError};
use crate::field::{Field, FieldStore};
use crate::grid::GridSpec;
use crate::stencil::StencilKernel;
use crate::time::TimeController;

/// The 2D heat model: a plate whose temperature diffuses with constant
/// diffusivity while its edges are held fixed.
#[derive(Clone, Debug)]
pub struct Heat {
    grid: GridSpec,
    kernel: StencilKernel,
    clock: TimeController,
    store: FieldStore,
}

impl Default for Heat {
    fn default() -> Self {
        Heat::build(&HeatParams::default())
    }
}

impl Heat {
    pub fn new(params: HeatParams) -> Result<Self, ConfigError> {
        params.validate()?;
        Ok(Heat::build(&params))
    }

    /// Parse a parameter file, then build the model from the parsed record.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        Heat::new(HeatParams::from_path(path)?)
    }

    fn build(params: &HeatParams) -> Self {
        let grid = GridSpec::from_params(params);
        let kernel = StencilKernel::for_grid(&grid, params.alpha);
        let clock = TimeController::new(kernel.stable_time_step());
        let store = FieldStore::new(grid.rows(), grid.cols());

        info!(
            rows = grid.rows(),
            cols = grid.cols(),
            dy = params.dy,
            dx = params.dx,
            alpha = params.alpha,
            time_step = clock.time_step(),
            "heat model initialized"
        );

        Heat {
            grid,
            kernel,
            clock,
            store,
        }
    }

    pub fn grid(&self) -> &GridSpec {
        &self.grid
    }

    pub fn alpha(&self) -> f64 {
        self.kernel.alpha()
    }

    pub fn clock(&self) -> &TimeController {
        &self.clock
    }

    pub fn time(&self) -> f64 {
        self.clock.current_time()
    }

    pub fn time_step(&self) -> f64 {
        self.clock.time_step()
    }

    pub fn temperature(&self) -> &Field {
        self.store.field()
    }

    pub fn set_temperature(&mut self, field: Field) -> Result<(), BmiError> {
        self.store.replace(field)
    }

    /// Row-major copy of the temperature into `dest`.
    pub fn temperature_into(&self, dest: &mut [f64]) -> Result<(), BmiError> {
        self.store.copy_out(dest)
    }

    /// Overwrite the whole temperature field from a row-major buffer.
    pub fn set_temperature_from(&mut self, src: &[f64]) -> Result<(), BmiError> {
        self.store.copy_in(src)
    }

    /// One kernel pass with the nominal time step.
    pub fn advance_in_time(&mut self) {
        kernel_pass(&self.kernel, &mut self.store, &mut self.clock);
    }

    /// One kernel pass with `fraction` of the nominal time step. The nominal
    /// step is unchanged afterwards.
    pub fn advance_fraction(&mut self, fraction: f64) {
        let dt = fraction * self.clock.time_step();
        let kernel = &self.kernel;
        let store = &mut self.store;
        self.clock
            .with_step(dt, |clock| kernel_pass(kernel, store, clock));
    }
}

fn kernel_pass(kernel: &StencilKernel, store: &mut FieldStore, clock: &mut TimeController) {
    let dt = clock.time_step();
    if dt > 0.0 {
        store.advance(|current, next| kernel.apply(current, dt, next));
        clock.advance(dt);
    }
    trace!(dt, time = clock.current_time(), "kernel pass");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_model() {
        let heat = Heat::default();
        assert_eq!(heat.grid().shape(), [8, 6]);
        assert_eq!(heat.time(), 0.0);
        assert_eq!(heat.time_step(), 0.25);
        assert_eq!(heat.alpha(), 1.0);
        assert!(heat.temperature().as_slice().iter().all(|&t| t == 0.0));
    }

    #[test]
    fn time_step_sits_on_stability_bound() {
        let params = HeatParams {
            dx: 0.5,
            dy: 0.8,
            alpha: 2.0,
            ..HeatParams::default()
        };
        let heat = Heat::new(params).unwrap();
        assert_eq!(heat.time_step(), 0.5f64.min(0.8).powi(2) / (4.0 * 2.0));
    }

    #[test]
    fn invalid_parameters_are_rejected() {
        let params = HeatParams {
            dy: -1.0,
            ..HeatParams::default()
        };
        assert!(matches!(
            Heat::new(params),
            Err(ConfigError::Invalid { name: "dy", .. })
        ));
    }

    #[test]
    fn builds_from_parameter_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("heat.json");
        std::fs::write(
            &path,
            r#"{"nRows": 3, "nCols": 4, "dx": 2.0, "dy": 2.0, "xStart": 0.0, "yStart": 0.0, "alpha": 0.5}"#,
        )
        .unwrap();

        let heat = Heat::from_path(&path).unwrap();
        assert_eq!(heat.grid().shape(), [3, 4]);
        assert_eq!(heat.time_step(), 2.0);
        assert!(matches!(
            Heat::from_path(dir.path().join("other.json")),
            Err(ConfigError::NotFound(_))
        ));
    }

    #[test]
    fn advance_moves_clock_by_one_step() {
        let mut heat = Heat::default();
        heat.advance_in_time();
        heat.advance_in_time();
        assert_eq!(heat.time(), 0.5);
    }

    #[test]
    fn fractional_pass_restores_nominal_step() {
        let mut heat = Heat::default();
        heat.advance_fraction(0.5);
        assert_eq!(heat.time(), 0.125);
        assert_eq!(heat.time_step(), 0.25);
    }

    #[test]
    fn zero_fraction_changes_nothing() {
        let mut heat = Heat::default();
        let mut field = Field::zeros(8, 6);
        field[(3, 2)] = 100.0;
        heat.set_temperature(field.clone()).unwrap();
        heat.advance_fraction(0.0);
        assert_eq!(heat.time(), 0.0);
        assert_eq!(heat.temperature(), &field);
    }

    #[test]
    fn set_temperature_checks_shape() {
        let mut heat = Heat::default();
        assert!(heat.set_temperature(Field::zeros(6, 8)).is_err());
        assert!(heat.set_temperature_from(&[1.0; 47]).is_err());
        heat.set_temperature_from(&[1.0; 48]).unwrap();
        assert_eq!(heat.temperature()[(7, 5)], 1.0);
    }
}

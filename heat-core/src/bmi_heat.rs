use std::path::Path;

use tracing::{debug, info, warn};

use crate::bmi::{Bmi, BmiResult};
use crate::config::HeatParams;
use crate::error::BmiError;
use crate::grid::{GRID_ID, GridSpec};
use crate::heat::Heat;
use crate::registry::{VariableInfo, VariableRegistry};

pub const COMPONENT_NAME: &str = "The 2D Heat Equation";

/// Model-control façade over [`Heat`].
///
/// Lifecycle: `new` → [`Bmi::initialize`] → any number of updates and
/// queries → [`Bmi::finalize`]. Every call outside that window fails with
/// [`BmiError::NotInitialized`] or [`BmiError::Finalized`].
#[derive(Debug, Default)]
pub struct BmiHeat {
    state: State,
}

#[derive(Debug, Default)]
enum State {
    #[default]
    Uninitialized,
    Ready(Box<Loaded>),
    Finalized,
}

#[derive(Debug)]
struct Loaded {
    model: Heat,
    vars: VariableRegistry,
}

impl BmiHeat {
    pub fn new() -> Self {
        BmiHeat::default()
    }

    /// Initialize from an already parsed parameter record.
    pub fn initialize_with(&mut self, params: HeatParams) -> BmiResult<()> {
        if matches!(self.state, State::Finalized) {
            warn!("initialize called on a finalized heat model");
            return Err(BmiError::Finalized);
        }
        if matches!(self.state, State::Ready(_)) {
            info!("re-initializing heat model");
        }
        let model = Heat::new(params)?;
        self.state = State::Ready(Box::new(Loaded {
            model,
            vars: VariableRegistry::heat(),
        }));
        Ok(())
    }

    pub fn is_initialized(&self) -> bool {
        matches!(self.state, State::Ready(_))
    }

    fn loaded(&self) -> BmiResult<&Loaded> {
        match &self.state {
            State::Ready(loaded) => Ok(loaded),
            State::Uninitialized => Err(not_initialized()),
            State::Finalized => Err(finalized()),
        }
    }

    fn loaded_mut(&mut self) -> BmiResult<&mut Loaded> {
        match &mut self.state {
            State::Ready(loaded) => Ok(loaded),
            State::Uninitialized => Err(not_initialized()),
            State::Finalized => Err(finalized()),
        }
    }

    fn model(&self) -> BmiResult<&Heat> {
        Ok(&self.loaded()?.model)
    }

    fn model_mut(&mut self) -> BmiResult<&mut Heat> {
        Ok(&mut self.loaded_mut()?.model)
    }

    fn var(&self, name: &str) -> BmiResult<&VariableInfo> {
        self.loaded()?
            .vars
            .get(name)
            .ok_or_else(|| BmiError::UnknownVariable(name.to_string()))
    }

    fn grid(&self, grid: i32) -> BmiResult<&GridSpec> {
        let model = self.model()?;
        if grid == GRID_ID {
            Ok(model.grid())
        } else {
            Err(BmiError::UnknownGrid(grid))
        }
    }
}

fn not_initialized() -> BmiError {
    warn!("heat model used before initialize");
    BmiError::NotInitialized
}

fn finalized() -> BmiError {
    warn!("heat model used after finalize");
    BmiError::Finalized
}

impl Bmi for BmiHeat {
    fn initialize(&mut self, config_file: Option<&Path>) -> BmiResult<()> {
        if matches!(self.state, State::Finalized) {
            return Err(finalized());
        }
        let params = match config_file {
            Some(path) => HeatParams::from_path(path)?,
            None => HeatParams::default(),
        };
        self.initialize_with(params)
    }

    fn update(&mut self) -> BmiResult<()> {
        self.model_mut()?.advance_in_time();
        Ok(())
    }

    fn update_until(&mut self, time: f64) -> BmiResult<()> {
        let model = self.model_mut()?;
        let plan = model.clock().plan_until(time)?;
        debug!(
            target_time = time,
            whole = plan.whole,
            fraction = plan.fraction,
            "update_until"
        );
        for _ in 0..plan.whole {
            model.advance_in_time();
        }
        if plan.fraction > 0.0 {
            model.advance_fraction(plan.fraction);
        }
        Ok(())
    }

    fn update_frac(&mut self, fraction: f64) -> BmiResult<()> {
        let model = self.model_mut()?;
        if !(0.0..=1.0).contains(&fraction) {
            return Err(BmiError::InvalidTime(fraction));
        }
        model.advance_fraction(fraction);
        Ok(())
    }

    fn finalize(&mut self) -> BmiResult<()> {
        let time = self.model()?.time();
        self.state = State::Finalized;
        info!(time, "heat model finalized");
        Ok(())
    }

    fn component_name(&self) -> &str {
        COMPONENT_NAME
    }

    fn input_var_names(&self) -> BmiResult<Vec<&str>> {
        Ok(self.loaded()?.vars.names())
    }

    fn output_var_names(&self) -> BmiResult<Vec<&str>> {
        Ok(self.loaded()?.vars.names())
    }

    fn var_grid(&self, name: &str) -> BmiResult<i32> {
        self.loaded()?
            .vars
            .grid_of(name)
            .ok_or_else(|| BmiError::UnknownVariable(name.to_string()))
    }

    fn var_type(&self, name: &str) -> BmiResult<&str> {
        Ok(self.var(name)?.var_type.as_str())
    }

    fn var_units(&self, name: &str) -> BmiResult<&str> {
        Ok(self.var(name)?.units)
    }

    fn var_itemsize(&self, name: &str) -> BmiResult<usize> {
        Ok(self.var(name)?.itemsize())
    }

    fn var_nbytes(&self, name: &str) -> BmiResult<usize> {
        let var = self.var(name)?;
        Ok(var.itemsize() * self.grid(var.grid)?.size())
    }

    fn var_location(&self, name: &str) -> BmiResult<&str> {
        Ok(self.var(name)?.location.as_str())
    }

    fn start_time(&self) -> BmiResult<f64> {
        Ok(self.model()?.clock().start_time())
    }

    fn end_time(&self) -> BmiResult<f64> {
        Ok(self.model()?.clock().end_time())
    }

    fn current_time(&self) -> BmiResult<f64> {
        Ok(self.model()?.time())
    }

    fn time_step(&self) -> BmiResult<f64> {
        Ok(self.model()?.time_step())
    }

    fn time_units(&self) -> BmiResult<&str> {
        self.model()?
            .clock()
            .time_units()
            .ok_or(BmiError::NotSupported("time_units"))
    }

    fn get_value(&self, name: &str, dest: &mut [f64]) -> BmiResult<()> {
        self.var(name)?;
        self.model()?.temperature_into(dest)
    }

    fn get_value_ref(&self, name: &str) -> BmiResult<&[f64]> {
        self.var(name)?;
        Ok(self.model()?.temperature().as_slice())
    }

    fn set_value(&mut self, name: &str, src: &[f64]) -> BmiResult<()> {
        self.var(name)?;
        self.model_mut()?.set_temperature_from(src)
    }

    fn grid_rank(&self, grid: i32) -> BmiResult<usize> {
        Ok(self.grid(grid)?.rank())
    }

    fn grid_size(&self, grid: i32) -> BmiResult<usize> {
        Ok(self.grid(grid)?.size())
    }

    fn grid_type(&self, grid: i32) -> BmiResult<&str> {
        Ok(self.grid(grid)?.grid_type().as_str())
    }

    fn grid_shape(&self, grid: i32, shape: &mut [usize]) -> BmiResult<()> {
        let g = self.grid(grid)?;
        BmiError::check_len(g.rank(), shape.len())?;
        shape.copy_from_slice(&g.shape());
        Ok(())
    }

    fn grid_spacing(&self, grid: i32, spacing: &mut [f64]) -> BmiResult<()> {
        let g = self.grid(grid)?;
        BmiError::check_len(g.rank(), spacing.len())?;
        spacing.copy_from_slice(&g.spacing());
        Ok(())
    }

    fn grid_origin(&self, grid: i32, origin: &mut [f64]) -> BmiResult<()> {
        let g = self.grid(grid)?;
        BmiError::check_len(g.rank(), origin.len())?;
        origin.copy_from_slice(&g.origin());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::TEMPERATURE;

    fn ready() -> BmiHeat {
        let mut bmi = BmiHeat::new();
        bmi.initialize(None).unwrap();
        bmi
    }

    #[test]
    fn calls_before_initialize_fail() {
        let mut bmi = BmiHeat::new();
        assert!(!bmi.is_initialized());
        assert!(matches!(bmi.update(), Err(BmiError::NotInitialized)));
        assert!(matches!(bmi.current_time(), Err(BmiError::NotInitialized)));
        assert!(matches!(bmi.finalize(), Err(BmiError::NotInitialized)));
        assert_eq!(bmi.component_name(), COMPONENT_NAME);
    }

    #[test]
    fn calls_after_finalize_fail() {
        let mut bmi = ready();
        bmi.finalize().unwrap();
        assert!(matches!(bmi.update(), Err(BmiError::Finalized)));
        assert!(matches!(bmi.var_grid(TEMPERATURE), Err(BmiError::Finalized)));
        assert!(matches!(bmi.initialize(None), Err(BmiError::Finalized)));
        assert!(matches!(
            bmi.initialize(Some(Path::new("/nonexistent/heat.json"))),
            Err(BmiError::Finalized)
        ));
        assert!(matches!(bmi.update_frac(2.0), Err(BmiError::Finalized)));
    }

    #[test]
    fn lifecycle_is_checked_before_arguments() {
        let mut bmi = BmiHeat::new();
        assert!(matches!(bmi.update_frac(2.0), Err(BmiError::NotInitialized)));
        assert!(matches!(bmi.update_until(f64::NAN), Err(BmiError::NotInitialized)));
    }

    #[test]
    fn oversized_grid_is_a_config_error() {
        let mut bmi = BmiHeat::new();
        let err = bmi
            .initialize_with(HeatParams {
                n_rows: usize::MAX / 2 + 1,
                n_cols: 4,
                ..HeatParams::default()
            })
            .unwrap_err();
        assert!(matches!(
            err,
            BmiError::Config(crate::ConfigError::Invalid { name: "nRows", .. })
        ));
        assert!(!bmi.is_initialized());
    }

    #[test]
    fn missing_config_leaves_model_uninitialized() {
        let mut bmi = BmiHeat::new();
        let err = bmi
            .initialize(Some(Path::new("/nonexistent/heat.json")))
            .unwrap_err();
        assert!(matches!(err, BmiError::Config(crate::ConfigError::NotFound(_))));
        assert!(!bmi.is_initialized());
    }

    #[test]
    fn reinitialize_resets_state() {
        let mut bmi = ready();
        bmi.update().unwrap();
        bmi.initialize_with(HeatParams {
            n_rows: 4,
            n_cols: 4,
            ..HeatParams::default()
        })
        .unwrap();
        assert_eq!(bmi.current_time().unwrap(), 0.0);
        assert_eq!(bmi.grid_size(0).unwrap(), 16);
    }

    #[test]
    fn unknown_ids_are_rejected() {
        let bmi = ready();
        assert!(matches!(
            bmi.var_units("land_surface__elevation"),
            Err(BmiError::UnknownVariable(_))
        ));
        assert!(matches!(
            bmi.var_grid("land_surface__elevation"),
            Err(BmiError::UnknownVariable(_))
        ));
        assert_eq!(bmi.var_grid(TEMPERATURE).unwrap(), GRID_ID);
        assert!(matches!(bmi.grid_rank(1), Err(BmiError::UnknownGrid(1))));
        let mut shape = [0usize; 2];
        assert!(bmi.grid_shape(-1, &mut shape).is_err());
    }

    #[test]
    fn update_frac_validates_fraction() {
        let mut bmi = ready();
        assert!(bmi.update_frac(1.5).is_err());
        assert!(bmi.update_frac(-0.1).is_err());
        assert!(bmi.update_frac(f64::NAN).is_err());
        bmi.update_frac(0.5).unwrap();
        assert_eq!(bmi.current_time().unwrap(), 0.125);
        assert_eq!(bmi.time_step().unwrap(), 0.25);
    }

    #[test]
    fn value_ref_matches_copy() {
        let mut bmi = ready();
        let mut src = vec![0.0; 48];
        src[20] = 100.0;
        bmi.set_value(TEMPERATURE, &src).unwrap();
        assert_eq!(bmi.get_value_ref(TEMPERATURE).unwrap(), &src[..]);
    }

    #[test]
    fn buffer_lengths_are_checked() {
        let mut bmi = ready();
        let mut short = [0.0; 47];
        assert!(matches!(
            bmi.get_value(TEMPERATURE, &mut short),
            Err(BmiError::BufferSize { expected: 48, actual: 47 })
        ));
        assert!(bmi.set_value(TEMPERATURE, &short).is_err());
        let mut spacing = [0.0; 3];
        assert!(bmi.grid_spacing(0, &mut spacing).is_err());
    }
}

use heat_core::{Bmi, BmiError, BmiHeat, HeatParams};
use wasm_bindgen::prelude::*;

/// JavaScript handle on the heat model.
///
/// Every failure is flattened to a sentinel: `-1` for numbers, an empty
/// array for buffers, `undefined` for strings and `false` for setters.
#[wasm_bindgen]
pub struct HeatModel {
    inner: BmiHeat,
}

#[wasm_bindgen]
impl HeatModel {
    /// Default plate: 8 × 6 cells, unit spacing, `alpha = 1`.
    #[wasm_bindgen(constructor)]
    pub fn new() -> Result<HeatModel, JsValue> {
        let mut inner = BmiHeat::new();
        inner.initialize(None).map_err(to_js)?;
        Ok(HeatModel { inner })
    }

    #[allow(clippy::too_many_arguments)]
    pub fn with_params(
        n_rows: usize,
        n_cols: usize,
        dx: f64,
        dy: f64,
        x_start: f64,
        y_start: f64,
        alpha: f64,
    ) -> Result<HeatModel, JsValue> {
        let params = HeatParams {
            n_rows,
            n_cols,
            dx,
            dy,
            x_start,
            y_start,
            alpha,
        };
        let mut inner = BmiHeat::new();
        inner.initialize_with(params).map_err(to_js)?;
        Ok(HeatModel { inner })
    }

    /// Parse a JSON parameter record, then build the model from it.
    pub fn from_json(config: &str) -> Result<HeatModel, JsValue> {
        let params = HeatParams::from_json_str(config).map_err(to_js)?;
        let mut inner = BmiHeat::new();
        inner.initialize_with(params).map_err(to_js)?;
        Ok(HeatModel { inner })
    }

    // Control
    pub fn update(&mut self) -> Result<StepInfo, JsValue> {
        self.timed(|bmi| bmi.update())
    }
    pub fn update_until(&mut self, time: f64) -> Result<StepInfo, JsValue> {
        self.timed(|bmi| bmi.update_until(time))
    }
    pub fn update_frac(&mut self, fraction: f64) -> Result<StepInfo, JsValue> {
        self.timed(|bmi| bmi.update_frac(fraction))
    }
    pub fn finalize(&mut self) -> bool {
        self.inner.finalize().is_ok()
    }

    // Model information
    pub fn component_name(&self) -> String {
        self.inner.component_name().to_string()
    }
    pub fn output_var_names(&self) -> Vec<String> {
        self.inner
            .output_var_names()
            .map(|names| names.into_iter().map(String::from).collect())
            .unwrap_or_default()
    }
    pub fn input_var_names(&self) -> Vec<String> {
        self.inner
            .input_var_names()
            .map(|names| names.into_iter().map(String::from).collect())
            .unwrap_or_default()
    }

    // Variable information
    pub fn var_grid(&self, name: &str) -> i32 {
        self.inner.var_grid(name).unwrap_or(BmiError::FAILURE)
    }
    pub fn var_type(&self, name: &str) -> Option<String> {
        self.inner.var_type(name).ok().map(String::from)
    }
    pub fn var_units(&self, name: &str) -> Option<String> {
        self.inner.var_units(name).ok().map(String::from)
    }
    pub fn var_location(&self, name: &str) -> Option<String> {
        self.inner.var_location(name).ok().map(String::from)
    }
    pub fn var_itemsize(&self, name: &str) -> i32 {
        sentinel(self.inner.var_itemsize(name))
    }
    pub fn var_nbytes(&self, name: &str) -> i32 {
        sentinel(self.inner.var_nbytes(name))
    }

    // Time
    pub fn current_time(&self) -> f64 {
        self.inner.current_time().unwrap_or(FAILURE_TIME)
    }
    pub fn time_step(&self) -> f64 {
        self.inner.time_step().unwrap_or(FAILURE_TIME)
    }
    pub fn end_time(&self) -> f64 {
        self.inner.end_time().unwrap_or(FAILURE_TIME)
    }

    // Copy-based JS access (no view into model memory)
    pub fn get_value(&self, name: &str) -> Vec<f64> {
        let Ok(size) = self.inner.var_grid(name).and_then(|g| self.inner.grid_size(g)) else {
            return Vec::new();
        };
        let mut out = vec![0.0; size];
        match self.inner.get_value(name, &mut out) {
            Ok(()) => out,
            Err(_) => Vec::new(),
        }
    }
    pub fn set_value(&mut self, name: &str, src: &[f64]) -> bool {
        self.inner.set_value(name, src).is_ok()
    }

    // Grid information
    pub fn grid_rank(&self, grid: i32) -> i32 {
        sentinel(self.inner.grid_rank(grid))
    }
    pub fn grid_size(&self, grid: i32) -> i32 {
        sentinel(self.inner.grid_size(grid))
    }
    pub fn grid_type(&self, grid: i32) -> Option<String> {
        self.inner.grid_type(grid).ok().map(String::from)
    }
    pub fn grid_shape(&self, grid: i32) -> Vec<u32> {
        let mut shape = [0usize; 2];
        match self.inner.grid_shape(grid, &mut shape) {
            Ok(()) => shape_to_js(&shape),
            Err(_) => Vec::new(),
        }
    }
    pub fn grid_spacing(&self, grid: i32) -> Vec<f64> {
        let mut spacing = [0.0; 2];
        match self.inner.grid_spacing(grid, &mut spacing) {
            Ok(()) => spacing.to_vec(),
            Err(_) => Vec::new(),
        }
    }
    pub fn grid_origin(&self, grid: i32) -> Vec<f64> {
        let mut origin = [0.0; 2];
        match self.inner.grid_origin(grid, &mut origin) {
            Ok(()) => origin.to_vec(),
            Err(_) => Vec::new(),
        }
    }
}

impl HeatModel {
    fn timed(&mut self, f: impl FnOnce(&mut BmiHeat) -> Result<(), BmiError>) -> Result<StepInfo, JsValue> {
        let before = self.inner.current_time().map_err(to_js)?;
        let t0 = now_ms();
        f(&mut self.inner).map_err(to_js)?;
        let t1 = now_ms();
        let time = self.inner.current_time().map_err(to_js)?;
        Ok(StepInfo {
            advanced: time - before,
            compute_ms: t1 - t0,
            time,
        })
    }
}

#[wasm_bindgen]
pub struct StepInfo {
    advanced: f64,
    compute_ms: f64,
    time: f64,
}

#[wasm_bindgen]
impl StepInfo {
    pub fn advanced(&self) -> f64 { self.advanced }
    pub fn compute_ms(&self) -> f64 { self.compute_ms }
    pub fn time(&self) -> f64 { self.time }
}

// Model time is never negative.
const FAILURE_TIME: f64 = BmiError::FAILURE as f64;

fn sentinel(result: Result<usize, BmiError>) -> i32 {
    result
        .ok()
        .and_then(|n| i32::try_from(n).ok())
        .unwrap_or(BmiError::FAILURE)
}

/// Empty when any extent does not fit in a `u32`.
fn shape_to_js(shape: &[usize]) -> Vec<u32> {
    shape
        .iter()
        .map(|&n| u32::try_from(n))
        .collect::<Result<_, _>>()
        .unwrap_or_default()
}

fn to_js(e: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&e.to_string())
}

fn now_ms() -> f64 {
    web_sys::window()
        .and_then(|w| w.performance())
        .map(|p| p.now())
        .unwrap_or(0.0)
}

// Only paths that never construct a `JsValue` or touch `web_sys` can run on
// the native test target.
#[cfg(test)]
mod tests {
    use super::*;

    const VAR: &str = heat_core::TEMPERATURE;

    #[test]
    fn failures_become_sentinels() {
        let model = HeatModel::new().unwrap();
        assert_eq!(model.var_grid("nope"), -1);
        assert_eq!(model.grid_rank(3), -1);
        assert_eq!(model.var_nbytes("nope"), -1);
        assert!(model.grid_shape(3).is_empty());
        assert!(model.get_value("nope").is_empty());
        assert_eq!(model.var_units("nope"), None);
    }

    #[test]
    fn metadata_passes_through() {
        let model = HeatModel::with_params(4, 5, 1.0, 2.0, 0.0, 0.0, 1.0).unwrap();
        assert_eq!(model.var_grid(VAR), 0);
        assert_eq!(model.grid_size(0), 20);
        assert_eq!(model.grid_shape(0), vec![4, 5]);
        assert_eq!(model.grid_spacing(0), vec![2.0, 1.0]);
        assert_eq!(model.var_nbytes(VAR), 160);
        assert_eq!(model.grid_type(0).as_deref(), Some("uniform_rectilinear"));
        assert_eq!(model.output_var_names(), vec![VAR.to_string()]);
    }

    #[test]
    fn values_are_copied_in_and_out() {
        let mut model = HeatModel::new().unwrap();
        let mut src = model.get_value(VAR);
        assert_eq!(src.len(), 48);
        src[20] = 100.0;
        assert!(model.set_value(VAR, &src));
        assert!(!model.set_value(VAR, &src[..10]));
        assert_eq!(model.get_value(VAR), src);
    }

    #[test]
    #[cfg(target_pointer_width = "64")]
    fn shape_extents_are_never_truncated() {
        assert_eq!(shape_to_js(&[8, 6]), vec![8, 6]);
        assert_eq!(shape_to_js(&[u32::MAX as usize, 1]), vec![u32::MAX, 1]);
        assert!(shape_to_js(&[usize::MAX, 1]).is_empty());
    }

    #[test]
    fn finalize_disables_the_model() {
        let mut model = HeatModel::new().unwrap();
        assert!(model.finalize());
        assert!(!model.finalize());
        assert_eq!(model.grid_size(0), -1);
        assert_eq!(model.current_time(), -1.0);
        assert_eq!(model.time_step(), -1.0);
        assert_eq!(model.end_time(), -1.0);
    }
}

//! The model-control interface.
//!
//! A driver introspects and advances any model through [`Bmi`] alone. Values
//! always cross the interface as copies into caller-owned buffers; the only
//! zero-copy path is [`Bmi::get_value_ref`], a read-only borrow that cannot
//! outlive the next mutating call.
//!
//! Operations that make no sense for a model (unstructured topology, indexed
//! access, ...) have default implementations returning
//! [`BmiError::NotSupported`], so an implementation only overrides what it
//! supports.

use std::path::Path;

use crate::error::BmiError;

pub type BmiResult<T> = Result<T, BmiError>;

pub trait Bmi {
    // ---- Model control ----

    /// Build the model from a configuration file, or from built-in defaults
    /// when `config_file` is `None`.
    fn initialize(&mut self, config_file: Option<&Path>) -> BmiResult<()>;

    /// Advance by one nominal time step.
    fn update(&mut self) -> BmiResult<()>;

    /// Advance until `time`, finishing with a fractional step if needed.
    fn update_until(&mut self, time: f64) -> BmiResult<()>;

    /// Advance by `fraction` (in `[0, 1]`) of the nominal time step.
    fn update_frac(&mut self, fraction: f64) -> BmiResult<()>;

    fn finalize(&mut self) -> BmiResult<()>;

    // ---- Model information ----

    fn component_name(&self) -> &str;

    fn input_var_names(&self) -> BmiResult<Vec<&str>>;

    fn input_var_name_count(&self) -> BmiResult<usize> {
        Ok(self.input_var_names()?.len())
    }

    fn output_var_names(&self) -> BmiResult<Vec<&str>>;

    fn output_var_name_count(&self) -> BmiResult<usize> {
        Ok(self.output_var_names()?.len())
    }

    // ---- Variable information ----

    fn var_grid(&self, name: &str) -> BmiResult<i32>;

    fn var_type(&self, name: &str) -> BmiResult<&str>;

    fn var_units(&self, name: &str) -> BmiResult<&str>;

    fn var_itemsize(&self, name: &str) -> BmiResult<usize>;

    fn var_nbytes(&self, name: &str) -> BmiResult<usize>;

    fn var_location(&self, name: &str) -> BmiResult<&str>;

    // ---- Time ----

    fn start_time(&self) -> BmiResult<f64>;

    fn end_time(&self) -> BmiResult<f64>;

    fn current_time(&self) -> BmiResult<f64>;

    fn time_step(&self) -> BmiResult<f64>;

    fn time_units(&self) -> BmiResult<&str> {
        Err(BmiError::NotSupported("time_units"))
    }

    // ---- Getters and setters ----

    /// Copy the variable into `dest`, row-major.
    fn get_value(&self, name: &str, dest: &mut [f64]) -> BmiResult<()>;

    /// Borrow the variable's storage, row-major and read-only.
    fn get_value_ref(&self, name: &str) -> BmiResult<&[f64]> {
        let _ = name;
        Err(BmiError::NotSupported("get_value_ref"))
    }

    fn get_value_at_indices(&self, name: &str, dest: &mut [f64], indices: &[usize]) -> BmiResult<()> {
        let _ = (name, dest, indices);
        Err(BmiError::NotSupported("get_value_at_indices"))
    }

    /// Overwrite the whole variable from `src`, row-major.
    fn set_value(&mut self, name: &str, src: &[f64]) -> BmiResult<()>;

    fn set_value_at_indices(&mut self, name: &str, indices: &[usize], src: &[f64]) -> BmiResult<()> {
        let _ = (name, indices, src);
        Err(BmiError::NotSupported("set_value_at_indices"))
    }

    // ---- Grid information ----

    fn grid_rank(&self, grid: i32) -> BmiResult<usize>;

    fn grid_size(&self, grid: i32) -> BmiResult<usize>;

    fn grid_type(&self, grid: i32) -> BmiResult<&str>;

    // ---- Uniform rectilinear ----

    fn grid_shape(&self, grid: i32, shape: &mut [usize]) -> BmiResult<()>;

    fn grid_spacing(&self, grid: i32, spacing: &mut [f64]) -> BmiResult<()>;

    fn grid_origin(&self, grid: i32, origin: &mut [f64]) -> BmiResult<()>;

    // ---- Non-uniform rectilinear, curvilinear ----

    fn grid_x(&self, grid: i32, x: &mut [f64]) -> BmiResult<()> {
        let _ = (grid, x);
        Err(BmiError::NotSupported("grid_x"))
    }

    fn grid_y(&self, grid: i32, y: &mut [f64]) -> BmiResult<()> {
        let _ = (grid, y);
        Err(BmiError::NotSupported("grid_y"))
    }

    fn grid_z(&self, grid: i32, z: &mut [f64]) -> BmiResult<()> {
        let _ = (grid, z);
        Err(BmiError::NotSupported("grid_z"))
    }

    // ---- Unstructured ----

    fn grid_node_count(&self, grid: i32) -> BmiResult<usize> {
        let _ = grid;
        Err(BmiError::NotSupported("grid_node_count"))
    }

    fn grid_edge_count(&self, grid: i32) -> BmiResult<usize> {
        let _ = grid;
        Err(BmiError::NotSupported("grid_edge_count"))
    }

    fn grid_face_count(&self, grid: i32) -> BmiResult<usize> {
        let _ = grid;
        Err(BmiError::NotSupported("grid_face_count"))
    }

    fn grid_edge_nodes(&self, grid: i32, edge_nodes: &mut [usize]) -> BmiResult<()> {
        let _ = (grid, edge_nodes);
        Err(BmiError::NotSupported("grid_edge_nodes"))
    }

    fn grid_face_nodes(&self, grid: i32, face_nodes: &mut [usize]) -> BmiResult<()> {
        let _ = (grid, face_nodes);
        Err(BmiError::NotSupported("grid_face_nodes"))
    }

    fn grid_nodes_per_face(&self, grid: i32, nodes_per_face: &mut [usize]) -> BmiResult<()> {
        let _ = (grid, nodes_per_face);
        Err(BmiError::NotSupported("grid_nodes_per_face"))
    }

    fn grid_connectivity(&self, grid: i32, connectivity: &mut [usize]) -> BmiResult<()> {
        let _ = (grid, connectivity);
        Err(BmiError::NotSupported("grid_connectivity"))
    }

    fn grid_offset(&self, grid: i32, offset: &mut [usize]) -> BmiResult<()> {
        let _ = (grid, offset);
        Err(BmiError::NotSupported("grid_offset"))
    }
}

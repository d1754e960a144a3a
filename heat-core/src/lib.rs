//! A 2D heat-diffusion model behind a generic model-control interface.
//!
//! The model solves `∂T/∂t = α ∇²T` on a uniform rectilinear grid with an
//! explicit five-point stencil and fixed edges. Drivers talk to it through
//! the [`Bmi`] trait implemented by [`BmiHeat`]:
//!
//! ```
//! use heat_core::{Bmi, BmiHeat, TEMPERATURE};
//!
//! let mut bmi = BmiHeat::new();
//! bmi.initialize(None).unwrap();
//!
//! let mut temp = vec![0.0; bmi.grid_size(0).unwrap()];
//! bmi.get_value(TEMPERATURE, &mut temp).unwrap();
//! temp[3 * 6 + 2] = 100.0;
//! bmi.set_value(TEMPERATURE, &temp).unwrap();
//!
//! bmi.update_until(1.0).unwrap();
//! assert!((bmi.current_time().unwrap() - 1.0).abs() < 1e-12);
//! ```

pub mod bmi;
pub mod bmi_heat;
pub mod config;
pub mod error;
pub mod field;
pub mod grid;
pub mod heat;
pub mod registry;
pub mod stencil;
pub mod time;

pub use bmi::{Bmi, BmiResult};
pub use bmi_heat::{BmiHeat, COMPONENT_NAME};
pub use config::HeatParams;
pub use error::{BmiError, ConfigError};
pub use field::{Field, FieldStore, flatten, flatten_into, unflatten, unflatten_into};
pub use grid::{GRID_ID, GridSpec, GridType};
pub use heat::Heat;
pub use registry::{TEMPERATURE, VarLocation, VarType, VariableInfo, VariableRegistry};
pub use stencil::StencilKernel;
pub use time::{END_TIME, START_TIME, StepPlan, TimeController};

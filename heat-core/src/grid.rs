use crate::config::HeatParams;

/// Id of the only grid the heat model exposes.
pub const GRID_ID: i32 = 0;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GridType {
    UniformRectilinear,
}

impl GridType {
    pub fn as_str(&self) -> &'static str {
        match self {
            GridType::UniformRectilinear => "uniform_rectilinear",
        }
    }
}

/// Descriptive metadata of a structured 2D grid.
///
/// Every per-axis array is ordered `[row axis, column axis]`, i.e. `(y, x)`.
/// A `GridSpec` is fixed once the model is initialized.
#[derive(Clone, Debug, PartialEq)]
pub struct GridSpec {
    shape: [usize; 2],
    spacing: [f64; 2],
    origin: [f64; 2],
    grid_type: GridType,
}

impl GridSpec {
    pub fn new(shape: [usize; 2], spacing: [f64; 2], origin: [f64; 2]) -> Self {
        GridSpec {
            shape,
            spacing,
            origin,
            grid_type: GridType::UniformRectilinear,
        }
    }

    pub fn from_params(params: &HeatParams) -> Self {
        Self::new(
            [params.n_rows, params.n_cols],
            [params.dy, params.dx],
            [params.y_start, params.x_start],
        )
    }

    pub fn shape(&self) -> [usize; 2] {
        self.shape
    }

    pub fn rows(&self) -> usize {
        self.shape[0]
    }

    pub fn cols(&self) -> usize {
        self.shape[1]
    }

    /// `[dy, dx]`
    pub fn spacing(&self) -> [f64; 2] {
        self.spacing
    }

    /// `[y_start, x_start]`
    pub fn origin(&self) -> [f64; 2] {
        self.origin
    }

    pub fn rank(&self) -> usize {
        self.shape.len()
    }

    pub fn size(&self) -> usize {
        self.shape.iter().product()
    }

    pub fn grid_type(&self) -> GridType {
        self.grid_type
    }
}

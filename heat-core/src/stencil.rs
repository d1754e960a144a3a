use crate::field::Field;
use crate::grid::GridSpec;

/// Explicit five-point finite-difference kernel for `∂T/∂t = α ∇²T`.
///
/// Interior cells follow
///
/// ```text
/// new[i][j] = T[i][j] + α·dt·( (T[i+1][j] - 2T[i][j] + T[i-1][j]) / dy²
///                            + (T[i][j+1] - 2T[i][j] + T[i][j-1]) / dx² )
/// ```
///
/// Edge cells are copied unchanged (fixed-edge Dirichlet boundary).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StencilKernel {
    dy: f64,
    dx: f64,
    alpha: f64,
}

impl StencilKernel {
    /// `spacing` is `[dy, dx]`, matching [`GridSpec::spacing`].
    pub fn new(spacing: [f64; 2], alpha: f64) -> Self {
        StencilKernel {
            dy: spacing[0],
            dx: spacing[1],
            alpha,
        }
    }

    pub fn for_grid(grid: &GridSpec, alpha: f64) -> Self {
        Self::new(grid.spacing(), alpha)
    }

    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    /// Largest stable step, `min(dy, dx)² / (4α)`.
    pub fn stable_time_step(&self) -> f64 {
        self.dy.min(self.dx).powi(2) / (4.0 * self.alpha)
    }

    /// Write the field advanced by `dt` into `out`. `field` is left untouched.
    ///
    /// A zero `dt` reproduces `field` exactly.
    pub fn apply(&self, field: &Field, dt: f64, out: &mut Field) {
        assert_eq!(field.shape(), out.shape(), "kernel buffers must share a shape");
        out.copy_from(field);

        let [rows, cols] = field.shape();
        if dt == 0.0 || rows < 3 || cols < 3 {
            return;
        }

        let dy2 = self.dy * self.dy;
        let dx2 = self.dx * self.dx;
        let c = self.alpha * dt;

        let t = field.as_slice();
        let next = out.as_mut_slice();
        for i in 1..(rows - 1) {
            let row = i * cols;
            for j in 1..(cols - 1) {
                let k = row + j;

                let u = t[k];
                let up = t[k - cols];
                let down = t[k + cols];
                let left = t[k - 1];
                let right = t[k + 1];

                next[k] = u + c * ((down - 2.0 * u + up) / dy2 + (right - 2.0 * u + left) / dx2);
            }
        }
    }

    /// Allocating form of [`StencilKernel::apply`].
    pub fn solve(&self, field: &Field, dt: f64) -> Field {
        let mut out = field.clone();
        self.apply(field, dt, &mut out);
        out
    }
}

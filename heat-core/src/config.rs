use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Scalar parameters of the heat model.
///
/// Serialized with the camelCase keys used by model configuration files:
///
/// ```json
/// { "nRows": 8, "nCols": 6, "dx": 1.0, "dy": 1.0,
///   "xStart": 0.0, "yStart": 0.0, "alpha": 1.0 }
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct HeatParams {
    pub n_rows: usize,
    pub n_cols: usize,
    /// Distance between columns.
    pub dx: f64,
    /// Distance between rows.
    pub dy: f64,
    pub x_start: f64,
    pub y_start: f64,
    /// Thermal diffusivity.
    pub alpha: f64,
}

impl Default for HeatParams {
    fn default() -> Self {
        HeatParams {
            n_rows: 8,
            n_cols: 6,
            dx: 1.0,
            dy: 1.0,
            x_start: 0.0,
            y_start: 0.0,
            alpha: 1.0,
        }
    }
}

impl HeatParams {
    /// Read and validate a JSON parameter file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if !path.is_file() {
            tracing::warn!(path = %path.display(), "heat configuration file not found");
            return Err(ConfigError::NotFound(path.to_path_buf()));
        }
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&text)
    }

    pub fn from_json_str(text: &str) -> Result<Self, ConfigError> {
        let params: HeatParams = serde_json::from_str(text)?;
        params.validate()?;
        Ok(params)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.n_rows == 0 {
            return Err(invalid("nRows", "must be at least 1"));
        }
        if self.n_cols == 0 {
            return Err(invalid("nCols", "must be at least 1"));
        }
        // Each of the two field buffers must be addressable.
        let fits = self
            .n_rows
            .checked_mul(self.n_cols)
            .and_then(|cells| cells.checked_mul(std::mem::size_of::<f64>()))
            .is_some_and(|bytes| bytes <= isize::MAX as usize);
        if !fits {
            return Err(invalid(
                "nRows",
                format!("{} x {} grid is too large", self.n_rows, self.n_cols),
            ));
        }
        for (name, value) in [("dx", self.dx), ("dy", self.dy), ("alpha", self.alpha)] {
            if !(value.is_finite() && value > 0.0) {
                return Err(invalid(name, format!("must be finite and positive, got {value}")));
            }
        }
        for (name, value) in [("xStart", self.x_start), ("yStart", self.y_start)] {
            if !value.is_finite() {
                return Err(invalid(name, format!("must be finite, got {value}")));
            }
        }
        Ok(())
    }
}

fn invalid(name: &'static str, reason: impl Into<String>) -> ConfigError {
    ConfigError::Invalid {
        name,
        reason: reason.into(),
    }
}

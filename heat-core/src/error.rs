use std::path::PathBuf;

use thiserror::Error;

/// Failures while building a [`HeatParams`](crate::HeatParams) record.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("configuration file `{}` not found", .0.display())]
    NotFound(PathBuf),

    #[error("failed to read configuration file `{}`", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed configuration: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid parameter `{name}`: {reason}")]
    Invalid { name: &'static str, reason: String },
}

/// Errors reported by the model-control interface.
///
/// Drivers that cannot consume a `Result` should map every variant to
/// [`BmiError::FAILURE`].
#[derive(Error, Debug)]
pub enum BmiError {
    #[error("model is not initialized")]
    NotInitialized,

    #[error("model has been finalized")]
    Finalized,

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("unknown variable `{0}`")]
    UnknownVariable(String),

    #[error("unknown grid id {0}")]
    UnknownGrid(i32),

    #[error("`{0}` is not supported by this model")]
    NotSupported(&'static str),

    #[error("buffer holds {actual} items, expected {expected}")]
    BufferSize { expected: usize, actual: usize },

    #[error("invalid time value {0}")]
    InvalidTime(f64),
}

impl BmiError {
    /// Sentinel returned across boundaries that only speak integers.
    pub const FAILURE: i32 = -1;

    /// `true` when the operation is not applicable to this kind of model,
    /// as opposed to a genuine failure.
    pub fn is_not_supported(&self) -> bool {
        matches!(self, BmiError::NotSupported(_))
    }

    pub(crate) fn check_len(expected: usize, actual: usize) -> Result<(), BmiError> {
        if expected == actual {
            Ok(())
        } else {
            Err(BmiError::BufferSize { expected, actual })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_names_the_path() {
        let err = ConfigError::NotFound(PathBuf::from("missing/heat.json"));
        assert!(err.to_string().contains("missing/heat.json"));
    }

    #[test]
    fn config_errors_pass_through_transparently() {
        let err: BmiError = ConfigError::Invalid {
            name: "alpha",
            reason: "must be positive".into(),
        }
        .into();
        assert_eq!(err.to_string(), "invalid parameter `alpha`: must be positive");
        assert!(!err.is_not_supported());
    }

    #[test]
    fn buffer_length_check() {
        assert!(BmiError::check_len(48, 48).is_ok());
        assert!(matches!(
            BmiError::check_len(48, 47),
            Err(BmiError::BufferSize { expected: 48, actual: 47 })
        ));
    }
}

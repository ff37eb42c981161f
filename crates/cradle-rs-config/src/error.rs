//! Config loading errors.

use std::path::PathBuf;
use thiserror::Error;

/// Errors returned while loading or validating config.
///
/// Each variant names the file or layer it came from so a bad layer can be
/// found in a stack of several.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A config file or the working directory could not be read.
    #[error("cannot read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// The layer is not valid JSON5.
    #[error("cannot parse {layer}: {source}")]
    Parse {
        layer: String,
        #[source]
        source: json5::Error,
    },
    /// The merged value does not fit the config model.
    #[error("cannot decode {layer}: {source}")]
    Decode {
        layer: String,
        #[source]
        source: serde_json::Error,
    },
    /// `path` is `<layer>:<dotted.key>` for shape errors, or the plain key
    /// for checks on the merged config.
    #[error("invalid config at {path}: {message}")]
    InvalidField { path: String, message: String },
}

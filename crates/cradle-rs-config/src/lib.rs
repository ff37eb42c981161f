//! `cradle.json5` configuration: the model, shape checks and layered loading
//! shared by the SDK and the `cradle` binary.

mod error;
mod loader;
mod model;

pub use error::ConfigError;
pub use loader::{ConfigLayer, ConfigLayerSource, LayeredConfig, LayeredConfigOptions};
pub use model::*;

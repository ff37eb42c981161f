//! Layered configuration loader.
//!
//! Layers are read lowest precedence first (system, user, project, cwd,
//! repo, runtime), shape-checked one by one, merged, and decoded into a
//! single `CradleConfig`.

mod layer_io;
mod merge;
mod paths;
mod schema;

#[cfg(test)]
mod tests;

use crate::{ConfigError, CradleConfig};
use cradle_rs_store::validate_key;
use log::{debug, info};
use serde_json::Value;
use std::collections::HashSet;
use std::path::{Path, PathBuf};

const DEFAULT_CONFIG_FILE: &str = "cradle.json5";
/// Holds the user and repo layers.
const DEFAULT_CONFIG_DIR: &str = ".cradle";
const DEFAULT_PROJECT_ROOT_MARKERS: &[&str] = &[".git"];

#[cfg(unix)]
const SYSTEM_CONFIG_PATH: &str = "/etc/cradle/cradle.json5";
#[cfg(windows)]
const SYSTEM_CONFIG_PATH: &str = "C:\\ProgramData\\cradle\\cradle.json5";

/// Effective config plus the layers it was built from.
#[derive(Debug, Clone)]
pub struct LayeredConfig {
    /// The merged, validated config.
    pub config: CradleConfig,
    /// Loaded layers, lowest precedence first.
    pub layers: Vec<ConfigLayer>,
}

/// Where a config layer came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigLayerSource {
    /// Machine-wide file, `/etc/cradle/cradle.json5` on Unix.
    System,
    /// `~/.cradle/cradle.json5`.
    User,
    /// `cradle.json5` at the project root.
    Project,
    /// `cradle.json5` in the working directory.
    Cwd,
    /// `.cradle/cradle.json5` under the project root.
    Repo,
    /// Paths passed explicitly, applied last.
    Runtime,
}

impl ConfigLayerSource {
    /// Short name used in layer labels and error paths.
    pub fn name(self) -> &'static str {
        match self {
            Self::System => "system",
            Self::User => "user",
            Self::Project => "project",
            Self::Cwd => "cwd",
            Self::Repo => "repo",
            Self::Runtime => "runtime",
        }
    }
}

/// A layer that contributed to the effective config.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigLayer {
    /// Which layer this file was loaded as.
    pub source: ConfigLayerSource,
    /// File the layer was read from.
    pub path: PathBuf,
}

/// Where to look for layers.
///
/// `new` fills in the default system and user locations; tests and
/// embedders override them to keep the host machine out of the stack.
#[derive(Debug, Clone)]
pub struct LayeredConfigOptions {
    /// Working directory the cwd layer and project root are resolved from.
    pub cwd: PathBuf,
    /// System layer file; `None` skips the layer.
    pub system_config_path: Option<PathBuf>,
    /// User layer file; `None` skips the layer.
    pub user_config_path: Option<PathBuf>,
    /// Runtime layers, applied last in order.
    pub runtime_paths: Vec<PathBuf>,
    /// Entries whose presence marks a directory as the project root.
    pub project_root_markers: Vec<String>,
}

impl LayeredConfigOptions {
    /// Options for `cwd` with the default system and user layer paths.
    pub fn new(cwd: impl AsRef<Path>) -> Self {
        Self {
            cwd: cwd.as_ref().to_path_buf(),
            system_config_path: layer_io::default_system_config_path(),
            user_config_path: layer_io::default_user_config_path(),
            runtime_paths: Vec::new(),
            project_root_markers: DEFAULT_PROJECT_ROOT_MARKERS
                .iter()
                .map(|marker| marker.to_string())
                .collect(),
        }
    }

    /// Append a runtime layer. Unlike discovered layers it must exist.
    pub fn with_runtime_path(mut self, path: impl AsRef<Path>) -> Self {
        self.runtime_paths.push(path.as_ref().to_path_buf());
        self
    }
}

impl CradleConfig {
    /// Load one config file without layering.
    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        info!("loading config (path={})", path.display());
        let label = path.display().to_string();
        let value = layer_io::read_json5(path, &label)?;
        decode(value, &label)
    }

    /// Load a config from JSON5 text without layering.
    pub fn load_from_str(contents: &str) -> Result<Self, ConfigError> {
        debug!("loading config from text (len={})", contents.len());
        let value = layer_io::parse_json5(contents, "config")?;
        decode(value, "config")
    }

    /// Load the layer stack around `cwd` from the default locations.
    pub fn load_layered(cwd: impl AsRef<Path>) -> Result<LayeredConfig, ConfigError> {
        Self::load_layered_with_options(LayeredConfigOptions::new(cwd))
    }

    /// Load the layer stack described by `options`.
    ///
    /// Missing discovered layers are skipped, and a file reached through two
    /// layers (project root equal to cwd) is read once.
    pub fn load_layered_with_options(
        options: LayeredConfigOptions,
    ) -> Result<LayeredConfig, ConfigError> {
        let dirs = paths::LayerDirs::discover(&options.cwd, &options.project_root_markers)?;
        match dirs.project_root.as_ref() {
            Some(root) => debug!("resolved project root (path={})", root.display()),
            None => debug!("no project root; skipping project and repo layers"),
        }

        let discovered = [
            (ConfigLayerSource::System, options.system_config_path),
            (ConfigLayerSource::User, options.user_config_path),
            (ConfigLayerSource::Project, dirs.project_file()),
            (ConfigLayerSource::Cwd, Some(dirs.cwd_file())),
            (ConfigLayerSource::Repo, dirs.repo_file()),
        ];

        let mut seen = HashSet::new();
        let present = discovered
            .into_iter()
            .filter_map(|(source, path)| Some((source, path?)))
            .filter(|(source, path)| {
                if !path.exists() {
                    debug!("layer absent (source={source:?}, path={})", path.display());
                    return false;
                }
                seen.insert(paths::dedupe_key(path))
            });
        let runtime = options
            .runtime_paths
            .into_iter()
            .map(|path| (ConfigLayerSource::Runtime, path));

        let mut merged = Value::Object(serde_json::Map::new());
        let mut layers = Vec::new();
        for (source, path) in present.chain(runtime) {
            let loaded = layer_io::load_layer(source, &path)?;
            merge::merge_layer(&mut merged, loaded.value);
            layers.push(loaded.meta);
        }

        let config = decode(merged, "effective")?;
        info!("layered config loaded (layers={})", layers.len());
        Ok(LayeredConfig { config, layers })
    }

    /// Checks that need the decoded config: a usable storage path and
    /// partition names that are valid storage keys.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.storage.path.trim().is_empty() {
            return Err(ConfigError::InvalidField {
                path: "storage.path".to_string(),
                message: "must not be empty".to_string(),
            });
        }
        let favorites = ("favorites.partition".to_string(), &self.favorites.partition);
        let content = self
            .content
            .partitions
            .keys()
            .map(|key| (format!("content.partitions.{key}"), key));
        for (path, key) in std::iter::once(favorites).chain(content) {
            validate_key(key).map_err(|err| ConfigError::InvalidField {
                path,
                message: err.to_string(),
            })?;
        }
        Ok(())
    }
}

fn decode(value: Value, label: &str) -> Result<CradleConfig, ConfigError> {
    schema::validate_layer_schema(&value, label)?;
    let config: CradleConfig =
        serde_json::from_value(value).map_err(|source| ConfigError::Decode {
            layer: label.to_string(),
            source,
        })?;
    config.validate()?;
    Ok(config)
}

//! Directory discovery for local config layers.

use super::{DEFAULT_CONFIG_DIR, DEFAULT_CONFIG_FILE};
use crate::ConfigError;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Working directory and project root that local layers are read from.
#[derive(Debug)]
pub(super) struct LayerDirs {
    pub(super) cwd: PathBuf,
    pub(super) project_root: Option<PathBuf>,
}

impl LayerDirs {
    /// Resolve `cwd` and the nearest ancestor holding one of `markers`.
    ///
    /// A missing `cwd` is kept as given so defaults still load.
    pub(super) fn discover(cwd: &Path, markers: &[String]) -> Result<Self, ConfigError> {
        let cwd = match cwd.canonicalize() {
            Ok(path) => path,
            Err(err) if err.kind() == ErrorKind::NotFound => cwd.to_path_buf(),
            Err(source) => {
                return Err(ConfigError::Read {
                    path: cwd.to_path_buf(),
                    source,
                });
            }
        };
        let project_root = cwd
            .ancestors()
            .find(|dir| markers.iter().any(|marker| dir.join(marker).exists()))
            .map(Path::to_path_buf);
        Ok(Self { cwd, project_root })
    }

    pub(super) fn project_file(&self) -> Option<PathBuf> {
        self.project_root
            .as_ref()
            .map(|root| root.join(DEFAULT_CONFIG_FILE))
    }

    pub(super) fn cwd_file(&self) -> PathBuf {
        self.cwd.join(DEFAULT_CONFIG_FILE)
    }

    /// `<project>/.cradle/cradle.json5`
    pub(super) fn repo_file(&self) -> Option<PathBuf> {
        self.project_root
            .as_ref()
            .map(|root| root.join(DEFAULT_CONFIG_DIR).join(DEFAULT_CONFIG_FILE))
    }
}

/// Key used to skip a file already loaded through another layer.
pub(super) fn dedupe_key(path: &Path) -> PathBuf {
    path.canonicalize().unwrap_or_else(|_| path.to_path_buf())
}

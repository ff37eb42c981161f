//! Tests for layered configuration loading.

use super::*;
use crate::{StorageBackend, StorageConfig};
use pretty_assertions::assert_eq;
use serde_json::json;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Write JSON5 contents to a path, creating parent directories if needed.
fn write_json5(path: &Path, contents: &str) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("dir");
    }
    fs::write(path, contents).expect("write");
}

/// Options that only look at the given cwd and explicit system/user files.
fn isolated_options(
    cwd: &Path,
    system: Option<PathBuf>,
    user: Option<PathBuf>,
) -> LayeredConfigOptions {
    LayeredConfigOptions {
        system_config_path: system,
        user_config_path: user,
        ..LayeredConfigOptions::new(cwd)
    }
}

/// Verify that a minimal config parses with defaults.
#[test]
fn parse_minimal_config() {
    let config = CradleConfig::load_from_str("{}").expect("config");
    assert_eq!(config.storage.backend, StorageBackend::File);
    assert_eq!(config.storage.path, ".cradle/data");
    assert_eq!(config.favorites.partition, "favorites");
    assert!(config.content.partitions.is_empty());
}

/// JSON5 syntax (comments, unquoted keys, trailing commas) is accepted.
#[test]
fn parse_full_config() {
    let json5 = r#"{
        // seeded content
        storage: { backend: "memory", path: "/tmp/cradle", },
        content: {
            partitions: {
                names: [ { name: "Ava", gender: "girl" }, { name: "Leo" } ],
            },
        },
        favorites: { partition: "my-favorites" },
    }"#;
    let config = CradleConfig::load_from_str(json5).expect("config");
    assert_eq!(config.storage.backend, StorageBackend::Memory);
    assert_eq!(config.favorites.partition, "my-favorites");
    let seeds = config.seeds_for("names").expect("seeds");
    assert_eq!(seeds.len(), 2);
    assert_eq!(seeds[0].get("gender"), Some(&json!("girl")));
    assert_eq!(config.seeds_for("blog"), None);
}

/// Reject unexpected top-level config keys.
#[test]
fn rejects_unknown_top_level_key() {
    let err = CradleConfig::load_from_str("{ unexpected: true }").unwrap_err();
    let msg = format!("{err}");
    assert!(msg.contains("unknown key"));
}

/// Reject invalid storage backends.
#[test]
fn rejects_invalid_backend() {
    let err = CradleConfig::load_from_str(r#"{ storage: { backend: "s3" } }"#).unwrap_err();
    let msg = format!("{err}");
    assert!(msg.contains("storage.backend"));
}

/// Seeds must be arrays of objects.
#[test]
fn rejects_non_object_seed() {
    let err =
        CradleConfig::load_from_str(r#"{ content: { partitions: { names: ["Ava"] } } }"#)
            .unwrap_err();
    let msg = format!("{err}");
    assert!(msg.contains("content.partitions.names[0]"));
}

/// Partition keys must be usable as storage keys.
#[test]
fn rejects_path_like_partition_keys() {
    let err = CradleConfig::load_from_str(r#"{ favorites: { partition: "../x" } }"#).unwrap_err();
    assert!(matches!(
        err,
        ConfigError::InvalidField { ref path, .. } if path == "favorites.partition"
    ));

    let err = CradleConfig::load_from_str(r#"{ storage: { path: "  " } }"#).unwrap_err();
    assert!(matches!(
        err,
        ConfigError::InvalidField { ref path, .. } if path == "storage.path"
    ));
}

/// Ensure repo config takes precedence over cwd config, which beats user and system.
#[test]
fn layered_config_precedence() {
    let temp = TempDir::new().expect("tmp");
    let root = temp.path();
    let project_root = root.join("project");
    fs::create_dir_all(project_root.join(".git")).expect("git");
    let cwd = project_root.join("subdir");
    fs::create_dir_all(&cwd).expect("cwd");

    let system_config = root.join("system.json5");
    write_json5(
        &system_config,
        r#"{ storage: { backend: "memory", path: "system" }, favorites: { partition: "sys" } }"#,
    );
    let user_config = root.join("user.json5");
    write_json5(&user_config, r#"{ storage: { path: "user" } }"#);
    write_json5(
        &project_root.join(DEFAULT_CONFIG_FILE),
        r#"{ storage: { path: "project" } }"#,
    );
    write_json5(
        &cwd.join(DEFAULT_CONFIG_FILE),
        r#"{ storage: { path: "cwd" } }"#,
    );
    write_json5(
        &project_root
            .join(DEFAULT_CONFIG_DIR)
            .join(DEFAULT_CONFIG_FILE),
        r#"{ storage: { path: "repo" } }"#,
    );

    let options = isolated_options(&cwd, Some(system_config), Some(user_config));
    let layered = CradleConfig::load_layered_with_options(options).expect("layered");
    assert_eq!(layered.config.storage.path, "repo");
    assert_eq!(layered.config.storage.backend, StorageBackend::Memory);
    assert_eq!(layered.config.favorites.partition, "sys");
    let sources: Vec<_> = layered.layers.iter().map(|layer| layer.source).collect();
    assert_eq!(
        sources,
        vec![
            ConfigLayerSource::System,
            ConfigLayerSource::User,
            ConfigLayerSource::Project,
            ConfigLayerSource::Cwd,
            ConfigLayerSource::Repo,
        ]
    );
}

/// Runtime overrides apply last.
#[test]
fn runtime_layer_overrides_local_layers() {
    let temp = TempDir::new().expect("tmp");
    let cwd = temp.path().join("work");
    fs::create_dir_all(&cwd).expect("cwd");
    write_json5(
        &cwd.join(DEFAULT_CONFIG_FILE),
        r#"{ storage: { path: "cwd" } }"#,
    );
    let runtime = temp.path().join("runtime.json5");
    write_json5(&runtime, r#"{ storage: { path: "runtime" } }"#);

    let options = isolated_options(&cwd, None, None).with_runtime_path(&runtime);
    let layered = CradleConfig::load_layered_with_options(options).expect("layered");
    assert_eq!(layered.config.storage.path, "runtime");
    assert_eq!(
        layered.layers.last().map(|layer| layer.source),
        Some(ConfigLayerSource::Runtime)
    );
}

/// Runtime layers must exist, and the error names the missing file.
#[test]
fn missing_runtime_layer_is_an_error() {
    let temp = TempDir::new().expect("tmp");
    let missing = temp.path().join("missing.json5");
    let options = isolated_options(temp.path(), None, None).with_runtime_path(&missing);
    let err = CradleConfig::load_layered_with_options(options).unwrap_err();
    assert!(matches!(err, ConfigError::Read { ref path, .. } if *path == missing));
}

/// Syntax errors name the layer they came from.
#[test]
fn parse_errors_name_the_layer() {
    let temp = TempDir::new().expect("tmp");
    write_json5(&temp.path().join(DEFAULT_CONFIG_FILE), "{ storage: ");
    let options = isolated_options(temp.path(), None, None);
    let err = CradleConfig::load_layered_with_options(options).unwrap_err();
    assert!(matches!(err, ConfigError::Parse { ref layer, .. } if layer.starts_with("cwd(")));
}

/// When project root and cwd coincide, the shared file is loaded once.
#[test]
fn project_and_cwd_layers_dedupe() {
    let temp = TempDir::new().expect("tmp");
    let project_root = temp.path().join("project");
    fs::create_dir_all(project_root.join(".git")).expect("git");
    write_json5(
        &project_root.join(DEFAULT_CONFIG_FILE),
        r#"{ storage: { path: "project" } }"#,
    );

    let options = isolated_options(&project_root, None, None);
    let layered = CradleConfig::load_layered_with_options(options).expect("layered");
    assert_eq!(layered.layers.len(), 1);
    assert_eq!(layered.layers[0].source, ConfigLayerSource::Project);
}

/// Missing layers fall back to defaults.
#[test]
fn layered_config_without_files_uses_defaults() {
    let temp = TempDir::new().expect("tmp");
    let options = isolated_options(temp.path(), None, None);
    let layered = CradleConfig::load_layered_with_options(options).expect("layered");
    assert!(layered.layers.is_empty());
    assert_eq!(layered.config, CradleConfig::default());
}

/// Invalid layers report their origin.
#[test]
fn invalid_layer_reports_label() {
    let temp = TempDir::new().expect("tmp");
    let cwd = temp.path();
    write_json5(&cwd.join(DEFAULT_CONFIG_FILE), r#"{ storage: { bogus: 1 } }"#);
    let options = isolated_options(cwd, None, None);
    let err = CradleConfig::load_layered_with_options(options).unwrap_err();
    let msg = format!("{err}");
    assert!(msg.contains("cwd("));
    assert!(msg.contains("storage.bogus"));
}

/// Builder assembles configs in code.
#[test]
fn builder_sets_sections() {
    let config = CradleConfig::builder()
        .storage(StorageConfig {
            backend: StorageBackend::Memory,
            path: "mem".to_string(),
        })
        .seed("names", vec![serde_json::Map::new()])
        .build();
    assert_eq!(config.storage.backend, StorageBackend::Memory);
    assert_eq!(config.seeds_for("names").map(<[_]>::len), Some(1));
    assert!(config.validate().is_ok());
}

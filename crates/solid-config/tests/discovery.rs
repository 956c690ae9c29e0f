//! Tests for config file discovery and loading

use serial_test::serial;
use solid_config::{AppType, ConfigDiscovery, ConfigError};
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

#[test]
#[serial]
fn discovers_solid_toml() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("solid.toml"),
        r#"
[apps.site]
input = "src/site/index.html"
output = "dist/site"

[apps.api]
app_type = "node"
hard_watch = false
plugins = [{ name = "node-server", entry = "index.js" }]
"#,
    )
    .unwrap();

    let discovery = ConfigDiscovery::new(dir.path());
    let found = discovery.find().unwrap();
    assert_eq!(found.file_name().unwrap(), "solid.toml");

    let config = discovery.load().unwrap();
    let names: Vec<_> = config.apps.keys().cloned().collect();
    assert_eq!(names, vec!["site".to_string(), "api".to_string()]);

    let site = &config.apps["site"];
    assert_eq!(site.input, Some(vec!["src/site/index.html".to_string()]));
    assert_eq!(site.output, Some(PathBuf::from("dist/site")));

    let api = &config.apps["api"];
    assert_eq!(api.app_type, Some(AppType::Node));
    assert_eq!(api.hard_watch, Some(false));
    assert_eq!(api.plugins[0].name, "node-server");
    assert_eq!(api.plugins[0].options["entry"], "index.js");
}

#[test]
#[serial]
fn discovers_package_json() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("package.json"),
        r#"{
  "name": "test",
  "solid": {
    "apps": {
      "site": { "publicUrl": "/s/", "passEnvs": ["API_URL"] }
    }
  }
}"#,
    )
    .unwrap();

    let discovery = ConfigDiscovery::new(dir.path());
    let found = discovery.find().unwrap();
    assert_eq!(found.file_name().unwrap(), "package.json");

    let config = discovery.load().unwrap();
    assert_eq!(config.apps["site"].public_url.as_deref(), Some("/s/"));
    assert_eq!(config.apps["site"].pass_envs, vec!["API_URL".to_string()]);
}

#[test]
#[serial]
fn package_json_without_field_is_ignored() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("package.json"), r#"{ "name": "plain" }"#).unwrap();

    let discovery = ConfigDiscovery::new(dir.path());
    assert!(discovery.find().is_none());
    assert!(matches!(discovery.load(), Err(ConfigError::NotFound(_))));
}

#[test]
#[serial]
fn toml_takes_precedence_over_package_json() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("solid.toml"), "[apps.from_toml]\n").unwrap();
    fs::write(
        dir.path().join("package.json"),
        r#"{ "solid": { "apps": { "from_pkg": {} } } }"#,
    )
    .unwrap();

    let config = ConfigDiscovery::new(dir.path()).load().unwrap();
    assert!(config.apps.contains_key("from_toml"));
    assert!(!config.apps.contains_key("from_pkg"));
}

#[test]
#[serial]
fn settings_fall_back_to_defaults() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("solid.toml"), "[apps.site]\n").unwrap();

    let config = ConfigDiscovery::new(dir.path()).load().unwrap();
    assert_eq!(config.settings.bundler, "parcel");
    assert_eq!(config.settings.debounce_ms, 100);
    assert!(config.settings.watch_ignore.iter().any(|p| p == "node_modules"));
}

#[test]
#[serial]
fn env_overrides_settings() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("solid.toml"),
        "[settings]\nbundler = \"parcel\"\n\n[apps.site]\n",
    )
    .unwrap();

    unsafe {
        std::env::set_var("SOLID_SETTINGS__BUNDLER", "esbuild");
    }
    let config = ConfigDiscovery::new(dir.path()).load();
    unsafe {
        std::env::remove_var("SOLID_SETTINGS__BUNDLER");
    }

    assert_eq!(config.unwrap().settings.bundler, "esbuild");
}

#[test]
#[serial]
fn unknown_app_field_is_a_parse_error() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("solid.toml"), "[apps.site]\noutptu = \"x\"\n").unwrap();

    let err = ConfigDiscovery::new(dir.path()).load().unwrap_err();
    assert!(matches!(err, ConfigError::Parse { .. }));
}

//! On-disk project model.
//!
//! ```toml
//! [settings]
//! bundler = "parcel"
//!
//! [apps.site]
//! input = "src/site/index.html"
//! output = "dist/site"
//! pass_envs = ["API_URL"]
//! plugins = [
//!     { name = "exec", command = "tsc", args = ["--noEmit"] },
//!     { name = "copy", from = "static", to = "assets" },
//! ]
//! ```

use std::fmt;
use std::path::PathBuf;

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::error::{ConfigError, Result};
use crate::settings::Settings;

/// Runtime an app is bundled for.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AppType {
    /// Browser bundle
    #[default]
    Web,
    /// Server-side bundle
    Node,
}

impl fmt::Display for AppType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppType::Web => f.write_str("web"),
            AppType::Node => f.write_str("node"),
        }
    }
}

/// Whole configuration file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SolidConfig {
    #[serde(default)]
    pub settings: Settings,

    #[serde(default)]
    pub apps: IndexMap<String, AppManifest>,
}

/// One `[apps.<name>]` table. Unset fields fall back to app-scoped defaults
/// when a run resolves the app.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AppManifest {
    #[serde(
        default,
        deserialize_with = "one_or_many",
        skip_serializing_if = "Option::is_none"
    )]
    pub input: Option<Vec<String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output: Option<PathBuf>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub root: Option<PathBuf>,

    #[serde(default, alias = "publicUrl", skip_serializing_if = "Option::is_none")]
    pub public_url: Option<String>,

    #[serde(default, alias = "appType", skip_serializing_if = "Option::is_none")]
    pub app_type: Option<AppType>,

    #[serde(default, alias = "passEnvs", skip_serializing_if = "Vec::is_empty")]
    pub pass_envs: Vec<String>,

    #[serde(default, alias = "hardWatch", skip_serializing_if = "Option::is_none")]
    pub hard_watch: Option<bool>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub plugins: Vec<PluginSpec>,
}

impl AppManifest {
    /// Plugin identifiers in manifest order, labels taking precedence.
    pub fn plugin_names(&self) -> impl Iterator<Item = &str> {
        self.plugins.iter().map(PluginSpec::id)
    }
}

/// A plugin reference: the plugin name plus its free-form options.
///
/// `label` tells several instances of one plugin apart, e.g. two `exec`
/// steps. It is what logs show and what `--disable` matches.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PluginSpec {
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,

    #[serde(flatten)]
    pub options: Map<String, Value>,
}

impl PluginSpec {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            label: None,
            options: Map::new(),
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// The label if one is set, otherwise the plugin name.
    pub fn id(&self) -> &str {
        self.label.as_deref().unwrap_or(&self.name)
    }

    pub fn with_option(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.options.insert(key.into(), value.into());
        self
    }

    /// Deserialize the options into a plugin-specific type.
    pub fn options_as<T: serde::de::DeserializeOwned>(&self) -> Result<T> {
        serde_json::from_value(Value::Object(self.options.clone())).map_err(|e| {
            ConfigError::Invalid(format!("options for plugin '{}': {e}", self.name))
        })
    }
}

impl SolidConfig {
    /// Render the configuration back to TOML.
    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::Invalid(e.to_string()))
    }

    /// Example configuration written by documentation and `solid check --example`.
    pub fn example() -> Self {
        let mut apps = IndexMap::new();
        apps.insert(
            "site".to_string(),
            AppManifest {
                input: Some(vec!["src/site/index.html".to_string()]),
                pass_envs: vec!["API_URL".to_string()],
                plugins: vec![
                    PluginSpec::new("exec")
                        .with_option("command", "tsc")
                        .with_option("args", vec!["--noEmit"]),
                    PluginSpec::new("copy")
                        .with_option("from", "static")
                        .with_option("to", "assets"),
                ],
                ..AppManifest::default()
            },
        );
        apps.insert(
            "api".to_string(),
            AppManifest {
                input: Some(vec!["src/api/index.ts".to_string()]),
                output: Some(PathBuf::from("dist/api")),
                app_type: Some(AppType::Node),
                plugins: vec![PluginSpec::new("node-server").with_option("entry", "index.js")],
                ..AppManifest::default()
            },
        );

        Self {
            settings: Settings::default(),
            apps,
        }
    }
}

fn one_or_many<'de, D>(deserializer: D) -> std::result::Result<Option<Vec<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum OneOrMany {
        One(String),
        Many(Vec<String>),
    }

    Ok(
        Option::<OneOrMany>::deserialize(deserializer)?.map(|value| match value {
            OneOrMany::One(pattern) => vec![pattern],
            OneOrMany::Many(patterns) => patterns,
        }),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_input_accepts_single_pattern() {
        let app: AppManifest = serde_json::from_value(json!({ "input": "src/a/**" })).unwrap();
        assert_eq!(app.input, Some(vec!["src/a/**".to_string()]));
    }

    #[test]
    fn test_input_accepts_list() {
        let app: AppManifest =
            serde_json::from_value(json!({ "input": ["a.html", "b.html"] })).unwrap();
        assert_eq!(app.input.unwrap().len(), 2);
    }

    #[test]
    fn test_camel_case_aliases() {
        let app: AppManifest = serde_json::from_value(json!({
            "publicUrl": "/x/",
            "appType": "node",
            "passEnvs": ["HOME"],
            "hardWatch": false
        }))
        .unwrap();
        assert_eq!(app.public_url.as_deref(), Some("/x/"));
        assert_eq!(app.app_type, Some(AppType::Node));
        assert_eq!(app.pass_envs, vec!["HOME".to_string()]);
        assert_eq!(app.hard_watch, Some(false));
    }

    #[test]
    fn test_unknown_field_rejected() {
        let result: std::result::Result<AppManifest, _> =
            serde_json::from_value(json!({ "outptu": "dist" }));
        assert!(result.is_err());
    }

    #[test]
    fn test_plugin_options_flatten() {
        let spec: PluginSpec =
            serde_json::from_value(json!({ "name": "copy", "from": "a", "to": "b" })).unwrap();
        assert_eq!(spec.name, "copy");
        assert_eq!(spec.options.get("from"), Some(&json!("a")));

        #[derive(Deserialize)]
        struct CopyOptions {
            from: String,
            to: String,
        }
        let opts: CopyOptions = spec.options_as().unwrap();
        assert_eq!(opts.from, "a");
        assert_eq!(opts.to, "b");
    }

    #[test]
    fn test_plugin_label_is_not_an_option() {
        let spec: PluginSpec = serde_json::from_value(
            json!({ "name": "exec", "label": "typecheck", "command": "tsc" }),
        )
        .unwrap();
        assert_eq!(spec.id(), "typecheck");
        assert!(!spec.options.contains_key("label"));
        assert_eq!(spec.options.get("command"), Some(&json!("tsc")));

        assert_eq!(PluginSpec::new("exec").id(), "exec");
    }

    #[test]
    fn test_plugin_options_type_mismatch() {
        #[derive(Debug, Deserialize)]
        #[allow(dead_code)]
        struct Needs {
            count: u32,
        }
        let spec = PluginSpec::new("x").with_option("count", "many");
        let err = spec.options_as::<Needs>().unwrap_err();
        assert!(err.to_string().contains("plugin 'x'"));
    }

    #[test]
    fn test_example_round_trips_through_toml() {
        let rendered = SolidConfig::example().to_toml_string().unwrap();
        assert!(rendered.contains("[apps.site]"));
        assert!(rendered.contains("node-server"));
    }
}

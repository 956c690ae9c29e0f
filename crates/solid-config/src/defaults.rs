use std::path::PathBuf;

use crate::manifest::AppType;

pub const CONFIG_FILE: &str = "solid.toml";
pub const PACKAGE_JSON_FIELD: &str = "solid";

pub fn default_input(app: &str) -> Vec<String> {
    vec![format!("src/{app}/**")]
}

pub fn default_output(app: &str) -> PathBuf {
    PathBuf::from(format!("dist/public/static/{app}/"))
}

pub fn default_root() -> PathBuf {
    PathBuf::from("src/")
}

pub fn default_public_url(app: &str) -> String {
    format!("/static/{app}/")
}

pub fn default_app_type() -> AppType {
    AppType::Web
}

pub fn default_hard_watch() -> bool {
    true
}

pub fn default_bundler() -> String {
    "parcel".to_string()
}

pub fn default_settle_ms() -> u64 {
    250
}

pub fn default_debounce_ms() -> u64 {
    100
}

pub fn default_watch_ignore() -> Vec<String> {
    vec![
        "node_modules".to_string(),
        "dist".to_string(),
        ".parcel-cache".to_string(),
        "*.log".to_string(),
    ]
}

//! Configuration loading and environment parsing.

use super::validation::validate_config_security;
use super::Config;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};

/// Prefix for per-field environment overrides.
pub const ENV_PREFIX: &str = "PAIRUP__";
/// Inline JSON configuration document.
pub const ENV_CONFIG_JSON: &str = "PAIRUP_CONFIG_JSON";
/// Path to a JSON configuration file.
pub const ENV_CONFIG_PATH: &str = "PAIRUP_CONFIG_PATH";

/// Load configuration with the following precedence (highest first):
/// 1) `PAIRUP__SECTION__FIELD=value` overrides for individual fields
/// 2) `PAIRUP_CONFIG_JSON` env var containing raw JSON
/// 3) File pointed to by `PAIRUP_CONFIG_PATH`
/// 4) config.json in the current working directory
/// 5) config.json next to the executable
/// 6) Defaults compiled into the binary
///
/// Sources are deep-merged, so a higher source only needs to name the fields it
/// changes. Read or parse failures are printed to stderr and the source is
/// skipped.
///
/// Validation errors are printed but not returned; callers that need a hard
/// failure call [`validate_config_security`] on the result themselves.
#[must_use]
pub fn load() -> Config {
    use std::env;

    let defaults = Config::default();
    let mut merged =
        serde_json::to_value(&defaults).unwrap_or_else(|_| Value::Object(serde_json::Map::new()));

    if let Ok(exe_path) = env::current_exe() {
        if let Some(mut exe_dir) = exe_path.parent().map(Path::to_path_buf) {
            exe_dir.push("config.json");
            merge_file_source(&mut merged, &exe_dir);
        }
    }

    merge_file_source(&mut merged, &PathBuf::from("config.json"));

    if let Ok(path) = env::var(ENV_CONFIG_PATH) {
        merge_file_source(&mut merged, &PathBuf::from(path));
    }

    if let Ok(json) = env::var(ENV_CONFIG_JSON) {
        if let Some(value) = parse_json_document(&json, ENV_CONFIG_JSON) {
            merge_values(&mut merged, value);
        }
    }

    apply_env_overrides(&mut merged, env::vars());

    let config = match serde_json::from_value::<Config>(merged) {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Failed to deserialize config; using defaults: {e}");
            defaults
        }
    };

    if let Err(e) = validate_config_security(&config) {
        eprintln!("Configuration validation error: {e}");
    }

    config
}

fn parse_json_document(raw: &str, label: &str) -> Option<Value> {
    if raw.trim().is_empty() {
        return None;
    }

    match serde_json::from_str(raw) {
        Ok(value) => Some(value),
        Err(err) => {
            eprintln!("Failed to parse config from {label}: {err}");
            None
        }
    }
}

fn merge_file_source(target: &mut Value, path: &Path) {
    if path.as_os_str().is_empty() || !path.exists() {
        return;
    }

    match fs::read_to_string(path) {
        Ok(contents) => {
            if let Some(value) = parse_json_document(&contents, &format!("file {}", path.display()))
            {
                merge_values(target, value);
            }
        }
        Err(err) => {
            eprintln!("Failed to read config from {}: {}", path.display(), err);
        }
    }
}

/// Deep-merge `source` into `target`; objects merge key by key, anything else replaces.
fn merge_values(target: &mut Value, source: Value) {
    match (target, source) {
        (Value::Object(target_map), Value::Object(source_map)) => {
            for (key, value) in source_map {
                match target_map.get_mut(&key) {
                    Some(existing) => merge_values(existing, value),
                    None => {
                        target_map.insert(key, value);
                    }
                }
            }
        }
        (target_slot, source_value) => {
            *target_slot = source_value;
        }
    }
}

fn apply_env_overrides(root: &mut Value, vars: impl IntoIterator<Item = (String, String)>) {
    for (key, raw_value) in vars {
        let Some(stripped) = key.strip_prefix(ENV_PREFIX) else {
            continue;
        };

        let segments: Vec<String> = stripped
            .split("__")
            .filter(|segment| !segment.is_empty())
            .map(str::to_ascii_lowercase)
            .collect();

        if segments.is_empty() {
            continue;
        }

        set_nested_value(root, &segments, parse_env_value(&raw_value));
    }
}

fn parse_env_value(raw: &str) -> Value {
    let trimmed = raw.trim();
    // CORS origins are a comma-separated string, not a list.
    if trimmed.contains(',') {
        return Value::String(trimmed.to_string());
    }

    parse_scalar(trimmed)
}

fn parse_scalar(raw: &str) -> Value {
    if raw.is_empty() {
        return Value::String(String::new());
    }

    serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()))
}

fn set_nested_value(target: &mut Value, segments: &[String], value: Value) {
    let Some((head, rest)) = segments.split_first() else {
        *target = value;
        return;
    };

    if !target.is_object() {
        *target = Value::Object(serde_json::Map::new());
    }
    let Value::Object(map) = target else {
        return;
    };

    if rest.is_empty() {
        map.insert(head.clone(), value);
        return;
    }

    let entry = map
        .entry(head.clone())
        .or_insert_with(|| Value::Object(serde_json::Map::new()));
    set_nested_value(entry, rest, value);
}

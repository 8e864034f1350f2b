use std::collections::BTreeMap;
use std::env;
use std::fs;
use std::path::Path;

use antar_core::config::{discover_config_path, AppConfig, LoadOptions};
use toml::Value;

pub fn run() -> String {
    let config = match AppConfig::load(LoadOptions::default()) {
        Ok(config) => config,
        Err(error) => return format!("config validation failed: {error}"),
    };

    let config_file_path = discover_config_path();
    let config_file_doc = config_file_path.as_deref().and_then(load_config_file_doc);

    let mut lines = vec!["effective config (source precedence: env > file > default):".to_string()];
    for (key, value, env_keys) in effective_values(&config) {
        let source =
            field_source(key, env_keys, config_file_doc.as_ref(), config_file_path.as_deref());
        lines.push(render_line(key, &value, source));
    }

    lines.join("\n")
}

type Field = (&'static str, String, &'static [&'static str]);

fn effective_values(config: &AppConfig) -> Vec<Field> {
    vec![
        field("database.url", config.database.url.clone(), &["ANTAR_DATABASE_URL"]),
        field(
            "database.max_connections",
            config.database.max_connections.to_string(),
            &["ANTAR_DATABASE_MAX_CONNECTIONS"],
        ),
        field(
            "database.timeout_secs",
            config.database.timeout_secs.to_string(),
            &["ANTAR_DATABASE_TIMEOUT_SECS"],
        ),
        field(
            "server.bind_address",
            config.server.bind_address.clone(),
            &["ANTAR_SERVER_BIND_ADDRESS"],
        ),
        field("server.port", config.server.port.to_string(), &["ANTAR_SERVER_PORT"]),
        field(
            "server.graceful_shutdown_secs",
            config.server.graceful_shutdown_secs.to_string(),
            &["ANTAR_SERVER_GRACEFUL_SHUTDOWN_SECS"],
        ),
        field(
            "dialogue.error_threshold",
            config.dialogue.error_threshold.to_string(),
            &["ANTAR_DIALOGUE_ERROR_THRESHOLD"],
        ),
        field(
            "dialogue.step_error_thresholds",
            step_thresholds(&config.dialogue.step_error_thresholds),
            &[],
        ),
        field(
            "dialogue.session_backend",
            config.dialogue.session_backend.as_str().to_string(),
            &["ANTAR_DIALOGUE_SESSION_BACKEND"],
        ),
        field(
            "dialogue.session_ttl_secs",
            config.dialogue.session_ttl_secs.to_string(),
            &["ANTAR_DIALOGUE_SESSION_TTL_SECS"],
        ),
        field(
            "dialogue.sweep_interval_secs",
            config.dialogue.sweep_interval_secs.to_string(),
            &["ANTAR_DIALOGUE_SWEEP_INTERVAL_SECS"],
        ),
        field(
            "logging.level",
            config.logging.level.clone(),
            &["ANTAR_LOGGING_LEVEL", "ANTAR_LOG_LEVEL"],
        ),
        field(
            "logging.format",
            format!("{:?}", config.logging.format),
            &["ANTAR_LOGGING_FORMAT", "ANTAR_LOG_FORMAT"],
        ),
    ]
}

fn step_thresholds(thresholds: &BTreeMap<String, u32>) -> String {
    if thresholds.is_empty() {
        return "{}".to_string();
    }
    let entries: Vec<String> =
        thresholds.iter().map(|(step, threshold)| format!("{step}={threshold}")).collect();
    format!("{{{}}}", entries.join(", "))
}

fn field(key: &'static str, value: String, env_keys: &'static [&'static str]) -> Field {
    (key, value, env_keys)
}

fn load_config_file_doc(path: &Path) -> Option<Value> {
    let raw = fs::read_to_string(path).ok()?;
    raw.parse::<Value>().ok()
}

fn field_source(
    key_path: &str,
    env_keys: &[&str],
    config_file_doc: Option<&Value>,
    config_file_path: Option<&Path>,
) -> String {
    if let Some(env_key) = env_keys.iter().find(|key| env::var_os(key).is_some()) {
        return format!("env ({env_key})");
    }

    if let Some(doc) = config_file_doc {
        if contains_path(doc, key_path) {
            let file_path = config_file_path
                .map(|path| path.display().to_string())
                .unwrap_or_else(|| "config file".to_string());
            return format!("file ({file_path})");
        }
    }

    "default".to_string()
}

fn contains_path(root: &Value, key_path: &str) -> bool {
    let mut current = root;
    for key in key_path.split('.') {
        let Some(next) = current.get(key) else {
            return false;
        };
        current = next;
    }
    true
}

fn render_line(key: &str, value: &str, source: String) -> String {
    format!("- {key} = {value} (source: {source})")
}

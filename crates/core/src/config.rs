use std::collections::BTreeMap;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::flows::states::{DialogueStep, ErrorBudget, ErrorPolicy, DEFAULT_ERROR_THRESHOLD};

#[derive(Clone, Debug, Serialize)]
pub struct AppConfig {
    pub database: DatabaseConfig,
    pub server: ServerConfig,
    pub dialogue: DialogueConfig,
    pub logging: LoggingConfig,
}

#[derive(Clone, Debug, Serialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub timeout_secs: u64,
}

#[derive(Clone, Debug, Serialize)]
pub struct ServerConfig {
    pub bind_address: String,
    pub port: u16,
    pub graceful_shutdown_secs: u64,
}

#[derive(Clone, Debug, Serialize)]
pub struct DialogueConfig {
    /// Consecutive invalid answers tolerated on a slot step before the
    /// conversation is abandoned.
    pub error_threshold: u32,
    pub session_backend: SessionBackend,
    pub session_ttl_secs: u64,
    pub sweep_interval_secs: u64,
    /// Per-step thresholds keyed by step label (`check_reservation = 4`).
    /// Overrides `error_threshold` for slot steps and bounds command steps,
    /// which are unbounded otherwise.
    pub step_error_thresholds: BTreeMap<String, u32>,
}

impl DialogueConfig {
    pub fn error_policy(&self) -> Result<ErrorPolicy, ConfigError> {
        self.step_error_thresholds.iter().try_fold(
            ErrorPolicy::new(self.error_threshold),
            |policy, (label, threshold)| {
                let step = label.parse::<DialogueStep>().map_err(|_| {
                    ConfigError::Validation(format!(
                        "dialogue.step_error_thresholds has unknown step `{label}`"
                    ))
                })?;
                Ok(policy.with_budget(step, ErrorBudget::Bounded(*threshold)))
            },
        )
    }

    pub fn session_ttl(&self) -> Result<chrono::Duration, ConfigError> {
        i64::try_from(self.session_ttl_secs)
            .ok()
            .filter(|_| self.session_ttl_secs <= MAX_SESSION_TTL_SECS)
            .and_then(chrono::Duration::try_seconds)
            .ok_or_else(session_ttl_out_of_range)
    }
}

/// Thirty days.
pub const MAX_SESSION_TTL_SECS: u64 = 30 * 24 * 60 * 60;

fn session_ttl_out_of_range() -> ConfigError {
    ConfigError::Validation(format!(
        "dialogue.session_ttl_secs must be in range 1..={MAX_SESSION_TTL_SECS}"
    ))
}

#[derive(Clone, Debug, Serialize)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionBackend {
    Memory,
    Sqlite,
}

impl SessionBackend {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Memory => "memory",
            Self::Sqlite => "sqlite",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    Compact,
    Pretty,
    Json,
}

#[derive(Clone, Debug, Default)]
pub struct ConfigOverrides {
    pub database_url: Option<String>,
    pub log_level: Option<String>,
    pub bind_address: Option<String>,
    pub port: Option<u16>,
    pub session_backend: Option<SessionBackend>,
}

#[derive(Clone, Debug, Default)]
pub struct LoadOptions {
    pub config_path: Option<PathBuf>,
    pub require_file: bool,
    pub overrides: ConfigOverrides,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read config file `{path}`: {source}")]
    ReadFile { path: PathBuf, source: std::io::Error },
    #[error("could not parse config file `{path}`: {source}")]
    ParseFile { path: PathBuf, source: toml::de::Error },
    #[error("required config file was not found: `{0}`")]
    MissingConfigFile(PathBuf),
    #[error("environment variable interpolation failed for `{var}`")]
    MissingEnvInterpolation { var: String },
    #[error("unterminated environment interpolation expression")]
    UnterminatedInterpolation,
    #[error("invalid environment override for `{key}`: `{value}`")]
    InvalidEnvOverride { key: String, value: String },
    #[error("configuration validation failed: {0}")]
    Validation(String),
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database: DatabaseConfig {
                url: "sqlite://antar.db".to_string(),
                max_connections: 5,
                timeout_secs: 30,
            },
            server: ServerConfig {
                bind_address: "127.0.0.1".to_string(),
                port: 5000,
                graceful_shutdown_secs: 15,
            },
            dialogue: DialogueConfig {
                error_threshold: DEFAULT_ERROR_THRESHOLD,
                session_backend: SessionBackend::Memory,
                session_ttl_secs: 1800,
                sweep_interval_secs: 60,
                step_error_thresholds: BTreeMap::new(),
            },
            logging: LoggingConfig { level: "info".to_string(), format: LogFormat::Compact },
        }
    }
}

impl std::str::FromStr for SessionBackend {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "memory" => Ok(Self::Memory),
            "sqlite" => Ok(Self::Sqlite),
            other => Err(ConfigError::Validation(format!(
                "unsupported session backend `{other}` (expected memory|sqlite)"
            ))),
        }
    }
}

impl std::str::FromStr for LogFormat {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "compact" => Ok(Self::Compact),
            "pretty" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            other => Err(ConfigError::Validation(format!(
                "unsupported log format `{other}` (expected compact|pretty|json)"
            ))),
        }
    }
}

impl AppConfig {
    pub fn load(options: LoadOptions) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        let maybe_path = resolve_config_path(options.config_path.as_deref());

        if let Some(path) = maybe_path {
            let patch = read_patch(&path)?;
            config.apply_patch(patch);
        } else if options.require_file {
            let expected = options.config_path.unwrap_or_else(|| PathBuf::from("antar.toml"));
            return Err(ConfigError::MissingConfigFile(expected));
        }

        config.apply_env_overrides()?;
        config.apply_overrides(options.overrides);
        config.validate()?;

        Ok(config)
    }

    fn apply_patch(&mut self, patch: ConfigPatch) {
        if let Some(database) = patch.database {
            if let Some(url) = database.url {
                self.database.url = url;
            }
            if let Some(max_connections) = database.max_connections {
                self.database.max_connections = max_connections;
            }
            if let Some(timeout_secs) = database.timeout_secs {
                self.database.timeout_secs = timeout_secs;
            }
        }

        if let Some(server) = patch.server {
            if let Some(bind_address) = server.bind_address {
                self.server.bind_address = bind_address;
            }
            if let Some(port) = server.port {
                self.server.port = port;
            }
            if let Some(graceful_shutdown_secs) = server.graceful_shutdown_secs {
                self.server.graceful_shutdown_secs = graceful_shutdown_secs;
            }
        }

        if let Some(dialogue) = patch.dialogue {
            if let Some(error_threshold) = dialogue.error_threshold {
                self.dialogue.error_threshold = error_threshold;
            }
            if let Some(session_backend) = dialogue.session_backend {
                self.dialogue.session_backend = session_backend;
            }
            if let Some(session_ttl_secs) = dialogue.session_ttl_secs {
                self.dialogue.session_ttl_secs = session_ttl_secs;
            }
            if let Some(sweep_interval_secs) = dialogue.sweep_interval_secs {
                self.dialogue.sweep_interval_secs = sweep_interval_secs;
            }
            if let Some(step_error_thresholds) = dialogue.step_error_thresholds {
                self.dialogue.step_error_thresholds.extend(step_error_thresholds);
            }
        }

        if let Some(logging) = patch.logging {
            if let Some(level) = logging.level {
                self.logging.level = level;
            }
            if let Some(format) = logging.format {
                self.logging.format = format;
            }
        }
    }

    fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        if let Some(value) = read_env("ANTAR_DATABASE_URL") {
            self.database.url = value;
        }
        if let Some(value) = read_env("ANTAR_DATABASE_MAX_CONNECTIONS") {
            self.database.max_connections = parse_u32("ANTAR_DATABASE_MAX_CONNECTIONS", &value)?;
        }
        if let Some(value) = read_env("ANTAR_DATABASE_TIMEOUT_SECS") {
            self.database.timeout_secs = parse_u64("ANTAR_DATABASE_TIMEOUT_SECS", &value)?;
        }

        if let Some(value) = read_env("ANTAR_SERVER_BIND_ADDRESS") {
            self.server.bind_address = value;
        }
        if let Some(value) = read_env("ANTAR_SERVER_PORT") {
            self.server.port = parse_u16("ANTAR_SERVER_PORT", &value)?;
        }
        if let Some(value) = read_env("ANTAR_SERVER_GRACEFUL_SHUTDOWN_SECS") {
            self.server.graceful_shutdown_secs =
                parse_u64("ANTAR_SERVER_GRACEFUL_SHUTDOWN_SECS", &value)?;
        }

        if let Some(value) = read_env("ANTAR_DIALOGUE_ERROR_THRESHOLD") {
            self.dialogue.error_threshold = parse_u32("ANTAR_DIALOGUE_ERROR_THRESHOLD", &value)?;
        }
        if let Some(value) = read_env("ANTAR_DIALOGUE_SESSION_BACKEND") {
            self.dialogue.session_backend = value.parse()?;
        }
        if let Some(value) = read_env("ANTAR_DIALOGUE_SESSION_TTL_SECS") {
            self.dialogue.session_ttl_secs = parse_u64("ANTAR_DIALOGUE_SESSION_TTL_SECS", &value)?;
        }
        if let Some(value) = read_env("ANTAR_DIALOGUE_SWEEP_INTERVAL_SECS") {
            self.dialogue.sweep_interval_secs =
                parse_u64("ANTAR_DIALOGUE_SWEEP_INTERVAL_SECS", &value)?;
        }

        let log_level = read_env("ANTAR_LOGGING_LEVEL").or_else(|| read_env("ANTAR_LOG_LEVEL"));
        if let Some(value) = log_level {
            self.logging.level = value;
        }
        let log_format = read_env("ANTAR_LOGGING_FORMAT").or_else(|| read_env("ANTAR_LOG_FORMAT"));
        if let Some(value) = log_format {
            self.logging.format = value.parse()?;
        }

        Ok(())
    }

    fn apply_overrides(&mut self, overrides: ConfigOverrides) {
        if let Some(database_url) = overrides.database_url {
            self.database.url = database_url;
        }
        if let Some(log_level) = overrides.log_level {
            self.logging.level = log_level;
        }
        if let Some(bind_address) = overrides.bind_address {
            self.server.bind_address = bind_address;
        }
        if let Some(port) = overrides.port {
            self.server.port = port;
        }
        if let Some(session_backend) = overrides.session_backend {
            self.dialogue.session_backend = session_backend;
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_database(&self.database)?;
        validate_server(&self.server)?;
        validate_dialogue(&self.dialogue)?;
        validate_logging(&self.logging)?;
        Ok(())
    }
}

/// The config file `AppConfig::load` would pick up when no explicit path is given.
pub fn discover_config_path() -> Option<PathBuf> {
    resolve_config_path(None)
}

fn resolve_config_path(explicit_path: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit_path {
        return path.exists().then_some(path.to_path_buf());
    }

    [PathBuf::from("antar.toml"), PathBuf::from("config/antar.toml")]
        .into_iter()
        .find(|path| path.exists())
}

fn read_patch(path: &Path) -> Result<ConfigPatch, ConfigError> {
    let raw = fs::read_to_string(path)
        .map_err(|source| ConfigError::ReadFile { path: path.to_path_buf(), source })?;

    let interpolated = interpolate_env_vars(&raw)?;
    toml::from_str::<ConfigPatch>(&interpolated)
        .map_err(|source| ConfigError::ParseFile { path: path.to_path_buf(), source })
}

fn interpolate_env_vars(input: &str) -> Result<String, ConfigError> {
    let mut output = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch == '$' && matches!(chars.peek(), Some('{')) {
            chars.next();
            let mut key = String::new();

            loop {
                match chars.next() {
                    Some('}') => break,
                    Some(next) => key.push(next),
                    None => return Err(ConfigError::UnterminatedInterpolation),
                }
            }

            let value = env::var(&key)
                .map_err(|_| ConfigError::MissingEnvInterpolation { var: key.clone() })?;
            output.push_str(&value);
            continue;
        }

        output.push(ch);
    }

    Ok(output)
}

fn validate_database(database: &DatabaseConfig) -> Result<(), ConfigError> {
    let url = database.url.trim();
    let sqlite_url =
        url.starts_with("sqlite://") || url.starts_with("sqlite::") || url == ":memory:";
    if !sqlite_url {
        return Err(ConfigError::Validation(
            "database.url must be a sqlite URL (`sqlite://...`, `sqlite::...`, or `:memory:`)"
                .to_string(),
        ));
    }

    if database.max_connections == 0 {
        return Err(ConfigError::Validation(
            "database.max_connections must be greater than zero".to_string(),
        ));
    }

    if database.timeout_secs == 0 || database.timeout_secs > 300 {
        return Err(ConfigError::Validation(
            "database.timeout_secs must be in range 1..=300".to_string(),
        ));
    }

    Ok(())
}

fn validate_server(server: &ServerConfig) -> Result<(), ConfigError> {
    if server.bind_address.trim().is_empty() {
        return Err(ConfigError::Validation("server.bind_address must not be empty".to_string()));
    }

    if server.port == 0 {
        return Err(ConfigError::Validation("server.port must be greater than zero".to_string()));
    }

    if server.graceful_shutdown_secs == 0 {
        return Err(ConfigError::Validation(
            "server.graceful_shutdown_secs must be greater than zero".to_string(),
        ));
    }

    Ok(())
}

fn validate_dialogue(dialogue: &DialogueConfig) -> Result<(), ConfigError> {
    if dialogue.error_threshold > 10 {
        return Err(ConfigError::Validation(
            "dialogue.error_threshold must be in range 0..=10".to_string(),
        ));
    }

    for (label, threshold) in &dialogue.step_error_thresholds {
        if *threshold > 10 {
            return Err(ConfigError::Validation(format!(
                "dialogue.step_error_thresholds.{label} must be in range 0..=10"
            )));
        }
    }
    dialogue.error_policy()?;

    if dialogue.session_ttl_secs == 0 || dialogue.session_ttl_secs > MAX_SESSION_TTL_SECS {
        return Err(session_ttl_out_of_range());
    }

    if dialogue.sweep_interval_secs == 0 || dialogue.sweep_interval_secs > dialogue.session_ttl_secs
    {
        return Err(ConfigError::Validation(
            "dialogue.sweep_interval_secs must be in range 1..=session_ttl_secs".to_string(),
        ));
    }

    Ok(())
}

fn validate_logging(logging: &LoggingConfig) -> Result<(), ConfigError> {
    let level = logging.level.trim().to_ascii_lowercase();
    match level.as_str() {
        "trace" | "debug" | "info" | "warn" | "error" => Ok(()),
        _ => Err(ConfigError::Validation(
            "logging.level must be one of trace|debug|info|warn|error".to_string(),
        )),
    }
}

fn read_env(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.trim().is_empty())
}

fn parse_u16(key: &str, value: &str) -> Result<u16, ConfigError> {
    value.parse::<u16>().map_err(|_| ConfigError::InvalidEnvOverride {
        key: key.to_string(),
        value: value.to_string(),
    })
}

fn parse_u32(key: &str, value: &str) -> Result<u32, ConfigError> {
    value.parse::<u32>().map_err(|_| ConfigError::InvalidEnvOverride {
        key: key.to_string(),
        value: value.to_string(),
    })
}

fn parse_u64(key: &str, value: &str) -> Result<u64, ConfigError> {
    value.parse::<u64>().map_err(|_| ConfigError::InvalidEnvOverride {
        key: key.to_string(),
        value: value.to_string(),
    })
}

#[derive(Debug, Default, Deserialize)]
struct ConfigPatch {
    database: Option<DatabasePatch>,
    server: Option<ServerPatch>,
    dialogue: Option<DialoguePatch>,
    logging: Option<LoggingPatch>,
}

#[derive(Debug, Default, Deserialize)]
struct DatabasePatch {
    url: Option<String>,
    max_connections: Option<u32>,
    timeout_secs: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
struct ServerPatch {
    bind_address: Option<String>,
    port: Option<u16>,
    graceful_shutdown_secs: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
struct DialoguePatch {
    error_threshold: Option<u32>,
    session_backend: Option<SessionBackend>,
    session_ttl_secs: Option<u64>,
    sweep_interval_secs: Option<u64>,
    step_error_thresholds: Option<BTreeMap<String, u32>>,
}

#[derive(Debug, Default, Deserialize)]
struct LoggingPatch {
    level: Option<String>,
    format: Option<LogFormat>,
}

#[cfg(test)]
mod tests {
    use std::env;
    use std::fs;
    use std::io;
    use std::sync::{Mutex, OnceLock};

    use tempfile::TempDir;

    use super::{
        AppConfig, ConfigError, ConfigOverrides, LoadOptions, LogFormat, SessionBackend,
        MAX_SESSION_TTL_SECS,
    };
    use crate::flows::states::{DialogueStep, ErrorBudget};

    static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();

    fn env_lock() -> &'static Mutex<()> {
        ENV_LOCK.get_or_init(|| Mutex::new(()))
    }

    fn clear_vars(vars: &[&str]) {
        for var in vars {
            env::remove_var(var);
        }
    }

    fn ensure(condition: bool, message: &'static str) -> Result<(), String> {
        if condition {
            Ok(())
        } else {
            Err(message.to_string())
        }
    }

    #[test]
    fn defaults_are_valid() -> Result<(), String> {
        let config = AppConfig::default();
        config.validate().map_err(|err| format!("defaults should validate: {err}"))?;

        ensure(config.dialogue.error_threshold == 2, "default error threshold should be 2")?;
        ensure(
            config.dialogue.session_backend == SessionBackend::Memory,
            "sessions should live in memory by default",
        )?;
        let ttl = config.dialogue.session_ttl().map_err(|err| err.to_string())?;
        ensure(ttl.num_seconds() == 1800, "ttl should be 30 minutes")?;
        ensure(config.server.port == 5000, "default port should be 5000")
    }

    #[test]
    fn file_load_supports_env_interpolation() -> Result<(), String> {
        let _guard = env_lock().lock().map_err(|_| "env lock is poisoned".to_string())?;

        env::set_var("TEST_ANTAR_DB_PATH", "/tmp/antar-from-env.db");

        let result = (|| -> Result<(), String> {
            let dir = TempDir::new().map_err(|err: io::Error| err.to_string())?;
            let path = dir.path().join("antar.toml");
            fs::write(
                &path,
                r#"
[database]
url = "sqlite://${TEST_ANTAR_DB_PATH}"

[dialogue]
error_threshold = 3
session_backend = "sqlite"

[dialogue.step_error_thresholds]
check_reservation = 4
"#,
            )
            .map_err(|err| err.to_string())?;

            let config =
                AppConfig::load(LoadOptions { config_path: Some(path), ..LoadOptions::default() })
                    .map_err(|err| format!("config load failed: {err}"))?;

            ensure(
                config.database.url == "sqlite:///tmp/antar-from-env.db",
                "database url should be interpolated from environment",
            )?;
            ensure(config.dialogue.error_threshold == 3, "threshold should come from the file")?;
            let policy = config.dialogue.error_policy().map_err(|err| err.to_string())?;
            ensure(
                policy.budget_for(DialogueStep::CheckReservation) == ErrorBudget::Bounded(4),
                "per-step threshold should bound the lookup step",
            )?;
            ensure(
                policy.budget_for(DialogueStep::Phone) == ErrorBudget::Bounded(3),
                "slot steps should keep the shared threshold",
            )?;
            ensure(
                config.dialogue.session_backend == SessionBackend::Sqlite,
                "session backend should come from the file",
            )?;
            Ok(())
        })();

        clear_vars(&["TEST_ANTAR_DB_PATH"]);
        result
    }

    #[test]
    fn missing_interpolation_variable_is_reported() -> Result<(), String> {
        let _guard = env_lock().lock().map_err(|_| "env lock is poisoned".to_string())?;
        clear_vars(&["TEST_ANTAR_UNSET_VAR"]);

        let dir = TempDir::new().map_err(|err: io::Error| err.to_string())?;
        let path = dir.path().join("antar.toml");
        fs::write(&path, "[database]\nurl = \"${TEST_ANTAR_UNSET_VAR}\"\n")
            .map_err(|err| err.to_string())?;

        let error = match AppConfig::load(LoadOptions {
            config_path: Some(path),
            ..LoadOptions::default()
        }) {
            Ok(_) => return Err("expected interpolation failure".to_string()),
            Err(error) => error,
        };
        ensure(
            matches!(
                error,
                ConfigError::MissingEnvInterpolation { ref var } if var == "TEST_ANTAR_UNSET_VAR"
            ),
            "error should name the missing variable",
        )
    }

    #[test]
    fn logging_env_aliases_are_supported() -> Result<(), String> {
        let _guard = env_lock().lock().map_err(|_| "env lock is poisoned".to_string())?;

        env::set_var("ANTAR_LOG_LEVEL", "warn");
        env::set_var("ANTAR_LOG_FORMAT", "pretty");

        let result = (|| -> Result<(), String> {
            let config = AppConfig::load(LoadOptions::default())
                .map_err(|err| format!("config load failed: {err}"))?;

            ensure(config.logging.level == "warn", "warning log level should be set from env var")?;
            ensure(
                matches!(config.logging.format, LogFormat::Pretty),
                "pretty logging format should be set from env var",
            )?;
            Ok(())
        })();

        clear_vars(&["ANTAR_LOG_LEVEL", "ANTAR_LOG_FORMAT"]);
        result
    }

    #[test]
    fn precedence_defaults_file_env_overrides() -> Result<(), String> {
        let _guard = env_lock().lock().map_err(|_| "env lock is poisoned".to_string())?;

        env::set_var("ANTAR_DATABASE_URL", "sqlite://from-env.db");
        env::set_var("ANTAR_SERVER_PORT", "8081");
        env::set_var("ANTAR_DIALOGUE_SESSION_TTL_SECS", "600");

        let result = (|| -> Result<(), String> {
            let dir = TempDir::new().map_err(|err: io::Error| err.to_string())?;
            let path = dir.path().join("antar.toml");
            fs::write(
                &path,
                r#"
[database]
url = "sqlite://from-file.db"

[server]
port = 9000

[dialogue]
session_ttl_secs = 900

[logging]
level = "warn"
"#,
            )
            .map_err(|err| err.to_string())?;

            let config = AppConfig::load(LoadOptions {
                config_path: Some(path),
                overrides: ConfigOverrides {
                    database_url: Some("sqlite://from-override.db".to_string()),
                    log_level: Some("debug".to_string()),
                    ..ConfigOverrides::default()
                },
                ..LoadOptions::default()
            })
            .map_err(|err| format!("config load failed: {err}"))?;

            ensure(
                config.database.url == "sqlite://from-override.db",
                "override database url should win",
            )?;
            ensure(config.logging.level == "debug", "overridden log level should be debug")?;
            ensure(config.server.port == 8081, "env port should win over file and defaults")?;
            ensure(
                config.dialogue.session_ttl_secs == 600,
                "env session ttl should win over file and defaults",
            )?;
            Ok(())
        })();

        clear_vars(&[
            "ANTAR_DATABASE_URL",
            "ANTAR_SERVER_PORT",
            "ANTAR_DIALOGUE_SESSION_TTL_SECS",
        ]);
        result
    }

    #[test]
    fn invalid_env_numbers_are_rejected() -> Result<(), String> {
        let _guard = env_lock().lock().map_err(|_| "env lock is poisoned".to_string())?;

        env::set_var("ANTAR_DIALOGUE_ERROR_THRESHOLD", "dua");

        let result = (|| -> Result<(), String> {
            let error = match AppConfig::load(LoadOptions::default()) {
                Ok(_) => return Err("expected env override failure".to_string()),
                Err(error) => error,
            };
            ensure(
                matches!(
                    error,
                    ConfigError::InvalidEnvOverride { ref key, .. }
                        if key == "ANTAR_DIALOGUE_ERROR_THRESHOLD"
                ),
                "error should name the offending variable",
            )
        })();

        clear_vars(&["ANTAR_DIALOGUE_ERROR_THRESHOLD"]);
        result
    }

    #[test]
    fn validation_fails_fast_with_actionable_error() -> Result<(), String> {
        let mut config = AppConfig::default();
        config.database.url = "postgres://localhost/antar".to_string();
        let database_error = config.validate().err();
        ensure(
            matches!(
                database_error,
                Some(ConfigError::Validation(ref message)) if message.contains("database.url")
            ),
            "non-sqlite url should be rejected",
        )?;

        let mut config = AppConfig::default();
        config.dialogue.sweep_interval_secs = config.dialogue.session_ttl_secs + 1;
        let sweep_error = config.validate().err();
        ensure(
            matches!(
                sweep_error,
                Some(ConfigError::Validation(ref message))
                    if message.contains("dialogue.sweep_interval_secs")
            ),
            "sweep interval longer than ttl should be rejected",
        )
    }

    #[test]
    fn oversized_session_ttl_is_a_validation_error() -> Result<(), String> {
        let mut config = AppConfig::default();
        config.dialogue.session_ttl_secs = u64::MAX;

        let error = config.validate().err();
        ensure(
            matches!(
                error,
                Some(ConfigError::Validation(ref message))
                    if message.contains("dialogue.session_ttl_secs")
            ),
            "huge ttl should fail validation",
        )?;
        ensure(config.dialogue.session_ttl().is_err(), "huge ttl should not convert")?;

        config.dialogue.session_ttl_secs = MAX_SESSION_TTL_SECS;
        config.validate().map_err(|err| format!("thirty days should validate: {err}"))?;
        let ttl = config.dialogue.session_ttl().map_err(|err| err.to_string())?;
        ensure(ttl.num_days() == 30, "upper bound should convert exactly")
    }

    #[test]
    fn unknown_step_threshold_is_a_validation_error() {
        let mut config = AppConfig::default();
        config.dialogue.step_error_thresholds.insert("ringkasan".to_string(), 1);

        let error = config.validate().err();
        assert!(matches!(
            error,
            Some(ConfigError::Validation(ref message)) if message.contains("`ringkasan`")
        ));

        config.dialogue.step_error_thresholds.clear();
        config.dialogue.step_error_thresholds.insert("summary".to_string(), 11);
        assert!(config.validate().is_err());
    }

    #[test]
    fn unknown_session_backend_is_rejected() {
        let error = "redis".parse::<SessionBackend>().err();
        assert!(matches!(
            error,
            Some(ConfigError::Validation(ref message)) if message.contains("redis")
        ));
    }
}

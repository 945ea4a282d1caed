use crate::directory::MAX_LOBBY_LIMIT;
use crate::logging::LogFormat;
use noughts_ai::ADVISOR_NAMES;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Names the TOML file read by [`ServerSettings::load`].
pub const CONFIG_PATH_VAR: &str = "NOUGHTS_WEB_CONFIG";

const HOST_VAR: &str = "NOUGHTS_WEB_HOST";
const PORT_VAR: &str = "NOUGHTS_WEB_PORT";
const LOBBY_LIMIT_VAR: &str = "NOUGHTS_WEB_LOBBY_LIMIT";
const SEED_VAR: &str = "NOUGHTS_WEB_SEED";
const ADVISOR_VAR: &str = "NOUGHTS_WEB_ADVISOR";
const LOG_FORMAT_VAR: &str = "NOUGHTS_WEB_LOG_FORMAT";

/// Server process configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    /// Default listing size for `GET /api/matches` (1..=10)
    pub lobby_limit: usize,
    /// Seed for match ids and names; random per process when absent
    pub seed: Option<u64>,
    /// Advisor behind the suggestion endpoint
    pub advisor: String,
    pub log_format: LogFormat,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            lobby_limit: MAX_LOBBY_LIMIT,
            seed: None,
            advisor: "alphabeta".to_string(),
            log_format: LogFormat::Pretty,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueSource {
    Default,
    File,
    Env,
    Cli,
}

/// Where each setting came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SettingsSources {
    pub host: ValueSource,
    pub port: ValueSource,
    pub lobby_limit: ValueSource,
    pub seed: ValueSource,
    pub advisor: ValueSource,
    pub log_format: ValueSource,
}

impl Default for SettingsSources {
    fn default() -> Self {
        Self {
            host: ValueSource::Default,
            port: ValueSource::Default,
            lobby_limit: ValueSource::Default,
            seed: ValueSource::Default,
            advisor: ValueSource::Default,
            log_format: ValueSource::Default,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SettingsResolved {
    pub settings: ServerSettings,
    pub sources: SettingsSources,
}

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Invalid value for {key}: {message}")]
    InvalidValue { key: &'static str, message: String },
}

impl SettingsError {
    fn invalid(key: &'static str, message: impl Into<String>) -> Self {
        SettingsError::InvalidValue {
            key,
            message: message.into(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct FileSettings {
    #[serde(default)]
    host: Option<String>,
    #[serde(default)]
    port: Option<u16>,
    #[serde(default)]
    lobby_limit: Option<usize>,
    #[serde(default)]
    seed: Option<u64>,
    #[serde(default)]
    advisor: Option<String>,
    #[serde(default)]
    log_format: Option<LogFormat>,
}

impl ServerSettings {
    /// Defaults, then the file named by `NOUGHTS_WEB_CONFIG`, then `NOUGHTS_WEB_*` variables.
    pub fn load() -> Result<SettingsResolved, SettingsError> {
        Self::load_from(|key| std::env::var(key).ok())
    }

    /// Same layering as [`ServerSettings::load`] with an explicit variable lookup.
    pub fn load_from<F>(lookup: F) -> Result<SettingsResolved, SettingsError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let mut settings = ServerSettings::default();
        let mut sources = SettingsSources::default();

        if let Some(path) = var(CONFIG_PATH_VAR) {
            let file = read_file(Path::new(&path))?;
            settings.apply_file(file, &mut sources);
        }

        if let Some(host) = var(HOST_VAR) {
            settings.host = host.trim().to_string();
            sources.host = ValueSource::Env;
        }
        if let Some(port) = var(PORT_VAR) {
            settings.port = port
                .trim()
                .parse()
                .map_err(|_| SettingsError::invalid("port", format!("`{port}` is not a port")))?;
            sources.port = ValueSource::Env;
        }
        if let Some(limit) = var(LOBBY_LIMIT_VAR) {
            settings.lobby_limit = limit.trim().parse().map_err(|_| {
                SettingsError::invalid("lobby_limit", format!("`{limit}` is not a number"))
            })?;
            sources.lobby_limit = ValueSource::Env;
        }
        if let Some(seed) = var(SEED_VAR) {
            settings.seed = Some(seed.trim().parse().map_err(|_| {
                SettingsError::invalid("seed", format!("`{seed}` is not an unsigned integer"))
            })?);
            sources.seed = ValueSource::Env;
        }
        if let Some(advisor) = var(ADVISOR_VAR) {
            settings.advisor = advisor.trim().to_ascii_lowercase();
            sources.advisor = ValueSource::Env;
        }
        if let Some(format) = var(LOG_FORMAT_VAR) {
            settings.log_format = format
                .parse()
                .map_err(|message| SettingsError::invalid("log_format", message))?;
            sources.log_format = ValueSource::Env;
        }

        settings.validate()?;
        Ok(SettingsResolved { settings, sources })
    }

    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.host.is_empty() {
            return Err(SettingsError::invalid("host", "cannot be empty"));
        }
        if self.lobby_limit == 0 || self.lobby_limit > MAX_LOBBY_LIMIT {
            return Err(SettingsError::invalid(
                "lobby_limit",
                format!("must be between 1 and {MAX_LOBBY_LIMIT}"),
            ));
        }
        if !ADVISOR_NAMES.contains(&self.advisor.as_str()) {
            return Err(SettingsError::invalid(
                "advisor",
                format!("`{}` is not one of {}", self.advisor, ADVISOR_NAMES.join(", ")),
            ));
        }
        Ok(())
    }

    fn apply_file(&mut self, file: FileSettings, sources: &mut SettingsSources) {
        if let Some(host) = file.host {
            self.host = host;
            sources.host = ValueSource::File;
        }
        if let Some(port) = file.port {
            self.port = port;
            sources.port = ValueSource::File;
        }
        if let Some(limit) = file.lobby_limit {
            self.lobby_limit = limit;
            sources.lobby_limit = ValueSource::File;
        }
        if let Some(seed) = file.seed {
            self.seed = Some(seed);
            sources.seed = ValueSource::File;
        }
        if let Some(advisor) = file.advisor {
            self.advisor = advisor.to_ascii_lowercase();
            sources.advisor = ValueSource::File;
        }
        if let Some(format) = file.log_format {
            self.log_format = format;
            sources.log_format = ValueSource::File;
        }
    }
}

impl SettingsResolved {
    /// Command-line host override; wins over every other source.
    pub fn override_host(&mut self, host: impl Into<String>) {
        self.settings.host = host.into();
        self.sources.host = ValueSource::Cli;
    }

    /// Command-line port override; wins over every other source.
    pub fn override_port(&mut self, port: u16) {
        self.settings.port = port;
        self.sources.port = ValueSource::Cli;
    }
}

fn read_file(path: &Path) -> Result<FileSettings, SettingsError> {
    let text = fs::read_to_string(path)?;
    Ok(toml::from_str(&text)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_when_nothing_is_set() {
        let resolved = ServerSettings::load_from(env(&[])).expect("load");
        assert_eq!(resolved.settings, ServerSettings::default());
        assert_eq!(resolved.sources, SettingsSources::default());
    }

    #[test]
    fn file_then_env_precedence() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        writeln!(
            file,
            "port = 9000\nlobby_limit = 5\nadvisor = \"minimax\"\nlog_format = \"json\""
        )
        .expect("write");
        let path = file.path().to_string_lossy().to_string();

        let resolved = ServerSettings::load_from(env(&[
            (CONFIG_PATH_VAR, path.as_str()),
            (PORT_VAR, "9100"),
            (SEED_VAR, "42"),
        ]))
        .expect("load");

        assert_eq!(resolved.settings.port, 9100);
        assert_eq!(resolved.sources.port, ValueSource::Env);
        assert_eq!(resolved.settings.lobby_limit, 5);
        assert_eq!(resolved.sources.lobby_limit, ValueSource::File);
        assert_eq!(resolved.settings.advisor, "minimax");
        assert_eq!(resolved.settings.log_format, LogFormat::Json);
        assert_eq!(resolved.settings.seed, Some(42));
        assert_eq!(resolved.sources.host, ValueSource::Default);
    }

    #[test]
    fn cli_overrides_win() {
        let mut resolved =
            ServerSettings::load_from(env(&[(HOST_VAR, "0.0.0.0")])).expect("load");
        resolved.override_host("localhost");
        resolved.override_port(0);
        assert_eq!(resolved.settings.host, "localhost");
        assert_eq!(resolved.sources.host, ValueSource::Cli);
        assert_eq!(resolved.settings.port, 0);
    }

    #[test]
    fn invalid_values_are_rejected() {
        assert!(matches!(
            ServerSettings::load_from(env(&[(PORT_VAR, "eighty")])),
            Err(SettingsError::InvalidValue { key: "port", .. })
        ));
        assert!(matches!(
            ServerSettings::load_from(env(&[(LOBBY_LIMIT_VAR, "11")])),
            Err(SettingsError::InvalidValue {
                key: "lobby_limit",
                ..
            })
        ));
        assert!(matches!(
            ServerSettings::load_from(env(&[(ADVISOR_VAR, "oracle")])),
            Err(SettingsError::InvalidValue { key: "advisor", .. })
        ));
        assert!(matches!(
            ServerSettings::load_from(env(&[(LOG_FORMAT_VAR, "xml")])),
            Err(SettingsError::InvalidValue {
                key: "log_format",
                ..
            })
        ));
    }

    #[test]
    fn unknown_file_keys_fail_to_parse() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        writeln!(file, "static_dir = \"/srv\"").expect("write");
        let path = file.path().to_string_lossy().to_string();

        let err = ServerSettings::load_from(env(&[(CONFIG_PATH_VAR, path.as_str())]))
            .expect_err("unknown key");
        assert!(matches!(err, SettingsError::Parse(_)));
    }

    #[test]
    fn blank_variables_are_ignored() {
        let resolved = ServerSettings::load_from(env(&[(PORT_VAR, "  ")])).expect("load");
        assert_eq!(resolved.sources.port, ValueSource::Default);
    }
}

use noughts_ai::ADVISOR_NAMES;
use noughts_engine::board::Mark;
use serde::{Deserialize, Serialize};
use std::fs;

pub const CONFIG_VAR: &str = "NOUGHTS_CONFIG";
pub const START_VAR: &str = "NOUGHTS_START";
pub const ADVISOR_VAR: &str = "NOUGHTS_ADVISOR";
pub const SEED_VAR: &str = "NOUGHTS_SEED";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Config {
    pub starting_mark: Mark,
    pub advisor: String,
    pub seed: Option<u64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueSource {
    Default,
    File,
    Env,
}

#[derive(Debug, Clone, Copy)]
pub struct ConfigSources {
    pub starting_mark: ValueSource,
    pub advisor: ValueSource,
    pub seed: ValueSource,
}

impl Default for ConfigSources {
    fn default() -> Self {
        Self {
            starting_mark: ValueSource::Default,
            advisor: ValueSource::Default,
            seed: ValueSource::Default,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ConfigResolved {
    pub config: Config,
    pub sources: ConfigSources,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            starting_mark: Mark::X,
            advisor: "alphabeta".into(),
            seed: None,
        }
    }
}

#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
    Invalid(String),
}

impl From<std::io::Error> for ConfigError {
    fn from(e: std::io::Error) -> Self {
        ConfigError::Io(e)
    }
}
impl From<toml::de::Error> for ConfigError {
    fn from(e: toml::de::Error) -> Self {
        ConfigError::Parse(e)
    }
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "cannot read {CONFIG_VAR} file: {e}"),
            ConfigError::Parse(e) => write!(f, "cannot parse {CONFIG_VAR} file: {e}"),
            ConfigError::Invalid(msg) => f.write_str(msg),
        }
    }
}

/// Defaults, then the TOML file named by `NOUGHTS_CONFIG`, then `NOUGHTS_*` variables.
pub fn load_with_sources() -> Result<ConfigResolved, ConfigError> {
    load_from(|key| std::env::var(key).ok())
}

pub fn load_from<F>(lookup: F) -> Result<ConfigResolved, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let var = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

    let mut cfg = Config::default();
    let mut sources = ConfigSources::default();

    if let Some(path) = var(CONFIG_VAR) {
        let s = fs::read_to_string(path)?;
        let f: FileConfig = toml::from_str(&s)?;
        if let Some(v) = f.starting_mark {
            cfg.starting_mark = v;
            sources.starting_mark = ValueSource::File;
        }
        if let Some(v) = f.advisor {
            cfg.advisor = v.trim().to_ascii_lowercase();
            sources.advisor = ValueSource::File;
        }
        if let Some(v) = f.seed {
            cfg.seed = Some(v);
            sources.seed = ValueSource::File;
        }
    }

    if let Some(start) = var(START_VAR) {
        cfg.starting_mark = start
            .parse()
            .map_err(|_| ConfigError::Invalid(format!("Invalid starting mark `{start}`")))?;
        sources.starting_mark = ValueSource::Env;
    }
    if let Some(advisor) = var(ADVISOR_VAR) {
        cfg.advisor = advisor.trim().to_ascii_lowercase();
        sources.advisor = ValueSource::Env;
    }
    if let Some(seed) = var(SEED_VAR) {
        cfg.seed = Some(
            seed.trim()
                .parse()
                .map_err(|_| ConfigError::Invalid(format!("Invalid seed `{seed}`")))?,
        );
        sources.seed = ValueSource::Env;
    }

    validate(&cfg)?;
    Ok(ConfigResolved {
        config: cfg,
        sources,
    })
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct FileConfig {
    #[serde(default)]
    starting_mark: Option<Mark>,
    #[serde(default)]
    advisor: Option<String>,
    #[serde(default)]
    seed: Option<u64>,
}

fn validate(cfg: &Config) -> Result<(), ConfigError> {
    if !ADVISOR_NAMES.contains(&cfg.advisor.as_str()) {
        return Err(ConfigError::Invalid(format!(
            "Invalid configuration: advisor must be one of {}",
            ADVISOR_NAMES.join(", ")
        )));
    }
    Ok(())
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
    fn defaults_without_sources() {
        let resolved = load_from(env(&[])).expect("load");
        assert_eq!(resolved.config, Config::default());
        assert_eq!(resolved.sources.advisor, ValueSource::Default);
    }

    #[test]
    fn env_overrides_file() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        writeln!(file, "starting_mark = \"o\"\nadvisor = \"minimax\"\nseed = 5").expect("write");
        let path = file.path().to_string_lossy().to_string();

        let resolved = load_from(env(&[
            (CONFIG_VAR, path.as_str()),
            (SEED_VAR, "9"),
            (ADVISOR_VAR, "AlphaBeta"),
        ]))
        .expect("load");

        assert_eq!(resolved.config.starting_mark, Mark::O);
        assert_eq!(resolved.sources.starting_mark, ValueSource::File);
        assert_eq!(resolved.config.seed, Some(9));
        assert_eq!(resolved.sources.seed, ValueSource::Env);
        assert_eq!(resolved.config.advisor, "alphabeta");
        assert_eq!(resolved.sources.advisor, ValueSource::Env);
    }

    #[test]
    fn rejects_bad_values() {
        assert!(matches!(
            load_from(env(&[(START_VAR, "z")])),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            load_from(env(&[(SEED_VAR, "-1")])),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            load_from(env(&[(ADVISOR_VAR, "random")])),
            Err(ConfigError::Invalid(_))
        ));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = load_from(env(&[(CONFIG_VAR, "/definitely/not/here.toml")]))
            .expect_err("missing file");
        assert!(matches!(err, ConfigError::Io(_)));
    }
}

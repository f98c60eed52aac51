//! INI file configuration adapter.
//!
//! Values can be overridden from the environment with
//! `RISKAWARE__<SECTION>__<KEY>` (case-insensitive), so paths and rates never
//! have to be baked into a checked-in file.

use crate::domain::error::RiskawareError;
use crate::ports::config_port::ConfigPort;
use configparser::ini::Ini;
use std::collections::HashMap;
use std::path::Path;

const ENV_PREFIX: &str = "RISKAWARE__";

pub struct FileConfigAdapter {
    config: Ini,
    overrides: HashMap<(String, String), String>,
}

impl FileConfigAdapter {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, RiskawareError> {
        let path = path.as_ref();
        let mut config = Ini::new();
        config
            .load(path)
            .map_err(|reason| RiskawareError::ConfigParse {
                file: path.display().to_string(),
                reason,
            })?;
        Ok(Self {
            config,
            overrides: HashMap::new(),
        })
    }

    pub fn from_string(content: &str) -> Result<Self, RiskawareError> {
        let mut config = Ini::new();
        config
            .read(content.to_string())
            .map_err(|reason| RiskawareError::ConfigParse {
                file: "<string>".to_string(),
                reason,
            })?;
        Ok(Self {
            config,
            overrides: HashMap::new(),
        })
    }

    /// Layer `RISKAWARE__SECTION__KEY` variables from the process environment.
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides(std::env::vars())
    }

    /// Layer overrides from `(name, value)` pairs using the environment naming.
    pub fn with_overrides<I>(mut self, vars: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        for (name, value) in vars {
            let Some(rest) = name.strip_prefix(ENV_PREFIX) else {
                continue;
            };
            let Some((section, key)) = rest.split_once("__") else {
                continue;
            };
            tracing::debug!(section, key, "config value overridden from environment");
            self.overrides
                .insert((section.to_lowercase(), key.to_lowercase()), value);
        }
        self
    }

    fn lookup(&self, section: &str, key: &str) -> Option<String> {
        self.overrides
            .get(&(section.to_lowercase(), key.to_lowercase()))
            .cloned()
            .or_else(|| self.config.get(section, key))
    }
}

impl ConfigPort for FileConfigAdapter {
    fn get_string(&self, section: &str, key: &str) -> Option<String> {
        self.lookup(section, key)
    }

    fn get_int(&self, section: &str, key: &str, default: i64) -> i64 {
        self.lookup(section, key)
            .and_then(|v| v.trim().parse().ok())
            .unwrap_or(default)
    }

    fn get_double(&self, section: &str, key: &str, default: f64) -> f64 {
        self.lookup(section, key)
            .and_then(|v| v.trim().parse().ok())
            .unwrap_or(default)
    }
}

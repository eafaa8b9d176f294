//! TOML-based configuration for pivotsql.
//!
//! Supports a config file (pivotsql.toml) with environment variable expansion.
//!
//! Example configuration:
//! ```toml
//! [database]
//! path = "${DATA_DIR}/warehouse.db"
//!
//! [defaults]
//! aggregate = "SUM"
//! temporary = true
//! dialect = "sqlite"
//!
//! [pivots.scores]
//! table = "exam_scores"
//! row_by = "uid"
//! column_by = "subject"
//! values = ["score"]
//! temporary = false
//! prefix = "main"
//!
//! [pivots.scores.filter]
//! exclude = ["Other"]
//! ```

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use crate::pivot::{ConfigurationError, LabelFilter, PivotOptions, PivotRequest, ValueNames};
use crate::sql::Dialect;

/// Error type for settings.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("Config file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),

    #[error("Unterminated variable reference in: {0}")]
    UnterminatedVar(String),

    #[error("Pivot job not found: {0}")]
    JobNotFound(String),

    #[error("Invalid pivot job {job}: {source}")]
    InvalidJob {
        job: String,
        #[source]
        source: ConfigurationError,
    },
}

/// Root configuration structure.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Settings {
    /// Database the CLI connects to.
    pub database: DatabaseSettings,

    /// Defaults applied to every pivot.
    pub defaults: PivotOptions,

    /// Named pivot jobs.
    pub pivots: BTreeMap<String, PivotJob>,
}

/// Database location.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct DatabaseSettings {
    /// SQLite database file (supports ${ENV_VAR} expansion).
    pub path: Option<String>,
}

impl DatabaseSettings {
    /// Get the database path with environment variables expanded.
    pub fn resolved_path(&self) -> Result<Option<PathBuf>, SettingsError> {
        self.path
            .as_deref()
            .map(|p| expand_env_vars(p).map(PathBuf::from))
            .transpose()
    }
}

/// One named pivot. Unset options fall back to `[defaults]`.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PivotJob {
    pub table: String,
    pub row_by: String,
    pub column_by: String,

    /// A single name or a list.
    pub values: ValueNames,

    #[serde(default)]
    pub aggregate: Option<String>,

    #[serde(default)]
    pub temporary: Option<bool>,

    #[serde(default)]
    pub prefix: Option<String>,

    #[serde(default)]
    pub dialect: Option<Dialect>,

    #[serde(default)]
    pub filter: FilterSettings,
}

impl PivotJob {
    /// Options for this job, layered over `defaults`.
    pub fn options(&self, defaults: &PivotOptions) -> PivotOptions {
        PivotOptions {
            aggregate: self
                .aggregate
                .clone()
                .unwrap_or_else(|| defaults.aggregate.clone()),
            temporary: self.temporary.unwrap_or(defaults.temporary),
            prefix: self.prefix.clone().or_else(|| defaults.prefix.clone()),
            dialect: self.dialect.unwrap_or(defaults.dialect),
        }
    }

    /// Build the request this job describes.
    pub fn to_request(&self, defaults: &PivotOptions) -> Result<PivotRequest, ConfigurationError> {
        let options = self.options(defaults);
        let request = PivotRequest::with_options(
            self.table.clone(),
            self.row_by.clone(),
            self.column_by.clone(),
            &options,
        )
        .values(self.values.clone());

        Ok(match self.filter.compile()? {
            Some(filter) => request.filter_with(filter),
            None => request,
        })
    }
}

/// Declarative category filter.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct FilterSettings {
    /// Keep only these labels.
    pub include: Option<Vec<String>>,

    /// Drop these labels.
    pub exclude: Vec<String>,

    /// Keep only labels matching this regex.
    pub pattern: Option<String>,
}

impl FilterSettings {
    pub fn is_empty(&self) -> bool {
        self.include.is_none() && self.exclude.is_empty() && self.pattern.is_none()
    }

    /// Compile into a filter. `None` when nothing is configured.
    pub fn compile(&self) -> Result<Option<LabelFilter>, ConfigurationError> {
        if self.is_empty() {
            return Ok(None);
        }
        let mut filter = LabelFilter::new().exclude(self.exclude.iter().cloned());
        if let Some(include) = &self.include {
            filter = filter.include(include.iter().cloned());
        }
        if let Some(pattern) = &self.pattern {
            filter = filter.pattern(pattern)?;
        }
        Ok(Some(filter))
    }
}

impl Settings {
    /// Load settings from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(SettingsError::FileNotFound(path.to_path_buf()));
        }

        let content = fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Parse settings from TOML text.
    pub fn from_toml(content: &str) -> Result<Self, SettingsError> {
        Ok(toml::from_str(content)?)
    }

    /// Load settings from the default config file locations.
    ///
    /// Searches in order:
    /// 1. Environment variable `PIVOTSQL_CONFIG`
    /// 2. `./pivotsql.toml`
    /// 3. `~/.config/pivotsql/config.toml`
    pub fn load() -> Result<Self, SettingsError> {
        if let Ok(path) = env::var("PIVOTSQL_CONFIG") {
            return Self::from_file(&path);
        }

        let local_config = PathBuf::from("pivotsql.toml");
        if local_config.exists() {
            return Self::from_file(&local_config);
        }

        if let Some(config_dir) = dirs::config_dir() {
            let user_config = config_dir.join("pivotsql").join("config.toml");
            if user_config.exists() {
                return Self::from_file(&user_config);
            }
        }

        Ok(Settings::default())
    }

    /// Get a pivot job by name.
    pub fn get_job(&self, name: &str) -> Result<&PivotJob, SettingsError> {
        self.pivots
            .get(name)
            .ok_or_else(|| SettingsError::JobNotFound(name.to_string()))
    }

    /// Options for the named job, layered over `[defaults]`.
    pub fn options_for(&self, name: &str) -> Result<PivotOptions, SettingsError> {
        Ok(self.get_job(name)?.options(&self.defaults))
    }

    /// Build the request for the named job.
    pub fn request_for(&self, name: &str) -> Result<PivotRequest, SettingsError> {
        self.get_job(name)?
            .to_request(&self.defaults)
            .map_err(|source| SettingsError::InvalidJob {
                job: name.to_string(),
                source,
            })
    }
}

/// Expand environment variables in a string.
///
/// Supports `${VAR}` and `$VAR` syntax.
pub fn expand_env_vars(s: &str) -> Result<String, SettingsError> {
    let mut result = String::with_capacity(s.len());
    let mut chars = s.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '$' {
            result.push(c);
            continue;
        }

        if chars.next_if_eq(&'{').is_some() {
            let mut var_name = String::new();
            let mut closed = false;
            for ch in chars.by_ref() {
                if ch == '}' {
                    closed = true;
                    break;
                }
                var_name.push(ch);
            }
            if !closed {
                return Err(SettingsError::UnterminatedVar(s.to_string()));
            }
            let value =
                env::var(&var_name).map_err(|_| SettingsError::MissingEnvVar(var_name.clone()))?;
            result.push_str(&value);
        } else {
            // $VAR ends at the first non-alphanumeric/underscore
            let mut var_name = String::new();
            while let Some(ch) = chars.next_if(|ch| ch.is_alphanumeric() || *ch == '_') {
                var_name.push(ch);
            }
            if var_name.is_empty() {
                result.push('$');
            } else {
                let value = env::var(&var_name)
                    .map_err(|_| SettingsError::MissingEnvVar(var_name.clone()))?;
                result.push_str(&value);
            }
        }
    }

    Ok(result)
}

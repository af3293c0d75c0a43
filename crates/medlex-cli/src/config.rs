//! Run configuration: file defaults, flag overrides, and the credential.

use crate::cli::{Cli, DEBUG_TOKEN_LIMIT};
use crate::error::{CliError, Result};
use medlex_generator::{GeneratorConfig, RunOptions};
use std::fs;
use std::path::{Path, PathBuf};

/// Everything a run needs, resolved once at startup and read-only afterwards.
#[derive(Debug, Clone)]
pub struct ResolvedRun {
    /// Generator settings after overrides
    pub generator: GeneratorConfig,
    /// Lesson, version, category and limit
    pub options: RunOptions,
    /// API credential
    pub api_key: String,
}

impl ResolvedRun {
    /// Resolve from parsed arguments.
    ///
    /// The generator config comes from `--config`, else
    /// `~/.medlex/config.toml` when present, else defaults; flags override it.
    pub fn from_cli(cli: &Cli) -> Result<Self> {
        let mut generator = match &cli.config {
            Some(path) => load_config(path)?,
            None => match default_config_path().filter(|p| p.exists()) {
                Some(path) => load_config(&path)?,
                None => GeneratorConfig::default(),
            },
        };

        if let Some(workers) = cli.workers {
            generator.concurrency = workers;
        }
        if let Some(attempts) = cli.max_attempts {
            generator.max_attempts = attempts;
        }
        if let Some(model) = &cli.model {
            generator.model = model.clone();
        }
        if let Some(api_base) = &cli.api_base {
            generator.api_base = api_base.clone();
        }
        if let Some(variant) = cli.variant {
            generator.schema_variant = variant.into();
        }
        generator.validate().map_err(CliError::Config)?;

        let api_key = cli
            .api_key
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .ok_or(CliError::MissingCredential)?
            .to_string();

        let options = RunOptions {
            lesson: cli.lesson,
            version: cli.schema_version.clone(),
            category: cli.category.clone(),
            limit: cli.debug.then_some(DEBUG_TOKEN_LIMIT),
        };

        Ok(Self {
            generator,
            options,
            api_key,
        })
    }
}

/// Default location of the generator config file.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".medlex").join("config.toml"))
}

/// Load `KEY=value` pairs from a `.env` file into the process environment.
///
/// With no path, searches the current directory and its parents. Variables
/// already set are kept; a missing file is not an error. Returns the file
/// that was loaded.
pub fn load_env_file(path: Option<&Path>) -> Option<PathBuf> {
    match path {
        Some(path) => dotenvy::from_path(path).ok().map(|()| path.to_path_buf()),
        None => dotenvy::dotenv().ok(),
    }
}

/// Load a generator config from a TOML file.
pub fn load_config(path: &Path) -> Result<GeneratorConfig> {
    let contents = fs::read_to_string(path)?;
    Ok(toml::from_str(&contents)?)
}

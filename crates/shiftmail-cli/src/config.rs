//! Bootstrap file handling.
//!
//! Reads from `~/.config/shiftmail/shiftmail.toml`

use anyhow::{Context, Result};
use shiftmail_core::bootstrap::{
    layer_arguments_key, layer_class_key, APPLICATION_ABOUT, APPLICATION_COPYRIGHT,
    APPLICATION_NAME, APPLICATION_VERSION, HELP_ARGUMENTS, HELP_CLASS,
};
use shiftmail_core::{Aggregate, Properties};
use std::path::{Path, PathBuf};

/// Loaded bootstrap properties and where they came from.
#[derive(Debug, Clone)]
pub struct Config {
    pub path: PathBuf,
    pub properties: Properties,
}

impl Config {
    /// Load the bootstrap file.
    ///
    /// If `custom_path` is provided, load from that path.
    /// Otherwise, load from the default XDG config location.
    /// Creates a default file if it doesn't exist (only for default path).
    pub fn load(custom_path: Option<PathBuf>) -> Result<Self> {
        let is_custom = custom_path.is_some();
        let config_path = match custom_path {
            Some(path) => path,
            None => Self::config_path()?,
        };

        if !config_path.exists() {
            if is_custom {
                anyhow::bail!("Config file not found: {}", config_path.display());
            }
            let properties = Self::default_properties(&Self::data_dir()?);
            Self::save(&config_path, &properties)?;
            tracing::info!("Created default config at {}", config_path.display());
            return Ok(Self {
                path: config_path,
                properties,
            });
        }

        let properties = Properties::load(&config_path)
            .with_context(|| format!("Failed to load config file: {}", config_path.display()))?;

        tracing::info!("Loaded config from {}", config_path.display());
        Ok(Self {
            path: config_path,
            properties,
        })
    }

    /// Directory that relative storage paths are resolved against.
    pub fn base_dir(&self) -> Option<&Path> {
        self.path.parent()
    }

    /// Binary storage for every aggregate under `data_dir`, no help file.
    pub fn default_properties(data_dir: &Path) -> Properties {
        let mut properties = Properties::new()
            .with(APPLICATION_NAME, "Shiftmail")
            .with(APPLICATION_VERSION, env!("CARGO_PKG_VERSION"))
            .with(APPLICATION_COPYRIGHT, "")
            .with(
                APPLICATION_ABOUT,
                "Builds volunteer shift assignments and the emails that announce them.",
            )
            .with(HELP_CLASS, "null")
            .with(HELP_ARGUMENTS, "");

        for aggregate in Aggregate::ALL {
            let file = data_dir.join(format!("{}.bin", aggregate.key()));
            let file = file.to_string_lossy();
            properties.insert(layer_class_key(aggregate), "binary");
            properties.insert(
                layer_arguments_key(aggregate),
                shiftmail_core::csv::format_record(&[&*file]),
            );
        }
        properties
    }

    fn save(path: &Path, properties: &Properties) -> Result<()> {
        // Ensure config directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let contents = properties
            .to_toml_string()
            .context("Failed to serialize config")?;

        std::fs::write(path, contents)
            .with_context(|| format!("Failed to write config file: {}", path.display()))
    }

    /// Get the path to the config file.
    fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir().context("Could not determine config directory")?;

        Ok(config_dir.join("shiftmail").join("shiftmail.toml"))
    }

    fn data_dir() -> Result<PathBuf> {
        let data_dir = dirs::data_dir().context("Could not determine data directory")?;

        Ok(data_dir.join("shiftmail"))
    }
}

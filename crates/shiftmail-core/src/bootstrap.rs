//! Building an [`Application`] from a flat property bag.
//!
//! The bag names a storage backend per aggregate plus its arguments:
//!
//! ```toml
//! [application]
//! name = "Shiftmail"
//! version = "0.1.0"
//! copyright = "(c) Event Crew"
//! aboutMessage = "Builds shift emails"
//!
//! [shifts.iolayer]
//! class = "binary"
//! arguments = "data/shifts.bin"
//!
//! [helpDisplay]
//! class = "null"
//! arguments = ""
//! ```
//!
//! Nested tables flatten to dotted keys (`shifts.iolayer.class`). Arguments
//! are a single CSV record. Backend identifiers resolve through a fixed
//! registry; unknown identifiers are configuration errors.

use crate::application::{Application, ApplicationInfo};
use crate::csv;
use crate::error::{Error, ModelError, Result};
use crate::help::{HelpDisplay, NullHelpDisplay, TextHelpDisplay};
use crate::io_layer::{BinaryFileLayer, IoLayer, IoLayers, JsonFileLayer, MemoryLayer};
use crate::observer::Aggregate;
use crate::properties::ReadWritable;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::str::FromStr;

pub const APPLICATION_NAME: &str = "application.name";
pub const APPLICATION_VERSION: &str = "application.version";
pub const APPLICATION_COPYRIGHT: &str = "application.copyright";
pub const APPLICATION_ABOUT: &str = "application.aboutMessage";
pub const HELP_CLASS: &str = "helpDisplay.class";
pub const HELP_ARGUMENTS: &str = "helpDisplay.arguments";

/// `<aggregate>.iolayer.class`
pub fn layer_class_key(aggregate: Aggregate) -> String {
    format!("{}.iolayer.class", aggregate.key())
}

/// `<aggregate>.iolayer.arguments`
pub fn layer_arguments_key(aggregate: Aggregate) -> String {
    format!("{}.iolayer.arguments", aggregate.key())
}

/// Flat string key/value configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Properties(BTreeMap<String, String>);

impl Properties {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.insert(key.into(), value.into());
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn remove(&mut self, key: &str) -> Option<String> {
        self.0.remove(key)
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    /// Value of a required key.
    pub fn require(&self, key: &str) -> std::result::Result<&str, ModelError> {
        self.get(key)
            .ok_or_else(|| ModelError::IllegalArgument(format!("missing required property: {key}")))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Parse a TOML document, flattening nested tables into dotted keys.
    ///
    /// Arrays become CSV records; other scalars take their TOML text form.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let table: toml::Table = text
            .parse()
            .map_err(|e: toml::de::Error| Error::Config(e.to_string()))?;
        let mut properties = Self::new();
        flatten("", &table, &mut properties);
        Ok(properties)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| {
            Error::Config(format!("failed to read {}: {}", path.display(), e))
        })?;
        Self::from_toml_str(&text)
    }

    /// Render as a TOML document with dotted keys nested into tables.
    pub fn to_toml_string(&self) -> Result<String> {
        let mut root = toml::Table::new();
        for (key, value) in &self.0 {
            let mut parts: Vec<&str> = key.split('.').collect();
            let leaf = parts.pop().unwrap_or_default();
            let mut table = &mut root;
            for part in parts {
                let entry = table
                    .entry(part.to_string())
                    .or_insert(toml::Value::Table(toml::Table::new()));
                table = match entry {
                    toml::Value::Table(t) => t,
                    _ => {
                        return Err(Error::Config(format!(
                            "key '{key}' conflicts with a value at '{part}'"
                        )))
                    }
                };
            }
            if table.contains_key(leaf) {
                return Err(Error::Config(format!("key '{key}' conflicts with a table")));
            }
            table.insert(leaf.to_string(), toml::Value::String(value.clone()));
        }
        toml::to_string_pretty(&root).map_err(|e| Error::Config(e.to_string()))
    }
}

fn flatten(prefix: &str, table: &toml::Table, out: &mut Properties) {
    for (key, value) in table {
        let full = if prefix.is_empty() {
            key.clone()
        } else {
            format!("{prefix}.{key}")
        };
        match value {
            toml::Value::Table(inner) => flatten(&full, inner, out),
            toml::Value::String(s) => out.insert(full, s.clone()),
            toml::Value::Array(items) => {
                let fields: Vec<String> = items.iter().map(scalar_text).collect();
                out.insert(full, csv::format_record(&fields));
            }
            other => out.insert(full, scalar_text(other)),
        }
    }
}

fn scalar_text(value: &toml::Value) -> String {
    match value {
        toml::Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Storage backends known to the bootstrap.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayerKind {
    /// No arguments.
    Memory,
    /// One argument: file path.
    Binary,
    /// One argument: file path.
    Json,
}

impl LayerKind {
    pub fn id(&self) -> &'static str {
        match self {
            LayerKind::Memory => "memory",
            LayerKind::Binary => "binary",
            LayerKind::Json => "json",
        }
    }

    /// Instantiate a layer for `T`, resolving relative paths against `base_dir`.
    pub fn build<T: ReadWritable + 'static>(
        self,
        args: &[String],
        base_dir: Option<&Path>,
    ) -> Result<Box<dyn IoLayer<T>>> {
        let layer: Box<dyn IoLayer<T>> = match self {
            LayerKind::Memory => {
                expect_args(self.id(), args, 0)?;
                Box::new(MemoryLayer::<T>::new())
            }
            LayerKind::Binary => {
                expect_args(self.id(), args, 1)?;
                Box::new(BinaryFileLayer::<T>::new(resolve(&args[0], base_dir)))
            }
            LayerKind::Json => {
                expect_args(self.id(), args, 1)?;
                Box::new(JsonFileLayer::<T>::new(resolve(&args[0], base_dir)))
            }
        };
        Ok(layer)
    }
}

impl FromStr for LayerKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            "memory" => Ok(LayerKind::Memory),
            "binary" => Ok(LayerKind::Binary),
            "json" => Ok(LayerKind::Json),
            other => Err(Error::Config(format!(
                "unknown I/O layer class '{other}' (expected memory, binary or json)"
            ))),
        }
    }
}

/// Help displays known to the bootstrap.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HelpKind {
    /// No arguments.
    Null,
    /// One argument: help text file.
    Text,
}

impl HelpKind {
    pub fn id(&self) -> &'static str {
        match self {
            HelpKind::Null => "null",
            HelpKind::Text => "text",
        }
    }

    pub fn build(self, args: &[String], base_dir: Option<&Path>) -> Result<Box<dyn HelpDisplay>> {
        match self {
            HelpKind::Null => {
                expect_args(self.id(), args, 0)?;
                Ok(Box::new(NullHelpDisplay))
            }
            HelpKind::Text => {
                expect_args(self.id(), args, 1)?;
                Ok(Box::new(TextHelpDisplay::new(resolve(&args[0], base_dir))))
            }
        }
    }
}

impl FromStr for HelpKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            "null" => Ok(HelpKind::Null),
            "text" => Ok(HelpKind::Text),
            other => Err(Error::Config(format!(
                "unknown help display class '{other}' (expected null or text)"
            ))),
        }
    }
}

fn expect_args(id: &str, args: &[String], expected: usize) -> Result<()> {
    if args.len() == expected {
        Ok(())
    } else {
        Err(Error::Config(format!(
            "'{id}' takes {expected} argument(s), got {}",
            args.len()
        )))
    }
}

fn resolve(path: &str, base_dir: Option<&Path>) -> PathBuf {
    let path = PathBuf::from(path);
    match base_dir {
        Some(base) if path.is_relative() => base.join(path),
        _ => path,
    }
}

fn parse_arguments(properties: &Properties, key: &str) -> Result<Vec<String>> {
    Ok(csv::parse_record(properties.require(key)?)?)
}

fn build_layer<T: ReadWritable + 'static>(
    properties: &Properties,
    aggregate: Aggregate,
    base_dir: Option<&Path>,
) -> Result<Box<dyn IoLayer<T>>> {
    let kind: LayerKind = properties.require(&layer_class_key(aggregate))?.parse()?;
    let args = parse_arguments(properties, &layer_arguments_key(aggregate))?;
    let layer = kind.build::<T>(&args, base_dir)?;
    tracing::info!("Using {} for {}", layer.describe(), aggregate);
    Ok(layer)
}

impl Application {
    /// Build an application from a bootstrap property bag.
    ///
    /// Relative file arguments are resolved against `base_dir` when given.
    pub fn from_properties(properties: Option<&Properties>, base_dir: Option<&Path>) -> Result<Self> {
        let properties = properties.ok_or(ModelError::NullArgument("properties"))?;

        let info = ApplicationInfo {
            name: properties.require(APPLICATION_NAME)?.to_string(),
            version: properties.require(APPLICATION_VERSION)?.to_string(),
            copyright: properties.require(APPLICATION_COPYRIGHT)?.to_string(),
            about_message: properties.require(APPLICATION_ABOUT)?.to_string(),
        };

        let layers = IoLayers {
            shifts: build_layer(properties, Aggregate::Shifts, base_dir)?,
            volunteers: build_layer(properties, Aggregate::Volunteers, base_dir)?,
            roles: build_layer(properties, Aggregate::Roles, base_dir)?,
            email_template: build_layer(properties, Aggregate::EmailTemplate, base_dir)?,
            email_server_properties: build_layer(
                properties,
                Aggregate::EmailServerProperties,
                base_dir,
            )?,
            event_properties: build_layer(properties, Aggregate::EventProperties, base_dir)?,
        };

        let help_kind: HelpKind = properties.require(HELP_CLASS)?.parse()?;
        let help = help_kind.build(&parse_arguments(properties, HELP_ARGUMENTS)?, base_dir)?;

        Application::new(info, layers, help)
    }
}

//! File-backed layers.
//!
//! The file holds one encoded list of property maps. Elements are rebuilt
//! through each entity's tolerant decoder, so a blob written by an older
//! schema still loads with defaults for new fields.

use super::IoLayer;
use crate::error::StorageError;
use crate::properties::{PropertyValue, ReadWritable};
use std::fs;
use std::io::ErrorKind;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};

/// Encoding of the stored list.
pub trait BlobFormat {
    const NAME: &'static str;

    fn encode(items: &[PropertyValue]) -> Result<Vec<u8>, StorageError>;
    fn decode(bytes: &[u8]) -> Result<Vec<PropertyValue>, StorageError>;
}

/// Compact binary encoding.
#[derive(Debug, Clone, Copy)]
pub struct Postcard;

impl BlobFormat for Postcard {
    const NAME: &'static str = "binary";

    fn encode(items: &[PropertyValue]) -> Result<Vec<u8>, StorageError> {
        Ok(postcard::to_stdvec(items)?)
    }

    fn decode(bytes: &[u8]) -> Result<Vec<PropertyValue>, StorageError> {
        Ok(postcard::from_bytes(bytes)?)
    }
}

/// Human-readable encoding.
#[derive(Debug, Clone, Copy)]
pub struct Json;

impl BlobFormat for Json {
    const NAME: &'static str = "json";

    fn encode(items: &[PropertyValue]) -> Result<Vec<u8>, StorageError> {
        Ok(serde_json::to_vec_pretty(items)?)
    }

    fn decode(bytes: &[u8]) -> Result<Vec<PropertyValue>, StorageError> {
        Ok(serde_json::from_slice(bytes)?)
    }
}

pub type BinaryFileLayer<T> = FileLayer<T, Postcard>;
pub type JsonFileLayer<T> = FileLayer<T, Json>;

/// Stores the list of `T` in a single file encoded with `F`.
#[derive(Debug)]
pub struct FileLayer<T, F> {
    path: PathBuf,
    _marker: PhantomData<fn() -> (T, F)>,
}

impl<T, F> FileLayer<T, F> {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            _marker: PhantomData,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self.path.file_name().unwrap_or_default().to_os_string();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl<T: ReadWritable, F: BlobFormat> IoLayer<T> for FileLayer<T, F> {
    fn get_all(&mut self) -> Result<Option<Vec<T>>, StorageError> {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::debug!("No data yet at {}", self.path.display());
                return Ok(None);
            }
            Err(e) => return Err(StorageError::io(&self.path, e)),
        };

        if bytes.is_empty() {
            return Ok(None);
        }

        let values = match F::decode(&bytes) {
            Ok(values) => values,
            Err(e) => {
                tracing::warn!(
                    "Ignoring unreadable {} data in {}: {}",
                    T::TYPE_NAME,
                    self.path.display(),
                    e
                );
                return Ok(None);
            }
        };

        let items: Vec<T> = values
            .iter()
            .enumerate()
            .filter_map(|(index, value)| match T::from_value(value) {
                Ok(item) => Some(item),
                Err(e) => {
                    tracing::warn!(
                        "Skipping {} #{} in {}: {}",
                        T::TYPE_NAME,
                        index,
                        self.path.display(),
                        e
                    );
                    None
                }
            })
            .collect();

        tracing::info!(
            "Loaded {} {} item(s) from {}",
            items.len(),
            T::TYPE_NAME,
            self.path.display()
        );
        Ok(Some(items))
    }

    fn set_all(&mut self, items: &[T]) -> Result<(), StorageError> {
        let values: Vec<PropertyValue> = items
            .iter()
            .map(|item| PropertyValue::Map(item.read_writable_properties()))
            .collect();
        let bytes = F::encode(&values)?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| StorageError::io(parent, e))?;
        }

        let temp = self.temp_path();
        fs::write(&temp, bytes).map_err(|e| StorageError::io(&temp, e))?;
        fs::rename(&temp, &self.path).map_err(|e| StorageError::io(&self.path, e))?;

        tracing::info!(
            "Saved {} {} item(s) to {}",
            items.len(),
            T::TYPE_NAME,
            self.path.display()
        );
        Ok(())
    }

    fn describe(&self) -> String {
        format!("{}<{}>:{}", F::NAME, T::TYPE_NAME, self.path.display())
    }
}

use super::IoLayer;
use crate::error::StorageError;
use crate::properties::ReadWritable;

/// Keeps the list in memory for the life of the process.
#[derive(Debug, Clone, Default)]
pub struct MemoryLayer<T> {
    items: Option<Vec<T>>,
}

impl<T> MemoryLayer<T> {
    /// A layer with nothing stored yet.
    pub fn new() -> Self {
        Self { items: None }
    }

    /// A layer that already holds `items`.
    pub fn with_items(items: Vec<T>) -> Self {
        Self { items: Some(items) }
    }
}

impl<T: ReadWritable> IoLayer<T> for MemoryLayer<T> {
    fn get_all(&mut self) -> Result<Option<Vec<T>>, StorageError> {
        Ok(self.items.clone())
    }

    fn set_all(&mut self, items: &[T]) -> Result<(), StorageError> {
        self.items = Some(items.to_vec());
        Ok(())
    }

    fn describe(&self) -> String {
        format!("memory<{}>", T::TYPE_NAME)
    }
}

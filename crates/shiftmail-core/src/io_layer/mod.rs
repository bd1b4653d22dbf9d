//! Storage backends for entity lists.
//!
//! An [`IoLayer`] stores the whole list of one entity type. Reads return
//! `Ok(None)` when there is no usable data yet; `Err` is reserved for real
//! I/O failures.

mod file;
mod memory;

pub use file::{BinaryFileLayer, BlobFormat, FileLayer, JsonFileLayer, Json, Postcard};
pub use memory::MemoryLayer;

use crate::error::StorageError;
use crate::models::{EmailServerProperties, EmailTemplate, EventProperty, Role, Shift, Volunteer};
use crate::properties::ReadWritable;

/// Durable storage for a list of `T`.
pub trait IoLayer<T: ReadWritable> {
    /// Currently stored list, or `None` if nothing usable has been stored.
    fn get_all(&mut self) -> Result<Option<Vec<T>>, StorageError>;

    /// Replace the stored list.
    fn set_all(&mut self, items: &[T]) -> Result<(), StorageError>;

    /// Short description for logs.
    fn describe(&self) -> String;
}

/// One layer per aggregate owned by the application.
pub struct IoLayers {
    pub shifts: Box<dyn IoLayer<Shift>>,
    pub volunteers: Box<dyn IoLayer<Volunteer>>,
    pub roles: Box<dyn IoLayer<Role>>,
    pub email_template: Box<dyn IoLayer<EmailTemplate>>,
    pub email_server_properties: Box<dyn IoLayer<EmailServerProperties>>,
    pub event_properties: Box<dyn IoLayer<EventProperty>>,
}

impl IoLayers {
    /// Empty in-memory layers for every aggregate.
    pub fn in_memory() -> Self {
        Self {
            shifts: Box::new(MemoryLayer::<Shift>::new()),
            volunteers: Box::new(MemoryLayer::<Volunteer>::new()),
            roles: Box::new(MemoryLayer::<Role>::new()),
            email_template: Box::new(MemoryLayer::<EmailTemplate>::new()),
            email_server_properties: Box::new(MemoryLayer::<EmailServerProperties>::new()),
            event_properties: Box::new(MemoryLayer::<EventProperty>::new()),
        }
    }
}

//! Core model and storage for shiftmail.
//!
//! This crate provides the volunteer/shift/email-template entities, their
//! property-map serialization, pluggable storage layers and the
//! [`Application`] façade that front ends drive.

pub mod application;
pub mod bootstrap;
pub mod csv;
pub mod email;
pub mod error;
pub mod help;
pub mod io_layer;
pub mod models;
pub mod observer;
pub mod properties;

pub use application::{Application, ApplicationInfo};
pub use bootstrap::{HelpKind, LayerKind, Properties};
pub use email::{compose, ComposedEmail};
pub use error::{Error, ModelError, Result, StorageError};
pub use help::{HelpDisplay, NullHelpDisplay, TextHelpDisplay};
pub use io_layer::{BinaryFileLayer, IoLayer, IoLayers, JsonFileLayer, MemoryLayer};
pub use models::{EmailServerProperties, EmailTemplate, EventProperty, Manager, Role, Shift, Volunteer};
pub use observer::{Aggregate, Observer, ObserverId};
pub use properties::{PropertyMap, PropertyValue, ReadWritable};

//! The application façade.
//!
//! [`Application`] owns the authoritative copy of every aggregate. Each
//! mutation is persisted through the aggregate's I/O layer first; only when
//! that succeeds is the in-memory copy replaced and the aggregate's
//! observers notified. A failed persist leaves the model untouched.
//!
//! The façade is not thread-safe. Keep it on one thread.

use crate::error::Result;
use crate::help::HelpDisplay;
use crate::io_layer::{IoLayer, IoLayers};
use crate::models::{EmailServerProperties, EmailTemplate, EventProperty, Role, Shift, Volunteer};
use crate::observer::{Aggregate, Observer, ObserverBus, ObserverId};
use crate::properties::ReadWritable;

/// Static metadata shown in the about box.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ApplicationInfo {
    pub name: String,
    pub version: String,
    pub copyright: String,
    pub about_message: String,
}

/// In-process model of shifts, volunteers, roles and email settings.
pub struct Application {
    info: ApplicationInfo,
    layers: IoLayers,
    help: Box<dyn HelpDisplay>,
    observers: ObserverBus,

    shifts: Vec<Shift>,
    volunteers: Vec<Volunteer>,
    roles: Vec<Role>,
    event_properties: Vec<EventProperty>,
    email_template: EmailTemplate,
    email_server_properties: EmailServerProperties,
}

impl Application {
    /// Build the application and load every aggregate from its layer.
    pub fn new(
        info: ApplicationInfo,
        mut layers: IoLayers,
        help: Box<dyn HelpDisplay>,
    ) -> Result<Self> {
        let shifts = load_list(layers.shifts.as_mut())?;
        let volunteers = load_list(layers.volunteers.as_mut())?;
        let roles = load_list(layers.roles.as_mut())?;
        let event_properties = load_list(layers.event_properties.as_mut())?;
        let email_template = load_single(layers.email_template.as_mut())?;
        let email_server_properties = load_single(layers.email_server_properties.as_mut())?;

        tracing::info!(
            "Loaded {} shift(s), {} volunteer(s), {} role(s), {} event propert(ies)",
            shifts.len(),
            volunteers.len(),
            roles.len(),
            event_properties.len()
        );

        Ok(Self {
            info,
            layers,
            help,
            observers: ObserverBus::new(),
            shifts,
            volunteers,
            roles,
            event_properties,
            email_template,
            email_server_properties,
        })
    }

    pub fn info(&self) -> &ApplicationInfo {
        &self.info
    }

    pub fn display_help(&self) -> Result<()> {
        self.help.display_help()
    }

    /// Copies of all shifts with their volunteer detached.
    ///
    /// Shift listings start out unassigned; use [`Self::assigned_shifts`]
    /// to see who is on each shift.
    pub fn shifts(&self) -> Vec<Shift> {
        self.shifts.iter().map(Shift::detached).collect()
    }

    /// Copies of all shifts including their assigned volunteer.
    pub fn assigned_shifts(&self) -> Vec<Shift> {
        self.shifts.clone()
    }

    pub fn volunteers(&self) -> Vec<Volunteer> {
        self.volunteers.clone()
    }

    pub fn roles(&self) -> Vec<Role> {
        self.roles.clone()
    }

    pub fn event_properties(&self) -> Vec<EventProperty> {
        self.event_properties.clone()
    }

    pub fn email_template(&self) -> EmailTemplate {
        self.email_template.clone()
    }

    pub fn email_server_properties(&self) -> EmailServerProperties {
        self.email_server_properties.clone()
    }

    pub fn set_shifts(&mut self, shifts: Vec<Shift>) -> Result<()> {
        self.layers.shifts.set_all(&shifts)?;
        self.shifts = shifts;
        self.observers.notify(Aggregate::Shifts);
        Ok(())
    }

    pub fn set_volunteers(&mut self, volunteers: Vec<Volunteer>) -> Result<()> {
        self.layers.volunteers.set_all(&volunteers)?;
        self.volunteers = volunteers;
        self.observers.notify(Aggregate::Volunteers);
        Ok(())
    }

    pub fn set_roles(&mut self, roles: Vec<Role>) -> Result<()> {
        self.layers.roles.set_all(&roles)?;
        self.roles = roles;
        self.observers.notify(Aggregate::Roles);
        Ok(())
    }

    pub fn set_event_properties(&mut self, event_properties: Vec<EventProperty>) -> Result<()> {
        self.layers.event_properties.set_all(&event_properties)?;
        self.event_properties = event_properties;
        self.observers.notify(Aggregate::EventProperties);
        Ok(())
    }

    pub fn set_email_template(&mut self, template: EmailTemplate) -> Result<()> {
        self.layers
            .email_template
            .set_all(std::slice::from_ref(&template))?;
        self.email_template = template;
        self.observers.notify(Aggregate::EmailTemplate);
        Ok(())
    }

    pub fn set_email_server_properties(&mut self, properties: EmailServerProperties) -> Result<()> {
        self.layers
            .email_server_properties
            .set_all(std::slice::from_ref(&properties))?;
        self.email_server_properties = properties;
        self.observers.notify(Aggregate::EmailServerProperties);
        Ok(())
    }

    /// Register an observer for changes to `aggregate`.
    pub fn register_observer(
        &mut self,
        aggregate: Aggregate,
        observer: impl Observer + 'static,
    ) -> ObserverId {
        self.observers.register(aggregate, Box::new(observer))
    }

    pub fn unregister_observer(&mut self, id: ObserverId) -> bool {
        self.observers.unregister(id)
    }

    pub fn observer_count(&self, aggregate: Aggregate) -> usize {
        self.observers.count(aggregate)
    }
}

impl std::fmt::Debug for Application {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Application")
            .field("info", &self.info)
            .field("shifts", &self.shifts.len())
            .field("volunteers", &self.volunteers.len())
            .field("roles", &self.roles.len())
            .field("event_properties", &self.event_properties.len())
            .field("observers", &self.observers)
            .finish()
    }
}

fn load_list<T: ReadWritable>(layer: &mut dyn IoLayer<T>) -> Result<Vec<T>> {
    let items = layer.get_all()?;
    if items.is_none() {
        tracing::info!("No stored data in {}, starting empty", layer.describe());
    }
    Ok(items.unwrap_or_default())
}

fn load_single<T: ReadWritable + Default>(layer: &mut dyn IoLayer<T>) -> Result<T> {
    let mut items = load_list(layer)?;
    if items.len() > 1 {
        tracing::warn!(
            "{} holds {} {} values, using the first",
            layer.describe(),
            items.len(),
            T::TYPE_NAME
        );
    }
    Ok(if items.is_empty() {
        T::default()
    } else {
        items.swap_remove(0)
    })
}

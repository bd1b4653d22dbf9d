use super::{decode_roles, encode_roles, Role, Volunteer};
use crate::error::ModelError;
use crate::properties::{PropertyMap, PropertyValue, ReadWritable};
use std::collections::BTreeSet;

/// A block of work at the event, optionally filled by a volunteer.
///
/// The assigned volunteer always satisfies the shift's requirements: an
/// angel shift only takes a volunteer who can angel, and every required role
/// must be held. Fields are private so the setters can enforce this.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Shift {
    description: String,
    angel_shift: bool,
    required_roles: BTreeSet<Role>,
    show_name: bool,
    show_email: bool,
    show_phone: bool,
    volunteer: Option<Volunteer>,
}

impl Shift {
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            ..Self::default()
        }
    }

    pub fn angel(description: impl Into<String>) -> Self {
        Self {
            angel_shift: true,
            ..Self::new(description)
        }
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn set_description(&mut self, description: impl Into<String>) {
        self.description = description.into();
    }

    pub fn is_angel_shift(&self) -> bool {
        self.angel_shift
    }

    /// Fails if turning the flag on would leave an ineligible volunteer assigned.
    pub fn set_angel_shift(&mut self, angel_shift: bool) -> Result<(), ModelError> {
        if angel_shift {
            if let Some(v) = &self.volunteer {
                if !v.can_angel {
                    return Err(ModelError::IllegalArgument(format!(
                        "assigned volunteer '{}' cannot work an angel shift",
                        v.name
                    )));
                }
            }
        }
        self.angel_shift = angel_shift;
        Ok(())
    }

    pub fn required_roles(&self) -> &BTreeSet<Role> {
        &self.required_roles
    }

    /// Fails if the assigned volunteer lacks one of the new roles.
    pub fn set_required_roles(&mut self, roles: BTreeSet<Role>) -> Result<(), ModelError> {
        if let Some(v) = &self.volunteer {
            Self::check_roles(&roles, v)?;
        }
        self.required_roles = roles;
        Ok(())
    }

    pub fn show_name(&self) -> bool {
        self.show_name
    }

    pub fn show_email(&self) -> bool {
        self.show_email
    }

    pub fn show_phone(&self) -> bool {
        self.show_phone
    }

    /// Which volunteer contact fields are shown in shift listings.
    pub fn set_display(&mut self, name: bool, email: bool, phone: bool) {
        self.show_name = name;
        self.show_email = email;
        self.show_phone = phone;
    }

    pub fn volunteer(&self) -> Option<&Volunteer> {
        self.volunteer.as_ref()
    }

    /// Assign or clear the volunteer.
    pub fn set_volunteer(&mut self, volunteer: Option<Volunteer>) -> Result<(), ModelError> {
        if let Some(v) = &volunteer {
            self.check_eligible(v)?;
        }
        self.volunteer = volunteer;
        Ok(())
    }

    pub fn is_assigned(&self) -> bool {
        self.volunteer.is_some()
    }

    /// Whether `volunteer` could be assigned to this shift.
    pub fn accepts(&self, volunteer: &Volunteer) -> bool {
        self.check_eligible(volunteer).is_ok()
    }

    /// Copy of this shift with the volunteer cleared.
    pub fn detached(&self) -> Shift {
        Shift {
            volunteer: None,
            ..self.clone()
        }
    }

    fn check_eligible(&self, volunteer: &Volunteer) -> Result<(), ModelError> {
        if self.angel_shift && !volunteer.can_angel {
            return Err(ModelError::IllegalArgument(format!(
                "volunteer '{}' cannot work angel shift '{}'",
                volunteer.name, self.description
            )));
        }
        Self::check_roles(&self.required_roles, volunteer)
    }

    fn check_roles(required: &BTreeSet<Role>, volunteer: &Volunteer) -> Result<(), ModelError> {
        match required.iter().find(|r| !volunteer.has_role(r)) {
            Some(missing) => Err(ModelError::IllegalArgument(format!(
                "volunteer '{}' does not hold required role '{}'",
                volunteer.name, missing.name
            ))),
            None => Ok(()),
        }
    }
}

impl ReadWritable for Shift {
    const TYPE_NAME: &'static str = "Shift";
    const FIELDS: &'static [&'static str] = &[
        "description",
        "angelShift",
        "requiredRoles",
        "showName",
        "showEmail",
        "showPhone",
        "volunteer",
    ];

    fn read_writable_properties(&self) -> PropertyMap {
        let volunteer: PropertyValue = self
            .volunteer
            .as_ref()
            .map(Volunteer::read_writable_properties)
            .into();

        PropertyMap::new()
            .with("description", self.description.as_str())
            .with("angelShift", self.angel_shift)
            .with("requiredRoles", encode_roles(&self.required_roles))
            .with("showName", self.show_name)
            .with("showEmail", self.show_email)
            .with("showPhone", self.show_phone)
            .with("volunteer", volunteer)
    }

    fn from_properties(properties: &PropertyMap) -> Self {
        let mut shift = Shift {
            description: properties.text("description"),
            angel_shift: properties.flag("angelShift"),
            required_roles: decode_roles(properties.list("requiredRoles")),
            show_name: properties.flag("showName"),
            show_email: properties.flag("showEmail"),
            show_phone: properties.flag("showPhone"),
            volunteer: None,
        };

        if let Some(map) = properties.map("volunteer") {
            let volunteer = Volunteer::from_properties(map);
            if let Err(err) = shift.set_volunteer(Some(volunteer)) {
                tracing::warn!("Dropping stored assignment on '{}': {}", shift.description, err);
            }
        }

        shift
    }
}

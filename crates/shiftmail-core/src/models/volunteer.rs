use super::{decode_roles, encode_roles};
use crate::properties::{PropertyMap, ReadWritable};
use std::collections::BTreeSet;

/// A duty a volunteer can hold and a shift can require.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Role {
    pub name: String,
}

impl Role {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl ReadWritable for Role {
    const TYPE_NAME: &'static str = "Role";
    const FIELDS: &'static [&'static str] = &["name"];

    fn read_writable_properties(&self) -> PropertyMap {
        PropertyMap::new().with("name", self.name.as_str())
    }

    fn from_properties(properties: &PropertyMap) -> Self {
        Self::new(properties.text("name"))
    }
}

/// A person who can be assigned to shifts.
///
/// Roles are held as a set, so two volunteers that gained the same roles in a
/// different order compare equal.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Volunteer {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub notes: String,
    pub active: bool,
    /// Eligible for angel shifts.
    pub can_angel: bool,
    pub roles: BTreeSet<Role>,
}

impl Volunteer {
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        phone: impl Into<String>,
        notes: impl Into<String>,
        active: bool,
    ) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            phone: phone.into(),
            notes: notes.into(),
            active,
            ..Self::default()
        }
    }

    pub fn with_can_angel(mut self, can_angel: bool) -> Self {
        self.can_angel = can_angel;
        self
    }

    pub fn with_role(mut self, role: Role) -> Self {
        self.roles.insert(role);
        self
    }

    /// Add a role. Returns false if it was already held.
    pub fn add_role(&mut self, role: Role) -> bool {
        self.roles.insert(role)
    }

    pub fn remove_role(&mut self, role: &Role) -> bool {
        self.roles.remove(role)
    }

    pub fn has_role(&self, role: &Role) -> bool {
        self.roles.contains(role)
    }
}

impl ReadWritable for Volunteer {
    const TYPE_NAME: &'static str = "Volunteer";
    const FIELDS: &'static [&'static str] = &[
        "name", "email", "phone", "notes", "active", "canAngel", "roles",
    ];

    fn read_writable_properties(&self) -> PropertyMap {
        PropertyMap::new()
            .with("name", self.name.as_str())
            .with("email", self.email.as_str())
            .with("phone", self.phone.as_str())
            .with("notes", self.notes.as_str())
            .with("active", self.active)
            .with("canAngel", self.can_angel)
            .with("roles", encode_roles(&self.roles))
    }

    fn from_properties(properties: &PropertyMap) -> Self {
        Self {
            name: properties.text("name"),
            email: properties.text("email"),
            phone: properties.text("phone"),
            notes: properties.text("notes"),
            active: properties.flag("active"),
            can_angel: properties.flag("canAngel"),
            roles: decode_roles(properties.list("roles")),
        }
    }
}

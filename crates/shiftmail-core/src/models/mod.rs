//! Domain entities.
//!
//! Each entity implements [`ReadWritable`](crate::properties::ReadWritable)
//! with an explicit, ordered field list.

mod event;
mod mail;
mod shift;
mod volunteer;

pub use event::EventProperty;
pub use mail::{EmailServerProperties, EmailTemplate, Manager, DEFAULT_SMTP_PORT};
pub use shift::Shift;
pub use volunteer::{Role, Volunteer};

use crate::csv;
use std::collections::BTreeSet;

/// Encode a role set as a CSV record of role names.
fn encode_roles(roles: &BTreeSet<Role>) -> String {
    let names: Vec<&str> = roles.iter().map(|r| r.name.as_str()).collect();
    csv::format_record(&names)
}

fn decode_roles(names: Vec<String>) -> BTreeSet<Role> {
    names.into_iter().map(Role::new).collect()
}

//! Composing assignment emails from the template.
//!
//! Placeholders in subject and body:
//!
//! | Placeholder | Replaced with |
//! |---|---|
//! | `{name}`, `{email}`, `{phone}` | the volunteer's details |
//! | `{shifts}` | one line per shift assigned to the volunteer |
//! | `{manager}`, `{managerEmail}`, `{managerPhone}` | the signing manager |
//! | `{event:<key>}` | value of the event property `<key>` |
//!
//! Anything else in braces is left as written.

use crate::error::ModelError;
use crate::models::{EmailTemplate, EventProperty, Shift, Volunteer};

/// A rendered email, ready to hand to a mail sender.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComposedEmail {
    pub to: String,
    pub subject: String,
    pub body: String,
}

/// Render `template` for `volunteer`, listing the shifts they are assigned to.
///
/// Shifts are matched to the volunteer by email address, ignoring case.
pub fn compose(
    template: &EmailTemplate,
    volunteer: &Volunteer,
    shifts: &[Shift],
    event_properties: &[EventProperty],
) -> Result<ComposedEmail, ModelError> {
    if volunteer.email.trim().is_empty() {
        return Err(ModelError::IllegalArgument(format!(
            "volunteer '{}' has no email address",
            volunteer.name
        )));
    }

    let lines: Vec<String> = shifts
        .iter()
        .filter(|s| {
            s.volunteer()
                .is_some_and(|v| v.email.eq_ignore_ascii_case(&volunteer.email))
        })
        .map(shift_line)
        .collect();
    let shift_list = lines.join("\n");

    let lookup = |name: &str| -> Option<String> {
        match name {
            "name" => Some(volunteer.name.clone()),
            "email" => Some(volunteer.email.clone()),
            "phone" => Some(volunteer.phone.clone()),
            "shifts" => Some(shift_list.clone()),
            "manager" => Some(template.manager.name.clone()),
            "managerEmail" => Some(template.manager.email.clone()),
            "managerPhone" => Some(template.manager.phone.clone()),
            _ => name.strip_prefix("event:").and_then(|key| {
                event_properties
                    .iter()
                    .find(|p| p.key == key)
                    .map(|p| p.value.clone())
            }),
        }
    };

    Ok(ComposedEmail {
        to: volunteer.email.clone(),
        subject: substitute(&template.subject, &lookup),
        body: substitute(&template.body, &lookup),
    })
}

/// One listing line for a shift, showing the contact fields its display
/// flags enable for the assigned volunteer.
pub fn shift_line(shift: &Shift) -> String {
    let mut line = format!("- {}", shift.description());
    if let Some(v) = shift.volunteer() {
        let shown: Vec<&str> = [
            (shift.show_name(), v.name.as_str()),
            (shift.show_email(), v.email.as_str()),
            (shift.show_phone(), v.phone.as_str()),
        ]
        .into_iter()
        .filter(|(enabled, value)| *enabled && !value.is_empty())
        .map(|(_, value)| value)
        .collect();

        if !shown.is_empty() {
            line.push_str(&format!(" ({})", shown.join(", ")));
        }
    }
    line
}

fn substitute(text: &str, lookup: &dyn Fn(&str) -> Option<String>) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;

    while let Some(start) = rest.find('{') {
        out.push_str(&rest[..start]);
        let after = &rest[start + 1..];
        match after.find('}') {
            Some(end) => match lookup(&after[..end]) {
                Some(value) => {
                    out.push_str(&value);
                    rest = &after[end + 1..];
                }
                None => {
                    out.push('{');
                    rest = after;
                }
            },
            None => {
                out.push_str(&rest[start..]);
                return out;
            }
        }
    }
    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Manager;

    fn volunteer() -> Volunteer {
        Volunteer::new("Ana", "ana@example.org", "555-0101", "", true).with_can_angel(true)
    }

    fn template() -> EmailTemplate {
        EmailTemplate::new(
            "{event:name} shifts for {name}",
            "Hi {name},\n\nYou are on:\n{shifts}\n\nCall time {event:callTime}.\n{manager} ({managerEmail})",
            Manager::new("Pat", "pat@example.org", "555-0199"),
        )
    }

    fn assigned(description: &str, v: Volunteer) -> Shift {
        let mut shift = Shift::new(description);
        shift.set_volunteer(Some(v)).unwrap();
        shift
    }

    #[test]
    fn test_compose_lists_only_own_shifts() {
        let other = Volunteer::new("Ben", "ben@example.org", "", "", true);
        let mut angel = Shift::angel("Closing angel");
        angel.set_display(false, false, true);
        angel.set_volunteer(Some(volunteer())).unwrap();

        let shifts = vec![
            assigned("Bar 18:00", volunteer()),
            assigned("Door 19:00", other),
            Shift::new("Unfilled"),
            angel,
        ];
        let events = vec![
            EventProperty::new("name", "Spring Gala"),
            EventProperty::new("callTime", "17:30"),
        ];

        let email = compose(&template(), &volunteer(), &shifts, &events).unwrap();

        assert_eq!(email.to, "ana@example.org");
        assert_eq!(email.subject, "Spring Gala shifts for Ana");
        assert_eq!(
            email.body,
            "Hi Ana,\n\nYou are on:\n- Bar 18:00\n- Closing angel (555-0101)\n\nCall time 17:30.\nPat (pat@example.org)"
        );
    }

    #[test]
    fn test_shifts_matched_by_email_ignoring_case() {
        let mut stale = volunteer();
        stale.email = "ANA@example.org".into();
        stale.notes = "edited since assignment".into();
        let shifts = vec![assigned("Setup", stale)];

        let t = EmailTemplate::new("", "{shifts}", Manager::default());
        let email = compose(&t, &volunteer(), &shifts, &[]).unwrap();
        assert_eq!(email.body, "- Setup");
    }

    #[test]
    fn test_unknown_placeholders_are_kept() {
        let t = EmailTemplate::new("{nope} {event:missing} {name", "{}", Manager::default());
        let email = compose(&t, &volunteer(), &[], &[]).unwrap();
        assert_eq!(email.subject, "{nope} {event:missing} {name");
        assert_eq!(email.body, "{}");
    }

    #[test]
    fn test_volunteer_without_email_is_rejected() {
        let mut v = volunteer();
        v.email = "  ".into();
        assert!(matches!(
            compose(&template(), &v, &[], &[]),
            Err(ModelError::IllegalArgument(_))
        ));
    }

    #[test]
    fn test_shift_line_respects_display_flags() {
        let mut shift = assigned("Bar", volunteer());
        assert_eq!(shift_line(&shift), "- Bar");

        shift.set_display(true, true, false);
        assert_eq!(shift_line(&shift), "- Bar (Ana, ana@example.org)");
        assert_eq!(shift_line(&shift.detached()), "- Bar");
    }
}

//! Subcommand handlers.

use crate::lookup::resolve;
use anyhow::{Context, Result};
use clap::{Args, Subcommand, ValueEnum};
use shiftmail_core::email::shift_line;
use shiftmail_core::{compose, Application, EventProperty, Role, Shift, Volunteer};
use std::collections::BTreeSet;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Show application name, version and about text
    About,
    /// Show the user manual
    Manual,
    /// List one collection
    List {
        #[arg(value_enum)]
        what: ListTarget,
    },
    /// Add a role volunteers can hold
    AddRole { name: String },
    /// Add a volunteer
    AddVolunteer(VolunteerArgs),
    /// Add a shift
    AddShift(ShiftArgs),
    /// Assign a volunteer to a shift (by number or fuzzy name)
    Assign { shift: String, volunteer: String },
    /// Clear the volunteer on a shift
    Unassign { shift: String },
    /// Update the email template
    SetTemplate(TemplateArgs),
    /// Update outgoing mail server settings
    SetServer(ServerArgs),
    /// Set an event property used by `{event:<key>}` placeholders
    SetEvent { key: String, value: String },
    /// Print the email a volunteer would receive
    Preview { volunteer: String },
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum ListTarget {
    Shifts,
    Volunteers,
    Roles,
    Event,
    Template,
    Server,
}

#[derive(Args, Debug)]
pub struct VolunteerArgs {
    #[arg(long)]
    name: String,
    #[arg(long)]
    email: String,
    #[arg(long, default_value = "")]
    phone: String,
    #[arg(long, default_value = "")]
    notes: String,
    /// Eligible for angel shifts
    #[arg(long)]
    can_angel: bool,
    /// Mark as not currently active
    #[arg(long)]
    inactive: bool,
    /// Role held (repeatable)
    #[arg(long = "role")]
    roles: Vec<String>,
}

#[derive(Args, Debug)]
pub struct ShiftArgs {
    #[arg(long)]
    description: String,
    /// Requires a volunteer who can angel
    #[arg(long)]
    angel: bool,
    /// Required role (repeatable)
    #[arg(long = "role")]
    roles: Vec<String>,
    #[arg(long)]
    show_name: bool,
    #[arg(long)]
    show_email: bool,
    #[arg(long)]
    show_phone: bool,
}

#[derive(Args, Debug)]
pub struct TemplateArgs {
    #[arg(long)]
    subject: Option<String>,
    #[arg(long)]
    body: Option<String>,
    #[arg(long)]
    manager_name: Option<String>,
    #[arg(long)]
    manager_email: Option<String>,
    #[arg(long)]
    manager_phone: Option<String>,
}

#[derive(Args, Debug)]
pub struct ServerArgs {
    #[arg(long)]
    host: Option<String>,
    #[arg(long)]
    port: Option<String>,
    #[arg(long)]
    username: Option<String>,
    #[arg(long)]
    password: Option<String>,
    #[arg(long)]
    from: Option<String>,
    #[arg(long)]
    tls: Option<bool>,
}

/// Run one command against the application.
pub fn run(app: &mut Application, command: Command) -> Result<()> {
    match command {
        Command::About => {
            let info = app.info();
            println!("{} {}", info.name, info.version);
            if !info.copyright.is_empty() {
                println!("{}", info.copyright);
            }
            println!("{}", info.about_message);
        }
        Command::Manual => app.display_help()?,
        Command::List { what } => list(app, what),
        Command::AddRole { name } => {
            let mut roles = app.roles();
            let role = Role::new(name.trim());
            if roles.contains(&role) {
                anyhow::bail!("Role '{}' already exists", role.name);
            }
            roles.push(role);
            app.set_roles(roles)?;
        }
        Command::AddVolunteer(args) => add_volunteer(app, args)?,
        Command::AddShift(args) => add_shift(app, args)?,
        Command::Assign { shift, volunteer } => {
            let mut shifts = app.assigned_shifts();
            let volunteers = app.volunteers();
            let s = resolve(&shifts, &shift, |s| s.description())?;
            let v = resolve(&volunteers, &volunteer, |v| v.name.as_str())?;
            shifts[s]
                .set_volunteer(Some(volunteers[v].clone()))
                .with_context(|| format!("Cannot assign {}", volunteers[v].name))?;
            app.set_shifts(shifts)?;
        }
        Command::Unassign { shift } => {
            let mut shifts = app.assigned_shifts();
            let s = resolve(&shifts, &shift, |s| s.description())?;
            shifts[s].set_volunteer(None)?;
            app.set_shifts(shifts)?;
        }
        Command::SetTemplate(args) => {
            let mut template = app.email_template();
            apply(&mut template.subject, args.subject);
            apply(&mut template.body, args.body);
            apply(&mut template.manager.name, args.manager_name);
            apply(&mut template.manager.email, args.manager_email);
            apply(&mut template.manager.phone, args.manager_phone);
            app.set_email_template(template)?;
        }
        Command::SetServer(args) => {
            let mut server = app.email_server_properties();
            if let Some(port) = args.port {
                server.set_port_str(&port)?;
            }
            apply(&mut server.host, args.host);
            apply(&mut server.username, args.username);
            apply(&mut server.password, args.password);
            apply(&mut server.from_address, args.from);
            if let Some(tls) = args.tls {
                server.use_tls = tls;
            }
            app.set_email_server_properties(server)?;
        }
        Command::SetEvent { key, value } => {
            let mut properties = app.event_properties();
            match properties.iter_mut().find(|p| p.key == key) {
                Some(existing) => existing.value = value,
                None => properties.push(EventProperty::new(key, value)),
            }
            app.set_event_properties(properties)?;
        }
        Command::Preview { volunteer } => {
            let volunteers = app.volunteers();
            let v = resolve(&volunteers, &volunteer, |v| v.name.as_str())?;
            let email = compose(
                &app.email_template(),
                &volunteers[v],
                &app.assigned_shifts(),
                &app.event_properties(),
            )?;
            println!("To: {}", email.to);
            println!("Subject: {}", email.subject);
            println!();
            println!("{}", email.body);
        }
    }
    Ok(())
}

fn apply(field: &mut String, value: Option<String>) {
    if let Some(value) = value {
        *field = value;
    }
}

/// Resolve role names against the known roles.
fn known_roles(app: &Application, names: &[String]) -> Result<BTreeSet<Role>> {
    let roles = app.roles();
    names
        .iter()
        .map(|name| {
            let role = Role::new(name.trim());
            if roles.contains(&role) {
                Ok(role)
            } else {
                anyhow::bail!("Unknown role '{}' (add it with `add-role`)", role.name)
            }
        })
        .collect()
}

fn add_volunteer(app: &mut Application, args: VolunteerArgs) -> Result<()> {
    let roles = known_roles(app, &args.roles)?;
    let mut volunteer = Volunteer::new(args.name, args.email, args.phone, args.notes, !args.inactive)
        .with_can_angel(args.can_angel);
    volunteer.roles = roles;

    let mut volunteers = app.volunteers();
    volunteers.push(volunteer);
    app.set_volunteers(volunteers)?;
    Ok(())
}

fn add_shift(app: &mut Application, args: ShiftArgs) -> Result<()> {
    let mut shift = Shift::new(args.description);
    shift.set_angel_shift(args.angel)?;
    shift.set_required_roles(known_roles(app, &args.roles)?)?;
    shift.set_display(args.show_name, args.show_email, args.show_phone);

    let mut shifts = app.assigned_shifts();
    shifts.push(shift);
    app.set_shifts(shifts)?;
    Ok(())
}

fn list(app: &Application, what: ListTarget) {
    match what {
        ListTarget::Shifts => {
            for (i, shift) in app.assigned_shifts().iter().enumerate() {
                let mut flags = Vec::new();
                if shift.is_angel_shift() {
                    flags.push("angel".to_string());
                }
                flags.extend(shift.required_roles().iter().map(|r| r.name.clone()));
                let assigned = shift
                    .volunteer()
                    .map_or_else(|| "unassigned".to_string(), |v| v.name.clone());
                println!(
                    "{:>3}. {} [{}] -> {}",
                    i + 1,
                    shift_line(shift).trim_start_matches("- "),
                    flags.join(", "),
                    assigned
                );
            }
        }
        ListTarget::Volunteers => {
            for (i, v) in app.volunteers().iter().enumerate() {
                let roles: Vec<&str> = v.roles.iter().map(|r| r.name.as_str()).collect();
                println!(
                    "{:>3}. {} <{}> {}{}{} [{}]",
                    i + 1,
                    v.name,
                    v.email,
                    v.phone,
                    if v.can_angel { " angel" } else { "" },
                    if v.active { "" } else { " inactive" },
                    roles.join(", ")
                );
            }
        }
        ListTarget::Roles => {
            for (i, role) in app.roles().iter().enumerate() {
                println!("{:>3}. {}", i + 1, role.name);
            }
        }
        ListTarget::Event => {
            for p in app.event_properties() {
                println!("{} = {}", p.key, p.value);
            }
        }
        ListTarget::Template => {
            let t = app.email_template();
            println!("Subject: {}", t.subject);
            println!("Manager: {} <{}> {}", t.manager.name, t.manager.email, t.manager.phone);
            println!();
            println!("{}", t.body);
        }
        ListTarget::Server => {
            let s = app.email_server_properties();
            println!("Host: {}:{}", s.host, s.port);
            println!("User: {}", s.username);
            println!("From: {}", s.from_address);
            println!("TLS: {}", s.use_tls);
        }
    }
}

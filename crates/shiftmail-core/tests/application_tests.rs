//! Façade behaviour exercised through the public API.

use shiftmail_core::{
    Aggregate, Application, ApplicationInfo, EmailServerProperties, EmailTemplate, EventProperty,
    IoLayer, IoLayers, Manager, MemoryLayer, NullHelpDisplay, Properties, ReadWritable, Role,
    Shift, StorageError, Volunteer,
};
use std::cell::RefCell;
use std::rc::Rc;
use tempfile::TempDir;

type Log = Rc<RefCell<Vec<Aggregate>>>;

/// Layer whose writes always fail.
struct ReadOnlyLayer;

impl<T: ReadWritable> IoLayer<T> for ReadOnlyLayer {
    fn get_all(&mut self) -> Result<Option<Vec<T>>, StorageError> {
        Ok(None)
    }

    fn set_all(&mut self, _items: &[T]) -> Result<(), StorageError> {
        Err(StorageError::Unavailable("read-only".into()))
    }

    fn describe(&self) -> String {
        "read-only".into()
    }
}

fn info() -> ApplicationInfo {
    ApplicationInfo {
        name: "Shiftmail".into(),
        version: "0.1.0".into(),
        copyright: "(c) crew".into(),
        about_message: "Builds shift emails".into(),
    }
}

fn memory_app() -> Application {
    Application::new(info(), IoLayers::in_memory(), Box::new(NullHelpDisplay)).unwrap()
}

fn observe_all(app: &mut Application) -> Log {
    let log: Log = Rc::new(RefCell::new(Vec::new()));
    for aggregate in Aggregate::ALL {
        let log = Rc::clone(&log);
        app.register_observer(aggregate, move |a: Aggregate| log.borrow_mut().push(a));
    }
    log
}

fn angel() -> Volunteer {
    Volunteer::new("Lee", "lee@example.org", "555-0102", "", true).with_can_angel(true)
}

#[test]
fn each_mutator_notifies_only_its_aggregate() {
    let mut app = memory_app();
    let log = observe_all(&mut app);

    app.set_shifts(vec![Shift::new("Setup")]).unwrap();
    assert_eq!(*log.borrow(), vec![Aggregate::Shifts]);

    log.borrow_mut().clear();
    app.set_volunteers(vec![angel()]).unwrap();
    app.set_roles(vec![Role::new("Bar")]).unwrap();
    app.set_event_properties(vec![EventProperty::new("venue", "Hall")])
        .unwrap();
    app.set_email_template(EmailTemplate::default()).unwrap();
    app.set_email_server_properties(EmailServerProperties::default())
        .unwrap();

    assert_eq!(
        *log.borrow(),
        vec![
            Aggregate::Volunteers,
            Aggregate::Roles,
            Aggregate::EventProperties,
            Aggregate::EmailTemplate,
            Aggregate::EmailServerProperties,
        ]
    );
}

#[test]
fn observers_run_in_registration_order() {
    let mut app = memory_app();
    let order = Rc::new(RefCell::new(Vec::new()));
    for tag in ["first", "second", "third"] {
        let order = Rc::clone(&order);
        app.register_observer(Aggregate::Roles, move |_: Aggregate| {
            order.borrow_mut().push(tag)
        });
    }

    app.set_roles(vec![]).unwrap();
    assert_eq!(*order.borrow(), vec!["first", "second", "third"]);
    assert_eq!(app.observer_count(Aggregate::Roles), 3);
}

#[test]
fn unregistered_observer_is_not_called() {
    let mut app = memory_app();
    let calls = Rc::new(RefCell::new(0));
    let counter = Rc::clone(&calls);
    let id = app.register_observer(Aggregate::Volunteers, move |_: Aggregate| {
        *counter.borrow_mut() += 1
    });

    app.set_volunteers(vec![angel()]).unwrap();
    assert!(app.unregister_observer(id));
    app.set_volunteers(vec![]).unwrap();

    assert_eq!(*calls.borrow(), 1);
}

#[test]
fn returned_lists_are_copies() {
    let mut app = memory_app();
    app.set_volunteers(vec![angel()]).unwrap();
    app.set_roles(vec![Role::new("Bar")]).unwrap();

    let mut volunteers = app.volunteers();
    volunteers[0].name = "Changed".into();
    volunteers.push(Volunteer::default());
    let mut roles = app.roles();
    roles.clear();
    let mut template = app.email_template();
    template.subject = "Changed".into();

    assert_eq!(app.volunteers(), vec![angel()]);
    assert_eq!(app.roles(), vec![Role::new("Bar")]);
    assert_eq!(app.email_template(), EmailTemplate::default());
}

#[test]
fn shifts_are_returned_detached_but_assignment_is_kept() {
    let mut app = memory_app();
    let mut shift = Shift::angel("Closing angel");
    shift.set_volunteer(Some(angel())).unwrap();
    app.set_shifts(vec![shift.clone()]).unwrap();

    let listed = app.shifts();
    assert_eq!(listed, vec![shift.detached()]);
    assert!(listed[0].volunteer().is_none());

    let mut edited = app.shifts();
    edited[0].set_description("Edited");
    assert_eq!(app.shifts()[0].description(), "Closing angel");

    assert_eq!(app.assigned_shifts(), vec![shift]);
}

#[test]
fn failed_persist_leaves_state_and_observers_untouched() {
    let mut layers = IoLayers::in_memory();
    layers.shifts = Box::new(ReadOnlyLayer);
    layers.email_template = Box::new(ReadOnlyLayer);
    let mut app = Application::new(info(), layers, Box::new(NullHelpDisplay)).unwrap();
    let log = observe_all(&mut app);

    let err = app.set_shifts(vec![Shift::new("Setup")]).unwrap_err();
    assert!(matches!(
        err,
        shiftmail_core::Error::Storage(StorageError::Unavailable(_))
    ));
    assert!(app.shifts().is_empty());

    let template = EmailTemplate::new("Hi", "Body", Manager::new("Pat", "", ""));
    assert!(app.set_email_template(template).is_err());
    assert_eq!(app.email_template(), EmailTemplate::default());

    assert!(log.borrow().is_empty());
}

#[test]
fn construction_loads_existing_layer_contents() {
    let mut layers = IoLayers::in_memory();
    layers.roles = Box::new(MemoryLayer::with_items(vec![Role::new("Bar"), Role::new("Door")]));
    layers.email_server_properties = Box::new(MemoryLayer::with_items(vec![
        EmailServerProperties {
            host: "smtp.example.org".into(),
            ..EmailServerProperties::default()
        },
    ]));

    let app = Application::new(info(), layers, Box::new(NullHelpDisplay)).unwrap();

    assert_eq!(app.roles(), vec![Role::new("Bar"), Role::new("Door")]);
    assert_eq!(app.email_server_properties().host, "smtp.example.org");
    assert_eq!(app.email_template(), EmailTemplate::default());
    assert_eq!(app.info(), &info());
}

fn write_bootstrap(dir: &TempDir) -> std::path::PathBuf {
    let text = r#"
[application]
name = "Shiftmail"
version = "0.1.0"
copyright = "(c) crew"
aboutMessage = "Builds shift emails"

[shifts.iolayer]
class = "binary"
arguments = "data/shifts.bin"

[volunteers.iolayer]
class = "json"
arguments = ["data/volunteers, all.json"]

[roles.iolayer]
class = "binary"
arguments = "data/roles.bin"

[emailTemplate.iolayer]
class = "binary"
arguments = "data/template.bin"

[emailServerProperties.iolayer]
class = "memory"
arguments = ""

[eventProperties.iolayer]
class = "json"
arguments = "data/event.json"

[helpDisplay]
class = "text"
arguments = "help.txt"
"#;
    let path = dir.path().join("shiftmail.toml");
    std::fs::write(&path, text).unwrap();
    std::fs::write(dir.path().join("help.txt"), "help text\n").unwrap();
    path
}

#[test]
fn bootstrapped_application_persists_across_restarts() {
    let dir = TempDir::new().unwrap();
    let config = write_bootstrap(&dir);
    let props = Properties::load(&config).unwrap();

    let mut app = Application::from_properties(Some(&props), Some(dir.path())).unwrap();
    let mut shift = Shift::angel("Closing angel");
    shift.set_volunteer(Some(angel())).unwrap();
    app.set_shifts(vec![shift.clone()]).unwrap();
    app.set_volunteers(vec![angel()]).unwrap();
    app.set_email_template(EmailTemplate::new(
        "Your shifts",
        "{shifts}",
        Manager::new("Pat", "pat@example.org", ""),
    ))
    .unwrap();
    app.set_email_server_properties(EmailServerProperties {
        host: "smtp.example.org".into(),
        ..EmailServerProperties::default()
    })
    .unwrap();
    app.display_help().unwrap();
    drop(app);

    assert!(dir.path().join("data/volunteers, all.json").exists());

    let reloaded = Application::from_properties(Some(&props), Some(dir.path())).unwrap();
    assert_eq!(reloaded.assigned_shifts(), vec![shift]);
    assert_eq!(reloaded.volunteers(), vec![angel()]);
    assert_eq!(reloaded.email_template().subject, "Your shifts");
    // Memory layer does not survive the restart.
    assert_eq!(
        reloaded.email_server_properties(),
        EmailServerProperties::default()
    );
}

#[test]
fn bootstrap_without_shift_layer_names_the_key() {
    let dir = TempDir::new().unwrap();
    let config = write_bootstrap(&dir);
    let mut props = Properties::load(&config).unwrap();
    props.remove("shifts.iolayer.class");

    let err = Application::from_properties(Some(&props), Some(dir.path())).unwrap_err();
    assert!(err.is_illegal_argument());
    assert!(err.to_string().contains("shifts.iolayer.class"));
}

#[test]
fn bootstrap_rejects_unknown_backend() {
    let dir = TempDir::new().unwrap();
    let config = write_bootstrap(&dir);
    let props = Properties::load(&config)
        .unwrap()
        .with("roles.iolayer.class", "xml");

    let err = Application::from_properties(Some(&props), Some(dir.path())).unwrap_err();
    assert!(matches!(err, shiftmail_core::Error::Config(_)));
}

//! Change notification keyed by aggregate.

use std::fmt;

/// One independently observed collection owned by the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Aggregate {
    Shifts,
    Volunteers,
    Roles,
    EmailTemplate,
    EmailServerProperties,
    EventProperties,
}

impl Aggregate {
    pub const ALL: [Aggregate; 6] = [
        Aggregate::Shifts,
        Aggregate::Volunteers,
        Aggregate::Roles,
        Aggregate::EmailTemplate,
        Aggregate::EmailServerProperties,
        Aggregate::EventProperties,
    ];

    /// Key prefix used in the bootstrap properties.
    pub fn key(&self) -> &'static str {
        match self {
            Aggregate::Shifts => "shifts",
            Aggregate::Volunteers => "volunteers",
            Aggregate::Roles => "roles",
            Aggregate::EmailTemplate => "emailTemplate",
            Aggregate::EmailServerProperties => "emailServerProperties",
            Aggregate::EventProperties => "eventProperties",
        }
    }
}

impl fmt::Display for Aggregate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Listener for changes to one aggregate.
pub trait Observer {
    fn on_change(&mut self, aggregate: Aggregate);
}

impl<F: FnMut(Aggregate)> Observer for F {
    fn on_change(&mut self, aggregate: Aggregate) {
        self(aggregate)
    }
}

/// Handle returned by registration, used to unregister.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObserverId(u64);

struct Registration {
    id: ObserverId,
    aggregate: Aggregate,
    observer: Box<dyn Observer>,
}

/// Registered observers, invoked in registration order.
#[derive(Default)]
pub struct ObserverBus {
    next_id: u64,
    registrations: Vec<Registration>,
}

impl ObserverBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, aggregate: Aggregate, observer: Box<dyn Observer>) -> ObserverId {
        let id = ObserverId(self.next_id);
        self.next_id += 1;
        self.registrations.push(Registration {
            id,
            aggregate,
            observer,
        });
        id
    }

    /// Returns false if `id` was not registered.
    pub fn unregister(&mut self, id: ObserverId) -> bool {
        let before = self.registrations.len();
        self.registrations.retain(|r| r.id != id);
        self.registrations.len() != before
    }

    /// Invoke every observer registered for `aggregate`, and no other.
    pub fn notify(&mut self, aggregate: Aggregate) {
        let mut notified = 0;
        for registration in self
            .registrations
            .iter_mut()
            .filter(|r| r.aggregate == aggregate)
        {
            registration.observer.on_change(aggregate);
            notified += 1;
        }
        tracing::debug!("Notified {} observer(s) of {} change", notified, aggregate);
    }

    pub fn count(&self, aggregate: Aggregate) -> usize {
        self.registrations
            .iter()
            .filter(|r| r.aggregate == aggregate)
            .count()
    }
}

impl fmt::Debug for ObserverBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObserverBus")
            .field("registered", &self.registrations.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn recorder(log: &Rc<RefCell<Vec<String>>>, tag: &'static str) -> Box<dyn Observer> {
        let log = Rc::clone(log);
        Box::new(move |aggregate: Aggregate| log.borrow_mut().push(format!("{tag}:{aggregate}")))
    }

    #[test]
    fn test_notify_reaches_only_matching_aggregate_in_order() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut bus = ObserverBus::new();
        bus.register(Aggregate::Shifts, recorder(&log, "first"));
        bus.register(Aggregate::Volunteers, recorder(&log, "other"));
        bus.register(Aggregate::Shifts, recorder(&log, "second"));

        bus.notify(Aggregate::Shifts);

        assert_eq!(*log.borrow(), vec!["first:shifts", "second:shifts"]);
    }

    #[test]
    fn test_unregister_stops_notifications() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut bus = ObserverBus::new();
        let id = bus.register(Aggregate::Roles, recorder(&log, "roles"));

        assert!(bus.unregister(id));
        assert!(!bus.unregister(id));
        bus.notify(Aggregate::Roles);

        assert!(log.borrow().is_empty());
        assert_eq!(bus.count(Aggregate::Roles), 0);
    }

    #[test]
    fn test_count_per_aggregate() {
        let mut bus = ObserverBus::new();
        bus.register(Aggregate::EmailTemplate, Box::new(|_: Aggregate| {}));
        bus.register(Aggregate::EmailTemplate, Box::new(|_: Aggregate| {}));
        bus.register(Aggregate::EventProperties, Box::new(|_: Aggregate| {}));

        assert_eq!(bus.count(Aggregate::EmailTemplate), 2);
        assert_eq!(bus.count(Aggregate::EventProperties), 1);
        assert_eq!(bus.count(Aggregate::Shifts), 0);
    }

    #[test]
    fn test_keys_are_distinct() {
        let mut keys: Vec<_> = Aggregate::ALL.iter().map(Aggregate::key).collect();
        keys.sort();
        keys.dedup();
        assert_eq!(keys.len(), Aggregate::ALL.len());
    }
}

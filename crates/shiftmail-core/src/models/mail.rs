use crate::error::ModelError;
use crate::properties::{PropertyMap, ReadWritable};

pub const DEFAULT_SMTP_PORT: u16 = 25;

/// The coordinator who signs outgoing emails.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Manager {
    pub name: String,
    pub email: String,
    pub phone: String,
}

impl Manager {
    pub fn new(name: impl Into<String>, email: impl Into<String>, phone: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            phone: phone.into(),
        }
    }
}

impl ReadWritable for Manager {
    const TYPE_NAME: &'static str = "Manager";
    const FIELDS: &'static [&'static str] = &["name", "email", "phone"];

    fn read_writable_properties(&self) -> PropertyMap {
        PropertyMap::new()
            .with("name", self.name.as_str())
            .with("email", self.email.as_str())
            .with("phone", self.phone.as_str())
    }

    fn from_properties(properties: &PropertyMap) -> Self {
        Self::new(
            properties.text("name"),
            properties.text("email"),
            properties.text("phone"),
        )
    }
}

/// Subject and body used to compose each volunteer's email.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EmailTemplate {
    pub subject: String,
    pub body: String,
    pub manager: Manager,
}

impl EmailTemplate {
    pub fn new(subject: impl Into<String>, body: impl Into<String>, manager: Manager) -> Self {
        Self {
            subject: subject.into(),
            body: body.into(),
            manager,
        }
    }
}

impl ReadWritable for EmailTemplate {
    const TYPE_NAME: &'static str = "EmailTemplate";
    const FIELDS: &'static [&'static str] = &["subject", "body", "manager"];

    fn read_writable_properties(&self) -> PropertyMap {
        PropertyMap::new()
            .with("subject", self.subject.as_str())
            .with("body", self.body.as_str())
            .with("manager", self.manager.read_writable_properties())
    }

    fn from_properties(properties: &PropertyMap) -> Self {
        Self {
            subject: properties.text("subject"),
            body: properties.text("body"),
            manager: properties
                .map("manager")
                .map(Manager::from_properties)
                .unwrap_or_default(),
        }
    }
}

/// Outgoing mail server settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailServerProperties {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
    pub from_address: String,
    pub use_tls: bool,
}

impl Default for EmailServerProperties {
    fn default() -> Self {
        Self {
            host: String::new(),
            port: DEFAULT_SMTP_PORT,
            username: String::new(),
            password: String::new(),
            from_address: String::new(),
            use_tls: false,
        }
    }
}

impl EmailServerProperties {
    /// Set the port from user input.
    pub fn set_port_str(&mut self, port: &str) -> Result<(), ModelError> {
        self.port = port
            .trim()
            .parse()
            .map_err(|_| ModelError::IllegalArgument(format!("invalid port number: '{port}'")))?;
        Ok(())
    }
}

impl ReadWritable for EmailServerProperties {
    const TYPE_NAME: &'static str = "EmailServerProperties";
    const FIELDS: &'static [&'static str] = &[
        "host",
        "port",
        "username",
        "password",
        "fromAddress",
        "useTls",
    ];

    fn read_writable_properties(&self) -> PropertyMap {
        PropertyMap::new()
            .with("host", self.host.as_str())
            .with("port", i64::from(self.port))
            .with("username", self.username.as_str())
            .with("password", self.password.as_str())
            .with("fromAddress", self.from_address.as_str())
            .with("useTls", self.use_tls)
    }

    fn from_properties(properties: &PropertyMap) -> Self {
        let raw_port = properties.integer("port", i64::from(DEFAULT_SMTP_PORT));
        let port = u16::try_from(raw_port).unwrap_or_else(|_| {
            tracing::warn!("Port {} out of range, using {}", raw_port, DEFAULT_SMTP_PORT);
            DEFAULT_SMTP_PORT
        });

        Self {
            host: properties.text("host"),
            port,
            username: properties.text("username"),
            password: properties.text("password"),
            from_address: properties.text("fromAddress"),
            use_tls: properties.flag("useTls"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manager_empty_map_defaults() {
        assert_eq!(
            Manager::construct_read_writable(Some(&PropertyMap::new())).unwrap(),
            Manager::new("", "", "")
        );
    }

    #[test]
    fn test_manager_round_trip() {
        let m = Manager::new("Pat Doe", "pat@example.org", "555-0199");
        assert_eq!(Manager::from_properties(&m.read_writable_properties()), m);
    }

    #[test]
    fn test_template_round_trip_with_manager() {
        let t = EmailTemplate::new(
            "Your shifts",
            "Hi {name},\n{shifts}\nThanks!",
            Manager::new("Pat", "pat@example.org", ""),
        );
        let props = t.read_writable_properties();
        assert_eq!(props.keys().collect::<Vec<_>>(), EmailTemplate::FIELDS.to_vec());
        assert_eq!(EmailTemplate::construct_read_writable(Some(&props)).unwrap(), t);
    }

    #[test]
    fn test_template_mistyped_manager_defaults() {
        let props = PropertyMap::new()
            .with("subject", "Hello")
            .with("manager", "Pat");
        let t = EmailTemplate::from_properties(&props);
        assert_eq!(t.subject, "Hello");
        assert_eq!(t.manager, Manager::default());
    }

    #[test]
    fn test_server_round_trip() {
        let s = EmailServerProperties {
            host: "smtp.example.org".into(),
            port: 587,
            username: "coordinator".into(),
            password: "secret".into(),
            from_address: "events@example.org".into(),
            use_tls: true,
        };
        assert_eq!(
            EmailServerProperties::construct_read_writable(Some(&s.read_writable_properties()))
                .unwrap(),
            s
        );
    }

    #[test]
    fn test_server_port_tolerance() {
        let text_port = PropertyMap::new().with("port", "465");
        assert_eq!(EmailServerProperties::from_properties(&text_port).port, 465);

        let junk = PropertyMap::new().with("port", "smtp");
        assert_eq!(EmailServerProperties::from_properties(&junk).port, DEFAULT_SMTP_PORT);

        let too_big = PropertyMap::new().with("port", 70_000_i64);
        assert_eq!(EmailServerProperties::from_properties(&too_big).port, DEFAULT_SMTP_PORT);
    }

    #[test]
    fn test_server_empty_map_defaults() {
        assert_eq!(
            EmailServerProperties::from_properties(&PropertyMap::new()),
            EmailServerProperties::default()
        );
    }

    #[test]
    fn test_set_port_str_rejects_garbage() {
        let mut s = EmailServerProperties::default();
        s.set_port_str(" 2525 ").unwrap();
        assert_eq!(s.port, 2525);

        let err = s.set_port_str("twenty-five").unwrap_err();
        assert!(matches!(err, ModelError::IllegalArgument(_)));
        assert_eq!(s.port, 2525);
    }
}

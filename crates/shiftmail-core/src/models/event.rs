use crate::properties::{PropertyMap, ReadWritable};

/// A named fact about the event (date, venue, call time...) available to
/// email templates as `{event:<key>}`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventProperty {
    pub key: String,
    pub value: String,
}

impl EventProperty {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

impl ReadWritable for EventProperty {
    const TYPE_NAME: &'static str = "EventProperty";
    const FIELDS: &'static [&'static str] = &["key", "value"];

    fn read_writable_properties(&self) -> PropertyMap {
        PropertyMap::new()
            .with("key", self.key.as_str())
            .with("value", self.value.as_str())
    }

    fn from_properties(properties: &PropertyMap) -> Self {
        Self::new(properties.text("key"), properties.text("value"))
    }
}

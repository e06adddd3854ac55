//! Decoded property blocks.
//!
//! These are the intermediate records handed to the core by the field
//! extractor: one [`EventBlock`] per `VEVENT`, plus the [`CalendarHeader`]
//! built from the top-level `VCALENDAR` properties.

/// A single content line, split into name, parameters and value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawProperty {
    /// Upper-cased property name (e.g. `DTSTART`).
    pub name: String,
    /// Parameters in document order, names upper-cased, quotes stripped.
    pub params: Vec<(String, String)>,
    /// The raw value after the first unquoted colon.
    pub value: String,
}

impl RawProperty {
    /// Creates a property without parameters.
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            params: Vec::new(),
            value: value.into(),
        }
    }

    /// Builder method to add a parameter.
    pub fn with_param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.push((name.into(), value.into()));
        self
    }

    /// Returns the value of a parameter, if present.
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

/// The properties of one `VEVENT`, in document order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventBlock {
    pub properties: Vec<RawProperty>,
}

impl EventBlock {
    pub fn new(properties: Vec<RawProperty>) -> Self {
        Self { properties }
    }

    /// Returns the first property with the given name.
    pub fn first(&self, name: &str) -> Option<&RawProperty> {
        self.properties.iter().find(|p| p.name == name)
    }

    /// Returns the value of the first property with the given name, or "".
    pub fn text(&self, name: &str) -> &str {
        self.first(name).map_or("", |p| p.value.as_str())
    }

    /// Returns every property with the given name.
    pub fn all<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a RawProperty> + 'a {
        self.properties.iter().filter(move |p| p.name == name)
    }
}

/// Top-level calendar properties.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CalendarHeader {
    /// `X-WR-CALNAME`.
    pub name: String,
    /// `X-WR-CALDESC`.
    pub description: String,
    /// `VERSION`, raw.
    pub version: String,
    /// `X-WR-TIMEZONE`, raw.
    pub timezone: String,
}

/// A document split into its header and event blocks.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DecodedDocument {
    pub header: CalendarHeader,
    pub events: Vec<EventBlock>,
}

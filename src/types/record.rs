use std::collections::HashMap;

use serde::Deserialize;

use super::error::EvalError;
use super::Value;

/// The input being classified: variable names mapped to values, plus an
/// identifying key used only in reports.
///
/// Deserializes from a flat JSON object. An `id` member (string or number)
/// becomes the record id; every other member is a field. [`insert()`](Self::insert)
/// treats `id` the same way.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(from = "HashMap<String, Value>")]
pub struct Record {
    id: Option<String>,
    fields: HashMap<String, Value>,
}

impl Record {
    /// Placeholder used in reports for records without an id.
    pub const UNKNOWN_ID: &'static str = "unknown";

    /// Member name holding the record id. Never a field.
    pub const ID_KEY: &'static str = "id";

    /// Create an empty record.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Set a field value.
    #[must_use]
    pub fn set(mut self, name: &str, value: impl Into<Value>) -> Self {
        self.insert(name, value.into());
        self
    }

    /// Insert a field value (mutable reference version).
    ///
    /// `id` sets the record id instead; a null id clears it.
    pub fn insert(&mut self, name: &str, value: Value) {
        if name == Self::ID_KEY {
            self.id = id_text(value);
        } else {
            self.fields.insert(name.to_owned(), value);
        }
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    #[must_use]
    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    /// The id to report, or [`UNKNOWN_ID`](Self::UNKNOWN_ID).
    #[must_use]
    pub fn display_id(&self) -> &str {
        self.id().unwrap_or(Self::UNKNOWN_ID)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Read a field as a boolean.
    ///
    /// # Errors
    ///
    /// [`EvalError::MissingField`] if the field is absent and
    /// [`EvalError::NotBoolean`] if it holds any other kind of value.
    pub fn get_bool(&self, name: &str) -> Result<bool, EvalError> {
        let value = self.get(name).ok_or_else(|| EvalError::MissingField {
            record: self.display_id().to_owned(),
            field: name.to_owned(),
        })?;
        value.as_bool().ok_or_else(|| EvalError::NotBoolean {
            record: self.display_id().to_owned(),
            field: name.to_owned(),
            found: value.type_name(),
        })
    }

    /// Parse a record from a JSON object.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Json`] if the text is not a flat object of scalars.
    pub fn from_json(input: &str) -> Result<Self, crate::Error> {
        Ok(serde_json::from_str(input)?)
    }
}

impl From<HashMap<String, Value>> for Record {
    fn from(mut fields: HashMap<String, Value>) -> Self {
        let id = fields.remove(Record::ID_KEY).and_then(id_text);
        Self { id, fields }
    }
}

fn id_text(value: Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s),
        other => Some(other.to_string()),
    }
}

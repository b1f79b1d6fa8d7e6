//! Record types for the `users` table.
//!
//! A [`Record`] is one stored row: an `id` assigned by the store plus the
//! four business fields held in [`RecordFields`]. Form drafts reuse
//! [`RecordFields`] so that a draft and an insert body are the same value.

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::RecordError;

/// Store-assigned identifier of a record.
///
/// Assumes the table's `id` is an integer (`bigint` identity) column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(pub i64);

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for RecordId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse().map(RecordId)
    }
}

/// One of the four business fields of a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Name,
    Age,
    ContactNo,
    Email,
}

impl Field {
    /// All business fields in form order.
    pub const ALL: [Field; 4] = [Field::Name, Field::Age, Field::ContactNo, Field::Email];

    /// Column name used by the store and by form inputs.
    pub fn name(self) -> &'static str {
        match self {
            Field::Name => "name",
            Field::Age => "age",
            Field::ContactNo => "contactno",
            Field::Email => "email",
        }
    }

    /// Human-readable label for headers and placeholders.
    pub fn label(self) -> &'static str {
        match self {
            Field::Name => "Name",
            Field::Age => "Age",
            Field::ContactNo => "Contact Number",
            Field::Email => "Email",
        }
    }

    /// HTML input type hint for the field.
    pub fn input_type(self) -> &'static str {
        match self {
            Field::Age => "number",
            Field::Email => "email",
            Field::Name | Field::ContactNo => "text",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Field {
    type Err = RecordError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Field::ALL
            .into_iter()
            .find(|field| field.name() == s)
            .ok_or_else(|| RecordError::UnknownField(s.to_string()))
    }
}

/// The four business fields, as entered in a form.
///
/// `age` stays text: it is sent exactly as the form input produced it and
/// the store performs the numeric conversion. A `null` column reads back as
/// empty text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordFields {
    #[serde(deserialize_with = "text_or_null")]
    pub name: String,
    #[serde(deserialize_with = "text_or_number")]
    pub age: String,
    #[serde(deserialize_with = "text_or_null")]
    pub contactno: String,
    #[serde(deserialize_with = "text_or_null")]
    pub email: String,
}

impl RecordFields {
    /// Build a full set of fields.
    pub fn new(
        name: impl Into<String>,
        age: impl Into<String>,
        contactno: impl Into<String>,
        email: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            age: age.into(),
            contactno: contactno.into(),
            email: email.into(),
        }
    }

    /// Current value of one field.
    pub fn get(&self, field: Field) -> &str {
        match field {
            Field::Name => &self.name,
            Field::Age => &self.age,
            Field::ContactNo => &self.contactno,
            Field::Email => &self.email,
        }
    }

    /// Overwrite one field, leaving the others untouched.
    pub fn set(&mut self, field: Field, value: impl Into<String>) {
        let value = value.into();
        match field {
            Field::Name => self.name = value,
            Field::Age => self.age = value,
            Field::ContactNo => self.contactno = value,
            Field::Email => self.email = value,
        }
    }
}

/// A stored row of the `users` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    pub id: RecordId,
    #[serde(flatten)]
    pub fields: RecordFields,
}

/// Update-form buffer: a copy of the selected record, edited in place.
///
/// `id` is `None` until a record has been selected for edit.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdateDraft {
    pub id: Option<RecordId>,
    pub fields: RecordFields,
}

impl From<&Record> for UpdateDraft {
    fn from(record: &Record) -> Self {
        Self {
            id: Some(record.id),
            fields: record.fields.clone(),
        }
    }
}

fn text_or_null<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// Accept a JSON string or number and keep it as text.
fn text_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum TextOrNumber {
        Text(String),
        Number(serde_json::Number),
        Null(()),
    }

    Ok(match TextOrNumber::deserialize(deserializer)? {
        TextOrNumber::Text(text) => text,
        TextOrNumber::Number(number) => number.to_string(),
        TextOrNumber::Null(()) => String::new(),
    })
}

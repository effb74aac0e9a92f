//! Raw platform values and their canonical textual form

use super::FieldKind;
use chrono::{DateTime, SecondsFormat, Utc};
use thiserror::Error;
use uuid::Uuid;

/// Delimiter between the selected values of a multi-choice field
pub const MULTI_CHOICE_DELIMITER: &str = ";#";

#[derive(Debug, Clone, PartialEq)]
pub struct GeolocationValue {
    pub altitude: f64,
    pub latitude: f64,
    pub longitude: f64,
    pub measure: f64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlValue {
    pub url: String,
    pub description: String,
}

/// Reference to an item of another list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LookupValue {
    pub id: i64,
    pub value: Option<String>,
}

impl LookupValue {
    pub fn new(id: i64) -> Self {
        Self { id, value: None }
    }
}

/// Reference to a site user or group
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserValue {
    pub id: u32,
    pub display_name: Option<String>,
}

impl UserValue {
    pub fn new(id: u32) -> Self {
        Self {
            id,
            display_name: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TermValue {
    pub label: String,
    pub term_guid: Uuid,
}

/// A field value as the platform hands it over
#[derive(Debug, Clone, PartialEq)]
pub enum RawFieldValue {
    Null,
    Text(String),
    Integer(i64),
    Number(f64),
    Boolean(bool),
    DateTime(DateTime<Utc>),
    Guid(Uuid),
    Geolocation(GeolocationValue),
    Url(UrlValue),
    Lookup(LookupValue),
    LookupMulti(Vec<LookupValue>),
    User(UserValue),
    UserMulti(Vec<UserValue>),
    Choices(Vec<String>),
    Term(TermValue),
    Terms(Vec<TermValue>),
}

impl RawFieldValue {
    /// Short shape name used in error messages
    pub fn shape(&self) -> &'static str {
        match self {
            RawFieldValue::Null => "null",
            RawFieldValue::Text(_) => "text",
            RawFieldValue::Integer(_) => "integer",
            RawFieldValue::Number(_) => "number",
            RawFieldValue::Boolean(_) => "boolean",
            RawFieldValue::DateTime(_) => "date/time",
            RawFieldValue::Guid(_) => "guid",
            RawFieldValue::Geolocation(_) => "geolocation",
            RawFieldValue::Url(_) => "url",
            RawFieldValue::Lookup(_) => "lookup",
            RawFieldValue::LookupMulti(_) => "lookup collection",
            RawFieldValue::User(_) => "user",
            RawFieldValue::UserMulti(_) => "user collection",
            RawFieldValue::Choices(_) => "choice collection",
            RawFieldValue::Term(_) => "taxonomy term",
            RawFieldValue::Terms(_) => "taxonomy term collection",
        }
    }

    /// Default stringification for scalar values; `None` for structured shapes
    pub fn scalar_text(&self) -> Option<String> {
        match self {
            RawFieldValue::Text(s) => Some(s.clone()),
            RawFieldValue::Integer(i) => Some(i.to_string()),
            RawFieldValue::Number(n) => Some(n.to_string()),
            RawFieldValue::Boolean(b) => Some(b.to_string()),
            RawFieldValue::DateTime(d) => Some(d.to_rfc3339_opts(SecondsFormat::Secs, true)),
            RawFieldValue::Guid(g) => Some(g.to_string()),
            _ => None,
        }
    }
}

/// The only value shape that leaves extraction
///
/// Each variant renders to exactly one textual form stored in a data row.
#[derive(Debug, Clone, PartialEq)]
pub enum CanonicalValue {
    Null,
    Text(String),
    Geolocation(GeolocationValue),
    Url(UrlValue),
    LookupIds(Vec<i64>),
    Logins(Vec<String>),
    Choices(Vec<String>),
    TermIds(Vec<Uuid>),
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("'{text}' is not a valid {kind} value: {reason}")]
pub struct CanonicalParseError {
    pub kind: String,
    pub text: String,
    pub reason: String,
}

impl CanonicalValue {
    pub fn render(&self) -> Option<String> {
        match self {
            CanonicalValue::Null => None,
            CanonicalValue::Text(s) => Some(s.clone()),
            CanonicalValue::Geolocation(g) => Some(format!(
                "{},{},{},{}",
                g.altitude, g.latitude, g.longitude, g.measure
            )),
            CanonicalValue::Url(u) => Some(format!("{},{}", u.url, u.description)),
            CanonicalValue::LookupIds(ids) => Some(join(ids, ",")),
            CanonicalValue::Logins(logins) => Some(logins.join(",")),
            CanonicalValue::Choices(choices) => Some(choices.join(MULTI_CHOICE_DELIMITER)),
            CanonicalValue::TermIds(ids) => Some(join(ids, ";")),
        }
    }

    /// Read a rendered value back for a field of the given kind
    ///
    /// Lookup text that is not a list of ids comes back as [`CanonicalValue::Text`],
    /// mirroring the pass-through on extraction.
    pub fn parse(kind: &FieldKind, text: Option<&str>) -> Result<Self, CanonicalParseError> {
        let Some(text) = text else {
            return Ok(CanonicalValue::Null);
        };
        let error = |reason: &str| CanonicalParseError {
            kind: kind.to_string(),
            text: text.to_string(),
            reason: reason.to_string(),
        };

        let value = match kind {
            FieldKind::Geolocation => {
                let parts: Vec<f64> = text
                    .split(',')
                    .map(|p| p.trim().parse::<f64>())
                    .collect::<Result<_, _>>()
                    .map_err(|_| error("expected four numbers"))?;
                let [altitude, latitude, longitude, measure] = parts.as_slice() else {
                    return Err(error("expected four numbers"));
                };
                CanonicalValue::Geolocation(GeolocationValue {
                    altitude: *altitude,
                    latitude: *latitude,
                    longitude: *longitude,
                    measure: *measure,
                })
            }
            FieldKind::Url => {
                let (url, description) = text.split_once(',').unwrap_or((text, ""));
                CanonicalValue::Url(UrlValue {
                    url: url.to_string(),
                    description: description.to_string(),
                })
            }
            FieldKind::Lookup => match split_list(text, ",")
                .map(str::parse::<i64>)
                .collect::<Result<Vec<_>, _>>()
            {
                Ok(ids) => CanonicalValue::LookupIds(ids),
                Err(_) => CanonicalValue::Text(text.to_string()),
            },
            FieldKind::User => CanonicalValue::Logins(owned(split_list(text, ","))),
            FieldKind::MultiChoice => {
                CanonicalValue::Choices(owned(split_list(text, MULTI_CHOICE_DELIMITER)))
            }
            FieldKind::Taxonomy => CanonicalValue::TermIds(
                split_list(text, ";")
                    .map(Uuid::parse_str)
                    .collect::<Result<_, _>>()
                    .map_err(|_| error("expected term identifiers"))?,
            ),
            _ => CanonicalValue::Text(text.to_string()),
        };
        Ok(value)
    }
}

fn join<T: ToString>(values: &[T], separator: &str) -> String {
    values
        .iter()
        .map(|v| v.to_string())
        .collect::<Vec<_>>()
        .join(separator)
}

/// Split a rendered collection; the empty string is the empty collection
fn split_list<'a>(text: &'a str, separator: &'a str) -> impl Iterator<Item = &'a str> + 'a {
    text.split(separator).filter(move |_| !text.is_empty())
}

fn owned<'a>(parts: impl Iterator<Item = &'a str>) -> Vec<String> {
    parts.map(str::to_string).collect()
}

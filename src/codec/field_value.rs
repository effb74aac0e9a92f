//! Field value codec: raw platform values to canonical values

use super::values::{CanonicalValue, RawFieldValue};
use super::FieldKind;
use crate::error::{MigrationError, PlatformError, Result};
use crate::platform::FieldMetadata;

/// Internal name of the update-tracking field watched by event receivers
pub const DEFAULT_RESERVED_RECEIVER_FIELD: &str = "sapiensatUpdateID";

/// Resolves numeric user ids to login names for one workspace
pub trait LoginResolver {
    fn login_name(&self, user_id: u32) -> std::result::Result<String, PlatformError>;
}

/// Dispatches on the declared field kind to produce a [`CanonicalValue`]
#[derive(Debug, Clone)]
pub struct FieldValueCodec {
    reserved_receiver_field: String,
}

impl Default for FieldValueCodec {
    fn default() -> Self {
        Self::new(DEFAULT_RESERVED_RECEIVER_FIELD)
    }
}

impl FieldValueCodec {
    pub fn new(reserved_receiver_field: impl Into<String>) -> Self {
        Self {
            reserved_receiver_field: reserved_receiver_field.into(),
        }
    }

    /// Whether values of this field are exported at all
    ///
    /// Read-only fields and unsupported kinds never reach a data row.
    pub fn is_exported(field: &FieldMetadata) -> bool {
        !field.read_only && field.kind.is_supported()
    }

    /// Encode one raw value.
    ///
    /// The reserved receiver field always encodes as `"1"` so replaying rows
    /// does not trigger event receivers on the target.
    pub fn encode(
        &self,
        field: &FieldMetadata,
        raw: &RawFieldValue,
        logins: &dyn LoginResolver,
    ) -> Result<CanonicalValue> {
        if field.internal_name == self.reserved_receiver_field {
            return Ok(CanonicalValue::Text("1".to_string()));
        }
        if matches!(raw, RawFieldValue::Null) {
            return Ok(CanonicalValue::Null);
        }

        match (&field.kind, raw) {
            (FieldKind::Taxonomy, RawFieldValue::Term(term)) => {
                Ok(CanonicalValue::TermIds(vec![term.term_guid]))
            }
            (FieldKind::Taxonomy, RawFieldValue::Terms(terms)) => Ok(CanonicalValue::TermIds(
                terms.iter().map(|t| t.term_guid).collect(),
            )),

            (FieldKind::Geolocation, RawFieldValue::Geolocation(geo)) => {
                Ok(CanonicalValue::Geolocation(geo.clone()))
            }
            (FieldKind::Geolocation, other) => Err(malformed(field, other)),

            (FieldKind::Url, RawFieldValue::Url(url)) => Ok(CanonicalValue::Url(url.clone())),
            (FieldKind::Url, other) => Err(malformed(field, other)),

            (FieldKind::Lookup, RawFieldValue::Text(text)) => {
                Ok(CanonicalValue::Text(text.clone()))
            }
            (FieldKind::Lookup, RawFieldValue::Lookup(lookup)) => {
                Ok(CanonicalValue::LookupIds(vec![lookup.id]))
            }
            (FieldKind::Lookup, RawFieldValue::LookupMulti(lookups)) => Ok(
                CanonicalValue::LookupIds(lookups.iter().map(|l| l.id).collect()),
            ),
            (FieldKind::Lookup, other) => Err(malformed(field, other)),

            (FieldKind::User, RawFieldValue::User(user)) => {
                Ok(CanonicalValue::Logins(vec![logins.login_name(user.id)?]))
            }
            (FieldKind::User, RawFieldValue::UserMulti(users)) => {
                let names = users
                    .iter()
                    .map(|u| logins.login_name(u.id))
                    .collect::<std::result::Result<Vec<_>, _>>()?;
                Ok(CanonicalValue::Logins(names))
            }
            (FieldKind::User, other) => Err(malformed(field, other)),

            (FieldKind::MultiChoice, RawFieldValue::Choices(choices)) => {
                Ok(CanonicalValue::Choices(choices.clone()))
            }

            (_, other) => other
                .scalar_text()
                .map(CanonicalValue::Text)
                .ok_or_else(|| malformed(field, other)),
        }
    }

    /// Encode and render to the text stored in a data row
    pub fn encode_text(
        &self,
        field: &FieldMetadata,
        raw: &RawFieldValue,
        logins: &dyn LoginResolver,
    ) -> Result<Option<String>> {
        Ok(self.encode(field, raw, logins)?.render())
    }
}

fn malformed(field: &FieldMetadata, raw: &RawFieldValue) -> MigrationError {
    MigrationError::MalformedFieldValue {
        field: field.internal_name.clone(),
        kind: field.kind.to_string(),
        detail: format!("unexpected {} value", raw.shape()),
    }
}

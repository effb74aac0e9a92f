//! Value and path codecs
//!
//! - `field_kind`: declared field types
//! - `values`: raw platform values and the canonical value model
//! - `field_value`: the kind-dispatched encoder producing canonical values
//! - `page_path`: reversible flattening of nested page names

mod field_kind;
mod field_value;
pub mod page_path;
mod values;

pub use field_kind::FieldKind;
pub use field_value::{DEFAULT_RESERVED_RECEIVER_FIELD, FieldValueCodec, LoginResolver};
pub use values::{
    CanonicalParseError, CanonicalValue, GeolocationValue, LookupValue, MULTI_CHOICE_DELIMITER,
    RawFieldValue, TermValue, UrlValue, UserValue,
};

use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

/// Declared type of a list field
///
/// Parsed from the platform's type name. Multi-valued variants of lookup,
/// person and taxonomy fields share a kind with their single-valued form; the
/// raw value decides which shape applies.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FieldKind {
    Text,
    Note,
    Number,
    Integer,
    Counter,
    Currency,
    Boolean,
    DateTime,
    Choice,
    MultiChoice,
    Lookup,
    User,
    Url,
    Geolocation,
    Taxonomy,
    Guid,
    Calculated,
    Attachments,
    Computed,
    /// Any type name the engine has no special handling for
    Other(String),
}

impl FieldKind {
    /// Attachments and computed fields are never exported
    pub fn is_supported(&self) -> bool {
        !matches!(self, FieldKind::Attachments | FieldKind::Computed)
    }
}

impl FromStr for FieldKind {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "Text" => FieldKind::Text,
            "Note" => FieldKind::Note,
            "Number" => FieldKind::Number,
            "Integer" => FieldKind::Integer,
            "Counter" => FieldKind::Counter,
            "Currency" => FieldKind::Currency,
            "Boolean" => FieldKind::Boolean,
            "DateTime" => FieldKind::DateTime,
            "Choice" => FieldKind::Choice,
            "MultiChoice" => FieldKind::MultiChoice,
            "Lookup" | "LookupMulti" => FieldKind::Lookup,
            "User" | "UserMulti" => FieldKind::User,
            "URL" => FieldKind::Url,
            "Geolocation" => FieldKind::Geolocation,
            "TaxonomyFieldType" | "TaxonomyFieldTypeMulti" => FieldKind::Taxonomy,
            "Guid" => FieldKind::Guid,
            "Calculated" => FieldKind::Calculated,
            "Attachments" => FieldKind::Attachments,
            "Computed" => FieldKind::Computed,
            other => FieldKind::Other(other.to_string()),
        })
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FieldKind::Text => "Text",
            FieldKind::Note => "Note",
            FieldKind::Number => "Number",
            FieldKind::Integer => "Integer",
            FieldKind::Counter => "Counter",
            FieldKind::Currency => "Currency",
            FieldKind::Boolean => "Boolean",
            FieldKind::DateTime => "DateTime",
            FieldKind::Choice => "Choice",
            FieldKind::MultiChoice => "MultiChoice",
            FieldKind::Lookup => "Lookup",
            FieldKind::User => "User",
            FieldKind::Url => "URL",
            FieldKind::Geolocation => "Geolocation",
            FieldKind::Taxonomy => "TaxonomyFieldType",
            FieldKind::Guid => "Guid",
            FieldKind::Calculated => "Calculated",
            FieldKind::Attachments => "Attachments",
            FieldKind::Computed => "Computed",
            FieldKind::Other(name) => name,
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_multi_type_names_share_kind() {
        assert_eq!("LookupMulti".parse::<FieldKind>(), Ok(FieldKind::Lookup));
        assert_eq!("UserMulti".parse::<FieldKind>(), Ok(FieldKind::User));
        assert_eq!(
            "TaxonomyFieldTypeMulti".parse::<FieldKind>(),
            Ok(FieldKind::Taxonomy)
        );
    }

    #[test]
    fn test_unknown_type_kept_verbatim() {
        let kind: FieldKind = "ThreadIndex".parse().unwrap();
        assert_eq!(kind, FieldKind::Other("ThreadIndex".to_string()));
        assert_eq!(kind.to_string(), "ThreadIndex");
    }

    #[test]
    fn test_unsupported_kinds() {
        assert!(!FieldKind::Attachments.is_supported());
        assert!(!FieldKind::Computed.is_supported());
        assert!(FieldKind::Calculated.is_supported());
    }
}

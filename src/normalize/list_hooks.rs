//! Per-list post-processing applied after the general normalization

use crate::error::Result;
use crate::platform::{FieldMetadata, ListSummary};
use crate::template::{FieldDefinition, ListDefinition};
use tracing::{info, warn};

/// A narrowly scoped fix-up for lists matching some criterion
pub trait ListHook: Send + Sync {
    fn name(&self) -> &str;

    fn applies_to(&self, list: &ListSummary) -> bool;

    /// `live_fields` is the source list's current field metadata
    fn apply(&self, list: &mut ListDefinition, live_fields: &[FieldMetadata]) -> Result<()>;
}

/// Fields of event lists that must be provisioned as full definitions
pub const RECURRENCE_FIELDS: [&str; 2] = ["EventDate", "EndDate"];

/// Recurrence fields referenced by an events list do not replay correctly, so
/// the references are swapped for verbatim copies of the live definitions.
pub struct EventListHook {
    path_pattern: String,
}

impl EventListHook {
    pub fn new(path_pattern: impl Into<String>) -> Self {
        Self {
            path_pattern: path_pattern.into(),
        }
    }
}

impl ListHook for EventListHook {
    fn name(&self) -> &str {
        "events"
    }

    fn applies_to(&self, list: &ListSummary) -> bool {
        list.relative_path
            .to_lowercase()
            .contains(&self.path_pattern.to_lowercase())
    }

    fn apply(&self, list: &mut ListDefinition, live_fields: &[FieldMetadata]) -> Result<()> {
        list.field_refs
            .retain(|r| !RECURRENCE_FIELDS.contains(&r.name.as_str()));

        for name in RECURRENCE_FIELDS {
            if list.fields.iter().any(|f| f.name == name) {
                continue;
            }
            match live_fields.iter().find(|f| f.internal_name == name) {
                Some(live) => {
                    list.fields
                        .push(FieldDefinition::new(name, live.schema_xml.clone()));
                    info!(list = %list.title, field = name, "recurrence field copied as definition");
                }
                None => {
                    warn!(list = %list.title, field = name, "recurrence field missing on source list");
                }
            }
        }
        Ok(())
    }
}

//! Formula rewriting for calculated and validated fields
//!
//! Extracted schemas refer to other fields through `{fieldtitle:<InternalName>}`
//! tokens. Internal names do not survive a cross-site replay, so every token is
//! replaced by the field's display name and the non-portable `<Validation>`
//! element is dropped. Running the rewrite twice gives the same schema.

use crate::error::{MigrationError, Result};
use crate::markup::MarkupElement;
use crate::platform::FieldMetadata;
use crate::template::ListDefinition;
use std::collections::BTreeMap;
use tracing::debug;

pub const CALCULATED_TYPE: &str = "Calculated";
pub const VALIDATION_ELEMENT: &str = "Validation";
pub const TITLE_FIELD: &str = "Title";

/// Internal field name to display name
pub type FieldTitleMap = BTreeMap<String, String>;

pub fn field_title_token(internal_name: &str) -> String {
    format!("{{fieldtitle:{}}}", internal_name)
}

fn parse_schema(field: &str, schema_xml: &str) -> Result<MarkupElement> {
    MarkupElement::parse(schema_xml).map_err(|e| MigrationError::SchemaParse {
        field: field.to_string(),
        detail: e.to_string(),
    })
}

/// Build the replacement map for one list.
///
/// Local field definitions win over field references of the same name. The
/// title field falls back to its live display name, then to `"Title"`.
pub fn build_field_titles(
    list: &ListDefinition,
    live_fields: &[FieldMetadata],
) -> Result<FieldTitleMap> {
    let mut titles = FieldTitleMap::new();

    for field in &list.fields {
        let root = parse_schema(&field.name, &field.schema_xml)?;
        let name = root.attribute("Name").unwrap_or(&field.name).to_string();
        let display_name = root.attribute("DisplayName").unwrap_or_default().to_string();
        if titles.insert(name.clone(), display_name).is_some() {
            return Err(MigrationError::DuplicateField {
                list: list.title.clone(),
                field: name,
            });
        }
    }

    for reference in &list.field_refs {
        titles
            .entry(reference.name.clone())
            .or_insert_with(|| reference.display_name.clone());
    }

    if !titles.contains_key(TITLE_FIELD) {
        let live_title = live_fields
            .iter()
            .find(|f| f.internal_name == TITLE_FIELD)
            .map(|f| f.title.clone())
            .filter(|t| !t.is_empty())
            .unwrap_or_else(|| TITLE_FIELD.to_string());
        titles.insert(TITLE_FIELD.to_string(), live_title);
    }

    Ok(titles)
}

fn needs_rewrite(root: &MarkupElement) -> bool {
    root.attribute("Type") == Some(CALCULATED_TYPE) || root.contains_element(VALIDATION_ELEMENT)
}

/// Rewrite one schema; `Ok(None)` when it carries neither a formula nor a validation rule
pub fn rewrite_schema(
    field: &str,
    schema_xml: &str,
    titles: &FieldTitleMap,
) -> Result<Option<String>> {
    let mut root = parse_schema(field, schema_xml)?;
    if !needs_rewrite(&root) {
        return Ok(None);
    }

    for (internal_name, display_name) in titles {
        if internal_name.is_empty() || display_name.is_empty() {
            continue;
        }
        root.replace_in_values(&field_title_token(internal_name), display_name);
    }
    root.remove_elements(VALIDATION_ELEMENT);

    Ok(Some(root.to_markup()))
}

/// Rewrite every calculated or validated field of a list, returning how many changed
pub fn rewrite_list_formulas(list: &mut ListDefinition, live_fields: &[FieldMetadata]) -> Result<usize> {
    let titles = build_field_titles(list, live_fields)?;
    let mut rewritten = 0;

    for field in &mut list.fields {
        if let Some(schema) = rewrite_schema(&field.name, &field.schema_xml, &titles)? {
            debug!(list = %list.title, field = %field.name, "rewrote field schema");
            field.schema_xml = schema;
            rewritten += 1;
        }
    }
    Ok(rewritten)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::FieldKind;
    use crate::template::{FieldDefinition, FieldReference};

    fn list_with(fields: Vec<FieldDefinition>, refs: Vec<FieldReference>) -> ListDefinition {
        let mut list = ListDefinition::new("Orders", "Lists/Orders");
        list.fields = fields;
        list.field_refs = refs;
        list
    }

    #[test]
    fn test_title_falls_back_to_live_display_name() {
        let list = list_with(vec![], vec![]);
        let live = vec![FieldMetadata::new("Title", "Order Name", FieldKind::Text)];
        let titles = build_field_titles(&list, &live).unwrap();
        assert_eq!(titles["Title"], "Order Name");

        let titles = build_field_titles(&list, &[]).unwrap();
        assert_eq!(titles["Title"], "Title");
    }

    #[test]
    fn test_local_definition_wins_over_reference() {
        let list = list_with(
            vec![FieldDefinition::new(
                "Price",
                r#"<Field Name="Price" DisplayName="Unit Price" Type="Number" />"#,
            )],
            vec![FieldReference::new("Price", "Old Price")],
        );
        let titles = build_field_titles(&list, &[]).unwrap();
        assert_eq!(titles["Price"], "Unit Price");
    }

    #[test]
    fn test_duplicate_definitions_rejected() {
        let schema = r#"<Field Name="Price" DisplayName="Price" Type="Number" />"#;
        let list = list_with(
            vec![
                FieldDefinition::new("Price", schema),
                FieldDefinition::new("Price", schema),
            ],
            vec![],
        );
        assert!(matches!(
            build_field_titles(&list, &[]),
            Err(MigrationError::DuplicateField { .. })
        ));
    }

    #[test]
    fn test_plain_fields_left_untouched() {
        let titles = FieldTitleMap::new();
        let schema = r#"<Field Name="Notes" Type="Note" />"#;
        assert_eq!(rewrite_schema("Notes", schema, &titles).unwrap(), None);
    }

    #[test]
    fn test_display_names_are_escaped_in_output() {
        let mut titles = FieldTitleMap::new();
        titles.insert("Qty".to_string(), "Qty <units>".to_string());
        let schema = r#"<Field Type="Calculated" Name="Total"><Formula>=[{fieldtitle:Qty}]*2</Formula></Field>"#;
        let out = rewrite_schema("Total", schema, &titles).unwrap().unwrap();
        assert_eq!(
            out,
            r#"<Field Type="Calculated" Name="Total"><Formula>=[Qty &lt;units&gt;]*2</Formula></Field>"#
        );
    }
}
